//! Frame start / frame end callbacks
//!
//! Hooks run synchronously in the order they were added. There is no
//! dependency tracking: a hook that must observe another hook's effect has to
//! be added after it.

use smallvec::SmallVec;

use super::EngineError;

/// Callback run at a frame boundary with mutable access to the context
pub type FrameHook<C> = Box<dyn FnMut(&mut C) -> Result<(), EngineError>>;

/// Ordered frame-start and frame-end hook lists
pub struct FrameHooks<C> {
    start: SmallVec<[FrameHook<C>; 4]>,
    end: SmallVec<[FrameHook<C>; 4]>,
}

impl<C> FrameHooks<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: SmallVec::new(),
            end: SmallVec::new(),
        }
    }

    /// Append a hook run at the start of every frame
    pub fn on_frame_start(
        &mut self,
        hook: impl FnMut(&mut C) -> Result<(), EngineError> + 'static,
    ) {
        self.start.push(Box::new(hook));
    }

    /// Append a hook run at the end of every frame
    pub fn on_frame_end(&mut self, hook: impl FnMut(&mut C) -> Result<(), EngineError> + 'static) {
        self.end.push(Box::new(hook));
    }

    /// Run the frame-start hooks in order.
    ///
    /// # Errors
    ///
    /// Returns the first hook error; hooks after it do not run
    pub fn dispatch_start(&mut self, context: &mut C) -> Result<(), EngineError> {
        Self::dispatch(&mut self.start, context)
    }

    /// Run the frame-end hooks in order.
    ///
    /// # Errors
    ///
    /// Returns the first hook error; hooks after it do not run
    pub fn dispatch_end(&mut self, context: &mut C) -> Result<(), EngineError> {
        Self::dispatch(&mut self.end, context)
    }

    fn dispatch(hooks: &mut [FrameHook<C>], context: &mut C) -> Result<(), EngineError> {
        hooks.iter_mut().try_for_each(|hook| hook(&mut *context))
    }

    /// Number of frame-start hooks
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.start.len()
    }

    /// Number of frame-end hooks
    #[must_use]
    pub fn end_count(&self) -> usize {
        self.end.len()
    }
}

impl<C> Default for FrameHooks<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for FrameHooks<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHooks")
            .field("start", &self.start.len())
            .field("end", &self.end.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_hooks_run_in_registration_order() {
        let mut hooks = FrameHooks::<Vec<&'static str>>::new();
        hooks.on_frame_start(|log| {
            log.push("H1");
            Ok(())
        });
        hooks.on_frame_start(|log| {
            log.push("H2");
            Ok(())
        });
        hooks.on_frame_start(|log| {
            log.push("H3");
            Ok(())
        });

        let mut log = Vec::new();
        hooks.dispatch_start(&mut log).unwrap();
        assert_eq!(log, vec!["H1", "H2", "H3"]);

        hooks.dispatch_start(&mut log).unwrap();
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn test_start_and_end_are_separate() {
        let mut hooks = FrameHooks::<Vec<&'static str>>::new();
        hooks.on_frame_end(|log| {
            log.push("end");
            Ok(())
        });
        hooks.on_frame_start(|log| {
            log.push("start");
            Ok(())
        });

        let mut log = Vec::new();
        hooks.dispatch_start(&mut log).unwrap();
        hooks.dispatch_end(&mut log).unwrap();
        assert_eq!(log, vec!["start", "end"]);
        assert_eq!(hooks.start_count(), 1);
        assert_eq!(hooks.end_count(), 1);
    }

    #[test]
    fn test_failing_hook_stops_dispatch() {
        let mut hooks = FrameHooks::<Vec<u32>>::new();
        hooks.on_frame_start(|log| {
            log.push(1);
            Ok(())
        });
        hooks.on_frame_start(|_| Err(EngineError::hook("boom")));
        hooks.on_frame_start(|log| {
            log.push(3);
            Ok(())
        });

        let mut log = Vec::new();
        assert_eq!(
            hooks.dispatch_start(&mut log),
            Err(EngineError::Hook(String::from("boom")))
        );
        assert_eq!(log, vec![1]);
    }

    #[test]
    fn test_hooks_keep_state_between_frames() {
        let mut hooks = FrameHooks::<u32>::new();
        let mut calls = 0;
        hooks.on_frame_end(move |total| {
            calls += 1;
            *total = calls * 10;
            Ok(())
        });

        let mut total = 0;
        for _ in 0..3 {
            hooks.dispatch_end(&mut total).unwrap();
        }
        assert_eq!(total, 30);
    }

    #[test]
    fn test_empty_dispatch_is_ok() {
        let mut hooks = FrameHooks::<()>::default();
        assert!(hooks.dispatch_start(&mut ()).is_ok());
        assert!(hooks.dispatch_end(&mut ()).is_ok());
    }
}
