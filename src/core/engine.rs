//! Engine struct and the frame loop
//!
//! Every frame runs, strictly in this order:
//!
//! 1. frame-start hooks
//! 2. one fixed physics step, followed by collision callbacks
//! 3. frame-end hooks
//!
//! Frame N finishes all three before frame N+1 starts. A stop request made
//! during a frame takes effect once that frame's end hooks have run.

use std::time::{Duration, Instant};

use super::{EngineConfig, EngineError, FrameHooks, FrameStats, Time};
use crate::physics::PhysicsManager;
use crate::scene::{Bindings, GraphicsManager};

/// Everything frame hooks can reach
pub struct EngineContext {
    /// Time tracking
    pub time: Time,
    /// Scene graph
    pub graphics: GraphicsManager,
    /// Simulation
    pub physics: PhysicsManager,
    /// Scene nodes following bodies
    pub bindings: Bindings,
    /// Frame statistics
    pub stats: FrameStats,
    /// Should the engine quit
    should_quit: bool,
}

impl EngineContext {
    fn new(config: &EngineConfig) -> Self {
        Self {
            time: Time::new(),
            graphics: GraphicsManager::new(&config.graphics),
            physics: PhysicsManager::new(&config.physics),
            bindings: Bindings::new(),
            stats: FrameStats::new(),
            should_quit: false,
        }
    }

    /// Request engine shutdown after the current frame
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Check if engine should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Main engine struct: owns the context and the frame hooks
pub struct Engine {
    config: EngineConfig,
    hooks: FrameHooks<EngineContext>,
    context: EngineContext,
    frames: u64,
}

impl Engine {
    /// Create an engine with empty scene and simulation
    pub fn new(config: EngineConfig) -> Self {
        let context = EngineContext::new(&config);
        Self {
            config,
            hooks: FrameHooks::new(),
            context,
            frames: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.context
    }

    /// Add a hook run at the start of every frame, after those already added
    pub fn on_frame_start(
        &mut self,
        hook: impl FnMut(&mut EngineContext) -> Result<(), EngineError> + 'static,
    ) {
        self.hooks.on_frame_start(hook);
    }

    /// Add a hook run at the end of every frame, after those already added
    pub fn on_frame_end(
        &mut self,
        hook: impl FnMut(&mut EngineContext) -> Result<(), EngineError> + 'static,
    ) {
        self.hooks.on_frame_end(hook);
    }

    /// The registered hooks
    pub fn hooks(&self) -> &FrameHooks<EngineContext> {
        &self.hooks
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one complete frame
    ///
    /// # Errors
    ///
    /// Returns the first hook error. The rest of the frame is skipped and the
    /// frame is not counted.
    pub fn run_frame(&mut self) -> Result<(), EngineError> {
        self.context.time.update();
        self.context.stats.record_frame(self.context.time.delta());

        self.hooks.dispatch_start(&mut self.context)?;
        self.context.physics.update();
        self.hooks.dispatch_end(&mut self.context)?;

        self.frames += 1;
        let interval = self.config.stats_interval;
        if interval > 0 && self.frames % interval == 0 {
            log::debug!("{}", self.context.stats.format_stats());
        }
        Ok(())
    }

    /// Run frames until [`EngineContext::quit`] is called or the configured
    /// frame limit is reached. Returns the number of frames completed.
    ///
    /// # Errors
    ///
    /// Stops at the first failing frame and returns its error
    pub fn run(&mut self) -> Result<u64, EngineError> {
        // A host may already have installed a logger
        let _ = env_logger::try_init();
        log::info!("Starting engine: {}", self.config.title);

        let frame_budget = (self.config.target_fps > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(self.config.target_fps)));
        let start_frames = self.frames;

        while !self.finished() {
            let frame_start = Instant::now();

            if let Err(e) = self.run_frame() {
                log::error!("Frame {} failed: {e}", self.frames + 1);
                return Err(e);
            }

            let remaining = frame_budget.and_then(|b| b.checked_sub(frame_start.elapsed()));
            if let Some(remaining) = remaining {
                std::thread::sleep(remaining);
            }
        }

        let ran = self.frames - start_frames;
        log::info!(
            "Stopped after {ran} frame(s), {:.2}s",
            self.context.time.elapsed().as_secs_f32()
        );
        Ok(ran)
    }

    fn finished(&self) -> bool {
        self.context.should_quit()
            || self
                .config
                .max_frames
                .is_some_and(|max| self.frames >= max)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("title", &self.config.title)
            .field("frames", &self.frames)
            .field("hooks", &self.hooks)
            .field("physics", &self.context.physics)
            .field("graphics", &self.context.graphics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn headless(max_frames: u64) -> Engine {
        Engine::new(
            EngineConfig::default()
                .with_title("test")
                .with_target_fps(0)
                .with_max_frames(max_frames),
        )
    }

    #[test]
    fn test_run_stops_at_frame_limit() {
        let mut engine = headless(5);
        assert_eq!(engine.run().unwrap(), 5);
        assert_eq!(engine.frames(), 5);
        assert_eq!(engine.context().physics.steps(), 5);
        assert_eq!(engine.context().time.frame_count(), 5);
    }

    #[test]
    fn test_frame_phases_are_ordered() {
        let mut engine = headless(2);
        let log = Rc::new(RefCell::new(Vec::new()));

        let start = Rc::clone(&log);
        engine.on_frame_start(move |ctx| {
            start
                .borrow_mut()
                .push(format!("start {}", ctx.physics.steps()));
            Ok(())
        });
        let end = Rc::clone(&log);
        engine.on_frame_end(move |ctx| {
            end.borrow_mut().push(format!("end {}", ctx.physics.steps()));
            Ok(())
        });

        engine.run().unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["start 0", "end 1", "start 1", "end 2"]
        );
    }

    #[test]
    fn test_quit_completes_current_frame() {
        let mut engine = headless(100);
        let ended = Rc::new(RefCell::new(0));

        engine.on_frame_start(|ctx| {
            if ctx.physics.steps() == 2 {
                ctx.quit();
            }
            Ok(())
        });
        let counter = Rc::clone(&ended);
        engine.on_frame_end(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        assert_eq!(engine.run().unwrap(), 3);
        assert_eq!(*ended.borrow(), 3);
    }

    #[test]
    fn test_hook_error_aborts_run() {
        let mut engine = headless(10);
        let ended = Rc::new(RefCell::new(0));

        engine.on_frame_start(|ctx| {
            if ctx.physics.steps() == 1 {
                Err(EngineError::hook("scripted failure"))
            } else {
                Ok(())
            }
        });
        let counter = Rc::clone(&ended);
        engine.on_frame_end(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        assert_eq!(
            engine.run(),
            Err(EngineError::Hook(String::from("scripted failure")))
        );
        // Second frame failed before stepping or running end hooks
        assert_eq!(engine.frames(), 1);
        assert_eq!(engine.context().physics.steps(), 1);
        assert_eq!(*ended.borrow(), 1);
    }

    #[test]
    fn test_physics_advances_between_hooks() {
        let mut engine = headless(1);
        let body = engine.context_mut().physics.add_dynamic_rigid_body(
            Vec3::splat(1.0),
            Vec3::new(0.0, 100.0, 0.0),
            1.0,
        );
        let heights = Rc::new(RefCell::new(Vec::new()));

        let before = Rc::clone(&heights);
        engine.on_frame_start(move |ctx| {
            before.borrow_mut().push(ctx.physics.position(body)?.y);
            Ok(())
        });
        let after = Rc::clone(&heights);
        engine.on_frame_end(move |ctx| {
            after.borrow_mut().push(ctx.physics.position(body)?.y);
            Ok(())
        });

        engine.run().unwrap();
        let heights = heights.borrow();
        assert_eq!(heights[0], 100.0);
        assert!(heights[1] < 100.0);
    }
}
