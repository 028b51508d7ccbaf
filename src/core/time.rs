//! Frame timing

use std::time::{Duration, Instant};

/// Wall-clock timing of the frame loop
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the start of a new frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time between the last two frames
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_counts_frames() {
        let mut time = Time::new();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.delta(), Duration::ZERO);

        time.update();
        time.update();
        assert_eq!(time.frame_count(), 2);
        assert!(time.elapsed() >= time.delta());
    }
}
