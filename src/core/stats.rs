//! Rolling frame statistics

use std::collections::VecDeque;
use std::time::Duration;

/// Frame time history over a fixed window
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<Duration>,
    window: usize,
    total_frames: u64,
}

impl FrameStats {
    /// Default number of frames averaged over
    pub const DEFAULT_WINDOW: usize = 120;

    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    /// Average over the last `window` frames (at least one)
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            frame_times: VecDeque::with_capacity(window),
            window,
            total_frames: 0,
        }
    }

    /// Record a frame with the given delta time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;
        if self.frame_times.len() == self.window {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);
    }

    /// Average frame time in milliseconds over the window
    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    /// Frames per second over the window, 0 until time has passed
    pub fn fps(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        let secs = total.as_secs_f32();
        if secs > 0.0 {
            self.frame_times.len() as f32 / secs
        } else {
            0.0
        }
    }

    /// Longest frame in the window, in milliseconds
    pub fn max_frame_time_ms(&self) -> f32 {
        self.frame_times
            .iter()
            .max()
            .map_or(0.0, |dt| dt.as_secs_f32() * 1000.0)
    }

    /// Frames recorded since creation
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// One-line summary for logs
    pub fn format_stats(&self) -> String {
        format!(
            "FPS: {:.1} | Frame: {:.2}ms (max: {:.2}) | Total: {}",
            self.fps(),
            self.avg_frame_time_ms(),
            self.max_frame_time_ms(),
            self.total_frames
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}
