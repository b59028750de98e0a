//! Frame-rate bookkeeping for the viewer's title bar.

use std::time::{Duration, Instant};

/// Counts presented frames and derives a frames-per-second figure.
///
/// The figure is refreshed every `interval`, not every frame, so the title
/// does not flicker.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            interval,
        }
    }

    /// Record one frame. Returns true when [`fps`](Self::fps) was refreshed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.frame_count += 1;

        let elapsed = now.duration_since(self.fps_update_time);
        if elapsed < self.interval || elapsed.is_zero() {
            return false;
        }
        let frames = self.frame_count - self.fps_frame_count;
        self.fps = frames as f32 / elapsed.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        true
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
