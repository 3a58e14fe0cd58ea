use std::time::Instant;

use crate::frame::FrameInfo;

/// Host frame clock - tracks delta and elapsed time, numbers frames
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    frame_number: u64,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_number: 0,
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Advance one rendered frame
    pub fn next_frame(&mut self) -> FrameInfo {
        let delta = self.tick();
        let time = self.last_tick.duration_since(self.start).as_secs_f32();
        let info = FrameInfo::new(self.frame_number, time, delta);
        self.frame_number += 1;
        info
    }

    /// Reset delta measurement to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
