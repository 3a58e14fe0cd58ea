/// Frame metadata - carries frame number and timing info from the host clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the clock started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Fixed-step frame source for headless replays and tests
/// Use this in a loop: `for frame in FixedFrames::new(1.0 / 60.0).take(n) { ... }`
#[derive(Debug, Clone)]
pub struct FixedFrames {
    delta: f32,
    frame_number: u64,
}

impl FixedFrames {
    pub fn new(delta: f32) -> Self {
        Self { delta, frame_number: 0 }
    }
}

impl Iterator for FixedFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        self.frame_number += 1;
        let time = self.frame_number as f32 * self.delta;
        Some(FrameInfo::new(self.frame_number - 1, time, self.delta))
    }
}
