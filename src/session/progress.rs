use std::time::Duration;

/// Frame position within a video, owned by a counting session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameProgress {
    frame: u64,
    start: u64,
    end: Option<u64>,
    total_frames: Option<u64>,
    fps: Option<f64>,
}

impl FrameProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_frames(mut self, total_frames: u64) -> Self {
        self.total_frames = Some(total_frames);
        if self.end.is_none() {
            self.end = Some(total_frames);
        }
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = (fps > 0.0).then_some(fps);
        self
    }

    /// Start counting frames at `frame` instead of zero.
    pub fn starting_at(mut self, frame: u64) -> Self {
        self.start = frame;
        self.frame = frame;
        self
    }

    pub fn ending_at(mut self, frame: u64) -> Self {
        self.end = Some(frame);
        self
    }

    /// Index of the frame currently being processed.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn advance(&mut self) {
        self.frame += 1;
    }

    /// Frames processed since the start frame.
    pub fn processed(&self) -> u64 {
        self.frame - self.start
    }

    /// Position of the current frame in video time, if the frame rate is known.
    pub fn timestamp(&self) -> Option<Duration> {
        self.fps
            .map(|fps| Duration::from_secs_f64(self.frame as f64 / fps))
    }

    /// Fraction of the configured range processed so far.
    pub fn progress(&self) -> Option<f64> {
        let end = self.end?;
        if end <= self.start {
            return Some(1.0);
        }
        Some((self.processed() as f64 / (end - self.start) as f64).min(1.0))
    }

    pub fn remaining_frames(&self) -> Option<u64> {
        self.end.map(|end| end.saturating_sub(self.frame))
    }

    pub fn is_complete(&self) -> bool {
        self.end.is_some_and(|end| self.frame >= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_accounting() {
        let mut progress = FrameProgress::new().with_total_frames(100).with_fps(25.0);
        for _ in 0..50 {
            progress.advance();
        }
        assert_eq!(progress.frame(), 50);
        assert_eq!(progress.remaining_frames(), Some(50));
        assert_eq!(progress.progress(), Some(0.5));
        assert_eq!(progress.timestamp(), Some(Duration::from_secs(2)));
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_unknown_length() {
        let mut progress = FrameProgress::new().starting_at(10);
        progress.advance();
        assert_eq!(progress.frame(), 11);
        assert_eq!(progress.processed(), 1);
        assert_eq!(progress.progress(), None);
        assert_eq!(progress.timestamp(), None);
    }
}
