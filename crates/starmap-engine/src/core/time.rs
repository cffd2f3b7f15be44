/// Frame-rate cap for the map tick.
/// Frame deltas are accumulated until at least one frame interval has passed.
pub struct FrameLimiter {
    /// Minimum seconds between admitted frames (0 = uncapped).
    interval: f32,
    /// Time accumulated since the last admitted frame.
    accumulator: f32,
}

impl FrameLimiter {
    /// `fps_limit` of 0 disables the cap.
    pub fn new(fps_limit: u32) -> Self {
        Self {
            interval: Self::interval_for(fps_limit),
            accumulator: 0.0,
        }
    }

    fn interval_for(fps_limit: u32) -> f32 {
        if fps_limit == 0 {
            0.0
        } else {
            1.0 / fps_limit as f32
        }
    }

    pub fn set_fps_limit(&mut self, fps_limit: u32) {
        self.interval = Self::interval_for(fps_limit);
    }

    /// Add frame time. Returns the accumulated delta when a frame should run.
    pub fn admit(&mut self, frame_dt: f32) -> Option<f32> {
        self.accumulator += frame_dt;
        // Small tolerance so a 60 Hz display is not throttled by float error.
        if self.accumulator + 1e-4 >= self.interval {
            Some(std::mem::take(&mut self.accumulator))
        } else {
            None
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_admits_every_frame() {
        let mut fl = FrameLimiter::new(0);
        assert_eq!(fl.admit(0.001), Some(0.001));
        assert_eq!(fl.admit(0.002), Some(0.002));
    }

    #[test]
    fn matching_display_rate_admits_every_frame() {
        let mut fl = FrameLimiter::new(60);
        assert!(fl.admit(1.0 / 60.0).is_some());
        assert!(fl.admit(1.0 / 60.0).is_some());
    }

    #[test]
    fn cap_skips_frames_and_accumulates_delta() {
        let mut fl = FrameLimiter::new(30);
        assert!(fl.admit(1.0 / 120.0).is_none());
        assert!(fl.admit(1.0 / 120.0).is_none());
        assert!(fl.admit(1.0 / 120.0).is_none());
        let dt = fl.admit(1.0 / 120.0).expect("fourth 120 Hz frame reaches 30 Hz");
        assert!((dt - 1.0 / 30.0).abs() < 1e-5);
    }

    #[test]
    fn changing_limit_takes_effect() {
        let mut fl = FrameLimiter::new(60);
        fl.set_fps_limit(10);
        assert!((fl.interval() - 0.1).abs() < 1e-6);
        assert!(fl.admit(0.05).is_none());
        assert!(fl.admit(0.05).is_some());
    }
}
