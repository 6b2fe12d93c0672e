use web_time::{Duration, Instant};

/// How often the smoothed FPS is written to the debug log.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Frame timing with FPS calculation and optional frame limiting
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the FPS was logged
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        let now = Instant::now();
        Self {
            target_fps,
            min_frame_duration,
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Returns true if enough time has passed since the last frame to render
    /// another.
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.record(elapsed.as_secs_f32());

        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            self.last_report = now;
            log::debug!("{:.1} fps ({} frames)", self.smoothed_fps, self.frames);
        }
    }

    /// Restart the clock, e.g. after the frame loop was paused, so the
    /// pause is not averaged in as one very long frame.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    fn record(&mut self, frame_time: f32) {
        self.frames += 1;
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames rendered since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        assert!(FrameTiming::new(0).should_render());
    }

    #[test]
    fn fps_moves_toward_frame_rate() {
        let mut t = FrameTiming::new(0);
        for _ in 0..500 {
            t.record(1.0 / 30.0);
        }
        assert!((t.fps() - 30.0).abs() < 0.5);
        assert_eq!(t.frames(), 500);
    }

    #[test]
    fn zero_frame_time_is_counted_but_not_averaged() {
        let mut t = FrameTiming::new(0);
        t.record(0.0);
        assert_eq!(t.fps(), 60.0);
        assert_eq!(t.frames(), 1);
    }
}
