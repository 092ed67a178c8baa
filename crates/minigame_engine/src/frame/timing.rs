//! Frame timing state

/// Seconds of frame time accumulated before an FPS sample is taken
const FPS_SAMPLE_WINDOW: f32 = 0.5;

/// Per-frame timing state owned exclusively by the scheduler
///
/// Reset whenever the loop is (re)started; consumed but not reset across
/// pause/resume (resume only re-baselines the last timestamp).
#[derive(Debug, Clone)]
pub struct FrameTiming {
    last_timestamp_ms: f64,
    delta: f32,
    max_delta: f32,
    frame_count: u64,
    fps: f32,
    window_frames: u32,
    window_elapsed: f32,
}

impl FrameTiming {
    /// Creates timing state with the given delta ceiling in seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_timestamp_ms: 0.0,
            delta: 0.0,
            max_delta,
            frame_count: 0,
            fps: 0.0,
            window_frames: 0,
            window_elapsed: 0.0,
        }
    }

    /// Resets all timing state against a fresh baseline timestamp
    pub fn reset(&mut self, now_ms: f64) {
        self.last_timestamp_ms = now_ms;
        self.delta = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.window_frames = 0;
        self.window_elapsed = 0.0;
    }

    /// Moves the baseline without touching deltas or counters
    ///
    /// Used on resume so the paused interval never shows up as a spike.
    pub fn rebaseline(&mut self, now_ms: f64) {
        self.last_timestamp_ms = now_ms;
    }

    /// Advances to `timestamp_ms` and returns the clamped delta in seconds
    ///
    /// The raw delta is `(timestamp - last) / 1000`, clamped to
    /// `[0, max_delta]`.
    pub fn advance(&mut self, timestamp_ms: f64) -> f32 {
        let raw = ((timestamp_ms - self.last_timestamp_ms) / 1000.0) as f32;
        let clamped = raw.clamp(0.0, self.max_delta);
        self.last_timestamp_ms = timestamp_ms;
        self.delta = clamped;
        self.frame_count += 1;
        self.window_frames += 1;
        self.window_elapsed += clamped;
        clamped
    }

    /// Takes an FPS sample if a full window of frames has accumulated
    ///
    /// The sample is smoothed over the rolling window rather than derived
    /// from a single frame's delta.
    pub fn take_fps_sample(&mut self) -> Option<f32> {
        if self.window_elapsed < FPS_SAMPLE_WINDOW {
            return None;
        }
        self.fps = self.window_frames as f32 / self.window_elapsed;
        self.window_frames = 0;
        self.window_elapsed = 0.0;
        Some(self.fps)
    }

    /// The most recent clamped delta in seconds
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// The configured delta ceiling in seconds
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Timestamp of the last advanced tick in milliseconds
    pub fn last_timestamp_ms(&self) -> f64 {
        self.last_timestamp_ms
    }

    /// Frames advanced since the last reset
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The most recent sampled frames-per-second value
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_advance_computes_seconds() {
        let mut timing = FrameTiming::new(0.1);
        timing.reset(1000.0);
        let delta = timing.advance(1016.0);
        assert_relative_eq!(delta, 0.016);
        assert_eq!(timing.frame_count(), 1);
    }

    #[test]
    fn test_advance_clamps_to_ceiling() {
        let mut timing = FrameTiming::new(0.05);
        timing.reset(0.0);
        let delta = timing.advance(200.0);
        assert_relative_eq!(delta, 0.05);
    }

    #[test]
    fn test_advance_clamps_negative_to_zero() {
        let mut timing = FrameTiming::new(0.1);
        timing.reset(1000.0);
        let delta = timing.advance(900.0);
        assert_relative_eq!(delta, 0.0);
    }

    #[test]
    fn test_rebaseline_swallows_gap() {
        let mut timing = FrameTiming::new(0.1);
        timing.reset(0.0);
        timing.advance(16.0);
        timing.rebaseline(5000.0);
        let delta = timing.advance(5016.0);
        assert_relative_eq!(delta, 0.016);
        // Rebaseline does not reset the counters
        assert_eq!(timing.frame_count(), 2);
    }

    #[test]
    fn test_fps_sampled_over_window() {
        let mut timing = FrameTiming::new(0.1);
        timing.reset(0.0);
        let mut sample = None;
        for i in 1..=6 {
            timing.advance(f64::from(i) * 100.0);
            if let Some(fps) = timing.take_fps_sample() {
                sample = Some(fps);
            }
        }
        // 100ms frames close the half-second window at 10 fps
        let fps = sample.expect("window should have closed");
        assert_relative_eq!(fps, 10.0, epsilon = 1e-4);
        assert_relative_eq!(timing.fps(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut timing = FrameTiming::new(0.1);
        timing.reset(0.0);
        timing.advance(16.0);
        timing.reset(100.0);
        assert_eq!(timing.frame_count(), 0);
        assert_relative_eq!(timing.delta(), 0.0);
    }
}
