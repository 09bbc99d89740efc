/// Tracks frame-to-frame deltas for the variable-rate physics step.
///
/// Produces the frame delta together with the pacing correction ratio
/// `delta / previous_delta`. The first frame is its own predecessor.
#[derive(Debug, Clone, Default)]
pub struct FramePacer {
    previous_ms: Option<f32>,
}

impl FramePacer {
    pub fn new() -> Self {
        Self { previous_ms: None }
    }

    /// Record a frame of `delta_ms` and return `(delta_ms, correction)`.
    pub fn advance(&mut self, delta_ms: f32) -> (f32, f32) {
        let delta_ms = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let previous = self.previous_ms.unwrap_or(delta_ms);
        let correction = if previous > 0.0 && delta_ms > 0.0 {
            delta_ms / previous
        } else {
            1.0
        };
        // Zero-length frames keep the last real delta as the reference.
        if delta_ms > 0.0 {
            self.previous_ms = Some(delta_ms);
        }
        (delta_ms, correction)
    }

    /// The delta of the last non-empty frame.
    pub fn previous_ms(&self) -> Option<f32> {
        self.previous_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_unit_ratio() {
        let mut pacer = FramePacer::new();
        let (delta, ratio) = pacer.advance(16.0);
        assert_eq!(delta, 16.0);
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn ratio_compares_to_previous_frame() {
        let mut pacer = FramePacer::new();
        pacer.advance(16.0);
        let (_, ratio) = pacer.advance(32.0);
        assert!((ratio - 2.0).abs() < 0.0001);
        let (_, ratio) = pacer.advance(16.0);
        assert!((ratio - 0.5).abs() < 0.0001);
    }

    #[test]
    fn empty_and_invalid_frames_do_not_poison_history() {
        let mut pacer = FramePacer::new();
        pacer.advance(20.0);
        assert_eq!(pacer.advance(0.0), (0.0, 1.0));
        assert_eq!(pacer.advance(f32::NAN), (0.0, 1.0));
        assert_eq!(pacer.advance(-5.0), (0.0, 1.0));
        assert_eq!(pacer.previous_ms(), Some(20.0));
        let (_, ratio) = pacer.advance(10.0);
        assert!((ratio - 0.5).abs() < 0.0001);
    }
}
