//! Spectrum conditioning: silence skip, exponential smoothing, gravity
//! damping.
//!
//! Each leaf renderer owns one [`SpectrumConditioner`] for its configured
//! frequency range. State persists across frames per band index and is
//! discarded wholesale when the incoming array length changes.

/// Magnitudes at or below this level (source units) count as silence
pub const QUIET_THRESHOLD: f32 = 5.0;

/// True when no magnitude exceeds the quiet threshold; renderers skip the
/// whole frame in that case.
pub fn is_quiet(magnitudes: &[f32]) -> bool {
    !magnitudes.iter().any(|&m| m > QUIET_THRESHOLD)
}

/// Kinematic damping for one band: a new peak is taken instantly, then the
/// value falls back under constant per-tick acceleration.
///
/// The acceleration is applied per frame, not per unit of wall-clock time,
/// so decay speed follows the tick rate. That is the intended behavior;
/// time-correcting it changes the visuals.
#[derive(Debug, Clone)]
pub struct GravityModel {
    /// Current damped height, never negative
    pub height: f32,
    /// Fall velocity, reset to zero on a new peak or when bottoming out
    dy: f32,
    /// Fall acceleration per tick
    ay: f32,
}

impl GravityModel {
    pub fn new(height: f32) -> Self {
        Self::with_acceleration(height, 2.0)
    }

    pub fn with_acceleration(height: f32, ay: f32) -> Self {
        Self { height, dy: 0.0, ay }
    }

    /// Feed the next raw value for this band
    pub fn update(&mut self, h: f32) {
        if h > self.height {
            // New peak is adopted immediately
            self.height = h;
            self.dy = 0.0;
        }
        self.height -= self.dy;
        self.dy += self.ay;

        if self.height < 0.0 {
            self.height = 0.0;
            self.dy = 0.0;
        }
    }
}

/// Exponential smoothing over a magnitude array.
///
/// `out[i] = alpha * raw[i] + (1 - alpha) * prev[i]`. The first call, and
/// any call after the array length changes, copies the input unchanged.
#[derive(Debug, Clone)]
pub struct Smoother {
    alpha: f32,
    smoothed: Vec<f32>,
}

impl Smoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            smoothed: Vec::new(),
        }
    }

    pub fn apply(&mut self, raw: &[f32]) -> &[f32] {
        if self.smoothed.len() != raw.len() {
            self.smoothed.clear();
            self.smoothed.extend_from_slice(raw);
        } else {
            for (prev, &r) in self.smoothed.iter_mut().zip(raw) {
                *prev = self.alpha * r + (1.0 - self.alpha) * *prev;
            }
        }
        &self.smoothed
    }
}

/// Full conditioning pipeline for one renderer: smoothing followed by
/// per-band gravity damping, with reset-on-shape-change band state and a
/// height buffer reused across frames.
pub struct SpectrumConditioner {
    smoother: Smoother,
    bands: Vec<GravityModel>,
    heights: Vec<f32>,
}

impl SpectrumConditioner {
    pub fn new(alpha: f32) -> Self {
        Self {
            smoother: Smoother::new(alpha),
            bands: Vec::new(),
            heights: Vec::new(),
        }
    }

    /// Condition one frame of (already shaped) magnitudes, scaled by `amp`.
    /// Returns the damped heights, one per input element.
    pub fn condition(&mut self, values: &[f32], amp: f32) -> &[f32] {
        let smoothed = self.smoother.apply(values);

        if self.bands.len() != smoothed.len() {
            // Shape change: discard all fall state
            self.bands = smoothed.iter().map(|_| GravityModel::new(0.0)).collect();
        }
        for (band, &v) in self.bands.iter_mut().zip(smoothed) {
            band.update(v * amp);
        }

        self.heights.clear();
        self.heights.extend(self.bands.iter().map(|b| b.height));
        &self.heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_detection() {
        assert!(is_quiet(&[0.0, 0.0, 0.0, 0.0, 0.0]));
        assert!(is_quiet(&[4.9, 1.0, 3.0]));
        assert!(is_quiet(&[]));

        // A single loud element keeps the frame live
        assert!(!is_quiet(&[0.0, 0.0, 5.1, 0.0]));
        assert!(!is_quiet(&[10.0, 0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_gravity_spike_then_settle() {
        let mut band = GravityModel::new(0.0);

        // Spike to 10, then silence: decays 10, 8, 4, 0 with ay = 2
        band.update(10.0);
        assert_eq!(band.height, 10.0);
        band.update(0.0);
        assert_eq!(band.height, 8.0);
        band.update(0.0);
        assert_eq!(band.height, 4.0);
        band.update(0.0);
        assert_eq!(band.height, 0.0);
    }

    #[test]
    fn test_gravity_never_negative() {
        let mut band = GravityModel::new(0.0);
        band.update(3.0);
        for _ in 0..50 {
            band.update(0.0);
            assert!(band.height >= 0.0);
        }
        assert_eq!(band.height, 0.0);
    }

    #[test]
    fn test_gravity_velocity_resets_on_new_peak() {
        let mut band = GravityModel::new(0.0);
        band.update(10.0);
        band.update(0.0);
        band.update(0.0);
        assert_eq!(band.height, 4.0);

        // New peak adopts the value and restarts the fall from rest
        band.update(20.0);
        assert_eq!(band.height, 20.0);
        band.update(0.0);
        assert_eq!(band.height, 18.0);
    }

    #[test]
    fn test_gravity_velocity_resets_at_floor() {
        let mut band = GravityModel::new(0.0);
        band.update(5.0);
        while band.height > 0.0 {
            band.update(0.0);
        }

        // After bottoming out a small peak must not be swallowed by stale dy
        band.update(3.0);
        assert_eq!(band.height, 3.0);
    }

    #[test]
    fn test_smoother_first_call_copies() {
        let mut smoother = Smoother::new(0.25);
        assert_eq!(smoother.apply(&[1.0, 2.0, 3.0]), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_smoother_converges_monotonically() {
        let mut smoother = Smoother::new(0.25);
        smoother.apply(&[0.0, 0.0]);

        let raw = [10.0, 10.0];
        let mut previous = 0.0;
        let mut previous_gap = f32::MAX;
        for _ in 0..20 {
            let out = smoother.apply(&raw)[0];
            let gap = 10.0 - out;
            assert!(out > previous, "must approach the input");
            assert!(gap < previous_gap, "gap must shrink");
            assert!(out <= 10.0);
            previous = out;
            previous_gap = gap;
        }
    }

    #[test]
    fn test_smoother_resets_on_length_change() {
        let mut smoother = Smoother::new(0.25);
        smoother.apply(&[1.0, 1.0, 1.0]);
        assert_eq!(smoother.apply(&[5.0, 5.0]), &[5.0, 5.0]);
    }

    #[test]
    fn test_conditioner_reset_on_shape_change() {
        let mut conditioner = SpectrumConditioner::new(1.0);

        let heights = conditioner.condition(&[10.0, 10.0, 10.0], 1.0);
        assert_eq!(heights, &[10.0, 10.0, 10.0]);

        // Length change discards fall state and starts over
        let heights = conditioner.condition(&[4.0, 4.0], 1.0);
        assert_eq!(heights, &[4.0, 4.0]);
    }

    #[test]
    fn test_conditioner_applies_amplitude() {
        let mut conditioner = SpectrumConditioner::new(1.0);
        let heights = conditioner.condition(&[10.0], 0.5);
        assert_eq!(heights, &[5.0]);
    }
}
