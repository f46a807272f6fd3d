//! Band interpolation: fits sparse damped heights to a continuous curve
//! sampleable at any visual resolution, plus the array shaping transforms
//! (circular padding, mirroring, peak emphasis) renderers apply first.

use splines::{Key, Spline};

/// Interpolation mode for the fitted band curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Piecewise linear through the samples
    #[default]
    Linear,
    /// Catmull-Rom spline, continuous first derivative
    Spline,
    /// Accepted but renders through the linear path; visual tuning depends
    /// on the fallback, so do not substitute a real logarithmic curve.
    Logarithmic,
}

impl Interpolation {
    fn key_interpolation(self) -> splines::Interpolation<f32, f32> {
        match self {
            Interpolation::Spline => splines::Interpolation::CatmullRom,
            Interpolation::Linear | Interpolation::Logarithmic => splines::Interpolation::Linear,
        }
    }
}

/// A continuous curve over `[0, slices]` fitted through damped band heights.
/// Built fresh each frame and discarded afterwards.
pub struct BandCurve {
    spline: Spline<f32, f32>,
}

impl BandCurve {
    /// Fit `heights` so sample `i` lands at `x = i * slices / (N - 1)`.
    ///
    /// Callers must provide at least two samples; frequency ranges are
    /// non-empty by construction so this holds for every renderer.
    pub fn fit(heights: &[f32], slices: usize, mode: Interpolation) -> Self {
        debug_assert!(heights.len() >= 2, "interpolation needs at least 2 samples");
        let step = slices as f32 / (heights.len() - 1) as f32;
        Self::build(heights, step, |i| i as f32 * step, mode)
    }

    /// Fit an array padded by [`circle_pad`] so the curve closes seamlessly
    /// at the domain wrap point: sample `i` lands at
    /// `x = (i - 1) * slices / (N - 3)`.
    pub fn fit_circular(heights: &[f32], slices: usize, mode: Interpolation) -> Self {
        debug_assert!(heights.len() >= 4, "circular fit needs a padded array");
        let step = slices as f32 / (heights.len() - 3) as f32;
        Self::build(heights, step, |i| (i as f32 - 1.0) * step, mode)
    }

    fn build(heights: &[f32], step: f32, x_of: impl Fn(usize) -> f32, mode: Interpolation) -> Self {
        let interpolation = mode.key_interpolation();
        let n = heights.len();
        let first_x = x_of(0);
        let last_x = x_of(n - 1);

        // Phantom end keys replicate the boundary values so the Catmull-Rom
        // segments at both edges have their neighbor knots, and out-of-domain
        // queries clamp flat.
        let mut keys = Vec::with_capacity(n + 4);
        keys.push(Key::new(first_x - 2.0 * step, heights[0], interpolation));
        keys.push(Key::new(first_x - step, heights[0], interpolation));
        for (i, &h) in heights.iter().enumerate() {
            keys.push(Key::new(x_of(i), h, interpolation));
        }
        keys.push(Key::new(last_x + step, heights[n - 1], interpolation));
        keys.push(Key::new(last_x + 2.0 * step, heights[n - 1], interpolation));

        Self {
            spline: Spline::from_vec(keys),
        }
    }

    /// Sample the curve; never fails, out-of-range positions clamp to the
    /// boundary value.
    pub fn sample(&self, x: f32) -> f32 {
        self.spline.clamped_sample(x).unwrap_or(0.0)
    }
}

/// Pad a magnitude array so a circular fit closes seamlessly:
/// `[a0 .. a(n-1)]` becomes `[a(n-2), a0, .., a(n-1), a0, a1]`.
pub fn circle_pad(fft: &[f32]) -> Vec<f32> {
    debug_assert!(fft.len() >= 2, "circular padding needs at least 2 samples");
    let n = fft.len();
    let mut padded = Vec::with_capacity(n + 3);
    padded.push(fft[n - 2]);
    padded.extend_from_slice(fft);
    padded.push(fft[0]);
    padded.push(fft[1]);
    padded
}

/// Mirror a magnitude array for symmetric visualizations.
///
/// Modes: 0 identity; 1 reversed copy then the input; 2 the input then a
/// reversed copy; 3 and 4 the same over the front half only.
pub fn mirror(fft: &[f32], mode: u8) -> Vec<f32> {
    let half = fft.len().saturating_sub(1) / 2 + 1;
    match mode {
        1 => {
            let mut out: Vec<f32> = fft.iter().rev().copied().collect();
            out.extend_from_slice(fft);
            out
        }
        2 => {
            let mut out = fft.to_vec();
            out.extend(fft.iter().rev());
            out
        }
        3 => {
            let mut out: Vec<f32> = fft[..half].iter().rev().copied().collect();
            out.extend_from_slice(&fft[..half]);
            out
        }
        4 => {
            let mut out = fft[..half].to_vec();
            out.extend(fft[..half].iter().rev());
            out
        }
        _ => fft.to_vec(),
    }
}

/// Amplify peaks while suppressing low values: `v -> v * v / 100`
pub fn power_scale(fft: &mut [f32]) {
    const PARAM: f32 = 100.0;
    for v in fft {
        *v = *v * *v / PARAM;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_round_trip_at_knots() {
        let heights = [3.0, 7.0, 1.0, 9.0];
        let slices = 120;
        let curve = BandCurve::fit(&heights, slices, Interpolation::Linear);

        for (i, &h) in heights.iter().enumerate() {
            let x = i as f32 * slices as f32 / (heights.len() - 1) as f32;
            assert!(
                (curve.sample(x) - h).abs() < 1e-3,
                "knot {i}: {} vs {h}",
                curve.sample(x)
            );
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let curve = BandCurve::fit(&[0.0, 10.0], 10, Interpolation::Linear);
        assert!((curve.sample(5.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_logarithmic_falls_back_to_linear() {
        let heights = [2.0, 8.0, 4.0];
        let a = BandCurve::fit(&heights, 60, Interpolation::Linear);
        let b = BandCurve::fit(&heights, 60, Interpolation::Logarithmic);

        for i in 0..=60 {
            let x = i as f32;
            assert_eq!(a.sample(x), b.sample(x));
        }
    }

    #[test]
    fn test_spline_hits_knots_and_never_panics() {
        let heights = [3.0, 7.0, 1.0, 9.0, 5.0];
        let slices = 100;
        let curve = BandCurve::fit(&heights, slices, Interpolation::Spline);

        for (i, &h) in heights.iter().enumerate() {
            let x = i as f32 * slices as f32 / (heights.len() - 1) as f32;
            assert!((curve.sample(x) - h).abs() < 1e-2);
        }

        // Out-of-range queries clamp instead of failing
        assert!((curve.sample(-50.0) - heights[0]).abs() < 1e-2);
        assert!((curve.sample(500.0) - heights[4]).abs() < 1e-2);
    }

    #[test]
    fn test_circle_pad() {
        let padded = circle_pad(&[3.0, 5.0, 2.0, 8.0]);
        assert_eq!(padded, vec![2.0, 3.0, 5.0, 2.0, 8.0, 3.0, 5.0]);
    }

    #[test]
    fn test_circular_fit_closes() {
        let padded = circle_pad(&[3.0, 5.0, 2.0, 8.0]);
        let slices = 64;
        let curve = BandCurve::fit_circular(&padded, slices, Interpolation::Linear);

        // x = 0 is the first raw sample; x = slices wraps back to it
        assert!((curve.sample(0.0) - 3.0).abs() < 1e-3);
        assert!((curve.sample(slices as f32) - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_mirror_modes() {
        let fft = [1.0, 2.0, 3.0];
        assert_eq!(mirror(&fft, 1), vec![3.0, 2.0, 1.0, 1.0, 2.0, 3.0]);
        assert_eq!(mirror(&fft, 2), vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0]);
        assert_eq!(mirror(&fft, 3), vec![2.0, 1.0, 1.0, 2.0]);
        assert_eq!(mirror(&fft, 4), vec![1.0, 2.0, 2.0, 1.0]);
        assert_eq!(mirror(&fft, 0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_power_scale() {
        let mut fft = [10.0, 100.0, 0.0];
        power_scale(&mut fft);
        assert_eq!(fft, [1.0, 100.0, 0.0]);
    }
}
