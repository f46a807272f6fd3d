//! Spectrum frames and FFT analysis.
//!
//! A [`Spectrum`] is one frame of frequency magnitudes plus the configuration
//! that produced it; visual nodes query it by Hz range. [`FftProcessor`]
//! turns windowed time-domain samples into spectra, and [`SpectrumSource`]
//! is the per-frame polling boundary the engine drives.

pub mod live;
pub mod wav;

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::Result;
use crate::params::FftConfig;

/// Magnitude scaling so a full-scale sine lands near 128, the range of
/// 8-bit capture units. The quiet threshold (5.0) and beat peak (200.0)
/// constants are calibrated against this scale.
const MAGNITUDE_SCALE: f32 = 512.0;

/// One frame of frequency-magnitude data.
///
/// Magnitudes are non-negative, one per frequency bin, immutable for the
/// frame's duration. The length of a range query depends only on the
/// requested Hz range and the bin resolution, never on caller state.
#[derive(Debug, Clone)]
pub struct Spectrum {
    config: FftConfig,
    magnitudes: Vec<f32>,
}

impl Spectrum {
    /// Build a spectrum frame from raw magnitudes.
    ///
    /// `magnitudes` must hold one value per bin (`config.bin_count()`).
    /// Public so custom sources and tests can inject frames directly.
    pub fn new(config: FftConfig, magnitudes: Vec<f32>) -> Self {
        assert_eq!(
            magnitudes.len(),
            config.bin_count(),
            "magnitude count must match bin count"
        );
        Self { config, magnitudes }
    }

    /// An all-zero frame
    pub fn silent(config: FftConfig) -> Self {
        let bins = config.bin_count();
        Self::new(config, vec![0.0; bins])
    }

    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    /// Magnitudes for the requested frequency range (Hz)
    pub fn magnitudes_in_range(&self, start_hz: f32, end_hz: f32) -> &[f32] {
        let start = self.config.hz_to_bin(start_hz);
        let end = self.config.hz_to_bin(end_hz).max(start);
        &self.magnitudes[start..end]
    }

    /// Average magnitude over the requested frequency range (Hz)
    pub fn band_average(&self, start_hz: f32, end_hz: f32) -> f32 {
        let band = self.magnitudes_in_range(start_hz, end_hz);
        if band.is_empty() {
            return 0.0;
        }
        band.iter().sum::<f32>() / band.len() as f32
    }
}

/// A source of spectrum frames, polled once per rendered frame.
///
/// Implementations are expected to return immediately; the render loop never
/// blocks on them.
pub trait SpectrumSource {
    /// Produce the next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Option<Spectrum>;
}

/// Windowed forward FFT producing magnitude spectra in source units
pub struct FftProcessor {
    config: FftConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl FftProcessor {
    pub fn new(config: FftConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| hann_window(i, config.fft_size))
            .collect();

        Ok(Self {
            config,
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); config.fft_size],
        })
    }

    pub fn config(&self) -> &FftConfig {
        &self.config
    }

    /// Analyze one window of time-domain samples.
    ///
    /// Shorter inputs are zero-padded; extra samples are ignored.
    pub fn process(&mut self, samples: &[f32]) -> Spectrum {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = samples.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = MAGNITUDE_SCALE / self.config.fft_size as f32;
        let magnitudes = self.buffer[..self.config.bin_count()]
            .iter()
            .map(|c| c.norm() * scale)
            .collect();

        Spectrum::new(self.config, magnitudes)
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f32, config: &FftConfig) -> Vec<f32> {
        (0..config.fft_size)
            .map(|i| (2.0 * PI * freq_hz * i as f32 / config.sample_rate_hz as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_sine_peak_bin() {
        let config = FftConfig::default();
        let mut processor = FftProcessor::new(config).unwrap();

        let spectrum = processor.process(&sine(1000.0, &config));

        let peak = spectrum
            .magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();

        // Peak lands within one bin of the expected frequency
        let expected = config.hz_to_bin(1000.0);
        assert!(peak.abs_diff(expected) <= 1, "peak {peak} vs {expected}");
    }

    #[test]
    fn test_full_scale_sine_magnitude() {
        let config = FftConfig::default();
        let mut processor = FftProcessor::new(config).unwrap();

        let spectrum = processor.process(&sine(1000.0, &config));
        let peak = spectrum.magnitudes.iter().cloned().fold(0.0f32, f32::max);

        // Calibration: a full-scale sine should land in 8-bit capture range
        assert!(peak > 50.0 && peak < 256.0, "peak magnitude {peak}");
    }

    #[test]
    fn test_silence_produces_zero_magnitudes() {
        let config = FftConfig::default();
        let mut processor = FftProcessor::new(config).unwrap();

        let spectrum = processor.process(&vec![0.0; config.fft_size]);
        assert!(spectrum.magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_range_length_depends_only_on_range() {
        let config = FftConfig::default();

        let a = Spectrum::silent(config);
        let b = Spectrum::new(config, (0..config.bin_count()).map(|i| i as f32).collect());

        assert_eq!(
            a.magnitudes_in_range(0.0, 2000.0).len(),
            b.magnitudes_in_range(0.0, 2000.0).len()
        );
        assert_eq!(a.magnitudes_in_range(0.0, 2000.0).len(), 46);
    }

    #[test]
    fn test_band_average() {
        let config = FftConfig::default();
        let mut magnitudes = vec![0.0; config.bin_count()];
        for m in magnitudes.iter_mut().take(46) {
            *m = 10.0;
        }
        let spectrum = Spectrum::new(config, magnitudes);

        assert!((spectrum.band_average(0.0, 2000.0) - 10.0).abs() < 1e-6);
        assert_eq!(spectrum.band_average(4000.0, 4000.0), 0.0);
    }
}
