//! Offline spectrum source backed by a WAV file.

use std::path::Path;

use crate::error::Result;
use crate::params::FftConfig;
use crate::spectrum::{FftProcessor, Spectrum, SpectrumSource};

/// Plays a decoded WAV file through the FFT, one spectrum frame per
/// `sample_rate / fps` samples.
///
/// Channels are mixed down to mono; integer and float sample formats are
/// both accepted. The FFT window covers the most recent `fft_size` samples,
/// zero-padded near the start of the file.
pub struct WavPlayback {
    processor: FftProcessor,
    samples: Vec<f32>,
    cursor: usize,
    step: usize,
}

impl WavPlayback {
    /// Open a WAV file for frame-by-frame analysis at the given frame rate.
    /// The file's sample rate overrides the default FFT configuration.
    pub fn open(path: impl AsRef<Path>, fft_size: usize, fps: u32) -> Result<Self> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<std::result::Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let channels = spec.channels as usize;
        let samples: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        let config = FftConfig {
            sample_rate_hz: spec.sample_rate as usize,
            fft_size,
        };
        let processor = FftProcessor::new(config)?;
        let step = (config.sample_rate_hz / fps.max(1) as usize).max(1);

        tracing::info!(
            sample_rate = config.sample_rate_hz,
            samples = samples.len(),
            "loaded wav input"
        );

        Ok(Self {
            processor,
            samples,
            cursor: 0,
            step,
        })
    }

    /// Length of the decoded audio in seconds
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.processor.config().sample_rate_hz as f32
    }
}

impl SpectrumSource for WavPlayback {
    fn next_frame(&mut self) -> Option<Spectrum> {
        if self.cursor >= self.samples.len() {
            return None;
        }

        self.cursor = (self.cursor + self.step).min(self.samples.len());
        let fft_size = self.processor.config().fft_size;
        let start = self.cursor.saturating_sub(fft_size);

        Some(self.processor.process(&self.samples[start..self.cursor]))
    }
}
