//! Live spectrum source capturing the default audio input device.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::error::{Result, VisualizerError};
use crate::params::FftConfig;
use crate::spectrum::{FftProcessor, Spectrum, SpectrumSource};

/// Live capture from the default input device.
///
/// The audio callback appends mono-mixed samples into a shared ring buffer;
/// each `next_frame` snapshots the most recent FFT window. The capture
/// stream lives exactly as long as this source and is released on drop.
pub struct LiveInput {
    processor: FftProcessor,
    shared: Arc<Mutex<Vec<f32>>>,
    snapshot: Vec<f32>,

    /// Capture stream (kept alive)
    _stream: cpal::Stream,
}

impl LiveInput {
    /// Acquire the default input device and start capturing
    pub fn open(fft_size: usize) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| VisualizerError::AudioDevice("no input device found".into()))?;

        let device_config = device.default_input_config()?;
        let sample_rate = device_config.sample_rate().0 as usize;
        let channels = device_config.channels() as usize;

        println!(
            "Audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate
        );

        let config = FftConfig {
            sample_rate_hz: sample_rate,
            fft_size,
        };
        let processor = FftProcessor::new(config)?;

        let shared = Arc::new(Mutex::new(Vec::<f32>::new()));
        let shared_capture = Arc::clone(&shared);
        // Keep a few windows of history; drop the oldest beyond that
        let capacity = fft_size * 4;

        let stream = device.build_input_stream(
            &device_config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buf = shared_capture.lock().unwrap();
                for frame in data.chunks(channels) {
                    buf.push(frame.iter().sum::<f32>() / channels as f32);
                }
                let len = buf.len();
                if len > capacity {
                    buf.drain(0..len - capacity);
                }
            },
            |err| tracing::warn!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            processor,
            shared,
            snapshot: vec![0.0; fft_size],
            _stream: stream,
        })
    }

    pub fn config(&self) -> &FftConfig {
        self.processor.config()
    }
}

impl SpectrumSource for LiveInput {
    fn next_frame(&mut self) -> Option<Spectrum> {
        let fft_size = self.processor.config().fft_size;
        {
            let buf = self.shared.lock().unwrap();
            let available = buf.len().min(fft_size);
            let pad = fft_size - available;

            self.snapshot[..pad].fill(0.0);
            self.snapshot[pad..].copy_from_slice(&buf[buf.len() - available..]);
        }

        Some(self.processor.process(&self.snapshot))
    }
}
