//! Parameter definitions with physical units and documented semantics.

use crate::error::{Result, VisualizerError};

/// FFT analysis configuration with frequency-to-bin mapping
#[derive(Debug, Clone, Copy)]
pub struct FftConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 1024,
        }
    }
}

impl FftConfig {
    /// Number of usable magnitude bins (positive frequencies only)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert frequency (Hz) to magnitude bin index, clamped to the valid
    /// bin range. `bin = hz * fft_size / sample_rate`.
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        let bin = (hz * self.fft_size as f32 / self.sample_rate_hz as f32) as usize;
        bin.min(self.bin_count() - 1)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() {
            return Err(VisualizerError::Config(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(VisualizerError::Config("sample rate must be > 0".into()));
        }
        Ok(())
    }
}

/// Output surface configuration
#[derive(Debug, Clone, Copy)]
pub struct SurfaceConfig {
    /// Surface width (pixels)
    pub width: u32,

    /// Surface height (pixels)
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VisualizerError::Config(format!(
                "surface dimensions must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Frame sequence output configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to render (seconds)
    pub duration_secs: f32,

    /// Output directory for frames
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "render".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to render
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Path for frame number `index`
    pub fn frame_path(&self, index: usize) -> String {
        format!("{}/frame_{:05}.png", self.frames_dir(), index)
    }
}
