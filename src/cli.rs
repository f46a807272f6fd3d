//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{RecordingConfig, SurfaceConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Wavescope")]
#[command(about = "Audio-reactive visualizer rendering PNG frame sequences", long_about = None)]
pub struct Args {
    /// Input WAV file to visualize
    #[arg(long, value_name = "FILE", required_unless_present = "live")]
    pub input: Option<PathBuf>,

    /// Capture the default audio input device instead of reading a file
    #[arg(long)]
    pub live: bool,

    /// Visual preset: bars, bar-wave, analog, wave-rgb, ring, ring-rgb,
    /// pulse, blend-bars, mirror-lines
    #[arg(long, value_name = "NAME", default_value = "bars")]
    pub preset: String,

    /// Duration to render in seconds (defaults to the input length)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Output frame rate
    #[arg(long, value_name = "FPS", default_value = "60")]
    pub fps: u32,

    /// Surface width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Output directory for rendered frames
    #[arg(long, value_name = "DIR", default_value = "render")]
    pub out: String,
}

impl Args {
    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            width: self.width,
            height: self.height,
        }
    }

    /// Recording configuration; `fallback_duration` fills in when no
    /// explicit duration was given (the input length, or a default for
    /// live capture).
    pub fn recording_config(&self, fallback_duration: f32) -> RecordingConfig {
        RecordingConfig {
            duration_secs: self.duration.unwrap_or(fallback_duration),
            output_dir: self.out.clone(),
            fps: self.fps,
        }
    }
}
