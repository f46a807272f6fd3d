//! Error types for configuration, audio input and frame output.

use thiserror::Error;

/// Errors surfaced during setup and I/O. The per-frame render path is
/// infallible; silence skipping and band-array reshaping are designed
/// behavior, not errors.
#[derive(Debug, Error)]
pub enum VisualizerError {
    /// Invalid configuration (FFT size, surface dimensions, frequency range)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Audio device related errors
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// Audio stream related errors
    #[error("audio stream error: {0}")]
    AudioStream(String),

    /// WAV decode errors
    #[error("wav decode error: {0}")]
    Wav(#[from] hound::Error),

    /// PNG frame encoding errors
    #[error("png encode error: {0}")]
    Png(String),

    /// General I/O errors
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::DefaultStreamConfigError> for VisualizerError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        VisualizerError::AudioDevice(format!("failed to get default stream config: {err}"))
    }
}

impl From<cpal::BuildStreamError> for VisualizerError {
    fn from(err: cpal::BuildStreamError) -> Self {
        VisualizerError::AudioStream(format!("failed to build audio stream: {err}"))
    }
}

impl From<cpal::PlayStreamError> for VisualizerError {
    fn from(err: cpal::PlayStreamError) -> Self {
        VisualizerError::AudioStream(format!("failed to start audio stream: {err}"))
    }
}

/// Result type alias for visualizer operations
pub type Result<T> = std::result::Result<T, VisualizerError>;
