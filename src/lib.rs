//! Wavescope - audio-reactive 2D visualizer engine
//!
//! Conditions spectrum data (silence skip, smoothing, gravity damping),
//! interpolates sparse magnitudes into dense band curves, and renders a
//! composable tree of visual nodes onto a raster surface every frame.

pub mod canvas;
pub mod cli;
pub mod conditioner;
pub mod curve;
pub mod engine;
pub mod error;
pub mod node;
pub mod params;
pub mod preset;
pub mod spectrum;
