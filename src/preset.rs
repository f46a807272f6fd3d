//! Named visual presets: ready-made node trees.
//!
//! Switching presets means discarding the old tree and building a new one;
//! nodes are never reconfigured at runtime.

use tiny_skia::Color;

use crate::canvas::Style;
use crate::curve::Interpolation;
use crate::node::bars::{Bars, BarsConfig, Lines};
use crate::node::gradient::Gradient;
use crate::node::modifier::{BeatConfig, BeatScale, Blend, Compose, Move, Rotate};
use crate::node::radial::{CircleWave, CircleWaveRgb, RadialConfig, RadialLines};
use crate::node::wave::{Analog, Wave, WaveConfig, WaveRgb};
use crate::node::{Direction, VisualNode};

/// Build the node tree for a named preset. Unknown names fall back to
/// `bars` with a warning.
pub fn build(name: &str) -> Box<dyn VisualNode> {
    match name {
        "bars" => Box::new(Bars::default()),

        "bar-wave" => Box::new(Compose::new(vec![
            Box::new(Wave::new(
                Style::fill(Color::from_rgba8(255, 255, 255, 100)),
                WaveConfig {
                    interpolation: Interpolation::Spline,
                    direction: Direction::Both,
                    ..WaveConfig::default()
                },
            )),
            Box::new(Bars::new(
                Style::stroke(Color::WHITE, 2.0),
                BarsConfig {
                    direction: Direction::Both,
                    gap_px: 2.0,
                    ..BarsConfig::default()
                },
            )),
        ])),

        "analog" => Box::new(Analog::default()),

        "wave-rgb" => Box::new(WaveRgb::default()),

        "ring" => Box::new(Compose::new(vec![
            Box::new(Rotate::new(vec![Box::new(RadialLines::default())], 1.0)),
            Box::new(CircleWave::new(
                Style::stroke(Color::WHITE, 2.0),
                RadialConfig {
                    count: 128,
                    interpolation: Interpolation::Spline,
                    radius_frac: 0.38,
                    amp_scale: 0.4,
                    ..RadialConfig::default()
                },
            )),
        ])),

        "ring-rgb" => Box::new(Rotate::new(vec![Box::new(CircleWaveRgb::default())], 0.5)),

        "pulse" => Box::new(BeatScale::new(
            vec![
                Box::new(CircleWave::default()),
                Box::new(Rotate::new(
                    vec![Box::new(RadialLines::new(
                        Style::stroke(Color::WHITE, 2.0),
                        RadialConfig {
                            radius_frac: 0.45,
                            ..RadialConfig::default()
                        },
                    ))],
                    -1.0,
                )),
            ],
            BeatConfig::default(),
        )),

        "blend-bars" => Box::new(Blend::new(
            Box::new(Bars::new(
                Style::fill(Color::WHITE),
                BarsConfig {
                    direction: Direction::Both,
                    gap_px: 2.0,
                    ..BarsConfig::default()
                },
            )),
            Box::new(Gradient::default()),
        )),

        "mirror-lines" => Box::new(Move::new(
            vec![Box::new(Lines::new(
                Style::stroke(Color::WHITE, 2.0),
                BarsConfig {
                    count: 96,
                    mirror: true,
                    direction: Direction::Both,
                    ..BarsConfig::default()
                },
            ))],
            0.0,
            0.25,
        )),

        other => {
            tracing::warn!("unknown preset '{other}', using bars");
            Box::new(Bars::default())
        }
    }
}

/// Preset names accepted by [`build`]
pub const NAMES: &[&str] = &[
    "bars",
    "bar-wave",
    "analog",
    "wave-rgb",
    "ring",
    "ring-rgb",
    "pulse",
    "blend-bars",
    "mirror-lines",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::params::FftConfig;
    use crate::spectrum::Spectrum;

    #[test]
    fn test_every_preset_builds_and_renders() {
        let config = FftConfig::default();
        let magnitudes = (0..config.bin_count())
            .map(|i| if i < 40 { 30.0 } else { 0.0 })
            .collect();
        let spectrum = Spectrum::new(config, magnitudes);

        for name in NAMES {
            let mut canvas = Canvas::new(64, 64).unwrap();
            let mut node = build(name);
            node.prepare(&spectrum);
            node.render(&mut canvas, &spectrum);

            let painted = canvas
                .pixmap()
                .pixels()
                .iter()
                .filter(|p| p.alpha() > 0)
                .count();
            assert!(painted > 0, "preset '{name}' drew nothing");
        }
    }

    #[test]
    fn test_unknown_preset_falls_back() {
        // Must not panic; behaves like the default preset
        let _ = build("definitely-not-a-preset");
    }
}
