//! Full-surface gradient backdrop, the usual destination of a `Blend`.

use tiny_skia::Color;

use crate::canvas::{Canvas, FillKind, Style};
use crate::node::VisualNode;
use crate::spectrum::Spectrum;

/// Gradient layout presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientPreset {
    /// Horizontal band: color2 → color1 → color2 across the height
    #[default]
    LinearHorizontal,
    /// Left-to-right sweep from color2 to color1
    LinearVertical,
    /// Centered radial glow
    Radial,
}

/// Paints the whole surface with a two-color gradient; audio is ignored
pub struct Gradient {
    pub style: Style,
    pub preset: GradientPreset,
    pub color1: Color,
    pub color2: Color,
}

impl Gradient {
    pub fn new(preset: GradientPreset, color1: Color, color2: Color) -> Self {
        Self {
            style: Style::default(),
            preset,
            color1,
            color2,
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(
            GradientPreset::LinearHorizontal,
            Color::from_rgba8(255, 0, 0, 255),
            Color::from_rgba8(255, 255, 0, 255),
        )
    }
}

impl VisualNode for Gradient {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, _spectrum: &Spectrum) {}

    fn render(&mut self, canvas: &mut Canvas, _spectrum: &Spectrum) {
        let fill = match self.preset {
            GradientPreset::LinearHorizontal => FillKind::Linear {
                start: (0.0, 0.0),
                end: (0.0, 1.0),
                stops: vec![
                    (0.45, self.color2),
                    (0.5, self.color1),
                    (0.55, self.color2),
                ],
            },
            GradientPreset::LinearVertical => FillKind::Linear {
                start: (0.0, 0.0),
                end: (1.0, 0.0),
                stops: vec![(0.0, self.color2), (1.0, self.color1)],
            },
            GradientPreset::Radial => FillKind::Radial {
                center: (0.5, 0.5),
                radius: 0.5,
                stops: vec![
                    (0.2, self.color2),
                    (0.4, self.color1),
                    (0.6, self.color2),
                ],
            },
        };

        let style = Style {
            fill,
            stroke: None,
            blend: self.style.blend,
            anti_alias: self.style.anti_alias,
        };
        canvas.fill_surface(&style);
    }
}
