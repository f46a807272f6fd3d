//! Bar-family leaf renderers: filled/stroked bar sets and line sets.

use tiny_skia::{Color, PathBuilder};

use crate::canvas::{Canvas, Style};
use crate::conditioner::{is_quiet, SpectrumConditioner};
use crate::curve::{mirror, power_scale, BandCurve, Interpolation};
use crate::node::{with_direction_split, Direction, VisualNode};
use crate::spectrum::Spectrum;

/// Configuration shared by the bar-family renderers
#[derive(Debug, Clone)]
pub struct BarsConfig {
    /// Start of the analyzed frequency range (Hz)
    pub start_hz: f32,

    /// End of the analyzed frequency range (Hz)
    pub end_hz: f32,

    /// Number of bars/lines to draw
    pub count: usize,

    /// Interpolation across the damped bands
    pub interpolation: Interpolation,

    /// Which side of the baseline the bars grow toward
    pub direction: Direction,

    /// Mirror the magnitude array symmetrically
    pub mirror: bool,

    /// Apply quadratic peak emphasis before damping
    pub power: bool,

    /// Gap between bars (pixels); ignored by `Lines`
    pub gap_px: f32,

    /// Amplitude multiplier applied before damping
    pub amp_scale: f32,

    /// Exponential smoothing factor (0..1, higher = more responsive)
    pub smoothing: f32,
}

impl Default for BarsConfig {
    fn default() -> Self {
        Self {
            start_hz: 0.0,
            end_hz: 2000.0,
            count: 128,
            interpolation: Interpolation::Linear,
            direction: Direction::Out,
            mirror: false,
            power: false,
            gap_px: 0.0,
            amp_scale: 1.0,
            smoothing: 0.25,
        }
    }
}

/// Shared prepare pipeline for the linear-baseline renderers: range query,
/// silence skip, shaping, conditioning, curve fit.
struct BandPipeline {
    conditioner: SpectrumConditioner,
    scratch: Vec<f32>,
    curve: Option<BandCurve>,
    skip: bool,
}

impl BandPipeline {
    fn new(smoothing: f32) -> Self {
        Self {
            conditioner: SpectrumConditioner::new(smoothing),
            scratch: Vec::new(),
            curve: None,
            skip: true,
        }
    }

    fn prepare(&mut self, spectrum: &Spectrum, config: &BarsConfig) {
        let fft = spectrum.magnitudes_in_range(config.start_hz, config.end_hz);
        if is_quiet(fft) {
            self.skip = true;
            return;
        }
        self.skip = false;

        self.scratch.clear();
        self.scratch.extend_from_slice(fft);
        if config.power {
            power_scale(&mut self.scratch);
        }
        if config.mirror {
            self.scratch = mirror(&self.scratch, 1);
        }

        let heights = self.conditioner.condition(&self.scratch, config.amp_scale);
        self.curve = Some(BandCurve::fit(heights, config.count, config.interpolation));
    }
}

/// Vertical bar set, one bar per visual band
pub struct Bars {
    pub style: Style,
    config: BarsConfig,
    pipeline: BandPipeline,
}

impl Bars {
    pub fn new(style: Style, config: BarsConfig) -> Self {
        assert!(config.count > 0, "bar count must be nonzero");
        let pipeline = BandPipeline::new(config.smoothing);
        Self {
            style,
            config,
            pipeline,
        }
    }
}

impl Default for Bars {
    fn default() -> Self {
        Self::new(Style::stroke(Color::WHITE, 2.0), BarsConfig::default())
    }
}

impl VisualNode for Bars {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.pipeline.prepare(spectrum, &self.config);
    }

    fn render(&mut self, canvas: &mut Canvas, _spectrum: &Spectrum) {
        if self.pipeline.skip {
            return;
        }
        let Some(curve) = self.pipeline.curve.as_ref() else {
            return;
        };
        let style = &self.style;
        let config = &self.config;

        let count = config.count;
        let width = canvas.width();
        let bar_width = (width - (count + 1) as f32 * config.gap_px) / count as f32;

        with_direction_split(
            canvas,
            config.direction,
            0.0,
            0.5,
            |c| {
                let mut pb = PathBuilder::new();
                for i in 0..count {
                    let x0 = bar_width * i as f32 + config.gap_px * (i + 1) as f32;
                    let y = curve.sample(i as f32);
                    pb.move_to(x0, -y);
                    pb.line_to(x0 + bar_width, -y);
                    pb.line_to(x0 + bar_width, 0.0);
                    pb.line_to(x0, 0.0);
                    pb.close();
                }
                if let Some(path) = pb.finish() {
                    c.draw_path(&path, style);
                }
            },
            |c| {
                let mut pb = PathBuilder::new();
                for i in 0..count {
                    let x0 = bar_width * i as f32 + config.gap_px * (i + 1) as f32;
                    let y = curve.sample(i as f32);
                    pb.move_to(x0, -y);
                    pb.line_to(x0 + bar_width, -y);
                    pb.line_to(x0 + bar_width, y);
                    pb.line_to(x0, y);
                    pb.close();
                }
                if let Some(path) = pb.finish() {
                    c.draw_path(&path, style);
                }
            },
        );
    }
}

/// Vertical line set, one stroked segment per visual band
pub struct Lines {
    pub style: Style,
    config: BarsConfig,
    pipeline: BandPipeline,
}

impl Lines {
    pub fn new(style: Style, config: BarsConfig) -> Self {
        assert!(config.count > 0, "line count must be nonzero");
        let pipeline = BandPipeline::new(config.smoothing);
        Self {
            style,
            config,
            pipeline,
        }
    }
}

impl Default for Lines {
    fn default() -> Self {
        Self::new(Style::stroke(Color::WHITE, 2.0), BarsConfig::default())
    }
}

impl VisualNode for Lines {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.pipeline.prepare(spectrum, &self.config);
    }

    fn render(&mut self, canvas: &mut Canvas, _spectrum: &Spectrum) {
        if self.pipeline.skip {
            return;
        }
        let Some(curve) = self.pipeline.curve.as_ref() else {
            return;
        };
        let style = &self.style;
        let config = &self.config;

        let count = config.count;
        let gap_width = canvas.width() / count as f32;

        with_direction_split(
            canvas,
            config.direction,
            0.0,
            0.5,
            |c| {
                let mut pb = PathBuilder::new();
                for i in 0..count {
                    let x = gap_width * (i as f32 + 0.5);
                    pb.move_to(x, -curve.sample(i as f32));
                    pb.line_to(x, 0.0);
                }
                if let Some(path) = pb.finish() {
                    c.draw_path(&path, style);
                }
            },
            |c| {
                let mut pb = PathBuilder::new();
                for i in 0..count {
                    let x = gap_width * (i as f32 + 0.5);
                    let y = curve.sample(i as f32);
                    pb.move_to(x, -y);
                    pb.line_to(x, y);
                }
                if let Some(path) = pb.finish() {
                    c.draw_path(&path, style);
                }
            },
        );
    }
}
