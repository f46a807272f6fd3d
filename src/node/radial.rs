//! Ring-family leaf renderers: radial bars, radial spokes, closed circular
//! silhouettes and the rotated RGB triple.
//!
//! All of these draw around a base ring whose radius is a fraction of the
//! shorter surface side. The magnitude array is circularly padded so the
//! fitted curve closes seamlessly at the wrap point.

use std::f32::consts::PI;

use tiny_skia::{BlendMode, Color, FillRule, PathBuilder};

use crate::canvas::{Canvas, Style};
use crate::conditioner::{is_quiet, SpectrumConditioner};
use crate::curve::{circle_pad, mirror, power_scale, BandCurve, Interpolation};
use crate::node::{polar, with_direction_each, Direction, VisualNode};
use crate::spectrum::Spectrum;

/// Configuration shared by the ring-family renderers
#[derive(Debug, Clone)]
pub struct RadialConfig {
    /// Start of the analyzed frequency range (Hz)
    pub start_hz: f32,

    /// End of the analyzed frequency range (Hz)
    pub end_hz: f32,

    /// Number of bars/spokes/points around the ring
    pub count: usize,

    /// Interpolation across the damped bands
    pub interpolation: Interpolation,

    /// Outward, inward, or mirrored growth from the base ring
    pub direction: Direction,

    /// Mirror the magnitude array instead of circular padding
    pub mirror: bool,

    /// Apply quadratic peak emphasis before damping
    pub power: bool,

    /// Base ring radius as a fraction of the shorter surface side
    pub radius_frac: f32,

    /// Gap between radial bars (pixels of arc length)
    pub gap_px: f32,

    /// Amplitude multiplier applied before damping
    pub amp_scale: f32,

    /// Exponential smoothing factor (0..1)
    pub smoothing: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            start_hz: 0.0,
            end_hz: 2000.0,
            count: 64,
            interpolation: Interpolation::Linear,
            direction: Direction::Out,
            mirror: false,
            power: true,
            radius_frac: 0.4,
            gap_px: 0.0,
            amp_scale: 1.0,
            smoothing: 0.25,
        }
    }
}

/// Shared prepare pipeline for the ring renderers: range query, silence
/// skip, peak emphasis, circular padding (or mirroring), conditioning,
/// circular curve fit.
struct RingPipeline {
    conditioner: SpectrumConditioner,
    scratch: Vec<f32>,
    curve: Option<BandCurve>,
    skip: bool,
}

impl RingPipeline {
    fn new(smoothing: f32) -> Self {
        Self {
            conditioner: SpectrumConditioner::new(smoothing),
            scratch: Vec::new(),
            curve: None,
            skip: true,
        }
    }

    /// `skip_when_quiet` is false for filled circle waves, which keep
    /// drawing their base ring through silence.
    fn prepare(&mut self, spectrum: &Spectrum, config: &RadialConfig, skip_when_quiet: bool) {
        let fft = spectrum.magnitudes_in_range(config.start_hz, config.end_hz);
        if is_quiet(fft) && skip_when_quiet {
            self.skip = true;
            return;
        }
        self.skip = false;

        self.scratch.clear();
        self.scratch.extend_from_slice(fft);
        if config.power {
            power_scale(&mut self.scratch);
        }
        self.scratch = if config.mirror {
            mirror(&self.scratch, 1)
        } else {
            circle_pad(&self.scratch)
        };

        let heights = self.conditioner.condition(&self.scratch, config.amp_scale);
        self.curve = Some(BandCurve::fit_circular(
            heights,
            config.count,
            config.interpolation,
        ));
    }
}

/// Trapezoidal bars around the base ring
pub struct RadialBars {
    pub style: Style,
    config: RadialConfig,
    pipeline: RingPipeline,
}

impl RadialBars {
    pub fn new(style: Style, config: RadialConfig) -> Self {
        assert!(config.count > 0, "radial bar count must be nonzero");
        let pipeline = RingPipeline::new(config.smoothing);
        Self {
            style,
            config,
            pipeline,
        }
    }
}

impl Default for RadialBars {
    fn default() -> Self {
        Self::new(Style::stroke(Color::WHITE, 2.0), RadialConfig::default())
    }
}

impl VisualNode for RadialBars {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.pipeline.prepare(spectrum, &self.config, true);
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
        let base_radius = canvas.shortest_side() / 2.0 * config.radius_frac;
        let gap_theta = config.gap_px / base_radius;
        let angle = 2.0 * PI / count as f32 - gap_theta;

        with_direction_each(
            canvas,
            config.direction,
            0.5,
            0.5,
            |c| draw_trapezoids(c, style, count, angle, gap_theta, curve, |v| {
                (base_radius, base_radius + v)
            }),
            |c| draw_trapezoids(c, style, count, angle, gap_theta, curve, |v| {
                (base_radius, base_radius - v)
            }),
            |c| draw_trapezoids(c, style, count, angle, gap_theta, curve, |v| {
                (base_radius + v, base_radius - v)
            }),
        );
    }
}

fn draw_trapezoids(
    canvas: &mut Canvas,
    style: &Style,
    count: usize,
    angle: f32,
    gap_theta: f32,
    curve: &BandCurve,
    edges: impl Fn(f32) -> (f32, f32),
) {
    let mut pb = PathBuilder::new();
    for i in 0..count {
        let value = curve.sample(i as f32);
        let (inner, outer) = edges(value);
        let theta_a = (angle + gap_theta) * i as f32;
        let theta_b = angle * (i + 1) as f32 + gap_theta * i as f32;

        let start_a = polar(inner, theta_a);
        let stop_a = polar(outer, theta_a);
        let start_b = polar(inner, theta_b);
        let stop_b = polar(outer, theta_b);

        pb.move_to(start_a.x, start_a.y);
        pb.line_to(stop_a.x, stop_a.y);
        pb.line_to(stop_b.x, stop_b.y);
        pb.line_to(start_b.x, start_b.y);
        pb.close();
    }
    if let Some(path) = pb.finish() {
        canvas.draw_path(&path, style);
    }
}

/// Stroked spokes from the base ring
pub struct RadialLines {
    pub style: Style,
    config: RadialConfig,
    pipeline: RingPipeline,
}

impl RadialLines {
    pub fn new(style: Style, config: RadialConfig) -> Self {
        assert!(config.count > 0, "spoke count must be nonzero");
        let pipeline = RingPipeline::new(config.smoothing);
        Self {
            style,
            config,
            pipeline,
        }
    }
}

impl Default for RadialLines {
    fn default() -> Self {
        Self::new(Style::stroke(Color::WHITE, 2.0), RadialConfig::default())
    }
}

impl VisualNode for RadialLines {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.pipeline.prepare(spectrum, &self.config, true);
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
        let base_radius = canvas.shortest_side() / 2.0 * config.radius_frac;
        let angle = 2.0 * PI / count as f32;

        let spokes = |c: &mut Canvas, radii: &dyn Fn(f32) -> (f32, f32)| {
            let mut pb = PathBuilder::new();
            for i in 0..count {
                let value = curve.sample(i as f32);
                let (from, to) = radii(value);
                let start = polar(from, angle * i as f32);
                let stop = polar(to, angle * i as f32);
                pb.move_to(start.x, start.y);
                pb.line_to(stop.x, stop.y);
            }
            if let Some(path) = pb.finish() {
                c.draw_path(&path, style);
            }
        };

        with_direction_each(
            canvas,
            config.direction,
            0.5,
            0.5,
            |c| spokes(c, &|v| (base_radius, base_radius + v)),
            |c| spokes(c, &|v| (base_radius, base_radius - v)),
            |c| spokes(c, &|v| (base_radius + v, base_radius - v)),
        );
    }
}

/// Closed circular silhouette whose radius follows the spectrum.
///
/// Outward mode fills the deformed disc; inward mode renders a ring between
/// the base circle and the deformed inner edge via even-odd fill; both mode
/// varies both edges of the ring.
pub struct CircleWave {
    pub style: Style,
    config: RadialConfig,
    pipeline: RingPipeline,
}

impl CircleWave {
    pub fn new(style: Style, config: RadialConfig) -> Self {
        assert!(config.count > 0, "circle point count must be nonzero");
        let pipeline = RingPipeline::new(config.smoothing);
        Self {
            style,
            config,
            pipeline,
        }
    }
}

impl Default for CircleWave {
    fn default() -> Self {
        Self::new(
            Style::fill(Color::WHITE),
            RadialConfig {
                count: 128,
                interpolation: Interpolation::Spline,
                amp_scale: 0.6,
                ..RadialConfig::default()
            },
        )
    }
}

impl VisualNode for CircleWave {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        // Filled circles keep their base ring visible through silence;
        // only the stroked variant skips quiet frames
        let skip_when_quiet = self.style.stroke.is_some();
        self.pipeline.prepare(spectrum, &self.config, skip_when_quiet);
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
        let base_radius = canvas.shortest_side() / 2.0 * config.radius_frac;
        let angle = 2.0 * PI / count as f32;

        let ring = |pb: &mut PathBuilder, radius_at: &dyn Fn(f32) -> f32| {
            for i in 0..=count {
                let point = polar(radius_at(curve.sample(i as f32)), angle * i as f32);
                if i == 0 {
                    pb.move_to(point.x, point.y);
                } else {
                    pb.line_to(point.x, point.y);
                }
            }
            pb.close();
        };

        with_direction_each(
            canvas,
            config.direction,
            0.5,
            0.5,
            |c| {
                let mut pb = PathBuilder::new();
                ring(&mut pb, &|v| base_radius + v);
                if let Some(path) = pb.finish() {
                    c.draw_path(&path, style);
                }
            },
            |c| {
                let mut pb = PathBuilder::new();
                ring(&mut pb, &|_| base_radius);
                ring(&mut pb, &|v| base_radius - v);
                if let Some(path) = pb.finish() {
                    c.draw_path_rule(&path, style, FillRule::EvenOdd);
                }
            },
            |c| {
                let mut pb = PathBuilder::new();
                ring(&mut pb, &|v| base_radius + v);
                ring(&mut pb, &|v| base_radius - v);
                if let Some(path) = pb.finish() {
                    c.draw_path_rule(&path, style, FillRule::EvenOdd);
                }
            },
        );
    }
}

/// Three rotated copies of a filled circle wave in red, green and blue with
/// additive blending
pub struct CircleWaveRgb {
    pub style: Style,
    colors: [Color; 3],
    /// Rotation between the copies (degrees)
    pub rotation_step: f32,
    wave: CircleWave,
}

impl CircleWaveRgb {
    pub fn new(colors: [Color; 3], rotation_step: f32, config: RadialConfig) -> Self {
        let wave_style = Style::fill(Color::WHITE).with_blend(BlendMode::Plus);
        Self {
            style: Style::default(),
            colors,
            rotation_step,
            wave: CircleWave::new(wave_style, config),
        }
    }
}

impl Default for CircleWaveRgb {
    fn default() -> Self {
        Self::new(
            [
                Color::from_rgba8(255, 0, 0, 255),
                Color::from_rgba8(0, 255, 0, 255),
                Color::from_rgba8(0, 0, 255, 255),
            ],
            10.0,
            RadialConfig {
                count: 128,
                interpolation: Interpolation::Spline,
                amp_scale: 0.5,
                ..RadialConfig::default()
            },
        )
    }
}

impl VisualNode for CircleWaveRgb {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.wave.prepare(spectrum);
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let colors = self.colors;
        let step = self.rotation_step;
        let wave = &mut self.wave;

        for (turn, color) in [(0.0, colors[0]), (step, colors[1]), (step * 2.0, colors[2])] {
            wave.style.set_color(color);
            canvas.with_save(|c| {
                c.rotate(turn, c.width() * 0.5, c.height() * 0.5);
                wave.render(c, spectrum);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FftConfig;

    fn loud_spectrum() -> Spectrum {
        let config = FftConfig::default();
        let magnitudes = (0..config.bin_count())
            .map(|i| if i < 24 { 40.0 } else { 0.0 })
            .collect();
        Spectrum::new(config, magnitudes)
    }

    fn painted_pixels(canvas: &Canvas) -> usize {
        canvas
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0)
            .count()
    }

    #[test]
    fn test_radial_bars_draw() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut bars = RadialBars::default();

        let spectrum = loud_spectrum();
        bars.prepare(&spectrum);
        bars.render(&mut canvas, &spectrum);

        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_radial_lines_skip_silence() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut lines = RadialLines::default();

        let spectrum = Spectrum::silent(FftConfig::default());
        lines.prepare(&spectrum);
        lines.render(&mut canvas, &spectrum);

        assert_eq!(painted_pixels(&canvas), 0);
    }

    #[test]
    fn test_filled_circle_survives_silence() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut circle = CircleWave::default();

        // A filled circle still draws its base disc on a quiet frame
        let spectrum = Spectrum::silent(FftConfig::default());
        circle.prepare(&spectrum);
        circle.render(&mut canvas, &spectrum);

        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_ring_mode_leaves_center_empty() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut circle = CircleWave::new(
            Style::fill(Color::WHITE),
            RadialConfig {
                direction: Direction::In,
                count: 128,
                amp_scale: 0.2,
                ..RadialConfig::default()
            },
        );

        let spectrum = loud_spectrum();
        circle.prepare(&spectrum);
        circle.render(&mut canvas, &spectrum);

        // Even-odd fill keeps the very center open
        let center = canvas.pixmap().pixel(64, 64).unwrap();
        assert_eq!(center.alpha(), 0);
        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_circle_wave_rgb_draws_three_channels() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut rgb = CircleWaveRgb::default();

        let spectrum = loud_spectrum();
        rgb.prepare(&spectrum);
        rgb.render(&mut canvas, &spectrum);

        let pixels = canvas.pixmap().pixels();
        assert!(pixels.iter().any(|p| p.red() > 0));
        assert!(pixels.iter().any(|p| p.green() > 0));
        assert!(pixels.iter().any(|p| p.blue() > 0));
    }
}
