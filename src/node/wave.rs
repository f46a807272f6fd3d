//! Wave-family leaf renderers: polylines, filled silhouettes, the
//! oscilloscope-style zigzag, and the additive RGB triple.

use tiny_skia::{BlendMode, Color, PathBuilder};

use crate::canvas::{Canvas, Style};
use crate::conditioner::{is_quiet, SpectrumConditioner};
use crate::curve::{mirror, power_scale, BandCurve, Interpolation};
use crate::node::{with_direction, Direction, VisualNode};
use crate::spectrum::Spectrum;

/// Configuration for the wave-family renderers
#[derive(Debug, Clone)]
pub struct WaveConfig {
    /// Start of the analyzed frequency range (Hz)
    pub start_hz: f32,

    /// End of the analyzed frequency range (Hz)
    pub end_hz: f32,

    /// Number of points along the wave
    pub count: usize,

    /// Interpolation across the damped bands
    pub interpolation: Interpolation,

    /// Which side of the baseline the wave grows toward
    pub direction: Direction,

    /// Mirror the magnitude array symmetrically
    pub mirror: bool,

    /// Apply quadratic peak emphasis before damping
    pub power: bool,

    /// Amplitude multiplier applied before damping
    pub amp_scale: f32,

    /// Exponential smoothing factor (0..1)
    pub smoothing: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            start_hz: 0.0,
            end_hz: 2000.0,
            count: 128,
            interpolation: Interpolation::Linear,
            direction: Direction::Out,
            mirror: false,
            power: false,
            amp_scale: 1.0,
            smoothing: 0.25,
        }
    }
}

/// Continuous wave: a polyline when stroked, a filled silhouette closed
/// against the baseline otherwise
pub struct Wave {
    pub style: Style,
    config: WaveConfig,
    conditioner: SpectrumConditioner,
    scratch: Vec<f32>,
    curve: Option<BandCurve>,
    skip: bool,
}

impl Wave {
    pub fn new(style: Style, config: WaveConfig) -> Self {
        assert!(config.count > 0, "wave point count must be nonzero");
        let conditioner = SpectrumConditioner::new(config.smoothing);
        Self {
            style,
            config,
            conditioner,
            scratch: Vec::new(),
            curve: None,
            skip: true,
        }
    }
}

impl Default for Wave {
    fn default() -> Self {
        Self::new(Style::fill(Color::WHITE), WaveConfig::default())
    }
}

impl VisualNode for Wave {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        let fft = spectrum.magnitudes_in_range(self.config.start_hz, self.config.end_hz);
        if is_quiet(fft) {
            self.skip = true;
            return;
        }
        self.skip = false;

        self.scratch.clear();
        self.scratch.extend_from_slice(fft);
        if self.config.power {
            power_scale(&mut self.scratch);
        }
        if self.config.mirror {
            self.scratch = mirror(&self.scratch, 1);
        }

        let heights = self.conditioner.condition(&self.scratch, self.config.amp_scale);
        self.curve = Some(BandCurve::fit(
            heights,
            self.config.count,
            self.config.interpolation,
        ));
    }

    fn render(&mut self, canvas: &mut Canvas, _spectrum: &Spectrum) {
        if self.skip {
            return;
        }
        let Some(curve) = self.curve.as_ref() else {
            return;
        };
        let style = &self.style;
        let config = &self.config;

        let count = config.count;
        let width = canvas.width();
        let slice_width = width / count as f32;

        let mut pb = PathBuilder::new();
        if style.stroke.is_some() {
            pb.move_to(0.0, -curve.sample(0.0));
            for i in 1..=count {
                pb.line_to(slice_width * i as f32, -curve.sample(i as f32));
            }
        } else {
            // Close the silhouette against the baseline
            pb.move_to(0.0, 1.0);
            for i in 0..=count {
                pb.line_to(slice_width * i as f32, -curve.sample(i as f32));
            }
            pb.line_to(width, 1.0);
            pb.close();
        }
        let Some(path) = pb.finish() else {
            return;
        };

        with_direction(canvas, config.direction, 0.0, 0.5, |c| {
            c.draw_path(&path, style);
        });
    }
}

/// Oscilloscope-style zigzag: alternate points land above and below the
/// baseline
pub struct Analog {
    pub style: Style,
    config: WaveConfig,
    conditioner: SpectrumConditioner,
    scratch: Vec<f32>,
    curve: Option<BandCurve>,
    skip: bool,
}

impl Analog {
    pub fn new(style: Style, config: WaveConfig) -> Self {
        assert!(config.count > 0, "wave point count must be nonzero");
        let conditioner = SpectrumConditioner::new(config.smoothing);
        Self {
            style,
            config,
            conditioner,
            scratch: Vec::new(),
            curve: None,
            skip: true,
        }
    }
}

impl Default for Analog {
    fn default() -> Self {
        Self::new(Style::stroke(Color::WHITE, 2.0), WaveConfig::default())
    }
}

impl VisualNode for Analog {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        let fft = spectrum.magnitudes_in_range(self.config.start_hz, self.config.end_hz);
        if is_quiet(fft) {
            self.skip = true;
            return;
        }
        self.skip = false;

        self.scratch.clear();
        self.scratch.extend_from_slice(fft);
        if self.config.power {
            power_scale(&mut self.scratch);
        }
        if self.config.mirror {
            self.scratch = mirror(&self.scratch, 1);
        }

        let heights = self.conditioner.condition(&self.scratch, self.config.amp_scale);
        self.curve = Some(BandCurve::fit(
            heights,
            self.config.count,
            self.config.interpolation,
        ));
    }

    fn render(&mut self, canvas: &mut Canvas, _spectrum: &Spectrum) {
        if self.skip {
            return;
        }
        let Some(curve) = self.curve.as_ref() else {
            return;
        };
        let style = &self.style;
        let config = &self.config;

        let gap_width = canvas.width() / config.count as f32;

        let mut pb = PathBuilder::new();
        pb.move_to(0.0, -curve.sample(0.0));
        for i in 1..config.count {
            let y = curve.sample(i as f32);
            // Alternating sign gives the analog zigzag
            if i % 2 == 0 {
                pb.line_to(gap_width * i as f32, -y);
            } else {
                pb.line_to(gap_width * i as f32, y);
            }
        }
        let Some(path) = pb.finish() else {
            return;
        };

        with_direction(canvas, Direction::Out, 0.0, 0.5, |c| {
            c.draw_path(&path, style);
        });
    }
}

/// Three horizontally offset copies of a filled wave in red, green and blue
/// with additive blending; overlaps blend toward white
pub struct WaveRgb {
    pub style: Style,
    colors: [Color; 3],
    wave: Wave,
}

impl WaveRgb {
    pub fn new(colors: [Color; 3], config: WaveConfig) -> Self {
        let wave_style = Style::fill(Color::WHITE).with_blend(BlendMode::Plus);
        Self {
            style: Style::default(),
            colors,
            wave: Wave::new(wave_style, config),
        }
    }

    pub fn rgb(config: WaveConfig) -> Self {
        Self::new(
            [
                Color::from_rgba8(255, 0, 0, 255),
                Color::from_rgba8(0, 255, 0, 255),
                Color::from_rgba8(0, 0, 255, 255),
            ],
            config,
        )
    }
}

impl Default for WaveRgb {
    fn default() -> Self {
        Self::rgb(WaveConfig {
            interpolation: Interpolation::Spline,
            ..WaveConfig::default()
        })
    }
}

impl VisualNode for WaveRgb {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.wave.prepare(spectrum);
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let colors = self.colors;
        let wave = &mut self.wave;

        canvas.with_save(|c| {
            let (w, h) = (c.width(), c.height());
            c.scale(1.2, 1.0, w / 2.0, h);

            for (offset, color) in [(-0.03, colors[0]), (0.0, colors[1]), (0.03, colors[2])] {
                wave.style.set_color(color);
                // Additive blend survives because the inner wave draws with
                // its own style, not the propagated one
                c.with_save(|cc| {
                    cc.translate(w * offset, 0.0);
                    wave.render(cc, spectrum);
                });
            }
        });
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
    fn test_filled_wave_draws_silhouette() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut wave = Wave::default();

        let spectrum = loud_spectrum();
        wave.prepare(&spectrum);
        wave.render(&mut canvas, &spectrum);

        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_stroked_wave_draws_polyline() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut wave = Wave::new(Style::stroke(Color::WHITE, 2.0), WaveConfig::default());

        let spectrum = loud_spectrum();
        wave.prepare(&spectrum);
        wave.render(&mut canvas, &spectrum);

        let polyline_pixels = painted_pixels(&canvas);
        assert!(polyline_pixels > 0);

        // The filled silhouette must cover more area than the polyline
        let mut canvas2 = Canvas::new(128, 128).unwrap();
        let mut filled = Wave::default();
        filled.prepare(&spectrum);
        filled.render(&mut canvas2, &spectrum);
        assert!(painted_pixels(&canvas2) > polyline_pixels);
    }

    #[test]
    fn test_wave_skips_silence() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut wave = Wave::default();

        let spectrum = Spectrum::silent(FftConfig::default());
        wave.prepare(&spectrum);
        wave.render(&mut canvas, &spectrum);

        assert_eq!(painted_pixels(&canvas), 0);
    }

    #[test]
    fn test_analog_draws() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut analog = Analog::default();

        let spectrum = loud_spectrum();
        analog.prepare(&spectrum);
        analog.render(&mut canvas, &spectrum);

        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_wave_rgb_draws_three_colors() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut rgb = WaveRgb::default();

        let spectrum = loud_spectrum();
        rgb.prepare(&spectrum);
        rgb.render(&mut canvas, &spectrum);

        let pixels = canvas.pixmap().pixels();
        assert!(pixels.iter().any(|p| p.red() > 0));
        assert!(pixels.iter().any(|p| p.green() > 0));
        assert!(pixels.iter().any(|p| p.blue() > 0));
    }
}
