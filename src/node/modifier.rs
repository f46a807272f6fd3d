//! Structural modifiers: nodes that change the transform or compositing
//! context their children draw under without defining a shape themselves.
//!
//! Every modifier forwards `prepare` and `render` to all children in
//! declared order, and propagates its own blend mode into each child's
//! style before drawing it, so compositing rules set high in the tree reach
//! the leaves.

use tiny_skia::BlendMode;

use crate::canvas::{Canvas, Style};
use crate::conditioner::GravityModel;
use crate::node::VisualNode;
use crate::spectrum::Spectrum;

/// Draw all children in sequence at the same transform
pub struct Compose {
    pub style: Style,
    children: Vec<Box<dyn VisualNode>>,
}

impl Compose {
    pub fn new(children: Vec<Box<dyn VisualNode>>) -> Self {
        Self {
            style: Style::default(),
            children,
        }
    }
}

impl VisualNode for Compose {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        for child in &mut self.children {
            child.prepare(spectrum);
        }
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        for child in &mut self.children {
            child.style_mut().blend = self.style.blend;
            child.render(canvas, spectrum);
        }
    }
}

/// Offset the drawing origin by a fraction of the surface size
pub struct Move {
    pub style: Style,
    pub x_frac: f32,
    pub y_frac: f32,
    children: Vec<Box<dyn VisualNode>>,
}

impl Move {
    pub fn new(children: Vec<Box<dyn VisualNode>>, x_frac: f32, y_frac: f32) -> Self {
        Self {
            style: Style::default(),
            x_frac,
            y_frac,
            children,
        }
    }
}

impl VisualNode for Move {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        for child in &mut self.children {
            child.prepare(spectrum);
        }
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let (x_frac, y_frac) = (self.x_frac, self.y_frac);
        let blend = self.style.blend;
        let children = &mut self.children;

        canvas.with_save(|c| {
            c.translate(c.width() * x_frac, c.height() * y_frac);
            for child in children.iter_mut() {
                child.style_mut().blend = blend;
                child.render(c, spectrum);
            }
        });
    }
}

/// Scale about a fractional pivot point
pub struct Scale {
    pub style: Style,
    pub sx: f32,
    pub sy: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    children: Vec<Box<dyn VisualNode>>,
}

impl Scale {
    pub fn new(children: Vec<Box<dyn VisualNode>>, sx: f32, sy: f32) -> Self {
        Self {
            style: Style::default(),
            sx,
            sy,
            pivot_x: 0.5,
            pivot_y: 0.5,
            children,
        }
    }
}

impl VisualNode for Scale {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        for child in &mut self.children {
            child.prepare(spectrum);
        }
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let (sx, sy) = (self.sx, self.sy);
        let (px, py) = (self.pivot_x, self.pivot_y);
        let blend = self.style.blend;
        let children = &mut self.children;

        canvas.with_save(|c| {
            c.scale(sx, sy, c.width() * px, c.height() * py);
            for child in children.iter_mut() {
                child.style_mut().blend = blend;
                child.render(c, spectrum);
            }
        });
    }
}

/// Rotate about a fractional pivot, optionally auto-advancing every frame
pub struct Rotate {
    pub style: Style,
    pub pivot_x: f32,
    pub pivot_y: f32,
    /// Auto-rotation rate; the angle advances `rpm / 10` degrees per frame
    pub rpm: f32,
    /// Constant angle offset (degrees)
    pub offset: f32,
    rotation: f32,
    children: Vec<Box<dyn VisualNode>>,
}

impl Rotate {
    pub fn new(children: Vec<Box<dyn VisualNode>>, rpm: f32) -> Self {
        Self {
            style: Style::default(),
            pivot_x: 0.5,
            pivot_y: 0.5,
            rpm,
            offset: 0.0,
            rotation: 0.0,
            children,
        }
    }

    /// Current accumulated angle (degrees, wrapped at 360)
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl VisualNode for Rotate {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        for child in &mut self.children {
            child.prepare(spectrum);
        }
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let angle = self.rotation + self.offset;
        let (px, py) = (self.pivot_x, self.pivot_y);
        let blend = self.style.blend;
        let children = &mut self.children;

        canvas.with_save(|c| {
            c.rotate(angle, c.width() * px, c.height() * py);
            for child in children.iter_mut() {
                child.style_mut().blend = blend;
                child.render(c, spectrum);
            }
        });

        if self.rpm != 0.0 {
            self.rotation = (self.rotation + self.rpm / 10.0) % 360.0;
        }
    }
}

/// Masked compositing: draw `src` into an offscreen layer, then draw `dst`
/// into the same layer with Source-In so it survives only where `src` has
/// coverage. The layer composites back with this node's own blend mode.
pub struct Blend {
    pub style: Style,
    src: Box<dyn VisualNode>,
    dst: Box<dyn VisualNode>,
}

impl Blend {
    pub fn new(src: Box<dyn VisualNode>, dst: Box<dyn VisualNode>) -> Self {
        Self {
            style: Style::default(),
            src,
            dst,
        }
    }
}

impl VisualNode for Blend {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.src.prepare(spectrum);
        self.dst.prepare(spectrum);
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let src = &mut self.src;
        let dst = &mut self.dst;
        dst.style_mut().blend = BlendMode::SourceIn;

        canvas.with_layer(self.style.blend, |layer| {
            src.render(layer, spectrum);
            dst.render(layer, spectrum);
        });
    }
}

/// Beat-reactive uniform scale about a pivot.
///
/// A gravity-damped average of the configured low-frequency band drives the
/// factor `radius_base + height / peak * beat_amp`, so children pulse with
/// the bass and settle between hits.
pub struct BeatScale {
    pub style: Style,
    pub config: BeatConfig,
    energy: GravityModel,
    children: Vec<Box<dyn VisualNode>>,
}

/// Beat reaction parameters
#[derive(Debug, Clone)]
pub struct BeatConfig {
    /// Start of the energy band (Hz)
    pub start_hz: f32,

    /// End of the energy band (Hz)
    pub end_hz: f32,

    /// Scale pivot (fractional surface coordinates)
    pub pivot_x: f32,
    pub pivot_y: f32,

    /// Base scale factor with no energy
    pub radius_base: f32,

    /// Extra scale at full-peak energy
    pub beat_amp: f32,

    /// Energy level (source units) treated as full peak
    pub peak: f32,
}

impl Default for BeatConfig {
    fn default() -> Self {
        Self {
            start_hz: 60.0,
            end_hz: 800.0,
            pivot_x: 0.5,
            pivot_y: 0.5,
            radius_base: 1.0,
            beat_amp: 1.0,
            peak: 200.0,
        }
    }
}

impl BeatScale {
    pub fn new(children: Vec<Box<dyn VisualNode>>, config: BeatConfig) -> Self {
        Self {
            style: Style::default(),
            config,
            energy: GravityModel::new(0.0),
            children,
        }
    }

    /// Current scale factor derived from the damped band energy
    pub fn factor(&self) -> f32 {
        self.config.radius_base + self.energy.height / self.config.peak * self.config.beat_amp
    }
}

impl VisualNode for BeatScale {
    fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    fn prepare(&mut self, spectrum: &Spectrum) {
        self.energy
            .update(spectrum.band_average(self.config.start_hz, self.config.end_hz));
        for child in &mut self.children {
            child.prepare(spectrum);
        }
    }

    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum) {
        let factor = self.factor();
        let (px, py) = (self.config.pivot_x, self.config.pivot_y);
        let blend = self.style.blend;
        let children = &mut self.children;

        canvas.with_save(|c| {
            c.scale(factor, factor, c.width() * px, c.height() * py);
            for child in children.iter_mut() {
                child.style_mut().blend = blend;
                child.render(c, spectrum);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::bars::Bars;
    use crate::node::gradient::Gradient;
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
    fn test_compose_prepares_and_renders_children() {
        let mut canvas = Canvas::new(128, 128).unwrap();
        let mut node = Compose::new(vec![Box::new(Bars::default())]);

        let spectrum = loud_spectrum();
        node.prepare(&spectrum);
        node.render(&mut canvas, &spectrum);

        assert!(painted_pixels(&canvas) > 0);
    }

    #[test]
    fn test_move_offsets_children() {
        let spectrum = loud_spectrum();

        let mut plain = Canvas::new(128, 128).unwrap();
        let mut bars = Bars::default();
        bars.prepare(&spectrum);
        bars.render(&mut plain, &spectrum);

        let mut moved = Canvas::new(128, 128).unwrap();
        let mut node = Move::new(vec![Box::new(Bars::default())], 0.0, 0.4);
        node.prepare(&spectrum);
        node.render(&mut moved, &spectrum);

        assert!(painted_pixels(&moved) > 0);
        assert_ne!(plain.pixmap().data(), moved.pixmap().data());
    }

    #[test]
    fn test_scale_changes_footprint() {
        let spectrum = loud_spectrum();

        let mut plain = Canvas::new(128, 128).unwrap();
        let mut bars = Bars::default();
        bars.prepare(&spectrum);
        bars.render(&mut plain, &spectrum);

        let mut shrunk = Canvas::new(128, 128).unwrap();
        let mut node = Scale::new(vec![Box::new(Bars::default())], 0.5, 0.5);
        node.prepare(&spectrum);
        node.render(&mut shrunk, &spectrum);

        assert!(painted_pixels(&shrunk) > 0);
        assert!(painted_pixels(&shrunk) < painted_pixels(&plain));
    }

    #[test]
    fn test_rotate_advances_and_wraps() {
        let mut canvas = Canvas::new(32, 32).unwrap();
        let mut node = Rotate::new(vec![], 900.0);
        let spectrum = Spectrum::silent(FftConfig::default());

        // 900 rpm advances 90 degrees per frame and wraps at 360
        for _ in 0..3 {
            node.render(&mut canvas, &spectrum);
        }
        assert!((node.rotation() - 270.0).abs() < 1e-3);
        node.render(&mut canvas, &spectrum);
        assert!(node.rotation().abs() < 1e-3);
    }

    #[test]
    fn test_rotate_zero_rpm_is_static() {
        let mut canvas = Canvas::new(32, 32).unwrap();
        let mut node = Rotate::new(vec![], 0.0);
        let spectrum = Spectrum::silent(FftConfig::default());

        node.render(&mut canvas, &spectrum);
        assert_eq!(node.rotation(), 0.0);
    }

    #[test]
    fn test_beat_scale_grows_with_energy() {
        let mut node = BeatScale::new(vec![], BeatConfig::default());
        assert_eq!(node.factor(), 1.0);

        node.prepare(&loud_spectrum());
        assert!(node.factor() > 1.0);

        // Quiet frames decay the pulse back toward the base factor
        let silent = Spectrum::silent(FftConfig::default());
        let peak = node.factor();
        for _ in 0..4 {
            node.prepare(&silent);
        }
        assert!(node.factor() < peak);
    }

    #[test]
    fn test_blend_masks_gradient_by_bars() {
        let spectrum = loud_spectrum();

        let mut masked = Canvas::new(128, 128).unwrap();
        let mut node = Blend::new(
            Box::new(Bars::default()),
            Box::new(Gradient::default()),
        );
        node.prepare(&spectrum);
        node.render(&mut masked, &spectrum);

        let masked_pixels = painted_pixels(&masked);
        assert!(masked_pixels > 0);

        // The gradient alone covers the whole surface; masked by the bars
        // it must cover strictly less
        let mut full = Canvas::new(128, 128).unwrap();
        let mut gradient = Gradient::default();
        gradient.prepare(&spectrum);
        gradient.render(&mut full, &spectrum);
        assert!(masked_pixels < painted_pixels(&full));
    }
}
