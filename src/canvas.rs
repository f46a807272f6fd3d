//! 2D raster surface with a save/restore transform stack.
//!
//! Wraps a `tiny_skia::Pixmap` with the drawing contract the node tree
//! needs: path drawing under an accumulated affine transform, pivot-relative
//! scale/rotate, offscreen layers composited with a blend mode, and gradient
//! fills. Sibling nodes share one surface, so every transform modification
//! happens inside [`Canvas::with_save`].

use tiny_skia::{
    BlendMode, Color, FillRule, GradientStop, LinearGradient, Paint, Path, Pixmap, PixmapPaint,
    Point, RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

/// How a node's geometry is filled
#[derive(Debug, Clone)]
pub enum FillKind {
    Solid(Color),
    /// Gradient between two points in fractional surface coordinates
    Linear {
        start: (f32, f32),
        end: (f32, f32),
        stops: Vec<(f32, Color)>,
    },
    /// Gradient around a center in fractional surface coordinates; the
    /// radius fraction is relative to the shorter surface side
    Radial {
        center: (f32, f32),
        radius: f32,
        stops: Vec<(f32, Color)>,
    },
}

/// Drawing style for one node, the rough equivalent of an immediate-mode
/// paint object. Structural modifiers propagate their blend mode into their
/// children every frame.
#[derive(Debug, Clone)]
pub struct Style {
    pub fill: FillKind,
    /// Stroke width in pixels; `None` fills the geometry instead
    pub stroke: Option<f32>,
    pub blend: BlendMode,
    pub anti_alias: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: FillKind::Solid(Color::WHITE),
            stroke: None,
            blend: BlendMode::SourceOver,
            anti_alias: true,
        }
    }
}

impl Style {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: FillKind::Solid(color),
            ..Self::default()
        }
    }

    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            fill: FillKind::Solid(color),
            stroke: Some(width),
            ..Self::default()
        }
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn set_color(&mut self, color: Color) {
        self.fill = FillKind::Solid(color);
    }
}

/// Raster surface plus transform stack
pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    stack: Vec<Transform>,
}

impl Canvas {
    /// Create a surface; `None` for zero dimensions
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            transform: Transform::identity(),
            stack: Vec::new(),
        })
    }

    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    pub fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    /// Shorter side, the reference for circular geometry
    pub fn shortest_side(&self) -> f32 {
        self.width().min(self.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Fill the whole surface, ignoring the current transform
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn save(&mut self) {
        self.stack.push(self.transform);
    }

    pub fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.transform = transform;
        }
    }

    /// Run `f` with the transform state saved around it; the restore runs on
    /// every path out so sibling nodes always see a balanced stack.
    pub fn with_save<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let result = f(self);
        self.restore();
        result
    }

    /// Offset the drawing origin (local coordinates)
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_concat(Transform::from_translate(dx, dy));
    }

    /// Scale about a pivot point (local coordinates)
    pub fn scale(&mut self, sx: f32, sy: f32, px: f32, py: f32) {
        let about_pivot = Transform::from_translate(px, py)
            .pre_concat(Transform::from_scale(sx, sy))
            .pre_concat(Transform::from_translate(-px, -py));
        self.transform = self.transform.pre_concat(about_pivot);
    }

    /// Rotate by `degrees` about a pivot point (local coordinates)
    pub fn rotate(&mut self, degrees: f32, px: f32, py: f32) {
        self.transform = self
            .transform
            .pre_concat(Transform::from_rotate_at(degrees, px, py));
    }

    /// Draw a path under the current transform (non-zero winding fill)
    pub fn draw_path(&mut self, path: &Path, style: &Style) {
        self.draw_path_rule(path, style, FillRule::Winding);
    }

    /// Draw a path with an explicit fill rule (even-odd for ring shapes)
    pub fn draw_path_rule(&mut self, path: &Path, style: &Style, rule: FillRule) {
        let paint = self.make_paint(style);
        match style.stroke {
            Some(width) => {
                let stroke = Stroke {
                    width,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(path, &paint, &stroke, self.transform, None);
            }
            None => {
                self.pixmap
                    .fill_path(path, &paint, rule, self.transform, None);
            }
        }
    }

    /// Fill the whole surface with the style's fill, ignoring the transform
    pub fn fill_surface(&mut self, style: &Style) {
        let Some(rect) = Rect::from_xywh(0.0, 0.0, self.width(), self.height()) else {
            return;
        };
        let paint = self.make_paint(style);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Draw into an offscreen layer inheriting the current transform, then
    /// composite the layer onto this surface with `blend`.
    pub fn with_layer(&mut self, blend: BlendMode, f: impl FnOnce(&mut Canvas)) {
        let Some(mut layer) = Canvas::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        layer.transform = self.transform;
        f(&mut layer);

        let paint = PixmapPaint {
            blend_mode: blend,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.pixmap.as_ref(), &paint, Transform::identity(), None);
    }

    fn make_paint(&self, style: &Style) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.anti_alias = style.anti_alias;
        paint.blend_mode = style.blend;
        paint.shader = self.make_shader(&style.fill);
        paint
    }

    fn make_shader(&self, fill: &FillKind) -> Shader<'static> {
        let (w, h) = (self.width(), self.height());
        match fill {
            FillKind::Solid(color) => Shader::SolidColor(*color),
            FillKind::Linear { start, end, stops } => LinearGradient::new(
                Point::from_xy(start.0 * w, start.1 * h),
                Point::from_xy(end.0 * w, end.1 * h),
                gradient_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or(Shader::SolidColor(Color::WHITE)),
            FillKind::Radial { center, radius, stops } => RadialGradient::new(
                Point::from_xy(center.0 * w, center.1 * h),
                0.0,
                Point::from_xy(center.0 * w, center.1 * h),
                radius * self.shortest_side(),
                gradient_stops(stops),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or(Shader::SolidColor(Color::WHITE)),
        }
    }
}

fn gradient_stops(stops: &[(f32, Color)]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|&(position, color)| GradientStop::new(position, color))
        .collect()
}
