//! Visual node tree: the composable drawing units.
//!
//! A [`VisualNode`] computes from the current spectrum in `prepare` and
//! paints in `render`. Structural modifiers (in [`modifier`]) wrap children
//! and change the transform or compositing context; leaf renderers (in
//! [`bars`], [`wave`], [`radial`], [`gradient`]) each run their own
//! conditioning + interpolation pipeline and draw a shape.

pub mod bars;
pub mod gradient;
pub mod modifier;
pub mod radial;
pub mod wave;

use glam::Vec2;

use crate::canvas::{Canvas, Style};
use crate::spectrum::Spectrum;

/// One node of the drawing composition tree.
///
/// `prepare` is pure computation (internal state update only); `render`
/// draws and may read but not mutate audio state. Composition nodes call
/// both on all children in declared order; there is no concurrency or
/// reordering.
pub trait VisualNode {
    /// The node's drawing style; parents propagate their blend mode here
    fn style_mut(&mut self) -> &mut Style;

    /// Consume the frame's spectrum and update internal state
    fn prepare(&mut self, spectrum: &Spectrum);

    /// Paint onto the surface
    fn render(&mut self, canvas: &mut Canvas, spectrum: &Spectrum);
}

/// Which side of the baseline (or ring) a shape grows toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Above the baseline / outward from the ring
    #[default]
    Out,
    /// Below the baseline / inward from the ring
    In,
    /// Mirrored both ways
    Both,
}

/// Convert polar coordinates (radius, angle in radians) to cartesian
pub fn polar(radius: f32, theta: f32) -> Vec2 {
    Vec2::new(radius * theta.cos(), radius * theta.sin())
}

/// Position the baseline at a fractional origin and run the directional
/// draw. `In` flips about the surface center; `Both` draws, flips about the
/// local origin, and draws again. The transform save covers every variant.
pub fn with_direction(
    canvas: &mut Canvas,
    direction: Direction,
    x_frac: f32,
    y_frac: f32,
    mut draw: impl FnMut(&mut Canvas),
) {
    canvas.with_save(|c| {
        let (w, h) = (c.width(), c.height());
        match direction {
            Direction::Out => {
                c.translate(w * x_frac, h * y_frac);
                draw(c);
            }
            Direction::In => {
                c.scale(1.0, -1.0, w / 2.0, h / 2.0);
                c.translate(w * x_frac, h * y_frac);
                draw(c);
            }
            Direction::Both => {
                c.translate(w * x_frac, h * y_frac);
                draw(c);
                c.scale(1.0, -1.0, 0.0, 0.0);
                draw(c);
            }
        }
    });
}

/// Directional draw with separate single-sided and mirrored geometry
pub fn with_direction_split(
    canvas: &mut Canvas,
    direction: Direction,
    x_frac: f32,
    y_frac: f32,
    mut single: impl FnMut(&mut Canvas),
    mut both: impl FnMut(&mut Canvas),
) {
    canvas.with_save(|c| {
        let (w, h) = (c.width(), c.height());
        match direction {
            Direction::Out => {
                c.translate(w * x_frac, h * y_frac);
                single(c);
            }
            Direction::In => {
                c.scale(1.0, -1.0, w / 2.0, h / 2.0);
                c.translate(w * x_frac, h * y_frac);
                single(c);
            }
            Direction::Both => {
                c.translate(w * x_frac, h * y_frac);
                both(c);
            }
        }
    });
}

/// Directional draw where every direction has its own geometry (ring
/// renderers grow the radius instead of flipping the surface)
pub fn with_direction_each(
    canvas: &mut Canvas,
    direction: Direction,
    x_frac: f32,
    y_frac: f32,
    mut out_draw: impl FnMut(&mut Canvas),
    mut in_draw: impl FnMut(&mut Canvas),
    mut both_draw: impl FnMut(&mut Canvas),
) {
    canvas.with_save(|c| {
        let (w, h) = (c.width(), c.height());
        c.translate(w * x_frac, h * y_frac);
        match direction {
            Direction::Out => out_draw(c),
            Direction::In => in_draw(c),
            Direction::Both => both_draw(c),
        }
    });
}
