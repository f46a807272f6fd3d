//! Per-frame render driver.

use tiny_skia::Color;

use crate::canvas::Canvas;
use crate::node::VisualNode;
use crate::spectrum::Spectrum;

/// Owns the node tree and runs the frame pass: clear, prepare every node,
/// then render every node, synchronously on the calling thread.
pub struct Visualizer {
    root: Box<dyn VisualNode>,
    background: Color,
}

impl Visualizer {
    pub fn new(root: Box<dyn VisualNode>) -> Self {
        Self {
            root,
            background: Color::BLACK,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Replace the whole tree (preset switch)
    pub fn set_root(&mut self, root: Box<dyn VisualNode>) {
        self.root = root;
    }

    /// Render one frame of the given spectrum onto the canvas
    pub fn render_frame(&mut self, spectrum: &Spectrum, canvas: &mut Canvas) {
        canvas.clear(self.background);
        self.root.prepare(spectrum);
        self.root.render(canvas, spectrum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FftConfig;
    use crate::preset;

    #[test]
    fn test_engine_renders_full_pipeline() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let mut visualizer = Visualizer::new(preset::build("bars"));

        let config = FftConfig::default();
        let magnitudes = (0..config.bin_count())
            .map(|i| if i < 24 { 40.0 } else { 0.0 })
            .collect();
        let spectrum = Spectrum::new(config, magnitudes);

        visualizer.render_frame(&spectrum, &mut canvas);

        // Background plus some foreground
        let lit = canvas
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.red() > 0 || p.green() > 0 || p.blue() > 0)
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn test_preset_switch_rebuilds_tree() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let mut visualizer = Visualizer::new(preset::build("bars"));

        let config = FftConfig::default();
        let magnitudes = (0..config.bin_count())
            .map(|i| if i < 24 { 40.0 } else { 0.0 })
            .collect();
        let spectrum = Spectrum::new(config, magnitudes);

        visualizer.render_frame(&spectrum, &mut canvas);
        let bars_frame = canvas.pixmap().data().to_vec();

        visualizer.set_root(preset::build("ring"));
        visualizer.render_frame(&spectrum, &mut canvas);

        assert_ne!(canvas.pixmap().data(), bars_frame.as_slice());
    }

    #[test]
    fn test_silent_frame_leaves_only_background() {
        let mut canvas = Canvas::new(64, 64).unwrap();
        let mut visualizer = Visualizer::new(preset::build("bars"));

        visualizer.render_frame(&Spectrum::silent(FftConfig::default()), &mut canvas);

        let lit = canvas
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.red() > 0 || p.green() > 0 || p.blue() > 0)
            .count();
        assert_eq!(lit, 0);
    }
}
