//! Renderer trait abstraction.

use kurbo::{Affine, Rect};
use peniko::Color;
use postcraft_core::artboard::Artboard;
use postcraft_core::editor::Editor;
use postcraft_core::scene::SceneStore;
use postcraft_core::selection::Handle;
use postcraft_core::viewport::Viewport;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Elements of the active page.
    pub scene: &'a SceneStore,
    pub artboard: &'a Artboard,
    pub viewport: &'a Viewport,
    /// Resize handles to draw (artboard coordinates).
    pub handles: Vec<Handle>,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Color around the artboard.
    pub background_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context without handles.
    pub fn new(scene: &'a SceneStore, artboard: &'a Artboard, viewport: &'a Viewport) -> Self {
        Self {
            scene,
            artboard,
            viewport,
            handles: Vec::new(),
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Context for the editor's current frame, handles included.
    pub fn from_editor(editor: &'a Editor) -> Self {
        let mut ctx = Self::new(editor.scene(), editor.artboard(), editor.viewport());
        ctx.handles = editor.handles();
        ctx
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Artboard-to-physical-pixel transform.
    pub fn transform(&self) -> Affine {
        let origin = self.viewport.origin();
        Affine::scale(self.scale_factor)
            * Affine::translate(origin.to_vec2())
            * Affine::scale(self.viewport.scale())
    }

    /// Screen rectangle (physical pixels) of an artboard rectangle.
    pub fn to_screen(&self, rect: Rect) -> Rect {
        self.transform().transform_rect_bbox(rect)
    }
}

/// Trait for rendering backends.
///
/// Implementations can draw with any GPU or CPU engine; they receive the
/// same frame context.
pub trait Renderer: Send + Sync {
    /// Build the draw commands for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};

    #[test]
    fn test_transform_matches_viewport() {
        let scene = SceneStore::new();
        let artboard = Artboard::default();
        let mut viewport = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0), artboard.size());
        viewport.set_zoom(1.5);
        let ctx = RenderContext::new(&scene, &artboard, &viewport);

        let p = Point::new(123.0, 456.0);
        let expected = viewport.canvas_to_screen(p);
        let actual = ctx.transform() * p;
        assert!((expected.x - actual.x).abs() < 1e-9);
        assert!((expected.y - actual.y).abs() < 1e-9);
    }

    #[test]
    fn test_scale_factor_applies_last() {
        let scene = SceneStore::new();
        let artboard = Artboard::default();
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 1080.0, 1080.0), artboard.size());
        let ctx = RenderContext::new(&scene, &artboard, &viewport).with_scale_factor(2.0);

        let rect = ctx.to_screen(Rect::from_origin_size(Point::new(10.0, 20.0), Size::new(30.0, 40.0)));
        assert_eq!(rect, Rect::new(20.0, 40.0, 80.0, 120.0));
    }
}
