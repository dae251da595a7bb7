//! Viewport module for pan/zoom over the artboard.

use crate::geometry;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const DEFAULT_MIN_ZOOM: f64 = 0.3;
/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f64 = 2.0;

/// Viewport maps the artboard into a region of the screen.
///
/// The artboard is fitted into `region` (the base scale), centered, then
/// scaled by the user zoom and shifted by the pan offset. Panning and zooming
/// only change this mapping; element coordinates are never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen region available to the artboard.
    pub region: Rect,
    /// Logical artboard size.
    artboard_size: Size,
    /// Current pan offset in screen pixels.
    pub pan: Vec2,
    /// Current user zoom level (1.0 = fitted).
    zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Create a viewport fitting `artboard_size` into `region`.
    pub fn new(region: Rect, artboard_size: Size) -> Self {
        Self {
            region,
            artboard_size,
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }

    /// Set the zoom bounds, re-clamping the current zoom.
    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn artboard_size(&self) -> Size {
        self.artboard_size
    }

    /// Scale that fits the artboard into the region.
    pub fn base_scale(&self) -> f64 {
        let sx = self.region.width() / self.artboard_size.width;
        let sy = self.region.height() / self.artboard_size.height;
        let scale = sx.min(sy);
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// Effective screen pixels per artboard pixel.
    pub fn scale(&self) -> f64 {
        self.base_scale() * self.zoom
    }

    /// Screen position of the artboard's top-left corner.
    pub fn origin(&self) -> Point {
        let scale = self.scale();
        let center = self.region.center();
        Point::new(
            center.x - self.artboard_size.width * scale / 2.0 + self.pan.x,
            center.y - self.artboard_size.height * scale / 2.0 + self.pan.y,
        )
    }

    /// Convert a screen point to artboard coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        geometry::screen_to_canvas(screen_point, self.origin(), self.scale())
    }

    /// Convert an artboard point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        geometry::canvas_to_screen(canvas_point, self.origin(), self.scale())
    }

    /// Convert a screen-space delta to an artboard-space delta.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        geometry::screen_delta_to_canvas(delta, self.scale())
    }

    /// The artboard's rectangle on screen.
    pub fn artboard_screen_rect(&self) -> Rect {
        let origin = self.origin();
        let scale = self.scale();
        Rect::from_origin_size(
            origin,
            Size::new(self.artboard_size.width * scale, self.artboard_size.height * scale),
        )
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom level, keeping the region center fixed.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom <= 0.0 || !zoom.is_finite() {
            return;
        }
        let factor = zoom / self.zoom;
        self.zoom_at(self.region.center(), factor);
    }

    /// Zoom, keeping the artboard point under `screen_point` fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to artboard space before zoom
        let canvas_point = self.screen_to_canvas(screen_point);

        self.zoom = new_zoom;

        // Adjust pan so canvas_point stays at screen_point
        let new_screen = self.canvas_to_screen(canvas_point);
        self.pan += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Fit the artboard into the region again.
    pub fn fit(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0_f64.clamp(self.min_zoom, self.max_zoom);
    }

    /// Resize the screen region (e.g. on window resize).
    pub fn set_region(&mut self, region: Rect) {
        self.region = region;
    }

    /// Swap the artboard size (e.g. on format change).
    pub fn set_artboard_size(&mut self, size: Size) {
        self.artboard_size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 1080.0, 1080.0), Size::new(1080.0, 1080.0))
    }

    #[test]
    fn test_identity_mapping() {
        let vp = square();
        assert!((vp.base_scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(vp.origin(), Point::ZERO);
        let p = vp.screen_to_canvas(Point::new(100.0, 200.0));
        assert!((p.x - 100.0).abs() < f64::EPSILON);
        assert!((p.y - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_scale_fits_and_centers() {
        let vp = Viewport::new(Rect::new(0.0, 0.0, 800.0, 600.0), Size::new(1080.0, 1920.0));
        let expected = 600.0 / 1920.0;
        assert!((vp.base_scale() - expected).abs() < 1e-12);
        let rect = vp.artboard_screen_rect();
        assert!((rect.center().x - 400.0).abs() < 1e-9);
        assert!((rect.center().y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_mapping_only() {
        let mut vp = square();
        vp.pan(Vec2::new(40.0, -10.0));
        let p = vp.screen_to_canvas(Point::new(140.0, 90.0));
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = square();
        vp.zoom_at(Point::ZERO, 0.001);
        assert!((vp.zoom() - vp.min_zoom).abs() < f64::EPSILON);

        vp.zoom_at(Point::ZERO, 1000.0);
        assert!((vp.zoom() - vp.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_at_keeps_anchor_fixed() {
        let mut vp = square();
        vp.pan(Vec2::new(25.0, 35.0));
        let anchor = Point::new(300.0, 420.0);
        let before = vp.screen_to_canvas(anchor);
        vp.zoom_at(anchor, 1.5);
        let after = vp.screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_set_zoom_ignores_nonsense() {
        let mut vp = square();
        vp.set_zoom(-1.0);
        vp.set_zoom(f64::NAN);
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
        vp.set_zoom(1.5);
        assert!((vp.zoom() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_at_ignores_bad_factor() {
        let mut vp = square();
        let anchor = Point::new(300.0, 420.0);
        vp.zoom_at(anchor, f64::NAN);
        vp.zoom_at(anchor, f64::INFINITY);
        vp.zoom_at(anchor, 0.0);
        vp.zoom_at(anchor, -2.0);
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
        let p = vp.screen_to_canvas(anchor);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_roundtrip_with_pan_and_zoom() {
        let mut vp = Viewport::new(Rect::new(200.0, 60.0, 1400.0, 900.0), Size::new(1200.0, 630.0));
        vp.pan(Vec2::new(-30.0, 12.0));
        vp.set_zoom(1.7);
        let original = Point::new(512.0, 333.0);
        let back = vp.canvas_to_screen(vp.screen_to_canvas(original));
        assert!((back.x - original.x).abs() < 1e-9);
        assert!((back.y - original.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_resets() {
        let mut vp = square();
        vp.pan(Vec2::new(5.0, 5.0));
        vp.set_zoom(2.0);
        vp.fit();
        assert_eq!(vp.pan, Vec2::ZERO);
        assert!((vp.zoom() - 1.0).abs() < f64::EPSILON);
    }
}
