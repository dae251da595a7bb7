//! Pure coordinate transforms between screen space and artboard space.
//!
//! Every pointer handler in the engine converts through [`screen_to_canvas`]
//! (usually via [`crate::Viewport`]); nothing else does ad hoc coordinate math.

use kurbo::{Point, Size, Vec2};

/// Convert a screen point to artboard-local coordinates.
///
/// `origin` is the screen position of the artboard's top-left corner and
/// `zoom` the effective screen scale. `zoom` must be positive.
pub fn screen_to_canvas(screen: Point, origin: Point, zoom: f64) -> Point {
    Point::new((screen.x - origin.x) / zoom, (screen.y - origin.y) / zoom)
}

/// Convert an artboard-local point back to screen coordinates.
pub fn canvas_to_screen(canvas: Point, origin: Point, zoom: f64) -> Point {
    Point::new(canvas.x * zoom + origin.x, canvas.y * zoom + origin.y)
}

/// Convert a screen-space delta to an artboard-space delta.
pub fn screen_delta_to_canvas(delta: Vec2, zoom: f64) -> Vec2 {
    Vec2::new(delta.x / zoom, delta.y / zoom)
}

/// Clamp a top-left position so an element of `element` size stays on an
/// artboard of `artboard` size.
///
/// Each axis is clamped to `[0, artboard - element]`. When the element is
/// larger than the artboard the lower bound wins, so the origin is never
/// negative.
pub fn clamp_to_artboard(point: Point, element: Size, artboard: Size) -> Point {
    let max_x = artboard.width - element.width;
    let max_y = artboard.height - element.height;
    Point::new(point.x.min(max_x).max(0.0), point.y.min(max_y).max(0.0))
}

/// Clamp both axes to be non-negative.
pub fn clamp_non_negative(point: Point) -> Point {
    Point::new(point.x.max(0.0), point.y.max(0.0))
}

/// Top-left position that centers an element of `size` on `center`.
pub fn centered_at(center: Point, size: Size) -> Point {
    Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
}
