//! Selection handles and the move/resize math behind direct manipulation.
//!
//! Everything here is pure: given the geometry captured when a gesture
//! started and the cumulative pointer delta, compute the new geometry.

use crate::element::{Element, ElementId, ElementPatch};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 12.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "nw")]
    TopLeft,
    #[serde(rename = "ne")]
    TopRight,
    #[serde(rename = "sw")]
    BottomLeft,
    #[serde(rename = "se")]
    BottomRight,
}

impl Corner {
    /// Compass name (`nw`, `ne`, `sw`, `se`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "nw",
            Corner::TopRight => "ne",
            Corner::BottomLeft => "sw",
            Corner::BottomRight => "se",
        }
    }

    pub fn all() -> [Corner; 4] {
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ]
    }

    /// Whether dragging this corner moves the left edge.
    pub fn moves_left_edge(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Whether dragging this corner moves the top edge.
    pub fn moves_top_edge(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// The corner's location on a bounding box.
    pub fn point_on(&self, position: Point, size: Size) -> Point {
        let x = if self.moves_left_edge() {
            position.x
        } else {
            position.x + size.width
        };
        let y = if self.moves_top_edge() {
            position.y
        } else {
            position.y + size.height
        };
        Point::new(x, y)
    }
}

/// A resize handle with its position (artboard coordinates) and corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub position: Point,
    pub corner: Corner,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, corner: Corner) -> Self {
        Self { position, corner }
    }

    /// Check if a point (in artboard coordinates) hits this handle.
    /// `tolerance` should be adjusted for the viewport scale.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// The four corner handles of an element.
pub fn handles_for(element: &Element) -> Vec<Handle> {
    Corner::all()
        .into_iter()
        .map(|corner| Handle::new(corner.point_on(element.position, element.size), corner))
        .collect()
}

/// Find which corner handle (if any) is hit at the given point.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<Corner> {
    handles_for(element)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.corner)
}

/// What a manipulation does to its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManipulationKind {
    Move,
    Resize(Corner),
}

/// State of an active manipulation.
///
/// Holds the geometry captured at pointer-down; every pointer move is
/// applied to this snapshot, never to the previous frame's result.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulationState {
    pub element_id: ElementId,
    pub kind: ManipulationKind,
    /// Starting point of the drag (artboard coordinates).
    pub start_point: Point,
    /// Current point of the drag (artboard coordinates).
    pub current_point: Point,
    pub start_position: Point,
    pub start_size: Size,
}

impl ManipulationState {
    /// Create a new manipulation state from the element's current geometry.
    pub fn new(element: &Element, kind: ManipulationKind, start_point: Point) -> Self {
        Self {
            element_id: element.id(),
            kind,
            start_point,
            current_point: start_point,
            start_position: element.position,
            start_size: element.size,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Geometry patch for the current pointer position.
    pub fn patch(&self, min_size: Size) -> ElementPatch {
        match self.kind {
            ManipulationKind::Move => {
                ElementPatch::default().with_position(apply_move(self.start_position, self.delta()))
            }
            ManipulationKind::Resize(corner) => {
                let (position, size) = apply_resize(
                    self.start_position,
                    self.start_size,
                    corner,
                    self.delta(),
                    min_size,
                );
                ElementPatch::geometry(position, size)
            }
        }
    }
}

/// New top-left after moving by `delta`, clamped to be non-negative.
pub fn apply_move(start_position: Point, delta: Vec2) -> Point {
    crate::geometry::clamp_non_negative(start_position + delta)
}

/// New geometry after dragging `corner` by `delta`.
///
/// | corner | width | height | x moves | y moves |
/// |--------|-------|--------|---------|---------|
/// | se     | +dx   | +dy    | no      | no      |
/// | sw     | -dx   | +dy    | +dx     | no      |
/// | ne     | +dx   | -dy    | no      | +dy     |
/// | nw     | -dx   | -dy    | +dx     | +dy     |
///
/// Sizes never drop below `min_size`. On an axis where the position moves,
/// the opposite edge is the anchor and stays put; the position never goes
/// negative, the size shrinks to the anchor instead.
pub fn apply_resize(
    start_position: Point,
    start_size: Size,
    corner: Corner,
    delta: Vec2,
    min_size: Size,
) -> (Point, Size) {
    let (x, width) = resize_axis(
        start_position.x,
        start_size.width,
        delta.x,
        corner.moves_left_edge(),
        min_size.width,
    );
    let (y, height) = resize_axis(
        start_position.y,
        start_size.height,
        delta.y,
        corner.moves_top_edge(),
        min_size.height,
    );
    (Point::new(x, y), Size::new(width, height))
}

fn resize_axis(start: f64, length: f64, delta: f64, moves_start: bool, min: f64) -> (f64, f64) {
    let start = start.max(0.0);
    if !moves_start {
        return (start, (length + delta).max(min));
    }
    let anchor = start + length;
    let length = (length - delta).max(min);
    let position = anchor - length;
    if position < 0.0 {
        (0.0, anchor.max(min))
    } else {
        (position, length)
    }
}
