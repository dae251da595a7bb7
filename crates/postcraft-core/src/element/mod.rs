//! Element definitions for the artboard.

mod patch;
mod style;

pub use patch::ElementPatch;
pub use style::{ColorParseError, Rgba, Style, TextAlign};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Placeholder shown by freshly inserted text elements.
pub const TEXT_PLACEHOLDER: &str = "Double-click to edit";

/// Default font size for new text, in artboard pixels.
pub const DEFAULT_FONT_SIZE: f64 = 18.0;

/// Minimum hit-test thickness for thin elements such as lines.
const MIN_HIT_THICKNESS: f64 = 8.0;

const DARK: Rgba = Rgba::rgb(0x1f, 0x29, 0x37);
const NEUTRAL_FILL: Rgba = Rgba::rgb(0xd1, 0xd5, 0xdb);

/// The type of a placed element. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Rectangle,
    Circle,
    Line,
    Svg,
}

impl ElementKind {
    /// Identifier used in serialized scenes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Svg => "svg",
        }
    }

    /// Get all element kinds.
    pub fn all() -> &'static [ElementKind] {
        &[
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::Rectangle,
            ElementKind::Circle,
            ElementKind::Line,
            ElementKind::Svg,
        ]
    }

    /// Style a new element of this kind starts with.
    pub fn default_style(&self) -> Style {
        match self {
            ElementKind::Text => Style {
                color: Some(DARK),
                font_size: Some(DEFAULT_FONT_SIZE),
                ..Default::default()
            },
            ElementKind::Rectangle | ElementKind::Circle => Style {
                fill: Some(NEUTRAL_FILL),
                ..Default::default()
            },
            ElementKind::Line => Style {
                stroke: Some(DARK),
                stroke_width: Some(2.0),
                ..Default::default()
            },
            ElementKind::Image | ElementKind::Svg => Style::default(),
        }
    }

    /// Content a new element of this kind starts with.
    pub fn default_content(&self) -> String {
        match self {
            ElementKind::Text => TEXT_PLACEHOLDER.to_string(),
            _ => String::new(),
        }
    }
}

/// Everything needed to create an element; the scene store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDraft {
    pub kind: ElementKind,
    pub position: Point,
    pub size: Size,
    pub content: Option<String>,
    pub style: Option<Style>,
    /// `None` places the element above everything already in the scene.
    pub z_index: Option<i32>,
    pub locked: bool,
    pub visible: bool,
}

impl ElementDraft {
    /// Create a draft with per-kind defaults for everything but geometry.
    pub fn new(kind: ElementKind, position: Point, size: Size) -> Self {
        Self {
            kind,
            position,
            size,
            content: None,
            style: None,
            z_index: None,
            locked: false,
            visible: true,
        }
    }

    /// Text element with the given content.
    pub fn text(position: Point, size: Size, content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text, position, size).with_content(content)
    }

    /// Image element pointing at an already-resolved URL.
    pub fn image(position: Point, size: Size, url: impl Into<String>) -> Self {
        Self::new(ElementKind::Image, position, size).with_content(url)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Style merged over the kind's defaults.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A placed visual primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    #[serde(rename = "type")]
    pub(crate) kind: ElementKind,
    /// Top-left corner in artboard pixels, never negative.
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Text string, or image/SVG URL or inline markup.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: Style,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// Build an element from a draft. Missing fields take the kind's defaults.
    pub(crate) fn from_draft(id: ElementId, z_index: i32, draft: ElementDraft) -> Self {
        let mut style = draft.kind.default_style();
        if let Some(custom) = &draft.style {
            style.merge(custom);
        }
        Self {
            id,
            kind: draft.kind,
            position: crate::geometry::clamp_non_negative(draft.position),
            size: non_negative_size(draft.size),
            z_index: draft.z_index.unwrap_or(z_index),
            locked: draft.locked,
            visible: draft.visible,
            content: draft.content.unwrap_or_else(|| draft.kind.default_content()),
            style,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Bounding box in artboard coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if an artboard point hits this element.
    ///
    /// Invisible elements never hit. Thin elements get a minimum thickness so
    /// a 2px line is still clickable.
    pub fn hit_test(&self, point: Point) -> bool {
        if !self.visible {
            return false;
        }
        let bounds = self.bounds();
        let pad_x = ((MIN_HIT_THICKNESS - bounds.width()) / 2.0).max(0.0);
        let pad_y = ((MIN_HIT_THICKNESS - bounds.height()) / 2.0).max(0.0);
        let area = bounds.inflate(pad_x, pad_y);
        area.x0 <= point.x && point.x <= area.x1 && area.y0 <= point.y && point.y <= area.y1
    }

    /// The color a color picker reads from this element.
    ///
    /// Text reports its text color, shapes their fill, lines their stroke,
    /// images and SVGs their background if one is set.
    pub fn sample_color(&self) -> Option<Rgba> {
        match self.kind {
            ElementKind::Text => self.style.color,
            ElementKind::Rectangle | ElementKind::Circle => self.style.fill,
            ElementKind::Line => self.style.stroke.or(self.style.fill),
            ElementKind::Image | ElementKind::Svg => self.style.background,
        }
    }

    /// Shallow-merge a patch. Geometry is clamped (position non-negative,
    /// size non-negative); the kind and id never change.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(position) = patch.position {
            self.position = crate::geometry::clamp_non_negative(position);
        }
        if let Some(size) = patch.size {
            self.size = non_negative_size(size);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(style) = &patch.style {
            self.style.merge(style);
        }
    }

    /// Copy of this element under a new id, shifted by `offset`.
    pub(crate) fn duplicate(&self, id: ElementId, offset: kurbo::Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy.position = crate::geometry::clamp_non_negative(self.position + offset);
        copy
    }
}

pub(crate) fn non_negative_size(size: Size) -> Size {
    Size::new(size.width.max(0.0), size.height.max(0.0))
}
