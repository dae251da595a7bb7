//! Screen-space display list built from the active scene.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Ellipse, Line, Point, Rect, RoundedRect};
use peniko::Color;
use postcraft_core::element::{Element, ElementId, ElementKind, TextAlign};
use postcraft_core::selection::HANDLE_SIZE;

/// Stroke width of the selection outline in screen pixels.
const SELECTION_STROKE_WIDTH: f64 = 1.5;

/// Outline of a shape element in screen space.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    Rect(RoundedRect),
    Ellipse(Ellipse),
    Line(Line),
}

/// One draw command, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// The artboard surface.
    Artboard { rect: Rect, color: Color },
    Shape {
        id: ElementId,
        geometry: ShapeGeometry,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    },
    Text {
        id: ElementId,
        rect: Rect,
        text: String,
        color: Color,
        /// Font size in screen pixels.
        font_size: f64,
        align: TextAlign,
        background: Option<Color>,
    },
    /// Image or SVG content, drawn from an already-resolved source.
    Media {
        id: ElementId,
        rect: Rect,
        source: String,
        is_svg: bool,
        background: Option<Color>,
    },
    SelectionOutline { rect: Rect, color: Color, width: f64 },
    Handle { rect: Rect, color: Color },
}

impl DisplayItem {
    /// Element this item draws, if any.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            DisplayItem::Shape { id, .. }
            | DisplayItem::Text { id, .. }
            | DisplayItem::Media { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Paint-ordered draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    /// Build the list: artboard, visible elements by z-order, then the
    /// selection outline and its handles.
    pub fn build(ctx: &RenderContext) -> Self {
        let mut items = vec![DisplayItem::Artboard {
            rect: ctx.to_screen(ctx.artboard.bounds()),
            color: ctx.artboard.background.into(),
        }];

        let screen_scale = ctx.viewport.scale() * ctx.scale_factor;
        items.extend(
            ctx.scene
                .elements_in_paint_order()
                .into_iter()
                .filter(|el| el.visible)
                .map(|el| element_item(el, ctx.to_screen(el.bounds()), screen_scale)),
        );

        if let Some(selected) = ctx.scene.selected_element().filter(|el| el.visible) {
            items.push(DisplayItem::SelectionOutline {
                rect: ctx.to_screen(selected.bounds()),
                color: ctx.selection_color,
                width: SELECTION_STROKE_WIDTH * ctx.scale_factor,
            });
        }

        let transform = ctx.transform();
        let half = HANDLE_SIZE * ctx.scale_factor / 2.0;
        items.extend(ctx.handles.iter().map(|handle| {
            let center = transform * handle.position;
            DisplayItem::Handle {
                rect: Rect::new(center.x - half, center.y - half, center.x + half, center.y + half),
                color: ctx.selection_color,
            }
        }));

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element ids in the order they are painted.
    pub fn element_order(&self) -> Vec<ElementId> {
        self.items.iter().filter_map(DisplayItem::element_id).collect()
    }
}

fn with_opacity(color: Color, opacity: Option<f64>) -> Color {
    match opacity {
        Some(opacity) => color.multiply_alpha(opacity.clamp(0.0, 1.0) as f32),
        None => color,
    }
}

fn element_item(el: &Element, rect: Rect, scale: f64) -> DisplayItem {
    let style = &el.style;
    let paint = |c: postcraft_core::element::Rgba| with_opacity(c.into(), style.opacity);
    let background = style.background.map(paint);
    match el.kind() {
        ElementKind::Text => DisplayItem::Text {
            id: el.id(),
            rect,
            text: el.content.clone(),
            color: paint(style.color.unwrap_or(postcraft_core::element::Rgba::black())),
            font_size: style
                .font_size
                .unwrap_or(postcraft_core::element::DEFAULT_FONT_SIZE)
                * scale,
            align: style.text_align.unwrap_or_default(),
            background,
        },
        ElementKind::Image | ElementKind::Svg => DisplayItem::Media {
            id: el.id(),
            rect,
            source: el.content.clone(),
            is_svg: el.kind() == ElementKind::Svg,
            background,
        },
        ElementKind::Rectangle => DisplayItem::Shape {
            id: el.id(),
            geometry: ShapeGeometry::Rect(RoundedRect::from_rect(
                rect,
                style.border_radius.unwrap_or(0.0) * scale,
            )),
            fill: style.fill.map(paint),
            stroke: stroke(el, scale),
        },
        ElementKind::Circle => DisplayItem::Shape {
            id: el.id(),
            geometry: ShapeGeometry::Ellipse(Ellipse::from_rect(rect)),
            fill: style.fill.map(paint),
            stroke: stroke(el, scale),
        },
        ElementKind::Line => {
            let y = rect.center().y;
            let color = style.stroke.or(style.fill).map(paint);
            DisplayItem::Shape {
                id: el.id(),
                geometry: ShapeGeometry::Line(Line::new(Point::new(rect.x0, y), Point::new(rect.x1, y))),
                fill: None,
                stroke: color.map(|c| (c, style.stroke_width.unwrap_or(rect.height() / scale) * scale)),
            }
        }
    }
}

fn stroke(el: &Element, scale: f64) -> Option<(Color, f64)> {
    let color = el.style.stroke?;
    let width = el.style.stroke_width.unwrap_or(1.0);
    Some((with_opacity(color.into(), el.style.opacity), width * scale))
}

/// Backend that keeps the last frame's display list. Used headless and as
/// the input for drawing backends living outside this crate.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    last_frame: DisplayList,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> &DisplayList {
        &self.last_frame
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let region = ctx.viewport.region;
        if region.width() <= 0.0 || region.height() <= 0.0 {
            return Err(RendererError::Surface(format!(
                "viewport region {region:?} has no area"
            )));
        }
        self.last_frame = DisplayList::build(ctx);
        log::trace!("Built display list with {} items", self.last_frame.len());
        Ok(())
    }
}
