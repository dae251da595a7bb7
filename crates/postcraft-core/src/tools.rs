//! Tool system: what a click or drag on empty artboard does.

use crate::artboard::Artboard;
use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::element::{ElementDraft, ElementId, ElementKind, Rgba};
use crate::geometry::{centered_at, clamp_to_artboard};
use crate::scene::SceneStore;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Selection,
    DirectSelection,
    Hand,
    ColorPicker,
    Text,
    Line,
    Stroke,
    Page,
}

impl ToolKind {
    /// Map a toolbar identifier to a tool. Unknown identifiers act as the
    /// selection tool.
    pub fn from_id(id: &str) -> Self {
        match id {
            "selection" => ToolKind::Selection,
            "direct-selection" => ToolKind::DirectSelection,
            "hand" => ToolKind::Hand,
            "color-picker" => ToolKind::ColorPicker,
            "text" => ToolKind::Text,
            "line" => ToolKind::Line,
            "stroke" => ToolKind::Stroke,
            "page" => ToolKind::Page,
            other => {
                log::debug!("Unknown tool '{other}', using selection");
                ToolKind::Selection
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Selection => "selection",
            ToolKind::DirectSelection => "direct-selection",
            ToolKind::Hand => "hand",
            ToolKind::ColorPicker => "color-picker",
            ToolKind::Text => "text",
            ToolKind::Line => "line",
            ToolKind::Stroke => "stroke",
            ToolKind::Page => "page",
        }
    }

    /// Whether dragging empty artboard with this tool pans the viewport.
    pub fn pans(&self) -> bool {
        matches!(self, ToolKind::Hand)
    }
}

/// Transient notice shown after the color picker copied a color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFeedback {
    pub color: Rgba,
    /// Whether the hex string reached the clipboard.
    pub copied: bool,
    pub expires_at: Instant,
}

impl ColorFeedback {
    pub fn new(color: Rgba, copied: bool, now: Instant, duration: Duration) -> Self {
        Self {
            color,
            copied,
            expires_at: now + duration,
        }
    }

    pub fn hex(&self) -> String {
        self.color.to_hex()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Result of a click on empty artboard.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Nothing happened.
    None,
    SelectionCleared,
    /// A new element was inserted and selected.
    Inserted(ElementId),
    /// The color picker read a color.
    ColorSampled { color: Rgba, copied: bool },
}

/// Everything a tool click may touch.
pub struct ToolContext<'a> {
    pub scene: &'a mut SceneStore,
    pub artboard: &'a Artboard,
    pub clipboard: &'a mut dyn Clipboard,
    pub config: &'a EditorConfig,
    pub now: Instant,
}

/// Manages the current tool and the color picker's feedback.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    feedback: Option<ColorFeedback>,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Elements are not affected.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.current_tool {
            log::debug!("Tool {} -> {}", self.current_tool.as_str(), tool.as_str());
        }
        self.current_tool = tool;
    }

    /// Set the current tool by toolbar identifier.
    pub fn set_tool_id(&mut self, id: &str) {
        self.set_tool(ToolKind::from_id(id));
    }

    /// Current color feedback, if it has not expired.
    pub fn feedback(&self, now: Instant) -> Option<&ColorFeedback> {
        self.feedback.as_ref().filter(|f| !f.is_expired(now))
    }

    /// Drop expired feedback. Returns true if something was dropped.
    pub fn expire_feedback(&mut self, now: Instant) -> bool {
        if self.feedback.as_ref().is_some_and(|f| f.is_expired(now)) {
            self.feedback = None;
            return true;
        }
        false
    }

    /// Handle a click at `point` (artboard coordinates) that hit no element
    /// handle and, except for the color picker, no element.
    pub fn click(&mut self, ctx: ToolContext<'_>, point: Point) -> ToolOutcome {
        match self.current_tool {
            ToolKind::Hand => ToolOutcome::None,
            ToolKind::ColorPicker => self.sample_color(ctx, point),
            ToolKind::Text => {
                let size = ctx.config.text_default_size;
                insert_centered(ctx, ElementDraft::new(ElementKind::Text, Point::ZERO, size), point)
            }
            ToolKind::Line => {
                let size = ctx.config.line_default_size;
                insert_centered(ctx, ElementDraft::new(ElementKind::Line, Point::ZERO, size), point)
            }
            ToolKind::Selection | ToolKind::DirectSelection | ToolKind::Stroke | ToolKind::Page => {
                ctx.scene.select(None);
                ToolOutcome::SelectionCleared
            }
        }
    }

    fn sample_color(&mut self, ctx: ToolContext<'_>, point: Point) -> ToolOutcome {
        let color = ctx
            .scene
            .hit_test(point)
            .and_then(|id| ctx.scene.get(id))
            .and_then(|el| el.sample_color())
            .unwrap_or(ctx.artboard.background);

        let hex = color.to_hex();
        let copied = match ctx.clipboard.set_text(&hex) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to copy color {hex}: {e}");
                false
            }
        };
        self.feedback = Some(ColorFeedback::new(
            color,
            copied,
            ctx.now,
            ctx.config.color_feedback_duration(),
        ));
        ToolOutcome::ColorSampled { color, copied }
    }
}

fn insert_centered(ctx: ToolContext<'_>, mut draft: ElementDraft, point: Point) -> ToolOutcome {
    let position = centered_at(point, draft.size);
    draft.position = clamp_to_artboard(position, draft.size, ctx.artboard.size());
    let id = ctx.scene.add(draft);
    ctx.scene.select(Some(id));
    ToolOutcome::Inserted(id)
}
