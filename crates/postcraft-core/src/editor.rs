//! The editor: artboard, viewport, pages, tools and gestures behind one
//! pointer-event entry point.

use crate::artboard::{Artboard, ArtboardFormat};
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::{ConfigError, EditorConfig};
use crate::controller::{ManipulationController, ManipulationPhase, PointerCapture};
use crate::element::{Element, ElementDraft, ElementId, ElementPatch, Rgba};
use crate::input::{MouseButton, PointerEvent, PointerTarget, scroll_zoom_factor};
use crate::pages::{PageBridge, PageId};
use crate::scene::SceneStore;
use crate::selection::{HANDLE_HIT_TOLERANCE, Handle, handles_for, hit_test_handles};
use crate::tools::{ColorFeedback, ToolContext, ToolKind, ToolManager, ToolOutcome};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResponse {
    /// Nothing changed.
    Ignored,
    /// An element was selected by clicking it.
    Selected(ElementId),
    /// A click on empty artboard went to the active tool.
    Tool(ToolOutcome),
    /// The manipulated element's geometry changed.
    Manipulated(ElementId),
    /// A move or resize gesture ended.
    GestureEnded(ElementId),
    /// The viewport mapping changed.
    ViewportChanged,
}

/// A complete editing session.
pub struct Editor {
    config: EditorConfig,
    artboard: Artboard,
    viewport: Viewport,
    pages: PageBridge,
    tools: ToolManager,
    controller: ManipulationController,
    clipboard: Box<dyn Clipboard>,
    /// Last screen position of an active pan drag.
    pan_anchor: Option<Point>,
}

impl Editor {
    /// Create an editor showing `artboard` inside the screen `region`.
    pub fn new(config: EditorConfig, artboard: Artboard, region: Rect) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, artboard, region))
    }

    /// Editor with the default configuration.
    pub fn with_artboard(artboard: Artboard, region: Rect) -> Self {
        Self::build(EditorConfig::default(), artboard, region)
    }

    fn build(config: EditorConfig, artboard: Artboard, region: Rect) -> Self {
        let viewport = Viewport::new(region, artboard.size())
            .with_zoom_range(config.min_zoom, config.max_zoom);
        Self {
            pages: PageBridge::new(&config),
            controller: ManipulationController::new(&config),
            tools: ToolManager::new(),
            clipboard: Box::new(MemoryClipboard::new()),
            pan_anchor: None,
            config,
            artboard,
            viewport,
        }
    }

    /// Use `clipboard` for the color picker.
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn artboard(&self) -> &Artboard {
        &self.artboard
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn pages(&self) -> &PageBridge {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut PageBridge {
        &mut self.pages
    }

    /// The active page's scene.
    pub fn scene(&self) -> &SceneStore {
        self.pages.scene()
    }

    pub fn scene_mut(&mut self) -> &mut SceneStore {
        self.pages.scene_mut()
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    /// Change the artboard format. Elements keep their coordinates.
    pub fn set_artboard_format(&mut self, format: ArtboardFormat) {
        self.artboard.format = format;
        self.viewport.set_artboard_size(self.artboard.size());
    }

    pub fn set_background(&mut self, background: Rgba) {
        self.artboard.background = background;
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Switch tools. Any gesture in progress keeps running.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    pub fn set_tool_id(&mut self, id: &str) {
        self.tools.set_tool_id(id);
    }

    pub fn color_feedback(&self, now: Instant) -> Option<&ColorFeedback> {
        self.tools.feedback(now)
    }

    /// Drop expired transient state. Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.tools.expire_feedback(now)
    }

    pub fn manipulation_phase(&self) -> ManipulationPhase {
        self.controller.phase()
    }

    /// Capture hosts should honor while a gesture runs.
    pub fn pointer_capture(&self) -> &PointerCapture {
        self.controller.capture()
    }

    /// The selected element, if it can be manipulated.
    fn manipulable_selection(&self) -> Option<&Element> {
        self.scene()
            .selected_element()
            .filter(|el| !el.locked && el.visible)
    }

    /// Resize handles to draw: only for a selected, unlocked element.
    pub fn handles(&self) -> Vec<Handle> {
        self.manipulable_selection()
            .map(handles_for)
            .unwrap_or_default()
    }

    /// What lies under a screen point. Handles of the selection win over
    /// element bodies.
    pub fn target_at(&self, screen: Point) -> PointerTarget {
        let canvas = self.viewport.screen_to_canvas(screen);
        let tolerance = HANDLE_HIT_TOLERANCE / self.viewport.scale();
        if let Some(el) = self.manipulable_selection() {
            if let Some(corner) = hit_test_handles(el, canvas, tolerance) {
                return PointerTarget::Handle(el.id(), corner);
            }
        }
        match self.scene().hit_test(canvas) {
            Some(id) => PointerTarget::Element(id),
            None => PointerTarget::Artboard,
        }
    }

    /// Feed one pointer event (screen coordinates).
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) -> EventResponse {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, now),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                button: MouseButton::Left,
                ..
            }
            | PointerEvent::Leave => self.pointer_up(),
            PointerEvent::Up { .. } => EventResponse::Ignored,
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => {
                if modifiers.command() {
                    self.viewport.zoom_at(position, scroll_zoom_factor(delta));
                } else {
                    self.viewport.pan(delta);
                }
                EventResponse::ViewportChanged
            }
        }
    }

    fn pointer_down(&mut self, position: Point, button: MouseButton, now: Instant) -> EventResponse {
        if button != MouseButton::Left {
            return EventResponse::Ignored;
        }

        let canvas = self.viewport.screen_to_canvas(position);
        match self.tools.current_tool {
            ToolKind::Hand => {
                self.pan_anchor = Some(position);
                return EventResponse::Ignored;
            }
            ToolKind::ColorPicker => return self.tool_click(canvas, now),
            _ => {}
        }

        match self.target_at(position) {
            PointerTarget::Handle(id, corner) => {
                let scene = self.pages.scene();
                if self.controller.begin_resize(scene, id, corner, canvas) {
                    log::debug!("Resize {} of {id} started", corner.as_str());
                }
                EventResponse::Selected(id)
            }
            PointerTarget::Element(id) => {
                self.pages.scene_mut().select(Some(id));
                if self.controller.begin_move(self.pages.scene(), id, canvas) {
                    log::debug!("Move of {id} started");
                }
                EventResponse::Selected(id)
            }
            PointerTarget::Artboard => self.tool_click(canvas, now),
        }
    }

    fn tool_click(&mut self, canvas: Point, now: Instant) -> EventResponse {
        let ctx = ToolContext {
            scene: self.pages.scene_mut(),
            artboard: &self.artboard,
            clipboard: self.clipboard.as_mut(),
            config: &self.config,
            now,
        };
        EventResponse::Tool(self.tools.click(ctx, canvas))
    }

    fn pointer_move(&mut self, position: Point) -> EventResponse {
        if let Some(id) = self.controller.target() {
            let canvas = self.viewport.screen_to_canvas(position);
            if self.controller.pointer_move(self.pages.scene_mut(), canvas) {
                return EventResponse::Manipulated(id);
            }
            return EventResponse::Ignored;
        }
        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan(position - anchor);
            self.pan_anchor = Some(position);
            return EventResponse::ViewportChanged;
        }
        EventResponse::Ignored
    }

    fn pointer_up(&mut self) -> EventResponse {
        self.pan_anchor = None;
        match self.controller.pointer_up() {
            Some(state) => {
                log::debug!("Gesture on {} ended", state.element_id);
                EventResponse::GestureEnded(state.element_id)
            }
            None => EventResponse::Ignored,
        }
    }

    /// Abort the running gesture, restoring the element.
    pub fn cancel_manipulation(&mut self) {
        self.controller.cancel(self.pages.scene_mut());
        self.pan_anchor = None;
    }

    /// Add an element to the active page.
    pub fn add_element(&mut self, draft: ElementDraft) -> ElementId {
        self.scene_mut().add(draft)
    }

    /// Patch an element. A gesture running on it ends first, so the gesture
    /// and the update are separate undo steps.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if self.controller.target() == Some(id) {
            self.pointer_up();
        }
        self.scene_mut().update(id, patch)
    }

    pub fn remove_element(&mut self, id: ElementId) -> bool {
        if self.controller.target() == Some(id) {
            self.cancel_manipulation();
        }
        self.scene_mut().remove(id).is_some()
    }

    /// Remove the selected element.
    pub fn delete_selected(&mut self) -> bool {
        match self.scene().selected() {
            Some(id) => self.remove_element(id),
            None => false,
        }
    }

    /// Duplicate the selected element and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.scene().selected()?;
        let copy = self.scene_mut().duplicate(id)?;
        self.scene_mut().select(Some(copy));
        Some(copy)
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.scene_mut().bring_to_front(id)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.scene_mut().send_to_back(id)
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_manipulation();
        self.scene_mut().undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_manipulation();
        self.scene_mut().redo()
    }

    pub fn add_page(&mut self) -> PageId {
        self.pages.add_page()
    }

    pub fn switch_page(&mut self, page: PageId) -> bool {
        self.cancel_manipulation();
        self.pages.switch_page(page)
    }

    pub fn remove_page(&mut self, page: PageId) -> bool {
        if page == self.pages.active_page() {
            self.cancel_manipulation();
        }
        self.pages.remove_page(page)
    }
}
