//! Drag and resize gestures on a single element.

use crate::config::EditorConfig;
use crate::element::{ElementId, ElementPatch};
use crate::scene::{SceneStore, Snapshot};
use crate::selection::{Corner, ManipulationKind, ManipulationState};
use kurbo::{Point, Size, Vec2};
use std::cell::Cell;
use std::rc::Rc;

/// Shared count of outstanding pointer captures.
///
/// Hosts poll [`is_active`](Self::is_active) to decide whether pointer
/// events outside the artboard should still be routed to the editor.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    count: Rc<Cell<usize>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a capture; it is released when the guard drops.
    pub fn acquire(&self) -> PointerCaptureGuard {
        self.count.set(self.count.get() + 1);
        PointerCaptureGuard {
            count: Rc::clone(&self.count),
        }
    }

    pub fn is_active(&self) -> bool {
        self.count.get() > 0
    }

    pub fn count(&self) -> usize {
        self.count.get()
    }
}

/// Releases its pointer capture on drop.
#[derive(Debug)]
pub struct PointerCaptureGuard {
    count: Rc<Cell<usize>>,
}

impl Drop for PointerCaptureGuard {
    fn drop(&mut self) {
        self.count.set(self.count.get().saturating_sub(1));
    }
}

/// What the controller is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationPhase {
    Idle,
    Moving,
    Resizing(Corner),
}

#[derive(Debug)]
struct ActiveManipulation {
    state: ManipulationState,
    /// Redo states cleared when the gesture recorded its undo state. `None`
    /// until the first movement.
    recorded: Option<Vec<Snapshot>>,
    _capture: PointerCaptureGuard,
}

/// Drives one move or resize gesture at a time.
///
/// Every pointer move recomputes the geometry from the state captured at
/// pointer-down, so rounding never accumulates. A gesture records exactly one
/// undo state, on its first actual movement.
#[derive(Debug)]
pub struct ManipulationController {
    active: Option<ActiveManipulation>,
    capture: PointerCapture,
    min_size: Size,
}

impl Default for ManipulationController {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ManipulationController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            active: None,
            capture: PointerCapture::new(),
            min_size: config.min_element_size,
        }
    }

    pub fn phase(&self) -> ManipulationPhase {
        match self.active.as_ref().map(|a| a.state.kind) {
            None => ManipulationPhase::Idle,
            Some(ManipulationKind::Move) => ManipulationPhase::Moving,
            Some(ManipulationKind::Resize(corner)) => ManipulationPhase::Resizing(corner),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The capture handle hosts can watch.
    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    pub fn state(&self) -> Option<&ManipulationState> {
        self.active.as_ref().map(|a| &a.state)
    }

    /// Id of the element being manipulated.
    pub fn target(&self) -> Option<ElementId> {
        self.state().map(|s| s.element_id)
    }

    /// Start dragging `id` from `point` (artboard coordinates).
    pub fn begin_move(&mut self, scene: &SceneStore, id: ElementId, point: Point) -> bool {
        self.begin(scene, id, ManipulationKind::Move, point)
    }

    /// Start resizing `id` by its `corner` handle from `point`.
    pub fn begin_resize(
        &mut self,
        scene: &SceneStore,
        id: ElementId,
        corner: Corner,
        point: Point,
    ) -> bool {
        self.begin(scene, id, ManipulationKind::Resize(corner), point)
    }

    fn begin(
        &mut self,
        scene: &SceneStore,
        id: ElementId,
        kind: ManipulationKind,
        point: Point,
    ) -> bool {
        let Some(element) = scene.get(id) else {
            return false;
        };
        if element.locked || !element.visible {
            log::debug!("Refusing to manipulate locked or hidden element {id}");
            return false;
        }
        // Replacing an active gesture releases its capture.
        self.active = Some(ActiveManipulation {
            state: ManipulationState::new(element, kind, point),
            recorded: None,
            _capture: self.capture.acquire(),
        });
        true
    }

    /// Feed a pointer position (artboard coordinates). Returns true if the
    /// scene changed.
    ///
    /// A target that is gone, locked or hidden ends the gesture, keeping
    /// what it did so far.
    pub fn pointer_move(&mut self, scene: &mut SceneStore, point: Point) -> bool {
        let Some(id) = self.target() else {
            return false;
        };
        if !scene.get(id).is_some_and(|el| !el.locked && el.visible) {
            log::debug!("Ending gesture on {id}: element is no longer manipulable");
            self.active = None;
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.state.current_point = point;
        if active.recorded.is_none() {
            if active.state.delta() == Vec2::ZERO {
                return false;
            }
            active.recorded = Some(scene.record_undo());
        }
        let patch = active.state.patch(self.min_size);
        scene.apply_patch(id, &patch)
    }

    /// Finish the gesture, keeping its result.
    pub fn pointer_up(&mut self) -> Option<ManipulationState> {
        self.active.take().map(|active| active.state)
    }

    /// Abort the gesture and put the element back where it started.
    pub fn cancel(&mut self, scene: &mut SceneStore) {
        let Some(active) = self.active.take() else {
            return;
        };
        if let Some(redo) = active.recorded {
            let state = &active.state;
            let restore = ElementPatch::geometry(state.start_position, state.start_size);
            scene.apply_patch(state.element_id, &restore);
            scene.discard_undo(redo);
        }
    }
}
