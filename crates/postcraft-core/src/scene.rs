//! Scene store: the ordered elements of one page, selection and history.

use crate::config::EditorConfig;
use crate::element::{Element, ElementDraft, ElementId, ElementPatch, non_negative_size};
use crate::geometry::clamp_non_negative;
use kurbo::{Point, Vec2};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A history entry. Elements are shared between snapshots, so taking one
/// only clones pointers.
pub(crate) type Snapshot = Vec<Arc<Element>>;

/// The elements of the active page, in insertion order.
///
/// Insertion order is the scene order; paint order comes from `z_index`
/// with ties broken by insertion order. All mutations tolerate unknown ids.
#[derive(Debug, Clone)]
pub struct SceneStore {
    elements: Vec<Arc<Element>>,
    selected: Option<ElementId>,
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_history: usize,
    duplicate_offset: Vec2,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Create an empty scene with default settings.
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    /// Create an empty scene using the history cap and duplicate offset
    /// from `config`.
    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history: config.max_undo_history.max(1),
            duplicate_offset: config.duplicate_offset,
        }
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.record_undo();
    }

    /// Push current state to the undo stack and hand back the redo states
    /// it cleared, so an aborted gesture can put them back.
    pub(crate) fn record_undo(&mut self) -> Vec<Snapshot> {
        self.undo_stack.push_back(self.elements.clone());

        // Clear redo stack when new changes are made
        let redo = std::mem::take(&mut self.redo_stack);

        // Limit undo history size
        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
        redo
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.redo_stack.push(current);
        self.drop_dangling_selection();
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.undo_stack.push_back(current);
        self.drop_dangling_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Forget all undo/redo states.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop the most recent undo state without restoring it, and reinstate
    /// the redo states [`record_undo`](Self::record_undo) returned.
    pub(crate) fn discard_undo(&mut self, redo: Vec<Snapshot>) {
        self.undo_stack.pop_back();
        self.redo_stack = redo;
    }

    /// Add an element and return its new id. Selection is left alone.
    pub fn add(&mut self, draft: ElementDraft) -> ElementId {
        self.push_undo();
        let id = Uuid::new_v4();
        let z_index = self.top_z_index().map_or(0, |z| z.saturating_add(1));
        self.elements
            .push(Arc::new(Element::from_draft(id, z_index, draft)));
        log::debug!("Added element {id}");
        id
    }

    /// Shallow-merge `patch` into the element with `id`, recording history.
    /// Returns false (and records nothing) for unknown ids or empty patches.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if patch.is_empty() || self.index_of(id).is_none() {
            return false;
        }
        self.push_undo();
        self.apply_patch(id, patch)
    }

    /// Apply a patch without recording history.
    ///
    /// Gestures record one undo state and then stream patches through here,
    /// so a drag is one undo step.
    pub fn apply_patch(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        Arc::make_mut(&mut self.elements[index]).apply_patch(patch);
        true
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        self.push_undo();
        let removed = self.elements.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("Removed element {id}");
        Some(Arc::unwrap_or_clone(removed))
    }

    /// Clone an element under a new id, shifted by the duplicate offset, and
    /// append it. The original is untouched.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        let index = self.index_of(id)?;
        self.push_undo();
        let new_id = Uuid::new_v4();
        let copy = self.elements[index].duplicate(new_id, self.duplicate_offset);
        self.elements.push(Arc::new(copy));
        log::debug!("Duplicated element {id} as {new_id}");
        Some(new_id)
    }

    /// Set the selection. Selecting an id that is not in the scene is ignored.
    pub fn select(&mut self, id: Option<ElementId>) {
        match id {
            Some(id) if self.index_of(id).is_none() => {
                log::debug!("Ignoring selection of unknown element {id}");
            }
            _ => self.selected = id,
        }
    }

    /// Remove every element and the selection.
    pub fn clear(&mut self) {
        if self.elements.is_empty() {
            self.selected = None;
            return;
        }
        self.push_undo();
        self.elements.clear();
        self.selected = None;
    }

    /// Replace the contents wholesale and start a fresh history.
    ///
    /// Elements whose id already appeared earlier in `elements` are skipped.
    /// Negative positions and sizes are clamped to zero.
    pub fn load(&mut self, elements: Vec<Arc<Element>>) {
        self.elements = normalize_loaded(elements);
        self.selected = None;
        self.clear_history();
    }

    /// Cheap copy of the current elements (shares element storage).
    pub fn snapshot(&self) -> Vec<Arc<Element>> {
        self.elements.clone()
    }

    /// Move an element above every other element.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let Some(top) = self.top_z_index() else {
            return false;
        };
        match self.get(id) {
            Some(el) if el.z_index == top && self.z_index_unique(top) => false,
            Some(_) => self.update(id, &ElementPatch::default().with_z_index(top.saturating_add(1))),
            None => false,
        }
    }

    /// Move an element below every other element.
    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        let Some(bottom) = self.elements.iter().map(|el| el.z_index).min() else {
            return false;
        };
        match self.get(id) {
            Some(el) if el.z_index == bottom && self.z_index_unique(bottom) => false,
            Some(_) => {
                self.update(id, &ElementPatch::default().with_z_index(bottom.saturating_sub(1)))
            }
            None => false,
        }
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id).map(Arc::as_ref)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().map(Arc::as_ref)
    }

    /// Elements back to front: by `z_index`, ties in insertion order.
    pub fn elements_in_paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements().collect();
        // Stable sort keeps insertion order for equal z-indices.
        ordered.sort_by_key(|el| el.z_index);
        ordered
    }

    /// Topmost visible element under an artboard point.
    pub fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.elements_in_paint_order()
            .into_iter()
            .rev()
            .find(|el| el.hit_test(point))
            .map(Element::id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the elements to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let elements: Vec<&Element> = self.elements().collect();
        serde_json::to_string_pretty(&elements)
    }

    /// Replace the contents with elements parsed from JSON.
    pub fn load_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let elements: Vec<Element> = serde_json::from_str(json)?;
        self.load(elements.into_iter().map(Arc::new).collect());
        Ok(())
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id() == id)
    }

    fn top_z_index(&self) -> Option<i32> {
        self.elements.iter().map(|el| el.z_index).max()
    }

    fn z_index_unique(&self, z_index: i32) -> bool {
        self.elements.iter().filter(|el| el.z_index == z_index).count() == 1
    }

    fn drop_dangling_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.contains(id) {
                self.selected = None;
            }
        }
    }
}

/// Drop repeated ids and clamp geometry of elements that did not come
/// through [`SceneStore::add`]. Untouched elements keep their allocation.
pub(crate) fn normalize_loaded(elements: Vec<Arc<Element>>) -> Vec<Arc<Element>> {
    let mut seen = HashSet::with_capacity(elements.len());
    elements
        .into_iter()
        .filter(|el| {
            let fresh = seen.insert(el.id());
            if !fresh {
                log::warn!("Skipping duplicate element id {} on load", el.id());
            }
            fresh
        })
        .map(|mut el| {
            let position = clamp_non_negative(el.position);
            let size = non_negative_size(el.size);
            if position != el.position || size != el.size {
                log::warn!("Clamping negative geometry of element {} on load", el.id());
                let el = Arc::make_mut(&mut el);
                el.position = position;
                el.size = size;
            }
            el
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Rgba, Style};
    use kurbo::Size;

    fn rect_at(x: f64, y: f64) -> ElementDraft {
        ElementDraft::new(ElementKind::Rectangle, Point::new(x, y), Size::new(100.0, 100.0))
    }

    fn positions(scene: &SceneStore) -> Vec<Point> {
        scene.elements().map(|el| el.position).collect()
    }

    #[test]
    fn test_scene_creation() {
        let scene = SceneStore::new();
        assert!(scene.is_empty());
        assert!(scene.selected().is_none());
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_add_does_not_select() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(id).is_some());
        assert!(scene.selected().is_none());
    }

    #[test]
    fn test_add_stacks_on_top() {
        let mut scene = SceneStore::new();
        let a = scene.add(rect_at(0.0, 0.0));
        let b = scene.add(rect_at(10.0, 10.0));
        assert!(scene.get(b).unwrap().z_index > scene.get(a).unwrap().z_index);
    }

    #[test]
    fn test_update_is_partial() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(5.0, 5.0));
        assert!(scene.update(id, &ElementPatch::default().with_locked(true)));
        let el = scene.get(id).unwrap();
        assert!(el.locked);
        assert_eq!(el.position, Point::new(5.0, 5.0));
        assert_eq!(el.kind(), ElementKind::Rectangle);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut scene = SceneStore::new();
        scene.add(rect_at(0.0, 0.0));
        let before = scene.snapshot();
        let ghost = Uuid::new_v4();

        assert!(!scene.update(ghost, &ElementPatch::default().with_locked(true)));
        assert!(scene.remove(ghost).is_none());
        assert!(scene.duplicate(ghost).is_none());
        assert_eq!(scene.snapshot(), before);

        // Only the add is in history.
        assert!(scene.undo());
        assert!(!scene.undo());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.select(Some(id));
        assert!(scene.is_selected(id));

        scene.remove(id);
        assert!(scene.selected().is_none());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut scene = SceneStore::new();
        let a = scene.add(rect_at(0.0, 0.0));
        let b = scene.add(rect_at(0.0, 0.0));
        scene.select(Some(a));
        scene.remove(b);
        assert_eq!(scene.selected(), Some(a));
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.select(Some(id));
        scene.select(Some(Uuid::new_v4()));
        assert_eq!(scene.selected(), Some(id));
        scene.select(None);
        assert!(scene.selected().is_none());
    }

    #[test]
    fn test_duplicate_offsets_copy() {
        let mut scene = SceneStore::new();
        let style = Style::default().with_fill(Rgba::rgb(255, 0, 0));
        let id = scene.add(rect_at(20.0, 30.0).with_content("box").with_style(style));
        let copy_id = scene.duplicate(id).unwrap();

        assert_ne!(id, copy_id);
        let original = scene.get(id).unwrap();
        let copy = scene.get(copy_id).unwrap();
        assert_eq!(original.position, Point::new(20.0, 30.0));
        assert_eq!(copy.position, Point::new(30.0, 40.0));
        assert_eq!(copy.size, original.size);
        assert_eq!(copy.kind(), original.kind());
        assert_eq!(copy.content, original.content);
        assert_eq!(copy.style, original.style);
    }

    #[test]
    fn test_duplicate_uses_configured_offset() {
        let config = EditorConfig {
            duplicate_offset: Vec2::new(24.0, 0.0),
            ..Default::default()
        };
        let mut scene = SceneStore::with_config(&config);
        let id = scene.add(rect_at(0.0, 0.0));
        let copy = scene.duplicate(id).unwrap();
        assert_eq!(scene.get(copy).unwrap().position, Point::new(24.0, 0.0));
    }

    #[test]
    fn test_clear() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.add(rect_at(50.0, 50.0));
        scene.select(Some(id));
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.selected().is_none());

        assert!(scene.undo());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_undo_redo_add() {
        let mut scene = SceneStore::new();
        scene.add(rect_at(0.0, 0.0));
        let before = scene.snapshot();

        let id = scene.add(rect_at(50.0, 50.0));
        let after = scene.snapshot();

        assert!(scene.undo());
        assert_eq!(scene.snapshot(), before);
        assert!(scene.can_redo());

        assert!(scene.redo());
        assert_eq!(scene.snapshot(), after);
        assert!(scene.get(id).is_some());
    }

    #[test]
    fn test_undo_clears_dangling_selection() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.select(Some(id));
        assert!(scene.undo());
        assert!(scene.selected().is_none());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut scene = SceneStore::new();
        scene.add(rect_at(0.0, 0.0));
        assert!(scene.undo());
        assert!(scene.can_redo());

        scene.add(rect_at(10.0, 10.0));
        assert!(!scene.can_redo());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut scene = SceneStore::new();
        assert!(!scene.undo());
        assert!(!scene.redo());
    }

    #[test]
    fn test_history_is_capped() {
        let config = EditorConfig {
            max_undo_history: 3,
            ..Default::default()
        };
        let mut scene = SceneStore::with_config(&config);
        for i in 0..10 {
            scene.add(rect_at(f64::from(i), 0.0));
        }
        let mut undone = 0;
        while scene.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(scene.len(), 7);
    }

    #[test]
    fn test_snapshots_share_untouched_elements() {
        let mut scene = SceneStore::new();
        let a = scene.add(rect_at(0.0, 0.0));
        let b = scene.add(rect_at(0.0, 0.0));
        let before = scene.snapshot();
        scene.update(b, &ElementPatch::default().with_position(Point::new(9.0, 9.0)));
        let after = scene.snapshot();

        let a_before = before.iter().find(|el| el.id() == a).unwrap();
        let a_after = after.iter().find(|el| el.id() == a).unwrap();
        assert!(Arc::ptr_eq(a_before, a_after));
    }

    #[test]
    fn test_apply_patch_skips_history() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.clear_history();
        assert!(scene.apply_patch(id, &ElementPatch::default().with_position(Point::new(5.0, 5.0))));
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_paint_order_and_hit_test() {
        let mut scene = SceneStore::new();
        let low = scene.add(rect_at(0.0, 0.0).with_z_index(5));
        let high = scene.add(rect_at(50.0, 50.0).with_z_index(5));
        let hidden = scene.add(rect_at(50.0, 50.0).with_z_index(9).visible(false));

        // Equal z: later insertion is on top.
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0)), Some(high));
        assert_eq!(scene.hit_test(Point::new(25.0, 25.0)), Some(low));
        assert_eq!(scene.hit_test(Point::new(500.0, 500.0)), None);

        let order: Vec<ElementId> = scene.elements_in_paint_order().iter().map(|el| el.id()).collect();
        assert_eq!(order, vec![low, high, hidden]);
    }

    #[test]
    fn test_z_order() {
        let mut scene = SceneStore::new();
        let a = scene.add(rect_at(0.0, 0.0));
        let b = scene.add(rect_at(50.0, 50.0));

        assert!(scene.bring_to_front(a));
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0)), Some(a));

        assert!(scene.send_to_back(a));
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0)), Some(b));

        // Already at the back.
        assert!(!scene.send_to_back(a));
        // Insertion order is untouched by z changes.
        let ids: Vec<ElementId> = scene.elements().map(|el| el.id()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_load_resets_history_and_dedupes() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        let shared = scene.snapshot();
        let mut doubled = shared.clone();
        doubled.extend(shared);

        let mut other = SceneStore::new();
        other.add(rect_at(1.0, 1.0));
        other.load(doubled);
        assert_eq!(other.len(), 1);
        assert!(other.contains(id));
        assert!(!other.can_undo());
    }

    #[test]
    fn test_load_clamps_negative_geometry() {
        let mut source = SceneStore::new();
        let id = source.add(rect_at(0.0, 0.0));
        let mut stored = source.get(id).unwrap().clone();
        stored.position = Point::new(-40.0, -5.0);
        stored.size = Size::new(-10.0, 60.0);
        let json = serde_json::to_string(&vec![stored]).unwrap();

        let mut scene = SceneStore::new();
        scene.load_json(&json).unwrap();
        let el = scene.get(id).unwrap();
        assert_eq!(el.position, Point::ZERO);
        assert_eq!(el.size, Size::new(0.0, 60.0));
    }

    #[test]
    fn test_load_keeps_valid_elements_shared() {
        let mut source = SceneStore::new();
        source.add(rect_at(5.0, 5.0));
        let shared = source.snapshot();

        let mut scene = SceneStore::new();
        scene.load(shared.clone());
        assert!(Arc::ptr_eq(&scene.snapshot()[0], &shared[0]));
    }

    #[test]
    fn test_discarded_undo_restores_redo() {
        let mut scene = SceneStore::new();
        let id = scene.add(rect_at(0.0, 0.0));
        scene.add(rect_at(10.0, 10.0));
        assert!(scene.undo());

        let redo = scene.record_undo();
        assert!(!scene.can_redo());
        scene.apply_patch(id, &ElementPatch::default().with_position(Point::new(3.0, 3.0)));
        scene.apply_patch(id, &ElementPatch::default().with_position(Point::ZERO));
        scene.discard_undo(redo);

        assert!(scene.can_redo());
        assert!(scene.redo());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let mut scene = SceneStore::new();
        scene.add(rect_at(3.0, 4.0));
        scene.add(ElementDraft::text(Point::new(1.0, 2.0), Size::new(200.0, 40.0), "Sale!"));
        let json = scene.to_json().unwrap();

        let mut restored = SceneStore::new();
        restored.load_json(&json).unwrap();
        assert_eq!(positions(&restored), positions(&scene));
        assert_eq!(restored.snapshot(), scene.snapshot());
    }
}
