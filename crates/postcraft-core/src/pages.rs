//! Multi-page documents: one scene store, many per-page element lists.

use crate::config::EditorConfig;
use crate::element::Element;
use crate::scene::{SceneStore, normalize_loaded};
use crate::storage::{PageStorage, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a page.
pub type PageId = Uuid;

/// Keeps the scene store in step with the page it shows.
///
/// The scene store always holds the active page. Every other page lives in
/// `pages` as the element list it had when it was last active. Switching
/// saves the outgoing page and loads the incoming one in a single call.
#[derive(Debug)]
pub struct PageBridge {
    scene: SceneStore,
    pages: HashMap<PageId, Vec<Arc<Element>>>,
    order: Vec<PageId>,
    active: PageId,
    dirty: HashSet<PageId>,
    /// Pages removed since the last save.
    removed: HashSet<PageId>,
}

impl Default for PageBridge {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl PageBridge {
    /// Create a document with a single empty page.
    pub fn new(config: &EditorConfig) -> Self {
        let first = Uuid::new_v4();
        Self {
            scene: SceneStore::with_config(config),
            pages: HashMap::from([(first, Vec::new())]),
            order: vec![first],
            active: first,
            dirty: HashSet::from([first]),
            removed: HashSet::new(),
        }
    }

    /// Page ids in document order.
    pub fn pages(&self) -> &[PageId] {
        &self.order
    }

    pub fn active_page(&self) -> PageId {
        self.active
    }

    pub fn contains(&self, page: PageId) -> bool {
        self.pages.contains_key(&page)
    }

    /// The active page's scene.
    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneStore {
        &mut self.scene
    }

    /// Elements of a page. For the active page this is the live scene.
    pub fn page_elements(&self, page: PageId) -> Option<Vec<Arc<Element>>> {
        if page == self.active {
            Some(self.scene.snapshot())
        } else {
            self.pages.get(&page).cloned()
        }
    }

    /// Append an empty page. The active page does not change.
    pub fn add_page(&mut self) -> PageId {
        let id = Uuid::new_v4();
        self.pages.insert(id, Vec::new());
        self.order.push(id);
        self.dirty.insert(id);
        log::debug!("Added page {id}");
        id
    }

    /// Remove a page. The last remaining page cannot be removed; removing the
    /// active page activates its neighbor (the next page, else the previous).
    pub fn remove_page(&mut self, page: PageId) -> bool {
        let Some(index) = self.order.iter().position(|p| *p == page) else {
            return false;
        };
        if self.order.len() == 1 {
            log::debug!("Refusing to remove the last page {page}");
            return false;
        }
        if page == self.active {
            let neighbor = self
                .order
                .get(index + 1)
                .or_else(|| index.checked_sub(1).and_then(|i| self.order.get(i)))
                .copied();
            if let Some(neighbor) = neighbor {
                self.activate(neighbor);
            }
        }
        self.order.remove(index);
        self.pages.remove(&page);
        self.dirty.remove(&page);
        self.removed.insert(page);
        log::debug!("Removed page {page}");
        true
    }

    /// Save the active page's scene, then load `page` into the scene store.
    /// History starts fresh on the incoming page. Returns false for unknown
    /// pages; switching to the active page is a no-op.
    pub fn switch_page(&mut self, page: PageId) -> bool {
        if !self.pages.contains_key(&page) {
            log::debug!("Ignoring switch to unknown page {page}");
            return false;
        }
        if page != self.active {
            self.activate(page);
        }
        true
    }

    fn activate(&mut self, page: PageId) {
        self.sync_active();
        let incoming = self.pages.get(&page).cloned().unwrap_or_default();
        self.scene.load(incoming);
        log::debug!("Switched page {} -> {page}", self.active);
        self.active = page;
    }

    /// Copy the live scene into the active page's slot, marking the page
    /// dirty if anything changed since the last copy.
    fn sync_active(&mut self) {
        let live = self.scene.snapshot();
        let stored = self.pages.entry(self.active).or_default();
        let unchanged =
            stored.len() == live.len() && stored.iter().zip(&live).all(|(a, b)| Arc::ptr_eq(a, b));
        if !unchanged {
            *stored = live;
            self.dirty.insert(self.active);
        }
    }

    /// Whether a page has changes not yet written by [`save_to`](Self::save_to).
    pub fn is_dirty(&mut self, page: PageId) -> bool {
        if page == self.active {
            self.sync_active();
        }
        self.dirty.contains(&page)
    }

    /// Write every dirty page to `storage` and delete removed pages from it.
    /// Returns the number of pages written.
    pub async fn save_to(&mut self, storage: &dyn PageStorage) -> StorageResult<usize> {
        self.sync_active();

        let removed: Vec<PageId> = self.removed.iter().copied().collect();
        for page in removed {
            storage.delete_page(page).await?;
            self.removed.remove(&page);
        }

        let mut written = 0;
        for page in self.order.clone() {
            if !self.dirty.contains(&page) {
                continue;
            }
            let elements = self.pages.get(&page).cloned().unwrap_or_default();
            storage.save_page_elements(page, &elements).await?;
            self.dirty.remove(&page);
            written += 1;
        }
        log::info!("Saved {written} page(s)");
        Ok(written)
    }

    /// Load a page from `storage`, adding it to the document if needed.
    /// Loading the active page replaces the live scene and its history.
    pub async fn load_from(&mut self, storage: &dyn PageStorage, page: PageId) -> StorageResult<()> {
        let elements = storage.load_page_elements(page).await?;
        if !self.pages.contains_key(&page) {
            self.order.push(page);
        }
        if page == self.active {
            self.scene.load(elements.clone());
            // Store what the scene kept so the next sync sees no change.
            self.pages.insert(page, self.scene.snapshot());
        } else {
            self.pages.insert(page, normalize_loaded(elements));
        }
        self.removed.remove(&page);
        self.dirty.remove(&page);
        log::info!("Loaded page {page}");
        Ok(())
    }
}
