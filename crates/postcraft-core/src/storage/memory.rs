//! In-memory storage implementation.

use super::{BoxFuture, PageStorage, StorageError, StorageResult};
use crate::element::Element;
use crate::pages::PageId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory storage for testing and ephemeral use.
///
/// Elements are shared with the caller, so saving an unchanged page costs
/// pointer copies only.
#[derive(Default)]
pub struct MemoryStorage {
    pages: RwLock<HashMap<PageId, Vec<Arc<Element>>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl PageStorage for MemoryStorage {
    fn save_page_elements(
        &self,
        page: PageId,
        elements: &[Arc<Element>],
    ) -> BoxFuture<'_, StorageResult<()>> {
        let elements = elements.to_vec();
        Box::pin(async move {
            let mut pages = self.pages.write().map_err(lock_error)?;
            pages.insert(page, elements);
            Ok(())
        })
    }

    fn load_page_elements(&self, page: PageId) -> BoxFuture<'_, StorageResult<Vec<Arc<Element>>>> {
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            pages.get(&page).cloned().ok_or(StorageError::NotFound(page))
        })
    }

    fn delete_page(&self, page: PageId) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            let mut pages = self.pages.write().map_err(lock_error)?;
            pages.remove(&page);
            Ok(())
        })
    }

    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<PageId>>> {
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            Ok(pages.keys().copied().collect())
        })
    }

    fn exists(&self, page: PageId) -> BoxFuture<'_, StorageResult<bool>> {
        Box::pin(async move {
            let pages = self.pages.read().map_err(lock_error)?;
            Ok(pages.contains_key(&page))
        })
    }
}
