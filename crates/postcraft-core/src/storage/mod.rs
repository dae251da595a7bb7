//! Storage abstraction for page persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::element::Element;
use crate::pages::PageId;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(PageId),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for page storage backends.
///
/// A page is stored as its element sequence, in scene order. The engine
/// never learns which medium sits behind this trait.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait PageStorage: Send + Sync {
    /// Save the elements of a page, replacing what was stored.
    fn save_page_elements(
        &self,
        page: PageId,
        elements: &[Arc<Element>],
    ) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the elements of a page.
    fn load_page_elements(&self, page: PageId) -> BoxFuture<'_, StorageResult<Vec<Arc<Element>>>>;

    /// Delete a page. Deleting a missing page is not an error.
    fn delete_page(&self, page: PageId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored page ids.
    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<PageId>>>;

    /// Check if a page is stored.
    fn exists(&self, page: PageId) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Trait for page storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait PageStorage {
    /// Save the elements of a page, replacing what was stored.
    fn save_page_elements(
        &self,
        page: PageId,
        elements: &[Arc<Element>],
    ) -> BoxFuture<'_, StorageResult<()>>;

    /// Load the elements of a page.
    fn load_page_elements(&self, page: PageId) -> BoxFuture<'_, StorageResult<Vec<Arc<Element>>>>;

    /// Delete a page. Deleting a missing page is not an error.
    fn delete_page(&self, page: PageId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored page ids.
    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<PageId>>>;

    /// Check if a page is stored.
    fn exists(&self, page: PageId) -> BoxFuture<'_, StorageResult<bool>>;
}
