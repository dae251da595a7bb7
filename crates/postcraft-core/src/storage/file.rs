//! File-based storage implementation for native platforms.

use super::{BoxFuture, PageStorage, StorageError, StorageResult};
use crate::element::Element;
use crate::pages::PageId;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File-based storage for native platforms.
///
/// Stores each page as a JSON array of elements in `<page id>.json` under
/// a base directory.
pub struct FileStorage {
    /// Base directory for page storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/postcraft/pages/`
    /// On Windows: `%LOCALAPPDATA%\postcraft\pages\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("postcraft").join("pages"))
    }

    fn page_path(&self, page: PageId) -> PathBuf {
        self.base_path.join(format!("{page}.json"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl PageStorage for FileStorage {
    fn save_page_elements(
        &self,
        page: PageId,
        elements: &[Arc<Element>],
    ) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.page_path(page);
        let borrowed: Vec<&Element> = elements.iter().map(Arc::as_ref).collect();
        let json = match serde_json::to_string_pretty(&borrowed) {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {e}", path.display()))
            })?;
            log::info!("Saved page {page} to {}", path.display());
            Ok(())
        })
    }

    fn load_page_elements(&self, page: PageId) -> BoxFuture<'_, StorageResult<Vec<Arc<Element>>>> {
        let path = self.page_path(page);

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(page));
            }

            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {e}", path.display()))
            })?;

            let elements: Vec<Element> = serde_json::from_str(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {e}", path.display()))
            })?;
            Ok(elements.into_iter().map(Arc::new).collect())
        })
    }

    fn delete_page(&self, page: PageId) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.page_path(page);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<PageId>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }

            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

            let mut pages = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                // Only include .json files named by a page id
                if path.extension().is_none_or(|e| e != "json") {
                    continue;
                }
                if let Some(page) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| PageId::parse_str(s).ok())
                {
                    pages.push(page);
                }
            }
            Ok(pages)
        })
    }

    fn exists(&self, page: PageId) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.page_path(page);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementDraft, ElementKind, Rgba, Style};
    use kurbo::{Point, Size};
    use pollster::block_on;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn sample_elements() -> Vec<Arc<Element>> {
        let text = ElementDraft::text(Point::new(100.0, 100.0), Size::new(200.0, 40.0), "Sale");
        let shape = ElementDraft::new(ElementKind::Circle, Point::new(10.0, 10.0), Size::new(80.0, 80.0))
            .with_style(Style::default().with_fill(Rgba::rgb(0x11, 0x22, 0x33)));
        vec![
            Arc::new(Element::from_draft(Uuid::new_v4(), 0, text)),
            Arc::new(Element::from_draft(Uuid::new_v4(), 1, shape)),
        ]
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let page = Uuid::new_v4();
        let elements = sample_elements();

        block_on(storage.save_page_elements(page, &elements)).unwrap();
        let loaded = block_on(storage.load_page_elements(page)).unwrap();

        assert_eq!(loaded, elements);
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let result = block_on(storage.load_page_elements(Uuid::new_v4()));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_list_skips_foreign_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        block_on(storage.save_page_elements(a, &sample_elements())).unwrap();
        block_on(storage.save_page_elements(b, &[])).unwrap();
        fs::write(dir.path().join("notes.json"), "[]").unwrap();
        fs::write(dir.path().join(format!("{a}.bak")), "[]").unwrap();

        let list = block_on(storage.list_pages()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&a));
        assert!(list.contains(&b));
    }

    #[test]
    fn test_file_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let page = Uuid::new_v4();

        block_on(storage.save_page_elements(page, &[])).unwrap();
        assert!(block_on(storage.exists(page)).unwrap());

        block_on(storage.delete_page(page)).unwrap();
        assert!(!block_on(storage.exists(page)).unwrap());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let page = Uuid::new_v4();
        fs::write(dir.path().join(format!("{page}.json")), "{ nope").unwrap();

        let result = block_on(storage.load_page_elements(page));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}
