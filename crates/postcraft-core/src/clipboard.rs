//! Clipboard boundary used by the color picker.

use thiserror::Error;

/// Clipboard errors.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard is empty")]
    Empty,
    #[error("Clipboard error: {0}")]
    Other(String),
}

/// Somewhere text can be copied to.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    fn get_text(&mut self) -> Result<String, ClipboardError>;
}

/// In-process clipboard. Used in tests and on hosts without a system
/// clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text, if any.
    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }

    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.text.clone().ok_or(ClipboardError::Empty)
    }
}

/// The operating system clipboard.
#[cfg(all(feature = "native-clipboard", not(target_arch = "wasm32")))]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(all(feature = "native-clipboard", not(target_arch = "wasm32")))]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(all(feature = "native-clipboard", not(target_arch = "wasm32")))]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Other(e.to_string()))
    }

    fn get_text(&mut self) -> Result<String, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
            Err(e) => Err(ClipboardError::Other(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert!(matches!(clipboard.get_text(), Err(ClipboardError::Empty)));
        clipboard.set_text("#ff0000").unwrap();
        assert_eq!(clipboard.contents(), Some("#ff0000"));
        assert_eq!(clipboard.get_text().unwrap(), "#ff0000");
    }
}
