//! Postcraft Core Library
//!
//! Platform-agnostic scene graph and direct-manipulation engine for the
//! Postcraft post composer: elements on a fixed-size artboard, pan/zoom,
//! tools, move/resize gestures, undo and multi-page documents.

pub mod artboard;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod input;
pub mod pages;
pub mod scene;
pub mod selection;
pub mod storage;
pub mod tools;
pub mod viewport;

pub use artboard::{Artboard, ArtboardFormat};
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
#[cfg(all(feature = "native-clipboard", not(target_arch = "wasm32")))]
pub use clipboard::SystemClipboard;
pub use config::{ConfigError, EditorConfig};
pub use controller::{ManipulationController, ManipulationPhase, PointerCapture};
pub use editor::{Editor, EventResponse};
pub use element::{Element, ElementDraft, ElementId, ElementKind, ElementPatch, Rgba, Style};
pub use input::{MouseButton, Modifiers, PointerEvent, PointerTarget};
pub use pages::{PageBridge, PageId};
pub use scene::SceneStore;
pub use selection::{Corner, Handle, ManipulationKind, ManipulationState};
pub use storage::{MemoryStorage, PageStorage, StorageError, StorageResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use tools::{ColorFeedback, ToolKind, ToolManager, ToolOutcome};
pub use viewport::Viewport;
