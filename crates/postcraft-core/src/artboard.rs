//! Fixed-size artboard and the platform format catalog.

use crate::element::Rgba;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Post and story formats offered when creating a design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ArtboardFormat {
    #[default]
    InstagramPost,
    InstagramStory,
    FacebookPost,
    TwitterPost,
    LinkedInPost,
    PinterestPin,
    YoutubeThumbnail,
    Custom { width: f64, height: f64 },
}

impl ArtboardFormat {
    /// Logical pixel dimensions of this format.
    pub fn dimensions(&self) -> Size {
        match *self {
            ArtboardFormat::InstagramPost => Size::new(1080.0, 1080.0),
            ArtboardFormat::InstagramStory => Size::new(1080.0, 1920.0),
            ArtboardFormat::FacebookPost => Size::new(1200.0, 630.0),
            ArtboardFormat::TwitterPost => Size::new(1600.0, 900.0),
            ArtboardFormat::LinkedInPost => Size::new(1200.0, 627.0),
            ArtboardFormat::PinterestPin => Size::new(1000.0, 1500.0),
            ArtboardFormat::YoutubeThumbnail => Size::new(1280.0, 720.0),
            ArtboardFormat::Custom { width, height } => Size::new(width.max(1.0), height.max(1.0)),
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtboardFormat::InstagramPost => "Instagram Post",
            ArtboardFormat::InstagramStory => "Instagram Story",
            ArtboardFormat::FacebookPost => "Facebook Post",
            ArtboardFormat::TwitterPost => "X / Twitter Post",
            ArtboardFormat::LinkedInPost => "LinkedIn Post",
            ArtboardFormat::PinterestPin => "Pinterest Pin",
            ArtboardFormat::YoutubeThumbnail => "YouTube Thumbnail",
            ArtboardFormat::Custom { .. } => "Custom",
        }
    }

    /// Get all catalog formats (excluding custom sizes).
    pub fn catalog() -> &'static [ArtboardFormat] {
        &[
            ArtboardFormat::InstagramPost,
            ArtboardFormat::InstagramStory,
            ArtboardFormat::FacebookPost,
            ArtboardFormat::TwitterPost,
            ArtboardFormat::LinkedInPost,
            ArtboardFormat::PinterestPin,
            ArtboardFormat::YoutubeThumbnail,
        ]
    }
}

/// The surface elements are placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artboard {
    pub format: ArtboardFormat,
    pub background: Rgba,
}

impl Default for Artboard {
    fn default() -> Self {
        Self::new(ArtboardFormat::default())
    }
}

impl Artboard {
    /// Create a white artboard of the given format.
    pub fn new(format: ArtboardFormat) -> Self {
        Self {
            format,
            background: Rgba::white(),
        }
    }

    /// Artboard with a custom pixel size.
    pub fn custom(width: f64, height: f64) -> Self {
        Self::new(ArtboardFormat::Custom { width, height })
    }

    pub fn with_background(mut self, background: Rgba) -> Self {
        self.background = background;
        self
    }

    pub fn size(&self) -> Size {
        self.format.dimensions()
    }

    /// Artboard bounds in its own coordinates.
    pub fn bounds(&self) -> Rect {
        self.size().to_rect()
    }
}
