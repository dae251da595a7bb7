//! Engine tunables.

use crate::scene::MAX_UNDO_HISTORY;
use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Engine configuration. Every field has a default, so a partial JSON
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest width/height a resize may produce.
    pub min_element_size: Size,
    /// Offset applied to duplicated elements.
    pub duplicate_offset: Vec2,
    /// Maximum number of undo states kept per scene.
    pub max_undo_history: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// How long color-picker feedback stays visible.
    pub color_feedback_secs: f64,
    /// Size of text inserted by the text tool.
    pub text_default_size: Size,
    /// Size of lines inserted by the line tool.
    pub line_default_size: Size,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_element_size: Size::new(50.0, 50.0),
            duplicate_offset: Vec2::new(10.0, 10.0),
            max_undo_history: MAX_UNDO_HISTORY,
            min_zoom: 0.3,
            max_zoom: 2.0,
            color_feedback_secs: 3.0,
            text_default_size: Size::new(200.0, 40.0),
            line_default_size: Size::new(200.0, 4.0),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON and check it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..{} must be positive and ordered",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_element_size.width < 0.0 || self.min_element_size.height < 0.0 {
            return Err(ConfigError::Invalid(
                "min_element_size must not be negative".to_string(),
            ));
        }
        if self.max_undo_history == 0 {
            return Err(ConfigError::Invalid(
                "max_undo_history must be at least 1".to_string(),
            ));
        }
        if !(self.color_feedback_secs >= 0.0 && self.color_feedback_secs.is_finite()) {
            return Err(ConfigError::Invalid(
                "color_feedback_secs must be a finite, non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn color_feedback_duration(&self) -> Duration {
        Duration::from_secs_f64(self.color_feedback_secs)
    }
}
