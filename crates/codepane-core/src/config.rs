//! Engine configuration.
//!
//! Everything here is plain data with serde defaults, so a host can load a partial JSON document
//! and get sensible values for whatever it leaves out. Values are clamped on load rather than
//! rejected.

use crate::layout::LayoutConfig;
use crate::style::ThemeId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Smallest allowed font size.
pub const MIN_FONT_SIZE: f32 = 10.0;
/// Largest allowed font size.
pub const MAX_FONT_SIZE: f32 = 24.0;
/// Font size used when none is configured.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid JSON for [`EngineConfig`].
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-editor display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Font size in points, always within `[MIN_FONT_SIZE, MAX_FONT_SIZE]`.
    pub font_size: f32,
    /// Active theme.
    pub theme_id: ThemeId,
}

impl DisplayConfig {
    /// Clamp `font_size` into the allowed range (NaN resets to the default).
    pub fn normalized(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self
    }

    /// Adjust the font size by `delta`, clamping. Returns `true` if it changed.
    ///
    /// A non-finite `delta` is ignored.
    pub fn adjust_font_size(&mut self, delta: f32) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let next = clamp_font_size(self.font_size + delta);
        let changed = next != self.font_size;
        self.font_size = next;
        changed
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            theme_id: ThemeId::default(),
        }
    }
}

fn clamp_font_size(size: f32) -> f32 {
    if size.is_nan() {
        DEFAULT_FONT_SIZE
    } else {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period after the last edit before highlighting, in milliseconds.
    pub debounce_ms: u64,
    /// How long a jump target stays flashed, in milliseconds.
    pub flash_ms: u64,
    /// Step used by the increase/decrease font size commands.
    pub font_size_step: f32,
    /// Maximum number of undo entries kept.
    pub undo_limit: usize,
    /// Initial display settings.
    pub display: DisplayConfig,
    /// Headless layout options.
    pub layout: LayoutConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Clamp every value into its valid range.
    pub fn normalized(mut self) -> Self {
        self.display = self.display.normalized();
        if !(self.font_size_step.is_finite() && self.font_size_step > 0.0) {
            self.font_size_step = 1.0;
        }
        self.undo_limit = self.undo_limit.max(1);
        self.layout.tab_width = self.layout.tab_width.max(1);
        if !(self.layout.line_height_factor.is_finite() && self.layout.line_height_factor > 0.0) {
            self.layout.line_height_factor = LayoutConfig::default().line_height_factor;
        }
        self
    }

    /// Debounce interval as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Flash duration as a [`Duration`].
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            flash_ms: 500,
            font_size_step: 1.0,
            undo_limit: 200,
            display: DisplayConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_font_delta_is_ignored() {
        let mut display = DisplayConfig {
            font_size: 18.0,
            ..DisplayConfig::default()
        };
        assert!(!display.adjust_font_size(f32::NAN));
        assert!(!display.adjust_font_size(f32::INFINITY));
        assert_eq!(display.font_size, 18.0);
        assert!(display.adjust_font_size(-2.0));
        assert_eq!(display.font_size, 16.0);
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.flash_duration(), Duration::from_millis(500));
        assert_eq!(config.display.theme_id.as_str(), "light");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{ "display": { "theme_id": "dark" } }"#).unwrap();
        assert_eq!(config.display.theme_id, ThemeId::new("dark"));
        assert_eq!(config.display.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = EngineConfig::from_json_str(
            r#"{ "display": { "font_size": 99 }, "undo_limit": 0, "layout": { "tab_width": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.display.font_size, MAX_FONT_SIZE);
        assert_eq!(config.undo_limit, 1);
        assert_eq!(config.layout.tab_width, 1);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_adjust_font_size_clamps() {
        let mut display = DisplayConfig {
            font_size: 23.0,
            ..DisplayConfig::default()
        };
        assert!(display.adjust_font_size(1.0));
        assert!(!display.adjust_font_size(1.0));
        assert_eq!(display.font_size, MAX_FONT_SIZE);

        display.font_size = 10.5;
        assert!(display.adjust_font_size(-2.0));
        assert_eq!(display.font_size, MIN_FONT_SIZE);
    }
}
