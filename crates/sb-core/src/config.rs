//! Board tunables.
//!
//! Every constant the interaction layer depends on lives here so a host can
//! override it (`BoardConfig::from_json`) without touching code. The defaults
//! reproduce the stock sticky-note board.

use crate::geometry::Size;
use serde::Deserialize;
use thiserror::Error;

/// The stock note palette.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FFFAA0", "#BCF4DE", "#C5C3FF", "#FFD7D6", "#FFE9E8", "#DEEBFF",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid board config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board config palette is empty")]
    EmptyPalette,
    #[error("minimum note size must be positive, got {width}x{height}")]
    NonPositiveMinimum { width: f64, height: f64 },
}

/// Image auto-fit constants (see `fit::fit_for_image`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageFitConfig {
    /// Horizontal padding between the note border and an image.
    pub padding: f64,
    /// Vertical gap between stacked images.
    pub gap: f64,
    /// Height reserved for the header and the caption text area.
    pub text_allowance: f64,
    /// A note holding images is widened to at least this.
    pub min_width: f64,
}

impl Default for ImageFitConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            gap: 6.0,
            text_allowance: 120.0,
            min_width: 200.0,
        }
    }
}

/// Configuration for a board and its interaction layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Maximum distance from a connector anchor that still counts as a
    /// connection target.
    pub capture_radius: f64,
    /// Size of a freshly created note.
    pub default_size: Size,
    /// Offset subtracted from the click point to get a new note's top-left.
    pub spawn_offset: Size,
    /// Floors applied on every resize.
    pub min_size: Size,
    /// Distance from a connection line that still counts as hovering it.
    pub connection_tolerance: f64,
    pub image_fit: ImageFitConfig,
    /// Colours new notes are drawn from.
    pub palette: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            capture_radius: 30.0,
            default_size: Size::new(150.0, 80.0),
            spawn_offset: Size::new(75.0, 30.0),
            min_size: Size::new(100.0, 60.0),
            connection_tolerance: 6.0,
            image_fit: ImageFitConfig::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl BoardConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the JSON is malformed or leaves the config unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the board relies on.
    ///
    /// # Errors
    /// `EmptyPalette` or `NonPositiveMinimum`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.min_size.width <= 0.0 || self.min_size.height <= 0.0 {
            return Err(ConfigError::NonPositiveMinimum {
                width: self.min_size.width,
                height: self.min_size.height,
            });
        }
        Ok(())
    }

    /// Pick a palette colour from a uniform roll in `[0, 1)`.
    pub fn pick_color(&self, roll: f64) -> &str {
        let len = self.palette.len();
        if len == 0 {
            return DEFAULT_PALETTE[0];
        }
        let idx = ((roll.clamp(0.0, 1.0)) * len as f64) as usize;
        &self.palette[idx.min(len - 1)]
    }

    /// Colour assigned to imported notes that carry none.
    pub fn fallback_color(&self) -> &str {
        self.palette
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_PALETTE[0])
    }
}
