//! Canvas configuration.
//!
//! Every field has a default so a partial JSON document is enough to
//! override a single value.

use crate::rough::RoughStyle;
use crate::shapes::StrokeOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom range: min {min} must be positive and below max {max}")]
    ZoomRange { min: f64, max: f64 },
}

/// Tunables for hit-testing, camera limits, and element defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Border hit tolerance for the eraser and line-like selection, in world units.
    pub eraser_tolerance: f64,
    /// Resize handle edge length in screen pixels.
    pub handle_size: f64,
    /// Selection padding around squares, in world units.
    pub square_padding: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom delta applied by the zoom in/out controls.
    pub zoom_step: f64,
    /// Zoom delta per wheel unit when ctrl is held.
    pub wheel_zoom_factor: f64,
    /// Zoom delta used instead of the factor for coarse wheel steps.
    pub wheel_zoom_cap: f64,
    /// Wheel magnitude above which the capped delta is used.
    pub wheel_zoom_threshold: f64,
    pub font_size: f64,
    pub line_height_factor: f64,
    /// Opacity used for elements marked for deletion.
    pub pending_alpha: f64,
    /// Primitive builder style, including the arrow head geometry.
    pub rough: RoughStyle,
    pub stroke: StrokeOptions,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            eraser_tolerance: 7.0,
            handle_size: 8.0,
            square_padding: 10.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
            zoom_step: 0.3,
            wheel_zoom_factor: 0.03,
            wheel_zoom_cap: 0.1,
            wheel_zoom_threshold: 10.0,
            font_size: 24.0,
            line_height_factor: 1.2,
            pending_alpha: 0.5,
            rough: RoughStyle::default(),
            stroke: StrokeOptions::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the camera relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom <= 0.0 || self.min_zoom >= self.max_zoom {
            return Err(ConfigError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }

    /// Line height for text at the configured font size.
    pub fn line_height(&self) -> f64 {
        self.font_size * self.line_height_factor
    }
}
