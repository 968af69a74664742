#![forbid(unsafe_code)]

//! Tunable constants as data.
//!
//! [`SheetConfig`] groups every threshold used by the sheet so a host can
//! retune it without a rebuild. With the `config` feature it loads from TOML
//! or JSON; any section or field left out keeps its default.
//!
//! ```toml
//! [commit]
//! velocity_threshold = 0.25
//!
//! [layout]
//! collapsed_offset_px = 420.0
//! ```
//!
//! ```rust,ignore
//! let config = SheetConfig::from_toml_file("sheet.toml")?.validated()?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use crate::animation::SettleConfig;
use crate::capture::CaptureConfig;
use crate::gesture::GestureConfig;
use crate::haptics::HapticConfig;
use crate::position::{CommitConfig, LayoutConfig};
use crate::resistance::ResistanceProfile;

/// Every tunable in one place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    pub gesture: GestureConfig,
    pub capture: CaptureConfig,
    pub resistance: ResistanceProfile,
    pub commit: CommitConfig,
    pub haptics: HapticConfig,
    pub layout: LayoutConfig,
    pub settle: SettleConfig,
}

impl SheetConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every field against its acceptable range.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut non_negative = |name: &str, value: f64| {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        };

        non_negative("gesture.tap_slop_px", self.gesture.tap_slop_px);
        non_negative("capture.top_band_px", self.capture.top_band_px);
        non_negative("capture.content_dead_zone_px", self.capture.content_dead_zone_px);
        non_negative(
            "capture.bottom_edge_tolerance_px",
            self.capture.bottom_edge_tolerance_px,
        );
        non_negative("resistance.linear_limit_px", self.resistance.linear_limit_px);
        non_negative("commit.velocity_threshold", self.commit.velocity_threshold);
        non_negative("commit.distance_threshold_px", self.commit.distance_threshold_px);
        non_negative("haptics.selection_distance_px", self.haptics.selection_distance_px);
        non_negative("settle.damping", self.settle.damping);

        if !(self.gesture.min_time_delta_ms.is_finite() && self.gesture.min_time_delta_ms > 0.0) {
            errors.push(format!(
                "gesture.min_time_delta_ms must be > 0, got {}",
                self.gesture.min_time_delta_ms
            ));
        }

        // Past the limit the curve must keep some give but never amplify.
        let k = self.resistance.damping;
        if !(0.0..=1.0).contains(&k) {
            errors.push(format!("resistance.damping must be in [0, 1], got {k}"));
        }

        if !(self.layout.collapsed_offset_px.is_finite() && self.layout.collapsed_offset_px > 0.0) {
            errors.push(format!(
                "layout.collapsed_offset_px must be > 0, got {}",
                self.layout.collapsed_offset_px
            ));
        }
        if self.commit.distance_threshold_px > self.layout.collapsed_offset_px {
            errors.push(format!(
                "commit.distance_threshold_px ({}) must not exceed layout.collapsed_offset_px ({})",
                self.commit.distance_threshold_px, self.layout.collapsed_offset_px
            ));
        }

        if !(self.settle.stiffness.is_finite() && self.settle.stiffness > 0.0) {
            errors.push(format!(
                "settle.stiffness must be > 0, got {}",
                self.settle.stiffness
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, otherwise
    /// [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`SheetConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_component_defaults() {
        let config = SheetConfig::default();
        assert_eq!(config.gesture.tap_slop_px, 3.0);
        assert_eq!(config.gesture.min_time_delta_ms, 1.0);
        assert_eq!(config.capture.top_band_px, 60.0);
        assert_eq!(config.capture.content_dead_zone_px, 10.0);
        assert_eq!(config.capture.bottom_edge_tolerance_px, 1.0);
        assert_eq!(config.resistance.linear_limit_px, 150.0);
        assert_eq!(config.resistance.damping, 0.3);
        assert_eq!(config.commit.velocity_threshold, 0.2);
        assert_eq!(config.commit.distance_threshold_px, 120.0);
        assert_eq!(config.haptics.selection_distance_px, 50.0);
        assert_eq!(config.layout.collapsed_offset_px, 350.0);
        assert_eq!(config.settle, SettleConfig::default());
    }

    #[test]
    fn default_validates_clean() {
        let errors = SheetConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn validate_catches_amplifying_damping() {
        let mut config = SheetConfig::default();
        config.resistance.damping = 1.5;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("resistance.damping")));
    }

    #[test]
    fn validate_catches_zero_time_delta() {
        let mut config = SheetConfig::default();
        config.gesture.min_time_delta_ms = 0.0;
        assert!(
            config
                .validate()
                .iter()
                .any(|e| e.contains("gesture.min_time_delta_ms"))
        );
    }

    #[test]
    fn validate_catches_nan() {
        let mut config = SheetConfig::default();
        config.commit.velocity_threshold = f64::NAN;
        assert!(
            config
                .validate()
                .iter()
                .any(|e| e.contains("commit.velocity_threshold"))
        );
    }

    #[test]
    fn validate_catches_threshold_beyond_travel() {
        let mut config = SheetConfig::default();
        config.layout.collapsed_offset_px = 100.0;
        assert!(
            config
                .validate()
                .iter()
                .any(|e| e.contains("commit.distance_threshold_px"))
        );
    }

    #[test]
    fn validated_wraps_errors() {
        let mut config = SheetConfig::default();
        config.settle.stiffness = -1.0;
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("settle.stiffness"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = SheetConfig::from_toml_str(
            r#"
            [commit]
            velocity_threshold = 0.5

            [layout]
            collapsed_offset_px = 420.0
            "#,
        )
        .unwrap();
        assert_eq!(config.commit.velocity_threshold, 0.5);
        assert_eq!(config.commit.distance_threshold_px, 120.0);
        assert_eq!(config.layout.collapsed_offset_px, 420.0);
        assert_eq!(config.capture, CaptureConfig::default());
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_loads_and_bad_json_errors() {
        let config = SheetConfig::from_json_str(r#"{"capture":{"top_band_px":80.0}}"#).unwrap();
        assert_eq!(config.capture.top_band_px, 80.0);
        assert!(matches!(
            SheetConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn missing_file_is_io_error() {
        let err = SheetConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
