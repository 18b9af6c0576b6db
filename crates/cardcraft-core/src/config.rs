//! Per-feature bounds and tuning for the editor.
//!
//! Bounds differ between features (photo zoom, logo scale, font size, graphic
//! size) and are kept as separate data rather than one shared constant.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Inclusive numeric range used to clamp a manipulated quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: f64,
    pub max: f64,
}

impl ScaleBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        clamp_range(value, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &str) -> CoreResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(CoreError::InvalidConfig(format!("{name}: bounds must be finite")));
        }
        if self.min > self.max {
            return Err(CoreError::InvalidConfig(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Clamp that tolerates an inverted range by collapsing onto its midpoint.
///
/// `f64::clamp` panics when `min > max`, which happens for canvases smaller
/// than twice the drag margin.
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        return (min + max) / 2.0;
    }
    value.clamp(min, max)
}

/// What a locked graphic refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPolicy {
    /// Locking blocks gestures only; the property panel can still edit.
    #[default]
    SpatialOnly,
    /// Locking blocks gestures and property edits (except unlocking).
    Full,
}

/// Wheel sensitivity per manipulated quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSensitivity {
    pub photo_zoom: f64,
    pub logo_scale: f64,
    pub font_size: f64,
    pub graphic_size: f64,
}

impl Default for WheelSensitivity {
    fn default() -> Self {
        Self {
            photo_zoom: 0.001,
            logo_scale: 0.001,
            font_size: 0.05,
            graphic_size: 0.1,
        }
    }
}

/// Editor tuning. Loadable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Manhattan distance in screen pixels a pointer must travel before a
    /// press becomes a drag.
    pub drag_threshold: f64,
    pub photo_zoom: ScaleBounds,
    pub logo_scale: ScaleBounds,
    pub font_size: ScaleBounds,
    pub graphic_size: ScaleBounds,
    /// Bounds for a text element's scale_x / scale_y.
    pub text_stretch: ScaleBounds,
    pub opacity: ScaleBounds,
    pub wheel: WheelSensitivity,
    /// Supersampling factor used for raster export.
    pub export_scale: f64,
    /// Rotation snap increment in degrees (0 disables snapping).
    pub rotate_snap_degrees: f64,
    pub lock_policy: LockPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            photo_zoom: ScaleBounds::new(1.0, 3.0),
            logo_scale: ScaleBounds::new(0.5, 2.0),
            font_size: ScaleBounds::new(8.0, 72.0),
            graphic_size: ScaleBounds::new(20.0, 200.0),
            text_stretch: ScaleBounds::new(0.5, 3.0),
            opacity: ScaleBounds::new(0.1, 1.0),
            wheel: WheelSensitivity::default(),
            export_scale: 3.0,
            rotate_snap_degrees: 15.0,
            lock_policy: LockPolicy::SpatialOnly,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every bound is well formed.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "drag_threshold must be a non-negative number, got {}",
                self.drag_threshold
            )));
        }
        if !(self.export_scale.is_finite() && self.export_scale > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "export_scale must be positive, got {}",
                self.export_scale
            )));
        }
        if !(self.rotate_snap_degrees.is_finite() && self.rotate_snap_degrees >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "rotate_snap_degrees must be non-negative, got {}",
                self.rotate_snap_degrees
            )));
        }
        self.photo_zoom.validate("photo_zoom")?;
        self.logo_scale.validate("logo_scale")?;
        self.font_size.validate("font_size")?;
        self.graphic_size.validate("graphic_size")?;
        self.text_stretch.validate("text_stretch")?;
        self.opacity.validate("opacity")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_idempotent() {
        let bounds = ScaleBounds::new(1.0, 3.0);
        for v in [-5.0, 0.0, 1.0, 2.2, 3.0, 9.0, f64::NAN, f64::INFINITY] {
            let once = bounds.clamp(v);
            assert_eq!(bounds.clamp(once), once);
            assert!(bounds.contains(once));
        }
    }

    #[test]
    fn test_clamp_range_inverted() {
        assert!((clamp_range(5.0, 30.0, 10.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defaults_match_features() {
        let config = EditorConfig::default();
        assert_eq!(config.photo_zoom, ScaleBounds::new(1.0, 3.0));
        assert_eq!(config.logo_scale, ScaleBounds::new(0.5, 2.0));
        assert_eq!(config.font_size, ScaleBounds::new(8.0, 72.0));
        assert_eq!(config.graphic_size, ScaleBounds::new(20.0, 200.0));
        assert_eq!(config.lock_policy, LockPolicy::SpatialOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"drag_threshold": 5.0, "lock_policy": "full"}"#).unwrap();
        assert!((config.drag_threshold - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.lock_policy, LockPolicy::Full);
        assert_eq!(config.font_size, ScaleBounds::new(8.0, 72.0));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = EditorConfig::from_json(r#"{"photo_zoom": {"min": 3.0, "max": 1.0}}"#);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_export_scale_rejected() {
        let result = EditorConfig::from_json(r#"{"export_scale": 0.0}"#);
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = EditorConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
