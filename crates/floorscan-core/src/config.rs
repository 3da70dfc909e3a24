use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FloorscanError;

/// Thresholds for every engine component, passed explicitly into each call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub cluster: ClusterConfig,
    pub scale: ScaleConfig,
    pub matcher: MatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterConfig {
    /// Max vertical pixel difference between consecutive fragments of a line.
    pub y_tolerance: f64,
    /// Max horizontal gap between fragments of the same phrase.
    pub x_gap_threshold: f64,
    /// Single-linkage cut for freeform clustering of bbox centers.
    pub distance_threshold: f64,
    /// Gap above which merged phrase text gets a space. Affects rendering only.
    pub space_gap: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            y_tolerance: 10.0,
            x_gap_threshold: 60.0,
            distance_threshold: 100.0,
            space_gap: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleConfig {
    /// Horizontal half-width of the search window around a "scale" anchor.
    pub proximity_dx: f64,
    /// Vertical half-height of the search window around a "scale" anchor.
    pub proximity_dy: f64,
    /// Max anchor/candidate pairs inspected, nearest first.
    pub proximity_limit: usize,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            proximity_dx: 400.0,
            proximity_dy: 100.0,
            proximity_limit: 10,
        }
    }
}

/// How a scale ratio converts pixel extents into physical sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Calibration {
    /// The ratio is taken as pixels per physical unit: `size = px / ratio`.
    #[default]
    Direct,
    /// Pixels are paper space at `dpi`: `size = px / dpi * ratio`, in feet when
    /// the annotation is in feet.
    Dpi { dpi: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub calibration: Calibration,
}

/// Load a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, FloorscanError> {
    let content = std::fs::read_to_string(path).map_err(|e| FloorscanError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: AnalysisConfig =
        serde_json::from_str(&content).map_err(|e| FloorscanError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<AnalysisConfig, FloorscanError> {
    let config: AnalysisConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &AnalysisConfig) -> Result<(), FloorscanError> {
    config.cluster.validate()?;
    config.scale.validate()?;
    config.matcher.validate()
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<(), FloorscanError> {
        require_positive("cluster.y_tolerance", self.y_tolerance)?;
        require_positive("cluster.x_gap_threshold", self.x_gap_threshold)?;
        require_positive("cluster.distance_threshold", self.distance_threshold)?;
        require_positive("cluster.space_gap", self.space_gap)
    }
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<(), FloorscanError> {
        require_positive("scale.proximity_dx", self.proximity_dx)?;
        require_positive("scale.proximity_dy", self.proximity_dy)?;
        if self.proximity_limit == 0 {
            return Err(FloorscanError::InvalidConfig(
                "scale.proximity_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), FloorscanError> {
        match self.calibration {
            Calibration::Direct => Ok(()),
            Calibration::Dpi { dpi } => require_positive("matcher.calibration.dpi", dpi),
        }
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), FloorscanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FloorscanError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
