pub mod analyze;
pub mod cluster;
pub mod config;
pub mod scales;

use floorscan_core::config::AnalysisConfig;
use floorscan_core::error::FloorscanError;
use floorscan_core::model::FloorPlanInput;
use std::path::Path;

/// Load `--config` if given, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, FloorscanError> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            floorscan_core::config::load_config(path)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

pub fn load_input(path: &Path) -> Result<FloorPlanInput, FloorscanError> {
    let json_bytes = std::fs::read(path)?;
    let input: FloorPlanInput = serde_json::from_slice(&json_bytes)?;
    Ok(input)
}
