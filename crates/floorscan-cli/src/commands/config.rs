use floorscan_core::error::FloorscanError;
use std::path::Path;

use crate::output;

pub fn show(config_path: Option<&Path>) -> Result<(), FloorscanError> {
    let config = super::load_config(config_path)?;
    output::json::print(&config)
}
