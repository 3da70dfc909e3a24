use floorscan_core::clustering;
use floorscan_core::error::FloorscanError;
use std::path::Path;

use crate::output;

pub fn run(
    input_file: &Path,
    config_path: Option<&Path>,
    freeform: bool,
    output_format: &str,
) -> Result<(), FloorscanError> {
    let config = super::load_config(config_path)?;
    let input = super::load_input(input_file)?;

    if freeform {
        let groups = clustering::cluster_freeform(&input.fragments, &config.cluster)?;
        return match output_format {
            "json" => output::json::print(&groups),
            _ => {
                output::table::print_groups(&groups);
                Ok(())
            }
        };
    }

    let lines = clustering::cluster_lines(&input.fragments, &config.cluster)?;
    match output_format {
        "json" => output::json::print(&lines)?,
        _ => output::table::print_lines(&lines),
    }

    Ok(())
}
