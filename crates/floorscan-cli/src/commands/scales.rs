use floorscan_core::error::FloorscanError;
use floorscan_core::extract_page_scales;
use floorscan_core::extraction::pdftotext::PdftotextExtractor;
use std::path::Path;

use crate::output;

pub fn run(
    pdf_file: &Path,
    config_path: Option<&Path>,
    output_format: &str,
) -> Result<(), FloorscanError> {
    let config = super::load_config(config_path)?;
    let pdf_bytes = std::fs::read(pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let scales = extract_page_scales(&pdf_bytes, &extractor, &config.scale)?;

    match output_format {
        "json" => output::json::print(&scales)?,
        _ => output::table::print_page_scales(&scales),
    }

    Ok(())
}
