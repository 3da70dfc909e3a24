use floorscan_core::analyze_floor_plan;
use floorscan_core::error::FloorscanError;
use std::path::{Path, PathBuf};

use crate::output;

/// Which part of the analysis a subcommand prints.
#[derive(Clone, Copy)]
pub enum Part {
    All,
    Scale,
    Rooms,
}

pub fn run(
    input_file: &Path,
    config_path: Option<&Path>,
    part: Part,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), FloorscanError> {
    let config = super::load_config(config_path)?;
    let input = super::load_input(input_file)?;
    let analysis = analyze_floor_plan(&input, &config)?;

    if let Some(path) = output_file {
        // Always write JSON when saving to file
        let json = serde_json::to_string_pretty(&analysis)?;
        std::fs::write(&path, json)?;
        eprintln!(
            "Analyzed {} line(s) and {} label(s), written to {}",
            analysis.lines.len(),
            analysis.rooms.len(),
            path.display()
        );
        return Ok(());
    }

    match (part, output_format) {
        (Part::All, "json") => output::json::print(&analysis)?,
        (Part::Scale, "json") => output::json::print(&analysis.scale)?,
        (Part::Rooms, "json") => output::json::print(&analysis.rooms)?,
        (Part::All, _) => output::table::print_analysis(&analysis),
        (Part::Scale, _) => output::table::print_scale(&analysis.scale),
        (Part::Rooms, _) => output::table::print_rooms(&analysis.rooms),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INPUT: &str = r#"{
        "fragments": [
            { "text": "KITCHEN", "bbox": { "x": 140, "y": 140, "width": 20, "height": 20 } }
        ],
        "polygons": [ { "points": [[100, 100], [200, 100], [200, 200], [100, 200]] } ],
        "page_text": "scale 1:50"
    }"#;

    fn input_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_every_part_and_format_runs() {
        let file = input_file(INPUT);
        for part in [Part::All, Part::Scale, Part::Rooms] {
            for format in ["table", "json"] {
                run(file.path(), None, part, format, None).unwrap();
            }
        }
    }

    #[test]
    fn test_out_file_gets_full_analysis() {
        let file = input_file(INPUT);
        let out = tempfile::NamedTempFile::new().unwrap();
        run(file.path(), None, Part::Scale, "table", Some(out.path().to_path_buf())).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
        assert_eq!(written["scale"]["ratio"], 50.0);
        assert_eq!(written["rooms"][0]["real_size"]["width"], 2.0);
    }

    #[test]
    fn test_unknown_input_field_is_error() {
        let file = input_file(r#"{ "walls": [] }"#);
        let err = run(file.path(), None, Part::All, "json", None).unwrap_err();
        assert!(matches!(err, FloorscanError::Json(_)));
    }
}
