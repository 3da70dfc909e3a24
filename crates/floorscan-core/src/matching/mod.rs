pub mod polygon;

use tracing::instrument;

use crate::config::{Calibration, MatchConfig};
use crate::error::FloorscanError;
use crate::model::{
    RealSize, RoomLabel, RoomLabelResult, RoomPolygon, ScaleAnnotation, ScaleUnits,
};
use polygon::PreparedPolygon;

/// Assign each label to the first polygon containing its center and size the room.
///
/// Polygons are tested in the order given; the first hit wins, even when a
/// later polygon is a tighter fit. Labels with no containing polygon get an
/// empty polygon and no size. Sizes are only computed when `scale` carries a
/// usable ratio.
#[instrument(level = "debug", skip_all, fields(labels = labels.len(), polygons = polygons.len()))]
pub fn match_rooms(
    labels: &[RoomLabel],
    polygons: &[RoomPolygon],
    scale: Option<&ScaleAnnotation>,
    config: &MatchConfig,
) -> Result<Vec<RoomLabelResult>, FloorscanError> {
    config.validate()?;
    for label in labels {
        label.validate()?;
    }
    for polygon in polygons {
        polygon.validate()?;
    }

    let prepared: Vec<PreparedPolygon<'_>> = polygons.iter().map(PreparedPolygon::new).collect();

    let results: Vec<RoomLabelResult> = labels
        .iter()
        .map(|label| {
            let center = label.bbox.center();
            let matched = prepared.iter().find(|p| p.contains(center)).map(|p| p.source);

            let real_size = matched
                .zip(scale)
                .and_then(|(polygon, scale)| real_size(polygon, scale, &config.calibration));

            RoomLabelResult {
                label: label.text.clone(),
                bbox: label.bbox,
                polygon: matched.cloned().unwrap_or_default(),
                real_size,
                confidence: label.confidence,
            }
        })
        .collect();

    tracing::debug!(
        matched = results.iter().filter(|r| r.is_matched()).count(),
        "matched labels to rooms"
    );
    Ok(results)
}

/// Physical size of a polygon's axis-aligned extent.
///
/// Only an approximation for non-rectangular rooms.
pub fn real_size(
    polygon: &RoomPolygon,
    scale: &ScaleAnnotation,
    calibration: &Calibration,
) -> Option<RealSize> {
    let ratio = scale.usable_ratio()?;
    let (width_px, height_px) = polygon.extent()?;
    let convert = |px: u64| -> f64 {
        match calibration {
            Calibration::Direct => px as f64 / ratio,
            Calibration::Dpi { dpi } => {
                let physical = px as f64 / dpi * ratio;
                match scale.units {
                    Some(ScaleUnits::Feet) => physical / 12.0,
                    None => physical,
                }
            }
        }
    };
    Some(RealSize {
        width: convert(width_px),
        height: convert(height_px),
    })
}
