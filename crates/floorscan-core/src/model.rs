use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FloorscanError;

/// Largest coordinate magnitude accepted from collaborators, in pixels.
pub const MAX_COORDINATE: i64 = 1 << 31;

fn in_range(v: i64) -> bool {
    (-MAX_COORDINATE..=MAX_COORDINATE).contains(&v)
}

/// Axis-aligned box in integer pixel space, as produced by the OCR collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BBox {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl BBox {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        BBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Center using truncating integer division, matching the box's own coordinate type.
    pub fn center(&self) -> (i64, i64) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn center_f64(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn validate(&self) -> Result<(), FloorscanError> {
        if self.width < 0 || self.height < 0 {
            return Err(FloorscanError::InvalidInput(format!(
                "bounding box at ({}, {}) has negative size {}x{}",
                self.x, self.y, self.width, self.height
            )));
        }
        if ![self.x, self.y, self.width, self.height]
            .into_iter()
            .all(in_range)
        {
            return Err(FloorscanError::InvalidInput(format!(
                "bounding box at ({}, {}) size {}x{} exceeds +/-{MAX_COORDINATE}",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// One OCR-recognized token with its own bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextFragment {
    pub text: String,
    pub bbox: BBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bbox: BBox) -> Self {
        TextFragment {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn validate(&self) -> Result<(), FloorscanError> {
        self.bbox.validate()?;
        validate_confidence(&self.text, self.confidence)
    }
}

fn validate_confidence(text: &str, confidence: Option<f64>) -> Result<(), FloorscanError> {
    match confidence {
        Some(c) if !(0.0..=1.0).contains(&c) => Err(FloorscanError::InvalidInput(format!(
            "confidence {c} for '{text}' is outside [0, 1]"
        ))),
        _ => Ok(()),
    }
}

/// A horizontally contiguous run of fragments within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    /// Fragment texts merged left to right.
    pub text: String,
    pub item_count: usize,
    pub fragments: Vec<TextFragment>,
}

/// Fragments judged to lie on the same row, split into phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub phrases: Vec<Phrase>,
}

impl Line {
    pub fn fragments(&self) -> impl Iterator<Item = &TextFragment> {
        self.phrases.iter().flat_map(|p| p.fragments.iter())
    }

    pub fn text(&self) -> String {
        self.phrases
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A text run or word box from the vector extractor, in PDF units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSpan {
    pub text: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        TextSpan {
            text: text.into(),
            x0,
            y0,
            x1,
            y1,
        }
    }

    pub fn validate(&self) -> Result<(), FloorscanError> {
        if [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(FloorscanError::InvalidInput(format!(
                "text span '{}' has non-finite coordinates",
                self.text
            )));
        }
        Ok(())
    }
}

impl From<&TextFragment> for TextSpan {
    fn from(fragment: &TextFragment) -> Self {
        let b = fragment.bbox;
        TextSpan::new(
            fragment.text.clone(),
            b.x as f64,
            b.y as f64,
            b.right() as f64,
            (b.y + b.height) as f64,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleUnits {
    Feet,
}

impl fmt::Display for ScaleUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleUnits::Feet => write!(f, "feet"),
        }
    }
}

/// Which interpretation pass recovered a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleSource {
    Architectural,
    Ratio,
    InchPerFeet,
    ReconstructedLine,
    Proximity,
}

impl fmt::Display for ScaleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScaleSource::Architectural => "architectural",
            ScaleSource::Ratio => "ratio",
            ScaleSource::InchPerFeet => "inch-per-feet",
            ScaleSource::ReconstructedLine => "reconstructed line",
            ScaleSource::Proximity => "proximity",
        };
        write!(f, "{name}")
    }
}

/// The scale recovered for one page.
///
/// `ratio` is real-world inches per drawing unit when `units` is known, and is
/// always strictly positive when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleAnnotation {
    pub raw_text: String,
    pub ratio: Option<f64>,
    pub units: Option<ScaleUnits>,
    pub not_to_scale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ScaleSource>,
}

impl ScaleAnnotation {
    pub fn found(
        raw_text: impl Into<String>,
        ratio: f64,
        units: Option<ScaleUnits>,
        source: ScaleSource,
    ) -> Self {
        ScaleAnnotation {
            raw_text: raw_text.into(),
            ratio: Some(ratio),
            units,
            not_to_scale: false,
            source: Some(source),
        }
    }

    pub fn not_to_scale() -> Self {
        ScaleAnnotation {
            raw_text: String::new(),
            ratio: None,
            units: None,
            not_to_scale: true,
            source: None,
        }
    }

    /// The ratio, if this annotation can be used for measurement.
    pub fn usable_ratio(&self) -> Option<f64> {
        if self.not_to_scale {
            return None;
        }
        self.ratio.filter(|r| *r > 0.0 && r.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    pub units: Option<ScaleUnits>,
    pub ratio: Option<f64>,
}

/// Per-page scale result exposed to calling services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageScale {
    /// 1-based page number.
    pub page: usize,
    pub scale: Option<ScaleInfo>,
    pub not_to_scale: bool,
}

impl PageScale {
    pub fn from_annotation(page: usize, annotation: &ScaleAnnotation) -> Self {
        let scale = if annotation.not_to_scale {
            None
        } else {
            Some(ScaleInfo {
                units: annotation.units,
                ratio: annotation.ratio,
            })
        };
        PageScale {
            page,
            scale,
            not_to_scale: annotation.not_to_scale,
        }
    }
}

/// A candidate room boundary in pixel space, in the contour detector's order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomPolygon {
    pub points: Vec<[i64; 2]>,
}

impl RoomPolygon {
    pub fn new(points: Vec<[i64; 2]>) -> Self {
        RoomPolygon { points }
    }

    pub fn empty() -> Self {
        RoomPolygon::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices cannot enclose anything.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3
    }

    pub fn validate(&self) -> Result<(), FloorscanError> {
        match self.points.iter().find(|[x, y]| !in_range(*x) || !in_range(*y)) {
            Some([x, y]) => Err(FloorscanError::InvalidInput(format!(
                "polygon vertex ({x}, {y}) exceeds +/-{MAX_COORDINATE}"
            ))),
            None => Ok(()),
        }
    }

    /// Axis-aligned `(width, height)` of the vertices.
    pub fn extent(&self) -> Option<(u64, u64)> {
        let first = self.points.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first[0], first[0], first[1], first[1]);
        for [x, y] in &self.points {
            min_x = min_x.min(*x);
            max_x = max_x.max(*x);
            min_y = min_y.min(*y);
            max_y = max_y.max(*y);
        }
        Some((max_x.abs_diff(min_x), max_y.abs_diff(min_y)))
    }
}

/// A text label to be placed into a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomLabel {
    pub text: String,
    pub bbox: BBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RoomLabel {
    pub fn validate(&self) -> Result<(), FloorscanError> {
        self.bbox.validate()?;
        validate_confidence(&self.text, self.confidence)
    }
}

impl From<&TextFragment> for RoomLabel {
    fn from(fragment: &TextFragment) -> Self {
        RoomLabel {
            text: fragment.text.clone(),
            bbox: fragment.bbox,
            confidence: fragment.confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomLabelResult {
    pub label: String,
    pub bbox: BBox,
    /// The first detected polygon containing the label center, or empty.
    pub polygon: RoomPolygon,
    pub real_size: Option<RealSize>,
    pub confidence: Option<f64>,
}

impl RoomLabelResult {
    pub fn is_matched(&self) -> bool {
        !self.polygon.is_empty()
    }
}

/// Everything the collaborators produced for one floor-plan page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorPlanInput {
    #[serde(default)]
    pub fragments: Vec<TextFragment>,
    #[serde(default)]
    pub polygons: Vec<RoomPolygon>,
    /// Explicit room labels. When absent, every OCR fragment is a label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<RoomLabel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<TextSpan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<Vec<TextSpan>>,
}

impl FloorPlanInput {
    pub fn validate(&self) -> Result<(), FloorscanError> {
        for fragment in &self.fragments {
            fragment.validate()?;
        }
        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for label in self.labels.iter().flatten() {
            label.validate()?;
        }
        for span in self.words.iter().chain(self.spans.iter()).flatten() {
            span.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlanAnalysis {
    pub lines: Vec<Line>,
    pub scale: ScaleAnnotation,
    pub rooms: Vec<RoomLabelResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_truncates() {
        assert_eq!(BBox::new(140, 140, 20, 20).center(), (150, 150));
        assert_eq!(BBox::new(0, 0, 5, 3).center(), (2, 1));
    }

    #[test]
    fn test_negative_bbox_rejected() {
        assert!(BBox::new(0, 0, -1, 4).validate().is_err());
    }

    #[test]
    fn test_coordinates_out_of_range_rejected() {
        let far = BBox::new(i64::MAX - 5, 0, 20, 20);
        assert!(matches!(far.validate(), Err(FloorscanError::InvalidInput(_))));
        assert!(BBox::new(MAX_COORDINATE, -MAX_COORDINATE, 0, 0)
            .validate()
            .is_ok());

        let p = RoomPolygon::new(vec![[i64::MIN, 0], [i64::MAX, 0], [0, 10]]);
        assert!(matches!(p.validate(), Err(FloorscanError::InvalidInput(_))));
        let input = FloorPlanInput {
            polygons: vec![p],
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_extent_of_extreme_polygon_does_not_overflow() {
        let p = RoomPolygon::new(vec![[i64::MIN, 0], [i64::MAX, 0], [0, 10]]);
        assert_eq!(p.extent(), Some((u64::MAX, 10)));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let f = TextFragment::new("KITCHEN", BBox::new(0, 0, 10, 10)).with_confidence(1.5);
        assert!(matches!(f.validate(), Err(FloorscanError::InvalidInput(_))));
    }

    #[test]
    fn test_polygon_extent() {
        let p = RoomPolygon::new(vec![[100, 100], [200, 120], [180, 260]]);
        assert_eq!(p.extent(), Some((100, 160)));
        assert_eq!(RoomPolygon::empty().extent(), None);
    }

    #[test]
    fn test_not_to_scale_has_no_usable_ratio() {
        let nts = ScaleAnnotation::not_to_scale();
        assert!(nts.usable_ratio().is_none());
        let page = PageScale::from_annotation(2, &nts);
        assert!(page.not_to_scale);
        assert!(page.scale.is_none());
    }

    #[test]
    fn test_input_rejects_unknown_fields() {
        let json = r#"{ "fragments": [], "polygons": [], "walls": [] }"#;
        assert!(serde_json::from_str::<FloorPlanInput>(json).is_err());
    }

    #[test]
    fn test_scale_annotation_json_shape() {
        let a = ScaleAnnotation::found("scale 1:50", 50.0, None, ScaleSource::Ratio);
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["ratio"], 50.0);
        assert!(v["units"].is_null());
        assert_eq!(v["source"], "ratio");
    }
}
