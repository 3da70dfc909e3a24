//! Integration tests for the analyze_floor_plan() and extract_page_scales()
//! pipelines.
//!
//! Uses a MockExtractor that returns pre-built PageText without invoking
//! pdftotext, so these tests run without poppler-utils.

use floorscan_core::config::{AnalysisConfig, Calibration, MatchConfig, ScaleConfig};
use floorscan_core::error::FloorscanError;
use floorscan_core::extraction::{PageExtractor, PageText};
use floorscan_core::model::{
    BBox, FloorPlanInput, RealSize, RoomLabel, RoomPolygon, ScaleSource, ScaleUnits,
    TextFragment, TextSpan,
};
use floorscan_core::{analyze_floor_plan, extract_page_scales};

struct MockExtractor {
    pages: Vec<PageText>,
}

impl PageExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageText>, FloorscanError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct FailingExtractor;

impl PageExtractor for FailingExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageText>, FloorscanError> {
        Err(FloorscanError::PdftotextNotFound)
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn page(number: usize, spans: Vec<TextSpan>) -> PageText {
    PageText {
        page_number: number,
        spans,
        words: vec![],
    }
}

fn span(text: &str, x: f64, y: f64) -> TextSpan {
    TextSpan::new(text, x, y, x + 8.0 * text.len() as f64, y + 12.0)
}

fn frag(text: &str, x: i64, y: i64, width: i64) -> TextFragment {
    TextFragment::new(text, BBox::new(x, y, width, 20)).with_confidence(0.9)
}

fn square(min: i64, max: i64) -> RoomPolygon {
    RoomPolygon::new(vec![[min, min], [max, min], [max, max], [min, max]])
}

// ---------------------------------------------------------------------------
// Per-page scales from a vector PDF
// ---------------------------------------------------------------------------
#[test]
fn page_scales_one_per_page() {
    let extractor = MockExtractor {
        pages: vec![
            page(
                1,
                vec![
                    span("FIRST FLOOR PLAN", 40.0, 40.0),
                    span("SCALE: 1/8\" = 1'-0\"", 900.0, 700.0),
                ],
            ),
            page(2, vec![span("NORTH ARROW", 40.0, 40.0)]),
        ],
    };

    let scales = extract_page_scales(&[], &extractor, &ScaleConfig::default()).unwrap();

    assert_eq!(scales.len(), 2);
    assert_eq!(scales[0].page, 1);
    assert!(!scales[0].not_to_scale);
    let info = scales[0].scale.as_ref().unwrap();
    assert_eq!(info.ratio, Some(96.0));
    assert_eq!(info.units, Some(ScaleUnits::Feet));

    assert_eq!(scales[1].page, 2);
    assert!(scales[1].not_to_scale);
    assert!(scales[1].scale.is_none());
}

#[test]
fn page_scale_split_across_word_boxes() {
    // The runs never carry the whole annotation; only the word boxes do.
    let mut split = page(
        1,
        vec![
            span("SCALE:", 900.0, 700.0),
            span("DATE: 2024-03-01", 40.0, 40.0),
            span("1/4\"", 950.0, 700.0),
        ],
    );
    split.words = vec![
        TextSpan::new("1'-0\"", 1010.0, 700.0, 1040.0, 712.0),
        TextSpan::new("SCALE:", 900.0, 700.0, 945.0, 712.0),
        TextSpan::new("=", 990.0, 700.02, 998.0, 712.0),
        TextSpan::new("1/4\"", 950.0, 699.98, 980.0, 712.0),
    ];
    let extractor = MockExtractor { pages: vec![split] };

    let scales = extract_page_scales(&[], &extractor, &ScaleConfig::default()).unwrap();
    assert_eq!(scales[0].scale.as_ref().unwrap().ratio, Some(48.0));
}

#[test]
fn page_scale_found_near_title_block_label() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            vec![
                span("SCALE:", 900.0, 700.0),
                span("DATE: 2024-03-01", 900.0, 720.0),
                span("SHEET A-101", 900.0, 740.0),
                span("1:100", 960.0, 700.0),
            ],
        )],
    };

    let scales = extract_page_scales(&[], &extractor, &ScaleConfig::default()).unwrap();
    let info = scales[0].scale.as_ref().unwrap();
    assert_eq!(info.ratio, Some(100.0));
    assert_eq!(info.units, None);
}

#[test]
fn extractor_failure_propagates() {
    let err = extract_page_scales(&[], &FailingExtractor, &ScaleConfig::default()).unwrap_err();
    assert!(matches!(err, FloorscanError::PdftotextNotFound));
}

#[test]
fn empty_document_has_no_pages() {
    let extractor = MockExtractor { pages: vec![] };
    let scales = extract_page_scales(&[], &extractor, &ScaleConfig::default()).unwrap();
    assert!(scales.is_empty());
}

#[test]
fn invalid_scale_config_rejected_before_extraction() {
    let config = ScaleConfig {
        proximity_dx: 0.0,
        ..Default::default()
    };
    let err = extract_page_scales(&[], &FailingExtractor, &config).unwrap_err();
    assert!(matches!(err, FloorscanError::InvalidConfig(_)));
}

// ---------------------------------------------------------------------------
// Whole-page analysis from OCR output
// ---------------------------------------------------------------------------
#[test]
fn analyze_reads_scale_from_fragments() {
    let input = FloorPlanInput {
        fragments: vec![
            frag("KITCHEN", 140, 140, 60),
            frag("scale", 500, 900, 50),
            frag("1:50", 570, 900, 30),
        ],
        polygons: vec![square(100, 200), square(300, 400)],
        ..Default::default()
    };

    let analysis = analyze_floor_plan(&input, &AnalysisConfig::default()).unwrap();

    assert_eq!(analysis.lines.len(), 2);
    assert_eq!(analysis.lines[1].text(), "scale 1:50");

    assert_eq!(analysis.scale.ratio, Some(50.0));
    assert_eq!(analysis.scale.source, Some(ScaleSource::Ratio));

    // Every fragment is a label when no explicit labels are given.
    assert_eq!(analysis.rooms.len(), 3);
    let kitchen = &analysis.rooms[0];
    assert_eq!(kitchen.label, "KITCHEN");
    assert_eq!(kitchen.polygon, square(100, 200));
    assert_eq!(kitchen.real_size, Some(RealSize { width: 2.0, height: 2.0 }));
    assert_eq!(kitchen.confidence, Some(0.9));
    assert!(!analysis.rooms[1].is_matched());
    assert!(!analysis.rooms[2].is_matched());
}

#[test]
fn analyze_prefers_supplied_page_text_and_labels() {
    let input = FloorPlanInput {
        fragments: vec![frag("scale", 500, 900, 50), frag("1:50", 570, 900, 30)],
        polygons: vec![square(0, 960)],
        labels: Some(vec![RoomLabel {
            text: "LIVING".into(),
            bbox: BBox::new(470, 470, 20, 20),
            confidence: None,
        }]),
        page_text: Some("SCALE: 1/8\" = 1'-0\"".into()),
        ..Default::default()
    };
    let config = AnalysisConfig {
        matcher: MatchConfig {
            calibration: Calibration::Dpi { dpi: 96.0 },
        },
        ..Default::default()
    };

    let analysis = analyze_floor_plan(&input, &config).unwrap();

    assert_eq!(analysis.scale.ratio, Some(96.0));
    assert_eq!(analysis.rooms.len(), 1);
    // 960 px at 96 dpi is 10 paper inches, 80 feet at 1/8" = 1'-0".
    assert_eq!(
        analysis.rooms[0].real_size,
        Some(RealSize {
            width: 80.0,
            height: 80.0
        })
    );
}

#[test]
fn analyze_without_scale_reports_not_to_scale() {
    let input = FloorPlanInput {
        fragments: vec![frag("BEDROOM", 120, 140, 60)],
        polygons: vec![square(100, 200)],
        ..Default::default()
    };

    let analysis = analyze_floor_plan(&input, &AnalysisConfig::default()).unwrap();

    assert!(analysis.scale.not_to_scale);
    assert!(analysis.rooms[0].is_matched());
    assert_eq!(analysis.rooms[0].real_size, None);
}

#[test]
fn analyze_empty_input() {
    let analysis = analyze_floor_plan(&FloorPlanInput::default(), &AnalysisConfig::default())
        .unwrap();
    assert!(analysis.lines.is_empty());
    assert!(analysis.rooms.is_empty());
    assert!(analysis.scale.not_to_scale);
}

#[test]
fn analyze_rejects_malformed_fragment() {
    let input = FloorPlanInput {
        fragments: vec![TextFragment::new("X", BBox::new(0, 0, 10, 10)).with_confidence(2.0)],
        ..Default::default()
    };
    let err = analyze_floor_plan(&input, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, FloorscanError::InvalidInput(_)));
}

#[test]
fn analyze_accepts_json_document() {
    let json = r#"{
        "fragments": [
            { "text": "DINING", "bbox": { "x": 140, "y": 140, "width": 20, "height": 20 }, "confidence": 0.8 }
        ],
        "polygons": [ { "points": [[100, 100], [200, 100], [200, 200], [100, 200]] } ],
        "page_text": "scale 1:25"
    }"#;
    let input: FloorPlanInput = serde_json::from_str(json).unwrap();

    let analysis = analyze_floor_plan(&input, &AnalysisConfig::default()).unwrap();

    assert_eq!(
        analysis.rooms[0].real_size,
        Some(RealSize {
            width: 4.0,
            height: 4.0
        })
    );
}
