pub mod clustering;
pub mod config;
pub mod error;
pub mod extraction;
pub mod matching;
pub mod model;
pub mod scale;

use tracing::instrument;

use config::{validate_config, AnalysisConfig, ScaleConfig};
use error::FloorscanError;
use extraction::PageExtractor;
use model::{FloorPlanAnalysis, FloorPlanInput, PageScale, RoomLabel, TextSpan};

/// Main API entry point: interpret one floor-plan page.
///
/// Clusters the OCR fragments into lines, infers the drawing scale and
/// matches room labels against the detected polygons. When the caller sends
/// no page text, the scale is read from the clustered fragments instead, and
/// the fragments also stand in for word positions and the proximity corpus.
#[instrument(
    skip_all,
    fields(fragments = input.fragments.len(), polygons = input.polygons.len())
)]
pub fn analyze_floor_plan(
    input: &FloorPlanInput,
    config: &AnalysisConfig,
) -> Result<FloorPlanAnalysis, FloorscanError> {
    validate_config(config)?;
    input.validate()?;

    let lines = clustering::cluster_lines(&input.fragments, &config.cluster)?;

    // Scale: caller-supplied text first, OCR fragments otherwise
    let fragment_spans: Vec<TextSpan> = input.fragments.iter().map(TextSpan::from).collect();
    let from_fragments = input.page_text.is_none();
    let page_text = match &input.page_text {
        Some(text) => text.clone(),
        None => lines
            .iter()
            .map(|line| line.text())
            .collect::<Vec<_>>()
            .join(" "),
    };
    let fallback = from_fragments.then_some(fragment_spans.as_slice());
    let words = input.words.as_deref().or(fallback);
    let corpus = input.spans.as_deref().or(fallback);
    let scale = scale::infer_scale(&page_text, words, corpus, &config.scale);

    // Rooms: explicit labels, or every OCR fragment
    let labels: Vec<RoomLabel> = match &input.labels {
        Some(labels) => labels.clone(),
        None => input.fragments.iter().map(RoomLabel::from).collect(),
    };
    let rooms = matching::match_rooms(&labels, &input.polygons, Some(&scale), &config.matcher)?;

    Ok(FloorPlanAnalysis {
        lines,
        scale,
        rooms,
    })
}

/// Infer the scale of every page of a vector PDF.
///
/// Each page's text runs, joined with spaces, form the page text; its word
/// boxes feed the reconstructed-line fallback and its runs the proximity
/// fallback.
#[instrument(skip_all, fields(backend = extractor.backend_name(), bytes = pdf_bytes.len()))]
pub fn extract_page_scales(
    pdf_bytes: &[u8],
    extractor: &dyn PageExtractor,
    config: &ScaleConfig,
) -> Result<Vec<PageScale>, FloorscanError> {
    config.validate()?;

    let pages = extractor.extract_pages(pdf_bytes)?;

    let scales: Vec<PageScale> = pages
        .iter()
        .map(|page| {
            let annotation = scale::infer_scale(
                &page.text(),
                Some(page.words.as_slice()),
                Some(page.spans.as_slice()),
                config,
            );
            PageScale::from_annotation(page.page_number, &annotation)
        })
        .collect();

    tracing::debug!(
        pages = scales.len(),
        scaled = scales.iter().filter(|p| !p.not_to_scale).count(),
        "inferred page scales"
    );
    Ok(scales)
}
