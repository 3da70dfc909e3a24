pub mod lines;
pub mod patterns;
pub mod proximity;

use tracing::instrument;

use crate::config::ScaleConfig;
use crate::model::{ScaleAnnotation, ScaleSource, TextSpan};
use patterns::ScaleMatch;

/// Infer the physical scale of a drawing page.
///
/// Passes run in fixed priority order and the first one that yields a usable
/// match wins:
/// 1. architectural fraction (`SCALE: 1/8" = 1'-0"`) on the page text
/// 2. ratio (`scale 1:50`) on the page text
/// 3. inch-per-feet (`1" = 8'`) on the page text
/// 4. the architectural pattern on lines rebuilt from `words`
/// 5. text near a "scale" label in `proximity_corpus`
///
/// When nothing matches the page is reported as not to scale.
#[instrument(level = "debug", skip_all, fields(text_len = page_text.len()))]
pub fn infer_scale(
    page_text: &str,
    words: Option<&[TextSpan]>,
    proximity_corpus: Option<&[TextSpan]>,
    config: &ScaleConfig,
) -> ScaleAnnotation {
    let page_passes: [(ScaleSource, fn(&str) -> Option<ScaleMatch>); 3] = [
        (ScaleSource::Architectural, patterns::match_architectural),
        (ScaleSource::Ratio, patterns::match_ratio),
        (ScaleSource::InchPerFeet, patterns::match_inch_per_feet),
    ];
    for (source, pass) in page_passes {
        if let Some(found) = pass(page_text) {
            return annotate(found, source);
        }
    }

    if let Some(found) = words.and_then(lines::match_reconstructed_lines) {
        return annotate(found, ScaleSource::ReconstructedLine);
    }

    if let Some(found) =
        proximity_corpus.and_then(|corpus| proximity::match_near_label(corpus, config))
    {
        return annotate(found, ScaleSource::Proximity);
    }

    tracing::debug!("no scale annotation found, page is not to scale");
    ScaleAnnotation::not_to_scale()
}

fn annotate(found: ScaleMatch, source: ScaleSource) -> ScaleAnnotation {
    tracing::debug!(
        %source,
        raw = %found.raw_text,
        ratio = found.ratio,
        "matched scale pattern"
    );
    ScaleAnnotation::found(found.raw_text, found.ratio, found.units, source)
}
