use crate::config::ScaleConfig;
use crate::model::TextSpan;
use crate::scale::patterns::{
    is_bare_scale_label, match_architectural_expression, match_plain_ratio, ScaleMatch,
};

/// A piece of text sitting next to a "scale" label.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyText<'a> {
    pub anchor: &'a TextSpan,
    pub candidate: &'a TextSpan,
    pub distance: f64,
}

/// Pair every span mentioning "scale" with the other spans inside its search
/// window, nearest first, keeping at most `proximity_limit` pairs.
///
/// Positions are the spans' top-left corners.
pub fn nearby_candidates<'a>(
    corpus: &'a [TextSpan],
    config: &ScaleConfig,
) -> Vec<NearbyText<'a>> {
    let mut pairs = Vec::new();

    for (i, anchor) in corpus.iter().enumerate() {
        if !anchor.text.to_lowercase().contains("scale") {
            continue;
        }
        for (j, candidate) in corpus.iter().enumerate() {
            if i == j {
                continue;
            }
            let dx = candidate.x0 - anchor.x0;
            let dy = candidate.y0 - anchor.y0;
            if dx.abs() < config.proximity_dx && dy.abs() < config.proximity_dy {
                pairs.push(NearbyText {
                    anchor,
                    candidate,
                    distance: dx.hypot(dy),
                });
            }
        }
    }

    pairs.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    pairs.truncate(config.proximity_limit);
    pairs
}

/// Find a scale written next to a separate "SCALE:" label.
///
/// Candidates are tried nearest first. A candidate that merely repeats the
/// label is skipped; otherwise the architectural expression is tried, then a
/// plain `a:b` ratio.
pub fn match_near_label(corpus: &[TextSpan], config: &ScaleConfig) -> Option<ScaleMatch> {
    for nearby in nearby_candidates(corpus, config) {
        let text = nearby.candidate.text.as_str();
        if is_bare_scale_label(text) {
            tracing::trace!(text, "skipping bare scale label");
            continue;
        }
        tracing::trace!(
            text,
            anchor = %nearby.anchor.text,
            distance = nearby.distance,
            "inspecting text near scale label"
        );
        if let Some(found) =
            match_architectural_expression(text).or_else(|| match_plain_ratio(text))
        {
            return Some(found);
        }
    }
    None
}
