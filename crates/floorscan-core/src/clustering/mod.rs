pub mod freeform;
pub mod merge;

use tracing::instrument;

use crate::config::ClusterConfig;
use crate::error::FloorscanError;
use crate::model::{Line, Phrase, TextFragment};
pub use freeform::cluster_freeform;
use merge::merge_phrase_text;

/// Group fragments into phrases, flattened across lines in reading order.
pub fn cluster(
    fragments: &[TextFragment],
    config: &ClusterConfig,
) -> Result<Vec<Phrase>, FloorscanError> {
    Ok(cluster_lines(fragments, config)?
        .into_iter()
        .flat_map(|line| line.phrases)
        .collect())
}

/// Group fragments into lines, then into phrases within each line.
///
/// Every input fragment ends up in exactly one phrase of exactly one line.
#[instrument(level = "debug", skip_all, fields(fragments = fragments.len()))]
pub fn cluster_lines(
    fragments: &[TextFragment],
    config: &ClusterConfig,
) -> Result<Vec<Line>, FloorscanError> {
    config.validate()?;
    for fragment in fragments {
        fragment.validate()?;
    }

    let lines: Vec<Line> = split_into_rows(fragments, config.y_tolerance)
        .into_iter()
        .map(|row| Line {
            phrases: split_into_phrases(row, config),
        })
        .collect();

    tracing::debug!(lines = lines.len(), "clustered fragments into lines");
    Ok(lines)
}

/// Sort top-to-bottom then left-to-right, and chain each fragment to the
/// previous one while their `y` stays within tolerance.
fn split_into_rows(fragments: &[TextFragment], y_tolerance: f64) -> Vec<Vec<&TextFragment>> {
    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    sorted.sort_by_key(|f| (f.bbox.y, f.bbox.x));

    let mut rows: Vec<Vec<&TextFragment>> = Vec::new();
    let mut current: Vec<&TextFragment> = Vec::new();

    for fragment in sorted {
        if let Some(last) = current.last() {
            let dy = (fragment.bbox.y - last.bbox.y).abs() as f64;
            if dy > y_tolerance {
                rows.push(std::mem::take(&mut current));
            }
        }
        current.push(fragment);
    }
    if !current.is_empty() {
        rows.push(current);
    }

    rows
}

fn split_into_phrases(mut row: Vec<&TextFragment>, config: &ClusterConfig) -> Vec<Phrase> {
    row.sort_by_key(|f| f.bbox.x);

    let mut groups: Vec<Vec<&TextFragment>> = Vec::new();
    let mut current: Vec<&TextFragment> = Vec::new();

    for fragment in row {
        if let Some(prev) = current.last() {
            let gap = (fragment.bbox.x - prev.bbox.right()) as f64;
            if gap > config.x_gap_threshold {
                groups.push(std::mem::take(&mut current));
            }
        }
        current.push(fragment);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
        .into_iter()
        .map(|group| {
            let fragments: Vec<TextFragment> = group.into_iter().cloned().collect();
            Phrase {
                text: merge_phrase_text(&fragments, config.space_gap),
                item_count: fragments.len(),
                fragments,
            }
        })
        .collect()
}
