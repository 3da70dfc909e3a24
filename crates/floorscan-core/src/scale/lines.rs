use std::collections::HashMap;

use crate::model::TextSpan;
use crate::scale::patterns::{match_architectural, ScaleMatch};

/// Rebuild logical text lines from word boxes.
///
/// Words whose `y0` agrees to one decimal place share a line. Lines keep the
/// order in which their first word appears; words within a line are sorted by
/// `x0` and joined with single spaces.
pub fn reconstruct_lines(words: &[TextSpan]) -> Vec<String> {
    let mut index_of_row: HashMap<i64, usize> = HashMap::new();
    let mut rows: Vec<Vec<&TextSpan>> = Vec::new();

    for word in words {
        let key = (word.y0 * 10.0).round() as i64;
        let idx = *index_of_row.entry(key).or_insert_with(|| {
            rows.push(Vec::new());
            rows.len() - 1
        });
        rows[idx].push(word);
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            row.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Run the architectural pattern over each rebuilt line; first match wins.
///
/// PDF span text often splits a scale string across runs, so this catches
/// annotations the page-level passes miss.
pub fn match_reconstructed_lines(words: &[TextSpan]) -> Option<ScaleMatch> {
    reconstruct_lines(words)
        .iter()
        .find_map(|line| match_architectural(line))
}
