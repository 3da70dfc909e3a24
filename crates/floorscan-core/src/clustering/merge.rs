use crate::model::TextFragment;

/// Concatenate fragment texts left to right.
///
/// A single space goes between two fragments whose horizontal gap exceeds
/// `space_gap`; closer fragments are glued together.
pub fn merge_phrase_text(fragments: &[TextFragment], space_gap: f64) -> String {
    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    sorted.sort_by_key(|f| f.bbox.x);

    let mut merged = String::new();
    let mut prev_right: Option<i64> = None;
    for fragment in sorted {
        if let Some(right) = prev_right {
            if (fragment.bbox.x - right) as f64 > space_gap {
                merged.push(' ');
            }
        }
        merged.push_str(&fragment.text);
        prev_right = Some(fragment.bbox.right());
    }
    merged
}
