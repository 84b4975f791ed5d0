//! Skip-list filtering

use spantrim_core::{Condition, Edge};

/// Whether a candidate text is disqualified by the condition's skip-list
///
/// Comparison is exact when the condition is case-sensitive, case-folded
/// otherwise.
pub fn must_skip(candidate: &str, condition: &Condition) -> bool {
    let options = &condition.options;
    if options.skip.is_empty() {
        return false;
    }

    if options.case_sensitive {
        options.skip.iter().any(|entry| entry == candidate)
    } else {
        let candidate = candidate.to_lowercase();
        options
            .skip
            .iter()
            .any(|entry| entry.to_lowercase() == candidate)
    }
}

/// Drop every edge whose text is on the condition's skip-list
pub(crate) fn retain_unskipped(mut edges: Vec<Edge>, condition: &Condition) -> Vec<Edge> {
    edges.retain(|edge| !must_skip(&edge.utterance_text, condition));
    edges
}
