//! Rule selection

use spantrim_core::{Rule, TrimInput};

/// Trim rules of an input record, in their original order
///
/// A record without a rule collection has no rules.
pub fn select_rules(input: &TrimInput) -> Vec<&Rule> {
    input
        .ner_rules
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|rule| rule.is_trim())
        .collect()
}
