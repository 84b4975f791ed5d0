//! spantrim Extractor - Trim-rule span extraction
//!
//! Locates anchor words or patterns inside an utterance and carves out the
//! text around them:
//! - Word location with optional case sensitivity and space handling
//! - Positional span strategies (before/after every, first, or last anchor)
//! - Pattern matching for `between` conditions
//! - Skip-list filtering, sorting, and overlap reduction
//! - Locale dispatch through an extractor registry

use spantrim_core::{Result, TrimInput};

/// Trait for pipeline extractors that contribute edges to an input record
///
/// Implementations replace `input.edges` and leave every other field alone.
pub trait Extractor: Send + Sync {
    /// Identifier written into the edges this extractor produces
    fn name(&self) -> &str;

    fn extract(&self, input: TrimInput) -> Result<TrimInput>;
}

pub mod between;
pub mod locator;
pub mod offsets;
pub mod reducer;
pub mod registry;
pub mod rules;
pub mod skip;
pub mod span;
pub mod trim;

pub use between::{match_between, BetweenMatches, BETWEEN_ACCURACY};
pub use locator::find_word;
pub use reducer::{AccuracyReducer, EdgeReducer};
pub use registry::{ExtractorRegistry, InMemoryRegistry, REGISTRY_PREFIX};
pub use rules::select_rules;
pub use skip::must_skip;
pub use span::{build_spans, POSITIONAL_ACCURACY};
pub use trim::TrimExtractor;
