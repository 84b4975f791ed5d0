//! Trim extractor
//!
//! Runs every trim rule of an input record against its utterance, merges
//! the resulting edges with those already on the record, sorts them by
//! start, and reduces overlaps.

use std::sync::Arc;

use spantrim_core::{Condition, Edge, ExtractorConfig, Result, Rule, SpanStrategy, TrimInput};

use crate::offsets::CharMap;
use crate::reducer::{AccuracyReducer, EdgeReducer};
use crate::registry::{ExtractorRegistry, REGISTRY_PREFIX};
use crate::{between, locator, rules, skip, span, Extractor};

/// Rule-driven extractor for text surrounding anchor words
pub struct TrimExtractor {
    config: ExtractorConfig,
    reducer: Arc<dyn EdgeReducer>,
    registry: Option<Arc<dyn ExtractorRegistry>>,
}

impl TrimExtractor {
    /// Create an extractor with the default configuration and reducer
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create with custom config
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self {
            config,
            reducer: Arc::new(AccuracyReducer),
            registry: None,
        }
    }

    /// Replace the overlap reducer
    pub fn with_reducer(mut self, reducer: impl EdgeReducer + 'static) -> Self {
        self.reducer = Arc::new(reducer);
        self
    }

    /// Resolve locale-specific extractors through `registry`
    pub fn with_registry(mut self, registry: Arc<dyn ExtractorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Registry key of the extractor serving `locale`
    pub fn registry_key(&self, locale: &str) -> String {
        format!("{REGISTRY_PREFIX}-{locale}")
    }

    /// Edges for one condition, skip-list applied
    pub fn match_condition(&self, utterance: &str, condition: &Condition) -> Result<Vec<Edge>> {
        match condition.strategy {
            SpanStrategy::Between => Ok(between::match_between(
                utterance,
                condition,
                &self.config.entity_name,
            )),
            SpanStrategy::Unknown => Ok(Vec::new()),
            strategy => self.match_words(utterance, condition, strategy),
        }
    }

    fn match_words(
        &self,
        utterance: &str,
        condition: &Condition,
        strategy: SpanStrategy,
    ) -> Result<Vec<Edge>> {
        let map = CharMap::new(utterance);
        let options = &condition.options;
        let mut edges = Vec::new();

        for word in &condition.words {
            let anchors =
                locator::find_in(&map, word, options.case_sensitive, options.no_spaces)?;
            if anchors.is_empty() {
                continue;
            }
            tracing::trace!("Word {:?} anchored {} times", word, anchors.len());
            edges.extend(span::build_in(
                &map,
                &anchors,
                strategy,
                &self.config.entity_name,
            ));
        }

        Ok(skip::retain_unskipped(edges, condition))
    }

    /// Edges for every condition of a rule, in condition order
    pub fn extract_from_rule(&self, utterance: &str, rule: &Rule) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();
        for condition in &rule.rules {
            edges.extend(self.match_condition(utterance, condition)?);
        }
        Ok(edges)
    }

    /// Replace `input.edges` with the reduced union of existing and trim edges
    ///
    /// Only `edges` is written. Fails when the record has trim rules but
    /// carries neither `text` nor `utterance`.
    pub fn extract(&self, mut input: TrimInput) -> Result<TrimInput> {
        let mut edges = std::mem::take(&mut input.edges);
        let selected = rules::select_rules(&input);

        if !selected.is_empty() {
            let utterance = input.utterance_text()?;
            for rule in selected {
                let found = self.extract_from_rule(utterance, rule)?;
                tracing::debug!(
                    "Trim rule {} produced {} edges",
                    rule.name.as_deref().unwrap_or("<unnamed>"),
                    found.len()
                );
                edges.extend(found);
            }
        }

        edges.sort_by_key(|edge| edge.start);
        input.edges = self.reducer.reduce(edges, self.config.keep_overlaps);
        Ok(input)
    }

    /// Extract with the extractor registered for the record's locale
    ///
    /// Falls back to the configured default locale when the record has none,
    /// and to `self` when nothing is registered for the locale.
    pub fn run(&self, input: TrimInput) -> Result<TrimInput> {
        let locale = input
            .locale
            .as_deref()
            .unwrap_or(&self.config.default_locale);
        let key = self.registry_key(locale);

        match self.registry.as_ref().and_then(|registry| registry.get(&key)) {
            Some(extractor) => {
                tracing::debug!("Dispatching to registered extractor {}", key);
                extractor.extract(input)
            }
            None => self.extract(input),
        }
    }
}

impl Default for TrimExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TrimExtractor {
    fn name(&self) -> &str {
        &self.config.entity_name
    }

    fn extract(&self, input: TrimInput) -> Result<TrimInput> {
        TrimExtractor::extract(self, input)
    }
}

impl std::fmt::Debug for TrimExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrimExtractor")
            .field("config", &self.config)
            .field("has_registry", &self.registry.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use spantrim_core::{Pattern, TrimError};

    fn texts(input: &TrimInput) -> Vec<&str> {
        input.edges.iter().map(|e| e.source_text.as_str()).collect()
    }

    #[test]
    fn test_extract_before_and_after() {
        let rule = Rule::trim(vec![
            Condition::positional(SpanStrategy::Before, ["quick"]),
            Condition::positional(SpanStrategy::After, ["quick"]),
        ]);
        let input = TrimInput::new("the quick brown fox").with_rules(vec![rule]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert_eq!(texts(&output), vec!["the", "brown fox"]);
        assert!(output.edges.iter().all(|e| e.entity == "extract-trim"));
    }

    #[test]
    fn test_case_sensitive_anchor() {
        let rule = Rule::trim(vec![
            Condition::positional(SpanStrategy::AfterLast, ["To"]).with_case_sensitive(true),
        ]);
        let input = TrimInput::new("fly to Paris To Rome").with_rules(vec![rule]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert_eq!(texts(&output), vec!["Rome"]);
    }

    #[test]
    fn test_words_without_anchors_contribute_nothing() {
        let rule = Rule::trim(vec![Condition::positional(
            SpanStrategy::After,
            ["missing", "from"],
        )]);
        let input = TrimInput::new("send it from home").with_rules(vec![rule]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert_eq!(texts(&output), vec!["home"]);
    }

    #[test]
    fn test_skip_list_drops_span() {
        let rule = Rule::trim(vec![
            Condition::positional(SpanStrategy::AfterLast, ["from"]).with_skip(["Home"]),
        ]);
        let input = TrimInput::new("send it from home").with_rules(vec![rule]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert!(output.edges.is_empty());
    }

    #[test]
    fn test_between_condition() {
        let rule = Rule::trim(vec![Condition::between(Pattern::new(r"\d").unwrap())]);
        let input = TrimInput::new("a 1 b 2 c").with_rules(vec![rule]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert_eq!(texts(&output), vec!["1", "2"]);
    }

    #[test]
    fn test_missing_text_is_an_error() {
        let input = TrimInput::default().with_rules(vec![Rule::trim(vec![])]);
        let result = TrimExtractor::new().extract(input);
        assert!(matches!(result, Err(TrimError::MissingText)));
    }

    #[test]
    fn test_no_trim_rules_without_text() {
        let existing = Edge::new("enum", 0, "book", 1.0, "action");
        let input = TrimInput::default().with_edges(vec![existing.clone()]);

        let output = TrimExtractor::new().extract(input).unwrap();
        assert_eq!(output.edges, vec![existing]);
    }

    #[test]
    fn test_registry_key() {
        assert_eq!(TrimExtractor::new().registry_key("es"), "extract-trim-es");
    }

    #[test]
    fn test_registry_key_ignores_entity_name() {
        let config = ExtractorConfig {
            entity_name: "city".to_string(),
            ..ExtractorConfig::default()
        };
        let extractor = TrimExtractor::with_config(config);
        assert_eq!(extractor.registry_key("es"), "extract-trim-es");
    }

    #[test]
    fn test_run_falls_back_to_self() {
        let registry = Arc::new(InMemoryRegistry::new());
        let extractor = TrimExtractor::new().with_registry(registry);
        let rule = Rule::trim(vec![Condition::positional(SpanStrategy::AfterFirst, ["to"])]);
        let input = TrimInput::new("go to bed")
            .with_locale("fr")
            .with_rules(vec![rule]);

        let output = extractor.run(input).unwrap();
        assert_eq!(texts(&output), vec!["bed"]);
    }

    #[test]
    fn test_run_uses_registered_locale() {
        let registry = Arc::new(InMemoryRegistry::new());
        let spanish = TrimExtractor::new()
            .with_reducer(|_: Vec<Edge>, _: bool| -> Vec<Edge> { Vec::new() });
        registry.register("extract-trim-es", Arc::new(spanish));

        let extractor = TrimExtractor::new().with_registry(registry);
        let rule = Rule::trim(vec![Condition::positional(SpanStrategy::AfterFirst, ["a"])]);

        let spanish_input = TrimInput::new("voy a Madrid")
            .with_locale("es")
            .with_rules(vec![rule.clone()]);
        assert!(extractor.run(spanish_input).unwrap().edges.is_empty());

        // No locale: configured default "en" has no registration
        let default_input = TrimInput::new("voy a Madrid").with_rules(vec![rule]);
        assert_eq!(texts(&extractor.run(default_input).unwrap()), vec!["Madrid"]);
    }
}
