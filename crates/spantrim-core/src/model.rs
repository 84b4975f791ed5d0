//! Domain models for trim extraction
//!
//! Rules and conditions arrive from an external rule store, input records
//! from the surrounding NER pipeline. All of them keep the camelCase JSON
//! shape the pipeline exchanges.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, TrimError};

/// Rule type consumed by the trim extractor
pub const TRIM_RULE_TYPE: &str = "trim";

// ============================================================================
// Span Strategies
// ============================================================================

/// How a condition turns anchors into candidate spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpanStrategy {
    /// Text before every anchor, chained from the previous anchor
    Before,
    /// Text from the utterance start up to the first anchor
    BeforeFirst,
    /// Text from the utterance start up to the last anchor
    BeforeLast,
    /// Text after every anchor, chained up to the next anchor
    After,
    /// Text from the first anchor to the utterance end
    AfterFirst,
    /// Text from the last anchor to the utterance end
    AfterLast,
    /// Every match of a pattern over the space-padded utterance
    Between,
    /// Any strategy name this extractor does not know; yields nothing
    Unknown,
}

impl SpanStrategy {
    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::BeforeFirst => "beforeFirst",
            Self::BeforeLast => "beforeLast",
            Self::After => "after",
            Self::AfterFirst => "afterFirst",
            Self::AfterLast => "afterLast",
            Self::Between => "between",
            Self::Unknown => "unknown",
        }
    }

    /// Resolve a wire name, falling back to `Unknown`
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "before" => Self::Before,
            "beforefirst" => Self::BeforeFirst,
            "beforelast" => Self::BeforeLast,
            "after" => Self::After,
            "afterfirst" => Self::AfterFirst,
            "afterlast" => Self::AfterLast,
            "between" => Self::Between,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SpanStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for SpanStrategy {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<SpanStrategy> for String {
    fn from(strategy: SpanStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

// ============================================================================
// Patterns
// ============================================================================

/// Compiled pattern for `between` conditions
///
/// Accepts either a bare pattern or a slash-delimited literal such as
/// `/ from (.+?) to /gi`. Flags: `i` (case-insensitive), `m` (multi-line),
/// `s` (dot matches newline); `g` and `u` are accepted and have no effect.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let (body, flags) = split_literal(&source);

        let mut builder = RegexBuilder::new(body);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'u' => {}
                other => {
                    return Err(TrimError::InvalidPattern {
                        pattern: source.clone(),
                        reason: format!("unsupported flag '{other}'"),
                    })
                }
            }
        }

        let regex = builder.build().map_err(|e| TrimError::InvalidPattern {
            pattern: source.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self { source, regex })
    }

    /// Source text as supplied by the rule
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiled expression
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Split `/body/flags` into its parts; anything else is a bare pattern
fn split_literal(source: &str) -> (&str, &str) {
    if let Some(rest) = source.strip_prefix('/') {
        if let Some(idx) = rest.rfind('/') {
            let flags = &rest[idx + 1..];
            if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                return (&rest[..idx], flags);
            }
        }
    }
    (source, "")
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl TryFrom<String> for Pattern {
    type Error = TrimError;

    fn try_from(source: String) -> Result<Self> {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

impl Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let source = String::deserialize(deserializer)?;
        Self::new(source).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Rules and Conditions
// ============================================================================

/// Matching options attached to a condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionOptions {
    /// Compare anchors and skip entries exactly instead of case-folded
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub case_sensitive: bool,

    /// Match anchor words anywhere, without a flanking space
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_spaces: bool,

    /// Candidate texts that disqualify a span
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip: Vec<String>,
}

/// One matching directive inside a trim rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default = "unknown_strategy")]
    pub strategy: SpanStrategy,

    /// Anchor words for positional strategies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,

    /// Pattern for `between` conditions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Pattern>,

    #[serde(default, skip_serializing_if = "ConditionOptions::is_default")]
    pub options: ConditionOptions,
}

fn unknown_strategy() -> SpanStrategy {
    SpanStrategy::Unknown
}

impl ConditionOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Condition {
    /// Create a word-anchored condition
    pub fn positional<I, S>(strategy: SpanStrategy, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strategy,
            words: words.into_iter().map(Into::into).collect(),
            regex: None,
            options: ConditionOptions::default(),
        }
    }

    /// Create a pattern-anchored condition
    pub fn between(pattern: Pattern) -> Self {
        Self {
            strategy: SpanStrategy::Between,
            words: Vec::new(),
            regex: Some(pattern),
            options: ConditionOptions::default(),
        }
    }

    /// Set case sensitivity
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = case_sensitive;
        self
    }

    /// Allow anchors without a flanking space
    pub fn with_no_spaces(mut self, no_spaces: bool) -> Self {
        self.options.no_spaces = no_spaces;
        self
    }

    /// Set the skip-list
    pub fn with_skip<I, S>(mut self, skip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.skip = skip.into_iter().map(Into::into).collect();
        self
    }
}

/// A named-entity rule as supplied by the rule store
///
/// Only `trim` rules have their conditions parsed; the payload of any other
/// rule type is kept verbatim so the record round-trips untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub struct Rule {
    pub name: Option<String>,
    pub rule_type: String,
    pub rules: Vec<Condition>,
    /// Conditions of non-trim rules
    pub passthrough: Vec<Value>,
}

impl Rule {
    /// Create a trim rule
    pub fn trim(rules: Vec<Condition>) -> Self {
        Self {
            name: None,
            rule_type: TRIM_RULE_TYPE.to_string(),
            rules,
            passthrough: Vec::new(),
        }
    }

    /// Set the rule name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the trim extractor consumes this rule
    pub fn is_trim(&self) -> bool {
        self.rule_type == TRIM_RULE_TYPE
    }
}

#[derive(Serialize, Deserialize)]
struct RawRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type")]
    rule_type: String,
    #[serde(default)]
    rules: Vec<Value>,
}

impl TryFrom<RawRule> for Rule {
    type Error = serde_json::Error;

    fn try_from(raw: RawRule) -> std::result::Result<Self, Self::Error> {
        if raw.rule_type != TRIM_RULE_TYPE {
            return Ok(Self {
                name: raw.name,
                rule_type: raw.rule_type,
                rules: Vec::new(),
                passthrough: raw.rules,
            });
        }

        let rules = raw
            .rules
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Condition>, _>>()?;

        Ok(Self {
            name: raw.name,
            rule_type: raw.rule_type,
            rules,
            passthrough: Vec::new(),
        })
    }
}

impl From<Rule> for RawRule {
    fn from(rule: Rule) -> Self {
        let mut rules: Vec<Value> = rule
            .rules
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect();
        rules.extend(rule.passthrough);

        Self {
            name: rule.name,
            rule_type: rule.rule_type,
            rules,
        }
    }
}

// ============================================================================
// Anchors and Edges
// ============================================================================

/// Half-open character range of one located anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorPosition {
    pub start: usize,
    pub end: usize,
}

impl AnchorPosition {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Candidate span ("edge") produced by an extractor
///
/// `start` and `end` are inclusive character indices. An empty span reports
/// `end == start - 1`, which is why both are signed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: String,
    pub start: i64,
    pub end: i64,
    pub len: usize,
    pub accuracy: f64,
    pub source_text: String,
    pub utterance_text: String,
    pub entity: String,

    /// Fields set by other extractors in the pipeline
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    /// Create an edge covering `text`, which starts at character `start`
    pub fn new(
        edge_type: impl Into<String>,
        start: i64,
        text: impl Into<String>,
        accuracy: f64,
        entity: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            edge_type: edge_type.into(),
            start,
            end: start + len as i64 - 1,
            len,
            accuracy,
            source_text: text.clone(),
            utterance_text: text,
            entity: entity.into(),
            extra: Map::new(),
        }
    }

    /// Whether the span covers no text
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the inclusive ranges of two non-empty edges intersect
    pub fn overlaps(&self, other: &Edge) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && other.start <= self.end
            && other.end >= self.start
    }
}

// ============================================================================
// Input Record
// ============================================================================

/// Record passed between NER pipeline stages
///
/// The trim extractor only ever writes `edges`; every other field, including
/// ones it does not know about, is carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utterance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ner_rules: Option<Vec<Rule>>,

    #[serde(default)]
    pub edges: Vec<Edge>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrimInput {
    /// Create a record for `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Set locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Set the rule collection
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.ner_rules = Some(rules);
        self
    }

    /// Seed edges contributed by earlier stages
    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges;
        self
    }

    /// Text to extract from: `text` when non-empty, else `utterance`
    pub fn utterance_text(&self) -> Result<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.utterance.as_deref())
            .or(self.text.as_deref())
            .ok_or(TrimError::MissingText)
    }
}

// ============================================================================
// Tests
// ============================================================================
