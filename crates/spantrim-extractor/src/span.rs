//! Positional span strategies
//!
//! The six before/after strategies differ only in which anchors they use and
//! which side of the anchor they keep, so they share one table:
//!
//! | Strategy    | Anchors | Side   | Span                                         |
//! |-------------|---------|--------|----------------------------------------------|
//! | before      | all     | before | previous anchor end (or 0) .. anchor start   |
//! | beforeFirst | first   | before | 0 .. first anchor start                      |
//! | beforeLast  | last    | before | 0 .. last anchor start                       |
//! | after       | all     | after  | anchor end .. next anchor start (or the end) |
//! | afterFirst  | first   | after  | first anchor end .. utterance end            |
//! | afterLast   | last    | after  | last anchor end .. utterance end             |

use spantrim_core::{AnchorPosition, Edge, SpanStrategy};

use crate::offsets::CharMap;

/// Confidence of every positional span
pub const POSITIONAL_ACCURACY: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchors {
    All,
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

fn plan(strategy: SpanStrategy) -> Option<(Anchors, Side)> {
    match strategy {
        SpanStrategy::Before => Some((Anchors::All, Side::Before)),
        SpanStrategy::BeforeFirst => Some((Anchors::First, Side::Before)),
        SpanStrategy::BeforeLast => Some((Anchors::Last, Side::Before)),
        SpanStrategy::After => Some((Anchors::All, Side::After)),
        SpanStrategy::AfterFirst => Some((Anchors::First, Side::After)),
        SpanStrategy::AfterLast => Some((Anchors::Last, Side::After)),
        SpanStrategy::Between | SpanStrategy::Unknown => None,
    }
}

/// Build candidate edges for a positional strategy
///
/// `anchors` must be ordered by start. Strategies that are not positional,
/// or an empty anchor list, produce nothing. Adjacent anchors yield empty
/// spans, which are kept.
pub fn build_spans(
    utterance: &str,
    anchors: &[AnchorPosition],
    strategy: SpanStrategy,
    entity: &str,
) -> Vec<Edge> {
    build_in(&CharMap::new(utterance), anchors, strategy, entity)
}

pub(crate) fn build_in(
    utterance: &CharMap<'_>,
    anchors: &[AnchorPosition],
    strategy: SpanStrategy,
    entity: &str,
) -> Vec<Edge> {
    let Some((which, side)) = plan(strategy) else {
        return Vec::new();
    };
    let (Some(first), Some(last)) = (anchors.first(), anchors.last()) else {
        return Vec::new();
    };

    let text_end = utterance.char_len();
    let span = |start: usize, end: usize| {
        Edge::new(
            strategy.as_str(),
            start as i64,
            utterance.slice(start, end),
            POSITIONAL_ACCURACY,
            entity,
        )
    };

    match (which, side) {
        (Anchors::All, Side::Before) => {
            let mut from = 0;
            anchors
                .iter()
                .map(|anchor| {
                    let edge = span(from, anchor.start);
                    from = anchor.end;
                    edge
                })
                .collect()
        }
        (Anchors::All, Side::After) => anchors
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let to = anchors.get(i + 1).map_or(text_end, |next| next.start);
                span(anchor.end, to)
            })
            .collect(),
        (Anchors::First, Side::Before) => vec![span(0, first.start)],
        (Anchors::Last, Side::Before) => vec![span(0, last.start)],
        (Anchors::First, Side::After) => vec![span(first.end, text_end)],
        (Anchors::Last, Side::After) => vec![span(last.end, text_end)],
    }
}
