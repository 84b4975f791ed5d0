//! Overlap reduction
//!
//! Collapses a start-sorted edge list into the set handed back to the
//! pipeline. The extractor only depends on [`EdgeReducer`]; the pipeline may
//! inject its own policy.

use spantrim_core::Edge;

/// Reduces a start-sorted edge list
pub trait EdgeReducer: Send + Sync {
    fn reduce(&self, edges: Vec<Edge>, keep_overlaps: bool) -> Vec<Edge>;
}

impl<F> EdgeReducer for F
where
    F: Fn(Vec<Edge>, bool) -> Vec<Edge> + Send + Sync,
{
    fn reduce(&self, edges: Vec<Edge>, keep_overlaps: bool) -> Vec<Edge> {
        self(edges, keep_overlaps)
    }
}

/// Default reducer: higher accuracy wins, then the longer span
///
/// For every pair of overlapping edges the one with lower accuracy is
/// discarded. On equal accuracy, edges from the same entity keep the longer
/// span (the earlier one on a tie); edges from different entities are both
/// kept. Empty edges overlap nothing. Input order is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyReducer;

impl EdgeReducer for AccuracyReducer {
    fn reduce(&self, edges: Vec<Edge>, keep_overlaps: bool) -> Vec<Edge> {
        if keep_overlaps {
            return edges;
        }

        let mut discarded = vec![false; edges.len()];
        for i in 0..edges.len() {
            if discarded[i] {
                continue;
            }
            for j in i + 1..edges.len() {
                if discarded[j] || !edges[i].overlaps(&edges[j]) {
                    continue;
                }

                let (edge, other) = (&edges[i], &edges[j]);
                if other.accuracy < edge.accuracy {
                    discarded[j] = true;
                } else if other.accuracy > edge.accuracy {
                    discarded[i] = true;
                    break;
                } else if edge.entity == other.entity {
                    if other.len <= edge.len {
                        discarded[j] = true;
                    } else {
                        discarded[i] = true;
                        break;
                    }
                }
            }
        }

        edges
            .into_iter()
            .zip(discarded)
            .filter_map(|(edge, gone)| (!gone).then_some(edge))
            .collect()
    }
}
