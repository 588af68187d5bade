//! Candidate selection: pages with many backlinks and little content.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{SelectionCriteria, SkipList};
use crate::index::LinkGraph;

/// A page selected for refinement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub page: String,
    pub backlinks: usize,
    pub content_size: usize,
}

/// Select refinement candidates.
///
/// A page qualifies when it has strictly more than `min_backlinks` backlinks,
/// its content size is at most `max_content_size` and it is not skip-listed.
/// Results are ordered by backlink count, highest first; ties keep the order
/// in which pages were first seen while building the graph.
pub fn select(graph: &LinkGraph, criteria: &SelectionCriteria, skip: &SkipList) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = graph
        .pages()
        .filter_map(|record| {
            let backlinks = record.backlink_count();
            let content_size = criteria.measure.size_of(record.content());
            if !criteria.accepts(backlinks, content_size) {
                return None;
            }
            if skip.contains(record.id()) {
                debug!(page = %record.id(), "Skip-listed page excluded from candidates");
                return None;
            }
            Some(Candidate {
                page: record.id().to_string(),
                backlinks,
                content_size,
            })
        })
        .collect();

    // Stable sort keeps first-seen order among equal counts.
    candidates.sort_by(|a, b| b.backlinks.cmp(&a.backlinks));

    info!(
        candidates = candidates.len(),
        min_backlinks = criteria.min_backlinks,
        max_content_size = criteria.max_content_size,
        measure = %criteria.measure,
        "Candidates selected"
    );
    candidates
}
