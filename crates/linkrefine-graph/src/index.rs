//! Bidirectional link index over a scanned corpus.
//!
//! Maps every page identity to its content, file path and the ordered set of
//! pages linking to it.
//!
//! # Backlinks are computed once
//!
//! Backlink sets are built in [`LinkGraph::build`] and never recomputed.
//! [`LinkGraph::update_content`] replaces a page's content only: a page whose
//! link was stripped during a run still appears as a backlink source of the
//! target for the rest of that run. Rebuild the graph to see the new state.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::corpus::Page;
use crate::error::{RefineError, Result};
use crate::links::{find_links, LinkPolicy};

/// A link whose target resolved to no scanned page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub source: String,
    pub target: String,
}

/// Index entry for one scanned page.
#[derive(Debug, Clone)]
pub struct PageRecord {
    id: String,
    path: PathBuf,
    content: String,
    /// Source page positions, in registration order, without duplicates.
    backlinks: Vec<usize>,
}

impl PageRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn backlink_count(&self) -> usize {
        self.backlinks.len()
    }
}

/// The link graph for one run.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    records: Vec<PageRecord>,
    positions: HashMap<String, usize>,
    policy: LinkPolicy,
    dangling: Vec<DanglingLink>,
}

impl LinkGraph {
    /// Build the index from scanned pages in scan order.
    ///
    /// Every link target is resolved under `policy`; a backlink is registered
    /// on each resolved identity that is a scanned page (for hierarchical
    /// links to `A/B/C` that is any of `A/B/C`, `A/B` and `A`). A source is
    /// registered at most once per target page. Links resolving to no
    /// scanned page are kept in [`LinkGraph::dangling_links`].
    pub fn build<I>(pages: I, policy: LinkPolicy) -> Self
    where
        I: IntoIterator<Item = Page>,
    {
        let mut graph = Self {
            policy,
            ..Self::default()
        };

        for page in pages {
            match graph.positions.get(&page.id) {
                Some(&pos) => {
                    let record = &mut graph.records[pos];
                    record.path = page.path;
                    record.content = page.content;
                }
                None => {
                    graph.positions.insert(page.id.clone(), graph.records.len());
                    graph.records.push(PageRecord {
                        id: page.id,
                        path: page.path,
                        content: page.content,
                        backlinks: Vec::new(),
                    });
                }
            }
        }

        let mut registered: HashSet<(usize, usize)> = HashSet::new();
        let mut link_count = 0usize;

        for source in 0..graph.records.len() {
            let mut targets = Vec::new();
            for target in find_links(&graph.records[source].content) {
                link_count += 1;
                let resolved: Vec<usize> = policy
                    .resolve(target)
                    .into_iter()
                    .filter_map(|id| graph.positions.get(id).copied())
                    .collect();
                if resolved.is_empty() {
                    graph.dangling.push(DanglingLink {
                        source: graph.records[source].id.clone(),
                        target: target.to_string(),
                    });
                    continue;
                }
                // Ancestors are registered root first.
                targets.extend(resolved.into_iter().rev());
            }

            for target in targets {
                if registered.insert((target, source)) {
                    graph.records[target].backlinks.push(source);
                }
            }
        }

        info!(
            pages = graph.records.len(),
            links = link_count,
            backlinks = registered.len(),
            dangling = graph.dangling.len(),
            policy = %policy,
            "Link graph built"
        );
        graph
    }

    /// Build from bare `(identity, content)` pairs; paths become `<id>.md`.
    pub fn from_contents<I, K, V>(entries: I, policy: LinkPolicy) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::build(
            entries.into_iter().map(|(id, content)| {
                let id = id.into();
                let path = PathBuf::from(format!("{}.md", id));
                Page::new(id, path, content)
            }),
            policy,
        )
    }

    pub fn policy(&self) -> LinkPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, page: &str) -> bool {
        self.positions.contains_key(page)
    }

    /// Pages in first-seen order.
    pub fn pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.records.iter()
    }

    pub fn record(&self, page: &str) -> Option<&PageRecord> {
        self.positions.get(page).map(|&pos| &self.records[pos])
    }

    /// First-seen position of a page, used as the selection tie-break.
    pub fn position(&self, page: &str) -> Option<usize> {
        self.positions.get(page).copied()
    }

    /// Current content of a page.
    pub fn content(&self, page: &str) -> Result<&str> {
        self.get(page).map(PageRecord::content)
    }

    /// File the page was read from.
    pub fn path(&self, page: &str) -> Result<&Path> {
        self.get(page).map(PageRecord::path)
    }

    /// Pages linking to `page`, in registration order.
    pub fn backlinks(&self, page: &str) -> Result<Vec<&str>> {
        let record = self.get(page)?;
        Ok(record
            .backlinks
            .iter()
            .map(|&pos| self.records[pos].id.as_str())
            .collect())
    }

    pub fn backlink_count(&self, page: &str) -> usize {
        self.record(page).map_or(0, PageRecord::backlink_count)
    }

    /// Replace a page's content. Backlinks are not recomputed.
    pub fn update_content(&mut self, page: &str, content: impl Into<String>) -> Result<()> {
        let pos = *self
            .positions
            .get(page)
            .ok_or_else(|| RefineError::UnknownPage(page.to_string()))?;
        debug!(page = %page, "Updating page content");
        self.records[pos].content = content.into();
        Ok(())
    }

    /// Links whose targets matched no scanned page.
    pub fn dangling_links(&self) -> &[DanglingLink] {
        &self.dangling
    }

    fn get(&self, page: &str) -> Result<&PageRecord> {
        self.record(page)
            .ok_or_else(|| RefineError::UnknownPage(page.to_string()))
    }
}
