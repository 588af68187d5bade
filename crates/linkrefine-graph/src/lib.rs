//! Link graph and link refinement engine for markdown note corpora.
//!
//! Finds pages that many notes link to but that carry almost no content of
//! their own, and proposes stripping the `[[...]]` markup around links to
//! them from every linking page.
//!
//! Data flows one way:
//!
//! - [`corpus`]: walk note directories, read each page once
//! - [`links`]: extract link targets and strip links (pure text functions)
//! - [`index`]: bidirectional page/backlink index
//! - [`select`]: deterministic candidate selection
//! - [`diff`]: line diff of original and refined content
//! - [`refine`]: per-candidate, per-backlink review and apply loop
//! - [`writer`]: atomic write-back
//!
//! # Example
//!
//! ```no_run
//! use linkrefine_graph::{prepare, FsPageWriter, NoopObserver, Proposal, RefineConfig};
//!
//! let config = RefineConfig::default();
//! let mut prepared = prepare(&["notes/pages"], &config).expect("scan failed");
//!
//! // Accept every proposal that strips a single link.
//! let mut decider = |p: &Proposal| p.links_removed == 1;
//! let summary = prepared
//!     .session
//!     .run(&mut decider, &mut FsPageWriter::new(), &mut NoopObserver)
//!     .expect("run failed");
//! println!("applied {} refinements", summary.applied);
//! ```

pub mod config;
pub mod corpus;
pub mod diff;
pub mod error;
pub mod index;
pub mod links;
pub mod refine;
pub mod select;
pub mod writer;

pub use config::{
    CollisionPolicy, ContentMeasure, RefineConfig, ScanOptions, SelectionCriteria, SkipList,
};
pub use corpus::{load_corpus, logseq_roots, Collision, LoadReport, Page};
pub use diff::{DiffLine, Hunk, LineDiff, LineKind};
pub use error::{RefineError, Result};
pub use index::{DanglingLink, LinkGraph, PageRecord};
pub use links::{find_links, strip_links_to, strip_links_with, LinkPolicy};
pub use refine::{
    prepare, prepare_with_progress, Decider, Decision, FailedWrite, NoopObserver, Phase,
    Prepared, Proposal, RefineObserver, RefineSession, RunSummary, Step,
};
pub use select::{select, Candidate};
pub use writer::{FsPageWriter, PageWriter};
