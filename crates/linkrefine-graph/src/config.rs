//! Run configuration.
//!
//! All settings for one run live in a [`RefineConfig`] that is passed
//! explicitly to the loader, the index and the selector. Every section
//! deserializes with defaults so a partial TOML table is enough.

use serde::{Deserialize, Serialize};

use crate::error::{RefineError, Result};
use crate::links::{is_hierarchy_match, LinkPolicy};

/// Default backlink threshold (a candidate needs strictly more).
pub const DEFAULT_MIN_BACKLINKS: usize = 5;

/// Default content size ceiling (inclusive).
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 3;

/// Complete configuration for one refinement run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Candidate thresholds.
    pub selection: SelectionCriteria,
    /// How link targets resolve to pages.
    pub link_policy: LinkPolicy,
    /// Corpus scanning options.
    pub scan: ScanOptions,
    /// Pages and hierarchies never proposed for refinement.
    pub skip: SkipList,
}

impl RefineConfig {
    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(RefineError::InvalidConfig(
                "at least one file extension must be scanned".to_string(),
            ));
        }
        if let Some(ext) = self.scan.extensions.iter().find(|e| e.trim().is_empty()) {
            return Err(RefineError::InvalidConfig(format!(
                "empty file extension in scan.extensions: {:?}",
                ext
            )));
        }
        Ok(())
    }
}

/// How the size of a page's content is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMeasure {
    /// Number of lines after trimming trailing whitespace; blank content is 0.
    #[default]
    Lines,
    /// Number of characters after trimming leading/trailing whitespace.
    Chars,
}

impl ContentMeasure {
    /// Size of `content` under this measure.
    pub fn size_of(self, content: &str) -> usize {
        match self {
            Self::Lines => content.trim_end().lines().count(),
            Self::Chars => content.trim().chars().count(),
        }
    }
}

impl std::fmt::Display for ContentMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lines => write!(f, "lines"),
            Self::Chars => write!(f, "chars"),
        }
    }
}

impl std::str::FromStr for ContentMeasure {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" | "line" => Ok(Self::Lines),
            "chars" | "characters" | "char" => Ok(Self::Chars),
            _ => Err(format!("Unknown measure: {}. Use 'lines' or 'chars'.", s)),
        }
    }
}

/// Thresholds deciding which pages are refinement candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCriteria {
    /// A candidate has strictly more backlinks than this.
    pub min_backlinks: usize,
    /// A candidate's content size is at most this.
    pub max_content_size: usize,
    /// Unit of `max_content_size`.
    pub measure: ContentMeasure,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_backlinks: DEFAULT_MIN_BACKLINKS,
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            measure: ContentMeasure::default(),
        }
    }
}

impl SelectionCriteria {
    /// Whether a page with these numbers qualifies.
    pub fn accepts(&self, backlinks: usize, content_size: usize) -> bool {
        backlinks > self.min_backlinks && content_size <= self.max_content_size
    }
}

/// Pages and hierarchy prefixes excluded from candidacy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipList {
    /// Exact page identities.
    pub pages: Vec<String>,
    /// Hierarchy prefixes; `Area` skips `Area` and `Area/...`.
    pub hierarchies: Vec<String>,
}

impl SkipList {
    /// Whether `page` is excluded.
    pub fn contains(&self, page: &str) -> bool {
        self.pages.iter().any(|p| p == page)
            || self
                .hierarchies
                .iter()
                .any(|prefix| is_hierarchy_match(page, prefix))
    }

    /// Add a page. Returns `false` if it was already listed.
    pub fn add_page(&mut self, page: impl Into<String>) -> bool {
        let page = page.into();
        if self.pages.contains(&page) {
            return false;
        }
        self.pages.push(page);
        true
    }

    /// Add a hierarchy prefix. Returns `false` if it was already listed.
    pub fn add_hierarchy(&mut self, prefix: impl Into<String>) -> bool {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        if self.hierarchies.contains(&prefix) {
            return false;
        }
        self.hierarchies.push(prefix);
        true
    }

    /// Remove an entry from either list. Returns `false` if it was absent.
    pub fn remove(&mut self, entry: &str) -> bool {
        let before = self.pages.len() + self.hierarchies.len();
        self.pages.retain(|p| p != entry);
        self.hierarchies.retain(|h| h != entry);
        before != self.pages.len() + self.hierarchies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.hierarchies.is_empty()
    }
}

/// What to do when two files map to the same page identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Keep the file scanned last and warn.
    #[default]
    LastWins,
    /// Keep the file scanned first and warn.
    FirstWins,
    /// Abort the scan.
    Error,
}

/// Corpus scanning options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File extensions treated as pages, without the dot.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub exclude_dirs: Vec<String>,
    /// Decode Logseq namespace file names (`A___B`, `A%2FB`) into `A/B`.
    pub decode_namespaces: bool,
    /// Identity collision handling.
    pub collision_policy: CollisionPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            exclude_dirs: [".git", ".obsidian", "logseq", "node_modules", ".trash"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            decode_namespaces: true,
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl ScanOptions {
    /// Whether files with this extension are pages.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Whether a directory with this name is skipped.
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RefineConfig::default();
        assert_eq!(config.selection.min_backlinks, 5);
        assert_eq!(config.selection.max_content_size, 3);
        assert_eq!(config.selection.measure, ContentMeasure::Lines);
        assert_eq!(config.link_policy, LinkPolicy::Hierarchical);
        assert!(config.skip.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_measure_lines() {
        assert_eq!(ContentMeasure::Lines.size_of(""), 0);
        assert_eq!(ContentMeasure::Lines.size_of("  \n\n"), 0);
        assert_eq!(ContentMeasure::Lines.size_of("- a"), 1);
        assert_eq!(ContentMeasure::Lines.size_of("- a\n- b\n"), 2);
        assert_eq!(ContentMeasure::Lines.size_of("- a\n\n- b"), 3);
    }

    #[test]
    fn test_measure_chars() {
        assert_eq!(ContentMeasure::Chars.size_of(""), 0);
        assert_eq!(ContentMeasure::Chars.size_of("  -  \n"), 1);
        assert_eq!(ContentMeasure::Chars.size_of("héllo"), 5);
    }

    #[test]
    fn test_selection_is_strict_on_backlinks() {
        let criteria = SelectionCriteria::default();
        assert!(!criteria.accepts(5, 0));
        assert!(criteria.accepts(6, 0));
        assert!(criteria.accepts(6, 3));
        assert!(!criteria.accepts(6, 4));
        assert!(!criteria.accepts(0, 0));
    }

    #[test]
    fn test_skip_list() {
        let mut skip = SkipList::default();
        assert!(skip.add_page("Inbox"));
        assert!(!skip.add_page("Inbox"));
        assert!(skip.add_hierarchy("Area/"));

        assert!(skip.contains("Inbox"));
        assert!(skip.contains("Area"));
        assert!(skip.contains("Area/Health"));
        assert!(!skip.contains("Areas"));
        assert!(!skip.contains("Inbox/Later"));

        assert!(skip.remove("Area"));
        assert!(!skip.contains("Area/Health"));
        assert!(!skip.remove("Area"));
    }

    #[test]
    fn test_scan_options() {
        let scan = ScanOptions::default();
        assert!(scan.accepts_extension("md"));
        assert!(scan.accepts_extension("MD"));
        assert!(!scan.accepts_extension("txt"));
        assert!(scan.excludes_dir(".git"));
        assert!(!scan.excludes_dir("pages"));
    }

    #[test]
    fn test_validate_rejects_empty_extensions() {
        let mut config = RefineConfig::default();
        config.scan.extensions.clear();
        assert!(config.validate().is_err());

        config.scan.extensions = vec!["  ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RefineConfig = toml::from_str(
            r#"
            link_policy = "leaf"

            [selection]
            measure = "chars"

            [scan]
            collision_policy = "first-wins"

            [skip]
            hierarchies = ["Archive"]
            "#,
        )
        .unwrap();

        assert_eq!(config.link_policy, LinkPolicy::Leaf);
        assert_eq!(config.selection.measure, ContentMeasure::Chars);
        assert_eq!(config.selection.min_backlinks, DEFAULT_MIN_BACKLINKS);
        assert_eq!(config.scan.collision_policy, CollisionPolicy::FirstWins);
        assert!(config.scan.decode_namespaces);
        assert!(config.skip.contains("Archive/2023"));
    }

    #[test]
    fn test_measure_from_str() {
        assert_eq!("chars".parse::<ContentMeasure>(), Ok(ContentMeasure::Chars));
        assert_eq!("Lines".parse::<ContentMeasure>(), Ok(ContentMeasure::Lines));
        assert!("words".parse::<ContentMeasure>().is_err());
    }
}
