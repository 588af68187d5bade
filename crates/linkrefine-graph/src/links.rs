//! Link extraction and link stripping over raw page text.
//!
//! A link token is `[[target]]`. The target is the text strictly between
//! `[[` and the first following `]]`; brackets do not nest and newlines are
//! not special. Everything here is pure and performs no I/O.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[(.*?)\]\]").expect("link pattern is valid"));

/// How a link target is matched against page identities.
///
/// The same policy drives backlink registration in the index and link
/// stripping in the remover, so a page's backlinks are exactly the pages
/// whose links to it can be stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Target equals the page or starts with `page/`.
    #[default]
    Hierarchical,
    /// Target equals the page, nothing else.
    Exact,
    /// The last `/`-separated segment of the target equals the page.
    Leaf,
}

impl LinkPolicy {
    /// Whether a link with `target` refers to `page` under this policy.
    ///
    /// A target that itself contains `[[` refers to no page; stripping it
    /// would expose a new link.
    pub fn matches(self, target: &str, page: &str) -> bool {
        if !is_page_target(target) {
            return false;
        }
        match self {
            Self::Hierarchical => is_hierarchy_match(target, page),
            Self::Exact => target == page,
            Self::Leaf => leaf(target) == page,
        }
    }

    /// Page identities a link with `target` may refer to, nearest first for
    /// hierarchical targets (`A/B/C`, `A/B`, `A`).
    ///
    /// The index keeps only the ones that were actually scanned.
    pub fn resolve(self, target: &str) -> Vec<&str> {
        if !is_page_target(target) {
            return Vec::new();
        }
        match self {
            Self::Hierarchical => {
                let mut pages = vec![target];
                let mut rest = target;
                while let Some(pos) = rest.rfind('/') {
                    rest = &rest[..pos];
                    pages.push(rest);
                }
                pages
            }
            Self::Exact => vec![target],
            Self::Leaf => vec![leaf(target)],
        }
    }
}

impl std::fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hierarchical => write!(f, "hierarchical"),
            Self::Exact => write!(f, "exact"),
            Self::Leaf => write!(f, "leaf"),
        }
    }
}

impl std::str::FromStr for LinkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hierarchical" | "hierarchy" => Ok(Self::Hierarchical),
            "exact" | "full" => Ok(Self::Exact),
            "leaf" => Ok(Self::Leaf),
            _ => Err(format!(
                "Unknown link policy: {}. Use 'hierarchical', 'exact' or 'leaf'.",
                s
            )),
        }
    }
}

/// Whether `target` can name a page at all.
fn is_page_target(target: &str) -> bool {
    !target.contains("[[")
}

/// Target equals `page`, or starts with `page/`.
///
/// `ProjectX` is not a match for `Project`.
pub fn is_hierarchy_match(target: &str, page: &str) -> bool {
    match target.strip_prefix(page) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Last `/`-separated segment of a link target.
pub fn leaf(target: &str) -> &str {
    target.rsplit('/').next().unwrap_or(target)
}

/// All link targets in `content`, in order of first character offset.
///
/// Duplicates are preserved; callers that need uniqueness dedupe.
pub fn find_links(content: &str) -> Vec<&str> {
    LINK_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Number of links in `content` that refer to `page` under `policy`.
pub fn count_links_to(content: &str, page: &str, policy: LinkPolicy) -> usize {
    find_links(content)
        .into_iter()
        .filter(|target| policy.matches(target, page))
        .count()
}

/// Remove the `[[`/`]]` markers around every link to `page` (hierarchy-aware).
///
/// See [`strip_links_with`].
pub fn strip_links_to<'a>(content: &'a str, page: &str) -> Cow<'a, str> {
    strip_links_with(content, page, LinkPolicy::Hierarchical)
}

/// Remove the `[[`/`]]` markers around every link in `content` whose target
/// refers to `page` under `policy`.
///
/// The target text itself stays verbatim (`[[Project/Sub]]` becomes
/// `Project/Sub`); every other byte, including non-matching links, is kept.
/// Applying it twice is the same as applying it once. Returns a borrowed
/// value when nothing matched.
pub fn strip_links_with<'a>(content: &'a str, page: &str, policy: LinkPolicy) -> Cow<'a, str> {
    LINK_RE.replace_all(content, |cap: &Captures<'_>| {
        let whole = &cap[0];
        let target = &cap[1];
        if policy.matches(target, page) {
            target.to_string()
        } else {
            whole.to_string()
        }
    })
}
