//! Corpus loading: walk note directories and read every page once.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{CollisionPolicy, ScanOptions};
use crate::error::{RefineError, Result};

/// One scanned page: identity, location and content at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub path: PathBuf,
    pub content: String,
}

impl Page {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Two files that resolved to the same page identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub page: String,
    /// File whose content the page carries after the scan.
    pub kept: PathBuf,
    /// File that was ignored.
    pub dropped: PathBuf,
}

/// Result of scanning one or more corpus roots.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Pages in scan order (roots in the order given, files sorted by name).
    pub pages: Vec<Page>,
    /// Files and subdirectories that could not be read.
    pub skipped: Vec<RefineError>,
    /// Identity collisions and how each was resolved.
    pub collisions: Vec<Collision>,
}

/// Expand a Logseq graph directory into its `pages/` and `journals/` roots.
pub fn logseq_roots(graph_dir: &Path) -> Result<Vec<PathBuf>> {
    ["pages", "journals"]
        .iter()
        .map(|name| {
            let dir = graph_dir.join(name);
            if dir.is_dir() {
                Ok(dir)
            } else {
                Err(RefineError::CorpusAccess {
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("not a Logseq graph: missing {}/ directory", name),
                    ),
                    path: dir,
                })
            }
        })
        .collect()
}

/// Page identity for a file: its stem, with Logseq namespace separators
/// decoded into `/` when `decode_namespaces` is set.
pub fn page_identity(path: &Path, decode_namespaces: bool) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    if !decode_namespaces {
        return Some(stem.to_string());
    }
    Some(
        stem.replace("___", "/")
            .replace("%2F", "/")
            .replace("%2f", "/"),
    )
}

/// Scan every root and read every page file once.
///
/// A root that is missing or cannot be listed is fatal. Unreadable files,
/// files that are not valid UTF-8 and unreadable subdirectories are logged,
/// recorded in [`LoadReport::skipped`] and the scan continues. So are page
/// files whose name is not valid UTF-8.
pub fn load_corpus<P: AsRef<Path>>(roots: &[P], options: &ScanOptions) -> Result<LoadReport> {
    // Check every root up front so nothing is read from a run that will abort.
    for root in roots {
        check_root(root.as_ref())?;
    }

    let mut report = LoadReport::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for root in roots {
        let root = root.as_ref();
        debug!(root = %root.display(), "Scanning corpus root");

        for entry in walk_root(root, options) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    report.skipped.push(RefineError::FileRead {
                        path,
                        source: e.into(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_page = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| options.accepts_extension(e));
            if !is_page {
                continue;
            }
            let Some(id) = page_identity(path, options.decode_namespaces) else {
                warn!(path = %path.display(), "Skipping page with a non UTF-8 file name");
                report.skipped.push(RefineError::FileRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "file name is not valid UTF-8",
                    ),
                });
                continue;
            };

            let content = match read_page(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable page");
                    report.skipped.push(e);
                    continue;
                }
            };

            let page = Page::new(id, path, content);
            insert_page(&mut report, &mut positions, page, options.collision_policy)?;
        }
    }

    info!(
        pages = report.pages.len(),
        skipped = report.skipped.len(),
        collisions = report.collisions.len(),
        "Corpus scan complete"
    );
    Ok(report)
}

fn check_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).map_err(|source| RefineError::CorpusAccess {
        path: root.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(RefineError::CorpusAccess {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }
    fs::read_dir(root).map_err(|source| RefineError::CorpusAccess {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Walk a root in deterministic (name-sorted) order, pruning excluded
/// directories below the root.
fn walk_root<'a>(
    root: &Path,
    options: &'a ScanOptions,
) -> impl Iterator<Item = walkdir::Result<walkdir::DirEntry>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !options.excludes_dir(name)
        })
}

fn read_page(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| RefineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| RefineError::FileRead {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
    })
}

fn insert_page(
    report: &mut LoadReport,
    positions: &mut HashMap<String, usize>,
    page: Page,
    policy: CollisionPolicy,
) -> Result<()> {
    let Some(&pos) = positions.get(&page.id) else {
        positions.insert(page.id.clone(), report.pages.len());
        report.pages.push(page);
        return Ok(());
    };

    let existing = &mut report.pages[pos];
    match policy {
        CollisionPolicy::Error => {
            return Err(RefineError::Collision {
                page: page.id,
                first: existing.path.clone(),
                second: page.path,
            });
        }
        CollisionPolicy::FirstWins => {
            warn!(
                page = %page.id,
                kept = %existing.path.display(),
                dropped = %page.path.display(),
                "Duplicate page identity, keeping first file"
            );
            report.collisions.push(Collision {
                page: page.id,
                kept: existing.path.clone(),
                dropped: page.path,
            });
        }
        CollisionPolicy::LastWins => {
            warn!(
                page = %page.id,
                kept = %page.path.display(),
                dropped = %existing.path.display(),
                "Duplicate page identity, keeping last file"
            );
            // The page keeps its first-seen position.
            let dropped = std::mem::replace(&mut existing.path, page.path.clone());
            existing.content = page.content;
            report.collisions.push(Collision {
                page: page.id,
                kept: page.path,
                dropped,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_page_identity() {
        assert_eq!(page_identity(Path::new("a/Project.md"), true).as_deref(), Some("Project"));
        assert_eq!(
            page_identity(Path::new("Project___Sub.md"), true).as_deref(),
            Some("Project/Sub")
        );
        assert_eq!(
            page_identity(Path::new("Project%2FSub.md"), true).as_deref(),
            Some("Project/Sub")
        );
        assert_eq!(
            page_identity(Path::new("Project___Sub.md"), false).as_deref(),
            Some("Project___Sub")
        );
    }

    #[test]
    fn test_load_recurses_and_filters_extensions() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "A.md", "[[B]]");
        write(temp.path(), "sub/B.md", "body");
        write(temp.path(), "notes.txt", "[[A]]");
        write(temp.path(), ".git/C.md", "[[A]]");

        let report = load_corpus(&[temp.path()], &ScanOptions::default()).unwrap();
        let ids: Vec<_> = report.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(report.pages[0].content, "[[B]]");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = load_corpus(&[missing.as_path()], &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, RefineError::CorpusAccess { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Good.md", "fine");
        fs::write(temp.path().join("Bad.md"), [0xff, 0xfe, 0x00]).unwrap();

        let report = load_corpus(&[temp.path()], &ScanOptions::default()).unwrap();
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].id, "Good");
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].is_recoverable());
    }

    // Linux file systems accept arbitrary bytes in file names.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_file_name_is_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        write(temp.path(), "Good.md", "fine");
        let bad = temp.path().join(OsStr::from_bytes(b"Bad\xff.md"));
        fs::write(&bad, "[[Good]]").unwrap();

        let report = load_corpus(&[temp.path()], &ScanOptions::default()).unwrap();
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].id, "Good");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path(), Some(&bad));
    }

    #[test]
    fn test_collision_last_wins_keeps_position() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/Dup.md", "first");
        write(temp.path(), "a/Other.md", "other");
        write(temp.path(), "b/Dup.md", "second");

        let report = load_corpus(&[temp.path()], &ScanOptions::default()).unwrap();
        let ids: Vec<_> = report.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Dup", "Other"]);
        assert_eq!(report.pages[0].content, "second");
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].kept, temp.path().join("b/Dup.md"));
        assert_eq!(report.collisions[0].dropped, temp.path().join("a/Dup.md"));
    }

    #[test]
    fn test_collision_first_wins() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/Dup.md", "first");
        write(temp.path(), "b/Dup.md", "second");

        let options = ScanOptions {
            collision_policy: CollisionPolicy::FirstWins,
            ..ScanOptions::default()
        };
        let report = load_corpus(&[temp.path()], &options).unwrap();
        assert_eq!(report.pages[0].content, "first");
        assert_eq!(report.collisions[0].dropped, temp.path().join("b/Dup.md"));
    }

    #[test]
    fn test_collision_error_policy() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/Dup.md", "first");
        write(temp.path(), "b/Dup.md", "second");

        let options = ScanOptions {
            collision_policy: CollisionPolicy::Error,
            ..ScanOptions::default()
        };
        let err = load_corpus(&[temp.path()], &options).unwrap_err();
        assert!(matches!(err, RefineError::Collision { .. }));
    }

    #[test]
    fn test_logseq_roots() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("pages")).unwrap();
        assert!(logseq_roots(temp.path()).is_err());

        fs::create_dir_all(temp.path().join("journals")).unwrap();
        let roots = logseq_roots(temp.path()).unwrap();
        assert_eq!(
            roots,
            vec![temp.path().join("pages"), temp.path().join("journals")]
        );
    }
}
