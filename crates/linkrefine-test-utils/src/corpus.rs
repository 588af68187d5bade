//! Temporary on-disk note corpora.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A note corpus in a temporary directory, removed on drop.
///
/// ```
/// use linkrefine_test_utils::TestCorpus;
///
/// let corpus = TestCorpus::new()
///     .page("A.md", "")
///     .page("journals/2024_01_01.md", "- met [[A]]");
/// assert_eq!(corpus.read("journals/2024_01_01.md"), "- met [[A]]");
/// ```
pub struct TestCorpus {
    dir: TempDir,
}

impl TestCorpus {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp corpus dir"),
        }
    }

    /// Add a file at `rel` (parent directories are created).
    pub fn page(self, rel: &str, content: &str) -> Self {
        self.write(rel, content);
        self
    }

    /// Add `count` pages named `<prefix><n>.md` that each link to `target` once.
    pub fn linking_pages(self, prefix: &str, target: &str, count: usize) -> Self {
        for n in 0..count {
            self.write(&format!("{}{}.md", prefix, n), &format!("- see [[{}]]\n", target));
        }
        self
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.file(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create corpus subdirectory");
        }
        fs::write(&path, content).expect("write corpus file");
    }

    /// Create an empty subdirectory.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.file(rel)).expect("create corpus subdirectory");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.file(rel)).expect("read corpus file")
    }
}

impl Default for TestCorpus {
    fn default() -> Self {
        Self::new()
    }
}
