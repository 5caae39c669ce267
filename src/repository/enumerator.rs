// file: src/repository/enumerator.rs
// description: File discovery in the mirror with glob pattern filtering
// reference: https://docs.rs/walkdir

use crate::error::Result;
use glob::Pattern;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Lists files in a synced working copy matching the configured inclusion
/// patterns, as slash-separated paths relative to the mirror root. Output is
/// sorted so two enumerations of the same tree compare equal.
pub struct FileEnumerator {
    patterns: Vec<Pattern>,
}

impl FileEnumerator {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn enumerate(&self, root: &Path) -> Result<Vec<String>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");

            if self.matches(&relative) {
                files.push(relative);
            } else {
                debug!("Skipping file: {}", relative);
            }
        }

        files.sort();
        info!("Found {} files in {}", files.len(), root.display());
        Ok(files)
    }

    fn matches(&self, relative: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_enumerate_everything_by_default() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "readme.md", "a");
        write(temp.path(), "blog/post.md", "b");
        write(temp.path(), "blog/nested/deep.txt", "c");

        let enumerator = FileEnumerator::new(&["**/*".to_string()]).unwrap();
        let files = enumerator.enumerate(temp.path()).unwrap();

        assert_eq!(
            files,
            vec!["blog/nested/deep.txt", "blog/post.md", "readme.md"]
        );
    }

    #[test]
    fn test_enumerate_filters_by_pattern() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "readme.md", "a");
        write(temp.path(), "notes.txt", "b");
        write(temp.path(), "blog/post.md", "c");

        let enumerator = FileEnumerator::new(&["**/*.md".to_string()]).unwrap();
        let files = enumerator.enumerate(temp.path()).unwrap();

        assert_eq!(files, vec!["blog/post.md", "readme.md"]);
    }

    #[test]
    fn test_enumerate_skips_git_metadata() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "readme.md", "a");
        write(temp.path(), ".git/config", "[core]");
        write(temp.path(), ".git/refs/heads/main", "deadbeef");

        let enumerator = FileEnumerator::new(&["**/*".to_string()]).unwrap();
        let files = enumerator.enumerate(temp.path()).unwrap();

        assert_eq!(files, vec!["readme.md"]);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(FileEnumerator::new(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_enumeration_is_stable() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.md", "b");
        write(temp.path(), "a.md", "a");
        write(temp.path(), "c/d.md", "d");

        let enumerator = FileEnumerator::new(&["**/*".to_string()]).unwrap();
        let first = enumerator.enumerate(temp.path()).unwrap();
        let second = enumerator.enumerate(temp.path()).unwrap();

        assert_eq!(first, second);
    }
}
