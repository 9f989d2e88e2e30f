use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Newline-delimited store of every listing URL seen so far.
///
/// The contract is snapshot-then-append: callers read the full file once to
/// build their membership set, then append a whole batch in one call.
/// Existing lines are never rewritten.
pub struct LinkStore {
    path: PathBuf,
}

impl LinkStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Reads all known links in file order. A missing file is an empty set.
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading link file {}", self.path.display()))?;
        Ok(content
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Appends a batch of links, one per line, in the order given.
    pub fn append(&self, links: &[String]) -> Result<()> {
        if links.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening link file {}", self.path.display()))?;
        for link in links {
            writeln!(file, "{link}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LinkStore::new(dir.path().join("links.csv"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = LinkStore::new(dir.path().join("links.csv"));

        let first = vec!["https://a".to_string(), "https://b".to_string()];
        store.append(&first).unwrap();
        store.append(&["https://c".to_string()]).unwrap();

        assert_eq!(store.load().unwrap(), vec!["https://a", "https://b", "https://c"]);
    }

    #[test]
    fn empty_append_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.csv");
        let store = LinkStore::new(&path);
        store.append(&[]).unwrap();
        assert!(!path.exists());
    }
}
