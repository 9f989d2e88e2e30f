use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::crawler::models::PropertyRecord;

/// CSV output for normalized records. The file is regenerated on every
/// write, one row per listing, columns in the fixed schema order.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn write(&self, records: &[PropertyRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("creating output file {}", self.path.display()))?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
