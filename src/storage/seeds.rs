//! Seed list file
//!
//! The seed list is a plain text file with one URL per line. It is created
//! empty on first access so operators can edit it in place.

use crate::storage::traits::StorageResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Splits raw seed list text into candidate URLs
///
/// Lines are trimmed and blank lines dropped. Candidates are not validated
/// here; the crawler reports malformed ones as run errors.
pub fn parse_seed_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Handle to the seed list file on disk
#[derive(Debug, Clone)]
pub struct SeedListFile {
    path: PathBuf,
}

impl SeedListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_exists(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.path.exists() {
            fs::write(&self.path, "")?;
        }
        Ok(())
    }

    /// Reads the raw file contents, creating an empty file when missing
    pub fn load(&self) -> StorageResult<String> {
        self.ensure_exists()?;
        Ok(fs::read_to_string(&self.path)?)
    }

    /// Replaces the file contents with the trimmed `raw` text
    pub fn save(&self, raw: &str) -> StorageResult<()> {
        self.ensure_exists()?;
        fs::write(&self.path, raw.trim())?;
        tracing::debug!(path = %self.path.display(), "Saved seed list");
        Ok(())
    }

    /// Loads and parses the seed list
    pub fn load_seeds(&self) -> StorageResult<Vec<String>> {
        Ok(parse_seed_list(&self.load()?))
    }
}
