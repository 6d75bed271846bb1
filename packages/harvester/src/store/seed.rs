//! Seed record storage: one JSON file per law.

use std::fs;
use std::path::{Path, PathBuf};

use super::write_atomic;
use crate::error::{HarvesterError, Result};
use crate::types::SeedDocument;

/// Directory of `<law_id>.json` seed records.
#[derive(Debug, Clone)]
pub struct SeedStore {
    dir: PathBuf,
}

impl SeedStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, law_id: &str) -> PathBuf {
        self.dir.join(format!("{law_id}.json"))
    }

    /// Read the seed record for a law, if one exists.
    pub fn load(&self, law_id: &str) -> Result<Option<SeedDocument>> {
        let path = self.path_for(law_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Write a seed record, replacing any previous one for the same law.
    pub fn save(&self, doc: &SeedDocument) -> Result<PathBuf> {
        let law_id = &doc.law.id;
        let path = self.path_for(law_id);
        let mut json = serde_json::to_string_pretty(doc)?;
        json.push('\n');

        write_atomic(&path, json.as_bytes()).map_err(|source| HarvesterError::Persistence {
            law_id: law_id.clone(),
            source,
        })?;

        tracing::debug!(law_id = %law_id, path = %path.display(), "Saved seed record");
        Ok(path)
    }

    /// Number of seed records on disk.
    ///
    /// Files whose names start with `_` hold auxiliary data and hidden files
    /// are leftovers of interrupted writes; neither is counted.
    pub fn count_seed_files(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(".json")
                && !name.starts_with('_')
                && !name.starts_with('.')
                && entry.file_type()?.is_file()
            {
                count += 1;
            }
        }
        Ok(count)
    }
}
