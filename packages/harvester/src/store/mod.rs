//! Durable output: per-law seed records and the census snapshot.

mod census;
mod seed;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use census::{CensusLaw, CensusSnapshot, IngestionSummary, CENSUS_DESCRIPTION, CENSUS_SOURCE};
pub use seed::SeedStore;

/// Write `content` to `path` so that readers see either the old file or the
/// complete new one.
///
/// The content goes to a hidden temp file next to the target, is synced,
/// and is then renamed over the target.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = dir.join(format!(".{file_name}.tmp"));

    let result = write_and_rename(&temp_file, path, content);
    if result.is_err() {
        let _ = fs::remove_file(&temp_file);
    }
    result
}

fn write_and_rename(temp_file: &Path, path: &Path, content: &[u8]) -> std::io::Result<()> {
    {
        let mut file = File::create(temp_file)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(temp_file, path)
}
