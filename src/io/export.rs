//! Snapshot export.
//!
//! The snapshot is written to a temporary file next to the target and then
//! renamed over it, so readers see either the previous document or the new
//! one, never a partial write. A failed run leaves the previous snapshot as is.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::Snapshot;
use crate::error::AppError;

/// Atomically write the snapshot JSON to `path`.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create temp file in '{}': {e}", dir.display())))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, snapshot)
            .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;
        writer
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| AppError::new(2, format!("Failed to sync snapshot: {e}")))?;

    tmp.persist(path)
        .map_err(|e| AppError::new(2, format!("Failed to replace '{}': {}", path.display(), e.error)))?;

    Ok(())
}
