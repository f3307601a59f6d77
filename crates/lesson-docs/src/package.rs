//! Zip packaging of rendered documents.

use lesson_core::{LessonError, Result};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write `files` into a deflate archive at `target`.
///
/// Entries are stored by base name, in the order given.
pub async fn write_archive(target: &Path, files: &[PathBuf]) -> Result<PathBuf> {
    let mut entries = Vec::with_capacity(files.len());
    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LessonError::Packaging(format!("invalid file name: {}", file.display())))?
            .to_string();
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| LessonError::Packaging(format!("{}: {}", file.display(), e)))?;
        entries.push((name, bytes));
    }

    let archive = build_archive(&entries)?;
    tokio::fs::write(target, archive)
        .await
        .map_err(|e| LessonError::Packaging(format!("{}: {}", target.display(), e)))?;

    debug!("Packaged {} files into {}", entries.len(), target.display());
    Ok(target.to_path_buf())
}

fn build_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options)
            .map_err(|e| LessonError::Packaging(e.to_string()))?;
        zip.write_all(bytes)
            .map_err(|e| LessonError::Packaging(e.to_string()))?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| LessonError::Packaging(e.to_string()))?;
    Ok(cursor.into_inner())
}
