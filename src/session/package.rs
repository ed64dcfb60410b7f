//! Saving a batch: one file per image, staggered saves, or a single zip archive.

use std::io::{Cursor, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{SharecardError, SharecardResult};
use crate::render::output::{GenerationBatch, decode_data_uri};

pub const NO_BATCH_MESSAGE: &str =
    "No images are available to download. Please generate thumbnails first.";

/// Delay between files in [`save_staggered`].
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(300);

/// `thumbnails-{id}.zip`
pub fn zip_filename(batch: &GenerationBatch) -> String {
    format!("thumbnails-{}.zip", batch.video_id())
}

fn require(batch: Option<&GenerationBatch>) -> SharecardResult<&GenerationBatch> {
    batch.ok_or_else(|| SharecardError::packaging(NO_BATCH_MESSAGE))
}

/// Write each image under its suggested filename.
pub fn save_individual(batch: Option<&GenerationBatch>, dir: &Path) -> SharecardResult<Vec<PathBuf>> {
    let batch = require(batch)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(batch.len());
    for image in batch.images() {
        let path = dir.join(&image.filename);
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "image saved");
        written.push(path);
    }
    Ok(written)
}

/// Like [`save_individual`], pausing `delay` between consecutive files.
pub async fn save_staggered(
    batch: Option<&GenerationBatch>,
    dir: &Path,
    delay: Duration,
) -> SharecardResult<Vec<PathBuf>> {
    let batch = require(batch)?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(batch.len());
    for (i, image) in batch.images().iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let path = dir.join(&image.filename);
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Build the zip archive in memory. Entry bytes come from each image's data URI.
pub fn zip_batch_bytes(batch: Option<&GenerationBatch>) -> SharecardResult<Vec<u8>> {
    let batch = require(batch)?;
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));

    for image in batch.images() {
        let (mime, bytes) = decode_data_uri(&image.data_uri())?;
        if !mime.starts_with("image/") {
            tracing::warn!(filename = %image.filename, %mime, "skipping non-image entry");
            continue;
        }
        writer
            .start_file(image.filename.as_str(), options)
            .map_err(|e| SharecardError::packaging(format!("zip entry {}: {e}", image.filename)))?;
        writer
            .write_all(&bytes)
            .map_err(|e| SharecardError::packaging(format!("zip entry {}: {e}", image.filename)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| SharecardError::packaging(format!("finishing zip: {e}")))?;
    Ok(cursor.into_inner())
}

/// Write `thumbnails-{id}.zip` into `dir`.
pub fn zip_batch(batch: Option<&GenerationBatch>, dir: &Path) -> SharecardResult<PathBuf> {
    let bytes = zip_batch_bytes(batch)?;
    let batch = require(batch)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let path = dir.join(zip_filename(batch));
    std::fs::write(&path, &bytes)
        .map_err(|e| SharecardError::packaging(format!("writing {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "zip written");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/session/package.rs"]
mod tests;
