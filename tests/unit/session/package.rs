use std::io::Read as _;

use super::*;
use crate::render::output::{JPEG_MIME, RenderedImage};
use crate::render::variants::Variant;
use crate::source::video_id::VideoId;

fn batch() -> GenerationBatch {
    let id = VideoId::new("xyz").unwrap();
    let images = Variant::ALL
        .into_iter()
        .map(|variant| RenderedImage {
            variant,
            filename: variant.filename(&id),
            mime_type: JPEG_MIME,
            bytes: format!("jpeg-{variant}").into_bytes(),
        })
        .collect();
    GenerationBatch::new(id, images, Vec::new()).unwrap()
}

#[test]
fn packaging_without_batch_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    for err in [
        save_individual(None, dir.path()).unwrap_err(),
        zip_batch(None, dir.path()).unwrap_err(),
    ] {
        assert!(matches!(err, SharecardError::Packaging(_)));
        assert!(err.to_string().contains(NO_BATCH_MESSAGE));
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn individual_files_use_suggested_names() {
    let dir = tempfile::tempdir().unwrap();
    let batch = batch();
    let paths = save_individual(Some(&batch), &dir.path().join("out")).unwrap();
    assert_eq!(paths.len(), 4);
    for (path, image) in paths.iter().zip(batch.images()) {
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), image.filename);
        assert_eq!(std::fs::read(path).unwrap(), image.bytes);
    }
}

#[test]
fn zip_entries_match_decoded_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let batch = batch();
    let path = zip_batch(Some(&batch), dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "thumbnails-xyz.zip");

    let file = std::fs::File::open(&path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 4);
    for image in batch.images() {
        let mut entry = archive.by_name(&image.filename).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, image.bytes);
    }
}

#[tokio::test]
async fn staggered_save_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let batch = batch();
    let started = std::time::Instant::now();
    let paths = save_staggered(Some(&batch), dir.path(), Duration::from_millis(5))
        .await
        .unwrap();
    assert_eq!(paths.len(), 4);
    assert!(started.elapsed() >= Duration::from_millis(15));
    assert!(paths.iter().all(|p| p.exists()));
}
