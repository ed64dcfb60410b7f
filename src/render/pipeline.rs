use std::time::Instant;

use crate::foundation::error::SharecardResult;
use crate::render::output::{GenerationBatch, JPEG_MIME, RenderedImage, encode_jpeg};
use crate::render::variants::{RenderInput, Variant, compose};
use crate::text::engine::TextEngine;
use crate::text::fit::HeadlineSizing;
use crate::text::font::Notice;

/// Default JPEG quality, matching a browser's `toDataURL("image/jpeg")`.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub headline: HeadlineSizing,
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            headline: HeadlineSizing::Dynamic,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Render and encode a single variant.
///
/// Each call allocates its own canvas; nothing is shared between variants except the
/// read-only input and the font engine's caches.
#[tracing::instrument(skip(engine, input), fields(video_id = %input.video_id))]
pub fn render_variant(
    variant: Variant,
    engine: &mut TextEngine,
    input: RenderInput<'_>,
    options: &RenderOptions,
) -> SharecardResult<(RenderedImage, Vec<Notice>)> {
    let started = Instant::now();
    let (frame, notices) = compose(variant, engine, input, options.headline)?;
    let bytes = encode_jpeg(&frame, options.jpeg_quality)?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        bytes = bytes.len(),
        "variant rendered"
    );

    Ok((
        RenderedImage {
            variant,
            filename: variant.filename(input.video_id),
            mime_type: JPEG_MIME,
            bytes,
        },
        notices,
    ))
}

/// Render all four variants. Any failure discards the whole batch.
#[tracing::instrument(skip(engine, input), fields(video_id = %input.video_id))]
pub fn render_batch(
    engine: &mut TextEngine,
    input: RenderInput<'_>,
    options: &RenderOptions,
) -> SharecardResult<GenerationBatch> {
    let mut images = Vec::with_capacity(Variant::ALL.len());
    let mut notices = Vec::new();
    for variant in Variant::ALL {
        let (image, variant_notices) = render_variant(variant, engine, input, options)?;
        images.push(image);
        notices.extend(variant_notices);
    }
    GenerationBatch::new(input.video_id.clone(), images, notices)
}
