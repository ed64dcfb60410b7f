use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{SharecardError, SharecardResult};
use crate::render::surface::Frame;
use crate::render::variants::Variant;
use crate::source::video_id::VideoId;
use crate::text::font::Notice;

pub const JPEG_MIME: &str = "image/jpeg";

/// One encoded variant image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    pub variant: Variant,
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    /// `data:image/jpeg;base64,...`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Split a base64 data URI into its mime type and decoded payload.
pub fn decode_data_uri(uri: &str) -> SharecardResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| SharecardError::packaging("not a data URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SharecardError::packaging("data URI has no payload"))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| SharecardError::packaging("data URI is not base64 encoded"))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| SharecardError::packaging(format!("invalid base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Encode an opaque frame as baseline JPEG.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> SharecardResult<Vec<u8>> {
    let Frame { canvas, data } = frame;
    if data.len() != canvas.width as usize * canvas.height as usize * 4 {
        return Err(SharecardError::render("frame byte length mismatch"));
    }

    // Premultiplied channels are the colour over black, which is what an opaque JPEG shows.
    let mut rgb = Vec::with_capacity(canvas.width as usize * canvas.height as usize * 3);
    for px in data.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    let img = image::RgbImage::from_raw(canvas.width, canvas.height, rgb)
        .ok_or_else(|| SharecardError::render("frame buffer does not match canvas"))?;

    let mut out = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    img.write_with_encoder(encoder)
        .map_err(|e| SharecardError::render(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

/// The four images of one generation cycle.
#[derive(Clone, Debug)]
pub struct GenerationBatch {
    video_id: VideoId,
    images: Vec<RenderedImage>,
    notices: Vec<Notice>,
}

impl GenerationBatch {
    /// Requires exactly one image per [`Variant`], in [`Variant::ALL`] order.
    pub fn new(
        video_id: VideoId,
        images: Vec<RenderedImage>,
        notices: Vec<Notice>,
    ) -> SharecardResult<Self> {
        let variants: Vec<Variant> = images.iter().map(|i| i.variant).collect();
        if variants != Variant::ALL {
            return Err(SharecardError::render(format!(
                "incomplete batch: expected {:?}, got {variants:?}",
                Variant::ALL
            )));
        }
        Ok(Self {
            video_id,
            images,
            notices,
        })
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn images(&self) -> &[RenderedImage] {
        &self.images
    }

    pub fn get(&self, variant: Variant) -> Option<&RenderedImage> {
        self.images.iter().find(|i| i.variant == variant)
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.images.iter().map(|i| i.filename.as_str()).collect()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
