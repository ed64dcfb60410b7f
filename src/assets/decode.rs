use std::sync::Arc;

use crate::foundation::error::{SharecardError, SharecardResult};

/// Decoded source thumbnail in premultiplied RGBA8.
///
/// Shared read-only by every renderer of a generation cycle.
#[derive(Clone, Debug)]
pub struct SourceBitmap {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceBitmap {
    /// Wrap straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> SharecardResult<Self> {
        if width == 0 || height == 0 {
            return Err(SharecardError::load("thumbnail has zero size"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| SharecardError::load("thumbnail size overflow"))?;
        if rgba.len() != expected {
            return Err(SharecardError::load(
                "thumbnail byte length does not match width*height*4",
            ));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
        })
    }
}

/// Decode encoded image bytes (JPEG, PNG, ...) into a [`SourceBitmap`].
pub fn decode_image(bytes: &[u8]) -> SharecardResult<SourceBitmap> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SharecardError::load(format!("failed decoding thumbnail: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceBitmap::from_rgba8(width, height, rgba.into_raw())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
