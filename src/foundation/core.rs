use crate::foundation::error::{SharecardError, SharecardResult};

pub use kurbo::{Point, Rect, Vec2};

/// Fixed raster size of one rendered variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    pub fn center_x(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Dimensions as the `u16` pair the raster backend works in.
    pub fn dims_u16(self) -> SharecardResult<(u16, u16)> {
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| SharecardError::render("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| SharecardError::render("canvas height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(SharecardError::render("canvas must be non-empty"));
        }
        Ok((w, h))
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS short hex, `#222` style: each nibble is doubled.
    pub const fn short_hex(v: u16) -> Self {
        const fn dbl(n: u16) -> u8 {
            let n = (n & 0xf) as u8;
            (n << 4) | n
        }
        Self::rgb(dbl(v >> 8), dbl(v >> 4), dbl(v))
    }

    /// Premultiplied channels, rounding like the decoder does.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

/// Palette shared by the renderers.
pub mod palette {
    use super::Rgba8;

    pub const BACKGROUND: Rgba8 = Rgba8::short_hex(0x222);
    pub const TITLE: Rgba8 = Rgba8::short_hex(0xeee);
    pub const AUTHOR: Rgba8 = Rgba8::short_hex(0xaaa);
    pub const URL: Rgba8 = Rgba8::short_hex(0xfff);
    pub const ELLIPSE: Rgba8 = Rgba8::short_hex(0xf00);
    pub const BLACK: Rgba8 = Rgba8::short_hex(0x000);
    pub const HALF_BLACK: Rgba8 = Rgba8::rgba(0, 0, 0, 128);
}
