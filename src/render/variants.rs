//! The four fixed layouts.

use std::fmt;
use std::str::FromStr;

use crate::assets::decode::SourceBitmap;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, palette};
use crate::foundation::error::{SharecardError, SharecardResult};
use crate::render::blur::{blur_bitmap, rect_shadow};
use crate::render::surface::{Frame, Surface, TextAlign};
use crate::source::oembed::VideoMetadata;
use crate::source::video_id::VideoId;
use crate::text::engine::{ShapedLine, TextEngine};
use crate::text::fit::{FitParams, HEADLINE, HeadlineSizing, fit_headline};
use crate::text::font::{FontConfig, FontWeight, Notice};
use crate::text::wrap::wrap_text;

const MARGIN_X: f64 = 20.0;
const TITLE_WRAP_WIDTH: f32 = 1240.0;
const TITLE_PX: f32 = 56.0;
const TITLE_LINE_HEIGHT: f64 = 56.0;
const AUTHOR_PX: f32 = 28.0;
const AUTHOR_STEP: f64 = 58.0;
const URL_PX: f32 = 80.0;
const THUMB_W: f64 = 1280.0;
const THUMB_H: f64 = 720.0;
const ELLIPSE_STROKE: f64 = 15.0;
const HEADLINE_BASELINE: f64 = 170.0;
const ELLIPSE_LIFT: f64 = 40.0;
const SHADOW_SIGMA: f32 = 7.5;
const BLUR_SIGMA: f32 = 10.0;

/// One of the fixed output layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Basic,
    Large,
    Full,
    Blurred,
}

impl Variant {
    /// Every variant, in output order.
    pub const ALL: [Variant; 4] = [
        Variant::Basic,
        Variant::Large,
        Variant::Full,
        Variant::Blurred,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Large => "large",
            Variant::Full => "full",
            Variant::Blurred => "blurred",
        }
    }

    pub fn canvas(self) -> Canvas {
        match self {
            Variant::Basic => Canvas::new(1280, 900),
            Variant::Large => Canvas::new(1280, 1280),
            Variant::Full => Canvas::new(1280, 1450),
            Variant::Blurred => Canvas::new(1280, 720),
        }
    }

    /// `{id}-{variant}-image.jpg`
    pub fn filename(self, video_id: &VideoId) -> String {
        format!("{}-{}-image.jpg", video_id.as_str(), self.as_str())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = SharecardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| SharecardError::input(format!("unknown variant '{s}'")))
    }
}

/// Everything a renderer reads. Shared, never mutated.
#[derive(Clone, Copy, Debug)]
pub struct RenderInput<'a> {
    pub bitmap: &'a SourceBitmap,
    pub metadata: &'a VideoMetadata,
    pub video_id: &'a VideoId,
    pub font: &'a FontConfig,
}

struct Layout<'a, 'e> {
    engine: &'e mut TextEngine,
    input: RenderInput<'a>,
    surface: Surface,
    notices: Vec<Notice>,
}

pub(crate) fn compose(
    variant: Variant,
    engine: &mut TextEngine,
    input: RenderInput<'_>,
    sizing: HeadlineSizing,
) -> SharecardResult<(Frame, Vec<Notice>)> {
    engine.prepare(input.font);
    let mut layout = Layout {
        engine,
        input,
        surface: Surface::new(variant.canvas())?,
        notices: Vec::new(),
    };

    match variant {
        Variant::Basic => layout.basic()?,
        Variant::Large => layout.large(sizing)?,
        Variant::Full => layout.full(sizing)?,
        Variant::Blurred => layout.blurred()?,
    }

    Ok((layout.surface.finish(), layout.notices))
}

impl Layout<'_, '_> {
    fn basic(&mut self) -> SharecardResult<()> {
        self.surface.fill(palette::BACKGROUND);
        self.surface
            .draw_bitmap(self.input.bitmap, Rect::new(0.0, 0.0, THUMB_W, THUMB_H))?;
        self.title_block(780.0, 790.0);
        Ok(())
    }

    fn large(&mut self, sizing: HeadlineSizing) -> SharecardResult<()> {
        self.surface.fill(palette::BACKGROUND);
        self.surface.draw_bitmap(self.input.bitmap, framed_thumb_rect())?;
        self.headline(Variant::Large, sizing);
        self.title_block(1100.0, 1100.0);
        Ok(())
    }

    fn full(&mut self, sizing: HeadlineSizing) -> SharecardResult<()> {
        self.surface.fill(palette::BACKGROUND);

        let dest = framed_thumb_rect();
        let shadow = rect_shadow(THUMB_W as u32, THUMB_H as u32, SHADOW_SIGMA, palette::BLACK)?;
        let pad = f64::from(shadow.pad);
        self.surface.draw_bitmap(
            &shadow.bitmap,
            Rect::new(dest.x0 - pad, dest.y0 - pad, dest.x1 + pad, dest.y1 + pad),
        )?;
        self.surface.draw_bitmap(self.input.bitmap, dest)?;

        self.headline(Variant::Full, sizing);
        let lines = self.title_block(1100.0, 1100.0);

        let url = self.input.video_id.short_url();
        let baseline = 1100.0 + lines as f64 * AUTHOR_STEP + 110.0;
        let center_x = self.surface.canvas().center_x();
        self.text(&url, URL_PX, palette::URL, center_x, baseline, TextAlign::Center);
        Ok(())
    }

    fn blurred(&mut self) -> SharecardResult<()> {
        let canvas = self.surface.canvas();
        self.surface.fill(palette::BLACK);

        let bitmap = self.input.bitmap;
        let (sigma_x, sigma_y) = source_blur_sigma(bitmap, canvas);
        let blurred = blur_bitmap(bitmap, sigma_x, sigma_y)?;
        self.surface.draw_bitmap(&blurred, canvas.rect())?;
        self.surface.fill(palette::HALF_BLACK);

        let url = self.input.video_id.short_url();
        let center_y = f64::from(canvas.height) / 2.0;
        self.text(&url, URL_PX, palette::URL, canvas.center_x(), center_y, TextAlign::Center);
        Ok(())
    }

    /// Wrapped title plus author line; returns the number of title lines.
    fn title_block(&mut self, title_baseline: f64, author_baseline: f64) -> usize {
        let spec = self.input.font.spec(TITLE_PX, FontWeight::Normal);
        let engine = &mut *self.engine;
        let lines = wrap_text(
            |s| engine.measure(&spec, s),
            &self.input.metadata.title,
            TITLE_WRAP_WIDTH,
        );

        for (i, line) in lines.iter().enumerate() {
            let y = title_baseline + i as f64 * TITLE_LINE_HEIGHT;
            self.text(line, TITLE_PX, palette::TITLE, MARGIN_X, y, TextAlign::Left);
        }

        let author = format!("YouTube: {}", self.input.metadata.author_name);
        let y = author_baseline + lines.len() as f64 * AUTHOR_STEP - 20.0;
        self.text(&author, AUTHOR_PX, palette::AUTHOR, MARGIN_X, y, TextAlign::Left);
        lines.len()
    }

    fn headline(&mut self, variant: Variant, sizing: HeadlineSizing) {
        let params = FitParams::default();
        let canvas = self.surface.canvas();
        let max_content_width = canvas.width as f32 - 100.0;

        let font = self.input.font;
        let engine = &mut *self.engine;
        let fit = fit_headline(
            |size| engine.measure(&font.spec(size, FontWeight::Normal), HEADLINE),
            max_content_width,
            params,
            sizing,
        );
        if !fit.fits {
            let notice = Notice::HeadlineOverflow {
                variant: variant.as_str().to_string(),
                size_px: fit.size_px,
                text_width: fit.text_width,
                max_content_width,
            };
            tracing::warn!(%notice, "headline overflow");
            self.notices.push(notice);
        }

        let x = canvas.center_x();
        self.text(HEADLINE, fit.size_px, palette::TITLE, x, HEADLINE_BASELINE, TextAlign::Center);

        let rx = f64::from(fit.text_width) / 2.0 + f64::from(params.padding_px);
        let ry = f64::from(fit.size_px);
        self.surface.stroke_ellipse(
            Point::new(x, HEADLINE_BASELINE - ELLIPSE_LIFT),
            rx,
            ry,
            ELLIPSE_STROKE,
            palette::ELLIPSE,
        );
    }

    fn text(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
        x: f64,
        baseline: f64,
        align: TextAlign,
    ) {
        let Some(line) = self.shape(text, size_px, color) else {
            return;
        };
        self.surface.draw_text(&*self.engine, &line, x, baseline, align);
    }

    fn shape(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
    ) -> Option<ShapedLine> {
        if !self.engine.has_fonts() || text.is_empty() {
            return None;
        }
        let spec = self.input.font.spec(size_px, FontWeight::Normal);
        Some(self.engine.shape(&spec, text, color.into()))
    }
}

/// Canvas blur sigma expressed per axis in the bitmap's own pixels, which get stretched to
/// fill `canvas`.
fn source_blur_sigma(bitmap: &SourceBitmap, canvas: Canvas) -> (f32, f32) {
    let sx = f64::from(bitmap.width) / f64::from(canvas.width.max(1));
    let sy = f64::from(bitmap.height) / f64::from(canvas.height.max(1));
    (BLUR_SIGMA * sx as f32, BLUR_SIGMA * sy as f32)
}

fn framed_thumb_rect() -> Rect {
    Rect::new(0.0, 280.0, THUMB_W, 280.0 + THUMB_H)
}

#[cfg(test)]
#[path = "../../tests/unit/render/variants.rs"]
mod tests;
