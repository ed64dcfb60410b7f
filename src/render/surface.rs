//! CPU raster surface for one variant, drawn with `vello_cpu`.

use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::decode::SourceBitmap;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{SharecardError, SharecardResult};
use crate::text::engine::{ShapedLine, TextEngine};

/// Horizontal anchoring of a text line relative to its `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Finished premultiplied RGBA8 pixels of a surface.
#[derive(Clone, Debug)]
pub struct Frame {
    pub canvas: Canvas,
    pub data: Vec<u8>,
}

pub struct Surface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Surface {
    pub fn new(canvas: Canvas) -> SharecardResult<Self> {
        let (width, height) = canvas.dims_u16()?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fill(&mut self, color: Rgba8) {
        self.fill_rect(self.canvas.rect(), color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Draw `bitmap` stretched into `dest`.
    pub fn draw_bitmap(&mut self, bitmap: &SourceBitmap, dest: Rect) -> SharecardResult<()> {
        let pixmap = image_premul_bytes_to_pixmap(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        let (w, h) = (f64::from(bitmap.width), f64::from(bitmap.height));

        let transform = vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
            * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width() / w, dest.height() / h);
        self.ctx.set_transform(transform);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }

    /// Stroke an axis-aligned ellipse outline.
    pub fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, width: f64, color: Rgba8) {
        let path = kurbo::Ellipse::new(center, (rx, ry), 0.0).to_path(0.1);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(&path));
    }

    /// Draw a shaped line with its first baseline at `baseline_y`.
    ///
    /// Positioned glyphs are relative to the layout top, so the layout is shifted up by its
    /// own baseline.
    pub fn draw_text(
        &mut self,
        engine: &TextEngine,
        line: &ShapedLine,
        x: f64,
        baseline_y: f64,
        align: TextAlign,
    ) {
        if !engine.has_fonts() {
            return;
        }
        let left = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - f64::from(line.width) / 2.0,
        };
        let top = baseline_y - f64::from(line.baseline);

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((left, top)));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        for layout_line in line.layout.lines() {
            for item in layout_line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let run_font = run.run().font();
                let Some(font) = engine.glyph_font(run_font.data.id(), run_font.index) else {
                    tracing::debug!("glyph run font not registered, skipping");
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> Frame {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Frame {
            canvas: self.canvas,
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> SharecardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| SharecardError::render("bitmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| SharecardError::render("bitmap height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(SharecardError::render("bitmap byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
