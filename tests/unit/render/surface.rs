use super::*;
use crate::foundation::core::palette;

fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.canvas.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

fn assert_near(actual: [u8; 4], expected: [u8; 4], tol: u8) {
    for c in 0..4 {
        assert!(
            actual[c].abs_diff(expected[c]) <= tol,
            "channel {c}: got {actual:?}, expected {expected:?}"
        );
    }
}

#[test]
fn fill_covers_whole_canvas() {
    let mut s = Surface::new(Canvas::new(16, 8)).unwrap();
    s.fill(palette::BACKGROUND);
    let frame = s.finish();
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert_near(pixel(&frame, 0, 0), [0x22, 0x22, 0x22, 255], 1);
    assert_near(pixel(&frame, 15, 7), [0x22, 0x22, 0x22, 255], 1);
}

#[test]
fn half_black_overlay_darkens_by_half() {
    let mut s = Surface::new(Canvas::new(8, 8)).unwrap();
    s.fill(Rgba8::rgb(255, 255, 255));
    s.fill(palette::HALF_BLACK);
    let frame = s.finish();
    assert_near(pixel(&frame, 4, 4), [127, 127, 127, 255], 2);
}

#[test]
fn bitmap_is_stretched_into_destination() {
    let bitmap = SourceBitmap::from_rgba8(2, 2, [0u8, 0, 255, 255].repeat(4)).unwrap();
    let mut s = Surface::new(Canvas::new(20, 20)).unwrap();
    s.fill(palette::BACKGROUND);
    s.draw_bitmap(&bitmap, Rect::new(0.0, 10.0, 20.0, 20.0)).unwrap();
    let frame = s.finish();

    assert_near(pixel(&frame, 10, 2), [0x22, 0x22, 0x22, 255], 1);
    assert_near(pixel(&frame, 10, 15), [0, 0, 255, 255], 2);
}

#[test]
fn ellipse_outline_leaves_interior_untouched() {
    let mut s = Surface::new(Canvas::new(100, 100)).unwrap();
    s.fill(palette::BACKGROUND);
    s.stroke_ellipse(Point::new(50.0, 50.0), 40.0, 30.0, 6.0, palette::ELLIPSE);
    let frame = s.finish();

    assert_near(pixel(&frame, 50, 50), [0x22, 0x22, 0x22, 255], 1);
    assert_near(pixel(&frame, 90, 50), [255, 0, 0, 255], 2);
    assert_near(pixel(&frame, 50, 20), [255, 0, 0, 255], 2);
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(Surface::new(Canvas::new(100_000, 10)).is_err());
}
