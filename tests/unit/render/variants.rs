use super::*;
use crate::text::engine::FontBook;

fn solid_bitmap(w: u32, h: u32, rgb: [u8; 3]) -> SourceBitmap {
    let px = [rgb[0], rgb[1], rgb[2], 255];
    SourceBitmap::from_rgba8(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn metadata() -> VideoMetadata {
    VideoMetadata {
        title: "Hello World".to_string(),
        author_name: "Test Channel".to_string(),
        canonical_url: "https://www.youtube.com/watch?v=xyz".to_string(),
    }
}

fn render(variant: Variant, bitmap: &SourceBitmap) -> (Frame, Vec<Notice>) {
    render_with(&mut TextEngine::new(FontBook::empty()), variant, bitmap)
}

fn render_with(
    engine: &mut TextEngine,
    variant: Variant,
    bitmap: &SourceBitmap,
) -> (Frame, Vec<Notice>) {
    let metadata = metadata();
    let video_id = VideoId::new("xyz").unwrap();
    let font = FontConfig::default();
    let input = RenderInput {
        bitmap,
        metadata: &metadata,
        video_id: &video_id,
        font: &font,
    };
    compose(variant, engine, input, HeadlineSizing::Dynamic).unwrap()
}

fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.canvas.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

fn near(actual: [u8; 4], expected: [u8; 3], tol: u8) -> bool {
    (0..3).all(|c| actual[c].abs_diff(expected[c]) <= tol) && actual[3] == 255
}

#[test]
fn variant_names_and_filenames() {
    let id = VideoId::new("xyz").unwrap();
    let names: Vec<String> = Variant::ALL.iter().map(|v| v.filename(&id)).collect();
    assert_eq!(
        names,
        [
            "xyz-basic-image.jpg",
            "xyz-large-image.jpg",
            "xyz-full-image.jpg",
            "xyz-blurred-image.jpg"
        ]
    );
    assert_eq!("full".parse::<Variant>().unwrap(), Variant::Full);
    assert!("huge".parse::<Variant>().unwrap_err().is_input_error());
}

#[test]
fn canvas_sizes_are_fixed() {
    let dims: Vec<(u32, u32)> = Variant::ALL
        .iter()
        .map(|v| (v.canvas().width, v.canvas().height))
        .collect();
    assert_eq!(dims, [(1280, 900), (1280, 1280), (1280, 1450), (1280, 720)]);
}

#[test]
fn basic_puts_bitmap_on_top_of_background() {
    let bitmap = solid_bitmap(64, 36, [0, 0, 200]);
    let (frame, notices) = render(Variant::Basic, &bitmap);
    assert_eq!((frame.canvas.width, frame.canvas.height), (1280, 900));
    assert!(notices.is_empty());
    assert!(near(pixel(&frame, 640, 360), [0, 0, 200], 2));
    assert!(near(pixel(&frame, 1270, 890), [0x22, 0x22, 0x22], 1));
}

#[test]
fn large_frames_bitmap_and_draws_ellipse() {
    let bitmap = solid_bitmap(64, 36, [0, 150, 0]);
    let (frame, _) = render(Variant::Large, &bitmap);
    assert_eq!((frame.canvas.width, frame.canvas.height), (1280, 1280));

    // Thumbnail region starts at y=280.
    assert!(near(pixel(&frame, 640, 640), [0, 150, 0], 2));
    assert!(near(pixel(&frame, 10, 1270), [0x22, 0x22, 0x22], 1));
    // Without fonts the headline measures zero, so the ellipse is 50px wide
    // and 110px tall around (640, 130).
    assert!(near(pixel(&frame, 690, 130), [255, 0, 0], 2));
    assert!(near(pixel(&frame, 640, 130), [0x22, 0x22, 0x22], 1));
}

#[test]
fn full_casts_shadow_around_bitmap() {
    let bitmap = solid_bitmap(64, 36, [200, 200, 200]);
    let (frame, _) = render(Variant::Full, &bitmap);
    assert_eq!((frame.canvas.width, frame.canvas.height), (1280, 1450));

    assert!(near(pixel(&frame, 640, 640), [200, 200, 200], 2));
    let shadowed = pixel(&frame, 400, 275);
    assert!(shadowed[0] < 0x20, "expected shadow, got {shadowed:?}");
    assert!(near(pixel(&frame, 10, 250), [0x22, 0x22, 0x22], 1));
}

#[test]
fn blurred_darkens_bitmap_by_half() {
    let bitmap = solid_bitmap(64, 36, [255, 255, 255]);
    let (frame, notices) = render(Variant::Blurred, &bitmap);
    assert_eq!((frame.canvas.width, frame.canvas.height), (1280, 720));
    assert!(notices.is_empty());
    assert!(near(pixel(&frame, 100, 100), [127, 127, 127], 3));
    assert!(near(pixel(&frame, 1200, 650), [127, 127, 127], 3));
}

#[test]
fn blur_sigma_follows_each_axis_of_the_stretch() {
    let canvas = Variant::Blurred.canvas();
    let (sx, sy) = source_blur_sigma(&solid_bitmap(1280, 720, [0, 0, 0]), canvas);
    assert_eq!((sx, sy), (10.0, 10.0));

    // A 4:3 thumbnail is squeezed vertically more than horizontally.
    let (sx, sy) = source_blur_sigma(&solid_bitmap(640, 480, [0, 0, 0]), canvas);
    assert!((sx - 5.0).abs() < 1e-4);
    assert!((sy - 480.0 / 72.0).abs() < 1e-4);
}

/// Bounding box of pixels accepted by `ink` inside `rows` x `cols`.
fn ink_bounds(
    frame: &Frame,
    cols: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
    ink: impl Fn([u8; 4]) -> bool,
) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in rows {
        for x in cols.clone() {
            if ink(pixel(frame, x, y)) {
                let b = bounds.get_or_insert((x, y, x, y));
                b.0 = b.0.min(x);
                b.1 = b.1.min(y);
                b.2 = b.2.max(x);
                b.3 = b.3.max(y);
            }
        }
    }
    bounds
}

fn system_engine() -> Option<TextEngine> {
    let book = FontBook::system(&[] as &[&str]);
    if book.face_count() == 0 {
        eprintln!("no system fonts installed; skipping");
        return None;
    }
    Some(TextEngine::new(book))
}

// Light grey text on the dark background; excludes the red ellipse.
fn light(px: [u8; 4]) -> bool {
    px[0] > 0x90 && px[1] > 0x90 && px[2] > 0x90
}

#[test]
fn headline_is_centred_on_its_baseline() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let bitmap = solid_bitmap(64, 36, [0, 0, 0]);
    let (frame, _) = render_with(&mut engine, Variant::Large, &bitmap);

    let font = FontConfig::default();
    let fit = fit_headline(
        |size| engine.measure(&font.spec(size, FontWeight::Normal), HEADLINE),
        1180.0,
        FitParams::default(),
        HeadlineSizing::Dynamic,
    );
    assert!(fit.text_width > 0.0);

    let (x0, y0, x1, y1) =
        ink_bounds(&frame, 0..1280, 0..280, light).expect("headline ink");
    let ink_width = (x1 - x0 + 1) as f32;
    assert!(
        ink_width > fit.text_width * 0.8 && ink_width <= fit.text_width + 4.0,
        "ink {x0}..{x1}, advance {}",
        fit.text_width
    );
    let centre = (x0 + x1) as f32 / 2.0;
    assert!((centre - 640.0).abs() < 12.0, "centre {centre}");
    // No descenders in the headline: ink sits on the baseline.
    assert!(y1 <= 172 && y1 >= 160, "bottom {y1}");
    assert!(y0 >= 170 - fit.size_px as u32, "top {y0}");
}

#[test]
fn title_and_author_sit_on_their_baselines() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let bitmap = solid_bitmap(64, 36, [0, 0, 0]);
    let (frame, _) = render_with(&mut engine, Variant::Large, &bitmap);

    // "Hello World" at baseline 1100, below the thumbnail (280..1000).
    let (x0, y0, x1, y1) =
        ink_bounds(&frame, 0..1280, 1001..1107, light).expect("title ink");
    assert!((18..=40).contains(&x0), "title left {x0}");
    assert!(x1 > 200 && x1 < 700, "title right {x1}");
    assert!(y1 <= 1102 && y1 >= 1090, "title bottom {y1}");
    assert!(y0 >= 1100 - 56, "title top {y0}");

    // One title line puts the author baseline at 1100 + 58 - 20.
    let (ax0, _, _, ay1) =
        ink_bounds(&frame, 0..1280, 1107..1200, light).expect("author ink");
    assert!((18..=40).contains(&ax0), "author left {ax0}");
    assert!(ay1 <= 1140 && ay1 >= 1128, "author bottom {ay1}");
}

#[test]
fn url_is_centred_in_full_layout() {
    let Some(mut engine) = system_engine() else {
        return;
    };
    let bitmap = solid_bitmap(64, 36, [0, 0, 0]);
    let (frame, _) = render_with(&mut engine, Variant::Full, &bitmap);

    // URL baseline: 1100 + 1 * 58 + 110.
    let (x0, _, x1, y1) =
        ink_bounds(&frame, 0..1280, 1200..1300, light).expect("url ink");
    let centre = (x0 + x1) as f32 / 2.0;
    assert!((centre - 640.0).abs() < 16.0, "url centre {centre}");
    assert!(x1 - x0 > 300, "url width {}", x1 - x0);
    // "youtu.be/xyz" has descenders below the 1268 baseline.
    assert!(y1 > 1268 && y1 < 1300, "url bottom {y1}");
}
