use super::*;

const MAX: f32 = 1180.0;

// Advance proportional to size; `k` models how wide a font runs.
fn linear(k: f32) -> impl FnMut(f32) -> f32 {
    move |size| size * k
}

#[test]
fn narrow_font_keeps_start_size() {
    let fit = fit_headline(linear(8.0), MAX, FitParams::default(), HeadlineSizing::Dynamic);
    assert_eq!(fit.size_px, 110.0);
    assert_eq!(fit.text_width, 880.0);
    assert!(fit.fits);
}

#[test]
fn wide_font_shrinks_until_fit() {
    // 12 px per px of size: 110 -> 1320 + 100 overflows, 90 -> 1080 + 100 fits.
    let fit = fit_headline(linear(12.0), MAX, FitParams::default(), HeadlineSizing::Dynamic);
    assert_eq!(fit.size_px, 90.0);
    assert!(fit.fits);
    assert!(fit.framed_width(&FitParams::default()) <= MAX);
}

#[test]
fn stops_at_floor_and_reports_overflow() {
    let fit = fit_headline(linear(40.0), MAX, FitParams::default(), HeadlineSizing::Dynamic);
    assert_eq!(fit.size_px, 50.0);
    assert_eq!(fit.text_width, 2000.0);
    assert!(!fit.fits);
}

#[test]
fn sizes_step_down_monotonically_within_bounds() {
    let mut tried = Vec::new();
    let _ = fit_headline(
        |size| {
            tried.push(size);
            size * 40.0
        },
        MAX,
        FitParams::default(),
        HeadlineSizing::Dynamic,
    );

    assert_eq!(tried.first(), Some(&110.0));
    assert_eq!(tried.last(), Some(&50.0));
    assert_eq!(tried.len(), 13);
    for pair in tried.windows(2) {
        assert_eq!(pair[0] - pair[1], 5.0);
    }
    assert!(tried.iter().all(|s| (50.0..=110.0).contains(s)));
}

#[test]
fn floor_is_never_crossed_with_uneven_step() {
    let params = FitParams {
        step_px: 7.0,
        ..FitParams::default()
    };
    let fit = fit_headline(linear(40.0), MAX, params, HeadlineSizing::Dynamic);
    assert_eq!(fit.size_px, 50.0);
}

#[test]
fn fixed_sizing_measures_once() {
    let mut calls = 0;
    let fit = fit_headline(
        |size| {
            calls += 1;
            size * 40.0
        },
        MAX,
        FitParams::default(),
        HeadlineSizing::Fixed,
    );
    assert_eq!(calls, 1);
    assert_eq!(fit.size_px, 110.0);
    assert!(!fit.fits);
}
