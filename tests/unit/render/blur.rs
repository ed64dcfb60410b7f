use super::*;

#[test]
fn zero_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0.0, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 2.0, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 0.6, 0.6).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn kernel_taps_sum_to_one() {
    for sigma in [0.5f32, 1.0, 2.0, 7.5, 10.0, 23.3] {
        let kernel = Kernel::gaussian(sigma);
        assert_eq!(kernel.radius() as u32, radius_for_sigma(sigma));
        assert_eq!(kernel.weights.iter().sum::<u32>(), 1 << 16, "sigma {sigma}");
        // Symmetric and peaked at the centre.
        let r = kernel.radius();
        assert!(kernel.weights[r - 1].abs_diff(kernel.weights[r + 1]) <= 1);
        assert!(kernel.weights[r] >= kernel.weights[0]);
    }
    assert!(Kernel::gaussian(0.0).is_identity());
    assert!(Kernel::gaussian(f32::INFINITY).is_identity());
}

#[test]
fn each_axis_blurs_independently() {
    // Left half black, right half white.
    let (w, h) = (8u32, 6u32);
    let src: Vec<u8> = (0..w * h)
        .flat_map(|i| if i % w < w / 2 { [0u8, 0, 0, 255] } else { [255, 255, 255, 255] })
        .collect();

    // Vertical blur cannot mix columns.
    let vertical = blur_rgba8_premul(&src, w, h, 0.0, 2.0).unwrap();
    assert_eq!(vertical, src);

    // Horizontal blur softens the edge and keeps every row identical.
    let horizontal = blur_rgba8_premul(&src, w, h, 2.0, 0.0).unwrap();
    let row = |y: u32| &horizontal[(y * w * 4) as usize..((y + 1) * w * 4) as usize];
    assert_ne!(row(0), &src[..(w * 4) as usize]);
    for y in 1..h {
        assert_eq!(row(y), row(0));
    }
    let red = |x: u32| row(0)[(x * 4) as usize];
    assert!(red(3) > 0 && red(4) < 255);
    assert!(red(0) < red(3) && red(4) < red(7));
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1.0, 1.0).is_err());
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(10.0), 30);
    assert_eq!(radius_for_sigma(7.5), 23);
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(f32::NAN), 0);
}

#[test]
fn blur_bitmap_keeps_dimensions() {
    let bitmap = SourceBitmap::from_rgba8(6, 4, [200u8, 10, 10, 255].repeat(24)).unwrap();
    let out = blur_bitmap(&bitmap, 1.5, 1.5).unwrap();
    assert_eq!((out.width, out.height), (6, 4));
    // Uniform input stays uniform.
    assert_eq!(out.rgba8_premul, bitmap.rgba8_premul);
}

#[test]
fn rect_shadow_is_opaque_inside_and_fades_out() {
    let mask = rect_shadow(40, 20, 2.0, Rgba8::rgb(0, 0, 0)).unwrap();
    assert_eq!(mask.pad, 6);
    assert_eq!((mask.bitmap.width, mask.bitmap.height), (52, 32));

    let alpha = |x: u32, y: u32| mask.bitmap.rgba8_premul[((y * mask.bitmap.width + x) * 4 + 3) as usize];
    // Centre of the rectangle is fully covered.
    assert_eq!(alpha(26, 16), 255);
    // Far corner of the padding is (almost) clear.
    assert!(alpha(0, 0) <= 1);
    // The edge sits around half coverage.
    let edge = alpha(mask.pad, 16);
    assert!((100..=190).contains(&edge), "edge alpha {edge}");
    // Monotonic fade from the edge outwards.
    assert!(alpha(mask.pad - 2, 16) < edge);
}
