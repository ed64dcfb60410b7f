//! Gaussian blur over premultiplied RGBA8 with Q16 fixed-point weights, plus blurred-rect
//! shadow masks.

use std::sync::Arc;

use crate::assets::decode::SourceBitmap;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SharecardError, SharecardResult};

const Q16_ONE: u32 = 1 << 16;

/// Kernel radius covering three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Normalized 1D gaussian, `2 * radius + 1` taps summing to exactly one in Q16.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Kernel {
    weights: Vec<u32>,
}

impl Kernel {
    fn gaussian(sigma: f32) -> Self {
        let radius = radius_for_sigma(sigma) as i64;
        if radius == 0 {
            return Self {
                weights: vec![Q16_ONE],
            };
        }

        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let raw: Vec<f64> = (-radius..=radius)
            .map(|i| (-(i * i) as f64 / denom).exp())
            .collect();
        let total: f64 = raw.iter().sum();

        // Rounding the running sum keeps the taps summing to Q16_ONE.
        let mut cumulative = 0.0f64;
        let mut placed = 0u32;
        let weights = raw
            .iter()
            .map(|w| {
                cumulative += w / total;
                let target = (cumulative * f64::from(Q16_ONE)).round() as u32;
                let tap = target.min(Q16_ONE) - placed;
                placed += tap;
                tap
            })
            .collect();
        Self { weights }
    }

    fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    fn is_identity(&self) -> bool {
        self.weights.len() == 1
    }
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

/// Convolve every row (`Axis::X`) or column (`Axis::Y`) with `kernel`, clamping at the edges.
fn convolve(src: &[u8], dst: &mut [u8], width: usize, height: usize, kernel: &Kernel, axis: Axis) {
    // (samples per lane, lane count, byte step along a lane, byte step between lanes)
    let (len, lanes, step, lane_step) = match axis {
        Axis::X => (width, height, 4, width * 4),
        Axis::Y => (height, width, width * 4, 4),
    };
    if len == 0 {
        return;
    }
    let radius = kernel.radius() as isize;
    let last = len as isize - 1;

    for lane in 0..lanes {
        let base = lane * lane_step;
        for i in 0..len {
            let mut acc = [0u64; 4];
            for (k, &weight) in kernel.weights.iter().enumerate() {
                let j = (i as isize + k as isize - radius).clamp(0, last) as usize;
                let at = base + j * step;
                for (sum, &c) in acc.iter_mut().zip(&src[at..at + 4]) {
                    *sum += u64::from(weight) * u64::from(c);
                }
            }
            let at = base + i * step;
            for (out, sum) in dst[at..at + 4].iter_mut().zip(acc) {
                *out = round_q16(sum);
            }
        }
    }
}

fn round_q16(acc: u64) -> u8 {
    ((acc + u64::from(Q16_ONE / 2)) >> 16).min(255) as u8
}

/// Blur with independent standard deviations per axis. A zero sigma leaves that axis alone.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma_x: f32,
    sigma_y: f32,
) -> SharecardResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    let expected_len = w
        .checked_mul(h)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SharecardError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(SharecardError::render(format!(
            "blur buffer is {} bytes, expected {expected_len} for {width}x{height}",
            src.len()
        )));
    }

    let mut out = src.to_vec();
    let mut scratch = vec![0u8; expected_len];
    for (sigma, axis) in [(sigma_x, Axis::X), (sigma_y, Axis::Y)] {
        let kernel = Kernel::gaussian(sigma);
        if kernel.is_identity() {
            continue;
        }
        convolve(&out, &mut scratch, w, h, &kernel, axis);
        std::mem::swap(&mut out, &mut scratch);
    }
    Ok(out)
}

/// Blur a bitmap in its own pixel space.
pub fn blur_bitmap(bitmap: &SourceBitmap, sigma_x: f32, sigma_y: f32) -> SharecardResult<SourceBitmap> {
    if radius_for_sigma(sigma_x) == 0 && radius_for_sigma(sigma_y) == 0 {
        return Ok(bitmap.clone());
    }
    let blurred = blur_rgba8_premul(
        &bitmap.rgba8_premul,
        bitmap.width,
        bitmap.height,
        sigma_x,
        sigma_y,
    )?;
    Ok(SourceBitmap {
        width: bitmap.width,
        height: bitmap.height,
        rgba8_premul: Arc::new(blurred),
    })
}

/// Soft shadow of an opaque `width`x`height` rectangle.
#[derive(Clone, Debug)]
pub struct ShadowMask {
    /// Premultiplied pixels of size `(width + 2*pad) x (height + 2*pad)`.
    pub bitmap: SourceBitmap,
    /// Extent of the blur beyond each edge of the rectangle.
    pub pad: u32,
}

/// Blurred rectangle shadow, computed as the product of two blurred 1D step profiles.
pub fn rect_shadow(width: u32, height: u32, sigma: f32, color: Rgba8) -> SharecardResult<ShadowMask> {
    let kernel = Kernel::gaussian(sigma);
    let pad = kernel.radius() as u32;
    let px = step_profile_q16(width, pad, &kernel);
    let py = step_profile_q16(height, pad, &kernel);

    let out_w = width + 2 * pad;
    let out_h = height + 2 * pad;
    let len = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SharecardError::render("shadow buffer size overflow"))?;
    let [r, g, b, a] = color.premultiplied();
    let mut data = Vec::with_capacity(len);
    for &vy in &py {
        for &vx in &px {
            let cover = (u64::from(vx) * u64::from(vy) + u64::from(Q16_ONE / 2)) >> 16;
            let scale = |c: u8| round_q16(cover * u64::from(c));
            data.extend_from_slice(&[scale(r), scale(g), scale(b), scale(a)]);
        }
    }

    Ok(ShadowMask {
        bitmap: SourceBitmap {
            width: out_w,
            height: out_h,
            rgba8_premul: Arc::new(data),
        },
        pad,
    })
}

fn step_profile_q16(len: u32, pad: u32, kernel: &Kernel) -> Vec<u32> {
    let n = i64::from(len + 2 * pad);
    let radius = kernel.radius() as i64;
    let inside = |i: i64| i >= i64::from(pad) && i < i64::from(pad + len);
    (0..n)
        .map(|i| {
            let acc: u32 = kernel
                .weights
                .iter()
                .enumerate()
                .filter(|(k, _)| inside(i + *k as i64 - radius))
                .map(|(_, &w)| w)
                .sum();
            acc.min(Q16_ONE)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
