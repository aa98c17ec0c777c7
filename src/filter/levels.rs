use crate::foundation::math::clamp_u8;

/// Remap RGB so that `blacks` maps to 0 and `whites` to 255. Both are on `0..=100`.
///
/// A collapsed or inverted range (`whites <= blacks`) leaves pixels untouched.
pub fn apply_levels(rgba: &mut [u8], whites: f32, blacks: f32) {
    let white = whites / 100.0;
    let black = blacks / 100.0;
    let span = white - black;
    if !span.is_finite() || span <= 0.0 {
        return;
    }
    let offset = black * 255.0;
    let scale = 1.0 / span;
    for px in rgba.chunks_exact_mut(4) {
        for c in &mut px[0..3] {
            *c = clamp_u8((f32::from(*c) - offset) * scale);
        }
    }
}

/// Four-neighbour unsharp mask: `center + k * (center - mean(top, bottom, left, right))`.
///
/// Neighbours outside the image take the center value. Alpha is copied through.
pub fn sharpen(rgba: &[u8], width: u32, height: u32, k: f32) -> Vec<u8> {
    let mut out = rgba.to_vec();
    if k <= 0.0 || !k.is_finite() {
        return out;
    }
    let (w, h) = (width as usize, height as usize);
    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) * 4;
            for ch in 0..3 {
                let center = f32::from(rgba[idx + ch]);
                let at = |nx: Option<usize>, ny: Option<usize>| -> f32 {
                    match (nx, ny) {
                        (Some(nx), Some(ny)) if nx < w && ny < h => {
                            f32::from(rgba[(ny * w + nx) * 4 + ch])
                        }
                        _ => center,
                    }
                };
                let top = at(Some(x), y.checked_sub(1));
                let bottom = at(Some(x), Some(y + 1));
                let left = at(x.checked_sub(1), Some(y));
                let right = at(Some(x + 1), Some(y));
                let mean = (top + bottom + left + right) / 4.0;
                out[idx + ch] = clamp_u8(center + k * (center - mean));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/filter/levels.rs"]
mod tests;
