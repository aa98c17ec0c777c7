use crate::foundation::{
    error::{BoothError, BoothResult},
    math::mul_div255_u8,
};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with an extra opacity on the source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Darken towards the corners: black with alpha growing from 0 at the center to `strength` at
/// half the diagonal.
pub fn vignette_in_place(
    rgba8_premul: &mut [u8],
    width: u32,
    height: u32,
    strength: f32,
) -> BoothResult<()> {
    if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
        return Err(BoothError::validation("vignette buffer size mismatch"));
    }
    let strength = strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return Ok(());
    }
    let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let radius = (cx * cx + cy * cy).sqrt();
    if radius <= 0.0 {
        return Ok(());
    }
    for (i, px) in rgba8_premul.chunks_exact_mut(4).enumerate() {
        let x = (i % width as usize) as f64 + 0.5;
        let y = (i / width as usize) as f64 + 0.5;
        let t = (((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / radius).min(1.0);
        let a = ((t as f32) * strength * 255.0).round().clamp(0.0, 255.0) as u8;
        let out = over([px[0], px[1], px[2], px[3]], [0, 0, 0, a], 1.0);
        px.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite premultiplied pixels onto an opaque color and return straight RGB8.
pub fn flatten_to_rgb8(rgba8_premul: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba8_premul.len() / 4 * 3);
    for px in rgba8_premul.chunks_exact(4) {
        let bg = [background[0], background[1], background[2], 255];
        let c = over(bg, [px[0], px[1], px[2], px[3]], 1.0);
        out.extend_from_slice(&c[0..3]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
