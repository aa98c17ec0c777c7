use crate::{filter::spec::ColorOp, foundation::math::clamp_u8};

type Matrix3 = [[f32; 3]; 3];

/// Apply a color chain to straight RGBA8 pixels in place. Alpha is untouched.
///
/// Each step works on the clamped 8-bit output of the previous one.
pub fn apply_color_ops(rgba: &mut [u8], ops: &[ColorOp]) {
    for op in ops {
        if op.is_identity() {
            continue;
        }
        match *op {
            ColorOp::Brightness(amount) => {
                let amount = amount.max(0.0);
                map_channels(rgba, |c| c * amount);
            }
            ColorOp::Contrast(amount) => {
                let amount = amount.max(0.0);
                let offset = 255.0 * (0.5 - 0.5 * amount);
                map_channels(rgba, |c| c * amount + offset);
            }
            ColorOp::Saturate(amount) => apply_matrix(rgba, &saturate_matrix(amount.max(0.0))),
            ColorOp::Sepia(amount) => apply_matrix(rgba, &sepia_matrix(amount)),
            ColorOp::Grayscale(amount) => apply_matrix(rgba, &grayscale_matrix(amount)),
            ColorOp::HueRotate(deg) => apply_matrix(rgba, &hue_rotate_matrix(deg)),
        }
    }
}

fn map_channels(rgba: &mut [u8], f: impl Fn(f32) -> f32) {
    for px in rgba.chunks_exact_mut(4) {
        for c in &mut px[0..3] {
            *c = clamp_u8(f(f32::from(*c)));
        }
    }
}

fn apply_matrix(rgba: &mut [u8], m: &Matrix3) {
    for px in rgba.chunks_exact_mut(4) {
        let r = f32::from(px[0]);
        let g = f32::from(px[1]);
        let b = f32::from(px[2]);
        for (i, row) in m.iter().enumerate() {
            px[i] = clamp_u8(row[0] * r + row[1] * g + row[2] * b);
        }
    }
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix3 {
    let i = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * i, 0.769 - 0.769 * i, 0.189 - 0.189 * i],
        [0.349 - 0.349 * i, 0.686 + 0.314 * i, 0.168 - 0.168 * i],
        [0.272 - 0.272 * i, 0.534 - 0.534 * i, 0.131 + 0.869 * i],
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let i = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.2126 + 0.7874 * i, 0.7152 - 0.7152 * i, 0.0722 - 0.0722 * i],
        [0.2126 - 0.2126 * i, 0.7152 + 0.2848 * i, 0.0722 - 0.0722 * i],
        [0.2126 - 0.2126 * i, 0.7152 - 0.7152 * i, 0.0722 + 0.9278 * i],
    ]
}

fn hue_rotate_matrix(deg: f32) -> Matrix3 {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/filter/color.rs"]
mod tests;
