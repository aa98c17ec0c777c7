use image::imageops::FilterType;

use crate::{
    capture::frame::StillFrame,
    foundation::error::{BoothError, BoothResult},
};

/// Source sub-rectangle selected by a cover fit, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    /// Snap to whole pixels inside a `src_w × src_h` source, never empty.
    pub fn to_pixels(self, src_w: u32, src_h: u32) -> (u32, u32, u32, u32) {
        let w = (self.width.round() as u32).clamp(1, src_w);
        let h = (self.height.round() as u32).clamp(1, src_h);
        let x = (self.x.round().max(0.0) as u32).min(src_w - w);
        let y = (self.y.round().max(0.0) as u32).min(src_h - h);
        (x, y, w, h)
    }
}

/// Largest centered region of the source with the target's aspect ratio.
///
/// A wider source loses columns symmetrically, otherwise rows are trimmed.
pub fn cover_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CropRect {
    let (sw, sh) = (f64::from(src_w), f64::from(src_h));
    let target = f64::from(dst_w) / f64::from(dst_h);
    if sw / sh > target {
        let width = sh * target;
        CropRect {
            x: (sw - width) / 2.0,
            y: 0.0,
            width,
            height: sh,
        }
    } else {
        let height = sw / target;
        CropRect {
            x: 0.0,
            y: (sh - height) / 2.0,
            width: sw,
            height,
        }
    }
}

/// Cover-crop `source` and resample the region to exactly `width × height` straight RGBA8.
pub fn cover_resize(source: &StillFrame, width: u32, height: u32) -> BoothResult<image::RgbaImage> {
    if width == 0 || height == 0 {
        return Err(BoothError::validation("target dimensions must be > 0"));
    }
    let (sw, sh) = (source.width(), source.height());
    let (x, y, w, h) = cover_crop(sw, sh, width, height).to_pixels(sw, sh);
    let cropped = crop_region(source, x, y, w, h)?;
    if (w, h) == (width, height) {
        return Ok(cropped);
    }
    Ok(image::imageops::resize(
        &cropped,
        width,
        height,
        FilterType::Triangle,
    ))
}

/// Copy the rows of an in-bounds pixel region into an owned buffer.
fn crop_region(
    source: &StillFrame,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> BoothResult<image::RgbaImage> {
    let stride = source.width() as usize * 4;
    let (x0, row_len) = (x as usize * 4, w as usize * 4);
    let mut rgba = Vec::with_capacity(row_len * h as usize);
    for row in source
        .rgba8()
        .chunks_exact(stride)
        .skip(y as usize)
        .take(h as usize)
    {
        rgba.extend_from_slice(&row[x0..x0 + row_len]);
    }
    image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| BoothError::validation("crop region exceeds the frame"))
}

#[cfg(test)]
#[path = "../../tests/unit/filter/crop.rs"]
mod tests;
