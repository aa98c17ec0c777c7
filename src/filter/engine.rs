use crate::{
    capture::frame::StillFrame,
    filter::{
        color::apply_color_ops,
        crop::cover_resize,
        levels::{apply_levels, sharpen},
        spec::FilterSpec,
    },
    foundation::error::BoothResult,
};

/// Output of [`apply_filters`]: straight RGBA8 at exactly the requested slot size.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredImage {
    pub width: u32,
    pub height: u32,
    /// Rotation in radians about the slot center, applied when the image is drawn.
    pub rotation: f64,
    pub rgba8: Vec<u8>,
}

impl FilteredImage {
    /// Multiply the alpha channel by the coverage of `mask`.
    pub fn apply_mask(&mut self, mask: SlotMask) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let coverage: Box<dyn Fn(f64, f64) -> f64> = match mask {
            SlotMask::None => return,
            SlotMask::Circle => {
                let (cx, cy) = (w / 2.0, h / 2.0);
                let r = w.min(h) / 2.0;
                Box::new(move |x, y| {
                    let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                    (r - d + 0.5).clamp(0.0, 1.0)
                })
            }
            SlotMask::RoundedRect { radius } => {
                let r = radius.max(0.0).min(w.min(h) / 2.0);
                Box::new(move |x, y| {
                    let qx = (x - w / 2.0).abs() - (w / 2.0 - r);
                    let qy = (y - h / 2.0).abs() - (h / 2.0 - r);
                    if qx <= 0.0 || qy <= 0.0 {
                        return 1.0;
                    }
                    let d = (qx * qx + qy * qy).sqrt();
                    (r - d + 0.5).clamp(0.0, 1.0)
                })
            }
        };

        let width = self.width as usize;
        for (i, px) in self.rgba8.chunks_exact_mut(4).enumerate() {
            let x = (i % width) as f64 + 0.5;
            let y = (i / width) as f64 + 0.5;
            let c = coverage(x, y);
            if c < 1.0 {
                px[3] = (f64::from(px[3]) * c).round() as u8;
            }
        }
    }
}

/// Clip shape applied to an image slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotMask {
    #[default]
    None,
    /// Circle inscribed in the slot.
    Circle,
    RoundedRect { radius: f64 },
}

/// Cover-crop `source` into `width × height`, then run color, levels and sharpening.
///
/// The source is never modified; the result always has exactly the requested size.
#[tracing::instrument(level = "debug", skip(source, spec), fields(src_w = source.width(), src_h = source.height()))]
pub fn apply_filters(
    source: &StillFrame,
    width: u32,
    height: u32,
    rotation: f64,
    spec: &FilterSpec,
) -> BoothResult<FilteredImage> {
    let spec = spec.clamped();
    let mut rgba8 = cover_resize(source, width, height)?.into_raw();

    let ops = spec.color_ops();
    if !ops.is_empty() {
        apply_color_ops(&mut rgba8, &ops);
    }
    if spec.has_levels() {
        apply_levels(&mut rgba8, spec.whites, spec.blacks);
    }
    if spec.sharpness > 0.0 {
        rgba8 = sharpen(&rgba8, width, height, spec.sharpness);
    }

    Ok(FilteredImage {
        width,
        height,
        rotation,
        rgba8,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/filter/engine.rs"]
mod tests;
