use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    error::{BoothError, BoothResult},
    math::Fnv1a64,
};

/// Immutable still image grabbed from the Video Source.
///
/// Pixels are straight (non-premultiplied) row-major RGBA8. Clones share the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StillFrame {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl StillFrame {
    /// Wrap a raw RGBA8 buffer, checking that it matches `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> BoothResult<Self> {
        if width == 0 || height == 0 {
            return Err(BoothError::decode("frame dimensions must be > 0"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| BoothError::decode("frame buffer size overflow"))?;
        if rgba8.len() != expected {
            return Err(BoothError::decode(format!(
                "frame buffer holds {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    /// Decode encoded image bytes (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> BoothResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .map_err(|e| BoothError::decode(format!("decode image from memory: {e}")))?;
        Self::from_image(dyn_img.to_rgba8())
    }

    /// Read and decode an image file.
    pub fn open(path: &Path) -> BoothResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    pub fn from_image(img: image::RgbaImage) -> BoothResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8(&self) -> &[u8] {
        self.rgba8.as_slice()
    }

    /// Content hash over dimensions and pixels, for logs and change detection.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.rgba8);
        h.finish()
    }
}

/// One image handed to the compositor: either a captured frame or still-encoded bytes
/// (re-edits and files supplied from outside the booth).
#[derive(Clone, Debug)]
pub enum ImageInput {
    Frame(StillFrame),
    Encoded(Arc<[u8]>),
}

impl ImageInput {
    pub fn encoded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Encoded(bytes.into())
    }

    /// Produce decoded pixels, failing with [`BoothError::Decode`] for unreadable data.
    pub fn load(&self) -> BoothResult<StillFrame> {
        match self {
            Self::Frame(f) => Ok(f.clone()),
            Self::Encoded(bytes) => StillFrame::decode(bytes),
        }
    }
}

impl From<StillFrame> for ImageInput {
    fn from(value: StillFrame) -> Self {
        Self::Frame(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;
