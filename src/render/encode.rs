use std::{io::Cursor, sync::Arc};

use image::ImageEncoder;

use crate::{
    capture::frame::StillFrame,
    foundation::{
        error::{BoothError, BoothResult},
        math::unpremultiply_rgba8_in_place,
    },
    render::blend::flatten_to_rgb8,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodeSettings {
    pub format: OutputFormat,
    /// JPEG quality, `1..=100`.
    pub quality: u8,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: 95,
        }
    }
}

/// One encoded composite, ready for download, print or re-edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeResult {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Arc<[u8]>,
}

impl CompositeResult {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `photobooth-<unix-millis>.<ext>` stamped with the current time.
    pub fn suggested_filename(&self) -> String {
        self.suggested_filename_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn suggested_filename_at(&self, unix_millis: i64) -> String {
        format!("photobooth-{unix_millis}.{}", self.format.extension())
    }

    /// Decode the encoded bytes back into pixels for a re-edit pass.
    pub fn decode(&self) -> BoothResult<StillFrame> {
        StillFrame::decode(&self.bytes)
    }
}

/// Encode premultiplied RGBA8 canvas pixels.
///
/// JPEG output is flattened onto black, like a browser canvas export.
pub fn encode_premul(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
    settings: EncodeSettings,
) -> BoothResult<CompositeResult> {
    if rgba8_premul.len() != (width as usize) * (height as usize) * 4 {
        return Err(BoothError::encode("pixel buffer does not match dimensions"));
    }
    let mut buf = Vec::new();
    match settings.format {
        OutputFormat::Jpeg => {
            let quality = settings.quality.clamp(1, 100);
            let rgb = flatten_to_rgb8(rgba8_premul, [0, 0, 0]);
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
                .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
                .map_err(|e| BoothError::encode(format!("jpeg: {e}")))?;
        }
        OutputFormat::Png => {
            let mut straight = rgba8_premul.to_vec();
            unpremultiply_rgba8_in_place(&mut straight);
            image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
                .write_image(&straight, width, height, image::ExtendedColorType::Rgba8)
                .map_err(|e| BoothError::encode(format!("png: {e}")))?;
        }
    }
    tracing::debug!(
        width,
        height,
        format = ?settings.format,
        bytes = buf.len(),
        "encoded composite"
    );
    Ok(CompositeResult {
        width,
        height,
        format: settings.format,
        bytes: buf.into(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
