use crate::{
    capture::frame::StillFrame,
    filter::{color::apply_color_ops, spec::EditorSettings},
    foundation::{error::BoothResult, math::premultiply_rgba8_in_place},
    render::{
        blend::vignette_in_place,
        blur::{blur_rgba8_premul, radius_for_sigma},
        encode::{CompositeResult, EncodeSettings, encode_premul},
    },
};

/// Apply preset, slider adjustments and vignette to a decoded frame.
///
/// Returns premultiplied RGBA8 with the frame's dimensions.
pub fn edit_frame(frame: &StillFrame, settings: &EditorSettings) -> BoothResult<Vec<u8>> {
    let (w, h) = (frame.width(), frame.height());
    let mut rgba = frame.rgba8().to_vec();
    let ops = settings.color_ops();
    apply_color_ops(&mut rgba, &ops);
    premultiply_rgba8_in_place(&mut rgba);

    let adjustments = settings.adjustments.clamped();
    let sigma = adjustments.blur_px();
    let radius = radius_for_sigma(sigma);
    if radius > 0 {
        rgba = blur_rgba8_premul(&rgba, w, h, radius, sigma)?;
    }
    vignette_in_place(&mut rgba, w, h, adjustments.vignette / 100.0)?;
    Ok(rgba)
}

/// Re-edit pass over an encoded composite. The input is left untouched and a new result
/// with the same dimensions is returned.
#[tracing::instrument(level = "info", skip(result, settings), fields(preset = %settings.preset))]
pub fn edit_result(
    result: &CompositeResult,
    settings: &EditorSettings,
    encode: EncodeSettings,
) -> BoothResult<CompositeResult> {
    let frame = result.decode()?;
    let pixels = edit_frame(&frame, settings)?;
    let edited = encode_premul(&pixels, frame.width(), frame.height(), encode)?;
    tracing::info!(bytes = edited.bytes.len(), "edit applied");
    Ok(edited)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/editor.rs"]
mod tests;
