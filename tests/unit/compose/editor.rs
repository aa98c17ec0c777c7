use super::*;
use crate::{
    filter::spec::{Adjustments, Preset},
    render::encode::OutputFormat,
};

const PNG: EncodeSettings = EncodeSettings {
    format: OutputFormat::Png,
    quality: 95,
};

fn gradient_result(w: u32, h: u32) -> CompositeResult {
    let mut premul = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            premul.extend_from_slice(&[(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 90, 255]);
        }
    }
    encode_premul(&premul, w, h, PNG).unwrap()
}

#[test]
fn original_preset_without_sliders_is_lossless() {
    let src = gradient_result(24, 16);
    let out = edit_result(&src, &EditorSettings::default(), PNG).unwrap();
    assert_eq!(out.decode().unwrap(), src.decode().unwrap());
    assert_eq!((out.width, out.height), (24, 16));
}

#[test]
fn mono_preset_drops_color() {
    let src = gradient_result(16, 16);
    let settings = EditorSettings {
        preset: Preset::Mono,
        ..EditorSettings::default()
    };
    let out = edit_result(&src, &settings, PNG).unwrap().decode().unwrap();
    for px in out.rgba8().chunks_exact(4) {
        assert!(px[0].abs_diff(px[1]) <= 1 && px[1].abs_diff(px[2]) <= 1);
    }
}

#[test]
fn vignette_darkens_corners_only() {
    let frame = StillFrame::from_rgba8(40, 40, [200, 200, 200, 255].repeat(1600)).unwrap();
    let settings = EditorSettings {
        adjustments: Adjustments {
            vignette: 80.0,
            ..Adjustments::default()
        },
        ..EditorSettings::default()
    };
    let px = edit_frame(&frame, &settings).unwrap();
    let at = |x: usize, y: usize| px[(y * 40 + x) * 4];
    assert!(at(20, 20) >= 195);
    assert!(at(0, 0) < 80);
}

#[test]
fn negative_sharpness_softens_edges() {
    let mut raw = Vec::new();
    for _y in 0..20 {
        for x in 0..20 {
            let v = if x < 10 { 0 } else { 255 };
            raw.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let frame = StillFrame::from_rgba8(20, 20, raw).unwrap();
    let settings = EditorSettings {
        adjustments: Adjustments {
            sharpness: -100.0,
            ..Adjustments::default()
        },
        ..EditorSettings::default()
    };
    let px = edit_frame(&frame, &settings).unwrap();
    let edge_left = px[(10 * 20 + 9) * 4];
    let edge_right = px[(10 * 20 + 10) * 4];
    assert!(edge_left > 0 && edge_right < 255);
}

#[test]
fn undecodable_result_is_a_decode_error() {
    let bogus = CompositeResult {
        width: 1,
        height: 1,
        format: OutputFormat::Jpeg,
        bytes: vec![1u8, 2, 3].into(),
    };
    let err = edit_result(&bogus, &EditorSettings::default(), PNG).unwrap_err();
    assert!(matches!(err, crate::foundation::error::BoothError::Decode(_)));
}
