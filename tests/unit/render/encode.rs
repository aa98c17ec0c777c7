use super::*;

fn solid_premul(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

#[test]
fn jpeg_default_roundtrips_dimensions() {
    let result = encode_premul(
        &solid_premul(16, 8, [255, 87, 51, 255]),
        16,
        8,
        EncodeSettings::default(),
    )
    .unwrap();
    assert_eq!(result.format, OutputFormat::Jpeg);
    assert_eq!(&result.bytes[0..2], &[0xFF, 0xD8]);
    let frame = result.decode().unwrap();
    assert_eq!((frame.width(), frame.height()), (16, 8));
    let r = frame.rgba8()[0];
    assert!((i16::from(r) - 255).abs() <= 4);
}

#[test]
fn png_keeps_alpha_exactly() {
    let result = encode_premul(
        &solid_premul(2, 2, [64, 0, 128, 128]),
        2,
        2,
        EncodeSettings {
            format: OutputFormat::Png,
            quality: 95,
        },
    )
    .unwrap();
    let frame = result.decode().unwrap();
    assert_eq!(&frame.rgba8()[0..4], &[128, 0, 255, 128]);
}

#[test]
fn encoding_is_deterministic() {
    let px = solid_premul(10, 10, [10, 200, 30, 255]);
    let a = encode_premul(&px, 10, 10, EncodeSettings::default()).unwrap();
    let b = encode_premul(&px, 10, 10, EncodeSettings::default()).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn size_mismatch_is_encode_error() {
    let err = encode_premul(&[0u8; 12], 2, 2, EncodeSettings::default()).unwrap_err();
    assert!(matches!(err, BoothError::Encode(_)));
}

#[test]
fn filename_uses_millis_and_extension() {
    let result = encode_premul(&solid_premul(1, 1, [0, 0, 0, 255]), 1, 1, EncodeSettings::default())
        .unwrap();
    assert_eq!(
        result.suggested_filename_at(1_700_000_000_123),
        "photobooth-1700000000123.jpg"
    );
    assert!(result.suggested_filename().starts_with("photobooth-"));
    assert_eq!(result.mime_type(), "image/jpeg");
}
