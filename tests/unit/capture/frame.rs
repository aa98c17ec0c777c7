use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let frame = StillFrame::decode(&png_bytes(2, 1, [100, 50, 200, 128])).unwrap();
    assert_eq!(frame.width(), 2);
    assert_eq!(frame.height(), 1);
    assert_eq!(&frame.rgba8()[0..4], &[100, 50, 200, 128]);
}

#[test]
fn decode_garbage_is_decode_error() {
    let err = StillFrame::decode(b"definitely not an image").unwrap_err();
    assert!(matches!(err, BoothError::Decode(_)));
}

#[test]
fn from_rgba8_checks_length() {
    assert!(StillFrame::from_rgba8(2, 2, vec![0; 16]).is_ok());
    assert!(matches!(
        StillFrame::from_rgba8(2, 2, vec![0; 15]),
        Err(BoothError::Decode(_))
    ));
    assert!(StillFrame::from_rgba8(0, 2, vec![]).is_err());
}

#[test]
fn image_input_loads_both_forms() {
    let encoded = ImageInput::encoded(png_bytes(3, 2, [1, 2, 3, 255]));
    let frame = encoded.load().unwrap();
    assert_eq!((frame.width(), frame.height()), (3, 2));

    let direct = ImageInput::from(frame.clone());
    assert_eq!(direct.load().unwrap(), frame);

    let broken = ImageInput::encoded(vec![0u8, 1, 2]);
    assert!(matches!(broken.load(), Err(BoothError::Decode(_))));
}

#[test]
fn fingerprint_tracks_content() {
    let a = StillFrame::from_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
    let b = StillFrame::from_rgba8(1, 1, vec![1, 2, 4, 255]).unwrap();
    assert_eq!(a.fingerprint(), a.clone().fingerprint());
    assert_ne!(a.fingerprint(), b.fingerprint());
}
