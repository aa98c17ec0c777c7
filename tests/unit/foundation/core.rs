use super::*;

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(600, 900).unwrap();
    assert_eq!(c.byte_len(), 600 * 900 * 4);
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 600.0, 900.0));
}

#[test]
fn parse_hex_forms() {
    assert_eq!(Rgba8::parse("#fff").unwrap(), Rgba8::WHITE);
    assert_eq!(Rgba8::parse("#FF5733").unwrap(), Rgba8::rgb(0xff, 0x57, 0x33));
    assert_eq!(
        Rgba8::parse("#ff69b444").unwrap(),
        Rgba8::rgba(0xff, 0x69, 0xb4, 0x44)
    );
    assert!(Rgba8::parse("#12345").is_err());
    assert!(Rgba8::parse("#gg0000").is_err());
}

#[test]
fn parse_functional_forms() {
    assert_eq!(
        Rgba8::parse("rgba(0,0,0,0.2)").unwrap(),
        Rgba8::rgba(0, 0, 0, 51)
    );
    assert_eq!(Rgba8::parse("rgb(1, 2, 3)").unwrap(), Rgba8::rgb(1, 2, 3));
    assert!(Rgba8::parse("rgba(1,2)").is_err());
    assert!(Rgba8::parse("white").is_err());
}

#[test]
fn hex_constructor_matches_parse() {
    assert_eq!(Rgba8::hex(0x9b87f5), Rgba8::parse("#9b87f5").unwrap());
}

#[test]
fn premul_rounds_half_up() {
    let p = Rgba8::rgba(100, 50, 200, 128).to_premul();
    assert_eq!(
        p.to_array(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
}
