use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(over(dst, [200, 200, 200, 200], 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let src = [255, 0, 0, 255];
    assert_eq!(over([0, 0, 0, 255], src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src, 1.0), src);
}

#[test]
fn vignette_darkens_corners_more_than_center() {
    let (w, h) = (21u32, 21u32);
    let mut buf = [200u8, 200, 200, 255].repeat((w * h) as usize);
    vignette_in_place(&mut buf, w, h, 0.8).unwrap();
    let center = ((10 * w + 10) * 4) as usize;
    assert!(buf[center] >= 195);
    assert!(buf[0] < 80);
    assert!(buf.chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn vignette_zero_is_noop() {
    let mut buf = [50u8, 60, 70, 255].repeat(4);
    let before = buf.clone();
    vignette_in_place(&mut buf, 2, 2, 0.0).unwrap();
    assert_eq!(buf, before);
    assert!(vignette_in_place(&mut buf, 3, 3, 0.5).is_err());
}

#[test]
fn flatten_uses_background_under_transparency() {
    let rgb = flatten_to_rgb8(&[0, 0, 0, 0, 10, 20, 30, 255], [255, 255, 255]);
    assert_eq!(rgb, vec![255, 255, 255, 10, 20, 30]);
}
