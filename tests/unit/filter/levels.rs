use super::*;

#[test]
fn default_levels_are_identity() {
    let mut buf = vec![0u8, 64, 200, 255, 17, 18, 19, 20];
    let before = buf.clone();
    apply_levels(&mut buf, 100.0, 0.0);
    assert_eq!(buf, before);
}

#[test]
fn levels_stretch_and_clamp() {
    let mut buf = vec![25u8, 127, 230, 9];
    apply_levels(&mut buf, 90.0, 10.0);
    // (25 - 25.5) / 0.8 -> 0, (127 - 25.5) / 0.8 = 126.875, (230 - 25.5) / 0.8 > 255.
    assert_eq!(buf, vec![0, 127, 255, 9]);
}

#[test]
fn inverted_range_is_identity() {
    let mut buf = vec![10u8, 20, 30, 40];
    apply_levels(&mut buf, 30.0, 30.0);
    assert_eq!(buf, vec![10, 20, 30, 40]);
    apply_levels(&mut buf, 20.0, 60.0);
    assert_eq!(buf, vec![10, 20, 30, 40]);
}

#[test]
fn levels_output_stays_in_range_for_every_valid_pair() {
    let mut src = Vec::new();
    for v in 0..=255u8 {
        src.extend_from_slice(&[v, 255 - v, v / 2, 255]);
    }
    for black in (0..100).step_by(7) {
        for white in ((black + 1)..=100).step_by(9) {
            let mut buf = src.clone();
            apply_levels(&mut buf, white as f32, black as f32);
            // Monotonic: brighter input never yields darker output.
            let reds: Vec<u8> = buf.chunks_exact(4).map(|p| p[0]).collect();
            assert!(reds.windows(2).all(|w| w[0] <= w[1]));
            assert!(buf.chunks_exact(4).all(|p| p[3] == 255));
        }
    }
}

#[test]
fn sharpen_zero_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    assert_eq!(sharpen(&src, 2, 1, 0.0), src);
}

#[test]
fn sharpen_flat_image_is_identity() {
    let src = [90u8, 90, 90, 255].repeat(9);
    assert_eq!(sharpen(&src, 3, 3, 50.0), src);
}

#[test]
fn sharpen_boosts_a_bright_center() {
    let mut src = [100u8, 100, 100, 200].repeat(9);
    src[16..20].copy_from_slice(&[110, 110, 110, 200]);
    let out = sharpen(&src, 3, 3, 1.0);
    // 110 + (110 - 100) = 120; neighbours drop to 100 - 2.5.
    assert_eq!(&out[16..20], &[120, 120, 120, 200]);
    assert_eq!(&out[4..8], &[98, 98, 98, 200]);
}

#[test]
fn sharpen_edges_replicate_center() {
    // Single row: top and bottom neighbours are out of bounds.
    let src = vec![0u8, 0, 0, 255, 100, 100, 100, 255];
    let out = sharpen(&src, 2, 1, 2.0);
    // Left pixel: mean = (0 + 0 + 0 + 100) / 4 = 25, 0 + 2 * (0 - 25) clamps to 0.
    assert_eq!(out[0], 0);
    // Right pixel: mean = (100 + 100 + 0 + 100) / 4 = 75, 100 + 2 * 25 = 150.
    assert_eq!(out[4], 150);
}
