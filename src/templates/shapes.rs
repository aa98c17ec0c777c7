//! Vector stand-ins for the emoji decorations, sized by their em box.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::foundation::core::{BezPath, Point};

/// Heart filling roughly a `size × size` box around `center`.
pub fn heart(center: Point, size: f64) -> BezPath {
    let s = size / 2.0;
    let (cx, cy) = (center.x, center.y);
    let mut p = BezPath::new();
    p.move_to((cx, cy + s * 0.9));
    p.curve_to(
        (cx - s * 0.2, cy + s * 0.6),
        (cx - s, cy + s * 0.1),
        (cx - s, cy - s * 0.35),
    );
    p.curve_to(
        (cx - s, cy - s * 0.85),
        (cx - s * 0.3, cy - s * 1.0),
        (cx, cy - s * 0.5),
    );
    p.curve_to(
        (cx + s * 0.3, cy - s * 1.0),
        (cx + s, cy - s * 0.85),
        (cx + s, cy - s * 0.35),
    );
    p.curve_to(
        (cx + s, cy + s * 0.1),
        (cx + s * 0.2, cy + s * 0.6),
        (cx, cy + s * 0.9),
    );
    p.close_path();
    p
}

/// Regular star with `points` tips.
pub fn star(center: Point, outer: f64, inner: f64, points: usize) -> BezPath {
    let n = points.max(2) * 2;
    let mut p = BezPath::new();
    for i in 0..n {
        let r = if i % 2 == 0 { outer } else { inner };
        let a = -FRAC_PI_2 + PI * i as f64 / (n / 2) as f64;
        let pt = Point::new(center.x + r * a.cos(), center.y + r * a.sin());
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p.close_path();
    p
}

/// Four-point twinkle with curved flanks.
pub fn sparkle(center: Point, size: f64) -> BezPath {
    let r = size / 2.0;
    let (cx, cy) = (center.x, center.y);
    let k = r * 0.15;
    let mut p = BezPath::new();
    p.move_to((cx, cy - r));
    p.quad_to((cx + k, cy - k), (cx + r, cy));
    p.quad_to((cx + k, cy + k), (cx, cy + r));
    p.quad_to((cx - k, cy + k), (cx - r, cy));
    p.quad_to((cx - k, cy - k), (cx, cy - r));
    p.close_path();
    p
}

/// Slanted pencil: body plus sharpened tip pointing to the lower left.
pub fn pencil(center: Point, size: f64) -> BezPath {
    let s = size / 2.0;
    let (cx, cy) = (center.x, center.y);
    let w = s * 0.28;
    let mut p = BezPath::new();
    p.move_to((cx + s - w, cy - s));
    p.line_to((cx + s, cy - s + w));
    p.line_to((cx - s * 0.45 + w, cy + s * 0.55 + w * 0.4));
    p.line_to((cx - s, cy + s));
    p.line_to((cx - s * 0.55 - w * 0.4, cy + s * 0.45 - w));
    p.close_path();
    p
}

/// Pizza slice: a wedge with a rounded crust along the top.
pub fn pizza_slice(center: Point, size: f64) -> BezPath {
    let s = size / 2.0;
    let (cx, cy) = (center.x, center.y);
    let mut p = BezPath::new();
    p.move_to((cx, cy + s));
    p.line_to((cx - s * 0.8, cy - s * 0.6));
    p.quad_to((cx, cy - s * 1.05), (cx + s * 0.8, cy - s * 0.6));
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/templates/shapes.rs"]
mod tests;
