use kurbo::Shape;

use super::*;

fn within(path: &BezPath, center: Point, size: f64) -> bool {
    let bb = path.bounding_box();
    let half = size / 2.0 + 1e-6;
    bb.x0 >= center.x - half
        && bb.x1 <= center.x + half
        && bb.y0 >= center.y - half
        && bb.y1 <= center.y + half
}

#[test]
fn decorations_fit_their_box() {
    let c = Point::new(50.0, 40.0);
    assert!(within(&heart(c, 20.0), c, 20.0));
    assert!(within(&sparkle(c, 20.0), c, 20.0));
    assert!(within(&pencil(c, 20.0), c, 20.0));
    assert!(within(&pizza_slice(c, 20.0), c, 22.0));
    assert!(within(&star(c, 10.0, 4.0, 5), c, 20.0));
}

#[test]
fn star_has_two_vertices_per_point() {
    let s = star(Point::ZERO, 10.0, 5.0, 5);
    // move + 9 lines + close
    assert_eq!(s.elements().len(), 11);
    assert!(s.area().abs() > 0.0);
}

#[test]
fn heart_is_symmetric() {
    let bb = heart(Point::new(0.0, 0.0), 30.0).bounding_box();
    assert!((bb.x0 + bb.x1).abs() < 1e-9);
}
