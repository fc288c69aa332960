#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Point where the ray from `center` toward `toward` leaves the box with the given half extents.
///
/// A zero-length ray returns the center itself.
pub fn rect_boundary_point(center: Point, half_width: f64, half_height: f64, toward: Point) -> Point {
    let d = toward - center;
    if d.x == 0.0 && d.y == 0.0 {
        return center;
    }
    let tx = if d.x == 0.0 {
        f64::INFINITY
    } else {
        half_width / d.x.abs()
    };
    let ty = if d.y == 0.0 {
        f64::INFINITY
    } else {
        half_height / d.y.abs()
    };
    center + d * tx.min(ty)
}
