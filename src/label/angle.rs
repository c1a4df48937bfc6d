use crate::models::{Point, Viewport};

/// Map a pointer position to an angle in degrees.
///
/// The geometric origin is the top-center of the viewport. Straight down
/// from the origin is 90 deg, the rightward horizontal is 0 deg and the
/// leftward horizontal is 180 deg; everything else clamps into [0, 180].
pub fn from_pointer(viewport: Viewport, p: Point) -> f64 {
    let origin = viewport.origin();
    let rads = (p.y - origin.y).atan2(p.x - origin.x);
    (180.0 - rads.to_degrees()).clamp(0.0, 180.0)
}

/// Endpoints of an indicator line for `angle`, anchored at the origin and
/// spanning `length_frac` of the viewport height.
pub fn line_endpoints(viewport: Viewport, angle: f64, length_frac: f64) -> (Point, Point) {
    let origin = viewport.origin();
    let length = viewport.height as f64 * length_frac;
    let rads = (180.0 - angle).to_radians();
    let end = Point::new(origin.x + length * rads.cos(), origin.y + length * rads.sin());
    (origin, end)
}
