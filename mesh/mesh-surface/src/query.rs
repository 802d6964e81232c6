//! Exact point-to-triangle queries.

use nalgebra::Point3;

/// Compute the closest point on a triangle to a query point.
///
/// The result may be a vertex, a point on an edge, or a point in the
/// triangle's interior. Uses the barycentric region method, which is
/// robust for degenerate (sliver or zero-area) triangles.
///
/// # Example
///
/// ```
/// use mesh_surface::closest_point_on_triangle;
/// use nalgebra::Point3;
///
/// let a = Point3::origin();
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
///
/// // A point above the interior projects straight down onto the face
/// let p = closest_point_on_triangle(Point3::new(0.25, 0.25, 1.0), a, b, c);
/// assert!(p.z.abs() < 1e-12);
/// ```
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn closest_point_on_triangle(
    p: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    // Vertex region A
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    // Vertex region B
    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    // Edge region AB
    let vc = d1.mul_add(d4, -(d3 * d2));
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return Point3::from(a.coords + ab * v);
    }

    // Vertex region C
    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    // Edge region AC
    let vb = d5.mul_add(d2, -(d1 * d6));
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return Point3::from(a.coords + ac * w);
    }

    // Edge region BC
    let va = d3.mul_add(d6, -(d5 * d4));
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return Point3::from(b.coords + (c - b) * w);
    }

    // Interior
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    Point3::from(a.coords + ab * v + ac * w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn closest_at_vertex() {
        let (a, b, c) = unit_triangle();

        let p = Point3::new(-1.0, -1.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!((closest - a).norm() < 1e-12);

        let p = Point3::new(3.0, -1.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!((closest - b).norm() < 1e-12);

        let p = Point3::new(-1.0, 3.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!((closest - c).norm() < 1e-12);
    }

    #[test]
    fn closest_on_edge() {
        let (a, b, c) = unit_triangle();

        // Below edge AB
        let p = Point3::new(0.5, -1.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!(closest.y.abs() < 1e-12);
        assert!((closest.x - 0.5).abs() < 1e-12);

        // Beyond the hypotenuse BC
        let p = Point3::new(1.0, 1.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!((closest.x - 0.5).abs() < 1e-12);
        assert!((closest.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn closest_in_interior() {
        let (a, b, c) = unit_triangle();

        let p = Point3::new(0.25, 0.25, 2.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!(closest.z.abs() < 1e-12);
        assert!((closest.x - 0.25).abs() < 1e-12);
        assert!((closest.y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn point_on_triangle_maps_to_itself() {
        let (a, b, c) = unit_triangle();
        let p = Point3::new(0.2, 0.3, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!((closest - p).norm() < 1e-12);
    }

    #[test]
    fn degenerate_triangle_is_handled() {
        // Collinear vertices collapse to a segment
        let a = Point3::origin();
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);

        let p = Point3::new(1.5, 1.0, 0.0);
        let closest = closest_point_on_triangle(p, a, b, c);
        assert!(closest.y.abs() < 1e-12);
        assert!((closest.x - 1.5).abs() < 1e-12);
    }
}
