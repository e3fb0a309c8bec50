//! Polygon geometry: area, centroid, moment of inertia, point containment, rotation.
//!
//! Operates on plain `&[Vector]` / `&mut [Vector]` slices rather than a wrapper
//! type, mirroring the teacher's free-function style in `integrate.rs` and
//! `broadphase.rs` (one file of pure functions per concern, called from
//! `body.rs`/`narrowphase.rs`).

use super::vector::Vector;

/// Signed shoelace area: positive for CCW winding, negative for CW.
pub fn signed_area(vertices: &[Vector]) -> f64 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + n - 1) % n;
        let vi = vertices[i];
        let vj = vertices[j];
        sum += (vj.x - vi.x) * (vj.y + vi.y);
    }
    sum * 0.5
}

/// Unsigned area, `A = 1/2 |sum((x_j - x_i)(y_j + y_i))|`.
pub fn area(vertices: &[Vector]) -> f64 {
    signed_area(vertices).abs()
}

/// Centroid of a convex polygon using the standard signed-area formula.
pub fn centroid(vertices: &[Vector]) -> Vector {
    let n = vertices.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut cross_sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let vi = vertices[i];
        let vj = vertices[j];
        let cross = vi.cross(vj);
        cx += (vi.x + vj.x) * cross;
        cy += (vi.y + vj.y) * cross;
        cross_sum += cross;
    }
    let six_area = 3.0 * cross_sum;
    if six_area.abs() < 1e-12 {
        return Vector::ZERO;
    }
    Vector::new(cx / six_area, cy / six_area)
}

/// Moment of inertia about the polygon centroid, for a polygon of mass `mass`.
/// Vertices must already be translated so the centroid sits at the origin —
/// `Body` does this before calling in (it recomputes inertia from
/// centroid-relative vertices, never from world-space ones directly).
pub fn inertia(vertices: &[Vector], mass: f64) -> f64 {
    let n = vertices.len();
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let vi = vertices[i];
        let vj = vertices[j];
        let cross = vj.cross(vi).abs();
        numerator += cross * (vj.dot(vj) + vj.dot(vi) + vi.dot(vi));
        denominator += cross;
    }
    if denominator < 1e-12 {
        return 0.0;
    }
    (mass / 6.0) * numerator / denominator
}

/// Ray-cast parity test (PNPOLY) for point-in-polygon containment.
pub fn contains(vertices: &[Vector], point: Vector) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        let intersects = (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
        if intersects {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Rotate every vertex by `angle` radians about `pivot`, in place.
pub fn rotate(vertices: &mut [Vector], angle: f64, pivot: Vector) {
    for v in vertices.iter_mut() {
        *v = v.rotate_about(angle, pivot);
    }
}

/// Translate every vertex by `delta`, in place.
pub fn translate(vertices: &mut [Vector], delta: Vector) {
    for v in vertices.iter_mut() {
        *v = *v + delta;
    }
}

/// Outward-facing unit normal of edge `i -> i+1`.
pub fn edge_normal(vertices: &[Vector], i: usize) -> Vector {
    let n = vertices.len();
    let a = vertices[i];
    let b = vertices[(i + 1) % n];
    (b - a).perp().normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Vector> {
        let h = side / 2.0;
        vec![
            Vector::new(-h, -h),
            Vector::new(h, -h),
            Vector::new(h, h),
            Vector::new(-h, h),
        ]
    }

    #[test]
    fn area_of_unit_square() {
        assert!((area(&square(1.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn centroid_of_centered_square_is_origin() {
        let c = centroid(&square(4.0));
        assert!(c.magnitude() < 1e-9);
    }

    #[test]
    fn centroid_of_offset_square() {
        let verts: Vec<Vector> = square(2.0).iter().map(|v| *v + Vector::new(5.0, 5.0)).collect();
        let c = centroid(&verts);
        assert!((c.x - 5.0).abs() < 1e-9);
        assert!((c.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn inertia_of_centered_square_is_positive() {
        let i = inertia(&square(2.0), 4.0);
        assert!(i > 0.0);
    }

    #[test]
    fn contains_center_point() {
        assert!(contains(&square(4.0), Vector::ZERO));
    }

    #[test]
    fn does_not_contain_far_point() {
        assert!(!contains(&square(4.0), Vector::new(100.0, 100.0)));
    }

    #[test]
    fn rotate_about_centroid_preserves_area() {
        let mut verts = square(3.0);
        let before = area(&verts);
        rotate(&mut verts, 0.73, Vector::ZERO);
        assert!((area(&verts) - before).abs() < 1e-9);
    }

    #[test]
    fn translate_shifts_every_vertex() {
        let mut verts = square(2.0);
        translate(&mut verts, Vector::new(1.0, 2.0));
        assert_eq!(verts[0], Vector::new(-2.0, -1.0));
    }
}
