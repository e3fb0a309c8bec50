//! Narrow phase: the Separating-Axis-Theorem collision test and contact-point
//! generation (`spec.md` §4.4).

use super::body::{Body, BodyId};
use super::contact::{Contact, ContactPoint};
use super::vector::Vector;
use super::vertices;

fn project(vertices: &[Vector], axis: Vector) -> (f64, f64) {
    let mut min = vertices[0].dot(axis);
    let mut max = min;
    for v in &vertices[1..] {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

fn axis_overlap(a_vertices: &[Vector], b_vertices: &[Vector], axis: Vector) -> f64 {
    let (a_min, a_max) = project(a_vertices, axis);
    let (b_min, b_max) = project(b_vertices, axis);
    a_max.min(b_max) - a_min.max(b_min)
}

/// The globally nearest vertex of `body` to `reference` along `normal`,
/// followed by the better of its two polygon neighbors (§4.4 "Contact
/// points"). "Nearest along normal" means smallest signed projection, i.e.
/// most embedded in the direction the normal points.
fn closest_two_vertices(body: &Body, reference: Vector, normal: Vector) -> Vec<Vector> {
    let n = body.vertices.len();
    let mut best_idx = 0;
    let mut best_dist = f64::INFINITY;
    for (i, v) in body.vertices.iter().enumerate() {
        let d = (*v - reference).dot(normal);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    let prev_idx = (best_idx + n - 1) % n;
    let next_idx = (best_idx + 1) % n;
    let prev_dist = (body.vertices[prev_idx] - reference).dot(normal);
    let next_dist = (body.vertices[next_idx] - reference).dot(normal);
    let second_idx = if prev_dist < next_dist { prev_idx } else { next_idx };
    vec![body.vertices[best_idx], body.vertices[second_idx]]
}

/// SAT test between two bodies. `normal` always points away from `body1`
/// (oriented per §4.4). Returns `None` if any axis separates them.
pub fn test_collision(a: &Body, b: &Body, id_a: BodyId, id_b: BodyId) -> Option<Contact> {
    let mut min_overlap = f64::INFINITY;
    let mut min_axis = Vector::ZERO;

    for axis in a.axes.iter().chain(b.axes.iter()) {
        let overlap = axis_overlap(&a.vertices, &b.vertices, *axis);
        if overlap <= 0.0 {
            return None;
        }
        if overlap < min_overlap {
            min_overlap = overlap;
            min_axis = *axis;
        }
    }

    let mut normal = min_axis.normalize();
    if normal.dot(b.position - a.position) > 0.0 {
        normal = -normal;
    }

    let depth = min_overlap;
    let tangent = normal.perp();
    let penetration_vector = normal * depth;

    let mut contact_points: Vec<ContactPoint> = closest_two_vertices(b, a.position, normal)
        .into_iter()
        .filter(|v| vertices::contains(&a.vertices, *v))
        .map(ContactPoint::new)
        .collect();

    if contact_points.len() < 2 {
        let swapped: Vec<ContactPoint> = closest_two_vertices(a, b.position, -normal)
            .into_iter()
            .filter(|v| vertices::contains(&b.vertices, *v))
            .map(ContactPoint::new)
            .collect();
        if !swapped.is_empty() {
            contact_points = swapped;
        }
    }

    if contact_points.is_empty() {
        // Neither polygon strictly contains the candidate vertex (can
        // happen right at the numerical boundary of PNPOLY). Fall back to
        // the single nearest vertex so the solver still has a contact to
        // act on rather than silently dropping real overlap.
        let fallback = closest_two_vertices(b, a.position, normal);
        contact_points.push(ContactPoint::new(fallback[0]));
    }

    let slop = a.slop.max(b.slop);
    let restitution = a.restitution.max(b.restitution);
    let friction = a.friction.min(b.friction);

    Some(Contact {
        body1: id_a,
        body2: id_b,
        colliding: true,
        normal,
        tangent,
        depth,
        penetration_vector,
        contacts: contact_points,
        slop,
        restitution,
        friction,
        separation: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyOptions;

    fn square(side: f64, position: Vector) -> Body {
        let h = side / 2.0;
        Body::new(BodyOptions {
            vertices: vec![
                Vector::new(-h, -h),
                Vector::new(h, -h),
                Vector::new(h, h),
                Vector::new(-h, h),
            ],
            position,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn overlapping_squares_collide() {
        let a = square(10.0, Vector::new(0.0, 0.0));
        let b = square(10.0, Vector::new(8.0, 0.0));
        let contact = test_collision(&a, &b, 0, 1).expect("should collide");
        assert!(contact.colliding);
        assert!((contact.depth - 2.0).abs() < 1e-9);
    }

    #[test]
    fn separated_squares_do_not_collide() {
        let a = square(10.0, Vector::new(0.0, 0.0));
        let b = square(10.0, Vector::new(100.0, 0.0));
        assert!(test_collision(&a, &b, 0, 1).is_none());
    }

    #[test]
    fn normal_orientation_is_deterministic_and_consistent_with_the_solver() {
        let a = square(10.0, Vector::new(0.0, 0.0));
        let b = square(10.0, Vector::new(8.0, 0.0));
        let contact = test_collision(&a, &b, 0, 1).unwrap();
        // The orientation rule (negate when normal . (pos2 - pos1) > 0) leaves
        // the normal pointing from body2 back toward body1 here; what matters
        // is that it is nonzero along the separating axis and that the solver
        // (which adds +normal*share to body1 and -normal*share to body2)
        // pushes the pair apart, not which compass direction it happens to be.
        assert!(contact.normal.x.abs() > 0.99);
        assert!(contact.normal.dot(b.position - a.position) <= 0.0);
    }

    #[test]
    fn sat_is_symmetric_up_to_sign() {
        let a = square(10.0, Vector::new(0.0, 0.0));
        let b = square(10.0, Vector::new(7.0, 3.0));
        let ab = test_collision(&a, &b, 0, 1).unwrap();
        let ba = test_collision(&b, &a, 1, 0).unwrap();
        assert!((ab.depth - ba.depth).abs() < 1e-9);
        assert!((ab.normal.x + ba.normal.x).abs() < 1e-9);
        assert!((ab.normal.y + ba.normal.y).abs() < 1e-9);
    }

    #[test]
    fn contact_has_at_least_one_point() {
        let a = square(10.0, Vector::new(0.0, 0.0));
        let b = square(10.0, Vector::new(8.0, 0.0));
        let contact = test_collision(&a, &b, 0, 1).unwrap();
        assert!(!contact.contacts.is_empty());
    }

    #[test]
    fn combined_coefficients_use_max_slop_max_restitution_min_friction() {
        let mut a = square(10.0, Vector::new(0.0, 0.0));
        let mut b = square(10.0, Vector::new(8.0, 0.0));
        a.slop = 0.1;
        b.slop = 0.2;
        a.restitution = 0.3;
        b.restitution = 0.9;
        a.friction = 0.4;
        b.friction = 0.1;
        let contact = test_collision(&a, &b, 0, 1).unwrap();
        assert!((contact.slop - 0.2).abs() < 1e-9);
        assert!((contact.restitution - 0.9).abs() < 1e-9);
        assert!((contact.friction - 0.1).abs() < 1e-9);
    }
}
