//! Iterative position and velocity solvers (`spec.md` §4.5).

use super::body::Body;
use super::contact::Contact;
use super::vector::Vector;
use super::vertices;

/// Below this squared normal approach speed (with the sign convention that a
/// closing contact has `vn < 0`) restitution is suppressed for that contact
/// this iteration — the resting-contact stability filter from §4.5 (Catto-
/// style accumulated impulse solving).
const RESTING_THRESH: f64 = 6.0;

/// Preparation for a tick's position solve: zero per-body accumulators and
/// count how many contact points land on each body (§4.5 "Preparation").
pub fn prepare_position_solve(bodies: &mut [Body], contacts: &[Contact]) {
    for body in bodies.iter_mut() {
        body.position_impulse = Vector::ZERO;
        body.total_contacts = 0;
    }
    for contact in contacts {
        let count = contact.contacts.len() as u32;
        bodies[contact.body1].total_contacts += count;
        bodies[contact.body2].total_contacts += count;
    }
}

/// One iteration of the position solver over every contact (§4.5 steps 2-5).
pub fn solve_position_iteration(bodies: &mut [Body], contacts: &mut [Contact]) {
    for contact in contacts.iter_mut() {
        solve_position_for_contact(bodies, contact);
    }
}

fn solve_position_for_contact(bodies: &mut [Body], contact: &mut Contact) {
    let id1 = contact.body1;
    let id2 = contact.body2;
    let normal = contact.normal;

    let updating1 = bodies[id1].should_update();
    let updating2 = bodies[id2].should_update();
    if !updating1 && !updating2 {
        return;
    }

    // Positions are unchanged across this whole pass (applied only once in
    // `post_solve_position`), so the separation formula in §4.5 step 2
    // collapses algebraically to depth plus the impulse terms — the position
    // components cancel regardless of how they're paired, since both bodies'
    // positions are constant for the duration of this loop.
    let imp1 = bodies[id1].position_impulse;
    let imp2 = bodies[id2].position_impulse;
    let separation = normal.dot(imp2 - imp1) + contact.depth;

    // §4.5 stores the true geometric separation (step 2) before the
    // non-updating doubling (step 4) — the velocity solver's friction
    // estimate reads `contact.separation` and must see the real value, not
    // the doubled one used only to distribute the position impulse.
    contact.separation = separation;

    if separation < 0.0 {
        return;
    }

    let mut effective_separation = separation;
    if !updating1 || !updating2 {
        effective_separation *= 2.0;
    }

    let position_impulse_magnitude = effective_separation - contact.slop;

    if updating1 {
        let total = bodies[id1].total_contacts.max(1) as f64;
        let share = position_impulse_magnitude / total;
        bodies[id1].position_impulse = bodies[id1].position_impulse + normal * share;
    }
    if updating2 {
        let total = bodies[id2].total_contacts.max(1) as f64;
        let share = position_impulse_magnitude / total;
        bodies[id2].position_impulse = bodies[id2].position_impulse - normal * share;
    }
}

/// Apply the accumulated position impulses once, after all iterations
/// (§4.5 "postSolvePosition"). Shifts `position` and `previousPosition`
/// together so velocity is left intact.
pub fn post_solve_position(bodies: &mut [Body]) {
    for body in bodies.iter_mut() {
        if body.position_impulse != Vector::ZERO {
            let impulse = body.position_impulse;
            vertices::translate(&mut body.vertices, impulse);
            body.bounds = body.bounds.translate(impulse);
            body.position = body.position + impulse;
            body.previous_position = body.previous_position + impulse;
        }
        body.position_impulse = Vector::ZERO;
        body.total_contacts = 0;
    }
}

/// One iteration of the velocity solver over every contact (§4.5 second half).
pub fn solve_velocity_iteration(bodies: &mut [Body], contacts: &mut [Contact]) {
    for contact in contacts.iter_mut() {
        solve_velocity_for_contact(bodies, contact);
    }
}

fn solve_velocity_for_contact(bodies: &mut [Body], contact: &mut Contact) {
    let id1 = contact.body1;
    let id2 = contact.body2;

    let updating1 = bodies[id1].should_update();
    let updating2 = bodies[id2].should_update();
    if !updating1 && !updating2 {
        return;
    }

    let normal = contact.normal;
    let tangent = contact.tangent;
    let restitution = contact.restitution;
    let friction = contact.friction;
    let separation = contact.separation;
    let contact_count = contact.contacts.len() as f64;

    for point in contact.contacts.iter_mut() {
        let (pos1, prev_pos1, angle1, prev_angle1, inv_mass1, inv_inertia1) = {
            let b = &bodies[id1];
            (b.position, b.previous_position, b.angle, b.previous_angle, b.inv_mass, b.inv_inertia)
        };
        let (pos2, prev_pos2, angle2, prev_angle2, inv_mass2, inv_inertia2) = {
            let b = &bodies[id2];
            (b.position, b.previous_position, b.angle, b.previous_angle, b.inv_mass, b.inv_inertia)
        };

        // Instantaneous velocities rederived fresh every point, since prior
        // points (in this contact or earlier contacts this iteration) may
        // already have perturbed previousPosition/previousAngle.
        let v1 = pos1 - prev_pos1;
        let w1 = angle1 - prev_angle1;
        let v2 = pos2 - prev_pos2;
        let w2 = angle2 - prev_angle2;

        let r1 = point.vertex - pos1;
        let r2 = point.vertex - pos2;

        let cv1 = r1.perp() * w1 + v1;
        let cv2 = r2.perp() * w2 + v2;
        let rv = cv1 - cv2;

        let vn = rv.dot(normal);
        let vt = rv.dot(tangent);

        let r1_cross_n = r1.cross(normal);
        let r2_cross_n = r2.cross(normal);
        let d = (inv_mass1
            + inv_mass2
            + inv_inertia1 * r1_cross_n * r1_cross_n
            + inv_inertia2 * r2_cross_n * r2_cross_n)
            * contact_count;

        if d < 1e-12 {
            continue;
        }

        let jn_raw = (1.0 + restitution) * vn / d;

        let normal_force = (separation + vn).clamp(0.0, 1.0) * 5.0;
        let max_friction = friction * normal_force;

        let jt_raw = if vt.abs() > max_friction { (friction * vt) / d } else { vt / d };

        let jn = if vn < 0.0 && vn * vn > RESTING_THRESH { 0.0 } else { jn_raw };

        let old_normal_impulse = point.normal_impulse;
        let new_normal_impulse = (old_normal_impulse + jn).min(0.0);
        let normal_delta = new_normal_impulse - old_normal_impulse;
        point.normal_impulse = new_normal_impulse;

        let old_tangent_impulse = point.tangent_impulse;
        let new_tangent_impulse = (old_tangent_impulse + jt_raw).clamp(-max_friction, max_friction);
        let tangent_delta = new_tangent_impulse - old_tangent_impulse;
        point.tangent_impulse = new_tangent_impulse;

        let impulse = normal * normal_delta + tangent * tangent_delta;

        if updating1 {
            bodies[id1].previous_position = bodies[id1].previous_position + impulse * inv_mass1;
            bodies[id1].previous_angle += r1.cross(impulse) * inv_inertia1;
        }
        if updating2 {
            bodies[id2].previous_position = bodies[id2].previous_position - impulse * inv_mass2;
            bodies[id2].previous_angle -= r2.cross(impulse) * inv_inertia2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::body::BodyOptions;
    use crate::physics::narrowphase::test_collision;

    fn square(side: f64, position: Vector, previous_position: Vector) -> Body {
        let h = side / 2.0;
        Body::new(BodyOptions {
            vertices: vec![
                Vector::new(-h, -h),
                Vector::new(h, -h),
                Vector::new(h, h),
                Vector::new(-h, h),
            ],
            position,
            previous_position: Some(previous_position),
            restitution: 0.0,
            friction: 0.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn position_solve_reduces_overlap_over_iterations() {
        let mut bodies = vec![
            square(10.0, Vector::new(0.0, 0.0), Vector::new(0.0, 0.0)),
            square(10.0, Vector::new(8.0, 0.0), Vector::new(8.0, 0.0)),
        ];
        bodies[0].is_static = true;
        bodies[0].set_is_static(true);

        let mut contacts =
            vec![test_collision(&bodies[0], &bodies[1], 0, 1).expect("should collide")];
        let initial_depth = contacts[0].depth;

        prepare_position_solve(&mut bodies, &contacts);
        for _ in 0..6 {
            solve_position_iteration(&mut bodies, &mut contacts);
        }
        post_solve_position(&mut bodies);

        // body 1 (dynamic) should have moved away from the static body 0.
        assert!(bodies[1].position.x > 8.0 - 1e-9);
        assert!(initial_depth > 0.0);
    }

    #[test]
    fn post_solve_position_preserves_velocity() {
        let mut bodies = vec![square(10.0, Vector::new(0.0, 0.0), Vector::new(-1.0, 0.0))];
        bodies[0].position_impulse = Vector::new(2.0, 3.0);
        let velocity_before = bodies[0].position - bodies[0].previous_position;
        post_solve_position(&mut bodies);
        let velocity_after = bodies[0].position - bodies[0].previous_position;
        assert!((velocity_after.x - velocity_before.x).abs() < 1e-9);
        assert!((velocity_after.y - velocity_before.y).abs() < 1e-9);
    }

    #[test]
    fn velocity_solve_does_not_move_two_static_bodies() {
        let mut bodies = vec![
            square(10.0, Vector::new(0.0, 0.0), Vector::new(0.0, 0.0)),
            square(10.0, Vector::new(8.0, 0.0), Vector::new(8.0, 0.0)),
        ];
        bodies[0].set_is_static(true);
        bodies[1].set_is_static(true);
        let mut contacts =
            vec![test_collision(&bodies[0], &bodies[1], 0, 1).expect("should collide")];
        let before = (bodies[0].previous_position, bodies[1].previous_position);
        solve_velocity_iteration(&mut bodies, &mut contacts);
        assert_eq!(bodies[0].previous_position, before.0);
        assert_eq!(bodies[1].previous_position, before.1);
    }
}
