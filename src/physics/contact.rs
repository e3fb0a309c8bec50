//! The narrow-phase result: `Contact` in `spec.md` §3/§4.4.

use super::body::BodyId;
use super::vector::Vector;

/// One vertex of contact plus the accumulated impulses the velocity solver
/// maintains there across iterations, for warm-start-style resting stability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub vertex: Vector,
    /// Accumulated normal impulse. Invariant: always `<= 0` (§4.5).
    pub normal_impulse: f64,
    pub tangent_impulse: f64,
}

impl ContactPoint {
    pub fn new(vertex: Vector) -> Self {
        Self { vertex, normal_impulse: 0.0, tangent_impulse: 0.0 }
    }
}

/// Narrow-phase result for one candidate pair. `normal` always points away
/// from `body1` (§4.4).
#[derive(Debug, Clone)]
pub struct Contact {
    pub body1: BodyId,
    pub body2: BodyId,
    pub colliding: bool,
    pub normal: Vector,
    pub tangent: Vector,
    pub depth: f64,
    pub penetration_vector: Vector,
    pub contacts: Vec<ContactPoint>,
    pub slop: f64,
    pub restitution: f64,
    pub friction: f64,
    /// Recomputed by the position solver each iteration (§4.5 step 2).
    pub separation: f64,
}
