//! Broad phase: enumerate unordered body-index pairs with overlapping AABBs
//! (`spec.md` §4.7 step 5). O(N²), as §9 notes is "sufficient for small
//! scenes; a spatial hash or sweep-and-prune is a drop-in replacement
//! preserving the pair-set contract." Kept as the simplest correct
//! implementation rather than porting the teacher's `SpatialHash`
//! (`broadphase.rs` in the teacher), since the pair-set contract — not the
//! acceleration structure — is what `spec.md` actually specifies.

use super::body::{Body, BodyId};

/// All unordered pairs `(i, j)` with `i < j` whose bodies have overlapping
/// bounds and where at least one of the pair is updating (neither static nor
/// sleeping). Pairs of two non-updating bodies are dropped here rather than
/// in the narrow phase, matching §4.7 step 5 and §4.6's closing note.
pub fn find_pairs(bodies: &[Body]) -> Vec<(BodyId, BodyId)> {
    let mut pairs = Vec::new();
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let a = &bodies[i];
            let b = &bodies[j];
            if !a.should_update() && !b.should_update() {
                continue;
            }
            if a.bounds.overlaps(&b.bounds) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}
