//! Overlap detection between circular particles.
//!
//! Detection is discrete: two particles are in contact when their circles
//! overlap after integration. Pairs are visited in a fixed order so that
//! results are reproducible.

use crate::particle::Particle;
use crate::types::Vec2;

/// Geometry of one overlapping pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from B's centre to A's centre
    pub normal: Vec2,
    /// Centre-to-centre distance
    pub distance: f64,
    /// How far the circles interpenetrate: `rA + rB - distance`
    pub overlap: f64,
    /// Midpoint of the two centres
    pub point: Vec2,
}

impl Contact {
    /// Unit tangent, a quarter turn from the normal.
    pub fn tangent(&self) -> Vec2 {
        self.normal.perpendicular()
    }
}

/// Detect contact between `a` and `b`.
///
/// Returns `None` when the circles do not overlap, when they only touch, and
/// when the centres coincide exactly. The last case has no defined normal
/// and is treated as "no collision".
pub fn detect_contact(a: &Particle, b: &Particle) -> Option<Contact> {
    let delta = a.position - b.position;
    let distance = delta.magnitude();
    let reach = a.radius + b.radius;

    if distance == 0.0 || distance >= reach {
        return None;
    }

    Some(Contact {
        normal: delta / distance,
        distance,
        overlap: reach - distance,
        point: a.position.lerp(&b.position, 0.5),
    })
}

/// Every unordered index pair `(i, j)` with `i < j`, ascending `i` then `j`.
pub fn pair_indices(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).flat_map(move |i| (i + 1..count).map(move |j| (i, j)))
}

// =============================================================================
// Tests
// =============================================================================
