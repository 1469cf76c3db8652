//! Impulse-based collision response between particle pairs.
//!
//! Each contact is reduced to a 1-D problem along the contact normal:
//!
//! ```text
//!        tangent ↑
//!                |
//!     (B) ───────┼──────→ (A)     normal: B → A
//!                |
//! ```
//!
//! - Normal components are exchanged with restitution `e`.
//! - Tangential components pass through untouched (no friction, no spin).
//! - The pair is then pushed apart by half the overlap each.
//!
//! ## Sequential resolution
//!
//! Pairs are resolved one after another in `(i, j)` order. A particle in two
//! contacts has its second contact act on the velocity and position left by
//! the first. This approximates an iterative solver and keeps results
//! reproducible; there is no simultaneous multi-body solve.

use crate::collision::detection::{detect_contact, pair_indices, Contact};
use crate::collision::snapshot::{CollisionSnapshot, ParticleRecord};
use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::types::{CollisionType, Vec2};

/// Output of one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Every input particle, in input order
    pub particles: Vec<Particle>,
    /// One snapshot per resolved pair, in pair order
    pub snapshots: Vec<CollisionSnapshot>,
}

/// Collision resolver for a particle set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    pub collision_type: CollisionType,
    /// Effective restitution (already forced to 1.0 for elastic)
    pub restitution: f64,
}

impl CollisionResolver {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            collision_type: config.collision_type,
            restitution: config.effective_restitution(),
        }
    }

    /// Post-collision normal speeds for masses `ma`, `mb` with pre-collision
    /// normal speeds `a1n`, `b1n`.
    pub fn normal_velocities(&self, ma: f64, a1n: f64, mb: f64, b1n: f64) -> (f64, f64) {
        let total = ma + mb;
        let e = self.restitution;

        if self.collision_type == CollisionType::Inelastic && e == 0.0 {
            let common = (ma * a1n + mb * b1n) / total;
            return (common, common);
        }

        let a2n = ((ma - e * mb) * a1n + (1.0 + e) * mb * b1n) / total;
        let b2n = ((mb - e * ma) * b1n + (1.0 + e) * ma * a1n) / total;
        (a2n, b2n)
    }

    /// Resolve one contact in place and record it.
    pub fn resolve_pair(
        &self,
        a: &mut Particle,
        b: &mut Particle,
        contact: &Contact,
        timestamp: f64,
    ) -> CollisionSnapshot {
        let normal = contact.normal;
        let tangent = contact.tangent();

        let a1n = a.velocity.dot(&normal);
        let a1t = a.velocity.dot(&tangent);
        let b1n = b.velocity.dot(&normal);
        let b1t = b.velocity.dot(&tangent);

        let (a2n, b2n) = self.normal_velocities(a.mass, a1n, b.mass, b1n);

        let a_after = normal * a2n + tangent * a1t;
        let b_after = normal * b2n + tangent * b1t;

        let snapshot = CollisionSnapshot::new(
            ParticleRecord::new(a, a_after),
            ParticleRecord::new(b, b_after),
            self.collision_type,
            timestamp,
            contact.point,
        );

        a.velocity = a_after;
        b.velocity = b_after;

        let push = normal * (contact.overlap / 2.0);
        a.position += push;
        b.position -= push;

        tracing::debug!(
            a = %a.id,
            b = %b.id,
            energy_lost = snapshot.system.energy_lost,
            "resolved collision"
        );
        snapshot
    }

    /// Detect and resolve every overlapping pair.
    pub fn resolve(&self, particles: &[Particle], timestamp: f64) -> Resolution {
        let mut out = particles.to_vec();
        let mut snapshots = Vec::new();

        for (i, j) in pair_indices(out.len()) {
            let Some(contact) = detect_contact(&out[i], &out[j]) else {
                continue;
            };
            let (a, b) = pair_mut(&mut out, i, j);
            snapshots.push(self.resolve_pair(a, b, &contact, timestamp));
        }

        Resolution {
            particles: out,
            snapshots,
        }
    }
}

/// Resolve all contacts in `particles` under `config`.
pub fn resolve_collisions(
    particles: &[Particle],
    config: &SimulationConfig,
    timestamp: f64,
) -> Resolution {
    CollisionResolver::from_config(config).resolve(particles, timestamp)
}

/// Two distinct mutable elements, `i < j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Momentum carried by a set of particles.
pub fn total_momentum(particles: &[Particle]) -> Vec2 {
    particles
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.momentum())
}

// =============================================================================
// Tests
// =============================================================================
