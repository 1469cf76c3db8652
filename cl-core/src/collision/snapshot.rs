//! Immutable records of resolved collisions.

use serde::{Deserialize, Serialize};

use crate::particle::{kinetic_energy, Particle, ParticleId};
use crate::types::{CollisionType, Vec2};

/// One particle's side of a collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub id: ParticleId,
    pub mass: f64,
    pub velocity_before: Vec2,
    pub velocity_after: Vec2,
    pub ke_before: f64,
    pub ke_after: f64,
    pub momentum_before: Vec2,
    pub momentum_after: Vec2,
}

impl ParticleRecord {
    /// Record `before` (state at detection) against its resolved velocity.
    pub fn new(before: &Particle, velocity_after: Vec2) -> Self {
        Self {
            id: before.id,
            mass: before.mass,
            velocity_before: before.velocity,
            velocity_after,
            ke_before: kinetic_energy(before.mass, before.velocity),
            ke_after: kinetic_energy(before.mass, velocity_after),
            momentum_before: before.velocity * before.mass,
            momentum_after: velocity_after * before.mass,
        }
    }
}

/// Pair totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub total_momentum_before: Vec2,
    pub total_momentum_after: Vec2,
    pub total_ke_before: f64,
    pub total_ke_after: f64,
    /// `total_ke_before - total_ke_after`
    pub energy_lost: f64,
}

/// Physical quantities of one resolved pair collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionSnapshot {
    pub particle_a: ParticleRecord,
    pub particle_b: ParticleRecord,
    pub system: SystemRecord,
    pub collision_type: CollisionType,
    /// Simulation time (s) of the tick that produced this collision
    pub timestamp: f64,
    /// Midpoint of the two centres at detection
    pub position: Vec2,
}

impl CollisionSnapshot {
    pub fn new(
        particle_a: ParticleRecord,
        particle_b: ParticleRecord,
        collision_type: CollisionType,
        timestamp: f64,
        position: Vec2,
    ) -> Self {
        let total_ke_before = particle_a.ke_before + particle_b.ke_before;
        let total_ke_after = particle_a.ke_after + particle_b.ke_after;
        let system = SystemRecord {
            total_momentum_before: particle_a.momentum_before + particle_b.momentum_before,
            total_momentum_after: particle_a.momentum_after + particle_b.momentum_after,
            total_ke_before,
            total_ke_after,
            energy_lost: total_ke_before - total_ke_after,
        };

        Self {
            particle_a,
            particle_b,
            system,
            collision_type,
            timestamp,
            position,
        }
    }
}
