//! Circular particles and the factory that spawns them.
//!
//! Ids and colours are assigned from counters owned by a
//! [`ParticleFactory`], so two factories never share hidden state and a
//! session's ids are reproducible.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::types::{constants, Vec2};

/// Cosmetic colour cycle for spawned particles.
pub const PALETTE: [&str; 12] = [
    "#00d4ff", "#ff6b6b", "#51cf66", "#ffd43b", "#cc5de8", "#ff922b", "#20c997", "#f06595",
    "#74b9ff", "#fd9644", "#a29bfe", "#55efc4",
];

/// Sequential particle identity, displayed as `p_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p_{}", self.0)
    }
}

/// Radius of a particle of the given mass.
pub fn radius_from_mass(mass: f64) -> f64 {
    constants::RADIUS_BASE * mass.sqrt()
}

// =============================================================================
// Particle
// =============================================================================

/// A circular body.
///
/// `radius` is derived from `mass` once, at spawn, and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    pub radius: f64,
    pub color: String,
    /// Recent positions, oldest first
    pub trail: VecDeque<Vec2>,
    /// Reserved; particles are never deactivated during a run
    pub is_alive: bool,
}

impl Particle {
    /// Kinetic energy: ½·m·|v|²
    pub fn kinetic_energy(&self) -> f64 {
        kinetic_energy(self.mass, self.velocity)
    }

    /// Linear momentum: m·v
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.mass
    }
}

/// Kinetic energy of a mass moving at `velocity`.
pub fn kinetic_energy(mass: f64, velocity: Vec2) -> f64 {
    0.5 * mass * velocity.magnitude_squared()
}

/// Launch parameters for a new particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    pub mass: f64,
    /// Degrees, 0 = +x, counted toward +y
    pub angle: f64,
    pub speed: f64,
}

impl SpawnParams {
    /// Initial velocity: `(speed·cos θ, speed·sin θ)`.
    pub fn velocity(&self) -> Vec2 {
        let angle_rad = self.angle.to_radians();
        Vec2::new(self.speed * angle_rad.cos(), self.speed * angle_rad.sin())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(PhysicsError::InvalidParticle {
                field: "mass",
                value: self.mass,
            });
        }
        if !self.speed.is_finite() {
            return Err(PhysicsError::InvalidParticle {
                field: "speed",
                value: self.speed,
            });
        }
        if !self.angle.is_finite() {
            return Err(PhysicsError::InvalidParticle {
                field: "angle",
                value: self.angle,
            });
        }
        Ok(())
    }
}

pub(crate) fn validate_position(position: Vec2) -> Result<()> {
    if !position.x.is_finite() {
        return Err(PhysicsError::InvalidParticle {
            field: "position.x",
            value: position.x,
        });
    }
    if !position.y.is_finite() {
        return Err(PhysicsError::InvalidParticle {
            field: "position.y",
            value: position.y,
        });
    }
    Ok(())
}

// =============================================================================
// Particle Factory
// =============================================================================

/// Owns the id and palette counters used at spawn.
#[derive(Debug, Clone, Default)]
pub struct ParticleFactory {
    last_id: u64,
    color_index: usize,
}

impl ParticleFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a particle at `position`.
    ///
    /// Inputs are validated before either counter advances, so a rejected
    /// spawn leaves the factory untouched.
    pub fn spawn(&mut self, position: Vec2, params: &SpawnParams) -> Result<Particle> {
        validate_position(position)?;
        params.validate()?;

        let particle = Particle {
            id: self.next_id(),
            position,
            velocity: params.velocity(),
            mass: params.mass,
            radius: radius_from_mass(params.mass),
            color: self.next_color().to_string(),
            trail: VecDeque::from([position]),
            is_alive: true,
        };
        tracing::debug!(id = %particle.id, mass = particle.mass, "spawned particle");
        Ok(particle)
    }

    /// Number of particles spawned so far.
    pub fn spawned(&self) -> u64 {
        self.last_id
    }

    fn next_id(&mut self) -> ParticleId {
        self.last_id += 1;
        ParticleId(self.last_id)
    }

    fn next_color(&mut self) -> &'static str {
        let color = PALETTE[self.color_index % PALETTE.len()];
        self.color_index += 1;
        color
    }
}

// =============================================================================
// Tests
// =============================================================================
