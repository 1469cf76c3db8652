//! Per-particle state advance: gravity, integration, walls and trail.
//!
//! Each particle is advanced independently; nothing here looks at other
//! particles. Wall bounces are perfectly elastic whatever the configured
//! restitution.
//!
//! ```text
//! (0,0) ───────────────── (w,0)
//!   │    ●→                  │
//!   │         ↓ gravity      │
//!   │                    ←●  │
//! (0,h) ───────────────── (w,h)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{PhysicsError, Result};
use crate::forces::ParticleForces;
use crate::integrator::Euler;
use crate::particle::Particle;
use crate::types::Vec2;

/// Axis-aligned simulation area `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let bounds = Self { width, height };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Both sides must be finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        let Self { width, height } = *self;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(PhysicsError::InvalidBounds { width, height });
        }
        Ok(())
    }

    /// Clamp a circle of `radius` into the area, reflecting the velocity
    /// component of every wall it crossed.
    pub fn contain(&self, position: Vec2, velocity: Vec2, radius: f64) -> (Vec2, Vec2) {
        let mut pos = position;
        let mut vel = velocity;

        if pos.x - radius < 0.0 {
            pos.x = radius;
            vel.x = vel.x.abs();
        }
        if pos.x + radius > self.width {
            pos.x = self.width - radius;
            vel.x = -vel.x.abs();
        }
        if pos.y - radius < 0.0 {
            pos.y = radius;
            vel.y = vel.y.abs();
        }
        if pos.y + radius > self.height {
            pos.y = self.height - radius;
            vel.y = -vel.y.abs();
        }

        (pos, vel)
    }
}

/// Advance one particle by `dt`, returning its new state.
pub fn update_particle(
    particle: &Particle,
    dt: f64,
    config: &SimulationConfig,
    bounds: &Bounds,
) -> Particle {
    let forces = ParticleForces::from_config(config);
    let step = Euler::step(
        particle.position,
        particle.velocity,
        particle.mass,
        &forces,
        dt,
    );

    let (position, velocity) = if config.walls_enabled {
        bounds.contain(step.position, step.velocity, particle.radius)
    } else {
        (step.position, step.velocity)
    };

    let mut trail = particle.trail.clone();
    trail.push_back(position);
    while trail.len() > config.trail_length {
        trail.pop_front();
    }

    Particle {
        position,
        velocity,
        trail,
        ..particle.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
