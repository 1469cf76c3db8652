//! Numerical integration for advancing particles in time.
//!
//! Particles use a first-order Euler step with the velocity updated before
//! the position:
//!
//! ```text
//! 1. a     = a(x, v)
//! 2. v_new = v + a*dt
//! 3. x_new = x + v_new*dt
//! ```
//!
//! There is no sub-stepping. The caller picks one `dt` per tick and keeps it
//! small (sessions clamp frame deltas to 0.05 s).

use crate::types::Vec2;

/// Result of an integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationResult {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

/// Trait for computing accelerations on a particle.
///
/// Implementations provide the force model (gravity only, for now).
pub trait ForceModel {
    /// Linear acceleration of a body of `mass` at the given state.
    fn acceleration(&self, position: Vec2, velocity: Vec2, mass: f64) -> Vec2;
}

/// Euler integrator.
pub struct Euler;

impl Euler {
    /// Advance a point mass by one time step.
    pub fn step<F: ForceModel>(
        position: Vec2,
        velocity: Vec2,
        mass: f64,
        forces: &F,
        dt: f64,
    ) -> IntegrationResult {
        let acceleration = forces.acceleration(position, velocity, mass);

        let new_vel = velocity + acceleration * dt;
        let new_pos = position + new_vel * dt;

        IntegrationResult {
            position: new_pos,
            velocity: new_vel,
            acceleration,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
