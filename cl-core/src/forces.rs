//! Forces acting on particles.
//!
//! The only body force is uniform gravity along +y (downward on screen).
//! Particles do not attract each other; all pair interaction happens in
//! the collision resolver.

use crate::config::SimulationConfig;
use crate::integrator::ForceModel;
use crate::types::Vec2;

/// Force model built from the session configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleForces {
    /// Gravity vector (default: +400 in Y)
    pub gravity: Vec2,
    pub enable_gravity: bool,
}

impl Default for ParticleForces {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl ParticleForces {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            gravity: Vec2::new(0.0, config.gravity),
            enable_gravity: config.gravity_enabled,
        }
    }
}

impl ForceModel for ParticleForces {
    fn acceleration(&self, _position: Vec2, _velocity: Vec2, _mass: f64) -> Vec2 {
        if self.enable_gravity {
            self.gravity
        } else {
            Vec2::ZERO
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_points_down() {
        let config = SimulationConfig {
            gravity_enabled: true,
            gravity: 250.0,
            ..SimulationConfig::default()
        };
        let forces = ParticleForces::from_config(&config);

        let acc = forces.acceleration(Vec2::ZERO, Vec2::new(3.0, 4.0), 2.0);
        assert_eq!(acc, Vec2::new(0.0, 250.0));
    }

    #[test]
    fn test_disabled_gravity_is_zero() {
        let forces = ParticleForces::default();
        assert!(!forces.enable_gravity);
        assert_eq!(forces.acceleration(Vec2::ZERO, Vec2::ZERO, 1.0), Vec2::ZERO);
    }
}
