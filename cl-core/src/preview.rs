//! Trajectory preview for a particle that has not been spawned yet.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::forces::ParticleForces;
use crate::integrator::Euler;
use crate::particle::{radius_from_mass, validate_position};
use crate::types::Vec2;

/// Number of integration steps in a preview
pub const PREVIEW_STEPS: usize = 20;

/// Step length of a preview (s); 20 steps cover half a second
pub const PREVIEW_DT: f64 = 0.025;

/// Colour of the ghost particle
pub const PREVIEW_COLOR: &str = "#ffffff";

/// What a spawn at `position` would look like under the current config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPreview {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
    pub radius: f64,
    pub color: String,
    /// Start point followed by one point per step. Walls are ignored.
    pub trajectory_points: Vec<Vec2>,
}

/// Predict the first half second of flight for a spawn at `position`.
pub fn spawn_preview(position: Vec2, config: &SimulationConfig) -> Result<SpawnPreview> {
    let params = config.spawn_params();
    validate_position(position)?;
    params.validate()?;

    let velocity = params.velocity();
    let forces = ParticleForces::from_config(config);

    let mut trajectory_points = Vec::with_capacity(PREVIEW_STEPS + 1);
    trajectory_points.push(position);

    let (mut pos, mut vel) = (position, velocity);
    for _ in 0..PREVIEW_STEPS {
        let step = Euler::step(pos, vel, params.mass, &forces, PREVIEW_DT);
        pos = step.position;
        vel = step.velocity;
        trajectory_points.push(pos);
    }

    Ok(SpawnPreview {
        position,
        velocity,
        mass: params.mass,
        radius: radius_from_mass(params.mass),
        color: PREVIEW_COLOR.to_string(),
        trajectory_points,
    })
}
