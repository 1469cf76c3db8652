//! # CL Core
//!
//! A 2D particle collision engine with before/after conservation metrics.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, collision type, constants)
//! - `particle`: Particles, radius from mass, the spawning factory
//! - `integrator`: Numerical integration (explicit Euler)
//! - `forces`: Force models (uniform gravity)
//! - `kinematics`: Per-particle update with wall reflection and trails
//! - `collision`: Pair detection, restitution response, snapshots
//! - `metrics`: Chart data derived from a collision snapshot
//! - `config`: Simulation settings and YAML preset loader
//! - `preview`: Spawn trajectory preview
//! - `simulation`: Session state and the per-frame tick

pub mod collision;
pub mod config;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod kinematics;
pub mod metrics;
pub mod particle;
pub mod preview;
pub mod simulation;
pub mod types;

pub use config::{ConfigLoader, SimulationConfig};
pub use error::{ConfigError, PhysicsError};
pub use kinematics::Bounds;
pub use particle::{Particle, ParticleId};
pub use simulation::{Simulation, SimulationStatus};
pub use types::{CollisionType, Vec2};
