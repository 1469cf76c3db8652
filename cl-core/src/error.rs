//! Error types for the collision engine.
//!
//! The physics functions themselves are total. Everything here is raised at
//! the edges: particle construction, configuration, session control and
//! preset loading.

use std::io;

use thiserror::Error;

/// Contract violations rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A spawn parameter is non-finite or out of range
    #[error("invalid particle {field}: {value}")]
    InvalidParticle { field: &'static str, value: f64 },

    /// A configuration field is out of range
    #[error("invalid config {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Simulation area must be finite and strictly positive
    #[error("invalid simulation area {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },

    /// Frame delta must be finite and non-negative
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f64),

    /// Time scale must be finite and strictly positive
    #[error("invalid time scale: {0}")]
    InvalidTimeScale(f64),

    /// Collision log index out of range
    #[error("no collision at log index {0}")]
    UnknownCollision(usize),
}

/// Failures while loading a configuration preset.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("preset not found: {0}")]
    NotFound(String),

    #[error("preset rejected: {0}")]
    Invalid(#[from] PhysicsError),
}

pub type Result<T, E = PhysicsError> = std::result::Result<T, E>;
