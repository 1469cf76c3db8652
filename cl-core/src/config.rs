//! Simulation configuration and preset loader.
//!
//! A [`SimulationConfig`] is read-only for the physics core: each tick
//! receives the current value and never mutates it. Presets are YAML files
//! holding a full or partial config; missing fields take the defaults.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── default.yaml
//! ├── sticky.yaml
//! └── gravity_box.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PhysicsError, Result};
use crate::particle::SpawnParams;
use crate::types::CollisionType;

/// Session-wide simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Mass of newly spawned particles
    pub mass: f64,
    /// Launch speed of newly spawned particles (px/s)
    pub speed: f64,
    /// Launch angle in degrees, 0 = +x
    pub angle: f64,

    pub collision_type: CollisionType,
    /// Stored restitution; ignored while `collision_type` is elastic
    pub restitution: f64,

    pub gravity_enabled: bool,
    /// Downward acceleration (px/s²)
    pub gravity: f64,

    /// Maximum number of trail points kept per particle
    pub trail_length: usize,
    pub walls_enabled: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mass: 5.0,
            speed: 200.0,
            angle: 0.0,
            collision_type: CollisionType::Elastic,
            restitution: 0.6,
            gravity_enabled: false,
            gravity: 400.0,
            trail_length: 40,
            walls_enabled: true,
        }
    }
}

impl SimulationConfig {
    /// Restitution the resolver actually uses.
    pub fn effective_restitution(&self) -> f64 {
        match self.collision_type {
            CollisionType::Elastic => 1.0,
            CollisionType::Inelastic => self.restitution,
        }
    }

    /// Spawn parameters for the next particle.
    pub fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            mass: self.mass,
            angle: self.angle,
            speed: self.speed,
        }
    }

    /// Check every field the physics core relies on.
    ///
    /// Spawn fields are checked when a particle is created, not here, so a
    /// session can hold an in-progress mass slider value without failing
    /// its ticks.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PhysicsError::InvalidConfig {
                field: "restitution",
                reason: format!("{} is outside [0, 1]", self.restitution),
            });
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig {
                field: "gravity",
                reason: format!("{} is not finite", self.gravity),
            });
        }
        if self.trail_length == 0 {
            return Err(PhysicsError::InvalidConfig {
                field: "trail_length",
                reason: "must keep at least one point".to_string(),
            });
        }
        Ok(())
    }
}

/// Preset loader with configurable base directory.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new loader reading `<base_path>/<name>.yaml`.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load and validate a preset by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ConfigLoader::new("presets");
    /// let sticky = loader.load_preset("sticky")?;
    /// ```
    pub fn load_preset(&self, name: &str) -> Result<SimulationConfig, ConfigError> {
        let path = self.base_path.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound(name.to_string()));
        }
        let contents = fs::read_to_string(&path)?;
        let config: SimulationConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!(preset = name, ?config, "loaded preset");
        Ok(config)
    }

    /// List all available presets, sorted by name.
    pub fn list_presets(&self) -> Result<Vec<String>, ConfigError> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
