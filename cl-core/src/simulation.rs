//! Session state and the per-frame tick.
//!
//! A [`Simulation`] owns everything that lives across ticks: the particle
//! array, the bounded collision log, the play/pause status and the particle
//! factory. The physics functions it calls are stateless.
//!
//! ## Tick
//!
//! ```text
//! frame_dt ─► clamp(0.05 s) ─► × time_scale ─► dt
//!
//! particles ─► update_particle (each, independently)
//!           ─► resolve_collisions (all pairs)
//!           ─► particles', snapshots ─► collision log (last 30)
//! ```
//!
//! Every input is checked before the first mutation, so a rejected tick
//! leaves the session exactly as it was.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::collision::{resolve_collisions, total_momentum, CollisionSnapshot, Resolution};
use crate::config::SimulationConfig;
use crate::error::{PhysicsError, Result};
use crate::kinematics::{update_particle, Bounds};
use crate::metrics::{derive_graph_data, GraphData};
use crate::particle::{Particle, ParticleFactory, ParticleId};
use crate::preview::{spawn_preview, SpawnPreview};
use crate::types::{constants, Vec2};

/// Whether ticks advance the particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Nothing spawned yet, or just reset
    #[default]
    Idle,
    Paused,
    Running,
}

/// Advance `particles` by one two-phase tick: integrate all, then resolve
/// all contacts.
pub fn advance(
    particles: &[Particle],
    config: &SimulationConfig,
    bounds: &Bounds,
    dt: f64,
    timestamp: f64,
) -> Resolution {
    let integrated: Vec<Particle> = particles
        .iter()
        .map(|p| update_particle(p, dt, config, bounds))
        .collect();
    resolve_collisions(&integrated, config, timestamp)
}

/// A running collision session.
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<Particle>,
    collision_log: VecDeque<CollisionSnapshot>,
    status: SimulationStatus,
    time_scale: f64,
    selected_collision: Option<CollisionSnapshot>,
    bounds: Bounds,
    config: SimulationConfig,
    factory: ParticleFactory,
    elapsed: f64,
}

impl Simulation {
    /// Create an idle session over `bounds`.
    pub fn new(bounds: Bounds, config: SimulationConfig) -> Result<Self> {
        bounds.validate()?;
        config.validate()?;
        Ok(Self {
            particles: Vec::new(),
            collision_log: VecDeque::with_capacity(constants::MAX_COLLISION_LOG),
            status: SimulationStatus::Idle,
            time_scale: 1.0,
            selected_collision: None,
            bounds,
            config,
            factory: ParticleFactory::new(),
            elapsed: 0.0,
        })
    }

    /// Session over a `width × height` area with the default config.
    pub fn with_area(width: f64, height: f64) -> Result<Self> {
        Self::new(Bounds::new(width, height)?, SimulationConfig::default())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Logged collisions, oldest first.
    pub fn collision_log(&self) -> impl ExactSizeIterator<Item = &CollisionSnapshot> {
        self.collision_log.iter()
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SimulationStatus) {
        self.status = status;
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> Result<()> {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            tracing::warn!(time_scale, "rejected time scale");
            return Err(PhysicsError::InvalidTimeScale(time_scale));
        }
        self.time_scale = time_scale;
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Simulation time (s) accumulated by ticks since the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total_momentum(&self) -> Vec2 {
        total_momentum(&self.particles)
    }

    pub fn total_kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    pub fn selected_collision(&self) -> Option<&CollisionSnapshot> {
        self.selected_collision.as_ref()
    }

    /// Select the log entry at `index` (0 = oldest), or clear the selection.
    pub fn select_collision(&mut self, index: Option<usize>) -> Result<()> {
        self.selected_collision = match index {
            Some(i) => Some(
                self.collision_log
                    .get(i)
                    .cloned()
                    .ok_or(PhysicsError::UnknownCollision(i))?,
            ),
            None => None,
        };
        Ok(())
    }

    /// Chart data for the selected collision.
    pub fn selected_graph_data(&self) -> Option<GraphData> {
        self.selected_collision.as_ref().map(derive_graph_data)
    }

    /// Spawn a particle at `position` using the config's spawn parameters.
    ///
    /// The first spawn of an idle session starts it.
    pub fn spawn(&mut self, position: Vec2) -> Result<ParticleId> {
        let particle = self
            .factory
            .spawn(position, &self.config.spawn_params())
            .inspect_err(|err| tracing::warn!(%err, "rejected spawn"))?;
        let id = particle.id;
        self.particles.push(particle);

        if self.status == SimulationStatus::Idle {
            self.status = SimulationStatus::Running;
        }
        Ok(id)
    }

    /// Preview a spawn at `position` without touching the session.
    pub fn preview(&self, position: Vec2) -> Result<SpawnPreview> {
        spawn_preview(position, &self.config)
    }

    /// Advance by one animation frame of `frame_dt` seconds.
    ///
    /// Returns the number of collisions resolved this tick.
    pub fn tick(&mut self, frame_dt: f64) -> Result<usize> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            tracing::warn!(frame_dt, "rejected frame delta");
            return Err(PhysicsError::InvalidTimeStep(frame_dt));
        }
        if self.status != SimulationStatus::Running || self.particles.is_empty() {
            return Ok(0);
        }

        let dt = frame_dt.min(constants::MAX_FRAME_DT) * self.time_scale;
        let timestamp = self.elapsed + dt;

        let Resolution {
            particles,
            snapshots,
        } = advance(&self.particles, &self.config, &self.bounds, dt, timestamp);
        tracing::trace!(dt, particles = particles.len(), collisions = snapshots.len(), "tick");

        self.particles = particles;
        self.elapsed = timestamp;

        let count = snapshots.len();
        if let Some(latest) = snapshots.last() {
            self.selected_collision = Some(latest.clone());
        }
        for snapshot in snapshots {
            if self.collision_log.len() == constants::MAX_COLLISION_LOG {
                self.collision_log.pop_front();
            }
            self.collision_log.push_back(snapshot);
        }
        Ok(count)
    }

    /// Clear particles, log, selection and time; return to idle.
    ///
    /// Particle ids keep counting up so they stay unique for the session.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.collision_log.clear();
        self.selected_collision = None;
        self.status = SimulationStatus::Idle;
        self.time_scale = 1.0;
        self.elapsed = 0.0;
        tracing::debug!("simulation reset");
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CollisionType;
    use approx::assert_abs_diff_eq;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            speed: 0.0,
            gravity_enabled: false,
            walls_enabled: true,
            ..SimulationConfig::default()
        }
    }

    fn session() -> Simulation {
        Simulation::new(Bounds::new(800.0, 600.0).unwrap(), quiet_config()).unwrap()
    }

    /// Spawn a pair that overlaps and approaches along x.
    fn spawn_colliding_pair(sim: &mut Simulation, y: f64) {
        let mut config = sim.config().clone();
        config.speed = 100.0;
        config.angle = 0.0;
        sim.set_config(config.clone()).unwrap();
        sim.spawn(Vec2::new(100.0, y)).unwrap();

        config.angle = 180.0;
        sim.set_config(config).unwrap();
        sim.spawn(Vec2::new(150.0, y)).unwrap();
    }

    #[test]
    fn test_new_session_is_idle() {
        let sim = session();
        assert_eq!(sim.status(), SimulationStatus::Idle);
        assert!(sim.particles().is_empty());
        assert_eq!(sim.collision_log().len(), 0);
        assert_eq!(sim.time_scale(), 1.0);
    }

    #[test]
    fn test_rejects_invalid_setup() {
        let bad = SimulationConfig {
            restitution: -0.1,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(Bounds::new(10.0, 10.0).unwrap(), bad).is_err());
        assert!(Simulation::with_area(0.0, 10.0).is_err());

        // Public fields let callers skip Bounds::new
        let literal = Bounds {
            width: -5.0,
            height: f64::NAN,
        };
        assert!(matches!(
            Simulation::new(literal, SimulationConfig::default()),
            Err(PhysicsError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_spawn_starts_idle_session_only() {
        let mut sim = session();
        let id = sim.spawn(Vec2::new(400.0, 300.0)).unwrap();
        assert_eq!(id.to_string(), "p_1");
        assert_eq!(sim.status(), SimulationStatus::Running);

        sim.set_status(SimulationStatus::Paused);
        sim.spawn(Vec2::new(100.0, 100.0)).unwrap();
        assert_eq!(sim.status(), SimulationStatus::Paused);
        assert_eq!(sim.particles().len(), 2);
    }

    #[test]
    fn test_rejected_spawn_changes_nothing() {
        let mut sim = session();
        assert!(sim.spawn(Vec2::new(f64::NAN, 1.0)).is_err());
        assert_eq!(sim.status(), SimulationStatus::Idle);
        assert!(sim.particles().is_empty());

        let id = sim.spawn(Vec2::new(1.0, 1.0)).unwrap();
        assert_eq!(id, ParticleId(1));
    }

    #[test]
    fn test_tick_clamps_and_scales_dt() {
        let mut config = quiet_config();
        config.speed = 100.0;
        config.walls_enabled = false;
        let mut sim = Simulation::new(Bounds::new(800.0, 600.0).unwrap(), config).unwrap();
        sim.spawn(Vec2::new(0.0, 0.0)).unwrap();

        // A 1 s frame is clamped to 0.05 s
        sim.tick(1.0).unwrap();
        assert_abs_diff_eq!(sim.particles()[0].position.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sim.elapsed(), 0.05, epsilon = 1e-12);

        sim.set_time_scale(2.0).unwrap();
        sim.tick(0.01).unwrap();
        assert_abs_diff_eq!(sim.particles()[0].position.x, 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sim.elapsed(), 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let mut config = quiet_config();
        config.speed = 100.0;
        let mut sim = Simulation::new(Bounds::new(800.0, 600.0).unwrap(), config).unwrap();

        // Empty running-less session
        assert_eq!(sim.tick(0.016).unwrap(), 0);

        sim.spawn(Vec2::new(100.0, 100.0)).unwrap();
        sim.set_status(SimulationStatus::Paused);
        sim.tick(0.016).unwrap();
        assert_eq!(sim.particles()[0].position, Vec2::new(100.0, 100.0));
        assert_eq!(sim.elapsed(), 0.0);
    }

    #[test]
    fn test_bad_frame_dt_fails_without_mutation() {
        let mut sim = session();
        sim.spawn(Vec2::new(100.0, 100.0)).unwrap();
        let before = sim.particles().to_vec();

        assert!(matches!(sim.tick(f64::NAN), Err(PhysicsError::InvalidTimeStep(_))));
        assert_eq!(sim.tick(-0.01), Err(PhysicsError::InvalidTimeStep(-0.01)));
        assert!(sim.tick(f64::INFINITY).is_err());
        assert_eq!(sim.particles(), before.as_slice());
        assert_eq!(sim.elapsed(), 0.0);
    }

    #[test]
    fn test_collision_is_logged_and_selected() {
        let mut sim = session();
        spawn_colliding_pair(&mut sim, 300.0);

        let mut total = 0;
        for _ in 0..10 {
            total += sim.tick(0.016).unwrap();
        }
        assert!(total >= 1);
        assert_eq!(sim.collision_log().len(), total);

        let latest = sim.collision_log().last().unwrap().clone();
        assert_eq!(sim.selected_collision(), Some(&latest));
        assert!(latest.timestamp > 0.0 && latest.timestamp <= sim.elapsed());

        let graph = sim.selected_graph_data().unwrap();
        assert!(graph.conserved.momentum_conserved);
        assert!(graph.conserved.energy_conserved);
    }

    #[test]
    fn test_select_collision() {
        let mut sim = session();
        spawn_colliding_pair(&mut sim, 300.0);
        while sim.collision_log().len() == 0 {
            sim.tick(0.016).unwrap();
        }

        assert_eq!(sim.select_collision(Some(99)), Err(PhysicsError::UnknownCollision(99)));
        sim.select_collision(None).unwrap();
        assert!(sim.selected_collision().is_none());
        assert!(sim.selected_graph_data().is_none());

        sim.select_collision(Some(0)).unwrap();
        assert_eq!(sim.selected_collision(), sim.collision_log().next());
    }

    #[test]
    fn test_collision_log_is_bounded() {
        let config = SimulationConfig {
            collision_type: CollisionType::Inelastic,
            restitution: 0.0,
            ..quiet_config()
        };
        let mut sim = Simulation::new(Bounds::new(800.0, 600.0).unwrap(), config).unwrap();

        // Every round drops a fresh overlapping pair
        for round in 0..40 {
            let y = 40.0 + (round % 10) as f64 * 50.0;
            let x = 60.0 + (round / 10) as f64 * 150.0;
            sim.spawn(Vec2::new(x, y)).unwrap();
            sim.spawn(Vec2::new(x + 10.0, y)).unwrap();
            sim.tick(0.001).unwrap();
        }

        assert_eq!(sim.collision_log().len(), constants::MAX_COLLISION_LOG);
        let timestamps: Vec<f64> = sim.collision_log().map(|s| s.timestamp).collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut sim = session();
        spawn_colliding_pair(&mut sim, 300.0);
        sim.set_time_scale(0.5).unwrap();
        for _ in 0..10 {
            sim.tick(0.016).unwrap();
        }

        sim.reset();
        assert_eq!(sim.status(), SimulationStatus::Idle);
        assert!(sim.particles().is_empty());
        assert_eq!(sim.collision_log().len(), 0);
        assert!(sim.selected_collision().is_none());
        assert_eq!(sim.time_scale(), 1.0);
        assert_eq!(sim.elapsed(), 0.0);

        let id = sim.spawn(Vec2::new(10.0, 10.0)).unwrap();
        assert_eq!(id, ParticleId(3));
    }

    #[test]
    fn test_rejects_bad_time_scale_and_config() {
        let mut sim = session();
        assert!(sim.set_time_scale(0.0).is_err());
        assert!(sim.set_time_scale(f64::NAN).is_err());
        assert_eq!(sim.time_scale(), 1.0);
        for scale in constants::TIME_SCALES {
            sim.set_time_scale(scale).unwrap();
        }

        let bad = SimulationConfig {
            trail_length: 0,
            ..SimulationConfig::default()
        };
        assert!(sim.set_config(bad).is_err());
        assert_eq!(sim.config(), &quiet_config());
    }

    #[test]
    fn test_advance_integrates_before_resolving() {
        let config = SimulationConfig {
            walls_enabled: false,
            ..SimulationConfig::default()
        };
        let bounds = Bounds::new(800.0, 600.0).unwrap();
        let mut factory = ParticleFactory::new();
        let spawn = |factory: &mut ParticleFactory, x: f64, angle: f64| {
            factory
                .spawn(
                    Vec2::new(x, 100.0),
                    &crate::particle::SpawnParams {
                        mass: 1.0,
                        angle,
                        speed: 100.0,
                    },
                )
                .unwrap()
        };
        // 30 px apart: separated now, overlapping after 0.05 s of approach
        let particles = vec![spawn(&mut factory, 100.0, 0.0), spawn(&mut factory, 130.0, 180.0)];
        assert!(resolve_collisions(&particles, &config, 0.0).snapshots.is_empty());

        let result = advance(&particles, &config, &bounds, 0.05, 0.05);
        assert_eq!(result.snapshots.len(), 1);
        assert_eq!(result.snapshots[0].timestamp, 0.05);
        assert!(result.particles[0].velocity.x < 0.0);
        assert_eq!(result.particles[0].trail.len(), 2);
    }
}
