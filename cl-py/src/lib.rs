//! Python bindings for the cl-core collision engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from cl_physics import Simulation
//!
//! sim = Simulation(800.0, 600.0)
//! sim.spawn(100.0, 300.0)
//! sim.set_spawn(angle=180.0)
//! sim.spawn(400.0, 300.0)
//!
//! for _ in range(120):
//!     if sim.tick(1 / 60):
//!         print(sim.graph_data()["conserved"])
//! ```

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cl_core::collision::CollisionSnapshot;
use cl_core::metrics::BarEntry;
use cl_core::particle::Particle;
use cl_core::simulation::{Simulation as CoreSimulation, SimulationStatus};
use cl_core::types::{CollisionType, Vec2 as CoreVec2};
use cl_core::{Bounds, ConfigError, ConfigLoader, PhysicsError, SimulationConfig};

fn physics_err(err: PhysicsError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn config_err(err: ConfigError) -> PyErr {
    match err {
        ConfigError::Io(_) | ConfigError::NotFound(_) => PyIOError::new_err(err.to_string()),
        ConfigError::Parse(_) | ConfigError::Invalid(_) => PyValueError::new_err(err.to_string()),
    }
}

/// 2D vector for positions, velocities, momenta.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec2 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
}

#[pymethods]
impl Vec2 {
    #[new]
    fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn __repr__(&self) -> String {
        format!("Vec2({:.4}, {:.4})", self.x, self.y)
    }

    fn magnitude(&self) -> f64 {
        CoreVec2::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl From<CoreVec2> for Vec2 {
    fn from(v: CoreVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vec2> for CoreVec2 {
    fn from(v: Vec2) -> Self {
        CoreVec2::new(v.x, v.y)
    }
}

fn particle_dict<'py>(py: Python<'py>, p: &Particle) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("id", p.id.to_string())?;
    dict.set_item("x", p.position.x)?;
    dict.set_item("y", p.position.y)?;
    dict.set_item("vx", p.velocity.x)?;
    dict.set_item("vy", p.velocity.y)?;
    dict.set_item("mass", p.mass)?;
    dict.set_item("radius", p.radius)?;
    dict.set_item("color", p.color.as_str())?;
    let trail: Vec<(f64, f64)> = p.trail.iter().map(|t| (t.x, t.y)).collect();
    dict.set_item("trail", trail)?;
    Ok(dict)
}

fn collision_dict<'py>(py: Python<'py>, s: &CollisionSnapshot) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("timestamp", s.timestamp)?;
    dict.set_item("type", s.collision_type.to_string())?;
    dict.set_item("a", s.particle_a.id.to_string())?;
    dict.set_item("b", s.particle_b.id.to_string())?;
    dict.set_item("x", s.position.x)?;
    dict.set_item("y", s.position.y)?;
    dict.set_item("ke_before", s.system.total_ke_before)?;
    dict.set_item("ke_after", s.system.total_ke_after)?;
    dict.set_item("energy_lost", s.system.energy_lost)?;
    Ok(dict)
}

fn bar_dicts<'py>(py: Python<'py>, entries: &[BarEntry]) -> PyResult<Vec<Bound<'py, PyDict>>> {
    entries
        .iter()
        .map(|entry| {
            let dict = PyDict::new(py);
            dict.set_item("name", entry.name.as_str())?;
            dict.set_item("before", entry.before)?;
            dict.set_item("after", entry.after)?;
            Ok(dict)
        })
        .collect()
}

fn parse_collision_type(kind: &str) -> PyResult<CollisionType> {
    match kind {
        "elastic" => Ok(CollisionType::Elastic),
        "inelastic" => Ok(CollisionType::Inelastic),
        other => Err(PyValueError::new_err(format!(
            "unknown collision type '{}', expected 'elastic' or 'inelastic'",
            other
        ))),
    }
}

/// Main simulation class.
///
/// Owns the particles and collision log; the caller drives `tick` once per
/// frame.
#[pyclass]
pub struct Simulation {
    inner: CoreSimulation,
}

impl Simulation {
    fn update_config(&mut self, edit: impl FnOnce(&mut SimulationConfig)) -> PyResult<()> {
        let mut config = self.inner.config().clone();
        edit(&mut config);
        self.inner.set_config(config).map_err(physics_err)
    }
}

#[pymethods]
impl Simulation {
    /// Create an idle simulation over a `width × height` area.
    #[new]
    #[pyo3(signature = (width=800.0, height=600.0))]
    fn new(width: f64, height: f64) -> PyResult<Self> {
        let inner = CoreSimulation::with_area(width, height).map_err(physics_err)?;
        Ok(Self { inner })
    }

    /// Simulation time in seconds since the last reset.
    #[getter]
    fn elapsed(&self) -> f64 {
        self.inner.elapsed()
    }

    /// "idle", "paused" or "running".
    #[getter]
    fn status(&self) -> &'static str {
        match self.inner.status() {
            SimulationStatus::Idle => "idle",
            SimulationStatus::Paused => "paused",
            SimulationStatus::Running => "running",
        }
    }

    #[getter]
    fn time_scale(&self) -> f64 {
        self.inner.time_scale()
    }

    fn set_time_scale(&mut self, time_scale: f64) -> PyResult<()> {
        self.inner.set_time_scale(time_scale).map_err(physics_err)
    }

    fn pause(&mut self) {
        self.inner.set_status(SimulationStatus::Paused);
    }

    fn resume(&mut self) {
        self.inner.set_status(SimulationStatus::Running);
    }

    /// Spawn a particle at (x, y). Returns its id, e.g. "p_1".
    fn spawn(&mut self, x: f64, y: f64) -> PyResult<String> {
        let id = self
            .inner
            .spawn(CoreVec2::new(x, y))
            .map_err(physics_err)?;
        Ok(id.to_string())
    }

    /// Advance by one frame. Returns the number of new collisions.
    fn tick(&mut self, frame_dt: f64) -> PyResult<usize> {
        self.inner.tick(frame_dt).map_err(physics_err)
    }

    /// Run several frames at once. Returns the total number of collisions.
    fn run(&mut self, frame_dt: f64, frames: usize) -> PyResult<usize> {
        let mut total = 0;
        for _ in 0..frames {
            total += self.tick(frame_dt)?;
        }
        Ok(total)
    }

    /// Clear particles and collisions.
    fn reset(&mut self) {
        self.inner.reset();
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Set launch parameters for the next spawns. Omitted values are kept.
    ///
    /// Values are checked when a particle is spawned or previewed.
    #[pyo3(signature = (mass=None, speed=None, angle=None))]
    fn set_spawn(
        &mut self,
        mass: Option<f64>,
        speed: Option<f64>,
        angle: Option<f64>,
    ) -> PyResult<()> {
        self.update_config(|config| {
            config.mass = mass.unwrap_or(config.mass);
            config.speed = speed.unwrap_or(config.speed);
            config.angle = angle.unwrap_or(config.angle);
        })
    }

    /// Set "elastic" or "inelastic" response with the given restitution.
    #[pyo3(signature = (kind, restitution=None))]
    fn set_collision(&mut self, kind: &str, restitution: Option<f64>) -> PyResult<()> {
        let collision_type = parse_collision_type(kind)?;
        self.update_config(|config| {
            config.collision_type = collision_type;
            if let Some(restitution) = restitution {
                config.restitution = restitution;
            }
        })
    }

    #[pyo3(signature = (enabled, strength=None))]
    fn set_gravity(&mut self, enabled: bool, strength: Option<f64>) -> PyResult<()> {
        self.update_config(|config| {
            config.gravity_enabled = enabled;
            if let Some(strength) = strength {
                config.gravity = strength;
            }
        })
    }

    fn set_walls(&mut self, enabled: bool) -> PyResult<()> {
        self.update_config(|config| config.walls_enabled = enabled)
    }

    fn set_trail_length(&mut self, trail_length: usize) -> PyResult<()> {
        self.update_config(|config| config.trail_length = trail_length)
    }

    /// Replace the config with `<directory>/<name>.yaml`.
    fn load_preset(&mut self, directory: &str, name: &str) -> PyResult<()> {
        let config = ConfigLoader::new(directory)
            .load_preset(name)
            .map_err(config_err)?;
        self.inner.set_config(config).map_err(physics_err)?;
        tracing::debug!(directory, preset = name, "applied preset");
        Ok(())
    }

    fn config_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let config = self.inner.config();
        let dict = PyDict::new(py);
        dict.set_item("mass", config.mass)?;
        dict.set_item("speed", config.speed)?;
        dict.set_item("angle", config.angle)?;
        dict.set_item("collision_type", config.collision_type.to_string())?;
        dict.set_item("restitution", config.restitution)?;
        dict.set_item("gravity_enabled", config.gravity_enabled)?;
        dict.set_item("gravity", config.gravity)?;
        dict.set_item("trail_length", config.trail_length)?;
        dict.set_item("walls_enabled", config.walls_enabled)?;
        Ok(dict)
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[getter]
    fn particle_count(&self) -> usize {
        self.inner.particles().len()
    }

    fn particle_positions(&self) -> Vec<Vec2> {
        self.inner
            .particles()
            .iter()
            .map(|p| p.position.into())
            .collect()
    }

    fn particles<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .particles()
            .iter()
            .map(|p| particle_dict(py, p))
            .collect()
    }

    fn total_momentum(&self) -> Vec2 {
        self.inner.total_momentum().into()
    }

    fn total_kinetic_energy(&self) -> f64 {
        self.inner.total_kinetic_energy()
    }

    #[getter]
    fn collision_count(&self) -> usize {
        self.inner.collision_log().len()
    }

    /// Logged collisions, oldest first.
    fn collisions<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .collision_log()
            .map(|s| collision_dict(py, s))
            .collect()
    }

    /// Select a logged collision by index, or clear with None.
    #[pyo3(signature = (index=None))]
    fn select_collision(&mut self, index: Option<usize>) -> PyResult<()> {
        self.inner.select_collision(index).map_err(physics_err)
    }

    fn selected_collision<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        self.inner
            .selected_collision()
            .map(|s| collision_dict(py, s))
            .transpose()
    }

    /// Momentum/energy bars of the selected collision, or None.
    fn graph_data<'py>(&self, py: Python<'py>) -> PyResult<Option<Bound<'py, PyDict>>> {
        let Some(graph) = self.inner.selected_graph_data() else {
            return Ok(None);
        };
        let dict = PyDict::new(py);
        dict.set_item("momentum", bar_dicts(py, &graph.momentum)?)?;
        dict.set_item("energy", bar_dicts(py, &graph.energy)?)?;

        let conserved = PyDict::new(py);
        conserved.set_item("momentum", graph.conserved.momentum_conserved)?;
        conserved.set_item("energy", graph.conserved.energy_conserved)?;
        conserved.set_item("energy_lost_percent", graph.conserved.energy_lost_percent)?;
        dict.set_item("conserved", conserved)?;
        Ok(Some(dict))
    }

    /// Ghost particle and predicted path for a spawn at (x, y).
    fn preview<'py>(&self, py: Python<'py>, x: f64, y: f64) -> PyResult<Bound<'py, PyDict>> {
        let preview = self
            .inner
            .preview(CoreVec2::new(x, y))
            .map_err(physics_err)?;
        let dict = PyDict::new(py);
        dict.set_item("x", preview.position.x)?;
        dict.set_item("y", preview.position.y)?;
        dict.set_item("vx", preview.velocity.x)?;
        dict.set_item("vy", preview.velocity.y)?;
        dict.set_item("mass", preview.mass)?;
        dict.set_item("radius", preview.radius)?;
        dict.set_item("color", preview.color)?;
        let points: Vec<(f64, f64)> = preview
            .trajectory_points
            .iter()
            .map(|p| (p.x, p.y))
            .collect();
        dict.set_item("trajectory", points)?;
        Ok(dict)
    }

    /// Simulation area as (width, height).
    fn bounds(&self) -> (f64, f64) {
        let Bounds { width, height } = *self.inner.bounds();
        (width, height)
    }
}

/// Names of the presets available in `directory`.
#[pyfunction]
fn list_presets(directory: &str) -> PyResult<Vec<String>> {
    ConfigLoader::new(directory)
        .list_presets()
        .map_err(config_err)
}

/// Install a stderr log subscriber, e.g. `init_logging("debug")`.
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn init_logging(level: &str) -> PyResult<()> {
    let filter = EnvFilter::try_new(level).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
    tracing::info!(level, "cl_physics v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

/// Python module definition.
#[pymodule]
fn cl_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec2>()?;
    m.add_class::<Simulation>()?;
    m.add_function(wrap_pyfunction!(list_presets, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    Ok(())
}
