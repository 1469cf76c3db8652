//! Chart-ready metrics derived from a collision snapshot.
//!
//! Everything here is a pure function of one [`CollisionSnapshot`]; nothing
//! is cached.

use serde::{Deserialize, Serialize};

use crate::collision::CollisionSnapshot;
use crate::types::constants;

/// One before/after bar pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarEntry {
    pub name: String,
    pub before: f64,
    pub after: f64,
}

impl BarEntry {
    fn rounded(name: &str, before: f64, after: f64) -> Self {
        Self {
            name: name.to_string(),
            before: round_to(before, 2),
            after: round_to(after, 2),
        }
    }
}

/// Conservation verdicts for a collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conservation {
    pub momentum_conserved: bool,
    pub energy_conserved: bool,
    /// Share of pre-collision kinetic energy lost, in percent (1 decimal)
    pub energy_lost_percent: f64,
}

/// Momentum and energy series for "Particle A", "Particle B" and
/// "System Total".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub momentum: Vec<BarEntry>,
    pub energy: Vec<BarEntry>,
    pub conserved: Conservation,
}

/// Derive the chart view of `snapshot`.
pub fn derive_graph_data(snapshot: &CollisionSnapshot) -> GraphData {
    let a = &snapshot.particle_a;
    let b = &snapshot.particle_b;
    let system = &snapshot.system;

    let sys_mom_before = system.total_momentum_before.magnitude();
    let sys_mom_after = system.total_momentum_after.magnitude();

    let momentum = vec![
        BarEntry::rounded(
            "Particle A",
            a.momentum_before.magnitude(),
            a.momentum_after.magnitude(),
        ),
        BarEntry::rounded(
            "Particle B",
            b.momentum_before.magnitude(),
            b.momentum_after.magnitude(),
        ),
        BarEntry::rounded("System Total", sys_mom_before, sys_mom_after),
    ];

    let energy = vec![
        BarEntry::rounded("Particle A", a.ke_before, a.ke_after),
        BarEntry::rounded("Particle B", b.ke_before, b.ke_after),
        BarEntry::rounded("System Total", system.total_ke_before, system.total_ke_after),
    ];

    let energy_lost_percent = if system.total_ke_before > 0.0 {
        round_to(system.energy_lost / system.total_ke_before * 100.0, 1)
    } else {
        0.0
    };

    GraphData {
        momentum,
        energy,
        conserved: Conservation {
            momentum_conserved: is_conserved(sys_mom_before, sys_mom_after),
            energy_conserved: is_conserved(system.total_ke_before, system.total_ke_after),
            energy_lost_percent,
        },
    }
}

/// `|before - after| < ε · max(before, 1)`
fn is_conserved(before: f64, after: f64) -> bool {
    (before - after).abs() < constants::CONSERVATION_EPSILON * before.max(1.0)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{resolve_collisions, ParticleRecord};
    use crate::config::SimulationConfig;
    use crate::particle::{Particle, ParticleFactory, SpawnParams};
    use crate::types::{CollisionType, Vec2};
    use approx::assert_abs_diff_eq;

    fn pair(ma: f64, va: Vec2, mb: f64, vb: Vec2) -> Vec<Particle> {
        let mut factory = ParticleFactory::new();
        let mut spawn = |mass: f64, x: f64, velocity: Vec2| {
            let mut p = factory
                .spawn(
                    Vec2::new(x, 100.0),
                    &SpawnParams {
                        mass,
                        angle: 0.0,
                        speed: 0.0,
                    },
                )
                .unwrap();
            p.velocity = velocity;
            p
        };
        vec![spawn(ma, 100.0, va), spawn(mb, 120.0, vb)]
    }

    fn snapshot_for(config: &SimulationConfig, particles: &[Particle]) -> CollisionSnapshot {
        resolve_collisions(particles, config, 0.0)
            .snapshots
            .into_iter()
            .next()
            .expect("pair overlaps")
    }

    #[test]
    fn test_elastic_collision_is_conserved() {
        let config = SimulationConfig::default();
        let snap = snapshot_for(
            &config,
            &pair(1.0, Vec2::new(100.0, 10.0), 1.0, Vec2::new(-50.0, 0.0)),
        );
        let graph = derive_graph_data(&snap);

        assert!(graph.conserved.momentum_conserved);
        assert!(graph.conserved.energy_conserved);
        assert_abs_diff_eq!(graph.conserved.energy_lost_percent, 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_sticky_collision_loses_energy() {
        let config = SimulationConfig {
            collision_type: CollisionType::Inelastic,
            restitution: 0.0,
            ..SimulationConfig::default()
        };
        // Equal masses, one at rest: half the energy is lost
        let snap = snapshot_for(&config, &pair(1.0, Vec2::new(100.0, 0.0), 1.0, Vec2::ZERO));
        let graph = derive_graph_data(&snap);

        assert!(graph.conserved.momentum_conserved);
        assert!(!graph.conserved.energy_conserved);
        assert_abs_diff_eq!(graph.conserved.energy_lost_percent, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_series_names_and_rounding() {
        let record = |id, velocity_before: Vec2, velocity_after: Vec2| ParticleRecord {
            id,
            mass: 1.0,
            velocity_before,
            velocity_after,
            ke_before: 0.5 * velocity_before.magnitude_squared(),
            ke_after: 0.5 * velocity_after.magnitude_squared(),
            momentum_before: velocity_before,
            momentum_after: velocity_after,
        };
        let snap = CollisionSnapshot::new(
            record(crate::particle::ParticleId(1), Vec2::new(1.234, 0.0), Vec2::new(0.0, 0.0)),
            record(crate::particle::ParticleId(2), Vec2::new(0.0, 0.0), Vec2::new(1.234, 0.0)),
            CollisionType::Elastic,
            0.0,
            Vec2::ZERO,
        );
        let graph = derive_graph_data(&snap);

        let names: Vec<&str> = graph.momentum.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Particle A", "Particle B", "System Total"]);
        assert_eq!(graph.energy.len(), 3);

        assert_eq!(graph.momentum[0].before, 1.23);
        assert_eq!(graph.momentum[0].after, 0.0);
        assert_eq!(graph.momentum[1].after, 1.23);
        assert_eq!(graph.momentum[2].before, 1.23);
        assert_eq!(graph.momentum[2].after, 1.23);
        // 0.5 * 1.234² = 0.761378
        assert_eq!(graph.energy[0].before, 0.76);
    }

    #[test]
    fn test_zero_energy_collision() {
        let config = SimulationConfig::default();
        let snap = snapshot_for(&config, &pair(1.0, Vec2::ZERO, 1.0, Vec2::ZERO));
        let graph = derive_graph_data(&snap);

        assert_eq!(graph.conserved.energy_lost_percent, 0.0);
        assert!(graph.conserved.momentum_conserved);
        assert!(graph.conserved.energy_conserved);
    }

    #[test]
    fn test_small_values_use_absolute_floor() {
        // Tolerance floor of ε·1 lets tiny absolute drift pass
        assert!(is_conserved(0.5, 0.505));
        assert!(!is_conserved(0.5, 0.52));
        assert!(is_conserved(1000.0, 1009.0));
        assert!(!is_conserved(1000.0, 1011.0));
    }
}
