//! Core value types for the collision engine.
//!
//! Units are screen units:
//! - Position: pixels (px)
//! - Velocity: pixels per second (px/s)
//! - Mass: arbitrary mass units
//! - Time: seconds (s)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions, velocities and momenta.
///
/// Coordinate system follows the simulation area:
/// - X: horizontal (positive to the right)
/// - Y: vertical (positive downward, the direction gravity pulls)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Magnitude (length) of the vector
    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit vector in the same direction.
    ///
    /// Only an exactly zero magnitude maps to the zero vector; tiny vectors
    /// are still normalized.
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Fixed 90° rotation: `(-y, x)`.
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Euclidean distance between two points
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Linear interpolation between two vectors. `t` is not clamped.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// Operator overloads for Vec2
impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

// =============================================================================
// Collision Type
// =============================================================================

/// How pair collisions exchange energy.
///
/// `Elastic` always resolves with a restitution of 1.0; `Inelastic` uses the
/// configured restitution, and a restitution of 0.0 makes the pair share a
/// common normal velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionType {
    #[default]
    Elastic,
    Inelastic,
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionType::Elastic => write!(f, "elastic"),
            CollisionType::Inelastic => write!(f, "inelastic"),
        }
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants shared across the engine.
pub mod constants {
    /// Radius scale: `radius = RADIUS_BASE * sqrt(mass)`
    pub const RADIUS_BASE: f64 = 14.0;

    /// Largest frame delta (s) a session will integrate in one tick
    pub const MAX_FRAME_DT: f64 = 0.05;

    /// Number of snapshots a session keeps in its collision log
    pub const MAX_COLLISION_LOG: usize = 30;

    /// Relative tolerance for the conservation verdicts
    pub const CONSERVATION_EPSILON: f64 = 0.01;

    /// Time scales offered to the control surface
    pub const TIME_SCALES: [f64; 4] = [0.25, 0.5, 1.0, 2.0];
}

// =============================================================================
// Tests
// =============================================================================
