//! Collision detection and resolution between particles.
//!
//! This module handles:
//! - **Detection**: finding overlapping circle pairs after integration
//! - **Resolution**: restitution impulses along the contact normal plus
//!   positional correction
//! - **Snapshots**: immutable before/after records of every resolved pair
//!
//! ## Contact Geometry
//!
//! ```text
//!        rA        rB
//!     ◄──────►◄──────────►
//!    (   A   (▓)    B     )
//!            ◄►
//!          overlap = rA + rB - |A - B|
//! ```
//!
//! Detection is discrete and O(n²) over all pairs, which is fine for the
//! small particle counts a session holds.

pub mod detection;
pub mod resolution;
pub mod snapshot;

pub use detection::*;
pub use resolution::*;
pub use snapshot::*;
