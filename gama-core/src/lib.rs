//! # Gama Core
//!
//! A small 2D rigid body physics engine for games.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec2, shapes, bodies, contact records)
//! - `forces`: Ambient forces shared by all bodies of a system
//! - `integrator`: Numerical integration (semi-implicit Euler)
//! - `collision`: Circle/box detection and impulse resolution
//! - `system`: The world; sub-stepping and contact persistence
//! - `bounds`: Optional arena limits (clip, wrap, bounce)
//! - `materials`: YAML-based preset loader
//!
//! ## Example
//!
//! ```
//! use gama_core::prelude::*;
//!
//! let mut system = System::with_forces(AmbientForces::with_acceleration(0.0, -9.81));
//! let ball = system.push(Body::circle(1.0, 0.0, 2.0, 0.1));
//! let floor = system.push(Body::rect(0.0, 0.0, 0.0, 10.0, 0.2));
//!
//! for _ in 0..60 {
//!     system.step(0.001, 1.0 / 60.0).unwrap();
//! }
//! // Bounced off the floor and on its way back up
//! let y = system.body(ball).unwrap().position.y;
//! assert!(y > 0.2 && y < 2.0);
//! assert!(system.body(floor).unwrap().velocity.y == 0.0);
//! ```

pub mod bounds;
pub mod collision;
pub mod forces;
pub mod integrator;
pub mod materials;
pub mod system;
pub mod types;

/// Commonly used items.
pub mod prelude {
    pub use crate::bounds::{Bounds, Exit};
    pub use crate::collision::{contact, detect, penetration, CollisionResolver, Contact};
    pub use crate::forces::{AmbientForces, ForceModel, FreeMotion};
    pub use crate::integrator::SemiImplicitEuler;
    pub use crate::materials::{BodyMaterial, MaterialLoader, SystemConfig};
    pub use crate::system::{sub_step_count, System, SystemError};
    pub use crate::types::{Body, BodyHandle, ColliderKind, Collision, Shape, Vec2};
}
