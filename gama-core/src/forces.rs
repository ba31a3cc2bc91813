//! Forces acting on bodies.
//!
//! A [`crate::system::System`] applies the same ambient forces to every body it
//! holds:
//!
//! - **Acceleration**: uniform field such as gravity, added to each body's own
//!   acceleration
//! - **Damping**: exponential velocity decay, `v *= 1 / (1 + damping * dt)`,
//!   stable for any positive `dt`
//! - **Drift**: a uniform velocity (wind, conveyor, current) that moves bodies
//!   without changing their own velocity
//!
//! ```text
//!   drift ──────►
//!      ●  ──────►   body velocity is unchanged,
//!      ↓ accel      the body is carried along
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Body, Vec2};

/// Trait for the environment a body is integrated in.
pub trait ForceModel {
    /// Acceleration added to the body's own acceleration.
    fn acceleration(&self, body: &Body) -> Vec2;

    /// Velocity damping coefficient. Default: none.
    fn damping(&self) -> f64 {
        0.0
    }

    /// Velocity that carries bodies along. Default: none.
    fn drift(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// The uniform forces of a system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AmbientForces {
    /// Velocity applied to all bodies' positions
    pub velocity: Vec2,
    /// Acceleration applied to all bodies' velocities
    pub acceleration: Vec2,
    /// Damping coefficient applied to all bodies' velocities
    pub damping: f64,
}

impl AmbientForces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only a uniform acceleration (e.g. gravity).
    pub fn with_acceleration(x: f64, y: f64) -> Self {
        Self {
            acceleration: Vec2::new(x, y),
            ..Self::default()
        }
    }
}

impl ForceModel for AmbientForces {
    fn acceleration(&self, _body: &Body) -> Vec2 {
        self.acceleration
    }

    fn damping(&self) -> f64 {
        self.damping
    }

    fn drift(&self) -> Vec2 {
        self.velocity
    }
}

/// No environment: a body moves under its own acceleration only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeMotion;

impl ForceModel for FreeMotion {
    fn acceleration(&self, _body: &Body) -> Vec2 {
        Vec2::ZERO
    }
}
