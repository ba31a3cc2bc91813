//! Play-field bounds.
//!
//! Keeps bodies inside a rectangular region in one of three ways:
//!
//! - **Clip**: stop the body on the edge it crossed
//! - **Wrap**: teleport it to the opposite edge (asteroids-style)
//! - **Bounce**: reflect its velocity back into the field
//!
//! Each returns an [`Exit`] describing the edges that were crossed, so games can
//! react (score a goal, play a sound, ...).

use crate::types::{Body, Vec2};

/// Set of edges a body crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exit(u8);

impl Exit {
    pub const NONE: Exit = Exit(0);
    pub const LEFT: Exit = Exit(0b1000);
    pub const RIGHT: Exit = Exit(0b0100);
    pub const BOTTOM: Exit = Exit(0b0010);
    pub const TOP: Exit = Exit(0b0001);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: Exit) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    fn insert(&mut self, other: Exit) {
        self.0 |= other.0;
    }
}

/// An axis-aligned region. Use infinite limits to leave an axis unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Bounds only on the X axis.
    pub fn horizontal(min_x: f64, max_x: f64) -> Self {
        Self::new(min_x, max_x, f64::NEG_INFINITY, f64::INFINITY)
    }

    /// Bounds only on the Y axis.
    pub fn vertical(min_y: f64, max_y: f64) -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY, min_y, max_y)
    }

    /// Clamp the body position onto the edges it crossed.
    pub fn clip(&self, body: &mut Body) -> Exit {
        let mut exit = Exit::NONE;
        let pos = &mut body.position;

        if pos.x < self.min.x {
            pos.x = self.min.x;
            exit.insert(Exit::LEFT);
        } else if pos.x > self.max.x {
            pos.x = self.max.x;
            exit.insert(Exit::RIGHT);
        }

        if pos.y < self.min.y {
            pos.y = self.min.y;
            exit.insert(Exit::BOTTOM);
        } else if pos.y > self.max.y {
            pos.y = self.max.y;
            exit.insert(Exit::TOP);
        }

        exit
    }

    /// Move a body that left the region to the opposite edge.
    pub fn wrap(&self, body: &mut Body) -> Exit {
        let mut exit = Exit::NONE;
        let pos = &mut body.position;

        if pos.x < self.min.x {
            pos.x = self.max.x;
            exit.insert(Exit::LEFT);
        } else if pos.x > self.max.x {
            pos.x = self.min.x;
            exit.insert(Exit::RIGHT);
        }

        if pos.y < self.min.y {
            pos.y = self.max.y;
            exit.insert(Exit::BOTTOM);
        } else if pos.y > self.max.y {
            pos.y = self.min.y;
            exit.insert(Exit::TOP);
        }

        exit
    }

    /// Reflect the velocity of a body that is outside and still moving away.
    ///
    /// The reflected component is scaled by `restitution`. Position is left
    /// alone, so a body keeps being pulled back over the next frames.
    pub fn bounce(&self, body: &mut Body, restitution: f64) -> Exit {
        let mut exit = Exit::NONE;
        let (pos, vel) = (body.position, &mut body.velocity);

        if pos.x < self.min.x && vel.x < 0.0 {
            vel.x = vel.x.abs() * restitution;
            exit.insert(Exit::LEFT);
        } else if pos.x > self.max.x && vel.x > 0.0 {
            vel.x = -vel.x.abs() * restitution;
            exit.insert(Exit::RIGHT);
        }

        if pos.y < self.min.y && vel.y < 0.0 {
            vel.y = vel.y.abs() * restitution;
            exit.insert(Exit::BOTTOM);
        } else if pos.y > self.max.y && vel.y > 0.0 {
            vel.y = -vel.y.abs() * restitution;
            exit.insert(Exit::TOP);
        }

        exit
    }
}

// =============================================================================
// Tests
// =============================================================================
