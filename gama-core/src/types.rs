//! Core types for the physics simulation.
//!
//! Units are whatever the host uses for its play-field. The drawing layer of
//! the engine works in a `[-1, 1]` square, so typical bodies have extents of a
//! few hundredths to a few tenths and accelerations of order one.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

// =============================================================================
// Vec2 - 2D Vector
// =============================================================================

/// A 2D vector used for positions, velocities, accelerations and normals.
///
/// Coordinate system:
/// - X: horizontal (positive to the right)
/// - Y: vertical (positive upward)
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

    /// Euclidean distance between two points
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).magnitude()
    }

    /// Returns a unit vector in the same direction, or zero if magnitude is zero
    pub fn normalized(&self) -> Self {
        let mag = self.magnitude();
        if mag < constants::EPSILON {
            Self::ZERO
        } else {
            *self / mag
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn reset(&mut self) {
        *self = Self::ZERO;
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

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
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

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// The two collider kinds a body can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    Circle,
    Rect,
}

/// Collider geometry, centered on the body position.
///
/// Rectangles are axis-aligned; bodies never rotate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

impl Shape {
    /// Build a shape from a width/height pair.
    ///
    /// A circle takes the smaller of the two extents as its radius.
    pub fn from_extents(kind: ColliderKind, width: f64, height: f64) -> Self {
        match kind {
            ColliderKind::Circle => Shape::Circle {
                radius: width.min(height),
            },
            ColliderKind::Rect => Shape::Rect { width, height },
        }
    }

    pub fn kind(&self) -> ColliderKind {
        match self {
            Shape::Circle { .. } => ColliderKind::Circle,
            Shape::Rect { .. } => ColliderKind::Rect,
        }
    }

    /// Half-size of the bounding box.
    pub fn half_extents(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::new(radius, radius),
            Shape::Rect { width, height } => Vec2::new(width * 0.5, height * 0.5),
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match *self {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }

    /// Width and height of a rectangle.
    pub fn size(&self) -> Option<(f64, f64)> {
        match *self {
            Shape::Rect { width, height } => Some((width, height)),
            Shape::Circle { .. } => None,
        }
    }
}

// =============================================================================
// Body
// =============================================================================

/// A simulated rigid body.
///
/// Bodies are plain values: the caller builds them and either keeps them
/// (stepping them with [`crate::integrator::SemiImplicitEuler::step_free`]) or
/// moves them into a [`crate::system::System`].
///
/// A body with `is_static` set, or with a non-positive mass, behaves as an
/// infinite mass: the integrator and the resolver never move it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub is_active: bool,
    pub is_static: bool,
    pub shape: Shape,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f64,
    /// Bounciness: 0 = fully inelastic, 1 = fully elastic
    pub restitution: f64,
    /// Kept for material presets; the resolver ignores it
    pub friction: f64,
}

impl Body {
    /// Create an active, non-static body at rest.
    pub fn new(mass: f64, x: f64, y: f64, width: f64, height: f64, kind: ColliderKind) -> Self {
        Self {
            is_active: true,
            is_static: false,
            shape: Shape::from_extents(kind, width, height),
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass,
            restitution: 1.0,
            friction: 0.0,
        }
    }

    pub fn circle(mass: f64, x: f64, y: f64, radius: f64) -> Self {
        Self::new(mass, x, y, radius, radius, ColliderKind::Circle)
    }

    pub fn rect(mass: f64, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(mass, x, y, width, height, ColliderKind::Rect)
    }

    pub fn kind(&self) -> ColliderKind {
        self.shape.kind()
    }

    /// True when the body cannot be moved by integration or impulses.
    pub fn is_immovable(&self) -> bool {
        self.is_static || self.mass <= 0.0
    }

    /// Inverse mass used by the resolver, zero for immovable bodies.
    pub fn inverse_mass(&self) -> f64 {
        if self.is_immovable() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Check if a point lies strictly inside the collider.
    pub fn contains(&self, point: Vec2) -> bool {
        let dx = (self.position.x - point.x).abs();
        let dy = (self.position.y - point.y).abs();
        match self.shape {
            Shape::Rect { width, height } => dx < width * 0.5 && dy < height * 0.5,
            Shape::Circle { radius } => dx * dx + dy * dy < radius * radius,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// Scale the velocity down so the speed does not exceed `max_speed`.
    pub fn limit_max_speed(&mut self, max_speed: f64) {
        let speed = self.speed();
        if speed > max_speed {
            self.velocity *= max_speed / speed;
        }
    }

    /// Scale the velocity up so the speed is at least `min_speed`.
    ///
    /// A body at rest has no direction and is left untouched.
    pub fn limit_min_speed(&mut self, min_speed: f64) {
        let speed = self.speed();
        if speed < min_speed && speed != 0.0 {
            self.velocity *= min_speed / speed;
        }
    }

    /// Rescale the velocity to exactly `speed`, keeping its direction.
    ///
    /// A body at rest starts moving along +X.
    pub fn set_speed(&mut self, speed: f64) {
        let current = self.speed();
        if current == speed {
            return;
        }
        if current == 0.0 {
            self.velocity = Vec2::new(speed, 0.0);
        } else {
            self.velocity *= speed / current;
        }
    }
}

// =============================================================================
// Collision Types
// =============================================================================

/// Index of a body inside a [`crate::system::System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) usize);

impl BodyHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One pairwise contact recorded during a system step.
///
/// The normal points from `bodies.0` toward `bodies.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub bodies: (BodyHandle, BodyHandle),
    /// Overlap depth along the normal; only meaningful when positive
    pub penetration: f64,
    pub normal: Vec2,
    /// Simulated time the pair has stayed in contact across frames
    pub since: f64,
}

impl Collision {
    /// A fresh record with zeroed geometry, filled in by the resolver.
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self {
            bodies: (a, b),
            penetration: 0.0,
            normal: Vec2::ZERO,
            since: 0.0,
        }
    }

    /// Whether this record is about the unordered pair `{a, b}`.
    pub fn involves(&self, a: BodyHandle, b: BodyHandle) -> bool {
        (self.bodies.0 == a && self.bodies.1 == b) || (self.bodies.0 == b && self.bodies.1 == a)
    }

    pub fn touches(&self, body: BodyHandle) -> bool {
        self.bodies.0 == body || self.bodies.1 == body
    }
}

// =============================================================================
// Physical Constants
// =============================================================================

/// Constants used by the collision and integration code.
pub mod constants {
    /// Fraction of the penetration corrected per resolution
    pub const CORRECTION_PERCENT: f64 = 0.2;

    /// Penetration tolerated without positional correction
    pub const CORRECTION_SLOP: f64 = 0.01;

    /// Default sub-step unit for `System::update`
    pub const DEFAULT_FRAME_TIME: f64 = 0.001;

    /// Upper bound on sub-steps in one frame
    pub const MAX_SUB_STEPS: usize = 1_000_000;

    /// Distance substituted for two coincident circle centers
    pub const COINCIDENT_DISTANCE: f64 = 0.001;

    /// Below this distance a circle center counts as inside a rectangle
    pub const INSIDE_EPSILON: f64 = 1e-4;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================
