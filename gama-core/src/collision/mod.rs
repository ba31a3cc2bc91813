//! Collision detection and resolution between bodies.
//!
//! This module handles:
//! - **Detection**: boolean overlap tests and contact geometry per shape pair
//! - **Resolution**: impulse response and positional correction
//!
//! ## Shape Pairs
//!
//! Only two collider kinds exist, so every pair is handled explicitly:
//!
//! ```text
//!            circle           rect
//! circle   distance test    closest point on box
//! rect     closest point    interval overlap (AABB)
//! ```
//!
//! All pairs are tested discretely at the end of each sub-step; fast bodies can
//! tunnel through thin ones if the sub-step is too coarse.

pub mod detection;
pub mod resolution;

pub use detection::*;
pub use resolution::*;
