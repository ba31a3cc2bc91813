//! The physics system (world).
//!
//! A [`System`] owns a set of bodies, the ambient forces applied to all of
//! them, and the contacts found during the last step.
//!
//! ## Stepping
//!
//! Each call to [`System::step`] advances one external frame of length `dt`:
//!
//! ```text
//! sub_steps = floor(dt / unit) + 1
//! repeat sub_steps times, with sub_dt = dt / sub_steps:
//!     integrate every body
//!     for every pair of active bodies (brute force, O(n²)):
//!         detect -> resolve -> record
//! carry contact durations over from the previous frame
//! ```
//!
//! `unit` only decides how many sub-steps run; their length is always
//! `dt / sub_steps`.
//!
//! ## Contact persistence
//!
//! A pair that was already touching during the previous step keeps its
//! `since` counter, increased by the frame `dt`. New contacts start at zero,
//! and contacts that ended are dropped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::collections::TryReserveError;

use tracing::{trace, warn};

use crate::collision::{detect, CollisionResolver};
use crate::forces::AmbientForces;
use crate::integrator::SemiImplicitEuler;
use crate::materials::SystemConfig;
use crate::types::{constants, Body, BodyHandle, Collision};

/// Error type for system stepping.
#[derive(Debug)]
pub enum SystemError {
    /// The collision list could not grow
    CollisionAlloc(TryReserveError),
}

impl std::fmt::Display for SystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemError::CollisionAlloc(e) => {
                write!(f, "Failed to allocate collision record: {}", e)
            }
        }
    }
}

impl std::error::Error for SystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SystemError::CollisionAlloc(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for SystemError {
    fn from(err: TryReserveError) -> Self {
        SystemError::CollisionAlloc(err)
    }
}

/// Number of sub-steps a frame of `dt` is split into for sub-step `unit`.
///
/// `None` when the pair is not a valid step: `unit` not positive and finite,
/// `dt` negative or not finite, or more than
/// [`MAX_SUB_STEPS`](constants::MAX_SUB_STEPS) sub-steps.
pub fn sub_step_count(unit: f64, dt: f64) -> Option<usize> {
    if !(unit > 0.0 && unit.is_finite() && dt >= 0.0 && dt.is_finite()) {
        return None;
    }
    let count = (dt / unit).floor() + 1.0;
    if !count.is_finite() || count > constants::MAX_SUB_STEPS as f64 {
        return None;
    }
    Some(count as usize)
}

/// A world of bodies sharing ambient forces and a contact list.
#[derive(Debug, Clone)]
pub struct System {
    /// An inactive system does not step at all
    pub is_active: bool,
    pub forces: AmbientForces,
    /// Sub-step unit used by [`System::update`]
    pub frame_time: f64,
    bodies: Vec<Body>,
    collisions: Vec<Collision>,
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    /// An empty, active system with no ambient forces.
    pub fn new() -> Self {
        Self::with_forces(AmbientForces::default())
    }

    pub fn with_forces(forces: AmbientForces) -> Self {
        Self {
            is_active: true,
            forces,
            frame_time: constants::DEFAULT_FRAME_TIME,
            bodies: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Build an empty system from a preset.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            frame_time: config.frame_time,
            ..Self::with_forces(config.forces())
        }
    }

    // -------------------------------------------------------------------------
    // Bodies
    // -------------------------------------------------------------------------

    /// Add a body and return its handle.
    pub fn push(&mut self, body: Body) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    /// Add several bodies, returning their handles in order.
    pub fn push_all<I: IntoIterator<Item = Body>>(&mut self, bodies: I) -> Vec<BodyHandle> {
        bodies.into_iter().map(|body| self.push(body)).collect()
    }

    /// Remove the most recently added body.
    ///
    /// Contacts involving it are dropped so no record outlives its body.
    pub fn pop(&mut self) -> Option<Body> {
        let body = self.bodies.pop()?;
        let removed = BodyHandle(self.bodies.len());
        self.collisions.retain(|c| !c.touches(removed));
        Some(body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Handle of the body at `index`, if it exists.
    pub fn handle(&self, index: usize) -> Option<BodyHandle> {
        (index < self.bodies.len()).then_some(BodyHandle(index))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Mutable access to two distinct bodies at once.
    pub fn pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Option<(&mut Body, &mut Body)> {
        if a == b || a.0 >= self.bodies.len() || b.0 >= self.bodies.len() {
            return None;
        }
        if a.0 < b.0 {
            Some(split_pair(&mut self.bodies, a.0, b.0))
        } else {
            let (second, first) = split_pair(&mut self.bodies, b.0, a.0);
            Some((first, second))
        }
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn pause(&mut self) {
        self.is_active = false;
    }

    pub fn resume(&mut self) {
        self.is_active = true;
    }

    // -------------------------------------------------------------------------
    // Contacts
    // -------------------------------------------------------------------------

    /// Contacts found during the last step.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// The current contact between `a` and `b`, in either order.
    pub fn collision(&self, a: BodyHandle, b: BodyHandle) -> Option<&Collision> {
        self.collisions.iter().find(|c| c.involves(a, b))
    }

    pub fn is_colliding(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.collision(a, b).is_some()
    }

    /// Forget all contacts; the next step sees every pair as new.
    pub fn clear_collisions(&mut self) {
        self.collisions.clear();
    }

    // -------------------------------------------------------------------------
    // Stepping
    // -------------------------------------------------------------------------

    /// Advance the system by `dt`, using [`System::frame_time`] as sub-step unit.
    pub fn update(&mut self, dt: f64) -> Result<(), SystemError> {
        self.step(self.frame_time, dt)
    }

    /// Advance the system by one frame of length `dt`.
    ///
    /// Does nothing when the system is paused or when [`sub_step_count`]
    /// rejects `unit` and `dt`.
    ///
    /// On allocation failure the bodies may already have moved, but the
    /// previous contact list is kept.
    pub fn step(&mut self, unit: f64, dt: f64) -> Result<(), SystemError> {
        if !self.is_active {
            return Ok(());
        }
        let Some(sub_steps) = sub_step_count(unit, dt) else {
            warn!(unit, dt, "ignoring system step with invalid time constants");
            return Ok(());
        };
        let sub_dt = dt / sub_steps as f64;
        trace!(sub_steps, sub_dt, bodies = self.bodies.len(), "system step");

        let mut fresh: Vec<Collision> = Vec::new();
        // One record per pair, even when it touches in several sub-steps
        let mut index: HashMap<(usize, usize), usize> = HashMap::new();

        for _ in 0..sub_steps {
            for body in self.bodies.iter_mut() {
                SemiImplicitEuler::step(body, &self.forces, sub_dt);
            }
            self.collide_pairs(&mut fresh, &mut index)?;
        }

        let mut carried = 0;
        for previous in &self.collisions {
            if let Some(current) = fresh
                .iter_mut()
                .find(|c| previous.involves(c.bodies.0, c.bodies.1))
            {
                current.since = previous.since + dt;
                carried += 1;
            }
        }
        trace!(contacts = fresh.len(), carried, "contacts updated");

        self.collisions = fresh;
        Ok(())
    }

    /// Detect and resolve every pair of active bodies once.
    fn collide_pairs(
        &mut self,
        fresh: &mut Vec<Collision>,
        index: &mut HashMap<(usize, usize), usize>,
    ) -> Result<(), SystemError> {
        let count = self.bodies.len();
        for j in 0..count {
            for k in (j + 1)..count {
                let (a, b) = split_pair(&mut self.bodies, j, k);
                if !a.is_active || !b.is_active || !detect(a, b) {
                    continue;
                }

                index.try_reserve(1)?;
                match index.entry((j, k)) {
                    Entry::Occupied(slot) => {
                        let record = &mut fresh[*slot.get()];
                        CollisionResolver::resolve_record(record, a, b);
                    }
                    Entry::Vacant(slot) => {
                        let mut record = Collision::new(BodyHandle(j), BodyHandle(k));
                        CollisionResolver::resolve_record(&mut record, a, b);
                        fresh.try_reserve(1)?;
                        slot.insert(fresh.len());
                        fresh.push(record);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Borrow `bodies[i]` and `bodies[j]` mutably, with `i < j`.
fn split_pair(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert!(i < j);
    let (head, tail) = bodies.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

// =============================================================================
// Tests
// =============================================================================
