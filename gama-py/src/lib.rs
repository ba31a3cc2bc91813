//! Python bindings for the gama-core 2D physics engine.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from gama_physics import System
//!
//! world = System()
//! world.set_acceleration(0.0, -9.81)
//! ball = world.add_circle(1.0, 0.0, 2.0, 0.1)
//! floor = world.add_rect(0.0, 0.0, 0.0, 10.0, 0.2)
//!
//! for _ in range(60):
//!     world.step(0.001, 1 / 60)
//!     pos = world.position(ball)
//!     print(f"Ball at ({pos.x}, {pos.y})")
//! ```

use pyo3::exceptions::{PyIOError, PyIndexError, PyMemoryError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use gama_core::materials::{MaterialError, MaterialLoader};
use gama_core::system::{sub_step_count, System as CoreSystem, SystemError};
use gama_core::types::{Body, BodyHandle, Vec2 as CoreVec2};

/// 2D vector for positions and velocities.
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

fn step_error(err: SystemError) -> PyErr {
    PyMemoryError::new_err(err.to_string())
}

fn no_body(index: usize) -> PyErr {
    PyIndexError::new_err(format!("no body at index {}", index))
}

fn material_error(err: MaterialError) -> PyErr {
    match err {
        MaterialError::NotFound(_) => PyValueError::new_err(err.to_string()),
        _ => PyIOError::new_err(err.to_string()),
    }
}

/// A physics world.
///
/// Bodies are addressed by the index returned from `add_circle`/`add_rect`.
#[pyclass]
pub struct System {
    inner: CoreSystem,
    time: f64,
}

impl System {
    fn handle(&self, index: usize) -> PyResult<BodyHandle> {
        self.inner.handle(index).ok_or_else(|| no_body(index))
    }

    fn body(&self, index: usize) -> PyResult<&Body> {
        self.inner.bodies().get(index).ok_or_else(|| no_body(index))
    }

    fn body_mut(&mut self, index: usize) -> PyResult<&mut Body> {
        self.inner
            .bodies_mut()
            .get_mut(index)
            .ok_or_else(|| no_body(index))
    }
}

#[pymethods]
impl System {
    /// Create an empty world with no ambient forces.
    #[new]
    fn new() -> Self {
        Self {
            inner: CoreSystem::new(),
            time: 0.0,
        }
    }

    /// Create an empty world from a YAML preset in `<materials_dir>/systems/`.
    #[staticmethod]
    fn from_preset(materials_dir: &str, name: &str) -> PyResult<Self> {
        let config = MaterialLoader::new(materials_dir)
            .load_system(name)
            .map_err(material_error)?;
        Ok(Self {
            inner: CoreSystem::from_config(&config),
            time: 0.0,
        })
    }

    /// Total simulated time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.time
    }

    /// Number of bodies.
    fn body_count(&self) -> usize {
        self.inner.len()
    }

    /// Add a circle and return its index. Mass <= 0 makes it immovable.
    fn add_circle(&mut self, mass: f64, x: f64, y: f64, radius: f64) -> usize {
        self.inner.push(Body::circle(mass, x, y, radius)).index()
    }

    /// Add an axis-aligned rectangle and return its index.
    fn add_rect(&mut self, mass: f64, x: f64, y: f64, width: f64, height: f64) -> usize {
        self.inner.push(Body::rect(mass, x, y, width, height)).index()
    }

    /// Apply a body preset from `<materials_dir>/bodies/` to a body.
    fn apply_material(&mut self, index: usize, materials_dir: &str, name: &str) -> PyResult<()> {
        let material = MaterialLoader::new(materials_dir)
            .load_body(name)
            .map_err(material_error)?;
        material.apply(self.body_mut(index)?);
        Ok(())
    }

    // --- Body state ---

    fn position(&self, index: usize) -> PyResult<Vec2> {
        Ok(self.body(index)?.position.into())
    }

    fn velocity(&self, index: usize) -> PyResult<Vec2> {
        Ok(self.body(index)?.velocity.into())
    }

    fn set_position(&mut self, index: usize, x: f64, y: f64) -> PyResult<()> {
        self.body_mut(index)?.position = CoreVec2::new(x, y);
        Ok(())
    }

    fn set_velocity(&mut self, index: usize, vx: f64, vy: f64) -> PyResult<()> {
        self.body_mut(index)?.velocity = CoreVec2::new(vx, vy);
        Ok(())
    }

    /// Per-body acceleration, added to the ambient one.
    fn set_body_acceleration(&mut self, index: usize, ax: f64, ay: f64) -> PyResult<()> {
        self.body_mut(index)?.acceleration = CoreVec2::new(ax, ay);
        Ok(())
    }

    fn set_restitution(&mut self, index: usize, restitution: f64) -> PyResult<()> {
        self.body_mut(index)?.restitution = restitution;
        Ok(())
    }

    fn set_static(&mut self, index: usize, is_static: bool) -> PyResult<()> {
        self.body_mut(index)?.is_static = is_static;
        Ok(())
    }

    fn set_active(&mut self, index: usize, is_active: bool) -> PyResult<()> {
        self.body_mut(index)?.is_active = is_active;
        Ok(())
    }

    /// Clamp the speed of a body to at most `max_speed`.
    fn limit_max_speed(&mut self, index: usize, max_speed: f64) -> PyResult<()> {
        self.body_mut(index)?.limit_max_speed(max_speed);
        Ok(())
    }

    // --- Ambient forces ---

    fn set_acceleration(&mut self, ax: f64, ay: f64) {
        self.inner.forces.acceleration = CoreVec2::new(ax, ay);
    }

    /// Ambient drift velocity, e.g. wind or current.
    fn set_drift(&mut self, vx: f64, vy: f64) {
        self.inner.forces.velocity = CoreVec2::new(vx, vy);
    }

    fn set_damping(&mut self, damping: f64) {
        self.inner.forces.damping = damping;
    }

    // --- Stepping ---

    fn pause(&mut self) {
        self.inner.pause();
    }

    fn resume(&mut self) {
        self.inner.resume();
    }

    #[getter]
    fn is_active(&self) -> bool {
        self.inner.is_active
    }

    /// Advance by `dt` seconds in sub-steps no longer than `unit`.
    fn step(&mut self, unit: f64, dt: f64) -> PyResult<()> {
        let advances = self.inner.is_active && sub_step_count(unit, dt).is_some();
        self.inner.step(unit, dt).map_err(step_error)?;
        if advances {
            self.time += dt;
        }
        Ok(())
    }

    /// Advance by `dt` seconds using the configured frame time as sub-step.
    fn update(&mut self, dt: f64) -> PyResult<()> {
        let unit = self.inner.frame_time;
        self.step(unit, dt)
    }

    /// Run `steps` frames of `dt` seconds.
    fn step_n(&mut self, unit: f64, dt: f64, steps: usize) -> PyResult<()> {
        for _ in 0..steps {
            self.step(unit, dt)?;
        }
        Ok(())
    }

    // --- Contacts ---

    fn is_colliding(&self, a: usize, b: usize) -> PyResult<bool> {
        Ok(self.inner.is_colliding(self.handle(a)?, self.handle(b)?))
    }

    /// Seconds the pair has been touching, or None when apart.
    fn contact_since(&self, a: usize, b: usize) -> PyResult<Option<f64>> {
        let contact = self.inner.collision(self.handle(a)?, self.handle(b)?);
        Ok(contact.map(|c| c.since))
    }

    /// Current contacts as (a, b, penetration, since) tuples.
    fn contacts(&self) -> Vec<(usize, usize, f64, f64)> {
        self.inner
            .collisions()
            .iter()
            .map(|c| (c.bodies.0.index(), c.bodies.1.index(), c.penetration, c.since))
            .collect()
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self, py: Python<'_>) -> PyResult<PyObject> {
        let dict = PyDict::new(py);
        dict.set_item("time", self.time)?;
        dict.set_item("active", self.inner.is_active)?;
        dict.set_item("body_count", self.inner.len())?;
        dict.set_item("contact_count", self.inner.collisions().len())?;

        let positions: Vec<(f64, f64)> = self
            .inner
            .bodies()
            .iter()
            .map(|b| (b.position.x, b.position.y))
            .collect();
        let velocities: Vec<(f64, f64)> = self
            .inner
            .bodies()
            .iter()
            .map(|b| (b.velocity.x, b.velocity.y))
            .collect();
        dict.set_item("positions", positions)?;
        dict.set_item("velocities", velocities)?;
        Ok(dict.into_any().unbind())
    }
}

/// Python module definition.
#[pymodule]
fn gama_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vec2>()?;
    m.add_class::<System>()?;
    Ok(())
}
