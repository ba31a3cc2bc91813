//! Material and world presets.
//!
//! Loads body materials and system configurations from YAML files, so games can
//! tune bounciness or gravity without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! materials/
//! ├── bodies/
//! │   ├── rubber_ball.yaml
//! │   ├── steel.yaml
//! │   └── ...
//! └── systems/
//!     ├── earth.yaml
//!     └── space.yaml
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::forces::AmbientForces;
use crate::types::{constants, Body, Vec2};

/// Failure to read a preset.
#[derive(Debug)]
pub enum MaterialError {
    IoError(std::io::Error),
    ParseError(serde_yaml::Error),
    /// No `<name>.yaml` in the preset directory
    NotFound(String),
}

impl std::fmt::Display for MaterialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialError::IoError(e) => write!(f, "cannot read preset: {}", e),
            MaterialError::ParseError(e) => write!(f, "invalid preset YAML: {}", e),
            MaterialError::NotFound(name) => write!(f, "no preset named '{}'", name),
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialError::IoError(e) => Some(e),
            MaterialError::ParseError(e) => Some(e),
            MaterialError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for MaterialError {
    fn from(err: std::io::Error) -> Self {
        MaterialError::IoError(err)
    }
}

impl From<serde_yaml::Error> for MaterialError {
    fn from(err: serde_yaml::Error) -> Self {
        MaterialError::ParseError(err)
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Physical properties shared by a family of bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMaterial {
    pub name: String,
    /// Overrides the body mass when set; zero or negative makes it immovable
    #[serde(default)]
    pub mass: Option<f64>,
    pub restitution: f64,
    #[serde(default)]
    pub friction: f64,
}

impl BodyMaterial {
    /// Copy the material properties onto a body.
    pub fn apply(&self, body: &mut Body) {
        if let Some(mass) = self.mass {
            body.mass = mass;
        }
        body.restitution = self.restitution;
        body.friction = self.friction;
    }
}

impl Default for BodyMaterial {
    /// Perfectly elastic, frictionless: what `Body::new` produces.
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            mass: None,
            restitution: 1.0,
            friction: 0.0,
        }
    }
}

/// Ambient forces and stepping parameters of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    #[serde(default)]
    pub velocity: Vec2,
    #[serde(default)]
    pub acceleration: Vec2,
    #[serde(default)]
    pub damping: f64,
    /// Sub-step unit used by `System::update`
    #[serde(default = "default_frame_time")]
    pub frame_time: f64,
}

fn default_frame_time() -> f64 {
    constants::DEFAULT_FRAME_TIME
}

impl SystemConfig {
    pub fn forces(&self) -> AmbientForces {
        AmbientForces {
            velocity: self.velocity,
            acceleration: self.acceleration,
            damping: self.damping,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            damping: 0.0,
            frame_time: constants::DEFAULT_FRAME_TIME,
        }
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Reads presets from a directory tree.
#[derive(Debug, Clone)]
pub struct MaterialLoader {
    root: PathBuf,
}

impl MaterialLoader {
    /// `root` holds the `bodies/` and `systems/` directories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load a body material by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let rubber = MaterialLoader::new("materials").load_body("rubber_ball")?;
    /// rubber.apply(&mut ball);
    /// ```
    pub fn load_body(&self, name: &str) -> Result<BodyMaterial, MaterialError> {
        self.load("bodies", name)
    }

    /// Load a system configuration by name.
    pub fn load_system(&self, name: &str) -> Result<SystemConfig, MaterialError> {
        self.load("systems", name)
    }

    /// List all available body materials.
    pub fn list_bodies(&self) -> Result<Vec<String>, MaterialError> {
        self.list("bodies")
    }

    /// List all available system configurations.
    pub fn list_systems(&self) -> Result<Vec<String>, MaterialError> {
        self.list("systems")
    }

    fn load<T: serde::de::DeserializeOwned>(
        &self,
        subdir: &str,
        name: &str,
    ) -> Result<T, MaterialError> {
        let path = self.root.join(subdir).join(name).with_extension("yaml");
        if !path.is_file() {
            return Err(MaterialError::NotFound(name.to_owned()));
        }
        debug!(path = %path.display(), "loading preset");
        let text = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Sorted preset names in `subdir`; empty when the directory is missing.
    fn list(&self, subdir: &str) -> Result<Vec<String>, MaterialError> {
        let dir = self.root.join(subdir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
