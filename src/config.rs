//! Demo configuration
//!
//! All values have defaults matching the stock demo; an optional TOML file can override
//! any subset of them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "lasercube.toml";

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime settings for the demo window, assets and effect timing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,

    /// Directory holding the `<stage>.wgsl` shader stage files
    pub shader_dir: PathBuf,
    /// OBJ file for the cube; the procedural cube is used when unset or unreadable
    pub cube_mesh: Option<PathBuf>,
    /// Texture slot 0: the intact surface
    pub cube_texture: PathBuf,
    /// Texture slot 1: the destroyed surface used by the texture fade
    pub cube_destroyed_texture: PathBuf,
    /// Texture slot 2: the heightmap sampled by the tessellated effects
    pub cube_heightmap: PathBuf,

    /// Animation progress gained per elapsed millisecond
    pub animation_rate: f32,
    /// Cube spin in degrees per elapsed millisecond
    pub rotation_speed: f32,
    /// Distance moved along the view axis per zoom key press
    pub zoom_step: f32,
    /// Progress after which the alpha fade turns depth testing off
    pub fade_depth_threshold: f32,

    pub clear_colour: [f64; 4],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window_title: "LaserCube".to_string(),
            window_width: 800,
            window_height: 600,
            shader_dir: PathBuf::from("assets/shaders"),
            cube_mesh: None,
            cube_texture: PathBuf::from("assets/textures/bricks.png"),
            cube_destroyed_texture: PathBuf::from("assets/textures/bricks_destroyed.png"),
            cube_heightmap: PathBuf::from("assets/textures/bricks_heightmap.png"),
            animation_rate: 0.001,
            rotation_speed: 0.1,
            zoom_step: 0.5,
            fade_depth_threshold: 0.25,
            clear_colour: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

impl DemoConfig {
    /// Parses a configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads a configuration file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads the configuration file if it exists, otherwise returns the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("Loading configuration from {}", path.display());
            Self::load_from_file(path)
        } else {
            log::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
