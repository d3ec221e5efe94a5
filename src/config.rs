//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`FOG_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use fogbound_physics::Capsule;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Collision world configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Actor movement configuration
    #[serde(default)]
    pub actor: ActorConfig,
    /// Simulation loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Level configuration
    #[serde(default)]
    pub level: LevelConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`FOG_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // FOG_ACTOR__WALK_SPEED=6 -> actor.walk_speed = 6.0
        figment = figment.merge(Env::prefixed("FOG_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Collision world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Broad-phase grid cell size
    pub cell_size: f32,
    /// Distance of the downward grounded probe
    pub ground_probe_distance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let defaults = fogbound_physics::PhysicsConfig::default();
        Self {
            cell_size: defaults.cell_size,
            ground_probe_distance: defaults.ground_probe_distance,
        }
    }
}

impl PhysicsConfig {
    /// Convert to the collision world's configuration
    pub fn to_physics_config(&self) -> fogbound_physics::PhysicsConfig {
        fogbound_physics::PhysicsConfig::new(self.cell_size, self.ground_probe_distance)
    }
}

/// Actor movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Capsule radius
    pub radius: f32,
    /// Capsule height including caps
    pub height: f32,
    /// Highest ledge an actor walks onto
    pub step_height: f32,
    /// Survivor walk speed (units per second)
    pub walk_speed: f32,
    /// Killer speed (units per second)
    pub killer_speed: f32,
    /// Gravity (negative = downward)
    pub gravity: f32,
    /// Jump velocity
    pub jump_velocity: f32,
    /// Half-extents of the chase volume carried by the killer
    pub chase_radius: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            radius: 0.45,
            height: 1.8,
            step_height: 0.45,
            walk_speed: 4.0,
            killer_speed: 4.6,
            gravity: -20.0,
            jump_velocity: 6.0,
            chase_radius: 8.0,
        }
    }
}

impl ActorConfig {
    /// Collision capsule for actors
    pub fn capsule(&self) -> Capsule {
        Capsule::new(self.radius, self.height)
    }
}

/// Simulation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed ticks per second
    pub tick_rate: u32,
    /// Number of ticks to run before exiting
    pub tick_count: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            tick_count: 600,
        }
    }
}

impl SimulationConfig {
    /// Fixed timestep in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// Level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Path to a RON world layout; empty uses the built-in yard
    pub layout_path: String,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
