//! Game configuration (landing limits, engines, fuel, timing). Loaded from config.ron at startup.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Kinematic thresholds a contact must stay within to count as a landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingLimits {
    /// Maximum speed along the surface.
    #[serde(default = "default_limit_lateral")]
    pub lateral: f64,
    /// Maximum speed toward the surface.
    #[serde(default = "default_limit_vertical")]
    pub vertical: f64,
    /// Maximum tilt of the rocket base against the surface tangent, in degrees.
    #[serde(default = "default_limit_angle")]
    pub angle: f64,
}

fn default_limit_lateral() -> f64 {
    1.0
}
fn default_limit_vertical() -> f64 {
    2.0
}
fn default_limit_angle() -> f64 {
    10.0
}

impl Default for LandingLimits {
    fn default() -> Self {
        Self {
            lateral: default_limit_lateral(),
            vertical: default_limit_vertical(),
            angle: default_limit_angle(),
        }
    }
}

/// One engine group: thrust per tick (also the fuel it burns) and nozzle angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub thrust: f64,
    /// Direction the exhaust leaves the rocket, in degrees.
    #[serde(default)]
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnginesConfig {
    #[serde(default = "default_main_engine")]
    pub main: EngineConfig,
    #[serde(default = "default_left_engine")]
    pub left: EngineConfig,
    #[serde(default = "default_right_engine")]
    pub right: EngineConfig,
    #[serde(default = "default_reverse_engine")]
    pub reverse: EngineConfig,
}

fn default_main_engine() -> EngineConfig {
    EngineConfig { thrust: 0.4, angle: 180.0 }
}
fn default_left_engine() -> EngineConfig {
    EngineConfig { thrust: 0.22, angle: 270.0 }
}
fn default_right_engine() -> EngineConfig {
    EngineConfig { thrust: 0.22, angle: 90.0 }
}
fn default_reverse_engine() -> EngineConfig {
    EngineConfig { thrust: 0.175, angle: 0.0 }
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            main: default_main_engine(),
            left: default_left_engine(),
            right: default_right_engine(),
            reverse: default_reverse_engine(),
        }
    }
}

/// Rocket geometry and fuel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketConfig {
    /// Unscaled sprite width.
    #[serde(default = "default_rocket_width")]
    pub width: f64,
    /// Unscaled sprite height.
    #[serde(default = "default_rocket_height")]
    pub height: f64,
    /// Offset of the centre of mass below the sprite midpoint.
    #[serde(default = "default_rocket_h_offset")]
    pub h_offset: f64,
    /// Scale applied to width and height.
    #[serde(default = "default_rocket_factor")]
    pub factor: f64,
    #[serde(default = "default_start_fuel")]
    pub start_fuel: f64,
    #[serde(default)]
    pub engines: EnginesConfig,
}

fn default_rocket_width() -> f64 {
    57.0
}
fn default_rocket_height() -> f64 {
    137.5
}
fn default_rocket_h_offset() -> f64 {
    5.0
}
fn default_rocket_factor() -> f64 {
    0.5
}
fn default_start_fuel() -> f64 {
    275.0
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            width: default_rocket_width(),
            height: default_rocket_height(),
            h_offset: default_rocket_h_offset(),
            factor: default_rocket_factor(),
            start_fuel: default_start_fuel(),
            engines: EnginesConfig::default(),
        }
    }
}

impl RocketConfig {
    pub fn scaled_width(&self) -> f64 {
        self.width * self.factor
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.factor
    }

    /// Height of the rocket centre above the surface when parked.
    pub fn surface_offset(&self) -> f64 {
        self.height / (2.0 / self.factor) - self.h_offset
    }

    /// Nose, rear-left and rear-right probe points in the unrotated local frame.
    pub fn probe_points(&self) -> [DVec2; 3] {
        let w = self.scaled_width();
        let h = self.scaled_height();
        [
            DVec2::new(0.0, -h / 2.0),
            DVec2::new(-w / 2.0, h / 2.0 - self.h_offset),
            DVec2::new(w / 2.0, h / 2.0 - self.h_offset),
        ]
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Logic ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Most logic ticks run for one rendered frame.
    #[serde(default = "default_max_catch_up_ticks")]
    pub max_catch_up_ticks: u32,
    /// Delay before win/crash messages are posted.
    #[serde(default = "default_message_delay_ms")]
    pub message_delay_ms: u64,
    /// Explosion animation length, one frame per tick.
    #[serde(default = "default_explosion_frames")]
    pub explosion_frames: u32,
    /// Surface distance under which landing info is shown.
    #[serde(default = "default_show_landing_info")]
    pub show_landing_info: f64,
    #[serde(default)]
    pub limits: LandingLimits,
    #[serde(default)]
    pub rocket: RocketConfig,
}

fn default_tick_rate() -> f64 {
    engine_core::DEFAULT_TICK_RATE
}
fn default_max_catch_up_ticks() -> u32 {
    engine_core::DEFAULT_MAX_CATCH_UP
}
fn default_message_delay_ms() -> u64 {
    300
}
fn default_explosion_frames() -> u32 {
    25
}
fn default_show_landing_info() -> f64 {
    2000.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            max_catch_up_ticks: default_max_catch_up_ticks(),
            message_delay_ms: default_message_delay_ms(),
            explosion_frames: default_explosion_frames(),
            show_landing_info: default_show_landing_info(),
            limits: LandingLimits::default(),
            rocket: RocketConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Length of one logic tick.
    pub fn tick_duration(&self) -> Duration {
        engine_core::tick_duration(self.tick_rate)
    }

    /// Message delay expressed in ticks.
    pub fn message_delay_ticks(&self) -> u32 {
        engine_core::ticks_for(Duration::from_millis(self.message_delay_ms), self.tick_duration())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
