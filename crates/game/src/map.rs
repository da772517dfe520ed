//! Map definitions: planets, base and target placement.
//!
//! Maps are plain data (RON on disk or the built-in default) and are turned
//! into a [`MapLayout`] of physics planets plus the rocket start pose.

use std::path::Path;

use glam::DVec2;
use physics::{Planet, PlanetId, DEFAULT_GRAVITY_MAX_DISTANCE};
use serde::{Deserialize, Serialize};

use crate::config::RocketConfig;
use crate::error::MapError;

/// One planet as written in a map file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSpec {
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Surface gravity.
    pub gravity: f64,
    /// Diameter.
    pub size: f64,
    /// Height above the surface where gravity reaches zero.
    #[serde(default)]
    pub grav_max_dist: Option<f64>,
    #[serde(default)]
    pub is_base: bool,
    #[serde(default)]
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub planets: Vec<PlanetSpec>,
    /// Surface angle on the base planet where the rocket starts.
    pub base_planet_angle: f64,
    pub base_width: f64,
    /// Surface angle on the target planet where the landing pad is centred.
    pub target_planet_angle: f64,
    pub target_width: f64,
}

impl MapDefinition {
    /// The two-planet map the game ships with.
    pub fn builtin() -> Self {
        Self {
            planets: vec![
                PlanetSpec {
                    name: "Base".to_string(),
                    x: 200.0,
                    y: 1700.0,
                    gravity: 11.0,
                    size: 3000.0,
                    grav_max_dist: None,
                    is_base: true,
                    is_target: false,
                },
                PlanetSpec {
                    name: "Target".to_string(),
                    x: 4500.0,
                    y: 5000.0,
                    gravity: 7.5,
                    size: 2700.0,
                    grav_max_dist: None,
                    is_base: false,
                    is_target: true,
                },
            ],
            base_planet_angle: 340.0,
            base_width: 5.0,
            target_planet_angle: 170.0,
            target_width: 5.0,
        }
    }

    pub fn from_ron_str(data: &str) -> Result<Self, MapError> {
        Ok(ron::from_str(data)?)
    }

    /// Read and parse a RON map file. Validation happens on [`MapDefinition::build`].
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let data = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Check the map is playable.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.planets.is_empty() {
            return Err(MapError::NoPlanets);
        }
        for p in &self.planets {
            let bad = |field: &'static str, value: f64| MapError::InvalidPlanet {
                name: p.name.clone(),
                field,
                value,
            };
            if !p.x.is_finite() {
                return Err(bad("x", p.x));
            }
            if !p.y.is_finite() {
                return Err(bad("y", p.y));
            }
            if !(p.size.is_finite() && p.size > 0.0) {
                return Err(bad("size", p.size));
            }
            if !(p.gravity.is_finite() && p.gravity >= 0.0) {
                return Err(bad("gravity", p.gravity));
            }
            if let Some(d) = p.grav_max_dist {
                if !(d.is_finite() && d > 0.0) {
                    return Err(bad("grav_max_dist", d));
                }
            }
        }
        if !self.planets.iter().any(|p| p.is_base) {
            return Err(MapError::MissingBase);
        }
        if !self.planets.iter().any(|p| p.is_target) {
            return Err(MapError::MissingTarget);
        }
        for (field, value) in [
            ("base_planet_angle", self.base_planet_angle),
            ("target_planet_angle", self.target_planet_angle),
        ] {
            if !value.is_finite() {
                return Err(MapError::InvalidAngle { field, value });
            }
        }
        for (field, value) in [("base_width", self.base_width), ("target_width", self.target_width)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MapError::InvalidAngle { field, value });
            }
        }
        Ok(())
    }

    /// Validate and instantiate the planets, painting the base strip and target pad.
    pub fn build(&self, rocket: &RocketConfig) -> Result<MapLayout, MapError> {
        self.validate()?;

        let mut planets: Vec<Planet> = self
            .planets
            .iter()
            .map(|spec| {
                Planet::new(spec.name.clone(), DVec2::new(spec.x, spec.y), spec.size, spec.gravity)
                    .with_gravity_max_distance(spec.grav_max_dist.unwrap_or(DEFAULT_GRAVITY_MAX_DISTANCE))
                    .with_base(spec.is_base)
                    .with_target(spec.is_target)
            })
            .collect();

        // First flagged planet wins if a map marks several
        let base = planets.iter().position(|p| p.is_base).ok_or(MapError::MissingBase)?;
        let target = planets.iter().position(|p| p.is_target).ok_or(MapError::MissingTarget)?;

        let half_base = self.base_width / 2.0;
        planets[base].paint_surface(
            self.base_planet_angle - half_base,
            self.base_planet_angle + half_base,
            false,
        );
        let half_target = self.target_width / 2.0;
        planets[target].paint_surface(
            self.target_planet_angle - half_target,
            self.target_planet_angle + half_target,
            true,
        );

        let start_position = rocket_start_position(self.base_planet_angle, &planets[base], rocket);
        log::debug!(
            "Map built: {} planets, base {:?}, target {:?}",
            planets.len(),
            planets[base].name,
            planets[target].name
        );

        Ok(MapLayout {
            planets,
            base: PlanetId(base),
            target: PlanetId(target),
            start_position,
            start_rotation_deg: self.base_planet_angle,
        })
    }
}

impl Default for MapDefinition {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Planets ready for simulation plus where the rocket starts.
#[derive(Debug, Clone)]
pub struct MapLayout {
    pub planets: Vec<Planet>,
    pub base: PlanetId,
    pub target: PlanetId,
    pub start_position: DVec2,
    pub start_rotation_deg: f64,
}

impl MapLayout {
    pub fn planet(&self, id: PlanetId) -> &Planet {
        &self.planets[id.index()]
    }

    pub fn base_planet(&self) -> &Planet {
        self.planet(self.base)
    }

    pub fn target_planet(&self) -> &Planet {
        self.planet(self.target)
    }
}

/// Rocket centre parked on `planet` at surface angle `angle_deg`.
pub fn rocket_start_position(angle_deg: f64, planet: &Planet, rocket: &RocketConfig) -> DVec2 {
    let dir = planet.surface_point(angle_deg) - planet.position;
    let distance = dir.length() + rocket.surface_offset();
    planet.position + engine_core::unit(dir) * distance
}
