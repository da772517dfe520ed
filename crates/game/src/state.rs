//! Per-tick observable state handed to collaborators.

use glam::DVec2;
use physics::PlanetId;

use crate::events::SimEvent;
use crate::landing::{ContactOutcome, Kinematics};
use crate::rocket::{EngineKind, Rocket};

/// Session phase, derived from the rocket flags after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Parked on the base, waiting for the main engine.
    Idle,
    Flight,
    Landed,
    Destroyed,
}

impl Phase {
    pub fn of(rocket: &Rocket) -> Self {
        if rocket.destroyed() {
            Phase::Destroyed
        } else if rocket.launched() {
            Phase::Flight
        } else if rocket.landed() {
            Phase::Landed
        } else {
            Phase::Idle
        }
    }
}

/// Copy of the rocket state for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocketSnapshot {
    pub position: DVec2,
    pub velocity: DVec2,
    pub rotation_deg: f64,
    pub rotational_velocity: f64,
    pub fuel: f64,
    pub launched: bool,
    pub landed: bool,
    pub destroyed: bool,
    /// Engine on/off flags in [`EngineKind::ALL`] order, for exhaust sprites.
    pub engines_on: [bool; 5],
}

impl RocketSnapshot {
    pub fn of(rocket: &Rocket) -> Self {
        Self {
            position: rocket.position,
            velocity: rocket.velocity,
            rotation_deg: rocket.rotation_deg,
            rotational_velocity: rocket.rotational_velocity,
            fuel: rocket.fuel(),
            launched: rocket.launched(),
            landed: rocket.landed(),
            destroyed: rocket.destroyed(),
            engines_on: EngineKind::ALL.map(|kind| rocket.is_engine_on(kind)),
        }
    }

    pub fn is_engine_on(&self, kind: EngineKind) -> bool {
        EngineKind::ALL
            .iter()
            .position(|k| *k == kind)
            .is_some_and(|i| self.engines_on[i])
    }
}

/// Everything a frontend needs after one logic tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationTickResult {
    pub tick: u64,
    pub phase: Phase,
    pub rocket: RocketSnapshot,
    pub closest_planet: Option<PlanetId>,
    /// Distance from the rocket to the closest planet's centre.
    pub closest_planet_distance: f64,
    pub speed: f64,
    pub lateral_speed: f64,
    pub vertical_speed: f64,
    pub landing_angle_deg: f64,
    /// Upright heading relative to the closest planet.
    pub optimal_rotation_deg: f64,
    pub fuel_percent: f64,
    /// Set on the tick a contact was resolved.
    pub contact: Option<ContactOutcome>,
    /// Latched once a crash or a winning landing happens, until reset.
    pub game_over: bool,
    /// Set once nothing is left to animate after game over.
    pub stop: bool,
    pub events: Vec<SimEvent>,
}

impl SimulationTickResult {
    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            lateral_speed: self.lateral_speed,
            vertical_speed: self.vertical_speed,
            landing_angle_deg: self.landing_angle_deg,
        }
    }

    /// Whether the landing HUD (speeds, angle) should be shown.
    pub fn show_landing_info(&self, threshold: f64) -> bool {
        self.closest_planet.is_some() && self.closest_planet_distance < threshold
    }
}
