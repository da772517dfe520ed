//! Landing/crash classification against the planet surface.
//!
//! Velocity is split into a lateral part (along the surface tangent) and a
//! vertical part (toward the planet centre). Together with the tilt of the
//! rocket base these decide whether a contact is a landing or a crash.

use engine_core::{angle_between, clamp_rot, degs, normals, project};
use glam::DVec2;
use physics::{Planet, PlanetId};

use crate::config::LandingLimits;
use crate::rocket::Rocket;

/// Result of a surface contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Landed,
    Crashed,
}

/// Why a contact was a crash, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashReason {
    /// Base tilted more than 90 degrees: came in sideways or nose first.
    UpsideDown,
    AngleTooSteep,
    LateralTooHigh,
    VerticalTooHigh,
    Unknown,
}

impl CrashReason {
    /// Player-facing explanation.
    pub fn message(self) -> &'static str {
        match self {
            CrashReason::UpsideDown => "That's a weird way to land!",
            CrashReason::AngleTooSteep => "Your landing angle was too steep!",
            CrashReason::LateralTooHigh => "Your lateral velocity was too high!",
            CrashReason::VerticalTooHigh => "Your vertical velocity was too high!",
            CrashReason::Unknown => "What a mystery!",
        }
    }
}

/// Surface-relative motion of the rocket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    pub lateral_speed: f64,
    /// Positive when approaching the planet.
    pub vertical_speed: f64,
    pub landing_angle_deg: f64,
}

impl Kinematics {
    /// Measure the rocket's motion relative to `planet`.
    pub fn measure(rocket: &Rocket, planet: &Planet) -> Self {
        Self {
            lateral_speed: lateral_speed(planet.position, rocket.position, rocket.velocity),
            vertical_speed: vertical_speed(planet.position, rocket.position, rocket.velocity),
            landing_angle_deg: landing_angle(planet.position, rocket),
        }
    }
}

/// Speed along the surface tangent below the rocket.
pub fn lateral_speed(planet: DVec2, rocket: DVec2, velocity: DVec2) -> f64 {
    if velocity.length() == 0.0 {
        return 0.0;
    }
    let tangent = normals(planet - rocket)[0];
    project(velocity, tangent).abs()
}

/// Signed speed toward the planet centre.
pub fn vertical_speed(planet: DVec2, rocket: DVec2, velocity: DVec2) -> f64 {
    if velocity.length() == 0.0 {
        return 0.0;
    }
    project(velocity, planet - rocket)
}

/// Angle in degrees between the rocket base and the surface tangent.
pub fn landing_angle(planet: DVec2, rocket: &Rocket) -> f64 {
    let tangent = normals(planet - rocket.position)[0];
    let [_, rear_left, rear_right] = rocket.get_points();
    degs(angle_between(rear_left - rear_right, tangent))
}

/// Heading that points the nose straight away from the planet, in `[0, 360)`.
pub fn upright_rotation(planet: DVec2, rocket: DVec2) -> f64 {
    let angle = degs(angle_between(planet - rocket, DVec2::new(0.0, 5.0)));
    if planet.x > rocket.x {
        clamp_rot(-angle)
    } else {
        clamp_rot(angle)
    }
}

/// Landed unless any limit is exceeded.
pub fn classify(kinematics: &Kinematics, limits: &LandingLimits) -> Classification {
    if kinematics.lateral_speed.abs() > limits.lateral
        || kinematics.vertical_speed > limits.vertical
        || kinematics.landing_angle_deg > limits.angle
    {
        Classification::Crashed
    } else {
        Classification::Landed
    }
}

/// The most relevant reason for a crash.
pub fn crash_reason(kinematics: &Kinematics, limits: &LandingLimits) -> CrashReason {
    if kinematics.landing_angle_deg > 90.0 {
        CrashReason::UpsideDown
    } else if kinematics.landing_angle_deg > limits.angle {
        CrashReason::AngleTooSteep
    } else if kinematics.lateral_speed.abs() > limits.lateral {
        CrashReason::LateralTooHigh
    } else if kinematics.vertical_speed > limits.vertical {
        CrashReason::VerticalTooHigh
    } else {
        CrashReason::Unknown
    }
}

/// A resolved surface contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactOutcome {
    pub planet: PlanetId,
    pub lateral_speed: f64,
    pub vertical_speed: f64,
    pub landing_angle_deg: f64,
    pub classification: Classification,
    /// Set for crashes.
    pub crash_reason: Option<CrashReason>,
    /// Set for landings: heading the rocket settled at.
    pub final_rotation_deg: Option<f64>,
    /// Landed inside the target planet's landing pad.
    pub on_landing_pad: bool,
}

impl ContactOutcome {
    /// Classify a contact with `planet` and work out where the rocket would settle.
    pub fn evaluate(planet_id: PlanetId, planet: &Planet, rocket: &Rocket, limits: &LandingLimits) -> Self {
        let kinematics = Kinematics::measure(rocket, planet);
        let classification = classify(&kinematics, limits);
        let (crash_reason, final_rotation_deg, on_landing_pad) = match classification {
            Classification::Crashed => (Some(crash_reason(&kinematics, limits)), None, false),
            Classification::Landed => {
                let rotation = upright_rotation(planet.position, rocket.position);
                let on_pad = planet.is_target && planet.is_on_landing_pad(rotation);
                (None, Some(rotation), on_pad)
            }
        };
        Self {
            planet: planet_id,
            lateral_speed: kinematics.lateral_speed,
            vertical_speed: kinematics.vertical_speed,
            landing_angle_deg: kinematics.landing_angle_deg,
            classification,
            crash_reason,
            final_rotation_deg,
            on_landing_pad,
        }
    }

    pub fn is_crash(&self) -> bool {
        self.classification == Classification::Crashed
    }

    /// Landing on the target's pad wins; any crash loses.
    pub fn ends_game(&self) -> bool {
        self.is_crash() || self.on_landing_pad
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            lateral_speed: self.lateral_speed,
            vertical_speed: self.vertical_speed,
            landing_angle_deg: self.landing_angle_deg,
        }
    }
}
