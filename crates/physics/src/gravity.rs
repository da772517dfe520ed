//! Single-dominant-body gravity field.
//!
//! Each point is pulled only by the planet whose centre is closest. Strength
//! falls off linearly with height above the surface and is zero beyond the
//! planet's gravity well.

use engine_core::unit;
use glam::DVec2;

use crate::planet::{Planet, PlanetId};

/// Divisor applied to the falloff curve, tuned for gameplay feel.
pub const GRAVITY_DAMPING: f64 = 75.0;

/// Gravity well height used when a planet does not specify one.
pub const DEFAULT_GRAVITY_MAX_DISTANCE: f64 = 1200.0;

/// Gravity strength at `distance` above a surface.
pub fn gravity_scalar(distance: f64, max_distance: f64, surface_gravity: f64) -> f64 {
    if distance > max_distance {
        return 0.0;
    }
    if distance <= 0.0 {
        return surface_gravity;
    }
    ((-(1.0 / (max_distance / 10.0)) * distance) + surface_gravity) / GRAVITY_DAMPING
}

/// Gravity strength `planet` exerts on `point`.
pub fn gravity_strength_at(point: DVec2, planet: &Planet) -> f64 {
    gravity_scalar(
        planet.surface_distance(point),
        planet.gravity_max_distance,
        planet.surface_gravity,
    )
}

/// Gravity acceleration `planet` exerts on `point`, pointing at its centre.
pub fn gravity_vector(point: DVec2, planet: &Planet) -> DVec2 {
    unit(planet.position - point) * gravity_strength_at(point, planet)
}

/// Planet with the nearest centre to `point` and that distance.
///
/// Ties go to the planet listed first.
pub fn closest_planet(point: DVec2, planets: &[Planet]) -> Option<(PlanetId, f64)> {
    let mut best: Option<(PlanetId, f64)> = None;
    for (i, planet) in planets.iter().enumerate() {
        let dist = point.distance(planet.position);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((PlanetId(i), dist));
        }
    }
    best
}
