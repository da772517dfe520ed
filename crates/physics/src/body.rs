//! Bodies advanced by the fixed-step integrator.

use glam::DVec2;

use crate::gravity::{closest_planet, gravity_vector};
use crate::planet::{Planet, PlanetId};

/// Anything the integrator moves each tick.
///
/// The integrator calls `update` (internal forces such as engines), applies
/// gravity while the body is airborne, then calls `integrate`.
pub trait SimulatedBody {
    /// World position of the body's reference point.
    fn position(&self) -> DVec2;

    fn velocity(&self) -> DVec2;

    /// Add a velocity change.
    fn apply_impulse(&mut self, delta_v: DVec2);

    /// Apply internally generated forces for this tick.
    fn update(&mut self);

    /// Move position and rotation by the current velocities.
    fn integrate(&mut self);

    /// Whether the body has left the ground and feels gravity.
    fn is_launched(&self) -> bool;

    /// Whether the body is resting on a surface.
    fn is_landed(&self) -> bool {
        false
    }

    /// Frozen bodies are skipped entirely.
    fn is_frozen(&self) -> bool {
        false
    }

    /// Collision probe points in world space.
    fn probe_points(&self) -> Vec<DVec2>;
}

/// What the integrator did to a body during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyStep {
    /// Planet that pulled the body, if gravity was applied.
    pub gravity_source: Option<PlanetId>,
    /// Gravity acceleration applied this tick.
    pub gravity: DVec2,
}

/// Advance `body` by one tick: update, gravity from the closest planet, integrate.
pub fn advance_body<B: SimulatedBody + ?Sized>(body: &mut B, planets: &[Planet]) -> BodyStep {
    let mut step = BodyStep::default();
    if body.is_frozen() {
        return step;
    }

    body.update();

    if body.is_launched() && !body.is_landed() {
        if let Some((id, _)) = closest_planet(body.position(), planets) {
            let gravity = gravity_vector(body.position(), &planets[id.index()]);
            body.apply_impulse(gravity);
            step.gravity_source = Some(id);
            step.gravity = gravity;
        }
    }

    body.integrate();
    step
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Point mass used to exercise the integrator without a rocket.
    struct Probe {
        position: DVec2,
        velocity: DVec2,
        launched: bool,
        frozen: bool,
        updates: u32,
    }

    impl Probe {
        fn at(position: DVec2) -> Self {
            Self { position, velocity: DVec2::ZERO, launched: true, frozen: false, updates: 0 }
        }
    }

    impl SimulatedBody for Probe {
        fn position(&self) -> DVec2 {
            self.position
        }
        fn velocity(&self) -> DVec2 {
            self.velocity
        }
        fn apply_impulse(&mut self, delta_v: DVec2) {
            self.velocity += delta_v;
        }
        fn update(&mut self) {
            self.updates += 1;
        }
        fn integrate(&mut self) {
            self.position += self.velocity;
        }
        fn is_launched(&self) -> bool {
            self.launched
        }
        fn is_frozen(&self) -> bool {
            self.frozen
        }
        fn probe_points(&self) -> Vec<DVec2> {
            vec![self.position]
        }
    }

    fn planets() -> Vec<Planet> {
        vec![
            Planet::new("A", DVec2::new(0.0, 0.0), 1000.0, 11.0),
            Planet::new("B", DVec2::new(5000.0, 0.0), 1000.0, 11.0),
        ]
    }

    #[test]
    fn airborne_body_falls_toward_closest_planet() {
        let planets = planets();
        let mut probe = Probe::at(DVec2::new(0.0, -700.0));
        let step = advance_body(&mut probe, &planets);
        assert_eq!(step.gravity_source, Some(PlanetId(0)));
        assert!(probe.velocity.y > 0.0);
        assert_eq!(probe.position, DVec2::new(0.0, -700.0) + probe.velocity);
        assert_eq!(probe.updates, 1);
    }

    #[test]
    fn grounded_body_ignores_gravity() {
        let planets = planets();
        let mut probe = Probe::at(DVec2::new(0.0, -700.0));
        probe.launched = false;
        let step = advance_body(&mut probe, &planets);
        assert_eq!(step.gravity_source, None);
        assert_eq!(probe.velocity, DVec2::ZERO);
        assert_eq!(probe.updates, 1);
    }

    #[test]
    fn frozen_body_is_untouched() {
        let planets = planets();
        let mut probe = Probe::at(DVec2::new(0.0, -700.0));
        probe.frozen = true;
        advance_body(&mut probe, &planets);
        assert_eq!(probe.updates, 0);
        assert_eq!(probe.position, DVec2::new(0.0, -700.0));
    }
}
