//! Body-versus-planet contact detection.

use crate::body::SimulatedBody;
use crate::planet::{Planet, PlanetId};

/// First planet, in list order, touched by any of the body's probe points.
///
/// A body that has not launched is resting on its start planet and never
/// reports a collision.
pub fn check_collision<B: SimulatedBody + ?Sized>(body: &B, planets: &[Planet]) -> Option<PlanetId> {
    if !body.is_launched() {
        return None;
    }
    let points = body.probe_points();
    let hit = planets.iter().position(|planet| planet.collides_with(&points))?;
    log::trace!("Probe contact with planet {}", planets[hit].name);
    Some(PlanetId(hit))
}
