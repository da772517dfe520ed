//! Gravitating planets and their painted surface arcs.

use engine_core::{clamp_rot, rads};
use glam::DVec2;

use crate::gravity::DEFAULT_GRAVITY_MAX_DISTANCE;

/// Index of a planet in the session's planet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanetId(pub usize);

impl PlanetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A painted angular range of a planet surface, in degrees (0 = up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceArc {
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub is_landing_pad: bool,
}

impl SurfaceArc {
    /// Arc of `width` degrees centred on `angle`.
    pub fn centered(angle: f64, width: f64, is_landing_pad: bool) -> Self {
        Self {
            start_angle_deg: angle - width / 2.0,
            end_angle_deg: angle - width / 2.0 + width,
            is_landing_pad,
        }
    }

    pub fn width(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }

    pub fn center(&self) -> f64 {
        self.start_angle_deg + self.width() / 2.0
    }

    /// Whether `angle` lies in `[start, end)`, treating angles modulo 360.
    pub fn contains(&self, angle: f64) -> bool {
        let width = self.width();
        if width <= 0.0 {
            return false;
        }
        if width >= 360.0 {
            return true;
        }
        clamp_rot(angle - self.start_angle_deg) < width
    }
}

/// A circular gravitating body.
#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub position: DVec2,
    /// Collision radius (half the planet size).
    pub radius: f64,
    /// Gravity at and below the surface.
    pub surface_gravity: f64,
    /// Height above the surface beyond which gravity is zero.
    pub gravity_max_distance: f64,
    pub is_base: bool,
    pub is_target: bool,
    arcs: Vec<SurfaceArc>,
}

impl Planet {
    /// Create a planet from its full `size` (diameter) and surface gravity.
    pub fn new(name: impl Into<String>, position: DVec2, size: f64, surface_gravity: f64) -> Self {
        Self {
            name: name.into(),
            position,
            radius: size / 2.0,
            surface_gravity,
            gravity_max_distance: DEFAULT_GRAVITY_MAX_DISTANCE,
            is_base: false,
            is_target: false,
            arcs: Vec::new(),
        }
    }

    pub fn with_gravity_max_distance(mut self, distance: f64) -> Self {
        self.gravity_max_distance = distance;
        self
    }

    pub fn with_base(mut self, is_base: bool) -> Self {
        self.is_base = is_base;
        self
    }

    pub fn with_target(mut self, is_target: bool) -> Self {
        self.is_target = is_target;
        self
    }

    /// World point on the surface at `angle_deg` (0 points up, clockwise on screen).
    pub fn surface_point(&self, angle_deg: f64) -> DVec2 {
        let theta = rads(angle_deg - 90.0);
        self.position + DVec2::new(theta.cos(), theta.sin()) * self.radius
    }

    /// True if any world-space probe point is on or inside the surface.
    pub fn collides_with(&self, points: &[DVec2]) -> bool {
        points
            .iter()
            .any(|p| p.distance(self.position) <= self.radius)
    }

    /// Distance from `point` to the surface (negative inside).
    pub fn surface_distance(&self, point: DVec2) -> f64 {
        point.distance(self.position) - self.radius
    }

    /// Paint an arc of the surface.
    pub fn paint_surface(&mut self, start_angle_deg: f64, end_angle_deg: f64, is_landing_pad: bool) {
        self.arcs.push(SurfaceArc {
            start_angle_deg,
            end_angle_deg,
            is_landing_pad,
        });
    }

    pub fn surface_arcs(&self) -> &[SurfaceArc] {
        &self.arcs
    }

    /// The first painted arc marked as a landing pad.
    pub fn landing_pad(&self) -> Option<&SurfaceArc> {
        self.arcs.iter().find(|a| a.is_landing_pad)
    }

    /// Surface point at the centre of the landing pad, for target indicators.
    pub fn landing_pad_point(&self) -> Option<DVec2> {
        self.landing_pad().map(|pad| self.surface_point(pad.center()))
    }

    /// Whether a surface angle falls on this planet's landing pad.
    pub fn is_on_landing_pad(&self, angle_deg: f64) -> bool {
        self.landing_pad().is_some_and(|pad| pad.contains(angle_deg))
    }
}
