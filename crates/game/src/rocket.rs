//! The player rocket: kinematics, fuel and the five-engine state machine.

use engine_core::{clamp_rot, rads, rotate_around_point};
use glam::DVec2;
use physics::SimulatedBody;

use crate::config::RocketConfig;

/// The five engine slots on the rocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Main,
    Reverse1,
    Reverse2,
    Left,
    Right,
}

impl EngineKind {
    pub const ALL: [EngineKind; 5] = [
        EngineKind::Main,
        EngineKind::Reverse1,
        EngineKind::Reverse2,
        EngineKind::Left,
        EngineKind::Right,
    ];

    fn index(self) -> usize {
        match self {
            EngineKind::Main => 0,
            EngineKind::Reverse1 => 1,
            EngineKind::Reverse2 => 2,
            EngineKind::Left => 3,
            EngineKind::Right => 4,
        }
    }

    /// Nozzle position on the sprite, used for exhaust placement.
    fn mount_offset(self, width: f64) -> DVec2 {
        match self {
            EngineKind::Main => DVec2::new(width / 2.0, 60.0),
            EngineKind::Reverse1 => DVec2::new(7.0, 10.0),
            EngineKind::Reverse2 => DVec2::new(width - 7.0, 10.0),
            EngineKind::Left => DVec2::new(5.0, 12.0),
            EngineKind::Right => DVec2::new(width - 5.0, 12.0),
        }
    }
}

/// Player intents, each driving one or more engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerControl {
    Forward,
    Reverse,
    RotateLeft,
    RotateRight,
}

impl PlayerControl {
    /// Engines fired by this control. Rotating right fires the left-side thruster and vice versa.
    pub fn engines(self) -> &'static [EngineKind] {
        match self {
            PlayerControl::Forward => &[EngineKind::Main],
            PlayerControl::Reverse => &[EngineKind::Reverse1, EngineKind::Reverse2],
            PlayerControl::RotateLeft => &[EngineKind::Right],
            PlayerControl::RotateRight => &[EngineKind::Left],
        }
    }
}

/// A single engine on the rocket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSlot {
    pub kind: EngineKind,
    pub mount_offset: DVec2,
    /// Thrust per tick; also the fuel burned per tick.
    pub thrust: f64,
    pub angle_deg: f64,
    is_on: bool,
}

impl EngineSlot {
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

/// The player-controlled rocket.
#[derive(Debug, Clone)]
pub struct Rocket {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Heading in degrees, kept in `[0, 360)`.
    pub rotation_deg: f64,
    pub rotational_velocity: f64,
    pub(crate) fuel: f64,
    start_fuel: f64,
    pub(crate) launched: bool,
    pub(crate) landed: bool,
    destroyed: bool,
    probe_points_local: [DVec2; 3],
    engines: [EngineSlot; 5],
}

impl Rocket {
    /// Create a rocket parked at `position` with heading `rotation_deg`.
    pub fn new(config: &RocketConfig, position: DVec2, rotation_deg: f64) -> Self {
        let width = config.scaled_width();
        let engines = EngineKind::ALL.map(|kind| {
            let engine = match kind {
                EngineKind::Main => config.engines.main,
                EngineKind::Reverse1 | EngineKind::Reverse2 => config.engines.reverse,
                EngineKind::Left => config.engines.left,
                EngineKind::Right => config.engines.right,
            };
            EngineSlot {
                kind,
                mount_offset: kind.mount_offset(width),
                thrust: engine.thrust,
                angle_deg: engine.angle,
                is_on: false,
            }
        });
        let start_fuel = config.start_fuel.max(0.0);
        Self {
            position,
            velocity: DVec2::ZERO,
            rotation_deg: clamp_rot(rotation_deg),
            rotational_velocity: 0.0,
            fuel: start_fuel,
            start_fuel,
            launched: false,
            landed: false,
            destroyed: false,
            probe_points_local: config.probe_points(),
            engines,
        }
    }

    pub fn engine(&self, kind: EngineKind) -> &EngineSlot {
        &self.engines[kind.index()]
    }

    pub fn engines(&self) -> &[EngineSlot; 5] {
        &self.engines
    }

    pub fn is_engine_on(&self, kind: EngineKind) -> bool {
        self.engine(kind).is_on
    }

    /// Override the thrust of one engine. Thrust is a magnitude, so negative
    /// or non-finite values are refused.
    pub fn set_engine_thrust(&mut self, kind: EngineKind, thrust: f64) -> bool {
        if !(thrust.is_finite() && thrust >= 0.0) {
            return false;
        }
        self.engines[kind.index()].thrust = thrust;
        true
    }

    /// Power an engine on or off. Returns whether the command was accepted.
    ///
    /// Only the main engine works before launch, nothing can be powered on
    /// without fuel, and a destroyed rocket ignores everything.
    pub fn send_signal(&mut self, kind: EngineKind, powered: bool) -> bool {
        if self.destroyed {
            return false;
        }
        if !(self.launched || kind == EngineKind::Main) {
            return false;
        }
        if self.fuel <= 0.0 && powered {
            return false;
        }
        self.engines[kind.index()].is_on = powered;
        true
    }

    /// Power every engine off.
    pub fn cut_engines(&mut self) {
        for engine in &mut self.engines {
            engine.is_on = false;
        }
    }

    /// Burn fuel, cutting every engine once the tank is empty.
    pub fn use_fuel(&mut self, amount: f64) {
        self.fuel = (self.fuel - amount).max(0.0);
        if self.fuel <= 0.0 {
            self.cut_engines();
        }
    }

    /// Push along the rocket's axis; negative force drives the nose forward.
    pub fn apply_forward_force(&mut self, force: f64) {
        let thrust = rotate_around_point(rads(self.rotation_deg), DVec2::ZERO, DVec2::new(0.0, force));
        self.velocity += thrust;
    }

    /// Apply engine forces and burn fuel for one tick.
    pub fn update(&mut self) {
        if self.engine(EngineKind::Main).is_on {
            self.launched = true;
            self.landed = false;
            let thrust = self.engine(EngineKind::Main).thrust;
            self.use_fuel(thrust);
            self.apply_forward_force(-thrust);
        }
        // Reverse2 mirrors Reverse1 visually; only Reverse1 burns and pushes
        if self.engine(EngineKind::Reverse1).is_on {
            let thrust = self.engine(EngineKind::Reverse1).thrust;
            self.use_fuel(thrust);
            self.apply_forward_force(thrust);
        }
        if self.engine(EngineKind::Left).is_on {
            let thrust = self.engine(EngineKind::Left).thrust;
            self.use_fuel(thrust);
            self.rotational_velocity += thrust;
        }
        if self.engine(EngineKind::Right).is_on {
            let thrust = self.engine(EngineKind::Right).thrust;
            self.use_fuel(thrust);
            self.rotational_velocity -= thrust;
        }
    }

    /// Zero linear and angular velocity. Gravity still applies while launched.
    pub fn stop(&mut self) {
        self.velocity = DVec2::ZERO;
        self.rotational_velocity = 0.0;
    }

    /// Freeze and cut the engines for good.
    pub fn destroy(&mut self) {
        self.stop();
        self.cut_engines();
        self.destroyed = true;
    }

    /// Settle on a surface with the given heading.
    pub fn land(&mut self, rotation_deg: f64) {
        self.stop();
        self.rotation_deg = clamp_rot(rotation_deg);
        self.launched = false;
        self.landed = true;
    }

    /// Probe points rotated by the current heading, relative to the rocket position.
    pub fn get_points(&self) -> [DVec2; 3] {
        let rotation = rads(self.rotation_deg);
        self.probe_points_local
            .map(|p| rotate_around_point(rotation, DVec2::ZERO, p))
    }

    /// Probe points in world space.
    pub fn world_points(&self) -> [DVec2; 3] {
        self.get_points().map(|p| p + self.position)
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn start_fuel(&self) -> f64 {
        self.start_fuel
    }

    /// Remaining fuel as a percentage of the starting load.
    pub fn fuel_percent(&self) -> f64 {
        if self.start_fuel > 0.0 {
            self.fuel / self.start_fuel * 100.0
        } else {
            0.0
        }
    }

    pub fn launched(&self) -> bool {
        self.launched
    }

    pub fn landed(&self) -> bool {
        self.landed
    }

    pub fn destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }
}

impl SimulatedBody for Rocket {
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
        Rocket::update(self);
    }

    fn integrate(&mut self) {
        self.position += self.velocity;
        self.rotation_deg = clamp_rot(self.rotation_deg + self.rotational_velocity);
    }

    fn is_launched(&self) -> bool {
        self.launched
    }

    fn is_landed(&self) -> bool {
        self.landed
    }

    fn is_frozen(&self) -> bool {
        self.destroyed
    }

    fn probe_points(&self) -> Vec<DVec2> {
        self.world_points().to_vec()
    }
}
