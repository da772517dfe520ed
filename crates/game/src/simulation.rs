//! The game session: one rocket, one map, stepped at a fixed rate.
//!
//! Each tick runs engines, gravity from the closest planet and integration,
//! then tests for surface contact and resolves it as a landing or a crash.
//! Explosions and delayed messages are counted in ticks, so a session is
//! fully deterministic for a given command sequence.

use glam::DVec2;
use physics::{advance_body, check_collision, closest_planet, Planet, PlanetId};

use crate::config::GameConfig;
use crate::effects::{EffectQueue, Explosion};
use crate::error::SimError;
use crate::events::{MessageQueue, SimEvent, UiMessage};
use crate::landing::{upright_rotation, Classification, ContactOutcome, CrashReason, Kinematics};
use crate::map::{MapDefinition, MapLayout};
use crate::rocket::{EngineKind, PlayerControl, Rocket};
use crate::state::{Phase, RocketSnapshot, SimulationTickResult};

pub struct Session {
    config: GameConfig,
    map: MapDefinition,
    layout: MapLayout,
    rocket: Rocket,
    effects: EffectQueue,
    messages: MessageQueue,
    tick: u64,
    game_over: bool,
    won: bool,
    /// Contact that destroyed the rocket, with the speed at impact.
    crash: Option<(ContactOutcome, f64)>,
    last_valid_position: DVec2,
    last_valid_rotation: f64,
    poisoned: Option<String>,
}

impl Session {
    /// Build a session on `map`. Fails if the map is not playable.
    pub fn new(config: GameConfig, map: MapDefinition) -> Result<Self, SimError> {
        let layout = map.build(&config.rocket)?;
        let rocket = Rocket::new(&config.rocket, layout.start_position, layout.start_rotation_deg);
        log::info!(
            "Session ready: {} planets, starting on {}",
            layout.planets.len(),
            layout.base_planet().name
        );
        Ok(Self {
            last_valid_position: rocket.position,
            last_valid_rotation: rocket.rotation_deg,
            config,
            map,
            layout,
            rocket,
            effects: EffectQueue::new(),
            messages: MessageQueue::new(),
            tick: 0,
            game_over: false,
            won: false,
            crash: None,
            poisoned: None,
        })
    }

    /// Discard all state and start over on `map`. On error the current session is untouched.
    pub fn reset(&mut self, map: MapDefinition) -> Result<(), SimError> {
        let fresh = Session::new(self.config.clone(), map)?;
        // Keep the handle counter so sinks never see a handle twice
        let mut effects = std::mem::take(&mut self.effects);
        effects.clear();
        *self = fresh;
        self.effects = effects;
        Ok(())
    }

    /// Reset on the current map.
    pub fn restart(&mut self) -> Result<(), SimError> {
        self.reset(self.map.clone())
    }

    /// Power an engine on or off. Returns whether the command took effect.
    ///
    /// After game over only power-off commands are accepted.
    pub fn send_engine_command(&mut self, kind: EngineKind, powered: bool) -> bool {
        if self.poisoned.is_some() || (self.game_over && powered) {
            log::trace!("Ignored {:?} -> {} after game over", kind, powered);
            return false;
        }
        let accepted = self.rocket.send_signal(kind, powered);
        if !accepted {
            log::trace!("Ignored {:?} -> {}", kind, powered);
        }
        accepted
    }

    /// Press or release a player control. Returns whether any engine accepted it.
    pub fn send_control(&mut self, control: PlayerControl, pressed: bool) -> bool {
        let mut accepted = false;
        for kind in control.engines() {
            accepted |= self.send_engine_command(*kind, pressed);
        }
        accepted
    }

    /// Override the thrust of one engine for the rest of this session.
    /// Returns false for negative or non-finite thrust.
    pub fn set_engine_thrust(&mut self, kind: EngineKind, thrust: f64) -> bool {
        let accepted = self.rocket.set_engine_thrust(kind, thrust);
        if !accepted {
            log::trace!("Ignored thrust {} for {:?}", thrust, kind);
        }
        accepted
    }

    /// Advance one logic tick.
    pub fn step(&mut self) -> Result<SimulationTickResult, SimError> {
        if let Some(reason) = &self.poisoned {
            return Err(SimError::Poisoned(reason.clone()));
        }
        self.tick += 1;
        let mut events = Vec::new();

        let was_launched = self.rocket.launched();
        let had_fuel = self.rocket.fuel() > 0.0;
        advance_body(&mut self.rocket, &self.layout.planets);
        self.check_invariants()?;
        self.last_valid_position = self.rocket.position;
        self.last_valid_rotation = self.rocket.rotation_deg;

        if !was_launched && self.rocket.launched() {
            let planet = closest_planet(self.rocket.position, &self.layout.planets).map(|(id, _)| id);
            log::info!("Launched at tick {}", self.tick);
            events.push(SimEvent::Launched { planet });
        }
        if had_fuel && self.rocket.fuel() <= 0.0 {
            log::info!("Out of fuel");
            events.push(SimEvent::FuelExhausted);
        }

        for handle in self.effects.update() {
            events.push(SimEvent::EffectFinished(handle));
        }

        let closest = closest_planet(self.rocket.position, &self.layout.planets);
        let mut kinematics = match closest {
            Some((id, _)) => Kinematics::measure(&self.rocket, self.layout.planet(id)),
            None => Kinematics::default(),
        };
        let mut speed = self.rocket.speed();

        let mut contact = None;
        if !(self.rocket.destroyed() || self.game_over) {
            if let Some(id) = check_collision(&self.rocket, &self.layout.planets) {
                let outcome =
                    ContactOutcome::evaluate(id, self.layout.planet(id), &self.rocket, &self.config.limits);
                self.resolve_contact(&outcome, speed, &mut events);
                contact = Some(outcome);
            }
        }

        if let Some((crash, crash_speed)) = &self.crash {
            kinematics = crash.kinematics();
            speed = *crash_speed;
        }

        for message in self.messages.update() {
            events.push(SimEvent::Message(message));
        }

        let optimal_rotation_deg = closest
            .map(|(id, _)| upright_rotation(self.layout.planet(id).position, self.rocket.position))
            .unwrap_or(self.rocket.rotation_deg);

        Ok(SimulationTickResult {
            tick: self.tick,
            phase: Phase::of(&self.rocket),
            rocket: RocketSnapshot::of(&self.rocket),
            closest_planet: closest.map(|(id, _)| id),
            closest_planet_distance: closest.map_or(f64::INFINITY, |(_, d)| d),
            speed,
            lateral_speed: kinematics.lateral_speed,
            vertical_speed: kinematics.vertical_speed,
            landing_angle_deg: kinematics.landing_angle_deg,
            optimal_rotation_deg,
            fuel_percent: self.rocket.fuel_percent(),
            contact,
            game_over: self.game_over,
            stop: self.game_over && self.effects.is_empty() && self.messages.pending_count() == 0,
            events,
        })
    }

    fn resolve_contact(&mut self, outcome: &ContactOutcome, speed: f64, events: &mut Vec<SimEvent>) {
        let planet_name = self.layout.planet(outcome.planet).name.clone();
        match outcome.classification {
            Classification::Crashed => {
                let reason = outcome.crash_reason.unwrap_or(CrashReason::Unknown);
                log::info!(
                    "Crashed on {} (lateral {:.2}, vertical {:.2}, angle {:.1}): {}",
                    planet_name,
                    outcome.lateral_speed,
                    outcome.vertical_speed,
                    outcome.landing_angle_deg,
                    reason.message()
                );
                self.rocket.destroy();
                self.crash = Some((*outcome, speed));
                let request = self
                    .effects
                    .spawn_explosion(self.rocket.position, self.config.explosion_frames);
                self.messages
                    .schedule(UiMessage::crash(reason), self.config.message_delay_ticks());
                events.push(SimEvent::Crashed {
                    planet: outcome.planet,
                    reason,
                    position: self.rocket.position,
                });
                events.push(SimEvent::EffectRequested(request));
                self.finish(false, events);
            }
            Classification::Landed => {
                let rotation = outcome.final_rotation_deg.unwrap_or(self.rocket.rotation_deg);
                self.rocket.land(rotation);
                log::info!("Landed on {} at {:.1} degrees", planet_name, self.rocket.rotation_deg);
                events.push(SimEvent::Landed {
                    planet: outcome.planet,
                    rotation_deg: self.rocket.rotation_deg,
                    on_landing_pad: outcome.on_landing_pad,
                });
                if outcome.on_landing_pad {
                    self.rocket.cut_engines();
                    self.messages.schedule(
                        UiMessage::win(self.rocket.fuel_percent()),
                        self.config.message_delay_ticks(),
                    );
                    self.finish(true, events);
                }
            }
        }
    }

    fn finish(&mut self, won: bool, events: &mut Vec<SimEvent>) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.won = won;
        log::info!("Game over: {}", if won { "target reached" } else { "rocket lost" });
        events.push(SimEvent::GameOver { won });
    }

    /// Repair a broken rocket state, or poison the session if that is impossible.
    fn check_invariants(&mut self) -> Result<(), SimError> {
        let fuel = self.rocket.fuel;
        let start_fuel = self.rocket.start_fuel();
        if !(fuel.is_finite() && (0.0..=start_fuel).contains(&fuel)) {
            log::error!("Fuel {} outside [0, {}], clamping", fuel, start_fuel);
            self.rocket.fuel = if fuel.is_finite() { fuel.clamp(0.0, start_fuel) } else { 0.0 };
            // Re-applies the empty-tank cut-off
            self.rocket.use_fuel(0.0);
            self.rocket.stop();
            return Err(SimError::InvariantViolation(format!(
                "fuel {} outside [0, {}]",
                fuel, start_fuel
            )));
        }

        let r = &self.rocket;
        let finite = r.position.is_finite()
            && r.velocity.is_finite()
            && r.rotation_deg.is_finite()
            && r.rotational_velocity.is_finite();
        if finite {
            return Ok(());
        }

        log::error!(
            "Non-finite rocket state at tick {}: position {:?}, velocity {:?}",
            self.tick,
            r.position,
            r.velocity
        );
        if !(self.last_valid_position.is_finite() && self.last_valid_rotation.is_finite()) {
            let reason = format!("no valid rocket state to restore at tick {}", self.tick);
            log::error!("Session poisoned: {}", reason);
            self.poisoned = Some(reason.clone());
            return Err(SimError::Poisoned(reason));
        }
        self.rocket.position = self.last_valid_position;
        self.rocket.rotation_deg = self.last_valid_rotation;
        self.rocket.stop();
        Err(SimError::InvariantViolation("non-finite kinematics".to_string()))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &MapDefinition {
        &self.map
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn planets(&self) -> &[Planet] {
        &self.layout.planets
    }

    pub fn planet(&self, id: PlanetId) -> &Planet {
        self.layout.planet(id)
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn phase(&self) -> Phase {
        Phase::of(&self.rocket)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True once the rocket has landed on the target's pad.
    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    pub fn active_effects(&self) -> &[Explosion] {
        self.effects.active()
    }

    pub fn messages(&self) -> &MessageQueue {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::unit;

    const EPS: f64 = 1e-6;

    fn session() -> Session {
        Session::new(GameConfig::default(), MapDefinition::builtin()).unwrap()
    }

    /// Put the rocket upright just above `planet` at `angle_deg`, falling straight in at `speed`.
    fn drop_onto(s: &mut Session, planet: PlanetId, angle_deg: f64, speed: f64) {
        let p = s.layout.planet(planet).clone();
        let normal = unit(p.surface_point(angle_deg) - p.position);
        s.rocket.position = p.position + normal * (p.radius + s.config.rocket.surface_offset() + 0.5);
        s.rocket.rotation_deg = angle_deg;
        s.rocket.velocity = -normal * speed;
        s.rocket.rotational_velocity = 0.0;
        s.rocket.launched = true;
        s.rocket.landed = false;
    }

    fn step_until_contact(s: &mut Session) -> SimulationTickResult {
        for _ in 0..100 {
            let result = s.step().unwrap();
            if result.contact.is_some() {
                return result;
            }
        }
        panic!("no contact within 100 ticks");
    }

    #[test]
    fn idle_rocket_stays_put() {
        let mut s = session();
        let start = s.rocket().position;
        for _ in 0..30 {
            let result = s.step().unwrap();
            assert_eq!(result.phase, Phase::Idle);
            assert!(result.contact.is_none());
        }
        assert_eq!(s.rocket().position, start);
        assert_eq!(s.tick(), 30);
    }

    #[test]
    fn liftoff_from_base() {
        let mut s = session();
        assert!(!s.send_control(PlayerControl::RotateLeft, true));
        assert!(s.send_control(PlayerControl::Forward, true));
        let result = s.step().unwrap();
        assert_eq!(result.phase, Phase::Flight);
        assert!(result.events.iter().any(|e| matches!(e, SimEvent::Launched { planet: Some(PlanetId(0)) })));
        assert!((result.rocket.fuel - 274.6).abs() < EPS);
        for _ in 0..20 {
            let result = s.step().unwrap();
            assert!(result.contact.is_none());
        }
        let base = s.layout().base_planet();
        assert!(base.surface_distance(s.rocket().position) > s.config().rocket.surface_offset() + 10.0);
        // Now non-main engines respond
        assert!(s.send_control(PlayerControl::RotateLeft, true));
    }

    #[test]
    fn fuel_zero_main_command_is_ignored() {
        let mut s = session();
        s.rocket.use_fuel(1_000.0);
        assert!(!s.send_engine_command(EngineKind::Main, true));
        let result = s.step().unwrap();
        assert_eq!(result.phase, Phase::Idle);
        assert_eq!(result.fuel_percent, 0.0);
    }

    #[test]
    fn gentle_return_to_base_lands() {
        let mut s = session();
        let base = s.layout().base;
        drop_onto(&mut s, base, 20.0, 1.0);
        let result = step_until_contact(&mut s);
        let contact = result.contact.unwrap();
        assert_eq!(contact.classification, Classification::Landed);
        assert_eq!(contact.planet, base);
        assert!(!contact.on_landing_pad);
        assert_eq!(result.phase, Phase::Landed);
        assert!(!result.game_over);
        assert_eq!(s.rocket().velocity, DVec2::ZERO);
        let rot = s.rocket().rotation_deg;
        assert!((rot - 20.0).abs() < EPS, "settled at {}", rot);
        assert!(result.events.iter().any(|e| matches!(e, SimEvent::Landed { on_landing_pad: false, .. })));

        // Landed rockets feel no gravity and stay put
        let pos = s.rocket().position;
        for _ in 0..10 {
            assert_eq!(s.step().unwrap().phase, Phase::Landed);
        }
        assert_eq!(s.rocket().position, pos);
    }

    #[test]
    fn hard_impact_explodes_then_stops() {
        let mut s = session();
        let base = s.layout().base;
        drop_onto(&mut s, base, 300.0, 5.0);
        let result = step_until_contact(&mut s);
        let contact = result.contact.unwrap();
        assert!(contact.is_crash());
        assert_eq!(contact.crash_reason, Some(CrashReason::VerticalTooHigh));
        assert_eq!(result.phase, Phase::Destroyed);
        assert!(result.game_over);
        assert!(!result.stop);
        assert!(result.events.iter().any(|e| matches!(e, SimEvent::GameOver { won: false })));
        let handle = result
            .events
            .iter()
            .find_map(|e| match e {
                SimEvent::EffectRequested(req) => Some(req.handle),
                _ => None,
            })
            .unwrap();
        let crash_tick = result.tick;
        let crash_vertical = result.vertical_speed;
        let crash_position = s.rocket().position;

        assert!(!s.send_engine_command(EngineKind::Main, true));

        let mut message_tick = None;
        let mut finished_tick = None;
        for _ in 0..40 {
            let r = s.step().unwrap();
            assert_eq!(r.phase, Phase::Destroyed);
            assert_eq!(r.vertical_speed, crash_vertical);
            assert!(r.contact.is_none());
            for e in &r.events {
                match e {
                    SimEvent::Message(msg) => {
                        assert_eq!(msg.header, "You exploded!");
                        assert_eq!(msg.body, "Your vertical velocity was too high!");
                        message_tick = Some(r.tick);
                    }
                    SimEvent::EffectFinished(h) => {
                        assert_eq!(*h, handle);
                        finished_tick = Some(r.tick);
                    }
                    _ => {}
                }
            }
            if r.tick < crash_tick + 26 {
                assert!(!r.stop);
            } else {
                assert!(r.stop);
            }
        }
        assert_eq!(message_tick, Some(crash_tick + 9));
        assert_eq!(finished_tick, Some(crash_tick + 26));
        assert_eq!(s.rocket().position, crash_position);
        assert!(s.active_effects().is_empty());
    }

    #[test]
    fn landing_on_target_pad_wins() {
        let mut s = session();
        let target = s.layout().target;
        drop_onto(&mut s, target, 170.0, 1.0);
        s.rocket.fuel = 137.5;
        let result = step_until_contact(&mut s);
        let contact = result.contact.unwrap();
        assert_eq!(contact.classification, Classification::Landed);
        assert!(contact.on_landing_pad);
        assert!(result.game_over);
        assert!(s.is_won());
        assert!(result.events.iter().any(|e| matches!(e, SimEvent::GameOver { won: true })));
        assert!(!s.send_control(PlayerControl::Forward, true));

        let landed_tick = result.tick;
        let mut win = None;
        while win.is_none() {
            let r = s.step().unwrap();
            win = r.events.iter().find_map(|e| match e {
                SimEvent::Message(msg) => Some((r.tick, msg.clone(), r.stop)),
                _ => None,
            });
        }
        let (tick, msg, stop) = win.unwrap();
        assert_eq!(tick, landed_tick + 9);
        assert_eq!(msg.header, "A winner is you!");
        assert_eq!(msg.body, "You reached the target with 50% fuel.");
        assert!(stop);
    }

    #[test]
    fn landing_on_target_outside_pad_continues() {
        let mut s = session();
        let target = s.layout().target;
        drop_onto(&mut s, target, 100.0, 1.0);
        let result = step_until_contact(&mut s);
        let contact = result.contact.unwrap();
        assert_eq!(contact.classification, Classification::Landed);
        assert!(!contact.on_landing_pad);
        assert!(!result.game_over);
        assert!(s.send_control(PlayerControl::Forward, true));
        // Probe points start slightly below the surface, so liftoff re-lands for a tick or two
        let mut phase = Phase::Landed;
        for _ in 0..10 {
            phase = s.step().unwrap().phase;
            if phase == Phase::Flight {
                break;
            }
        }
        assert_eq!(phase, Phase::Flight);
    }

    #[test]
    fn reset_discards_everything() {
        let mut s = session();
        let base = s.layout().base;
        drop_onto(&mut s, base, 0.0, 8.0);
        step_until_contact(&mut s);
        assert!(s.is_game_over());

        s.restart().unwrap();
        assert_eq!(s.tick(), 0);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(!s.is_game_over());
        assert!(s.active_effects().is_empty());
        assert_eq!(s.messages().pending_count(), 0);
        assert_eq!(s.rocket().fuel(), 275.0);
        let result = s.step().unwrap();
        assert!(result.events.is_empty());
        assert!(!result.game_over);
    }

    #[test]
    fn failed_reset_keeps_old_session() {
        let mut s = session();
        s.send_control(PlayerControl::Forward, true);
        s.step().unwrap();
        let mut bad = MapDefinition::builtin();
        bad.planets.retain(|p| !p.is_target);
        let err = s.reset(bad).unwrap_err();
        assert!(matches!(err, SimError::Map(_)));
        assert!(err.is_fatal());
        assert_eq!(s.tick(), 1);
        assert_eq!(s.phase(), Phase::Flight);
    }

    #[test]
    fn fuel_out_of_range_is_repaired() {
        let mut s = session();
        s.send_control(PlayerControl::Forward, true);
        s.step().unwrap();
        assert_ne!(s.rocket().velocity, DVec2::ZERO);
        s.rocket.fuel = 500.0;
        let err = s.step().unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
        assert!(!err.is_fatal());
        assert_eq!(s.rocket().fuel(), 275.0);
        assert_eq!(s.rocket().velocity, DVec2::ZERO);
        assert_eq!(s.rocket().rotational_velocity, 0.0);
        assert!(s.step().is_ok());
    }

    #[test]
    fn negative_thrust_cannot_refuel() {
        let mut s = session();
        assert!(!s.set_engine_thrust(EngineKind::Main, -0.4));
        assert!(s.send_control(PlayerControl::Forward, true));
        for _ in 0..3 {
            let result = s.step().unwrap();
            assert!(result.rocket.fuel <= 275.0);
        }
        assert!((s.rocket().fuel() - (275.0 - 3.0 * 0.4)).abs() < EPS);
    }

    #[test]
    fn engine_held_through_winning_landing_is_cut() {
        let mut s = session();
        let target = s.layout().target;
        drop_onto(&mut s, target, 170.0, 1.0);
        assert!(s.send_control(PlayerControl::Forward, true));
        let result = step_until_contact(&mut s);
        assert!(result.contact.unwrap().on_landing_pad);
        assert!(s.is_won());
        assert!(!s.rocket().is_engine_on(EngineKind::Main));

        // Releasing the control is still accepted, pressing it is not
        assert!(s.send_control(PlayerControl::Forward, false));
        assert!(!s.send_control(PlayerControl::Forward, true));

        let pos = s.rocket().position;
        let fuel = s.rocket().fuel();
        for _ in 0..30 {
            let r = s.step().unwrap();
            assert_eq!(r.phase, Phase::Landed);
            assert!(r.contact.is_none());
            assert!(!r.events.iter().any(|e| matches!(e, SimEvent::Crashed { .. })));
            for e in &r.events {
                if let SimEvent::Message(msg) = e {
                    assert_eq!(msg.header, "A winner is you!");
                }
            }
        }
        assert_eq!(s.rocket().position, pos);
        assert_eq!(s.rocket().fuel(), fuel);
        assert!(s.is_won());
    }

    #[test]
    fn non_finite_motion_is_rolled_back() {
        let mut s = session();
        s.send_control(PlayerControl::Forward, true);
        s.step().unwrap();
        let good = s.rocket().position;
        s.rocket.velocity = DVec2::new(f64::NAN, 0.0);
        let err = s.step().unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(s.rocket().position, good);
        assert_eq!(s.rocket().velocity, DVec2::ZERO);
        assert!(s.step().is_ok());
    }

    #[test]
    fn unrecoverable_state_poisons_until_reset() {
        let mut s = session();
        s.send_control(PlayerControl::Forward, true);
        s.step().unwrap();
        s.last_valid_position = DVec2::new(f64::INFINITY, 0.0);
        s.rocket.velocity = DVec2::new(f64::NAN, f64::NAN);
        assert!(matches!(s.step(), Err(SimError::Poisoned(_))));
        assert!(s.is_poisoned());
        assert!(matches!(s.step(), Err(SimError::Poisoned(_))));
        assert!(!s.send_control(PlayerControl::Forward, true));
        s.restart().unwrap();
        assert!(!s.is_poisoned());
        assert!(s.step().is_ok());
    }

    #[test]
    fn tick_result_reports_closest_planet() {
        let mut s = session();
        let result = s.step().unwrap();
        assert_eq!(result.closest_planet, Some(s.layout().base));
        let base = s.layout().base_planet();
        assert!((result.closest_planet_distance - base.radius - 29.375).abs() < EPS);
        assert!(result.show_landing_info(s.config().show_landing_info));
        assert!((result.optimal_rotation_deg - 340.0).abs() < EPS);
        assert_eq!(result.fuel_percent, 100.0);
    }
}
