//! Rocket Lander - headless runner
//!
//! Flies a scripted burn-and-coast on the fixed-step clock and logs what the
//! simulation reports. Usage: `rocket-lander [map.ron] [--write-config]`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::FixedStep;
use game::{
    EffectHandle, EffectRequest, EffectSink, GameConfig, MapDefinition, MessageSink, PlayerControl,
    Session, SimEvent, UiMessage,
};

/// Simulated render frame (60 fps).
const FRAME: Duration = Duration::from_micros(16_667);
/// Give up after this many ticks if nothing ends the flight.
const MAX_TICKS: u64 = 30 * 120;

/// One segment of the flight script: hold `controls` for `ticks` logic ticks.
struct Segment {
    ticks: u64,
    controls: &'static [PlayerControl],
}

const SCRIPT: &[Segment] = &[
    Segment { ticks: 45, controls: &[PlayerControl::Forward] },
    Segment { ticks: 6, controls: &[PlayerControl::RotateRight] },
    Segment { ticks: 6, controls: &[PlayerControl::RotateLeft] },
    Segment { ticks: 30, controls: &[] },
    Segment { ticks: 20, controls: &[PlayerControl::Reverse] },
];

/// Sink that writes effects and messages to the log.
struct LogSink;

impl EffectSink for LogSink {
    fn request_effect(&mut self, request: &EffectRequest) {
        log::info!(
            "Effect {:?} {:?} at ({:.1}, {:.1})",
            request.handle,
            request.kind,
            request.position.x,
            request.position.y
        );
    }

    fn effect_finished(&mut self, handle: EffectHandle) {
        log::info!("Effect {:?} finished", handle);
    }
}

impl MessageSink for LogSink {
    fn post_message(&mut self, message: &UiMessage) {
        log::info!("[{}] {}", message.header, message.body);
        if message.show_restart_hint {
            log::info!("Restart to try again.");
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut map_path: Option<PathBuf> = None;
    let mut write_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--write-config" => write_config = true,
            _ => map_path = Some(PathBuf::from(arg)),
        }
    }

    let config = GameConfig::load();
    if write_config {
        config.save();
        log::info!("Wrote config.ron");
    }

    let map = match &map_path {
        Some(path) => MapDefinition::load(path).with_context(|| format!("loading map {}", path.display()))?,
        None => MapDefinition::builtin(),
    };

    log::info!("Starting Rocket Lander ({} Hz)", config.tick_rate);
    let mut clock = FixedStep::new(config.tick_rate, config.max_catch_up_ticks);
    let mut session = Session::new(config, map).context("building session")?;
    let mut effect_log = LogSink;
    let mut message_log = LogSink;

    let mut segment = 0;
    let mut segment_start = 0;
    apply_segment(&mut session, None, SCRIPT.first());

    'frames: loop {
        for _ in 0..clock.advance(FRAME) {
            let tick = session.tick();
            if segment < SCRIPT.len() && tick - segment_start >= SCRIPT[segment].ticks {
                let prev = &SCRIPT[segment];
                segment += 1;
                segment_start = tick;
                apply_segment(&mut session, Some(prev), SCRIPT.get(segment));
            }

            let result = match session.step() {
                Ok(result) => result,
                Err(e) if !e.is_fatal() => {
                    log::warn!("Tick {} recovered: {}", tick + 1, e);
                    continue;
                }
                Err(e) => return Err(e).context("simulation failed"),
            };

            for event in &result.events {
                event.dispatch(&mut effect_log, &mut message_log);
                log_event(event);
            }

            if result.tick % 30 == 0 && !result.game_over {
                log::info!(
                    "t={:>4} {:?} speed {:.2} lateral {:.2} vertical {:.2} angle {:.1} fuel {:.0}%",
                    result.tick,
                    result.phase,
                    result.speed,
                    result.lateral_speed,
                    result.vertical_speed,
                    result.landing_angle_deg,
                    result.fuel_percent
                );
            }

            if result.stop || result.tick >= MAX_TICKS {
                log::info!("Stopped after {} ticks ({} dropped)", result.tick, clock.dropped_ticks());
                break 'frames;
            }
        }
    }

    Ok(())
}

/// Release the previous segment's controls and press the next one's.
fn apply_segment(session: &mut Session, prev: Option<&Segment>, next: Option<&Segment>) {
    if let Some(prev) = prev {
        for control in prev.controls {
            session.send_control(*control, false);
        }
    }
    if let Some(next) = next {
        for control in next.controls {
            if !session.send_control(*control, true) {
                log::debug!("{:?} not accepted", control);
            }
        }
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::Launched { .. } => log::debug!("Liftoff"),
        SimEvent::FuelExhausted => log::warn!("Fuel exhausted"),
        SimEvent::Landed { rotation_deg, on_landing_pad, .. } => {
            log::info!("Touchdown at {:.1} degrees (pad: {})", rotation_deg, on_landing_pad)
        }
        SimEvent::GameOver { won } => log::info!("Game over, won: {}", won),
        _ => {}
    }
}
