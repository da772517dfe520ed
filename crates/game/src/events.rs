//! Discrete simulation events and the collaborator sinks they are delivered to.

use glam::DVec2;
use physics::PlanetId;

use crate::effects::{EffectHandle, EffectRequest};
use crate::landing::CrashReason;

const MESSAGE_HISTORY: usize = 50;

/// A popup message for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiMessage {
    pub header: String,
    pub body: String,
    pub show_restart_hint: bool,
}

impl UiMessage {
    pub fn crash(reason: CrashReason) -> Self {
        Self {
            header: "You exploded!".to_string(),
            body: reason.message().to_string(),
            show_restart_hint: true,
        }
    }

    pub fn win(fuel_percent: f64) -> Self {
        let fuel = (fuel_percent * 100.0).round() / 100.0;
        Self {
            header: "A winner is you!".to_string(),
            body: format!("You reached the target with {}% fuel.", fuel),
            show_restart_hint: true,
        }
    }
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Launched { planet: Option<PlanetId> },
    FuelExhausted,
    Landed { planet: PlanetId, rotation_deg: f64, on_landing_pad: bool },
    Crashed { planet: PlanetId, reason: CrashReason, position: DVec2 },
    EffectRequested(EffectRequest),
    EffectFinished(EffectHandle),
    Message(UiMessage),
    GameOver { won: bool },
}

/// Receives effect start/finish notifications (e.g. a sprite renderer).
pub trait EffectSink {
    fn request_effect(&mut self, request: &EffectRequest);
    fn effect_finished(&mut self, handle: EffectHandle);
}

/// Receives UI popup messages.
pub trait MessageSink {
    fn post_message(&mut self, message: &UiMessage);
}

impl SimEvent {
    /// Forward this event to whichever sink cares about it.
    pub fn dispatch(&self, effects: &mut dyn EffectSink, messages: &mut dyn MessageSink) {
        match self {
            SimEvent::EffectRequested(req) => effects.request_effect(req),
            SimEvent::EffectFinished(handle) => effects.effect_finished(*handle),
            SimEvent::Message(msg) => messages.post_message(msg),
            _ => {}
        }
    }
}

/// Forward a whole tick's events in order.
pub fn dispatch_all(events: &[SimEvent], effects: &mut dyn EffectSink, messages: &mut dyn MessageSink) {
    for event in events {
        event.dispatch(effects, messages);
    }
}

#[derive(Debug, Clone)]
struct PendingMessage {
    message: UiMessage,
    ticks_remaining: u32,
}

/// Delayed UI messages, counted down in ticks, plus a short history of delivered ones.
#[derive(Debug, Default)]
pub struct MessageQueue {
    pending: Vec<PendingMessage>,
    delivered: Vec<UiMessage>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` after `delay_ticks` further ticks; 0 delivers on the current tick.
    pub fn schedule(&mut self, message: UiMessage, delay_ticks: u32) {
        self.pending.push(PendingMessage { message, ticks_remaining: delay_ticks });
    }

    /// Count down one tick and return messages now due, in scheduling order.
    pub fn update(&mut self) -> Vec<UiMessage> {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            if p.ticks_remaining == 0 {
                due.push(p.message.clone());
                false
            } else {
                p.ticks_remaining -= 1;
                true
            }
        });
        for msg in &due {
            self.delivered.push(msg.clone());
            if self.delivered.len() > MESSAGE_HISTORY {
                self.delivered.remove(0);
            }
        }
        due
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Most recently delivered message.
    pub fn latest(&self) -> Option<&UiMessage> {
        self.delivered.last()
    }

    pub fn history(&self) -> &[UiMessage] {
        &self.delivered
    }
}
