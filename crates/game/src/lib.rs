//! Rocket Lander game core: rocket, landing rules, maps and the stepped session.

pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod landing;
pub mod map;
pub mod rocket;
pub mod simulation;
pub mod state;

pub use config::{EngineConfig, EnginesConfig, GameConfig, LandingLimits, RocketConfig};
pub use effects::{EffectHandle, EffectKind, EffectQueue, EffectRequest, Explosion};
pub use error::{MapError, SimError};
pub use events::{dispatch_all, EffectSink, MessageQueue, MessageSink, SimEvent, UiMessage};
pub use landing::{Classification, ContactOutcome, CrashReason, Kinematics};
pub use map::{MapDefinition, MapLayout, PlanetSpec};
pub use rocket::{EngineKind, EngineSlot, PlayerControl, Rocket};
pub use simulation::Session;
pub use state::{Phase, RocketSnapshot, SimulationTickResult};
