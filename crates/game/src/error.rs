//! Error types for map loading and the simulation step.

use std::path::PathBuf;
use thiserror::Error;

/// A map definition that cannot be turned into a playable layout.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no planets")]
    NoPlanets,

    #[error("map has no base planet")]
    MissingBase,

    #[error("map has no target planet")]
    MissingTarget,

    #[error("planet {name:?} has invalid {field}: {value}")]
    InvalidPlanet { name: String, field: &'static str, value: f64 },

    #[error("invalid {field}: {value}")]
    InvalidAngle { field: &'static str, value: f64 },

    #[error("could not read map {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Why a tick (or reset) did not complete normally.
#[derive(Debug, Error)]
pub enum SimError {
    /// State was repaired; the next tick can proceed.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// State could not be repaired; only `reset` recovers the session.
    #[error("session poisoned: {0}")]
    Poisoned(String),

    #[error(transparent)]
    Map(#[from] MapError),
}

impl SimError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SimError::InvariantViolation(_))
    }
}
