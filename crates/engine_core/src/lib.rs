//! Core math and timing for the rocket lander.
//!
//! This crate provides the foundational pieces used by the other crates:
//! - 2D vector algebra on `glam::DVec2` with defined degenerate cases
//! - Angle helpers (`rads`, `degs`, `clamp_rot`)
//! - The fixed-timestep clock driving the simulation

pub mod math;
pub mod time;

pub use math::*;
pub use time::*;

// Re-export commonly used types
pub use glam::DVec2;
