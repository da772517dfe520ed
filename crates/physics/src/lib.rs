//! Planet gravity and collision for the rocket lander.

pub mod body;
pub mod collision;
pub mod gravity;
pub mod planet;

pub use body::*;
pub use collision::*;
pub use gravity::*;
pub use planet::*;
