//! Running simulation for Voidsail.
//!
//! Expands planets as the camera approaches them, streams world objects
//! between their live (physics-backed) and far (lightweight) forms, applies
//! planet and sun gravity, and saves and restores worlds.

pub mod engine;
pub mod entities;
pub mod error;
pub mod planet_objects;
pub mod save;
pub mod stream;
pub mod systems;

pub use engine::{FatalReport, SimConfig, SimulationEngine};
pub use error::SimError;
pub use stream::WorldObjectStream;
pub use voidsail_core as core;
