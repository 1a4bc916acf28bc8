//! Terrain generation for Voidsail planets.
//!
//! Tile pools per planet config, and the ground grid builder that
//! classifies every cell of a planet's terrain ring.

pub use voidsail_core as core;

pub mod ground;
pub mod tiles;

// Re-export key types for convenience.
pub use ground::{GroundBuilder, GroundMap};
pub use tiles::{Tile, TilePools};
