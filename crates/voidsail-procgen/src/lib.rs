//! Procedural galaxy generation for Voidsail.
//!
//! Placement searches and the galaxy layout builder. Everything here is a
//! pure function of the registry and the `SeededRandom` it is handed.

pub use voidsail_core as core;

pub mod galaxy;
pub mod placement;

pub use galaxy::GalaxyBuilder;
pub use placement::{find_flat_place, place_disk, ConsumedAngles, ExclusionDisk};

#[cfg(test)]
mod tests;
