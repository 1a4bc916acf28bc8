//! Error types for the running simulation.

use hecs::Entity;
use thiserror::Error;

use voidsail_core::error::GenerationError;

use crate::save::SaveError;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("world generation failed")]
    Generation(#[from] GenerationError),

    /// An entity was asked to become a representation it already has.
    #[error("double conversion: entity {entity:?} is already {state}")]
    DoubleConversion { entity: Entity, state: &'static str },

    #[error("entity {0:?} is not tracked")]
    Untracked(Entity),

    #[error("simulation halted after a fatal error")]
    Halted,

    #[error("save data rejected")]
    Save(#[from] SaveError),
}
