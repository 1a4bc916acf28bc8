//! Core types and definitions for the Voidsail simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, constants, content configs, galaxy bodies, drawables,
//! the deterministic random source and the physics capability surface.

pub mod bodies;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod drawable;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod random;
pub mod types;

#[cfg(test)]
mod tests;
