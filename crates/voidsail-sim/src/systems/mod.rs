//! Per-tick systems that run before the object stream.
//!
//! Systems are free functions over the galaxy, the physics backend and the
//! stream. They own no state; reusable scratch buffers are passed in by the
//! engine.

pub mod gravity;
pub mod planets;
