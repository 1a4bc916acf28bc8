//! Error types for world generation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A system's slot accounting does not add up to its declared radius.
    #[error("system '{system}' radius mismatch: declared {declared}, accumulated {accumulated}")]
    RadiusMismatch {
        system: String,
        declared: f32,
        accumulated: f32,
    },

    /// A planet is too small to hold a single ground column.
    #[error("planet {planet} has no ground columns at ground height {ground_height}")]
    NoGroundColumns { planet: u32, ground_height: f32 },

    /// A config pool needed for generation is empty.
    #[error("no {kind} configs registered")]
    EmptyConfigPool { kind: &'static str },

    /// A physics outline was missing under the fail-fast policy.
    #[error("missing resource: {0}")]
    MissingResource(String),
}
