//! Error taxonomy for field construction and mutation.
//!
//! Steady-state operations (evolution, relaxation, measurement) never fail.
//! Everything here is either a configuration error or a lookup failure, and a
//! failing call leaves the field and landscape exactly as they were.

use thiserror::Error;

/// Errors reported by the field engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Construction parameters that cannot describe a grid or a stable step.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A mode name that is not in the catalog.
    #[error("mode not found: {0}")]
    ModeNotFound(String),

    /// A mode index outside `0..count`.
    #[error("mode index {index} out of range (catalog has {count} modes)")]
    ModeIndexOutOfRange { index: usize, count: usize },

    /// A coupling channel whose two endpoints are the same mode.
    #[error("cannot open a channel from mode {0} to itself")]
    CoincidentModes(String),

    /// Memory packet intensity must be positive and finite.
    #[error("memory intensity must be positive and finite, got {0}")]
    InvalidIntensity(f64),

    /// Barrier width must be positive and finite.
    #[error("barrier width must be positive and finite, got {0}")]
    InvalidBarrierWidth(f64),
}

pub type Result<T> = std::result::Result<T, FieldError>;
