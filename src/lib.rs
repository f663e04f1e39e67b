//! # cognitive-field-sim
//!
//! A single complex field ψ on a square 2D domain, evolving under a damped
//! nonlinear Schrödinger (Gross–Pitaevskii) equation, used as a cognitive
//! landscape: localized modes stand for concepts, and barriers, channels,
//! interference and flow model how they interact.
//!
//! ```text
//! Grid & spectral transform
//!   ↓ coordinates, |k|²
//! Mode catalog (16 phase-wound patterns on a hexagonal lattice)
//!   ↓ well positions
//! Potential landscape (trap + wells, keyed barriers, additive channels)
//!   ↓ V_total
//! FluidField (split-step propagator, imaginary-time relaxation)
//!   ↓ ψ
//! Diagnostics (mode energies, coherence, entropy, vote)
//! Memory (phase-kick excitation, packet store, resonance recall)
//! ```
//!
//! The engine is a plain state machine: every call runs to completion,
//! leaves `Σ|ψ|²·dx² = 1`, and nothing happens between calls. It holds no
//! global state and draws no randomness, so a given call sequence always
//! reproduces the same field.
//!
//! ## Usage
//!
//! ```no_run
//! use cognitive_field_sim::prelude::*;
//!
//! let mut field = FluidField::new(FieldConfig::with_grid(64, 64)).unwrap();
//! field.set_barrier((0.0, 0.0), 0.5, 2.0, Some("brain_shield")).unwrap();
//! field.add_coupling("Intuition", "Logic", 5.0).unwrap();
//! field.excite_mode(6, 3.0).unwrap();
//! field.evolve(200);
//!
//! let vote = field.vote();
//! for mode in &vote.dominant_modes {
//!     println!("{:12} {:.3}", mode.name, mode.energy);
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod grid;
pub mod landscape;
pub mod memory;
pub mod modes;

pub mod prelude {
    pub use crate::config::*;
    pub use crate::diagnostics::{DominantMode, StateMetrics, Vote};
    pub use crate::engine::*;
    pub use crate::error::*;
    pub use crate::grid::{Grid, SpectralTransform};
    pub use crate::landscape::PotentialLandscape;
    pub use crate::memory::RecalledMemory;
    pub use crate::modes::{Mode, ModeCatalog, MODE_NAMES};
}
