//! The mode catalog: localized, phase-wound basis patterns on a hexagonal lattice.
//!
//! A mode is a descriptor, not a stored array. Its pattern
//!
//! ```text
//! φ_m(x, y) = exp(-|r - r_m|² / (2σ²)) · exp(i·m·θ_m),   θ_m = atan2(y - y_m, x - x_m)
//! ```
//!
//! is evaluated against the grid on demand, so higher-index modes carry
//! higher orbital winding around their own center.

use num_complex::Complex;

use crate::error::{FieldError, Result};
use crate::grid::Grid;

/// Canonical display names for the first 16 modes.
pub const MODE_NAMES: [&str; 16] = [
    "Brain",
    "Heart",
    "Soul",
    "Executor",
    "Memory",
    "Logic",
    "Intuition",
    "Ethics",
    "Feeling",
    "Creator",
    "Communicator",
    "Sensor",
    "Motor",
    "Mirror",
    "Learner",
    "Architect",
];

/// Envelope denominator 2σ² of every mode pattern (σ² = 2).
pub const MODE_ENVELOPE: f64 = 4.0;

/// Points on the hexagonal lattice: the center, six points at half radius
/// 60° apart, then the outer ring evenly spaced, truncated to `n`.
///
/// The outer ring holds `max(n - 7, 9)` points so that the canonical 16-mode
/// catalog has nine outer points 40° apart.
pub fn hexagonal_lattice(n: usize, radius: f64) -> Vec<(f64, f64)> {
    use std::f64::consts::PI;

    let mut positions = Vec::with_capacity(n.max(16));
    positions.push((0.0, 0.0));

    for i in 0..6 {
        let angle = i as f64 * PI / 3.0;
        positions.push((radius * 0.5 * angle.cos(), radius * 0.5 * angle.sin()));
    }

    let outer = n.saturating_sub(7).max(9);
    for i in 0..outer {
        let angle = i as f64 * 2.0 * PI / outer as f64;
        positions.push((radius * angle.cos(), radius * angle.sin()));
    }

    positions.truncate(n);
    positions
}

/// Immutable mode descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Mode {
    pub index: usize,
    pub name: String,
    pub position: (f64, f64),
    /// Orbital winding number m of the phase factor
    pub winding: i32,
    /// Envelope denominator 2σ²
    pub envelope: f64,
    /// Nominal frequency 0.5 + 0.1·index
    pub frequency: f64,
}

impl Mode {
    /// Pattern value at a single point.
    #[inline]
    pub fn pattern_at(&self, x: f64, y: f64) -> Complex<f64> {
        let (x0, y0) = self.position;
        let (dx, dy) = (x - x0, y - y0);
        let envelope = (-(dx * dx + dy * dy) / self.envelope).exp();
        let theta = dy.atan2(dx);
        Complex::from_polar(envelope, self.winding as f64 * theta)
    }

    /// Pattern sampled on the whole grid (row-major).
    pub fn pattern(&self, grid: &Grid) -> Vec<Complex<f64>> {
        grid.map(|x, y| self.pattern_at(x, y))
    }
}

/// Fixed catalog of modes, built once per engine.
#[derive(Debug, Clone)]
pub struct ModeCatalog {
    modes: Vec<Mode>,
}

impl ModeCatalog {
    /// Build `n` modes on a hexagonal lattice of the given outer radius.
    pub fn new(n: usize, radius: f64) -> Self {
        let modes = hexagonal_lattice(n, radius)
            .into_iter()
            .enumerate()
            .map(|(i, position)| Mode {
                index: i,
                name: MODE_NAMES
                    .get(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("M{}", i + 1)),
                position,
                winding: i as i32,
                envelope: MODE_ENVELOPE,
                frequency: 0.5 + i as f64 * 0.1,
            })
            .collect();
        Self { modes }
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mode> {
        self.modes.iter()
    }

    pub fn as_slice(&self) -> &[Mode] {
        &self.modes
    }

    /// Mode by index.
    pub fn get(&self, index: usize) -> Result<&Mode> {
        self.modes.get(index).ok_or(FieldError::ModeIndexOutOfRange {
            index,
            count: self.modes.len(),
        })
    }

    /// Index of the mode with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|m| m.name == name)
    }

    /// Mode by name.
    pub fn by_name(&self, name: &str) -> Result<&Mode> {
        self.modes
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| FieldError::ModeNotFound(name.to_string()))
    }

    /// Positions of all modes in index order.
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.modes.iter().map(|m| m.position).collect()
    }
}
