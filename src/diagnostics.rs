//! Measurement: mode energies, coherence, entropy and the dominant-mode vote.
//!
//! Mode energies are a soft partition. Each mode's share is the integral of
//! |ψ|² under a fixed Gaussian window around its lattice position; windows
//! overlap, so the sixteen numbers describe a resonance profile rather than a
//! disjoint decomposition. They are normalized to sum to one.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::engine::FluidField;
use crate::grid::Grid;
use crate::modes::Mode;

/// Window denominator of the projection, exp(-|r - p|² / 4).
pub const PROJECTION_ENVELOPE: f64 = 4.0;

/// Guard added to the energy total before normalizing.
pub const ENERGY_EPSILON: f64 = 1e-10;

/// Scale of the coherence ratio max/mean inside tanh.
pub const COHERENCE_SCALE: f64 = 15.0;

/// Number of modes reported by the vote.
pub const VOTE_SIZE: usize = 3;

/// One entry of the vote.
#[derive(Debug, Clone, PartialEq)]
pub struct DominantMode {
    pub index: usize,
    pub name: String,
    pub energy: f64,
}

/// Snapshot of the field's resonance profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Vote {
    /// Normalized energy share per mode
    pub energies: Vec<f64>,
    pub coherence: f64,
    /// Top modes by energy, descending
    pub dominant_modes: SmallVec<[DominantMode; VOTE_SIZE]>,
}

/// The observable pair a homeostatic controller reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateMetrics {
    /// Energy share of mode 0
    pub brain_energy: f64,
    pub entropy: f64,
}

/// Gaussian-weighted integral of `density` around `center`.
fn project(grid: &Grid, density: &[f64], center: (f64, f64)) -> f64 {
    let (x0, y0) = center;
    let mut acc = 0.0;
    for (row, &y) in grid.y().iter().enumerate() {
        let dy2 = (y - y0) * (y - y0);
        let offset = row * grid.nx();
        for (col, &x) in grid.x().iter().enumerate() {
            let weight = (-((x - x0) * (x - x0) + dy2) / PROJECTION_ENVELOPE).exp();
            acc += density[offset + col] * weight;
        }
    }
    acc * grid.cell_area()
}

/// Normalized energy share of each mode.
pub fn mode_energies(grid: &Grid, modes: &[Mode], density: &[f64]) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    let raw: Vec<f64> = modes
        .par_iter()
        .map(|m| project(grid, density, m.position))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let raw: Vec<f64> = modes
        .iter()
        .map(|m| project(grid, density, m.position))
        .collect();

    let total: f64 = raw.iter().sum::<f64>() + ENERGY_EPSILON;
    raw.into_iter().map(|e| e / total).collect()
}

/// `tanh(max / (mean · 15))`: near 1 for a sharp peak, lower when diffuse.
pub fn coherence(density: &[f64]) -> f64 {
    if density.is_empty() {
        return 0.0;
    }
    let max = density.iter().cloned().fold(0.0, f64::max);
    let mean = density.iter().sum::<f64>() / density.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    (max / (mean * COHERENCE_SCALE)).tanh()
}

/// Shannon entropy (nats) of an energy distribution; zero entries are skipped.
pub fn entropy(energies: &[f64]) -> f64 {
    let total: f64 = energies.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    -energies
        .iter()
        .map(|e| e / total)
        .filter(|&p| p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}

/// Indices of the `k` largest energies, descending.
///
/// Ties keep the lower index first (stable sort), so the order is arbitrary
/// but deterministic for a given input.
pub fn top_modes(energies: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..energies.len()).collect();
    order.sort_by(|&a, &b| {
        energies[b]
            .partial_cmp(&energies[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(k);
    order
}

impl FluidField {
    /// Normalized energy share of each mode (non-negative, sums to 1).
    pub fn mode_energies(&self) -> Vec<f64> {
        mode_energies(&self.grid, self.modes.as_slice(), &self.density())
    }

    /// Peakedness of the density in [0, 1).
    pub fn coherence(&self) -> f64 {
        coherence(&self.density())
    }

    /// Shannon entropy of the mode energy distribution.
    pub fn entropy(&self) -> f64 {
        entropy(&self.mode_energies())
    }

    /// Energies, coherence and the three dominant modes.
    pub fn vote(&self) -> Vote {
        let density = self.density();
        let energies = mode_energies(&self.grid, self.modes.as_slice(), &density);
        let dominant_modes = top_modes(&energies, VOTE_SIZE)
            .into_iter()
            .map(|i| DominantMode {
                index: i,
                name: self.modes.as_slice()[i].name.clone(),
                energy: energies[i],
            })
            .collect();

        Vote {
            coherence: coherence(&density),
            energies,
            dominant_modes,
        }
    }

    /// `(brain_energy, entropy)` for controllers watching mode 0 and disorder.
    pub fn state_metrics(&self) -> StateMetrics {
        let energies = self.mode_energies();
        StateMetrics {
            brain_energy: energies.first().copied().unwrap_or(0.0),
            entropy: entropy(&energies),
        }
    }
}
