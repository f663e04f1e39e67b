//! Excitation and memory primitives built directly on the field state.
//!
//! - `excite_mode`: position-dependent phase kick `ψ ← ψ·exp(i·s·Re φ_m)`.
//! - `store`: adds a localized packet whose width shrinks with intensity and
//!   whose phase encodes valence (`valence·π`, unclamped).
//! - `recall`: adds a broad probe, lets resonance develop, and reports the
//!   density peaks. Recall is destructive: the probe and the evolution stay
//!   in the field.

use log::debug;
use num_complex::Complex;
use smallvec::SmallVec;

use crate::engine::FluidField;
use crate::error::{FieldError, Result};

/// Weight of a stored memory packet added to ψ.
pub const MEMORY_WEIGHT: f64 = 0.1;

/// Weight of the recall probe added to ψ.
pub const PROBE_WEIGHT: f64 = 0.2;

/// Denominator of the probe Gaussian, exp(-|r - p|² / 8).
pub const PROBE_ENVELOPE: f64 = 8.0;

/// Side of the square local-maximum window.
pub const PEAK_WINDOW: usize = 5;

/// A peak must exceed this multiple of the mean density.
pub const PEAK_THRESHOLD: f64 = 2.0;

/// Maximum number of recalled memories reported.
pub const MAX_RECALLED: usize = 5;

/// A density peak found by `recall`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalledMemory {
    pub position: (f64, f64),
    pub intensity: f64,
}

impl FluidField {
    /// Phase-kick the field with the real part of mode `index`'s pattern.
    pub fn excite_mode(&mut self, index: usize, strength: f64) -> Result<()> {
        let pattern = self.modes.get(index)?.pattern(&self.grid);
        for (psi, p) in self.psi.iter_mut().zip(pattern) {
            *psi *= Complex::from_polar(1.0, strength * p.re);
        }
        self.normalize();
        debug!("mode {} excited with strength {}", index, strength);
        Ok(())
    }

    /// Inject a memory packet at `position`.
    ///
    /// Width is `1/intensity`, amplitude `intensity`, phase `valence·π`.
    /// Valence outside [-1, 1] wraps through the phase instead of failing.
    pub fn store(&mut self, position: (f64, f64), intensity: f64, valence: f64) -> Result<()> {
        if !(intensity.is_finite() && intensity > 0.0) {
            return Err(FieldError::InvalidIntensity(intensity));
        }
        let sigma = 1.0 / intensity;
        let phase = Complex::from_polar(MEMORY_WEIGHT * intensity, valence * std::f64::consts::PI);
        let packet = self.grid.gaussian(position, 2.0 * sigma * sigma);

        for (psi, g) in self.psi.iter_mut().zip(packet) {
            *psi += phase * g;
        }
        self.normalize();
        debug!(
            "memory stored at ({:.1}, {:.1}), intensity {:.2}, valence {:.2}",
            position.0, position.1, intensity, valence
        );
        Ok(())
    }

    /// Probe the field near `position`, evolve `steps`, and return up to five
    /// density peaks.
    ///
    /// Peaks are local maxima of a 5×5 window (mirrored at the edges) that
    /// exceed twice the mean density, reported in row-major scan order
    /// (increasing y, then increasing x), not by intensity.
    pub fn recall(
        &mut self,
        position: (f64, f64),
        steps: usize,
    ) -> SmallVec<[RecalledMemory; MAX_RECALLED]> {
        let probe = self.grid.gaussian(position, PROBE_ENVELOPE);
        for (psi, g) in self.psi.iter_mut().zip(probe) {
            *psi += PROBE_WEIGHT * g;
        }
        self.normalize();
        self.evolve(steps);

        let density = self.density();
        let (nx, ny) = (self.grid.nx(), self.grid.ny());
        let recalled: SmallVec<[RecalledMemory; MAX_RECALLED]> =
            find_peaks(&density, nx, ny, PEAK_WINDOW, PEAK_THRESHOLD)
                .into_iter()
                .take(MAX_RECALLED)
                .map(|idx| RecalledMemory {
                    position: (self.grid.x_at(idx % nx), self.grid.y_at(idx / nx)),
                    intensity: density[idx],
                })
                .collect();

        debug!(
            "recall near ({:.1}, {:.1}) activated {} memories",
            position.0,
            position.1,
            recalled.len()
        );
        recalled
    }
}

/// Mirror an out-of-range index back into `0..n` (`d c b a | a b c d | d c b a`).
#[inline]
fn reflect(i: isize, n: usize) -> usize {
    let n = n as isize;
    let mut i = i;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Square maximum filter of side `size` over a row-major `nx × ny` array.
///
/// Separable: a running max along rows, then along columns.
pub fn maximum_filter(data: &[f64], nx: usize, ny: usize, size: usize) -> Vec<f64> {
    let before = (size / 2) as isize;
    let after = size as isize - before - 1;

    let mut rows = vec![0.0; data.len()];
    for r in 0..ny {
        for c in 0..nx {
            let mut m = f64::NEG_INFINITY;
            for d in -before..=after {
                m = m.max(data[r * nx + reflect(c as isize + d, nx)]);
            }
            rows[r * nx + c] = m;
        }
    }

    let mut out = vec![0.0; data.len()];
    for r in 0..ny {
        for c in 0..nx {
            let mut m = f64::NEG_INFINITY;
            for d in -before..=after {
                m = m.max(rows[reflect(r as isize + d, ny) * nx + c]);
            }
            out[r * nx + c] = m;
        }
    }
    out
}

/// Flat indices of local maxima above `threshold × mean`, in scan order.
pub fn find_peaks(density: &[f64], nx: usize, ny: usize, size: usize, threshold: f64) -> Vec<usize> {
    if density.is_empty() {
        return Vec::new();
    }
    let mean = density.iter().sum::<f64>() / density.len() as f64;
    let local_max = maximum_filter(density, nx, ny, size);
    density
        .iter()
        .zip(&local_max)
        .enumerate()
        .filter(|&(_, (&d, &m))| d == m && d > threshold * mean)
        .map(|(i, _)| i)
        .collect()
}
