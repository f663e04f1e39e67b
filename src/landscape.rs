//! Potential landscape: static trap and wells, keyed barriers, additive channels.
//!
//! ```text
//! V_total = V_static + Σ_id V_barrier[id] + V_coupling
//! ```
//!
//! The total is recomputed synchronously after every mutation, so whatever
//! reads `total()` next never sees a stale sum.
//!
//! # Barrier ids
//!
//! Barriers are stored under string keys and a second `set_barrier` with the
//! same key replaces the first. Controllers that adjust one barrier every
//! tick must pass a stable id (e.g. `"brain_shield"`), otherwise each call
//! adds a new bump. When no id is given the key is derived from the position
//! alone (`barrier_3.0_4.0`), so two calls at the same position overwrite each
//! other even if strength or width differ.
//!
//! # Channels
//!
//! Coupling channels accumulate: every `add_coupling` adds another trench to
//! the same field, and there is no removal operation.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{FieldError, Result};
use crate::grid::Grid;
use crate::modes::ModeCatalog;

/// Curvature of the harmonic trap 0.05·r².
pub const TRAP_CURVATURE: f64 = 0.05;

/// Depth of each attractive well at a mode position.
pub const WELL_DEPTH: f64 = 2.0;

/// Denominator of the well Gaussian, exp(-|r - p|² / 2).
pub const WELL_ENVELOPE: f64 = 2.0;

/// Cross-axis denominator of a coupling channel (narrow direction).
pub const CHANNEL_WIDTH: f64 = 0.5;

/// The three-layer potential.
#[derive(Debug, Clone)]
pub struct PotentialLandscape {
    grid: Grid,
    static_potential: Vec<f64>,
    barriers: BTreeMap<String, Vec<f64>>,
    coupling: Vec<f64>,
    total: Vec<f64>,
}

impl PotentialLandscape {
    /// Harmonic trap plus one attractive well per lattice position.
    pub fn new(grid: &Grid, well_positions: &[(f64, f64)]) -> Self {
        let mut static_potential =
            grid.map(|x, y| TRAP_CURVATURE * (x * x + y * y));

        for &position in well_positions {
            add_well(grid, &mut static_potential, position, WELL_DEPTH);
        }

        let coupling = vec![0.0; grid.len()];
        let mut landscape = Self {
            grid: grid.clone(),
            total: static_potential.clone(),
            static_potential,
            barriers: BTreeMap::new(),
            coupling,
        };
        landscape.update_total();
        landscape
    }

    /// Insert or replace the barrier `strength · exp(-|r - p|² / (2·width²))`.
    ///
    /// Returns the key the barrier was stored under. With `id == None` the key
    /// is `barrier_{x:?}_{y:?}` (e.g. `barrier_3.0_4.0`), so barriers at the
    /// same position collide.
    ///
    /// Fails with `InvalidBarrierWidth` unless `width` is positive and finite;
    /// the landscape is not touched in that case.
    pub fn set_barrier(
        &mut self,
        position: (f64, f64),
        strength: f64,
        width: f64,
        id: Option<&str>,
    ) -> Result<String> {
        if !(width.is_finite() && width > 0.0) {
            warn!("barrier rejected: width {}", width);
            return Err(FieldError::InvalidBarrierWidth(width));
        }
        let (x0, y0) = position;
        let key = match id {
            Some(id) => id.to_string(),
            None => format!("barrier_{:?}_{:?}", x0, y0),
        };

        let barrier: Vec<f64> = self
            .grid
            .gaussian(position, 2.0 * width * width)
            .into_iter()
            .map(|g| strength * g)
            .collect();

        self.barriers.insert(key.clone(), barrier);
        self.update_total();
        debug!(
            "barrier set: id={}, pos=({}, {}), strength={}, width={}",
            key, x0, y0, strength, width
        );
        Ok(key)
    }

    /// Add an elongated attractive trench between two named modes.
    ///
    /// The trench is centered at the midpoint, aligned with the inter-mode
    /// axis, with long-axis scale equal to the inter-mode distance and a
    /// fixed narrow cross width. Repeated calls deepen the channel.
    ///
    /// Fails with `ModeNotFound` if either name is unknown and with
    /// `CoincidentModes` if both name the same mode; the landscape is not
    /// touched in either case.
    pub fn add_coupling(
        &mut self,
        catalog: &ModeCatalog,
        mode_a: &str,
        mode_b: &str,
        strength: f64,
    ) -> Result<()> {
        let (p1, p2) = match (catalog.by_name(mode_a), catalog.by_name(mode_b)) {
            (Ok(a), Ok(b)) => (a.position, b.position),
            (Err(e), _) | (_, Err(e)) => {
                warn!("coupling {} <-> {} rejected: {}", mode_a, mode_b, e);
                return Err(e);
            }
        };

        let channel = channel_field(&self.grid, p1, p2, strength).ok_or_else(|| {
            warn!("coupling {} <-> {} rejected: coincident endpoints", mode_a, mode_b);
            FieldError::CoincidentModes(mode_a.to_string())
        })?;

        for (c, v) in self.coupling.iter_mut().zip(channel) {
            *c += v;
        }
        self.update_total();
        debug!(
            "channel opened: {} <-> {} (strength {})",
            mode_a, mode_b, strength
        );
        Ok(())
    }

    /// Effective potential seen by the propagator.
    pub fn total(&self) -> &[f64] {
        &self.total
    }

    pub fn static_potential(&self) -> &[f64] {
        &self.static_potential
    }

    /// Accumulated coupling field.
    pub fn coupling(&self) -> &[f64] {
        &self.coupling
    }

    pub fn barrier(&self, id: &str) -> Option<&[f64]> {
        self.barriers.get(id).map(Vec::as_slice)
    }

    /// Barrier keys in sorted order.
    pub fn barrier_ids(&self) -> impl Iterator<Item = &str> {
        self.barriers.keys().map(String::as_str)
    }

    pub fn barrier_count(&self) -> usize {
        self.barriers.len()
    }

    fn update_total(&mut self) {
        let mut barrier_sum = vec![0.0; self.static_potential.len()];
        for barrier in self.barriers.values() {
            for (acc, b) in barrier_sum.iter_mut().zip(barrier) {
                *acc += b;
            }
        }

        for (i, v) in self.total.iter_mut().enumerate() {
            *v = self.static_potential[i] + barrier_sum[i] + self.coupling[i];
        }
    }
}

fn add_well(grid: &Grid, potential: &mut [f64], position: (f64, f64), depth: f64) {
    for (v, g) in potential.iter_mut().zip(grid.gaussian(position, WELL_ENVELOPE)) {
        *v -= depth * g;
    }
}

/// `-strength · exp(-(u²/len² + w²/CHANNEL_WIDTH))` in the frame rotated onto p1→p2.
///
/// Returns `None` for coincident endpoints (zero length).
fn channel_field(
    grid: &Grid,
    p1: (f64, f64),
    p2: (f64, f64),
    strength: f64,
) -> Option<Vec<f64>> {
    let (mid_x, mid_y) = ((p1.0 + p2.0) / 2.0, (p1.1 + p2.1) / 2.0);
    let (dx, dy) = (p2.0 - p1.0, p2.1 - p1.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f64::EPSILON {
        return None;
    }
    let angle = dy.atan2(dx);
    let (sin, cos) = angle.sin_cos();

    Some(grid.map(|x, y| {
        let u = (x - mid_x) * cos + (y - mid_y) * sin;
        let w = -(x - mid_x) * sin + (y - mid_y) * cos;
        -strength * (-(u * u / (length * length) + w * w / CHANNEL_WIDTH)).exp()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Grid, ModeCatalog, PotentialLandscape) {
        let grid = Grid::new((32, 32), 20.0);
        let catalog = ModeCatalog::new(16, 6.0);
        let landscape = PotentialLandscape::new(&grid, &catalog.positions());
        (grid, catalog, landscape)
    }

    // ── Static layer ───────────────────────────────────────────────────

    #[test]
    fn fresh_landscape_total_is_static() {
        let (_, _, landscape) = setup();
        assert_eq!(landscape.total(), landscape.static_potential());
        assert!(landscape.coupling().iter().all(|&c| c == 0.0));
        assert_eq!(landscape.barrier_count(), 0);
    }

    #[test]
    fn trap_dominates_at_the_corners() {
        let (grid, _, landscape) = setup();
        let corner = landscape.static_potential()[grid.index(0, 0)];
        // 0.05 · (10² + 10²) with negligible well contribution
        assert!((corner - 10.0).abs() < 1e-3);
    }

    // ── Barriers ───────────────────────────────────────────────────────

    #[test]
    fn barrier_overwrite_is_idempotent() {
        let (_, _, mut once) = setup();
        let mut twice = once.clone();

        once.set_barrier((1.0, 2.0), 0.7, 1.5, Some("x")).unwrap();
        twice.set_barrier((1.0, 2.0), 0.7, 1.5, Some("x")).unwrap();
        twice.set_barrier((1.0, 2.0), 0.7, 1.5, Some("x")).unwrap();

        assert_eq!(once.total(), twice.total());
        assert_eq!(twice.barrier_count(), 1);
    }

    #[test]
    fn barrier_replacement_drops_the_old_field() {
        let (_, _, mut landscape) = setup();
        let reference = landscape.clone();

        landscape.set_barrier((0.0, 0.0), 2.0, 2.0, Some("brain_shield")).unwrap();
        landscape.set_barrier((0.0, 0.0), 0.0, 2.0, Some("brain_shield")).unwrap();

        assert_eq!(landscape.total(), reference.total());
    }

    #[test]
    fn distinct_ids_stack() {
        let (grid, _, mut landscape) = setup();
        let center = grid.index(16, 16);
        let base = landscape.total()[center];

        landscape.set_barrier((0.0, 0.0), 1.0, 2.0, Some("a")).unwrap();
        let one = landscape.total()[center];
        landscape.set_barrier((0.0, 0.0), 1.0, 2.0, Some("b")).unwrap();
        let two = landscape.total()[center];

        assert!(one > base);
        assert!(((two - base) - 2.0 * (one - base)).abs() < 1e-12);
    }

    #[test]
    fn derived_ids_collide_by_position() {
        let (_, _, mut landscape) = setup();
        let k1 = landscape.set_barrier((3.0, 4.0), 1.0, 1.0, None).unwrap();
        let k2 = landscape.set_barrier((3.0, 4.0), 0.2, 0.5, None).unwrap();
        assert_eq!(k1, "barrier_3.0_4.0");
        assert_eq!(k1, k2);
        assert_eq!(landscape.barrier_count(), 1);

        let k3 = landscape.set_barrier((3.5, 4.0), 1.0, 1.0, None).unwrap();
        assert_eq!(k3, "barrier_3.5_4.0");
        assert_eq!(landscape.barrier_count(), 2);
    }

    #[test]
    fn non_positive_width_is_rejected() {
        let (grid, _, mut landscape) = setup();
        let before = landscape.total().to_vec();
        // Exactly on a grid point, where a zero width would evaluate exp(-0/0)
        let on_grid = (grid.x_at(16), grid.y_at(16));

        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = landscape.set_barrier(on_grid, 1.0, width, Some("bad"));
            assert!(
                matches!(err, Err(FieldError::InvalidBarrierWidth(_))),
                "width {} accepted",
                width
            );
        }
        assert_eq!(landscape.total(), before.as_slice());
        assert_eq!(landscape.barrier_count(), 0);
        assert!(landscape.total().iter().all(|v| v.is_finite()));
    }

    // ── Channels ───────────────────────────────────────────────────────

    #[test]
    fn coupling_accumulates_exactly() {
        let (_, catalog, mut twice) = setup();
        let mut double = twice.clone();

        twice.add_coupling(&catalog, "Intuition", "Logic", 1.0).unwrap();
        let after_one: Vec<f64> = twice.coupling().to_vec();
        twice.add_coupling(&catalog, "Intuition", "Logic", 1.0).unwrap();
        double.add_coupling(&catalog, "Intuition", "Logic", 2.0).unwrap();

        for ((a, b), one) in twice
            .coupling()
            .iter()
            .zip(double.coupling())
            .zip(&after_one)
        {
            assert!((a - b).abs() < 1e-12);
            assert!(*a <= *one);
        }
        let deepest = twice.coupling().iter().cloned().fold(0.0, f64::min);
        let deepest_one = after_one.iter().cloned().fold(0.0, f64::min);
        assert!(deepest < deepest_one);
    }

    #[test]
    fn channel_is_deepest_between_the_modes() {
        let (grid, catalog, mut landscape) = setup();
        landscape.add_coupling(&catalog, "Brain", "Executor", 3.0).unwrap();
        // Brain at origin, Executor on the inner ring at 120°
        let (ex, ey) = catalog.by_name("Executor").unwrap().position;
        let (mid_x, mid_y) = (ex / 2.0, ey / 2.0);
        let coupling = landscape.coupling();
        let (min_idx, min_val) = coupling
            .iter()
            .enumerate()
            .fold((0, 0.0), |acc, (i, &v)| if v < acc.1 { (i, v) } else { acc });
        assert!(min_val < -2.0);
        let (col, row) = (min_idx % grid.nx(), min_idx / grid.nx());
        assert!((grid.x_at(col) - mid_x).abs() < grid.dx() * 2.0);
        assert!((grid.y_at(row) - mid_y).abs() < grid.dx() * 2.0);
    }

    #[test]
    fn unknown_mode_leaves_landscape_untouched() {
        let (_, catalog, mut landscape) = setup();
        landscape.set_barrier((0.0, 0.0), 0.5, 2.0, Some("brain_shield")).unwrap();
        let before = landscape.total().to_vec();

        let err = landscape.add_coupling(&catalog, "Nope", "Brain", 1.0);
        assert_eq!(err, Err(FieldError::ModeNotFound("Nope".into())));
        let err = landscape.add_coupling(&catalog, "Brain", "Nope", 1.0);
        assert!(err.is_err());

        assert_eq!(landscape.total(), before.as_slice());
        assert!(landscape.coupling().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn self_channel_is_rejected() {
        let (_, catalog, mut landscape) = setup();
        let before = landscape.total().to_vec();
        let err = landscape.add_coupling(&catalog, "Logic", "Logic", 1.0);
        assert!(matches!(err, Err(FieldError::CoincidentModes(_))));
        assert_eq!(landscape.total(), before.as_slice());
    }
}
