//! Field evolution engine.
//!
//! # The propagator
//!
//! The field obeys a damped Gross–Pitaevskii / nonlinear Schrödinger equation
//!
//! ```text
//! i ∂ψ/∂t = -(κ/2)∇²ψ + (V + g|ψ|²)ψ - iγψ
//! ```
//!
//! integrated with Strang splitting: half kinetic step in Fourier space
//! (`exp(-i·dt·κ·|k|²/4)`), full potential + nonlinear + damping step in real
//! space (`exp(-i·dt·(V + g|ψ|²) - γ·dt)`), second half kinetic step.
//!
//! # Norm
//!
//! `Σ|ψ|²·dx² = 1` holds after every public call. `evolve` renormalizes once
//! per batch (damping drift inside a batch is tolerated), `meditate`
//! renormalizes every iteration since imaginary-time descent is not unitary.
//!
//! # Viscosity
//!
//! `set_viscosity(level)` maps `level ∈ [0, 1]` linearly onto the kinetic
//! scale κ: 0 → 1.0 (superfluid, full dispersion), 1 → 0.1 (sticky).

use log::debug;
use num_complex::Complex;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::grid::{Grid, SpectralTransform};
use crate::landscape::PotentialLandscape;
use crate::modes::ModeCatalog;

/// Width σ of the initial centered Gaussian.
pub const INITIAL_WIDTH: f64 = 2.0;

/// A single cognitive field: grid, landscape, modes and the complex state ψ.
#[derive(Debug, Clone)]
pub struct FluidField {
    pub(crate) config: FieldConfig,
    pub(crate) grid: Grid,
    pub(crate) transform: SpectralTransform,
    pub(crate) modes: ModeCatalog,
    pub(crate) landscape: PotentialLandscape,
    pub(crate) psi: Vec<Complex<f64>>,
    pub(crate) time: f64,
    pub(crate) kinetic_scale: f64,
}

impl FluidField {
    /// Build a field in its initial state: a normalized centered Gaussian
    /// in the static landscape, with no barriers or channels.
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.validate()?;

        let grid = Grid::new(config.grid_size, config.domain_size);
        let transform = SpectralTransform::new(&grid);
        let modes = ModeCatalog::new(config.n_modes, config.lattice_radius);
        let landscape = PotentialLandscape::new(&grid, &modes.positions());

        let psi = grid
            .gaussian((0.0, 0.0), 2.0 * INITIAL_WIDTH * INITIAL_WIDTH)
            .into_iter()
            .map(|a| Complex::new(a, 0.0))
            .collect();

        let mut field = Self {
            config,
            grid,
            transform,
            modes,
            landscape,
            psi,
            time: 0.0,
            kinetic_scale: 1.0,
        };
        field.normalize();

        debug!(
            "field created: {}×{} grid, L={}, {} modes",
            field.grid.nx(),
            field.grid.ny(),
            field.grid.domain_size(),
            field.modes.len()
        );
        Ok(field)
    }

    // =========================================================================
    // EVOLUTION
    // =========================================================================

    /// Advance the field by `steps` split-step iterations, then renormalize.
    pub fn evolve(&mut self, steps: usize) {
        let dt = self.config.dt;
        let kinetic: Vec<Complex<f64>> = self
            .grid
            .k2()
            .iter()
            .map(|&k2| Complex::from_polar(1.0, -dt * k2 * self.kinetic_scale / 4.0))
            .collect();
        let damping = (-self.config.gamma * dt).exp();
        let g = self.config.g;

        for _ in 0..steps {
            self.kinetic_half_step(&kinetic);

            for (psi, &v) in self.psi.iter_mut().zip(self.landscape.total()) {
                let v_total = v + g * psi.norm_sqr();
                *psi *= Complex::from_polar(damping, -dt * v_total);
            }

            self.kinetic_half_step(&kinetic);
            self.time += dt;
        }

        self.normalize();
    }

    fn kinetic_half_step(&mut self, kinetic: &[Complex<f64>]) {
        self.transform.forward(&mut self.psi);
        for (psi, &k) in self.psi.iter_mut().zip(kinetic) {
            *psi *= k;
        }
        self.transform.inverse(&mut self.psi);
    }

    /// Imaginary-time relaxation toward a coherent low-energy state.
    ///
    /// Uses a periodic five-point Laplacian and the descent step
    /// `ψ ← ψ - dt·Hψ`, renormalizing every iteration. Does not advance time.
    pub fn meditate(&mut self, steps: usize) {
        let (nx, ny) = (self.grid.nx(), self.grid.ny());
        let inv_dx2 = 1.0 / self.grid.cell_area();
        let dt = self.config.dt;
        let g = self.config.g;
        let mut next = vec![Complex::new(0.0, 0.0); self.psi.len()];

        for _ in 0..steps {
            let psi = &self.psi;
            let potential = self.landscape.total();
            for row in 0..ny {
                let up = (row + ny - 1) % ny;
                let down = (row + 1) % ny;
                for col in 0..nx {
                    let left = (col + nx - 1) % nx;
                    let right = (col + 1) % nx;
                    let idx = row * nx + col;
                    let center = psi[idx];

                    let laplacian = (psi[up * nx + col] + psi[down * nx + col] - center * 2.0
                        + psi[row * nx + left]
                        + psi[row * nx + right]
                        - center * 2.0)
                        * inv_dx2;
                    let v_total = potential[idx] + g * center.norm_sqr();
                    let h_psi = laplacian * -0.5 + center * v_total;

                    next[idx] = center - h_psi * dt;
                }
            }
            std::mem::swap(&mut self.psi, &mut next);
            self.normalize();
        }

        debug!("relaxation finished after {} steps", steps);
    }

    /// Set viscosity level in [0, 1] (clamped); 0 = superfluid, 1 = sticky.
    pub fn set_viscosity(&mut self, level: f64) {
        let level = level.clamp(0.0, 1.0);
        self.kinetic_scale = 1.0 - 0.9 * level;
        debug!(
            "viscosity set: level={:.2}, kinetic scale={:.2}",
            level, self.kinetic_scale
        );
    }

    // =========================================================================
    // LANDSCAPE
    // =========================================================================

    /// Insert or replace a Gaussian barrier; see [`PotentialLandscape::set_barrier`].
    ///
    /// Pass a stable `id` when adjusting the same barrier repeatedly so that
    /// calls overwrite instead of stacking.
    pub fn set_barrier(
        &mut self,
        position: (f64, f64),
        strength: f64,
        width: f64,
        id: Option<&str>,
    ) -> Result<String> {
        self.landscape.set_barrier(position, strength, width, id)
    }

    /// Open (or deepen) a channel between two named modes.
    pub fn add_coupling(&mut self, mode_a: &str, mode_b: &str, strength: f64) -> Result<()> {
        self.landscape
            .add_coupling(&self.modes, mode_a, mode_b, strength)
    }

    /// Effective potential V_static + Σbarriers + coupling.
    pub fn total_potential(&self) -> &[f64] {
        self.landscape.total()
    }

    /// Lattice position of a named mode.
    pub fn mode_position(&self, name: &str) -> Result<(f64, f64)> {
        self.modes.by_name(name).map(|m| m.position)
    }

    // =========================================================================
    // STATE
    // =========================================================================

    /// Rescale ψ so that Σ|ψ|²·dx² = 1.
    pub(crate) fn normalize(&mut self) {
        let total = self.norm();
        let scale = 1.0 / (total + f64::MIN_POSITIVE).sqrt();
        for v in self.psi.iter_mut() {
            *v *= scale;
        }
    }

    /// Current Σ|ψ|²·dx².
    pub fn norm(&self) -> f64 {
        self.psi.iter().map(|v| v.norm_sqr()).sum::<f64>() * self.grid.cell_area()
    }

    /// Probability density |ψ|², row-major.
    pub fn density(&self) -> Vec<f64> {
        self.psi.iter().map(|v| v.norm_sqr()).collect()
    }

    /// Complex field ψ, row-major.
    pub fn field(&self) -> &[Complex<f64>] {
        &self.psi
    }

    /// Simulated time, advanced by dt per propagation step.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current kinetic scale κ.
    pub fn viscosity_scale(&self) -> f64 {
        self.kinetic_scale
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn modes(&self) -> &ModeCatalog {
        &self.modes
    }

    pub fn landscape(&self) -> &PotentialLandscape {
        &self.landscape
    }
}
