//! Construction parameters and physical constants of the field.

use crate::error::{FieldError, Result};

/// Configuration for a cognitive field simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Grid dimensions (Nx, Ny)
    pub grid_size: (usize, usize),
    /// Side length L of the square domain [-L/2, L/2]²
    pub domain_size: f64,
    /// Number of modes in the catalog
    pub n_modes: usize,
    /// Fixed time step of the propagator
    pub dt: f64,
    /// Self-interaction strength (negative = attractive, bright soliton)
    pub g: f64,
    /// Linear damping (forgetting) rate
    pub gamma: f64,
    /// Outer radius of the hexagonal mode lattice
    pub lattice_radius: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_size: (128, 128),
            domain_size: 20.0,
            n_modes: 16,
            dt: 0.01,
            g: -1.0,
            gamma: 0.01,
            lattice_radius: 6.0,
        }
    }
}

impl FieldConfig {
    /// Default physics on an `nx × ny` grid.
    pub fn with_grid(nx: usize, ny: usize) -> Self {
        Self {
            grid_size: (nx, ny),
            ..Default::default()
        }
    }

    pub fn with_domain_size(mut self, domain_size: f64) -> Self {
        self.domain_size = domain_size;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_interaction(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    /// Set the damping rate; `0.0` gives norm-conserving dynamics.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_modes(mut self, n_modes: usize) -> Self {
        self.n_modes = n_modes;
        self
    }

    /// Spatial integration step dx = L / Nx.
    pub fn dx(&self) -> f64 {
        self.domain_size / self.grid_size.0 as f64
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let (nx, ny) = self.grid_size;
        if nx < 2 || ny < 2 {
            return Err(FieldError::InvalidConfig(format!(
                "grid must be at least 2×2, got {}×{}",
                nx, ny
            )));
        }
        if !(self.domain_size.is_finite() && self.domain_size > 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "domain_size must be positive, got {}",
                self.domain_size
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !self.g.is_finite() || !self.gamma.is_finite() {
            return Err(FieldError::InvalidConfig(
                "g and gamma must be finite".into(),
            ));
        }
        if self.n_modes == 0 {
            return Err(FieldError::InvalidConfig("n_modes must be > 0".into()));
        }
        if !(self.lattice_radius.is_finite() && self.lattice_radius >= 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "lattice_radius must be non-negative, got {}",
                self.lattice_radius
            )));
        }
        Ok(())
    }
}
