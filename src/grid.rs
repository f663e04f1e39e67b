//! Discretized square domain and its spectral (Fourier) dual.
//!
//! The grid is stored row-major: row `j` is the y index, column `i` the x
//! index, so the flat index of `(i, j)` is `j * nx + i`.
//!
//! Spatial coordinates are `linspace(-L/2, L/2, N)`; the integration step is
//! `dx = L / Nx` and is the one used for norms and for the frequency axis
//! `k = 2π · fftfreq(N, dx)` (zero frequency first, negative half last).

use std::fmt;
use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Immutable grid geometry: coordinates, conjugate frequencies and |k|².
#[derive(Debug, Clone)]
pub struct Grid {
    nx: usize,
    ny: usize,
    domain_size: f64,
    dx: f64,
    x: Vec<f64>,
    y: Vec<f64>,
    kx: Vec<f64>,
    ky: Vec<f64>,
    /// Kx² + Ky², row-major
    k2: Vec<f64>,
}

impl Grid {
    /// Build the grid for `(nx, ny)` points over a domain of side `domain_size`.
    ///
    /// Dimensions must be at least 2 (checked by `FieldConfig::validate`).
    pub fn new(grid_size: (usize, usize), domain_size: f64) -> Self {
        let (nx, ny) = grid_size;
        let dx = domain_size / nx as f64;

        let x = linspace(-domain_size / 2.0, domain_size / 2.0, nx);
        let y = linspace(-domain_size / 2.0, domain_size / 2.0, ny);

        let two_pi = 2.0 * std::f64::consts::PI;
        let kx: Vec<f64> = fft_frequencies(nx, dx).iter().map(|f| two_pi * f).collect();
        let ky: Vec<f64> = fft_frequencies(ny, dx).iter().map(|f| two_pi * f).collect();

        let mut k2 = Vec::with_capacity(nx * ny);
        for &kyj in &ky {
            for &kxi in &kx {
                k2.push(kxi * kxi + kyj * kyj);
            }
        }

        Self {
            nx,
            ny,
            domain_size,
            dx,
            x,
            y,
            kx,
            ky,
            k2,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn domain_size(&self) -> f64 {
        self.domain_size
    }

    /// Integration step dx = L / Nx.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Area element dx².
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dx
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn kx(&self) -> &[f64] {
        &self.kx
    }

    pub fn ky(&self) -> &[f64] {
        &self.ky
    }

    /// Kinetic multiplier |k|² on the spectral grid (row-major).
    pub fn k2(&self) -> &[f64] {
        &self.k2
    }

    /// x coordinate of column `col`.
    #[inline]
    pub fn x_at(&self, col: usize) -> f64 {
        self.x[col]
    }

    /// y coordinate of row `row`.
    #[inline]
    pub fn y_at(&self, row: usize) -> f64 {
        self.y[row]
    }

    /// Flat index of (col, row).
    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.nx + col
    }

    /// Evaluate `f(x, y)` at every grid point, row-major.
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(f64, f64) -> T,
    {
        let mut out = Vec::with_capacity(self.len());
        for &yj in &self.y {
            for &xi in &self.x {
                out.push(f(xi, yj));
            }
        }
        out
    }

    /// Isotropic Gaussian `exp(-|r - center|² / denom)` sampled on the grid.
    pub fn gaussian(&self, center: (f64, f64), denom: f64) -> Vec<f64> {
        let (x0, y0) = center;
        self.map(|x, y| (-((x - x0).powi(2) + (y - y0).powi(2)) / denom).exp())
    }
}

/// `n` evenly spaced samples from `start` to `stop` inclusive.
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
        .collect()
}

/// Sample frequencies of a length-`n` DFT with spacing `d`: `[0, 1, ..., -1] / (n·d)`.
fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    let positive = (n + 1) / 2;
    (0..n)
        .map(|i| {
            let k = if i < positive { i as f64 } else { i as f64 - n as f64 };
            k / (n as f64 * d)
        })
        .collect()
}

/// Planned forward/inverse 2D FFT over a row-major `nx × ny` array.
///
/// Rows are transformed in place, then columns through a transposed scratch
/// buffer. The inverse is normalized by 1/(nx·ny).
#[derive(Clone)]
pub struct SpectralTransform {
    nx: usize,
    ny: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .finish_non_exhaustive()
    }
}

impl SpectralTransform {
    pub fn new(grid: &Grid) -> Self {
        let (nx, ny) = (grid.nx(), grid.ny());
        let mut planner = FftPlanner::new();
        Self {
            nx,
            ny,
            row_forward: planner.plan_fft_forward(nx),
            row_inverse: planner.plan_fft_inverse(nx),
            col_forward: planner.plan_fft_forward(ny),
            col_inverse: planner.plan_fft_inverse(ny),
            scratch: vec![Complex::new(0.0, 0.0); nx * ny],
        }
    }

    /// In-place forward 2D transform.
    pub fn forward(&mut self, data: &mut [Complex<f64>]) {
        assert_eq!(data.len(), self.nx * self.ny, "field/grid size mismatch");
        self.row_forward.process(data);
        transpose(data, &mut self.scratch, self.ny, self.nx);
        self.col_forward.process(&mut self.scratch);
        transpose(&self.scratch, data, self.nx, self.ny);
    }

    /// In-place inverse 2D transform (normalized).
    pub fn inverse(&mut self, data: &mut [Complex<f64>]) {
        assert_eq!(data.len(), self.nx * self.ny, "field/grid size mismatch");
        self.row_inverse.process(data);
        transpose(data, &mut self.scratch, self.ny, self.nx);
        self.col_inverse.process(&mut self.scratch);
        transpose(&self.scratch, data, self.nx, self.ny);

        let scale = 1.0 / (self.nx * self.ny) as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }
}

/// Transpose a row-major `rows × cols` matrix into `dst` (`cols × rows`).
fn transpose(src: &[Complex<f64>], dst: &mut [Complex<f64>], rows: usize, cols: usize) {
    for r in 0..rows {
        for c in 0..cols {
            dst[c * rows + r] = src[r * cols + c];
        }
    }
}
