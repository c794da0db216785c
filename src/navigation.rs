//! Weighted normal equations assembly and resolution.
use log::debug;
use nalgebra::{DMatrix, DVector, MatrixXx4, Vector4};

use crate::prelude::SV;

/// One linearized pseudorange equation and the equation system built
/// from the retained satellites only: disposed satellites never reserve
/// a row.
#[derive(Debug, Default)]
pub(crate) struct Navigation {
    /// [aX, aY, aZ, 1] rows
    rows: Vec<[f64; 4]>,
    /// observation residuals [m]
    residuals: Vec<f64>,
    /// sin²(elevation) weights
    weights: Vec<f64>,
    /// contributors, in row order
    sv: Vec<SV>,
}

impl Navigation {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            residuals: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity),
            sv: Vec::with_capacity(capacity),
        }
    }
    /// Loads one equation: partial derivatives of range with respect to
    /// (X, Y, Z) plus the clock column, the observation residual, and
    /// its weight.
    pub fn load(&mut self, sv: SV, unit: (f64, f64, f64), residual: f64, weight: f64) {
        self.rows.push([unit.0, unit.1, unit.2, 1.0]);
        self.residuals.push(residual);
        self.weights.push(weight);
        self.sv.push(sv);
    }
    /// Number of loaded equations
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// Contributing satellites, in row order
    pub fn sv(&self) -> &[SV] {
        &self.sv
    }
    /// Solves (GᵀWG)⁻¹GᵀW·y. Returns None when the normal matrix is
    /// singular (degenerate geometry).
    pub fn resolve(&self) -> Option<Vector4<f64>> {
        let n = self.rows.len();
        let mut g = MatrixXx4::<f64>::zeros(n);
        for (row, coeffs) in self.rows.iter().enumerate() {
            for (col, coeff) in coeffs.iter().enumerate() {
                g[(row, col)] = *coeff;
            }
        }
        let y = DVector::from_column_slice(&self.residuals);
        let w = DMatrix::from_diagonal(&DVector::from_column_slice(&self.weights));

        debug!("G: {} Y: {} W: {}", g, y, w);

        let g_prime = g.transpose();
        let p = (&g_prime * &w * &g).try_inverse()?;
        Some(p * (g_prime * w * y))
    }
}
