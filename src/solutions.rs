//! Per epoch position solutions.
use crate::prelude::{Epoch, Vector3, SV};

/// Resolved receiver state for one observation epoch.
#[derive(Debug, Clone)]
pub struct PVTSolution {
    /// Observation Epoch this solution was resolved for
    pub epoch: Epoch,
    /// Receiver position, ECEF [m]
    pub position: Vector3<f64>,
    /// Receiver clock error [s]. A good warm start for the next epoch.
    pub clock_error_s: f64,
    /// Satellites that contributed an equation to the final iteration
    pub sv: Vec<SV>,
    /// Outer (position refinement) iterations consumed
    pub iterations: usize,
}
