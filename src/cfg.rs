#[cfg(feature = "serde")]
use serde::Deserialize;

fn default_min_elevation() -> f64 {
    10.0
}

fn default_max_gross_residual() -> f64 {
    0.5E6
}

fn default_min_sv() -> usize {
    4
}

/// Position estimator configuration.
/// The iteration caps and convergence tolerance are not configurable:
/// they bound the worst case latency per epoch and are fixed in [crate::prelude::Solver].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// Elevation cutoff in degrees. Satellites at or below this
    /// elevation are discarded (atmospheric and multipath unreliability).
    #[cfg_attr(feature = "serde", serde(default = "default_min_elevation"))]
    pub min_elevation_deg: f64,
    /// Blunder picker [m]: a satellite whose pseudorange departs from the
    /// predicted geometric range by more than this is discarded as a gross outlier.
    #[cfg_attr(feature = "serde", serde(default = "default_max_gross_residual"))]
    pub max_gross_residual_m: f64,
    /// Minimum usable satellites: 4 unknowns require at least 4 equations.
    #[cfg_attr(feature = "serde", serde(default = "default_min_sv"))]
    pub min_sv: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_elevation_deg: default_min_elevation(),
            max_gross_residual_m: default_max_gross_residual(),
            min_sv: default_min_sv(),
        }
    }
}
