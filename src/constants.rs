//! Physical constants and wire format conventions.

/// Speed of light in vacuum [m/s]
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Pseudorange readings at or below this threshold denote a missing
/// measurement, not a null range [m].
pub const PSEUDORANGE_EPSILON_M: f64 = 1.0E-6;
