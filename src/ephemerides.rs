use crate::prelude::{Epoch, Vector3, SV};

/// One broadcast navigation record, valid near its reference time.
/// The estimator borrows a record for the duration of one satellite's
/// contribution to one iteration: orbit propagation and data management
/// remain entirely on the implementor's side.
pub trait Ephemerides {
    /// SV clock polynomial coefficients (a0 [s], a1 [s/s], a2 [s/s²])
    fn clock_coefficients(&self) -> (f64, f64, f64);
    /// SV clock reference time (Toc)
    fn clock_reference_time(&self) -> Epoch;
    /// Rate of right ascension [rad/s], used to undo Earth rotation
    /// during signal transit
    fn omega_dot(&self) -> f64;
    /// Propagates this record to the SV ECEF position [m] at given
    /// GPS week second
    fn position(&self, t_week_s: f64) -> Vector3<f64>;
}

/// Ephemerides data source. Implement this trait to feed the estimator
/// from your navigation data store (RINEX NAV, SP3, a database..).
pub trait EphemeridesSource {
    type Record: Ephemerides;

    /// Returns the navigation record closest in time to given Epoch
    /// for this SV, or None when the feed has a gap there.
    fn find_close_record(&self, t: Epoch, sv: SV) -> Option<&Self::Record>;
}
