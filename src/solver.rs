//! Per epoch receiver position estimator.
use log::{debug, error, warn};
use map_3d::deg2rad;
use thiserror::Error;

use nalgebra::{Matrix3, Vector3};

use crate::{
    cfg::Config,
    constants::{PSEUDORANGE_EPSILON_M, SPEED_OF_LIGHT_M_S},
    ephemerides::{Ephemerides, EphemeridesSource},
    navigation::Navigation,
    observation::ObservationRecord,
    prelude::{AprioriPosition, Epoch, PVTSolution, SV},
    time::gps_week_second,
};

/// Position refinement and signal transit iteration caps: the sole
/// bound on worst case latency per epoch.
const MAX_ITER: usize = 100;
/// Convergence tolerance, for both the position correction norm [m]
/// and the emission time fixed point [s]
const ITER_TOL: f64 = 1.0E-8;
/// Signal transit time seed [s]
const TRANSIT_SEED_S: f64 = 0.075;

/// Estimation errors. Each failed epoch is independent: none of these
/// aborts a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The navigation feed has a gap: no record close enough to this
    /// epoch for a satellite we needed. The whole epoch is rejected,
    /// there is no partial result.
    #[error("no ephemeris found close to {0} for {1}")]
    MissingEphemeris(Epoch, SV),
    /// The emission time fixed point did not stabilize within the
    /// iteration cap for this satellite
    #[error("signal transit iteration did not converge for {0}")]
    TransitNonConvergence(SV),
    /// The position refinement did not converge within the iteration cap
    #[error("position iteration did not converge")]
    NonConvergence,
    /// Fewer usable satellites than unknowns after disposal
    #[error("not enough usable observations ({0} left after disposal)")]
    InsufficientObservations(usize),
    /// Degenerate geometry: the weighted normal matrix is singular
    #[error("failed to invert normal equations")]
    MatrixInversion,
}

/// Per satellite disposal verdict: the satellite contributes no
/// equation but the epoch survives.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Disposal {
    /// Missing measurement sentinel (data partly lost)
    MissingPseudoRange,
    /// At or below the elevation cutoff
    LowElevation,
    /// Pseudorange departs from the predicted range beyond the
    /// blunder picker
    Blunder,
}

/// One satellite's contribution to the equation system
struct Contribution {
    unit: (f64, f64, f64),
    residual: f64,
    weight: f64,
}

/// Pseudorange position estimator.
///
/// Stateless between epochs: [Solver::resolve] is a pure function of
/// one [ObservationRecord], an ephemerides source and the apriori
/// position, so epochs may be resolved in parallel from shared
/// references.
#[derive(Debug, Clone)]
pub struct Solver {
    cfg: Config,
    apriori: AprioriPosition,
}

impl Solver {
    /// Builds a new [Solver] around given apriori position, which
    /// serves as linearization point and local horizon reference.
    pub fn new(cfg: Config, apriori: AprioriPosition) -> Self {
        Self { cfg, apriori }
    }

    /// Resolves the receiver position and clock error for one epoch,
    /// with a null initial clock error.
    pub fn resolve<S: EphemeridesSource>(
        &self,
        record: &ObservationRecord,
        source: &S,
    ) -> Result<PVTSolution, Error> {
        self.resolve_with_clock(record, source, 0.0)
    }

    /// Resolves one epoch, seeding the receiver clock error estimate [s].
    /// Feeding the previous epoch's [PVTSolution::clock_error_s] back in
    /// here saves a couple of iterations on dense records.
    pub fn resolve_with_clock<S: EphemeridesSource>(
        &self,
        record: &ObservationRecord,
        source: &S,
        initial_clock_s: f64,
    ) -> Result<PVTSolution, Error> {
        let cutoff_rad = deg2rad(self.cfg.min_elevation_deg);
        let rec_time_f = gps_week_second(record.epoch);

        let mut rec_coord = self.apriori.ecef();
        let mut clock_error = initial_clock_s;

        for iteration in 0..MAX_ITER {
            let mut nav = Navigation::with_capacity(record.sv.len());
            let mut disposed = 0_usize;

            // the disposal set is recomputed in full on every pass:
            // elevation and residual verdicts depend on the current
            // receiver estimate
            for (index, sv) in record.sv.iter().enumerate() {
                let pseudorange = record.pseudorange_c1c[index];
                match self.contribution(
                    record.epoch,
                    *sv,
                    pseudorange,
                    source,
                    rec_time_f,
                    rec_coord,
                    clock_error,
                    cutoff_rad,
                )? {
                    Ok(eq) => nav.load(*sv, eq.unit, eq.residual, eq.weight),
                    Err(verdict) => {
                        debug!("{} ({}) - disposed: {:?}", record.epoch, sv, verdict);
                        disposed += 1;
                    },
                }
            }

            if nav.len() < self.cfg.min_sv {
                warn!(
                    "{} - {} disposed, {} left: under determined",
                    record.epoch,
                    disposed,
                    nav.len()
                );
                return Err(Error::InsufficientObservations(nav.len()));
            }

            let solution = nav.resolve().ok_or(Error::MatrixInversion)?;
            let correction = Vector3::new(solution[0], solution[1], solution[2]);

            rec_coord += correction;
            clock_error = solution[3] / SPEED_OF_LIGHT_M_S;

            debug!(
                "{} - iteration {}: correction {:.3e} m",
                record.epoch,
                iteration,
                correction.norm()
            );

            if correction.norm() < ITER_TOL {
                return Ok(PVTSolution {
                    epoch: record.epoch,
                    position: rec_coord,
                    clock_error_s: clock_error,
                    sv: nav.sv().to_vec(),
                    iterations: iteration + 1,
                });
            }
        }

        error!("{} - did not converge in {} iterations", record.epoch, MAX_ITER);
        Err(Error::NonConvergence)
    }

    /// One satellite's contribution to one refinement pass: a pure
    /// function of the epoch data, its ephemeris and the current
    /// receiver estimate. Outer Err aborts the epoch; inner Err is a
    /// per satellite disposal.
    #[allow(clippy::too_many_arguments)]
    fn contribution<S: EphemeridesSource>(
        &self,
        epoch: Epoch,
        sv: SV,
        pseudorange: f64,
        source: &S,
        rec_time_f: f64,
        rec_coord: Vector3<f64>,
        clock_error: f64,
        cutoff_rad: f64,
    ) -> Result<Result<Contribution, Disposal>, Error> {
        if pseudorange < PSEUDORANGE_EPSILON_M {
            return Ok(Err(Disposal::MissingPseudoRange));
        }

        let eph = source
            .find_close_record(epoch, sv)
            .ok_or(Error::MissingEphemeris(epoch, sv))?;

        // Earth turns during signal transit: undo the rotation spanned
        // by the pseudorange implied transit time
        let angle = eph.omega_dot() * pseudorange / SPEED_OF_LIGHT_M_S;
        let (sin, cos) = angle.sin_cos();
        let rotation = Matrix3::new(cos, sin, 0.0, -sin, cos, 0.0, 0.0, 0.0, 1.0);

        // emission time / satellite position fixed point
        let mut transit_s = TRANSIT_SEED_S;
        let mut emission_s = 0.0_f64;
        let mut sat_coord = Vector3::<f64>::zeros();
        let mut stabilized = false;
        for _ in 0..MAX_ITER {
            let previous = emission_s;
            emission_s = rec_time_f - clock_error - transit_s;
            sat_coord = rotation * eph.position(emission_s);
            if (emission_s - previous).abs() <= ITER_TOL {
                stabilized = true;
                break;
            }
            transit_s = (sat_coord - rec_coord).norm() / SPEED_OF_LIGHT_M_S;
        }
        if !stabilized {
            return Err(Error::TransitNonConvergence(sv));
        }

        let (elevation, azimuth) = self.apriori.elevation_azimuth_rad(sat_coord);
        if below_cutoff(elevation, cutoff_rad) {
            debug!("{} ({}) - elev {:.2}° azim {:.2}°", epoch, sv, elevation.to_degrees(), azimuth.to_degrees());
            return Ok(Err(Disposal::LowElevation));
        }

        let rho = (rec_coord - sat_coord).norm();
        if (rho - pseudorange).abs() > self.cfg.max_gross_residual_m {
            return Ok(Err(Disposal::Blunder));
        }

        let (a0, a1, a2) = eph.clock_coefficients();
        let dt = emission_s - gps_week_second(eph.clock_reference_time());
        let sv_clock = a0 + a1 * dt + a2 * dt.powi(2);

        Ok(Ok(Contribution {
            unit: (
                (rec_coord[0] - sat_coord[0]) / rho,
                (rec_coord[1] - sat_coord[1]) / rho,
                (rec_coord[2] - sat_coord[2]) / rho,
            ),
            residual: pseudorange - rho + SPEED_OF_LIGHT_M_S * sv_clock,
            weight: elevation.sin().powi(2),
        }))
    }
}

/// Low elevation disposal boundary: inclusive at exactly the cutoff.
fn below_cutoff(elevation_rad: f64, cutoff_rad: f64) -> bool {
    elevation_rad <= cutoff_rad
}
