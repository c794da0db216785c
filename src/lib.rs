#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod apriori;
mod cfg;
mod constants;
mod ephemerides;
mod navigation;
mod observation;
mod solutions;
mod solver;
mod time;

// pub export
pub use solver::Error;


// prelude
pub mod prelude {
    pub use crate::apriori::AprioriPosition;
    pub use crate::cfg::Config;
    pub use crate::constants::{PSEUDORANGE_EPSILON_M, SPEED_OF_LIGHT_M_S};
    pub use crate::ephemerides::{Ephemerides, EphemeridesSource};
    pub use crate::observation::{ObservationData, ObservationHeader, ObservationRecord};
    pub use crate::solutions::PVTSolution;
    pub use crate::solver::{Error, Solver};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}
