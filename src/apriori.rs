use crate::prelude::Vector3;
use map_3d::{deg2rad, ecef2geodetic, geodetic2ecef, Ellipsoid};

/// Apriori receiver position, the linearization point of the
/// position estimator. Usually the surveyed marker position, or the
/// approximate position advertised by the observation file header.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AprioriPosition {
    /// ECEF coordinates in meters
    ecef: Vector3<f64>,
    /// Geodetic coordinates in radians
    geodetic: Vector3<f64>,
}

impl AprioriPosition {
    /// Returns Geodetic coordinates in radians
    pub fn geodetic_rad(&self) -> Vector3<f64> {
        self.geodetic
    }
    /// Returns coordinates in ECEF [m]
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }
    /// Builds Self from ECEF position [m]
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (x, y, z) = (ecef[0], ecef[1], ecef[2]);
        let (lat, lon, h) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        Self {
            ecef,
            geodetic: Vector3::new(lat, lon, h),
        }
    }
    /// Builds Self from Geodetic coordinates (latitude [ddeg], longitude [ddeg], altitude above sea [m])
    pub fn from_geo_ddeg(coords: Vector3<f64>) -> Self {
        let rad = Vector3::<f64>::new(deg2rad(coords[0]), deg2rad(coords[1]), coords[2]);
        Self::from_geo_rad(rad)
    }
    /// Builds Self from Geodetic coordinates (latitude [rad], longitude [rad], altitude above sea [m])
    pub fn from_geo_rad(coords: Vector3<f64>) -> Self {
        let (x, y, z) = geodetic2ecef(coords[0], coords[1], coords[2], Ellipsoid::WGS84);
        Self {
            geodetic: coords,
            ecef: Vector3::new(x, y, z),
        }
    }
    /// Computes Elevation and Azimuth angles [rad] of given ECEF position [m]
    /// in the Sky, about this position on ground.
    pub(crate) fn elevation_azimuth_rad(&self, position: Vector3<f64>) -> (f64, f64) {
        let (ref_lat, ref_lon) = (self.geodetic[0], self.geodetic[1]);

        let a_i = position - self.ecef;
        let a_i = a_i / a_i.norm();

        // ECEF to local NEU transform
        let north = -ref_lat.sin() * ref_lon.cos() * a_i[0]
            - ref_lat.sin() * ref_lon.sin() * a_i[1]
            + ref_lat.cos() * a_i[2];
        let east = -ref_lon.sin() * a_i[0] + ref_lon.cos() * a_i[1];
        let up = ref_lat.cos() * ref_lon.cos() * a_i[0]
            + ref_lat.cos() * ref_lon.sin() * a_i[1]
            + ref_lat.sin() * a_i[2];

        let el = up.asin();
        let mut az = east.atan2(north);
        if az < 0.0 {
            az += 2.0 * std::f64::consts::PI;
        }
        (el, az)
    }
}
