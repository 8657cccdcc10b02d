//! WGS84 inverse geodesic computations.
//!
//! Thin wrapper around Karney's geodesic algorithms: given two fixes, the
//! forward azimuth, back azimuth, and surface distance between them. Every
//! distance and bearing in this crate comes through here.

use std::sync::OnceLock;

use geographiclib_rs::{Geodesic, InverseGeodesic};

/// Solution of the inverse geodesic problem between two positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Azimuth at the start point, degrees in (-180, 180].
    pub forward_azimuth_deg: f64,
    /// Azimuth at the end point, degrees in (-180, 180].
    pub back_azimuth_deg: f64,
    /// Geodesic distance in metres.
    pub distance_m: f64,
}

fn wgs84() -> &'static Geodesic {
    static WGS84: OnceLock<Geodesic> = OnceLock::new();
    WGS84.get_or_init(Geodesic::wgs84)
}

/// Solve the inverse geodesic problem from (lon1, lat1) to (lon2, lat2).
pub fn inverse(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Inverse {
    // geographiclib-rs's generic `InverseGeodesic` chooses outputs by tuple
    // arity: the 3-tuple is (azi1, azi2, a12) and omits the distance entirely,
    // while the 4-tuple is (s12, azi1, azi2, a12). Destructure the 4-tuple so
    // `distance_m` receives the geodesic distance rather than an azimuth.
    let (distance_m, forward_azimuth_deg, back_azimuth_deg, _arc_deg): (f64, f64, f64, f64) =
        wgs84().inverse(lat1, lon1, lat2, lon2);
    Inverse {
        forward_azimuth_deg,
        back_azimuth_deg,
        distance_m,
    }
}

/// Normalize a raw azimuth in (-180, 180] into a compass bearing in [0, 360).
pub fn normalize_bearing(azimuth_deg: f64) -> f64 {
    if azimuth_deg < 0.0 {
        azimuth_deg + 360.0
    } else {
        azimuth_deg
    }
}
