//! Synthetic AIS track generator for tests and benchmarks.
//!
//! Generates deterministic vessel tracks with known kinematics: straight
//! courses at a constant speed, doglegs with a single turn, anchored drift,
//! and helpers to displace individual fixes. Speeds implied by the generated
//! geometry land within a fraction of a percent of the nominal value, close
//! enough to assert against with a loose tolerance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::AisPosition;

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Conversion from knots to metres per second.
const KNOTS_TO_MS: f64 = 1852.0 / 3600.0;

/// Rotterdam approaches - representative mid-latitude open water.
const ORIGIN_LAT: f64 = 52.05;
const ORIGIN_LON: f64 = 3.65;

/// Start time shared by all generated tracks.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// Convert meters to degrees of latitude.
fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

/// Convert meters to degrees of longitude at a given latitude.
fn meters_to_deg_lon(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg
}

/// Evenly spaced fixes along a constant course at a constant speed.
///
/// Heading follows the compass: 0 is north, 90 is east.
pub fn straight_course(
    point_count: usize,
    interval_s: i64,
    speed_kn: f64,
    heading_deg: f64,
) -> Vec<AisPosition> {
    let step_m = speed_kn * KNOTS_TO_MS * interval_s as f64;
    let heading = heading_deg.to_radians();
    let mut latitude = ORIGIN_LAT;
    let mut longitude = ORIGIN_LON;
    let mut track = Vec::with_capacity(point_count);
    for i in 0..point_count {
        if i > 0 {
            latitude += meters_to_deg_lat(step_m * heading.cos());
            longitude += meters_to_deg_lon(step_m * heading.sin(), latitude);
        }
        track.push(AisPosition::new(
            base_time() + Duration::seconds(interval_s * i as i64),
            latitude,
            longitude,
        ));
    }
    track
}

/// Two straight legs of `leg_points` fixes each, joined by a single turn.
pub fn dogleg_course(
    leg_points: usize,
    interval_s: i64,
    speed_kn: f64,
    first_heading_deg: f64,
    second_heading_deg: f64,
) -> Vec<AisPosition> {
    let step_m = speed_kn * KNOTS_TO_MS * interval_s as f64;
    let mut latitude = ORIGIN_LAT;
    let mut longitude = ORIGIN_LON;
    let mut track = Vec::with_capacity(leg_points * 2);
    for i in 0..leg_points * 2 {
        if i > 0 {
            let heading = if i < leg_points {
                first_heading_deg.to_radians()
            } else {
                second_heading_deg.to_radians()
            };
            latitude += meters_to_deg_lat(step_m * heading.cos());
            longitude += meters_to_deg_lon(step_m * heading.sin(), latitude);
        }
        track.push(AisPosition::new(
            base_time() + Duration::seconds(interval_s * i as i64),
            latitude,
            longitude,
        ));
    }
    track
}

/// Fixes drifting around an anchorage, uniformly within `radius_m` of it.
pub fn anchored_drift(
    point_count: usize,
    interval_s: i64,
    radius_m: f64,
    seed: u64,
) -> Vec<AisPosition> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..point_count)
        .map(|i| {
            let angle = rng.gen_range(0.0..TAU);
            let radius = radius_m * rng.gen::<f64>().sqrt();
            AisPosition::new(
                base_time() + Duration::seconds(interval_s * i as i64),
                ORIGIN_LAT + meters_to_deg_lat(radius * angle.cos()),
                ORIGIN_LON + meters_to_deg_lon(radius * angle.sin(), ORIGIN_LAT),
            )
        })
        .collect()
}

/// Displace the fix at `index` by `offset_m` along `heading_deg`, leaving its
/// timestamp alone. Used to plant implausible jumps in otherwise clean tracks.
pub fn displace(track: &mut [AisPosition], index: usize, offset_m: f64, heading_deg: f64) {
    let heading = heading_deg.to_radians();
    let position = &mut track[index];
    position.latitude += meters_to_deg_lat(offset_m * heading.cos());
    position.longitude += meters_to_deg_lon(offset_m * heading.sin(), position.latitude);
}
