//! Synchronized-distance trajectory simplification.
//!
//! A top-down time-ratio variant of Douglas-Peucker for timestamped tracks.
//! A candidate interior point is not measured against the chord itself but
//! against where the vessel *would have been* on the chord at the same
//! fraction of elapsed time - the synchronized Euclidean distance (SED). A
//! point whose SED stays within epsilon is redundant: the straight-line
//! interpolation reproduces it, in space and in time.
//!
//! The pass keeps a sorted set of retained indices seeded with the first and
//! last point, repeatedly takes the earliest unfinalized gap, and splits it
//! at the farthest interior point while that point deviates by more than
//! epsilon. Metrics are fully re-derived at the end, since the predecessor
//! chain changes arbitrarily.
//!
//! # Example
//! ```
//! use trackclean::synthetic::straight_course;
//! use trackclean::{simplify_sed, SedConfig};
//!
//! let track = straight_course(10, 60, 8.0, 0.0);
//! let reduced = simplify_sed(&track, &SedConfig::default()).unwrap();
//! assert_eq!(reduced.len(), 2); // collinear: only the endpoints survive
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::geodesy;
use crate::metrics::{self, seconds_between, DEFAULT_REFERENCE_SPEED_KN};
use crate::{AisPosition, TrackPoint};

/// Configuration for synchronized-distance simplification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SedConfig {
    /// Maximum synchronized distance, in metres, a removed point may have
    /// from the chord between its bounding retained points. Default: 50.0
    pub epsilon_m: f64,

    /// Reference speed assumed for fixes that do not report one, in knots.
    /// Default: 20.0
    pub default_reference_speed_kn: f64,
}

impl Default for SedConfig {
    fn default() -> Self {
        Self {
            epsilon_m: 50.0,
            default_reference_speed_kn: DEFAULT_REFERENCE_SPEED_KN,
        }
    }
}

impl SedConfig {
    /// Check that the parameters are finite and sensible.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("epsilon_m", self.epsilon_m)?;
        ensure_positive(
            "default_reference_speed_kn",
            self.default_reference_speed_kn,
        )
    }
}

/// Simplify a raw trajectory by synchronized distance.
///
/// The first and last points are always retained. Tracks of up to two points
/// pass through unchanged.
pub fn simplify_sed(positions: &[AisPosition], config: &SedConfig) -> Result<Vec<TrackPoint>> {
    config.validate()?;
    Ok(simplify(
        metrics::derive_track(positions, config.default_reference_speed_kn),
        config,
    ))
}

/// Simplify an already-derived trajectory by synchronized distance.
pub fn simplify_sed_derived(
    points: Vec<TrackPoint>,
    config: &SedConfig,
) -> Result<Vec<TrackPoint>> {
    config.validate()?;
    Ok(simplify(points, config))
}

fn simplify(points: Vec<TrackPoint>, config: &SedConfig) -> Vec<TrackPoint> {
    if points.len() <= 2 {
        return points;
    }

    let mut retained: Vec<usize> = vec![0, points.len() - 1];
    let mut cursor = 0;
    while cursor < retained.len() - 1 {
        let (start, end) = (retained[cursor], retained[cursor + 1]);
        match farthest_point(&points[start..=end]) {
            Some((offset, deviation)) if deviation > config.epsilon_m => {
                // Split the gap; both halves are re-examined from the same
                // cursor on subsequent iterations.
                retained.insert(cursor + 1, start + offset);
            }
            _ => {
                // Gap finalized; skip over runs of adjacent retained indices.
                cursor += 1;
                while cursor < retained.len() - 1 && retained[cursor] + 1 == retained[cursor + 1] {
                    cursor += 1;
                }
            }
        }
    }

    debug!(
        "synchronized-distance pass kept {} of {} positions",
        retained.len(),
        points.len()
    );

    let mut result: Vec<TrackPoint> = retained.into_iter().map(|index| points[index]).collect();
    metrics::rederive(&mut result);
    result
}

/// Interior point of `gap` with the greatest synchronized distance from the
/// chord between the gap's endpoints, with its deviation. Ties keep the
/// earliest point. `None` when the gap has no interior.
fn farthest_point(gap: &[TrackPoint]) -> Option<(usize, f64)> {
    let (start, end) = (gap.first()?, gap.last()?);
    let mut farthest: Option<(usize, f64)> = None;
    for (offset, point) in gap.iter().enumerate().take(gap.len() - 1).skip(1) {
        let deviation = synchronized_distance(point, start, end);
        if farthest.map_or(true, |(_, best)| deviation > best) {
            farthest = Some((offset, deviation));
        }
    }
    farthest
}

/// Synchronized Euclidean distance of `point` against the chord from `start`
/// to `end`.
///
/// The point's counterpart on the chord is found by interpolating longitude
/// and latitude at the point's fraction of the elapsed time (not of the
/// distance); the deviation is the true geodesic distance between the two.
pub fn synchronized_distance(point: &TrackPoint, start: &TrackPoint, end: &TrackPoint) -> f64 {
    let ratio = seconds_between(start.timestamp, point.timestamp)
        / seconds_between(start.timestamp, end.timestamp);
    let longitude = start.longitude + (end.longitude - start.longitude) * ratio;
    let latitude = start.latitude + (end.latitude - start.latitude) * ratio;
    geodesy::inverse(longitude, latitude, point.longitude, point.latitude).distance_m
}
