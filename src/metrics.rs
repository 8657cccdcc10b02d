//! Per-point kinematic metric derivation.
//!
//! The foundation for every cleaning and simplification strategy: a
//! time-ordered sequence of raw fixes becomes a sequence of [`TrackPoint`]s
//! where each point carries bearing, distance, elapsed time, speed, and
//! acceleration relative to its immediate predecessor.
//!
//! Acceleration is the discrete derivative of the *derived* speed series, not
//! of any reported speed, so it is undefined for the first two points of a
//! sequence. When an editing pass deletes a point, only the successor's
//! metrics change; [`reanchor`] recomputes exactly those.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::geodesy;
use crate::{AisPosition, Kinematics, TrackPoint};

/// Reference speed, in knots, assumed for vessels that do not report one.
pub const DEFAULT_REFERENCE_SPEED_KN: f64 = 20.0;

/// Conversion from metres per second to knots.
pub(crate) const MS_TO_KNOTS: f64 = 3600.0 / 1852.0;

/// Elapsed seconds between two timestamps, fractional.
pub(crate) fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

/// Drop duplicate timestamps (keeping the first occurrence) and sort the
/// survivors ascending, tagged with their original row index.
pub(crate) fn normalize(positions: &[AisPosition]) -> Vec<(usize, AisPosition)> {
    let mut seen: HashSet<DateTime<Utc>> = HashSet::with_capacity(positions.len());
    let mut ordered: Vec<(usize, AisPosition)> = positions
        .iter()
        .enumerate()
        .filter(|(_, position)| seen.insert(position.timestamp))
        .map(|(index, position)| (index, *position))
        .collect();
    ordered.sort_by_key(|(_, position)| position.timestamp);
    ordered
}

/// Build a track point with no derived metrics yet.
pub(crate) fn raw_point(
    source_index: usize,
    position: &AisPosition,
    default_reference_speed_kn: f64,
) -> TrackPoint {
    TrackPoint {
        source_index,
        timestamp: position.timestamp,
        latitude: position.latitude,
        longitude: position.longitude,
        reference_speed_kn: position
            .speed_reference_kn
            .unwrap_or(default_reference_speed_kn),
        skipped_since_prev: 0,
        kinematics: None,
    }
}

/// Derive per-point metrics for a raw trajectory.
///
/// Positions are deduplicated by timestamp (first occurrence wins) and sorted
/// ascending before derivation. The first surviving point has no
/// predecessor-relative metrics; every later point is measured against the
/// point immediately before it. Fixes without a reference speed get
/// `default_reference_speed_kn`; reported values are kept as-is, even zero.
pub fn derive_track(
    positions: &[AisPosition],
    default_reference_speed_kn: f64,
) -> Vec<TrackPoint> {
    let mut points: Vec<TrackPoint> = normalize(positions)
        .into_iter()
        .map(|(index, position)| raw_point(index, &position, default_reference_speed_kn))
        .collect();
    rederive(&mut points);
    points
}

/// Recompute every point's metrics against its current predecessor.
///
/// Used after edits that change the predecessor chain wholesale (the
/// synchronized-distance and bucketing strategies); single-point edits use
/// [`reanchor`] instead.
pub fn rederive(points: &mut [TrackPoint]) {
    if let Some(first) = points.first_mut() {
        first.kinematics = None;
        first.skipped_since_prev = 0;
    }
    for i in 1..points.len() {
        let prev = points[i - 1];
        reanchor(&mut points[i], &prev);
    }
}

/// Re-anchor a point onto a new predecessor.
///
/// Recomputes bearing, distance, elapsed time, speed, acceleration, and the
/// skipped-point count; the reference speed and identity fields are left
/// untouched.
pub fn reanchor(point: &mut TrackPoint, prev: &TrackPoint) {
    point.kinematics = Some(kinematics_between(prev, point));
    point.skipped_since_prev = point.source_index.saturating_sub(prev.source_index + 1);
}

/// Metrics of `point` measured against `prev`.
pub fn kinematics_between(prev: &TrackPoint, point: &TrackPoint) -> Kinematics {
    let shot = geodesy::inverse(
        prev.longitude,
        prev.latitude,
        point.longitude,
        point.latitude,
    );
    let time_delta_s = seconds_between(prev.timestamp, point.timestamp);
    let speed_kn = shot.distance_m / time_delta_s * MS_TO_KNOTS;
    let acceleration_kn_s = prev
        .kinematics
        .map(|k| (speed_kn - k.speed_kn) / time_delta_s);
    Kinematics {
        bearing_deg: geodesy::normalize_bearing(shot.forward_azimuth_deg),
        distance_m: shot.distance_m,
        time_delta_s,
        speed_kn,
        acceleration_kn_s,
    }
}
