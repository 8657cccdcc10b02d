//! Stop and straight-segment trajectory simplification.
//!
//! A growing-window classifier walked left to right. A window of consecutive
//! points is uneventful when the vessel either stayed in one place (a *stop*:
//! the diagonal of the window's bounding box is short) or held course and
//! speed (*straight and steady*: bearing and speed spreads within limits).
//! Uneventful windows grow point by point; once a window stops qualifying -
//! or runs into the end of the track - its interior is collapsed down to the
//! window's first point and last two points, and the surviving successor is
//! re-anchored.
//!
//! The output schema is reduced: this strategy drops bearing, acceleration,
//! and all previous-point snapshots rather than re-deriving them, exposing
//! only identity and summary kinematics per retained point.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::geodesy;
use crate::metrics::{self, DEFAULT_REFERENCE_SPEED_KN};
use crate::{AisPosition, SegmentPoint, TrackPoint};

/// Smallest window ever classified; windows reset to this size after each
/// collapse or rejection.
pub const MIN_SEGMENT_SIZE: usize = 4;

/// Configuration for stop / straight-segment simplification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// A window is a stop when the geodesic distance between the min and max
    /// corners of its bounding box stays below this, in metres. Default: 100.0
    pub stop_max_distance_m: f64,

    /// Maximum bearing spread, in degrees, for a window to count as holding
    /// course. Default: 15.0
    pub max_heading_deviation_deg: f64,

    /// Maximum speed spread, in knots, for a window to count as steady.
    /// Default: 2.0
    pub max_speed_deviation_kn: f64,

    /// Reference speed assumed for fixes that do not report one, in knots.
    /// Default: 20.0
    pub default_reference_speed_kn: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            stop_max_distance_m: 100.0,
            max_heading_deviation_deg: 15.0,
            max_speed_deviation_kn: 2.0,
            default_reference_speed_kn: DEFAULT_REFERENCE_SPEED_KN,
        }
    }
}

impl SegmentConfig {
    /// Check that the parameters are finite and sensible.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("stop_max_distance_m", self.stop_max_distance_m)?;
        ensure_positive(
            "max_heading_deviation_deg",
            self.max_heading_deviation_deg,
        )?;
        ensure_non_negative("max_speed_deviation_kn", self.max_speed_deviation_kn)?;
        ensure_positive(
            "default_reference_speed_kn",
            self.default_reference_speed_kn,
        )
    }
}

/// Simplify a raw trajectory by collapsing stop and straight segments.
///
/// Tracks shorter than [`MIN_SEGMENT_SIZE`] pass through unchanged (modulo
/// the reduced output schema).
pub fn simplify_segments(
    positions: &[AisPosition],
    config: &SegmentConfig,
) -> Result<Vec<SegmentPoint>> {
    config.validate()?;
    Ok(simplify(
        metrics::derive_track(positions, config.default_reference_speed_kn),
        config,
    ))
}

/// Simplify an already-derived trajectory by collapsing stop and straight
/// segments.
pub fn simplify_segments_derived(
    points: Vec<TrackPoint>,
    config: &SegmentConfig,
) -> Result<Vec<SegmentPoint>> {
    config.validate()?;
    Ok(simplify(points, config))
}

fn simplify(mut points: Vec<TrackPoint>, config: &SegmentConfig) -> Vec<SegmentPoint> {
    let before = points.len();
    let mut segment_start = 0;
    let mut size = MIN_SEGMENT_SIZE;
    while segment_start + size <= points.len() {
        let window = &points[segment_start..segment_start + size];
        let stop = is_stop(window, config.stop_max_distance_m);
        let straight = is_bearing_straight(
            window,
            config.max_heading_deviation_deg,
            config.max_speed_deviation_kn,
        );

        if (!stop && !straight) || segment_start + size == points.len() {
            if size > MIN_SEGMENT_SIZE {
                // Collapse the interior, keeping the window's first point and
                // its last two; the survivor after the gap gets re-anchored.
                points.drain(segment_start + 1..segment_start + size - 2);
                let prev = points[segment_start];
                metrics::reanchor(&mut points[segment_start + 1], &prev);
            }
            segment_start += 1;
            size = MIN_SEGMENT_SIZE;
        } else {
            size += 1;
        }
    }

    if points.len() < before {
        debug!(
            "segment pass kept {} of {} positions",
            points.len(),
            before
        );
    }
    points.into_iter().map(SegmentPoint::from).collect()
}

/// Whether the window's bounding box is small enough to count as a stop.
fn is_stop(window: &[TrackPoint], stop_max_distance_m: f64) -> bool {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    for point in window {
        min_lat = min_lat.min(point.latitude);
        max_lat = max_lat.max(point.latitude);
        min_lon = min_lon.min(point.longitude);
        max_lon = max_lon.max(point.longitude);
    }
    let span = geodesy::inverse(min_lon, min_lat, max_lon, max_lat).distance_m;
    span < stop_max_distance_m
}

/// Whether the window holds course (bearing spread within limits, seam-aware)
/// and speed (speed spread within limits).
fn is_bearing_straight(
    window: &[TrackPoint],
    max_heading_deviation_deg: f64,
    max_speed_deviation_kn: f64,
) -> bool {
    let mut bearings = Vec::with_capacity(window.len());
    let mut speeds = Vec::with_capacity(window.len());
    for point in window {
        match point.kinematics {
            Some(k) => {
                bearings.push(k.bearing_deg);
                speeds.push(k.speed_kn);
            }
            // A window reaching back to the start of the track contains a
            // point with no bearing; it can only qualify as a stop.
            None => return false,
        }
    }

    let mut heading_min = bearings.iter().copied().fold(f64::INFINITY, f64::min);
    let mut heading_max = bearings.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // A course near due north spreads its bearings across the 0/360 seam.
    // When both extremes hug the seam, compare on a window shifted past it;
    // any bearing away from the seam disqualifies the window outright.
    if heading_min - max_heading_deviation_deg <= 0.0
        && heading_max + max_heading_deviation_deg >= 360.0
    {
        if bearings
            .iter()
            .any(|&b| b >= max_heading_deviation_deg && b <= 360.0 - max_heading_deviation_deg)
        {
            return false;
        }
        heading_min = bearings
            .iter()
            .copied()
            .filter(|&b| b > 360.0 - max_heading_deviation_deg)
            .fold(f64::INFINITY, f64::min)
            - 360.0;
        heading_max = bearings
            .iter()
            .copied()
            .filter(|&b| b < max_heading_deviation_deg)
            .fold(f64::NEG_INFINITY, f64::max);
    }

    let heading_ok = heading_max - heading_min <= max_heading_deviation_deg;

    let speed_min = speeds.iter().copied().fold(f64::INFINITY, f64::min);
    let speed_max = speeds.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let speed_ok = speed_max - speed_min <= max_speed_deviation_kn;

    heading_ok && speed_ok
}
