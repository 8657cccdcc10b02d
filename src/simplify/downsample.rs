//! Fixed-interval trajectory downsampling.
//!
//! The simplest strategy: slot every fix into a fixed-duration time bucket
//! and keep the first fix per bucket. The chronologically last fix is forced
//! into a sentinel bucket of its own, so the end of the track always
//! survives, even when it would collide with the preceding bucket. Metrics
//! are re-derived from scratch over the survivors. A pure density cap - no
//! geometric fidelity guarantee.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result};
use crate::metrics::{self, DEFAULT_REFERENCE_SPEED_KN};
use crate::{AisPosition, TrackPoint};

/// Bucket index reserved for the chronologically last fix.
const FINAL_BUCKET: i64 = i64::MAX;

/// Configuration for fixed-interval downsampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownsampleConfig {
    /// Bucket duration in seconds. Default: 600.0
    pub interval_s: f64,

    /// Reference speed assumed for fixes that do not report one, in knots.
    /// Default: 20.0
    pub default_reference_speed_kn: f64,
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self {
            interval_s: 600.0,
            default_reference_speed_kn: DEFAULT_REFERENCE_SPEED_KN,
        }
    }
}

impl DownsampleConfig {
    /// Check that the parameters are finite and sensible.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("interval_s", self.interval_s)?;
        ensure_positive(
            "default_reference_speed_kn",
            self.default_reference_speed_kn,
        )
    }
}

/// Downsample a raw trajectory to at most one fix per time bucket.
pub fn downsample_track(
    positions: &[AisPosition],
    config: &DownsampleConfig,
) -> Result<Vec<TrackPoint>> {
    config.validate()?;

    let ordered = metrics::normalize(positions);
    let last_row = ordered.len().checked_sub(1);

    let mut points: Vec<TrackPoint> = Vec::new();
    let mut current_bucket: Option<i64> = None;
    for (row, (source_index, position)) in ordered.iter().enumerate() {
        let bucket = if Some(row) == last_row {
            FINAL_BUCKET
        } else {
            bucket_index(position.timestamp, config.interval_s)
        };
        // Timestamps ascend, so buckets do too: first-of-each-run is
        // first-per-bucket.
        if current_bucket == Some(bucket) {
            continue;
        }
        current_bucket = Some(bucket);
        points.push(metrics::raw_point(
            *source_index,
            position,
            config.default_reference_speed_kn,
        ));
    }
    metrics::rederive(&mut points);

    if points.len() < ordered.len() {
        debug!(
            "downsampling kept {} of {} positions",
            points.len(),
            ordered.len()
        );
    }
    Ok(points)
}

/// Bucket index of a timestamp: seconds since the epoch, floor-divided by the
/// interval. Floor (not truncation) keeps pre-epoch timestamps consistent.
fn bucket_index(timestamp: DateTime<Utc>, interval_s: f64) -> i64 {
    (timestamp.timestamp_millis() as f64 / 1000.0 / interval_s).floor() as i64
}
