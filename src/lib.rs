//! # Trackclean
//!
//! Cleaning and simplification of AIS vessel trajectories.
//!
//! Raw AIS tracks carry outlier fixes (GPS glitches, misattributed reports)
//! and far more points than downstream consumers need. This library derives
//! per-point kinematics from a time-ordered sequence of fixes and offers four
//! independent reduction strategies over the derived track:
//!
//! - Outlier-driven cleaning with bounded lookahead re-anchoring
//! - Synchronized-distance point elimination (top-down time ratio)
//! - Stop / straight-segment collapsing
//! - Fixed-interval time bucketing
//!
//! The strategies are alternatives, not a pipeline: each consumes the same
//! metrics-annotated input and owns its working copy. Callers are free to
//! chain them (clean, then simplify) through the `*_derived` entry points.
//!
//! ## Features
//!
//! - **`parallel`** - Enable batch processing of many trajectories with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use trackclean::{clean_track, AisPosition, CleanerConfig};
//!
//! // Five fixes, ten minutes apart, steaming north at ~11 knots.
//! let track: Vec<AisPosition> = (0..5)
//!     .map(|i| {
//!         AisPosition::new(
//!             Utc.with_ymd_and_hms(2024, 3, 1, 6, 10 * i, 0).unwrap(),
//!             52.05 + 0.03 * i as f64,
//!             3.65,
//!         )
//!     })
//!     .collect();
//!
//! let cleaned = clean_track(&track, &CleanerConfig::default()).unwrap();
//! assert_eq!(cleaned.len(), 5); // nothing implausible, nothing removed
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrackError};

// WGS84 inverse geodesic (bearing + distance between fixes)
pub mod geodesy;

// Kinematic metric derivation (the foundation for every strategy)
pub mod metrics;
pub use metrics::{derive_track, DEFAULT_REFERENCE_SPEED_KN};

// Outlier-driven trajectory cleaning
pub mod clean;
#[cfg(feature = "parallel")]
pub use clean::clean_tracks_parallel;
pub use clean::{clean_derived, clean_track, clean_tracks, CleanerConfig};

// Simplification strategies
pub mod simplify;
pub use simplify::{
    downsample_track, simplify_sed, simplify_segments, DownsampleConfig, SedConfig, SegmentConfig,
};

// Synthetic AIS track generator for tests and benchmarks
pub mod synthetic;

// ============================================================================
// Core Types
// ============================================================================

/// One raw AIS fix: a timestamped geographic position.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use trackclean::AisPosition;
///
/// let fix = AisPosition::new(Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(), 52.05, 3.65);
/// assert!(fix.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AisPosition {
    /// Time the position was reported.
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Design speed of the vessel in knots, when the feed carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_reference_kn: Option<f64>,
}

impl AisPosition {
    /// Create a new position without a reference speed.
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            speed_reference_kn: None,
        }
    }

    /// Create a new position with a vessel reference speed in knots.
    pub fn with_reference_speed(
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        speed_reference_kn: f64,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            speed_reference_kn: Some(speed_reference_kn),
        }
    }

    /// Parse a position from an RFC 3339 timestamp string and coordinates.
    ///
    /// Fails on an unparseable timestamp or out-of-range coordinates.
    pub fn parse(timestamp: &str, latitude: f64, longitude: f64) -> Result<Self> {
        let parsed = timestamp
            .parse::<DateTime<Utc>>()
            .map_err(|source| TrackError::Timestamp {
                value: timestamp.to_string(),
                source,
            })?;
        let position = Self::new(parsed, latitude, longitude);
        if !position.is_valid() {
            return Err(TrackError::Coordinate {
                latitude,
                longitude,
            });
        }
        Ok(position)
    }

    /// Check if the position has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Kinematic metrics of a point relative to the previous retained point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    /// Course from the previous point, degrees in [0, 360).
    pub bearing_deg: f64,
    /// Geodesic distance from the previous point in metres.
    pub distance_m: f64,
    /// Elapsed time since the previous point in seconds.
    pub time_delta_s: f64,
    /// Speed implied by the hop from the previous point, in knots.
    pub speed_kn: f64,
    /// Change of implied speed per second; None while the previous point has
    /// no speed of its own (the second point of a sequence).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_kn_s: Option<f64>,
}

/// A position annotated with derived metrics, as held by the cleaner and the
/// simplifiers.
///
/// `kinematics` is relative to the point's predecessor *in the current
/// sequence*: deleting a point re-anchors its successor onto the surviving
/// predecessor. The first point of any sequence has no predecessor and
/// carries `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Row index in the caller's original table, stable across all edits.
    pub source_index: usize,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Reference speed in knots, filled with the configured default where the
    /// fix reported none.
    pub reference_speed_kn: f64,
    /// Number of original points elided between this point and its current
    /// predecessor.
    pub skipped_since_prev: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinematics: Option<Kinematics>,
}

impl TrackPoint {
    /// Implied speed in knots, if the point has a predecessor.
    pub fn speed_kn(&self) -> Option<f64> {
        self.kinematics.map(|k| k.speed_kn)
    }

    /// Course from the predecessor in degrees, if the point has one.
    pub fn bearing_deg(&self) -> Option<f64> {
        self.kinematics.map(|k| k.bearing_deg)
    }

    /// Acceleration in knots per second, where defined.
    pub fn acceleration_kn_s(&self) -> Option<f64> {
        self.kinematics.and_then(|k| k.acceleration_kn_s)
    }

    /// Strip the point back down to a raw position, e.g. to feed one
    /// strategy's output into another strategy's raw entry point.
    pub fn position(&self) -> AisPosition {
        AisPosition {
            timestamp: self.timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
            speed_reference_kn: Some(self.reference_speed_kn),
        }
    }
}

/// Output row of the segment-class simplifier.
///
/// That strategy does not re-expose a full derived-metrics view: bearing,
/// acceleration, and all previous-point snapshots are dropped, leaving
/// identity and the kinematic summary fields consumers need.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentPoint {
    /// Row index in the caller's original table.
    pub source_index: usize,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub reference_speed_kn: f64,
    /// Number of original points elided between this point and its predecessor.
    pub skipped_since_prev: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_delta_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_kn: Option<f64>,
}

impl From<TrackPoint> for SegmentPoint {
    fn from(point: TrackPoint) -> Self {
        Self {
            source_index: point.source_index,
            timestamp: point.timestamp,
            latitude: point.latitude,
            longitude: point.longitude,
            reference_speed_kn: point.reference_speed_kn,
            skipped_since_prev: point.skipped_since_prev,
            time_delta_s: point.kinematics.map(|k| k.time_delta_s),
            distance_m: point.kinematics.map(|k| k.distance_m),
            speed_kn: point.kinematics.map(|k| k.speed_kn),
        }
    }
}
