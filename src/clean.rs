//! Outlier-driven trajectory cleaning.
//!
//! A single forward pass over the derived track removes fixes that are
//! physically implausible against their predecessor: implied speed beyond a
//! multiple of the vessel's reference speed, or acceleration beyond a hard
//! limit. Deleting a fix re-anchors its successor onto the surviving
//! predecessor and re-examines it before the cursor advances, so one bad fix
//! cannot shield another behind it.
//!
//! A bounded lookahead guards the opposite failure: a *good* fix should not
//! be discarded merely because its predecessor was bad. When the speed gap to
//! the predecessor is large, up to three upcoming fixes are probed as if the
//! predecessor were theirs; if any of them closes the gap markedly, the
//! current fix is judged the worse choice and dropped. The first qualifying
//! probe wins; later candidates are not examined.

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result};
use crate::metrics::{self, DEFAULT_REFERENCE_SPEED_KN};
use crate::{AisPosition, TrackPoint};

/// Upper bound on how far ahead the lookahead may reach, counted from the
/// point under evaluation (so at most three fixes are probed).
const LOOKAHEAD_LIMIT: usize = 4;

/// Speed gap, in knots, that both arms the lookahead and defines a markedly
/// better candidate.
const SPEED_GAP_KN: f64 = 2.0;

/// Configuration for trajectory cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// A fix is an outlier when its implied speed exceeds this multiple of
    /// the vessel's reference speed. Default: 2.0
    pub speed_limit_multiplier: f64,

    /// A fix is an outlier when the magnitude of its implied acceleration
    /// exceeds this limit, in knots per second. Default: 0.5
    pub acceleration_limit_kn_s: f64,

    /// Reference speed assumed for fixes that do not report one, in knots.
    /// Default: 20.0
    pub default_reference_speed_kn: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            speed_limit_multiplier: 2.0,
            acceleration_limit_kn_s: 0.5,
            default_reference_speed_kn: DEFAULT_REFERENCE_SPEED_KN,
        }
    }
}

impl CleanerConfig {
    /// Check that every threshold is finite and positive.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("speed_limit_multiplier", self.speed_limit_multiplier)?;
        ensure_positive("acceleration_limit_kn_s", self.acceleration_limit_kn_s)?;
        ensure_positive(
            "default_reference_speed_kn",
            self.default_reference_speed_kn,
        )
    }

    /// Whether the point's implied speed exceeds the configured multiple of
    /// its reference speed.
    pub fn speed_over_limit(&self, point: &TrackPoint) -> bool {
        point
            .kinematics
            .map_or(false, |k| {
                k.speed_kn > self.speed_limit_multiplier * point.reference_speed_kn
            })
    }

    /// Whether the point's implied acceleration magnitude exceeds the limit.
    pub fn acceleration_over_limit(&self, point: &TrackPoint) -> bool {
        point
            .kinematics
            .and_then(|k| k.acceleration_kn_s)
            .map_or(false, |a| a.abs() > self.acceleration_limit_kn_s)
    }

    /// Whether the point is physically implausible against its current
    /// predecessor.
    ///
    /// Exposed so callers can mark outliers (e.g. for inspection) without
    /// removing them.
    pub fn is_outlier(&self, point: &TrackPoint) -> bool {
        self.speed_over_limit(point) || self.acceleration_over_limit(point)
    }
}

/// Clean a raw trajectory: derive metrics, then remove outlier fixes.
///
/// The first point anchors the sequence and is never removed. Empty and
/// singleton trajectories pass through unchanged.
pub fn clean_track(positions: &[AisPosition], config: &CleanerConfig) -> Result<Vec<TrackPoint>> {
    config.validate()?;
    let derived = metrics::derive_track(positions, config.default_reference_speed_kn);
    Ok(clean_derived(derived, config))
}

/// Clean an already-derived trajectory.
///
/// The input is consumed as the working copy. On return every surviving
/// point's metrics are consistent with its final predecessor.
pub fn clean_derived(mut points: Vec<TrackPoint>, config: &CleanerConfig) -> Vec<TrackPoint> {
    let before = points.len();
    let mut i = 1;
    while i < points.len() {
        if config.is_outlier(&points[i]) || next_is_better(&points, i) {
            points.remove(i);
            // The shifted-in successor gets the surviving predecessor and is
            // re-examined on the next iteration.
            if i < points.len() {
                let prev = points[i - 1];
                metrics::reanchor(&mut points[i], &prev);
            }
        } else {
            i += 1;
        }
    }
    if points.len() < before {
        debug!(
            "cleaning removed {} of {} positions",
            before - points.len(),
            before
        );
    }
    points
}

/// Clean many independent trajectories sequentially.
pub fn clean_tracks(
    tracks: &[Vec<AisPosition>],
    config: &CleanerConfig,
) -> Result<Vec<Vec<TrackPoint>>> {
    config.validate()?;
    Ok(tracks
        .iter()
        .map(|track| {
            clean_derived(
                metrics::derive_track(track, config.default_reference_speed_kn),
                config,
            )
        })
        .collect())
}

/// Clean many independent trajectories in parallel.
///
/// Each trajectory's working state is fully self-contained, so the batch is
/// the safe axis to parallelize.
#[cfg(feature = "parallel")]
pub fn clean_tracks_parallel(
    tracks: &[Vec<AisPosition>],
    config: &CleanerConfig,
) -> Result<Vec<Vec<TrackPoint>>> {
    config.validate()?;
    Ok(tracks
        .par_iter()
        .map(|track| {
            clean_derived(
                metrics::derive_track(track, config.default_reference_speed_kn),
                config,
            )
        })
        .collect())
}

/// Lookahead heuristic: is some upcoming fix a markedly better successor to
/// the predecessor than the current fix?
///
/// Only armed when the speed gap between the current fix and its predecessor
/// exceeds [`SPEED_GAP_KN`]. Each probed fix is recomputed *as if* the
/// predecessor were its own; nothing is committed. Returns on the first
/// candidate that shrinks the gap by more than the threshold.
fn next_is_better(points: &[TrackPoint], i: usize) -> bool {
    let prev = points[i - 1];
    let (Some(prev_speed), Some(current)) = (prev.speed_kn(), points[i].kinematics) else {
        // The predecessor is the first point of the sequence; there is no
        // speed gap to judge.
        return false;
    };
    let current_gap = (current.speed_kn - prev_speed).abs();
    if current_gap <= SPEED_GAP_KN {
        return false;
    }
    for j in 1..LOOKAHEAD_LIMIT.min(points.len() - i) {
        let candidate = metrics::kinematics_between(&prev, &points[i + j]);
        let candidate_gap = (candidate.speed_kn - prev_speed).abs();
        if candidate_gap - current_gap < -SPEED_GAP_KN {
            return true;
        }
    }
    false
}
