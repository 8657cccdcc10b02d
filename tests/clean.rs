//! Tests for trajectory cleaning

use chrono::Duration;
use trackclean::synthetic::{base_time, displace, straight_course, anchored_drift};
use trackclean::{
    clean_derived, clean_track, clean_tracks, derive_track, AisPosition, CleanerConfig, TrackError,
};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_steady_track_passes_unchanged() {
    // fixes at 0, 10, ..., 40 seconds, all implied speeds ~5 kn
    let track = straight_course(5, 10, 5.0, 0.0);
    let cleaned = clean_track(&track, &CleanerConfig::default()).unwrap();
    assert_eq!(cleaned.len(), 5);
    assert_eq!(cleaned, derive_track(&track, 20.0));
}

#[test]
fn test_outlier_fix_removed_and_successor_reanchored() {
    let steady = straight_course(5, 10, 5.0, 0.0);
    // a sixth fix at 25s, 50 km off the line: >19,000 kn implied
    let outlier = AisPosition::new(
        base_time() + Duration::seconds(25),
        steady[0].latitude + 0.45,
        steady[0].longitude,
    );
    let track = vec![
        steady[0], steady[1], steady[2], outlier, steady[3], steady[4],
    ];

    let config = CleanerConfig::default();
    let derived = derive_track(&track, 20.0);
    assert!(config.is_outlier(&derived[3]));

    let cleaned = clean_track(&track, &config).unwrap();
    let sources: Vec<usize> = cleaned.iter().map(|p| p.source_index).collect();
    assert_eq!(sources, vec![0, 1, 2, 4, 5]);

    // the fix after the hole is measured against the original 20s predecessor
    let reanchored = cleaned[3].kinematics.unwrap();
    assert!(approx_eq(reanchored.time_delta_s, 10.0, 1e-9));
    assert!(approx_eq(reanchored.speed_kn, 5.0, 0.1));
    assert_eq!(cleaned[3].skipped_since_prev, 1);

    // idempotent: a second pass finds nothing left to remove
    assert_eq!(clean_derived(cleaned.clone(), &config), cleaned);
}

#[test]
fn test_lookahead_removes_displaced_fix_thresholds_would_keep() {
    let mut track = straight_course(8, 60, 5.0, 0.0);
    // push one fix a full leg ahead: its implied speed doubles to ~10 kn,
    // well under the 40 kn threshold, and acceleration stays under 0.5 kn/s
    displace(&mut track, 3, 154.0, 0.0);

    let config = CleanerConfig::default();
    let derived = derive_track(&track, 20.0);
    for point in &derived {
        assert!(!config.is_outlier(point));
    }

    let cleaned = clean_track(&track, &config).unwrap();
    let sources: Vec<usize> = cleaned.iter().map(|p| p.source_index).collect();
    assert_eq!(sources, vec![0, 1, 2, 4, 5, 6, 7]);
    assert_eq!(cleaned[3].skipped_since_prev, 1);
    assert!(approx_eq(cleaned[3].kinematics.unwrap().speed_kn, 5.0, 0.1));

    assert_eq!(clean_derived(cleaned.clone(), &config), cleaned);
}

#[test]
fn test_retained_points_are_never_outliers() {
    // violent jitter: plenty of implausible hops
    let track = anchored_drift(40, 10, 500.0, 3);
    let config = CleanerConfig::default();
    let cleaned = clean_track(&track, &config).unwrap();
    assert!(cleaned.len() <= track.len());
    for point in &cleaned {
        assert!(!config.is_outlier(point));
    }
}

#[test]
fn test_empty_and_singleton() {
    let config = CleanerConfig::default();
    assert!(clean_track(&[], &config).unwrap().is_empty());

    let single = straight_course(1, 60, 5.0, 0.0);
    let cleaned = clean_track(&single, &config).unwrap();
    assert_eq!(cleaned.len(), 1);
    assert!(cleaned[0].kinematics.is_none());
}

#[test]
fn test_batch_matches_per_track_cleaning() {
    let tracks = vec![
        straight_course(10, 60, 8.0, 45.0),
        anchored_drift(10, 60, 400.0, 11),
    ];
    let config = CleanerConfig::default();
    let batch = clean_tracks(&tracks, &config).unwrap();
    assert_eq!(batch.len(), 2);
    for (track, cleaned) in tracks.iter().zip(&batch) {
        assert_eq!(cleaned, &clean_track(track, &config).unwrap());
    }
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_batch_matches_serial() {
    use trackclean::clean_tracks_parallel;

    let tracks: Vec<_> = (0..8).map(|seed| anchored_drift(30, 10, 450.0, seed)).collect();
    let config = CleanerConfig::default();
    assert_eq!(
        clean_tracks_parallel(&tracks, &config).unwrap(),
        clean_tracks(&tracks, &config).unwrap()
    );
}

#[test]
fn test_invalid_config_rejected() {
    let track = straight_course(3, 60, 5.0, 0.0);

    let zero_multiplier = CleanerConfig {
        speed_limit_multiplier: 0.0,
        ..CleanerConfig::default()
    };
    assert!(matches!(
        clean_track(&track, &zero_multiplier),
        Err(TrackError::InvalidParameter { .. })
    ));

    let nan_limit = CleanerConfig {
        acceleration_limit_kn_s: f64::NAN,
        ..CleanerConfig::default()
    };
    assert!(clean_track(&track, &nan_limit).is_err());
}
