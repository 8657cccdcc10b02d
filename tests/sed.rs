//! Tests for synchronized-distance simplification

use trackclean::simplify::sed::synchronized_distance;
use trackclean::synthetic::{anchored_drift, displace, straight_course};
use trackclean::{derive_track, simplify_sed, SedConfig, TrackError, TrackPoint};

fn config_with_epsilon(epsilon_m: f64) -> SedConfig {
    SedConfig {
        epsilon_m,
        ..SedConfig::default()
    }
}

#[test]
fn test_collinear_track_reduces_to_endpoints() {
    let track = straight_course(10, 60, 8.0, 0.0);
    let reduced = simplify_sed(&track, &config_with_epsilon(1.0)).unwrap();
    assert_eq!(reduced.len(), 2);
    assert_eq!(reduced[0].source_index, 0);
    assert_eq!(reduced[1].source_index, 9);
    // metrics are re-derived over the survivors
    assert!(reduced[0].kinematics.is_none());
    let last = reduced[1].kinematics.unwrap();
    assert!((last.time_delta_s - 540.0).abs() < 1e-9);
    assert_eq!(reduced[1].skipped_since_prev, 8);
}

#[test]
fn test_displaced_fix_survives_and_removed_fixes_stay_within_epsilon() {
    let epsilon_m = 50.0;
    let mut track = straight_course(11, 60, 8.0, 90.0);
    displace(&mut track, 5, 500.0, 0.0);

    let reduced = simplify_sed(&track, &config_with_epsilon(epsilon_m)).unwrap();
    let retained: Vec<usize> = reduced.iter().map(|p| p.source_index).collect();
    assert!(retained.contains(&5), "displaced fix must survive");
    assert_eq!(*retained.first().unwrap(), 0);
    assert_eq!(*retained.last().unwrap(), 10);

    // every removed fix deviates by at most epsilon from the chord between
    // the retained fixes that ended up bounding it
    let derived = derive_track(&track, 20.0);
    for point in &derived {
        if retained.contains(&point.source_index) {
            continue;
        }
        let before = bounding(&derived, &retained, point.source_index, true);
        let after = bounding(&derived, &retained, point.source_index, false);
        let deviation = synchronized_distance(point, before, after);
        assert!(
            deviation <= epsilon_m + 1e-6,
            "removed fix {} deviates {} m",
            point.source_index,
            deviation
        );
    }
}

fn bounding<'a>(
    derived: &'a [TrackPoint],
    retained: &[usize],
    source_index: usize,
    before: bool,
) -> &'a TrackPoint {
    let index = if before {
        *retained
            .iter()
            .filter(|&&r| r < source_index)
            .max()
            .unwrap()
    } else {
        *retained
            .iter()
            .filter(|&&r| r > source_index)
            .min()
            .unwrap()
    };
    derived.iter().find(|p| p.source_index == index).unwrap()
}

#[test]
fn test_vanishing_epsilon_keeps_everything() {
    let track = anchored_drift(12, 60, 30.0, 9);
    let reduced = simplify_sed(&track, &config_with_epsilon(1e-6)).unwrap();
    assert_eq!(reduced.len(), 12);
}

#[test]
fn test_endpoints_always_retained() {
    let track = anchored_drift(25, 60, 200.0, 4);
    let reduced = simplify_sed(&track, &config_with_epsilon(10.0)).unwrap();
    assert_eq!(reduced.first().unwrap().source_index, 0);
    assert_eq!(reduced.last().unwrap().source_index, 24);
}

#[test]
fn test_short_tracks_pass_through() {
    let config = SedConfig::default();
    assert!(simplify_sed(&[], &config).unwrap().is_empty());
    for n in [1, 2] {
        let track = straight_course(n, 60, 8.0, 0.0);
        assert_eq!(simplify_sed(&track, &config).unwrap().len(), n);
    }
}

#[test]
fn test_invalid_epsilon_rejected() {
    let track = straight_course(5, 60, 8.0, 0.0);
    assert!(matches!(
        simplify_sed(&track, &config_with_epsilon(-1.0)),
        Err(TrackError::InvalidParameter { .. })
    ));
    assert!(simplify_sed(&track, &config_with_epsilon(f64::NAN)).is_err());
}
