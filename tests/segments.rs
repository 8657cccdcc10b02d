//! Tests for stop / straight-segment simplification

use trackclean::synthetic::{anchored_drift, dogleg_course, straight_course};
use trackclean::{simplify_segments, SegmentConfig, TrackError};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_anchorage_collapses_to_three_points() {
    // ten fixes drifting within 30 m of an anchorage
    let track = anchored_drift(10, 60, 30.0, 5);
    let config = SegmentConfig {
        stop_max_distance_m: 200.0,
        ..SegmentConfig::default()
    };
    let reduced = simplify_segments(&track, &config).unwrap();
    let sources: Vec<usize> = reduced.iter().map(|p| p.source_index).collect();
    // the whole track is one stop: first point plus the last two survive
    assert_eq!(sources, vec![0, 8, 9]);
    assert_eq!(reduced[1].skipped_since_prev, 7);
}

#[test]
fn test_straight_course_collapses_to_four_points() {
    let track = straight_course(12, 60, 8.0, 45.0);
    let reduced = simplify_segments(&track, &SegmentConfig::default()).unwrap();
    let sources: Vec<usize> = reduced.iter().map(|p| p.source_index).collect();
    // the leading point has no bearing, so the straight run starts at the
    // second fix; its interior collapses down to the first point of the
    // window and the track's last two
    assert_eq!(sources, vec![0, 1, 10, 11]);
    assert_eq!(reduced[2].skipped_since_prev, 8);
    // the survivor after the gap is re-measured against its new predecessor
    assert!(approx_eq(reduced[2].speed_kn.unwrap(), 8.0, 0.2));
    assert!(approx_eq(reduced[2].time_delta_s.unwrap(), 540.0, 1e-9));
}

#[test]
fn test_turn_boundary_survives_collapse() {
    // eastbound leg, hard turn north, northbound leg
    let track = dogleg_course(6, 60, 8.0, 90.0, 0.0);
    let reduced = simplify_segments(&track, &SegmentConfig::default()).unwrap();
    let sources: Vec<usize> = reduced.iter().map(|p| p.source_index).collect();
    // each leg collapses on its own; the fixes flanking the turn survive
    assert_eq!(sources, vec![0, 1, 5, 6, 10, 11]);
    for point in reduced.iter().skip(1) {
        assert!(approx_eq(point.speed_kn.unwrap(), 8.0, 0.2));
    }
}

#[test]
fn test_first_point_summary_fields_are_empty() {
    let track = straight_course(6, 60, 8.0, 0.0);
    let reduced = simplify_segments(&track, &SegmentConfig::default()).unwrap();
    let first = &reduced[0];
    assert!(first.speed_kn.is_none());
    assert!(first.distance_m.is_none());
    assert!(first.time_delta_s.is_none());
    assert_eq!(first.skipped_since_prev, 0);
}

#[test]
fn test_tracks_below_minimum_window_pass_through() {
    for n in 0..4 {
        let track = straight_course(n, 60, 8.0, 0.0);
        let reduced = simplify_segments(&track, &SegmentConfig::default()).unwrap();
        assert_eq!(reduced.len(), n);
    }
}

#[test]
fn test_moving_track_is_not_a_stop() {
    // steady 8 kn course, but with a heading limit too tight to call it
    // straight: every window fails both tests, nothing collapses
    let track = dogleg_course(4, 60, 8.0, 90.0, 0.0);
    let config = SegmentConfig {
        max_heading_deviation_deg: 1e-9,
        ..SegmentConfig::default()
    };
    let reduced = simplify_segments(&track, &config).unwrap();
    assert_eq!(reduced.len(), track.len());
}

#[test]
fn test_invalid_config_rejected() {
    let track = straight_course(6, 60, 8.0, 0.0);
    let config = SegmentConfig {
        max_heading_deviation_deg: 0.0,
        ..SegmentConfig::default()
    };
    assert!(matches!(
        simplify_segments(&track, &config),
        Err(TrackError::InvalidParameter { .. })
    ));
}
