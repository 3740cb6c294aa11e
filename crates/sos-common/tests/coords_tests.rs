//! Tests for LatLonBounds and corner formatting.

use sos_common::coords::{format_corner, format_degree, LatLonBounds};

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn test_format_degree_pads_to_precision() {
    assert_eq!(format_degree(41.5), "41.5000");
    assert_eq!(format_degree(-70.0), "-70.0000");
}

#[test]
fn test_format_degree_rounds() {
    assert_eq!(format_degree(12.345_678), "12.3457");
}

#[test]
fn test_format_corner_lat_first() {
    assert_eq!(format_corner(41.5, -70.25), "41.5000 -70.2500");
}

// ============================================================================
// Envelopes
// ============================================================================

#[test]
fn test_point_bounds_are_degenerate() {
    let b = LatLonBounds::point(10.0, 20.0);
    assert_eq!(b.lower_corner(), b.upper_corner());
}

#[test]
fn test_from_points() {
    let b = LatLonBounds::from_points(vec![(1.0, 5.0), (-2.0, 7.0), (3.0, 6.0)]).unwrap();
    assert_eq!(b.lower_lat, -2.0);
    assert_eq!(b.upper_lat, 3.0);
    assert_eq!(b.lower_lon, 5.0);
    assert_eq!(b.upper_lon, 7.0);
}

#[test]
fn test_from_points_skips_nan() {
    let b = LatLonBounds::from_points(vec![(f64::NAN, 5.0), (1.0, 2.0)]).unwrap();
    assert_eq!(b, LatLonBounds::point(1.0, 2.0));
}

#[test]
fn test_from_points_empty() {
    assert!(LatLonBounds::from_points(Vec::new()).is_none());
}

#[test]
fn test_union() {
    let a = LatLonBounds::point(0.0, 0.0);
    let b = LatLonBounds::point(10.0, -10.0);
    let u = a.union(&b);
    assert_eq!(u.lower_corner(), "0.0000 -10.0000");
    assert_eq!(u.upper_corner(), "10.0000 0.0000");
}
