//! Mathematical structs and functions.

use cgmath::{MetricSpace, Point3};
use itertools::Itertools;

/// A 3D point in map coordinates.
pub type BasicPoint3d = Point3<f64>;

/// Computes the length of an open polyline in m.
pub fn polyline_length(points: &[BasicPoint3d]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b): (&BasicPoint3d, &BasicPoint3d)| a.distance(*b))
        .sum()
}

/// Computes the length of a closed polyline in m,
/// including the segment from the last point back to the first.
pub fn ring_length(points: &[BasicPoint3d]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .circular_tuple_windows()
        .map(|(a, b): (&BasicPoint3d, &BasicPoint3d)| a.distance(*b))
        .sum()
}

/// Computes the signed area of a ring projected onto the XY plane, in m^2.
/// Positive if the points wind counter-clockwise.
pub fn signed_area_xy(points: &[BasicPoint3d]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: f64 = points
        .iter()
        .circular_tuple_windows()
        .map(|(a, b): (&BasicPoint3d, &BasicPoint3d)| a.x * b.y - b.x * a.y)
        .sum();
    0.5 * twice_area
}
