//! Assertion helpers for transform and overlay state.

use glance_geometry::{Point, Transform};

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_point_approx_eq(actual: Point, expected: Point, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

/// Assert that a transform is approximately equal to another.
pub fn assert_transform_approx_eq(actual: Transform, expected: Transform, tolerance: f32, msg: &str) {
    assert_approx_eq(
        actual.scale,
        expected.scale,
        tolerance,
        &format!("{} - scale", msg),
    );
    assert_point_approx_eq(
        actual.translate,
        expected.translate,
        tolerance,
        &format!("{} - translate", msg),
    );
}

/// Assert that `content` is drawn at `screen` under `transform`.
pub fn assert_maps_to(transform: Transform, content: Point, screen: Point, msg: &str) {
    assert_point_approx_eq(transform.map_point(content), screen, 1e-3, msg);
}
