use glance_gestures::gesture_constants::{
    MAX_SCALE_LIMIT, NATIVE_ZOOM_EPSILON, SWIPE_CLOSE_VELOCITY_NATIVE, SWIPE_CLOSE_VELOCITY_TOUCH,
    ZOOM_EPSILON,
};
use glance_gestures::{GestureCapabilities, GestureConfig, GestureError};

#[test]
fn presets_follow_capabilities() {
    let touch = GestureConfig::for_capabilities(GestureCapabilities::TOUCH);
    let native = GestureConfig::for_capabilities(GestureCapabilities::NATIVE);

    assert_eq!(touch, GestureConfig::default());
    assert_eq!(touch.swipe_close_velocity, SWIPE_CLOSE_VELOCITY_TOUCH);
    assert_eq!(touch.zoom_epsilon, ZOOM_EPSILON);
    assert_eq!(native.swipe_close_velocity, SWIPE_CLOSE_VELOCITY_NATIVE);
    assert_eq!(native.zoom_epsilon, NATIVE_ZOOM_EPSILON);
    assert_eq!(native.swipe_close_offset, touch.swipe_close_offset);
}

#[test]
fn max_scale_is_bounded() {
    let config = GestureConfig::default().with_max_scale(12.0);
    assert_eq!(config.max_scale, MAX_SCALE_LIMIT);
    let config = GestureConfig::default().with_max_scale(0.5);
    assert_eq!(config.max_scale, config.min_scale);
    assert_eq!(config.double_tap_scale, config.min_scale);
    assert_eq!(GestureConfig::default().clamp_scale(f32::NAN), 1.0);
}

#[test]
fn errors_describe_the_payload() {
    assert_eq!(
        GestureError::TooFewTouches {
            expected: 2,
            actual: 1
        }
        .to_string(),
        "expected 2 touches, got 1"
    );
    assert_eq!(
        GestureError::MissingCoordinates.to_string(),
        "touch is missing coordinates"
    );
}
