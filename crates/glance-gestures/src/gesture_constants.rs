//! Shared gesture thresholds.
//!
//! Values are in logical pixels and milliseconds. Velocities used by the
//! swipe-to-close check are in pixels per millisecond.

/// Movement (from the press position) that turns a touch into a drag.
///
/// Past this distance a pending long-press is cancelled and the release is
/// no longer a tap.
pub const TOUCH_SLOP: f32 = 10.0;

pub const MIN_SCALE: f32 = 1.0;

pub const MAX_SCALE: f32 = 3.0;

/// Upper bound accepted for a configured maximum scale.
pub const MAX_SCALE_LIMIT: f32 = 5.0;

/// Zoom threshold used by the touch-driven pinch surface.
pub const ZOOM_EPSILON: f32 = 1.05;

/// Zoom threshold matching a platform scroll view that reports its own zoom.
pub const NATIVE_ZOOM_EPSILON: f32 = 1.01;

/// Releasing below this scale tweens the page back to identity.
pub const SNAP_BACK_THRESHOLD: f32 = 1.05;

pub const SNAP_BACK_DURATION_MILLIS: u64 = 200;

pub const DOUBLE_TAP_DELAY_MILLIS: u64 = 300;

/// Maximum per-axis distance between the two taps of a double tap.
pub const DOUBLE_TAP_RADIUS: f32 = 20.0;

pub const DOUBLE_TAP_SCALE: f32 = 2.0;

pub const DOUBLE_TAP_ZOOM_DURATION_MILLIS: u64 = 200;

pub const LONG_PRESS_DELAY_MILLIS: u64 = 800;

/// Vertical distance from the resting position a swipe must cover to close.
pub const SWIPE_CLOSE_OFFSET: f32 = 75.0;

/// Close velocity when the host scroll view handles zoom natively.
pub const SWIPE_CLOSE_VELOCITY_NATIVE: f32 = 1.55;

/// Close velocity when zoom is interpreted from raw touches.
pub const SWIPE_CLOSE_VELOCITY_TOUCH: f32 = 1.75;

/// Cap applied to estimated swipe velocities, in pixels per millisecond.
pub const MAX_SWIPE_VELOCITY: f32 = 8.0;
