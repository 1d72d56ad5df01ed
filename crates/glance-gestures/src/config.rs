use crate::gesture_constants::*;

/// What the hosting surface already does on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureCapabilities {
    /// The host scroll view pinches natively and reports its zoom scale
    /// through [`GestureInterpreter::on_native_zoom`](crate::GestureInterpreter::on_native_zoom).
    /// Raw two-finger pinches are then ignored.
    pub native_pinch: bool,
}

impl GestureCapabilities {
    pub const TOUCH: GestureCapabilities = GestureCapabilities {
        native_pinch: false,
    };

    pub const NATIVE: GestureCapabilities = GestureCapabilities { native_pinch: true };
}

/// Tunables for one image page.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// The page counts as zoomed while `scale > zoom_epsilon`.
    pub zoom_epsilon: f32,
    pub snap_back_threshold: f32,
    pub snap_back_duration_millis: u64,
    pub double_tap_delay_millis: u64,
    pub double_tap_radius: f32,
    pub double_tap_scale: f32,
    pub double_tap_zoom_duration_millis: u64,
    pub long_press_delay_millis: u64,
    pub touch_slop: f32,
    pub swipe_close_velocity: f32,
    pub swipe_close_offset: f32,
    pub swipe_to_close_enabled: bool,
    pub double_tap_to_zoom_enabled: bool,
}

impl GestureConfig {
    /// Thresholds for raw-touch pinch surfaces.
    pub fn touch_zoom() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            zoom_epsilon: ZOOM_EPSILON,
            snap_back_threshold: SNAP_BACK_THRESHOLD,
            snap_back_duration_millis: SNAP_BACK_DURATION_MILLIS,
            double_tap_delay_millis: DOUBLE_TAP_DELAY_MILLIS,
            double_tap_radius: DOUBLE_TAP_RADIUS,
            double_tap_scale: DOUBLE_TAP_SCALE,
            double_tap_zoom_duration_millis: DOUBLE_TAP_ZOOM_DURATION_MILLIS,
            long_press_delay_millis: LONG_PRESS_DELAY_MILLIS,
            touch_slop: TOUCH_SLOP,
            swipe_close_velocity: SWIPE_CLOSE_VELOCITY_TOUCH,
            swipe_close_offset: SWIPE_CLOSE_OFFSET,
            swipe_to_close_enabled: true,
            double_tap_to_zoom_enabled: true,
        }
    }

    /// Thresholds for hosts whose scroll view zooms natively.
    pub fn native_zoom() -> Self {
        Self {
            zoom_epsilon: NATIVE_ZOOM_EPSILON,
            swipe_close_velocity: SWIPE_CLOSE_VELOCITY_NATIVE,
            ..Self::touch_zoom()
        }
    }

    pub fn for_capabilities(capabilities: GestureCapabilities) -> Self {
        if capabilities.native_pinch {
            Self::native_zoom()
        } else {
            Self::touch_zoom()
        }
    }

    /// Sets the maximum scale, kept within `[min_scale, MAX_SCALE_LIMIT]`.
    pub fn with_max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = if max_scale.is_finite() {
            max_scale.clamp(self.min_scale, MAX_SCALE_LIMIT)
        } else {
            MAX_SCALE
        };
        self.double_tap_scale = self.double_tap_scale.min(self.max_scale);
        self
    }

    pub fn with_zoom_epsilon(mut self, zoom_epsilon: f32) -> Self {
        self.zoom_epsilon = zoom_epsilon;
        self
    }

    pub fn with_long_press_delay(mut self, delay_millis: u64) -> Self {
        self.long_press_delay_millis = delay_millis;
        self
    }

    pub fn with_double_tap_scale(mut self, scale: f32) -> Self {
        self.double_tap_scale = self.clamp_scale(scale);
        self
    }

    pub fn with_swipe_close_velocity(mut self, velocity: f32) -> Self {
        self.swipe_close_velocity = velocity;
        self
    }

    pub fn with_swipe_close_offset(mut self, offset: f32) -> Self {
        self.swipe_close_offset = offset;
        self
    }

    pub fn with_swipe_to_close(mut self, enabled: bool) -> Self {
        self.swipe_to_close_enabled = enabled;
        self
    }

    pub fn with_double_tap_to_zoom(mut self, enabled: bool) -> Self {
        self.double_tap_to_zoom_enabled = enabled;
        self
    }

    pub fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn is_zoomed_scale(&self, scale: f32) -> bool {
        scale > self.zoom_epsilon
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::touch_zoom()
    }
}
