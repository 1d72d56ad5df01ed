use crate::gesture_constants::MAX_SWIPE_VELOCITY;
use crate::{GestureConfig, VelocityTracker1D};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Keep tracking.
    Pending,
    /// Dismiss the viewer. Reported at most once until [`SwipeCloseTracker::reset`].
    Close,
    /// Animate the page back to its resting position.
    SnapBack,
    /// Swipe-to-close is disabled, the page is zoomed or not laid out yet,
    /// or close already fired.
    Ignored,
}

/// Swipe-to-close decision for one page.
///
/// The page rests in a vertical scroll surrogate whose centre offset equals
/// the viewport height, so dragging the image up or down moves the offset
/// away from that centre. Hosts with a native scroll view feed its offsets
/// directly; touch-driven pages feed `centre - drag`.
#[derive(Clone)]
pub struct SwipeCloseTracker {
    enabled: bool,
    close_velocity: f32,
    close_offset: f32,
    viewport_height: f32,
    offset: f32,
    fired: bool,
    velocity: VelocityTracker1D,
}

impl SwipeCloseTracker {
    pub fn new(config: &GestureConfig, viewport_height: f32) -> Self {
        Self {
            enabled: config.swipe_to_close_enabled,
            close_velocity: config.swipe_close_velocity,
            close_offset: config.swipe_close_offset,
            viewport_height,
            offset: viewport_height,
            fired: false,
            velocity: VelocityTracker1D::new(),
        }
    }

    pub fn centre(&self) -> f32 {
        self.viewport_height
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn offset_from_centre(&self) -> f32 {
        self.offset - self.centre()
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Distance past which any drag is treated as an accidental full-page flick.
    ///
    /// Never tighter than the regular close offset.
    pub fn accidental_bound(&self) -> f32 {
        (self.viewport_height / 2.0).max(self.close_offset)
    }

    fn is_laid_out(&self) -> bool {
        self.viewport_height > 0.0
    }

    /// How far the page has been dragged towards the accidental bound, in `[0, 1]`.
    pub fn dismiss_progress(&self) -> f32 {
        let bound = self.accidental_bound();
        if bound <= 0.0 {
            return 0.0;
        }
        (self.offset_from_centre().abs() / bound).clamp(0.0, 1.0)
    }

    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        self.reset();
    }

    /// Re-centres and re-arms the tracker.
    pub fn reset(&mut self) {
        self.offset = self.centre();
        self.fired = false;
        self.velocity.reset();
    }

    pub fn on_scroll(&mut self, offset: f32, uptime: u64, zoomed: bool) -> SwipeOutcome {
        if !self.enabled || !self.is_laid_out() || zoomed || self.fired || !offset.is_finite() {
            return SwipeOutcome::Ignored;
        }
        self.offset = offset;
        self.velocity
            .add_data_point(uptime as i64, self.offset_from_centre());
        if self.offset_from_centre().abs() > self.accidental_bound() {
            log::debug!("swipe passed the accidental-flick bound");
            self.fired = true;
            return SwipeOutcome::Close;
        }
        SwipeOutcome::Pending
    }

    /// Decides at release. `velocity` (pixels per millisecond) comes from the
    /// host when available; otherwise it is estimated from the scroll samples.
    pub fn on_release(
        &mut self,
        offset: f32,
        velocity: Option<f32>,
        uptime: u64,
        zoomed: bool,
    ) -> SwipeOutcome {
        if !self.enabled || !self.is_laid_out() || zoomed || self.fired {
            return SwipeOutcome::Ignored;
        }
        if offset.is_finite() {
            self.offset = offset;
            self.velocity
                .add_data_point(uptime as i64, self.offset_from_centre());
        }
        let velocity = velocity
            .filter(|velocity| velocity.is_finite())
            .unwrap_or_else(|| self.velocity.velocity_per_millis(MAX_SWIPE_VELOCITY));
        let distance = self.offset_from_centre().abs();

        if distance > self.accidental_bound() {
            self.fired = true;
            return SwipeOutcome::Close;
        }
        if velocity.abs() > self.close_velocity && distance > self.close_offset {
            log::debug!("swipe to close: distance {distance:.1}, velocity {velocity:.2}");
            self.fired = true;
            return SwipeOutcome::Close;
        }
        self.offset = self.centre();
        self.velocity.reset();
        SwipeOutcome::SnapBack
    }
}

#[cfg(test)]
#[path = "tests/swipe_tests.rs"]
mod tests;
