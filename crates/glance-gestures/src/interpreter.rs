//! Per-page gesture state machine.
//!
//! Phases run `Idle → Active → (Pinching | Panning | SwipingVertical) → Idle`,
//! with `Settling` while a snap-back or double-tap tween is in flight.
//! Every event first flushes the timeouts already due at its timestamp, so
//! results do not depend on how promptly the owner fires its timers.

use glance_animation::{AnimationSpec, Easing, Tween};
use glance_geometry::{Point, Transform, Viewport};
use smallvec::SmallVec;

use crate::gesture_constants::MAX_SWIPE_VELOCITY;
use crate::recognizers::{pan_by, LongPressTimer, PinchAnchor, SlopDetector, TapOutcome, TapTracker};
use crate::velocity_tracker::VelocityTracker1D;
use crate::{GestureCapabilities, GestureConfig, GestureError, TouchEvent, TouchPhase};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    /// A single finger is down and has not moved past the slop.
    Active,
    Pinching,
    /// Single-finger pan of zoomed content.
    Panning,
    /// Single-finger drag of unzoomed content, reported as swipe signals.
    SwipingVertical,
    /// No finger down; a tween is moving the transform.
    Settling,
}

/// Output of the interpreter, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureSignal {
    TransformChanged(Transform),
    /// Emitted only when the zoomed flag actually flips.
    ZoomChanged(bool),
    SingleTap(Point),
    DoubleTap(Point),
    LongPress(Point),
    /// Vertical distance of the finger from where the press started.
    SwipeMoved { offset: f32 },
    /// `velocity` is in pixels per millisecond.
    SwipeReleased { offset: f32, velocity: f32 },
    SwipeCancelled,
}

pub type GestureSignals = SmallVec<[GestureSignal; 4]>;

/// Bookkeeping for one press-to-release sequence.
struct GestureSession {
    /// Transform at grant. Restored on cancel.
    baseline: Transform,
    pressed_at: u64,
    slop: SlopDetector,
    last_position: Point,
    pinch: Option<PinchAnchor>,
    multi_touch: bool,
    long_pressed: bool,
    active_touch_count: usize,
    swipe_offset: f32,
    swipe_velocity: VelocityTracker1D,
}

impl GestureSession {
    fn new(baseline: Transform, position: Point, pressed_at: u64, slop: f32) -> Self {
        Self {
            baseline,
            pressed_at,
            slop: SlopDetector::new(position, slop),
            last_position: position,
            pinch: None,
            multi_touch: false,
            long_pressed: false,
            active_touch_count: 1,
            swipe_offset: 0.0,
            swipe_velocity: VelocityTracker1D::new(),
        }
    }

    fn is_tap(&self) -> bool {
        !self.slop.exceeded() && !self.multi_touch && !self.long_pressed
    }
}

pub struct GestureInterpreter {
    config: GestureConfig,
    capabilities: GestureCapabilities,
    viewport: Viewport,
    transform: Transform,
    zoomed: bool,
    phase: GesturePhase,
    session: Option<GestureSession>,
    taps: TapTracker,
    long_press: LongPressTimer,
    settle: Option<Tween<Transform>>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig, capabilities: GestureCapabilities) -> Self {
        let taps = TapTracker::new(config.double_tap_delay_millis, config.double_tap_radius);
        Self {
            config,
            capabilities,
            viewport: Viewport::ZERO,
            transform: Transform::IDENTITY,
            zoomed: false,
            phase: GesturePhase::Idle,
            session: None,
            taps,
            long_press: LongPressTimer::default(),
            settle: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn capabilities(&self) -> GestureCapabilities {
        self.capabilities
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Surface size used to centre pinch and double-tap anchors. Does not reset.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    pub fn active_touch_count(&self) -> usize {
        self.session
            .as_ref()
            .map_or(0, |session| session.active_touch_count)
    }

    /// Earliest pending timeout (long-press or single-tap confirmation).
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.long_press.deadline(), self.taps.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires every timeout due at or before `now`, earliest first.
    pub fn fire_due(&mut self, now: u64) -> GestureSignals {
        let mut signals = GestureSignals::new();
        while let Some(deadline) = self.next_deadline().filter(|deadline| *deadline <= now) {
            if self.taps.deadline() == Some(deadline) {
                if let Some(position) = self.taps.fire_due(deadline) {
                    log::trace!("single tap confirmed at {deadline}");
                    signals.push(GestureSignal::SingleTap(position));
                }
            } else if let Some(position) = self.long_press.fire_due(deadline) {
                if let Some(session) = self.session.as_mut() {
                    if !session.slop.exceeded() && !session.multi_touch {
                        session.long_pressed = true;
                        log::debug!("long press at {position:?}");
                        signals.push(GestureSignal::LongPress(position));
                    }
                }
            }
        }
        signals
    }

    pub fn on_touch(&mut self, event: &TouchEvent) -> GestureSignals {
        let mut signals = self.fire_due(event.uptime);
        if let Some(session) = self.session.as_mut() {
            session.active_touch_count = event.active_touch_count();
        }
        let result = match event.phase {
            TouchPhase::Down => self.on_down(event, &mut signals),
            TouchPhase::Move => self.on_move(event, &mut signals),
            TouchPhase::Up => self.on_up(event, &mut signals),
            TouchPhase::Cancel => {
                self.on_cancel(&mut signals);
                Ok(())
            }
        };
        if let Err(error) = result {
            log::trace!(
                "ignoring {:?} event at {}: {error}",
                event.phase,
                event.uptime
            );
        }
        signals
    }

    /// Advances a running tween to `now`.
    pub fn on_frame(&mut self, now: u64) -> GestureSignals {
        let mut signals = GestureSignals::new();
        let Some(tween) = self.settle.as_ref() else {
            return signals;
        };
        let value = tween.sample(now);
        let finished = tween.is_finished(now);
        self.set_transform(value, &mut signals);
        if finished {
            self.settle = None;
            if self.session.is_none() {
                self.phase = GesturePhase::Idle;
            }
            log::debug!("settled at scale {:.2}", value.scale);
        }
        signals
    }

    /// Zoom scale reported by a host scroll view that pinches natively.
    pub fn on_native_zoom(&mut self, scale: f32) -> GestureSignals {
        let mut signals = GestureSignals::new();
        if !scale.is_finite() {
            log::trace!("ignoring non-finite native zoom scale");
            return signals;
        }
        if !self.capabilities.native_pinch {
            log::debug!("native zoom reported on a touch-pinch surface");
        }
        let scale = self.config.clamp_scale(scale);
        self.settle = None;
        let next = Transform::new(scale, self.transform.translate);
        self.set_transform(next, &mut signals);
        self.update_zoom(self.config.is_zoomed_scale(scale), &mut signals);
        signals
    }

    /// Drops all gesture state and returns to identity.
    pub fn reset(&mut self) -> GestureSignals {
        let mut signals = GestureSignals::new();
        self.session = None;
        self.settle = None;
        self.long_press.cancel();
        self.taps.clear();
        self.phase = GesturePhase::Idle;
        self.set_transform(Transform::IDENTITY, &mut signals);
        self.update_zoom(false, &mut signals);
        signals
    }

    fn local(&self, position: Point) -> Point {
        position - self.viewport.center()
    }

    fn on_down(
        &mut self,
        event: &TouchEvent,
        signals: &mut GestureSignals,
    ) -> Result<(), GestureError> {
        let count = event.active_touch_count();
        if self.session.is_none() || count <= 1 {
            let position = if count <= 1 {
                event.position()?
            } else {
                event.primary_position()?
            };
            self.interrupt_settle(event.uptime, signals);
            let mut session = GestureSession::new(
                self.transform,
                position,
                event.uptime,
                self.config.touch_slop,
            );
            session.active_touch_count = count.max(1);
            self.session = Some(session);
            self.phase = GesturePhase::Active;
            if count <= 1 {
                self.long_press
                    .arm(event.uptime, self.config.long_press_delay_millis, position);
                return Ok(());
            }
        }

        self.long_press.cancel();
        if let Some(session) = self.session.as_mut() {
            session.multi_touch = true;
            session.slop.mark_exceeded();
        }
        if self.capabilities.native_pinch {
            // The host zooms, but a second finger still ends a vertical swipe.
            self.cancel_swipe(signals);
            self.phase = GesturePhase::Pinching;
            return Ok(());
        }
        self.begin_pinch(event, signals)
    }

    fn cancel_swipe(&mut self, signals: &mut GestureSignals) {
        if self.phase == GesturePhase::SwipingVertical {
            signals.push(GestureSignal::SwipeCancelled);
        }
    }

    fn begin_pinch(
        &mut self,
        event: &TouchEvent,
        signals: &mut GestureSignals,
    ) -> Result<(), GestureError> {
        let (distance, center) = event.pinch_geometry()?;
        let anchor = PinchAnchor::new(self.transform, distance, self.local(center));
        if let Some(session) = self.session.as_mut() {
            session.pinch = Some(anchor);
            session.multi_touch = true;
            session.slop.mark_exceeded();
        }
        self.cancel_swipe(signals);
        self.phase = GesturePhase::Pinching;
        log::debug!("pinch started, distance {distance:.1}");
        Ok(())
    }

    fn on_move(
        &mut self,
        event: &TouchEvent,
        signals: &mut GestureSignals,
    ) -> Result<(), GestureError> {
        if self.session.is_none() {
            return Ok(());
        }
        if event.active_touch_count() >= 2 {
            return self.on_pinch_move(event, signals);
        }

        let position = event.primary_position()?;
        let zoomed = self.zoomed;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if session.slop.update(position) {
            self.long_press.cancel();
            session.last_position = session.slop.origin();
            if zoomed {
                self.phase = GesturePhase::Panning;
            } else {
                self.phase = GesturePhase::SwipingVertical;
                session
                    .swipe_velocity
                    .add_data_point(session.pressed_at as i64, 0.0);
            }
            log::debug!("drag started: {:?}", self.phase);
        }

        match self.phase {
            GesturePhase::Panning => {
                let delta = position - session.last_position;
                session.last_position = position;
                let next = pan_by(self.transform, delta);
                if next.is_finite() {
                    self.set_transform(next, signals);
                }
            }
            GesturePhase::SwipingVertical => {
                let offset = position.y - session.slop.origin().y;
                session.swipe_offset = offset;
                session
                    .swipe_velocity
                    .add_data_point(event.uptime as i64, offset);
                signals.push(GestureSignal::SwipeMoved { offset });
            }
            _ => {}
        }
        Ok(())
    }

    fn on_pinch_move(
        &mut self,
        event: &TouchEvent,
        signals: &mut GestureSignals,
    ) -> Result<(), GestureError> {
        self.long_press.cancel();
        let anchor = match self.session.as_mut() {
            Some(session) => {
                session.multi_touch = true;
                session.slop.mark_exceeded();
                session.pinch
            }
            None => return Ok(()),
        };
        if self.capabilities.native_pinch {
            self.cancel_swipe(signals);
            self.phase = GesturePhase::Pinching;
            return Ok(());
        }
        let Some(anchor) = anchor else {
            return self.begin_pinch(event, signals);
        };

        let (distance, center) = event.pinch_geometry()?;
        let next = anchor
            .transform_for(distance, self.local(center), &self.config)
            .ok_or(GestureError::DegenerateDistance)?;
        log::trace!("pinch scale {:.3}", next.scale);
        self.set_transform(next, signals);
        self.update_zoom(self.config.is_zoomed_scale(next.scale), signals);
        Ok(())
    }

    fn on_up(
        &mut self,
        event: &TouchEvent,
        signals: &mut GestureSignals,
    ) -> Result<(), GestureError> {
        if self.session.is_none() {
            return Ok(());
        }
        match event.active_touch_count() {
            0 => {
                self.finish_session(event, signals);
                Ok(())
            }
            1 => {
                let zoomed = self.zoomed;
                let was_pinching = self.phase == GesturePhase::Pinching;
                if let Some(session) = self.session.as_mut() {
                    session.pinch = None;
                    if let Ok(position) = event.primary_position() {
                        session.last_position = position;
                    }
                }
                if was_pinching {
                    self.phase = if zoomed {
                        GesturePhase::Panning
                    } else {
                        GesturePhase::Active
                    };
                }
                Ok(())
            }
            _ if self.phase == GesturePhase::Pinching => self.begin_pinch(event, signals),
            _ => Ok(()),
        }
    }

    fn finish_session(&mut self, event: &TouchEvent, signals: &mut GestureSignals) {
        self.long_press.cancel();
        let Some(mut session) = self.session.take() else {
            return;
        };
        let phase = std::mem::replace(&mut self.phase, GesturePhase::Idle);

        if phase == GesturePhase::SwipingVertical {
            if let Ok(position) = event.position() {
                session.swipe_offset = position.y - session.slop.origin().y;
                session
                    .swipe_velocity
                    .add_data_point(event.uptime as i64, session.swipe_offset);
            }
            let velocity = session
                .swipe_velocity
                .velocity_per_millis(MAX_SWIPE_VELOCITY);
            signals.push(GestureSignal::SwipeReleased {
                offset: session.swipe_offset,
                velocity,
            });
        }

        if session.is_tap() {
            let position = event.position().unwrap_or_else(|_| session.slop.origin());
            self.on_tap(position, event.uptime, signals);
        }

        if self.settle.is_none() {
            self.snap_back_if_needed(event.uptime, signals);
        }
        log::debug!(
            "gesture ended ({phase:?}), scale {:.2}, zoomed {}",
            self.transform.scale,
            self.zoomed
        );
    }

    fn on_tap(&mut self, position: Point, now: u64, signals: &mut GestureSignals) {
        if !self.config.double_tap_to_zoom_enabled {
            signals.push(GestureSignal::SingleTap(position));
            return;
        }
        match self.taps.on_tap(position, now) {
            TapOutcome::Pending { superseded } => {
                if let Some(previous) = superseded {
                    signals.push(GestureSignal::SingleTap(previous));
                }
            }
            TapOutcome::Double(position) => {
                signals.push(GestureSignal::DoubleTap(position));
                self.toggle_zoom(position, now, signals);
            }
        }
    }

    /// Zooms in so the tapped content point lands in the centre, or back out to identity.
    fn toggle_zoom(&mut self, position: Point, now: u64, signals: &mut GestureSignals) {
        let target = if self.zoomed {
            Transform::IDENTITY
        } else {
            let content = self.transform.unmap_point(self.local(position));
            Transform::new(
                self.config.double_tap_scale,
                Point::new(-content.x, -content.y),
            )
        };
        if !target.is_finite() {
            return;
        }
        log::debug!("double tap zoom to {:.2}", target.scale);
        self.update_zoom(self.config.is_zoomed_scale(target.scale), signals);
        self.start_settle(target, self.config.double_tap_zoom_duration_millis, now);
    }

    fn snap_back_if_needed(&mut self, now: u64, signals: &mut GestureSignals) {
        let transform = self.transform;
        if transform.scale < self.config.snap_back_threshold && !transform.is_identity() {
            self.update_zoom(false, signals);
            self.start_settle(
                Transform::IDENTITY,
                self.config.snap_back_duration_millis,
                now,
            );
        }
    }

    fn start_settle(&mut self, target: Transform, duration_millis: u64, now: u64) {
        if self.transform == target {
            self.settle = None;
            return;
        }
        self.settle = Some(Tween::new(
            self.transform,
            target,
            AnimationSpec::tween(duration_millis, Easing::FastOutSlowInEasing),
            now,
        ));
        if self.session.is_none() {
            self.phase = GesturePhase::Settling;
        }
    }

    /// Freezes a running tween where it is so a new press starts from what is on screen.
    fn interrupt_settle(&mut self, now: u64, signals: &mut GestureSignals) {
        if let Some(tween) = self.settle.take() {
            let value = tween.sample(now);
            self.set_transform(value, signals);
        }
    }

    fn on_cancel(&mut self, signals: &mut GestureSignals) {
        self.long_press.cancel();
        let Some(session) = self.session.take() else {
            return;
        };
        if self.phase == GesturePhase::SwipingVertical {
            signals.push(GestureSignal::SwipeCancelled);
        }
        self.phase = GesturePhase::Idle;
        self.set_transform(session.baseline, signals);
        self.update_zoom(self.config.is_zoomed_scale(session.baseline.scale), signals);
        log::debug!("gesture cancelled");
    }

    fn set_transform(&mut self, transform: Transform, signals: &mut GestureSignals) {
        if transform != self.transform {
            self.transform = transform;
            signals.push(GestureSignal::TransformChanged(transform));
        }
    }

    fn update_zoom(&mut self, zoomed: bool, signals: &mut GestureSignals) {
        if zoomed != self.zoomed {
            self.zoomed = zoomed;
            log::debug!("zoom state changed: {zoomed}");
            signals.push(GestureSignal::ZoomChanged(zoomed));
        }
    }
}

#[cfg(test)]
#[path = "tests/interpreter_tests.rs"]
mod tests;
