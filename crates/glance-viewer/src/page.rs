//! Controller for a single image page.
//!
//! Owns the page's gesture interpreter and swipe-to-close tracker, arms
//! runtime timers for the interpreter's deadlines, drives its tweens from
//! the frame clock and publishes the results as observable state.

use std::cell::RefCell;
use std::rc::Rc;

use glance_animation::{Animatable, AnimationSpec, Easing};
use glance_geometry::{display_box, fit_transform, FitTransform, Size, Transform, Viewport};
use glance_gestures::{
    GestureCapabilities, GestureConfig, GestureInterpreter, GesturePhase, GestureSignal,
    GestureSignals, SwipeCloseTracker, SwipeOutcome, TouchEvent,
};
use glance_runtime::{
    FrameCallbackRegistration, MutableState, RuntimeHandle, State, TimerRegistration,
};
use smallvec::SmallVec;

use crate::ImageSource;

const VERTICAL_SNAP_MILLIS: u64 = 200;

/// Callbacks a page forwards to its owner. All run with no page borrow held.
#[derive(Clone, Default)]
pub struct PageEvents {
    pub on_zoom: Option<Rc<dyn Fn(bool)>>,
    pub on_single_tap: Option<Rc<dyn Fn()>>,
    pub on_long_press: Option<Rc<dyn Fn(&ImageSource)>>,
    pub on_request_close: Option<Rc<dyn Fn()>>,
}

enum PageEffect {
    Zoom(bool),
    SingleTap,
    LongPress,
    RequestClose,
    DragVertical(f32),
    SnapVerticalBack,
}

type PageEffects = SmallVec<[PageEffect; 4]>;

struct PageInner {
    source: ImageSource,
    runtime: RuntimeHandle,
    interpreter: GestureInterpreter,
    swipe: SwipeCloseTracker,
    viewport: Viewport,
    natural_size: Option<Size>,
    transform: MutableState<Transform>,
    zoomed: MutableState<bool>,
    loaded: MutableState<bool>,
    vertical_offset: Animatable<f32>,
    events: PageEvents,
    timer: Option<TimerRegistration>,
    timer_deadline: Option<u64>,
    frame: Option<FrameCallbackRegistration>,
}

/// One zoomable image inside the viewer. Cloning yields another handle.
#[derive(Clone)]
pub struct ImagePage {
    inner: Rc<RefCell<PageInner>>,
}

impl ImagePage {
    pub fn new(
        source: ImageSource,
        viewport: Viewport,
        natural_size: Option<Size>,
        config: GestureConfig,
        capabilities: GestureCapabilities,
        runtime: RuntimeHandle,
    ) -> Self {
        let swipe = SwipeCloseTracker::new(&config, viewport.height);
        let mut interpreter = GestureInterpreter::new(config, capabilities);
        interpreter.set_viewport(viewport);
        let inner = PageInner {
            source,
            vertical_offset: Animatable::new(swipe.centre(), runtime.clone()),
            runtime,
            interpreter,
            swipe,
            viewport,
            natural_size: natural_size.filter(Size::is_positive),
            transform: MutableState::new(Transform::IDENTITY),
            zoomed: MutableState::new(false),
            loaded: MutableState::new(false),
            events: PageEvents::default(),
            timer: None,
            timer_deadline: None,
            frame: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn set_events(&self, events: PageEvents) {
        self.inner.borrow_mut().events = events;
    }

    pub fn source(&self) -> ImageSource {
        self.inner.borrow().source.clone()
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    pub fn natural_size(&self) -> Option<Size> {
        self.inner.borrow().natural_size
    }

    pub fn transform(&self) -> State<Transform> {
        self.inner.borrow().transform.as_state()
    }

    pub fn current_transform(&self) -> Transform {
        self.inner.borrow().interpreter.transform()
    }

    pub fn zoomed(&self) -> State<bool> {
        self.inner.borrow().zoomed.as_state()
    }

    pub fn is_zoomed(&self) -> bool {
        self.inner.borrow().interpreter.is_zoomed()
    }

    pub fn loaded(&self) -> State<bool> {
        self.inner.borrow().loaded.as_state()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.borrow().loaded.get()
    }

    /// Vertical scroll-surrogate offset; rests at the viewport height.
    pub fn vertical_offset(&self) -> State<f32> {
        self.inner.borrow().vertical_offset.state()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.inner.borrow().interpreter.phase()
    }

    /// Swipe-to-close progress in `[0, 1]`, for dimming the backdrop.
    pub fn swipe_progress(&self) -> f32 {
        self.inner.borrow().swipe.dismiss_progress()
    }

    pub fn fit(&self) -> FitTransform {
        let inner = self.inner.borrow();
        fit_transform(inner.natural_size, inner.viewport)
    }

    /// Laid-out image box; a placeholder box while the natural size is unknown.
    pub fn display_box(&self) -> Size {
        let inner = self.inner.borrow();
        display_box(inner.natural_size, inner.viewport)
    }

    pub fn on_touch(&self, event: &TouchEvent) {
        let signals = self.inner.borrow_mut().interpreter.on_touch(event);
        self.dispatch(signals, event.uptime);
        self.rearm();
    }

    /// Zoom scale reported by a host scroll view that pinches natively.
    pub fn on_native_zoom(&self, scale: f32) {
        let (signals, now) = {
            let mut inner = self.inner.borrow_mut();
            (inner.interpreter.on_native_zoom(scale), inner.runtime.now_millis())
        };
        self.dispatch(signals, now);
        self.rearm();
    }

    /// Vertical offset reported by a host scroll view.
    pub fn on_vertical_scroll(&self, offset: f32, uptime: u64) {
        let mut effects = PageEffects::new();
        {
            let mut inner = self.inner.borrow_mut();
            let zoomed = inner.interpreter.is_zoomed();
            match inner.swipe.on_scroll(offset, uptime, zoomed) {
                SwipeOutcome::Pending => effects.push(PageEffect::DragVertical(offset)),
                SwipeOutcome::Close => effects.push(PageEffect::RequestClose),
                SwipeOutcome::SnapBack | SwipeOutcome::Ignored => {}
            }
        }
        self.run(None, effects);
    }

    /// End of a host-driven vertical drag. `velocity` is in pixels per millisecond.
    pub fn on_vertical_scroll_end(&self, offset: f32, velocity: Option<f32>, uptime: u64) {
        let mut effects = PageEffects::new();
        {
            let mut inner = self.inner.borrow_mut();
            if matches!(
                inner.interpreter.phase(),
                GesturePhase::Pinching | GesturePhase::Panning
            ) {
                log::trace!("dropping stale scroll end at {uptime}");
                return;
            }
            let zoomed = inner.interpreter.is_zoomed();
            Self::release_swipe(&mut inner, offset, velocity, uptime, zoomed, &mut effects);
        }
        self.run(None, effects);
    }

    pub fn on_load_complete(&self) {
        let loaded = self.inner.borrow().loaded.clone();
        if loaded.set(true) {
            log::debug!("image loaded: {}", self.source());
        }
    }

    /// Records the decoded pixel size. A new size re-derives layout with a hard reset.
    pub fn on_image_size_resolved(&self, size: Size) {
        {
            let mut inner = self.inner.borrow_mut();
            if !size.is_positive() {
                log::debug!("ignoring degenerate size {size:?} for {}", inner.source);
                return;
            }
            if inner.natural_size == Some(size) {
                return;
            }
            inner.natural_size = Some(size);
        }
        self.reset();
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.viewport == viewport {
                return;
            }
            inner.viewport = viewport;
            inner.interpreter.set_viewport(viewport);
            inner.swipe.set_viewport_height(viewport.height);
        }
        self.reset();
    }

    /// Hard reset: identity transform, not zoomed, vertical offset re-centred.
    pub fn reset(&self) {
        let (signals, now, centre, vertical_offset) = {
            let mut inner = self.inner.borrow_mut();
            let signals = inner.interpreter.reset();
            inner.swipe.reset();
            (
                signals,
                inner.runtime.now_millis(),
                inner.swipe.centre(),
                inner.vertical_offset.clone(),
            )
        };
        self.dispatch(signals, now);
        vertical_offset.snap_to(centre);
        self.rearm();
    }

    fn dispatch(&self, signals: GestureSignals, now: u64) {
        let mut effects = PageEffects::new();
        let mut transform = None;
        {
            let mut inner = self.inner.borrow_mut();
            for signal in signals {
                match signal {
                    GestureSignal::TransformChanged(next) => transform = Some(next),
                    GestureSignal::ZoomChanged(zoomed) => effects.push(PageEffect::Zoom(zoomed)),
                    GestureSignal::SingleTap(_) => effects.push(PageEffect::SingleTap),
                    GestureSignal::DoubleTap(position) => {
                        log::trace!("double tap at {position:?}");
                    }
                    GestureSignal::LongPress(_) => effects.push(PageEffect::LongPress),
                    GestureSignal::SwipeMoved { offset } => {
                        let zoomed = inner.interpreter.is_zoomed();
                        let surrogate = inner.swipe.centre() - offset;
                        match inner.swipe.on_scroll(surrogate, now, zoomed) {
                            SwipeOutcome::Pending => {
                                effects.push(PageEffect::DragVertical(surrogate))
                            }
                            SwipeOutcome::Close => effects.push(PageEffect::RequestClose),
                            SwipeOutcome::SnapBack | SwipeOutcome::Ignored => {}
                        }
                    }
                    GestureSignal::SwipeReleased { offset, velocity } => {
                        let zoomed = inner.interpreter.is_zoomed();
                        let surrogate = inner.swipe.centre() - offset;
                        Self::release_swipe(
                            &mut inner,
                            surrogate,
                            Some(-velocity),
                            now,
                            zoomed,
                            &mut effects,
                        );
                    }
                    GestureSignal::SwipeCancelled => {
                        if !inner.swipe.has_fired() {
                            inner.swipe.reset();
                            effects.push(PageEffect::SnapVerticalBack);
                        }
                    }
                }
            }
        }
        self.run(transform, effects);
    }

    fn release_swipe(
        inner: &mut PageInner,
        offset: f32,
        velocity: Option<f32>,
        uptime: u64,
        zoomed: bool,
        effects: &mut PageEffects,
    ) {
        match inner.swipe.on_release(offset, velocity, uptime, zoomed) {
            SwipeOutcome::Close => effects.push(PageEffect::RequestClose),
            SwipeOutcome::SnapBack => effects.push(PageEffect::SnapVerticalBack),
            SwipeOutcome::Pending | SwipeOutcome::Ignored => {}
        }
    }

    fn run(&self, transform: Option<Transform>, effects: PageEffects) {
        let (transform_state, zoomed_state, vertical_offset, events, source, centre) = {
            let inner = self.inner.borrow();
            (
                inner.transform.clone(),
                inner.zoomed.clone(),
                inner.vertical_offset.clone(),
                inner.events.clone(),
                inner.source.clone(),
                inner.swipe.centre(),
            )
        };

        if let Some(transform) = transform {
            transform_state.set(transform);
        }
        for effect in effects {
            match effect {
                PageEffect::Zoom(zoomed) => {
                    zoomed_state.set(zoomed);
                    if let Some(on_zoom) = &events.on_zoom {
                        on_zoom(zoomed);
                    }
                }
                PageEffect::SingleTap => {
                    if let Some(on_single_tap) = &events.on_single_tap {
                        on_single_tap();
                    }
                }
                PageEffect::LongPress => {
                    if let Some(on_long_press) = &events.on_long_press {
                        on_long_press(&source);
                    }
                }
                PageEffect::RequestClose => {
                    log::debug!("swipe to close on {source}");
                    if let Some(on_request_close) = &events.on_request_close {
                        on_request_close();
                    }
                }
                PageEffect::DragVertical(offset) => vertical_offset.snap_to(offset),
                PageEffect::SnapVerticalBack => vertical_offset.animate_to(
                    centre,
                    AnimationSpec::tween(VERTICAL_SNAP_MILLIS, Easing::FastOutSlowInEasing),
                ),
            }
        }
    }

    /// Keeps exactly one timer armed for the interpreter's next deadline and a
    /// frame callback pending while it settles.
    fn rearm(&self) {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let deadline = inner.interpreter.next_deadline();
        if deadline != inner.timer_deadline {
            inner.timer = None;
            inner.timer_deadline = deadline;
            if let Some(deadline) = deadline {
                let weak = Rc::downgrade(&self.inner);
                let registration = inner.runtime.schedule_at(deadline, move |now| {
                    if let Some(inner) = weak.upgrade() {
                        ImagePage { inner }.on_deadline(now);
                    }
                });
                inner.timer = Some(registration);
            }
        }

        if !inner.interpreter.is_settling() {
            inner.frame = None;
        } else if inner.frame.is_none() {
            let weak = Rc::downgrade(&self.inner);
            let registration = inner.runtime.frame_clock().with_frame_millis(move |now| {
                if let Some(inner) = weak.upgrade() {
                    ImagePage { inner }.on_frame(now);
                }
            });
            if registration.is_active() {
                inner.frame = Some(registration);
            } else {
                log::trace!("page detached from runtime; finishing settle");
                drop(guard);
                self.on_frame(u64::MAX);
            }
        }
    }

    fn on_deadline(&self, now: u64) {
        let signals = {
            let mut inner = self.inner.borrow_mut();
            inner.timer = None;
            inner.timer_deadline = None;
            inner.interpreter.fire_due(now)
        };
        self.dispatch(signals, now);
        self.rearm();
    }

    fn on_frame(&self, now: u64) {
        let signals = {
            let mut inner = self.inner.borrow_mut();
            inner.frame = None;
            inner.interpreter.on_frame(now)
        };
        self.dispatch(signals, now);
        self.rearm();
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
