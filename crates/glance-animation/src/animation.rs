use std::cell::RefCell;
use std::rc::Rc;

use glance_geometry::{Point, Transform};
use glance_runtime::{FrameCallbackRegistration, MutableState, RuntimeHandle, State};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for Point {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        *self + (*target - *self) * fraction
    }
}

impl Lerp for Transform {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        Transform::lerp(self, target, fraction)
    }
}

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowInEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t matching x, bisection if it stalls.
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            converged = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !converged {
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let delta = sample_curve(ax, bx, cx, t) - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

/// Duration and easing of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub duration_millis: u64,
    pub easing: Easing,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(200, Easing::FastOutSlowInEasing)
    }
}

/// A tween between two values, sampled by absolute time in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T> {
    pub start: T,
    pub target: T,
    pub spec: AnimationSpec,
    pub started_at_millis: u64,
}

impl<T: Lerp + Clone> Tween<T> {
    pub fn new(start: T, target: T, spec: AnimationSpec, started_at_millis: u64) -> Self {
        Self {
            start,
            target,
            spec,
            started_at_millis,
        }
    }

    /// Linear progress in [0, 1] at `now_millis`.
    pub fn progress(&self, now_millis: u64) -> f32 {
        let elapsed = now_millis.saturating_sub(self.started_at_millis);
        let duration = self.spec.duration_millis.max(1);
        (elapsed as f32 / duration as f32).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now_millis: u64) -> bool {
        self.progress(now_millis) >= 1.0
    }

    /// Value at `now_millis`; exactly `target` once the duration has elapsed.
    pub fn sample(&self, now_millis: u64) -> T {
        let progress = self.progress(now_millis);
        if progress >= 1.0 {
            return self.target.clone();
        }
        self.start
            .lerp(&self.target, self.spec.easing.transform(progress))
    }
}

/// Value animated on the runtime's frame clock.
pub struct Animatable<T: Lerp + Clone + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: Lerp + Clone + 'static> {
    state: MutableState<T>,
    runtime: RuntimeHandle,
    current: T,
    tween: Option<Tween<T>>,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<Box<dyn FnOnce()>>,
}

impl<T: Lerp + Clone + 'static> Animatable<T> {
    pub fn new(initial: T, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            state: MutableState::new(initial.clone()),
            runtime,
            current: initial,
            tween: None,
            registration: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub fn animate_to(&self, target: T, spec: AnimationSpec) {
        self.animate_to_then(target, spec, || {});
    }

    /// Animates to `target` and runs `on_end` after the final frame.
    ///
    /// A superseded animation drops its `on_end` without running it.
    pub fn animate_to_then(&self, target: T, spec: AnimationSpec, on_end: impl FnOnce() + 'static) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            let now = inner.runtime.now_millis();
            inner.tween = Some(Tween::new(inner.current.clone(), target, spec, now));
            inner.on_end = Some(Box::new(on_end));
        }
        Self::schedule_frame(&self.inner);
    }

    /// Jumps to `target`, cancelling any running animation.
    pub fn snap_to(&self, target: T) {
        let state = {
            let mut inner = self.inner.borrow_mut();
            if let Some(registration) = inner.registration.take() {
                registration.cancel();
            }
            inner.tween = None;
            inner.on_end = None;
            inner.current = target.clone();
            inner.state.clone()
        };
        state.set_value(target);
    }

    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    pub fn target(&self) -> T {
        let inner = self.inner.borrow();
        inner
            .tween
            .as_ref()
            .map(|tween| tween.target.clone())
            .unwrap_or_else(|| inner.current.clone())
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().tween.is_some()
    }

    pub fn state(&self) -> State<T> {
        self.inner.borrow().state.as_state()
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let runtime = {
            let inner = this.borrow();
            if inner.registration.is_some() {
                return;
            }
            inner.runtime.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = runtime.frame_clock().with_frame_millis(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        if !registration.is_active() {
            log::trace!("animatable detached from runtime; snapping to target");
            Self::finish_now(this);
            return;
        }
        this.borrow_mut().registration = Some(registration);
    }

    fn finish_now(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let (state, value, on_end) = {
            let mut inner = this.borrow_mut();
            let Some(tween) = inner.tween.take() else {
                return;
            };
            inner.current = tween.target.clone();
            (inner.state.clone(), tween.target, inner.on_end.take())
        };
        state.set_value(value);
        if let Some(on_end) = on_end {
            on_end();
        }
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_millis: u64) {
        let (state, value, finished) = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            let Some(tween) = inner.tween.as_ref() else {
                return;
            };
            let value = tween.sample(frame_time_millis);
            let finished = tween.is_finished(frame_time_millis);
            inner.current = value.clone();
            (inner.state.clone(), value, finished)
        };
        state.set_value(value);

        if finished {
            let on_end = {
                let mut inner = this.borrow_mut();
                inner.tween = None;
                inner.on_end.take()
            };
            if let Some(on_end) = on_end {
                on_end();
            }
        } else {
            Self::schedule_frame(this);
        }
    }
}

impl<T: Lerp + Clone + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
