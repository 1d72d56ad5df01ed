use crate::frame_clock::FrameClock;
use crate::{millis_to_nanos, FrameCallbackId};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use web_time::Instant;

pub type TimerId = u64;

/// Frame cadence used when the runtime is advanced in steps (~60 FPS).
pub const FRAME_INTERVAL_MILLIS: u64 = 16;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct TimerEntry {
    id: TimerId,
    deadline_millis: u64,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

pub(crate) struct RuntimeInner {
    now_millis: Cell<u64>,
    timers: RefCell<Vec<TimerEntry>>,
    next_timer_id: Cell<TimerId>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<FrameCallbackId>,
}

impl RuntimeInner {
    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        for callback in pending {
            callback(frame_time_nanos);
        }
    }

    fn register_timer(
        &self,
        deadline_millis: u64,
        callback: Box<dyn FnOnce(u64) + 'static>,
    ) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        self.timers.borrow_mut().push(TimerEntry {
            id,
            deadline_millis,
            callback: Some(callback),
        });
        id
    }

    fn cancel_timer(&self, id: TimerId) {
        let mut timers = self.timers.borrow_mut();
        if let Some(index) = timers.iter().position(|entry| entry.id == id) {
            timers.swap_remove(index);
        }
    }

    /// Removes the earliest timer due at or before `now`. Ties fire in registration order.
    fn take_due_timer(&self, now: u64) -> Option<TimerEntry> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline_millis <= now)
            .min_by_key(|(_, entry)| (entry.deadline_millis, entry.id))
            .map(|(index, _)| index)?;
        Some(timers.swap_remove(index))
    }

    fn next_deadline(&self) -> Option<u64> {
        self.timers
            .borrow()
            .iter()
            .map(|entry| entry.deadline_millis)
            .min()
    }

    fn run_timers_until(&self, now: u64) {
        while let Some(mut entry) = self.take_due_timer(now) {
            // Callbacks observe the time they were scheduled for.
            if entry.deadline_millis > self.now_millis.get() {
                self.now_millis.set(entry.deadline_millis);
            }
            if let Some(callback) = entry.callback.take() {
                callback(entry.deadline_millis);
            }
        }
        if now > self.now_millis.get() {
            self.now_millis.set(now);
        }
    }
}

/// Owner of the timer and frame queues.
///
/// Time only moves when the host advances it, which keeps every gesture
/// test deterministic. Real hosts feed it from [`MonotonicClock`].
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now_millis: u64) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                now_millis: Cell::new(now_millis),
                timers: RefCell::new(Vec::new()),
                next_timer_id: Cell::new(1),
                frame_callbacks: RefCell::new(VecDeque::new()),
                next_frame_callback_id: Cell::new(1),
            }),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn now_millis(&self) -> u64 {
        self.inner.now_millis.get()
    }

    /// Whether any timer or frame callback is still scheduled.
    pub fn is_idle(&self) -> bool {
        self.inner.timers.borrow().is_empty() && !self.inner.has_frame_callbacks()
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.inner.next_deadline()
    }

    /// Fires every timer due at or before `now_millis` and then one frame at that time.
    pub fn advance_to(&self, now_millis: u64) {
        self.inner.run_timers_until(now_millis);
        if self.inner.has_frame_callbacks() {
            self.inner
                .drain_frame_callbacks(millis_to_nanos(self.inner.now_millis.get()));
        }
    }

    /// Advances by `millis` in frame-sized steps, firing timers and frames along the way.
    pub fn advance_by(&self, millis: u64) {
        let target = self.now_millis().saturating_add(millis);
        while self.now_millis() < target {
            let step = (self.now_millis() + FRAME_INTERVAL_MILLIS).min(target);
            self.advance_to(step);
        }
    }

    /// One host frame driven by a wall clock. Returns whether work is still
    /// scheduled; a clock behind the runtime only re-runs pending frames.
    pub fn advance_to_clock(&self, clock: &MonotonicClock) -> bool {
        self.advance_to(clock.now_millis().max(self.now_millis()));
        !self.is_idle()
    }

    /// Runs one frame at the current time without moving the clock.
    pub fn drain_frame_callbacks(&self) {
        self.inner
            .drain_frame_callbacks(millis_to_nanos(self.inner.now_millis.get()));
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak handle used by components to schedule work.
///
/// Registrations made after the [`Runtime`] is dropped are inactive.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    /// A handle that is never attached to a runtime. Useful for detached components.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_millis(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_millis.get())
            .unwrap_or(0)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub(crate) fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub(crate) fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Schedules `callback` at an absolute runtime time. The callback receives its deadline.
    pub fn schedule_at(
        &self,
        deadline_millis: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TimerRegistration {
        match self.inner.upgrade() {
            Some(inner) => {
                let id = inner.register_timer(deadline_millis, Box::new(callback));
                TimerRegistration {
                    runtime: self.clone(),
                    id: Some(id),
                }
            }
            None => TimerRegistration {
                runtime: self.clone(),
                id: None,
            },
        }
    }

    pub fn schedule_after(
        &self,
        delay_millis: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TimerRegistration {
        let deadline = self.now_millis().saturating_add(delay_millis);
        self.schedule_at(deadline, callback)
    }

    fn cancel_timer(&self, id: TimerId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_timer(id);
        }
    }
}

/// Pending timer. Dropping or cancelling it removes the callback from the queue.
pub struct TimerRegistration {
    runtime: RuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel_timer(id);
        }
    }
}

/// Wall-clock source for hosts that do not stamp their own events.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
    base_millis: u64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Reads `base_millis` now and counts up in real time from there.
    pub fn starting_at(base_millis: u64) -> Self {
        Self {
            origin: Instant::now(),
            base_millis,
        }
    }

    pub fn now_millis(&self) -> u64 {
        self.base_millis
            .saturating_add(self.origin.elapsed().as_millis() as u64)
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
