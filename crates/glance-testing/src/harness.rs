//! Headless viewer harness.
//!
//! Owns a manual [`Runtime`], an [`ImageViewer`] wired to a
//! [`RecordingPager`] and a [`TouchRobot`]. Touch events are delivered at
//! their own uptime: the runtime is advanced to each event first, so timers
//! and frames interleave with input the way they would on a device.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glance_geometry::{Point, Transform, Viewport};
use glance_gestures::TouchEvent;
use glance_runtime::Runtime;
use glance_viewer::{ImagePage, ImageSource, ImageViewer, ViewerDiagnostic, ViewerProps};

use crate::{RecordingPager, TouchRobot};

/// Upper bound for [`ViewerHarness::settle`].
pub const SETTLE_LIMIT_MILLIS: u64 = 10_000;

/// Everything the viewer reported through its props callbacks.
#[derive(Debug, Default)]
pub struct CallbackLog {
    close_requests: Cell<usize>,
    indices: RefCell<Vec<usize>>,
    long_presses: RefCell<Vec<ImageSource>>,
    diagnostics: RefCell<Vec<ViewerDiagnostic>>,
}

impl CallbackLog {
    pub fn close_requests(&self) -> usize {
        self.close_requests.get()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.indices.borrow().clone()
    }

    pub fn long_presses(&self) -> Vec<ImageSource> {
        self.long_presses.borrow().clone()
    }

    pub fn diagnostics(&self) -> Vec<ViewerDiagnostic> {
        self.diagnostics.borrow().clone()
    }
}

pub struct ViewerHarness {
    runtime: Runtime,
    viewer: ImageViewer,
    pager: Rc<RecordingPager>,
    robot: TouchRobot,
    log: Rc<CallbackLog>,
}

impl ViewerHarness {
    pub fn new(images: Vec<ImageSource>, viewport: Viewport) -> Self {
        Self::with_props(images, viewport, |props| props)
    }

    /// Builds a presented viewer. `configure` may adjust the props but
    /// should keep the recording callbacks in place.
    pub fn with_props(
        images: Vec<ImageSource>,
        viewport: Viewport,
        configure: impl FnOnce(ViewerProps) -> ViewerProps,
    ) -> Self {
        let runtime = Runtime::new();
        let log = Rc::new(CallbackLog::default());
        let props = {
            let closes = log.clone();
            let indices = log.clone();
            let long_presses = log.clone();
            let diagnostics = log.clone();
            ViewerProps::new(images, move || {
                closes.close_requests.set(closes.close_requests.get() + 1)
            })
            .on_image_index_change(move |index| indices.indices.borrow_mut().push(index))
            .on_long_press(move |source| long_presses.long_presses.borrow_mut().push(source.clone()))
            .on_diagnostic(move |diagnostic| {
                diagnostics.diagnostics.borrow_mut().push(diagnostic.clone())
            })
        };

        let viewer = ImageViewer::new(configure(props), viewport, runtime.handle());
        let pager = Rc::new(RecordingPager::new());
        viewer.attach_pager(pager.clone());
        viewer.on_presented();

        Self {
            runtime,
            viewer,
            pager,
            robot: TouchRobot::new(),
            log,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn viewer(&self) -> &ImageViewer {
        &self.viewer
    }

    pub fn pager(&self) -> &RecordingPager {
        &self.pager
    }

    pub fn log(&self) -> &CallbackLog {
        &self.log
    }

    pub fn robot(&mut self) -> &mut TouchRobot {
        &mut self.robot
    }

    pub fn now(&self) -> u64 {
        self.runtime.now_millis()
    }

    pub fn center(&self) -> Point {
        self.viewer.viewport().center()
    }

    pub fn current_page(&self) -> Option<ImagePage> {
        self.viewer.current_page()
    }

    pub fn current_transform(&self) -> Transform {
        self.current_page()
            .map(|page| page.current_transform())
            .unwrap_or(Transform::IDENTITY)
    }

    /// Delivers `events` in order, advancing the runtime to each event's uptime.
    pub fn dispatch(&mut self, events: Vec<TouchEvent>) {
        for event in events {
            if event.uptime > self.runtime.now_millis() {
                self.runtime.advance_to(event.uptime);
            }
            self.viewer.on_touch(&event);
        }
        self.robot.sync_to(self.runtime.now_millis());
    }

    pub fn tap(&mut self, at: Point) {
        let events = self.robot.tap(at);
        self.dispatch(events);
    }

    pub fn double_tap(&mut self, at: Point) {
        let events = self.robot.double_tap(at, 100);
        self.dispatch(events);
    }

    pub fn long_press(&mut self, at: Point, hold_millis: u64) {
        let events = self.robot.press(at, hold_millis);
        self.dispatch(events);
    }

    pub fn drag(&mut self, from: Point, to: Point, steps: usize) {
        let events = self.robot.drag(from, to, steps);
        self.dispatch(events);
    }

    pub fn pinch(&mut self, from_distance: f32, to_distance: f32) {
        let events = self.robot.pinch(self.center(), from_distance, to_distance, 4);
        self.dispatch(events);
    }

    /// Lets `millis` pass in frame steps.
    pub fn advance(&mut self, millis: u64) {
        self.runtime.advance_by(millis);
        self.robot.sync_to(self.runtime.now_millis());
    }

    /// Advances until no timer or frame is pending, or the limit is reached.
    ///
    /// Returns whether the runtime went idle.
    pub fn settle(&mut self) -> bool {
        let limit = self.runtime.now_millis() + SETTLE_LIMIT_MILLIS;
        while !self.runtime.is_idle() && self.runtime.now_millis() < limit {
            self.runtime.advance_by(glance_runtime::FRAME_INTERVAL_MILLIS);
        }
        self.robot.sync_to(self.runtime.now_millis());
        let idle = self.runtime.is_idle();
        if !idle {
            log::warn!("harness did not settle within {SETTLE_LIMIT_MILLIS} ms");
        }
        idle
    }

    pub fn rotate(&mut self, viewport: Viewport) {
        self.viewer.on_viewport_change(viewport);
    }
}
