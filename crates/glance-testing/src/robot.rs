//! Scripted touch input.
//!
//! A [`TouchRobot`] keeps its own uptime clock and turns high-level
//! interactions (taps, drags, pinches) into the raw [`TouchEvent`]
//! sequences a host would deliver. Events are returned, not dispatched, so
//! the same script can drive an interpreter, a page or a whole viewer.
//!
//! # Example
//!
//! ```
//! use glance_geometry::Point;
//! use glance_testing::TouchRobot;
//!
//! let mut robot = TouchRobot::new();
//! let events = robot.tap(Point::new(100.0, 100.0));
//! assert_eq!(events.len(), 2);
//! assert_eq!(robot.now(), 40);
//! ```

use glance_geometry::Point;
use glance_gestures::{TouchEvent, TouchId, TouchPhase, TouchPoint};

/// Time between a press and its release in a tap.
pub const TAP_HOLD_MILLIS: u64 = 40;

/// Interval between generated move events.
pub const MOVE_INTERVAL_MILLIS: u64 = 10;

/// Generates touch sequences on a monotonic uptime clock.
#[derive(Debug, Clone)]
pub struct TouchRobot {
    uptime: u64,
    next_id: TouchId,
}

impl Default for TouchRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchRobot {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(uptime: u64) -> Self {
        Self { uptime, next_id: 1 }
    }

    pub fn now(&self) -> u64 {
        self.uptime
    }

    /// Lets time pass without input.
    pub fn wait(&mut self, millis: u64) {
        self.uptime += millis;
    }

    /// Moves the clock forward to `uptime` if it is ahead.
    pub fn sync_to(&mut self, uptime: u64) {
        self.uptime = self.uptime.max(uptime);
    }

    fn fresh_id(&mut self) -> TouchId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn event(&self, phase: TouchPhase, changed: TouchPoint, touches: &[TouchPoint]) -> TouchEvent {
        TouchEvent::new(phase, self.uptime, changed, touches.iter().copied())
    }

    pub fn tap(&mut self, at: Point) -> Vec<TouchEvent> {
        self.press(at, TAP_HOLD_MILLIS)
    }

    /// Two taps at `at`, `gap_millis` apart from release to release.
    pub fn double_tap(&mut self, at: Point, gap_millis: u64) -> Vec<TouchEvent> {
        let mut events = self.tap(at);
        self.wait(gap_millis.saturating_sub(TAP_HOLD_MILLIS));
        events.extend(self.tap(at));
        events
    }

    /// Single finger held still at `at` for `hold_millis`.
    pub fn press(&mut self, at: Point, hold_millis: u64) -> Vec<TouchEvent> {
        let finger = TouchPoint::new(self.fresh_id(), at);
        let down = self.event(TouchPhase::Down, finger, &[finger]);
        self.wait(hold_millis);
        let up = self.event(TouchPhase::Up, finger, &[]);
        vec![down, up]
    }

    /// Straight single-finger drag over `steps` moves, then release.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) -> Vec<TouchEvent> {
        let mut events = self.drag_without_release(from, to, steps);
        if let Some(last) = events.last().map(|event| event.changed) {
            events.push(self.event(TouchPhase::Up, last, &[]));
        }
        events
    }

    /// Like [`drag`](Self::drag), but the host cancels instead of a release.
    pub fn drag_then_cancel(&mut self, from: Point, to: Point, steps: usize) -> Vec<TouchEvent> {
        let mut events = self.drag_without_release(from, to, steps);
        if let Some(last) = events.last().map(|event| event.changed) {
            events.push(self.event(TouchPhase::Cancel, last, &[]));
        }
        events
    }

    fn drag_without_release(&mut self, from: Point, to: Point, steps: usize) -> Vec<TouchEvent> {
        let id = self.fresh_id();
        let start = TouchPoint::new(id, from);
        let mut events = vec![self.event(TouchPhase::Down, start, &[start])];
        let steps = steps.max(1);
        for step in 1..=steps {
            self.wait(MOVE_INTERVAL_MILLIS);
            let fraction = step as f32 / steps as f32;
            let point = TouchPoint::new(id, from + (to - from) * fraction);
            events.push(self.event(TouchPhase::Move, point, &[point]));
        }
        self.wait(MOVE_INTERVAL_MILLIS);
        events
    }

    /// Two fingers placed horizontally around `center`, spread from
    /// `from_distance` to `to_distance` and then lifted one after the other.
    pub fn pinch(
        &mut self,
        center: Point,
        from_distance: f32,
        to_distance: f32,
        steps: usize,
    ) -> Vec<TouchEvent> {
        let first = self.fresh_id();
        let second = self.fresh_id();
        let pair = |distance: f32| {
            [
                TouchPoint::new(first, Point::new(center.x - distance / 2.0, center.y)),
                TouchPoint::new(second, Point::new(center.x + distance / 2.0, center.y)),
            ]
        };

        let [a, b] = pair(from_distance);
        let mut events = vec![self.event(TouchPhase::Down, a, &[a])];
        self.wait(1);
        events.push(self.event(TouchPhase::Down, b, &[a, b]));

        let steps = steps.max(1);
        let mut last = [a, b];
        for step in 1..=steps {
            self.wait(MOVE_INTERVAL_MILLIS);
            let fraction = step as f32 / steps as f32;
            last = pair(from_distance + (to_distance - from_distance) * fraction);
            events.push(self.event(TouchPhase::Move, last[1], &last));
        }

        let [a, b] = last;
        self.wait(MOVE_INTERVAL_MILLIS);
        events.push(self.event(TouchPhase::Up, b, &[a]));
        self.wait(1);
        events.push(self.event(TouchPhase::Up, a, &[]));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_tap_spaces_releases_by_gap() {
        let mut robot = TouchRobot::new();
        let events = robot.double_tap(Point::new(10.0, 10.0), 100);
        let releases: Vec<u64> = events
            .iter()
            .filter(|event| event.phase == TouchPhase::Up)
            .map(|event| event.uptime)
            .collect();
        assert_eq!(releases, vec![40, 140]);
    }

    #[test]
    fn pinch_ends_with_all_fingers_lifted() {
        let mut robot = TouchRobot::new();
        let events = robot.pinch(Point::new(200.0, 400.0), 100.0, 200.0, 4);
        let last = events.last().expect("events");
        assert_eq!(last.phase, TouchPhase::Up);
        assert_eq!(last.active_touch_count(), 0);
        assert_eq!(
            events.iter().filter(|event| event.active_touch_count() == 2).count(),
            5
        );
    }

    #[test]
    fn drag_reaches_target() {
        let mut robot = TouchRobot::starting_at(1_000);
        let events = robot.drag(Point::new(0.0, 0.0), Point::new(0.0, 100.0), 5);
        let moves: Vec<&TouchEvent> = events
            .iter()
            .filter(|event| event.phase == TouchPhase::Move)
            .collect();
        assert_eq!(moves.len(), 5);
        assert_eq!(moves[4].changed.position, Some(Point::new(0.0, 100.0)));
        assert_eq!(robot.now(), 1_060);
    }
}
