use glance_geometry::{distance_between_points, midpoint, Point};
use smallvec::SmallVec;

use crate::GestureError;

pub type TouchId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    /// The host revoked the gesture (e.g. a parent scroller took over).
    Cancel,
}

/// One finger in contact with the page surface.
///
/// Positions are in page-surface coordinates with the origin at the top-left.
/// Hosts sometimes deliver touches without coordinates; those are `None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: TouchId,
    pub position: Option<Point>,
}

impl TouchPoint {
    pub fn new(id: TouchId, position: Point) -> Self {
        Self {
            id,
            position: Some(position),
        }
    }

    pub fn without_position(id: TouchId) -> Self {
        Self { id, position: None }
    }
}

/// A touch change delivered by the host.
///
/// `touches` lists the fingers still in contact after the change: for
/// [`TouchPhase::Up`] the lifted finger is already gone and is reported
/// separately in `changed`.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Event time in runtime milliseconds.
    pub uptime: u64,
    pub changed: TouchPoint,
    pub touches: SmallVec<[TouchPoint; 2]>,
}

impl TouchEvent {
    pub fn new(
        phase: TouchPhase,
        uptime: u64,
        changed: TouchPoint,
        touches: impl IntoIterator<Item = TouchPoint>,
    ) -> Self {
        Self {
            phase,
            uptime,
            changed,
            touches: touches.into_iter().collect(),
        }
    }

    pub fn active_touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Position of the changed touch.
    pub fn position(&self) -> Result<Point, GestureError> {
        self.changed
            .position
            .ok_or(GestureError::MissingCoordinates)
    }

    /// Position of the first touch still down, for single-finger tracking.
    pub fn primary_position(&self) -> Result<Point, GestureError> {
        let touch = self.touches.first().ok_or(GestureError::TooFewTouches {
            expected: 1,
            actual: 0,
        })?;
        touch.position.ok_or(GestureError::MissingCoordinates)
    }

    /// Distance and midpoint of the first two touches.
    pub fn pinch_geometry(&self) -> Result<(f32, Point), GestureError> {
        let [a, b] = match self.touches.as_slice() {
            [a, b, ..] => [a, b],
            other => {
                return Err(GestureError::TooFewTouches {
                    expected: 2,
                    actual: other.len(),
                })
            }
        };
        let center =
            midpoint(a.position, b.position).ok_or(GestureError::MissingCoordinates)?;
        let distance = distance_between_points(a.position, b.position);
        if !distance.is_finite() || distance <= f32::EPSILON {
            return Err(GestureError::DegenerateDistance);
        }
        Ok((distance, center))
    }
}
