use glance_geometry::{Point, Transform};

/// Tracks whether a press has moved beyond the touch slop.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SlopDetector {
    origin: Point,
    slop: f32,
    exceeded: bool,
}

impl SlopDetector {
    pub(crate) fn new(origin: Point, slop: f32) -> Self {
        Self {
            origin,
            slop,
            exceeded: false,
        }
    }

    pub(crate) fn origin(&self) -> Point {
        self.origin
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.exceeded
    }

    pub(crate) fn mark_exceeded(&mut self) {
        self.exceeded = true;
    }

    /// Returns true only for the move that first crosses the slop.
    pub(crate) fn update(&mut self, position: Point) -> bool {
        if self.exceeded {
            return false;
        }
        if (position - self.origin).length() > self.slop {
            self.exceeded = true;
            return true;
        }
        false
    }
}

/// Moves the content with the finger. Screen deltas shrink by the scale.
pub(crate) fn pan_by(transform: Transform, screen_delta: Point) -> Transform {
    if transform.scale <= 0.0 {
        return transform;
    }
    Transform::new(
        transform.scale,
        transform.translate + screen_delta / transform.scale,
    )
}
