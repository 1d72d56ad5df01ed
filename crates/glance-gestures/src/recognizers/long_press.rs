use glance_geometry::Point;

/// Pending long-press for the current single-finger press.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LongPressTimer {
    armed: Option<(u64, Point)>,
}

impl LongPressTimer {
    pub(crate) fn arm(&mut self, pressed_at: u64, delay_millis: u64, position: Point) {
        self.armed = Some((pressed_at.saturating_add(delay_millis), position));
    }

    pub(crate) fn cancel(&mut self) {
        self.armed = None;
    }

    pub(crate) fn deadline(&self) -> Option<u64> {
        self.armed.map(|(deadline, _)| deadline)
    }

    /// Disarms and returns the press position once `now` reaches the deadline.
    pub(crate) fn fire_due(&mut self, now: u64) -> Option<Point> {
        match self.armed {
            Some((deadline, position)) if now >= deadline => {
                self.armed = None;
                Some(position)
            }
            _ => None,
        }
    }
}
