use glance_geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum TapOutcome {
    /// Waiting to see whether a second tap follows. A previous tap too far
    /// away to pair with is returned for confirmation as a single tap.
    Pending { superseded: Option<Point> },
    Double(Point),
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    released_at: u64,
}

/// Pairs taps into double taps and confirms lone taps after the delay.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TapTracker {
    delay_millis: u64,
    radius: f32,
    pending: Option<PendingTap>,
}

impl TapTracker {
    pub(crate) fn new(delay_millis: u64, radius: f32) -> Self {
        Self {
            delay_millis,
            radius,
            pending: None,
        }
    }

    pub(crate) fn on_tap(&mut self, position: Point, released_at: u64) -> TapOutcome {
        let mut superseded = None;
        if let Some(pending) = self.pending.take() {
            let within_delay = released_at.saturating_sub(pending.released_at) < self.delay_millis;
            let within_radius = (position.x - pending.position.x).abs() <= self.radius
                && (position.y - pending.position.y).abs() <= self.radius;
            if within_delay && within_radius {
                return TapOutcome::Double(position);
            }
            superseded = Some(pending.position);
        }
        self.pending = Some(PendingTap {
            position,
            released_at,
        });
        TapOutcome::Pending { superseded }
    }

    pub(crate) fn deadline(&self) -> Option<u64> {
        self.pending
            .map(|pending| pending.released_at.saturating_add(self.delay_millis))
    }

    /// Confirms the pending tap as a single tap once its window has closed.
    pub(crate) fn fire_due(&mut self, now: u64) -> Option<Point> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.pending.take().map(|pending| pending.position)
    }

    pub(crate) fn clear(&mut self) {
        self.pending = None;
    }
}
