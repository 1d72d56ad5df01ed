use glance_geometry::{Point, Transform};

use crate::GestureConfig;

/// Baseline captured when a second finger lands.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PinchAnchor {
    start: Transform,
    initial_distance: f32,
    /// Midpoint relative to the surface centre.
    initial_midpoint: Point,
}

impl PinchAnchor {
    pub(crate) fn new(start: Transform, initial_distance: f32, initial_midpoint: Point) -> Self {
        Self {
            start,
            initial_distance,
            initial_midpoint,
        }
    }

    /// Transform for the current finger spread.
    ///
    /// The scale follows the distance ratio and is clamped. The content that
    /// sat under the initial midpoint is kept under the current one.
    pub(crate) fn transform_for(
        &self,
        distance: f32,
        midpoint: Point,
        config: &GestureConfig,
    ) -> Option<Transform> {
        let ratio = distance / self.initial_distance;
        let scale = config.clamp_scale(self.start.scale * ratio);
        let translate = self.start.translate + midpoint / scale
            - self.initial_midpoint / self.start.scale;
        let transform = Transform::new(scale, translate);
        transform.is_finite().then_some(transform)
    }
}
