//! Pure geometry for Glance
//!
//! Points, sizes and the image transform, plus the fit-to-viewport math that
//! every image page uses to centre its content.

mod fit;
mod geometry;

pub use fit::*;
pub use geometry::*;

pub mod prelude {
    pub use crate::fit::{display_box, fit_transform, translate_for_scale, FitTransform};
    pub use crate::geometry::{Point, Size, Transform, Viewport};
}
