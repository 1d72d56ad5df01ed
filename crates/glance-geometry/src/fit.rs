//! Fit-to-viewport math for image pages.
//!
//! All functions are pure. Unknown or degenerate image sizes never produce
//! NaN: they fall back to an identity fit or a viewport-derived placeholder.

use crate::geometry::{Point, Size, Viewport};

/// Images narrower than this aspect ratio (width / height) are laid out
/// height-first so the whole image stays visible.
pub const TALL_IMAGE_ASPECT: f32 = 0.7;

/// Share of the viewport height a tall image may occupy.
pub const TALL_IMAGE_HEIGHT_FRACTION: f32 = 0.95;

/// Placeholder box height (relative to the viewport) while the natural size is unknown.
pub const PLACEHOLDER_HEIGHT_FRACTION: f32 = 0.8;

/// Result of fitting an image inside a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    pub translate: Point,
    pub scale: f32,
}

impl FitTransform {
    pub const IDENTITY: FitTransform = FitTransform {
        translate: Point::ZERO,
        scale: 1.0,
    };
}

/// Scale that fits `image` entirely inside `viewport`, and the translate that centres it.
///
/// Returns [`FitTransform::IDENTITY`] when the image size is unknown or zero.
pub fn fit_transform(image: Option<Size>, viewport: Viewport) -> FitTransform {
    let Some(image) = image.filter(Size::is_positive) else {
        return FitTransform::IDENTITY;
    };

    let scale = (viewport.width / image.width).min(viewport.height / image.height);
    if !scale.is_finite() {
        return FitTransform::IDENTITY;
    }

    let translate = Point::new(
        (viewport.width - image.width * scale) / 2.0,
        (viewport.height - image.height * scale) / 2.0,
    );
    FitTransform { translate, scale }
}

/// Centering translate for `image` inside `viewport` (the translate half of [`fit_transform`]).
pub fn image_translate(image: Size, viewport: Viewport) -> Point {
    fit_transform(Some(image), viewport).translate
}

/// Displayed image size implied by a centering translate.
pub fn image_size_by_translate(translate: Point, viewport: Viewport) -> Size {
    Size::new(
        viewport.width - translate.x * 2.0,
        viewport.height - translate.y * 2.0,
    )
}

/// Centering translate after resizing the displayed image by `target_scale`.
///
/// Recovers the displayed size from `current_translate`, scales it and
/// re-centres the result in the viewport.
pub fn translate_for_scale(current_translate: Point, target_scale: f32, viewport: Viewport) -> Point {
    let displayed = image_size_by_translate(current_translate, viewport);
    let target = Size::new(displayed.width * target_scale, displayed.height * target_scale);
    image_translate(target, viewport)
}

/// Euclidean distance, or 0 when either point is absent (a lifted finger).
pub fn distance_between_points(a: Option<Point>, b: Option<Point>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).length(),
        _ => 0.0,
    }
}

pub fn midpoint(a: Option<Point>, b: Option<Point>) -> Option<Point> {
    let (a, b) = (a?, b?);
    Some(Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0))
}

/// Laid-out box of an image page before any zoom is applied.
///
/// Regular images span the viewport width. Tall images are fitted by
/// height against [`TALL_IMAGE_HEIGHT_FRACTION`] of the viewport. An unknown
/// size yields a placeholder box so layout never collapses to zero.
pub fn display_box(image: Option<Size>, viewport: Viewport) -> Size {
    let Some(aspect) = image.and_then(|size| size.aspect_ratio()) else {
        return Size::new(
            viewport.width,
            viewport.height * PLACEHOLDER_HEIGHT_FRACTION,
        );
    };

    if aspect < TALL_IMAGE_ASPECT {
        let height = (viewport.height * TALL_IMAGE_HEIGHT_FRACTION).min(viewport.width / aspect);
        Size::new(height * aspect, height)
    } else {
        Size::new(viewport.width, viewport.width / aspect)
    }
}

#[cfg(test)]
#[path = "tests/fit_tests.rs"]
mod tests;
