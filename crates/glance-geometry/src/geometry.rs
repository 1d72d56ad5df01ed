//! Geometric primitives: Point, Size, Transform

use std::ops::{Add, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;

    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    /// True when both dimensions are strictly positive and finite.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Width over height, or `None` for degenerate sizes.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.is_positive().then(|| self.width / self.height)
    }
}

/// Logical size of the surface hosting the viewer. Supplied by the host.
pub type Viewport = Size;

/// Render transform of one image page.
///
/// The scale is applied around the centre of the page surface and the
/// translation is expressed in unscaled content units, so a point `p`
/// (relative to the surface centre) lands on screen at `scale * (p + translate)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub translate: Point,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate: Point::ZERO,
    };

    pub const fn new(scale: f32, translate: Point) -> Self {
        Self { scale, translate }
    }

    pub fn translate_x(&self) -> f32 {
        self.translate.x
    }

    pub fn translate_y(&self) -> f32 {
        self.translate.y
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.translate.is_finite()
    }

    /// Screen position (relative to the surface centre) of a content point.
    pub fn map_point(&self, content: Point) -> Point {
        (content + self.translate) * self.scale
    }

    /// Content point currently displayed at `screen` (relative to the surface centre).
    pub fn unmap_point(&self, screen: Point) -> Point {
        if self.scale == 0.0 {
            return screen;
        }
        screen / self.scale - self.translate
    }

    /// Linear interpolation between two transforms.
    pub fn lerp(&self, target: &Transform, fraction: f32) -> Transform {
        Transform {
            scale: self.scale + (target.scale - self.scale) * fraction,
            translate: self.translate + (target.translate - self.translate) * fraction,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
