//! Geometric value types shared by entities and pointer events.
//!
//! Coordinates are world units (pixels of the map background). Nothing in
//! here knows about `egui`; conversion to screen space lives in [`crate::ui`].

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// A 2-D point or offset.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn x(self) -> f32 {
        self.x
    }

    pub const fn y(self) -> f32 {
        self.y
    }

    /// Component-wise scale.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// Rectangle
// ---------------------------------------------------------------------------

/// Axis-aligned rectangle anchored at its top-left corner.
///
/// Width and height are never negative: [`Rectangle::new`] and
/// [`Rectangle::set_dimensions`] clamp them at zero.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rectangle {
    origin: Vector,
    width: f32,
    height: f32,
}

impl Rectangle {
    pub const fn new(origin: Vector, width: f32, height: f32) -> Self {
        Self {
            origin,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vector::new(x, y), width, height)
    }

    pub const fn x(&self) -> f32 {
        self.origin.x
    }

    pub const fn y(&self) -> f32 {
        self.origin.y
    }

    pub const fn width(&self) -> f32 {
        self.width
    }

    pub const fn height(&self) -> f32 {
        self.height
    }

    pub const fn position(&self) -> Vector {
        self.origin
    }

    pub fn center(&self) -> Vector {
        Vector::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    /// Replace the origin in place.
    pub fn set_position(&mut self, origin: impl Into<Vector>) {
        self.origin = origin.into();
    }

    /// Replace width and height in place, keeping the origin.
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.width = non_negative(width);
        self.height = non_negative(height);
    }

    /// Move the rectangle so its center lands on `point`.
    pub fn center_on(&mut self, point: Vector) {
        self.origin = Vector::new(point.x - self.width / 2.0, point.y - self.height / 2.0);
    }

    /// Half-open containment: `[x, x + width) × [y, y + height)`.
    pub fn contains_point(&self, point: Vector) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.height
    }
}

const fn non_negative(v: f32) -> f32 {
    if v < 0.0 { 0.0 } else { v }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
