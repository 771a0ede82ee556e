//! Geometric primitives: Point, Size, Rect

use std::fmt;

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

    /// Largest representable extent. Anything at or above it is treated as
    /// unbounded.
    pub const UNBOUNDED_EXTENT: f32 = f32::MAX;

    /// True when both dimensions are finite and strictly below
    /// [`Size::UNBOUNDED_EXTENT`].
    pub fn is_bounded(&self) -> bool {
        is_bounded_extent(self.width) && is_bounded_extent(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn is_bounded_extent(value: f32) -> bool {
    value.is_finite() && value < Size::UNBOUNDED_EXTENT
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::from_origin_size(Point::ZERO, size)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.width && y <= self.y + self.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_sizes_are_bounded() {
        assert!(Size::new(320.0, 480.0).is_bounded());
        assert!(Size::ZERO.is_bounded());
    }

    #[test]
    fn unbounded_sizes_are_rejected() {
        assert!(!Size::new(f32::INFINITY, 10.0).is_bounded());
        assert!(!Size::new(10.0, f32::NAN).is_bounded());
        assert!(!Size::new(f32::MAX, 10.0).is_bounded());
        assert!(!Size::new(10.0, f32::NEG_INFINITY).is_bounded());
    }

    #[test]
    fn rect_from_size_sits_at_origin() {
        let rect = Rect::from_size(Size::new(40.0, 20.0));
        assert_eq!(rect.origin(), Point::ZERO);
        assert_eq!(rect.size(), Size::new(40.0, 20.0));
        assert!(rect.contains(40.0, 20.0));
        assert!(!rect.translate(1.0, 0.0).contains(0.5, 0.0));
    }
}
