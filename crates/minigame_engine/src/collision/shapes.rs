//! Collision shape value types and rectangle utilities

use crate::foundation::math::{Point2, Vec2};

/// An axis-aligned rectangle anchored at its top-left corner
///
/// Width and height are expected to be non-negative; the geometry
/// functions treat a zero-sized rectangle as a degenerate shape that
/// cannot overlap anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the top-left corner
    pub x: f32,
    /// Y coordinate of the top-left corner
    pub y: f32,
    /// Width of the rectangle (non-negative)
    pub width: f32,
    /// Height of the rectangle (non-negative)
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size centered on a point
    pub fn from_center(center: Point2, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// X coordinate of the right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns a copy expanded by `margin` on all four sides
    ///
    /// A negative margin shrinks the rectangle; the resulting width and
    /// height are clamped to a minimum of zero, never negative. The
    /// center point is preserved in either direction.
    pub fn expanded(&self, margin: f32) -> Self {
        let center = self.center();
        let width = (self.width + margin * 2.0).max(0.0);
        let height = (self.height + margin * 2.0).max(0.0);
        Self::from_center(center, width, height)
    }
}

/// A circle defined by its center point and radius
///
/// Radius is expected to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center of the circle
    pub center: Point2,
    /// Radius of the circle (non-negative)
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Point2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Result of a detailed overlap test
///
/// `overlap` and `normal` are only meaningful when `collided` is true:
/// `normal` is a unit vector pointing from the second shape toward the
/// first, and `overlap` is the penetration along that normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub collided: bool,
    /// Penetration vector along the separating normal
    pub overlap: Vec2,
    /// Unit separating normal, second shape toward first
    pub normal: Vec2,
}

impl CollisionResult {
    /// A non-colliding result with zeroed overlap and normal
    pub fn none() -> Self {
        Self {
            collided: false,
            overlap: Vec2::zeros(),
            normal: Vec2::zeros(),
        }
    }

    /// A colliding result along `normal` with the given penetration depth
    pub fn hit(normal: Vec2, depth: f32) -> Self {
        Self {
            collided: true,
            overlap: normal * depth,
            normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_center_round_trip() {
        let center = Point2::new(12.5, -3.0);
        let rect = Rect::from_center(center, 40.0, 16.0);
        let back = rect.center();
        assert_relative_eq!(back.x, center.x);
        assert_relative_eq!(back.y, center.y);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(rect.right(), 40.0);
        assert_relative_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn test_expand_then_shrink_is_identity() {
        let rect = Rect::new(5.0, 5.0, 20.0, 10.0);
        let round_trip = rect.expanded(3.0).expanded(-3.0);
        assert_relative_eq!(round_trip.x, rect.x);
        assert_relative_eq!(round_trip.y, rect.y);
        assert_relative_eq!(round_trip.width, rect.width);
        assert_relative_eq!(round_trip.height, rect.height);
    }

    #[test]
    fn test_expand_moves_all_sides() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let grown = rect.expanded(2.0);
        assert_relative_eq!(grown.x, -2.0);
        assert_relative_eq!(grown.y, -2.0);
        assert_relative_eq!(grown.width, 14.0);
        assert_relative_eq!(grown.height, 14.0);
    }

    #[test]
    fn test_shrink_clamps_to_zero_size() {
        let rect = Rect::new(0.0, 0.0, 4.0, 10.0);
        let shrunk = rect.expanded(-3.0);
        assert_relative_eq!(shrunk.width, 0.0);
        assert_relative_eq!(shrunk.height, 4.0);
        // Center survives the clamp
        let center = shrunk.center();
        assert_relative_eq!(center.x, 2.0);
        assert_relative_eq!(center.y, 5.0);
    }
}
