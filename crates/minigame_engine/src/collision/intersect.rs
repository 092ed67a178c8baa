//! Overlap tests between the collision shape types
//!
//! Boolean tests answer "do these overlap"; detailed variants also
//! compute the penetration vector and separating normal used by game
//! modes to resolve the contact (push a truck off a wall, bounce a ball).

use crate::foundation::math::{Point2, Vec2};

use super::shapes::{Circle, CollisionResult, Rect};

impl Rect {
    /// Test whether two rectangles overlap
    ///
    /// Strict on both axes: rectangles whose edges merely touch
    /// (`a.right() == b.x`) do not collide. Symmetric in its arguments.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Detailed rectangle-rectangle overlap test
    ///
    /// Computes the penetration depth per axis, picks the axis with the
    /// smaller penetration as the separating axis (ties go to the
    /// horizontal axis), and returns a unit normal along that axis
    /// pointing from `other` toward `self`.
    pub fn intersect_detailed(&self, other: &Rect) -> CollisionResult {
        if !self.intersects(other) {
            return CollisionResult::none();
        }

        let pen_x = self.right().min(other.right()) - self.x.max(other.x);
        let pen_y = self.bottom().min(other.bottom()) - self.y.max(other.y);

        let self_center = self.center();
        let other_center = other.center();

        if pen_x <= pen_y {
            let sign = if self_center.x < other_center.x { -1.0 } else { 1.0 };
            CollisionResult::hit(Vec2::new(sign, 0.0), pen_x)
        } else {
            let sign = if self_center.y < other_center.y { -1.0 } else { 1.0 };
            CollisionResult::hit(Vec2::new(0.0, sign), pen_y)
        }
    }

    /// Test whether a point lies inside the rectangle
    ///
    /// Inclusive of all four edges.
    pub fn contains_point(&self, point: Point2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

impl Circle {
    /// Test whether two circles overlap
    ///
    /// Strict: exact tangency (center distance equal to the sum of the
    /// radii) does not collide. Symmetric in its arguments.
    pub fn intersects(&self, other: &Circle) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }

    /// Detailed circle-circle overlap test
    ///
    /// The normal points from `other`'s center toward `self`'s center.
    /// When the centers coincide exactly the direction is undefined, so a
    /// fixed default unit vector along +X is substituted.
    pub fn intersect_detailed(&self, other: &Circle) -> CollisionResult {
        let offset = self.center - other.center;
        let distance = offset.magnitude();
        let radius_sum = self.radius + other.radius;

        if distance >= radius_sum {
            return CollisionResult::none();
        }

        let normal = if distance > 0.0 {
            offset / distance
        } else {
            Vec2::new(1.0, 0.0)
        };

        CollisionResult::hit(normal, radius_sum - distance)
    }

    /// Test whether this circle overlaps a rectangle
    ///
    /// The circle's center is clamped to the nearest point on the
    /// rectangle; they collide iff that point is strictly closer than the
    /// radius, or the center already lies inside the rectangle (a fully
    /// contained circle counts as colliding).
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        if rect.contains_point(self.center) {
            return true;
        }
        let clamped = clamp_to_rect(self.center, rect);
        (self.center - clamped).magnitude_squared() < self.radius * self.radius
    }

    /// Detailed circle-rectangle overlap test
    ///
    /// The normal points from the rectangle surface toward the circle's
    /// center. When the center is inside the rectangle, the axis of least
    /// penetration to the nearest face is used and the overlap pushes the
    /// whole circle clear of that face.
    pub fn intersect_rect_detailed(&self, rect: &Rect) -> CollisionResult {
        let inside = rect.contains_point(self.center);
        let clamped = clamp_to_rect(self.center, rect);
        let offset = self.center - clamped;
        let distance = offset.magnitude();

        if !inside && distance >= self.radius {
            return CollisionResult::none();
        }

        if !inside {
            // Outside the closed rect the clamped point is always distinct
            return CollisionResult::hit(offset / distance, self.radius - distance);
        }

        // Center inside: resolve along the nearest face
        let left = self.center.x - rect.x;
        let right = rect.right() - self.center.x;
        let top = self.center.y - rect.y;
        let bottom = rect.bottom() - self.center.y;

        let pen_x = left.min(right);
        let pen_y = top.min(bottom);

        if pen_x <= pen_y {
            let sign = if left <= right { -1.0 } else { 1.0 };
            CollisionResult::hit(Vec2::new(sign, 0.0), pen_x + self.radius)
        } else {
            let sign = if top <= bottom { -1.0 } else { 1.0 };
            CollisionResult::hit(Vec2::new(0.0, sign), pen_y + self.radius)
        }
    }

    /// Test whether a point lies inside the circle
    ///
    /// Inclusive of the boundary (distance equal to the radius is inside).
    pub fn contains_point(&self, point: Point2) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }
}

/// Clamp a point to the closed extent of a rectangle
fn clamp_to_rect(point: Point2, rect: &Rect) -> Point2 {
    Point2::new(
        point.x.clamp(rect.x, rect.right()),
        point.y.clamp(rect.y, rect.bottom()),
    )
}
