//! 2D collision geometry
//!
//! Pure, stateless overlap testing and resolution between rectangles,
//! circles, and points. Every function is deterministic with no side
//! effects; shapes are plain `Copy` values and are never mutated.
//!
//! Edge policy:
//! - Shape-vs-shape tests are *strict*: edges or boundaries that merely
//!   touch do not collide.
//! - Point containment is *inclusive*: a point on the boundary is inside.
//!
//! Detailed variants additionally compute a penetration vector and a unit
//! separating normal pointing from the second shape toward the first.

mod intersect;
mod shapes;

pub use shapes::{Circle, CollisionResult, Rect};
