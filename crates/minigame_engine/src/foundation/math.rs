//! Math utilities and types
//!
//! Provides the fundamental 2D math types used by the collision library
//! and the mini-game scenes built on top of it.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;
