//! # Mini-game Engine
//!
//! The client-side substrate shared by a family of educational mini-games
//! (driving, racing, learning games, dress-up). It provides the three pieces
//! every game mode is built on:
//!
//! - **Collision geometry**: pure 2D overlap tests and resolution between
//!   rectangles, circles, and points
//! - **Scene direction**: named, independently-lifecycled game modes with
//!   exactly one active at a time and serialized transitions
//! - **Frame scheduling**: a host-driven per-frame loop computing clamped
//!   delta time and forwarding update/render to its payload
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minigame_engine::prelude::*;
//!
//! struct TitleScene;
//!
//! impl Scene<(), (), ()> for TitleScene {
//!     fn id(&self) -> &str {
//!         "title"
//!     }
//!
//!     fn init(&mut self, _config: Option<&()>) -> Result<InitPoll, SceneError> {
//!         Ok(InitPoll::Ready)
//!     }
//!
//!     fn update(&mut self, _delta: f32, _input: &()) {}
//!
//!     fn render(&mut self, _surface: &mut ()) {}
//!
//!     fn cleanup(&mut self) {}
//! }
//!
//! fn main() -> Result<(), DirectorError> {
//!     let mut director = SceneDirector::new();
//!     director.register_scene(TitleScene);
//!     director.switch_to("title", None)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod foundation;
pub mod frame;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        collision::{CollisionResult, Circle, Rect},
        config::{ConfigError, EngineConfig, SchedulerConfig},
        foundation::math::{Point2, Vec2},
        frame::{
            FrameError, FrameHost, FramePayload, FrameRequestId, FrameScheduler,
            SchedulerError, SchedulerOptions,
        },
        scene::{
            DirectorError, InitPoll, PauseHooks, Scene, SceneDirector, SceneError,
            SceneFactory, SceneRegistration,
        },
    };
}
