//! Scene system
//!
//! Scenes are self-contained game modes/screens (a driving course, a
//! racing track, a letter-matching game) with their own lifecycle:
//! initialize, update/render while active, cleanup on deactivation.
//! The [`SceneDirector`] owns the registry of scenes and guarantees that
//! exactly one is active at any instant, serializing transitions.
//!
//! The core never inspects scene configuration, input snapshots, or the
//! rendering surface; they flow through as opaque type parameters.

mod director;

pub use director::{DirectorError, SceneDirector, SceneFactory, SceneRegistration};

use thiserror::Error;

/// Errors produced by scene implementations during initialization
#[derive(Error, Debug)]
pub enum SceneError {
    /// Required content could not be loaded
    #[error("content load failed: {0}")]
    ContentLoad(String),

    /// Scene-specific initialization failure
    #[error("{0}")]
    Custom(String),
}

/// Progress of a scene's initializer
///
/// Initialization is cooperative: a scene that needs multi-tick work
/// (content loading, table generation) reports [`InitPoll::Pending`] and
/// is polled once per director update until it settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPoll {
    /// Initialization has completed; the scene may be activated
    Ready,
    /// Initialization needs more ticks
    Pending,
}

/// Optional pause/resume capability for scenes
///
/// Modeled as an explicit, checkable capability rather than
/// always-present-but-possibly-empty methods: the director asks for the
/// capability via [`Scene::pause_hooks`] and only invokes it when the
/// scene provides one.
pub trait PauseHooks {
    /// The hosting loop paused; freeze timers, duck audio, etc.
    fn on_pause(&mut self);

    /// The hosting loop resumed
    fn on_resume(&mut self);
}

/// Lifecycle contract implemented by every game mode
///
/// Generic over the opaque collaborator types: `C` is the activation
/// configuration, `I` the per-tick input snapshot, `S` the rendering
/// surface handle.
///
/// The director guarantees `update`/`render` are never invoked before
/// initialization has settled [`InitPoll::Ready`], nor after `cleanup`
/// has run. One instance is created per registration and reused across
/// repeated activations until teardown, so `init` may run more than once
/// over an instance's life.
pub trait Scene<C, I, S> {
    /// Unique identifier of this scene
    fn id(&self) -> &str;

    /// Begin initialization with an optional activation configuration
    ///
    /// Return [`InitPoll::Ready`] when initialization completes
    /// immediately, or [`InitPoll::Pending`] to be polled across
    /// subsequent ticks via [`Scene::poll_init`].
    fn init(&mut self, config: Option<&C>) -> Result<InitPoll, SceneError>;

    /// Advance a pending initialization by one step
    ///
    /// Only called after `init` returned [`InitPoll::Pending`]. The
    /// default implementation settles immediately, so synchronous scenes
    /// never override it.
    fn poll_init(&mut self) -> Result<InitPoll, SceneError> {
        Ok(InitPoll::Ready)
    }

    /// Advance the scene by `delta` seconds with the current input snapshot
    fn update(&mut self, delta: f32, input: &I);

    /// Draw the scene to the surface; must not mutate simulation state
    fn render(&mut self, surface: &mut S);

    /// Release per-activation resources; the instance itself is retained
    fn cleanup(&mut self);

    /// Pause/resume capability, if this scene supports it
    fn pause_hooks(&mut self) -> Option<&mut dyn PauseHooks> {
        None
    }
}
