//! Scene director - registry and transition state machine
//!
//! The director is the single owner of the scene registry and the
//! active-scene reference. Transitions are serialized: at most one
//! initializer is ever in flight, and a switch request arriving while a
//! transition is pending supersedes any earlier queued request (last
//! write wins, not FIFO).

use std::collections::HashMap;

use log::{debug, error, warn};
use thiserror::Error;

use super::{InitPoll, Scene, SceneError};

/// Lazily-invoked producer of a scene instance
///
/// Invoked at most once, the first time its id is activated or
/// preloaded; the resulting instance is cached for reuse.
pub type SceneFactory<C, I, S> = Box<dyn FnOnce() -> Box<dyn Scene<C, I, S>>>;

/// Errors reported by [`SceneDirector`] operations
#[derive(Error, Debug)]
pub enum DirectorError {
    /// The requested id has no registration
    #[error("scene '{0}' is not registered")]
    SceneNotFound(String),

    /// The target scene's initializer failed; the director settled Idle
    #[error("scene initialization failed: {0}")]
    SceneInitFailed(#[from] SceneError),
}

/// A scene registration: an id bound to an instance or a factory,
/// plus optional preload hints for the collaborator asset layer
pub struct SceneRegistration<C: 'static, I: 'static, S: 'static> {
    id: String,
    instance: Option<Box<dyn Scene<C, I, S>>>,
    factory: Option<SceneFactory<C, I, S>>,
    preload_hints: Vec<String>,
}

impl<C: 'static, I: 'static, S: 'static> SceneRegistration<C, I, S> {
    /// Register an eagerly-constructed scene under its own id
    pub fn from_instance(scene: impl Scene<C, I, S> + 'static) -> Self {
        Self {
            id: scene.id().to_owned(),
            instance: Some(Box::new(scene)),
            factory: None,
            preload_hints: Vec::new(),
        }
    }

    /// Register a lazily-constructed scene under an explicit id
    pub fn from_factory(
        id: impl Into<String>,
        factory: impl FnOnce() -> Box<dyn Scene<C, I, S>> + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            instance: None,
            factory: Some(Box::new(factory)),
            preload_hints: Vec::new(),
        }
    }

    /// Attach preload hints (opaque asset ids) to this registration
    #[must_use]
    pub fn with_preload_hints(mut self, hints: impl IntoIterator<Item = String>) -> Self {
        self.preload_hints = hints.into_iter().collect();
        self
    }

    /// The id this registration will be stored under
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Registry slot: cached instance, pending factory, preload hints
struct SceneEntry<C: 'static, I: 'static, S: 'static> {
    instance: Option<Box<dyn Scene<C, I, S>>>,
    factory: Option<SceneFactory<C, I, S>>,
    preload_hints: Vec<String>,
}

impl<C: 'static, I: 'static, S: 'static> SceneEntry<C, I, S> {
    /// Resolve the cached instance, invoking the factory on first use
    fn resolve(&mut self) -> &mut Box<dyn Scene<C, I, S>> {
        if self.instance.is_none() {
            // Registrations always carry an instance or a factory
            let factory = self
                .factory
                .take()
                .unwrap_or_else(|| unreachable!("registration with neither instance nor factory"));
            self.instance = Some(factory());
        }
        self.instance
            .as_mut()
            .unwrap_or_else(|| unreachable!("instance resolved above"))
    }
}

/// Director state machine
enum DirectorState {
    /// No active scene
    Idle,
    /// The named scene is active and receives update/render
    Active(String),
    /// A transition toward the named scene is in flight
    Transitioning(String),
}

/// Owns the scene registry and enforces exactly-one-active-scene
///
/// Generic over the opaque collaborator types `C` (activation config),
/// `I` (input snapshot), `S` (rendering surface); see [`Scene`].
///
/// Execution is single-threaded and cooperative: all mutation happens
/// serially between ticks, so the Transitioning state plus last-write-
/// wins coalescing stands in for a lock around the one asynchronous
/// operation, scene initialization.
pub struct SceneDirector<C: 'static, I: 'static, S: 'static> {
    scenes: HashMap<String, SceneEntry<C, I, S>>,
    state: DirectorState,
    /// Superseding switch request queued while a transition is in flight
    pending: Option<(String, Option<C>)>,
}

impl<C: 'static, I: 'static, S: 'static> SceneDirector<C, I, S> {
    /// Creates a new director with an empty registry, in the Idle state
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            state: DirectorState::Idle,
            pending: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Adds a registration, overwriting any prior one with the same id
    pub fn register(&mut self, registration: SceneRegistration<C, I, S>) {
        let entry = SceneEntry {
            instance: registration.instance,
            factory: registration.factory,
            preload_hints: registration.preload_hints,
        };
        if self.scenes.insert(registration.id.clone(), entry).is_some() {
            warn!(
                "scene '{}' was already registered and has been replaced",
                registration.id
            );
        }
    }

    /// Convenience: registers an eagerly-constructed scene under its own id
    pub fn register_scene(&mut self, scene: impl Scene<C, I, S> + 'static) {
        self.register(SceneRegistration::from_instance(scene));
    }

    /// Convenience: registers a lazily-constructed scene
    pub fn register_factory(
        &mut self,
        id: impl Into<String>,
        factory: impl FnOnce() -> Box<dyn Scene<C, I, S>> + 'static,
        preload_hints: impl IntoIterator<Item = String>,
    ) {
        self.register(
            SceneRegistration::from_factory(id, factory).with_preload_hints(preload_hints),
        );
    }

    //--- Transitions ------------------------------------------------------

    /// Requests a switch to the scene registered under `id`
    ///
    /// An unregistered id fails without touching the current state. While
    /// a transition is in flight the request is coalesced: it replaces
    /// any previously queued target and dispatches once the in-flight
    /// transition settles. Otherwise the current scene (if any) is
    /// cleaned up, the target is resolved and initialized, and on success
    /// it becomes active. A failed initializer settles the director Idle
    /// rather than reverting to the previous scene.
    pub fn switch_to(&mut self, id: &str, config: Option<C>) -> Result<(), DirectorError> {
        if !self.scenes.contains_key(id) {
            warn!("switch_to: scene '{id}' is not registered");
            return Err(DirectorError::SceneNotFound(id.to_owned()));
        }

        if let DirectorState::Transitioning(target) = &self.state {
            debug!("switch_to '{id}' queued, superseding any earlier request (transition to '{target}' in flight)");
            self.pending = Some((id.to_owned(), config));
            return Ok(());
        }

        self.start_transition(id, config)
    }

    /// Begins a transition: cleanup current, resolve target, run init
    fn start_transition(&mut self, id: &str, config: Option<C>) -> Result<(), DirectorError> {
        if !self.scenes.contains_key(id) {
            warn!("transition target '{id}' is not registered");
            return Err(DirectorError::SceneNotFound(id.to_owned()));
        }

        let previous = std::mem::replace(
            &mut self.state,
            DirectorState::Transitioning(id.to_owned()),
        );
        if let DirectorState::Active(current) = previous {
            if let Some(scene) = self
                .scenes
                .get_mut(&current)
                .and_then(|entry| entry.instance.as_mut())
            {
                debug!("cleaning up scene '{current}'");
                scene.cleanup();
            }
        }

        let entry = self
            .scenes
            .get_mut(id)
            .unwrap_or_else(|| unreachable!("registration checked above"));
        match entry.resolve().init(config.as_ref()) {
            Ok(InitPoll::Ready) => {
                debug!("scene '{id}' is now active");
                self.state = DirectorState::Active(id.to_owned());
                Ok(())
            }
            Ok(InitPoll::Pending) => {
                debug!("scene '{id}' initialization pending");
                Ok(())
            }
            Err(err) => {
                error!("scene '{id}' failed to initialize: {err}");
                self.state = DirectorState::Idle;
                Err(DirectorError::SceneInitFailed(err))
            }
        }
    }

    /// Advances an in-flight initialization by one poll
    fn advance_transition(&mut self) {
        let DirectorState::Transitioning(target) = &self.state else {
            return;
        };
        let target = target.clone();

        let poll = self
            .scenes
            .get_mut(&target)
            .and_then(|entry| entry.instance.as_mut())
            .map(|scene| scene.poll_init());

        match poll {
            Some(Ok(InitPoll::Pending)) => return,
            Some(Ok(InitPoll::Ready)) => {
                debug!("scene '{target}' is now active");
                self.state = DirectorState::Active(target);
            }
            Some(Err(err)) => {
                error!("scene '{target}' failed to initialize: {err}");
                self.state = DirectorState::Idle;
            }
            None => {
                error!("transition target '{target}' disappeared from the registry");
                self.state = DirectorState::Idle;
            }
        }

        self.dispatch_pending();
    }

    /// Dispatches the queued superseding request, if any, once settled
    fn dispatch_pending(&mut self) {
        while !matches!(self.state, DirectorState::Transitioning(_)) {
            let Some((id, config)) = self.pending.take() else {
                break;
            };
            debug!("dispatching queued switch to '{id}'");
            if let Err(err) = self.start_transition(&id, config) {
                // No caller left to receive this; the log is the channel
                error!("queued switch to '{id}' failed: {err}");
            }
        }
    }

    //--- Per-frame forwarding ---------------------------------------------

    /// Forwards an update tick to the active scene
    ///
    /// While a transition is in flight this instead advances the pending
    /// initialization; when Idle it is a no-op.
    pub fn update(&mut self, delta: f32, input: &I) {
        match &self.state {
            DirectorState::Transitioning(_) => self.advance_transition(),
            DirectorState::Active(id) => {
                let id = id.clone();
                if let Some(scene) = self
                    .scenes
                    .get_mut(&id)
                    .and_then(|entry| entry.instance.as_mut())
                {
                    scene.update(delta, input);
                }
            }
            DirectorState::Idle => {}
        }
    }

    /// Forwards a render pass to the active scene; no-op otherwise
    pub fn render(&mut self, surface: &mut S) {
        if let DirectorState::Active(id) = &self.state {
            let id = id.clone();
            if let Some(scene) = self
                .scenes
                .get_mut(&id)
                .and_then(|entry| entry.instance.as_mut())
            {
                scene.render(surface);
            }
        }
    }

    /// Signals pause to the active scene's capability, if it has one
    ///
    /// Advisory only; never changes the director's own state machine.
    pub fn pause(&mut self) {
        if let Some(hooks) = self.active_scene_mut().and_then(|scene| scene.pause_hooks()) {
            hooks.on_pause();
        }
    }

    /// Signals resume to the active scene's capability, if it has one
    pub fn resume(&mut self) {
        if let Some(hooks) = self.active_scene_mut().and_then(|scene| scene.pause_hooks()) {
            hooks.on_resume();
        }
    }

    //--- Preload ----------------------------------------------------------

    /// Resolves the registered instance early and returns its preload hints
    ///
    /// Invokes the factory if the instance has not been created yet; the
    /// hints are opaque asset ids for the collaborator asset layer.
    pub fn preload(&mut self, id: &str) -> Result<&[String], DirectorError> {
        let Some(entry) = self.scenes.get_mut(id) else {
            warn!("preload: scene '{id}' is not registered");
            return Err(DirectorError::SceneNotFound(id.to_owned()));
        };
        entry.resolve();
        Ok(&entry.preload_hints)
    }

    //--- Teardown ---------------------------------------------------------

    /// Cleans up the active scene (or a mid-transition target), clears
    /// the registry and any queued transition; safe to call repeatedly
    pub fn destroy(&mut self) {
        match std::mem::replace(&mut self.state, DirectorState::Idle) {
            DirectorState::Active(id) | DirectorState::Transitioning(id) => {
                if let Some(scene) = self
                    .scenes
                    .get_mut(&id)
                    .and_then(|entry| entry.instance.as_mut())
                {
                    debug!("destroy: cleaning up scene '{id}'");
                    scene.cleanup();
                }
            }
            DirectorState::Idle => {}
        }
        self.pending = None;
        self.scenes.clear();
    }

    //--- Queries ----------------------------------------------------------

    /// Id of the active scene, if one exists
    pub fn current_scene_id(&self) -> Option<&str> {
        match &self.state {
            DirectorState::Active(id) => Some(id),
            _ => None,
        }
    }

    /// The active scene instance, if one exists
    pub fn current_scene(&self) -> Option<&dyn Scene<C, I, S>> {
        match &self.state {
            DirectorState::Active(id) => self
                .scenes
                .get(id)
                .and_then(|entry| entry.instance.as_deref()),
            _ => None,
        }
    }

    /// Whether a registration exists under `id`
    pub fn has_scene(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    /// Ids of all registered scenes, in no particular order
    pub fn scene_ids(&self) -> Vec<&str> {
        self.scenes.keys().map(String::as_str).collect()
    }

    /// Whether a transition is currently in flight
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, DirectorState::Transitioning(_))
    }

    fn active_scene_mut(&mut self) -> Option<&mut (dyn Scene<C, I, S> + 'static)> {
        match &self.state {
            DirectorState::Active(id) => {
                let id = id.clone();
                self.scenes
                    .get_mut(&id)
                    .and_then(|entry| entry.instance.as_deref_mut())
            }
            _ => None,
        }
    }
}

impl<C: 'static, I: 'static, S: 'static> Default for SceneDirector<C, I, S> {
    fn default() -> Self {
        Self::new()
    }
}
