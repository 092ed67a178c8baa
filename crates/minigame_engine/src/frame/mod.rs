//! Frame scheduling
//!
//! The scheduler drives the whole system: it asks the host environment
//! for one callback per display refresh, computes clamped delta time on
//! each tick, and forwards update then render to its payload (typically
//! a [`crate::scene::SceneDirector`] wrapped with input/surface glue).
//!
//! The model is cooperative and single-threaded: the host owns the real
//! timer/refresh source and invokes [`FrameScheduler::tick`] once per
//! granted request; the scheduler never holds more than one outstanding
//! request.

mod scheduler;
mod timing;

pub use scheduler::{FrameScheduler, SchedulerError, SchedulerOptions};
pub use timing::FrameTiming;

use thiserror::Error;

/// Handle identifying one outstanding frame-callback request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Host environment abstraction
///
/// Supplies wall-clock timestamps and the per-frame callback mechanism.
/// A granted request results in exactly one later `tick(timestamp_ms)`
/// call on the scheduler, unless cancelled first.
pub trait FrameHost {
    /// Current timestamp in milliseconds
    fn now_ms(&mut self) -> f64;

    /// Request one frame callback; returns the cancellation handle
    fn request_frame(&mut self) -> FrameRequestId;

    /// Cancel a previously granted request
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Failure raised by a frame payload's callbacks
///
/// Fatal to the running loop: the scheduler halts without rescheduling
/// and the error propagates to the host.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The update callback failed
    #[error("update callback failed: {0}")]
    Update(String),

    /// The render callback failed
    #[error("render callback failed: {0}")]
    Render(String),
}

/// The update/render pair driven by the scheduler
///
/// `update` must treat its delta as the sole source of elapsed-time
/// truth (no wall-clock reads); `render` must only read simulation
/// state, never mutate it.
pub trait FramePayload {
    /// Advance the simulation by `delta` seconds
    fn update(&mut self, delta: f32) -> Result<(), FrameError>;

    /// Draw the current state; called even while the loop is paused
    fn render(&mut self, delta: f32) -> Result<(), FrameError>;
}
