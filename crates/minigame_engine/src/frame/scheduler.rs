//! Frame scheduler - the per-frame loop driver

use log::debug;
use thiserror::Error;

use super::timing::FrameTiming;
use super::{FrameError, FrameHost, FramePayload, FrameRequestId};

/// Errors surfaced by [`FrameScheduler::tick`]
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The payload's update or render callback failed; the loop halted
    #[error("frame callback failed: {0}")]
    Payload(#[from] FrameError),
}

/// Scheduler construction options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerOptions {
    /// Target frame cadence; `None` runs at the host's native refresh
    pub target_fps: Option<u32>,
    /// Ceiling applied to every delta handed to the payload, in seconds
    pub max_delta_time: f32,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            target_fps: None,
            max_delta_time: 0.1,
        }
    }
}

/// Drives the per-frame loop through a host environment
///
/// The scheduler never holds more than one outstanding frame request.
/// On each granted tick it computes the clamped delta, invokes the
/// payload's update (unless paused) then render (always, so a paused
/// scene still displays), samples FPS over a rolling window, and
/// requests the next frame while still running.
pub struct FrameScheduler<P, H> {
    payload: P,
    host: H,
    options: SchedulerOptions,
    timing: FrameTiming,
    on_fps_update: Option<Box<dyn FnMut(f32)>>,
    running: bool,
    paused: bool,
    pending_frame: Option<FrameRequestId>,
}

impl<P: FramePayload, H: FrameHost> FrameScheduler<P, H> {
    /// Creates a scheduler over the given payload and host
    pub fn new(payload: P, host: H, options: SchedulerOptions) -> Self {
        Self {
            payload,
            host,
            options,
            timing: FrameTiming::new(options.max_delta_time),
            on_fps_update: None,
            running: false,
            paused: false,
            pending_frame: None,
        }
    }

    /// Attaches a callback invoked whenever a new FPS sample lands
    #[must_use]
    pub fn with_fps_callback(mut self, callback: impl FnMut(f32) + 'static) -> Self {
        self.on_fps_update = Some(Box::new(callback));
        self
    }

    /// Starts the loop: resets timing and requests the first frame
    ///
    /// No-op if already running.
    pub fn start(&mut self) {
        if self.running {
            debug!("start: scheduler already running");
            return;
        }
        self.running = true;
        self.paused = false;
        let now = self.host.now_ms();
        self.timing.reset(now);
        self.pending_frame = Some(self.host.request_frame());
    }

    /// Stops the loop, cancelling any pending frame request; idempotent
    ///
    /// Cancels only the frame request; an in-flight scene transition in
    /// the payload runs to completion independently of further ticks.
    pub fn stop(&mut self) {
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }
        self.running = false;
    }

    /// Pauses update dispatch; render keeps running every tick
    ///
    /// Only meaningful while running.
    pub fn pause(&mut self) {
        if self.running {
            self.paused = true;
        }
    }

    /// Resumes update dispatch, re-baselining the timestamp so the
    /// paused interval does not arrive as a delta spike
    pub fn resume(&mut self) {
        if self.running && self.paused {
            self.paused = false;
            let now = self.host.now_ms();
            self.timing.rebaseline(now);
        }
    }

    /// One frame callback from the host
    ///
    /// A payload failure halts the loop before the error propagates; no
    /// frame is rescheduled and recovery requires an explicit
    /// [`FrameScheduler::start`]. A stale tick arriving after `stop` is
    /// ignored.
    pub fn tick(&mut self, timestamp_ms: f64) -> Result<(), SchedulerError> {
        if !self.running {
            return Ok(());
        }
        self.pending_frame = None;

        // Frame pacing: re-request without dispatching when the tick
        // arrives ahead of the target cadence
        if let Some(target) = self.options.target_fps {
            let interval_ms = 1000.0 / f64::from(target);
            if timestamp_ms - self.timing.last_timestamp_ms() < interval_ms {
                self.pending_frame = Some(self.host.request_frame());
                return Ok(());
            }
        }

        let delta = self.timing.advance(timestamp_ms);

        if !self.paused {
            if let Err(err) = self.payload.update(delta) {
                self.running = false;
                return Err(err.into());
            }
        }
        if let Err(err) = self.payload.render(delta) {
            self.running = false;
            return Err(err.into());
        }

        if let Some(fps) = self.timing.take_fps_sample() {
            if let Some(callback) = self.on_fps_update.as_mut() {
                callback(fps);
            }
        }

        if self.running {
            self.pending_frame = Some(self.host.request_frame());
        }
        Ok(())
    }

    /// Whether the loop is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether update dispatch is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The most recent sampled frames-per-second value
    pub fn fps(&self) -> f32 {
        self.timing.fps()
    }

    /// Frames dispatched since the last start
    pub fn frame_count(&self) -> u64 {
        self.timing.frame_count()
    }

    /// The hosted payload
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Mutable access to the hosted payload
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct HostLog {
        now_ms: f64,
        requested: Vec<FrameRequestId>,
        cancelled: Vec<FrameRequestId>,
        next_id: u64,
    }

    #[derive(Clone, Default)]
    struct MockHost {
        log: Rc<RefCell<HostLog>>,
    }

    impl MockHost {
        fn set_now(&self, now_ms: f64) {
            self.log.borrow_mut().now_ms = now_ms;
        }

        fn requested(&self) -> usize {
            self.log.borrow().requested.len()
        }

        fn cancelled(&self) -> usize {
            self.log.borrow().cancelled.len()
        }
    }

    impl FrameHost for MockHost {
        fn now_ms(&mut self) -> f64 {
            self.log.borrow().now_ms
        }

        fn request_frame(&mut self) -> FrameRequestId {
            let mut log = self.log.borrow_mut();
            log.next_id += 1;
            let id = FrameRequestId(log.next_id);
            log.requested.push(id);
            id
        }

        fn cancel_frame(&mut self, id: FrameRequestId) {
            self.log.borrow_mut().cancelled.push(id);
        }
    }

    #[derive(Default)]
    struct PayloadLog {
        update_deltas: Vec<f32>,
        render_deltas: Vec<f32>,
    }

    struct TestPayload {
        log: Rc<RefCell<PayloadLog>>,
        fail_update: bool,
    }

    impl TestPayload {
        fn new(log: Rc<RefCell<PayloadLog>>) -> Self {
            Self {
                log,
                fail_update: false,
            }
        }
    }

    impl FramePayload for TestPayload {
        fn update(&mut self, delta: f32) -> Result<(), FrameError> {
            if self.fail_update {
                return Err(FrameError::Update("payload exploded".into()));
            }
            self.log.borrow_mut().update_deltas.push(delta);
            Ok(())
        }

        fn render(&mut self, delta: f32) -> Result<(), FrameError> {
            self.log.borrow_mut().render_deltas.push(delta);
            Ok(())
        }
    }

    fn scheduler(
        options: SchedulerOptions,
    ) -> (
        FrameScheduler<TestPayload, MockHost>,
        MockHost,
        Rc<RefCell<PayloadLog>>,
    ) {
        let host = MockHost::default();
        let log = Rc::new(RefCell::new(PayloadLog::default()));
        let payload = TestPayload::new(log.clone());
        (
            FrameScheduler::new(payload, host.clone(), options),
            host,
            log,
        )
    }

    #[test]
    fn test_start_twice_issues_one_request() {
        let (mut sched, host, _log) = scheduler(SchedulerOptions::default());
        sched.start();
        sched.start();
        assert_eq!(host.requested(), 1);
        assert!(sched.is_running());
    }

    #[test]
    fn test_stop_cancels_pending_request() {
        let (mut sched, host, _log) = scheduler(SchedulerOptions::default());
        sched.start();
        sched.stop();
        assert_eq!(host.cancelled(), 1);
        assert!(!sched.is_running());

        // Idempotent
        sched.stop();
        assert_eq!(host.cancelled(), 1);
    }

    #[test]
    fn test_tick_clamps_large_gap() {
        let options = SchedulerOptions {
            max_delta_time: 0.05,
            ..SchedulerOptions::default()
        };
        let (mut sched, host, log) = scheduler(options);
        host.set_now(0.0);
        sched.start();
        sched.tick(200.0).unwrap();
        assert_eq!(log.borrow().update_deltas, vec![0.05]);
    }

    #[test]
    fn test_tick_reschedules_while_running() {
        let (mut sched, host, _log) = scheduler(SchedulerOptions::default());
        host.set_now(0.0);
        sched.start();
        sched.tick(16.0).unwrap();
        sched.tick(32.0).unwrap();
        // Initial request plus one per dispatched tick
        assert_eq!(host.requested(), 3);
        assert_eq!(sched.frame_count(), 2);
    }

    #[test]
    fn test_paused_skips_update_but_renders() {
        let (mut sched, host, log) = scheduler(SchedulerOptions::default());
        host.set_now(0.0);
        sched.start();
        sched.tick(16.0).unwrap();
        sched.pause();
        assert!(sched.is_paused());
        sched.tick(32.0).unwrap();
        sched.tick(48.0).unwrap();

        assert_eq!(log.borrow().update_deltas.len(), 1);
        assert_eq!(log.borrow().render_deltas.len(), 3);
    }

    #[test]
    fn test_resume_swallows_paused_interval() {
        let (mut sched, host, log) = scheduler(SchedulerOptions::default());
        host.set_now(0.0);
        sched.start();
        sched.tick(16.0).unwrap();
        sched.pause();

        // A long pause, then resume re-baselines to "now"
        host.set_now(5000.0);
        sched.resume();
        sched.tick(5016.0).unwrap();

        let deltas = log.borrow().update_deltas.clone();
        assert_eq!(deltas.len(), 2);
        assert!((deltas[1] - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_payload_failure_halts_loop() {
        let (mut sched, host, _log) = scheduler(SchedulerOptions::default());
        host.set_now(0.0);
        sched.start();
        sched.payload_mut().fail_update = true;

        let result = sched.tick(16.0);
        assert!(matches!(result, Err(SchedulerError::Payload(_))));
        assert!(!sched.is_running());
        // No reschedule after the failure
        assert_eq!(host.requested(), 1);

        // Recovery is an explicit start
        sched.payload_mut().fail_update = false;
        sched.start();
        assert!(sched.is_running());
        assert_eq!(host.requested(), 2);
    }

    #[test]
    fn test_stale_tick_after_stop_is_ignored() {
        let (mut sched, host, log) = scheduler(SchedulerOptions::default());
        host.set_now(0.0);
        sched.start();
        sched.stop();
        sched.tick(16.0).unwrap();
        assert!(log.borrow().render_deltas.is_empty());
        assert_eq!(host.requested(), 1);
    }

    #[test]
    fn test_frame_pacing_skips_early_ticks() {
        let options = SchedulerOptions {
            target_fps: Some(50),
            ..SchedulerOptions::default()
        };
        let (mut sched, host, log) = scheduler(options);
        host.set_now(0.0);
        sched.start();

        // 50 fps means a 20ms interval; a 10ms tick only re-requests
        sched.tick(10.0).unwrap();
        assert!(log.borrow().update_deltas.is_empty());
        assert_eq!(host.requested(), 2);

        sched.tick(20.0).unwrap();
        assert_eq!(log.borrow().update_deltas.len(), 1);
    }

    #[test]
    fn test_fps_callback_fires_after_window() {
        let samples = Rc::new(RefCell::new(Vec::new()));
        let (sched, host, _log) = scheduler(SchedulerOptions::default());
        let mut sched = {
            let samples = samples.clone();
            sched.with_fps_callback(move |fps| samples.borrow_mut().push(fps))
        };
        host.set_now(0.0);
        sched.start();
        for i in 1..=6 {
            sched.tick(f64::from(i) * 100.0).unwrap();
        }

        let samples = samples.borrow();
        assert_eq!(samples.len(), 1);
        assert!((samples[0] - 10.0).abs() < 1e-3);
        assert!((sched.fps() - 10.0).abs() < 1e-3);
    }
}
