//! Stunt Course Demo
//!
//! Headless exercise of the full engine substrate:
//! - A menu scene and a stunt-course scene with a multi-tick initializer
//! - The scene director driving transitions (including a coalesced
//!   double-switch) while the frame scheduler ticks
//! - Collision geometry resolving a truck against randomized obstacles
//!
//! The "display" is a line buffer; the host is a manual loop over
//! `std::time::Instant` standing in for a native refresh callback.

use minigame_engine::collision::{Circle, Rect};
use minigame_engine::config::EngineConfig;
use minigame_engine::foundation::math::{Point2, Vec2};
use minigame_engine::frame::{FrameError, FrameHost, FramePayload, FrameRequestId, FrameScheduler};
use minigame_engine::scene::{
    InitPoll, PauseHooks, Scene, SceneDirector, SceneError, SceneRegistration,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

// Demo settings
const TOTAL_FRAMES: u64 = 240;
const FRAME_SLEEP_MS: u64 = 4;
const COURSE_WIDTH: f32 = 800.0;
const COURSE_HEIGHT: f32 = 600.0;
const TRUCK_RADIUS: f32 = 20.0;
const TRUCK_SPEED: f32 = 180.0;
const OBSTACLES_PER_LOAD_TICK: usize = 4;

const DEMO_CONFIG: &str = r"
[scheduler]
target_fps = 120
max_delta_time = 0.1
";

/// Input snapshot supplied once per tick by the host
#[derive(Debug, Clone, Copy, Default)]
struct DemoInput {
    steer: Vec2,
}

/// Stand-in rendering surface: a buffer of status lines
#[derive(Debug, Default)]
struct DemoSurface {
    lines: Vec<String>,
}

/// Activation configuration for the course scene
#[derive(Debug, Clone)]
struct CourseConfig {
    obstacle_count: usize,
    seed: u64,
}

//=== Scenes ==============================================================

struct MenuScene {
    blink_timer: f32,
}

impl Scene<CourseConfig, DemoInput, DemoSurface> for MenuScene {
    fn id(&self) -> &str {
        "menu"
    }

    fn init(&mut self, _config: Option<&CourseConfig>) -> Result<InitPoll, SceneError> {
        self.blink_timer = 0.0;
        Ok(InitPoll::Ready)
    }

    fn update(&mut self, delta: f32, _input: &DemoInput) {
        self.blink_timer += delta;
    }

    fn render(&mut self, surface: &mut DemoSurface) {
        let cursor = if self.blink_timer.fract() < 0.5 { ">" } else { " " };
        surface.lines.push(format!("{cursor} press any key"));
    }

    fn cleanup(&mut self) {
        log::info!("menu closed after {:.2}s", self.blink_timer);
    }
}

/// The driving/stunt mode: a truck rolling through an obstacle field
struct StuntCourseScene {
    truck: Circle,
    velocity: Vec2,
    obstacles: Vec<Rect>,
    /// How many obstacles the initializer still has to place
    load_remaining: usize,
    rng: StdRng,
    hits: u32,
    paused_count: u32,
}

impl StuntCourseScene {
    fn new() -> Self {
        Self {
            truck: Circle::new(Point2::new(COURSE_WIDTH / 2.0, COURSE_HEIGHT / 2.0), TRUCK_RADIUS),
            velocity: Vec2::new(TRUCK_SPEED, TRUCK_SPEED / 3.0),
            obstacles: Vec::new(),
            load_remaining: 0,
            rng: StdRng::seed_from_u64(0),
            hits: 0,
            paused_count: 0,
        }
    }

    fn place_obstacles(&mut self, count: usize) {
        for _ in 0..count {
            let width = self.rng.gen_range(20.0..80.0);
            let height = self.rng.gen_range(20.0..80.0);
            let x = self.rng.gen_range(0.0..COURSE_WIDTH - width);
            let y = self.rng.gen_range(0.0..COURSE_HEIGHT - height);
            self.obstacles.push(Rect::new(x, y, width, height));
        }
    }
}

impl PauseHooks for StuntCourseScene {
    fn on_pause(&mut self) {
        self.paused_count += 1;
        log::info!("stunt course paused");
    }

    fn on_resume(&mut self) {
        log::info!("stunt course resumed");
    }
}

impl Scene<CourseConfig, DemoInput, DemoSurface> for StuntCourseScene {
    fn id(&self) -> &str {
        "stunt_course"
    }

    fn init(&mut self, config: Option<&CourseConfig>) -> Result<InitPoll, SceneError> {
        let (count, seed) = config.map_or((12, 7), |c| (c.obstacle_count, c.seed));
        self.rng = StdRng::seed_from_u64(seed);
        self.obstacles.clear();
        self.hits = 0;
        self.truck.center = Point2::new(COURSE_WIDTH / 2.0, COURSE_HEIGHT / 2.0);
        self.load_remaining = count;
        // Obstacle placement is spread across ticks like a content load
        Ok(InitPoll::Pending)
    }

    fn poll_init(&mut self) -> Result<InitPoll, SceneError> {
        let batch = self.load_remaining.min(OBSTACLES_PER_LOAD_TICK);
        self.place_obstacles(batch);
        self.load_remaining -= batch;
        if self.load_remaining == 0 {
            log::info!("course ready with {} obstacles", self.obstacles.len());
            Ok(InitPoll::Ready)
        } else {
            Ok(InitPoll::Pending)
        }
    }

    fn update(&mut self, delta: f32, input: &DemoInput) {
        self.velocity += input.steer * delta;
        self.truck.center += self.velocity * delta;

        // Bounce off the course bounds
        let bounds = Rect::new(0.0, 0.0, COURSE_WIDTH, COURSE_HEIGHT)
            .expanded(-self.truck.radius);
        if !bounds.contains_point(self.truck.center) {
            self.truck.center.x = self.truck.center.x.clamp(bounds.x, bounds.right());
            self.truck.center.y = self.truck.center.y.clamp(bounds.y, bounds.bottom());
            self.velocity = -self.velocity;
        }

        // Push the truck out of any obstacle it hit
        for obstacle in &self.obstacles {
            let contact = self.truck.intersect_rect_detailed(obstacle);
            if contact.collided {
                self.truck.center += contact.overlap;
                self.velocity = -self.velocity;
                self.hits += 1;
            }
        }
    }

    fn render(&mut self, surface: &mut DemoSurface) {
        surface.lines.push(format!(
            "truck at ({:.0}, {:.0}) hits={}",
            self.truck.center.x, self.truck.center.y, self.hits
        ));
    }

    fn cleanup(&mut self) {
        log::info!("stunt course finished with {} hits", self.hits);
        self.obstacles.clear();
    }

    fn pause_hooks(&mut self) -> Option<&mut dyn PauseHooks> {
        Some(self)
    }
}

//=== Host + payload glue =================================================

/// Manual frame host driven by the main loop
#[derive(Clone)]
struct ManualHost {
    epoch: Instant,
    pending: Rc<Cell<bool>>,
    next_id: Rc<Cell<u64>>,
}

impl ManualHost {
    fn new() -> Self {
        Self {
            epoch: Instant::now(),
            pending: Rc::new(Cell::new(false)),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    fn take_pending(&self) -> bool {
        self.pending.replace(false)
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

impl FrameHost for ManualHost {
    fn now_ms(&mut self) -> f64 {
        self.now()
    }

    fn request_frame(&mut self) -> FrameRequestId {
        self.pending.set(true);
        self.next_id.set(self.next_id.get() + 1);
        FrameRequestId(self.next_id.get())
    }

    fn cancel_frame(&mut self, _id: FrameRequestId) {
        self.pending.set(false);
    }
}

/// Adapts the director to the scheduler by supplying the opaque
/// input snapshot and surface the scheduler never sees
struct DirectorPayload {
    director: SceneDirector<CourseConfig, DemoInput, DemoSurface>,
    input: DemoInput,
    surface: DemoSurface,
}

impl FramePayload for DirectorPayload {
    fn update(&mut self, delta: f32) -> Result<(), FrameError> {
        self.director.update(delta, &self.input);
        Ok(())
    }

    fn render(&mut self, _delta: f32) -> Result<(), FrameError> {
        self.surface.lines.clear();
        self.director.render(&mut self.surface);
        Ok(())
    }
}

//=== Main ================================================================

fn main() {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = EngineConfig::from_toml_str(DEMO_CONFIG).expect("demo config is valid");

    let mut director = SceneDirector::new();
    director.register_scene(MenuScene { blink_timer: 0.0 });
    director.register(
        SceneRegistration::from_factory("stunt_course", || Box::new(StuntCourseScene::new()))
            .with_preload_hints(vec!["trucks.atlas".to_owned(), "engine.sfx".to_owned()]),
    );

    let hints = director
        .preload("stunt_course")
        .expect("stunt course is registered")
        .to_vec();
    log::info!("would hand preload hints to the asset layer: {hints:?}");

    director
        .switch_to("menu", None)
        .expect("menu scene is registered");

    let host = ManualHost::new();
    let payload = DirectorPayload {
        director,
        input: DemoInput::default(),
        surface: DemoSurface::default(),
    };
    let mut scheduler = FrameScheduler::new(payload, host.clone(), config.scheduler.to_options())
        .with_fps_callback(|fps| log::info!("fps: {fps:.1}"));

    scheduler.start();

    let mut frame: u64 = 0;
    while frame < TOTAL_FRAMES && host.take_pending() {
        frame += 1;

        match frame {
            // Rapid double-switch: the course request supersedes the
            // queued menu re-entry while its loader is in flight
            30 => {
                let payload = scheduler.payload_mut();
                payload
                    .director
                    .switch_to(
                        "stunt_course",
                        Some(CourseConfig {
                            obstacle_count: 16,
                            seed: 42,
                        }),
                    )
                    .expect("course scene is registered");
                let _ = payload.director.switch_to("menu", None);
                payload
                    .director
                    .switch_to(
                        "stunt_course",
                        Some(CourseConfig {
                            obstacle_count: 16,
                            seed: 42,
                        }),
                    )
                    .expect("course scene is registered");
            }
            100 => scheduler.pause(),
            130 => scheduler.resume(),
            150 => scheduler.payload_mut().input.steer = Vec2::new(-40.0, 25.0),
            _ => {}
        }

        if let Err(err) = scheduler.tick(host.now()) {
            log::error!("frame loop halted: {err}");
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(FRAME_SLEEP_MS));
    }

    log::info!(
        "ran {} frames, last fps sample {:.1}, paused={}",
        scheduler.frame_count(),
        scheduler.fps(),
        scheduler.is_paused()
    );

    let payload = scheduler.payload_mut();
    if let Some(line) = payload.surface.lines.last() {
        log::info!("final frame: {line}");
    }
    payload.director.destroy();
    scheduler.stop();
}
