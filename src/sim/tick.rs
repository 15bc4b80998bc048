//! Fixed timestep simulation tick
//!
//! [`Session`] wires the ball, paddle, lives and bricks to one event bus and
//! advances them deterministically. Each tick runs, in order:
//! 1. paddle update (may begin aiming or publish a launch)
//! 2. ball fixed update (single reflection for last step's contacts, velocity write)
//! 3. physics step (integrate, collect contacts)
//! 4. collision dispatch to the ball, with obstacle hits
//! 5. removal of destroyed bricks

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::arena::Arena;
use super::collision::{CollisionEvent, ContactTag};
use super::events::{BallEvent, EventBus, Subscription};
use super::lives::Lives;
use super::obstacle::{BrickField, HitOutcome, Obstacle};
use super::paddle::{Paddle, PaddleInput, PaddleRequest, PaddleView};
use super::state::{Ball, ContactResponse};
use crate::consts::SIM_DT;
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
pub type TickInput = PaddleInput;

/// Counters for what happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub bounces: u32,
    pub bricks_hit: u32,
    pub bricks_destroyed: u32,
    pub caught: bool,
    pub lost: bool,
}

/// A running game: ball, paddle, bricks and lives sharing one bus
pub struct Session {
    pub bus: Rc<EventBus>,
    ball: Rc<RefCell<Ball>>,
    paddle: Rc<RefCell<Paddle>>,
    lives: Rc<RefCell<Lives>>,
    pub bricks: BrickField,
    pub arena: Arena,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Held so subscriptions live exactly as long as the session
    _subscriptions: Vec<Subscription>,
}

impl Session {
    pub fn new(settings: &Settings, bricks: BrickField, lives: i32) -> Self {
        let bus = Rc::new(EventBus::new());
        let arena = Arena::new(&settings.arena);

        let paddle = Paddle::new(
            Vec2::new(0.0, settings.arena.paddle_y),
            arena.half_width(),
            settings.paddle,
        );
        let attach_point = paddle.view().attach_point;
        let paddle = Rc::new(RefCell::new(paddle));
        let ball = Rc::new(RefCell::new(Ball::new(settings.ball, Rc::clone(&bus), attach_point)));
        let lives = Rc::new(RefCell::new(Lives::new(lives)));

        let subscriptions = vec![
            Ball::attach(&ball),
            Paddle::attach(&paddle, &bus),
            Lives::attach(&lives, &bus),
        ];

        log::info!(
            "Session started: {} bricks, {} lives, arena {}x{}",
            bricks.remaining(),
            lives.borrow().remaining(),
            arena.width,
            arena.height
        );

        Self {
            bus,
            ball,
            paddle,
            lives,
            bricks,
            arena,
            time_ticks: 0,
            _subscriptions: subscriptions,
        }
    }

    pub fn ball(&self) -> Ref<'_, Ball> {
        self.ball.borrow()
    }

    pub fn paddle(&self) -> Ref<'_, Paddle> {
        self.paddle.borrow()
    }

    pub fn lives(&self) -> i32 {
        self.lives.borrow().remaining()
    }

    pub fn is_over(&self) -> bool {
        self.lives.borrow().is_depleted() || self.bricks.is_cleared()
    }

    /// Advance one fixed step of [`SIM_DT`]
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        self.time_ticks += 1;
        let dt = SIM_DT;

        let ball_state = self.ball.borrow().state();
        let request = self.paddle.borrow_mut().update(input, ball_state, dt);
        match request {
            Some(PaddleRequest::BeginAim) => {
                self.ball.borrow_mut().begin_aim();
            }
            Some(PaddleRequest::Launch { angle_deg }) => {
                self.bus.publish(&BallEvent::Launch { angle_deg });
            }
            None => {}
        }

        // Snapshot once: the paddle is read, never borrowed, while the ball runs
        let view = self.paddle.borrow().view();
        let paddle_bounds = self.paddle.borrow().bounds();

        let mut ball = self.ball.borrow_mut();
        ball.fixed_update(&view);

        let collisions = self.arena.step(&mut ball.body, &paddle_bounds, &self.bricks, dt);

        let mut report = TickReport::default();
        for event in &collisions {
            let response = dispatch(&mut ball, event, &view, &mut self.bricks);
            match response {
                ContactResponse::Caught => report.caught = true,
                ContactResponse::Lost => report.lost = true,
                ContactResponse::Bounced { hit } => {
                    report.bounces += 1;
                    match hit {
                        Some(HitOutcome::Destroyed) => {
                            report.bricks_hit += 1;
                            report.bricks_destroyed += 1;
                        }
                        Some(HitOutcome::Damaged { .. }) => report.bricks_hit += 1,
                        None => {}
                    }
                }
                ContactResponse::Ignored => {}
            }
        }
        drop(ball);

        let removed = self.bricks.remove_destroyed();
        if removed > 0 && self.bricks.is_cleared() {
            log::info!("All bricks cleared at tick {}", self.time_ticks);
        }

        report
    }
}

/// Hand one collision to the ball, resolving the obstacle behind it
fn dispatch(
    ball: &mut Ball,
    event: &CollisionEvent,
    view: &PaddleView,
    bricks: &mut BrickField,
) -> ContactResponse {
    match event.tag {
        ContactTag::Obstacle(id) => {
            let obstacle = bricks.get_mut(id).map(|b| b as &mut dyn Obstacle);
            ball.on_collision(event, view, obstacle)
        }
        _ => ball.on_collision(event, view, None),
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("time_ticks", &self.time_ticks)
            .field("ball_state", &self.ball.borrow().state())
            .field("lives", &self.lives())
            .field("bricks", &self.bricks.remaining())
            .finish()
    }
}
