//! The player's paddle
//!
//! Moves horizontally, decides when catching is allowed, runs the aim sweep
//! while the ball is held, and tracks where a held ball sits relative to it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{FloatExt, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::events::{BallEvent, EventBus, Subscription};
use super::state::BallState;
use crate::settings::PaddleTuning;

/// Controls sampled for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PaddleInput {
    /// Horizontal axis in [-1, 1]
    pub move_axis: f32,
    /// Shoot control is down
    pub shoot_held: bool,
    /// Shoot control went down this tick
    pub shoot_pressed: bool,
    /// Shoot control went up this tick
    pub shoot_released: bool,
}

/// What the paddle asks of the ball this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleRequest {
    /// Switch the held ball into aiming
    BeginAim,
    /// Release the aimed ball
    Launch { angle_deg: f32 },
}

/// Per-tick snapshot of the paddle as seen by the ball
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddleView {
    pub catching_enabled: bool,
    /// World position a held ball is pinned to
    pub attach_point: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Center of the paddle
    pub position: Vec2,
    pub size: Vec2,
    /// Offset of a held ball from `position`
    pub attach_offset: Vec2,
    pub catching_enabled: bool,
    /// Current aim angle (degrees, 0 = up)
    pub aim_angle: f32,
    tuning: PaddleTuning,
    /// Horizontal travel limits for the paddle center
    x_limits: (f32, f32),
    /// Aim sweep phase in seconds, wrapped to one sweep period
    sweep_phase: f32,
}

impl Paddle {
    /// Create a paddle centered at `position`, confined to `[-half_span, half_span]`
    pub fn new(position: Vec2, half_span: f32, tuning: PaddleTuning) -> Self {
        let half_width = tuning.width / 2.0;
        let limit = (half_span - half_width).max(0.0);
        Self {
            position,
            size: Vec2::new(tuning.width, tuning.height),
            attach_offset: tuning.rest_offset,
            catching_enabled: false,
            aim_angle: 0.0,
            tuning,
            x_limits: (-limit, limit),
            sweep_phase: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, self.size)
    }

    pub fn view(&self) -> PaddleView {
        PaddleView {
            catching_enabled: self.catching_enabled,
            attach_point: self.position + self.attach_offset,
        }
    }

    /// Advance one tick given the ball's current state
    pub fn update(&mut self, input: &PaddleInput, ball: BallState, dt: f32) -> Option<PaddleRequest> {
        let period = std::f32::consts::TAU / self.tuning.aim_sweep_speed;
        self.sweep_phase = (self.sweep_phase + dt) % period;
        self.catching_enabled = ball == BallState::Flying && input.shoot_held;

        let mut request = None;
        let mut move_axis = input.move_axis.clamp(-1.0, 1.0);

        match ball {
            BallState::Held if input.shoot_pressed || input.shoot_held => {
                self.aim_angle = self.sweep_angle();
                request = Some(PaddleRequest::BeginAim);
            }
            BallState::Aiming => {
                move_axis = 0.0;
                if input.shoot_released {
                    return Some(PaddleRequest::Launch {
                        angle_deg: self.aim_angle,
                    });
                }
                self.aim_angle = self.sweep_angle();
            }
            _ => {}
        }

        let x = self.position.x + self.tuning.movement_speed * move_axis * dt;
        self.position.x = x.clamp(self.x_limits.0, self.x_limits.1);

        request
    }

    /// Aim angle for the current time: sine ping-pong over `[-max, max]`
    fn sweep_angle(&self) -> f32 {
        let t = 0.5 * ((self.sweep_phase * self.tuning.aim_sweep_speed).sin() + 1.0);
        FloatExt::lerp(-self.tuning.max_aim_angle, self.tuning.max_aim_angle, t)
    }

    pub fn handle_event(&mut self, event: &BallEvent) {
        match *event {
            BallEvent::Stuck { position } => {
                self.attach_offset = position - self.position;
                log::debug!("Paddle caught ball, offset {:?}", self.attach_offset);
            }
            BallEvent::Lost { .. } => {
                self.attach_offset = self.tuning.rest_offset;
            }
            BallEvent::Launch { .. } => {}
        }
    }

    /// Subscribe `this` to ball events on `bus`
    pub fn attach(this: &Rc<RefCell<Paddle>>, bus: &Rc<EventBus>) -> Subscription {
        let weak: Weak<RefCell<Paddle>> = Rc::downgrade(this);
        bus.attach(move |event| {
            let Some(paddle) = weak.upgrade() else {
                return;
            };
            match paddle.try_borrow_mut() {
                Ok(mut paddle) => paddle.handle_event(event),
                Err(_) => log::warn!("Paddle busy, dropped {:?}", event),
            };
        })
    }
}
