//! Ball motion core
//!
//! Owns the ball's state machine (held / aiming / flying), heading and speed.
//! Contacts reported during a physics step are accumulated and resolved as a
//! single reflection at the next fixed update, before the velocity write.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionEvent, ContactTag, is_top_contact, resolve_bounce};
use super::events::{BallEvent, EventBus, Subscription};
use super::obstacle::{HitOutcome, Obstacle};
use super::paddle::PaddleView;
use crate::consts::LAUNCH_MIN_Y;
use crate::settings::BallTuning;
use crate::{secs_to_ticks, up_rotated};

/// Ball behavioral mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Free-moving
    Flying,
    /// Pinned to the paddle, waiting for an aim request
    Held,
    /// Pinned to the paddle while the aim sweep runs
    Aiming,
}

impl BallState {
    /// Held or aiming: the ball rides on the paddle
    pub fn is_on_paddle(self) -> bool {
        matches!(self, BallState::Held | BallState::Aiming)
    }
}

/// The ball's rigid body as seen by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallBody {
    pub position: Vec2,
    /// Written once per fixed update by the motion core
    pub velocity: Vec2,
    pub radius: f32,
    /// False while frozen on the paddle
    pub simulated: bool,
}

/// How the core responded to one collision event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactResponse {
    /// The ball was not flying
    Ignored,
    /// Caught by the paddle
    Caught,
    /// Crossed the lost boundary
    Lost,
    /// Bounce queued for the next fixed update
    Bounced { hit: Option<HitOutcome> },
}

/// Heading for a launch at `angle_deg` (0 = straight up, positive = counter-clockwise)
///
/// Never points down or flat sideways: a non-positive vertical component is
/// replaced by [`LAUNCH_MIN_Y`]. Non-finite angles fall back to straight up.
pub fn launch_direction(angle_deg: f32) -> Vec2 {
    let mut dir = up_rotated(angle_deg);
    if dir.y <= 0.0 {
        dir.y = LAUNCH_MIN_Y;
    }
    dir.try_normalize().unwrap_or(Vec2::Y)
}

/// The ball entity and its motion state
///
/// Time is counted in fixed steps of [`SIM_DT`](crate::consts::SIM_DT): each
/// [`Ball::fixed_update`] is one tick, and the reattach cooldown is a tick
/// deadline.
#[derive(Debug)]
pub struct Ball {
    state: BallState,
    /// Unit heading while flying
    direction: Vec2,
    speed: f32,
    /// Earliest tick at which the paddle may catch again
    no_reattach_until: u64,
    /// Sum of contact normals seen since the last fixed update
    pending_normal: Vec2,
    has_pending_resolution: bool,
    /// Fixed updates run so far
    ticks: u64,
    /// Reattach cooldown converted to ticks
    cooldown_ticks: u64,
    pub body: BallBody,
    tuning: BallTuning,
    bus: Rc<EventBus>,
}

impl Ball {
    /// Create a ball held on the paddle at `attach_point`
    pub fn new(tuning: BallTuning, bus: Rc<EventBus>, attach_point: Vec2) -> Self {
        Self {
            state: BallState::Held,
            direction: Vec2::Y,
            speed: 0.0,
            no_reattach_until: 0,
            pending_normal: Vec2::ZERO,
            has_pending_resolution: false,
            ticks: 0,
            cooldown_ticks: secs_to_ticks(tuning.reattach_cooldown),
            body: BallBody {
                position: attach_point,
                velocity: Vec2::ZERO,
                radius: tuning.radius,
                simulated: false,
            },
            tuning,
            bus,
        }
    }

    pub fn state(&self) -> BallState {
        self.state
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn no_reattach_until(&self) -> u64 {
        self.no_reattach_until
    }

    pub fn has_pending_resolution(&self) -> bool {
        self.has_pending_resolution
    }

    pub fn pending_normal(&self) -> Vec2 {
        self.pending_normal
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    /// Subscribe the ball to `Launch` requests on its bus
    pub fn attach(this: &Rc<RefCell<Ball>>) -> Subscription {
        let bus = Rc::clone(&this.borrow().bus);
        let weak: Weak<RefCell<Ball>> = Rc::downgrade(this);
        bus.attach(move |event| {
            let BallEvent::Launch { angle_deg } = *event else {
                return;
            };
            let Some(ball) = weak.upgrade() else {
                return;
            };
            match ball.try_borrow_mut() {
                Ok(mut ball) => {
                    ball.launch(angle_deg);
                }
                Err(_) => log::warn!("Ball busy, launch at {} deg dropped", angle_deg),
            }
        })
    }

    /// Held -> Aiming. Returns false from any other state.
    pub fn begin_aim(&mut self) -> bool {
        if self.state != BallState::Held {
            return false;
        }
        self.state = BallState::Aiming;
        log::debug!("Ball aiming");
        true
    }

    /// Held/Aiming -> Flying along `angle_deg`
    ///
    /// Resets speed to the initial value and blocks catching until the
    /// reattach cooldown has passed. Ignored while already flying.
    pub fn launch(&mut self, angle_deg: f32) -> bool {
        if self.state == BallState::Flying {
            log::warn!("Launch at {} deg ignored, ball already flying", angle_deg);
            return false;
        }

        self.direction = launch_direction(angle_deg);
        self.speed = self.tuning.initial_speed;
        self.no_reattach_until = self.ticks.saturating_add(self.cooldown_ticks);
        self.clear_pending();
        self.state = BallState::Flying;
        self.body.simulated = true;

        log::debug!(
            "Ball launched at {} deg, dir {:?}, no catch before tick {}",
            angle_deg,
            self.direction,
            self.no_reattach_until
        );
        true
    }

    /// Advance one tick, resolve the last step's contacts and write the velocity
    pub fn fixed_update(&mut self, paddle: &PaddleView) -> Vec2 {
        self.ticks = self.ticks.saturating_add(1);

        if self.state.is_on_paddle() {
            self.body.position = paddle.attach_point;
            self.body.velocity = Vec2::ZERO;
            return Vec2::ZERO;
        }

        if self.has_pending_resolution {
            self.direction = resolve_bounce(self.direction, self.pending_normal);
            self.clear_pending();
        }

        self.body.velocity = self.direction * self.speed;
        self.body.velocity
    }

    /// Record one collision event from the physics step
    ///
    /// `obstacle` is the collaborator behind an [`ContactTag::Obstacle`] tag;
    /// it receives exactly one `on_hit` for the whole event.
    pub fn on_collision(
        &mut self,
        event: &CollisionEvent,
        paddle: &PaddleView,
        obstacle: Option<&mut dyn Obstacle>,
    ) -> ContactResponse {
        if self.state != BallState::Flying {
            return ContactResponse::Ignored;
        }

        match event.tag {
            ContactTag::LostBoundary => {
                // Snapped to the paddle at the next fixed update, once the
                // paddle has reset its attach offset
                self.freeze(BallState::Held);
                log::debug!("Ball lost");
                self.bus.publish(&BallEvent::Lost { delta: -1 });
                return ContactResponse::Lost;
            }
            ContactTag::Paddle => {
                if self.can_catch(event, paddle) {
                    self.freeze(BallState::Held);
                    log::debug!("Ball caught at {:?}", self.body.position);
                    self.bus.publish(&BallEvent::Stuck {
                        position: self.body.position,
                    });
                    return ContactResponse::Caught;
                }
            }
            ContactTag::Obstacle(_) | ContactTag::Solid => {}
        }

        let hit = match (event.tag, obstacle) {
            (ContactTag::Obstacle(_), Some(obstacle)) => Some(obstacle.on_hit()),
            (ContactTag::Obstacle(id), None) => {
                log::warn!("No obstacle behind {:?}, hit skipped", id);
                None
            }
            _ => None,
        };

        self.speed += self.tuning.speed_increment;
        self.pending_normal += event.normal_sum();
        self.has_pending_resolution = true;

        ContactResponse::Bounced { hit }
    }

    fn can_catch(&self, event: &CollisionEvent, paddle: &PaddleView) -> bool {
        self.ticks >= self.no_reattach_until && paddle.catching_enabled && is_top_contact(event)
    }

    fn freeze(&mut self, state: BallState) {
        self.state = state;
        self.body.velocity = Vec2::ZERO;
        self.body.simulated = false;
        self.clear_pending();
    }

    fn clear_pending(&mut self) {
        self.pending_normal = Vec2::ZERO;
        self.has_pending_resolution = false;
    }
}
