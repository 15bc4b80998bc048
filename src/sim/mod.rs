//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (in callers; the simulation itself draws none)
//! - Stable iteration order (bricks by ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod events;
pub mod lives;
pub mod obstacle;
pub mod paddle;
pub mod state;
pub mod tick;

pub use arena::Arena;
pub use collision::{
    Aabb, CollisionEvent, Contact, ContactTag, ObstacleId, circle_aabb_contact, is_top_contact,
    reflect_velocity, resolve_bounce,
};
pub use events::{BallEvent, EventBus, Subscription, SubscriptionId};
pub use lives::Lives;
pub use obstacle::{Brick, BrickField, HitOutcome, Obstacle};
pub use paddle::{Paddle, PaddleInput, PaddleRequest, PaddleView};
pub use state::{Ball, BallBody, BallState, ContactResponse, launch_direction};
pub use tick::{Session, TickInput, TickReport};
