//! Headless physics step for the play field
//!
//! Integrates the ball body by the velocity the motion core wrote, finds
//! overlaps with walls, paddle, bricks and the lost floor, pushes the ball
//! back out, and reports one [`CollisionEvent`] per touched body.
//!
//! Coordinates: origin at the bottom-center of the field, +y up. The lost
//! floor spans the bottom edge.

use glam::Vec2;

use super::collision::{Aabb, CollisionEvent, ContactTag, circle_aabb_contact};
use super::obstacle::BrickField;
use super::state::BallBody;
use crate::settings::ArenaTuning;

/// Thickness of the boundary boxes around the field
const WALL_THICKNESS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Left wall, right wall, ceiling
    walls: [Aabb; 3],
    lost_floor: Aabb,
}

impl Arena {
    pub fn new(tuning: &ArenaTuning) -> Self {
        let half = tuning.width / 2.0;
        let h = tuning.height;
        let t = WALL_THICKNESS;
        Self {
            width: tuning.width,
            height: h,
            walls: [
                Aabb::new(Vec2::new(-half - t, -t), Vec2::new(-half, h + t)),
                Aabb::new(Vec2::new(half, -t), Vec2::new(half + t, h + t)),
                Aabb::new(Vec2::new(-half - t, h), Vec2::new(half + t, h + t)),
            ],
            lost_floor: Aabb::new(Vec2::new(-half, -t), Vec2::new(half, 0.0)),
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Move the ball for one step and collect what it touched
    ///
    /// Motion is split into substeps no longer than half the ball radius and
    /// stops at the first substep that produces contact.
    pub fn step(&self, body: &mut BallBody, paddle: &Aabb, bricks: &BrickField, dt: f32) -> Vec<CollisionEvent> {
        if !body.simulated {
            return Vec::new();
        }

        let travel = body.velocity * dt;
        let max_step = (body.radius * 0.5).max(1.0e-3);
        let substeps = ((travel.length() / max_step).ceil() as u32).clamp(1, 64);
        let delta = travel / substeps as f32;

        for _ in 0..substeps {
            body.position += delta;
            let events = self.resolve_overlaps(body, paddle, bricks);
            if !events.is_empty() {
                return events;
            }
        }

        Vec::new()
    }

    /// Push the ball out of everything it overlaps, one event per body
    fn resolve_overlaps(&self, body: &mut BallBody, paddle: &Aabb, bricks: &BrickField) -> Vec<CollisionEvent> {
        let mut colliders: Vec<(ContactTag, Aabb)> = Vec::with_capacity(5);
        colliders.extend(self.walls.iter().map(|w| (ContactTag::Solid, *w)));
        colliders.push((ContactTag::Paddle, *paddle));
        colliders.extend(
            bricks
                .iter()
                .filter(|b| !b.is_destroyed())
                .map(|b| (ContactTag::Obstacle(b.id), b.bounds)),
        );
        colliders.push((ContactTag::LostBoundary, self.lost_floor));

        let mut events = Vec::new();
        for (tag, bounds) in colliders {
            if let Some((contact, depth)) = circle_aabb_contact(body.position, body.radius, &bounds) {
                body.position += contact.normal * depth;
                events.push(CollisionEvent::new(tag, bounds, vec![contact]));
            }
        }
        events
    }
}
