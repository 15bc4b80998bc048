//! Contact data and bounce response
//!
//! The physics step reports one [`CollisionEvent`] per touched body, each with
//! one or more contact points. The ball never reflects per contact: normals
//! are summed for the whole tick and resolved once by [`resolve_bounce`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Identifier of a breakable obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

/// What the ball touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactTag {
    /// The player's paddle (can catch the ball)
    Paddle,
    /// The boundary below the paddle; touching it loses the ball
    LostBoundary,
    /// A breakable obstacle
    Obstacle(ObstacleId),
    /// Anything else solid (walls, ceiling)
    Solid,
}

/// Axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// A single contact point reported by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Surface normal, pointing from the other body toward the ball
    pub normal: Vec2,
    /// World-space contact position
    pub point: Vec2,
}

/// All contacts between the ball and one body during one physics step
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub tag: ContactTag,
    /// Bounds of the other collider (used for paddle top-band checks)
    pub bounds: Aabb,
    pub contacts: Vec<Contact>,
}

impl CollisionEvent {
    pub fn new(tag: ContactTag, bounds: Aabb, contacts: Vec<Contact>) -> Self {
        Self {
            tag,
            bounds,
            contacts,
        }
    }

    /// Sum of all contact normals in this event (not normalized)
    pub fn normal_sum(&self) -> Vec2 {
        self.contacts.iter().map(|c| c.normal).sum()
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve one tick's worth of contacts into a new heading
///
/// `accumulated` is the raw sum of contact normals for the tick. Returns the
/// new unit direction. A reflection whose dot with the normal stays above
/// [`NUDGE_DOT_THRESHOLD`] is blended [`NUDGE_BLEND`] of the way toward the
/// normal so shallow bounces cannot settle into a flat loop.
///
/// A sum that cancels to zero carries no usable surface, so the heading is
/// kept as is.
pub fn resolve_bounce(direction: Vec2, accumulated: Vec2) -> Vec2 {
    let Some(normal) = accumulated.try_normalize() else {
        return direction;
    };

    let mut reflected = reflect_velocity(direction, normal);
    if reflected.dot(normal) > NUDGE_DOT_THRESHOLD {
        reflected = reflected.lerp(normal, NUDGE_BLEND);
    }

    reflected.try_normalize().unwrap_or(normal)
}

/// Whether a paddle collision hit the paddle's top face
///
/// A contact qualifies when its normal points mostly up and it lies in the
/// top band of the paddle (15% of its height, at least [`TOP_BAND_MIN`]).
/// One qualifying contact is enough for the whole event.
pub fn is_top_contact(event: &CollisionEvent) -> bool {
    let band = (event.bounds.size().y * TOP_BAND_FRACTION).max(TOP_BAND_MIN);
    let band_floor = event.bounds.max.y - band;

    event
        .contacts
        .iter()
        .any(|c| c.normal.y > TOP_NORMAL_MIN_Y && c.point.y >= band_floor)
}

/// Contact between a circle and a box, if they overlap
///
/// Returns the contact and the penetration depth. When the center is inside
/// the box the normal is taken along the axis of least penetration.
pub fn circle_aabb_contact(center: Vec2, radius: f32, aabb: &Aabb) -> Option<(Contact, f32)> {
    let closest = center.clamp(aabb.min, aabb.max);
    let offset = center - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > 0.0 {
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        return Some((
            Contact {
                normal: offset / dist,
                point: closest,
            },
            radius - dist,
        ));
    }

    // Center inside the box: push out through the nearest face
    let to_min = center - aabb.min;
    let to_max = aabb.max - center;
    let candidates = [
        (to_min.x, Vec2::NEG_X, Vec2::new(aabb.min.x, center.y)),
        (to_max.x, Vec2::X, Vec2::new(aabb.max.x, center.y)),
        (to_min.y, Vec2::NEG_Y, Vec2::new(center.x, aabb.min.y)),
        (to_max.y, Vec2::Y, Vec2::new(center.x, aabb.max.y)),
    ];

    let (depth, normal, point) = candidates
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .unwrap_or((0.0, Vec2::Y, center));

    Some((Contact { normal, point }, depth + radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paddle_bounds() -> Aabb {
        Aabb::from_center(Vec2::new(0.0, 1.0), Vec2::new(2.0, 0.4))
    }

    fn paddle_hit(normal: Vec2, point: Vec2) -> CollisionEvent {
        CollisionEvent::new(ContactTag::Paddle, paddle_bounds(), vec![Contact { normal, point }])
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_head_on_reflection_is_not_nudged() {
        // Reflected (0,-1) against normal (0,1): dot = -1, below the nudge threshold
        let dir = resolve_bounce(Vec2::Y, Vec2::Y);
        assert!((dir - Vec2::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_grazing_reflection_is_nudged_toward_normal() {
        let normal = Vec2::X;
        let incoming = Vec2::new(-0.1, 1.0).normalize();

        let plain = reflect_velocity(incoming, normal).normalize();
        let resolved = resolve_bounce(incoming, normal);

        assert!(plain.dot(normal) > NUDGE_DOT_THRESHOLD);
        assert!((resolved - plain).length() > 0.01);
        // Nudge tilts the heading further away from the wall
        assert!(resolved.x > plain.x);
        assert!((resolved.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cancelled_normals_keep_direction() {
        let dir = Vec2::new(0.6, 0.8);
        assert_eq!(resolve_bounce(dir, Vec2::X + Vec2::NEG_X), dir);
    }

    #[test]
    fn test_aggregated_normal_differs_from_sequential_reflections() {
        // Corner hit: floor and right wall in the same tick
        let dir = Vec2::new(0.8, -0.6);
        let once = resolve_bounce(dir, Vec2::Y + Vec2::NEG_X);
        let twice = resolve_bounce(resolve_bounce(dir, Vec2::Y), Vec2::NEG_X);

        assert!(once.x < 0.0 && once.y > 0.0);
        assert!((once - twice).length() > 0.1);
    }

    #[test]
    fn test_top_contact_requires_upward_normal_and_top_band() {
        let top_y = paddle_bounds().max.y;

        assert!(is_top_contact(&paddle_hit(Vec2::Y, Vec2::new(0.2, top_y))));
        // Side face: normal is horizontal
        assert!(!is_top_contact(&paddle_hit(Vec2::X, Vec2::new(1.0, top_y))));
        // Upward normal but contact well below the band
        assert!(!is_top_contact(&paddle_hit(Vec2::Y, Vec2::new(0.0, 1.0))));
        // Normal only 30 degrees above horizontal
        let shallow = Vec2::new(0.866, 0.5);
        assert!(!is_top_contact(&paddle_hit(shallow, Vec2::new(1.0, top_y))));
    }

    #[test]
    fn test_top_band_has_minimum_thickness() {
        let thin = Aabb::from_center(Vec2::ZERO, Vec2::new(2.0, 0.001));
        let event = CollisionEvent::new(
            ContactTag::Paddle,
            thin,
            vec![Contact {
                normal: Vec2::Y,
                point: Vec2::new(0.0, thin.max.y - 0.009),
            }],
        );
        assert!(is_top_contact(&event));
    }

    #[test]
    fn test_any_contact_in_event_qualifies() {
        let top_y = paddle_bounds().max.y;
        let event = CollisionEvent::new(
            ContactTag::Paddle,
            paddle_bounds(),
            vec![
                Contact { normal: Vec2::X, point: Vec2::new(1.0, 1.0) },
                Contact { normal: Vec2::Y, point: Vec2::new(0.9, top_y) },
            ],
        );
        assert!(is_top_contact(&event));
    }

    #[test]
    fn test_circle_aabb_contact_outside() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 1.0));

        let (contact, depth) = circle_aabb_contact(Vec2::new(1.0, 1.1), 0.2, &aabb).unwrap();
        assert_eq!(contact.normal, Vec2::Y);
        assert_eq!(contact.point, Vec2::new(1.0, 1.0));
        assert!((depth - 0.1).abs() < 1e-5);

        assert!(circle_aabb_contact(Vec2::new(1.0, 1.3), 0.2, &aabb).is_none());
    }

    #[test]
    fn test_circle_aabb_contact_center_inside() {
        let aabb = Aabb::new(Vec2::ZERO, Vec2::new(2.0, 1.0));
        let (contact, depth) = circle_aabb_contact(Vec2::new(1.9, 0.5), 0.1, &aabb).unwrap();
        assert_eq!(contact.normal, Vec2::X);
        assert!((depth - 0.2).abs() < 1e-5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resolved_direction_is_unit(
                angle in 0.0f32..std::f32::consts::TAU,
                normals in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 1..6)
            ) {
                let dir = Vec2::from_angle(angle);
                let sum: Vec2 = normals.iter().map(|&(x, y)| Vec2::new(x, y)).sum();
                let out = resolve_bounce(dir, sum);
                prop_assert!((out.length() - 1.0).abs() < 1e-4, "len = {}", out.length());
            }
        }
    }
}
