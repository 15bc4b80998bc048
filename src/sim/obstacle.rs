//! Breakable obstacles
//!
//! The ball only knows the [`Obstacle`] contract: one `on_hit` per collision
//! event. Health bookkeeping lives with the brick.

use serde::{Deserialize, Serialize};

use super::collision::{Aabb, ObstacleId};

/// Result of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Survived with `hp` left
    Damaged { hp: u32 },
    /// Took its last hit
    Destroyed,
}

/// Anything the ball can break
pub trait Obstacle {
    /// Called exactly once per collision event with the ball
    fn on_hit(&mut self) -> HitOutcome;
}

/// A brick with hit points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: ObstacleId,
    pub bounds: Aabb,
    hp: u32,
    max_hp: u32,
    #[serde(default)]
    destroyed: bool,
}

impl Brick {
    pub fn new(id: ObstacleId, bounds: Aabb, max_hp: u32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            id,
            bounds,
            hp: max_hp,
            max_hp,
            destroyed: false,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Set hit points, optionally changing the maximum; both are clamped to at least 1
    pub fn set_hp(&mut self, hp: u32, max_hp: Option<u32>) {
        if let Some(max_hp) = max_hp {
            self.max_hp = max_hp.max(1);
        }
        self.hp = hp.clamp(1, self.max_hp);
    }
}

impl Obstacle for Brick {
    fn on_hit(&mut self) -> HitOutcome {
        if self.hp > 1 {
            self.hp -= 1;
            HitOutcome::Damaged { hp: self.hp }
        } else {
            self.destroyed = true;
            HitOutcome::Destroyed
        }
    }
}

/// The set of bricks currently in play (sorted by id for determinism)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickField {
    bricks: Vec<Brick>,
}

impl BrickField {
    pub fn new(mut bricks: Vec<Brick>) -> Self {
        bricks.sort_by_key(|b| b.id);
        Self { bricks }
    }

    pub fn insert(&mut self, brick: Brick) {
        let pos = self.bricks.partition_point(|b| b.id < brick.id);
        self.bricks.insert(pos, brick);
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Brick> {
        self.bricks
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bricks[i])
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Brick> {
        match self.bricks.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => Some(&mut self.bricks[i]),
            Err(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    /// Drop destroyed bricks, returning how many were removed
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.bricks.len();
        self.bricks.retain(|b| !b.is_destroyed());
        before - self.bricks.len()
    }

    pub fn remaining(&self) -> usize {
        self.bricks.iter().filter(|b| !b.is_destroyed()).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn brick(id: u32, hp: u32) -> Brick {
        Brick::new(
            ObstacleId(id),
            Aabb::from_center(Vec2::new(id as f32, 10.0), Vec2::new(1.0, 0.5)),
            hp,
        )
    }

    #[test]
    fn test_brick_counts_down_then_breaks() {
        let mut b = brick(1, 3);
        assert_eq!(b.on_hit(), HitOutcome::Damaged { hp: 2 });
        assert_eq!(b.on_hit(), HitOutcome::Damaged { hp: 1 });
        assert!(!b.is_destroyed());
        assert_eq!(b.on_hit(), HitOutcome::Destroyed);
        assert!(b.is_destroyed());
    }

    #[test]
    fn test_set_hp_clamps() {
        let mut b = brick(1, 3);
        b.set_hp(10, None);
        assert_eq!(b.hp(), 3);
        b.set_hp(0, Some(5));
        assert_eq!((b.hp(), b.max_hp()), (1, 5));
        b.set_hp(4, Some(0));
        assert_eq!((b.hp(), b.max_hp()), (1, 1));
    }

    #[test]
    fn test_zero_max_hp_still_takes_one_hit() {
        let mut b = brick(1, 0);
        assert_eq!(b.on_hit(), HitOutcome::Destroyed);
    }

    #[test]
    fn test_field_lookup_and_cleanup() {
        let mut field = BrickField::new(vec![brick(3, 1), brick(1, 2)]);
        field.insert(brick(2, 1));
        let ids: Vec<u32> = field.iter().map(|b| b.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        field.get_mut(ObstacleId(2)).unwrap().on_hit();
        assert_eq!(field.remaining(), 2);
        assert_eq!(field.remove_destroyed(), 1);
        assert!(field.get(ObstacleId(2)).is_none());

        field.get_mut(ObstacleId(1)).unwrap().on_hit();
        field.get_mut(ObstacleId(1)).unwrap().on_hit();
        field.get_mut(ObstacleId(3)).unwrap().on_hit();
        assert!(field.is_cleared());
    }
}
