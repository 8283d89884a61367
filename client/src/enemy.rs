//! Locally simulated hostile actors.
//!
//! Enemies are never networked: every client runs its own population. An
//! enemy wanders until something comes within sensing range, then turns to
//! face the nearest candidate and fires on a fixed cooldown.

use crate::collision::clamp_to_radius;
use crate::gait::Gait;
use glam::Vec3;
use rand::Rng;

pub const ENEMY_COUNT: usize = 30;
pub const ENEMY_START_HEALTH: i32 = 3;
/// Enemies spawn uniformly within ±this on X and Z
pub const SPAWN_HALF_EXTENT: f32 = 450.0;
pub const SENSE_RADIUS: f32 = 15.0;
/// Ticks between shots once locked on
pub const SHOOT_INTERVAL: u32 = 120;
pub const WANDER_STEP: f32 = 0.05;
/// Per-tick chance to pick a new wander heading
pub const WANDER_TURN_CHANCE: f64 = 0.01;
pub const ENEMY_RESPAWN_DELAY: f64 = 10.0;
/// Horizontal distance at which a shot hits an enemy
pub const ENEMY_HIT_RADIUS: f32 = 1.0;

/// What an enemy is locked onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    LocalActor,
    Enemy(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub position: Vec3,
    pub yaw: f32,
    pub health: i32,
    pub in_scene: bool,
    pub target: Option<Target>,
    pub gait: Gait,
    wander: Vec3,
    shoot_cooldown: u32,
}

impl Enemy {
    /// A fresh enemy at a random point with a random heading.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = Vec3::new(
            rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT),
            0.0,
            rng.gen_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT),
        );
        Self::at(position, random_heading(rng).unwrap_or(Vec3::Z), rng.gen_range(0..SHOOT_INTERVAL))
    }

    pub fn at(position: Vec3, wander: Vec3, shoot_cooldown: u32) -> Self {
        Self {
            position,
            yaw: wander.x.atan2(wander.z),
            health: ENEMY_START_HEALTH,
            in_scene: true,
            target: None,
            gait: Gait::new(),
            wander,
            shoot_cooldown,
        }
    }

    pub fn shoot_cooldown(&self) -> u32 {
        self.shoot_cooldown
    }

    /// Counts the cooldown down one tick. Returns true when the enemy is
    /// ready to fire, and restarts the cooldown.
    pub fn ready_to_fire(&mut self) -> bool {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        if self.shoot_cooldown == 0 {
            self.shoot_cooldown = SHOOT_INTERVAL;
            return true;
        }
        false
    }

    /// Turns to face `point` and returns the unit direction toward it.
    pub fn face(&mut self, point: Vec3) -> Vec3 {
        let direction = (point - self.position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.yaw = direction.x.atan2(direction.z);
        }
        direction
    }

    /// One tick of wandering: step along the current heading, stay inside
    /// the world and occasionally pick a new heading.
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = clamp_to_radius(self.position + self.wander * WANDER_STEP);
        self.yaw = self.wander.x.atan2(self.wander.z);
        if rng.gen_bool(WANDER_TURN_CHANCE) {
            if let Some(heading) = random_heading(rng) {
                self.wander = heading;
            }
        }
    }

    /// Applies one hit. Returns true when it was lethal and the enemy left
    /// the scene.
    pub fn take_hit(&mut self) -> bool {
        if !self.in_scene || self.health <= 0 {
            return false;
        }
        self.health -= 1;
        if self.health > 0 {
            return false;
        }
        self.in_scene = false;
        self.target = None;
        true
    }
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Option<Vec3> {
    let heading = Vec3::new(rng.gen_range(-0.5..0.5), 0.0, rng.gen_range(-0.5..0.5));
    heading.try_normalize()
}

/// Picks what enemy `index` should lock onto: the nearest of the local actor
/// and every other enemy still in the scene, provided it is within
/// `SENSE_RADIUS`. Ties go to the first candidate found, the local actor
/// first.
pub fn acquire_target(
    index: usize,
    enemies: &[Enemy],
    actor_position: Vec3,
    actor_in_scene: bool,
) -> Option<Target> {
    let me = enemies.get(index)?;

    let mut best: Option<(Target, f32)> = None;
    let mut consider = |target: Target, position: Vec3| {
        let distance = me.position.distance(position);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((target, distance));
        }
    };

    if actor_in_scene {
        consider(Target::LocalActor, actor_position);
    }
    for (other, enemy) in enemies.iter().enumerate() {
        if other != index && enemy.in_scene {
            consider(Target::Enemy(other), enemy.position);
        }
    }

    best.filter(|(_, distance)| *distance < SENSE_RADIUS)
        .map(|(target, _)| target)
}
