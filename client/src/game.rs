//! Per-frame client simulation.
//!
//! One [`Simulation::tick`] runs the whole frame in a fixed order:
//!
//! 1. fire deferred effects that are due,
//! 2. read input and handle a shot,
//! 3. move the local actor against the buildings,
//! 4. update facing and gait,
//! 5. resolve pushes between the local actor and enemies,
//! 6. run enemy AI,
//! 7. advance projectiles and resolve hits,
//! 8. emit the local transform,
//! 9. move the camera.
//!
//! Everything here is deterministic for a given seed and input sequence. No
//! rendering or network I/O happens inside a tick.

use crate::actor::{
    LocalActor, LOCAL_HIT_RADIUS, LOCAL_RESPAWN_DELAY, RESPAWN_COUNTDOWN, SHOT_COOLDOWN,
    VERTICAL_STEP,
};
use crate::camera::{layout_label, Camera, Label};
use crate::collision::{clamp_to_radius, colony_layout, displacement, resolve_move, Obstacle};
use crate::enemy::{
    acquire_target, Enemy, Target, ENEMY_COUNT, ENEMY_HIT_RADIUS, ENEMY_RESPAWN_DELAY,
};
use crate::gait::is_walking;
use crate::input::FrameInput;
use crate::projectile::{Owner, ProjectilePool, POOL_SIZE, PROJECTILE_SPEED, PROJECTILE_TTL};
use crate::remote::{ProxyChange, RemoteProxies};
use crate::scheduler::{Deferred, Scheduler};
use glam::{Vec2, Vec3};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{ClientMessage, ServerMessage, SessionId};

/// Actors closer than this push each other apart
pub const PUSH_RADIUS: f32 = 1.0;
/// How far each side of a push moves per tick
pub const PUSH_STEP: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub enemy_count: usize,
    pub pool_size: usize,
    /// Fixed seed for reproducible runs; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enemy_count: ENEMY_COUNT,
            pool_size: POOL_SIZE,
            seed: None,
        }
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired(Owner),
    /// Every pool slot was in flight
    ShotDropped(Owner),
    EnemyHit(usize),
    EnemyKilled { index: usize, by_local: bool },
    EnemyRespawned(usize),
    LocalHit { health: i32 },
    LocalKilled,
    Countdown(u32),
    LocalRespawned,
}

#[derive(Debug, Default)]
pub struct TickReport {
    /// Transform update to send to the relay, if one is due
    pub update: Option<ClientMessage>,
    pub events: Vec<GameEvent>,
}

/// Read-only view of one drawable entity
#[derive(Debug, Clone, PartialEq)]
pub enum EntityView {
    Building(Obstacle),
    LocalActor {
        position: Vec3,
        yaw: f32,
        limbs: (f32, f32),
    },
    Enemy {
        index: usize,
        position: Vec3,
        yaw: f32,
        limbs: (f32, f32),
        locked: bool,
    },
    RemoteProxy {
        id: SessionId,
        position: Vec3,
        yaw: f32,
        limb: f32,
    },
    Projectile {
        position: Vec3,
        owner: Owner,
    },
}

/// Numbers the overlay shows
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub health: i32,
    pub kills: u32,
    pub countdown: Option<u32>,
    pub players_online: usize,
}

pub struct Simulation {
    actor: LocalActor,
    enemies: Vec<Enemy>,
    projectiles: ProjectilePool,
    obstacles: Vec<Obstacle>,
    proxies: RemoteProxies,
    scheduler: Scheduler,
    camera: Camera,
    rng: StdRng,
    joined: bool,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let enemies = (0..config.enemy_count)
            .map(|_| Enemy::spawn(&mut rng))
            .collect();

        Self {
            actor: LocalActor::new(),
            enemies,
            projectiles: ProjectilePool::new(config.pool_size),
            obstacles: colony_layout(),
            proxies: RemoteProxies::new(),
            scheduler: Scheduler::new(),
            camera: Camera::default(),
            rng,
            joined: false,
        }
    }

    pub fn actor(&self) -> &LocalActor {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut LocalActor {
        &mut self.actor
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn proxies(&self) -> &RemoteProxies {
        &self.proxies
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Simulation clock in seconds
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    /// Local control and transform updates only run once joined.
    pub fn set_joined(&mut self, joined: bool) {
        self.joined = joined;
    }

    /// Drops every remote proxy and leaves the joined state once the relay
    /// link is gone.
    pub fn disconnect(&mut self) {
        self.proxies.clear();
        self.joined = false;
    }

    /// Applies a relay message to the remote proxies. The roster snapshot
    /// marks the local session as joined.
    pub fn apply_remote(&mut self, message: ServerMessage) -> ProxyChange {
        let change = self.proxies.apply(message);
        if matches!(change, ProxyChange::Synced { .. }) {
            self.joined = true;
        }
        change
    }

    /// Runs one frame. `dt` is the wall time since the previous frame, in
    /// seconds; it only drives the deferred-effect clock, while movement is
    /// applied per tick.
    pub fn tick(&mut self, input: &FrameInput, dt: f64) -> TickReport {
        let mut events = Vec::new();

        self.scheduler.advance(dt);
        for effect in self.scheduler.drain_due() {
            self.apply_deferred(effect, &mut events);
        }

        let mut moved = false;
        if self.joined {
            if input.fire() && self.actor.in_scene && !self.actor.shooting {
                self.fire_local(&mut events);
            }

            if self.actor.can_move() {
                let axes = input.axes();
                let speed = LocalActor::speed_for(&axes);
                let delta = displacement(axes, speed, VERTICAL_STEP);
                let outcome = resolve_move(self.actor.position, delta, axes.y, &self.obstacles);
                if outcome.landed && outcome.position.y < self.actor.position.y {
                    debug!("Touched down on a roof at {:.2}", outcome.position.y);
                }
                self.actor.position = outcome.position;

                self.actor.face(&axes);
                let walking = is_walking(axes.has_horizontal(), self.actor.position.y);
                self.actor.gait.advance(walking);
                moved = true;
            } else {
                self.actor.gait.advance(false);
            }

            self.push_apart();
        }

        self.step_enemies(&mut events);
        self.step_projectiles(&mut events);

        let update = (self.joined && moved).then(|| ClientMessage::UpdateTransform {
            transform: self.actor.transform(),
            gait: Some(self.actor.gait.phase()),
        });

        if self.actor.in_scene {
            self.camera.follow(self.actor.position);
        }

        TickReport { update, events }
    }

    fn apply_deferred(&mut self, effect: Deferred, events: &mut Vec<GameEvent>) {
        match effect {
            Deferred::ExpireProjectile(handle) => {
                self.projectiles.expire(handle);
            }
            Deferred::EndShooting => {
                self.actor.shooting = false;
            }
            Deferred::RespawnEnemy(index) => {
                let removed = self.enemies.get(index).map_or(false, |e| !e.in_scene);
                if removed {
                    self.enemies[index] = Enemy::spawn(&mut self.rng);
                    debug!("Enemy {} respawned", index);
                    events.push(GameEvent::EnemyRespawned(index));
                }
            }
            Deferred::RespawnLocalActor => {
                if !self.actor.in_scene {
                    self.actor.respawn();
                    self.camera.follow(self.actor.position);
                    info!("Back in action");
                    events.push(GameEvent::LocalRespawned);
                }
            }
            Deferred::CountdownStep => {
                if !self.actor.in_scene {
                    self.actor.tick_countdown();
                    if let Some(remaining) = self.actor.countdown {
                        events.push(GameEvent::Countdown(remaining));
                    }
                }
            }
        }
    }

    fn fire_local(&mut self, events: &mut Vec<GameEvent>) {
        let velocity = self.actor.aim() * PROJECTILE_SPEED;
        match self.projectiles.fire(Owner::LocalActor, self.actor.muzzle(), velocity) {
            Some(handle) => {
                self.scheduler
                    .schedule(PROJECTILE_TTL, Deferred::ExpireProjectile(handle));
                self.actor.shooting = true;
                self.scheduler.schedule(SHOT_COOLDOWN, Deferred::EndShooting);
                events.push(GameEvent::ShotFired(Owner::LocalActor));
            }
            None => events.push(GameEvent::ShotDropped(Owner::LocalActor)),
        }
    }

    /// Pushes the local actor and any enemy closer than `PUSH_RADIUS` apart
    /// along the ground plane.
    fn push_apart(&mut self) {
        if !self.actor.in_scene {
            return;
        }
        for enemy in self.enemies.iter_mut().filter(|e| e.in_scene) {
            if self.actor.position.distance(enemy.position) >= PUSH_RADIUS {
                continue;
            }
            let away = self.actor.position - enemy.position;
            let direction = Vec3::new(away.x, 0.0, away.z).normalize_or_zero();
            self.actor.position = clamp_to_radius(self.actor.position + direction * PUSH_STEP);
            enemy.position = clamp_to_radius(enemy.position - direction * PUSH_STEP);
        }
    }

    fn step_enemies(&mut self, events: &mut Vec<GameEvent>) {
        for index in 0..self.enemies.len() {
            if !self.enemies[index].in_scene {
                continue;
            }

            let target = acquire_target(
                index,
                &self.enemies,
                self.actor.position,
                self.actor.in_scene,
            );
            let aim_point = target.map(|t| match t {
                Target::LocalActor => self.actor.position,
                Target::Enemy(other) => self.enemies[other].position,
            });

            let enemy = &mut self.enemies[index];
            enemy.target = target;

            let Some(point) = aim_point else {
                enemy.wander(&mut self.rng);
                enemy.gait.advance(true);
                continue;
            };

            enemy.gait.advance(false);
            let direction = enemy.face(point);
            if !enemy.ready_to_fire() || direction == Vec3::ZERO {
                continue;
            }

            let owner = Owner::Enemy(index);
            match self
                .projectiles
                .fire(owner, enemy.position, direction * PROJECTILE_SPEED)
            {
                Some(handle) => {
                    self.scheduler
                        .schedule(PROJECTILE_TTL, Deferred::ExpireProjectile(handle));
                    events.push(GameEvent::ShotFired(owner));
                }
                None => events.push(GameEvent::ShotDropped(owner)),
            }
        }
    }

    fn step_projectiles(&mut self, events: &mut Vec<GameEvent>) {
        self.projectiles.integrate();

        let in_flight: Vec<(usize, Owner, Vec3)> = self
            .projectiles
            .active()
            .map(|(slot, p)| (slot, p.owner, p.position))
            .collect();

        for (slot, owner, position) in in_flight {
            if self.hit_enemy(slot, owner, position, events) {
                continue;
            }

            if owner == Owner::LocalActor || !self.actor.in_scene {
                continue;
            }
            if position.distance(self.actor.position) < LOCAL_HIT_RADIUS {
                self.projectiles.deactivate(slot);
                if self.actor.take_hit() {
                    self.local_killed(events);
                } else {
                    events.push(GameEvent::LocalHit {
                        health: self.actor.health,
                    });
                }
            }
        }
    }

    /// Enemy hits ignore height: only the ground-plane distance counts.
    fn hit_enemy(
        &mut self,
        slot: usize,
        owner: Owner,
        position: Vec3,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let flat = Vec2::new(position.x, position.z);
        let victim = self.enemies.iter().enumerate().position(|(index, enemy)| {
            enemy.in_scene
                && owner != Owner::Enemy(index)
                && flat.distance(Vec2::new(enemy.position.x, enemy.position.z)) < ENEMY_HIT_RADIUS
        });
        let Some(index) = victim else {
            return false;
        };

        self.projectiles.deactivate(slot);
        events.push(GameEvent::EnemyHit(index));

        if self.enemies[index].take_hit() {
            let by_local = owner == Owner::LocalActor;
            if by_local {
                self.actor.kills += 1;
            }
            self.scheduler
                .schedule(ENEMY_RESPAWN_DELAY, Deferred::RespawnEnemy(index));
            debug!("Enemy {} down", index);
            events.push(GameEvent::EnemyKilled { index, by_local });
        }
        true
    }

    fn local_killed(&mut self, events: &mut Vec<GameEvent>) {
        info!("Local actor eliminated, respawning in {}s", RESPAWN_COUNTDOWN);
        for second in 1..=RESPAWN_COUNTDOWN {
            self.scheduler.schedule(second as f64, Deferred::CountdownStep);
        }
        self.scheduler
            .schedule(LOCAL_RESPAWN_DELAY, Deferred::RespawnLocalActor);
        events.push(GameEvent::LocalKilled);
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.actor.health,
            kills: self.actor.kills,
            countdown: self.actor.countdown,
            players_online: self.proxies.len() + usize::from(self.joined),
        }
    }

    /// Everything currently in the scene, buildings first.
    pub fn entities(&self) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = self
            .obstacles
            .iter()
            .map(|o| EntityView::Building(*o))
            .collect();

        if self.actor.in_scene {
            views.push(EntityView::LocalActor {
                position: self.actor.position,
                yaw: self.actor.yaw,
                limbs: self.actor.gait.limb_angles(),
            });
        }

        for (index, enemy) in self.enemies.iter().enumerate().filter(|(_, e)| e.in_scene) {
            views.push(EntityView::Enemy {
                index,
                position: enemy.position,
                yaw: enemy.yaw,
                limbs: enemy.gait.limb_angles(),
                locked: enemy.target.is_some(),
            });
        }

        for proxy in self.proxies.iter() {
            views.push(EntityView::RemoteProxy {
                id: proxy.id,
                position: proxy.transform.position(),
                yaw: proxy.transform.yaw,
                limb: proxy.gait.unwrap_or(0.0),
            });
        }

        for (_, projectile) in self.projectiles.active() {
            views.push(EntityView::Projectile {
                position: projectile.position,
                owner: projectile.owner,
            });
        }

        views
    }

    /// Name labels for the local actor and every remote proxy.
    pub fn labels(&self, viewport: Vec2) -> Vec<Label> {
        let mut labels = Vec::new();

        if self.joined && self.actor.in_scene {
            let name = self.proxies.self_name().unwrap_or("You");
            labels.extend(layout_label(&self.camera, self.actor.position, name, viewport));
        }

        for proxy in self.proxies.iter() {
            labels.extend(layout_label(
                &self.camera,
                proxy.transform.position(),
                &proxy.name,
                viewport,
            ));
        }

        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{ENEMY_START_HEALTH, SHOOT_INTERVAL};
    use crate::input::KeyState;
    use assert_approx_eq::assert_approx_eq;
    use shared::{PlayerRecord, Transform};

    fn quiet_world(enemy_count: usize) -> Simulation {
        let mut sim = Simulation::new(SimulationConfig {
            enemy_count,
            pool_size: POOL_SIZE,
            seed: Some(42),
        });
        sim.set_joined(true);
        sim
    }

    fn fire() -> FrameInput {
        FrameInput::from_keys(KeyState {
            fire: true,
            ..KeyState::default()
        })
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    #[test]
    fn test_spawns_configured_population() {
        let sim = Simulation::new(SimulationConfig {
            seed: Some(1),
            ..SimulationConfig::default()
        });
        assert_eq!(sim.enemies().len(), ENEMY_COUNT);
        assert_eq!(sim.projectiles().capacity(), POOL_SIZE);
        assert_eq!(sim.obstacles().len(), 8);
        assert!(!sim.is_joined());
    }

    #[test]
    fn test_no_updates_before_joining() {
        let mut sim = Simulation::new(SimulationConfig {
            enemy_count: 0,
            seed: Some(1),
            ..SimulationConfig::default()
        });
        assert!(sim.tick(&idle(), 0.016).update.is_none());

        let mut players = std::collections::BTreeMap::new();
        players.insert(1, PlayerRecord::new(Transform::origin(), "Player1"));
        sim.apply_remote(ServerMessage::RosterSnapshot {
            self_id: 1,
            players,
        });
        assert!(sim.is_joined());

        let report = sim.tick(&idle(), 0.016);
        match report.update {
            Some(ClientMessage::UpdateTransform { transform, gait }) => {
                assert_eq!(transform, Transform::origin());
                assert_eq!(gait, Some(0.0));
            }
            other => panic!("Expected a transform update, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_forward() {
        let mut sim = quiet_world(0);
        let forward = FrameInput::from_keys(KeyState {
            forward: true,
            ..KeyState::default()
        });
        for _ in 0..7 {
            sim.tick(&forward, 0.016);
        }
        assert_approx_eq!(sim.actor().position.z, 0.35, 1e-4);
        assert_eq!(sim.actor().position.y, 0.0);
        assert_ne!(sim.actor().gait.phase(), 0.0);
        assert_eq!(sim.camera().position, sim.actor().position + crate::camera::FOLLOW_OFFSET);
    }

    #[test]
    fn test_shooting_blocks_movement_and_updates() {
        let mut sim = quiet_world(0);
        let report = sim.tick(&fire(), 0.125);
        assert!(report.events.contains(&GameEvent::ShotFired(Owner::LocalActor)));
        assert!(report.update.is_none());
        assert!(sim.actor().shooting);

        // Still locked out before the cooldown passes.
        let report = sim.tick(&fire(), 0.25);
        assert!(report.events.is_empty());
        assert!(report.update.is_none());

        let report = sim.tick(&idle(), 0.25);
        assert!(!sim.actor().shooting);
        assert!(report.update.is_some());
    }

    #[test]
    fn test_pool_caps_shots() {
        let mut sim = quiet_world(0);
        let mut dropped = 0;
        for _ in 0..POOL_SIZE + 5 {
            sim.actor_mut().shooting = false;
            let report = sim.tick(&fire(), 0.0);
            dropped += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::ShotDropped(_)))
                .count();
        }
        assert_eq!(sim.projectiles().active_count(), POOL_SIZE);
        assert_eq!(dropped, 5);
    }

    #[test]
    fn test_projectiles_expire() {
        let mut sim = quiet_world(0);
        sim.tick(&fire(), 0.0);
        assert_eq!(sim.projectiles().active_count(), 1);

        sim.tick(&idle(), PROJECTILE_TTL - 0.5);
        assert_eq!(sim.projectiles().active_count(), 1);
        sim.tick(&idle(), 0.5);
        assert_eq!(sim.projectiles().active_count(), 0);
    }

    #[test]
    fn test_three_shots_kill_then_respawn() {
        let mut sim = quiet_world(1);
        sim.enemies_mut()[0] = Enemy::at(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, SHOOT_INTERVAL);

        let mut kill_events = 0;
        for _ in 0..60 {
            let report = sim.tick(&fire(), 0.1);
            kill_events += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { by_local: true, .. }))
                .count();
            if !sim.enemies()[0].in_scene {
                break;
            }
        }

        assert_eq!(kill_events, 1);
        assert!(!sim.enemies()[0].in_scene);
        assert_eq!(sim.actor().kills, 1);

        // Removed exactly once, back after the respawn delay.
        for _ in 0..9 {
            sim.tick(&idle(), 1.0);
        }
        assert!(!sim.enemies()[0].in_scene);
        sim.tick(&idle(), 1.5);
        assert!(sim.enemies()[0].in_scene);
        assert_eq!(sim.enemies()[0].health, ENEMY_START_HEALTH);
        assert_eq!(sim.actor().kills, 1);
    }

    #[test]
    fn test_double_hit_in_one_tick_kills_once() {
        let mut sim = quiet_world(1);
        let mut enemy = Enemy::at(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, SHOOT_INTERVAL);
        enemy.health = 1;
        sim.enemies_mut()[0] = enemy;

        let muzzle = Vec3::new(0.0, 1.5, 4.5);
        let velocity = Vec3::new(0.0, 0.0, PROJECTILE_SPEED);
        for _ in 0..2 {
            assert!(sim.projectiles.fire(Owner::LocalActor, muzzle, velocity).is_some());
        }
        assert_eq!(sim.scheduler.pending_len(), 0);

        let report = sim.tick(&idle(), 0.016);
        let killed = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyKilled { index: 0, by_local: true }))
            .count();
        let hits = report
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyHit(0)))
            .count();

        assert_eq!(killed, 1);
        assert_eq!(hits, 1);
        assert_eq!(sim.actor().kills, 1);
        assert!(!sim.enemies()[0].in_scene);
        assert_eq!(sim.scheduler.pending_len(), 1);
        // The second shot found nothing left to hit.
        assert_eq!(sim.projectiles().active_count(), 1);

        let mut respawns = 0;
        for _ in 0..12 {
            let report = sim.tick(&idle(), 1.0);
            respawns += report
                .events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyRespawned(0)))
                .count();
        }
        assert_eq!(respawns, 1);
        assert_eq!(sim.actor().kills, 1);
    }

    #[test]
    fn test_disconnect_drops_proxies() {
        let mut sim = quiet_world(0);
        let mut players = std::collections::BTreeMap::new();
        players.insert(1, PlayerRecord::new(Transform::origin(), "Ares"));
        players.insert(2, PlayerRecord::new(Transform::new(0.0, 0.0, 10.0, 0.0), "Phobos"));
        players.insert(3, PlayerRecord::new(Transform::new(5.0, 0.0, 10.0, 0.0), "Deimos"));
        sim.apply_remote(ServerMessage::RosterSnapshot {
            self_id: 1,
            players,
        });
        assert_eq!(sim.hud().players_online, 3);

        sim.disconnect();

        assert!(!sim.is_joined());
        assert!(sim.proxies().is_empty());
        assert_eq!(sim.hud().players_online, 0);
        assert!(sim.labels(Vec2::new(800.0, 600.0)).is_empty());
        assert!(sim.tick(&idle(), 0.016).update.is_none());
    }

    #[test]
    fn test_local_respawn_after_five_seconds() {
        let mut sim = quiet_world(1);
        sim.actor_mut().health = 1;
        sim.enemies_mut()[0] = Enemy::at(Vec3::new(0.0, 0.0, 3.0), Vec3::Z, 0);

        let mut killed = false;
        for _ in 0..10 {
            let report = sim.tick(&idle(), 0.0);
            if report.events.contains(&GameEvent::LocalKilled) {
                killed = true;
                break;
            }
        }
        assert!(killed);
        assert!(!sim.actor().in_scene);
        assert_eq!(sim.actor().countdown, Some(RESPAWN_COUNTDOWN));
        assert!(sim.entities().iter().all(|e| !matches!(e, EntityView::LocalActor { .. })));

        for second in 1..RESPAWN_COUNTDOWN {
            let report = sim.tick(&idle(), 1.0);
            assert!(!sim.actor().in_scene);
            assert!(report.update.is_none());
            assert_eq!(sim.actor().countdown, Some(RESPAWN_COUNTDOWN - second));
        }

        let report = sim.tick(&idle(), 1.0);
        assert!(report.events.contains(&GameEvent::LocalRespawned));
        assert!(sim.actor().in_scene);
        assert_eq!(sim.actor().position, Vec3::ZERO);
        assert_eq!(sim.actor().health, crate::actor::LOCAL_START_HEALTH);
        assert_eq!(sim.actor().countdown, None);
    }

    #[test]
    fn test_push_apart() {
        let mut sim = quiet_world(1);
        sim.enemies_mut()[0] = Enemy::at(Vec3::new(0.5, 0.0, 0.0), Vec3::Z, SHOOT_INTERVAL);

        sim.tick(&idle(), 0.016);

        assert_approx_eq!(sim.actor().position.x, -PUSH_STEP, 1e-5);
        assert_approx_eq!(sim.enemies()[0].position.x, 0.5 + PUSH_STEP, 1e-5);
        assert_eq!(sim.enemies()[0].target, Some(Target::LocalActor));
    }

    #[test]
    fn test_labels_follow_proxies() {
        let mut sim = quiet_world(0);
        let mut players = std::collections::BTreeMap::new();
        players.insert(1, PlayerRecord::new(Transform::origin(), "Ares"));
        players.insert(2, PlayerRecord::new(Transform::new(0.0, 0.0, 10.0, 0.0), "Phobos"));
        sim.apply_remote(ServerMessage::RosterSnapshot {
            self_id: 1,
            players,
        });
        sim.tick(&idle(), 0.016);

        let labels = sim.labels(Vec2::new(800.0, 600.0));
        let names: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(names, vec!["Ares", "Phobos"]);
        assert_eq!(sim.hud().players_online, 2);
    }

    #[test]
    fn test_same_seed_same_world() {
        let config = SimulationConfig {
            seed: Some(9),
            ..SimulationConfig::default()
        };
        let mut a = Simulation::new(config.clone());
        let mut b = Simulation::new(config);
        for _ in 0..200 {
            a.tick(&idle(), 0.016);
            b.tick(&idle(), 0.016);
        }
        assert_eq!(a.enemies(), b.enemies());
    }
}
