use crate::gait::Gait;
use crate::input::MoveAxes;
use glam::Vec3;
use shared::Transform;

pub const LOCAL_START_HEALTH: i32 = 10;
pub const WALK_SPEED: f32 = 0.05;
pub const FLY_SPEED: f32 = 0.15;
/// Vertical displacement per unit of the vertical axis, per tick
pub const VERTICAL_STEP: f32 = 0.05;
/// Seconds after a shot before the actor can move or fire again
pub const SHOT_COOLDOWN: f64 = 0.5;
pub const LOCAL_RESPAWN_DELAY: f64 = 5.0;
/// Whole seconds shown on the respawn countdown
pub const RESPAWN_COUNTDOWN: u32 = 5;
/// Height above the actor's feet that shots leave from
pub const MUZZLE_HEIGHT: f32 = 1.5;
/// Distance at which an enemy shot hits the local actor
pub const LOCAL_HIT_RADIUS: f32 = 0.5;

/// The player-controlled character.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalActor {
    pub position: Vec3,
    pub yaw: f32,
    pub health: i32,
    pub kills: u32,
    pub shooting: bool,
    pub in_scene: bool,
    pub gait: Gait,
    /// Seconds left until respawn, while removed
    pub countdown: Option<u32>,
}

impl Default for LocalActor {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalActor {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            health: LOCAL_START_HEALTH,
            kills: 0,
            shooting: false,
            in_scene: true,
            gait: Gait::new(),
            countdown: None,
        }
    }

    /// Flying is three times faster than walking.
    pub fn speed_for(axes: &MoveAxes) -> f32 {
        if axes.is_ascending() {
            FLY_SPEED
        } else {
            WALK_SPEED
        }
    }

    pub fn can_move(&self) -> bool {
        self.in_scene && !self.shooting
    }

    /// Faces the direction of horizontal travel.
    pub fn face(&mut self, axes: &MoveAxes) {
        if axes.has_horizontal() {
            self.yaw = (-axes.x).atan2(axes.z);
        }
    }

    /// Unit direction a shot leaves in.
    pub fn aim(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn muzzle(&self) -> Vec3 {
        Vec3::new(self.position.x, MUZZLE_HEIGHT, self.position.z)
    }

    /// Applies one hit. Returns true when it was lethal and the actor left
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
        self.shooting = false;
        self.gait.reset();
        self.countdown = Some(RESPAWN_COUNTDOWN);
        true
    }

    pub fn tick_countdown(&mut self) {
        if self.in_scene {
            return;
        }
        if let Some(remaining) = self.countdown.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Back at the origin with full health. Kills carry over.
    pub fn respawn(&mut self) {
        self.position = Vec3::ZERO;
        self.health = LOCAL_START_HEALTH;
        self.shooting = false;
        self.in_scene = true;
        self.countdown = None;
        self.gait.reset();
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position.x, self.position.y, self.position.z, self.yaw)
    }
}
