//! Client input merging: joystick plus keyboard into movement axes

use macroquad::input::{is_key_down, KeyCode};

/// Vertical axis value while ascending
pub const ASCEND_RATE: f32 = 4.0;
/// Vertical axis value while descending
pub const DESCEND_RATE: f32 = 1.0;
/// Vertical axis value with no vertical input: constant fall, not acceleration
pub const FALL_RATE: f32 = -4.0;
pub const VERTICAL_LIMIT: f32 = 4.0;

/// Discrete key state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub ascend: bool,
    pub descend: bool,
    pub fire: bool,
}

/// Analog stick deflection, nominally in [-1, 1] per axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Joystick {
    pub x: f32,
    pub z: f32,
}

/// Combined movement intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveAxes {
    /// Left/right, [-1, 1]; positive is right
    pub x: f32,
    /// Vertical, [-4, 4]
    pub y: f32,
    /// Back/forward, [-1, 1]; positive is forward
    pub z: f32,
}

impl MoveAxes {
    pub fn has_horizontal(&self) -> bool {
        self.x != 0.0 || self.z != 0.0
    }

    pub fn is_ascending(&self) -> bool {
        self.y > 0.0
    }
}

/// Everything the simulation samples from the player in one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub joystick: Joystick,
    pub keys: KeyState,
}

impl FrameInput {
    pub fn from_keys(keys: KeyState) -> Self {
        Self {
            joystick: Joystick::default(),
            keys,
        }
    }

    pub fn axes(&self) -> MoveAxes {
        combine_axes(self.joystick, self.keys)
    }

    pub fn fire(&self) -> bool {
        self.keys.fire
    }
}

fn stick(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn key_axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

/// Merges stick and keys. Horizontal axes add and clamp to [-1, 1]. The
/// vertical axis is driven by keys only and falls at `FALL_RATE` when
/// neither ascend nor descend is held.
pub fn combine_axes(joystick: Joystick, keys: KeyState) -> MoveAxes {
    let x = (stick(joystick.x) + key_axis(keys.right, keys.left)).clamp(-1.0, 1.0);
    let z = (stick(joystick.z) + key_axis(keys.forward, keys.back)).clamp(-1.0, 1.0);

    let y = if !keys.ascend && !keys.descend {
        FALL_RATE
    } else {
        let ascend = if keys.ascend { ASCEND_RATE } else { 0.0 };
        let descend = if keys.descend { DESCEND_RATE } else { 0.0 };
        (ascend - descend).clamp(-VERTICAL_LIMIT, VERTICAL_LIMIT)
    };

    MoveAxes { x, y, z }
}

/// Reads the keyboard: WASD or arrows to move, E to fly, Q to descend,
/// Space to fire. Only valid inside the macroquad window loop.
pub fn sample_keyboard() -> KeyState {
    KeyState {
        forward: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
        back: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
        left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
        ascend: is_key_down(KeyCode::E),
        descend: is_key_down(KeyCode::Q),
        fire: is_key_down(KeyCode::Space),
    }
}
