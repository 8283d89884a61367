//! Types shared by the relay server and the game client: the wire protocol,
//! its two frame codecs, and the transform record both sides agree on.

use serde::{Deserialize, Serialize};

pub mod codec;
pub mod protocol;

pub use codec::{CodecError, Encoding, WireFrame};
pub use protocol::{ClientMessage, PlayerRecord, ServerMessage};

/// Opaque per-connection identifier assigned by the relay.
pub type SessionId = u32;

/// Radius of the circular playable area, centred on the origin.
pub const WORLD_RADIUS: f32 = 500.0;
/// Highest altitude any actor may reach.
pub const MAX_ALTITUDE: f32 = 200.0;
/// Display names longer than this are truncated by the relay.
pub const MAX_NAME_LEN: usize = 24;
/// Largest coordinate magnitude accepted from the wire.
pub const MAX_COORDINATE: f32 = 1.0e6;
/// HTTP path that upgrades to the relay WebSocket.
pub const RELAY_PATH: &str = "/ws";

/// Position and heading of one player, as relayed between clients.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Heading around the vertical axis, in radians.
    pub yaw: f32,
}

impl Transform {
    pub fn new(x: f32, y: f32, z: f32, yaw: f32) -> Self {
        Self { x, y, z, yaw }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn position(&self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    /// True when every component is finite and within `MAX_COORDINATE`.
    pub fn is_sane(&self) -> bool {
        [self.x, self.y, self.z, self.yaw]
            .iter()
            .all(|v| v.is_finite() && v.abs() <= MAX_COORDINATE)
    }
}

/// Name a session carries until it sends `SetName`.
pub fn default_display_name(id: SessionId) -> String {
    format!("Player{}", id)
}

/// Trims and truncates a requested display name. Returns `None` when nothing
/// printable is left.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_NAME_LEN)
        .collect();
    let trimmed = trimmed.trim_end().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
