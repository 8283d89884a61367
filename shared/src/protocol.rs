//! Relay wire messages.
//!
//! The relay never interprets a transform: it stores the last one a session
//! sent and forwards it. Every message is a small self-contained record, so a
//! dropped message is healed by the next one of the same kind.

use crate::{SessionId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Messages a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMessage {
    /// Requests a new display name. May arrive at any point after connect.
    SetName { name: String },
    /// Latest local transform, sent every tick while joined.
    UpdateTransform {
        transform: Transform,
        #[serde(default)]
        gait: Option<f32>,
    },
}

/// What the relay knows about one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub transform: Transform,
    pub name: String,
    #[serde(default)]
    pub gait: Option<f32>,
}

impl PlayerRecord {
    pub fn new(transform: Transform, name: impl Into<String>) -> Self {
        Self {
            transform,
            name: name.into(),
            gait: None,
        }
    }
}

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full roster, sent once to a new connection. Includes the receiver
    /// itself under `self_id`.
    RosterSnapshot {
        self_id: SessionId,
        players: BTreeMap<SessionId, PlayerRecord>,
    },
    /// Another session connected.
    Joined { id: SessionId, player: PlayerRecord },
    /// A session changed its name. Also echoed to the renaming session.
    NameChanged { id: SessionId, name: String },
    /// Another session moved.
    Moved {
        id: SessionId,
        name: String,
        transform: Transform,
        #[serde(default)]
        gait: Option<f32>,
    },
    /// A session disconnected.
    Left { id: SessionId },
}

impl ServerMessage {
    /// Session the message is about. The snapshot is about its receiver.
    pub fn subject(&self) -> SessionId {
        match self {
            ServerMessage::RosterSnapshot { self_id, .. } => *self_id,
            ServerMessage::Joined { id, .. }
            | ServerMessage::NameChanged { id, .. }
            | ServerMessage::Moved { id, .. }
            | ServerMessage::Left { id } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::RosterSnapshot { .. } => "roster_snapshot",
            ServerMessage::Joined { .. } => "joined",
            ServerMessage::NameChanged { .. } => "name_changed",
            ServerMessage::Moved { .. } => "moved",
            ServerMessage::Left { .. } => "left",
        }
    }
}
