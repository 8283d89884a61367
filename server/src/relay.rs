//! Relay operations over the session roster.
//!
//! Every operation mutates the roster and returns the messages that should go
//! out, as `Outbound` instructions. The network layer executes them; nothing
//! here touches a socket, so the relay rules can be tested directly.

use crate::roster::Roster;
use log::{debug, warn};
use shared::{ClientMessage, ServerMessage, SessionId, Transform};

/// Delivery instruction produced by a relay operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Deliver to a single session
    Send {
        to: SessionId,
        message: ServerMessage,
    },
    /// Deliver to every connected session except `exclude`
    Broadcast {
        message: ServerMessage,
        exclude: Option<SessionId>,
    },
}

impl Outbound {
    pub fn message(&self) -> &ServerMessage {
        match self {
            Outbound::Send { message, .. } | Outbound::Broadcast { message, .. } => message,
        }
    }

    /// Whether `session` is a recipient of this instruction
    pub fn reaches(&self, session: SessionId) -> bool {
        match self {
            Outbound::Send { to, .. } => *to == session,
            Outbound::Broadcast { exclude, .. } => *exclude != Some(session),
        }
    }
}

/// Authority-less relay state: a roster and the rules for rebroadcasting it
pub struct Relay {
    roster: Roster,
}

impl Relay {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            roster: Roster::new(max_sessions),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Reserves a session id for a new connection, or None when full
    pub fn admit(&mut self) -> Option<SessionId> {
        self.roster.allocate_id()
    }

    /// Registers a session at the origin, sends it the full roster and
    /// announces it to everyone else.
    pub fn on_connect(&mut self, id: SessionId) -> Vec<Outbound> {
        let joined = self.roster.insert(id).record();

        vec![
            Outbound::Send {
                to: id,
                message: ServerMessage::RosterSnapshot {
                    self_id: id,
                    players: self.roster.snapshot(),
                },
            },
            Outbound::Broadcast {
                message: ServerMessage::Joined { id, player: joined },
                exclude: Some(id),
            },
        ]
    }

    /// Applies a decoded client message from `id`
    pub fn handle_message(&mut self, id: SessionId, message: ClientMessage) -> Vec<Outbound> {
        match message {
            ClientMessage::SetName { name } => self.on_set_name(id, name),
            ClientMessage::UpdateTransform { transform, gait } => {
                self.on_update_transform(id, transform, gait)
            }
        }
    }

    /// Renames a session and tells every connection, the sender included.
    pub fn on_set_name(&mut self, id: SessionId, name: String) -> Vec<Outbound> {
        let mut out = self.ensure_registered(id);

        if let Some(session) = self.roster.get_mut(&id) {
            debug!("Session {} renamed to {}", id, name);
            session.name = name.clone();
        }

        out.push(Outbound::Broadcast {
            message: ServerMessage::NameChanged { id, name },
            exclude: None,
        });
        out
    }

    /// Overwrites a session's transform and relays it to everyone else.
    /// The stored gait is replaced as well, even when the update has none.
    pub fn on_update_transform(
        &mut self,
        id: SessionId,
        transform: Transform,
        gait: Option<f32>,
    ) -> Vec<Outbound> {
        let mut out = self.ensure_registered(id);

        let Some(session) = self.roster.get_mut(&id) else {
            return out;
        };
        session.transform = transform;
        session.gait = gait;

        out.push(Outbound::Broadcast {
            message: ServerMessage::Moved {
                id,
                name: session.name.clone(),
                transform,
                gait,
            },
            exclude: Some(id),
        });
        out
    }

    /// Forgets a session and announces its departure. A second disconnect
    /// for the same id produces nothing.
    pub fn on_disconnect(&mut self, id: SessionId) -> Vec<Outbound> {
        match self.roster.remove(&id) {
            Some(_) => vec![Outbound::Broadcast {
                message: ServerMessage::Left { id },
                exclude: Some(id),
            }],
            None => Vec::new(),
        }
    }

    /// Messages from a session the roster does not know re-register it, so
    /// the update is not lost and other clients learn about it first.
    fn ensure_registered(&mut self, id: SessionId) -> Vec<Outbound> {
        if self.roster.contains(&id) {
            return Vec::new();
        }

        warn!("Message from unknown session {}, registering it", id);
        let joined = self.roster.insert(id).record();
        vec![Outbound::Broadcast {
            message: ServerMessage::Joined { id, player: joined },
            exclude: Some(id),
        }]
    }
}
