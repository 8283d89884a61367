//! Session registry for the relay server
//!
//! This module owns the server-side record of every connected player:
//! - Session identity assignment and capacity enforcement
//! - Last-known transform, display name and gait phase per session
//! - Roster snapshots for newly connected clients
//!
//! The roster performs no simulation. A session's record only ever changes
//! in response to that session's own messages.

use log::info;
use shared::{default_display_name, PlayerRecord, SessionId, Transform};
use std::collections::{BTreeMap, HashMap};

/// Represents one connected player as the relay sees it
///
/// Each session holds:
/// - The identifier the relay assigned on connect
/// - The transform it most recently reported (origin until it reports one)
/// - Its display name and optional walk-cycle phase
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique session identifier assigned by the relay
    pub id: SessionId,
    /// Last transform received from this session
    pub transform: Transform,
    /// Name shown above this player on every client
    pub name: String,
    /// Limb animation phase, if the client sends one
    pub gait: Option<f32>,
}

impl Session {
    /// Creates a session at the origin with the default display name
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            transform: Transform::origin(),
            name: default_display_name(id),
            gait: None,
        }
    }

    /// Builds the record sent to other clients
    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            transform: self.transform,
            name: self.name.clone(),
            gait: self.gait,
        }
    }
}

/// Registry of all sessions currently known to the relay
///
/// The roster hands out session identifiers, enforces the connection limit,
/// and stores each session's latest state. It is owned by the relay loop and
/// never shared across tasks.
pub struct Roster {
    /// Sessions indexed by their identifier
    sessions: HashMap<SessionId, Session>,
    /// Next identifier handed to a new connection
    next_session_id: SessionId,
    /// Maximum number of concurrent sessions allowed
    max_sessions: usize,
}

impl Roster {
    /// Creates an empty roster with the given capacity
    ///
    /// Session identifiers start from 1 and are never reused within the
    /// lifetime of the process.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            next_session_id: 1,
            max_sessions,
        }
    }

    /// Reserves an identifier for a new connection
    ///
    /// Returns None if the roster is at capacity. The session itself is
    /// created by `insert` once the connection is registered.
    pub fn allocate_id(&mut self) -> Option<SessionId> {
        if self.sessions.len() >= self.max_sessions {
            return None;
        }

        let id = self.next_session_id;
        self.next_session_id += 1;
        Some(id)
    }

    /// Creates a session at the origin, replacing any previous record
    pub fn insert(&mut self, id: SessionId) -> &Session {
        info!("Session {} registered", id);
        if id >= self.next_session_id {
            self.next_session_id = id + 1;
        }
        self.sessions.insert(id, Session::new(id));
        &self.sessions[&id]
    }

    /// Removes a session from the roster
    ///
    /// Returns the removed session, or None if it was already gone. Removing
    /// twice is harmless.
    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            info!("Session {} removed", id);
        }
        removed
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Records for every session, ordered by identifier
    ///
    /// Sent to a new connection so it can create proxies for everyone who
    /// joined before it.
    pub fn snapshot(&self) -> BTreeMap<SessionId, PlayerRecord> {
        self.sessions
            .iter()
            .map(|(id, session)| (*id, session.record()))
            .collect()
    }

    /// Returns the number of registered sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are registered
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_sessions
    }
}
