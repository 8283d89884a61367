//! Proxies for other players, kept in sync from relay messages.

use log::{debug, info};
use shared::{default_display_name, ServerMessage, SessionId, Transform};
use std::collections::BTreeMap;

/// Last known state of another player
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteProxy {
    pub id: SessionId,
    pub transform: Transform,
    pub name: String,
    pub gait: Option<f32>,
}

impl RemoteProxy {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            transform: Transform::origin(),
            name: default_display_name(id),
            gait: None,
        }
    }
}

/// What applying one relay message did to the proxy set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyChange {
    /// A snapshot replaced the whole set
    Synced { self_id: SessionId, others: usize },
    Created(SessionId),
    Updated(SessionId),
    Removed(SessionId),
    /// The local session was renamed
    SelfRenamed(String),
    Ignored,
}

#[derive(Debug, Default)]
pub struct RemoteProxies {
    self_id: Option<SessionId>,
    self_name: Option<String>,
    proxies: BTreeMap<SessionId, RemoteProxy>,
}

impl RemoteProxies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn self_id(&self) -> Option<SessionId> {
        self.self_id
    }

    /// Name the relay has for the local session, once known
    pub fn self_name(&self) -> Option<&str> {
        self.self_name.as_deref()
    }

    pub fn get(&self, id: SessionId) -> Option<&RemoteProxy> {
        self.proxies.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RemoteProxy> {
        self.proxies.values()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Forgets every proxy and the local identity, as after losing the relay.
    pub fn clear(&mut self) {
        self.self_id = None;
        self.self_name = None;
        self.proxies.clear();
    }

    fn is_self(&self, id: SessionId) -> bool {
        self.self_id == Some(id)
    }

    /// Returns the proxy for `id`, creating it at the origin on first sight.
    fn entry(&mut self, id: SessionId) -> (&mut RemoteProxy, bool) {
        let created = !self.proxies.contains_key(&id);
        let proxy = self.proxies.entry(id).or_insert_with(|| RemoteProxy::new(id));
        (proxy, created)
    }

    pub fn apply(&mut self, message: ServerMessage) -> ProxyChange {
        match message {
            ServerMessage::RosterSnapshot { self_id, players } => {
                self.self_id = Some(self_id);
                self.proxies.clear();
                for (id, record) in players {
                    if id == self_id {
                        self.self_name = Some(record.name);
                        continue;
                    }
                    self.proxies.insert(
                        id,
                        RemoteProxy {
                            id,
                            transform: record.transform,
                            name: record.name,
                            gait: record.gait,
                        },
                    );
                }
                info!("Joined as session {} with {} other players", self_id, self.proxies.len());
                ProxyChange::Synced {
                    self_id,
                    others: self.proxies.len(),
                }
            }
            ServerMessage::Joined { id, player } => {
                if self.is_self(id) {
                    return ProxyChange::Ignored;
                }
                let (proxy, created) = self.entry(id);
                proxy.transform = player.transform;
                proxy.name = player.name;
                proxy.gait = player.gait;
                info!("{} joined", proxy.name);
                if created {
                    ProxyChange::Created(id)
                } else {
                    ProxyChange::Updated(id)
                }
            }
            ServerMessage::NameChanged { id, name } => {
                if self.is_self(id) {
                    self.self_name = Some(name.clone());
                    return ProxyChange::SelfRenamed(name);
                }
                let (proxy, created) = self.entry(id);
                debug!("Session {} is now {}", id, name);
                proxy.name = name;
                if created {
                    ProxyChange::Created(id)
                } else {
                    ProxyChange::Updated(id)
                }
            }
            ServerMessage::Moved {
                id,
                name,
                transform,
                gait,
            } => {
                if self.is_self(id) {
                    return ProxyChange::Ignored;
                }
                let (proxy, created) = self.entry(id);
                proxy.transform = transform;
                proxy.name = name;
                proxy.gait = gait;
                if created {
                    ProxyChange::Created(id)
                } else {
                    ProxyChange::Updated(id)
                }
            }
            ServerMessage::Left { id } => match self.proxies.remove(&id) {
                Some(proxy) => {
                    info!("{} left", proxy.name);
                    ProxyChange::Removed(id)
                }
                None => ProxyChange::Ignored,
            },
        }
    }
}
