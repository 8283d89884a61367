//! # Relay Server Library
//!
//! This library provides the relay server for the multiplayer colony game.
//! The server holds no simulation of its own: it remembers the last transform
//! each connected player reported and forwards every change to the other
//! players, who render it.
//!
//! ## Core Responsibilities
//!
//! ### Session Registry
//! Every WebSocket connection becomes one session with an identifier, a
//! display name and a last-known transform. Sessions start at the origin and
//! are only changed by their own messages.
//!
//! ### Rebroadcasting
//! - A new connection receives the full roster; everyone else hears it joined
//! - Name changes go to every connection, the renaming one included
//! - Transform updates go to everyone except the sender
//! - Disconnects are announced to the remaining connections
//!
//! ### Static Assets
//! Every HTTP path other than the relay endpoint is served from a static
//! directory, so the browser client and the relay share one origin.
//!
//! ## Architecture Design
//!
//! ### Single-Threaded Relay Loop
//! The roster is owned by one task. Connection tasks decode frames and forward
//! them over a channel, so roster mutations happen strictly in receipt order
//! and need no locking.
//!
//! ### Per-Connection Tasks
//! Each socket has a task that decodes inbound frames, writes queued outbound
//! messages in the peer's own encoding (JSON text or bincode binary), and
//! pings the peer. A peer that stays silent past the idle limit is dropped and
//! announced as having left.
//!
//! ### No Delivery Guarantees
//! There are no acknowledgements or retries. A later transform overwrites any
//! missed one, so stale state heals itself.
//!
//! ## Module Organization
//!
//! ### Roster Module (`roster`)
//! Session records, identifier allocation and capacity limits.
//!
//! ### Relay Module (`relay`)
//! The relay rules: connect, rename, move and disconnect, producing
//! delivery instructions without touching the network.
//!
//! ### Network Module (`network`)
//! HTTP/WebSocket serving, the relay loop, and per-connection tasks.
//!
//! ### Config Module (`config`)
//! Bind address, static directory, capacity and liveness settings.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::RelayServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = RelayServer::bind(ServerConfig::default()).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod network;
pub mod relay;
pub mod roster;
