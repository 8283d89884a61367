//! # Game Client Library
//!
//! This library provides the client side of the multiplayer colony game: a
//! local combat simulation, a relay connection that mirrors other players,
//! and a renderer on top.
//!
//! ## Architecture Overview
//!
//! The relay is a pure forwarder, so almost everything happens here. Each
//! client owns its own world: the buildings, a population of hostile actors,
//! the projectile pool and every timer. Only the local actor's transform is
//! shared, and other players appear as proxies driven by relay messages.
//!
//! ### Fixed-Order Ticks
//! Every frame runs the same steps in the same order: deferred effects,
//! input and shooting, movement, facing and gait, pushing, enemy AI,
//! projectiles, transform emission and finally the camera. A seeded tick is
//! fully deterministic, which is what the tests rely on.
//!
//! ### Deferred Effects
//! Anything that happens "later" (projectile expiry, the end of a shot, enemy
//! and player respawns, the countdown) is queued against the simulation
//! clock and re-checked against current state when it fires.
//!
//! ### Rendering Is Read-Only
//! The renderer only sees entity views and labels; it never mutates the
//! simulation.
//!
//! ## Module Organization
//!
//! ### Input Module (`input`)
//! Joystick and keyboard merging into per-tick movement axes.
//!
//! ### Collision Module (`collision`)
//! Building layout and per-axis movement resolution against it.
//!
//! ### Actor, Enemy and Gait Modules (`actor`, `enemy`, `gait`)
//! The local actor, enemy AI with target acquisition, and the walk cycle.
//!
//! ### Projectile and Scheduler Modules (`projectile`, `scheduler`)
//! The fixed projectile pool and the deferred-effect queue.
//!
//! ### Remote Module (`remote`)
//! Proxies for other players, created on first sight.
//!
//! ### Camera Module (`camera`)
//! Chase camera and screen-space name labels.
//!
//! ### Game Module (`game`)
//! The [`game::Simulation`] that ties the above into one tick.
//!
//! ### Network and Rendering Modules (`network`, `rendering`)
//! Relay connection on a background thread, the frame loop, and drawing.
//!
//! ## Usage Example
//!
//! ```rust
//! use client::game::{Simulation, SimulationConfig};
//! use client::input::{FrameInput, KeyState};
//!
//! let mut simulation = Simulation::new(SimulationConfig {
//!     seed: Some(7),
//!     ..SimulationConfig::default()
//! });
//! simulation.set_joined(true);
//!
//! let forward = FrameInput::from_keys(KeyState {
//!     forward: true,
//!     ..KeyState::default()
//! });
//! let report = simulation.tick(&forward, 1.0 / 60.0);
//! assert!(report.update.is_some());
//! ```

pub mod actor;
pub mod camera;
pub mod collision;
pub mod enemy;
pub mod gait;
pub mod game;
pub mod input;
pub mod network;
pub mod projectile;
pub mod remote;
pub mod rendering;
pub mod scheduler;
