//! Player remote control for xmms-shell.
//!
//! [`Player`] is the control surface every command talks to. Two
//! implementations ship here: [`MemoryPlayer`], a self-contained simulated
//! player, and [`RemotePlayer`], which drives a player endpoint over a
//! line-delimited JSON protocol on TCP. [`server::serve`] exposes any
//! `Player` on such an endpoint.

pub mod client;
pub mod memory;
pub mod player;
pub mod protocol;
pub mod server;

pub use client::RemotePlayer;
pub use memory::{MemoryPlayer, MemoryState, Track};
pub use player::{EQ_BANDS, PlayMode, PlaybackInfo, Player, Window};
