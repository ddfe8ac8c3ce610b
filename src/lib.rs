//! Bomber TCP — remote player adapter for a bomberman-style game engine.
//!
//! Lets a remote process act as a player over a **line-delimited JSON
//! protocol** on TCP. The engine registers a [`TcpPlayer`] like any other
//! [`Player`]: it pushes one [`PlayerState`] snapshot per turn into the state
//! sink and consumes [`Move`]s from the move source; the adapter owns the
//! socket.
//!
//! # Protocol
//!
//! - Adapter → client: one JSON object per line, the full state snapshot.
//! - Client → adapter: one bare move token per line, one of `up`, `down`,
//!   `left`, `right`, `bomb`. Unrecognized lines are logged and ignored.
//!
//! One connection is served at a time; a disconnected client may reconnect
//! while the player is still alive. Moves are rate-limited to one buffered
//! move per turn, and up to ten state updates are absorbed when the network
//! is slow.
//!
//! # Environment variables
//!
//! - `BOMBER_HOST`: bind address (default `127.0.0.1`)
//! - `BOMBER_PORT`: port number (default `7171`)

pub mod adapter;
pub mod player;
pub mod protocol;
pub mod server;

pub use adapter::{TcpPlayer, MOVE_BUFFER, STATE_BUFFER};
pub use player::{Move, Player, PlayerState};
pub use server::ListenConfig;
