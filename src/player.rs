//! Engine-facing player capability and the data it exchanges.
//!
//! The engine only ever sees this interface: a name, a source of moves and a
//! sink for per-turn state snapshots. `TcpPlayer` is one implementation;
//! in-process AI players are another.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Snapshot of one player at one turn, produced by the engine.
///
/// Serialized verbatim onto the wire, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub turn: u64,
    pub x: u32,
    pub y: u32,
    pub bombs_available: u32,
    pub max_bombs: u32,
    pub bomb_radius: u32,
    pub alive: bool,
}

impl PlayerState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turn: 0,
            x: 0,
            y: 0,
            bombs_available: 1,
            max_bombs: 1,
            bomb_radius: 2,
            alive: true,
        }
    }
}

/// One move of a player, one per turn. No payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    PlaceBomb,
}

impl Move {
    /// Wire token for this move, as the remote client must spell it.
    pub fn token(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
            Move::PlaceBomb => "bomb",
        }
    }
}

/// A player capability as the engine's turn loop consumes it.
///
/// The move source yields at most one buffered move ahead of consumption;
/// the state sink absorbs up to [`crate::adapter::STATE_BUFFER`] pending
/// pushes before the producer would block.
pub trait Player {
    /// Display name from the most recently known state. Never blocks on I/O.
    fn name(&self) -> String;

    /// Source of moves, consumed one at a time by the engine.
    fn moves(&mut self) -> &mut mpsc::Receiver<Move>;

    /// Sink the engine pushes the latest state into, once per turn.
    fn states(&self) -> mpsc::Sender<PlayerState>;
}
