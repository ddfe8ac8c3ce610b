//! `TcpPlayer` — the handle the engine registers as a player.
//!
//! Construction spawns the serving loop and returns immediately; a failed
//! bind surfaces as a logged error from the background task, and the player
//! simply never receives a connection. The engine talks to the handle only
//! through the [`Player`] capability.

use std::net::SocketAddr;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

use crate::player::{Move, Player, PlayerState};
use crate::server::{run_listener, ListenConfig};

/// Pending state pushes absorbed before the engine's turn loop would block.
pub const STATE_BUFFER: usize = 10;

/// At most one move buffered ahead of the engine's consumption.
pub const MOVE_BUFFER: usize = 1;

/// A player driven by a remote process over TCP.
pub struct TcpPlayer {
    state: Arc<RwLock<PlayerState>>,
    update_tx: mpsc::Sender<PlayerState>,
    move_rx: mpsc::Receiver<Move>,
    listener: JoinHandle<()>,
    ready_rx: Option<oneshot::Receiver<SocketAddr>>,
}

impl TcpPlayer {
    /// Start serving a remote player on the configured address.
    ///
    /// Non-blocking; must be called within a tokio runtime. The listener loop
    /// runs as an owned background task until the player dies, the accept
    /// loop fails, or [`TcpPlayer::shutdown`] is called.
    pub fn spawn(initial_state: PlayerState, config: ListenConfig) -> Self {
        let state = Arc::new(RwLock::new(initial_state));
        let (update_tx, update_rx) = mpsc::channel(STATE_BUFFER);
        let (move_tx, move_rx) = mpsc::channel(MOVE_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel();

        let task_state = Arc::clone(&state);
        let listener = tokio::spawn(async move {
            if let Err(e) = run_listener(config, task_state, update_rx, move_tx, Some(ready_tx)).await
            {
                error!("serving remote player: {e:#}");
            }
        });

        Self {
            state,
            update_tx,
            move_rx,
            listener,
            ready_rx: Some(ready_rx),
        }
    }

    /// Address the listener actually bound, once it is up.
    ///
    /// Yields `None` if binding failed or the address was already queried.
    pub async fn local_addr(&mut self) -> Option<SocketAddr> {
        match self.ready_rx.take() {
            Some(rx) => rx.await.ok(),
            None => None,
        }
    }

    /// Stop serving this player and tear down the background task.
    pub fn shutdown(self) {
        self.listener.abort();
    }
}

impl Drop for TcpPlayer {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl Player for TcpPlayer {
    fn name(&self) -> String {
        self.state.read().name.clone()
    }

    fn moves(&mut self) -> &mut mpsc::Receiver<Move> {
        &mut self.move_rx
    }

    fn states(&self) -> mpsc::Sender<PlayerState> {
        self.update_tx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_name_reads_initial_state_without_a_connection() {
        let player = TcpPlayer::spawn(
            PlayerState::new("gopher"),
            ListenConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
        );
        assert_eq!(player.name(), "gopher");
        player.shutdown();
    }

    #[tokio::test]
    async fn test_state_sink_buffers_ten_pushes_without_a_consumer() {
        // No client is connected, so nothing drains the queue.
        let player = TcpPlayer::spawn(
            PlayerState::new("gopher"),
            ListenConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
        );

        let sink = player.states();
        for turn in 1..=STATE_BUFFER as u64 {
            let mut state = PlayerState::new("gopher");
            state.turn = turn;
            sink.try_send(state).expect("buffer should absorb this push");
        }

        let mut overflow = PlayerState::new("gopher");
        overflow.turn = 11;
        assert!(matches!(
            sink.try_send(overflow),
            Err(mpsc::error::TrySendError::Full(_))
        ));
        player.shutdown();
    }
}
