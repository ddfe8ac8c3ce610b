//! TCP serving loop for a remote player.
//!
//! Binds once, then accepts a single connection at a time. Each connection
//! runs a pair of pumps: one drains the engine's state queue onto the socket,
//! the other turns socket lines into moves for the engine. The loop re-accepts
//! after a disconnect for as long as the player is alive, so a dropped client
//! can reconnect mid-game.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::player::{Move, PlayerState};
use crate::protocol::{encode_state, parse_move};

/// Listen address configuration.
#[derive(Debug, Clone)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7171,
        }
    }
}

impl ListenConfig {
    /// Create from environment variables (`BOMBER_HOST`, `BOMBER_PORT`).
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("BOMBER_HOST").unwrap_or(defaults.host);
        let port = env::var("BOMBER_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Listener/reconnection loop.
///
/// Binds the configured address once and reports the bound address through
/// `ready_tx` (useful with port 0). Then serves one connection at a time
/// until the player dies or accepting fails. A bind or accept failure is
/// terminal for this player; the caller reports it.
pub async fn run_listener(
    config: ListenConfig,
    state: Arc<RwLock<PlayerState>>,
    mut update_rx: mpsc::Receiver<PlayerState>,
    move_tx: mpsc::Sender<Move>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("listening on {addr}"))?;
    let bound = listener.local_addr().context("reading bound address")?;
    info!("listening for remote player on {bound}");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    loop {
        let (socket, peer) = listener
            .accept()
            .await
            .context("accepting player connection")?;
        info!("player connected from {peer}");

        serve_connection(socket, &state, &mut update_rx, &move_tx).await;
        info!("player connection {peer} finished");

        if !state.read().alive {
            return Ok(());
        }
    }
}

/// Run the pump pair for one accepted connection and wait for both to exit.
///
/// The receive pump runs as its own task; the send pump runs inline because
/// it needs exclusive use of the state queue across reconnects. Awaiting the
/// receive task afterwards is the join barrier: the outer loop only
/// re-accepts once neither pump touches the shared queues anymore.
async fn serve_connection(
    socket: TcpStream,
    state: &Arc<RwLock<PlayerState>>,
    update_rx: &mut mpsc::Receiver<PlayerState>,
    move_tx: &mpsc::Sender<Move>,
) {
    let (read_half, write_half) = socket.into_split();

    let recv_state = Arc::clone(state);
    let recv_tx = move_tx.clone();
    let recv_task = tokio::spawn(receive_moves(read_half, recv_state, recv_tx));

    send_updates(write_half, state, update_rx).await;
    let _ = recv_task.await;
}

/// Send pump: state queue -> socket.
///
/// Every received state is stored into the shared slot before transmission,
/// so `name()` and liveness checks see it immediately. A turn number equal to
/// the last one sent is not retransmitted. The pump ends when the queue
/// closes, a write fails, or a state with `alive == false` has gone out.
async fn send_updates(
    mut writer: OwnedWriteHalf,
    state: &Arc<RwLock<PlayerState>>,
    update_rx: &mut mpsc::Receiver<PlayerState>,
) {
    // None until the first transmission on this connection; a reconnect
    // deliberately forgets what the previous connection saw.
    let mut last_turn_sent: Option<u64> = None;

    while let Some(update) = update_rx.recv().await {
        *state.write() = update.clone();

        if last_turn_sent == Some(update.turn) {
            continue;
        }

        let line = match encode_state(&update) {
            Ok(line) => line,
            Err(e) => {
                error!("encoding update for player: {e}");
                return;
            }
        };
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            error!("sending update to player: {e}");
            return;
        }
        if let Err(e) = writer.flush().await {
            error!("flushing update to player: {e}");
            return;
        }
        last_turn_sent = Some(update.turn);

        if !update.alive {
            return;
        }
    }
}

/// Receive pump: socket lines -> move queue.
///
/// Unrecognized tokens are logged and skipped; only a read error, EOF, a dead
/// player or a dropped engine-side receiver end the pump. The capacity-1 move
/// queue makes `send` block until the engine consumed the previous move, so a
/// client can never run ahead of the turn loop.
async fn receive_moves(
    read_half: OwnedReadHalf,
    state: Arc<RwLock<PlayerState>>,
    move_tx: mpsc::Sender<Move>,
) {
    let mut lines = BufReader::new(read_half).lines();
    let mut alive = state.read().alive;

    while alive {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("player closed the connection");
                return;
            }
            Err(e) => {
                error!("reading move from connection: {e}");
                return;
            }
        };

        let Some(mv) = parse_move(&line) else {
            error!("invalid move string");
            debug!("move={line:?}");
            continue;
        };

        if move_tx.send(mv).await.is_err() {
            // Engine dropped its move source; nothing left to deliver to.
            return;
        }

        alive = state.read().alive;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_config() {
        let config = ListenConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.addr(), format!("127.0.0.1:{}", config.port));
    }

    #[test]
    fn test_listen_config_from_env_does_not_panic() {
        let _config = ListenConfig::from_env();
    }
}
