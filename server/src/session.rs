//! Per-connection session worker
//!
//! One session per accepted socket, running CONNECTING -> ACTIVE -> CLOSED:
//! register a fresh player and send it back as the handshake, then serve
//! request/reply rounds until the peer disconnects, then clean up. A round
//! that fails to decode is skipped without closing the connection; an I/O
//! failure ends only this session.

use crate::store::WorldStore;
use log::{info, warn};
use shared::{codec, Player, RoundReply};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Runs a full session on an accepted connection.
///
/// Owns the socket for its lifetime. Whatever way the round loop ends,
/// the player is removed from the store before the task finishes, so a
/// dead peer disappears from everyone else's next snapshot.
pub async fn handle_connection(mut stream: TcpStream, addr: SocketAddr, store: Arc<WorldStore>) {
    let player = store.register_player().await;
    let id = player.id;
    info!("{} connected from {}", player.name, addr);

    match serve(&mut stream, player, &store).await {
        Ok(()) => info!("Player {} disconnected", id),
        Err(e) => warn!("Player {} connection error: {}", id, e),
    }

    store.remove_player(id).await;
}

/// Handshake plus the request/reply round loop.
///
/// Generic over the stream so tests can drive it over an in-memory duplex.
async fn serve<S>(stream: &mut S, player: Player, store: &WorldStore) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let id = player.id;
    let buffer_size = store.config().buffer_size;

    // Handshake: the client learns its own starting state.
    codec::write_frame(stream, &player, buffer_size).await?;

    let mut buf = vec![0u8; buffer_size];
    loop {
        let len = match codec::read_frame(stream, &mut buf).await? {
            Some(len) => len,
            // Peer closed cleanly between rounds.
            None => return Ok(()),
        };

        let snapshot: Player = match codec::decode(&buf[..len]) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Player {} sent an undecodable snapshot, skipping round: {}", id, e);
                continue;
            }
        };

        store.upsert_player(id, snapshot).await;
        let multiplier = store.try_grab_coin(id).await;

        let reply = RoundReply {
            winner: store.winner().await,
            opponents: store.snapshot_opponents(id).await,
            coins: store.snapshot_coins().await,
            multiplier,
        };
        codec::write_frame(stream, &reply, buffer_size).await?;
    }
}
