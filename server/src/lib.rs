//! # Coin Rush Server Library
//!
//! This library provides the authoritative session server for the coin-rush
//! arena game. Any number of clients connect over TCP, each steering one
//! avatar around a shared arena and racing to collect coins until someone
//! crosses the winning score.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative World State
//! The server owns the only copy of the world that matters: every player,
//! every live coin, and the winner flag. Clients report their own movement
//! and the server trusts it, but scoring, coin lifetime, and the winner
//! latch are decided here and only here.
//!
//! ### Session Handling
//! Each accepted connection gets its own worker that registers a fresh
//! player, performs the handshake, and then serves request/reply rounds
//! until the peer goes away. A dying session removes its player and never
//! disturbs the others.
//!
//! ### Background Processes
//! Two long-lived tasks run against the same store as the sessions: the
//! coin spawner injects new coins at randomized intervals, and the win
//! monitor scans scores and latches the winner exactly once.
//!
//! ## Architecture Design
//!
//! ### One Store, Many Workers
//! All shared mutable state is encapsulated in [`store::WorldStore`]; no
//! task ever reaches into the maps directly. Every store operation is
//! individually atomic, which is the entire concurrency story: sessions,
//! the spawner, and the monitor interleave freely, and each operation sees
//! a consistent world. Locks are never held across socket I/O.
//!
//! ### Full-Snapshot Rounds
//! The protocol exchanges whole snapshots every round rather than deltas.
//! At this scale the bandwidth is irrelevant and the simplicity pays for
//! itself: a reply is self-contained and a lost client can simply rejoin.
//!
//! ## Module Organization
//!
//! ### Store Module (`store`)
//! The world state store: player registration and removal, wholesale
//! player upserts with server-side scoring, atomic coin pickup, coin
//! spawning under a population cap, and the write-once winner latch.
//!
//! ### Session Module (`session`)
//! The per-connection worker: handshake, round loop, error handling, and
//! cleanup on disconnect.
//!
//! ### Spawner Module (`spawner`)
//! Background coin generation with randomized pacing. The spawner always
//! waits its full interval, capped or not, and retires once a winner is
//! latched.
//!
//! ### Monitor Module (`monitor`)
//! Background win detection at a fixed cadence. First player found at or
//! above the threshold wins, permanently.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{monitor, session, spawner, store::WorldStore};
//! use shared::GameConfig;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(WorldStore::new(GameConfig::default()));
//!     let listener = TcpListener::bind(store.config().bind_addr()).await?;
//!
//!     tokio::spawn(spawner::run(Arc::clone(&store)));
//!     tokio::spawn(monitor::run(Arc::clone(&store)));
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await?;
//!         tokio::spawn(session::handle_connection(stream, addr, Arc::clone(&store)));
//!     }
//! }
//! ```

pub mod monitor;
pub mod session;
pub mod spawner;
pub mod store;
