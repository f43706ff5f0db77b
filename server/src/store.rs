//! World state store: the single authoritative copy of the shared arena
//!
//! This module owns everything the sessions and background tasks share:
//! - The player roster, keyed by connection id
//! - The live coin set, keyed by coin id
//! - The write-once winner latch
//!
//! No caller touches the maps directly. Every public operation takes the
//! store-wide lock for its whole duration, so each one is atomic with
//! respect to all concurrent readers and writers: snapshots are taken at a
//! single point in time, a coin can be removed at most once, and the
//! winner can be latched at most once. Operations do no I/O, so the lock
//! is never held across anything that blocks.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::config::CHARACTER_PALETTE;
use shared::{overlaps, Coin, GameConfig, Player};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Everything behind the lock.
#[derive(Debug, Default)]
struct World {
    players: HashMap<u32, Player>,
    coins: HashMap<u32, Coin>,
    winner: Option<String>,
    next_player_id: u32,
}

/// Shared world state with atomic operations.
///
/// Cheap to share as `Arc<WorldStore>`; one instance serves every session
/// and background task for the lifetime of the process.
pub struct WorldStore {
    config: GameConfig,
    world: RwLock<World>,
}

impl WorldStore {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            world: RwLock::new(World {
                next_player_id: 1,
                ..World::default()
            }),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Creates and registers a player for a new connection.
    ///
    /// Allocates the next id, places the player at a random spawn point
    /// inside the playfield (kept off the UI chrome by the spawn gutter),
    /// and rolls random cosmetics. Returns the snapshot the session sends
    /// back as its handshake.
    pub async fn register_player(&self) -> Player {
        let mut world = self.world.write().await;
        let id = world.next_player_id;
        world.next_player_id += 1;

        let player = {
            let mut rng = rand::thread_rng();
            let gutter = self.config.player_spawn_gutter;
            let (x0, x1) = self.config.playfield_x(gutter);
            let (y0, y1) = self.config.playfield_y(gutter);

            let mut player = Player::new(id, rng.gen_range(x0..=x1), rng.gen_range(y0..=y1), &self.config);
            if let Some(character) = CHARACTER_PALETTE.choose(&mut rng) {
                player.character = character.to_string();
            }
            player.color = (rng.gen(), rng.gen(), rng.gen());
            player
        };

        info!(
            "Registered {} at ({:.0}, {:.0})",
            player.name, player.x, player.y
        );
        world.players.insert(id, player.clone());
        player
    }

    /// Overwrites a player with the snapshot their client sent.
    ///
    /// The overwrite is wholesale by design: the server trusts the client's
    /// reported transform. Three fields stay authoritative regardless of
    /// what the client claims: `id` and `name` are pinned to the session
    /// (the winner latch is keyed by name), and `score` keeps its stored
    /// value, since only [`try_grab_coin`] may raise it.
    ///
    /// [`try_grab_coin`]: WorldStore::try_grab_coin
    pub async fn upsert_player(&self, id: u32, mut snapshot: Player) {
        let mut world = self.world.write().await;
        snapshot.id = id;
        snapshot.name = Player::display_name(id);
        if let Some(existing) = world.players.get(&id) {
            snapshot.score = existing.score;
        }
        world.players.insert(id, snapshot);
    }

    /// Drops a player when their connection ends.
    pub async fn remove_player(&self, id: u32) {
        let mut world = self.world.write().await;
        if world.players.remove(&id).is_some() {
            info!("Removed player {}", id);
        }
    }

    /// Snapshot of every player except `exclude_id`.
    pub async fn snapshot_opponents(&self, exclude_id: u32) -> HashMap<u32, Player> {
        let world = self.world.read().await;
        world
            .players
            .iter()
            .filter(|(id, _)| **id != exclude_id)
            .map(|(id, player)| (*id, player.clone()))
            .collect()
    }

    /// Snapshot of the full current coin set.
    pub async fn snapshot_coins(&self) -> HashMap<u32, Coin> {
        let world = self.world.read().await;
        world.coins.clone()
    }

    /// Attempts a pickup for the given player this round.
    ///
    /// Scans the coin set in iteration order and takes the first coin that
    /// overlaps the player's pickup circle: the coin is removed, its
    /// multiplier is added to the stored score, and the multiplier is
    /// returned. Returns 0.0 when nothing overlaps (or the player is
    /// already gone). At most one coin is granted per call even if several
    /// overlap; the rest stay for later rounds.
    ///
    /// Removal and the score credit happen under one lock acquisition, so
    /// concurrent grabs of the same coin resolve to exactly one award.
    pub async fn try_grab_coin(&self, id: u32) -> f32 {
        let mut world = self.world.write().await;
        let player = match world.players.get(&id) {
            Some(player) => player.clone(),
            None => return 0.0,
        };

        let grabbed = world
            .coins
            .iter()
            .find(|(_, coin)| overlaps(&player, coin))
            .map(|(coin_id, _)| *coin_id);

        if let Some(coin_id) = grabbed {
            if let Some(coin) = world.coins.remove(&coin_id) {
                debug!(
                    "Player {} grabbed coin {} worth x{:.2}",
                    id, coin_id, coin.multiplier
                );
                if let Some(stored) = world.players.get_mut(&id) {
                    stored.score += coin.multiplier;
                }
                return coin.multiplier;
            }
        }
        0.0
    }

    /// Inserts a coin unless the population cap is already reached.
    ///
    /// Enforcing the cap here rather than in the spawner means the coin
    /// set can never exceed it no matter who inserts.
    pub async fn spawn_coin(&self, coin: Coin) -> bool {
        let mut world = self.world.write().await;
        if world.coins.len() >= self.config.max_coins {
            debug!("Coin population cap reached, skipping spawn");
            return false;
        }

        debug!(
            "Spawned coin {} at ({:.0}, {:.0}) worth x{:.2}",
            coin.id, coin.x, coin.y, coin.multiplier
        );
        world.coins.insert(coin.id, coin);
        true
    }

    /// Latches the winner. Only the first call ever succeeds; the winner
    /// never changes for the rest of the process lifetime.
    pub async fn latch_winner(&self, name: &str) -> bool {
        let mut world = self.world.write().await;
        if world.winner.is_some() {
            return false;
        }
        info!("{} wins the match", name);
        world.winner = Some(name.to_string());
        true
    }

    pub async fn winner(&self) -> Option<String> {
        let world = self.world.read().await;
        world.winner.clone()
    }

    /// Current scores in a stable order (ascending player id).
    pub async fn scores(&self) -> Vec<(String, f32)> {
        let world = self.world.read().await;
        let mut players: Vec<&Player> = world.players.values().collect();
        players.sort_by_key(|player| player.id);
        players
            .iter()
            .map(|player| (player.name.clone(), player.score))
            .collect()
    }

    pub async fn player_count(&self) -> usize {
        let world = self.world.read().await;
        world.players.len()
    }

    pub async fn coin_count(&self) -> usize {
        let world = self.world.read().await;
        world.coins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn test_store() -> WorldStore {
        WorldStore::new(GameConfig::default())
    }

    /// Parks a player at an exact position, bypassing the random spawn.
    async fn place_player(store: &WorldStore, x: f32, y: f32) -> u32 {
        let player = store.register_player().await;
        let mut moved = player.clone();
        moved.x = x;
        moved.y = y;
        store.upsert_player(player.id, moved).await;
        player.id
    }

    #[tokio::test]
    async fn test_register_allocates_sequential_ids() {
        let store = test_store();
        let first = store.register_player().await;
        let second = store.register_player().await;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.player_count().await, 2);
    }

    #[tokio::test]
    async fn test_register_spawns_inside_playfield() {
        let store = test_store();
        let config = store.config().clone();
        let gutter = config.player_spawn_gutter;
        let (x0, x1) = config.playfield_x(gutter);
        let (y0, y1) = config.playfield_y(gutter);

        for _ in 0..20 {
            let player = store.register_player().await;
            assert!(player.x >= x0 && player.x <= x1);
            assert!(player.y >= y0 && player.y <= y1);
        }
    }

    #[tokio::test]
    async fn test_upsert_preserves_id_and_score() {
        let store = test_store();
        let config = store.config().clone();
        let id = place_player(&store, 500.0, 400.0).await;

        let coin = Coin::new(1, 505.0, 405.0, 1.5, config.coin_radius);
        assert!(store.spawn_coin(coin).await);
        assert_approx_eq!(store.try_grab_coin(id).await, 1.5);

        // Client claims a different id and an inflated score.
        let mut forged = Player::new(99, 10.0, 10.0, &config);
        forged.score = 1000.0;
        store.upsert_player(id, forged).await;

        let scores = store.scores().await;
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].0, Player::display_name(id));
        assert_approx_eq!(scores[0].1, 1.5);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_transform() {
        let store = test_store();
        let config = store.config().clone();
        let id = place_player(&store, 500.0, 400.0).await;

        let mut snapshot = Player::new(id, 250.0, 125.0, &config);
        snapshot.facing = shared::Facing::Left;
        store.upsert_player(id, snapshot).await;

        let others = store.snapshot_opponents(0).await;
        let stored = others.get(&id).unwrap();
        assert_eq!(stored.x, 250.0);
        assert_eq!(stored.y, 125.0);
        assert_eq!(stored.facing, shared::Facing::Left);
    }

    #[tokio::test]
    async fn test_opponents_exclude_self() {
        let store = test_store();
        let a = store.register_player().await;
        let b = store.register_player().await;

        let a_view = store.snapshot_opponents(a.id).await;
        assert_eq!(a_view.len(), 1);
        assert!(a_view.contains_key(&b.id));
        assert!(!a_view.contains_key(&a.id));

        let b_view = store.snapshot_opponents(b.id).await;
        assert_eq!(b_view.len(), 1);
        assert!(b_view.contains_key(&a.id));
    }

    #[tokio::test]
    async fn test_grab_scenario() {
        // Player at (500, 400) with width 64, coin at (505, 405): centers
        // are ~38 apart against a 48 pickup reach.
        let store = test_store();
        let config = store.config().clone();
        let id = place_player(&store, 500.0, 400.0).await;

        let coin = Coin::new(7, 505.0, 405.0, 1.0, config.coin_radius);
        assert!(store.spawn_coin(coin).await);

        assert_approx_eq!(store.try_grab_coin(id).await, 1.0);
        assert_eq!(store.coin_count().await, 0);

        // Nothing left to grab.
        assert_eq!(store.try_grab_coin(id).await, 0.0);
    }

    #[tokio::test]
    async fn test_grab_misses_distant_coin() {
        let store = test_store();
        let config = store.config().clone();
        let id = place_player(&store, 200.0, 100.0).await;

        let coin = Coin::new(1, 900.0, 700.0, 1.0, config.coin_radius);
        assert!(store.spawn_coin(coin).await);

        assert_eq!(store.try_grab_coin(id).await, 0.0);
        assert_eq!(store.coin_count().await, 1);
    }

    #[tokio::test]
    async fn test_one_grab_per_round() {
        let store = test_store();
        let config = store.config().clone();
        let id = place_player(&store, 500.0, 400.0).await;

        // Two coins both inside the pickup circle.
        assert!(store.spawn_coin(Coin::new(1, 530.0, 430.0, 1.2, config.coin_radius)).await);
        assert!(store.spawn_coin(Coin::new(2, 535.0, 435.0, 1.4, config.coin_radius)).await);

        let first = store.try_grab_coin(id).await;
        assert!(first > 0.0);
        assert_eq!(store.coin_count().await, 1);

        let second = store.try_grab_coin(id).await;
        assert!(second > 0.0);
        assert_eq!(store.coin_count().await, 0);
    }

    #[tokio::test]
    async fn test_spawn_respects_population_cap() {
        let mut config = GameConfig::default();
        config.max_coins = 3;
        let store = WorldStore::new(config.clone());

        for id in 0..5u32 {
            store
                .spawn_coin(Coin::new(id, 300.0 + id as f32 * 50.0, 300.0, 1.0, config.coin_radius))
                .await;
        }

        assert_eq!(store.coin_count().await, 3);
        assert!(!store.spawn_coin(Coin::new(9, 400.0, 400.0, 1.0, config.coin_radius)).await);
    }

    #[tokio::test]
    async fn test_winner_latches_once() {
        let store = test_store();

        assert!(store.latch_winner("Player 1").await);
        assert!(!store.latch_winner("Player 2").await);
        assert_eq!(store.winner().await.as_deref(), Some("Player 1"));
    }

    #[tokio::test]
    async fn test_scores_are_stable_by_id() {
        let store = test_store();
        for _ in 0..4 {
            store.register_player().await;
        }

        let scores = store.scores().await;
        let names: Vec<&str> = scores.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Player 1", "Player 2", "Player 3", "Player 4"]);
    }

    #[tokio::test]
    async fn test_remove_player() {
        let store = test_store();
        let player = store.register_player().await;
        assert_eq!(store.player_count().await, 1);

        store.remove_player(player.id).await;
        assert_eq!(store.player_count().await, 0);

        // Removing twice is harmless.
        store.remove_player(player.id).await;
    }
}
