//! Win monitor background task

use crate::store::WorldStore;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Scans scores at a fixed cadence and latches the winner.
///
/// The first player found at or above the threshold wins; `scores()`
/// returns a stable order, so ties within one tick resolve to the lowest
/// id. The check runs at tick start, so a winning score is observed within
/// one cadence of being reached. The task exits after latching.
pub async fn run(store: Arc<WorldStore>) {
    let threshold = store.config().winning_points;
    let cadence = Duration::from_secs_f32(store.config().monitor_interval);

    loop {
        if store.winner().await.is_some() {
            break;
        }

        let leader = store
            .scores()
            .await
            .into_iter()
            .find(|(_, score)| *score >= threshold);

        if let Some((name, score)) = leader {
            debug!("{} reached {:.2} points (threshold {:.1})", name, score, threshold);
            store.latch_winner(&name).await;
            break;
        }

        sleep(cadence).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Coin, GameConfig};
    use tokio::time::timeout;

    async fn store_with_player_at(config: GameConfig, x: f32, y: f32) -> (Arc<WorldStore>, u32) {
        let store = Arc::new(WorldStore::new(config));
        let player = store.register_player().await;
        let mut moved = player.clone();
        moved.x = x;
        moved.y = y;
        store.upsert_player(player.id, moved).await;
        (store, player.id)
    }

    #[tokio::test]
    async fn test_latches_player_at_exact_threshold() {
        let mut config = GameConfig::default();
        config.winning_points = 2.0;
        let coin_radius = config.coin_radius;
        let (store, id) = store_with_player_at(config, 500.0, 400.0).await;

        // Two 1.0 coins bring the score to exactly the threshold.
        for coin_id in 0..2 {
            assert!(store.spawn_coin(Coin::new(coin_id, 505.0, 405.0, 1.0, coin_radius)).await);
            assert!(store.try_grab_coin(id).await > 0.0);
        }

        timeout(Duration::from_secs(2), run(Arc::clone(&store)))
            .await
            .expect("monitor should latch within one tick");

        assert_eq!(store.winner().await.as_deref(), Some("Player 1"));
    }

    #[tokio::test]
    async fn test_does_not_latch_below_threshold() {
        let mut config = GameConfig::default();
        config.winning_points = 5.0;
        config.monitor_interval = 0.01;
        let coin_radius = config.coin_radius;
        let (store, id) = store_with_player_at(config, 500.0, 400.0).await;

        assert!(store.spawn_coin(Coin::new(1, 505.0, 405.0, 1.0, coin_radius)).await);
        assert!(store.try_grab_coin(id).await > 0.0);

        let monitor = tokio::spawn(run(Arc::clone(&store)));
        sleep(Duration::from_millis(100)).await;

        assert_eq!(store.winner().await, None);

        // Unblock and retire the task.
        store.latch_winner("Player 1").await;
        let _ = timeout(Duration::from_secs(1), monitor).await;
    }

    #[tokio::test]
    async fn test_exits_if_winner_already_latched() {
        let (store, _) = store_with_player_at(GameConfig::default(), 500.0, 400.0).await;
        store.latch_winner("Player 9").await;

        timeout(Duration::from_secs(1), run(Arc::clone(&store)))
            .await
            .expect("monitor should exit immediately");

        assert_eq!(store.winner().await.as_deref(), Some("Player 9"));
    }
}
