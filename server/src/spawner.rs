//! Coin spawner background task

use crate::store::WorldStore;
use log::debug;
use rand::Rng;
use shared::{Coin, GameConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Injects coins at randomized intervals until a winner is latched.
///
/// Every tick sleeps a full interval drawn from the configured range,
/// whether or not the population cap is reached; a capped tick is a no-op
/// insert, never a hot loop. The store refuses inserts above the cap, so
/// the check lives there.
pub async fn run(store: Arc<WorldStore>) {
    let mut next_coin_id: u32 = 1;

    while store.winner().await.is_none() {
        let wait = {
            let config = store.config();
            let mut rng = rand::thread_rng();
            rng.gen_range(config.min_spawn_interval..=config.max_spawn_interval)
        };
        sleep(Duration::from_secs_f32(wait)).await;

        if store.winner().await.is_some() {
            break;
        }

        let coin = random_coin(next_coin_id, store.config());
        if store.spawn_coin(coin).await {
            next_coin_id += 1;
        }
    }

    debug!("Coin spawner stopped");
}

/// Rolls a coin at a random playfield position, inset far enough that even
/// the largest coin clears the UI chrome, with a value from [min, max).
fn random_coin(id: u32, config: &GameConfig) -> Coin {
    let mut rng = rand::thread_rng();
    let gutter = config.coin_spawn_gutter();
    let (x0, x1) = config.playfield_x(gutter);
    let (y0, y1) = config.playfield_y(gutter);

    Coin::new(
        id,
        rng.gen_range(x0..=x1),
        rng.gen_range(y0..=y1),
        rng.gen_range(config.multiplier_min..config.multiplier_max),
        config.coin_radius,
    )
}
