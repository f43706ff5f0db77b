//! Static game configuration shared by the server and any client.
//!
//! Everything tunable lives here rather than on the command line: arena
//! geometry, player and coin parameters, spawn pacing, the win threshold,
//! and the network surface. Defaults match the standard playtest setup.

use serde::{Deserialize, Serialize};

/// Sprite sheets a player can be assigned at spawn.
pub const CHARACTER_PALETTE: &[&str] = &["blue", "green", "pink", "purple", "red", "yellow"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Address the listener binds to.
    pub host: String,
    pub port: u16,
    /// Upper bound on a single wire frame, in bytes.
    pub buffer_size: usize,

    // Arena geometry. The playfield is the screen minus the UI chrome:
    // scorecard column on the left, header strip on top, footer on bottom.
    pub screen_width: f32,
    pub screen_height: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub scorecard_width: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_velocity: f32,
    /// Margin kept between a spawn point and the playfield edge.
    pub player_spawn_gutter: f32,

    pub coin_radius: f32,
    /// Coin value range, sampled uniformly as [min, max).
    pub multiplier_min: f32,
    pub multiplier_max: f32,
    /// Population cap for the live coin set.
    pub max_coins: usize,
    /// Spawner sleeps a uniform number of seconds from this range each tick.
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,

    /// First score at or above this latches the winner.
    pub winning_points: f32,
    /// Seconds between win-monitor scans.
    pub monitor_interval: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
            buffer_size: 2048,
            screen_width: 1000.0,
            screen_height: 800.0,
            header_height: 54.0,
            footer_height: 38.0,
            scorecard_width: 166.0,
            player_width: 64.0,
            player_height: 64.0,
            player_velocity: 3.0,
            player_spawn_gutter: 50.0,
            coin_radius: 16.0,
            multiplier_min: 1.0,
            multiplier_max: 1.7,
            max_coins: 5,
            min_spawn_interval: 1.0,
            max_spawn_interval: 5.0,
            winning_points: 20.0,
            monitor_interval: 1.0,
        }
    }
}

impl GameConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Horizontal playfield range for spawning, inset by `gutter` on both
    /// sides so nothing lands under the scorecard or off the right edge.
    pub fn playfield_x(&self, gutter: f32) -> (f32, f32) {
        (self.scorecard_width + gutter, self.screen_width - gutter)
    }

    /// Vertical playfield range for spawning, inset below the header and
    /// above the footer.
    pub fn playfield_y(&self, gutter: f32) -> (f32, f32) {
        (
            self.header_height + gutter,
            self.screen_height - self.footer_height - gutter,
        )
    }

    /// Coins keep their largest possible radius clear of the chrome.
    pub fn coin_spawn_gutter(&self) -> f32 {
        self.coin_radius * self.multiplier_max
    }
}
