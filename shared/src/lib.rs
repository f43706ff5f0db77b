use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod codec;
pub mod config;

pub use config::GameConfig;

/// Sprite facing, mirrored client-side when rendering.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// One connected player's full state.
///
/// The server creates a player at connect time and thereafter overwrites it
/// wholesale with whatever the client reports each round, except for `id`
/// (fixed for the connection) and `score` (incremented server-side only).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Top-left corner of the bounding rectangle.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: f32,
    pub facing: Facing,
    pub score: f32,
    /// Sprite selector, cosmetic only.
    pub character: String,
    /// Accent color, cosmetic only.
    pub color: (u8, u8, u8),
}

impl Player {
    pub fn new(id: u32, x: f32, y: f32, config: &GameConfig) -> Self {
        Self {
            id,
            name: Self::display_name(id),
            x,
            y,
            width: config.player_width,
            height: config.player_height,
            velocity: config.player_velocity,
            facing: Facing::Right,
            score: 0.0,
            character: "blue".to_string(),
            color: (0, 0, 255),
        }
    }

    /// Display name derived from the connection id.
    pub fn display_name(id: u32) -> String {
        format!("Player {}", id)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Pickup shape: a circle of half the bounding width around the center.
    pub fn pickup_radius(&self) -> f32 {
        self.width / 2.0
    }
}

/// A collectible coin. Created once, never moved, removed on pickup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Coin {
    pub id: u32,
    /// Circle center.
    pub x: f32,
    pub y: f32,
    /// Score value awarded on pickup, drawn from [1.0, 1.7) at creation.
    pub multiplier: f32,
    /// Visual and pickup radius, `base_radius * multiplier`.
    pub radius: f32,
}

impl Coin {
    pub fn new(id: u32, x: f32, y: f32, multiplier: f32, base_radius: f32) -> Self {
        Self {
            id,
            x,
            y,
            multiplier,
            radius: base_radius * multiplier,
        }
    }
}

/// Server reply for one request/reply round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoundReply {
    /// Winner's name once somebody crossed the threshold, then permanent.
    pub winner: Option<String>,
    /// Every other live player, keyed by id. Never contains the recipient.
    pub opponents: HashMap<u32, Player>,
    /// The full current coin set, keyed by id.
    pub coins: HashMap<u32, Coin>,
    /// Multiplier awarded this round, 0.0 if nothing was picked up.
    pub multiplier: f32,
}

/// Circle-circle pickup test between a player and a coin.
///
/// Squared distances only, so the result is exact for the inputs and cheap
/// enough to run against the whole coin set every round.
pub fn overlaps(player: &Player, coin: &Coin) -> bool {
    let (cx, cy) = player.center();
    let dx = coin.x - cx;
    let dy = coin.y - cy;
    let reach = player.pickup_radius() + coin.radius;

    dx * dx + dy * dy <= reach * reach
}
