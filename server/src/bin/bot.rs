//! Headless test client: connects, walks a circle, and reports what it sees.
//!
//! Useful for exercising the full protocol without a rendering client:
//! handshake, per-round snapshots, pickups, and the winner announcement.

use clap::Parser;
use shared::{codec, Facing, GameConfig, Player, RoundReply};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:5555")]
    server: String,

    /// Number of rounds to play before disconnecting
    #[arg(short = 'r', long, default_value = "60")]
    rounds: u32,

    /// Radius of the circle the bot walks
    #[arg(long, default_value = "120.0")]
    orbit: f32,

    /// Milliseconds between rounds
    #[arg(short = 'i', long, default_value = "100")]
    interval: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let buffer_size = GameConfig::default().buffer_size;

    println!("Connecting to {}", args.server);
    let mut stream = TcpStream::connect(&args.server).await?;

    // Handshake: the server tells us who and where we are.
    let mut buf = vec![0u8; buffer_size];
    let len = match codec::read_frame(&mut stream, &mut buf).await? {
        Some(len) => len,
        None => {
            println!("Server closed the connection during handshake");
            return Ok(());
        }
    };
    let mut me: Player = codec::decode(&buf[..len])?;
    println!(
        "Joined as {} ({}) at ({:.0}, {:.0})",
        me.name, me.character, me.x, me.y
    );

    let (home_x, home_y) = (me.x, me.y);
    let mut collected = 0.0f32;

    for round in 0..args.rounds {
        // Walk a circle around the spawn point.
        let t = round as f32 / 10.0;
        let next_x = home_x + args.orbit * t.cos();
        me.facing = if next_x < me.x { Facing::Left } else { Facing::Right };
        me.x = next_x;
        me.y = home_y + args.orbit * t.sin();

        codec::write_frame(&mut stream, &me, buffer_size).await?;

        let len = match codec::read_frame(&mut stream, &mut buf).await? {
            Some(len) => len,
            None => {
                println!("Server closed the connection");
                return Ok(());
            }
        };
        let reply: RoundReply = codec::decode(&buf[..len])?;

        if reply.multiplier > 0.0 {
            collected += reply.multiplier;
            println!(
                "Round {}: grabbed a coin worth x{:.2} (total {:.2})",
                round, reply.multiplier, collected
            );
        }

        println!(
            "Round {}: {} opponents, {} coins on the field",
            round,
            reply.opponents.len(),
            reply.coins.len()
        );

        if let Some(winner) = reply.winner {
            println!("{} wins! Bot signing off.", winner);
            return Ok(());
        }

        sleep(Duration::from_millis(args.interval)).await;
    }

    println!("Bot finished after {} rounds, collected {:.2}", args.rounds, collected);
    Ok(())
}
