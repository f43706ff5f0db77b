use log::info;
use server::store::WorldStore;
use server::{monitor, session, spawner};
use shared::GameConfig;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Main-method of the application.
/// Binds the listener, starts the background tasks, then accepts
/// connections forever, one session task per client.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = GameConfig::default();
    let store = Arc::new(WorldStore::new(config));

    // Bind failure is fatal: never enter the accept loop on a dead port.
    let listener = TcpListener::bind(store.config().bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    tokio::spawn(spawner::run(Arc::clone(&store)));
    tokio::spawn(monitor::run(Arc::clone(&store)));

    tokio::select! {
        result = accept_loop(listener, store) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

async fn accept_loop(listener: TcpListener, store: Arc<WorldStore>) -> io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        tokio::spawn(session::handle_connection(stream, addr, Arc::clone(&store)));
    }
}
