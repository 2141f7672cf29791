mod api;
mod config;
mod data;
mod leaderboard;
mod logging;
mod pipeline;
mod scheduler;
mod server;
mod util;
mod webhook;

use tracing::{info, warn};

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    if std::env::var("RUST_BACKTRACE").is_err() {
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "1");
        }
    }

    let cfg = config::load_config().expect("Could not load config");

    logging::init(&cfg)?;
    info!("Logging initialised. Starting rankcord");

    if cfg.api_key.is_empty() {
        warn!("api_key is empty; the request trigger will answer 403 to everything");
    }

    scheduler::spawn_scheduler(cfg.clone());

    let bind_addr = cfg.bind_addr.clone();
    let app = server::router(server::AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = bind_addr, "Listening for request triggers");

    axum::serve(listener, app).await?;
    Ok(())
}
