use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

// Entry point for `cargo run -p web-server`; the `serve` subcommand of the main
// binary does the same thing.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config()?;
    let _guard = configuration::init_tracing(&config.logging)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server host/port")?;
    let state = web_server::AppState::load(&config).context("Failed to load dashboard data")?;
    web_server::run_server(addr, Arc::new(state)).await
}
