use anyhow::Result;
use axum::Router;
use axum::routing::get;
use clap::Parser;
use huddle_server::{AppState, RelayService, SessionSink, ws_handler};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle-server", about = "Room-based signaling relay")]
struct Args {
    /// Address the relay listens on.
    #[arg(long, default_value = "0.0.0.0:4000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let sessions = SessionSink::new();
    let relay = RelayService::new(Arc::new(sessions.clone()));
    let state = AppState { relay, sessions };

    let app = Router::new().route("/ws", get(ws_handler)).with_state(state);

    info!("Signaling relay listening on http://{}", args.listen);
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
