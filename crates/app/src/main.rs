mod console;
mod extract;
mod onboard;
mod problem;
mod router;
mod telemetry;

use std::net::SocketAddr;

use onboard_util::{load_env_file, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;

    let cors = router::cors_layer(&config.cors_origins)?;
    let state = router::AppState::new(console::ProfileConsole::stdout());

    let addr: SocketAddr = config.bind_addr;
    info!(
        stage = "app",
        %addr,
        env = %config.environment.as_str(),
        origins = ?config.cors_origins,
        "starting HTTP server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state, cors))
        .await
        .map_err(|err| err.into())
}
