mod config;

use std::net::SocketAddr;

use tracing::info;

use serene_api::{AppStateInner, build_router};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "serene=debug,serene_api=debug,serene_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Storage backend is chosen once, here
    let store = serene_db::open_storage(config.db_path.as_deref())?;
    let state = AppStateInner::new(store, config.session_secret, config.production);

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Serene server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
