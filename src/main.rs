use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hotdog_oracle::{api, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // -----------------------------
    // Config / shared state
    // -----------------------------
    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config).await?;

    info!(
        db = %config.profile_db_path.display(),
        images = %config.image_storage_dir.display(),
        model = %state.story.model(),
        "state initialised"
    );

    // -----------------------------
    // Router
    // -----------------------------
    let app = api::app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("🌭 HTTP listening on http://{}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
