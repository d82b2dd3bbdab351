//! userbase - user registration API server

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::path::Path;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userbase::{auth::JwtHandler, build_router, config::Settings, users::UserStore, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let settings = Settings::parse();

    info!("🚀 userbase starting");

    let token_config = settings
        .token_config()
        .context("Invalid token configuration")?;
    if settings.uses_dev_secret() {
        warn!("⚠️  SECRET_KEY not set; using the development secret. CHANGE IT IN PRODUCTION!");
    }

    let user_store = UserStore::open(&settings.database_path)
        .with_context(|| format!("Failed to open database at {}", settings.database_path))?;
    info!("🔐 User store initialized at: {}", settings.database_path);

    let state = AppState::new(
        user_store,
        JwtHandler::new(token_config),
        settings.bcrypt_cost,
    );
    let app = build_router(state);

    let listener = TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind))?;
    info!("🎯 API server listening on {}", settings.bind);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userbase=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // Standard dotenv search (cwd + parents), then the crate root
    let _ = dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
