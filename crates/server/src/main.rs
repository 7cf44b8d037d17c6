use std::sync::Arc;

use anyhow::Context;
use server_api::ApiContext;
use tracing::{info, warn};

mod app_state;
mod config;
mod routes;

use app_state::AppState;
use config::{has_index_page, load_catalog, load_settings, CONFIG_FILE};
use routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, file_error) = load_settings();
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();
    if let Some(error) = file_error {
        warn!(%error, file = CONFIG_FILE, "ignoring unreadable settings file");
    }

    let catalog = load_catalog(&settings)?;
    let source = settings
        .catalog_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in seed".into());
    info!(activities = catalog.len().await, %source, "catalog ready");

    if !has_index_page(&settings.static_dir) {
        warn!(
            static_dir = %settings.static_dir.display(),
            "static directory has no index.html; GET / will redirect to a missing page"
        );
    }

    let state = AppState {
        api: ApiContext::new(catalog),
        static_dir: settings.static_dir.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr = settings.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
