pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use std::net::SocketAddr;
use std::sync::Arc;

use domain::a001_waitlist_entry::repository::SqliteWaitlistStore;
use domain::a001_waitlist_entry::store::{InMemoryWaitlistStore, WaitlistStore};
use shared::config::{self, Config, StorageKind};

/// Хранилище по конфигурации: SQLite-файл или память процесса
async fn build_store(cfg: &Config) -> anyhow::Result<Arc<dyn WaitlistStore>> {
    match cfg.storage.kind {
        StorageKind::Sqlite => {
            let db_path = config::get_database_path(cfg);
            let conn = shared::data::db::initialize_database(&db_path)
                .await
                .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;
            Ok(Arc::new(SqliteWaitlistStore::new(conn)))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage: entries are lost on restart");
            Ok(Arc::new(InMemoryWaitlistStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    let cfg = config::load_config()?;
    system::tracing::initialize(&config::resolve_path(&cfg.logging.dir))?;

    let store = build_store(&cfg).await?;
    let state = routes::AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let mut app = routes::configure_routes(state);

    if let Some(static_dir) = &cfg.server.static_dir {
        let static_dir = config::resolve_path(static_dir);
        tracing::info!("Serving static files from: {}", static_dir.display());
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    let app = app
        .layer(cors)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address: {e}"))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
