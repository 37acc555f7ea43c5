//! HTTP backend: one controller per entity over the SeaORM repositories.

use std::time::Duration;

use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header::CONTENT_TYPE},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

pub mod accounts;
pub mod colaboradores;
pub mod error;
pub mod gerentes;
pub mod imagens;
pub mod multipart;
pub mod pacientes;
pub mod state;
pub mod unidades;


pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::AppConfig;
use crate::db;
use crate::models::Role;
use crate::storage::UploadStore;

/// Photos and scanned documents share one request.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new()
        .merge(unidades::routes())
        .merge(pacientes::routes())
        .merge(colaboradores::routes())
        .merge(gerentes::routes())
        .merge(imagens::routes());

    for role in Role::ALL {
        app = app.merge(accounts::routes(role));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect, prepare storage and serve until Ctrl+C / SIGTERM.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!("Connecting to database...");
    let conn = db::connect(&config.database.connection_string())
        .await
        .context("Failed to connect to database")?;
    db::test_connection(&conn).await.context("Database did not answer")?;

    db::ensure_schema(&conn).await.context("Failed to prepare schema")?;

    if let Ok(version) = db::get_version(&conn).await {
        info!("Database: {}", version);
    }
    if let Ok(counts) = db::get_table_counts(&conn).await {
        info!(
            "Tables: {} unidades, {} pacientes, {} colaboradores, {} gerentes",
            counts.unidades, counts.pacientes, counts.colaboradores, counts.gerentes
        );
    }

    let uploads = UploadStore::new(&config.server.upload_dir);
    uploads
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", uploads.dir()))?;
    info!("Uploads stored in {:?}", uploads.dir());

    let app = router(AppState::new(conn, uploads));

    let address = config.server.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
