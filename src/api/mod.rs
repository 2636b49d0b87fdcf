//! Webhook HTTP surface.

pub mod routes;

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::error::Result;
use crate::store::{Database, LibSqlBackend};

pub use routes::{AppState, router};

/// Open the configured database and serve the webhook routes until
/// `shutdown` resolves.
pub async fn serve<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_addr()?;
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Webhook server started");

    axum::serve(listener, router(AppState::new(db)))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
