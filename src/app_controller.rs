use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::app_config::Config;
use crate::database::DatabaseConnection;
use crate::errors::AppError;
use crate::gateway::{GoodreadsClient, RatingGateway, UnconfiguredGateway};
use crate::importer::{CatalogImporter, ImportSummary};
use crate::session::SessionManager;
use crate::web::{self, AppState};

/// Wires configuration, store, gateway and sessions together
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller; invalid configuration is a fatal error
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    /// Open the store named by the configured connection string
    pub fn open_database(&self) -> Result<DatabaseConnection> {
        DatabaseConnection::open(&self.config.database.url)
            .with_context(|| format!("Failed to open store {}", self.config.database.url))
    }

    /// Rating gateway for this deployment
    pub fn build_gateway(&self) -> Result<Arc<dyn RatingGateway>> {
        if !self.config.gateway.is_enabled() {
            warn!("No rating service API key configured, book pages will show no statistics");
            return Ok(Arc::new(UnconfiguredGateway));
        }

        let client = GoodreadsClient::new(&self.config.gateway)?;
        info!("Rating service: {}", self.config.gateway.endpoint);
        Ok(Arc::new(client))
    }

    /// Handler state sharing one store connection
    pub fn build_state(&self, db: DatabaseConnection) -> Result<AppState> {
        Ok(AppState::new(
            db,
            SessionManager::new(self.config.session.clone()),
            self.build_gateway()?,
            self.config.password_cost,
        ))
    }

    /// Serve HTTP until Ctrl-C
    pub async fn serve(&self) -> Result<()> {
        let db = self.open_database()?;
        match db.stats() {
            Ok(stats) => info!("Store ready: {}", stats),
            Err(e) => warn!("Could not read store statistics: {:#}", e),
        }

        let state = self.build_state(db)?;
        let purge_task = state.sessions.spawn_purge_task();

        let listener = TcpListener::bind(self.config.server.bind_addr.as_str())
            .await
            .with_context(|| format!("Failed to bind {}", self.config.server.bind_addr))?;
        info!("Listening on http://{}", listener.local_addr()?);

        let result = axum::serve(listener, web::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed");

        purge_task.abort();
        info!("Server stopped");
        result
    }

    /// Load a catalog CSV file into the store
    pub async fn import_catalog<P: AsRef<Path>>(&self, path: P, show_progress: bool) -> Result<ImportSummary> {
        let db = self.open_database()?;
        let summary = CatalogImporter::new(db.clone())
            .with_progress(show_progress)
            .import_file(path)
            .await?;

        if let Ok(stats) = db.stats() {
            info!("Store now holds {} books", stats.book_count);
        }
        Ok(summary)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
