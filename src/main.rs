// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::alert_feed::{AlertFeedService, ANOMALY_TOPIC};
use crate::application::credential_store::{CredentialStore, ACCESS_TOKEN_KEY};
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::catalog_client::HttpCatalogProvider;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::count_client::HttpCountClient;
use crate::infrastructure::credential_store::InMemoryCredentialStore;
use crate::infrastructure::mqtt_broker::MqttConnector;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    let credentials = Arc::new(InMemoryCredentialStore::new());
    if let Some(token) = &config.credentials.access_token {
        credentials.set(ACCESS_TOKEN_KEY, token);
    }

    // Create adapters (infrastructure layer)
    let catalog = Arc::new(HttpCatalogProvider::new(
        config.backend.stock_url.clone(),
        config.backend.orders_url.clone(),
        config.backend.timeout(),
        credentials.clone(),
    )?);
    let counts = Arc::new(HttpCountClient::new(
        config.backend.count_url.clone(),
        config.backend.timeout(),
    )?);
    let connector = Arc::new(MqttConnector::new(&config.broker));

    // Create view components (application layer)
    let dashboard = DashboardService::new(catalog, credentials, counts);
    let alerts = AlertFeedService::new(connector, ANOMALY_TOPIC.to_string());

    alerts.activate().await;
    tokio::spawn({
        let dashboard = dashboard.clone();
        async move { dashboard.activate().await }
    });

    let state = Arc::new(AppState::new(dashboard, alerts, config.navigation.clone()));

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server bind address {}", config.server.bind))?;
    tracing::info!(%addr, "starting factory-dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    tracing::info!("factory-dashboard stopped");

    Ok(())
}

/// Resolves on ctrl-c once event streams are told to end, so the server's
/// connection drain can finish.
async fn shutdown_signal(state: Arc<AppState>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    state.begin_shutdown().await;
}
