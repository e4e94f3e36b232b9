//! API server: HTTP routes plus the Prometheus exporter.

use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use campaign_core::config::AppConfig;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the full router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Simulation endpoints
        .route("/v1/simulate/snapshot", get(rest::simulate_snapshot))
        .route("/v1/simulate/series", get(rest::simulate_series))
        .route("/v1/simulate/dashboard", get(rest::simulate_dashboard))
        // Analytics over caller-supplied data
        .route("/v1/analytics/audience", post(rest::analyze_audience))
        .route("/v1/analytics/windows", post(rest::analyze_windows))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    config: AppConfig,
}

impl ApiServer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState::new(
            self.config.node_id.clone(),
            self.config.simulation.clone(),
        );
        let app = router(state);

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port. No-op when disabled.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
