//! HTTP server for the Prometheus export endpoint.

use crate::metrics::ExporterMetrics;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use std::time::Instant;
use stub_status::{Collector, HostTarget, HttpFetcher, Sample, StatusSnapshot};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// Everything a scrape needs; read-only after startup
pub struct AppState {
    pub collector: Collector<HttpFetcher>,
    pub targets: Vec<HostTarget>,
    pub metrics: ExporterMetrics,
    pub metrics_path: String,
}

/// Build the exporter router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing_handler))
        .route(&state.metrics_path, get(metrics_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// HTTP server for metrics endpoint
pub struct MetricsServer {
    state: Arc<AppState>,
    listen_addr: String,
}

impl MetricsServer {
    pub fn new(state: Arc<AppState>, listen_addr: String) -> Self {
        Self { state, listen_addr }
    }

    /// Bind and serve until Ctrl-C
    pub async fn run(self) -> common::Result<()> {
        info!(listen_addr = %self.listen_addr, "Starting metrics HTTP server");

        let listener = TcpListener::bind(&self.listen_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl-C
    pub async fn serve(self, listener: TcpListener) -> common::Result<()> {
        info!(
            listen_addr = %listener.local_addr()?,
            metrics_path = %self.state.metrics_path,
            "Metrics server listening"
        );

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Metrics server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Handler for the metrics endpoint: one collection pass per request
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let start = Instant::now();
    let snapshots = state.collector.snapshots(&state.targets).await;
    let elapsed = start.elapsed();
    state.metrics.record_scrape(&snapshots, elapsed);

    let samples: Vec<Sample> = snapshots.iter().flat_map(StatusSnapshot::samples).collect();
    debug!(
        samples = samples.len(),
        elapsed_ms = elapsed.as_millis(),
        "Scrape collected"
    );

    match state.metrics.render(&samples) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn landing_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        "<html>\n<head><title>NGINX Exporter</title></head>\n<body>\n\
         <h1>NGINX Exporter</h1>\n<p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n</html>\n",
        path = state.metrics_path
    ))
}
