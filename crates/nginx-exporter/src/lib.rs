//! NGINX Prometheus exporter
//!
//! Serves the `stub_status` counters of one or more nginx hosts as
//! Prometheus metrics. Every scrape of the export endpoint runs one
//! collection pass over all configured hosts; a host that cannot be reached
//! is reported as `nginx_up 0` without failing the scrape.
//!
//! # Components
//!
//! - **Config**: YAML configuration with validation
//! - **Exporter**: wires the fetcher, collector and HTTP server together
//! - **MetricsServer**: axum server for the export endpoint
//! - **ExporterMetrics**: OpenMetrics encoding plus exporter self-metrics

pub mod config;
pub mod http_server;
pub mod metrics;
pub mod server;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use http_server::{AppState, MetricsServer, router};
pub use metrics::ExporterMetrics;
pub use server::Exporter;
pub use telemetry::{TelemetryGuard, init_telemetry, setup_tracing};
