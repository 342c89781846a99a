//! Exporter process wiring.

use crate::config::Config;
use crate::http_server::{AppState, MetricsServer};
use crate::metrics::ExporterMetrics;
use common::Error;
use std::sync::Arc;
use stub_status::{Collector, HttpFetcher};
use tracing::info;

/// The nginx exporter: configured hosts, one shared HTTP client and the
/// export endpoint
pub struct Exporter {
    state: Arc<AppState>,
    listen_addr: String,
}

impl Exporter {
    /// Build the exporter from a loaded configuration
    ///
    /// Fails when no host is configured; nothing is served in that case.
    pub fn new(config: &Config) -> common::Result<Self> {
        let targets = config.targets();
        if targets.is_empty() {
            return Err(Error::config("No nginx host found, check the nginx.hosts setting"));
        }

        for target in &targets {
            info!(host = %target.host(), endpoint = %target.endpoint(), "Found nginx host");
        }

        let fetcher = HttpFetcher::new(config.fetch_options()).map_err(Error::config)?;

        let state = Arc::new(AppState {
            collector: Collector::new(fetcher),
            targets,
            metrics: ExporterMetrics::new(),
            metrics_path: config.exporter.metrics_path.clone(),
        });

        Ok(Self {
            state,
            listen_addr: config.exporter.listen_address.clone(),
        })
    }

    /// Shared scrape state
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Serve on the configured listen address until shutdown
    pub async fn run(self) -> common::Result<()> {
        MetricsServer::new(self.state, self.listen_addr).run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exporter_requires_hosts() {
        let result = Exporter::new(&Config::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_exporter_from_config() {
        let config = Config::from_yaml(
            "nginx:\n  hosts: [\"10.0.0.1:80\", \"10.0.0.2:80\"]\nexporter:\n  listen_address: \"127.0.0.1:0\"\n",
        )
        .unwrap();

        let exporter = Exporter::new(&config).unwrap();
        assert_eq!(exporter.listen_addr(), "127.0.0.1:0");

        let state = exporter.state();
        assert_eq!(state.targets.len(), 2);
        assert_eq!(state.metrics_path, "/metrics");
    }
}
