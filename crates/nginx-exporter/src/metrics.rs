//! Prometheus encoding of collection passes.
//!
//! Host metrics are rebuilt from scratch on every scrape so a host that went
//! down stops reporting its counters immediately. Exporter self-metrics live
//! across scrapes and are registered into every per-scrape registry.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{Histogram, exponential_buckets};
use prometheus_client::registry::Registry;
use std::time::Duration;
use stub_status::{Sample, StatusSnapshot};

/// Labels carried by every host metric
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EndpointLabels {
    /// Configured host address
    pub host: String,
    /// Status page URL
    pub uri: String,
}

/// Labels for host failure metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct FailureLabels {
    /// Failure reason (fetch, parse)
    pub reason: String,
}

/// Exporter self-metrics
#[derive(Clone)]
pub struct ExporterMetrics {
    /// Scrapes served
    scrapes_total: Counter,
    /// Collection pass duration
    scrape_duration_seconds: Histogram,
    /// Hosts reported down, by reason
    host_failures_total: Family<FailureLabels, Counter>,
}

impl Default for ExporterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterMetrics {
    pub fn new() -> Self {
        Self {
            scrapes_total: Counter::default(),
            // 5ms to ~2.5s, the useful range given one-second fetch timeouts
            scrape_duration_seconds: Histogram::new(exponential_buckets(0.005, 2.0, 10)),
            host_failures_total: Family::default(),
        }
    }

    /// Account for one finished collection pass
    pub fn record_scrape(&self, snapshots: &[StatusSnapshot], elapsed: Duration) {
        self.scrapes_total.inc();
        self.scrape_duration_seconds.observe(elapsed.as_secs_f64());

        for kind in snapshots.iter().filter_map(StatusSnapshot::failure) {
            self.host_failures_total
                .get_or_create(&FailureLabels {
                    reason: kind.as_str().to_string(),
                })
                .inc();
        }
    }

    /// Total scrapes served so far
    pub fn scrapes(&self) -> u64 {
        self.scrapes_total.get()
    }

    fn register(&self, registry: &mut Registry) {
        registry.register(
            "nginx_exporter_scrapes",
            "Total scrapes of the metrics endpoint",
            self.scrapes_total.clone(),
        );
        registry.register(
            "nginx_exporter_scrape_duration_seconds",
            "Duration of one collection pass over all hosts",
            self.scrape_duration_seconds.clone(),
        );
        registry.register(
            "nginx_exporter_host_failures",
            "Hosts reported down, by failure reason",
            self.host_failures_total.clone(),
        );
    }

    /// Encode one collection pass plus the self-metrics in OpenMetrics text
    pub fn render(&self, samples: &[Sample]) -> Result<String, std::fmt::Error> {
        let mut registry = Registry::default();

        for descriptor in stub_status::describe() {
            let family = Family::<EndpointLabels, Gauge>::default();
            for sample in samples.iter().filter(|s| s.metric == *descriptor) {
                family
                    .get_or_create(&EndpointLabels {
                        host: sample.host.clone(),
                        uri: sample.endpoint.clone(),
                    })
                    .set(i64::try_from(sample.value).unwrap_or(i64::MAX));
            }
            // Registry::register appends the trailing period itself
            registry.register(
                descriptor.name,
                descriptor.help.trim_end_matches('.'),
                family,
            );
        }

        self.register(&mut registry);

        let mut buffer = String::new();
        encode(&mut buffer, &registry)?;
        Ok(buffer)
    }
}
