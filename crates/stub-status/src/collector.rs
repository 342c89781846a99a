//! Metric catalog and collection passes.

use crate::fetcher::StatusSource;
use crate::snapshot::{SnapshotBuilder, StatusSnapshot};
use crate::target::HostTarget;
use futures::future::join_all;
use tracing::debug;

/// Name and help text of one exported metric.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub help: &'static str,
}

pub const ACTIVE: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_active_total",
    help: "Active client connections.",
};
pub const ACCEPTED: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_accepted_total",
    help: "Accepted client connections.",
};
pub const HANDLED: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_handled_total",
    help: "Handled client connections.",
};
pub const READING: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_reading_total",
    help: "Connections where NGINX is reading the request header.",
};
pub const WRITING: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_writing_total",
    help: "Connections where NGINX is writing the response back to the client.",
};
pub const WAITING: MetricDescriptor = MetricDescriptor {
    name: "nginx_connections_waiting_total",
    help: "Idle client connections.",
};
pub const REQUESTS: MetricDescriptor = MetricDescriptor {
    name: "nginx_http_requests_total",
    help: "Total http requests.",
};
pub const UP: MetricDescriptor = MetricDescriptor {
    name: "nginx_up",
    help: "Whether the last scrape of the nginx status page succeeded (1) or not (0).",
};

/// Every metric the collector can emit, each labeled by endpoint.
pub static CATALOG: [&MetricDescriptor; 8] = [
    &ACTIVE, &ACCEPTED, &HANDLED, &READING, &WRITING, &WAITING, &REQUESTS, &UP,
];

/// The fixed metric catalog. Requires no upstream access.
pub fn describe() -> &'static [&'static MetricDescriptor] {
    &CATALOG
}

/// One metric value for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub metric: &'static MetricDescriptor,
    pub host: String,
    pub endpoint: String,
    pub value: u64,
}

impl StatusSnapshot {
    /// Metric values for this snapshot.
    ///
    /// An unreachable host yields only `nginx_up 0`.
    pub fn samples(&self) -> Vec<Sample> {
        let sample = |metric: &'static MetricDescriptor, value: u64| Sample {
            metric,
            host: self.host().to_string(),
            endpoint: self.endpoint().to_string(),
            value,
        };

        match self.status() {
            None => vec![sample(&UP, 0)],
            Some(status) => vec![
                sample(&ACTIVE, status.active),
                sample(&ACCEPTED, status.accepted),
                sample(&HANDLED, status.handled),
                sample(&READING, status.reading),
                sample(&WRITING, status.writing),
                sample(&WAITING, status.waiting),
                sample(&REQUESTS, status.requests),
                sample(&UP, 1),
            ],
        }
    }
}

/// Runs collection passes over a set of hosts.
pub struct Collector<S> {
    builder: SnapshotBuilder<S>,
}

impl<S: StatusSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self {
            builder: SnapshotBuilder::new(source),
        }
    }

    /// The fixed metric catalog.
    pub fn describe(&self) -> &'static [&'static MetricDescriptor] {
        describe()
    }

    /// Snapshot every host concurrently, returned in `targets` order.
    pub async fn snapshots(&self, targets: &[HostTarget]) -> Vec<StatusSnapshot> {
        let snapshots = join_all(targets.iter().map(|t| self.builder.build(t))).await;
        debug!(
            hosts = snapshots.len(),
            up = snapshots.iter().filter(|s| s.reachable()).count(),
            "Collection pass finished"
        );
        snapshots
    }

    /// One full collection pass.
    pub async fn collect(&self, targets: &[HostTarget]) -> Vec<Sample> {
        self.snapshots(targets)
            .await
            .iter()
            .flat_map(StatusSnapshot::samples)
            .collect()
    }
}
