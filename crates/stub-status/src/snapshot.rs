//! Per-host snapshots.

use crate::fetcher::StatusSource;
use crate::parser::{self, StubStatus};
use crate::target::HostTarget;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// Why a host was reported as down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The status page could not be fetched
    Fetch,
    /// The status page was fetched but did not parse
    Parse,
}

impl FailureKind {
    /// Short label value.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Fetch => "fetch",
            FailureKind::Parse => "parse",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one collection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// Fetched and parsed
    Up(StubStatus),
    /// Unreachable; no counters
    Down(FailureKind),
}

/// Result of one collection attempt for one host.
///
/// Lives for a single scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    host: String,
    endpoint: String,
    state: SnapshotState,
}

impl StatusSnapshot {
    /// Snapshot of a reachable host.
    pub fn up(target: &HostTarget, status: StubStatus) -> Self {
        Self::with_state(target, SnapshotState::Up(status))
    }

    /// Snapshot of an unreachable host.
    pub fn down(target: &HostTarget, kind: FailureKind) -> Self {
        Self::with_state(target, SnapshotState::Down(kind))
    }

    fn with_state(target: &HostTarget, state: SnapshotState) -> Self {
        Self {
            host: target.host().to_string(),
            endpoint: target.endpoint().to_string(),
            state,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> SnapshotState {
        self.state
    }

    /// Whether fetch and parse both succeeded.
    pub fn reachable(&self) -> bool {
        matches!(self.state, SnapshotState::Up(_))
    }

    /// Counters, present only for reachable hosts.
    pub fn status(&self) -> Option<&StubStatus> {
        match &self.state {
            SnapshotState::Up(status) => Some(status),
            SnapshotState::Down(_) => None,
        }
    }

    /// Failure reason, present only for unreachable hosts.
    pub fn failure(&self) -> Option<FailureKind> {
        match self.state {
            SnapshotState::Up(_) => None,
            SnapshotState::Down(kind) => Some(kind),
        }
    }
}

/// Turns a fetch and a parse into a snapshot. Stateless.
pub struct SnapshotBuilder<S> {
    source: S,
}

impl<S: StatusSource> SnapshotBuilder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Collect one host. Never fails; failures become a down snapshot.
    pub async fn build(&self, target: &HostTarget) -> StatusSnapshot {
        let start = Instant::now();

        let body = match self.source.fetch(target).await {
            Ok(body) => body,
            Err(e) => {
                warn!(host = %target.host(), endpoint = %target.endpoint(), error = %e,
                      "nginx host down: status fetch failed");
                return StatusSnapshot::down(target, FailureKind::Fetch);
            }
        };

        match parser::parse(&body) {
            Ok(status) => {
                debug!(host = %target.host(), elapsed_ms = start.elapsed().as_millis(),
                       "Collected stub status");
                StatusSnapshot::up(target, status)
            }
            Err(e) => {
                warn!(host = %target.host(), endpoint = %target.endpoint(), error = %e,
                      "nginx host down: malformed status page");
                StatusSnapshot::down(target, FailureKind::Parse)
            }
        }
    }
}
