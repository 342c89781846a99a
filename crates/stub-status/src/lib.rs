//! Collection pipeline for nginx `stub_status` pages.
//!
//! Each collection pass fetches the status page of every configured host,
//! parses it and turns the result into labeled metric samples:
//!
//! - [`fetcher`]: bounded-timeout HTTP GET of the status page
//! - [`parser`]: strict decoding of the four-line status layout
//! - [`snapshot`]: fetch + parse folded into a per-host snapshot
//! - [`collector`]: metric catalog and concurrent passes over all hosts
//!
//! A host that cannot be fetched or parsed is reported with `nginx_up 0`
//! and no counters; it never fails the pass.
//!
//! # Example
//!
//! ```no_run
//! use stub_status::{Collector, FetchOptions, HostTarget, HttpFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new(FetchOptions::default())?;
//! let collector = Collector::new(fetcher);
//! let targets = vec![HostTarget::with_default_path("127.0.0.1:8080")];
//!
//! for sample in collector.collect(&targets).await {
//!     println!("{}{{uri=\"{}\"}} {}", sample.metric.name, sample.endpoint, sample.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod snapshot;
pub mod target;

pub use collector::{Collector, MetricDescriptor, Sample, describe};
pub use error::{FetchError, ParseError};
pub use fetcher::{FetchOptions, HttpFetcher, StatusSource};
pub use parser::{StubStatus, parse};
pub use snapshot::{FailureKind, SnapshotBuilder, SnapshotState, StatusSnapshot};
pub use target::{DEFAULT_STATUS_PATH, HostTarget};
