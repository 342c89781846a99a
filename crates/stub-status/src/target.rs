//! Upstream host identity.

use std::fmt;

/// Status path served by the nginx `stub_status` module.
pub const DEFAULT_STATUS_PATH: &str = "/stub_status";

/// One configured upstream nginx host.
///
/// Built once at startup from configuration and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostTarget {
    host: String,
    endpoint: String,
}

impl HostTarget {
    /// Create a target for `host` (usually `host:port`) serving its status
    /// page at `status_path`.
    pub fn new(host: impl Into<String>, status_path: &str) -> Self {
        let host = host.into();
        let endpoint = if status_path.starts_with('/') {
            format!("http://{}{}", host, status_path)
        } else {
            format!("http://{}/{}", host, status_path)
        };
        Self { host, endpoint }
    }

    /// Create a target using the default `/stub_status` path.
    pub fn with_default_path(host: impl Into<String>) -> Self {
        Self::new(host, DEFAULT_STATUS_PATH)
    }

    /// Configured host address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full status page URL; also the identity used in metric labels.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Display for HostTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let target = HostTarget::with_default_path("10.0.0.1:8080");
        assert_eq!(target.host(), "10.0.0.1:8080");
        assert_eq!(target.endpoint(), "http://10.0.0.1:8080/stub_status");
    }

    #[test]
    fn test_path_without_leading_slash() {
        let target = HostTarget::new("web-1", "nginx_status");
        assert_eq!(target.endpoint(), "http://web-1/nginx_status");
    }

    #[test]
    fn test_display_is_host() {
        let target = HostTarget::new("web-1:81", "/status");
        assert_eq!(target.to_string(), "web-1:81");
    }
}
