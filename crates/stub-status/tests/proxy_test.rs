//! Status fetches ignore proxy environment variables.
//!
//! Kept in its own test binary since it mutates the process environment.

use std::time::Duration;
use stub_status::{FetchOptions, HostTarget, HttpFetcher, StatusSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY: &str = "Active connections: 1\n\
                    server accepts handled requests\n\
                    2 3 4\n\
                    Reading: 0 Writing: 1 Waiting: 0\n";

#[tokio::test]
async fn test_fetch_bypasses_http_proxy_env() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stub_status"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
        .mount(&server)
        .await;

    // Nothing listens on port 1: any proxied request would fail
    // SAFETY: the only test in this binary; no other thread reads the environment
    unsafe {
        std::env::set_var("HTTP_PROXY", "http://127.0.0.1:1");
        std::env::set_var("http_proxy", "http://127.0.0.1:1");
        std::env::set_var("ALL_PROXY", "http://127.0.0.1:1");
        std::env::remove_var("NO_PROXY");
        std::env::remove_var("no_proxy");
    }

    let fetcher = HttpFetcher::new(FetchOptions {
        connect_timeout: Duration::from_millis(200),
        header_timeout: Duration::from_millis(200),
        body_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let body = fetcher
        .fetch(&HostTarget::with_default_path(server.address().to_string()))
        .await
        .unwrap();
    assert_eq!(&body[..], BODY.as_bytes());
}
