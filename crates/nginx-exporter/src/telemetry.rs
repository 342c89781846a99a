//! Logging and OpenTelemetry tracing setup
//!
//! Log lines always go to stdout through `tracing-subscriber`; spans are
//! additionally exported over OTLP/gRPC when telemetry is enabled.

use crate::config::{LoggingSettings, TelemetrySettings};
use common::Error;
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{RandomIdGenerator, Sampler, Tracer, TracerProvider},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// OpenTelemetry tracer guard
///
/// When dropped, flushes all pending spans and shuts down the tracer
pub struct TelemetryGuard;

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        opentelemetry::global::shutdown_tracer_provider();
    }
}

/// Install the global OTLP tracer provider
///
/// Returns the guard together with the SDK tracer feeding the tracing layer,
/// or `None` when telemetry is disabled.
pub async fn init_telemetry(
    settings: &TelemetrySettings,
) -> common::Result<Option<(TelemetryGuard, Tracer)>> {
    if !settings.enabled {
        return Ok(None);
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(settings.otlp_endpoint.as_str())
        .build()
        .map_err(Error::telemetry)?;

    let resource = Resource::new(vec![
        KeyValue::new("service.name", settings.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION").to_string()),
    ]);

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("nginx-exporter");
    opentelemetry::global::set_tracer_provider(provider);

    Ok(Some((TelemetryGuard, tracer)))
}

/// Install the global tracing subscriber, with an OpenTelemetry layer when
/// telemetry is enabled
pub async fn setup_tracing(
    logging: &LoggingSettings,
    telemetry: &TelemetrySettings,
    default_level: &str,
) -> common::Result<Option<TelemetryGuard>> {
    let (guard, otel_layer) = match init_telemetry(telemetry).await? {
        Some((guard, tracer)) => (
            Some(guard),
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(common::logging::fmt_layer(logging.format))
        .with(otel_layer)
        .with(common::logging::env_filter(default_level))
        .try_init()
        .map_err(Error::telemetry)?;

    tracing::info!(
        format = ?logging.format,
        otlp = telemetry.enabled,
        otlp_endpoint = %telemetry.otlp_endpoint,
        "Tracing initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_telemetry_disabled() {
        let result = init_telemetry(&TelemetrySettings::default()).await;
        assert!(result.unwrap().is_none());
    }

    // Batch span processor shutdown blocks, so it needs a second worker
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_enabled_telemetry_feeds_tracing_layer() {
        let settings = TelemetrySettings {
            enabled: true,
            ..TelemetrySettings::default()
        };

        let (guard, tracer) = init_telemetry(&settings).await.unwrap().unwrap();

        let subscriber =
            tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(tracer));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info_span!("scrape", hosts = 2).in_scope(|| {
                tracing::info!("collecting");
            });
        });

        tokio::task::spawn_blocking(move || drop(guard)).await.unwrap();
    }
}
