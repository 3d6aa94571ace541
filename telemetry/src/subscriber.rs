use std::{borrow::Cow, time::Duration};

use opentelemetry::{
    global,
    trace::{TraceError, TracerProvider as _},
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    runtime,
    trace::{Tracer, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::{
    resource::{SERVICE_NAME, SERVICE_VERSION},
    SCHEMA_URL,
};
use tracing_subscriber::{prelude::*, EnvFilter};

const EXPORT_TIMEOUT: Duration = Duration::from_secs(3);

fn resource(service_name: &str, service_version: impl Into<opentelemetry::Value>) -> Resource {
    Resource::from_schema_url(
        [
            KeyValue::new(SERVICE_NAME, service_name.to_string()),
            KeyValue::new(SERVICE_VERSION, service_version),
        ],
        SCHEMA_URL,
    )
}

fn otlp_tracer(
    service_name: Cow<'static, str>,
    service_version: impl Into<opentelemetry::Value>,
) -> Result<Tracer, TraceError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_timeout(EXPORT_TIMEOUT)
        .build()?;

    let provider = TracerProvider::builder()
        .with_resource(resource(&service_name, service_version))
        .with_batch_exporter(exporter, runtime::Tokio)
        .build();
    global::set_tracer_provider(provider.clone());

    Ok(provider.tracer(service_name))
}

/// Flushes pending spans on drop.
pub struct TracingGuard;
impl Drop for TracingGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

/// JSON logs filtered by `RUST_LOG`, plus span export over OTLP/HTTP configured by the usual
/// `OTEL_EXPORTER_OTLP_*` variables. Incoming `traceparent` headers are honoured.
#[must_use = "spans are only flushed while the guard is alive"]
pub fn init_tracing(
    service_name: impl Into<Cow<'static, str>>,
    service_version: impl Into<opentelemetry::Value>,
) -> Result<TracingGuard, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = otlp_tracer(service_name.into(), service_version)?;

    let json_logs = tracing_subscriber::fmt::layer()
        .json()
        .with_file(false)
        .with_line_number(false);
    let spans = tracing_opentelemetry::layer()
        .with_tracer(tracer)
        .with_location(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(json_logs)
        .with(spans)
        .init();

    Ok(TracingGuard)
}

#[cfg(test)]
mod tests {
    use opentelemetry::{Key, Value};

    use super::*;

    #[test]
    fn resource_names_the_service_instance() {
        let resource = resource("minikube-service-1", "0.1.0");

        assert_eq!(
            resource.get(Key::new(SERVICE_NAME)),
            Some(Value::from("minikube-service-1"))
        );
        assert_eq!(resource.get(Key::new(SERVICE_VERSION)), Some(Value::from("0.1.0")));
        assert_eq!(resource.schema_url(), Some(SCHEMA_URL));
    }
}
