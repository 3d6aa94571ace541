//! Tracing setup shared by the demo services: subscriber and OTLP export, a tower layer that
//! opens OpenTelemetry-shaped server spans, and propagation of the trace headers the demo mesh
//! relies on.

mod propagation;
mod subscriber;
mod trace_layer;

pub use propagation::{forward_trace_headers, TRACE_HEADERS_TO_PROPAGATE};
pub use subscriber::{init_tracing, TracingGuard};
pub use trace_layer::{client_span, record_status, trace_layer, OtelMakeSpan, OtelOnFailure, OtelOnResponse};
