use std::time::Duration;

use axum::{
    extract::MatchedPath,
    http::{header::USER_AGENT, Method, Request, Response},
};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt},
    Context,
};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_semantic_conventions::{
    attribute::OTEL_STATUS_CODE,
    trace::{
        HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE, NETWORK_PROTOCOL_VERSION,
        URL_FULL, USER_AGENT_ORIGINAL,
    },
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{MakeSpan, OnFailure, OnResponse, TraceLayer},
};
use tracing::{field::Empty, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct OtelMakeSpan;

impl<B> MakeSpan<B> for OtelMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        // Continue the caller's trace when the request carries one
        let parent_cx: Context = global::get_text_map_propagator(|propagator| {
            propagator.extract(&HeaderExtractor(request.headers()))
        });
        let has_parent_span = parent_cx.span().span_context().is_valid();

        // Name the span after the route template so `/trace/1` and `/trace/2` group together
        let path_template = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or("{unknown}");

        let span = tracing::info_span!(
            "request",
            otel.name = format!("{} {}", request.method(), path_template),
            span.kind = ?SpanKind::Server,
            { OTEL_STATUS_CODE } = Empty,
            { HTTP_REQUEST_METHOD } = ?request.method(),
            { HTTP_RESPONSE_STATUS_CODE } = Empty,
            { HTTP_ROUTE } = %path_template,
            { URL_FULL } = %request.uri().path(),
            { NETWORK_PROTOCOL_VERSION } = ?request.version(),
            { USER_AGENT_ORIGINAL } = %request.headers().get(USER_AGENT).and_then(|h| h.to_str().ok()).unwrap_or_default(),
        );

        if has_parent_span {
            span.set_parent(parent_cx);
        }

        span
    }
}

#[derive(Clone)]
pub struct OtelOnResponse;
impl<B> OnResponse<B> for OtelOnResponse {
    fn on_response(self, response: &Response<B>, _latency: Duration, span: &Span) {
        record_status(span, response.status().as_u16());
    }
}

#[derive(Clone)]
pub struct OtelOnFailure;
impl<B> OnFailure<B> for OtelOnFailure {
    fn on_failure(&mut self, _failure_classification: B, _latency: Duration, span: &Span) {
        span.record(OTEL_STATUS_CODE, "error");
    }
}

/// Record an HTTP status code and the matching otel status on a span made by this crate
pub fn record_status(span: &Span, status_code: u16) {
    let is_failure = if status_code < 300 { "ok" } else { "error" };
    span.record(OTEL_STATUS_CODE, is_failure);
    span.record(HTTP_RESPONSE_STATUS_CODE, status_code);
}

/// Span for an outgoing request made with an HTTP client. Pair with [`record_status`] once the
/// response arrives.
pub fn client_span(method: &Method, url: &str) -> Span {
    tracing::info_span!(
        "request",
        otel.name = ?method,
        span.kind = ?SpanKind::Client,
        { OTEL_STATUS_CODE } = Empty,
        { HTTP_REQUEST_METHOD } = ?method,
        { HTTP_RESPONSE_STATUS_CODE } = Empty,
        { URL_FULL } = %url,
    )
}

/// A Tower layer that traces incoming requests with opentelemetry tags
pub fn trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    OtelMakeSpan,
    (),
    OtelOnResponse,
    (),
    (),
    OtelOnFailure,
> {
    TraceLayer::new_for_http()
        .make_span_with(OtelMakeSpan)
        .on_request(())
        .on_response(OtelOnResponse)
        .on_body_chunk(())
        .on_eos(())
        .on_failure(OtelOnFailure)
}
