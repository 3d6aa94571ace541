//! A demo service for service discovery and distributed tracing on a local cluster.
//!
//! `/service/{n}` reports which service and host answered. `/trace/{n}` does the same, except
//! that service `1` first calls its upstream with the caller's trace headers so the two hops
//! show up as one trace.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod upstream;

use crate::{config::Config, host::HostSource, upstream::Upstream};

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: Upstream,
    pub hosts: HostSource,
}

impl AppState {
    pub fn new(config: Config, hosts: HostSource) -> Result<Self, reqwest::Error> {
        let upstream = Upstream::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            upstream,
            hosts,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let service = ServiceBuilder::new().layer(telemetry::trace_layer());

    Router::new()
        .route("/service/{service_number}", get(handlers::service))
        .route("/trace/{service_number}", get(handlers::trace))
        .layer(service)
        .with_state(state)
}
