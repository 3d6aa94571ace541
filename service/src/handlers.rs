use axum::{
    extract::{Path, State},
    http::HeaderMap,
};

use crate::{error::AppError, AppState};

/// Stand-in for the upstream result when this instance does not call upstream
pub const NOTHING_UPSTREAM: &str = "nothing upstream";

/// `GET /service/{n}`: say which service and host answered.
pub async fn service(
    State(state): State<AppState>,
    Path(_service_number): Path<String>,
) -> Result<String, AppError> {
    let host = state.hosts.identify().await?;

    Ok(format!(
        "Hello from minikube (service {})! hostname: {} resolvedhostname: {}\n",
        state.config.service_name, host.hostname, host.address
    ))
}

/// `GET /trace/{n}`: service 1 calls upstream with the caller's trace headers and echoes the
/// answer, every other service reports that there is nothing upstream.
pub async fn trace(
    State(state): State<AppState>,
    Path(_service_number): Path<String>,
    headers: HeaderMap,
) -> Result<String, AppError> {
    let upstream_result = if state.config.forwards_upstream() {
        state.upstream.fetch(&headers).await?
    } else {
        NOTHING_UPSTREAM.to_string()
    };

    let host = state.hosts.identify().await?;

    Ok(format!(
        "Hello from minikube -- {} (service {})! hostname: {} resolvedhostname: {}\n",
        upstream_result, state.config.service_name, host.hostname, host.address
    ))
}
