use std::{net::SocketAddr, time::Duration};

use axum::http::HeaderValue;
use clap::Parser;
use reqwest::Url;

/// Runtime configuration, read once at startup from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Demo service for service discovery and tracing on minikube")]
pub struct Config {
    /// Identity of this instance. Echoed in every response; instance `1` calls upstream.
    #[arg(long, env = "SERVICE_NAME")]
    pub service_name: String,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// Called by `/trace` when this instance forwards upstream
    #[arg(long, env = "UPSTREAM_URL", default_value = "http://localhost:8888/api/")]
    pub upstream_url: Url,

    /// `host` header set on the upstream call, used by the mesh to route it
    #[arg(long, env = "UPSTREAM_HOST", default_value = "demo.turbinelabs.io")]
    pub upstream_host: HeaderValue,

    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value_t = 5000)]
    pub upstream_timeout_ms: u64,
}

impl Config {
    /// Whether `/trace` should call upstream. Only service `1` does; the name is compared as an
    /// integer so `01` counts too.
    pub fn forwards_upstream(&self) -> bool {
        self.service_name.trim().parse::<i64>() == Ok(1)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}
