use axum::http::{header::HOST, HeaderMap, HeaderValue, Method};
use reqwest::Url;
use tracing::Instrument;

use crate::{config::Config, error::AppError};

/// Client for the service `/trace` calls when this instance is service 1.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    url: Url,
    host: HeaderValue,
}

impl Upstream {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            url: config.upstream_url.clone(),
            host: config.upstream_host.clone(),
        })
    }

    /// GET the upstream with the trace headers of `incoming` and return its body.
    ///
    /// The status code is not checked: an error page from upstream is returned like any other
    /// body.
    pub async fn fetch(&self, incoming: &HeaderMap) -> Result<String, AppError> {
        let mut headers = telemetry::forward_trace_headers(incoming);
        headers.insert(HOST, self.host.clone());

        let span = telemetry::client_span(&Method::GET, self.url.as_str());
        async {
            let response = self
                .client
                .get(self.url.clone())
                .headers(headers)
                .send()
                .await?;

            let status = response.status();
            telemetry::record_status(&tracing::Span::current(), status.as_u16());
            if !status.is_success() {
                tracing::warn!(%status, "upstream returned a non-success status, using its body anyway");
            }

            Ok::<_, AppError>(response.text().await?)
        }
        .instrument(span)
        .await
    }
}
