use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Anything that can go wrong while answering a request. Every variant surfaces as a plain 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("could not read the machine hostname: {0}")]
    Hostname(#[source] io::Error),

    #[error("could not resolve hostname {hostname}: {source}")]
    Resolve {
        hostname: String,
        #[source]
        source: io::Error,
    },

    #[error("hostname {0} resolved to no addresses")]
    NoAddress(String),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_is_a_server_error() {
        let errors = [
            AppError::Hostname(io::Error::other("no uts namespace")),
            AppError::Resolve {
                hostname: "pod-1".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "nxdomain"),
            },
            AppError::NoAddress("pod-1".into()),
        ];

        for error in errors {
            assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn messages_name_the_hostname() {
        let error = AppError::NoAddress("pod-1".into());
        assert_eq!(error.to_string(), "hostname pod-1 resolved to no addresses");
    }
}
