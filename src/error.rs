use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

/// Startup configuration problems. These are fatal: the process exits before serving.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid upstream address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("at least one upstream server is required")]
    EmptyPool,
}

/// Every target in the pool reported not-alive.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no available upstream")]
pub struct NoAvailableUpstream;

/// Transport-level failure talking to an upstream. Non-2xx responses are not errors.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream {address} unreachable: {message}")]
    Send { address: String, message: String },
}

/// Per-request failure surfaced at the dispatch boundary as an HTTP response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    NoAvailableUpstream(#[from] NoAvailableUpstream),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl ResponseError for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::NoAvailableUpstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            DispatchError::Forward(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DispatchError::NoAvailableUpstream(_) => "no available upstream",
            DispatchError::Forward(_) => "bad gateway",
        };
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            DispatchError::from(NoAvailableUpstream).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let err = DispatchError::from(ForwardError::Send {
            address: "http://a".to_string(),
            message: "refused".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
    }
}
