//! Upstream targets.
//!
//! [`UpstreamTarget`] is the capability set the selector and dispatcher need
//! from a backend. [`HttpUpstream`] is the plain HTTP(S) implementation.

use std::fmt::Debug;
use std::sync::Arc;

use actix_web::body::{self, SizedStream};
use actix_web::{web, HttpRequest, HttpResponse};
use async_trait::async_trait;
use awc::Client;
use url::Url;

use crate::error::{ConfigError, ForwardError};
use crate::liveness::{AlwaysAlive, Liveness};
use crate::req::{
    copy_response_headers, create_forward_url, create_forwarded_req, request_framing, BodyFraming,
};

/// One backend the load balancer can forward to.
///
/// `forward` futures are driven on the actix worker that received the request,
/// so they need not be `Send`. The target itself is shared between workers.
#[async_trait(?Send)]
pub trait UpstreamTarget: Send + Sync + Debug {
    /// Canonical address, used for logs.
    fn address(&self) -> &str;

    fn is_alive(&self) -> bool;

    /// Proxy one request to this target and stream its response back.
    async fn forward(
        &self,
        client: &Client,
        req: HttpRequest,
        payload: web::Payload,
    ) -> Result<HttpResponse, ForwardError>;
}

#[derive(Debug)]
pub struct HttpUpstream {
    address: String,
    url: Url,
    liveness: Arc<dyn Liveness>,
}

impl HttpUpstream {
    /// Parse `address` into an absolute `http`/`https` base URL.
    pub fn new(address: &str) -> Result<HttpUpstream, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let url = Url::parse(address).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }

        Ok(HttpUpstream {
            address: address.to_string(),
            url,
            liveness: Arc::new(AlwaysAlive),
        })
    }

    pub fn with_liveness(mut self, liveness: Arc<dyn Liveness>) -> HttpUpstream {
        self.liveness = liveness;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait(?Send)]
impl UpstreamTarget for HttpUpstream {
    fn address(&self) -> &str {
        &self.address
    }

    fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    async fn forward(
        &self,
        client: &Client,
        req: HttpRequest,
        payload: web::Payload,
    ) -> Result<HttpResponse, ForwardError> {
        let new_url = create_forward_url(&self.url, req.uri());
        let forwarded_req = create_forwarded_req(client, req.head(), &new_url);

        let sent = match request_framing(req.headers()) {
            BodyFraming::Empty => forwarded_req.send_body(body::None::new()),
            BodyFraming::Sized(len) => forwarded_req.send_body(SizedStream::new(len, payload)),
            BodyFraming::Chunked => forwarded_req.send_stream(payload),
        };
        let res = sent.await.map_err(|err| ForwardError::Send {
            address: self.address.clone(),
            message: err.to_string(),
        })?;

        let mut client_resp = HttpResponse::build(res.status());
        copy_response_headers(&mut client_resp, res.headers());
        Ok(client_resp.streaming(res))
    }
}
