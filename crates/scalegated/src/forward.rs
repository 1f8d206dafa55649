//! Forwards normalized scale requests to the provider.
//!
//! This is the "next handler" in production: it replays the rewritten
//! request against the upstream base URL, keeping path and query, and
//! streams the provider's response back unchanged.

use anyhow::{Context, bail};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::HOST;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, error};

type HttpClient = Client<HttpConnector, Body>;

/// Upstream client shared by all requests.
#[derive(Clone)]
pub struct Forwarder {
    client: HttpClient,
    upstream: Uri,
}

impl Forwarder {
    /// Create a forwarder for an `http://host[:port][/base]` upstream.
    pub fn new(upstream: &str) -> anyhow::Result<Self> {
        let upstream: Uri = upstream
            .parse()
            .with_context(|| format!("invalid upstream URL {upstream:?}"))?;

        if upstream.scheme_str() != Some("http") {
            bail!("upstream must be an http:// URL, got {upstream}");
        }
        if upstream.authority().is_none() {
            bail!("upstream URL has no host: {upstream}");
        }

        let client = Client::<(), ()>::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { client, upstream })
    }

    pub fn upstream(&self) -> &Uri {
        &self.upstream
    }

    /// Map an inbound URI onto the upstream, keeping path and query.
    fn target(&self, uri: &Uri) -> anyhow::Result<Uri> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let base = self.upstream.path().trim_end_matches('/');
        let authority = self
            .upstream
            .authority()
            .context("upstream URL has no host")?;

        Uri::builder()
            .scheme("http")
            .authority(authority.as_str())
            .path_and_query(format!("{base}{path_and_query}"))
            .build()
            .context("failed to build upstream URI")
    }
}

/// Handler that proxies the request to the provider.
pub async fn forward(State(forwarder): State<Forwarder>, mut req: Request) -> Response {
    let target = match forwarder.target(req.uri()) {
        Ok(uri) => uri,
        Err(e) => {
            error!(error = %e, "failed to map request onto upstream");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    debug!(%target, "forwarding scale request");
    *req.uri_mut() = target;
    // The client sets Host from the upstream authority.
    req.headers_mut().remove(HOST);

    match forwarder.client.request(req).await {
        Ok(resp) => resp.into_response(),
        Err(e) => {
            error!(upstream = %forwarder.upstream, error = %e, "upstream request failed");
            (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response()
        }
    }
}
