//! The normalizer middleware.
//!
//! Rejections are terminal: the downstream handler is never invoked and
//! the caller gets a plain-text 4xx. On success the request is rebuilt
//! from its original parts with the re-encoded body.

use axum::body::{Body, HttpBody};
use axum::extract::{Request, State};
use axum::http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

use scalegate_core::{Adjustment, ScaleError, ScalingConfig, normalize_body};

use crate::NormalizerState;

/// Validate a scale request, clamp its replicas, and hand it to `next`.
pub async fn normalize_scale_request(
    State(state): State<NormalizerState>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match rewrite(&state.config, req).await {
        Ok(req) => next.run(req).await,
        Err(err) => {
            warn!(%method, %path, error = %err, "rejected scale request");
            reject(&err)
        }
    }
}

async fn rewrite(config: &ScalingConfig, req: Request) -> Result<Request, ScaleError> {
    if req.method() != Method::POST {
        return Err(ScaleError::InvalidMethod(req.method().to_string()));
    }
    if req.body().is_end_stream() {
        return Err(ScaleError::MissingBody);
    }

    let (mut parts, body) = req.into_parts();
    let raw = axum::body::to_bytes(body, config.max_body_bytes)
        .await
        .map_err(|e| ScaleError::BodyRead(e.to_string()))?;

    let normalized = normalize_body(&raw, config)?;
    let request = &normalized.request;
    match normalized.adjustment {
        Adjustment::Unchanged => {}
        Adjustment::ScaledToZero { requested } => {
            info!(
                service = %request.service_name,
                namespace = %request.namespace,
                requested,
                "scale to zero requested"
            );
        }
        Adjustment::Capped { requested } => {
            debug!(
                service = %request.service_name,
                namespace = %request.namespace,
                requested,
                replicas = request.replicas,
                "replicas capped at max"
            );
        }
    }

    if parts.headers.contains_key(CONTENT_LENGTH) {
        parts
            .headers
            .insert(CONTENT_LENGTH, HeaderValue::from(normalized.body.len()));
    }

    Ok(Request::from_parts(parts, Body::from(normalized.body)))
}

fn reject(err: &ScaleError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    let mut resp = (
        status,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        err.public_message(),
    )
        .into_response();

    if matches!(err, ScaleError::InvalidMethod(_)) {
        resp.headers_mut().insert(ALLOW, HeaderValue::from_static("POST"));
    }
    resp
}
