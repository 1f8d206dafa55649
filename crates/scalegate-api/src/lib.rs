//! scalegate-api — HTTP interceptor for scale requests.
//!
//! Wraps a downstream axum router so that every request reaching it has
//! been validated and had its replica count clamped.
//!
//! ```text
//! caller
//!   │
//!   ▼
//! normalize_scale_request
//!   ├── method != POST        → 405 "Only POST is allowed"
//!   ├── no body / read error  → 400 "Error reading request body"
//!   ├── malformed JSON        → 400 "Error unmarshalling request body"
//!   └── clamp replicas, rewrite body
//!   │
//!   ▼
//! downstream router (owns the final response)
//! ```

pub mod middleware;

use std::sync::Arc;

use axum::Router;
use scalegate_core::ScalingConfig;

pub use middleware::normalize_scale_request;

/// Shared state for the normalizer middleware.
#[derive(Clone)]
pub struct NormalizerState {
    pub config: Arc<ScalingConfig>,
}

impl NormalizerState {
    pub fn new(config: Arc<ScalingConfig>) -> Self {
        Self { config }
    }
}

/// Put the normalizer in front of every route already registered on
/// `downstream`. Routes added to the returned router afterwards are not
/// intercepted.
///
/// `downstream` must have at least one route.
pub fn build_router(config: Arc<ScalingConfig>, downstream: Router) -> Router {
    let state = NormalizerState::new(config);
    downstream.route_layer(axum::middleware::from_fn_with_state(
        state,
        normalize_scale_request,
    ))
}
