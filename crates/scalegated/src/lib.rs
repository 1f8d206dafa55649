//! scalegated — assembles the scale request gateway.
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/system/scale-function/{name}` | Normalize, then forward to the provider |
//! | GET | `/healthz` | Liveness |

pub mod config;
pub mod forward;

use std::sync::Arc;

use axum::Router;
use axum::routing::{any, get};
use scalegate_core::ScalingConfig;

pub use config::DaemonConfig;
pub use forward::Forwarder;

/// Route that carries scale requests.
pub const SCALE_ROUTE: &str = "/system/scale-function/{name}";

/// Build the daemon router: normalizer in front of the forwarder, plus health.
pub fn build_app(config: Arc<ScalingConfig>, forwarder: Forwarder) -> Router {
    let scale_routes = Router::new()
        .route(SCALE_ROUTE, any(forward::forward))
        .with_state(forwarder);

    scalegate_api::build_router(config, scale_routes).route("/healthz", get(healthz))
}

async fn healthz() -> &'static str {
    "ok"
}
