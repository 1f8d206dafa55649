//! scalegate-core — replica-count normalization for scale requests.
//!
//! Decodes a scale request body, clamps its `replicas` into the admissible
//! range, and re-encodes it. Nothing here touches HTTP; the transport
//! plumbing lives in `scalegate-api`.
//!
//! # Clamping
//!
//! ```text
//! replicas < 1    => 0            (scale-to-zero)
//! replicas > max  => max          (capped)
//! otherwise       => unchanged
//! ```
//!
//! `max` is `ScalingConfig.max_replicas`, optionally lowered per service
//! through the `com.openfaas.scale.max` label.

pub mod bounds;
pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use bounds::ReplicaBounds;
pub use config::ScalingConfig;
pub use error::{ConfigError, ScaleError};
pub use normalize::{Adjustment, Normalized, clamp_replicas, normalize_body};
pub use types::ScaleRequest;
