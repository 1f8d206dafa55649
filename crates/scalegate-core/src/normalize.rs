//! Pure `(body) -> body'` normalization of scale requests.

use bytes::Bytes;

use crate::config::ScalingConfig;
use crate::error::ScaleError;
use crate::types::ScaleRequest;

/// What the clamp did to the requested replica count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Already within `1..=max`.
    Unchanged,
    /// Requested fewer than one replica; coerced to zero.
    ScaledToZero { requested: i64 },
    /// Requested more than `max`; truncated.
    Capped { requested: i64 },
}

/// Clamp `replicas` into `0..=max`.
///
/// Anything below one takes the scale-to-zero path rather than being raised
/// to the configured minimum.
pub fn clamp_replicas(replicas: i64, max: u32) -> (i64, Adjustment) {
    let max = i64::from(max);
    if replicas < 1 {
        (0, Adjustment::ScaledToZero { requested: replicas })
    } else if replicas > max {
        (max, Adjustment::Capped { requested: replicas })
    } else {
        (replicas, Adjustment::Unchanged)
    }
}

/// A decoded, clamped and re-encoded scale request.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub request: ScaleRequest,
    pub body: Bytes,
    pub adjustment: Adjustment,
}

/// Decode `body`, clamp its replica count, and re-encode it.
pub fn normalize_body(body: &[u8], config: &ScalingConfig) -> Result<Normalized, ScaleError> {
    if body.is_empty() {
        return Err(ScaleError::MissingBody);
    }

    let mut request: ScaleRequest = serde_json::from_slice(body)?;
    let bounds = config.bounds_for(&request.namespace, &request.service_name);
    let (replicas, adjustment) = clamp_replicas(request.replicas, bounds.max);
    request.replicas = replicas;

    let body = Bytes::from(serde_json::to_vec(&request)?);
    Ok(Normalized {
        request,
        body,
        adjustment,
    })
}
