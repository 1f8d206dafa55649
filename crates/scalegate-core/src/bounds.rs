//! Replica bounds and label overrides.

use std::collections::BTreeMap;

use tracing::warn;

/// Label carrying the maximum replica count for a service.
pub const MAX_SCALE_LABEL: &str = "com.openfaas.scale.max";

/// Effective replica bounds for a single scale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaBounds {
    pub max: u32,
}

impl ReplicaBounds {
    /// Apply a max scale label on top of these bounds.
    ///
    /// Values that fail to parse, and zero, are ignored. `max` never
    /// exceeds `ceiling`.
    pub fn with_labels(mut self, labels: &BTreeMap<String, String>, ceiling: u32) -> Self {
        if let Some(max) = parse_label(labels, MAX_SCALE_LABEL) {
            if max > 0 {
                self.max = max.min(ceiling);
            } else {
                warn!(label = MAX_SCALE_LABEL, "ignoring zero max scale label");
            }
        }
        self
    }
}

fn parse_label(labels: &BTreeMap<String, String>, name: &str) -> Option<u32> {
    let raw = labels.get(name)?;
    match raw.trim().parse::<u32>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(label = name, value = %raw, error = %e, "ignoring unparseable scale label");
            None
        }
    }
}
