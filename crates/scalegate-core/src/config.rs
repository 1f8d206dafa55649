//! Scaling configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bounds::ReplicaBounds;
use crate::error::ConfigError;

pub const DEFAULT_MIN_REPLICAS: u32 = 1;
pub const DEFAULT_MAX_REPLICAS: u32 = 20;
pub const DEFAULT_SCALING_FACTOR: u32 = 10;
pub const DEFAULT_SCALE_TYPE: &str = "rps";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Bounds and tags applied to every scale request.
///
/// Built once at startup and shared read-only by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Baseline replica count. Informational only; the normalizer does not
    /// raise requests to it.
    pub min_replicas: u32,
    /// Hard ceiling. Larger requests are truncated to this value.
    pub max_replicas: u32,
    /// Proportional scaling step, in percent. Not consumed by the normalizer.
    pub scaling_factor: u32,
    /// Strategy tag of the scaler that issues requests. Not consumed by the normalizer.
    pub scale_type: String,
    /// Largest request body the normalizer will buffer.
    pub max_body_bytes: usize,
    /// Per-service labels keyed by `{namespace}/{service}`.
    pub labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            min_replicas: DEFAULT_MIN_REPLICAS,
            max_replicas: DEFAULT_MAX_REPLICAS,
            scaling_factor: DEFAULT_SCALING_FACTOR,
            scale_type: DEFAULT_SCALE_TYPE.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            labels: BTreeMap::new(),
        }
    }
}

impl ScalingConfig {
    /// Parse a TOML document whose root is the scaling table, then validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScalingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_replicas == 0 {
            return Err(ConfigError::Invalid("max_replicas must be > 0".into()));
        }
        if self.min_replicas > self.max_replicas {
            return Err(ConfigError::Invalid(format!(
                "min_replicas ({}) must be <= max_replicas ({})",
                self.min_replicas, self.max_replicas
            )));
        }
        if self.scaling_factor > 100 {
            return Err(ConfigError::Invalid(format!(
                "scaling_factor ({}) must be between 0 and 100",
                self.scaling_factor
            )));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be > 0".into()));
        }
        Ok(())
    }

    /// Process-wide bounds, ignoring per-service labels.
    pub fn bounds(&self) -> ReplicaBounds {
        ReplicaBounds {
            max: self.max_replicas,
        }
    }

    /// Effective bounds for one service.
    pub fn bounds_for(&self, namespace: &str, service: &str) -> ReplicaBounds {
        let bounds = self.bounds();
        match self.labels.get(&format!("{namespace}/{service}")) {
            Some(labels) => bounds.with_labels(labels, self.max_replicas),
            None => bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::MAX_SCALE_LABEL;

    #[test]
    fn defaults_match_provider_constants() {
        let config = ScalingConfig::default();
        assert_eq!(config.min_replicas, 1);
        assert_eq!(config.max_replicas, 20);
        assert_eq!(config.scaling_factor, 10);
        assert_eq!(config.scale_type, "rps");
        assert!(config.labels.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn parse_partial_table_keeps_defaults() {
        let config = ScalingConfig::from_toml_str("max_replicas = 8\n").unwrap();
        assert_eq!(config.max_replicas, 8);
        assert_eq!(config.min_replicas, 1);
        assert_eq!(config.scale_type, "rps");
    }

    #[test]
    fn parse_labels() {
        let toml_str = r#"
max_replicas = 30

[labels."openfaas-fn/fn1"]
"com.openfaas.scale.max" = "5"
"#;
        let config = ScalingConfig::from_toml_str(toml_str).unwrap();
        let labels = &config.labels["openfaas-fn/fn1"];
        assert_eq!(labels[MAX_SCALE_LABEL], "5");
        assert_eq!(config.bounds_for("openfaas-fn", "fn1").max, 5);
        assert_eq!(config.bounds_for("openfaas-fn", "fn2").max, 30);
    }

    #[test]
    fn rejects_min_above_max() {
        let err = ScalingConfig::from_toml_str("min_replicas = 5\nmax_replicas = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_max() {
        let config = ScalingConfig {
            min_replicas: 0,
            max_replicas: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_factor_above_100() {
        let config = ScalingConfig {
            scaling_factor: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_toml() {
        let err = ScalingConfig::from_toml_str("max_replicas = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_file_missing() {
        let err = ScalingConfig::from_file(Path::new("/nonexistent/scalegate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaling.toml");
        std::fs::write(&path, "max_replicas = 12\nscale_type = \"capacity\"\n").unwrap();

        let config = ScalingConfig::from_file(&path).unwrap();
        assert_eq!(config.max_replicas, 12);
        assert_eq!(config.scale_type, "capacity");
    }
}
