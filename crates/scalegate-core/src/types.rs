//! Wire types for scale requests.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A request to set a service's replica count.
///
/// Field names follow the provider wire contract (`serviceName`,
/// `namespace`, `replicas`). Keys match case-insensitively on decode and
/// unknown keys are ignored. A missing or `null` name decodes as empty;
/// `replicas` must be present and non-null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRequest {
    pub service_name: String,
    pub namespace: String,
    /// Signed so that negative requests decode and can be coerced to zero.
    pub replicas: i64,
}

impl ScaleRequest {
    pub fn new(service_name: impl Into<String>, namespace: impl Into<String>, replicas: i64) -> Self {
        Self {
            service_name: service_name.into(),
            namespace: namespace.into(),
            replicas,
        }
    }
}

enum Field {
    ServiceName,
    Namespace,
    Replicas,
    Other,
}

impl Field {
    fn from_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("serviceName") {
            Field::ServiceName
        } else if key.eq_ignore_ascii_case("namespace") {
            Field::Namespace
        } else if key.eq_ignore_ascii_case("replicas") {
            Field::Replicas
        } else {
            Field::Other
        }
    }
}

struct ScaleRequestVisitor;

impl<'de> Visitor<'de> for ScaleRequestVisitor {
    type Value = ScaleRequest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scale request object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ScaleRequest, A::Error> {
        let mut request = ScaleRequest::default();
        let mut replicas = None;

        // Later keys overwrite earlier ones; a null value leaves the field as it was.
        while let Some(key) = map.next_key::<String>()? {
            match Field::from_key(&key) {
                Field::ServiceName => {
                    if let Some(name) = map.next_value::<Option<String>>()? {
                        request.service_name = name;
                    }
                }
                Field::Namespace => {
                    if let Some(namespace) = map.next_value::<Option<String>>()? {
                        request.namespace = namespace;
                    }
                }
                Field::Replicas => {
                    if let Some(value) = map.next_value::<Option<i64>>()? {
                        replicas = Some(value);
                    }
                }
                Field::Other => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        request.replicas = replicas.ok_or_else(|| de::Error::missing_field("replicas"))?;
        Ok(request)
    }
}

impl<'de> Deserialize<'de> for ScaleRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ScaleRequestVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_names() {
        let req: ScaleRequest =
            serde_json::from_str(r#"{"serviceName":"fn1","namespace":"openfaas-fn","replicas":5}"#)
                .unwrap();
        assert_eq!(req, ScaleRequest::new("fn1", "openfaas-fn", 5));
    }

    #[test]
    fn keys_match_case_insensitively() {
        let req: ScaleRequest =
            serde_json::from_str(r#"{"SERVICENAME":"fn1","NameSpace":"ns","Replicas":7}"#).unwrap();
        assert_eq!(req, ScaleRequest::new("fn1", "ns", 7));
    }

    #[test]
    fn last_duplicate_key_wins() {
        let req: ScaleRequest =
            serde_json::from_str(r#"{"replicas":3,"Replicas":9,"serviceName":"a","servicename":"b"}"#)
                .unwrap();
        assert_eq!(req.replicas, 9);
        assert_eq!(req.service_name, "b");
    }

    #[test]
    fn ignores_unknown_fields() {
        let req: ScaleRequest = serde_json::from_str(
            r#"{"serviceName":"fn1","namespace":"ns","replicas":2,"labels":{"a":"b"},"extra":true}"#,
        )
        .unwrap();
        assert_eq!(req.replicas, 2);
    }

    #[test]
    fn missing_names_are_empty() {
        let req: ScaleRequest = serde_json::from_str(r#"{"replicas":4,"namespace":null}"#).unwrap();
        assert_eq!(req, ScaleRequest::new("", "", 4));
    }

    #[test]
    fn replicas_are_required() {
        let err = serde_json::from_str::<ScaleRequest>(r#"{"serviceName":"fn1"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `replicas`"));
        assert!(serde_json::from_str::<ScaleRequest>(r#"{"replicas":null}"#).is_err());
        assert!(serde_json::from_str::<ScaleRequest>("null").is_err());
    }

    #[test]
    fn null_keeps_earlier_replicas() {
        let req: ScaleRequest = serde_json::from_str(r#"{"replicas":5,"Replicas":null}"#).unwrap();
        assert_eq!(req.replicas, 5);
    }

    #[test]
    fn negative_replicas_decode() {
        let req: ScaleRequest = serde_json::from_str(r#"{"replicas":-3}"#).unwrap();
        assert_eq!(req.replicas, -3);
    }

    #[test]
    fn wrong_types_fail() {
        assert!(serde_json::from_str::<ScaleRequest>(r#"{"replicas":"five"}"#).is_err());
        assert!(serde_json::from_str::<ScaleRequest>(r#"{"replicas":1.5}"#).is_err());
        assert!(serde_json::from_str::<ScaleRequest>(r#"{"Replicas":true}"#).is_err());
        assert!(serde_json::from_str::<ScaleRequest>(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn encodes_only_schema_fields() {
        let req = ScaleRequest::new("fn1", "openfaas-fn", 20);
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"serviceName":"fn1","namespace":"openfaas-fn","replicas":20}"#);
    }
}
