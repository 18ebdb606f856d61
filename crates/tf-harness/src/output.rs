//! Typed access to `terraform output -json`.
//!
//! The tool prints a JSON document mapping each declared output name to its
//! value, declared type, and sensitivity. [`OutputSet::parse`] keeps every
//! declared output (nothing omitted, nothing added) and the shape accessors
//! fail fast on mismatch instead of coercing.

use crate::error::{HarnessError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Shape of a declared module output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Scalar,
    List,
    Map,
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputShape::Scalar => f.write_str("scalar"),
            OutputShape::List => f.write_str("list"),
            OutputShape::Map => f.write_str("map"),
        }
    }
}

/// A single extracted output value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    Scalar(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl OutputValue {
    pub fn shape(&self) -> OutputShape {
        match self {
            OutputValue::Scalar(_) => OutputShape::Scalar,
            OutputValue::List(_) => OutputShape::List,
            OutputValue::Map(_) => OutputShape::Map,
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Array(items) => OutputValue::List(items.iter().map(render_leaf).collect()),
            Value::Object(entries) => OutputValue::Map(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), render_leaf(item)))
                    .collect(),
            ),
            other => OutputValue::Scalar(render_leaf(other)),
        }
    }
}

/// Render a JSON leaf the way the CLI prints it: strings bare, numbers and
/// booleans as their literals, nested composites as compact JSON.
fn render_leaf(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One entry of the `output -json` document.
#[derive(Debug, Deserialize)]
struct RawOutput {
    value: Value,
    #[serde(default)]
    sensitive: bool,
}

/// The full set of outputs declared by a module, extracted after apply.
///
/// Sensitive outputs are kept accessible but redacted from `Debug` output so
/// they never land in test logs by accident.
#[derive(Clone, Default)]
pub struct OutputSet {
    outputs: BTreeMap<String, OutputValue>,
    sensitive: BTreeSet<String>,
}

impl OutputSet {
    /// Parse the document produced by `output -json`.
    pub fn parse(json: &str) -> Result<Self> {
        let document: BTreeMap<String, RawOutput> = serde_json::from_str(json)
            .map_err(|e| HarnessError::OutputParse(e.to_string()))?;

        let mut outputs = BTreeMap::new();
        let mut sensitive = BTreeSet::new();
        for (name, raw) in document {
            if raw.sensitive {
                sensitive.insert(name.clone());
            }
            outputs.insert(name, OutputValue::from_json(&raw.value));
        }
        Ok(Self { outputs, sensitive })
    }

    /// Declared output names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.outputs.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    fn lookup(&self, name: &str) -> Result<&OutputValue> {
        self.outputs
            .get(name)
            .ok_or_else(|| HarnessError::NotFound(name.to_string()))
    }

    /// Extract a scalar output. A declared list or map is an error, never
    /// its first element.
    pub fn scalar(&self, name: &str) -> Result<&str> {
        match self.lookup(name)? {
            OutputValue::Scalar(value) => Ok(value),
            other => Err(HarnessError::TypeMismatch {
                name: name.to_string(),
                expected: OutputShape::Scalar,
                actual: other.shape(),
            }),
        }
    }

    /// Extract a list output.
    pub fn list(&self, name: &str) -> Result<&[String]> {
        match self.lookup(name)? {
            OutputValue::List(items) => Ok(items),
            other => Err(HarnessError::TypeMismatch {
                name: name.to_string(),
                expected: OutputShape::List,
                actual: other.shape(),
            }),
        }
    }

    /// Extract a map output.
    pub fn map(&self, name: &str) -> Result<&BTreeMap<String, String>> {
        match self.lookup(name)? {
            OutputValue::Map(entries) => Ok(entries),
            other => Err(HarnessError::TypeMismatch {
                name: name.to_string(),
                expected: OutputShape::Map,
                actual: other.shape(),
            }),
        }
    }
}

impl fmt::Debug for OutputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.outputs {
            if self.sensitive.contains(name) {
                map.entry(name, &"[REDACTED]");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    /// A document shaped like the droplet module's real output contract.
    const SAMPLE: &str = r#"{
        "droplet_ip": {
            "sensitive": false,
            "type": "string",
            "value": "203.0.113.10"
        },
        "droplet_public_ips": {
            "sensitive": false,
            "type": ["object", {"test-web-0": "string", "test-web-1": "string"}],
            "value": {
                "test-web-0": "203.0.113.10",
                "test-web-1": "203.0.113.11"
            }
        },
        "droplet_tags": {
            "sensitive": false,
            "type": ["list", "string"],
            "value": ["test", "web"]
        },
        "summary": {
            "sensitive": false,
            "type": ["map", "string"],
            "value": {
                "droplets_count": "2",
                "load_balancer_created": "true",
                "load_balancer_ip": "203.0.113.50"
            }
        },
        "admin_password": {
            "sensitive": true,
            "type": "string",
            "value": "hunter2"
        }
    }"#;

    fn sample() -> OutputSet {
        OutputSet::parse(SAMPLE).expect("sample document should parse")
    }

    #[test]
    fn test_scalar_extraction() {
        let outputs = sample();
        assert_eq!(outputs.scalar("droplet_ip").unwrap(), "203.0.113.10");
    }

    #[test]
    fn test_map_extraction() {
        let outputs = sample();
        let ips = outputs.map("droplet_public_ips").unwrap();

        assert_eq!(ips.len(), 2);
        assert_eq!(
            ips.get("test-web-1").map(String::as_str),
            Some("203.0.113.11")
        );
    }

    #[test]
    fn test_list_extraction() {
        let outputs = sample();
        assert_eq!(outputs.list("droplet_tags").unwrap(), ["test", "web"]);
    }

    #[test]
    fn test_list_as_scalar_is_type_mismatch_not_first_element() {
        let outputs = sample();

        let error = outputs.scalar("droplet_tags").unwrap_err();
        assert!(matches!(
            error,
            HarnessError::TypeMismatch {
                expected: OutputShape::Scalar,
                actual: OutputShape::List,
                ..
            }
        ));
    }

    #[test]
    fn test_map_as_list_is_type_mismatch() {
        let outputs = sample();

        let error = outputs.list("summary").unwrap_err();
        assert!(matches!(
            error,
            HarnessError::TypeMismatch {
                actual: OutputShape::Map,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_output_is_not_found() {
        let outputs = sample();

        let error = outputs.scalar("no_such_output").unwrap_err();
        assert!(matches!(error, HarnessError::NotFound(name) if name == "no_such_output"));
    }

    #[test]
    fn test_names_match_declared_set_exactly() {
        let outputs = sample();

        assert_eq!(
            outputs.names(),
            vec![
                "admin_password",
                "droplet_ip",
                "droplet_public_ips",
                "droplet_tags",
                "summary",
            ]
        );
    }

    #[test]
    fn test_primitive_map_values_stringify() {
        let json = r#"{
            "summary": {
                "type": ["object", {"droplets_count": "number", "load_balancer_created": "bool"}],
                "value": {"droplets_count": 3, "load_balancer_created": true}
            }
        }"#;
        let outputs = OutputSet::parse(json).unwrap();

        let summary = outputs.map("summary").unwrap();
        assert_eq!(summary.get("droplets_count").map(String::as_str), Some("3"));
        assert_eq!(
            summary.get("load_balancer_created").map(String::as_str),
            Some("true")
        );
    }

    #[test]
    fn test_empty_document_is_empty_set() {
        let outputs = OutputSet::parse("{}").unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_malformed_document_fails_parse() {
        let error = OutputSet::parse("not json").unwrap_err();
        assert!(matches!(error, HarnessError::OutputParse(_)));
    }

    #[test]
    fn test_debug_redacts_sensitive_outputs() {
        let outputs = sample();

        let rendered = format!("{:?}", outputs);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("203.0.113.10"));
    }
}
