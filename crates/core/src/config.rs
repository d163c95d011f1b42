//! Converter configuration
//!
//! # Example
//!
//! ```yaml
//! source: rtsp://camera-3/stream
//! tags: '{"site": "north"}'
//! add_tensor_data: false
//! add_empty_results: true
//! json_indent: 2
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConvertError, Result};

/// Configuration for [`JsonConverter`](crate::converter::JsonConverter)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Source identifier copied into every document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Raw JSON string copied into `tags` when it parses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    /// Include raw tensor descriptors per region and per frame (default: false)
    #[serde(default)]
    pub add_tensor_data: bool,

    /// Emit a document even when nothing was detected (default: false)
    #[serde(default)]
    pub add_empty_results: bool,

    /// Pretty-print with this many spaces; compact when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_indent: Option<usize>,
}

impl ConverterConfig {
    /// Parse node-style JSON parameters; missing keys take their defaults
    pub fn from_params(params: &Value) -> Result<Self> {
        if params.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(params.clone())
            .map_err(|e| ConvertError::config(format!("invalid converter params: {e}")))
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ConvertError::config(format!("invalid converter config: {e}")))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_tensor_data(mut self, enabled: bool) -> Self {
        self.add_tensor_data = enabled;
        self
    }

    pub fn with_empty_results(mut self, enabled: bool) -> Self {
        self.add_empty_results = enabled;
        self
    }

    pub fn with_json_indent(mut self, indent: Option<usize>) -> Self {
        self.json_indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::from_params(&json!({})).unwrap();
        assert_eq!(config, ConverterConfig::default());
        assert!(!config.add_tensor_data);
        assert!(!config.add_empty_results);
        assert_eq!(config.json_indent, None);
    }

    #[test]
    fn test_null_params_use_defaults() {
        assert_eq!(
            ConverterConfig::from_params(&Value::Null).unwrap(),
            ConverterConfig::default()
        );
    }

    #[test]
    fn test_from_params() {
        let config = ConverterConfig::from_params(&json!({
            "source": "cam1",
            "add_tensor_data": true,
            "json_indent": 4
        }))
        .unwrap();

        assert_eq!(config.source.as_deref(), Some("cam1"));
        assert!(config.add_tensor_data);
        assert_eq!(config.json_indent, Some(4));
    }

    #[test]
    fn test_from_params_rejects_wrong_types() {
        let err = ConverterConfig::from_params(&json!({"add_tensor_data": "yes"})).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_from_yaml() {
        let config = ConverterConfig::from_yaml_str(
            "source: rtsp://camera-3/stream\ntags: '{\"site\": \"north\"}'\nadd_empty_results: true\n",
        )
        .unwrap();

        assert_eq!(config.source.as_deref(), Some("rtsp://camera-3/stream"));
        assert_eq!(config.tags.as_deref(), Some(r#"{"site": "north"}"#));
        assert!(config.add_empty_results);
    }

    #[test]
    fn test_builders() {
        let config = ConverterConfig::default()
            .with_source("cam2")
            .with_tags("[1, 2]")
            .with_tensor_data(true)
            .with_empty_results(true)
            .with_json_indent(Some(2));

        assert_eq!(config.source.as_deref(), Some("cam2"));
        assert_eq!(config.tags.as_deref(), Some("[1, 2]"));
        assert!(config.add_tensor_data && config.add_empty_results);
        assert_eq!(config.json_indent, Some(2));
    }
}
