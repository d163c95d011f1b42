//! Named, weakly-typed metadata records
//!
//! A [`Structure`] is what upstream inference stages attach to a region or a
//! frame: a name plus a bag of typed fields. Detection results, classification
//! attributes and raw tensors all travel as structures; the converter decides
//! what a structure means by its name and the fields it carries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i32),
    Double(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Type name used in field errors
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "int",
            FieldValue::Double(_) => "double",
            FieldValue::Bool(_) => "bool",
            FieldValue::String(_) => "string",
            FieldValue::Bytes(_) => "bytes",
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

/// Named record with typed field lookup
///
/// Lookups fail per field rather than per record, so callers decide which
/// fields are mandatory for the shape they are trying to read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Structure {
    /// Create an empty structure with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Set or replace a field
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    fn lookup(&self, field: &str) -> Result<&FieldValue, FieldError> {
        self.fields
            .get(field)
            .ok_or_else(|| FieldError::missing(field))
    }

    pub fn get_int(&self, field: &str) -> Result<i32, FieldError> {
        match self.lookup(field)? {
            FieldValue::Int(value) => Ok(*value),
            other => Err(FieldError::mismatch(field, "int", other.type_name())),
        }
    }

    pub fn get_double(&self, field: &str) -> Result<f64, FieldError> {
        match self.lookup(field)? {
            FieldValue::Double(value) => Ok(*value),
            other => Err(FieldError::mismatch(field, "double", other.type_name())),
        }
    }

    pub fn get_string(&self, field: &str) -> Result<&str, FieldError> {
        match self.lookup(field)? {
            FieldValue::String(value) => Ok(value.as_str()),
            other => Err(FieldError::mismatch(field, "string", other.type_name())),
        }
    }

    pub fn get_bytes(&self, field: &str) -> Result<&[u8], FieldError> {
        match self.lookup(field)? {
            FieldValue::Bytes(value) => Ok(value.as_slice()),
            other => Err(FieldError::mismatch(field, "bytes", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_lookup() {
        let s = Structure::new("detection")
            .with_field("x_min", 0.25)
            .with_field("label_id", 3)
            .with_field("label", "car");

        assert_eq!(s.get_double("x_min"), Ok(0.25));
        assert_eq!(s.get_int("label_id"), Ok(3));
        assert_eq!(s.get_string("label"), Ok("car"));
        assert!(s.has_field("label"));
        assert!(!s.has_field("confidence"));
    }

    #[test]
    fn test_lookup_fails_per_field() {
        let s = Structure::new("detection").with_field("label_id", 1.0);

        assert_eq!(s.get_int("x_min"), Err(FieldError::missing("x_min")));
        assert_eq!(
            s.get_int("label_id"),
            Err(FieldError::mismatch("label_id", "int", "double"))
        );
        // The same field still reads fine with the right type
        assert_eq!(s.get_double("label_id"), Ok(1.0));
    }

    #[test]
    fn test_deserialize_from_json() {
        let s: Structure = serde_json::from_value(json!({
            "name": "color",
            "fields": {
                "label": "red",
                "label_id": 2,
                "confidence": 0.75,
                "data_buffer": [0, 128, 255]
            }
        }))
        .unwrap();

        assert_eq!(s.name(), "color");
        assert_eq!(s.get_string("label"), Ok("red"));
        assert_eq!(s.get_int("label_id"), Ok(2));
        assert_eq!(s.get_double("confidence"), Ok(0.75));
        assert_eq!(s.get_bytes("data_buffer"), Ok(&[0u8, 128, 255][..]));
    }
}
