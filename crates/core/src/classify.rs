//! Record classification
//!
//! Every record attached to a region is either a detection (bounding box,
//! confidence and class id), a named attribute (label produced by some
//! model), or something this converter does not understand. [`classify`]
//! decides which, reading the record without modifying it.

use serde::Serialize;

use crate::error::FieldError;
use crate::structure::Structure;
use crate::tensor::DETECTION_NAME;

/// Normalized bounding box coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Payload of a detection record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionOutput {
    pub bounding_box: BoundingBox,
    pub confidence: f64,
    pub label_id: i32,
    /// Copied from the owning region's type label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Model reference inside an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRef {
    pub name: String,
}

/// Value stored under an attribute key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeValue {
    pub label: String,
    pub model: ModelRef,
}

/// Payload of an attribute record
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOutput {
    /// Output key: `attribute_name` if present, otherwise the record name
    pub key: String,
    pub value: AttributeValue,
}

/// Classification outcome for one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutput {
    Detection(DetectionOutput),
    Attribute(AttributeOutput),
    Skip,
}

/// Classify a record attached to a region with the given type label
pub fn classify(record: &Structure, roi_type: Option<&str>) -> RecordOutput {
    let result = if record.name() == DETECTION_NAME {
        read_detection(record, roi_type).map(RecordOutput::Detection)
    } else {
        read_attribute(record).map(RecordOutput::Attribute)
    };

    result.unwrap_or_else(|err| {
        tracing::debug!(record = record.name(), error = %err, "Skipping record");
        RecordOutput::Skip
    })
}

fn read_detection(
    record: &Structure,
    roi_type: Option<&str>,
) -> Result<DetectionOutput, FieldError> {
    Ok(DetectionOutput {
        bounding_box: BoundingBox {
            x_min: record.get_double("x_min")?,
            x_max: record.get_double("x_max")?,
            y_min: record.get_double("y_min")?,
            y_max: record.get_double("y_max")?,
        },
        confidence: record.get_double("confidence")?,
        label_id: record.get_int("label_id")?,
        label: roi_type.map(str::to_string),
    })
}

fn read_attribute(record: &Structure) -> Result<AttributeOutput, FieldError> {
    let label = record.get_string("label")?;
    let model_name = record.get_string("model_name")?;
    let key = record
        .get_string("attribute_name")
        .unwrap_or_else(|_| record.name());

    Ok(AttributeOutput {
        key: key.to_string(),
        value: AttributeValue {
            label: label.to_string(),
            model: ModelRef {
                name: model_name.to_string(),
            },
        },
    })
}
