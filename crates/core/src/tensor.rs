//! Tensor descriptors and their JSON form
//!
//! Any [`Structure`] can be read as a tensor descriptor: the structure name is
//! the tensor name and well-known fields carry precision, layout, labels and
//! the raw output buffer. [`convert_tensor`] turns one descriptor into a
//! [`TensorObject`] containing only the fields that are actually present.

use serde::Serialize;

use crate::codec::{self, TensorData};
use crate::structure::Structure;

/// Field holding the raw output buffer
pub const DATA_FIELD: &str = "data_buffer";

/// Structure name reserved for detection records
pub const DETECTION_NAME: &str = "detection";

/// Inference engine precision codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Unspecified,
    Mixed,
    Fp32,
    Fp16,
    Bf16,
    Fp64,
    Q78,
    I16,
    U4,
    U8,
    I4,
    I8,
    U16,
    I32,
    U32,
    I64,
    U64,
    Bin,
    Bool,
    Custom,
}

impl Precision {
    /// Decode a raw precision code; unknown codes read as `Unspecified`
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Precision::Mixed,
            10 => Precision::Fp32,
            11 => Precision::Fp16,
            12 => Precision::Bf16,
            13 => Precision::Fp64,
            20 => Precision::Q78,
            30 => Precision::I16,
            39 => Precision::U4,
            40 => Precision::U8,
            41 => Precision::Bool,
            49 => Precision::I4,
            50 => Precision::I8,
            60 => Precision::U16,
            70 => Precision::I32,
            74 => Precision::U32,
            72 => Precision::I64,
            73 => Precision::U64,
            71 => Precision::Bin,
            80 => Precision::Custom,
            _ => Precision::Unspecified,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Precision::Unspecified => 255,
            Precision::Mixed => 0,
            Precision::Fp32 => 10,
            Precision::Fp16 => 11,
            Precision::Bf16 => 12,
            Precision::Fp64 => 13,
            Precision::Q78 => 20,
            Precision::I16 => 30,
            Precision::U4 => 39,
            Precision::U8 => 40,
            Precision::Bool => 41,
            Precision::I4 => 49,
            Precision::I8 => 50,
            Precision::U16 => 60,
            Precision::I32 => 70,
            Precision::Bin => 71,
            Precision::I64 => 72,
            Precision::U64 => 73,
            Precision::U32 => 74,
            Precision::Custom => 80,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Precision::Unspecified => "UNSPECIFIED",
            Precision::Mixed => "MIXED",
            Precision::Fp32 => "FP32",
            Precision::Fp16 => "FP16",
            Precision::Bf16 => "BF16",
            Precision::Fp64 => "FP64",
            Precision::Q78 => "Q78",
            Precision::I16 => "I16",
            Precision::U4 => "U4",
            Precision::U8 => "U8",
            Precision::I4 => "I4",
            Precision::I8 => "I8",
            Precision::U16 => "U16",
            Precision::I32 => "I32",
            Precision::U32 => "U32",
            Precision::I64 => "I64",
            Precision::U64 => "U64",
            Precision::Bin => "BIN",
            Precision::Bool => "BOOL",
            Precision::Custom => "CUSTOM",
        }
    }
}

/// Tensor memory layout codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Any,
    Nchw,
    Nhwc,
    Nc,
}

impl Layout {
    /// Decode a raw layout code; unknown codes read as `Any`
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Layout::Nchw,
            2 => Layout::Nhwc,
            193 => Layout::Nc,
            _ => Layout::Any,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Layout::Any => 0,
            Layout::Nchw => 1,
            Layout::Nhwc => 2,
            Layout::Nc => 193,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Any => "ANY",
            Layout::Nchw => "NCHW",
            Layout::Nhwc => "NHWC",
            Layout::Nc => "NC",
        }
    }
}

/// Read-only tensor view over a structure
#[derive(Debug, Clone, Copy)]
pub struct Tensor<'a> {
    inner: &'a Structure,
}

impl<'a> Tensor<'a> {
    pub fn new(inner: &'a Structure) -> Self {
        Self { inner }
    }

    /// Declared precision, `None` when the descriptor carries no precision field
    pub fn precision(&self) -> Option<Precision> {
        self.inner.get_int("precision").ok().map(Precision::from_code)
    }

    pub fn layout(&self) -> Option<Layout> {
        self.inner.get_int("layout").ok().map(Layout::from_code)
    }

    pub fn name(&self) -> &'a str {
        self.inner.name()
    }

    pub fn model_name(&self) -> &'a str {
        self.string_field("model_name")
    }

    pub fn layer_name(&self) -> &'a str {
        self.string_field("layer_name")
    }

    pub fn format(&self) -> &'a str {
        self.string_field("format")
    }

    pub fn label(&self) -> &'a str {
        self.string_field("label")
    }

    pub fn confidence(&self) -> Option<f64> {
        self.inner.get_double("confidence").ok()
    }

    pub fn label_id(&self) -> Option<i32> {
        self.inner.get_int("label_id").ok()
    }

    /// Raw output buffer, empty when absent
    pub fn data(&self) -> &'a [u8] {
        self.inner.get_bytes(DATA_FIELD).unwrap_or_default()
    }

    pub fn is_detection(&self) -> bool {
        self.inner.name() == DETECTION_NAME
    }

    fn string_field(&self, field: &str) -> &'a str {
        self.inner.get_string(field).unwrap_or_default()
    }
}

/// JSON form of one tensor descriptor
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TensorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TensorData>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Convert one tensor descriptor
///
/// Detection tensors never carry `label`: their label travels with the
/// region's detection entry instead.
pub fn convert_tensor(tensor: &Tensor<'_>) -> TensorObject {
    let label = if tensor.is_detection() {
        None
    } else {
        non_empty(tensor.label())
    };

    let data = codec::encode(tensor.precision(), tensor.data());

    TensorObject {
        precision: tensor.precision().map(Precision::as_str),
        layout: tensor.layout().map(Layout::as_str),
        name: non_empty(tensor.name()),
        model_name: non_empty(tensor.model_name()),
        layer_name: non_empty(tensor.layer_name()),
        format: non_empty(tensor.format()),
        label,
        confidence: tensor.confidence(),
        label_id: tensor.label_id(),
        data: (!data.is_empty()).then_some(data),
    }
}

/// Convert every frame-level tensor, in attachment order
pub fn convert_frame_tensors(tensors: &[Structure]) -> Vec<TensorObject> {
    tensors
        .iter()
        .map(|s| convert_tensor(&Tensor::new(s)))
        .collect()
}
