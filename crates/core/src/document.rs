//! Per-frame document assembly
//!
//! Combines frame fields, region objects and frame-level tensors into one
//! [`FrameDocument`] and applies the suppression policy:
//!
//! - nothing detected and no frame tensors: no document, unless
//!   `emit_empty_results` is set;
//! - no frame-level field at all: never a document.

use serde::Serialize;

use crate::config::ConverterConfig;
use crate::context::{self, FrameContext, FrameFields};
use crate::frame::RegionOfInterest;
use crate::region::{self, RegionObject};
use crate::structure::Structure;
use crate::tensor::{self, TensorObject};

/// Switches controlling what goes into a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Add a `tensors` array to every region
    pub include_tensor_data: bool,
    /// Add the frame-level `tensors` array
    pub include_frame_tensors: bool,
    /// Emit a frame-fields-only document when nothing was detected
    pub emit_empty_results: bool,
}

impl From<&ConverterConfig> for AssembleOptions {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            include_tensor_data: config.add_tensor_data,
            include_frame_tensors: config.add_tensor_data,
            emit_empty_results: config.add_empty_results,
        }
    }
}

/// One frame's complete document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDocument {
    #[serde(flatten)]
    pub frame: FrameFields,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<RegionObject>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tensors: Vec<TensorObject>,
}

/// Assemble the document for one frame, or `None` when there is nothing to emit
pub fn assemble(
    context: &FrameContext,
    regions: &[RegionOfInterest],
    frame_tensors: &[Structure],
    options: AssembleOptions,
) -> Option<FrameDocument> {
    let frame = context::extract(context);
    let objects = region::convert_regions(regions, options.include_tensor_data);
    let tensors = if options.include_frame_tensors {
        tensor::convert_frame_tensors(frame_tensors)
    } else {
        Vec::new()
    };

    if objects.is_empty() && tensors.is_empty() && !options.emit_empty_results {
        tracing::debug!("No detections found, not posting JSON message");
        return None;
    }

    if frame.is_empty() {
        tracing::debug!("Frame has no resolution, source, timestamp or tags, not posting JSON message");
        return None;
    }

    Some(FrameDocument {
        frame,
        objects,
        tensors,
    })
}
