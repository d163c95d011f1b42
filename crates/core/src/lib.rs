//! Video analytics metadata to JSON conversion
//!
//! Turns one frame's analytics metadata (regions of interest, the detection
//! and attribute records attached to them, and raw inference tensors) into a
//! single JSON document with a fixed schema:
//!
//! ```json
//! {
//!   "resolution": {"width": 640, "height": 480},
//!   "source": "cam1",
//!   "timestamp": 1000,
//!   "objects": [{
//!     "x": 10, "y": 20, "w": 30, "h": 40,
//!     "detection": {
//!       "bounding_box": {"x_min": 0.1, "x_max": 0.5, "y_min": 0.2, "y_max": 0.6},
//!       "confidence": 0.9, "label_id": 2, "label": "person"
//!     }
//!   }]
//! }
//! ```
//!
//! Modules, leaves first:
//! - `codec`: raw tensor buffers to number arrays.
//! - `tensor`: tensor descriptors to JSON objects.
//! - `classify`: detection / attribute record classification.
//! - `region`: region objects and the `objects` array.
//! - `context`: frame-level fields (resolution, source, timestamp, tags).
//! - `document`: assembly and the suppression policy.
//! - `converter`: per-frame entry point posting to a `sink`.

pub mod classify;
pub mod codec;
pub mod config;
pub mod context;
pub mod converter;
pub mod document;
pub mod error;
pub mod frame;
pub mod logging;
pub mod region;
pub mod sink;
pub mod structure;
pub mod tensor;

pub use classify::{classify, AttributeOutput, DetectionOutput, RecordOutput};
pub use codec::TensorData;
pub use config::ConverterConfig;
pub use context::{FrameContext, FrameFields};
pub use converter::JsonConverter;
pub use document::{assemble, AssembleOptions, FrameDocument};
pub use error::{ConvertError, FieldError, Result};
pub use frame::{RegionOfInterest, Segment, VideoFrame, VideoInfo};
pub use region::{RegionEntry, RegionObject};
pub use sink::{ChannelSink, CollectSink, FrameMessage, JsonlSink, MessageSink, MultiSink, SinkError};
pub use structure::{FieldValue, Structure};
pub use tensor::{Layout, Precision, Tensor, TensorObject};
