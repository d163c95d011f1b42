//! Frame-level document fields
//!
//! [`FrameContext`] gathers what the document says about the frame as a
//! whole; [`extract`] turns it into [`FrameFields`], the top-level part of
//! every emitted document.

use serde::Serialize;
use serde_json::Value;

use crate::frame::{VideoFrame, VideoInfo};

/// Frame-level inputs to the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameContext {
    pub resolution: Option<VideoInfo>,
    pub source: Option<String>,
    /// Stream time of the frame, `None` when undefined
    pub stream_time: Option<u64>,
    /// Stream time at which the current segment begins
    pub segment_time: u64,
    /// Unparsed tag string
    pub tags: Option<String>,
}

impl FrameContext {
    /// Collect the context for one frame
    pub fn from_frame(frame: &VideoFrame, source: Option<&str>, tags: Option<&str>) -> Self {
        Self {
            resolution: frame.info,
            source: source.map(str::to_string),
            stream_time: frame.stream_time(),
            segment_time: frame.segment.time,
            tags: tags.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Top-level frame fields of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

impl FrameFields {
    /// No frame-level field is set, so there is nothing to anchor a message to
    pub fn is_empty(&self) -> bool {
        self.resolution.is_none()
            && self.source.is_none()
            && self.timestamp.is_none()
            && self.tags.is_none()
    }
}

/// Build the frame-level fields
///
/// Timestamp is relative to the segment start and left out when the stream
/// time is undefined. Tags that are not valid JSON are dropped.
pub fn extract(context: &FrameContext) -> FrameFields {
    let tags = context.tags.as_deref().and_then(|raw| {
        serde_json::from_str::<Value>(raw)
            .map_err(|err| tracing::warn!(error = %err, "Ignoring tags that are not valid JSON"))
            .ok()
    });

    FrameFields {
        resolution: context.resolution.map(|info| Resolution {
            width: info.width,
            height: info.height,
        }),
        source: context.source.clone(),
        timestamp: context
            .stream_time
            .map(|stream_time| stream_time.saturating_sub(context.segment_time)),
        tags,
    }
}
