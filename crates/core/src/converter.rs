//! JsonConverter - per-frame entry point
//!
//! Runs the whole conversion for one frame and hands the serialized document
//! to a [`MessageSink`]. Each call works only on the frame it is given, so a
//! single converter can be shared between threads.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use metaconvert_core::{
//!     CollectSink, ConverterConfig, JsonConverter, RegionOfInterest, VideoFrame, VideoInfo,
//! };
//!
//! let sink = Arc::new(CollectSink::new());
//! let converter = JsonConverter::new(ConverterConfig::default().with_source("cam1"), sink.clone());
//!
//! let frame = VideoFrame::new(Some(VideoInfo::new(640, 480)), Some(0))
//!     .with_region(RegionOfInterest::new(10, 20, 30, 40));
//! assert!(converter.to_json(&frame));
//! assert_eq!(sink.len(), 1);
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::config::ConverterConfig;
use crate::context::FrameContext;
use crate::document::{self, AssembleOptions, FrameDocument};
use crate::error::Result;
use crate::frame::VideoFrame;
use crate::sink::{FrameMessage, MessageSink};

/// Converts frames to JSON documents and posts them to a sink
pub struct JsonConverter {
    config: ConverterConfig,
    sink: Arc<dyn MessageSink>,
}

impl JsonConverter {
    pub fn new(config: ConverterConfig, sink: Arc<dyn MessageSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Build the document for a frame without emitting it
    pub fn convert(&self, frame: &VideoFrame) -> Option<FrameDocument> {
        let context = FrameContext::from_frame(
            frame,
            self.config.source.as_deref(),
            self.config.tags.as_deref(),
        );
        document::assemble(
            &context,
            &frame.regions,
            &frame.tensors,
            AssembleOptions::from(&self.config),
        )
    }

    /// Serialize a document, compact or indented per configuration
    pub fn render(&self, document: &FrameDocument) -> Result<String> {
        match self.config.json_indent {
            None => Ok(serde_json::to_string(document)?),
            Some(width) => {
                let indent = vec![b' '; width];
                let mut out = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(
                    &mut out,
                    PrettyFormatter::with_indent(&indent),
                );
                document.serialize(&mut serializer)?;
                Ok(String::from_utf8_lossy(&out).into_owned())
            }
        }
    }

    /// Convert, render and post one frame
    ///
    /// Returns `Ok(false)` when the suppression policy left nothing to emit.
    pub fn process(&self, frame: &VideoFrame) -> Result<bool> {
        let Some(document) = self.convert(frame) else {
            return Ok(false);
        };

        let json = self.render(&document)?;
        tracing::info!(pts = ?frame.pts, "JSON message: {json}");
        self.sink.post(FrameMessage::new(frame.pts, json))?;
        Ok(true)
    }

    /// Frame-level entry point
    ///
    /// Returns `false` only when conversion failed; the failure is logged and
    /// later frames are unaffected.
    pub fn to_json(&self, frame: &VideoFrame) -> bool {
        match self.process(frame) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(pts = ?frame.pts, error = %err, "Failed to convert frame metadata to JSON");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{RegionOfInterest, VideoInfo};
    use crate::sink::{CollectSink, SinkError};

    struct FailingSink;

    impl MessageSink for FailingSink {
        fn post(&self, _message: FrameMessage) -> std::result::Result<(), SinkError> {
            Err(SinkError::Channel("closed".into()))
        }
    }

    fn frame() -> VideoFrame {
        VideoFrame::new(Some(VideoInfo::new(64, 48)), Some(7))
            .with_region(RegionOfInterest::new(1, 2, 3, 4))
    }

    #[test]
    fn test_posts_compact_json() {
        let sink = Arc::new(CollectSink::new());
        let converter = JsonConverter::new(ConverterConfig::default(), sink.clone());

        assert!(converter.to_json(&frame()));
        let messages = sink.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].pts, Some(7));
        assert_eq!(
            messages[0].json,
            r#"{"resolution":{"width":64,"height":48},"timestamp":7,"objects":[{"x":1,"y":2,"w":3,"h":4}]}"#
        );
    }

    #[test]
    fn test_indented_render() {
        let converter = JsonConverter::new(
            ConverterConfig::default().with_json_indent(Some(2)),
            Arc::new(CollectSink::new()),
        );
        let document = converter.convert(&frame()).unwrap();
        let text = converter.render(&document).unwrap();

        assert!(text.starts_with("{\n  \"resolution\": {\n    \"width\": 64"));
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, serde_json::to_value(&document).unwrap());
    }

    #[test]
    fn test_suppressed_frame_is_not_a_failure() {
        let sink = Arc::new(CollectSink::new());
        let converter = JsonConverter::new(ConverterConfig::default(), sink.clone());
        let empty = VideoFrame::new(Some(VideoInfo::new(64, 48)), Some(7));

        assert!(!converter.process(&empty).unwrap());
        assert!(converter.to_json(&empty));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_failure_reports_false() {
        let converter = JsonConverter::new(ConverterConfig::default(), Arc::new(FailingSink));
        assert!(!converter.to_json(&frame()));
        // The next frame is handled independently
        assert!(!converter.to_json(&frame()));
    }
}
