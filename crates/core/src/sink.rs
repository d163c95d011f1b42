//! Message sink trait and implementations
//!
//! A finished document is handed to a [`MessageSink`] as a [`FrameMessage`].
//! The converter does not care where it ends up:
//! - `JsonlSink` - one JSON document per line on any writer
//! - `ChannelSink` - broadcast channel for in-process subscribers
//! - `CollectSink` - in-memory list
//! - `MultiSink` - fan-out to several sinks

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

/// Serialized document for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMessage {
    /// Presentation timestamp of the frame the document describes
    pub pts: Option<u64>,
    /// Serialized JSON document
    pub json: String,
}

impl FrameMessage {
    pub fn new(pts: Option<u64>, json: impl Into<String>) -> Self {
        Self {
            pts,
            json: json.into(),
        }
    }
}

/// Trait for message delivery targets
pub trait MessageSink: Send + Sync {
    /// Deliver one frame's message
    fn post(&self, message: FrameMessage) -> Result<(), SinkError>;

    /// Close the sink and perform any cleanup
    fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Error type for sink operations
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Channel send error: {0}")]
    Channel(String),

    #[error("Sink lock poisoned")]
    Poisoned,
}

/// Newline-delimited JSON sink
///
/// Documents must be compact for the output to stay one per line.
pub struct JsonlSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }
}

impl JsonlSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> MessageSink for JsonlSink<W> {
    fn post(&self, message: FrameMessage) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(writer, "{}", message.json)?;
        writer.flush()?;
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}

/// Broadcast channel sink
pub struct ChannelSink {
    sender: broadcast::Sender<FrameMessage>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<FrameMessage>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Create a channel sink with default capacity (256)
    pub fn with_default_capacity() -> (Self, broadcast::Receiver<FrameMessage>) {
        Self::new(256)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FrameMessage> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl MessageSink for ChannelSink {
    fn post(&self, message: FrameMessage) -> Result<(), SinkError> {
        self.sender
            .send(message)
            .map_err(|e| SinkError::Channel(e.to_string()))?;
        Ok(())
    }
}

/// Keeps every message in memory
#[derive(Default)]
pub struct CollectSink {
    messages: Mutex<Vec<FrameMessage>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all collected messages, leaving the sink empty
    pub fn drain(&self) -> Vec<FrameMessage> {
        std::mem::take(&mut *self.messages())
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    /// Collected messages stay readable after a panicking writer
    fn messages(&self) -> MutexGuard<'_, Vec<FrameMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSink for CollectSink {
    fn post(&self, message: FrameMessage) -> Result<(), SinkError> {
        self.messages
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(message);
        Ok(())
    }
}

/// Forwards every message to several sinks
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn MessageSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn MessageSink>) {
        self.sinks.push(sink);
    }
}

impl MessageSink for MultiSink {
    fn post(&self, message: FrameMessage) -> Result<(), SinkError> {
        for sink in &self.sinks {
            sink.post(message.clone())?;
        }
        Ok(())
    }

    fn close(&self) -> Result<(), SinkError> {
        for sink in &self.sinks {
            sink.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_jsonl_sink() {
        let sink = JsonlSink::new(Vec::new());

        sink.post(FrameMessage::new(Some(1), r#"{"source":"a"}"#)).unwrap();
        sink.post(FrameMessage::new(Some(2), r#"{"source":"b"}"#)).unwrap();

        let output = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec![r#"{"source":"a"}"#, r#"{"source":"b"}"#]);
    }

    #[test]
    fn test_collect_sink_drain() {
        let sink = CollectSink::new();
        sink.post(FrameMessage::new(None, "{}")).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.drain(), vec![FrameMessage::new(None, "{}")]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_collect_sink_keeps_messages_after_poisoning() {
        let sink = Arc::new(CollectSink::new());
        sink.post(FrameMessage::new(Some(1), "{}")).unwrap();

        let poisoner = sink.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.messages.lock().unwrap();
            panic!("writer panicked while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.messages.is_poisoned());

        assert!(matches!(
            sink.post(FrameMessage::new(Some(2), "{}")),
            Err(SinkError::Poisoned)
        ));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.drain(), vec![FrameMessage::new(Some(1), "{}")]);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut receiver) = ChannelSink::with_default_capacity();

        sink.post(FrameMessage::new(Some(10), "first")).unwrap();
        sink.post(FrameMessage::new(Some(20), "second")).unwrap();

        assert_eq!(receiver.recv().await.unwrap().json, "first");
        assert_eq!(receiver.recv().await.unwrap().pts, Some(20));
    }

    #[test]
    fn test_channel_sink_without_receivers_errors() {
        let (sink, receiver) = ChannelSink::new(4);
        drop(receiver);

        assert_eq!(sink.receiver_count(), 0);
        assert!(matches!(
            sink.post(FrameMessage::new(None, "{}")),
            Err(SinkError::Channel(_))
        ));
    }

    #[test]
    fn test_multi_sink_fans_out() {
        struct Shared(Arc<CollectSink>);

        impl MessageSink for Shared {
            fn post(&self, message: FrameMessage) -> Result<(), SinkError> {
                self.0.post(message)
            }
        }

        let first = Arc::new(CollectSink::new());
        let second = Arc::new(CollectSink::new());
        let mut multi = MultiSink::new();
        multi.add_sink(Box::new(Shared(first.clone())));
        multi.add_sink(Box::new(Shared(second.clone())));

        multi.post(FrameMessage::new(Some(5), "{}")).unwrap();
        multi.close().unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }
}
