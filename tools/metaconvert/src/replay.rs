//! Line-by-line frame replay

use anyhow::{Context, Result};
use metaconvert_core::{JsonConverter, VideoFrame};
use std::io::BufRead;

/// Counters reported at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Frames parsed and handed to the converter
    pub frames: u64,
    /// Input lines that were not valid frames
    pub skipped_lines: u64,
    /// Frames whose conversion failed
    pub failed: u64,
}

/// Convert every frame read from `reader`
///
/// Blank lines are ignored and malformed lines are logged and skipped; only
/// read errors abort the run.
pub fn replay<R: BufRead>(reader: R, converter: &JsonConverter) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: VideoFrame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "Skipping malformed frame");
                summary.skipped_lines += 1;
                continue;
            }
        };

        summary.frames += 1;
        if !converter.to_json(&frame) {
            summary.failed += 1;
        }
    }

    Ok(summary)
}
