//! Input frame model
//!
//! These types stand in for the media buffer and its attached metadata. The
//! converter only reads them; acquiring buffers, tracking segments and
//! attaching metadata is the job of whatever pipeline hosts the converter.

use serde::{Deserialize, Serialize};

use crate::structure::Structure;

/// Negotiated video format (only the geometry matters here)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
}

impl VideoInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Time segment used to map buffer timestamps to stream time
///
/// All positions are nanoseconds. `stop == None` means the segment is open
/// ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub stop: Option<u64>,
    #[serde(default)]
    pub time: u64,
    #[serde(default = "default_rate")]
    pub applied_rate: f64,
}

fn default_rate() -> f64 {
    1.0
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            time: 0,
            applied_rate: default_rate(),
        }
    }
}

impl Segment {
    /// Map a running position into stream time
    ///
    /// Returns `None` (the undefined stream time) when the position falls
    /// outside the segment, or when a reverse applied rate would move the
    /// result below zero.
    pub fn to_stream_time(&self, position: u64) -> Option<u64> {
        if position < self.start {
            return None;
        }
        if let Some(stop) = self.stop {
            if position > stop {
                return None;
            }
        }

        let elapsed = position - self.start;
        let scale = self.applied_rate.abs();
        let scaled = if scale == 1.0 {
            elapsed
        } else {
            (elapsed as f64 * scale) as u64
        };

        if self.applied_rate >= 0.0 {
            self.time.checked_add(scaled)
        } else {
            self.time.checked_sub(scaled)
        }
    }
}

/// Rectangular region of interest with its attached records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Tracking identifier, 0 when the region is untracked
    #[serde(default)]
    pub object_id: i32,
    /// Region type label, usually the detected class name
    #[serde(default)]
    pub roi_type: Option<String>,
    /// Attached records in attachment order
    #[serde(default)]
    pub params: Vec<Structure>,
}

impl RegionOfInterest {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Default::default()
        }
    }

    pub fn with_object_id(mut self, object_id: i32) -> Self {
        self.object_id = object_id;
        self
    }

    pub fn with_roi_type(mut self, roi_type: impl Into<String>) -> Self {
        self.roi_type = Some(roi_type.into());
        self
    }

    pub fn with_param(mut self, param: Structure) -> Self {
        self.params.push(param);
        self
    }
}

/// One video frame's analytics metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFrame {
    /// Negotiated format, absent until caps are known
    #[serde(default)]
    pub info: Option<VideoInfo>,
    /// Presentation timestamp in nanoseconds
    #[serde(default)]
    pub pts: Option<u64>,
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub regions: Vec<RegionOfInterest>,
    /// Frame-level inference outputs
    #[serde(default)]
    pub tensors: Vec<Structure>,
}

impl VideoFrame {
    pub fn new(info: Option<VideoInfo>, pts: Option<u64>) -> Self {
        Self {
            info,
            pts,
            ..Default::default()
        }
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segment = segment;
        self
    }

    pub fn with_region(mut self, region: RegionOfInterest) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_tensor(mut self, tensor: Structure) -> Self {
        self.tensors.push(tensor);
        self
    }

    /// Stream time of this frame's pts, `None` when undefined
    pub fn stream_time(&self) -> Option<u64> {
        self.pts.and_then(|pts| self.segment.to_stream_time(pts))
    }
}
