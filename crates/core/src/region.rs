//! Region of interest conversion
//!
//! Each region becomes one JSON object: geometry first, then the optional
//! `id` and `roi_type`, then one entry per classified record in attachment
//! order, and finally the per-region `tensors` array when tensor data is
//! requested.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::classify::{self, AttributeValue, DetectionOutput, RecordOutput};
use crate::frame::RegionOfInterest;
use crate::tensor::{self, Tensor, TensorObject, DETECTION_NAME};

/// Geometry keys, always present on a region object
const GEOMETRY_KEYS: &[&str] = &["x", "y", "w", "h"];

/// Value of one keyed region entry
#[derive(Debug, Clone, PartialEq)]
pub enum RegionEntry {
    Detection(DetectionOutput),
    Attribute(AttributeValue),
}

impl Serialize for RegionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RegionEntry::Detection(det) => det.serialize(serializer),
            RegionEntry::Attribute(attr) => attr.serialize(serializer),
        }
    }
}

/// Keyed entries in insertion order
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionEntries {
    entries: Vec<(String, RegionEntry)>,
}

impl RegionEntries {
    pub fn insert(&mut self, key: impl Into<String>, value: RegionEntry) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&RegionEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// JSON form of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionObject {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub id: Option<i32>,
    pub roi_type: Option<String>,
    pub entries: RegionEntries,
    /// Present (possibly empty) only when tensor data was requested
    pub tensors: Option<Vec<TensorObject>>,
}

impl RegionObject {
    /// Number of fields this object serializes to
    pub fn field_count(&self) -> usize {
        4 + usize::from(self.id.is_some())
            + usize::from(self.roi_type.is_some())
            + self.entries.len()
            + usize::from(self.tensors.is_some())
    }

    /// A region with no fields at all is left out of `objects`
    ///
    /// Geometry is always present, so this only guards the invariant.
    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }
}

impl Serialize for RegionObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_count()))?;
        map.serialize_entry("x", &self.x)?;
        map.serialize_entry("y", &self.y)?;
        map.serialize_entry("w", &self.w)?;
        map.serialize_entry("h", &self.h)?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        if let Some(roi_type) = &self.roi_type {
            map.serialize_entry("roi_type", roi_type)?;
        }
        for (key, entry) in self.entries.iter() {
            map.serialize_entry(key, entry)?;
        }
        if let Some(tensors) = &self.tensors {
            map.serialize_entry("tensors", tensors)?;
        }
        map.end()
    }
}

/// Convert one region
///
/// With `include_tensor_data`, every attached record is also appended to the
/// region's `tensors` array, whatever its classification.
pub fn convert_region(region: &RegionOfInterest, include_tensor_data: bool) -> RegionObject {
    let roi_type = region.roi_type.as_deref();
    let id = (region.object_id != 0).then_some(region.object_id);
    let mut entries = RegionEntries::default();
    let mut tensors = include_tensor_data.then(Vec::new);

    // Attributes cannot replace a field the region object already carries
    let is_region_field = |key: &str| match key {
        "id" => id.is_some(),
        "roi_type" => roi_type.is_some(),
        "tensors" => include_tensor_data,
        _ => GEOMETRY_KEYS.contains(&key),
    };

    for record in &region.params {
        match classify::classify(record, roi_type) {
            RecordOutput::Detection(det) => {
                entries.insert(DETECTION_NAME, RegionEntry::Detection(det));
            }
            RecordOutput::Attribute(attr) => {
                if is_region_field(&attr.key) {
                    tracing::debug!(
                        key = %attr.key,
                        record = record.name(),
                        "Attribute key collides with a region field, skipping"
                    );
                } else {
                    entries.insert(attr.key, RegionEntry::Attribute(attr.value));
                }
            }
            RecordOutput::Skip => {}
        }

        if let Some(tensors) = tensors.as_mut() {
            tensors.push(tensor::convert_tensor(&Tensor::new(record)));
        }
    }

    RegionObject {
        x: region.x,
        y: region.y,
        w: region.w,
        h: region.h,
        id,
        roi_type: region.roi_type.clone(),
        entries,
        tensors,
    }
}

/// Convert all regions, dropping any that come out empty
pub fn convert_regions(regions: &[RegionOfInterest], include_tensor_data: bool) -> Vec<RegionObject> {
    regions
        .iter()
        .map(|region| convert_region(region, include_tensor_data))
        .filter(|object| !object.is_empty())
        .collect()
}
