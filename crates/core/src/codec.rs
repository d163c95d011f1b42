//! Raw tensor buffer decoding
//!
//! U8 buffers are emitted element by element as integers. Every other
//! precision, including an absent or unrecognised one, is decoded as native
//! endian f32, which is what inference outputs carry in practice.

use serde::Serialize;

use crate::tensor::Precision;

/// Decoded tensor contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TensorData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::U8(values) => values.len(),
            TensorData::F32(values) => values.len(),
        }
    }

    /// An empty result counts as "no data" and is left out of the output
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a raw buffer according to its declared precision
///
/// Trailing bytes that do not fill a whole f32 are ignored.
pub fn encode(precision: Option<Precision>, raw: &[u8]) -> TensorData {
    match precision {
        Some(Precision::U8) => TensorData::U8(raw.to_vec()),
        _ => TensorData::F32(
            raw.chunks_exact(std::mem::size_of::<f32>())
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        bytemuck::cast_slice(values).to_vec()
    }

    #[test]
    fn test_u8_buffer_emits_integers() {
        let data = encode(Some(Precision::U8), &[0, 128, 255]);
        assert_eq!(data, TensorData::U8(vec![0, 128, 255]));
        assert_eq!(serde_json::to_value(&data).unwrap(), json!([0, 128, 255]));
    }

    #[test]
    fn test_f32_buffer_emits_floats() {
        let data = encode(Some(Precision::Fp32), &f32_bytes(&[0.5, -1.25]));
        assert_eq!(data, TensorData::F32(vec![0.5, -1.25]));
        assert_eq!(serde_json::to_value(&data).unwrap(), json!([0.5, -1.25]));
    }

    #[test]
    fn test_other_precisions_fall_back_to_float() {
        let raw = f32_bytes(&[2.0]);
        assert_eq!(encode(Some(Precision::I32), &raw), TensorData::F32(vec![2.0]));
        assert_eq!(
            encode(Some(Precision::Unspecified), &raw),
            TensorData::F32(vec![2.0])
        );
        assert_eq!(encode(None, &raw), TensorData::F32(vec![2.0]));
    }

    #[test]
    fn test_partial_trailing_bytes_ignored() {
        let mut raw = f32_bytes(&[1.0, 3.5]);
        raw.extend_from_slice(&[0xAB, 0xCD]);
        assert_eq!(encode(Some(Precision::Fp32), &raw), TensorData::F32(vec![1.0, 3.5]));
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(encode(Some(Precision::U8), &[]).is_empty());
        assert!(encode(Some(Precision::Fp32), &[]).is_empty());
        assert!(encode(Some(Precision::Fp32), &[1, 2, 3]).is_empty());
    }
}
