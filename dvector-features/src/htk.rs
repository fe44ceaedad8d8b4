//! HTK parameter-file reader
//!
//! HTK feature files carry a 12-byte big-endian header followed by one
//! feature vector per frame, stored as big-endian `f32` values for
//! uncompressed parameter kinds. Compressed (`_C`) and checksummed (`_K`)
//! files are rejected.

use crate::error::{FeatureError, Result};
use ndarray::Array2;
use std::fs;
use std::path::Path;
use tracing::debug;

/// `_C` qualifier bit: compressed samples
const QUAL_COMPRESSED: u16 = 0o2000;
/// `_K` qualifier bit: CRC checksum appended
const QUAL_CRC: u16 = 0o10000;

/// Bytes per feature value in uncompressed parameter files
const FLOAT_WIDTH: usize = 4;

/// Decoded HTK file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtkHeader {
    /// Number of frames in the file
    pub num_samples: u32,
    /// Frame period in 100ns units
    pub sample_period: u32,
    /// Bytes per frame
    pub sample_size: u16,
    /// Parameter kind code, including qualifier bits
    pub parm_kind: u16,
}

impl HtkHeader {
    /// Feature dimension implied by the frame byte width.
    pub fn feature_dim(&self) -> usize {
        self.sample_size as usize / FLOAT_WIDTH
    }
}

/// Read an HTK parameter file as a `(matrix, header)` pair.
///
/// Fails with [`FeatureError::Format`] on compressed or checksummed files,
/// nonsensical header fields, or a payload shorter than the header claims.
pub fn read(path: &Path) -> Result<(Array2<f64>, HtkHeader)> {
    let bytes = fs::read(path)?;
    parse(&bytes).map_err(|e| FeatureError::format(format!("{}: {}", path.display(), e)))
}

fn parse(bytes: &[u8]) -> std::result::Result<(Array2<f64>, HtkHeader), String> {
    if bytes.len() < 12 {
        return Err("truncated HTK header".to_string());
    }

    let num_samples = i32::from_be_bytes(bytes[0..4].try_into().unwrap());
    let sample_period = i32::from_be_bytes(bytes[4..8].try_into().unwrap());
    let sample_size = i16::from_be_bytes(bytes[8..10].try_into().unwrap());
    let parm_kind = u16::from_be_bytes(bytes[10..12].try_into().unwrap());

    if num_samples < 0 || sample_period < 0 {
        return Err(format!(
            "invalid HTK header: num_samples={num_samples}, sample_period={sample_period}"
        ));
    }
    if sample_size <= 0 || sample_size as usize % FLOAT_WIDTH != 0 {
        return Err(format!("invalid HTK sample size {sample_size}"));
    }
    if parm_kind & QUAL_COMPRESSED != 0 {
        return Err("compressed (_C) HTK files are not supported".to_string());
    }
    if parm_kind & QUAL_CRC != 0 {
        return Err("checksummed (_K) HTK files are not supported".to_string());
    }

    let header = HtkHeader {
        num_samples: num_samples as u32,
        sample_period: sample_period as u32,
        sample_size: sample_size as u16,
        parm_kind,
    };

    let frames = header.num_samples as usize;
    let dim = header.feature_dim();
    let needed = frames * dim * FLOAT_WIDTH;
    let payload = &bytes[12..];
    if payload.len() < needed {
        return Err(format!(
            "truncated HTK payload: header claims {} frames x {} dims, got {} bytes",
            frames,
            dim,
            payload.len()
        ));
    }

    let mut data = Vec::with_capacity(frames * dim);
    for chunk in payload[..needed].chunks_exact(FLOAT_WIDTH) {
        data.push(f32::from_be_bytes(chunk.try_into().unwrap()) as f64);
    }
    debug!("HTK file: {} frames, {} dims, kind {:#o}", frames, dim, parm_kind);

    let matrix = Array2::from_shape_vec((frames, dim), data).map_err(|e| e.to_string())?;
    Ok((matrix, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    fn htk_bytes(frames: &[[f32; 2]], parm_kind: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(frames.len() as i32).to_be_bytes());
        bytes.extend_from_slice(&100000i32.to_be_bytes());
        bytes.extend_from_slice(&8i16.to_be_bytes());
        bytes.extend_from_slice(&parm_kind.to_be_bytes());
        for frame in frames {
            for value in frame {
                bytes.extend_from_slice(&value.to_be_bytes());
            }
        }
        bytes
    }

    #[test]
    fn test_read_uncompressed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utt.plp");
        // Parameter kind 11 = PLP
        std::fs::write(&path, htk_bytes(&[[1.0, 2.0], [3.0, 4.0]], 11)).unwrap();

        let (matrix, header) = read(&path).unwrap();
        assert_eq!(matrix, array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(header.num_samples, 2);
        assert_eq!(header.sample_period, 100000);
        assert_eq!(header.feature_dim(), 2);
    }

    #[test]
    fn test_rejects_compressed() {
        let err = parse(&htk_bytes(&[[1.0, 2.0]], 11 | QUAL_COMPRESSED)).unwrap_err();
        assert!(err.contains("compressed"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_crc() {
        let err = parse(&htk_bytes(&[[1.0, 2.0]], 11 | QUAL_CRC)).unwrap_err();
        assert!(err.contains("checksummed"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let mut bytes = htk_bytes(&[[1.0, 2.0], [3.0, 4.0]], 11);
        bytes.truncate(bytes.len() - 4);
        let err = parse(&bytes).unwrap_err();
        assert!(err.contains("truncated"), "unexpected error: {err}");
    }

    #[test]
    fn test_rejects_short_header() {
        let err = parse(&[0u8; 6]).unwrap_err();
        assert!(err.contains("truncated"), "unexpected error: {err}");
    }

    #[test]
    fn test_zero_frames_is_an_empty_matrix() {
        let (matrix, header) = parse(&htk_bytes(&[], 9)).unwrap();
        assert_eq!(matrix.nrows(), 0);
        assert_eq!(matrix.ncols(), header.feature_dim());
    }
}
