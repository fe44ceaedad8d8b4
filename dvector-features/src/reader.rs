//! Feature-file format dispatch

use crate::error::{FeatureError, Result};
use crate::{htk, npy};
use ndarray::Array2;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported on-disk feature formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureFormat {
    /// Serialized 2-D NPY array
    NumericArray,
    /// HTK parameter file
    AcousticFeature,
}

impl fmt::Display for FeatureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericArray => write!(f, "numeric-array"),
            Self::AcousticFeature => write!(f, "acoustic-feature"),
        }
    }
}

impl FromStr for FeatureFormat {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "numeric-array" => Ok(Self::NumericArray),
            "acoustic-feature" => Ok(Self::AcousticFeature),
            other => Err(FeatureError::format(format!(
                "unknown feature format '{other}' (expected numeric-array or acoustic-feature)"
            ))),
        }
    }
}

/// Load one utterance's feature matrix.
///
/// For HTK input the header metadata is dropped and only the matrix is
/// kept.
pub fn read_features(path: &Path, format: FeatureFormat) -> Result<Array2<f64>> {
    match format {
        FeatureFormat::NumericArray => npy::read_matrix(path),
        FeatureFormat::AcousticFeature => htk::read(path).map(|(matrix, _)| matrix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_format_parsing() {
        assert_eq!(
            "numeric-array".parse::<FeatureFormat>().unwrap(),
            FeatureFormat::NumericArray
        );
        assert_eq!(
            "acoustic-feature".parse::<FeatureFormat>().unwrap(),
            FeatureFormat::AcousticFeature
        );
        assert!("csv".parse::<FeatureFormat>().is_err());
        assert_eq!(FeatureFormat::AcousticFeature.to_string(), "acoustic-feature");
    }

    #[test]
    fn test_dispatch_to_npy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utt.npy");
        let matrix = array![[1.0, 2.0], [3.0, 4.0]];
        npy::write_matrix(&path, &matrix).unwrap();

        let loaded = read_features(&path, FeatureFormat::NumericArray).unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_npy_file_read_as_htk_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utt.npy");
        npy::write_matrix(&path, &array![[1.0, 2.0]]).unwrap();

        assert!(read_features(&path, FeatureFormat::AcousticFeature).is_err());
    }
}
