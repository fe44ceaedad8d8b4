//! Feature-file loading and frame pooling for d-vector extraction
//!
//! A d-vector is a fixed-length embedding summarizing the frames of one
//! utterance. This crate provides the numeric half of the extraction
//! pipeline:
//!
//! - Readers for serialized NPY arrays and HTK parameter files
//! - Per-frame L2 normalization
//! - Mean/max/variance pooling across the frame axis
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use dvector_features::{l2_normalize, pool, read_features, FeatureFormat, PoolingMethod};
//!
//! let features = read_features(Path::new("utt.plp"), FeatureFormat::AcousticFeature)?;
//! let dvector = pool(&l2_normalize(&features), PoolingMethod::Mean)?;
//! assert_eq!(dvector.len(), features.ncols());
//! # Ok::<(), dvector_features::FeatureError>(())
//! ```

pub mod error;
pub mod htk;
pub mod norm;
pub mod npy;
pub mod pool;
pub mod reader;

pub use error::{FeatureError, Result};
pub use htk::HtkHeader;
pub use norm::l2_normalize;
pub use pool::{pool, pool_singleton, PoolingMethod};
pub use reader::{read_features, FeatureFormat};
