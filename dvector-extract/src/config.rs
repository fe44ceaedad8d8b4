//! Command-line configuration

use clap::Parser;
use dvector_features::{FeatureFormat, PoolingMethod};
use std::path::PathBuf;
use tracing::Level;

/// Extracts per-speaker d-vectors from utterance feature files.
#[derive(Debug, Clone, Parser)]
#[command(name = "dvector-extract", version)]
pub struct ExtractConfig {
    /// Manifest file listing utterance paths, or a directory scanned
    /// recursively
    pub input_data: PathBuf,

    /// Destination file for the serialized speaker-to-dvector mapping
    pub output_dvectors: PathBuf,

    /// Pooling statistic used to collapse frames into one vector
    #[arg(short = 'e', long, default_value_t = PoolingMethod::Mean)]
    pub extraction_method: PoolingMethod,

    /// On-disk format of the utterance feature files
    #[arg(short = 't', long = "type", default_value_t = FeatureFormat::AcousticFeature)]
    pub feature_type: FeatureFormat,

    /// Delimiter used to split filename stems into speaker-id parts
    #[arg(long, default_value = "_")]
    pub delimiter: String,

    /// Skip per-frame L2 normalization before pooling
    #[arg(long)]
    pub no_l2_norm: bool,

    /// Log verbosity: 10 shows debug output, lower values show more
    #[arg(short = 'd', long, default_value_t = 20)]
    pub debug: i32,
}

impl ExtractConfig {
    /// Map the numeric verbosity to a tracing level: 10 means debug,
    /// lower means chattier.
    pub fn log_level(&self) -> Level {
        match self.debug {
            d if d < 10 => Level::TRACE,
            d if d < 20 => Level::DEBUG,
            d if d < 30 => Level::INFO,
            d if d < 40 => Level::WARN,
            _ => Level::ERROR,
        }
    }
}
