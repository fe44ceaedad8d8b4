//! dvector-extract - batch d-vector extraction
//!
//! Reads per-utterance feature files (NPY or HTK), pools L2-normalized
//! frames into one embedding per speaker, and serializes the resulting
//! mapping as MessagePack.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use dvector_extract::config::ExtractConfig;
use dvector_extract::pipeline;

fn main() {
    let config = ExtractConfig::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .with_target(false)
        .init();

    info!(
        "Extracting d-vectors from {} into {}",
        config.input_data.display(),
        config.output_dvectors.display()
    );

    let result = pipeline::run(&config).context("d-vector extraction failed");
    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
