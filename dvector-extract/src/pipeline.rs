//! Batch driver: grouping, per-speaker extraction, serialization
//!
//! One linear pass, fail-fast: the first error anywhere aborts the run.

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::grouping::group_utterances;
use crate::output::{write_dvectors, DvectorMap};
use dvector_features::{l2_normalize, pool, pool_singleton, read_features};
use ndarray::Array1;
use std::path::PathBuf;
use tracing::{debug, info};

/// Extract the d-vector mapping for the configured input.
///
/// Groups with the full filename stem as speaker id, so each group holds a
/// single utterance unless stems collide; only the first utterance of a
/// group contributes to its d-vector.
pub fn extract(config: &ExtractConfig) -> Result<DvectorMap> {
    let groups = group_utterances(&config.input_data, &config.delimiter, None)?;
    info!("Input data consists of {} speakers", groups.len());
    info!(
        "Extracting d-vectors [{}] for the input data",
        config.extraction_method
    );

    let mut dvectors = DvectorMap::new();
    for (speaker, utterances) in groups.iter() {
        let vector = extract_dvector(speaker, utterances, config)?;
        dvectors.insert(speaker.to_string(), vector.to_vec());
    }
    Ok(dvectors)
}

fn extract_dvector(
    speaker: &str,
    utterances: &[PathBuf],
    config: &ExtractConfig,
) -> Result<Array1<f64>> {
    let utterance = utterances.first().ok_or_else(|| {
        ExtractError::grouping(format!("speaker '{speaker}' has no utterances"))
    })?;
    if utterances.len() > 1 {
        debug!(
            "Speaker '{}' has {} utterances; keeping the first",
            speaker,
            utterances.len()
        );
    }

    let features = read_features(utterance, config.feature_type)?;
    let dvector = if config.no_l2_norm {
        pool_singleton(&features, config.extraction_method)?
    } else {
        pool(&l2_normalize(&features), config.extraction_method)?
    };
    debug!(
        "{}: pooled {} frames into {} dims",
        utterance.display(),
        features.nrows(),
        dvector.len()
    );
    Ok(dvector)
}

/// Run the whole batch: group, extract, serialize.
pub fn run(config: &ExtractConfig) -> Result<()> {
    let dvectors = extract(config)?;
    write_dvectors(&config.output_dvectors, &dvectors)?;
    info!("Extraction done!");
    Ok(())
}
