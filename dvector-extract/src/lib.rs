//! Batch d-vector extraction library
//!
//! Re-exports the extractor's modules for integration testing. The
//! `dvector-extract` binary wires these together: group utterances by
//! speaker, pool each utterance's frames into one embedding, serialize the
//! speaker-to-dvector mapping.

pub mod config;
pub mod error;
pub mod grouping;
pub mod output;
pub mod pipeline;

pub use config::ExtractConfig;
pub use error::{ExtractError, Result};
pub use grouping::{group_utterances, SpeakerGroups};
pub use output::{read_dvectors, write_dvectors, DvectorMap};
