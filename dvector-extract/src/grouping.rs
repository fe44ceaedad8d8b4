//! Speaker grouping from manifests and directory trees
//!
//! Speaker identity is inferred from filename structure, not file content:
//! the filename stem is split on a delimiter and an optional subset of the
//! parts is rejoined into the speaker id. Without an index list the id is
//! the full stem.

use crate::error::{ExtractError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Insertion-ordered mapping from speaker id to utterance paths.
///
/// Kept separate from the output mapping on purpose: paths in, vectors
/// out, two types.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpeakerGroups {
    entries: Vec<(String, Vec<PathBuf>)>,
    index: HashMap<String, usize>,
}

impl SpeakerGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance to a speaker's list, creating the list on the
    /// speaker's first occurrence.
    pub fn push(&mut self, speaker: String, utterance: PathBuf) {
        match self.index.get(&speaker) {
            Some(&i) => self.entries[i].1.push(utterance),
            None => {
                self.index.insert(speaker.clone(), self.entries.len());
                self.entries.push((speaker, vec![utterance]));
            }
        }
    }

    pub fn get(&self, speaker: &str) -> Option<&[PathBuf]> {
        self.index
            .get(speaker)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Iterate groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(speaker, utts)| (speaker.as_str(), utts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enumerate utterance paths from the input.
///
/// A regular file is treated as a manifest: one utterance path per
/// non-empty line. A directory is walked recursively, collecting every
/// regular file at any depth, in traversal order, with no extension
/// filtering.
pub fn list_utterances(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        let contents = fs::read_to_string(input)?;
        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    } else if input.is_dir() {
        let mut found = Vec::new();
        walk_dir(input, &mut found)?;
        Ok(found)
    } else {
        Err(ExtractError::config(format!(
            "input path {} is neither a file nor a directory",
            input.display()
        )))
    }
}

fn walk_dir(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, found)?;
        } else if path.is_file() {
            found.push(path);
        }
    }
    Ok(())
}

/// Derive a speaker id from an utterance path.
///
/// The filename stem is split on `delimiter`; with `ids`, the selected
/// parts are rejoined with the same delimiter (0-based, order and
/// duplicates as given). Without `ids` the id equals the stem.
pub fn speaker_id(utterance: &Path, delimiter: &str, ids: Option<&[usize]>) -> Result<String> {
    let stem = utterance
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            ExtractError::grouping(format!(
                "cannot derive a filename stem from {}",
                utterance.display()
            ))
        })?;

    let splits: Vec<&str> = stem.split(delimiter).collect();
    match ids {
        Some(ids) => {
            let mut parts = Vec::with_capacity(ids.len());
            for &i in ids {
                let part = splits.get(i).ok_or_else(|| {
                    ExtractError::grouping(format!(
                        "speaker-id index {} out of range for '{}' ({} parts with delimiter '{}')",
                        i,
                        stem,
                        splits.len(),
                        delimiter
                    ))
                })?;
                parts.push(*part);
            }
            Ok(parts.join(delimiter))
        }
        None => Ok(splits.join(delimiter)),
    }
}

/// Build the speaker-to-utterances mapping for the whole input.
///
/// Empty input (an empty manifest or directory) yields an empty mapping,
/// not an error.
pub fn group_utterances(
    input: &Path,
    delimiter: &str,
    ids: Option<&[usize]>,
) -> Result<SpeakerGroups> {
    if delimiter.is_empty() {
        return Err(ExtractError::config("delimiter must not be empty"));
    }

    let utterances = list_utterances(input)?;
    debug!("Found {} utterance paths under {}", utterances.len(), input.display());

    let mut groups = SpeakerGroups::new();
    for utterance in utterances {
        let speaker = speaker_id(&utterance, delimiter, ids)?;
        groups.push(speaker, utterance);
    }
    Ok(groups)
}
