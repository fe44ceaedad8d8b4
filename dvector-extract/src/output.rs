//! Serialized speaker-to-dvector mapping
//!
//! The run's sole persisted artifact: a MessagePack map from speaker id to
//! embedding vector, written whole-file at the end of the batch.

use crate::error::Result;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Insertion-ordered mapping from speaker id to d-vector.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DvectorMap {
    entries: Vec<(String, Vec<f64>)>,
}

impl DvectorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a speaker's d-vector, replacing any previous value without
    /// disturbing the speaker's position.
    pub fn insert(&mut self, speaker: String, dvector: Vec<f64>) {
        match self.entries.iter_mut().find(|(s, _)| *s == speaker) {
            Some((_, existing)) => *existing = dvector,
            None => self.entries.push((speaker, dvector)),
        }
    }

    pub fn get(&self, speaker: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(s, _)| s == speaker)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(speaker, vector)| (speaker.as_str(), vector.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DvectorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (speaker, vector) in &self.entries {
            map.serialize_entry(speaker, vector)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DvectorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DvectorMapVisitor;

        impl<'de> Visitor<'de> for DvectorMapVisitor {
            type Value = DvectorMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from speaker id to d-vector")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((speaker, vector)) = access.next_entry::<String, Vec<f64>>()? {
                    entries.push((speaker, vector));
                }
                Ok(DvectorMap { entries })
            }
        }

        deserializer.deserialize_map(DvectorMapVisitor)
    }
}

/// Serialize the mapping to `path` as MessagePack, whole-file, no
/// streaming.
pub fn write_dvectors(path: &Path, dvectors: &DvectorMap) -> Result<()> {
    let bytes = rmp_serde::to_vec(dvectors)?;
    fs::write(path, bytes)?;
    info!(
        "Wrote {} d-vectors to {}",
        dvectors.len(),
        path.display()
    );
    Ok(())
}

/// Read a mapping back from `path`.
pub fn read_dvectors(path: &Path) -> Result<DvectorMap> {
    let bytes = fs::read(path)?;
    Ok(rmp_serde::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_preserves_keys_order_and_values() {
        let mut dvectors = DvectorMap::new();
        dvectors.insert("spkB_utt1".to_string(), vec![0.5, -1.0, 2.0]);
        dvectors.insert("spkA_utt1".to_string(), vec![1.0, 0.0, 0.25]);

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.dvec");
        write_dvectors(&path, &dvectors).unwrap();
        let loaded = read_dvectors(&path).unwrap();

        assert_eq!(loaded, dvectors);
        let speakers: Vec<&str> = loaded.iter().map(|(s, _)| s).collect();
        assert_eq!(speakers, ["spkB_utt1", "spkA_utt1"]);
    }

    #[test]
    fn test_empty_mapping_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.dvec");
        write_dvectors(&path, &DvectorMap::new()).unwrap();

        let loaded = read_dvectors(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut dvectors = DvectorMap::new();
        dvectors.insert("spkA".to_string(), vec![1.0]);
        dvectors.insert("spkB".to_string(), vec![2.0]);
        dvectors.insert("spkA".to_string(), vec![3.0]);

        assert_eq!(dvectors.len(), 2);
        assert_eq!(dvectors.get("spkA").unwrap(), &[3.0]);
        let speakers: Vec<&str> = dvectors.iter().map(|(s, _)| s).collect();
        assert_eq!(speakers, ["spkA", "spkB"]);
    }

    #[test]
    fn test_read_garbage_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.dvec");
        std::fs::write(&path, b"not messagepack at all").unwrap();
        assert!(read_dvectors(&path).is_err());
    }
}
