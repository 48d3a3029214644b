// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Track library keyed by identifier.
//!
//! Keeps tracks in first-seen order so a pool snapshot is stable
//! across runs, which the compiler's tie-breaking relies on.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

use super::track::Track;

/// All known tracks, upserted by ID
#[derive(Debug, Clone, Default)]
pub struct TrackLibrary {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from tracks; later duplicates overwrite earlier ones
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut library = Self::new();
        for track in tracks {
            library.insert(track);
        }
        library
    }

    /// Insert or overwrite a track and stamp it as freshly analyzed.
    ///
    /// An existing track keeps its position.
    pub fn upsert(&mut self, mut track: Track) {
        track.analyzed_at = Some(Utc::now());
        self.insert(track);
    }

    fn insert(&mut self, track: Track) {
        match self.index.get(&track.id) {
            Some(&slot) => {
                debug!(id = %track.id, "Updating track");
                self.tracks[slot] = track;
            }
            None => {
                self.index.insert(track.id.clone(), self.tracks.len());
                self.tracks.push(track);
            }
        }
    }

    /// Look up a track by ID
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&slot| &self.tracks[slot])
    }

    /// Tracks in first-seen order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the library holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Load a library from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read library file: {:?}", path.as_ref()))?;
        Self::from_json(&contents)
    }

    /// Load a library, or start empty if the file does not exist yet
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Parse a library from a JSON array of tracks
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json).context("Failed to parse library JSON")?;
        Ok(Self::from_tracks(tracks))
    }

    /// Serialize to a JSON array
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.tracks).context("Failed to serialize library to JSON")
    }

    /// Save the library to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write library file: {:?}", path.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Mode;
    use tempfile::tempdir;

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut library = TrackLibrary::new();
        library.upsert(Track::new("a", "First", "X").with_tempo(120.0));
        library.upsert(Track::new("b", "Second", "Y"));
        let stamped = library.get("a").unwrap().analyzed_at;

        library.upsert(Track::new("a", "First (Edit)", "X").with_tempo(126.0));

        assert_eq!(library.len(), 2);
        assert_eq!(library.tracks()[0].id, "a");
        assert_eq!(library.tracks()[0].name, "First (Edit)");
        assert_eq!(library.tracks()[0].tempo, Some(126.0));
        assert!(library.get("a").unwrap().analyzed_at >= stamped);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut library = TrackLibrary::new();
        for _ in 0..3 {
            library.upsert(Track::new("a", "Song", "X"));
        }
        assert_eq!(library.len(), 1);
        assert!(library.get("a").unwrap().analyzed_at.is_some());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library.json");

        let mut library = TrackLibrary::new();
        library.upsert(Track::new("a", "Song", "X").with_key(2, Mode::Major).with_energy(0.6));
        library.upsert(Track::new("b", "Other", "Y"));
        library.save(&path).unwrap();

        let loaded = TrackLibrary::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.tracks()[0].harmonic().unwrap().to_string(), "10B");
        assert_eq!(loaded.tracks()[0].energy, Some(0.6));
        assert_eq!(loaded.tracks()[1].id, "b");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let library = TrackLibrary::load_or_default(dir.path().join("none.json")).unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(TrackLibrary::load(&path).is_err());
    }
}
