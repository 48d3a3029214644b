// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Feature ingestion.
//!
//! Turns the catalog's raw track items and audio-feature records into
//! [`Track`]s and upserts them into a [`TrackLibrary`]. This is the
//! boundary with whatever fetched the data; nothing here talks to the
//! network.

pub mod library;
pub mod track;

pub use library::TrackLibrary;
pub use track::{Track, DEFAULT_ENERGY};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::music::Mode;

/// Prefix for identifiers synthesized for local files
pub const LOCAL_ID_PREFIX: &str = "local::";

/// An artist credit on a raw track item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
}

/// A track item as listed by the catalog (e.g. a playlist entry)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    /// Catalog ID; absent for local files
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<RawArtist>,
    /// Local file that only exists on the owner's machine
    #[serde(default)]
    pub is_local: bool,
    /// Item type; anything other than "track" (e.g. episodes) is skipped
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
}

impl RawTrack {
    /// Create a catalog track item
    pub fn new(id: &str, name: &str, artists: &[&str]) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            artists: artists
                .iter()
                .map(|a| RawArtist {
                    name: Some(a.to_string()),
                })
                .collect(),
            is_local: false,
            item_type: Some("track".to_string()),
        }
    }

    fn artist_names(&self) -> impl Iterator<Item = &str> {
        self.artists
            .iter()
            .filter_map(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
    }

    fn is_track(&self) -> bool {
        self.item_type.as_deref().map_or(true, |t| t == "track")
    }

    /// Stable identifier: the catalog ID, or a synthesized one for local files
    pub fn reference(&self) -> Option<String> {
        if !self.is_track() {
            return None;
        }
        if let Some(id) = self.id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }
        if self.is_local {
            let name = self.name.as_deref().unwrap_or("unknown");
            let artists: Vec<&str> = self.artist_names().collect();
            return Some(format!("{}{}::{}", LOCAL_ID_PREFIX, name, artists.join(",")));
        }
        None
    }
}

/// An audio-features record for one catalog ID
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatures {
    pub id: String,
    #[serde(default)]
    pub tempo: Option<f64>,
    /// Pitch class 0-11; the catalog uses -1 for "no key detected"
    #[serde(default)]
    pub key: Option<i64>,
    #[serde(default)]
    pub mode: Option<i64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub loudness: Option<f64>,
}

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Tracks upserted into the library
    pub imported: usize,
    /// Items without a usable identifier or of a non-track type
    pub skipped: usize,
}

/// Build a [`Track`] from a raw item and its features, if it has an identity
pub fn normalize(raw: &RawTrack, features: Option<&RawFeatures>) -> Option<Track> {
    let id = raw.reference()?;
    let artist = raw.artist_names().collect::<Vec<_>>().join(", ");
    let mut track = Track::new(id, raw.name.clone().unwrap_or_default(), artist);

    if let Some(f) = features {
        track.tempo = f.tempo;
        track.set_key(
            f.key.map(|k| k.rem_euclid(12) as i32),
            f.mode.and_then(Mode::from_raw),
        );
        track.energy = f.energy;
        track.danceability = f.danceability;
        track.valence = f.valence;
        track.loudness = f.loudness;
    }

    Some(track)
}

/// Identifiers of all usable items, in input order
pub fn track_refs(raw_tracks: &[RawTrack]) -> Vec<String> {
    raw_tracks.iter().filter_map(RawTrack::reference).collect()
}

/// Normalize raw items and upsert them into `library`
pub fn import(library: &mut TrackLibrary, raw_tracks: &[RawTrack], features: &[RawFeatures]) -> ImportReport {
    let by_id: HashMap<&str, &RawFeatures> = features.iter().map(|f| (f.id.as_str(), f)).collect();
    let mut report = ImportReport::default();

    for raw in raw_tracks {
        let feats = raw.id.as_deref().and_then(|id| by_id.get(id).copied());
        match normalize(raw, feats) {
            Some(track) => {
                if feats.is_none() {
                    debug!(id = %track.id, "No audio features for track");
                }
                library.upsert(track);
                report.imported += 1;
            }
            None => {
                debug!(name = ?raw.name, item_type = ?raw.item_type, "Skipping item without identity");
                report.skipped += 1;
            }
        }
    }

    info!(imported = report.imported, skipped = report.skipped, "Import complete");
    report
}
