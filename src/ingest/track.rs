// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The analyzed track record the engine works on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::music::{CamelotKey, Mode};

/// Energy assumed for tracks without an energy feature
pub const DEFAULT_ENERGY: f64 = 0.5;

/// Tempo at which the composite score's tempo component saturates
const COMPOSITE_TEMPO_CEILING: f64 = 160.0;

/// Loudness floor (dB) for the composite score
const COMPOSITE_LOUDNESS_FLOOR: f64 = -60.0;

/// One analyzed audio item.
///
/// Every musical feature is optional. The harmonic label is rederived
/// whenever key or mode change (and on deserialization), so it cannot
/// drift from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrackRecord")]
pub struct Track {
    /// Catalog ID or synthesized local identifier
    pub id: String,
    /// Track title
    pub name: String,
    /// Contributing artists, comma-joined
    pub artist: String,
    /// Tempo in BPM
    pub tempo: Option<f64>,
    key: Option<i32>,
    mode: Option<Mode>,
    harmonic: Option<CamelotKey>,
    /// Normalized energy (0-1)
    pub energy: Option<f64>,
    /// Normalized danceability (0-1)
    pub danceability: Option<f64>,
    /// Normalized valence (0-1)
    pub valence: Option<f64>,
    /// Loudness in dB, typically -60..0
    pub loudness: Option<f64>,
    /// Free-form genre tag
    pub genre: Option<String>,
    /// When features were last refreshed
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Serialized shape of a track; the harmonic label is recomputed on load
#[derive(Deserialize)]
struct TrackRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    tempo: Option<f64>,
    #[serde(default)]
    key: Option<i32>,
    #[serde(default)]
    mode: Option<Mode>,
    #[serde(default)]
    energy: Option<f64>,
    #[serde(default)]
    danceability: Option<f64>,
    #[serde(default)]
    valence: Option<f64>,
    #[serde(default)]
    loudness: Option<f64>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    analyzed_at: Option<DateTime<Utc>>,
}

impl From<TrackRecord> for Track {
    fn from(r: TrackRecord) -> Self {
        Track {
            id: r.id,
            name: r.name,
            artist: r.artist,
            tempo: r.tempo,
            key: r.key,
            mode: r.mode,
            harmonic: CamelotKey::from_key_mode(r.key, r.mode),
            energy: r.energy,
            danceability: r.danceability,
            valence: r.valence,
            loudness: r.loudness,
            genre: r.genre,
            analyzed_at: r.analyzed_at,
        }
    }
}

impl Track {
    /// Create a track with no features
    pub fn new(id: impl Into<String>, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            tempo: None,
            key: None,
            mode: None,
            harmonic: None,
            energy: None,
            danceability: None,
            valence: None,
            loudness: None,
            genre: None,
            analyzed_at: None,
        }
    }

    /// Set tempo in BPM
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.tempo = Some(bpm);
        self
    }

    /// Set key and mode
    pub fn with_key(mut self, pitch_class: i32, mode: Mode) -> Self {
        self.set_key(Some(pitch_class), Some(mode));
        self
    }

    /// Set energy (0-1)
    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    /// Set danceability (0-1)
    pub fn with_danceability(mut self, danceability: f64) -> Self {
        self.danceability = Some(danceability);
        self
    }

    /// Set loudness in dB
    pub fn with_loudness(mut self, loudness: f64) -> Self {
        self.loudness = Some(loudness);
        self
    }

    /// Replace key and mode, rederiving the harmonic label
    pub fn set_key(&mut self, pitch_class: Option<i32>, mode: Option<Mode>) {
        self.key = pitch_class;
        self.mode = mode;
        self.harmonic = CamelotKey::from_key_mode(pitch_class, mode);
    }

    /// Pitch class as reported by the catalog
    pub fn key(&self) -> Option<i32> {
        self.key
    }

    /// Major/minor
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Camelot wheel position, if key and mode are known
    pub fn harmonic(&self) -> Option<CamelotKey> {
        self.harmonic
    }

    /// Energy with the engine default substituted
    pub fn energy_or_default(&self) -> f64 {
        self.energy.filter(|e| e.is_finite()).unwrap_or(DEFAULT_ENERGY)
    }

    /// Energy on the 1-10 scale used by energy curves
    pub fn scaled_energy(&self) -> f64 {
        1.0 + 9.0 * self.energy_or_default()
    }

    /// Composite 1-10 energy blending energy, danceability, loudness and tempo.
    ///
    /// Missing features count as zero here (loudness as -60 dB), so a
    /// track with no features scores 1.0. Rounded to two decimals.
    pub fn composite_energy(&self) -> f64 {
        let e = self.energy.unwrap_or(0.0);
        let d = self.danceability.unwrap_or(0.0);
        let l = ((self.loudness.unwrap_or(COMPOSITE_LOUDNESS_FLOOR) - COMPOSITE_LOUDNESS_FLOOR)
            / -COMPOSITE_LOUDNESS_FLOOR)
            .clamp(0.0, 1.0);
        let b = (self.tempo.unwrap_or(0.0) / COMPOSITE_TEMPO_CEILING).min(1.0);
        let score = 1.0 + 9.0 * (0.45 * e + 0.25 * d + 0.2 * l + 0.10 * b);
        (score * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmonic_derived_from_key() {
        let track = Track::new("t1", "Song", "Artist").with_key(9, Mode::Minor);
        assert_eq!(track.harmonic().unwrap().to_string(), "8A");

        let track = Track::new("t2", "Song", "Artist");
        assert_eq!(track.harmonic(), None);
    }

    #[test]
    fn test_set_key_clears_harmonic() {
        let mut track = Track::new("t1", "Song", "Artist").with_key(0, Mode::Major);
        assert!(track.harmonic().is_some());
        track.set_key(None, Some(Mode::Major));
        assert_eq!(track.harmonic(), None);
    }

    #[test]
    fn test_scaled_energy_default() {
        let track = Track::new("t1", "Song", "Artist");
        assert_eq!(track.scaled_energy(), 5.5);

        let track = track.with_energy(0.0);
        assert_eq!(track.scaled_energy(), 1.0);
    }

    #[test]
    fn test_composite_energy_bounds() {
        let empty = Track::new("t1", "Song", "Artist");
        assert_eq!(empty.composite_energy(), 1.0);

        let full = Track::new("t2", "Song", "Artist")
            .with_energy(1.0)
            .with_danceability(1.0)
            .with_loudness(0.0)
            .with_tempo(174.0);
        assert_eq!(full.composite_energy(), 10.0);
    }

    #[test]
    fn test_composite_energy_mix() {
        let track = Track::new("t1", "Song", "Artist")
            .with_energy(0.8)
            .with_danceability(0.6)
            .with_loudness(-6.0)
            .with_tempo(128.0);
        // 1 + 9 * (0.36 + 0.15 + 0.18 + 0.08) = 7.93
        assert!((track.composite_energy() - 7.93).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_recomputes_harmonic() {
        let json = r#"{"id":"t1","name":"Song","artist":"A","key":0,"mode":"major","harmonic":"1A"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.harmonic().unwrap().to_string(), "8B");
        assert_eq!(track.tempo, None);
    }

    #[test]
    fn test_serialize_round_trip_keeps_features() {
        let track = Track::new("t1", "Song", "A, B").with_tempo(124.0).with_key(7, Mode::Major);
        let json = serde_json::to_string(&track).unwrap();
        assert!(json.contains("\"harmonic\":\"9B\""));
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back, track);
    }
}
