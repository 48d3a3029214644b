// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Set export.
//!
//! Renders a compiled set as a JSON report, an extended M3U playlist
//! or a plain-text table for the terminal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::ingest::LOCAL_ID_PREFIX;
use crate::set::{CompiledSet, PlaylistEntry};

/// URI prefix for catalog tracks in M3U output
pub const CATALOG_URI_PREFIX: &str = "spotify:track:";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Aligned text columns
    #[default]
    Table,
    /// `{count, profile, set}` JSON report
    Json,
    /// Extended M3U playlist
    M3u,
}

impl ExportFormat {
    /// Parse a format name
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Some(Self::Table),
            "json" => Some(Self::Json),
            "m3u" | "m3u8" => Some(Self::M3u),
            _ => None,
        }
    }
}

/// Serialized shape of a compiled set
#[derive(Debug, Serialize)]
pub struct SetReport<'a> {
    pub count: usize,
    pub profile: &'a str,
    pub set: &'a [PlaylistEntry],
}

impl<'a> From<&'a CompiledSet> for SetReport<'a> {
    fn from(set: &'a CompiledSet) -> Self {
        Self {
            count: set.entries.len(),
            profile: &set.profile,
            set: &set.entries,
        }
    }
}

/// Pretty-printed JSON report
pub fn to_json(set: &CompiledSet) -> Result<String> {
    serde_json::to_string_pretty(&SetReport::from(set)).context("Failed to serialize set to JSON")
}

/// Extended M3U playlist; local tracks keep their synthesized identifier
pub fn to_m3u(set: &CompiledSet) -> String {
    let mut lines = vec!["#EXTM3U".to_string()];
    for entry in &set.entries {
        lines.push(format!("#EXTINF:-1,{} - {}", entry.artist, entry.name));
        if entry.track_id.starts_with(LOCAL_ID_PREFIX) {
            lines.push(entry.track_id.clone());
        } else {
            lines.push(format!("{}{}", CATALOG_URI_PREFIX, entry.track_id));
        }
    }
    lines.join("\n")
}

/// Plain-text table, one row per slot
pub fn to_table(set: &CompiledSet) -> String {
    let mut out = format!("{} set, {} tracks\n", set.profile, set.entries.len());
    for (entry, target) in set.entries.iter().zip(set.targets.iter()) {
        let bpm = entry
            .bpm
            .map(|b| format!("{:.1}", b))
            .unwrap_or_else(|| "-".to_string());
        let key = entry
            .key
            .map(|k| k.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>3}. {:<40} {:>6} {:>4} E{:<4.1} {}\n",
            entry.position,
            format!("{} - {}", entry.artist, entry.name),
            bpm,
            key,
            target,
            entry.note
        ));
    }
    out
}

/// Render a set in `format`
pub fn render(set: &CompiledSet, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Table => Ok(to_table(set)),
        ExportFormat::Json => to_json(set),
        ExportFormat::M3u => Ok(to_m3u(set)),
    }
}

/// Render a set and write it to `path`
pub fn write<P: AsRef<Path>>(set: &CompiledSet, format: ExportFormat, path: P) -> Result<()> {
    let contents = render(set, format)?;
    fs::write(path.as_ref(), contents)
        .with_context(|| format!("Failed to write set file: {:?}", path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::CamelotKey;

    fn sample_set() -> CompiledSet {
        CompiledSet {
            profile: "peak".to_string(),
            target_count: 2,
            targets: vec![7.0, 8.0],
            entries: vec![
                PlaylistEntry {
                    position: 1,
                    track_id: "4uLU6hMCjMI75M1A2tKUQC".to_string(),
                    name: "Opener".to_string(),
                    artist: "DJ A".to_string(),
                    bpm: Some(124.0),
                    key: CamelotKey::new(8, false),
                    note: String::new(),
                },
                PlaylistEntry {
                    position: 2,
                    track_id: "local::Dub::DJ B".to_string(),
                    name: "Dub".to_string(),
                    artist: "DJ B".to_string(),
                    bpm: None,
                    key: None,
                    note: "Non-harmonic; use filter/echo exit.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_json_report_shape() {
        let json = to_json(&sample_set()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["profile"], "peak");
        let first = &value["set"][0];
        assert_eq!(first["position"], 1);
        assert_eq!(first["key"], "8A");
        assert_eq!(first["bpm"], 124.0);
        assert_eq!(first["note"], "");
        assert!(first.get("track_id").is_none());
        assert!(value["set"][1]["key"].is_null());
    }

    #[test]
    fn test_m3u() {
        let m3u = to_m3u(&sample_set());
        let lines: Vec<&str> = m3u.lines().collect();
        assert_eq!(
            lines,
            vec![
                "#EXTM3U",
                "#EXTINF:-1,DJ A - Opener",
                "spotify:track:4uLU6hMCjMI75M1A2tKUQC",
                "#EXTINF:-1,DJ B - Dub",
                "local::Dub::DJ B",
            ]
        );
    }

    #[test]
    fn test_table() {
        let table = to_table(&sample_set());
        assert!(table.starts_with("peak set, 2 tracks\n"));
        assert!(table.contains("DJ A - Opener"));
        assert!(table.contains("124.0"));
        assert!(table.contains("8A"));
        assert!(table.contains("Non-harmonic"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(ExportFormat::parse("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("m3u8"), Some(ExportFormat::M3u));
        assert_eq!(ExportFormat::parse("text"), Some(ExportFormat::Table));
        assert_eq!(ExportFormat::parse("xml"), None);
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("set.m3u");
        write(&sample_set(), ExportFormat::M3u, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("#EXTM3U"));
    }
}
