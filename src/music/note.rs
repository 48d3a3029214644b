// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and key modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        Note::ALL.iter().position(|&n| n == self).unwrap_or(0) as u8
    }

    /// Get note from any integer pitch, wrapping into 0-11
    pub fn from_pitch_class(pc: i32) -> Self {
        Note::ALL[pc.rem_euclid(12) as usize]
    }

    /// Spelling DJ software usually shows: flats, but F# for the tritone
    pub fn flat_name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "Db",
            Note::D => "D",
            Note::Ds => "Eb",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "Ab",
            Note::A => "A",
            Note::As => "Bb",
            Note::B => "B",
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flat_name())
    }
}

/// Key mode as reported by the audio-features catalog (1 = major, 0 = minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Minor,
    Major,
}

impl Mode {
    /// Map the catalog's integer mode; anything but 0/1 is unknown
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            0 => Some(Mode::Minor),
            1 => Some(Mode::Major),
            _ => None,
        }
    }

    pub fn is_major(self) -> bool {
        self == Mode::Major
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Minor => write!(f, "minor"),
            Mode::Major => write!(f, "major"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_class_round_trip() {
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.pitch_class() as usize, i);
            assert_eq!(Note::from_pitch_class(i as i32), *note);
        }
    }

    #[test]
    fn test_from_pitch_class_wraps() {
        assert_eq!(Note::from_pitch_class(-1), Note::B);
        assert_eq!(Note::from_pitch_class(12), Note::C);
        assert_eq!(Note::from_pitch_class(14), Note::D);
    }

    #[test]
    fn test_mode_from_raw() {
        assert_eq!(Mode::from_raw(0), Some(Mode::Minor));
        assert_eq!(Mode::from_raw(1), Some(Mode::Major));
        assert_eq!(Mode::from_raw(-1), None);
        assert_eq!(Mode::from_raw(2), None);
    }
}
