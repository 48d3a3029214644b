// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Camelot wheel notation for harmonic mixing.
//!
//! Maps a pitch class and mode to a wheel position (1A-12B) and
//! computes the set of keys that mix cleanly with a given key.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::note::{Mode, Note};
use crate::error::SetError;

/// Number of positions on the wheel
pub const WHEEL_SIZE: u8 = 12;

/// Wheel step used for the "energy boost" mix
pub const ENERGY_BOOST_STEP: u8 = 7;

/// Wheel numbers for major keys, indexed by pitch class (0=C, ..., 11=B)
const CAMELOT_MAJOR: [u8; 12] = [8, 3, 10, 5, 12, 7, 2, 9, 4, 11, 6, 1];

/// Wheel numbers for minor keys, indexed by pitch class
const CAMELOT_MINOR: [u8; 12] = [5, 12, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10];

/// A position on the Camelot wheel.
///
/// `A` is the minor ring, `B` the major ring. Relative major/minor
/// share a number. Construction goes through [`CamelotKey::new`],
/// so a value always lies on the 24-position wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CamelotKey {
    number: u8,
    major: bool,
}

impl CamelotKey {
    /// Create a key from a wheel number (1-12) and ring
    pub fn new(number: u8, major: bool) -> Option<Self> {
        if (1..=WHEEL_SIZE).contains(&number) {
            Some(Self { number, major })
        } else {
            None
        }
    }

    /// Derive the wheel position from a pitch class and mode.
    ///
    /// Returns `None` when either half is unknown. The pitch class is
    /// reduced modulo 12 first, so `-1` reads as B and `14` as D.
    pub fn from_key_mode(pitch_class: Option<i32>, mode: Option<Mode>) -> Option<Self> {
        let pc = pitch_class?.rem_euclid(12) as usize;
        let mode = mode?;
        let number = if mode.is_major() {
            CAMELOT_MAJOR[pc]
        } else {
            CAMELOT_MINOR[pc]
        };
        Some(Self {
            number,
            major: mode.is_major(),
        })
    }

    /// All 24 wheel positions, 1A, 1B, 2A, ...
    pub fn all() -> Vec<CamelotKey> {
        (1..=WHEEL_SIZE)
            .flat_map(|n| [Self { number: n, major: false }, Self { number: n, major: true }])
            .collect()
    }

    /// Wheel number (1-12)
    pub fn number(self) -> u8 {
        self.number
    }

    /// True for the B (major) ring
    pub fn is_major(self) -> bool {
        self.major
    }

    /// Ring letter, `'A'` or `'B'`
    pub fn letter(self) -> char {
        if self.major {
            'B'
        } else {
            'A'
        }
    }

    /// Move around the wheel on the same ring
    pub fn rotate(self, steps: i32) -> Self {
        let zero_based = (self.number as i32 - 1 + steps).rem_euclid(WHEEL_SIZE as i32);
        Self {
            number: zero_based as u8 + 1,
            major: self.major,
        }
    }

    /// Same number, other ring
    pub fn relative(self) -> Self {
        Self {
            number: self.number,
            major: !self.major,
        }
    }

    /// Keys that mix harmonically after this one.
    ///
    /// Contains the key itself, both wheel neighbours, the +7 energy
    /// boost and the relative major/minor.
    pub fn neighbors(self) -> BTreeSet<CamelotKey> {
        let mut set = BTreeSet::new();
        set.insert(self);
        set.insert(self.rotate(1));
        set.insert(self.rotate(-1));
        set.insert(self.rotate(ENERGY_BOOST_STEP as i32));
        set.insert(self.relative());
        set
    }

    /// Whether `other` is in this key's neighbour set
    pub fn is_compatible(self, other: CamelotKey) -> bool {
        self.neighbors().contains(&other)
    }

    /// Tonic pitch class of the key this position stands for
    pub fn pitch_class(self) -> u8 {
        let table = if self.major { &CAMELOT_MAJOR } else { &CAMELOT_MINOR };
        table.iter().position(|&n| n == self.number).unwrap_or(0) as u8
    }

    /// Conventional key name, e.g. "Am" or "Db"
    pub fn musical_name(self) -> String {
        let tonic = Note::from_pitch_class(self.pitch_class() as i32);
        if self.major {
            tonic.to_string()
        } else {
            format!("{}m", tonic)
        }
    }

    /// Parse "8A", "12b", ...
    pub fn parse(s: &str) -> Result<Self, SetError> {
        let s = s.trim();
        let invalid = || SetError::InvalidInput(format!("not a Camelot key: {:?}", s));

        let letter = s.chars().last().ok_or_else(invalid)?;
        let major = match letter.to_ascii_uppercase() {
            'A' => false,
            'B' => true,
            _ => return Err(invalid()),
        };
        let number: u8 = s[..s.len() - letter.len_utf8()]
            .parse()
            .map_err(|_| invalid())?;
        Self::new(number, major).ok_or_else(invalid)
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter())
    }
}

impl FromStr for CamelotKey {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CamelotKey::parse(s)
    }
}

impl Serialize for CamelotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CamelotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CamelotKey::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Every pair `(a, b)` where `b` follows `a` harmonically but `a` does
/// not follow `b`.
///
/// The +7 step has no -7 counterpart, so each key contributes exactly
/// one pair. Adjacency and relative major/minor are symmetric.
pub fn asymmetries() -> Vec<(CamelotKey, CamelotKey)> {
    let mut pairs = Vec::new();
    for a in CamelotKey::all() {
        for b in a.neighbors() {
            if b != a && !b.neighbors().contains(&a) {
                pairs.push((a, b));
            }
        }
    }
    pairs
}
