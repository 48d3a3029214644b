// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Transition scoring and mix notes.
//!
//! A transition is judged on two axes: whether the next key sits on
//! the current key's Camelot neighbourhood, and how far apart the
//! tempos are. The same classification drives the note a DJ reads
//! next to each slot of the set.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ingest::Track;

/// Tempo gap above which the note suggests a tempo trick
pub const TEMPO_JUMP_BPM: f64 = 5.0;

/// Score for a harmonically compatible pair
const HARMONIC_SCORE: f64 = 1.0;

/// (max BPM difference, score) bands, checked in order
const TEMPO_BANDS: [(f64, f64); 3] = [(3.0, 1.0), (5.0, 0.6), (8.0, 0.3)];

/// How two consecutive tracks relate harmonically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// First track of the set; nothing to mix from
    Opening,
    /// Identical Camelot key
    SameKey,
    /// Next key is in the previous key's neighbour set
    HarmonicNeighbor,
    /// Keys clash, or at least one is unknown
    NonHarmonic,
}

impl TransitionKind {
    /// Mixing advice for this kind of transition
    pub fn advice(self) -> &'static str {
        match self {
            TransitionKind::Opening => "",
            TransitionKind::SameKey => "Same key; long blend.",
            TransitionKind::HarmonicNeighbor => "Harmonic neighbor; 16-bar mix.",
            TransitionKind::NonHarmonic => "Non-harmonic; use filter/echo exit.",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.advice())
    }
}

/// What to do about a tempo jump when one side's tempo is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempoJumpPolicy {
    /// Only flag a jump when both tempos are known
    #[default]
    SuppressUnknown,
    /// Treat an unknown tempo as 0 BPM (flags almost every such pair)
    UnknownAsZero,
}

/// Harmonic component: 1.0 when `b`'s key follows `a`'s on the wheel
pub fn harmonic_score(a: &Track, b: &Track) -> f64 {
    match (a.harmonic(), b.harmonic()) {
        (Some(ka), Some(kb)) if ka.is_compatible(kb) => HARMONIC_SCORE,
        _ => 0.0,
    }
}

/// Tempo component from the absolute BPM difference
pub fn tempo_score(a: &Track, b: &Track) -> f64 {
    let (Some(ta), Some(tb)) = (a.tempo, b.tempo) else {
        return 0.0;
    };
    let diff = (ta - tb).abs();
    TEMPO_BANDS
        .iter()
        .find(|(limit, _)| diff <= *limit)
        .map_or(0.0, |(_, score)| *score)
}

/// How well `b` follows `a`, in [0, 2]; higher is better.
///
/// Not symmetric: the +7 wheel step only counts in one direction.
pub fn score_transition(a: &Track, b: &Track) -> f64 {
    harmonic_score(a, b) + tempo_score(a, b)
}

/// Classify the move from `prev` to `next`
pub fn classify(prev: &Track, next: &Track) -> TransitionKind {
    match (prev.harmonic(), next.harmonic()) {
        (Some(a), Some(b)) if a == b => TransitionKind::SameKey,
        (Some(a), Some(b)) if a.is_compatible(b) => TransitionKind::HarmonicNeighbor,
        _ => TransitionKind::NonHarmonic,
    }
}

/// Whether the tempo gap calls for a half/double-time or echo-out
pub fn is_tempo_jump(prev: &Track, next: &Track, policy: TempoJumpPolicy) -> bool {
    let gap = match policy {
        TempoJumpPolicy::SuppressUnknown => match (prev.tempo, next.tempo) {
            (Some(a), Some(b)) => b - a,
            _ => return false,
        },
        TempoJumpPolicy::UnknownAsZero => next.tempo.unwrap_or(0.0) - prev.tempo.unwrap_or(0.0),
    };
    gap.abs() > TEMPO_JUMP_BPM
}

/// Full note for the slot holding `next`, following `prev`
pub fn transition_note(prev: &Track, next: &Track, policy: TempoJumpPolicy) -> String {
    let mut note = classify(prev, next).advice().to_string();
    if is_tempo_jump(prev, next, policy) {
        note.push_str(" Consider half/double-time or echo-out.");
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Mode;

    fn track(tempo: Option<f64>, key: Option<(i32, Mode)>) -> Track {
        let mut t = Track::new("id", "name", "artist");
        t.tempo = tempo;
        if let Some((pc, mode)) = key {
            t = t.with_key(pc, mode);
        }
        t
    }

    #[test]
    fn test_tempo_bands() {
        let a = track(Some(120.0), None);
        let cases = [
            (120.0, 1.0),
            (123.0, 1.0),
            (124.0, 0.6),
            (125.0, 0.6),
            (126.0, 0.3),
            (128.0, 0.3),
            (128.5, 0.0),
            (112.0, 0.3),
        ];
        for (bpm, expected) in cases {
            assert_eq!(tempo_score(&a, &track(Some(bpm), None)), expected, "{}", bpm);
        }
        assert_eq!(tempo_score(&a, &track(None, None)), 0.0);
    }

    #[test]
    fn test_harmonic_term() {
        // C major (8B) -> A minor (8A): relative
        let c = track(None, Some((0, Mode::Major)));
        let am = track(None, Some((9, Mode::Minor)));
        assert_eq!(harmonic_score(&c, &am), 1.0);
        assert_eq!(harmonic_score(&c, &c), 1.0);

        // C major (8B) -> F# major (2B): clash
        let fs = track(None, Some((6, Mode::Major)));
        assert_eq!(harmonic_score(&c, &fs), 0.0);

        let unknown = track(None, None);
        assert_eq!(harmonic_score(&c, &unknown), 0.0);
        assert_eq!(harmonic_score(&unknown, &unknown), 0.0);
    }

    #[test]
    fn test_score_is_asymmetric_on_energy_boost() {
        // 8B -> 3B is +7; 3B -> 8B is not a neighbour step
        let from = track(Some(124.0), Some((0, Mode::Major)));
        let to = track(Some(124.0), Some((1, Mode::Major)));
        assert_eq!(score_transition(&from, &to), 2.0);
        assert_eq!(score_transition(&to, &from), 1.0);
    }

    #[test]
    fn test_classify() {
        let c = track(None, Some((0, Mode::Major)));
        let g = track(None, Some((7, Mode::Major)));
        let fs = track(None, Some((6, Mode::Major)));
        let unknown = track(None, None);

        assert_eq!(classify(&c, &c), TransitionKind::SameKey);
        assert_eq!(classify(&c, &g), TransitionKind::HarmonicNeighbor);
        assert_eq!(classify(&c, &fs), TransitionKind::NonHarmonic);
        assert_eq!(classify(&unknown, &unknown), TransitionKind::NonHarmonic);
    }

    #[test]
    fn test_note_text() {
        let a = track(Some(120.0), Some((0, Mode::Major)));
        let b = track(Some(128.0), Some((0, Mode::Major)));
        assert_eq!(
            transition_note(&a, &b, TempoJumpPolicy::SuppressUnknown),
            "Same key; long blend. Consider half/double-time or echo-out."
        );

        let c = track(Some(125.0), Some((6, Mode::Major)));
        assert_eq!(
            transition_note(&a, &c, TempoJumpPolicy::SuppressUnknown),
            "Non-harmonic; use filter/echo exit."
        );
    }

    #[test]
    fn test_unknown_tempo_policy() {
        let known = track(Some(124.0), None);
        let unknown = track(None, None);

        assert!(!is_tempo_jump(&known, &unknown, TempoJumpPolicy::SuppressUnknown));
        assert!(is_tempo_jump(&known, &unknown, TempoJumpPolicy::UnknownAsZero));
        assert!(!is_tempo_jump(&unknown, &unknown, TempoJumpPolicy::UnknownAsZero));
    }
}
