// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Set compiler.
//!
//! Orders a pool of tracks into a set that follows an energy curve
//! while preferring smooth transitions. The search is greedy by
//! default: order the pool by distance to the first energy target,
//! seed with the closest track, then repeatedly append the best-scoring
//! candidate among the first `branching_cap` tracks left in that order.
//! Ties always go to the earlier position, so a run is deterministic.

use std::cmp::Ordering;

use tracing::{debug, info, trace};

use super::{
    CompiledSet, EngineSettings, PlaylistEntry, SearchStrategy, SetRequest, DEFAULT_AVG_TRACK_SECONDS,
    MIN_SET_LENGTH,
};
use crate::curve::{spread_curve, validate_curve};
use crate::error::{Result, SetError};
use crate::ingest::Track;
use crate::transition::{score_transition, transition_note};

/// Width of the energy window (in curve levels) that still earns credit
const ENERGY_FIT_WINDOW: f64 = 3.0;

/// A partial set explored by the search
#[derive(Debug, Clone)]
struct PartialSet {
    /// Indices into the pool, in set order
    order: Vec<usize>,
    /// Pool indices not yet used, in working order
    remaining: Vec<usize>,
    /// Sum of step scores so far
    score: f64,
}

/// Compiles track pools into ordered sets
#[derive(Debug, Clone, Default)]
pub struct SetCompiler {
    settings: EngineSettings,
}

impl SetCompiler {
    /// Create a compiler with the given settings
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Get the settings
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Number of slots for a set: duration over track length, at least
    /// [`MIN_SET_LENGTH`] and at most the pool size
    pub fn target_count(pool_len: usize, duration_minutes: u32, avg_track_seconds: u32) -> usize {
        if avg_track_seconds == 0 {
            return pool_len.min(MIN_SET_LENGTH);
        }
        let wanted = (duration_minutes as u64 * 60 / avg_track_seconds as u64) as usize;
        wanted.max(MIN_SET_LENGTH).min(pool_len)
    }

    /// Build a set from `pool` for `request`.
    ///
    /// The pool is only read; the search works on its own index lists.
    pub fn compile(&self, pool: &[Track], request: &SetRequest) -> Result<CompiledSet> {
        self.validate(pool, request)?;

        let target_count =
            Self::target_count(pool.len(), request.duration_minutes, request.avg_track_seconds);
        let targets = spread_curve(target_count, &request.profile.curve)?;
        debug!(
            pool = pool.len(),
            target_count,
            profile = %request.profile.name,
            "Compiling set"
        );

        let degraded = pool
            .iter()
            .filter(|t| t.energy.is_none() || t.tempo.is_none() || t.harmonic().is_none())
            .count();
        if degraded > 0 {
            trace!(degraded, "Tracks with missing features; defaults apply");
        }

        let mut working = self.working_order(pool, targets[0]);
        let seed = working.remove(0);
        trace!(id = %pool[seed].id, target = targets[0], "Seed track");

        let start = PartialSet {
            order: vec![seed],
            remaining: working,
            score: 0.0,
        };

        let order = match self.settings.strategy {
            SearchStrategy::Greedy => self.extend_greedy(pool, &targets, start, target_count),
            SearchStrategy::Beam { width } => {
                self.extend_beam(pool, &targets, start, target_count, width)
            }
        };

        let entries = self.annotate(pool, &order);
        info!(
            entries = entries.len(),
            profile = %request.profile.name,
            "Set compiled"
        );

        Ok(CompiledSet {
            profile: request.profile.name.clone(),
            target_count,
            targets,
            entries,
        })
    }

    fn validate(&self, pool: &[Track], request: &SetRequest) -> Result<()> {
        if pool.is_empty() {
            return Err(SetError::invalid("track pool is empty"));
        }
        if request.duration_minutes == 0 {
            return Err(SetError::invalid("duration must be positive"));
        }
        if request.avg_track_seconds == 0 {
            return Err(SetError::invalid("average track length must be positive"));
        }
        if self.settings.branching_cap == 0 {
            return Err(SetError::invalid("branching cap must be at least 1"));
        }
        if let SearchStrategy::Beam { width: 0 } = self.settings.strategy {
            return Err(SetError::invalid("beam width must be at least 1"));
        }
        validate_curve(&request.profile.curve)
    }

    /// Energy level of a track on the curve scale
    fn level(&self, track: &Track) -> f64 {
        self.settings.energy_source.scaled(track)
    }

    /// Pool indices ordered by energy distance to the opening target.
    ///
    /// The sort is stable, so equal distances keep pool order. The first
    /// index is the seed; the rest is the order candidates are scanned in.
    fn working_order(&self, pool: &[Track], opening: f64) -> Vec<usize> {
        let gaps: Vec<f64> = pool.iter().map(|t| (self.level(t) - opening).abs()).collect();
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.sort_by(|&a, &b| gaps[a].partial_cmp(&gaps[b]).unwrap_or(Ordering::Equal));
        order
    }

    /// Score for placing `candidate` after `prev` in a slot aiming at `target`
    fn step_score(&self, prev: &Track, candidate: &Track, target: f64) -> f64 {
        let fit = (1.0 - (self.level(candidate) - target).abs() / ENERGY_FIT_WINDOW).max(0.0);
        score_transition(prev, candidate) + fit
    }

    /// Scored candidates for the next slot of `partial`, in working order.
    ///
    /// Each item is (position in `remaining`, step score).
    fn candidates(&self, pool: &[Track], targets: &[f64], partial: &PartialSet) -> Vec<(usize, f64)> {
        let prev = &pool[*partial.order.last().unwrap_or(&0)];
        let target = targets[partial.order.len()];
        partial
            .remaining
            .iter()
            .take(self.settings.branching_cap)
            .enumerate()
            .map(|(pos, &idx)| (pos, self.step_score(prev, &pool[idx], target)))
            .collect()
    }

    fn extend_greedy(
        &self,
        pool: &[Track],
        targets: &[f64],
        mut partial: PartialSet,
        target_count: usize,
    ) -> Vec<usize> {
        while partial.order.len() < target_count && !partial.remaining.is_empty() {
            let mut best: Option<(usize, f64)> = None;
            for (pos, score) in self.candidates(pool, targets, &partial) {
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((pos, score));
                }
            }
            let Some((pos, score)) = best else { break };

            let idx = partial.remaining.remove(pos);
            trace!(id = %pool[idx].id, score, slot = partial.order.len(), "Picked track");
            partial.order.push(idx);
            partial.score += score;
        }
        partial.order
    }

    fn extend_beam(
        &self,
        pool: &[Track],
        targets: &[f64],
        start: PartialSet,
        target_count: usize,
        width: usize,
    ) -> Vec<usize> {
        let mut beam = vec![start];

        while beam[0].order.len() < target_count && !beam[0].remaining.is_empty() {
            // (cumulative score, beam index, position in remaining)
            let mut expansions: Vec<(f64, usize, usize)> = Vec::new();
            for (b, partial) in beam.iter().enumerate() {
                for (pos, score) in self.candidates(pool, targets, partial) {
                    expansions.push((partial.score + score, b, pos));
                }
            }
            // Stable: equal scores keep beam-then-candidate order
            expansions.sort_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(Ordering::Equal));
            expansions.truncate(width);

            beam = expansions
                .into_iter()
                .map(|(score, b, pos)| {
                    let mut next = beam[b].clone();
                    let idx = next.remaining.remove(pos);
                    next.order.push(idx);
                    next.score = score;
                    next
                })
                .collect();
            trace!(slot = beam[0].order.len(), best = beam[0].score, "Beam step");
        }

        beam.swap_remove(0).order
    }

    fn annotate(&self, pool: &[Track], order: &[usize]) -> Vec<PlaylistEntry> {
        order
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let track = &pool[idx];
                let note = if i == 0 {
                    String::new()
                } else {
                    transition_note(&pool[order[i - 1]], track, self.settings.tempo_jump_policy)
                };
                PlaylistEntry {
                    position: i + 1,
                    track_id: track.id.clone(),
                    name: track.name.clone(),
                    artist: track.artist.clone(),
                    bpm: track.tempo,
                    key: track.harmonic(),
                    note,
                }
            })
            .collect()
    }
}

/// Compile with default settings from a raw energy curve.
///
/// Shorthand for callers that do not deal with named profiles.
pub fn compile(
    pool: &[Track],
    duration_minutes: u32,
    avg_track_seconds: Option<u32>,
    energy_curve: &[f64],
) -> Result<Vec<PlaylistEntry>> {
    let request = SetRequest {
        duration_minutes,
        avg_track_seconds: avg_track_seconds.unwrap_or(DEFAULT_AVG_TRACK_SECONDS),
        profile: crate::curve::EnergyProfile {
            name: "custom".to_string(),
            curve: energy_curve.to_vec(),
        },
    };
    SetCompiler::default()
        .compile(pool, &request)
        .map(|set| set.entries)
}
