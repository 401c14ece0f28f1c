//! # Ranking
//! Batch-level normalization, mode blending and the final deterministic order.
//!
//! Two phases with a barrier in between:
//! - phase 1 scores every record independently (fanned out with rayon);
//! - phase 2 needs the whole batch (min/max, ranks) and runs sequentially.
//!
//! Per record, phase 2 computes
//! `norm = blend.continuous * (x - min)/(max - min) + blend.rank * (1 - rank/max(N-1, 1))`
//! for the raw score and the value score, applies the quality guardrail to the value norm,
//! mixes both by mode and rounds to 6 decimals. Ties fall back to raw norm, value norm,
//! then the cheaper price.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::config::{ModeWeights, RankerConfig};
use crate::record::{DeviceRecord, FieldSource};
use crate::scoring::{ScoreBreakdown, Scorer, ScoringResult};

/// Buyer profile controlling the raw/value mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Budget,
    Midrange,
    Flagship,
}

impl Mode {
    /// Lenient parse: `budget`, `mid`/`midrange`, `flagship` (any case); anything else is budget.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "midrange" | "mid" => Mode::Midrange,
            "flagship" => Mode::Flagship,
            _ => Mode::Budget,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Budget => "budget",
            Mode::Midrange => "midrange",
            Mode::Flagship => "flagship",
        }
    }

    pub fn weights(self, config: &RankerConfig) -> ModeWeights {
        match self {
            Mode::Budget => config.modes.budget,
            Mode::Midrange => config.modes.midrange,
            Mode::Flagship => config.modes.flagship,
        }
    }
}

impl From<&str> for Mode {
    fn from(s: &str) -> Self {
        Mode::parse(s)
    }
}

/// Round to 6 decimal places.
///
/// Goes through `{:.6}`, which rounds the exact binary value, so `3.5e-6`
/// (stored just below the midpoint) becomes `3e-6`. Scaling by `1e6` first
/// would add its own error and round that case up.
pub fn round6(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{x:.6}").parse().unwrap_or(x)
}

/// Min/max scaling; a flat batch (including a single record) maps to exactly 0.5.
pub fn continuous_norm(x: f64, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        0.5
    } else {
        (x - lo) / (hi - lo)
    }
}

/// `1 - rank / max(N-1, 1)` where rank 0 is the highest score.
///
/// Uses a stable sort, so equal scores keep their input order.
pub fn rank_norms(scores: &[f64]) -> Vec<f64> {
    let n = scores.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let max_rank = if n > 1 { (n - 1) as f64 } else { 1.0 };
    let mut out = vec![0.0; n];
    for (rank, idx) in order.into_iter().enumerate() {
        out[idx] = 1.0 - rank as f64 / max_rank;
    }
    out
}

fn min_max(xs: impl Iterator<Item = f64>) -> (f64, f64) {
    xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    })
}

/// Phase-2 figures for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchNorms {
    pub raw_norm_c: f64,
    pub raw_norm_r: f64,
    pub value_norm_c: f64,
    pub value_norm_r: f64,
    /// Blended raw norm, rounded.
    pub raw_norm: f64,
    /// Blended and guardrail-adjusted value norm, rounded.
    pub value_norm: f64,
    /// Final mode-weighted score, rounded.
    pub score: f64,
    /// Price used for the last tie-break (`+inf` when unknown).
    pub price: f64,
}

/// Descending `(score, raw_norm, value_norm)`, then ascending price.
pub fn compare_ranked(a: &BatchNorms, b: &BatchNorms) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.raw_norm.total_cmp(&a.raw_norm))
        .then_with(|| b.value_norm.total_cmp(&a.value_norm))
        .then_with(|| a.price.total_cmp(&b.price))
}

/// One ranked position: input index plus everything computed for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry {
    pub index: usize,
    pub result: ScoringResult,
    pub norms: BatchNorms,
}

/// A record annotated with its scores, as emitted to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDevice {
    #[serde(flatten)]
    pub record: DeviceRecord,
    pub raw_score: f64,
    #[serde(rename = "smartbuy_score")]
    pub value_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub score: f64,
}

/// Output keys the ranker owns; stale copies on the input record are dropped.
const ANNOTATION_KEYS: [&str; 4] = ["raw_score", "smartbuy_score", "score_breakdown", "score"];

/// Runs both phases against one immutable configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    scorer: Scorer,
}

impl Ranker {
    pub fn new(config: RankerConfig) -> Self {
        Self {
            scorer: Scorer::new(config),
        }
    }

    pub fn config(&self) -> &RankerConfig {
        self.scorer.config()
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Phase 1: independent per-record scoring. `collect` is the barrier.
    pub fn score_batch<R>(&self, records: &[R], mode: Mode) -> Vec<ScoringResult>
    where
        R: FieldSource + Sync,
    {
        records
            .par_iter()
            .map(|r| self.scorer.value_one(r, mode))
            .collect()
    }

    /// Phase 2: batch normalization, guardrail and mode blend (input order preserved).
    pub fn normalize(&self, results: &[ScoringResult], mode: Mode) -> Vec<BatchNorms> {
        if results.is_empty() {
            return Vec::new();
        }
        let cfg = self.config();
        let blend = cfg.blend;
        let mix = mode.weights(cfg);

        let raws: Vec<f64> = results.iter().map(|r| r.raw_score).collect();
        let values: Vec<f64> = results.iter().map(|r| r.value_score).collect();
        let (raw_lo, raw_hi) = min_max(raws.iter().copied());
        let (val_lo, val_hi) = min_max(values.iter().copied());
        let raw_ranks = rank_norms(&raws);
        let val_ranks = rank_norms(&values);

        debug!(
            target: "ranking",
            n = results.len(),
            mode = mode.as_str(),
            raw_lo, raw_hi, val_lo, val_hi,
            "normalizing batch"
        );

        results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let raw_norm_c = continuous_norm(r.raw_score, raw_lo, raw_hi);
                let value_norm_c = continuous_norm(r.value_score, val_lo, val_hi);
                let raw_norm_r = raw_ranks[i];
                let value_norm_r = val_ranks[i];

                let raw_norm = blend.continuous * raw_norm_c + blend.rank * raw_norm_r;
                let mut value_norm = blend.continuous * value_norm_c + blend.rank * value_norm_r;

                value_norm *= cfg.guardrail.multiplier(r.raw_score);
                if cfg.clamp_value_norm {
                    value_norm = value_norm.clamp(0.0, 1.0);
                }

                let score = mix.raw * raw_norm + mix.value * value_norm;

                BatchNorms {
                    raw_norm_c,
                    raw_norm_r,
                    value_norm_c,
                    value_norm_r,
                    raw_norm: round6(raw_norm),
                    value_norm: round6(value_norm),
                    score: round6(score),
                    price: r.price.unwrap_or(f64::INFINITY),
                }
            })
            .collect()
    }

    /// Both phases plus the stable multi-key sort. Works on any field source.
    pub fn rank_entries<R>(&self, records: &[R], mode: Mode) -> Vec<RankedEntry>
    where
        R: FieldSource + Sync,
    {
        if records.is_empty() {
            return Vec::new();
        }
        let results = self.score_batch(records, mode);
        let norms = self.normalize(&results, mode);

        let mut entries: Vec<RankedEntry> = results
            .into_iter()
            .zip(norms)
            .enumerate()
            .map(|(index, (result, norms))| RankedEntry {
                index,
                result,
                norms,
            })
            .collect();
        entries.sort_by(|a, b| compare_ranked(&a.norms, &b.norms));
        entries
    }

    /// Rank a batch of records; an empty batch yields an empty list.
    pub fn rank_batch(&self, records: Vec<DeviceRecord>, mode: Mode) -> Vec<RankedDevice> {
        let entries = self.rank_entries(&records, mode);
        let mut slots: Vec<Option<DeviceRecord>> = records.into_iter().map(Some).collect();

        entries
            .into_iter()
            .filter_map(|e| {
                let mut record = slots[e.index].take()?;
                for key in ANNOTATION_KEYS {
                    record.remove(key);
                }
                Some(RankedDevice {
                    record,
                    raw_score: e.result.raw_score,
                    value_score: e.result.value_score,
                    score_breakdown: e.result.breakdown,
                    score: e.norms.score,
                })
            })
            .collect()
    }
}

/// [`Ranker::rank_batch`] with the default configuration.
pub fn rank_batch(records: Vec<DeviceRecord>, mode: Mode) -> Vec<RankedDevice> {
    Ranker::default().rank_batch(records, mode)
}
