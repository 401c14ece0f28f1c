// src/scoring/mod.rs
//! Per-record scoring: category points → weighted 0–10 quality score → price-relative value.
//!
//! Order:
//! 1) resolve the record into [`ResolvedSpecs`]
//! 2) score each category in its natural range and rescale to a unit fraction
//! 3) weight, sum and rescale by `10 / Σweights` → `raw_score`
//! 4) `value_score = raw_score / price * 100` (0 when the price is unusable)
//!
//! Every step is total: missing data falls to the lowest/neutral tier.

pub mod camera;
pub mod display;
pub mod durability;
pub mod protection;
pub mod tiers;

use serde::{Deserialize, Serialize};

use crate::config::{CategoryWeights, RankerConfig};
use crate::rank::Mode;
use crate::record::FieldSource;
use crate::resolve::ResolvedSpecs;

pub use camera::{camera_raw_score, CameraInputs, CAMERA_RAW_CAP};
pub use display::display_points_for;
pub use durability::durability_score;
pub use protection::ip_score;
pub use tiers::TIER_MAX;

/// The ten scored categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Soc,
    Ram,
    Storage,
    Display,
    Camera,
    Battery,
    Charging,
    Extras,
    Durability,
    Protection,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Soc,
        Category::Ram,
        Category::Storage,
        Category::Display,
        Category::Camera,
        Category::Battery,
        Category::Charging,
        Category::Extras,
        Category::Durability,
        Category::Protection,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Soc => "soc",
            Category::Ram => "ram",
            Category::Storage => "storage",
            Category::Display => "display",
            Category::Camera => "camera",
            Category::Battery => "battery",
            Category::Charging => "charging",
            Category::Extras => "extras",
            Category::Durability => "durability",
            Category::Protection => "protection",
        }
    }
}

/// Each category's share of its own maximum, in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryUnits([f64; 10]);

impl CategoryUnits {
    pub fn get(&self, c: Category) -> f64 {
        self.0[c as usize]
    }

    fn set(&mut self, c: Category, unit: f64) {
        self.0[c as usize] = unit.clamp(0.0, 1.0);
    }
}

/// Extras points (5G 1.0, NFC 0.5, stereo speakers 0.5), max 2.0.
pub fn extras_points(specs: &ResolvedSpecs) -> f64 {
    let on = |f: Option<bool>, pts: f64| if f.unwrap_or(false) { pts } else { 0.0 };
    on(specs.has_5g, 1.0) + on(specs.has_nfc, 0.5) + on(specs.has_stereo_speakers, 0.5)
}

/// Unit fractions for every category of one resolved record.
pub fn category_units(specs: &ResolvedSpecs) -> CategoryUnits {
    let mut u = CategoryUnits::default();
    u.set(Category::Soc, tiers::SOC.points(specs.soc_score) / TIER_MAX);
    u.set(Category::Ram, tiers::RAM.points(specs.ram_gb) / TIER_MAX);
    u.set(Category::Storage, tiers::STORAGE.points(specs.storage_gb) / TIER_MAX);
    u.set(Category::Display, display_points_for(specs) / TIER_MAX);

    let cam_raw = camera_raw_score(&CameraInputs::from_specs(specs));
    u.set(Category::Camera, cam_raw.min(CAMERA_RAW_CAP) / CAMERA_RAW_CAP);

    u.set(Category::Battery, tiers::BATTERY.points(specs.battery_mah) / TIER_MAX);
    u.set(Category::Charging, tiers::CHARGING.points(specs.charging_w) / TIER_MAX);
    u.set(Category::Extras, extras_points(specs) / TIER_MAX);
    u.set(
        Category::Durability,
        durability_score(specs.glass.as_deref(), specs.mohs),
    );
    u.set(Category::Protection, ip_score(specs.ip_rating.as_deref()));
    u
}

/// Per-category 0–10 figures (weighted contribution / weight × 10).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub soc: f64,
    pub ram: f64,
    pub storage: f64,
    pub display: f64,
    pub camera: f64,
    pub battery: f64,
    pub charging: f64,
    pub extras: f64,
    pub durability: f64,
    pub protection: f64,
}

impl ScoreBreakdown {
    pub fn get(&self, c: Category) -> f64 {
        match c {
            Category::Soc => self.soc,
            Category::Ram => self.ram,
            Category::Storage => self.storage,
            Category::Display => self.display,
            Category::Camera => self.camera,
            Category::Battery => self.battery,
            Category::Charging => self.charging,
            Category::Extras => self.extras,
            Category::Durability => self.durability,
            Category::Protection => self.protection,
        }
    }

    fn slot(&mut self, c: Category) -> &mut f64 {
        match c {
            Category::Soc => &mut self.soc,
            Category::Ram => &mut self.ram,
            Category::Storage => &mut self.storage,
            Category::Display => &mut self.display,
            Category::Camera => &mut self.camera,
            Category::Battery => &mut self.battery,
            Category::Charging => &mut self.charging,
            Category::Extras => &mut self.extras,
            Category::Durability => &mut self.durability,
            Category::Protection => &mut self.protection,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Weighted aggregation of unit fractions into `(raw_score, breakdown)`.
pub fn aggregate(units: &CategoryUnits, weights: &CategoryWeights) -> (f64, ScoreBreakdown) {
    let max_score = weights.total();
    let mut breakdown = ScoreBreakdown::default();
    let mut total = 0.0;

    for c in Category::ALL {
        let w = weights.get(c);
        let contribution = units.get(c) * w;
        total += contribution;
        *breakdown.slot(c) = if w > 0.0 { contribution / w * 10.0 } else { 0.0 };
    }

    let raw = if max_score > 0.0 {
        (total / max_score * 10.0).clamp(0.0, 10.0)
    } else {
        0.0
    };
    (raw, breakdown)
}

/// Output of phase 1 for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringResult {
    pub raw_score: f64,
    pub value_score: f64,
    pub breakdown: ScoreBreakdown,
    /// Parsed price, if usable; used later as the ranking tie-break.
    #[serde(skip)]
    pub price: Option<f64>,
}

/// `raw / price * 100` for a positive price, else 0. Capped at `f64::MAX` so the
/// batch min/max stays finite for subnormal prices.
pub fn value_score(raw_score: f64, price: Option<f64>) -> f64 {
    match price {
        Some(p) if p.is_finite() && p > 0.0 => (raw_score / p * 100.0).min(f64::MAX),
        _ => 0.0,
    }
}

/// Scores records against one immutable [`RankerConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: RankerConfig,
}

impl Scorer {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Raw 0–10 quality score and its breakdown.
    ///
    /// `mode` is accepted for interface symmetry; category weights do not depend on it.
    pub fn score_one<S: FieldSource + ?Sized>(&self, record: &S, _mode: Mode) -> (f64, ScoreBreakdown) {
        let specs = ResolvedSpecs::resolve(record);
        aggregate(&category_units(&specs), &self.config.weights)
    }

    /// Value score on top of [`Scorer::score_one`].
    pub fn value_one<S: FieldSource + ?Sized>(&self, record: &S, _mode: Mode) -> ScoringResult {
        let specs = ResolvedSpecs::resolve(record);
        let (raw_score, breakdown) = aggregate(&category_units(&specs), &self.config.weights);
        ScoringResult {
            raw_score,
            value_score: value_score(raw_score, specs.price),
            breakdown,
            price: specs.price,
        }
    }
}

/// [`Scorer::score_one`] with the default configuration.
pub fn score_one<S: FieldSource + ?Sized>(record: &S, mode: Mode) -> (f64, ScoreBreakdown) {
    Scorer::default().score_one(record, mode)
}

/// [`Scorer::value_one`] with the default configuration.
pub fn value_one<S: FieldSource + ?Sized>(record: &S, mode: Mode) -> ScoringResult {
    Scorer::default().value_one(record, mode)
}
