// src/config/ranker.rs
//! Scoring and ranking parameters.
//!
//! TOML shape (every key optional, defaults shown):
//! ```toml
//! clamp_value_norm = true
//!
//! [weights]
//! soc = 2.0
//! ram = 2.0
//! storage = 1.0
//! display = 1.5
//! camera = 1.5
//! battery = 1.5
//! charging = 0.75
//! extras = 1.0
//! durability = 1.5
//! protection = 1.0
//!
//! [blend]
//! continuous = 0.7
//! rank = 0.3
//!
//! [guardrail]
//! low_raw = 6.0
//! high_raw = 7.5
//! low_multiplier = 0.85
//! high_multiplier = 1.05
//!
//! [modes]
//! budget = { raw = 0.30, value = 0.70 }
//! midrange = { raw = 0.50, value = 0.50 }
//! flagship = { raw = 0.90, value = 0.10 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scoring::Category;

const SUM_TOLERANCE: f64 = 1e-9;

/// Per-category weights. Their sum is the maximum attainable weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryWeights {
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

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            soc: 2.0,
            ram: 2.0,
            storage: 1.0,
            display: 1.5,
            camera: 1.5,
            battery: 1.5,
            charging: 0.75,
            extras: 1.0,
            durability: 1.5,
            protection: 1.0,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
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

    /// Sum of all weights (13.75 with the defaults).
    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|&c| self.get(c)).sum()
    }
}

/// Split between continuous (min/max) and rank-based normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlendConfig {
    pub continuous: f64,
    pub rank: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            continuous: 0.7,
            rank: 0.3,
        }
    }
}

/// Value-norm multipliers keyed on the raw quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardrailConfig {
    /// Below this raw score the value norm is penalized.
    pub low_raw: f64,
    /// At or above this raw score the value norm is boosted.
    pub high_raw: f64,
    pub low_multiplier: f64,
    pub high_multiplier: f64,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            low_raw: 6.0,
            high_raw: 7.5,
            low_multiplier: 0.85,
            high_multiplier: 1.05,
        }
    }
}

impl GuardrailConfig {
    pub fn multiplier(&self, raw_score: f64) -> f64 {
        if raw_score < self.low_raw {
            self.low_multiplier
        } else if raw_score >= self.high_raw {
            self.high_multiplier
        } else {
            1.0
        }
    }
}

/// How one mode mixes the quality norm and the value norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeWeights {
    pub raw: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModesConfig {
    pub budget: ModeWeights,
    pub midrange: ModeWeights,
    pub flagship: ModeWeights,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            budget: ModeWeights { raw: 0.30, value: 0.70 },
            midrange: ModeWeights { raw: 0.50, value: 0.50 },
            flagship: ModeWeights { raw: 0.90, value: 0.10 },
        }
    }
}

/// Everything the scorers and the ranking normalizer read. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankerConfig {
    pub weights: CategoryWeights,
    pub blend: BlendConfig,
    pub guardrail: GuardrailConfig,
    pub modes: ModesConfig,
    /// Clamp the guardrail-adjusted value norm back into `[0, 1]`.
    pub clamp_value_norm: bool,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            blend: BlendConfig::default(),
            guardrail: GuardrailConfig::default(),
            modes: ModesConfig::default(),
            clamp_value_norm: true,
        }
    }
}

impl RankerConfig {
    /// Parse and validate a TOML document. `origin` only labels errors.
    pub fn from_toml_str(s: &str, origin: &str) -> Result<Self, ConfigError> {
        let cfg: RankerConfig = toml::from_str(s).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for c in Category::ALL {
            let w = self.weights.get(c);
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight for {} must be a finite number >= 0, got {w}",
                    c.key()
                )));
            }
        }
        if self.weights.total() <= 0.0 {
            return Err(ConfigError::Invalid("category weights sum to zero".into()));
        }

        check_split("blend", self.blend.continuous, self.blend.rank)?;
        for (name, m) in [
            ("modes.budget", self.modes.budget),
            ("modes.midrange", self.modes.midrange),
            ("modes.flagship", self.modes.flagship),
        ] {
            check_split(name, m.raw, m.value)?;
        }

        let g = &self.guardrail;
        if !(g.low_raw.is_finite() && g.high_raw.is_finite()) || g.low_raw > g.high_raw {
            return Err(ConfigError::Invalid(format!(
                "guardrail thresholds must satisfy low_raw <= high_raw (got {} / {})",
                g.low_raw, g.high_raw
            )));
        }
        for (name, m) in [
            ("low_multiplier", g.low_multiplier),
            ("high_multiplier", g.high_multiplier),
        ] {
            if !m.is_finite() || m <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "guardrail.{name} must be > 0, got {m}"
                )));
            }
        }
        Ok(())
    }
}

fn check_split(name: &str, a: f64, b: f64) -> Result<(), ConfigError> {
    let ok = a.is_finite() && b.is_finite() && a >= 0.0 && b >= 0.0;
    if !ok || ((a + b) - 1.0).abs() > SUM_TOLERANCE {
        return Err(ConfigError::Invalid(format!(
            "{name} parts must be >= 0 and sum to 1 (got {a} + {b})"
        )));
    }
    Ok(())
}
