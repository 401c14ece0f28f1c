//! Camera score: megapixels, OIS, a useful second rear sensor, selfie camera and a
//! per-brand processing prior. Raw scale is 0–10; the aggregator caps it at
//! [`CAMERA_RAW_CAP`] before rescaling.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolve::ResolvedSpecs;

/// Raw camera scores above this count as "maxed out".
pub const CAMERA_RAW_CAP: f64 = 7.0;

static MP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s?MP").expect("mp regex"));

/// Image-pipeline prior by brand (lowercase). Unlisted brands get 0.
const BRAND_PRIORS: [(&str, f64); 3] = [("apple", 2.5), ("google", 2.25), ("samsung", 2.0)];

pub fn brand_prior(brand: Option<&str>) -> f64 {
    let b = brand.unwrap_or_default().trim().to_lowercase();
    BRAND_PRIORS
        .iter()
        .find(|(name, _)| *name == b)
        .map_or(0.0, |&(_, p)| p)
}

/// True when the second "<N> MP" token in the rear-camera description is at least 12 MP.
pub fn has_useful_second_sensor(description: Option<&str>) -> bool {
    let mps: Vec<u32> = MP_RE
        .captures_iter(description.unwrap_or_default())
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect();
    mps.get(1).is_some_and(|&mp| mp >= 12)
}

/// Inputs of the camera formula, already resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraInputs<'a> {
    pub main_mp: Option<f64>,
    pub has_ois: bool,
    pub useful_second_sensor: bool,
    pub front_mp: Option<f64>,
    pub brand: Option<&'a str>,
}

impl<'a> CameraInputs<'a> {
    pub fn from_specs(specs: &'a ResolvedSpecs) -> Self {
        Self {
            main_mp: specs.main_mp,
            has_ois: specs.has_ois.unwrap_or(false),
            useful_second_sensor: has_useful_second_sensor(specs.camera_description.as_deref()),
            front_mp: specs.front_mp,
            brand: specs.brand.as_deref(),
        }
    }
}

/// Raw camera score in `[0, 10]`.
pub fn camera_raw_score(inputs: &CameraInputs<'_>) -> f64 {
    let mp = inputs.main_mp.unwrap_or(0.0).max(0.0);
    let mp_score = (3.0 * (mp / 50.0)).min(3.0);

    let ois_bonus = if inputs.has_ois { 1.0 } else { 0.0 };
    let second_sensor_bonus = if inputs.useful_second_sensor { 0.3 } else { 0.0 };

    let front = inputs.front_mp.unwrap_or(0.0);
    let selfie_bonus = if front > 0.0 {
        (0.2 * (front / 32.0)).min(0.2)
    } else {
        0.0
    };

    let total = mp_score + ois_bonus + second_sensor_bonus + selfie_bonus + brand_prior(inputs.brand);
    total.clamp(0.0, 10.0)
}
