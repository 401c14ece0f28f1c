//! Durability: cover-glass family baseline plus a capped Mohs-hardness adjustment.
//! Result is a unit score in `[0, 1]`.

use crate::resolve::is_sentinel;

/// Substring → baseline. Order matters: "victus 2" must be seen before "victus",
/// "gorilla glass 3" before the bare "gorilla". First hit wins.
const GLASS_BASELINES: &[(&str, f64)] = &[
    ("armor 2", 0.95),
    ("armor gorilla", 0.95),
    ("victus 2", 0.85),
    ("victus+2", 0.85),
    ("victus + 2", 0.85),
    ("victus+", 0.80),
    ("gorilla glass victus", 0.75),
    ("victus", 0.75),
    ("ceramic shield", 0.75),
    ("xensation alpha", 0.75),
    ("gorilla glass 7i", 0.50),
    ("gorilla glass 5", 0.50),
    ("gorilla glass 3", 0.48),
    ("gorilla", 0.48),
    ("panda", 0.46),
    ("asahi", 0.46),
    ("dt-star", 0.46),
    ("shield glass", 0.45),
    ("ceramic guard", 0.45),
    ("nano", 0.45),
];

const UNKNOWN_GLASS_BASELINE: f64 = 0.40;
const UNMATCHED_GLASS_BASELINE: f64 = 0.46;

/// Lowercase, trim, drop the ® sign and the "corning " vendor prefix.
pub fn normalize_glass(glass: Option<&str>) -> String {
    glass
        .unwrap_or_default()
        .trim()
        .to_lowercase()
        .replace('®', "")
        .replace("corning ", "")
}

fn glass_is_unknown(normalized: &str) -> bool {
    is_sentinel(normalized)
}

/// Baseline for a glass description: 0.40 when unknown, 0.46 when present but unrecognized.
pub fn glass_baseline(glass: Option<&str>) -> f64 {
    let s = normalize_glass(glass);
    if glass_is_unknown(&s) {
        return UNKNOWN_GLASS_BASELINE;
    }
    GLASS_BASELINES
        .iter()
        .find(|(key, _)| s.contains(key))
        .map_or(UNMATCHED_GLASS_BASELINE, |&(_, base)| base)
}

/// Raw adjustment for scratch hardness; `None` means no adjustment.
pub fn mohs_delta(mohs: Option<f64>) -> f64 {
    let Some(m) = mohs.filter(|m| m.is_finite()) else {
        return 0.0;
    };
    match m {
        m if m >= 6.5 => 0.15,
        m if m >= 6.0 => 0.10,
        m if m >= 5.5 => 0.06,
        m if m >= 5.0 => 0.03,
        m if m >= 4.5 => 0.0,
        m if m >= 4.0 => -0.02,
        _ => -0.08,
    }
}

/// Durability unit score in `[0, 1]`.
///
/// The Mohs adjustment is bounded by the baseline tier (low ±0.07, mid +0.12/−0.10,
/// high +0.20/−0.10) and may add at most 0.05 when the glass itself is unknown.
pub fn durability_score(glass: Option<&str>, mohs: Option<f64>) -> f64 {
    let base = glass_baseline(glass);
    let delta = mohs_delta(mohs);

    let (mut max_up, max_down) = if base < 0.55 {
        (0.07, 0.07)
    } else if base < 0.75 {
        (0.12, 0.10)
    } else {
        (0.20, 0.10)
    };
    if glass_is_unknown(&normalize_glass(glass)) {
        max_up = f64::min(max_up, 0.05);
    }

    (base + delta.clamp(-max_down, max_up)).clamp(0.0, 1.0)
}
