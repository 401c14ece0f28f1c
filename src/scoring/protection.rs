//! Ingress-protection score. Missing or unrecognized ratings sit on a small nonzero floor.

use crate::resolve::normalize_ip;

/// Score for records without a usable IP rating.
pub const IP_FLOOR: f64 = 0.10;

const IP_SCORES: [(&str, f64); 9] = [
    ("IP52", 0.20),
    ("IP53", 0.25),
    ("IP54", 0.30),
    ("IP55", 0.35),
    ("IP64", 0.50),
    ("IP65", 0.60),
    ("IP67", 0.75),
    ("IP68", 0.90),
    ("IP69", 1.00),
];

/// Unit score in `[0, 1]` for a raw or already-normalized rating.
pub fn ip_score(rating: Option<&str>) -> f64 {
    let Some(key) = rating.and_then(normalize_ip) else {
        return IP_FLOOR;
    };
    IP_SCORES
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(IP_FLOOR, |&(_, s)| s)
}
