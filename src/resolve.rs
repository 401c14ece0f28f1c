//! # Field Resolver
//! Turns a loosely-typed record into [`ResolvedSpecs`], the typed view every scorer reads.
//!
//! - Each logical field has an ordered alias list; the first *acceptable* value wins.
//! - Acceptable = not `null`, not blank, not a sentinel (`-`, `—`, `N/A`, `none`, `unknown`, ...).
//! - Numbers are pulled out of mixed text ("67W", "5000 mAh", "6.1\"").
//! - Enumerations are normalized (IP ratings to `IPNN`, glyph/word booleans to `bool`).
//!
//! Nothing here fails: anything unusable resolves to `None`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::record::FieldSource;

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("number regex"));
static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*[x×]\s*(\d+)").expect("resolution regex"));
static IP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bIP\s*([0-9]{2})\s*[A-Z]?\b").expect("ip regex"));

const SENTINELS: [&str; 7] = ["-", "—", "n/a", "na", "none", "unknown", ""];

// Alias lists, highest priority first.
pub const SOC_KEYS: &[&str] = &["soc_score"];
pub const RAM_KEYS: &[&str] = &["ram_gb", "ram"];
pub const STORAGE_KEYS: &[&str] = &["storage_gb", "storage"];
pub const BATTERY_KEYS: &[&str] = &["battery_mah", "battery"];
pub const REFRESH_KEYS: &[&str] = &["refresh_hz", "refresh_rate"];
pub const PPI_KEYS: &[&str] = &["ppi", "pixel_density"];
pub const CHARGING_KEYS: &[&str] = &["charging_w", "charging_speed"];
pub const FRONT_MP_KEYS: &[&str] = &["front_mp", "camera_front_mp"];
pub const IP_KEYS: &[&str] = &["ip_rating", "ip"];
pub const PRICE_KEYS: &[&str] = &["price_sgd", "price"];
pub const GLASS_KEYS: &[&str] = &[
    "glass_type",
    "display_protection",
    "front_glass",
    "display_glass",
    "screen_protection",
    "protection",
    "materials",
];

/// True for blank text and the fixed "no data" markers (case-insensitive).
pub fn is_sentinel(s: &str) -> bool {
    let t = s.trim().to_lowercase();
    SENTINELS.contains(&t.as_str())
}

/// First acceptable value among `keys`, in order.
pub fn first_present<'a, S>(src: &'a S, keys: &[&str]) -> Option<&'a Value>
where
    S: FieldSource + ?Sized,
{
    keys.iter().filter_map(|k| src.field(k)).find(|v| match v {
        Value::Null => false,
        Value::String(s) => !is_sentinel(s),
        _ => true,
    })
}

/// First numeric token of a value, as `f64`. JSON numbers pass through.
pub fn to_float(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => first_number(s),
        _ => None,
    };
    x.filter(|x| x.is_finite())
}

/// First (optionally signed/decimal) number anywhere in `s`.
pub fn first_number(s: &str) -> Option<f64> {
    NUMBER_RE
        .find(s)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Like [`to_float`] but truncated toward zero.
pub fn to_int(v: &Value) -> Option<i64> {
    to_float(v).map(|x| x.trunc() as i64)
}

/// Glyph/word booleans. Unrecognized text is `None`, which is not the same as `false`.
pub fn to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let t = s.trim().to_lowercase();
            if t.starts_with('✔') || matches!(t.as_str(), "true" | "yes" | "y") {
                Some(true)
            } else if t.starts_with('✖') || matches!(t.as_str(), "false" | "no" | "n") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Plain text of a scalar value, trimmed.
pub fn to_text(v: &Value) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// `{"w": .., "h": ..}` or free text like `"1080 x 2400"` / `"1440×3120 pixels"`.
pub fn parse_resolution(v: &Value) -> Option<(i64, i64)> {
    match v {
        Value::Object(map) => {
            let w = map.get("w").and_then(to_int)?;
            let h = map.get("h").and_then(to_int)?;
            Some((w, h))
        }
        Value::String(s) => {
            let caps = RESOLUTION_RE.captures(s)?;
            let w = caps.get(1)?.as_str().parse().ok()?;
            let h = caps.get(2)?.as_str().parse().ok()?;
            Some((w, h))
        }
        _ => None,
    }
}

/// Canonical `IPNN` form of an ingress-protection string.
///
/// `"ip 67"` → `IP67`, `"IP68 (1.5m)"` → `IP68`, `"ip64/68"` → `IP64`, `"none"` → `None`.
pub fn normalize_ip(raw: &str) -> Option<String> {
    let s = raw.trim().to_uppercase();
    if s.is_empty() {
        return None;
    }
    IP_RE
        .captures(&s)
        .and_then(|c| c.get(1))
        .map(|m| format!("IP{}", m.as_str()))
}

/// Price as a finite number. Text must be a bare decimal ("399.00"); "S$399" is rejected.
pub fn parse_price(v: &Value) -> Option<f64> {
    let price = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|x| x.is_finite())
}

/// Resolve the record's price through its aliases.
pub fn resolve_price<S: FieldSource + ?Sized>(src: &S) -> Option<f64> {
    first_present(src, PRICE_KEYS).and_then(parse_price)
}

fn number<S: FieldSource + ?Sized>(src: &S, keys: &[&str]) -> Option<f64> {
    first_present(src, keys).and_then(to_float)
}

fn flag<S: FieldSource + ?Sized>(src: &S, key: &str) -> Option<bool> {
    first_present(src, &[key]).and_then(to_bool)
}

fn text<S: FieldSource + ?Sized>(src: &S, keys: &[&str]) -> Option<String> {
    first_present(src, keys).and_then(to_text)
}

/// Typed, fully resolved view of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSpecs {
    pub soc_score: Option<f64>,
    pub ram_gb: Option<f64>,
    pub storage_gb: Option<f64>,
    pub battery_mah: Option<f64>,
    pub refresh_hz: Option<f64>,
    pub ppi: Option<f64>,
    /// Lowercased panel description ("oled", "lcd_ips", "Dynamic AMOLED 2X" → lowercased).
    pub display_type: Option<String>,
    pub res_w: Option<i64>,
    pub res_h: Option<i64>,
    pub charging_w: Option<f64>,
    pub main_mp: Option<f64>,
    pub front_mp: Option<f64>,
    /// Multi-sensor description, e.g. "50 MP & 12 MP & 10 MP".
    pub camera_description: Option<String>,
    pub has_ois: Option<bool>,
    pub has_5g: Option<bool>,
    pub has_nfc: Option<bool>,
    pub has_stereo_speakers: Option<bool>,
    pub glass: Option<String>,
    pub ip_rating: Option<String>,
    pub mohs: Option<f64>,
    pub brand: Option<String>,
    pub price: Option<f64>,
}

impl ResolvedSpecs {
    pub fn resolve<S: FieldSource + ?Sized>(src: &S) -> Self {
        let camera_description = text(src, &["camera_main_mp"]);
        let main_mp = number(src, &["main_mp"])
            .or_else(|| camera_description.as_deref().and_then(first_number));

        let mut res_w = first_present(src, &["res_w"]).and_then(to_int);
        let mut res_h = first_present(src, &["res_h"]).and_then(to_int);
        if res_w.is_none() || res_h.is_none() {
            if let Some((w, h)) = first_present(src, &["resolution"]).and_then(parse_resolution) {
                res_w = res_w.or(Some(w));
                res_h = res_h.or(Some(h));
            }
        }

        Self {
            soc_score: number(src, SOC_KEYS),
            ram_gb: number(src, RAM_KEYS),
            storage_gb: number(src, STORAGE_KEYS),
            battery_mah: number(src, BATTERY_KEYS),
            refresh_hz: number(src, REFRESH_KEYS),
            ppi: number(src, PPI_KEYS),
            display_type: text(src, &["display_type"]).map(|s| s.to_lowercase()),
            res_w,
            res_h,
            charging_w: number(src, CHARGING_KEYS),
            main_mp,
            front_mp: number(src, FRONT_MP_KEYS),
            camera_description,
            has_ois: flag(src, "has_ois"),
            has_5g: flag(src, "has_5g"),
            has_nfc: flag(src, "has_nfc"),
            has_stereo_speakers: flag(src, "has_stereo_speakers"),
            glass: text(src, GLASS_KEYS),
            ip_rating: text(src, IP_KEYS).and_then(|s| normalize_ip(&s)),
            mohs: number(src, &["mohs"]),
            brand: text(src, &["brand"]),
            price: resolve_price(src),
        }
    }

    /// Shorter side of the panel resolution; 0 when either side is unknown.
    pub fn short_side(&self) -> i64 {
        match (self.res_w, self.res_h) {
            (Some(w), Some(h)) => w.min(h).max(0),
            _ => 0,
        }
    }

    pub fn is_oled(&self) -> bool {
        self.display_type
            .as_deref()
            .is_some_and(|t| t.contains("oled"))
    }
}
