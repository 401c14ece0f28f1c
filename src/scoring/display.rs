//! Display points: panel type, refresh rate, resolution (shorter side) and pixel density.

use super::tiers::TIER_MAX;
use crate::resolve::ResolvedSpecs;

/// Fixed score for an OLED panel whose resolution is unknown.
pub const OLED_UNKNOWN_BASELINE: f64 = 0.5;

/// Formula part of the display score, clamped to `[0, 2.0]`.
pub fn display_points(short_side: i64, refresh_hz: f64, oled: bool, ppi: f64) -> f64 {
    let rr = refresh_hz.max(0.0);
    let side = short_side.max(0);
    let density = ppi.max(0.0);

    let mut score: f64 = if oled { 0.5 } else { 0.25 };

    score += if rr >= 120.0 {
        0.4
    } else if rr >= 90.0 {
        0.3
    } else if rr >= 60.0 {
        0.2
    } else {
        0.0
    };

    score += match side {
        s if s >= 1440 => 0.6,
        s if s >= 1200 => 0.4,
        s if s >= 1080 => 0.3,
        s if s >= 720 => 0.2,
        _ => 0.0,
    };

    score += if density >= 450.0 {
        0.5
    } else if density >= 390.0 {
        0.4
    } else {
        0.0
    };

    score.clamp(0.0, TIER_MAX)
}

/// Display points for a resolved record.
///
/// An OLED phone with no resolution data gets [`OLED_UNKNOWN_BASELINE`] instead of the
/// formula, which would otherwise drop its resolution bonus to nothing.
pub fn display_points_for(specs: &ResolvedSpecs) -> f64 {
    let short_side = specs.short_side();
    let oled = specs.is_oled();
    if short_side == 0 && oled {
        return OLED_UNKNOWN_BASELINE;
    }
    display_points(
        short_side,
        specs.refresh_hz.unwrap_or(0.0),
        oled,
        specs.ppi.unwrap_or(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn formula_examples() {
        assert!(approx(display_points(1080, 120.0, true, 420.0), 1.6));
        assert!(approx(display_points(1080, 90.0, true, 380.0), 1.1));
        assert!(approx(display_points(1080, 60.0, true, 380.0), 1.0));
        assert!(approx(display_points(720, 60.0, false, 300.0), 0.65));
        assert!(approx(display_points(1440, 60.0, false, 300.0), 1.05));
        assert!(approx(display_points(1080, 120.0, true, 320.0), 1.2));
    }

    #[test]
    fn best_case_reaches_ceiling_and_negatives_are_floored() {
        assert!(approx(display_points(1440, 144.0, true, 500.0), 2.0));
        assert!(approx(display_points(-10, -60.0, false, -1.0), 0.25));
    }

    #[test]
    fn oled_without_resolution_uses_baseline() {
        let specs = ResolvedSpecs {
            display_type: Some("dynamic amoled 2x".into()),
            refresh_hz: Some(120.0),
            ppi: Some(500.0),
            ..Default::default()
        };
        assert!(approx(display_points_for(&specs), OLED_UNKNOWN_BASELINE));

        // LCD without resolution still goes through the formula.
        let lcd = ResolvedSpecs {
            display_type: Some("lcd_ips".into()),
            refresh_hz: Some(90.0),
            ..Default::default()
        };
        assert!(approx(display_points_for(&lcd), 0.55));
    }
}
