//! Stepped tier curves: inclusive lower bounds, checked highest-first, first match wins.

/// Ceiling of every tiered category (points are in `[0, TIER_MAX]`).
pub const TIER_MAX: f64 = 2.0;

/// An ordered set of `(lower_bound, points)` steps. Below the last bound scores 0.
#[derive(Debug, Clone, Copy)]
pub struct TierTable(&'static [(f64, f64)]);

impl TierTable {
    pub const fn new(steps: &'static [(f64, f64)]) -> Self {
        Self(steps)
    }

    /// Points for `value`; missing or non-finite input lands on the lowest tier.
    pub fn points(&self, value: Option<f64>) -> f64 {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return 0.0;
        };
        self.0
            .iter()
            .find(|(bound, _)| v >= *bound)
            .map_or(0.0, |&(_, pts)| pts)
    }

    pub fn steps(&self) -> &'static [(f64, f64)] {
        self.0
    }
}

/// SoC performance score (roughly 0–10).
pub const SOC: TierTable = TierTable::new(&[
    (9.0, 2.00),
    (8.0, 1.60),
    (7.0, 1.30),
    (6.0, 1.00),
    (5.0, 0.75),
    (4.0, 0.50),
]);

/// RAM in GB.
pub const RAM: TierTable = TierTable::new(&[
    (20.0, 2.0),
    (16.0, 1.75),
    (12.0, 1.5),
    (8.0, 1.0),
    (6.0, 0.5),
]);

/// Storage in GB.
pub const STORAGE: TierTable = TierTable::new(&[
    (1024.0, 2.0),
    (512.0, 1.75),
    (256.0, 1.5),
    (128.0, 1.0),
    (64.0, 0.5),
]);

/// Battery capacity in mAh.
pub const BATTERY: TierTable = TierTable::new(&[
    (6000.0, 2.0),
    (5500.0, 1.75),
    (5000.0, 1.5),
    (4500.0, 1.0),
    (4000.0, 0.75),
    (3000.0, 0.5),
]);

/// Wired charging in watts.
pub const CHARGING: TierTable = TierTable::new(&[
    (50.0, 2.0),
    (40.0, 1.5),
    (30.0, 1.0),
    (20.0, 0.75),
]);
