//! Constant lookup tables used by the VDI 4707 energy estimate.
//!
//! Exact-match tables are ordered slices of `(key, value)` pairs; range
//! lookups are ascending bracket arrays. Every lookup that can miss returns
//! `None` so the caller decides on the documented default and reports it.

/// Duty-cycle profile of one usage category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageCategoryProfile {
    pub category: u8,
    pub default_trips_per_day: f64,
    /// Share of non-running time spent in idle.
    pub idle_fraction: f64,
    /// Share of non-running time spent in 5 minute standby.
    pub standby5_fraction: f64,
    /// Share of non-running time spent in 30 minute standby.
    pub standby30_fraction: f64,
}

const fn profile(
    category: u8,
    default_trips_per_day: f64,
    idle_fraction: f64,
    standby5_fraction: f64,
    standby30_fraction: f64,
) -> UsageCategoryProfile {
    UsageCategoryProfile {
        category,
        default_trips_per_day,
        idle_fraction,
        standby5_fraction,
        standby30_fraction,
    }
}

/// Usage categories 1 (light) to 6 (heavy), ascending by trip count.
pub static USAGE_CATEGORIES: [UsageCategoryProfile; 6] = [
    profile(1, 50.0, 0.23, 0.12, 0.65),
    profile(2, 125.0, 0.44, 0.23, 0.33),
    profile(3, 300.0, 0.36, 0.31, 0.33),
    profile(4, 750.0, 0.54, 0.46, 0.0),
    profile(5, 1500.0, 0.71, 0.29, 0.0),
    profile(6, 2500.0, 0.71, 0.29, 0.0),
];

pub const FALLBACK_USAGE_CATEGORY: u8 = 3;

pub const STOP_FACTORS: [(u32, f64); 6] = [
    (2, 1.0),
    (3, 0.67),
    (4, 0.49),
    (5, 0.44),
    (6, 0.39),
    (7, 0.32),
];

pub const DEFAULT_STOP_FACTOR: f64 = 0.49;

/// Rated load brackets `(upper threshold kg, Q)`; the last bracket is open.
pub const LOAD_BRACKETS: [(f64, f64); 4] = [
    (800.0, 0.075),
    (1275.0, 0.045),
    (2000.0, 0.03),
    (f64::INFINITY, 0.02),
];

/// Counterbalance ratio (percent) to the slope of `kL = 1 + slope * Q`.
pub const COUNTERBALANCE_SLOPES: [(u32, f64); 6] = [
    (50, -0.0164),
    (40, -0.0192),
    (30, -0.0197),
    (0, 0.0071),
    (35, 0.01),
    (70, 0.0187),
];

pub const DEFAULT_COUNTERBALANCE_FACTOR: f64 = 1.0;

/// Express zone length (m) to the express zone distance factor `kez`.
pub const EXPRESS_ZONE_FACTORS: [(f64, f64); 2] = [(75.0, 0.58), (150.0, 0.42)];

pub const DEFAULT_EXPRESS_ZONE_FACTOR: f64 = 0.42;

const LENGTH_KEY_TOLERANCE_M: f64 = 1e-9;

pub fn usage_category(category: u32) -> Option<&'static UsageCategoryProfile> {
    USAGE_CATEGORIES
        .iter()
        .find(|p| u32::from(p.category) == category)
}

/// Row whose default trip count is closest to `trips_per_day`. The first row
/// wins a tie.
pub fn nearest_usage_category(trips_per_day: f64) -> &'static UsageCategoryProfile {
    let mut best = &USAGE_CATEGORIES[0];
    let mut best_diff = (best.default_trips_per_day - trips_per_day).abs();
    for candidate in &USAGE_CATEGORIES[1..] {
        let diff = (candidate.default_trips_per_day - trips_per_day).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}

pub fn stop_factor(stops: u32) -> Option<f64> {
    STOP_FACTORS
        .iter()
        .find(|(key, _)| *key == stops)
        .map(|(_, factor)| *factor)
}

pub fn load_factor(rated_load_kg: f64) -> f64 {
    LOAD_BRACKETS
        .iter()
        .find(|(threshold, _)| *threshold >= rated_load_kg)
        .map(|(_, q)| *q)
        // Only reachable for NaN, which intake never produces.
        .unwrap_or(LOAD_BRACKETS[LOAD_BRACKETS.len() - 1].1)
}

pub fn counterbalance_factor(counterbalance_ratio: u32, load_factor: f64) -> Option<f64> {
    COUNTERBALANCE_SLOPES
        .iter()
        .find(|(key, _)| *key == counterbalance_ratio)
        .map(|(_, slope)| 1.0 + slope * load_factor)
}

pub fn express_zone_factor(express_zone_length_m: f64) -> Option<f64> {
    EXPRESS_ZONE_FACTORS
        .iter()
        .find(|(key, _)| (key - express_zone_length_m).abs() < LENGTH_KEY_TOLERANCE_M)
        .map(|(_, factor)| *factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn category_fractions_are_within_unit_interval() {
        for p in &USAGE_CATEGORIES {
            for fraction in [p.idle_fraction, p.standby5_fraction, p.standby30_fraction] {
                assert!((0.0..=1.0).contains(&fraction), "category {}", p.category);
            }
        }
    }

    #[test]
    fn category_three_profile() {
        let p = usage_category(3).expect("category 3");
        assert_eq!(p.default_trips_per_day, 300.0);
        assert_eq!(p.idle_fraction, 0.36);
        assert_eq!(p.standby5_fraction, 0.31);
        assert_eq!(p.standby30_fraction, 0.33);
    }

    #[test]
    fn unknown_category_is_none() {
        assert!(usage_category(0).is_none());
        assert!(usage_category(7).is_none());
        assert!(usage_category(259).is_none());
    }

    #[test]
    fn nearest_category_picks_closest_row() {
        assert_eq!(nearest_usage_category(1.0).category, 1);
        assert_eq!(nearest_usage_category(280.0).category, 3);
        assert_eq!(nearest_usage_category(1000.0).category, 4);
        assert_eq!(nearest_usage_category(10_000.0).category, 6);
    }

    #[test]
    fn nearest_category_tie_keeps_first_row() {
        // Halfway between 50 and 125.
        assert_eq!(nearest_usage_category(87.5).category, 1);
    }

    #[test]
    fn unmatched_stop_count_is_none() {
        assert_eq!(stop_factor(4), Some(0.49));
        assert_eq!(stop_factor(2), Some(1.0));
        assert!(stop_factor(10).is_none());
        assert!(stop_factor(1).is_none());
    }

    #[test]
    fn load_bracket_threshold_is_inclusive() {
        assert_eq!(load_factor(800.0), 0.075);
        assert_eq!(load_factor(801.0), 0.045);
        assert_eq!(load_factor(1275.0), 0.045);
        assert_eq!(load_factor(2000.0), 0.03);
        assert_eq!(load_factor(2500.0), 0.02);
    }

    #[test]
    fn counterbalance_factor_follows_slope() {
        let q = 0.045;
        assert_relative_eq!(counterbalance_factor(50, q).expect("50"), 1.0 - 0.0164 * q);
        assert_relative_eq!(counterbalance_factor(0, q).expect("0"), 1.0 + 0.0071 * q);
        assert_relative_eq!(counterbalance_factor(70, q).expect("70"), 1.0 + 0.0187 * q);
        assert!(counterbalance_factor(45, q).is_none());
    }

    #[test]
    fn express_zone_factor_matches_known_lengths() {
        assert_eq!(express_zone_factor(75.0), Some(0.58));
        assert_eq!(express_zone_factor(150.0), Some(0.42));
        assert!(express_zone_factor(100.0).is_none());
    }
}
