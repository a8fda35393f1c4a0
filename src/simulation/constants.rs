use std::collections::HashMap;
use std::sync::LazyLock;

use rand::distributions::WeightedIndex;

// ─────────────────────────────────────────────────────────────────────────────
// Calendar modifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Attendance multiplier per weekday, Monday (0) to Friday (4).
pub const WEEKDAY_MODIFIERS: [f64; 5] = [0.9, 1.0, 1.1, 1.0, 0.8];

/// Attendance multiplier per calendar month (1-12).
pub static SEASONAL_MODIFIERS: LazyLock<HashMap<u32, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(1, 0.90);
    m.insert(2, 0.95);
    m.insert(3, 1.00);
    m.insert(4, 1.00);
    m.insert(5, 1.05);
    m.insert(6, 0.90); // summer holidays start
    m.insert(7, 0.70);
    m.insert(8, 0.80);
    m.insert(9, 1.10);
    m.insert(10, 1.05);
    m.insert(11, 1.00);
    m.insert(12, 0.80); // christmas
    m
});

/// Attendance multiplier for a weekday index, neutral outside Monday-Friday.
pub fn weekday_modifier(weekday: usize) -> f64 {
    WEEKDAY_MODIFIERS.get(weekday).copied().unwrap_or(1.0)
}

/// Attendance multiplier for a month, neutral for anything outside 1-12.
pub fn seasonal_modifier(month: u32) -> f64 {
    *SEASONAL_MODIFIERS.get(&month).unwrap_or(&1.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Population
// ─────────────────────────────────────────────────────────────────────────────

/// Default parameters of a behavioural archetype.
#[derive(Debug, Clone, Copy)]
pub struct ProfileArchetype {
    pub name: &'static str,
    pub veg_pref: f64,
    pub organic_pref: f64,
    pub quick_pref: f64,
    pub attendance_rate: f64,
    pub is_vegetarian: bool,
    pub organic_preference: f64,
    pub eco_conscious: bool,
}

pub const PROFILES: [ProfileArchetype; 6] = [
    ProfileArchetype {
        name: "Vegetarian",
        veg_pref: 0.8,
        organic_pref: 0.15,
        quick_pref: 0.05,
        attendance_rate: 0.7,
        is_vegetarian: true,
        organic_preference: 0.4,
        eco_conscious: true,
    },
    ProfileArchetype {
        name: "Meat Lover",
        veg_pref: 0.1,
        organic_pref: 0.7,
        quick_pref: 0.2,
        attendance_rate: 0.8,
        is_vegetarian: false,
        organic_preference: 0.3,
        eco_conscious: false,
    },
    ProfileArchetype {
        name: "Health Conscious",
        veg_pref: 0.4,
        organic_pref: 0.5,
        quick_pref: 0.1,
        attendance_rate: 0.75,
        is_vegetarian: false,
        organic_preference: 0.8,
        eco_conscious: true,
    },
    ProfileArchetype {
        name: "Busy Professional",
        veg_pref: 0.2,
        organic_pref: 0.2,
        quick_pref: 0.6,
        attendance_rate: 0.6,
        is_vegetarian: false,
        organic_preference: 0.2,
        eco_conscious: false,
    },
    ProfileArchetype {
        name: "Occasional Visitor",
        veg_pref: 0.33,
        organic_pref: 0.33,
        quick_pref: 0.34,
        attendance_rate: 0.3,
        is_vegetarian: false,
        organic_preference: 0.3,
        eco_conscious: false,
    },
    ProfileArchetype {
        name: "Regular Balanced",
        veg_pref: 0.33,
        organic_pref: 0.33,
        quick_pref: 0.34,
        attendance_rate: 0.9,
        is_vegetarian: false,
        organic_preference: 0.5,
        eco_conscious: true,
    },
];

/// Allergen tags users can be assigned. Matches the catalog's allergen vocabulary.
pub const ALLERGENS: [&str; 7] = ["gluten", "mælk", "nødder", "æg", "soja", "selleri", "sesam"];

/// Half-width of the uniform noise applied to profile defaults.
pub const PROFILE_NOISE: f64 = 0.1;

pub const ATTENDANCE_RATE_MIN: f64 = 0.1;
pub const ATTENDANCE_RATE_MAX: f64 = 1.0;

/// Range the per-user weekday multipliers are drawn from.
pub const WEEKDAY_PREF_DRAW: (f64, f64) = (0.7, 1.3);

/// Clamp applied to drawn weekday multipliers.
pub const WEEKDAY_PREF_CLAMP: (f64, f64) = (0.5, 1.5);

pub const ALLERGY_PROBABILITY: f64 = 0.15;

/// Weights for having 1, 2 or 3 allergies.
pub const ALLERGY_COUNT_WEIGHTS: [f64; 3] = [0.7, 0.2, 0.1];

/// Distribution over [`ALLERGY_COUNT_WEIGHTS`]; index 0 means one allergy.
pub static ALLERGY_COUNT_DIST: LazyLock<WeightedIndex<f64>> = LazyLock::new(|| {
    WeightedIndex::new(ALLERGY_COUNT_WEIGHTS).expect("allergy count weights are positive")
});

/// Chance a non-vegetarian profile still yields a strict vegetarian.
pub const VEGETARIAN_FLIP_PROBABILITY: f64 = 0.05;

/// Chance a non-eco profile still yields an eco-conscious user.
pub const ECO_FLIP_PROBABILITY: f64 = 0.10;

// ─────────────────────────────────────────────────────────────────────────────
// Choice scoring
// ─────────────────────────────────────────────────────────────────────────────

/// Organic affinity above which non-organic meals are penalised.
pub const ORGANIC_AFFINITY_THRESHOLD: f64 = 0.7;

/// Score factor for organic-leaning users facing a mostly non-organic meal.
pub const LOW_ORGANIC_PENALTY: f64 = 0.5;

/// kg CO2 above which eco-conscious users are put off.
pub const ECO_CO2_THRESHOLD: f64 = 5.0;

pub const HIGH_CO2_PENALTY: f64 = 0.7;

// ─────────────────────────────────────────────────────────────────────────────
// Sourcing
// ─────────────────────────────────────────────────────────────────────────────

/// Preparation markup applied to discounted ingredient cost.
pub const MARKUP_FACTOR: f64 = 2.5;

/// Contract length (months) from which contract discounts apply.
pub const MIN_CONTRACT_MONTHS: u32 = 12;

/// Below this many eligible meals a scenario falls back to the full catalog.
pub const MIN_ELIGIBLE_MEALS: usize = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allergy_count_distribution_builds() {
        use rand::SeedableRng;
        use rand::distributions::Distribution;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(ALLERGY_COUNT_DIST.sample(&mut rng) < ALLERGY_COUNT_WEIGHTS.len());
        }
    }

    #[test]
    fn test_profile_preferences_sum_to_one() {
        for p in PROFILES {
            assert!((p.veg_pref + p.organic_pref + p.quick_pref - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_modifier_defaults() {
        assert_eq!(weekday_modifier(0), 0.9);
        assert_eq!(weekday_modifier(4), 0.8);
        assert_eq!(weekday_modifier(6), 1.0);
        assert_eq!(seasonal_modifier(7), 0.7);
        assert_eq!(seasonal_modifier(13), 1.0);
    }
}
