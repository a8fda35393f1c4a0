use rand::Rng;
use rand::distributions::Distribution;
use rand::seq::SliceRandom;

use crate::models::{CategoryWeights, DietaryPreferences, DietaryRestrictions, User};
use crate::simulation::constants::*;

fn noise(rng: &mut impl Rng) -> f64 {
    rng.gen_range(-PROFILE_NOISE..=PROFILE_NOISE)
}

/// Perturb profile weights, clamp to [0, 1] and renormalise so they sum to 1.
fn perturbed_preferences(rng: &mut impl Rng, profile: &ProfileArchetype) -> CategoryWeights {
    let veg = (profile.veg_pref + noise(rng)).clamp(0.0, 1.0);
    let organic = (profile.organic_pref + noise(rng)).clamp(0.0, 1.0);
    let quick = (profile.quick_pref + noise(rng)).clamp(0.0, 1.0);

    let total = veg + organic + quick;
    if total <= 0.0 {
        return CategoryWeights {
            vegetarian: 1.0 / 3.0,
            organic: 1.0 / 3.0,
            quick: 1.0 / 3.0,
        };
    }

    CategoryWeights {
        vegetarian: veg / total,
        organic: organic / total,
        quick: quick / total,
    }
}

/// 15% of users get one to three distinct allergies.
fn draw_allergies(rng: &mut impl Rng) -> Vec<String> {
    if !rng.gen_bool(ALLERGY_PROBABILITY) {
        return Vec::new();
    }

    let count = ALLERGY_COUNT_DIST.sample(rng) + 1;

    ALLERGENS
        .choose_multiple(rng, count)
        .map(|a| a.to_string())
        .collect()
}

/// Build a single user with the given id.
pub fn generate_user(rng: &mut impl Rng, id: u32) -> User {
    let profile = PROFILES
        .choose(rng)
        .copied()
        .unwrap_or(PROFILES[PROFILES.len() - 1]);

    let preferences = perturbed_preferences(rng, &profile);

    let attendance_rate =
        (profile.attendance_rate + noise(rng)).clamp(ATTENDANCE_RATE_MIN, ATTENDANCE_RATE_MAX);

    let mut weekday_preferences = [1.0; 5];
    for pref in weekday_preferences.iter_mut() {
        *pref = rng
            .gen_range(WEEKDAY_PREF_DRAW.0..=WEEKDAY_PREF_DRAW.1)
            .clamp(WEEKDAY_PREF_CLAMP.0, WEEKDAY_PREF_CLAMP.1);
    }

    let allergies = draw_allergies(rng);

    let vegetarian =
        profile.is_vegetarian || rng.gen_bool(VEGETARIAN_FLIP_PROBABILITY);

    let organic_preference = (profile.organic_preference + noise(rng)).clamp(0.0, 1.0);

    let eco_conscious = profile.eco_conscious || rng.gen_bool(ECO_FLIP_PROBABILITY);

    User {
        id,
        profile: profile.name.to_string(),
        preferences,
        dietary_preferences: DietaryPreferences {
            vegetarian,
            organic_preference,
            eco_conscious,
        },
        dietary_restrictions: DietaryRestrictions::default(),
        attendance_rate,
        weekday_preferences,
        allergies,
    }
}

/// Generate `count` users with ids starting at 1.
pub fn generate_users(rng: &mut impl Rng, count: usize) -> Vec<User> {
    (1..=count as u32).map(|id| generate_user(rng, id)).collect()
}

/// Force dietary flags on the leading users so that at least the requested
/// shares of the population are strict vegetarians and eco-conscious.
pub fn apply_population_quotas(
    users: &mut [User],
    vegetarian_percentage: f64,
    eco_conscious_percentage: f64,
) {
    let quota = |pct: f64| (users.len() as f64 * pct.clamp(0.0, 100.0) / 100.0) as usize;
    let vegetarians = quota(vegetarian_percentage);
    let eco = quota(eco_conscious_percentage);

    for user in users.iter_mut().take(vegetarians) {
        user.dietary_preferences.vegetarian = true;
    }
    for user in users.iter_mut().take(eco) {
        user.dietary_preferences.eco_conscious = true;
    }
}
