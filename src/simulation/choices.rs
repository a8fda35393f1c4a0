use chrono::NaiveDate;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Category, CategoryWeights, ChoiceRecord, DayMenu, Meal, MealDetails, User};
use crate::simulation::constants::*;
use crate::simulation::modifiers::{DayModifiers, ModifierResolver, workday_index};
use crate::state::MealCatalog;

/// A workday of the menu with its modifiers and offered meals resolved.
struct PreparedDay<'a> {
    date: NaiveDate,
    weekday: usize,
    modifiers: DayModifiers,
    meals: Vec<&'a Meal>,
}

/// Offered meal with its preference score for one user.
#[derive(Debug)]
struct Candidate<'a> {
    meal: &'a Meal,
    score: f64,
}

/// Choice log of a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationOutcome {
    /// One record per (user, workday), ordered by date then user.
    pub records: Vec<ChoiceRecord>,
    /// Users who would have attended but found no acceptable meal.
    pub forced_absences: usize,
}

/// Probability that a user eats in the canteen on a workday, capped at 1.
pub fn attendance_probability(user: &User, weekday: usize, day: &DayModifiers) -> f64 {
    let user_weekday = user.weekday_preferences.get(weekday).copied().unwrap_or(1.0);
    (user.attendance_rate * user_weekday * day.attendance).clamp(0.0, 1.0)
}

/// Raw preference score of a meal for a user.
///
/// Allergens, strict vegetarianism and dietary restrictions zero the score;
/// low organic content and high CO2 only dampen it.
pub fn score_meal(user: &User, meal: &Meal, preference_mods: &CategoryWeights) -> Result<f64> {
    let category = meal.category()?;
    let diet = &user.dietary_preferences;

    if user.is_allergic_to(meal)
        || (diet.vegetarian && category != Category::Vegetarian)
        || user.dietary_restrictions.violated_by(meal)
    {
        return Ok(0.0);
    }

    let mut score = user.preferences.get(category) * preference_mods.get(category);

    if diet.organic_preference > ORGANIC_AFFINITY_THRESHOLD
        && (meal.organic_count() as f64) < meal.ingredients.len() as f64 / 2.0
    {
        score *= LOW_ORGANIC_PENALTY;
    }

    if diet.eco_conscious && meal.co2_footprint > ECO_CO2_THRESHOLD {
        score *= HIGH_CO2_PENALTY;
    }

    Ok(score)
}

/// Draw one meal with probability proportional to its score.
///
/// Only positively scored candidates take part, so a zero score is never
/// chosen. `None` when no candidate scores above zero.
fn draw_meal<'a>(rng: &mut impl Rng, candidates: &[Candidate<'a>]) -> Option<&'a Meal> {
    let viable: Vec<&Candidate<'a>> = candidates.iter().filter(|c| c.score > 0.0).collect();
    let dist = WeightedIndex::new(viable.iter().map(|c| c.score)).ok()?;
    Some(viable[dist.sample(rng)].meal)
}

/// Seed of a user's private generator, so each trajectory is independent.
fn user_seed(seed: u64, user_id: u32) -> u64 {
    seed ^ (user_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Simulates yearly attendance and meal choices for a population.
pub struct ChoiceSimulator<'a> {
    catalog: &'a MealCatalog,
    resolver: &'a ModifierResolver,
    seed: u64,
}

impl<'a> ChoiceSimulator<'a> {
    pub fn new(catalog: &'a MealCatalog, resolver: &'a ModifierResolver, seed: u64) -> Self {
        Self {
            catalog,
            resolver,
            seed,
        }
    }

    fn prepare(&self, menu: &[DayMenu]) -> Vec<PreparedDay<'a>> {
        menu.iter()
            .filter_map(|day| {
                let weekday = workday_index(day.date)?;
                Some(PreparedDay {
                    date: day.date,
                    weekday,
                    modifiers: self.resolver.resolve(day.date),
                    meals: self.catalog.offered(&day.meals),
                })
            })
            .collect()
    }

    /// Walk one user's workdays in menu order.
    ///
    /// Returns the user's records and the number of forced absences.
    fn simulate_user(
        &self,
        user: &User,
        days: &[PreparedDay<'a>],
    ) -> Result<(Vec<ChoiceRecord>, usize)> {
        let mut rng = StdRng::seed_from_u64(user_seed(self.seed, user.id));
        let mut records = Vec::with_capacity(days.len());
        let mut forced = 0;

        for day in days {
            let probability = attendance_probability(user, day.weekday, &day.modifiers);
            if !rng.gen_bool(probability) {
                records.push(ChoiceRecord::absent(user.id, day.date));
                continue;
            }

            let mut candidates = Vec::with_capacity(day.meals.len());
            for &meal in &day.meals {
                let score = score_meal(user, meal, &day.modifiers.preferences)?;
                candidates.push(Candidate { meal, score });
            }

            if !candidates.iter().any(|c| c.score > 0.0) {
                forced += 1;
                records.push(ChoiceRecord::absent(user.id, day.date));
                continue;
            }

            match draw_meal(&mut rng, &candidates) {
                Some(meal) => records.push(ChoiceRecord::attended(
                    user.id,
                    day.date,
                    meal.id,
                    MealDetails::snapshot(meal)?,
                )),
                None => records.push(ChoiceRecord::absent(user.id, day.date)),
            }
        }

        Ok((records, forced))
    }

    /// Simulate every user over every workday of the menu. Weekend dates produce no records.
    pub fn simulate(&self, users: &[User], menu: &[DayMenu]) -> Result<SimulationOutcome> {
        let days = self.prepare(menu);
        info!(users = users.len(), workdays = days.len(), "simulating choices");

        let mut outcome = SimulationOutcome::default();
        for user in users {
            let (records, forced) = self.simulate_user(user, &days)?;
            outcome.records.extend(records);
            outcome.forced_absences += forced;
        }

        outcome.records.sort_by_key(|r| (r.date, r.user_id));

        if outcome.forced_absences > 0 {
            warn!(
                count = outcome.forced_absences,
                "attending users found no acceptable meal and were recorded absent"
            );
        }

        Ok(outcome)
    }
}
