use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::models::{Category, ChoiceRecord, MealDetails, User};
use crate::state::MealCatalog;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_days: usize,
    pub total_users: usize,
    pub total_possible_visits: usize,
    pub total_actual_visits: usize,
    pub overall_attendance_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPopularity {
    pub count: usize,
    /// Share of attended visits, in percent.
    pub percentage: f64,
    pub name: String,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPopularity {
    pub count: usize,
    pub percentage: f64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttendance {
    pub count: usize,
    pub total: usize,
    pub rate: f64,
}

/// Figures over attended visits that carry a meal snapshot.
///
/// All zero and empty when no such visit exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientStats {
    pub sample_size: usize,
    pub organic_percentage_avg: f64,
    pub co2_footprint_avg: f64,
    pub price_avg: f64,
    pub origin_counts: BTreeMap<String, usize>,
    pub allergen_counts: BTreeMap<String, usize>,
}

/// Aggregate statistics of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub summary: Summary,
    /// Keyed by meal id.
    pub meal_popularity: BTreeMap<u32, MealPopularity>,
    /// Keyed by category id; every category is present.
    pub category_popularity: BTreeMap<u32, CategoryPopularity>,
    /// Mean attendance keyed by weekday (0 = Monday).
    pub weekday_attendance: BTreeMap<u32, f64>,
    /// Mean attendance keyed by month (1-12).
    pub month_attendance: BTreeMap<u32, f64>,
    pub profile_attendance: BTreeMap<String, ProfileAttendance>,
    pub ingredient_stats: IngredientStats,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn percent(num: usize, den: usize) -> f64 {
    ratio(num, den) * 100.0
}

/// Attended count and record count per key.
fn attendance_by<K: Ord>(
    records: &[ChoiceRecord],
    key: impl Fn(&ChoiceRecord) -> K,
) -> BTreeMap<K, f64> {
    let mut tally: BTreeMap<K, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = tally.entry(key(record)).or_default();
        entry.0 += usize::from(record.attended);
        entry.1 += 1;
    }
    tally
        .into_iter()
        .map(|(k, (attended, total))| (k, ratio(attended, total)))
        .collect()
}

fn ingredient_stats(details: &[&MealDetails]) -> IngredientStats {
    if details.is_empty() {
        return IngredientStats::default();
    }

    let n = details.len() as f64;
    let mut stats = IngredientStats {
        sample_size: details.len(),
        organic_percentage_avg: details
            .iter()
            .map(|d| d.ingredient_stats.organic_percentage)
            .sum::<f64>()
            / n,
        co2_footprint_avg: details.iter().map(|d| d.co2_footprint).sum::<f64>() / n,
        price_avg: details.iter().map(|d| d.price).sum::<f64>() / n,
        ..Default::default()
    };

    for d in details {
        for origin in &d.ingredient_stats.origins {
            *stats.origin_counts.entry(origin.clone()).or_default() += 1;
        }
        for allergen in &d.ingredient_stats.allergens {
            *stats.allergen_counts.entry(allergen.clone()).or_default() += 1;
        }
    }

    stats
}

/// Summarise a choice log against the population and the meal catalog.
pub fn aggregate(
    records: &[ChoiceRecord],
    users: &[User],
    catalog: &MealCatalog,
) -> Result<SimulationStats> {
    let total_days = records.iter().map(|r| r.date).collect::<BTreeSet<_>>().len();
    let total_users = records.iter().map(|r| r.user_id).collect::<BTreeSet<_>>().len();
    let total_possible_visits = total_days * total_users;
    let attended: Vec<&ChoiceRecord> = records.iter().filter(|r| r.attended).collect();
    let total_actual_visits = attended.len();

    let summary = Summary {
        total_days,
        total_users,
        total_possible_visits,
        total_actual_visits,
        overall_attendance_rate: ratio(total_actual_visits, total_possible_visits),
    };

    let mut meal_counts: BTreeMap<u32, usize> = BTreeMap::new();
    for meal_id in attended.iter().filter_map(|r| r.meal_id) {
        *meal_counts.entry(meal_id).or_default() += 1;
    }

    let mut category_counts: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|&c| (c, 0)).collect();
    let mut meal_popularity = BTreeMap::new();
    for (&meal_id, &count) in &meal_counts {
        let (name, category) = match catalog.get(meal_id) {
            Some(meal) => {
                let category = meal.category()?;
                *category_counts.entry(category).or_default() += count;
                (meal.name.clone(), Some(category))
            }
            None => ("Unknown".to_string(), None),
        };
        meal_popularity.insert(
            meal_id,
            MealPopularity {
                count,
                percentage: percent(count, total_actual_visits),
                name,
                category,
            },
        );
    }

    let category_popularity = category_counts
        .into_iter()
        .map(|(category, count)| {
            (
                category.id(),
                CategoryPopularity {
                    count,
                    percentage: percent(count, total_actual_visits),
                    name: category.display_name().to_string(),
                },
            )
        })
        .collect();

    let weekday_attendance = attendance_by(records, |r| r.date.weekday().num_days_from_monday());
    let month_attendance = attendance_by(records, |r| r.date.month());

    let user_profiles: HashMap<u32, &str> =
        users.iter().map(|u| (u.id, u.profile.as_str())).collect();
    let mut profile_attendance: BTreeMap<String, ProfileAttendance> = BTreeMap::new();
    for record in records {
        let profile = user_profiles
            .get(&record.user_id)
            .ok_or(SimError::UnknownUser(record.user_id))?;
        let entry = profile_attendance.entry(profile.to_string()).or_default();
        entry.count += usize::from(record.attended);
        entry.total += 1;
    }
    for entry in profile_attendance.values_mut() {
        entry.rate = ratio(entry.count, entry.total);
    }

    let details: Vec<&MealDetails> = attended
        .iter()
        .filter_map(|r| r.meal_details.as_ref())
        .collect();

    Ok(SimulationStats {
        summary,
        meal_popularity,
        category_popularity,
        weekday_attendance,
        month_attendance,
        profile_attendance,
        ingredient_stats: ingredient_stats(&details),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryWeights, DietaryPreferences, DietaryRestrictions, IngredientRef, Meal,
        NutritionalInfo,
    };
    use chrono::NaiveDate;

    fn user(id: u32, profile: &str) -> User {
        User {
            id,
            profile: profile.to_string(),
            preferences: CategoryWeights {
                vegetarian: 0.4,
                organic: 0.3,
                quick: 0.3,
            },
            dietary_preferences: DietaryPreferences::default(),
            dietary_restrictions: DietaryRestrictions::default(),
            attendance_rate: 0.5,
            weekday_preferences: [1.0; 5],
            allergies: vec![],
        }
    }

    fn meal(id: u32, category_id: u32, origin: &str, allergen: &str) -> Meal {
        Meal {
            id,
            name: format!("Meal {}", id),
            category_id,
            price: 40.0 + id as f64,
            co2_footprint: 2.0,
            ingredients: vec![IngredientRef {
                quantity: 400.0,
                is_organic: id % 2 == 0,
                origin: Some(origin.to_string()),
                allergens: vec![allergen.to_string()],
                ..Default::default()
            }],
            nutritional_info: NutritionalInfo::default(),
            original_price: None,
            discounted_price: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        // 2025-03-03 is a Monday
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn visit(user_id: u32, date: NaiveDate, meal: &Meal) -> ChoiceRecord {
        ChoiceRecord::attended(user_id, date, meal.id, MealDetails::snapshot(meal).unwrap())
    }

    #[test]
    fn test_empty_log() {
        let stats = aggregate(&[], &[], &MealCatalog::default()).unwrap();
        assert_eq!(stats.summary.total_days, 0);
        assert_eq!(stats.summary.overall_attendance_rate, 0.0);
        assert_eq!(stats.ingredient_stats, IngredientStats::default());
        assert_eq!(stats.category_popularity.len(), 3);
        assert!(stats.category_popularity.values().all(|c| c.count == 0 && c.percentage == 0.0));
    }

    #[test]
    fn test_rates_and_popularity() {
        let m1 = meal(1, 1, "Danmark", "gluten");
        let m2 = meal(2, 3, "Sverige", "soja");
        let catalog = MealCatalog::new(vec![m1.clone(), m2.clone()]);
        let users = vec![user(1, "Vegetarian"), user(2, "Busy Professional")];

        let records = vec![
            visit(1, day(3), &m1),
            ChoiceRecord::absent(2, day(3)),
            visit(1, day(4), &m1),
            visit(2, day(4), &m2),
        ];

        let stats = aggregate(&records, &users, &catalog).unwrap();
        assert_eq!(stats.summary.total_days, 2);
        assert_eq!(stats.summary.total_users, 2);
        assert_eq!(stats.summary.total_actual_visits, 3);
        assert!((stats.summary.overall_attendance_rate - 0.75).abs() < 1e-12);

        assert_eq!(stats.meal_popularity[&1].count, 2);
        assert!((stats.meal_popularity[&1].percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.category_popularity[&1].count, 2);
        assert_eq!(stats.category_popularity[&2].count, 0);
        assert_eq!(stats.category_popularity[&3].count, 1);

        assert!((stats.weekday_attendance[&0] - 0.5).abs() < 1e-12);
        assert!((stats.weekday_attendance[&1] - 1.0).abs() < 1e-12);
        assert!((stats.month_attendance[&3] - 0.75).abs() < 1e-12);

        assert_eq!(stats.profile_attendance["Vegetarian"].rate, 1.0);
        assert_eq!(stats.profile_attendance["Busy Professional"].count, 1);
        assert_eq!(stats.profile_attendance["Busy Professional"].total, 2);

        let ing = &stats.ingredient_stats;
        assert_eq!(ing.sample_size, 3);
        assert!((ing.price_avg - (41.0 + 41.0 + 42.0) / 3.0).abs() < 1e-9);
        assert!((ing.organic_percentage_avg - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(ing.origin_counts["Danmark"], 2);
        assert_eq!(ing.allergen_counts["soja"], 1);
    }

    #[test]
    fn test_unknown_user_is_error() {
        let records = vec![ChoiceRecord::absent(9, day(3))];
        assert!(matches!(
            aggregate(&records, &[user(1, "X")], &MealCatalog::default()),
            Err(SimError::UnknownUser(9))
        ));
    }
}
