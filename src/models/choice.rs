use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Category, Meal, NutritionalInfo};

/// Ingredient-level figures of a chosen meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSnapshot {
    pub total_count: usize,
    pub organic_count: usize,
    pub organic_percentage: f64,
    /// Distinct allergens, sorted.
    pub allergens: Vec<String>,
    /// Distinct origins, sorted. Missing origins appear as "Unknown".
    pub origins: Vec<String>,
}

/// Copy of a meal's attributes taken at selection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetails {
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub co2_footprint: f64,
    pub nutritional_info: NutritionalInfo,
    pub ingredient_stats: IngredientSnapshot,
}

impl MealDetails {
    /// Snapshot a meal. Meals without ingredients carry no detail.
    pub fn snapshot(meal: &Meal) -> Result<Option<Self>> {
        let category = meal.category()?;
        if meal.ingredients.is_empty() {
            return Ok(None);
        }

        let allergens = meal.allergens().into_iter().map(str::to_string).collect();
        let mut origins: Vec<String> = meal
            .ingredients
            .iter()
            .map(|i| i.origin_label().to_string())
            .collect();
        origins.sort();
        origins.dedup();

        Ok(Some(Self {
            name: meal.name.clone(),
            category,
            price: meal.price,
            co2_footprint: meal.co2_footprint,
            nutritional_info: meal.nutritional_info.clone(),
            ingredient_stats: IngredientSnapshot {
                total_count: meal.ingredients.len(),
                organic_count: meal.organic_count(),
                organic_percentage: meal.organic_percentage(),
                allergens,
                origins,
            },
        }))
    }
}

/// Outcome of one (user, day) pair.
///
/// Built only through [`ChoiceRecord::absent`] and [`ChoiceRecord::attended`],
/// so `attended == meal_id.is_some()` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    pub user_id: u32,
    pub date: NaiveDate,
    pub attended: bool,
    pub meal_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_details: Option<MealDetails>,
}

impl ChoiceRecord {
    pub fn absent(user_id: u32, date: NaiveDate) -> Self {
        Self {
            user_id,
            date,
            attended: false,
            meal_id: None,
            meal_details: None,
        }
    }

    pub fn attended(
        user_id: u32,
        date: NaiveDate,
        meal_id: u32,
        meal_details: Option<MealDetails>,
    ) -> Self {
        Self {
            user_id,
            date,
            attended: true,
            meal_id: Some(meal_id),
            meal_details,
        }
    }
}
