use serde::{Deserialize, Serialize};

use crate::models::{Category, Meal};

/// One multiplier (or weight) per meal category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub vegetarian: f64,
    pub organic: f64,
    pub quick: f64,
}

impl CategoryWeights {
    pub const NEUTRAL: CategoryWeights = CategoryWeights {
        vegetarian: 1.0,
        organic: 1.0,
        quick: 1.0,
    };

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Vegetarian => self.vegetarian,
            Category::OrganicWithMeat => self.organic,
            Category::Quick => self.quick,
        }
    }

    pub fn sum(&self) -> f64 {
        self.vegetarian + self.organic + self.quick
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Soft dietary leanings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DietaryPreferences {
    /// Strict vegetarian: non-vegetarian categories are never chosen.
    pub vegetarian: bool,
    /// Organic affinity in [0, 1].
    pub organic_preference: f64,
    pub eco_conscious: bool,
}

/// Hard dietary restrictions. Each flag excludes meals containing a matching ingredient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryRestrictions {
    pub vegan: bool,
    pub pescatarian: bool,
    pub no_fish: bool,
    pub no_shellfish: bool,
    pub no_pork: bool,
    pub no_beef: bool,
    pub no_dairy: bool,
    pub no_eggs: bool,
}

impl DietaryRestrictions {
    /// True if any ingredient of the meal violates one of the set restrictions.
    pub fn violated_by(&self, meal: &Meal) -> bool {
        (self.vegan && meal.any_ingredient(|i| i.is_animal_product || i.is_dairy || i.is_egg))
            || (self.pescatarian && meal.any_ingredient(|i| i.is_meat && !i.is_fish))
            || (self.no_fish && meal.any_ingredient(|i| i.is_fish))
            || (self.no_shellfish && meal.any_ingredient(|i| i.is_shellfish))
            || (self.no_pork && meal.any_ingredient(|i| i.is_pork))
            || (self.no_beef && meal.any_ingredient(|i| i.is_beef))
            || (self.no_dairy && meal.any_ingredient(|i| i.is_dairy))
            || (self.no_eggs && meal.any_ingredient(|i| i.is_egg))
    }
}

/// A synthetic canteen visitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub profile: String,
    /// Category preference weights, summing to 1.
    pub preferences: CategoryWeights,
    pub dietary_preferences: DietaryPreferences,
    #[serde(default)]
    pub dietary_restrictions: DietaryRestrictions,
    /// Base attendance probability in [0.1, 1.0].
    pub attendance_rate: f64,
    /// Attendance multipliers for Monday through Friday.
    pub weekday_preferences: [f64; 5],
    pub allergies: Vec<String>,
}

impl User {
    pub fn is_allergic_to(&self, meal: &Meal) -> bool {
        meal.ingredients
            .iter()
            .flat_map(|i| i.allergens.iter())
            .any(|a| self.allergies.contains(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientRef, NutritionalInfo};

    fn meal_with(ingredient: IngredientRef) -> Meal {
        Meal {
            id: 1,
            name: "Test".to_string(),
            category_id: 2,
            price: 50.0,
            co2_footprint: 2.0,
            ingredients: vec![ingredient],
            nutritional_info: NutritionalInfo::default(),
            original_price: None,
            discounted_price: None,
        }
    }

    #[test]
    fn test_vegan_rejects_dairy() {
        let meal = meal_with(IngredientRef {
            is_dairy: true,
            ..Default::default()
        });
        let vegan = DietaryRestrictions {
            vegan: true,
            ..Default::default()
        };
        assert!(vegan.violated_by(&meal));
        assert!(!DietaryRestrictions::default().violated_by(&meal));
    }

    #[test]
    fn test_pescatarian_allows_fish() {
        let pescatarian = DietaryRestrictions {
            pescatarian: true,
            ..Default::default()
        };
        let salmon = meal_with(IngredientRef {
            is_meat: true,
            is_fish: true,
            ..Default::default()
        });
        let pork = meal_with(IngredientRef {
            is_meat: true,
            is_pork: true,
            ..Default::default()
        });
        assert!(!pescatarian.violated_by(&salmon));
        assert!(pescatarian.violated_by(&pork));
    }

    #[test]
    fn test_category_weights_lookup() {
        let w = CategoryWeights {
            vegetarian: 0.5,
            organic: 0.3,
            quick: 0.2,
        };
        assert_eq!(w.get(Category::OrganicWithMeat), 0.3);
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }
}
