use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Meal category. The catalog identifies categories by integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Vegetarian,
    OrganicWithMeat,
    Quick,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Vegetarian,
        Category::OrganicWithMeat,
        Category::Quick,
    ];

    /// Resolve a catalog category id. Unknown ids are a configuration error.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Category::Vegetarian),
            2 => Ok(Category::OrganicWithMeat),
            3 => Ok(Category::Quick),
            other => Err(SimError::UnknownCategory(other)),
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Category::Vegetarian => 1,
            Category::OrganicWithMeat => 2,
            Category::Quick => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Vegetarian => "Vegetarian",
            Category::OrganicWithMeat => "Organic with meat",
            Category::Quick => "Quick",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Nutritional totals for one portion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// One ingredient line of a meal.
///
/// Quantity is in grams. The boolean food-type flags drive dietary restriction checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Listed price, used when the supplier cannot be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub is_meat: bool,
    #[serde(default)]
    pub is_fish: bool,
    #[serde(default)]
    pub is_dairy: bool,
    #[serde(default)]
    pub is_egg: bool,
    #[serde(default)]
    pub is_pork: bool,
    #[serde(default)]
    pub is_beef: bool,
    #[serde(default)]
    pub is_shellfish: bool,
    #[serde(default)]
    pub is_animal_product: bool,
}

impl IngredientRef {
    /// Origin tag used in statistics; ingredients without one count as "Unknown".
    pub fn origin_label(&self) -> &str {
        self.origin.as_deref().unwrap_or("Unknown")
    }
}

/// A meal from the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: u32,
    pub name: String,
    pub category_id: u32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub co2_footprint: f64,
    #[serde(default)]
    pub ingredients: Vec<IngredientRef>,
    #[serde(default)]
    pub nutritional_info: NutritionalInfo,

    /// Catalog price before supplier pricing replaced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,

    /// Price derived from discounted supplier costs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
}

impl Meal {
    pub fn category(&self) -> Result<Category> {
        Category::from_id(self.category_id)
    }

    /// Total portion weight in grams.
    pub fn total_weight(&self) -> f64 {
        self.ingredients.iter().map(|i| i.quantity).sum()
    }

    pub fn organic_count(&self) -> usize {
        self.ingredients.iter().filter(|i| i.is_organic).count()
    }

    /// Share of organic ingredient lines, in percent. 0 for a meal without ingredients.
    pub fn organic_percentage(&self) -> f64 {
        if self.ingredients.is_empty() {
            return 0.0;
        }
        self.organic_count() as f64 / self.ingredients.len() as f64 * 100.0
    }

    /// Origins present among the ingredients (ingredients without origin are ignored).
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().filter_map(|i| i.origin.as_deref())
    }

    /// Supplier ids present among the ingredients.
    pub fn supplier_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.ingredients.iter().filter_map(|i| i.supplier_id)
    }

    /// Distinct allergens across all ingredients, sorted.
    pub fn allergens(&self) -> BTreeSet<&str> {
        self.ingredients
            .iter()
            .flat_map(|i| i.allergens.iter().map(String::as_str))
            .collect()
    }

    pub fn any_ingredient(&self, pred: impl Fn(&IngredientRef) -> bool) -> bool {
        self.ingredients.iter().any(pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(quantity: f64, organic: bool, origin: Option<&str>) -> IngredientRef {
        IngredientRef {
            name: "x".to_string(),
            quantity,
            is_organic: organic,
            origin: origin.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample_meal() -> Meal {
        Meal {
            id: 1,
            name: "Lentil stew".to_string(),
            category_id: 1,
            price: 45.0,
            co2_footprint: 1.2,
            ingredients: vec![
                ingredient(200.0, true, Some("Danmark")),
                ingredient(150.0, false, None),
            ],
            nutritional_info: NutritionalInfo::default(),
            original_price: None,
            discounted_price: None,
        }
    }

    #[test]
    fn test_category_from_id() {
        assert_eq!(Category::from_id(1).unwrap(), Category::Vegetarian);
        assert_eq!(Category::from_id(3).unwrap(), Category::Quick);
        assert!(matches!(
            Category::from_id(7),
            Err(SimError::UnknownCategory(7))
        ));
    }

    #[test]
    fn test_weight_and_organic_percentage() {
        let meal = sample_meal();
        assert!((meal.total_weight() - 350.0).abs() < 1e-9);
        assert!((meal.organic_percentage() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_origins_skip_missing() {
        let meal = sample_meal();
        assert_eq!(meal.origins().collect::<Vec<_>>(), vec!["Danmark"]);
        assert_eq!(meal.ingredients[1].origin_label(), "Unknown");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": 4, "name": "Burger", "categoryId": 3, "price": 55, "co2Footprint": 6.1,
            "ingredients": [{"name": "beef", "quantity": 180, "supplierId": 2, "origin": "Tyskland",
                             "isMeat": true, "isBeef": true, "allergens": ["gluten"]}],
            "nutritionalInfo": {"calories": 700}
        }"#;
        let meal: Meal = serde_json::from_str(json).unwrap();
        assert_eq!(meal.category().unwrap(), Category::Quick);
        assert_eq!(meal.ingredients[0].supplier_id, Some(2));
        assert!(meal.ingredients[0].is_beef);
        assert!(meal.original_price.is_none());
    }
}
