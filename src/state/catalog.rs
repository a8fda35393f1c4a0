use std::collections::HashMap;

use crate::error::{Result, SimError};
use crate::models::{DayMenu, Meal};

/// Read-only meal lookup keyed by id, preserving catalog order.
#[derive(Debug, Clone, Default)]
pub struct MealCatalog {
    meals: Vec<Meal>,
    /// Position in `meals` keyed by meal id.
    index: HashMap<u32, usize>,
}

impl MealCatalog {
    /// Create a catalog from a list of meals. A repeated id replaces the earlier entry.
    pub fn new(meals: Vec<Meal>) -> Self {
        let mut catalog = Self::default();
        for meal in meals {
            match catalog.index.get(&meal.id) {
                Some(&pos) => catalog.meals[pos] = meal,
                None => {
                    catalog.index.insert(meal.id, catalog.meals.len());
                    catalog.meals.push(meal);
                }
            }
        }
        catalog
    }

    pub fn get(&self, id: u32) -> Option<&Meal> {
        self.index.get(&id).map(|&pos| &self.meals[pos])
    }

    pub fn contains(&self, id: u32) -> bool {
        self.index.contains_key(&id)
    }

    /// Meals of a day's menu that are in this catalog, in menu order.
    pub fn offered(&self, meal_ids: &[u32]) -> Vec<&Meal> {
        meal_ids.iter().filter_map(|&id| self.get(id)).collect()
    }

    /// Check that every meal has a known category and every meal the menu
    /// references exists.
    pub fn validate_menu(&self, menu: &[DayMenu]) -> Result<()> {
        for meal in &self.meals {
            meal.category()?;
        }

        for day in menu {
            if let Some(&missing) = day.meals.iter().find(|&&id| !self.contains(id)) {
                return Err(SimError::UnknownMeal {
                    date: day.date,
                    meal_id: missing,
                });
            }
        }
        Ok(())
    }

    pub fn all(&self) -> &[Meal] {
        &self.meals
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}
