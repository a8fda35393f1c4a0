mod choice;
mod meal;
mod menu;
mod supplier;
mod user;

pub use choice::{ChoiceRecord, IngredientSnapshot, MealDetails};
pub use meal::{Category, IngredientRef, Meal, NutritionalInfo};
pub use menu::{DayMenu, MealDataset};
pub use supplier::{
    BonusProgram, CatalogIngredient, DiscountCondition, DiscountRule, IngredientCatalog, Supplier,
};
pub use user::{CategoryWeights, DietaryPreferences, DietaryRestrictions, User};
