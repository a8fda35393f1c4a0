pub mod filter;
pub mod pricing;

pub use filter::{MealPool, filter_meals, is_eligible, rejection_reason, select_meal_pool};
pub use pricing::PricingContext;
