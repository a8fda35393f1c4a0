mod aggregate;

pub use aggregate::{
    CategoryPopularity, IngredientStats, MealPopularity, ProfileAttendance, SimulationStats,
    Summary, aggregate,
};
