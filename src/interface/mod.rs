pub mod render;

pub use render::{display_meal_list, display_report};
