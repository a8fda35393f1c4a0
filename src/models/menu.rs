use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Meal;

/// Meals offered on one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayMenu {
    pub date: NaiveDate,
    pub meals: Vec<u32>,
}

/// Meal catalog plus the yearly menu built from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDataset {
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub yearly_menu: Vec<DayMenu>,
}
