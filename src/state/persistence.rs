use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::SimulationParams;
use crate::error::Result;
use crate::models::{ChoiceRecord, IngredientCatalog, MealDataset};

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the meal catalog and yearly menu.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<MealDataset> {
    let dataset: MealDataset = load_json(path)?;
    info!(
        meals = dataset.meals.len(),
        menu_days = dataset.yearly_menu.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Load the ingredient catalog with supplier listings.
pub fn load_ingredient_catalog<P: AsRef<Path>>(path: P) -> Result<IngredientCatalog> {
    load_json(path)
}

/// Load scenario parameters. Keys missing from the file keep their defaults.
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<SimulationParams> {
    load_json(path)
}

/// Write any serializable report as pretty JSON.
pub fn save_report<T: Serialize, P: AsRef<Path>>(path: P, report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write the choice log as flat CSV, one row per (user, day).
pub fn write_choices_csv<P: AsRef<Path>>(path: P, records: &[ChoiceRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "user_id",
        "date",
        "attended",
        "meal_id",
        "meal_name",
        "category",
        "price",
        "co2_footprint",
        "organic_percentage",
    ])?;

    for record in records {
        let details = record.meal_details.as_ref();
        wtr.write_record([
            record.user_id.to_string(),
            record.date.to_string(),
            record.attended.to_string(),
            record.meal_id.map(|id| id.to_string()).unwrap_or_default(),
            details.map(|d| d.name.clone()).unwrap_or_default(),
            details
                .map(|d| d.category.display_name().to_string())
                .unwrap_or_default(),
            details.map(|d| format!("{:.2}", d.price)).unwrap_or_default(),
            details
                .map(|d| format!("{:.2}", d.co2_footprint))
                .unwrap_or_default(),
            details
                .map(|d| format!("{:.1}", d.ingredient_stats.organic_percentage))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
