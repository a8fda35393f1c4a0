mod catalog;
mod persistence;

pub use catalog::MealCatalog;
pub use persistence::{
    load_dataset, load_ingredient_catalog, load_params, save_report, write_choices_csv,
};
