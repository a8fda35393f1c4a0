use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Unknown meal category id: {0}")]
    UnknownCategory(u32),

    #[error("Duplicate special event date: {0}")]
    DuplicateEventDate(NaiveDate),

    #[error("Invalid modifier for special event on {date}: {reason}")]
    InvalidEventModifier { date: NaiveDate, reason: String },

    #[error("Malformed discount rule for supplier {supplier_id}: {reason}")]
    MalformedDiscountRule { supplier_id: u32, reason: String },

    #[error("Menu for {date} references unknown meal {meal_id}")]
    UnknownMeal { date: NaiveDate, meal_id: u32 },

    #[error("Choice record references unknown user {0}")]
    UnknownUser(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SimError {
    /// True for errors caused by a caller-supplied configuration or catalog.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SimError::UnknownCategory(_)
                | SimError::DuplicateEventDate(_)
                | SimError::InvalidEventModifier { .. }
                | SimError::MalformedDiscountRule { .. }
                | SimError::UnknownMeal { .. }
                | SimError::UnknownUser(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
