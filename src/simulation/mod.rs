pub mod choices;
pub mod constants;
pub mod modifiers;
pub mod population;
pub mod runner;

pub use choices::{ChoiceSimulator, SimulationOutcome, attendance_probability, score_meal};
pub use modifiers::{
    DayModifiers, EventTable, ModifierResolver, SpecialEvent, default_special_events,
    workday_index,
};
pub use population::{apply_population_quotas, generate_user, generate_users};
pub use runner::{PoolSummary, SimulationReport, run_baseline, run_scenario};
