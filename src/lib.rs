pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod simulation;
pub mod sourcing;
pub mod state;

pub use error::{Result, SimError};
pub use simulation::{SimulationReport, run_baseline, run_scenario};
