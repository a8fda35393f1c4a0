use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Canteen simulator: synthetic diners choosing meals from a yearly menu.
#[derive(Parser, Debug)]
#[command(name = "canteen_sim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an unconstrained simulation over the whole meal catalog.
    Simulate {
        /// Meal catalog and yearly menu JSON.
        #[arg(short, long, default_value = "meals_data.json")]
        data: PathBuf,

        /// Number of synthetic users.
        #[arg(short, long, default_value_t = 100)]
        users: usize,

        /// Random seed.
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Where to write the JSON report.
        #[arg(short, long, default_value = "simulation_results.json")]
        output: PathBuf,

        /// Also write the choice log as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run a constrained scenario: filter, price, then simulate.
    Scenario {
        /// Scenario parameters JSON. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Meal catalog and yearly menu JSON.
        #[arg(short, long, default_value = "meals_data.json")]
        data: PathBuf,

        /// Ingredient catalog with supplier listings.
        #[arg(short, long, default_value = "ingredients.json")]
        ingredients: PathBuf,

        /// Where to write the JSON report.
        #[arg(short, long, default_value = "scenario_results.json")]
        output: PathBuf,

        /// Also write the choice log as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List the meals a scenario configuration would keep.
    Filter {
        /// Scenario parameters JSON. Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Meal catalog and yearly menu JSON.
        #[arg(short, long, default_value = "meals_data.json")]
        data: PathBuf,

        /// Ingredient catalog with supplier listings.
        #[arg(short, long, default_value = "ingredients.json")]
        ingredients: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_defaults() {
        let cli = Cli::try_parse_from(["canteen_sim", "simulate"]).unwrap();
        match cli.command {
            Command::Simulate {
                users, seed, csv, ..
            } => {
                assert_eq!(users, 100);
                assert_eq!(seed, 42);
                assert!(csv.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_scenario_with_config() {
        let cli = Cli::try_parse_from([
            "canteen_sim",
            "scenario",
            "--config",
            "params.json",
            "--csv",
            "choices.csv",
        ])
        .unwrap();
        match cli.command {
            Command::Scenario { config, csv, .. } => {
                assert_eq!(config, Some(PathBuf::from("params.json")));
                assert_eq!(csv, Some(PathBuf::from("choices.csv")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
