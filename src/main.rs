use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use canteen_sim_rs::cli::{Cli, Command};
use canteen_sim_rs::config::SimulationParams;
use canteen_sim_rs::error::Result;
use canteen_sim_rs::interface::{display_meal_list, display_report};
use canteen_sim_rs::simulation::constants::MIN_ELIGIBLE_MEALS;
use canteen_sim_rs::simulation::{SimulationReport, run_baseline, run_scenario};
use canteen_sim_rs::sourcing::filter_meals;
use canteen_sim_rs::state::{
    load_dataset, load_ingredient_catalog, load_params, save_report, write_choices_csv,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("canteen_sim_rs=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if e.is_configuration_error() {
            eprintln!("Check the meal catalog, supplier catalog and scenario config.");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            data,
            users,
            seed,
            output,
            csv,
        } => cmd_simulate(&data, users, seed, &output, csv.as_deref()),
        Command::Scenario {
            config,
            data,
            ingredients,
            output,
            csv,
        } => cmd_scenario(config, &data, &ingredients, &output, csv.as_deref()),
        Command::Filter {
            config,
            data,
            ingredients,
        } => cmd_filter(config, &data, &ingredients),
    }
}

fn params_or_default(config: Option<PathBuf>) -> Result<SimulationParams> {
    let params = match config {
        Some(path) => load_params(path)?,
        None => SimulationParams::default(),
    };
    params.validate()?;
    Ok(params)
}

fn write_outputs(report: &SimulationReport, output: &Path, csv: Option<&Path>) -> Result<()> {
    save_report(output, report)?;
    info!(path = %output.display(), "report written");

    if let Some(path) = csv {
        write_choices_csv(path, &report.user_choices)?;
        info!(path = %path.display(), "choice log written");
    }

    Ok(())
}

/// Baseline run over the full catalog.
fn cmd_simulate(
    data: &Path,
    users: usize,
    seed: u64,
    output: &Path,
    csv: Option<&Path>,
) -> Result<()> {
    let dataset = load_dataset(data)?;
    let report = run_baseline(&dataset, users, seed)?;

    display_report(&report);
    write_outputs(&report, output, csv)
}

/// Constrained run with supplier pricing and population quotas.
fn cmd_scenario(
    config: Option<PathBuf>,
    data: &Path,
    ingredients: &Path,
    output: &Path,
    csv: Option<&Path>,
) -> Result<()> {
    let params = params_or_default(config)?;
    let dataset = load_dataset(data)?;
    let catalog = load_ingredient_catalog(ingredients)?;

    let report = run_scenario(&dataset, &catalog, &params)?;

    display_report(&report);
    write_outputs(&report, output, csv)
}

/// Show which meals survive the scenario filter without simulating.
fn cmd_filter(config: Option<PathBuf>, data: &Path, ingredients: &Path) -> Result<()> {
    let params = params_or_default(config)?;
    let dataset = load_dataset(data)?;
    let catalog = load_ingredient_catalog(ingredients)?;

    let eligible = filter_meals(&dataset.meals, &catalog, &params)?;
    display_meal_list(&eligible, "Eligible meals");

    println!(
        "{} of {} meals eligible.",
        eligible.len(),
        dataset.meals.len()
    );
    if eligible.len() < MIN_ELIGIBLE_MEALS {
        println!(
            "Fewer than {} meals: a scenario run would use the full catalog.",
            MIN_ELIGIBLE_MEALS
        );
    }

    Ok(())
}
