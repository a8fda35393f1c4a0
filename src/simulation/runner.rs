use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use crate::analysis::{SimulationStats, aggregate};
use crate::config::SimulationParams;
use crate::error::Result;
use crate::models::{ChoiceRecord, IngredientCatalog, MealDataset, User};
use crate::simulation::choices::ChoiceSimulator;
use crate::simulation::modifiers::{EventTable, ModifierResolver, default_special_events};
use crate::simulation::population::{apply_population_quotas, generate_users};
use crate::sourcing::select_meal_pool;
use crate::state::MealCatalog;

/// How the meal pool of a scenario was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    pub total_meals: usize,
    pub eligible_meals: usize,
    pub fell_back: bool,
}

/// Everything a run produces, ready to serialize.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SimulationParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolSummary>,
    pub users: Vec<User>,
    pub user_choices: Vec<ChoiceRecord>,
    pub forced_absences: usize,
    pub analysis: SimulationStats,
}

fn simulate(
    users: Vec<User>,
    catalog: &MealCatalog,
    dataset: &MealDataset,
    resolver: &ModifierResolver,
    seed: u64,
) -> Result<SimulationReport> {
    let outcome =
        ChoiceSimulator::new(catalog, resolver, seed).simulate(&users, &dataset.yearly_menu)?;
    let analysis = aggregate(&outcome.records, &users, catalog)?;
    Ok(SimulationReport {
        parameters: None,
        pool: None,
        users,
        user_choices: outcome.records,
        forced_absences: outcome.forced_absences,
        analysis,
    })
}

/// Unconstrained run: every catalog meal is eligible at its listed price.
pub fn run_baseline(
    dataset: &MealDataset,
    user_count: usize,
    seed: u64,
) -> Result<SimulationReport> {
    let catalog = MealCatalog::new(dataset.meals.clone());
    catalog.validate_menu(&dataset.yearly_menu)?;
    let resolver = ModifierResolver::with_default_events()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let users = generate_users(&mut rng, user_count);

    let report = simulate(users, &catalog, dataset, &resolver, seed)?;
    info!(records = report.user_choices.len(), "baseline simulation finished");
    Ok(report)
}

/// Constrained run: filter and reprice the catalog, apply population quotas, simulate.
pub fn run_scenario(
    dataset: &MealDataset,
    ingredients: &IngredientCatalog,
    params: &SimulationParams,
) -> Result<SimulationReport> {
    params.validate()?;
    MealCatalog::new(dataset.meals.clone()).validate_menu(&dataset.yearly_menu)?;

    let events = params
        .special_events
        .clone()
        .unwrap_or_else(default_special_events);
    let resolver = ModifierResolver::new(EventTable::new(events)?);

    let pool = select_meal_pool(&dataset.meals, ingredients, params)?;
    let summary = PoolSummary {
        total_meals: dataset.meals.len(),
        eligible_meals: pool.eligible_count,
        fell_back: pool.fell_back,
    };
    let catalog = MealCatalog::new(pool.meals);

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut users = generate_users(&mut rng, params.user_count);
    apply_population_quotas(
        &mut users,
        params.vegetarian_percentage,
        params.eco_conscious_percentage,
    );

    let mut report = simulate(users, &catalog, dataset, &resolver, params.seed)?;
    info!(
        records = report.user_choices.len(),
        eligible = summary.eligible_meals,
        fell_back = summary.fell_back,
        "scenario simulation finished"
    );
    report.parameters = Some(params.clone());
    report.pool = Some(summary);
    Ok(report)
}
