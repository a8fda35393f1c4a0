use tracing::{debug, info, warn};

use crate::config::SimulationParams;
use crate::error::Result;
use crate::models::{IngredientCatalog, Meal};
use crate::simulation::constants::MIN_ELIGIBLE_MEALS;
use crate::sourcing::pricing::PricingContext;

type Predicate = fn(&Meal, &SimulationParams) -> bool;

/// Eligibility predicates in evaluation order. The first failure rejects the meal.
const PREDICATES: [(&str, Predicate); 7] = [
    ("portion_weight", within_portion),
    ("price", within_price),
    ("co2", within_co2),
    ("organic_percentage", organic_enough),
    ("excluded_origin", no_excluded_origin),
    ("excluded_supplier", no_excluded_supplier),
    ("preferred_source", has_preferred_source),
];

fn within_portion(meal: &Meal, params: &SimulationParams) -> bool {
    params.portion_weight.contains(meal.total_weight())
}

fn within_price(meal: &Meal, params: &SimulationParams) -> bool {
    params.price.contains(meal.price) && meal.price <= params.customer_contract.max_price_per_meal
}

fn within_co2(meal: &Meal, params: &SimulationParams) -> bool {
    meal.co2_footprint <= params.co2_footprint.max
        && meal.co2_footprint <= params.customer_contract.max_co2_per_meal
}

fn organic_enough(meal: &Meal, params: &SimulationParams) -> bool {
    let pct = meal.organic_percentage();
    pct >= params.organic_percentage.min
        && pct >= params.customer_contract.min_organic_percentage
}

fn no_excluded_origin(meal: &Meal, params: &SimulationParams) -> bool {
    let contract = &params.customer_contract;
    !meal.origins().any(|o| {
        params.excluded_origins.iter().any(|x| x == o)
            || contract.excluded_origins.iter().any(|x| x == o)
    })
}

fn no_excluded_supplier(meal: &Meal, params: &SimulationParams) -> bool {
    let contract = &params.customer_contract;
    !meal.supplier_ids().any(|id| {
        params.excluded_suppliers.contains(&id) || contract.excluded_suppliers.contains(&id)
    })
}

/// Preferred origin OR preferred supplier; an empty preference list is satisfied.
fn has_preferred_source(meal: &Meal, params: &SimulationParams) -> bool {
    let contract = &params.customer_contract;
    let origin_ok = contract.preferred_origins.is_empty()
        || meal
            .origins()
            .any(|o| contract.preferred_origins.iter().any(|p| p == o));
    let supplier_ok = contract.preferred_suppliers.is_empty()
        || meal
            .supplier_ids()
            .any(|id| contract.preferred_suppliers.contains(&id));
    origin_ok || supplier_ok
}

/// Name of the first predicate the meal fails, if any.
pub fn rejection_reason(meal: &Meal, params: &SimulationParams) -> Option<&'static str> {
    PREDICATES
        .iter()
        .find(|(_, check)| !check(meal, params))
        .map(|(name, _)| *name)
}

pub fn is_eligible(meal: &Meal, params: &SimulationParams) -> bool {
    rejection_reason(meal, params).is_none()
}

/// Price meals from supplier data (when any discount is enabled) and keep
/// those passing every predicate, in input order.
///
/// Meals without ingredients are skipped. Every meal's category is resolved
/// first, so an unknown category id fails even for meals that would be rejected.
pub fn filter_meals(
    meals: &[Meal],
    catalog: &IngredientCatalog,
    params: &SimulationParams,
) -> Result<Vec<Meal>> {
    let pricing = params
        .supplier_discounts
        .any_enabled()
        .then(|| PricingContext::new(catalog, &params.supplier_discounts));

    let mut eligible = Vec::new();
    for meal in meals {
        meal.category()?;
        if meal.ingredients.is_empty() {
            continue;
        }

        let mut meal = meal.clone();
        if let Some(ctx) = &pricing {
            ctx.reprice(&mut meal)?;
        }

        match rejection_reason(&meal, params) {
            None => eligible.push(meal),
            Some(reason) => debug!(meal_id = meal.id, reason, "meal rejected"),
        }
    }

    Ok(eligible)
}

/// Meals handed to the simulator for a scenario.
#[derive(Debug, Clone)]
pub struct MealPool {
    pub meals: Vec<Meal>,
    /// How many meals passed the filter.
    pub eligible_count: usize,
    /// True when too few meals passed and the full catalog is used instead.
    pub fell_back: bool,
}

/// Filter the catalog, falling back to it unchanged when fewer than
/// [`MIN_ELIGIBLE_MEALS`] meals survive.
pub fn select_meal_pool(
    meals: &[Meal],
    catalog: &IngredientCatalog,
    params: &SimulationParams,
) -> Result<MealPool> {
    let eligible = filter_meals(meals, catalog, params)?;
    let eligible_count = eligible.len();

    if eligible_count < MIN_ELIGIBLE_MEALS {
        warn!(
            eligible = eligible_count,
            threshold = MIN_ELIGIBLE_MEALS,
            "too few meals meet the criteria, using the full catalog instead"
        );
        return Ok(MealPool {
            meals: meals.to_vec(),
            eligible_count,
            fell_back: true,
        });
    }

    info!(eligible = eligible_count, total = meals.len(), "meal catalog filtered");
    Ok(MealPool {
        meals: eligible,
        eligible_count,
        fell_back: false,
    })
}
