use std::collections::BTreeMap;

use crate::models::{Category, Meal};
use crate::simulation::SimulationReport;

const TOP_N: usize = 5;

/// Entries sorted by descending count, ties by key, truncated to `n`.
fn top_counts(counts: &BTreeMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}

/// Print a summary of a simulation run.
pub fn display_report(report: &SimulationReport) {
    let stats = &report.analysis;
    let summary = &stats.summary;

    println!();
    println!("=== Simulation Summary ===");
    println!();

    if let Some(pool) = &report.pool {
        println!(
            "Meal pool: {} of {} meals eligible{}",
            pool.eligible_meals,
            pool.total_meals,
            if pool.fell_back {
                " (too few, full catalog used)"
            } else {
                ""
            }
        );
    }
    println!("Users: {}", summary.total_users);
    println!("Workdays: {}", summary.total_days);
    println!(
        "Visits: {} of {} ({:.1}%)",
        summary.total_actual_visits,
        summary.total_possible_visits,
        summary.overall_attendance_rate * 100.0
    );
    if report.forced_absences > 0 {
        println!("Forced absences: {}", report.forced_absences);
    }

    println!();
    println!("--- Category popularity ---");
    for category in Category::ALL {
        if let Some(entry) = stats.category_popularity.get(&category.id()) {
            println!(
                "  {:<20} {:>6} ({:.1}%)",
                entry.name, entry.count, entry.percentage
            );
        }
    }

    let mut meals: Vec<_> = stats.meal_popularity.iter().collect();
    meals.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
    if !meals.is_empty() {
        println!();
        println!("--- Top {} meals ---", TOP_N);
        let width = meals
            .iter()
            .take(TOP_N)
            .map(|(_, m)| m.name.len())
            .max()
            .unwrap_or(10);
        for (i, (id, meal)) in meals.iter().take(TOP_N).enumerate() {
            println!(
                "{:>3}. {:<width$} (#{}) - {} ({:.1}%)",
                i + 1,
                meal.name,
                id,
                meal.count,
                meal.percentage,
                width = width
            );
        }
    }

    let ing = &stats.ingredient_stats;
    if ing.sample_size > 0 {
        println!();
        println!("--- Chosen meals ---");
        println!("Average price: {:.2} kr", ing.price_avg);
        println!("Average CO2: {:.2} kg", ing.co2_footprint_avg);
        println!("Average organic share: {:.1}%", ing.organic_percentage_avg);

        println!("Top origins:");
        for (origin, count) in top_counts(&ing.origin_counts, TOP_N) {
            println!("  {:<20} {:>6}", origin, count);
        }

        if !ing.allergen_counts.is_empty() {
            println!("Top allergens:");
            for (allergen, count) in top_counts(&ing.allergen_counts, TOP_N) {
                println!("  {:<20} {:>6}", allergen, count);
            }
        }
    }

    println!();
}

/// Display the meals that passed scenario filtering.
pub fn display_meal_list(meals: &[Meal], title: &str) {
    if meals.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} meals) ===", title, meals.len());
    println!();

    for meal in meals {
        let category = meal
            .category()
            .map(|c| c.display_name())
            .unwrap_or("Unknown");
        println!(
            "  #{} {} [{}] - {:.2} kr, {:.0} g, CO2 {:.2} kg, organic {:.0}%",
            meal.id,
            meal.name,
            category,
            meal.price,
            meal.total_weight(),
            meal.co2_footprint,
            meal.organic_percentage()
        );
    }

    println!();
}
