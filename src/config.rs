use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::simulation::SpecialEvent;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicTarget {
    /// Minimum share of organic ingredient lines, in percent.
    pub min: f64,
    /// Target share, in percent. Informational only.
    pub target: f64,
}

impl Default for OrganicTarget {
    fn default() -> Self {
        Self {
            min: 30.0,
            target: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Co2Ceiling {
    /// kg CO2 per meal.
    pub max: f64,
}

/// Customer contract terms layered on top of the base constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerContract {
    pub name: String,
    pub max_price_per_meal: f64,
    pub min_organic_percentage: f64,
    pub max_co2_per_meal: f64,
    pub preferred_origins: Vec<String>,
    pub excluded_origins: Vec<String>,
    pub preferred_suppliers: Vec<u32>,
    pub excluded_suppliers: Vec<u32>,
}

impl Default for CustomerContract {
    fn default() -> Self {
        Self {
            name: "Standard".to_string(),
            max_price_per_meal: 65.0,
            min_organic_percentage: 40.0,
            max_co2_per_meal: 4.5,
            preferred_origins: vec!["Danmark".to_string()],
            excluded_origins: Vec::new(),
            preferred_suppliers: Vec::new(),
            excluded_suppliers: Vec::new(),
        }
    }
}

/// Which supplier discounts feed the meal price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscountSettings {
    pub apply_volume_discounts: bool,
    pub apply_seasonal_discounts: bool,
    pub apply_contract_discounts: bool,
    pub apply_bonus_programs: bool,
    pub contract_length_months: u32,
    /// Estimated monthly order volume (kg) keyed by supplier id.
    pub estimated_monthly_volume: BTreeMap<u32, f64>,
    /// Month (1-12) used to match seasonal discounts.
    ///
    /// Defaults to the current local month when omitted, so the same config and
    /// seed can price meals differently from one month to the next. Set it to
    /// make scenario runs repeatable.
    pub reference_month: u32,
}

impl DiscountSettings {
    pub fn any_enabled(&self) -> bool {
        self.apply_volume_discounts
            || self.apply_seasonal_discounts
            || self.apply_contract_discounts
            || self.apply_bonus_programs
    }

    /// All toggles off: catalog prices are used as-is.
    pub fn disabled() -> Self {
        Self {
            apply_volume_discounts: false,
            apply_seasonal_discounts: false,
            apply_contract_discounts: false,
            apply_bonus_programs: false,
            ..Default::default()
        }
    }
}

impl Default for DiscountSettings {
    fn default() -> Self {
        let estimated_monthly_volume = [
            (1, 30.0),
            (2, 100.0),
            (3, 50.0),
            (4, 20.0),
            (5, 80.0),
            (6, 40.0),
            (7, 25.0),
            (8, 10.0),
            (9, 60.0),
        ]
        .into_iter()
        .collect();

        Self {
            apply_volume_discounts: true,
            apply_seasonal_discounts: true,
            apply_contract_discounts: true,
            apply_bonus_programs: true,
            contract_length_months: 12,
            estimated_monthly_volume,
            reference_month: chrono::Local::now().month(),
        }
    }
}

/// Parameters of one scenario run.
///
/// Every level defaults independently, so a partial JSON document only
/// overrides the keys it names. The one clock-dependent default is
/// `supplier_discounts.reference_month`; pin it for reproducible prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Portion weight in grams.
    pub portion_weight: Bounds,
    pub price: Bounds,
    pub organic_percentage: OrganicTarget,
    pub co2_footprint: Co2Ceiling,
    pub excluded_origins: Vec<String>,
    pub excluded_suppliers: Vec<u32>,
    pub user_count: usize,
    /// Share of users forced strictly vegetarian, in percent.
    pub vegetarian_percentage: f64,
    /// Share of users forced eco-conscious, in percent.
    pub eco_conscious_percentage: f64,
    pub customer_contract: CustomerContract,
    pub supplier_discounts: DiscountSettings,
    pub seed: u64,
    /// Replaces the built-in event table when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_events: Option<Vec<SpecialEvent>>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            portion_weight: Bounds {
                min: 300.0,
                max: 600.0,
            },
            price: Bounds {
                min: 30.0,
                max: 70.0,
            },
            organic_percentage: OrganicTarget::default(),
            co2_footprint: Co2Ceiling { max: 5.0 },
            excluded_origins: Vec::new(),
            excluded_suppliers: Vec::new(),
            user_count: 300,
            vegetarian_percentage: 15.0,
            eco_conscious_percentage: 30.0,
            customer_contract: CustomerContract::default(),
            supplier_discounts: DiscountSettings::default(),
            seed: 42,
            special_events: None,
        }
    }
}

impl SimulationParams {
    /// Reject bounds and shares that no meal or population could satisfy.
    pub fn validate(&self) -> Result<()> {
        for (name, bounds) in [("portion_weight", self.portion_weight), ("price", self.price)] {
            if !(bounds.min <= bounds.max) {
                return Err(SimError::InvalidInput(format!(
                    "{} min {} exceeds max {}",
                    name, bounds.min, bounds.max
                )));
            }
        }

        for (name, pct) in [
            ("vegetarian_percentage", self.vegetarian_percentage),
            ("eco_conscious_percentage", self.eco_conscious_percentage),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(SimError::InvalidInput(format!(
                    "{} must be within 0-100, got {}",
                    name, pct
                )));
            }
        }

        if !(1..=12).contains(&self.supplier_discounts.reference_month) {
            return Err(SimError::InvalidInput(format!(
                "reference_month must be within 1-12, got {}",
                self.supplier_discounts.reference_month
            )));
        }

        Ok(())
    }
}
