use std::collections::HashMap;

use crate::config::DiscountSettings;
use crate::error::Result;
use crate::models::{DiscountCondition, IngredientCatalog, IngredientRef, Meal, Supplier};
use crate::simulation::constants::{MARKUP_FACTOR, MIN_CONTRACT_MONTHS};

/// Resolves suppliers and prices ingredients under the enabled discounts.
pub struct PricingContext<'a> {
    suppliers: HashMap<u32, &'a Supplier>,
    settings: &'a DiscountSettings,
}

impl<'a> PricingContext<'a> {
    pub fn new(catalog: &'a IngredientCatalog, settings: &'a DiscountSettings) -> Self {
        Self {
            suppliers: catalog.supplier_index(),
            settings,
        }
    }

    pub fn supplier(&self, id: u32) -> Option<&'a Supplier> {
        self.suppliers.get(&id).copied()
    }

    /// Highest applicable discount percentage for a supplier.
    ///
    /// Discounts never add up: the single best volume, seasonal, contract or
    /// bonus percentage wins.
    pub fn discount_percentage(&self, supplier: &Supplier) -> Result<f64> {
        let s = self.settings;
        let mut best: f64 = 0.0;

        for rule in &supplier.discounts {
            let applies = match rule.condition(supplier.id)? {
                DiscountCondition::Volume { threshold } => {
                    s.apply_volume_discounts && self.estimated_volume(supplier.id) >= threshold
                }
                DiscountCondition::Seasonal { months } => {
                    s.apply_seasonal_discounts && months.contains(&s.reference_month)
                }
                DiscountCondition::Contract => {
                    s.apply_contract_discounts && s.contract_length_months >= MIN_CONTRACT_MONTHS
                }
            };
            if applies {
                best = best.max(rule.percentage);
            }
        }

        for bonus in &supplier.bonus_programs {
            let pct = bonus.checked_percentage(supplier.id)?;
            if s.apply_bonus_programs {
                best = best.max(pct);
            }
        }

        Ok(best)
    }

    fn estimated_volume(&self, supplier_id: u32) -> f64 {
        self.settings
            .estimated_monthly_volume
            .get(&supplier_id)
            .copied()
            .unwrap_or(0.0)
    }

    /// Discounted cost of one ingredient line.
    ///
    /// Unresolvable suppliers fall back to the ingredient's listed price.
    pub fn ingredient_cost(&self, ingredient: &IngredientRef) -> Result<f64> {
        let supplier = match ingredient.supplier_id.and_then(|id| self.supplier(id)) {
            Some(s) => s,
            None => return Ok(ingredient.price.unwrap_or(0.0)),
        };

        let base = supplier.price_per_gram() * ingredient.quantity;
        let discount = self.discount_percentage(supplier)?;
        Ok(base * (1.0 - discount / 100.0))
    }

    /// Meal price from discounted ingredient costs plus markup, rounded to cents.
    pub fn meal_price(&self, meal: &Meal) -> Result<f64> {
        let mut cost = 0.0;
        for ingredient in &meal.ingredients {
            cost += self.ingredient_cost(ingredient)?;
        }
        Ok(round_cents(cost * MARKUP_FACTOR))
    }

    /// Replace the meal's price with the supplier-derived one, keeping the original.
    pub fn reprice(&self, meal: &mut Meal) -> Result<()> {
        let price = self.meal_price(meal)?;
        meal.original_price = Some(meal.original_price.unwrap_or(meal.price));
        meal.discounted_price = Some(price);
        meal.price = price;
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BonusProgram, CatalogIngredient, DiscountRule, NutritionalInfo};
    use crate::error::SimError;

    fn supplier(id: u32, price_per_kg: f64, discounts: Vec<DiscountRule>) -> Supplier {
        Supplier {
            id,
            name: format!("Supplier {}", id),
            price_per_unit: price_per_kg,
            unit: "kg".to_string(),
            discounts,
            bonus_programs: vec![],
        }
    }

    fn catalog(suppliers: Vec<Supplier>) -> IngredientCatalog {
        IngredientCatalog {
            ingredients: vec![CatalogIngredient {
                id: 1,
                name: "Mixed".to_string(),
                suppliers,
            }],
        }
    }

    fn volume(threshold: f64, pct: f64) -> DiscountRule {
        DiscountRule {
            kind: "volume".to_string(),
            threshold: Some(threshold),
            months: None,
            percentage: pct,
        }
    }

    fn seasonal(months: Vec<u32>, pct: f64) -> DiscountRule {
        DiscountRule {
            kind: "seasonal".to_string(),
            threshold: None,
            months: Some(months),
            percentage: pct,
        }
    }

    fn settings(month: u32) -> DiscountSettings {
        DiscountSettings {
            reference_month: month,
            ..Default::default()
        }
    }

    #[test]
    fn test_max_discount_not_sum() {
        let cat = catalog(vec![supplier(2, 100.0, vec![volume(50.0, 10.0), seasonal(vec![6], 15.0)])]);
        let s = settings(6);
        let ctx = PricingContext::new(&cat, &s);
        let pct = ctx.discount_percentage(ctx.supplier(2).unwrap()).unwrap();
        assert_eq!(pct, 15.0);
    }

    #[test]
    fn test_volume_threshold_must_be_met() {
        // Default volume estimate for supplier 8 is 10 kg.
        let cat = catalog(vec![supplier(8, 100.0, vec![volume(50.0, 10.0)])]);
        let s = settings(1);
        let ctx = PricingContext::new(&cat, &s);
        assert_eq!(ctx.discount_percentage(ctx.supplier(8).unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn test_disabled_toggle_ignores_rule() {
        let cat = catalog(vec![supplier(2, 100.0, vec![seasonal(vec![3], 20.0)])]);
        let s = DiscountSettings {
            apply_seasonal_discounts: false,
            reference_month: 3,
            ..Default::default()
        };
        let ctx = PricingContext::new(&cat, &s);
        assert_eq!(ctx.discount_percentage(ctx.supplier(2).unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn test_bonus_program_counts() {
        let mut sup = supplier(4, 100.0, vec![]);
        sup.bonus_programs.push(BonusProgram {
            kind: "annual".to_string(),
            percentage: 4.0,
        });
        let cat = catalog(vec![sup]);
        let s = settings(1);
        let ctx = PricingContext::new(&cat, &s);
        assert_eq!(ctx.discount_percentage(ctx.supplier(4).unwrap()).unwrap(), 4.0);
    }

    #[test]
    fn test_malformed_rule_is_fatal() {
        let bad = DiscountRule {
            kind: "volume".to_string(),
            threshold: None,
            months: None,
            percentage: 5.0,
        };
        let cat = catalog(vec![supplier(1, 100.0, vec![bad])]);
        let s = settings(1);
        let ctx = PricingContext::new(&cat, &s);
        assert!(matches!(
            ctx.discount_percentage(ctx.supplier(1).unwrap()),
            Err(SimError::MalformedDiscountRule { supplier_id: 1, .. })
        ));
    }

    #[test]
    fn test_meal_price_with_markup() {
        // 200 g at 100/kg = 20, 10% volume discount -> 18, x2.5 -> 45
        let cat = catalog(vec![supplier(2, 100.0, vec![volume(50.0, 10.0)])]);
        let s = settings(1);
        let ctx = PricingContext::new(&cat, &s);
        let mut meal = Meal {
            id: 1,
            name: "Soup".to_string(),
            category_id: 1,
            price: 60.0,
            co2_footprint: 1.0,
            ingredients: vec![
                IngredientRef {
                    quantity: 200.0,
                    supplier_id: Some(2),
                    ..Default::default()
                },
                IngredientRef {
                    quantity: 50.0,
                    supplier_id: Some(99),
                    price: Some(2.0),
                    ..Default::default()
                },
            ],
            nutritional_info: NutritionalInfo::default(),
            original_price: None,
            discounted_price: None,
        };

        ctx.reprice(&mut meal).unwrap();
        // (18 + 2) x 2.5
        assert!((meal.price - 50.0).abs() < 1e-9);
        assert_eq!(meal.original_price, Some(60.0));
        assert_eq!(meal.discounted_price, Some(50.0));
    }
}
