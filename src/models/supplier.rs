use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Raw discount rule as listed by a supplier.
///
/// The shape depends on `kind`: volume rules carry a `threshold`, seasonal
/// rules a list of `months`, contract rules neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRule {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<Vec<u32>>,
    pub percentage: f64,
}

/// Validated condition under which a discount rule applies.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountCondition {
    /// Estimated monthly volume must reach the threshold.
    Volume { threshold: f64 },
    /// Pricing month must be one of these (1-12).
    Seasonal { months: Vec<u32> },
    /// Any contract of at least a year.
    Contract,
}

impl DiscountRule {
    /// Check the rule's shape and return its condition.
    pub fn condition(&self, supplier_id: u32) -> Result<DiscountCondition> {
        check_percentage(self.percentage, supplier_id)?;
        let malformed = |reason: String| SimError::MalformedDiscountRule {
            supplier_id,
            reason,
        };

        match self.kind.as_str() {
            "volume" => match self.threshold {
                Some(threshold) if threshold.is_finite() && threshold >= 0.0 => {
                    Ok(DiscountCondition::Volume { threshold })
                }
                Some(threshold) => Err(malformed(format!(
                    "volume threshold must be non-negative, got {}",
                    threshold
                ))),
                None => Err(malformed("volume rule without threshold".to_string())),
            },
            "seasonal" => match &self.months {
                Some(months) if months.iter().all(|m| (1..=12).contains(m)) => {
                    Ok(DiscountCondition::Seasonal {
                        months: months.clone(),
                    })
                }
                Some(months) => Err(malformed(format!("invalid months {:?}", months))),
                None => Err(malformed("seasonal rule without months".to_string())),
            },
            "contract" => Ok(DiscountCondition::Contract),
            other => Err(malformed(format!("unknown discount type '{}'", other))),
        }
    }
}

/// Supplier bonus program (loyalty or annual).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusProgram {
    #[serde(rename = "type")]
    pub kind: String,
    pub percentage: f64,
}

impl BonusProgram {
    /// Validated bonus percentage.
    pub fn checked_percentage(&self, supplier_id: u32) -> Result<f64> {
        check_percentage(self.percentage, supplier_id)?;
        match self.kind.as_str() {
            "loyalty" | "annual" => Ok(self.percentage),
            other => Err(SimError::MalformedDiscountRule {
                supplier_id,
                reason: format!("unknown bonus program type '{}'", other),
            }),
        }
    }
}

fn check_percentage(percentage: f64, supplier_id: u32) -> Result<()> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        Ok(())
    } else {
        Err(SimError::MalformedDiscountRule {
            supplier_id,
            reason: format!("percentage {} outside 0-100", percentage),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub price_per_unit: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub discounts: Vec<DiscountRule>,
    #[serde(default)]
    pub bonus_programs: Vec<BonusProgram>,
}

fn default_unit() -> String {
    "kg".to_string()
}

impl Supplier {
    /// Price per gram (or per millilitre). Source prices are per kg or per litre.
    pub fn price_per_gram(&self) -> f64 {
        self.price_per_unit / 1000.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogIngredient {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
}

/// Ingredient catalog resolving ingredients to suppliers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientCatalog {
    #[serde(default)]
    pub ingredients: Vec<CatalogIngredient>,
}

impl IngredientCatalog {
    /// Index suppliers by id. The first listing of a supplier wins.
    pub fn supplier_index(&self) -> HashMap<u32, &Supplier> {
        let mut index = HashMap::new();
        for supplier in self.ingredients.iter().flat_map(|i| i.suppliers.iter()) {
            index.entry(supplier.id).or_insert(supplier);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: &str, threshold: Option<f64>, months: Option<Vec<u32>>, pct: f64) -> DiscountRule {
        DiscountRule {
            kind: kind.to_string(),
            threshold,
            months,
            percentage: pct,
        }
    }

    #[test]
    fn test_valid_conditions() {
        assert_eq!(
            rule("volume", Some(50.0), None, 10.0).condition(1).unwrap(),
            DiscountCondition::Volume { threshold: 50.0 }
        );
        assert_eq!(
            rule("seasonal", None, Some(vec![6, 7]), 5.0).condition(1).unwrap(),
            DiscountCondition::Seasonal { months: vec![6, 7] }
        );
        assert_eq!(
            rule("contract", None, None, 8.0).condition(1).unwrap(),
            DiscountCondition::Contract
        );
    }

    #[test]
    fn test_malformed_rules() {
        assert!(rule("volume", None, None, 10.0).condition(3).is_err());
        assert!(rule("seasonal", None, Some(vec![13]), 10.0).condition(3).is_err());
        assert!(rule("flash", None, None, 10.0).condition(3).is_err());
        assert!(rule("contract", None, None, 120.0).condition(3).is_err());
    }

    #[test]
    fn test_bonus_program_kinds() {
        let loyalty = BonusProgram {
            kind: "loyalty".to_string(),
            percentage: 3.0,
        };
        assert_eq!(loyalty.checked_percentage(1).unwrap(), 3.0);

        let bogus = BonusProgram {
            kind: "referral".to_string(),
            percentage: 3.0,
        };
        assert!(bogus.checked_percentage(1).is_err());
    }

    #[test]
    fn test_supplier_index_first_wins() {
        let supplier = |id, price| Supplier {
            id,
            name: String::new(),
            price_per_unit: price,
            unit: "kg".to_string(),
            discounts: vec![],
            bonus_programs: vec![],
        };
        let catalog = IngredientCatalog {
            ingredients: vec![
                CatalogIngredient {
                    id: 1,
                    name: "Carrot".to_string(),
                    suppliers: vec![supplier(1, 10.0)],
                },
                CatalogIngredient {
                    id: 2,
                    name: "Potato".to_string(),
                    suppliers: vec![supplier(1, 99.0), supplier(2, 20.0)],
                },
            ],
        };
        let index = catalog.supplier_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[&1].price_per_unit, 10.0);
    }
}
