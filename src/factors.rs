//! Emission factor table (kg CO2e per kg of material)

use std::collections::BTreeMap;

use crate::error::{EcoError, Result};
use crate::models::EmissionFactor;

const fn factor(
    category: &'static str,
    kg_co2_per_kg: f64,
    description: &'static str,
) -> EmissionFactor {
    EmissionFactor {
        category,
        kg_co2_per_kg,
        description,
    }
}

static BUILTIN_FACTORS: &[EmissionFactor] = &[
    // Low impact
    factor("bamboo", 0.5, "Bamboo products"),
    factor("paper", 0.8, "Recycled paper"),
    factor("cardboard", 1.2, "Cardboard packaging"),
    factor("glass", 1.0, "Recycled glass"),
    // Medium impact
    factor("steel", 1.8, "Steel (recycled: 0.5)"),
    factor("aluminum", 8.2, "Aluminum (recycled: 2.5)"),
    factor("concrete", 0.13, "Concrete"),
    factor("plastic", 6.0, "Virgin plastic"),
    // High impact
    factor("polyester", 5.5, "Polyester fabric"),
    factor("cotton", 27.0, "Conventional cotton"),
    factor("leather", 15.0, "Leather"),
    factor("electronics", 25.0, "Electronic devices"),
    // Very high impact
    factor("cement", 0.9, "Cement"),
    factor("beef", 60.0, "Beef (for comparison)"),
];

/// Read-only category lookup over a fixed set of emission factors
#[derive(Debug, Clone, Copy)]
pub struct EmissionFactorTable {
    factors: &'static [EmissionFactor],
}

impl EmissionFactorTable {
    pub fn builtin() -> Self {
        Self {
            factors: BUILTIN_FACTORS,
        }
    }

    /// Factor for a category, or `None` if the category is unknown.
    ///
    /// Matching ignores case and surrounding whitespace.
    pub fn lookup(&self, category: &str) -> Option<f64> {
        self.find(category).map(|f| f.kg_co2_per_kg)
    }

    pub fn get(&self, category: &str) -> Result<&'static EmissionFactor> {
        self.find(category)
            .ok_or_else(|| EcoError::UnknownCategory(category.to_string()))
    }

    pub fn all(&self) -> BTreeMap<&'static str, f64> {
        self.factors
            .iter()
            .map(|f| (f.category, f.kg_co2_per_kg))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'static, EmissionFactor> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    fn find(&self, category: &str) -> Option<&'static EmissionFactor> {
        let key = category.trim();
        self.factors
            .iter()
            .find(|f| f.category.eq_ignore_ascii_case(key))
    }
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::builtin()
    }
}
