//! Data models for emission factors, catalog products and ledger entries

use serde::{Deserialize, Serialize};

use crate::error::{EcoError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionFactor {
    #[serde(rename = "material")]
    pub category: &'static str,
    #[serde(rename = "kgCO2PerKg")]
    pub kg_co2_per_kg: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub ef: f64, // kg CO2e per kg
    pub best_co2g: f64,
    pub worst_co2g: f64,
}

/// CO2 levels (grams) that map to an EcoScore of 100 and 0 respectively
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub best_co2g: f64,
    pub worst_co2g: f64,
}

impl Bounds {
    pub fn new(best_co2g: f64, worst_co2g: f64) -> Self {
        Self {
            best_co2g,
            worst_co2g,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            best_co2g: 10.0,
            worst_co2g: 2000.0,
        }
    }
}

/// Physical inputs for a footprint calculation.
///
/// Packaging and transport overheads are in grams of CO2e and default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintRequest {
    pub product_weight_kg: f64,
    #[serde(rename = "efKgCO2PerKg")]
    pub ef_kg_co2_per_kg: f64,
    #[serde(default)]
    pub packaging_g: f64,
    #[serde(default)]
    pub transport_g: f64,
}

impl FootprintRequest {
    pub fn new(product_weight_kg: f64, ef_kg_co2_per_kg: f64) -> Self {
        Self {
            product_weight_kg,
            ef_kg_co2_per_kg,
            ..Self::default()
        }
    }

    pub fn with_packaging(mut self, packaging_g: f64) -> Self {
        self.packaging_g = packaging_g;
        self
    }

    pub fn with_transport(mut self, transport_g: f64) -> Self {
        self.transport_g = transport_g;
        self
    }

    /// Reject negative or non-finite inputs.
    ///
    /// The calculator itself never calls this; callers opt in.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("productWeightKg", self.product_weight_kg),
            ("efKgCO2PerKg", self.ef_kg_co2_per_kg),
            ("packagingG", self.packaging_g),
            ("transportG", self.transport_g),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EcoError::invalid_input(format!("{} must be finite", name)));
            }
            if value < 0.0 {
                return Err(EcoError::invalid_input(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub base_co2: i64,
    pub packaging_co2: f64,
    pub transport_co2: f64,
    pub total_co2: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootprintResult {
    pub co2_grams: i64,
    pub eco_score: u8,
    pub breakdown: Breakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleResult {
    pub co2_grams: i64,
}

/// Input for registering a product on the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub co2_footprint: i64,
    pub eco_score: Option<u8>,
    pub catalog_id: Option<String>,
}

impl Registration {
    pub fn new(product_id: &str, name: &str, category: &str, co2_footprint: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            co2_footprint,
            eco_score: None,
            catalog_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerProduct {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub co2_footprint: i64,
    pub eco_score: Option<u8>,
    pub catalog_id: Option<String>,
    pub wallet: String,
    pub registered_at: i64, // unix seconds
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LedgerEventKind {
    ProductRegistered,
    ProductUpdated,
}

impl LedgerEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerEventKind::ProductRegistered => "ProductRegistered",
            LedgerEventKind::ProductUpdated => "ProductUpdated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ProductRegistered" => Some(LedgerEventKind::ProductRegistered),
            "ProductUpdated" => Some(LedgerEventKind::ProductUpdated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEvent {
    pub seq: i64,
    pub kind: LedgerEventKind,
    pub product_id: String,
    pub name: String,
    pub co2_footprint: i64,
    pub wallet: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub total_products: u64,
    pub total_co2_footprint: i64,
    pub average_co2_per_product: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_wallets: u64,
    pub total_products: u64,
    pub total_co2_footprint: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_overheads_to_zero() {
        let req = FootprintRequest::new(0.5, 6.0);
        assert_eq!(req.packaging_g, 0.0);
        assert_eq!(req.transport_g, 0.0);

        let parsed: FootprintRequest =
            serde_json::from_str(r#"{"productWeightKg": 1, "efKgCO2PerKg": 6.0}"#).unwrap();
        assert_eq!(parsed, FootprintRequest::new(1.0, 6.0));
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        assert!(FootprintRequest::new(1.0, 6.0).validate().is_ok());
        assert!(FootprintRequest::new(-1.0, 6.0).validate().is_err());
        assert!(FootprintRequest::new(1.0, f64::NAN).validate().is_err());
        assert!(
            FootprintRequest::new(1.0, 1.0)
                .with_transport(f64::INFINITY)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = FootprintResult {
            co2_grams: 3000,
            eco_score: 0,
            breakdown: Breakdown {
                base_co2: 3000,
                packaging_co2: 0.0,
                transport_co2: 0.0,
                total_co2: 3000,
            },
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["co2Grams"], 3000);
        assert_eq!(json["breakdown"]["baseCo2"], 3000);
    }
}
