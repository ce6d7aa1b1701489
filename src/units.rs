//! Mass quantity parsing ("500g", "0.5 kg", "250mg", "1.2t")

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EcoError, Result};

static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:e[+-]?\d+)?)\s*(mg|g|kg|t)?\s*$")
        .expect("quantity regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassUnit {
    Milligram,
    Gram,
    Kilogram,
    Tonne,
}

impl MassUnit {
    fn grams(self) -> f64 {
        match self {
            MassUnit::Milligram => 0.001,
            MassUnit::Gram => 1.0,
            MassUnit::Kilogram => 1000.0,
            MassUnit::Tonne => 1_000_000.0,
        }
    }

    fn parse(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_lowercase().as_str() {
            "mg" => Some(MassUnit::Milligram),
            "g" => Some(MassUnit::Gram),
            "kg" => Some(MassUnit::Kilogram),
            "t" => Some(MassUnit::Tonne),
            _ => None,
        }
    }
}

fn parse_mass(input: &str, bare_unit: MassUnit) -> Result<f64> {
    let invalid = || EcoError::InvalidQuantity(input.to_string());
    let cap = QUANTITY_RE.captures(input).ok_or_else(invalid)?;

    let value: f64 = cap[1].parse().map_err(|_| invalid())?;
    let unit = match cap.get(2) {
        Some(m) => MassUnit::parse(m.as_str()).ok_or_else(invalid)?,
        None => bare_unit,
    };
    Ok(value * unit.grams())
}

/// Parse a mass in kilograms; a bare number is taken as kilograms
pub fn parse_mass_kg(input: &str) -> Result<f64> {
    Ok(parse_mass(input, MassUnit::Kilogram)? / MassUnit::Kilogram.grams())
}

/// Parse a mass in grams; a bare number is taken as grams
pub fn parse_mass_grams(input: &str) -> Result<f64> {
    parse_mass(input, MassUnit::Gram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kilograms_from_various_units() {
        assert_eq!(parse_mass_kg("500g").unwrap(), 0.5);
        assert_eq!(parse_mass_kg("0.5 kg").unwrap(), 0.5);
        assert_eq!(parse_mass_kg("2").unwrap(), 2.0);
        assert_eq!(parse_mass_kg("1.5T").unwrap(), 1500.0);
        assert_eq!(parse_mass_kg(" 250 MG ").unwrap(), 0.00025);
    }

    #[test]
    fn grams_default_for_overheads() {
        assert_eq!(parse_mass_grams("120").unwrap(), 120.0);
        assert_eq!(parse_mass_grams("0.2kg").unwrap(), 200.0);
        assert_eq!(parse_mass_grams(".5g").unwrap(), 0.5);
    }

    #[test]
    fn negative_values_parse() {
        assert_eq!(parse_mass_grams("-3g").unwrap(), -3.0);
    }

    #[test]
    fn garbage_is_rejected() {
        for bad in ["", "kg", "5 lbs", "1.2.3g", "five grams"] {
            assert!(
                matches!(parse_mass_kg(bad), Err(EcoError::InvalidQuantity(_))),
                "accepted {:?}",
                bad
            );
        }
    }
}
