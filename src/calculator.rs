//! CO2 footprint and EcoScore calculation
//!
//! All functions here are pure arithmetic and do no input validation:
//! negative weights give negative totals, NaN collapses to 0 and infinities
//! saturate when converted to integer grams. Use
//! [`FootprintRequest::validate`] first if that matters to the caller.
//!
//! Rounding is half-up (an exact .5 goes toward positive infinity) everywhere.

use crate::models::{Bounds, Breakdown, FootprintRequest, FootprintResult, SimpleResult};
use crate::tier::EcoTier;

const GRAMS_PER_KG: f64 = 1000.0;

/// Round to the nearest integer, ties toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn to_grams(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Total CO2e in grams for a product of the given weight and emission factor
pub fn compute_co2_grams(weight_kg: f64, ef_kg_per_kg: f64, packaging_g: f64, transport_g: f64) -> i64 {
    let base_g = weight_kg * ef_kg_per_kg * GRAMS_PER_KG;
    to_grams(base_g + packaging_g + transport_g)
}

/// Normalize a CO2 total into a 0-100 score between `best` (100) and `worst` (0).
///
/// When `worst - best < 1` the denominator is pinned to 1, so any distance
/// from `best` moves the score by 100 points per gram.
pub fn eco_score_from_co2(co2_grams: i64, best: f64, worst: f64) -> u8 {
    let ratio = (co2_grams as f64 - best) / (worst - best).max(1.0);
    round_half_up(100.0 * (1.0 - ratio)).clamp(0.0, 100.0) as u8
}

/// Short tier label for a score, e.g. "Very Good"
pub fn interpret_score(score: i64) -> &'static str {
    EcoTier::from_score(score).label()
}

pub fn compute_footprint(request: &FootprintRequest, bounds: Bounds) -> FootprintResult {
    let base_co2 = request.product_weight_kg * request.ef_kg_co2_per_kg * GRAMS_PER_KG;
    let total_co2 = to_grams(base_co2 + request.packaging_g + request.transport_g);
    let eco_score = eco_score_from_co2(total_co2, bounds.best_co2g, bounds.worst_co2g);

    FootprintResult {
        co2_grams: total_co2,
        eco_score,
        breakdown: Breakdown {
            base_co2: to_grams(base_co2),
            packaging_co2: request.packaging_g,
            transport_co2: request.transport_g,
            total_co2,
        },
    }
}

pub fn calculate_simple(request: &FootprintRequest) -> SimpleResult {
    SimpleResult {
        co2_grams: compute_co2_grams(
            request.product_weight_kg,
            request.ef_kg_co2_per_kg,
            request.packaging_g,
            request.transport_g,
        ),
    }
}
