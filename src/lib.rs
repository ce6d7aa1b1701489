//! EcoLedger
//!
//! Carbon footprint calculation for catalog products, EcoScore
//! normalization, and a local ledger of recorded products.

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod factors;
pub mod ids;
pub mod import;
pub mod ledger;
pub mod models;
pub mod tier;
pub mod units;

pub use calculator::{
    calculate_simple, compute_co2_grams, compute_footprint, eco_score_from_co2, interpret_score,
};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{EcoError, Result};
pub use factors::EmissionFactorTable;
pub use models::{
    Bounds, Breakdown, EmissionFactor, FootprintRequest, FootprintResult, GlobalStats,
    LedgerEvent, LedgerEventKind, LedgerProduct, ProductRecord, Registration, SimpleResult,
    WalletStats,
};
pub use tier::EcoTier;
