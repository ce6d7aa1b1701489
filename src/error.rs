//! Error types for the ecoledger library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcoError {
    #[error("Unknown emission factor category: {0}")]
    UnknownCategory(String),

    #[error("Unknown catalog product: {0}")]
    UnknownProduct(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid quantity '{0}' (expected e.g. 500g, 0.5kg, 250mg, 1t)")]
    InvalidQuantity(String),

    #[error("Product {0} cannot be empty")]
    EmptyField(&'static str),

    #[error("CO2 footprint must be greater than 0")]
    NonPositiveCo2,

    #[error("Product ID already exists: {0}")]
    DuplicateProduct(String),

    #[error("Product does not exist: {0}")]
    ProductNotFound(String),

    #[error("Only the registering wallet can update product {0}")]
    NotOwner(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl EcoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        EcoError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EcoError>;
