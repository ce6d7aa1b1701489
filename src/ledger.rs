//! Local product ledger backed by SQLite
//!
//! Products are registered by a wallet address, may only be updated by that
//! wallet, and every mutation is appended to an event log.

use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::calculator;
use crate::catalog::Catalog;
use crate::error::{EcoError, Result};
use crate::ids;
use crate::models::{
    FootprintRequest, FootprintResult, GlobalStats, LedgerEvent, LedgerEventKind, LedgerProduct,
    Registration, WalletStats,
};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Registered products, one row per product id
        CREATE TABLE IF NOT EXISTS ledger_products (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            co2_footprint INTEGER NOT NULL,
            eco_score INTEGER,
            catalog_id TEXT,
            wallet TEXT NOT NULL,
            registered_at INTEGER NOT NULL
        );

        -- Append-only mutation log
        CREATE TABLE IF NOT EXISTS ledger_events (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            product_id TEXT NOT NULL,
            name TEXT NOT NULL,
            co2_footprint INTEGER NOT NULL,
            wallet TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ledger_products_wallet ON ledger_products(wallet);
        CREATE INDEX IF NOT EXISTS idx_ledger_events_product ON ledger_events(product_id);
        "#,
    )?;
    Ok(())
}

fn normalize_wallet(wallet: &str) -> String {
    wallet.trim().to_ascii_lowercase()
}

fn unix_seconds() -> i64 {
    (ids::now_millis() / 1000) as i64
}

const PRODUCT_COLUMNS: &str =
    "product_id, name, category, co2_footprint, eco_score, catalog_id, wallet, registered_at";

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<LedgerProduct> {
    Ok(LedgerProduct {
        product_id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        co2_footprint: row.get(3)?,
        eco_score: row.get(4)?,
        catalog_id: row.get(5)?,
        wallet: row.get(6)?,
        registered_at: row.get(7)?,
    })
}

fn append_event(
    conn: &Connection,
    kind: LedgerEventKind,
    product: &LedgerProduct,
) -> Result<()> {
    conn.execute(
        "INSERT INTO ledger_events (kind, product_id, name, co2_footprint, wallet)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            kind.as_str(),
            &product.product_id,
            &product.name,
            product.co2_footprint,
            &product.wallet,
        ),
    )?;
    debug!("event {} for {}", kind.as_str(), product.product_id);
    Ok(())
}

/// Largest footprint a single ledger row may hold (1 Gt CO2e).
///
/// Keeps SQLite `SUM` over a wallet or the whole ledger inside `i64`.
pub const MAX_CO2_FOOTPRINT_G: i64 = 1_000_000_000_000_000;

fn check_co2(co2_footprint: i64) -> Result<()> {
    if co2_footprint <= 0 {
        return Err(EcoError::NonPositiveCo2);
    }
    if co2_footprint > MAX_CO2_FOOTPRINT_G {
        return Err(EcoError::invalid_input(format!(
            "CO2 footprint {} g exceeds the ledger limit of {} g",
            co2_footprint, MAX_CO2_FOOTPRINT_G
        )));
    }
    Ok(())
}

fn validate_registration(wallet: &str, reg: &Registration) -> Result<()> {
    if reg.product_id.is_empty() {
        return Err(EcoError::EmptyField("ID"));
    }
    if reg.name.is_empty() {
        return Err(EcoError::EmptyField("name"));
    }
    if reg.category.is_empty() {
        return Err(EcoError::EmptyField("category"));
    }
    check_co2(reg.co2_footprint)?;
    if wallet.trim().is_empty() {
        return Err(EcoError::EmptyField("wallet"));
    }
    Ok(())
}

/// Register a product under `wallet`
pub fn register_product(conn: &Connection, wallet: &str, reg: &Registration) -> Result<LedgerProduct> {
    validate_registration(wallet, reg)?;

    if product_exists(conn, &reg.product_id)? {
        return Err(EcoError::DuplicateProduct(reg.product_id.clone()));
    }

    let product = LedgerProduct {
        product_id: reg.product_id.clone(),
        name: reg.name.clone(),
        category: reg.category.clone(),
        co2_footprint: reg.co2_footprint,
        eco_score: reg.eco_score,
        catalog_id: reg.catalog_id.clone(),
        wallet: normalize_wallet(wallet),
        registered_at: unix_seconds(),
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO ledger_products (product_id, name, category, co2_footprint, eco_score, catalog_id, wallet, registered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            &product.product_id,
            &product.name,
            &product.category,
            product.co2_footprint,
            product.eco_score,
            &product.catalog_id,
            &product.wallet,
            product.registered_at,
        ),
    )?;
    append_event(&tx, LedgerEventKind::ProductRegistered, &product)?;
    tx.commit()?;

    info!(
        "registered {} ({}, {} g CO2e) for {}",
        product.product_id, product.name, product.co2_footprint, product.wallet
    );
    Ok(product)
}

/// Change the recorded footprint; only the registering wallet may do this
pub fn update_product_co2(
    conn: &Connection,
    wallet: &str,
    product_id: &str,
    co2_footprint: i64,
) -> Result<LedgerProduct> {
    let mut product =
        get_product(conn, product_id)?.ok_or_else(|| EcoError::ProductNotFound(product_id.to_string()))?;

    check_co2(co2_footprint)?;
    if product.wallet != normalize_wallet(wallet) {
        return Err(EcoError::NotOwner(product_id.to_string()));
    }

    product.co2_footprint = co2_footprint;
    // A manual update no longer matches the calculated score
    product.eco_score = None;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE ledger_products SET co2_footprint = ?1, eco_score = NULL WHERE product_id = ?2",
        (co2_footprint, product_id),
    )?;
    append_event(&tx, LedgerEventKind::ProductUpdated, &product)?;
    tx.commit()?;

    info!("updated {} to {} g CO2e", product_id, co2_footprint);
    Ok(product)
}

pub fn get_product(conn: &Connection, product_id: &str) -> Result<Option<LedgerProduct>> {
    let sql = format!(
        "SELECT {} FROM ledger_products WHERE product_id = ?1",
        PRODUCT_COLUMNS
    );
    let product = conn
        .query_row(&sql, [product_id], product_from_row)
        .optional()?;
    Ok(product)
}

pub fn product_exists(conn: &Connection, product_id: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM ledger_products WHERE product_id = ?1)",
        [product_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Products registered by a wallet, oldest first
pub fn wallet_products(conn: &Connection, wallet: &str) -> Result<Vec<LedgerProduct>> {
    let sql = format!(
        "SELECT {} FROM ledger_products WHERE wallet = ?1 ORDER BY seq",
        PRODUCT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([normalize_wallet(wallet)], product_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn wallet_stats(conn: &Connection, wallet: &str) -> Result<WalletStats> {
    let (total_products, total_co2_footprint): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(co2_footprint), 0) FROM ledger_products WHERE wallet = ?1",
        [normalize_wallet(wallet)],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let average_co2_per_product = if total_products > 0 {
        total_co2_footprint / total_products
    } else {
        0
    };

    Ok(WalletStats {
        total_products: total_products as u64,
        total_co2_footprint,
        average_co2_per_product,
    })
}

pub fn global_stats(conn: &Connection) -> Result<GlobalStats> {
    let (total_wallets, total_products, total_co2_footprint): (i64, i64, i64) = conn.query_row(
        "SELECT COUNT(DISTINCT wallet), COUNT(*), COALESCE(SUM(co2_footprint), 0) FROM ledger_products",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    Ok(GlobalStats {
        total_wallets: total_wallets as u64,
        total_products: total_products as u64,
        total_co2_footprint,
    })
}

/// All ledger events in the order they happened
pub fn events(conn: &Connection) -> Result<Vec<LedgerEvent>> {
    let mut stmt = conn.prepare(
        "SELECT seq, kind, product_id, name, co2_footprint, wallet FROM ledger_events ORDER BY seq",
    )?;

    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(1)?;
        let kind = LedgerEventKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                format!("unknown event kind '{}'", kind).into(),
            )
        })?;
        Ok(LedgerEvent {
            seq: row.get(0)?,
            kind,
            product_id: row.get(2)?,
            name: row.get(3)?,
            co2_footprint: row.get(4)?,
            wallet: row.get(5)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// A catalog item to calculate and record in one step
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecording {
    pub catalog_id: String,
    pub weight_kg: f64,
    pub packaging_g: f64,
    pub transport_g: f64,
    /// Generated from the clock and wallet when absent
    pub product_id: Option<String>,
}

fn next_seq(conn: &Connection) -> Result<u32> {
    let seq: i64 = conn.query_row(
        "SELECT COALESCE(MAX(seq), 0) + 1 FROM ledger_products",
        [],
        |row| row.get(0),
    )?;
    Ok(seq as u32)
}

/// Calculate a catalog product's footprint and register it under `wallet`
pub fn record_catalog_item(
    conn: &Connection,
    catalog: &Catalog,
    wallet: &str,
    item: &CatalogRecording,
) -> Result<(LedgerProduct, FootprintResult)> {
    let record = catalog.get(&item.catalog_id)?;
    let request = FootprintRequest::new(item.weight_kg, record.ef)
        .with_packaging(item.packaging_g)
        .with_transport(item.transport_g);
    request.validate()?;

    // Check before rounding: the integer conversion saturates instead of failing
    let unrounded = request.product_weight_kg * request.ef_kg_co2_per_kg * 1000.0
        + request.packaging_g
        + request.transport_g;
    if !(unrounded <= MAX_CO2_FOOTPRINT_G as f64) {
        return Err(EcoError::invalid_input(format!(
            "footprint of {} g CO2e exceeds the ledger limit of {} g",
            unrounded, MAX_CO2_FOOTPRINT_G
        )));
    }
    let footprint = calculator::compute_footprint(&request, record.bounds());

    let product_id = match &item.product_id {
        Some(id) => id.clone(),
        None => ids::product_id(ids::now_millis(), next_seq(conn)?, Some(wallet.trim())),
    };

    let registration = Registration {
        product_id,
        name: record.name.clone(),
        category: record.category.clone(),
        co2_footprint: footprint.co2_grams,
        eco_score: Some(footprint.eco_score),
        catalog_id: Some(record.id.clone()),
    };

    let product = register_product(conn, wallet, &registration)?;
    Ok((product, footprint))
}
