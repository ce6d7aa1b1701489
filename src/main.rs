//! EcoLedger CLI
//!
//! Product carbon footprint calculator with a local sustainability ledger.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, debug};
use rusqlite::Connection;
use serde::Serialize;

use ecoledger::calculator;
use ecoledger::ids;
use ecoledger::import;
use ecoledger::ledger::{self, CatalogRecording};
use ecoledger::units::{parse_mass_grams, parse_mass_kg};
use ecoledger::{Bounds, Catalog, Config, EcoTier, EmissionFactorTable, FootprintRequest};

#[derive(Parser)]
#[command(name = "ecoledger")]
#[command(about = "Product carbon footprint calculator and sustainability ledger")]
#[command(version)]
struct Cli {
    /// Path to the SQLite ledger database [default: ecoledger.db]
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an empty ledger database
    Init,

    /// List catalog products
    Products {
        /// Only show products of this category
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show a single catalog product
    Product {
        /// Catalog product ID
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// List emission factors (kg CO2e per kg)
    Factors {
        #[arg(long)]
        json: bool,
    },

    /// Calculate CO2 footprint and EcoScore
    Calc {
        /// Product weight (e.g. 500g, 0.5kg; bare numbers are kg)
        #[arg(short, long, value_parser = parse_mass_kg)]
        weight: f64,

        /// Emission factor in kg CO2e per kg
        #[arg(long, conflicts_with_all = ["category", "product"])]
        ef: Option<f64>,

        /// Take the emission factor from this material category
        #[arg(long, conflicts_with = "product")]
        category: Option<String>,

        /// Take emission factor and bounds from this catalog product
        #[arg(long)]
        product: Option<String>,

        /// Packaging overhead (bare numbers are grams CO2e)
        #[arg(long, default_value = "0", value_parser = parse_mass_grams)]
        packaging: f64,

        /// Transport overhead (bare numbers are grams CO2e)
        #[arg(long, default_value = "0", value_parser = parse_mass_grams)]
        transport: f64,

        /// CO2 grams that score 100
        #[arg(long)]
        best: Option<f64>,

        /// CO2 grams that score 0
        #[arg(long)]
        worst: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Interpret an EcoScore
    Interpret {
        #[arg(allow_negative_numbers = true)]
        score: i64,

        #[arg(long)]
        json: bool,
    },

    /// Calculate a catalog product's footprint and record it on the ledger
    Record {
        /// Wallet address recording the product
        #[arg(long)]
        wallet: String,

        /// Catalog product ID
        #[arg(long)]
        product: String,

        #[arg(short, long, value_parser = parse_mass_kg)]
        weight: f64,

        #[arg(long, default_value = "0", value_parser = parse_mass_grams)]
        packaging: f64,

        #[arg(long, default_value = "0", value_parser = parse_mass_grams)]
        transport: f64,

        /// Ledger product ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Derive the ledger ID from product name, category and wallet
        #[arg(long, conflicts_with = "id")]
        hash_id: bool,

        #[arg(long)]
        json: bool,
    },

    /// Update the recorded CO2 footprint of a ledger product
    Update {
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        id: String,

        /// New footprint in grams CO2e
        #[arg(long, allow_negative_numbers = true)]
        co2: i64,
    },

    /// Show products and totals for a wallet
    Wallet {
        address: String,

        #[arg(long)]
        json: bool,
    },

    /// Show ledger-wide totals
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Show the ledger event log
    Events,

    /// Record every batch file (*.json) found under a directory
    Import { dir: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn open_ledger(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    ledger::init_schema(&conn)?;
    debug!("opened ledger at {}", path.display());
    Ok(conn)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let db_path = config.database_path(cli.database.as_deref());

    let factors = EmissionFactorTable::builtin();
    let catalog = Catalog::builtin(&factors)?;

    match cli.command {
        Commands::Init => {
            open_ledger(&db_path)?;
            println!("Database initialized at: {}", db_path.display());
        }

        Commands::Products { category, json } => {
            let products: Vec<_> = match &category {
                Some(c) => catalog.by_category(c).collect(),
                None => catalog.all().iter().collect(),
            };
            if json {
                print_json(&products)?;
            } else if products.is_empty() {
                println!("No products in the catalog match.");
            } else {
                println!(
                    "{:<4} {:<30} {:<12} {:>8} {:>8} {:>8}",
                    "ID", "Product", "Category", "EF", "Best g", "Worst g"
                );
                println!("{}", "-".repeat(75));
                for p in products {
                    println!(
                        "{:<4} {:<30} {:<12} {:>8.2} {:>8.0} {:>8.0}",
                        p.id, p.name, p.category, p.ef, p.best_co2g, p.worst_co2g
                    );
                }
            }
        }

        Commands::Product { id, json } => {
            let p = catalog.get(&id)?;
            if json {
                print_json(p)?;
            } else {
                println!("Product: {}", p.name);
                println!("  ID: {}", p.id);
                println!("  Category: {}", p.category);
                println!("  Description: {}", p.description);
                println!("  Emission factor: {} kg CO2e/kg", p.ef);
                println!("  EcoScore bounds: {} g (best) .. {} g (worst)", p.best_co2g, p.worst_co2g);
            }
        }

        Commands::Factors { json } => {
            if json {
                let all: Vec<_> = factors.iter().collect();
                print_json(&all)?;
            } else {
                println!("{:<14} {:>10}  {}", "Material", "kg/kg", "Description");
                println!("{}", "-".repeat(50));
                for f in factors.iter() {
                    println!("{:<14} {:>10.2}  {}", f.category, f.kg_co2_per_kg, f.description);
                }
            }
        }

        Commands::Calc {
            weight,
            ef,
            category,
            product,
            packaging,
            transport,
            best,
            worst,
            json,
        } => {
            let (ef, source_bounds) = match (ef, category, product) {
                (Some(ef), _, _) => (ef, None),
                (None, Some(category), _) => (factors.get(&category)?.kg_co2_per_kg, None),
                (None, None, Some(id)) => {
                    let p = catalog.get(&id)?;
                    (p.ef, Some(p.bounds()))
                }
                (None, None, None) => bail!("one of --ef, --category or --product is required"),
            };
            let fallback = source_bounds.unwrap_or_else(|| config.default_bounds());
            let bounds = Bounds::new(
                best.unwrap_or(fallback.best_co2g),
                worst.unwrap_or(fallback.worst_co2g),
            );

            let request = FootprintRequest::new(weight, ef)
                .with_packaging(packaging)
                .with_transport(transport);
            request.validate()?;

            let result = calculator::compute_footprint(&request, bounds);
            if json {
                print_json(&result)?;
            } else {
                let tier = EcoTier::from_score(i64::from(result.eco_score));
                println!("CO2: {} g CO2e", result.co2_grams);
                println!("  Base:      {} g", result.breakdown.base_co2);
                println!("  Packaging: {} g", result.breakdown.packaging_co2);
                println!("  Transport: {} g", result.breakdown.transport_co2);
                println!("EcoScore: {}/100 ({})", result.eco_score, tier);
            }
        }

        Commands::Interpret { score, json } => {
            let tier = EcoTier::from_score(score);
            if json {
                print_json(&serde_json::json!({
                    "score": score,
                    "tier": tier.label(),
                    "interpretation": tier.to_string(),
                }))?;
            } else {
                println!("{}", tier);
            }
        }

        Commands::Record {
            wallet,
            product,
            weight,
            packaging,
            transport,
            id,
            hash_id,
            json,
        } => {
            let id = if hash_id {
                let p = catalog.get(&product)?;
                Some(ids::hash_based_id(&p.name, &p.category, Some(&wallet), ids::now_millis()))
            } else {
                id
            };

            let conn = open_ledger(&db_path)?;
            let item = CatalogRecording {
                catalog_id: product,
                weight_kg: weight,
                packaging_g: packaging,
                transport_g: transport,
                product_id: id,
            };
            let (recorded, footprint) = ledger::record_catalog_item(&conn, &catalog, &wallet, &item)?;
            if json {
                print_json(&recorded)?;
            } else {
                println!(
                    "Recorded {} ({}) for {}",
                    recorded.product_id,
                    recorded.name,
                    ids::human_address(&recorded.wallet, 6, 4)
                );
                println!(
                    "  {} g CO2e, EcoScore {}/100 ({})",
                    footprint.co2_grams,
                    footprint.eco_score,
                    EcoTier::from_score(i64::from(footprint.eco_score))
                );
            }
        }

        Commands::Update { wallet, id, co2 } => {
            let conn = open_ledger(&db_path)?;
            let updated = ledger::update_product_co2(&conn, &wallet, &id, co2)?;
            println!("Updated {} to {} g CO2e", updated.product_id, updated.co2_footprint);
        }

        Commands::Wallet { address, json } => {
            let conn = open_ledger(&db_path)?;
            let products = ledger::wallet_products(&conn, &address)?;
            let stats = ledger::wallet_stats(&conn, &address)?;
            if json {
                print_json(&serde_json::json!({
                    "wallet": address,
                    "products": products,
                    "stats": stats,
                }))?;
            } else {
                println!("Wallet {}", ids::human_address(&address, 6, 4));
                if products.is_empty() {
                    println!("  No products recorded.");
                }
                for p in &products {
                    let score = p
                        .eco_score
                        .map(|s| format!("{}/100", s))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {:<28} {:<30} {:>8} g  {:>7}",
                        p.product_id, p.name, p.co2_footprint, score
                    );
                }
                println!();
                println!("  Products: {}", stats.total_products);
                println!("  Total:    {} g CO2e", stats.total_co2_footprint);
                println!("  Average:  {} g CO2e", stats.average_co2_per_product);
            }
        }

        Commands::Stats { json } => {
            let conn = open_ledger(&db_path)?;
            let stats = ledger::global_stats(&conn)?;
            if json {
                print_json(&stats)?;
            } else {
                println!("=== Ledger Summary ===");
                println!("Wallets:  {}", stats.total_wallets);
                println!("Products: {}", stats.total_products);
                println!("Total:    {} g CO2e", stats.total_co2_footprint);
            }
        }

        Commands::Events => {
            let conn = open_ledger(&db_path)?;
            let events = ledger::events(&conn)?;
            if events.is_empty() {
                println!("No ledger events yet. Run 'record' or 'import' first.");
            }
            for e in events {
                println!(
                    "#{:<4} {:<18} {:<28} {:>8} g  {}",
                    e.seq,
                    e.kind.as_str(),
                    e.product_id,
                    e.co2_footprint,
                    ids::human_address(&e.wallet, 6, 4)
                );
            }
        }

        Commands::Import { dir } => {
            let conn = open_ledger(&db_path)?;
            let stats = import::import_batches(&conn, &catalog, &dir)?;
            println!("{}", stats);
        }
    }

    Ok(())
}
