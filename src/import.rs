//! Batch import of catalog recordings from JSON files
//!
//! Each `*.json` file under the import directory holds one batch:
//!
//! ```json
//! { "wallet": "0xabc...", "entries": [
//!     { "catalogId": "9", "weight": "500g", "packaging": "12g", "productId": "BOTTLE-1" }
//! ] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rusqlite::Connection;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::error::{EcoError, Result};
use crate::ledger::{self, CatalogRecording};
use crate::units;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatch {
    pub wallet: String,
    pub entries: Vec<ImportEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub catalog_id: String,
    pub weight: String,
    pub packaging: Option<String>,
    pub transport: Option<String>,
    pub product_id: Option<String>,
}

impl ImportEntry {
    fn to_recording(&self) -> Result<CatalogRecording> {
        let grams = |q: &Option<String>| -> Result<f64> {
            match q {
                Some(q) => units::parse_mass_grams(q),
                None => Ok(0.0),
            }
        };
        Ok(CatalogRecording {
            catalog_id: self.catalog_id.clone(),
            weight_kg: units::parse_mass_kg(&self.weight)?,
            packaging_g: grams(&self.packaging)?,
            transport_g: grams(&self.transport)?,
            product_id: self.product_id.clone(),
        })
    }
}

/// Find all batch files under `dir`, sorted by path
pub fn find_batch_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EcoError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("import directory not found: {}", dir.display()),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn read_batch(path: &Path) -> Result<ImportBatch> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Record every entry of every batch file under `dir`
pub fn import_batches(conn: &Connection, catalog: &Catalog, dir: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    let files = find_batch_files(dir)?;
    info!("found {} batch files in {}", files.len(), dir.display());

    for path in &files {
        let batch = match read_batch(path) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                stats.errors += 1;
                continue;
            }
        };
        stats.files += 1;

        for entry in &batch.entries {
            let outcome = entry
                .to_recording()
                .and_then(|item| ledger::record_catalog_item(conn, catalog, &batch.wallet, &item));

            match outcome {
                Ok((product, footprint)) => {
                    info!(
                        "  recorded {} ({} g CO2e, EcoScore {})",
                        product.product_id, footprint.co2_grams, footprint.eco_score
                    );
                    stats.add_recorded(footprint.co2_grams);
                }
                Err(EcoError::DuplicateProduct(id)) => {
                    info!("  {} already recorded, skipping", id);
                    stats.skipped += 1;
                }
                Err(e) => {
                    warn!("  entry {} in {}: {}", entry.catalog_id, path.display(), e);
                    stats.errors += 1;
                }
            }
        }
    }

    Ok(stats)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub files: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total_co2_grams: i64,
}

impl ImportStats {
    fn add_recorded(&mut self, co2_grams: i64) {
        self.recorded += 1;
        self.total_co2_grams = self.total_co2_grams.saturating_add(co2_grams);
    }
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} products from {} files ({} g CO2e). Skipped: {}, Errors: {}",
            self.recorded, self.files, self.total_co2_grams, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::EmissionFactorTable;

    fn setup() -> (Connection, Catalog) {
        let conn = Connection::open_in_memory().unwrap();
        ledger::init_schema(&conn).unwrap();
        let catalog = Catalog::builtin(&EmissionFactorTable::builtin()).unwrap();
        (conn, catalog)
    }

    #[test]
    fn imports_nested_batches_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"wallet": "0xaaaa", "entries": [
                {"catalogId": "9", "weight": "20g", "productId": "A-1"},
                {"catalogId": "7", "weight": "1kg", "packaging": "10", "productId": "A-2"}
            ]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("nested/b.json"),
            r#"{"wallet": "0xbbbb", "entries": [
                {"catalogId": "9", "weight": "20g", "productId": "A-1"}
            ]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a batch").unwrap();

        let (conn, catalog) = setup();
        let stats = import_batches(&conn, &catalog, dir.path()).unwrap();

        assert_eq!(stats.files, 2);
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.total_co2_grams, 120 + 140);
        assert_eq!(ledger::global_stats(&conn).unwrap().total_products, 2);
    }

    #[test]
    fn bad_entries_and_files_count_as_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(
            dir.path().join("mixed.json"),
            r#"{"wallet": "0xcccc", "entries": [
                {"catalogId": "99", "weight": "1kg"},
                {"catalogId": "1", "weight": "heavy"},
                {"catalogId": "2", "weight": "0.1kg", "productId": "OK-1"}
            ]}"#,
        )
        .unwrap();

        let (conn, catalog) = setup();
        let stats = import_batches(&conn, &catalog, dir.path()).unwrap();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.recorded, 1);
        assert_eq!(stats.errors, 3);
    }

    #[test]
    fn negative_overheads_and_huge_weights_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{"wallet": "0xdddd", "entries": [
                {"catalogId": "9", "weight": "1kg", "packaging": "-5900g"},
                {"catalogId": "9", "weight": "1e300kg"},
                {"catalogId": "9", "weight": "1e300kg"}
            ]}"#,
        )
        .unwrap();

        let (conn, catalog) = setup();
        let stats = import_batches(&conn, &catalog, dir.path()).unwrap();
        assert_eq!(stats.recorded, 0);
        assert_eq!(stats.errors, 3);
        assert_eq!(stats.total_co2_grams, 0);
        assert_eq!(ledger::global_stats(&conn).unwrap().total_products, 0);
    }

    #[test]
    fn summary_total_saturates() {
        let mut stats = ImportStats {
            total_co2_grams: i64::MAX - 1,
            ..ImportStats::default()
        };
        stats.add_recorded(10);
        assert_eq!(stats.total_co2_grams, i64::MAX);
        assert_eq!(stats.recorded, 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let (conn, catalog) = setup();
        let result = import_batches(&conn, &catalog, Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(EcoError::Io(_))));
    }
}
