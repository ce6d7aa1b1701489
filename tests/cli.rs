use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn bin_path() -> PathBuf {
    std::env::var("CARGO_BIN_EXE_ecoledger")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("target")
                .join("debug")
                .join(if cfg!(windows) { "ecoledger.exe" } else { "ecoledger" })
        })
}

fn run_cmd(db: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .arg("--database")
        .arg(db)
        .args(args)
        .output()
        .expect("run ecoledger command")
}

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("output should be valid JSON")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn calc_plastic_bottle_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(&db, &["calc", "--weight", "500g", "--ef", "6.0", "--json"]);
    assert!(output.status.success(), "calc should exit 0, got {:?}", output.status);

    let json = parse_json(&output.stdout);
    assert_eq!(json["co2Grams"], 3000);
    assert_eq!(json["ecoScore"], 0);
    assert_eq!(json["breakdown"]["baseCo2"], 3000);
    assert_eq!(json["breakdown"]["totalCo2"], 3000);
}

#[test]
fn calc_with_catalog_product_uses_its_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    // Bamboo cutlery set: 10 g * 0.5 kg/kg = 5 g, bounds 2..10
    let output = run_cmd(&db, &["calc", "--weight", "10g", "--product", "1", "--json"]);
    assert!(output.status.success());
    let json = parse_json(&output.stdout);
    assert_eq!(json["co2Grams"], 5);
    assert_eq!(json["ecoScore"], 63);
}

#[test]
fn calc_unknown_category_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(&db, &["calc", "--weight", "1", "--category", "unobtainium"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unobtainium"), "stderr: {}", stderr);
}

#[test]
fn calc_rejects_negative_weight() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(&db, &["calc", "--weight=-1kg", "--ef", "6"]);
    assert!(!output.status.success());
}

#[test]
fn interpret_prints_tier() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(&db, &["interpret", "85"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Very Good - Highly sustainable");

    let output = run_cmd(&db, &["interpret", "45", "--json"]);
    let json = parse_json(&output.stdout);
    assert_eq!(json["tier"], "Below Average");
}

#[test]
fn products_json_lists_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(&db, &["products", "--json"]);
    assert!(output.status.success());
    let json = parse_json(&output.stdout);
    let products = json.as_array().expect("array of products");
    assert_eq!(products.len(), 16);
    assert_eq!(products[6]["name"], "Concrete Building Block");
    assert_eq!(products[6]["ef"], 0.13);
}

#[test]
fn record_update_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(
        &db,
        &[
            "record", "--wallet", "0xAAAA", "--product", "9", "--weight", "20g", "--id",
            "BOTTLE-1", "--json",
        ],
    );
    assert!(output.status.success(), "record failed: {}", String::from_utf8_lossy(&output.stderr));
    let json = parse_json(&output.stdout);
    assert_eq!(json["productId"], "BOTTLE-1");
    assert_eq!(json["co2Footprint"], 120);

    let dup = run_cmd(
        &db,
        &["record", "--wallet", "0xbbbb", "--product", "9", "--weight", "20g", "--id", "BOTTLE-1"],
    );
    assert!(!dup.status.success());

    let denied = run_cmd(&db, &["update", "--wallet", "0xbbbb", "--id", "BOTTLE-1", "--co2", "90"]);
    assert!(!denied.status.success());

    let updated = run_cmd(&db, &["update", "--wallet", "0xaaaa", "--id", "BOTTLE-1", "--co2", "90"]);
    assert!(updated.status.success());

    let stats = parse_json(&run_cmd(&db, &["stats", "--json"]).stdout);
    assert_eq!(stats["totalWallets"], 1);
    assert_eq!(stats["totalProducts"], 1);
    assert_eq!(stats["totalCo2Footprint"], 90);

    let events = stdout(&run_cmd(&db, &["events"]));
    assert!(events.contains("ProductRegistered"));
    assert!(events.contains("ProductUpdated"));
}

#[test]
fn import_directory() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");
    let batches = dir.path().join("batches");
    std::fs::create_dir(&batches).unwrap();
    std::fs::write(
        batches.join("day1.json"),
        r#"{"wallet": "0xcafe", "entries": [
            {"catalogId": "7", "weight": "1kg", "productId": "BLOCK-1"},
            {"catalogId": "2", "weight": "0.1kg"}
        ]}"#,
    )
    .unwrap();

    let output = run_cmd(&db, &["import", batches.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Imported 2 products from 1 files"));

    let wallet = parse_json(&run_cmd(&db, &["wallet", "0xCAFE", "--json"]).stdout);
    assert_eq!(wallet["stats"]["totalProducts"], 2);
    assert_eq!(wallet["stats"]["totalCo2Footprint"], 130 + 80);
    assert_eq!(wallet["products"][0]["productId"], "BLOCK-1");
}

#[test]
fn record_rejects_negative_overhead_and_huge_weight() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let negative = run_cmd(
        &db,
        &["record", "--wallet", "0xaaaa", "--product", "9", "--weight", "1kg", "--packaging=-5900g"],
    );
    assert!(!negative.status.success());

    let huge = run_cmd(&db, &["record", "--wallet", "0xaaaa", "--product", "9", "--weight", "1e300kg"]);
    assert!(!huge.status.success());

    let stats = parse_json(&run_cmd(&db, &["stats", "--json"]).stdout);
    assert_eq!(stats["totalProducts"], 0);
}

#[test]
fn record_with_hash_id() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");

    let output = run_cmd(
        &db,
        &["record", "--wallet", "0xaaaa", "--product", "3", "--weight", "300g", "--hash-id", "--json"],
    );
    assert!(output.status.success(), "record failed: {}", String::from_utf8_lossy(&output.stderr));
    let json = parse_json(&output.stdout);
    let id = json["productId"].as_str().expect("product id string");
    assert!(id.starts_with("HASH_"), "unexpected id {}", id);

    let clash = run_cmd(
        &db,
        &["record", "--wallet", "0xaaaa", "--product", "3", "--weight", "300g", "--hash-id", "--id", "X"],
    );
    assert!(!clash.status.success());
}
