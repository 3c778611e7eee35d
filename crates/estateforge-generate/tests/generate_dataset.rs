use std::fs;
use std::path::PathBuf;

use estateforge_generate::{COLUMNS, DatasetConfig, GenerationEngine, GenerationResult};

fn temp_out_path(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("estateforge_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir.join("real_estate_data.csv")
}

fn run_with(label: &str, seed: u64) -> GenerationResult {
    let mut config = DatasetConfig::default();
    config.seed = seed;
    config.out_path = temp_out_path(label);
    GenerationEngine::new(config).run().expect("run generation")
}

#[test]
fn default_run_produces_the_documented_shape() {
    let result = run_with("shape", 42);
    let contents = fs::read_to_string(&result.out_path).expect("read csv");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(contents.as_bytes());
    let header = reader.headers().expect("header").clone();
    let expected: Vec<&str> = COLUMNS.iter().map(|spec| spec.name).collect();
    assert_eq!(header.iter().collect::<Vec<_>>(), expected);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("parse rows");
    assert_eq!(rows.len(), 306, "300 generated + 6 duplicates");
    for row in &rows {
        assert_eq!(row.len(), 26);
    }

    assert_eq!(result.report.rows_written, 306);
    assert_eq!(result.report.columns, 26);
    assert_eq!(result.report.injected_outliers, 15);
}

#[test]
fn missing_values_hit_exactly_the_maskable_columns() {
    let result = run_with("missing", 42);
    let mut columns: Vec<&str> = result
        .report
        .missing_values
        .keys()
        .map(String::as_str)
        .collect();
    columns.sort_unstable();
    assert_eq!(
        columns,
        vec!["description", "hoa_fee", "lot_size", "walk_score", "year_built"]
    );
    for count in result.report.missing_values.values() {
        assert!(*count > 0);
    }
}

#[test]
fn duplicated_rows_are_byte_identical_to_their_source() {
    let result = run_with("duplicates", 42);
    let contents = fs::read_to_string(&result.out_path).expect("read csv");
    let data_lines: Vec<&str> = contents.lines().skip(1).collect();
    let mut distinct = data_lines.clone();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(data_lines.len() - distinct.len(), 6);
    assert_eq!(result.report.duplicate_rows, 6);
}

#[test]
fn structural_invariants_hold_on_every_row() {
    let result = run_with("invariants", 1234);
    for record in &result.records {
        let gap = (record.sale_date - record.listing_date).num_days();
        assert!(record.sale_date >= record.listing_date);
        assert!((5..180).contains(&gap), "sale gap {gap}");

        assert!((500.0..=5000.0).contains(&record.area));
        if let Some(lot) = record.lot_size {
            assert!((0.05..=3.0).contains(&lot));
        }
        assert!((0.0..=100.0).contains(&record.age));
        assert!(record.price >= 100_000.0);
        if let Some(score) = record.walk_score {
            assert!((0.0..=100.0).contains(&score));
        }
    }
}

#[test]
fn same_seed_reproduces_the_output_byte_for_byte() {
    let result_a = run_with("determinism_a", 42);
    let result_b = run_with("determinism_b", 42);
    let csv_a = fs::read(&result_a.out_path).expect("read csv A");
    let csv_b = fs::read(&result_b.out_path).expect("read csv B");
    assert_eq!(csv_a, csv_b, "output should be deterministic under a fixed seed");
}

#[test]
fn changing_the_seed_changes_the_data_but_not_the_shape() {
    let result_a = run_with("reseed_a", 42);
    let result_b = run_with("reseed_b", 43);
    let csv_a = fs::read_to_string(&result_a.out_path).expect("read csv A");
    let csv_b = fs::read_to_string(&result_b.out_path).expect("read csv B");
    assert_ne!(csv_a, csv_b);

    assert_eq!(result_b.report.rows_written, 306);
    assert_eq!(result_b.report.columns, 26);
    for record in &result_b.records {
        assert!(record.price >= 100_000.0);
        assert!(record.sale_date >= record.listing_date);
    }
}

#[test]
fn successful_write_leaves_no_temp_file() {
    let result = run_with("atomic", 7);
    assert!(result.out_path.exists());
    let tmp = result.out_path.with_file_name("real_estate_data.csv.tmp");
    assert!(!tmp.exists(), "temp file should be renamed away");
}
