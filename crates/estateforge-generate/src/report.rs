//! The run summary: a serializable report plus its stdout rendering.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::corrupt::CorruptionSummary;
use crate::record::{COLUMNS, ListingRecord, format_currency};

const PREVIEW_ROWS: usize = 5;

/// Diagnostic summary of one generation run. Serialized as JSON on
/// request; `render` produces the human-readable form. Never re-parsed.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub run_id: String,
    pub seed: u64,
    pub rows_requested: u64,
    pub rows_written: u64,
    pub columns: u64,
    pub listing_date_min: NaiveDate,
    pub listing_date_max: NaiveDate,
    pub distinct_cities: u64,
    pub distinct_property_types: u64,
    pub price_min: f64,
    pub price_max: f64,
    /// Missing-value tallies, only columns with at least one.
    pub missing_values: BTreeMap<String, u64>,
    pub injected_outliers: u64,
    /// Exact full-record duplicates beyond first occurrence, measured
    /// on the final table.
    pub duplicate_rows: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    /// First rows of the final table, CSV-rendered.
    pub preview: Vec<Vec<String>>,
}

impl DatasetReport {
    pub fn build(
        run_id: String,
        seed: u64,
        rows_requested: usize,
        records: &[ListingRecord],
        summary: &CorruptionSummary,
        bytes_written: u64,
        duration_ms: u64,
    ) -> Self {
        let listing_date_min = records
            .iter()
            .map(|r| r.listing_date)
            .min()
            .unwrap_or_default();
        let listing_date_max = records
            .iter()
            .map(|r| r.listing_date)
            .max()
            .unwrap_or_default();

        let cities: BTreeSet<&str> = records.iter().map(|r| r.city.name).collect();
        let property_types: BTreeSet<&str> =
            records.iter().map(|r| r.property_type.as_str()).collect();

        let price_min = records.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
        let price_max = records
            .iter()
            .map(|r| r.price)
            .fold(f64::NEG_INFINITY, f64::max);

        let missing_values = summary
            .masked
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(column, count)| (column.clone(), *count))
            .collect();

        let rendered: Vec<Vec<String>> = records.iter().map(|r| r.to_csv_record()).collect();
        let distinct: BTreeSet<&Vec<String>> = rendered.iter().collect();
        let duplicate_rows = (rendered.len() - distinct.len()) as u64;

        let preview = rendered.iter().take(PREVIEW_ROWS).cloned().collect();

        Self {
            run_id,
            seed,
            rows_requested: rows_requested as u64,
            rows_written: records.len() as u64,
            columns: COLUMNS.len() as u64,
            listing_date_min,
            listing_date_max,
            distinct_cities: cities.len() as u64,
            distinct_property_types: property_types.len() as u64,
            price_min,
            price_max,
            missing_values,
            injected_outliers: summary.outliers as u64,
            duplicate_rows,
            bytes_written,
            duration_ms,
            preview,
        }
    }

    /// Render the human-readable summary printed to stdout.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Dataset summary (run {})", self.run_id);
        let _ = writeln!(
            out,
            "  rows: {} written ({} requested), columns: {}",
            self.rows_written, self.rows_requested, self.columns
        );
        let _ = writeln!(
            out,
            "  listing dates: {} .. {}",
            self.listing_date_min.format("%Y-%m-%d"),
            self.listing_date_max.format("%Y-%m-%d")
        );
        let _ = writeln!(
            out,
            "  distinct cities: {}, distinct property types: {}",
            self.distinct_cities, self.distinct_property_types
        );
        let _ = writeln!(
            out,
            "  price range: {} .. {}",
            format_currency(self.price_min),
            format_currency(self.price_max)
        );
        if self.missing_values.is_empty() {
            let _ = writeln!(out, "  missing values: none");
        } else {
            let _ = writeln!(out, "  missing values:");
            for (column, count) in &self.missing_values {
                let _ = writeln!(out, "    {column}: {count}");
            }
        }
        let _ = writeln!(
            out,
            "  injected outliers: {}, duplicate rows: {}",
            self.injected_outliers, self.duplicate_rows
        );
        let _ = writeln!(
            out,
            "  output: {} bytes in {} ms",
            self.bytes_written, self.duration_ms
        );
        let _ = writeln!(out, "  first {} rows:", self.preview.len());
        for row in &self.preview {
            let _ = writeln!(out, "    {}", row.join(", "));
        }
        let _ = writeln!(out, "  columns and kinds:");
        for spec in &COLUMNS {
            let _ = writeln!(out, "    {}: {}", spec.name, spec.kind.as_str());
        }
        out
    }
}
