use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::error::GenerationError;

/// Inclusive clamp range applied after sampling an unbounded distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: f64,
}

impl ClampRange {
    pub fn apply(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// All tunable parameters of the dataset pipeline.
///
/// `Default` reproduces the reference dataset literal for literal; the
/// struct exists so the scalars have names, not to invite per-run tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Rows to generate before duplicate injection.
    pub rows: usize,
    /// Seed for the single ChaCha8 stream driving the whole run.
    pub seed: u64,
    /// Destination of the CSV file.
    pub out_path: PathBuf,

    /// Earliest possible listing date.
    pub base_listing_date: NaiveDate,
    /// Listing dates fall within `[base, base + window)` days.
    pub listing_window_days: u32,
    /// Sale happens `[min, max)` days after listing.
    pub sale_gap_days: (u32, u32),

    /// Std-dev of the Normal jitter added to city base coordinates.
    pub coordinate_jitter_std: f64,

    // Gamma(shape, scale) draws for the skewed continuous fields.
    pub area_gamma: (f64, f64),
    /// Added to the raw area draw before clamping.
    pub area_offset: f64,
    pub area_clamp: ClampRange,
    pub lot_size_gamma: (f64, f64),
    pub lot_size_clamp: ClampRange,
    pub age_gamma: (f64, f64),
    pub age_clamp: ClampRange,
    /// `year_built = reference_year - round(age)`; fixed so runs do not
    /// depend on the wall clock.
    pub reference_year: i32,

    pub hoa_fee_gamma: (f64, f64),
    /// Flat uplift added to `hoa_fee` on Condo rows by the composer.
    pub condo_hoa_uplift: f64,
    /// Mean and std-dev of the days-on-market Normal (absolute value taken).
    pub days_on_market_normal: (f64, f64),
    pub views_poisson_lambda: f64,
    pub views_offset: u32,
    /// Beta(alpha, beta) scaled by 100 for walk scores.
    pub walk_score_beta: (f64, f64),

    pub price: PriceModel,

    /// Rows whose price gets a multiplicative outlier boost.
    pub outlier_rows: usize,
    /// Uniform `[min, max)` boost factor.
    pub outlier_factor: (f64, f64),
    /// Verbatim row copies appended after masking.
    pub duplicate_rows: usize,

    /// P(clear `hoa_fee`) on Single Family rows.
    pub missing_hoa_fee: f64,
    /// P(clear `year_built`) per row.
    pub missing_year_built: f64,
    /// P(clear `description`) per row.
    pub missing_description: f64,
    /// P(clear `walk_score`) per row.
    pub missing_walk_score: f64,

    /// Independent append probabilities for the two description suffixes.
    pub suffix_probabilities: [f64; 2],
}

/// Coefficients of the linear price formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceModel {
    pub base: f64,
    pub per_sqft: f64,
    pub per_bedroom: f64,
    pub per_bathroom: f64,
    pub per_lot_acre: f64,
    pub age_depreciation: f64,
    pub noise_std: f64,
    pub floor: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            rows: 300,
            seed: 42,
            out_path: PathBuf::from("real_estate_data.csv"),
            base_listing_date: NaiveDate::from_ymd_opt(2020, 1, 1)
                .expect("valid base date literal"),
            listing_window_days: 1460,
            sale_gap_days: (5, 180),
            coordinate_jitter_std: 0.1,
            area_gamma: (2.0, 500.0),
            area_offset: 500.0,
            area_clamp: ClampRange {
                min: 500.0,
                max: 5000.0,
            },
            lot_size_gamma: (1.5, 0.3),
            lot_size_clamp: ClampRange {
                min: 0.05,
                max: 3.0,
            },
            age_gamma: (3.0, 10.0),
            age_clamp: ClampRange {
                min: 0.0,
                max: 100.0,
            },
            reference_year: 2024,
            hoa_fee_gamma: (2.0, 100.0),
            condo_hoa_uplift: 200.0,
            days_on_market_normal: (45.0, 30.0),
            views_poisson_lambda: 100.0,
            views_offset: 20,
            walk_score_beta: (5.0, 2.0),
            price: PriceModel {
                base: 50_000.0,
                per_sqft: 150.0,
                per_bedroom: 30_000.0,
                per_bathroom: 20_000.0,
                per_lot_acre: 50_000.0,
                age_depreciation: 1_000.0,
                noise_std: 50_000.0,
                floor: 100_000.0,
            },
            outlier_rows: 15,
            outlier_factor: (2.0, 5.0),
            duplicate_rows: 6,
            missing_hoa_fee: 0.4,
            missing_year_built: 0.05,
            missing_description: 0.03,
            missing_walk_score: 0.10,
            suffix_probabilities: [0.3, 0.2],
        }
    }
}

impl DatasetConfig {
    /// Validate scalar parameters and the fixed catalog weight tables.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.rows == 0 {
            return Err(GenerationError::InvalidConfig(
                "rows must be at least 1".to_string(),
            ));
        }
        if self.outlier_rows > self.rows {
            return Err(GenerationError::InvalidConfig(format!(
                "outlier_rows ({}) exceeds rows ({})",
                self.outlier_rows, self.rows
            )));
        }
        if self.sale_gap_days.0 >= self.sale_gap_days.1 {
            return Err(GenerationError::InvalidConfig(
                "sale_gap_days must be an ascending half-open range".to_string(),
            ));
        }
        if self.listing_window_days == 0 {
            return Err(GenerationError::InvalidConfig(
                "listing_window_days must be positive".to_string(),
            ));
        }

        for (name, range) in [
            ("area_clamp", self.area_clamp),
            ("lot_size_clamp", self.lot_size_clamp),
            ("age_clamp", self.age_clamp),
        ] {
            if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must be a finite ascending range"
                )));
            }
        }

        for (name, (a, b)) in [
            ("area_gamma", self.area_gamma),
            ("lot_size_gamma", self.lot_size_gamma),
            ("age_gamma", self.age_gamma),
            ("hoa_fee_gamma", self.hoa_fee_gamma),
            ("walk_score_beta", self.walk_score_beta),
        ] {
            if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} parameters must be finite and positive"
                )));
            }
        }
        if !(self.views_poisson_lambda.is_finite() && self.views_poisson_lambda > 0.0) {
            return Err(GenerationError::InvalidConfig(
                "views_poisson_lambda must be finite and positive".to_string(),
            ));
        }
        if !(self.coordinate_jitter_std.is_finite() && self.coordinate_jitter_std >= 0.0) {
            return Err(GenerationError::InvalidConfig(
                "coordinate_jitter_std must be finite and non-negative".to_string(),
            ));
        }
        if !(self.days_on_market_normal.1.is_finite() && self.days_on_market_normal.1 >= 0.0) {
            return Err(GenerationError::InvalidConfig(
                "days_on_market std-dev must be finite and non-negative".to_string(),
            ));
        }
        if !(self.price.noise_std.is_finite() && self.price.noise_std >= 0.0) {
            return Err(GenerationError::InvalidConfig(
                "price noise_std must be finite and non-negative".to_string(),
            ));
        }
        if self.outlier_factor.0 >= self.outlier_factor.1 {
            return Err(GenerationError::InvalidConfig(
                "outlier_factor must be an ascending half-open range".to_string(),
            ));
        }

        for (name, p) in [
            ("missing_hoa_fee", self.missing_hoa_fee),
            ("missing_year_built", self.missing_year_built),
            ("missing_description", self.missing_description),
            ("missing_walk_score", self.missing_walk_score),
            ("suffix_probabilities[0]", self.suffix_probabilities[0]),
            ("suffix_probabilities[1]", self.suffix_probabilities[1]),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must be a probability in [0, 1], got {p}"
                )));
            }
        }

        catalog::validate_weight_tables()
    }
}
