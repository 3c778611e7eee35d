//! Stage 3: corruption — outliers, missingness masks, duplicates, shuffle.
//!
//! Masking overwrites a field with `None` and is never reversed. The
//! Bernoulli masks draw once per row for every row, then apply
//! conditionally, so the stream consumption does not depend on the data.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::{Bernoulli, Distribution};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::DatasetConfig;
use crate::error::GenerationError;
use crate::record::{ListingRecord, PropertyType};

/// What the corruption stage did, for the report and logs.
#[derive(Debug, Clone, Serialize)]
pub struct CorruptionSummary {
    /// Rows whose price received the outlier boost.
    pub outliers: usize,
    /// Values cleared per column (zero entries included).
    pub masked: BTreeMap<String, u64>,
    /// Verbatim row copies appended.
    pub duplicates: usize,
}

pub fn apply(
    config: &DatasetConfig,
    records: &mut Vec<ListingRecord>,
    rng: &mut ChaCha8Rng,
) -> Result<CorruptionSummary, GenerationError> {
    let outlier_indices = rand::seq::index::sample(rng, records.len(), config.outlier_rows);
    let (factor_min, factor_max) = config.outlier_factor;
    for index in outlier_indices.iter() {
        let factor = rng.random_range(factor_min..factor_max);
        records[index].price *= factor;
    }

    let mut masked = BTreeMap::new();

    let mut lot_cleared = 0_u64;
    for record in records.iter_mut() {
        if record.property_type == PropertyType::Condo {
            record.lot_size = None;
            lot_cleared += 1;
        }
    }
    masked.insert("lot_size".to_string(), lot_cleared);

    let hoa_mask = bernoulli("missing_hoa_fee", config.missing_hoa_fee)?;
    let mut hoa_cleared = 0_u64;
    for record in records.iter_mut() {
        let clear = hoa_mask.sample(rng);
        if clear && record.property_type == PropertyType::SingleFamily {
            record.hoa_fee = None;
            hoa_cleared += 1;
        }
    }
    masked.insert("hoa_fee".to_string(), hoa_cleared);

    let year_mask = bernoulli("missing_year_built", config.missing_year_built)?;
    let mut year_cleared = 0_u64;
    for record in records.iter_mut() {
        if year_mask.sample(rng) {
            record.year_built = None;
            year_cleared += 1;
        }
    }
    masked.insert("year_built".to_string(), year_cleared);

    let description_mask = bernoulli("missing_description", config.missing_description)?;
    let mut description_cleared = 0_u64;
    for record in records.iter_mut() {
        if description_mask.sample(rng) {
            record.description = None;
            description_cleared += 1;
        }
    }
    masked.insert("description".to_string(), description_cleared);

    let walk_mask = bernoulli("missing_walk_score", config.missing_walk_score)?;
    let mut walk_cleared = 0_u64;
    for record in records.iter_mut() {
        if walk_mask.sample(rng) {
            record.walk_score = None;
            walk_cleared += 1;
        }
    }
    masked.insert("walk_score".to_string(), walk_cleared);

    // Sources are drawn with replacement across the table as it stood
    // before any copy was appended.
    let source_rows = records.len();
    for _ in 0..config.duplicate_rows {
        let index = rng.random_range(0..source_rows);
        records.push(records[index].clone());
    }

    records.shuffle(rng);

    Ok(CorruptionSummary {
        outliers: config.outlier_rows,
        masked,
        duplicates: config.duplicate_rows,
    })
}

fn bernoulli(name: &str, p: f64) -> Result<Bernoulli, GenerationError> {
    Bernoulli::new(p).map_err(|err| GenerationError::InvalidConfig(format!("{name}: {err}")))
}
