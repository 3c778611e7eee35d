//! Stage 1: independent column-major field generators.
//!
//! Every generator fills one column with exactly `config.rows` values
//! drawn from the shared ChaCha8 stream and reads no other column. The
//! column order below is part of the reproducibility contract: changing
//! it changes every downstream draw.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Beta, Distribution, Gamma, Normal, Poisson};

use crate::catalog::{
    BATHROOM_WEIGHTS, BEDROOM_WEIGHTS, CITIES, CONDITION_WEIGHTS, City, FIREPLACE_WEIGHTS,
    GARAGE_SPACE_WEIGHTS, PARKING_WEIGHTS, POOL_WEIGHTS, PROPERTY_TYPE_WEIGHTS,
    SCHOOL_RATING_WEIGHTS, STORY_WEIGHTS,
};
use crate::config::DatasetConfig;
use crate::error::GenerationError;
use crate::record::{Condition, Parking, PropertyType};

/// Per-column output of the generator stage, one `Vec` per base field.
/// `lot_size` and `hoa_fee` are plain values here; the corruption stage
/// introduces missingness later.
#[derive(Debug)]
pub struct BaseColumns {
    pub property_ids: Vec<String>,
    pub listing_dates: Vec<NaiveDate>,
    pub sale_dates: Vec<NaiveDate>,
    pub cities: Vec<&'static City>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub property_types: Vec<PropertyType>,
    pub bedrooms: Vec<u8>,
    pub bathrooms: Vec<f64>,
    pub areas: Vec<f64>,
    pub lot_sizes: Vec<f64>,
    pub ages: Vec<f64>,
    pub conditions: Vec<Condition>,
    pub parking: Vec<Parking>,
    pub pool_flags: Vec<&'static str>,
    pub fireplace_flags: Vec<&'static str>,
    pub stories: Vec<u8>,
    pub garage_spaces: Vec<u8>,
    pub hoa_fees: Vec<f64>,
    pub days_on_market: Vec<f64>,
    pub views: Vec<u32>,
    pub school_ratings: Vec<u8>,
    pub walk_scores: Vec<f64>,
}

pub fn generate(
    config: &DatasetConfig,
    rng: &mut ChaCha8Rng,
) -> Result<BaseColumns, GenerationError> {
    let n = config.rows;

    // Sequential ids consume no draws.
    let property_ids = (1..=n).map(|i| format!("PROP_{i:04}")).collect();

    let listing_dates: Vec<NaiveDate> = (0..n)
        .map(|_| {
            let offset = rng.random_range(0..config.listing_window_days);
            config.base_listing_date + Duration::days(i64::from(offset))
        })
        .collect();

    let (gap_min, gap_max) = config.sale_gap_days;
    let sale_dates = listing_dates
        .iter()
        .map(|listed| {
            let gap = rng.random_range(gap_min..gap_max);
            *listed + Duration::days(i64::from(gap))
        })
        .collect();

    let cities: Vec<&'static City> = (0..n)
        .map(|_| &CITIES[rng.random_range(0..CITIES.len())])
        .collect();

    // Latitude then longitude per row; cities stay fixed, only the
    // jitter varies.
    let jitter = normal("coordinate jitter", 0.0, config.coordinate_jitter_std)?;
    let mut latitudes = Vec::with_capacity(n);
    let mut longitudes = Vec::with_capacity(n);
    for city in &cities {
        latitudes.push(city.latitude + jitter.sample(rng));
        longitudes.push(city.longitude + jitter.sample(rng));
    }

    let property_types = sample_weighted(rng, n, "property_type", &PROPERTY_TYPE_WEIGHTS)?;
    let bedrooms = sample_weighted(rng, n, "bedrooms", &BEDROOM_WEIGHTS)?;
    let bathrooms = sample_weighted(rng, n, "bathrooms", &BATHROOM_WEIGHTS)?;

    let area_dist = gamma("area", config.area_gamma)?;
    let areas = (0..n)
        .map(|_| config.area_clamp.apply(area_dist.sample(rng) + config.area_offset))
        .collect();

    let lot_dist = gamma("lot_size", config.lot_size_gamma)?;
    let lot_sizes = (0..n)
        .map(|_| config.lot_size_clamp.apply(lot_dist.sample(rng)))
        .collect();

    let age_dist = gamma("age", config.age_gamma)?;
    let ages = (0..n)
        .map(|_| config.age_clamp.apply(age_dist.sample(rng)))
        .collect();

    let conditions = sample_weighted(rng, n, "condition", &CONDITION_WEIGHTS)?;
    let parking = sample_weighted(rng, n, "parking", &PARKING_WEIGHTS)?;
    let pool_flags = sample_weighted(rng, n, "has_pool", &POOL_WEIGHTS)?;
    let fireplace_flags = sample_weighted(rng, n, "has_fireplace", &FIREPLACE_WEIGHTS)?;
    let stories = sample_weighted(rng, n, "stories", &STORY_WEIGHTS)?;
    let garage_spaces = sample_weighted(rng, n, "garage_spaces", &GARAGE_SPACE_WEIGHTS)?;

    let hoa_dist = gamma("hoa_fee", config.hoa_fee_gamma)?;
    let hoa_fees = (0..n).map(|_| hoa_dist.sample(rng)).collect();

    let (dom_mean, dom_std) = config.days_on_market_normal;
    let dom_dist = normal("days_on_market", dom_mean, dom_std)?;
    let days_on_market = (0..n).map(|_| dom_dist.sample(rng).abs()).collect();

    let views_dist = Poisson::new(config.views_poisson_lambda)
        .map_err(|err| GenerationError::InvalidConfig(format!("views poisson: {err}")))?;
    let views = (0..n)
        .map(|_| views_dist.sample(rng) as u32 + config.views_offset)
        .collect();

    let school_ratings = sample_weighted(rng, n, "school_rating", &SCHOOL_RATING_WEIGHTS)?;

    let (alpha, beta) = config.walk_score_beta;
    let walk_dist = Beta::new(alpha, beta)
        .map_err(|err| GenerationError::InvalidConfig(format!("walk_score beta: {err}")))?;
    let walk_scores = (0..n).map(|_| walk_dist.sample(rng) * 100.0).collect();

    Ok(BaseColumns {
        property_ids,
        listing_dates,
        sale_dates,
        cities,
        latitudes,
        longitudes,
        property_types,
        bedrooms,
        bathrooms,
        areas,
        lot_sizes,
        ages,
        conditions,
        parking,
        pool_flags,
        fireplace_flags,
        stories,
        garage_spaces,
        hoa_fees,
        days_on_market,
        views,
        school_ratings,
        walk_scores,
    })
}

fn sample_weighted<T: Copy>(
    rng: &mut ChaCha8Rng,
    n: usize,
    column: &str,
    table: &[(T, f64)],
) -> Result<Vec<T>, GenerationError> {
    let index = WeightedIndex::new(table.iter().map(|(_, weight)| *weight))
        .map_err(|err| GenerationError::InvalidConfig(format!("{column} weights: {err}")))?;
    Ok((0..n).map(|_| table[index.sample(rng)].0).collect())
}

fn gamma(column: &str, (shape, scale): (f64, f64)) -> Result<Gamma<f64>, GenerationError> {
    Gamma::new(shape, scale)
        .map_err(|err| GenerationError::InvalidConfig(format!("{column} gamma: {err}")))
}

fn normal(column: &str, mean: f64, std_dev: f64) -> Result<Normal<f64>, GenerationError> {
    Normal::new(mean, std_dev)
        .map_err(|err| GenerationError::InvalidConfig(format!("{column} normal: {err}")))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn columns_for(rows: usize, seed: u64) -> BaseColumns {
        let mut config = DatasetConfig::default();
        config.rows = rows;
        config.seed = seed;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(&config, &mut rng).expect("generate columns")
    }

    #[test]
    fn every_column_has_n_values() {
        let columns = columns_for(64, 7);
        assert_eq!(columns.property_ids.len(), 64);
        assert_eq!(columns.listing_dates.len(), 64);
        assert_eq!(columns.sale_dates.len(), 64);
        assert_eq!(columns.cities.len(), 64);
        assert_eq!(columns.latitudes.len(), 64);
        assert_eq!(columns.longitudes.len(), 64);
        assert_eq!(columns.walk_scores.len(), 64);
    }

    #[test]
    fn ids_are_sequential_and_zero_padded() {
        let columns = columns_for(3, 1);
        assert_eq!(
            columns.property_ids,
            vec!["PROP_0001", "PROP_0002", "PROP_0003"]
        );
    }

    #[test]
    fn sale_gap_stays_in_range() {
        let columns = columns_for(200, 11);
        for (listed, sold) in columns.listing_dates.iter().zip(&columns.sale_dates) {
            let gap = (*sold - *listed).num_days();
            assert!((5..180).contains(&gap), "gap {gap} out of range");
        }
    }

    #[test]
    fn continuous_fields_saturate_at_clamp_bounds() {
        let columns = columns_for(500, 3);
        for area in &columns.areas {
            assert!((500.0..=5000.0).contains(area));
        }
        for lot in &columns.lot_sizes {
            assert!((0.05..=3.0).contains(lot));
        }
        for age in &columns.ages {
            assert!((0.0..=100.0).contains(age));
        }
        for score in &columns.walk_scores {
            assert!((0.0..=100.0).contains(score));
        }
        for dom in &columns.days_on_market {
            assert!(*dom >= 0.0);
        }
    }

    #[test]
    fn same_seed_same_columns() {
        let a = columns_for(50, 42);
        let b = columns_for(50, 42);
        assert_eq!(a.listing_dates, b.listing_dates);
        assert_eq!(a.areas, b.areas);
        assert_eq!(a.walk_scores, b.walk_scores);
    }
}
