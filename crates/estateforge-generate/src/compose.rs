//! Stage 2: assembly and same-row cross-field derivations.
//!
//! `assemble` zips the generator columns into records after checking
//! every column carries exactly N values. `derive` then fills the
//! dependent fields: the condo HOA uplift, `year_built`, the price
//! model, and the description text. Derivations read only the row they
//! write; nothing crosses rows.

use rand::Rng;
use rand::distr::{Bernoulli, Distribution};
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;

use crate::catalog::{DESCRIPTION_TEMPLATES, SUFFIX_CLAUSES, city_premium, property_type_bonus};
use crate::config::DatasetConfig;
use crate::error::GenerationError;
use crate::fields::BaseColumns;
use crate::record::{ListingRecord, PropertyType, format_half_integer};

pub fn assemble(
    config: &DatasetConfig,
    columns: BaseColumns,
) -> Result<Vec<ListingRecord>, GenerationError> {
    let n = config.rows;
    check_len("property_id", columns.property_ids.len(), n)?;
    check_len("listing_date", columns.listing_dates.len(), n)?;
    check_len("sale_date", columns.sale_dates.len(), n)?;
    check_len("city", columns.cities.len(), n)?;
    check_len("latitude", columns.latitudes.len(), n)?;
    check_len("longitude", columns.longitudes.len(), n)?;
    check_len("property_type", columns.property_types.len(), n)?;
    check_len("bedrooms", columns.bedrooms.len(), n)?;
    check_len("bathrooms", columns.bathrooms.len(), n)?;
    check_len("area", columns.areas.len(), n)?;
    check_len("lot_size", columns.lot_sizes.len(), n)?;
    check_len("age", columns.ages.len(), n)?;
    check_len("condition", columns.conditions.len(), n)?;
    check_len("parking", columns.parking.len(), n)?;
    check_len("has_pool", columns.pool_flags.len(), n)?;
    check_len("has_fireplace", columns.fireplace_flags.len(), n)?;
    check_len("stories", columns.stories.len(), n)?;
    check_len("garage_spaces", columns.garage_spaces.len(), n)?;
    check_len("hoa_fee", columns.hoa_fees.len(), n)?;
    check_len("days_on_market", columns.days_on_market.len(), n)?;
    check_len("views", columns.views.len(), n)?;
    check_len("school_rating", columns.school_ratings.len(), n)?;
    check_len("walk_score", columns.walk_scores.len(), n)?;

    let mut records = Vec::with_capacity(n);
    let mut ids = columns.property_ids.into_iter();
    for i in 0..n {
        records.push(ListingRecord {
            property_id: ids.next().expect("checked length"),
            listing_date: columns.listing_dates[i],
            sale_date: columns.sale_dates[i],
            city: columns.cities[i],
            latitude: columns.latitudes[i],
            longitude: columns.longitudes[i],
            property_type: columns.property_types[i],
            bedrooms: columns.bedrooms[i],
            bathrooms: columns.bathrooms[i],
            area: columns.areas[i],
            lot_size: Some(columns.lot_sizes[i]),
            // Filled by `derive`.
            year_built: None,
            age: columns.ages[i],
            condition: columns.conditions[i],
            price: 0.0,
            parking: columns.parking[i],
            has_pool: columns.pool_flags[i],
            has_fireplace: columns.fireplace_flags[i],
            stories: columns.stories[i],
            garage_spaces: columns.garage_spaces[i],
            hoa_fee: Some(columns.hoa_fees[i]),
            days_on_market: columns.days_on_market[i],
            views: columns.views[i],
            school_rating: columns.school_ratings[i],
            walk_score: Some(columns.walk_scores[i]),
            description: None,
        });
    }
    Ok(records)
}

fn check_len(
    column: &'static str,
    actual: usize,
    expected: usize,
) -> Result<(), GenerationError> {
    if actual == expected {
        Ok(())
    } else {
        Err(GenerationError::ColumnLength {
            column,
            expected,
            actual,
        })
    }
}

/// Fill the dependent fields. Draw order: one price noise draw per row
/// for all rows, then per row one template pick and two suffix flips.
pub fn derive(
    config: &DatasetConfig,
    records: &mut [ListingRecord],
    rng: &mut ChaCha8Rng,
) -> Result<(), GenerationError> {
    for record in records.iter_mut() {
        if record.property_type == PropertyType::Condo {
            record.hoa_fee = record.hoa_fee.map(|fee| fee + config.condo_hoa_uplift);
        }
        record.year_built = Some(config.reference_year - record.age.round() as i32);
    }

    let noise = Normal::new(0.0, config.price.noise_std)
        .map_err(|err| GenerationError::InvalidConfig(format!("price noise: {err}")))?;
    for record in records.iter_mut() {
        record.price = price_for(config, record, noise.sample(rng));
    }

    let suffixes: Vec<(&str, Bernoulli)> = SUFFIX_CLAUSES
        .iter()
        .zip(config.suffix_probabilities)
        .map(|(clause, p)| {
            Bernoulli::new(p)
                .map(|dist| (*clause, dist))
                .map_err(|err| GenerationError::InvalidConfig(format!("suffix flip: {err}")))
        })
        .collect::<Result<_, _>>()?;
    for record in records.iter_mut() {
        let template = DESCRIPTION_TEMPLATES[rng.random_range(0..DESCRIPTION_TEMPLATES.len())];
        let mut text = substitute(template, record)?;
        for (clause, dist) in &suffixes {
            if dist.sample(rng) {
                text.push(' ');
                text.push_str(clause);
            }
        }
        record.description = Some(text);
    }

    Ok(())
}

fn price_for(config: &DatasetConfig, record: &ListingRecord, noise: f64) -> f64 {
    let model = &config.price;
    let raw = model.base
        + record.area * model.per_sqft
        + f64::from(record.bedrooms) * model.per_bedroom
        + record.bathrooms * model.per_bathroom
        + record.lot_size.unwrap_or(0.0) * model.per_lot_acre
        + property_type_bonus(record.property_type)
        + city_premium(record.city.name)
        - record.age * model.age_depreciation
        + noise;
    raw.max(model.floor)
}

/// Substitute `{placeholder}` markers with the row's own field values.
/// An unrecognized or unterminated placeholder aborts the run.
fn substitute(template: &str, record: &ListingRecord) -> Result<String, GenerationError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let close = tail
            .find('}')
            .ok_or_else(|| GenerationError::UnknownPlaceholder(tail.to_string()))?;
        out.push_str(&placeholder_value(&tail[..close], record)?);
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn placeholder_value(name: &str, record: &ListingRecord) -> Result<String, GenerationError> {
    match name {
        "condition" => Ok(record.condition.as_str().to_lowercase()),
        "property_type" => Ok(record.property_type.as_str().to_lowercase()),
        "bedrooms" => Ok(record.bedrooms.to_string()),
        "bathrooms" => Ok(format_half_integer(record.bathrooms)),
        "city" => Ok(record.city.name.to_string()),
        other => Err(GenerationError::UnknownPlaceholder(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::CITIES;
    use crate::fields;
    use crate::record::{Condition, Parking};

    fn record_in(city_index: usize) -> ListingRecord {
        ListingRecord {
            property_id: "PROP_0001".to_string(),
            listing_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            sale_date: NaiveDate::from_ymd_opt(2022, 2, 1).unwrap(),
            city: &CITIES[city_index],
            latitude: 0.0,
            longitude: 0.0,
            property_type: PropertyType::Townhouse,
            bedrooms: 3,
            bathrooms: 2.5,
            area: 1500.0,
            lot_size: Some(0.2),
            year_built: None,
            age: 10.0,
            condition: Condition::Good,
            price: 0.0,
            parking: Parking::Garage,
            has_pool: "False",
            has_fireplace: "No",
            stories: 2,
            garage_spaces: 2,
            hoa_fee: Some(150.0),
            days_on_market: 30.0,
            views: 100,
            school_rating: 6,
            walk_score: Some(70.0),
            description: None,
        }
    }

    #[test]
    fn substitution_uses_the_rows_own_values() {
        let record = record_in(2);
        let text = substitute(
            "A {condition} {property_type} with {bedrooms} beds and {bathrooms} baths in {city}.",
            &record,
        )
        .expect("substitute");
        assert_eq!(text, "A good townhouse with 3 beds and 2.5 baths in Chicago.");
    }

    #[test]
    fn fixed_templates_render_against_a_row() {
        use crate::catalog::DESCRIPTION_TEMPLATES;
        let record = record_in(2);
        let text = substitute(DESCRIPTION_TEMPLATES[0], &record).expect("substitute");
        assert_eq!(
            text,
            "Beautiful good townhouse with 3 bedrooms in Chicago. Spacious living area."
        );
        let text = substitute(DESCRIPTION_TEMPLATES[2], &record).expect("substitute");
        assert_eq!(
            text,
            "Stunning good property with modern amenities. 3BR/2.5BA in prime Chicago area."
        );
    }

    #[test]
    fn unknown_placeholder_fails_loudly() {
        let record = record_in(0);
        let err = substitute("A {floor_plan} home.", &record).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnknownPlaceholder(ref name) if name == "floor_plan"
        ));
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let record = record_in(0);
        assert!(substitute("A {bedrooms bed home.", &record).is_err());
    }

    #[test]
    fn price_is_floored() {
        let config = DatasetConfig::default();
        let mut record = record_in(5);
        record.area = 500.0;
        record.bedrooms = 1;
        record.bathrooms = 1.0;
        record.lot_size = Some(0.05);
        record.age = 100.0;
        let price = price_for(&config, &record, -500_000.0);
        assert_eq!(price, config.price.floor);
    }

    #[test]
    fn unlisted_city_contributes_no_premium() {
        static UNLISTED: crate::catalog::City = crate::catalog::City {
            name: "San Francisco",
            latitude: 37.7749,
            longitude: -122.4194,
        };
        let config = DatasetConfig::default();
        let mut record = record_in(0);
        record.city = &UNLISTED;
        let without = price_for(&config, &record, 0.0);
        record.city = &CITIES[0];
        let with = price_for(&config, &record, 0.0);
        assert!((with - without - 200_000.0).abs() < 1e-6);
    }

    #[test]
    fn derive_uplifts_condo_hoa_and_fills_year_built() {
        let mut config = DatasetConfig::default();
        config.rows = 120;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(config.seed);
        let columns = fields::generate(&config, &mut rng).expect("columns");
        let mut records = assemble(&config, columns).expect("assemble");
        let base_hoa: Vec<f64> = records.iter().map(|r| r.hoa_fee.unwrap()).collect();

        derive(&config, &mut records, &mut rng).expect("derive");

        for (record, base) in records.iter().zip(base_hoa) {
            let fee = record.hoa_fee.expect("hoa present before corruption");
            if record.property_type == PropertyType::Condo {
                assert_eq!(fee, base + config.condo_hoa_uplift);
            } else {
                assert_eq!(fee, base);
            }
            let expected_year = config.reference_year - record.age.round() as i32;
            assert_eq!(record.year_built, Some(expected_year));
            assert!(record.price >= config.price.floor);
            assert!(record.description.is_some());
        }
    }

    #[test]
    fn assemble_rejects_short_columns() {
        let mut config = DatasetConfig::default();
        config.rows = 10;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let mut columns = fields::generate(&config, &mut rng).expect("columns");
        columns.areas.pop();
        let err = assemble(&config, columns).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ColumnLength {
                column: "area",
                expected: 10,
                actual: 9,
            }
        ));
    }
}
