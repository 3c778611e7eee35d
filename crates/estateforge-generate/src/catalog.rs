//! Fixed value catalogs: cities, premiums, categorical tables, templates.
//!
//! Everything here is reference data, not configuration. The weight
//! tables are validated once per run by `DatasetConfig::validate`.

use crate::error::GenerationError;
use crate::record::{Condition, Parking, PropertyType};

/// A sampled city with its base coordinate.
#[derive(Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const CITIES: [City; 10] = [
    City {
        name: "New York",
        latitude: 40.7128,
        longitude: -74.0060,
    },
    City {
        name: "Los Angeles",
        latitude: 34.0522,
        longitude: -118.2437,
    },
    City {
        name: "Chicago",
        latitude: 41.8781,
        longitude: -87.6298,
    },
    City {
        name: "Houston",
        latitude: 29.7604,
        longitude: -95.3698,
    },
    City {
        name: "Phoenix",
        latitude: 33.4484,
        longitude: -112.0740,
    },
    City {
        name: "Philadelphia",
        latitude: 39.9526,
        longitude: -75.1652,
    },
    City {
        name: "San Antonio",
        latitude: 29.4241,
        longitude: -98.4936,
    },
    City {
        name: "San Diego",
        latitude: 32.7157,
        longitude: -117.1611,
    },
    City {
        name: "Dallas",
        latitude: 32.7767,
        longitude: -96.7970,
    },
    City {
        name: "Austin",
        latitude: 30.2672,
        longitude: -97.7431,
    },
];

/// Price premiums by city. Cities absent here contribute zero premium;
/// a miss is never an error.
pub const CITY_PREMIUMS: [(&str, f64); 10] = [
    ("New York", 200_000.0),
    ("Los Angeles", 180_000.0),
    ("Chicago", 50_000.0),
    ("Houston", 30_000.0),
    ("Phoenix", 40_000.0),
    ("Philadelphia", 60_000.0),
    ("San Antonio", 20_000.0),
    ("San Diego", 150_000.0),
    ("Dallas", 45_000.0),
    ("Austin", 80_000.0),
];

pub fn city_premium(city: &str) -> f64 {
    CITY_PREMIUMS
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, premium)| *premium)
        .unwrap_or(0.0)
}

/// Fixed price bonus by property type.
pub fn property_type_bonus(property_type: PropertyType) -> f64 {
    match property_type {
        PropertyType::SingleFamily => 50_000.0,
        PropertyType::Villa => 100_000.0,
        _ => 0.0,
    }
}

pub const PROPERTY_TYPE_WEIGHTS: [(PropertyType, f64); 5] = [
    (PropertyType::SingleFamily, 0.40),
    (PropertyType::Condo, 0.25),
    (PropertyType::Townhouse, 0.15),
    (PropertyType::MultiFamily, 0.10),
    (PropertyType::Villa, 0.10),
];

pub const BEDROOM_WEIGHTS: [(u8, f64); 6] = [
    (1, 0.10),
    (2, 0.20),
    (3, 0.35),
    (4, 0.25),
    (5, 0.08),
    (6, 0.02),
];

pub const BATHROOM_WEIGHTS: [(f64, f64); 7] = [
    (1.0, 0.15),
    (1.5, 0.15),
    (2.0, 0.30),
    (2.5, 0.20),
    (3.0, 0.12),
    (3.5, 0.05),
    (4.0, 0.03),
];

pub const CONDITION_WEIGHTS: [(Condition, f64); 4] = [
    (Condition::Excellent, 0.20),
    (Condition::Good, 0.50),
    (Condition::Fair, 0.25),
    (Condition::Poor, 0.05),
];

pub const PARKING_WEIGHTS: [(Parking, f64); 4] = [
    (Parking::Garage, 0.50),
    (Parking::Carport, 0.20),
    (Parking::Street, 0.20),
    (Parking::None, 0.10),
];

// Boolean-like string categories, kept as the source data spells them.
pub const POOL_WEIGHTS: [(&str, f64); 2] = [("True", 0.30), ("False", 0.70)];
pub const FIREPLACE_WEIGHTS: [(&str, f64); 2] = [("Yes", 0.40), ("No", 0.60)];

pub const STORY_WEIGHTS: [(u8, f64); 3] = [(1, 0.4), (2, 0.5), (3, 0.1)];

pub const GARAGE_SPACE_WEIGHTS: [(u8, f64); 4] =
    [(0, 0.2), (1, 0.3), (2, 0.4), (3, 0.1)];

pub const SCHOOL_RATING_WEIGHTS: [(u8, f64); 10] = [
    (1, 0.05),
    (2, 0.05),
    (3, 0.10),
    (4, 0.15),
    (5, 0.15),
    (6, 0.15),
    (7, 0.15),
    (8, 0.10),
    (9, 0.05),
    (10, 0.05),
];

/// Description templates. Placeholders are substituted with the row's
/// own field values; an unrecognized placeholder aborts the run.
pub const DESCRIPTION_TEMPLATES: [&str; 5] = [
    "Beautiful {condition} {property_type} with {bedrooms} bedrooms in {city}. Spacious living area.",
    "Charming {property_type} featuring {bathrooms} bathrooms. Great location in {city}!",
    "Stunning {condition} property with modern amenities. {bedrooms}BR/{bathrooms}BA in prime {city} area.",
    "Lovely {property_type} home, well-maintained and move-in ready. Located in {city}.",
    "Spacious {bedrooms} bedroom {property_type}. Perfect for families! {city} location.",
];

/// Suffix clauses appended by independent Bernoulli flips, paired with
/// `DatasetConfig::suffix_probabilities` by index.
pub const SUFFIX_CLAUSES: [&str; 2] = [
    "Updated kitchen and appliances.",
    "Close to schools and shopping.",
];

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn check_weight_sum(name: &str, weights: &[f64]) -> Result<(), GenerationError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(GenerationError::InvalidConfig(format!(
            "{name} weights must be finite and non-negative"
        )));
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(GenerationError::InvalidConfig(format!(
            "{name} weights must sum to 1.0, got {total}"
        )));
    }
    Ok(())
}

/// Check every categorical weight table sums to ~1.0.
pub fn validate_weight_tables() -> Result<(), GenerationError> {
    fn weights<T>(table: &[(T, f64)]) -> Vec<f64> {
        table.iter().map(|(_, w)| *w).collect()
    }

    check_weight_sum("property_type", &weights(&PROPERTY_TYPE_WEIGHTS))?;
    check_weight_sum("bedrooms", &weights(&BEDROOM_WEIGHTS))?;
    check_weight_sum("bathrooms", &weights(&BATHROOM_WEIGHTS))?;
    check_weight_sum("condition", &weights(&CONDITION_WEIGHTS))?;
    check_weight_sum("parking", &weights(&PARKING_WEIGHTS))?;
    check_weight_sum("has_pool", &weights(&POOL_WEIGHTS))?;
    check_weight_sum("has_fireplace", &weights(&FIREPLACE_WEIGHTS))?;
    check_weight_sum("stories", &weights(&STORY_WEIGHTS))?;
    check_weight_sum("garage_spaces", &weights(&GARAGE_SPACE_WEIGHTS))?;
    check_weight_sum("school_rating", &weights(&SCHOOL_RATING_WEIGHTS))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_tables_sum_to_one() {
        validate_weight_tables().expect("catalog weights");
    }

    #[test]
    fn premium_table_carries_the_fixed_amounts() {
        let expected = [
            ("New York", 200_000.0),
            ("Los Angeles", 180_000.0),
            ("Chicago", 50_000.0),
            ("Houston", 30_000.0),
            ("Phoenix", 40_000.0),
            ("Philadelphia", 60_000.0),
            ("San Antonio", 20_000.0),
            ("San Diego", 150_000.0),
            ("Dallas", 45_000.0),
            ("Austin", 80_000.0),
        ];
        for (city, premium) in expected {
            assert_eq!(city_premium(city), premium, "premium for {city}");
        }
    }

    #[test]
    fn every_sampled_city_has_a_premium() {
        for city in &CITIES {
            assert!(city_premium(city.name) > 0.0, "{} has no premium", city.name);
        }
    }

    #[test]
    fn premium_lookup_defaults_to_zero_for_unlisted_cities() {
        assert_eq!(city_premium("San Francisco"), 0.0);
        assert_eq!(city_premium("Boston"), 0.0);
    }

    #[test]
    fn templates_only_use_known_placeholders() {
        let known = ["condition", "property_type", "bedrooms", "bathrooms", "city"];
        for template in DESCRIPTION_TEMPLATES {
            let mut rest = template;
            while let Some(open) = rest.find('{') {
                let tail = &rest[open + 1..];
                let close = tail.find('}').expect("closed placeholder");
                assert!(known.contains(&&tail[..close]), "placeholder in {template}");
                rest = &tail[close + 1..];
            }
        }
    }

    #[test]
    fn every_city_has_a_distinct_name() {
        let mut names: Vec<_> = CITIES.iter().map(|city| city.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CITIES.len());
    }
}
