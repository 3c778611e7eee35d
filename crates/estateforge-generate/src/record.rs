//! The listing data model and its CSV column contract.

use chrono::NaiveDate;

use crate::catalog::City;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
    Villa,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "Single Family",
            PropertyType::Condo => "Condo",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::MultiFamily => "Multi Family",
            PropertyType::Villa => "Villa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parking {
    Garage,
    Carport,
    Street,
    None,
}

impl Parking {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parking::Garage => "Garage",
            Parking::Carport => "Carport",
            Parking::Street => "Street",
            Parking::None => "None",
        }
    }
}

/// One synthetic property listing.
///
/// The five `Option` fields are the only ones the corruption stage may
/// overwrite; `None` renders as an empty CSV field.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub property_id: String,
    pub listing_date: NaiveDate,
    pub sale_date: NaiveDate,
    pub city: &'static City,
    pub latitude: f64,
    pub longitude: f64,
    pub property_type: PropertyType,
    pub bedrooms: u8,
    pub bathrooms: f64,
    pub area: f64,
    pub lot_size: Option<f64>,
    pub year_built: Option<i32>,
    pub age: f64,
    pub condition: Condition,
    pub price: f64,
    pub parking: Parking,
    pub has_pool: &'static str,
    pub has_fireplace: &'static str,
    pub stories: u8,
    pub garage_spaces: u8,
    pub hoa_fee: Option<f64>,
    pub days_on_market: f64,
    pub views: u32,
    pub school_rating: u8,
    pub walk_score: Option<f64>,
    pub description: Option<String>,
}

/// Declared value kind of a column, reported in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Float,
    Date,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

/// The 26 output columns, in binding order.
pub const COLUMNS: [ColumnSpec; 26] = [
    col("property_id", ColumnKind::Text),
    col("listing_date", ColumnKind::Date),
    col("sale_date", ColumnKind::Date),
    col("city", ColumnKind::Text),
    col("latitude", ColumnKind::Float),
    col("longitude", ColumnKind::Float),
    col("property_type", ColumnKind::Text),
    col("bedrooms", ColumnKind::Int),
    col("bathrooms", ColumnKind::Float),
    col("area", ColumnKind::Float),
    col("lot_size", ColumnKind::Float),
    col("year_built", ColumnKind::Int),
    col("age", ColumnKind::Float),
    col("condition", ColumnKind::Text),
    col("price", ColumnKind::Float),
    col("parking", ColumnKind::Text),
    col("has_pool", ColumnKind::Text),
    col("has_fireplace", ColumnKind::Text),
    col("stories", ColumnKind::Int),
    col("garage_spaces", ColumnKind::Int),
    col("hoa_fee", ColumnKind::Float),
    col("days_on_market", ColumnKind::Float),
    col("views", ColumnKind::Int),
    col("school_rating", ColumnKind::Int),
    col("walk_score", ColumnKind::Float),
    col("description", ColumnKind::Text),
];

impl ListingRecord {
    /// Render all 26 fields in `COLUMNS` order. Missing values render
    /// as empty strings, the CSV null convention.
    pub fn to_csv_record(&self) -> Vec<String> {
        vec![
            self.property_id.clone(),
            self.listing_date.format("%Y-%m-%d").to_string(),
            self.sale_date.format("%Y-%m-%d").to_string(),
            self.city.name.to_string(),
            format!("{:.6}", self.latitude),
            format!("{:.6}", self.longitude),
            self.property_type.as_str().to_string(),
            self.bedrooms.to_string(),
            format_half_integer(self.bathrooms),
            format!("{:.0}", self.area),
            render_opt(self.lot_size, |v| format!("{v:.2}")),
            self.year_built.map(|y| y.to_string()).unwrap_or_default(),
            format!("{:.0}", self.age),
            self.condition.as_str().to_string(),
            format!("{:.0}", self.price),
            self.parking.as_str().to_string(),
            self.has_pool.to_string(),
            self.has_fireplace.to_string(),
            self.stories.to_string(),
            self.garage_spaces.to_string(),
            render_opt(self.hoa_fee, |v| format!("{v:.2}")),
            format!("{:.0}", self.days_on_market),
            self.views.to_string(),
            self.school_rating.to_string(),
            render_opt(self.walk_score, |v| format!("{v:.1}")),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

fn render_opt(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_default()
}

/// Render half-integer bathroom counts without a trailing `.0`.
pub fn format_half_integer(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Currency formatting for the summary report: `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let whole = value.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
