use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the wide emissions table (`Country, Gas Type, Industry, 2010, 2011, …`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    /// Country, continent, or Asian subregion. Trimmed on load.
    pub region: String,
    pub gas_type: String,
    pub industry: String,
    /// Year -> cell. `None` means the cell was empty or not a number.
    pub year_values: BTreeMap<i32, Option<f64>>,
}

impl RawRecord {
    pub fn new(
        region: impl Into<String>,
        gas_type: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            gas_type: gas_type.into(),
            industry: industry.into(),
            year_values: BTreeMap::new(),
        }
    }

    /// Builder-style setter, handy for synthetic tables.
    pub fn with_value(mut self, year: i32, value: f64) -> Self {
        self.year_values.insert(year, Some(value));
        self
    }

    /// Numeric value for `year`. Missing, unparsable and non-finite cells count as 0.
    pub fn value_at(&self, year: i32) -> f64 {
        match self.year_values.get(&year) {
            Some(Some(v)) if v.is_finite() => *v,
            _ => 0.0,
        }
    }
}

/// Parse a table cell. Empty strings and non-numbers are missing.
pub fn parse_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Serde helper: read a numeric cell leniently, treating blanks and junk as 0.
fn de_f64_lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_cell(&raw).filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// One row of the long-form industry table (`Industry, Year, Emissions`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndustryRecord {
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Emissions", deserialize_with = "de_f64_lenient")]
    pub emissions: f64,
}

/// Tidy structure used for export (one row = one observation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LongRow {
    pub region: String,
    pub gas_type: String,
    pub industry: String,
    pub year: i32,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One line of a line chart: an entity and its values in year order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub entity: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points.iter().find(|p| p.year == year).map(|p| p.value)
    }
}

/// One piece of a stacked bar (or radial bar): `value` spans `start..end` in its stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub group: String,
    pub subgroup: String,
    pub value: f64,
    pub start: f64,
    pub end: f64,
    /// `None` when the stack sums several years.
    pub year: Option<i32>,
}

/// One cell of the industry x region heatmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatCell {
    pub row: String,
    pub column: String,
    pub value: f64,
}

/// One bar of the industry bar race.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceBar {
    pub industry: String,
    pub value: f64,
}

/// Grouping key used in stats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub region: String,
    pub gas_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_parse_leniently() {
        assert_eq!(parse_cell(" 12.5 "), Some(12.5));
        assert_eq!(parse_cell(""), None);
        assert_eq!(parse_cell("n/a"), None);
    }

    #[test]
    fn value_at_coerces_missing_and_nan() {
        let mut r = RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 3.0);
        r.year_values.insert(2021, None);
        r.year_values.insert(2022, Some(f64::NAN));
        assert_eq!(r.value_at(2020), 3.0);
        assert_eq!(r.value_at(2021), 0.0);
        assert_eq!(r.value_at(2022), 0.0);
        assert_eq!(r.value_at(1999), 0.0);
    }
}
