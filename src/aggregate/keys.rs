use ahash::AHashMap;
use log::debug;
use std::borrow::Borrow;
use std::collections::BTreeSet;

use crate::models::RawRecord;

/// A column a lookup can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Region,
    GasType,
    Industry,
    Year,
}

/// One component of a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Text(String),
    Year(i32),
}

impl From<&str> for KeyPart {
    fn from(s: &str) -> Self {
        KeyPart::Text(s.to_string())
    }
}

impl From<&String> for KeyPart {
    fn from(s: &String) -> Self {
        KeyPart::Text(s.clone())
    }
}

impl From<String> for KeyPart {
    fn from(s: String) -> Self {
        KeyPart::Text(s)
    }
}

impl From<i32> for KeyPart {
    fn from(y: i32) -> Self {
        KeyPart::Year(y)
    }
}

/// Tuple of key parts, one per [`Dimension`] of the owning [`Lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(Vec<KeyPart>);

impl CompositeKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl Borrow<[KeyPart]> for CompositeKey {
    fn borrow(&self) -> &[KeyPart] {
        &self.0
    }
}

/// Which year columns a fold reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearSelector {
    /// Every year column present on the row.
    All,
    Only(i32),
    /// A set of years (duplicates are read once).
    Set(Vec<i32>),
}

impl YearSelector {
    fn years_for(&self, row: &RawRecord) -> Vec<i32> {
        match self {
            YearSelector::All => row.year_values.keys().copied().collect(),
            YearSelector::Only(y) => vec![*y],
            YearSelector::Set(ys) => ys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect(),
        }
    }
}

/// Summed totals keyed by a composite of dimension values.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    dimensions: Vec<Dimension>,
    totals: AHashMap<CompositeKey, f64>,
}

impl Lookup {
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn get(&self, parts: &[KeyPart]) -> Option<f64> {
        self.totals.get(parts).copied()
    }

    /// Total for `parts`, or 0 when the key never occurred.
    pub fn value(&self, parts: &[KeyPart]) -> f64 {
        self.get(parts).unwrap_or(0.0)
    }

    /// Shorthand for two-dimensional lookups such as (region, year).
    pub fn get2(&self, a: impl Into<KeyPart>, b: impl Into<KeyPart>) -> Option<f64> {
        let parts: [KeyPart; 2] = [a.into(), b.into()];
        self.get(&parts)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, f64)> {
        self.totals.iter().map(|(k, v)| (k, *v))
    }

    /// Largest single total, 0 for an empty lookup.
    pub fn max_value(&self) -> f64 {
        self.totals.values().copied().fold(0.0, f64::max)
    }

    fn add(&mut self, key: CompositeKey, value: f64) {
        *self.totals.entry(key).or_insert(0.0) += value;
    }
}

fn key_part(row: &RawRecord, dim: Dimension, year: i32) -> KeyPart {
    match dim {
        Dimension::Region => KeyPart::Text(row.region.trim().to_string()),
        Dimension::GasType => KeyPart::Text(row.gas_type.clone()),
        Dimension::Industry => KeyPart::Text(row.industry.clone()),
        Dimension::Year => KeyPart::Year(year),
    }
}

/// Fold rows into per-key sums.
///
/// Every row sharing a key contributes its value at each selected year; missing and
/// non-finite cells contribute 0. Rows are added, never overwritten, so the result does
/// not depend on row order. When `Year` is not among `dimensions`, the selected years
/// are summed together.
pub fn sum_by_keys<'a, I>(rows: I, dimensions: &[Dimension], years: &YearSelector) -> Lookup
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut lookup = Lookup {
        dimensions: dimensions.to_vec(),
        totals: AHashMap::new(),
    };
    let mut rows_seen = 0usize;
    for row in rows {
        rows_seen += 1;
        for year in years.years_for(row) {
            let key = CompositeKey(
                dimensions
                    .iter()
                    .map(|d| key_part(row, *d, year))
                    .collect(),
            );
            lookup.add(key, row.value_at(year));
        }
    }
    debug!(
        "sum_by_keys {:?}: {} rows -> {} keys",
        dimensions,
        rows_seen,
        lookup.len()
    );
    lookup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_and_key_lookups_agree() {
        let rows = vec![RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 4.0)];
        let l = sum_by_keys(&rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
        assert_eq!(l.get(&[KeyPart::from("Asia"), KeyPart::Year(2020)]), Some(4.0));
        assert_eq!(l.get2("Asia", 2020), Some(4.0));
        assert_eq!(l.get2("Asia", 2021), None);
    }

    #[test]
    fn duplicate_years_in_set_are_read_once() {
        let rows = vec![RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 4.0)];
        let l = sum_by_keys(&rows, &[Dimension::Region], &YearSelector::Set(vec![2020, 2020]));
        assert_eq!(l.get(&[KeyPart::from("Asia")]), Some(4.0));
    }
}
