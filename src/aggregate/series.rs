use super::keys::{KeyPart, Lookup};
use crate::models::{Series, SeriesPoint};

/// One series per entity, in the given entity order, with one point per year.
///
/// `lookup` must be keyed by (entity, year). Pairs that never occurred get `default`.
pub fn build_series<E: AsRef<str>>(
    entities: &[E],
    years: &[i32],
    lookup: &Lookup,
    default: f64,
) -> Vec<Series> {
    entities
        .iter()
        .map(|e| {
            let entity = e.as_ref();
            let points = years
                .iter()
                .map(|&year| SeriesPoint {
                    year,
                    value: lookup
                        .get(&[KeyPart::from(entity), KeyPart::Year(year)])
                        .unwrap_or(default),
                })
                .collect();
            Series {
                entity: entity.to_string(),
                points,
            }
        })
        .collect()
}

/// Stable sort by series total, largest first. Ties keep their input order.
pub fn sort_by_total_desc(series: &mut [Series]) {
    series.sort_by(|a, b| b.total().total_cmp(&a.total()));
}
