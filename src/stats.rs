use crate::load::Dataset;
use crate::models::GroupKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: GroupKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute grouped statistics by (region, gas type) over yearly totals.
///
/// A year's total sums every industry row of the group. A year counts as missing when
/// none of those rows has a number in it.
pub fn grouped_summary(ds: &Dataset) -> Vec<Summary> {
    let mut yearly: BTreeMap<GroupKey, BTreeMap<i32, Option<f64>>> = BTreeMap::new();
    for r in &ds.records {
        let key = GroupKey {
            region: r.region.trim().to_string(),
            gas_type: r.gas_type.clone(),
        };
        let years = yearly.entry(key).or_default();
        for (&year, cell) in &r.year_values {
            let slot = years.entry(year).or_insert(None);
            if let Some(v) = cell.filter(|v| v.is_finite()) {
                *slot = Some(slot.unwrap_or(0.0) + v);
            }
        }
    }

    let mut out = Vec::new();
    for (key, years) in yearly {
        let mut vals: Vec<f64> = years.values().flatten().copied().collect();
        let miss = years.len() - vals.len();
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            key,
            count,
            missing: miss,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

/// Cumulative share curve over region totals plus its Gini coefficient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LorenzCurve {
    /// `(population share, emission share)`, starting at `(0, 0)`.
    pub points: Vec<(f64, f64)>,
    pub gini: f64,
    /// Contributors, smallest first.
    pub ranked: Vec<(String, f64)>,
}

/// Lorenz curve of `values`, sorted ascending (stable for ties).
///
/// An all-zero or empty input divides by 1 instead of 0, so the curve stays flat and
/// the Gini coefficient comes out as 1 (or 0 for no contributors).
pub fn lorenz_curve(values: &[(String, f64)]) -> LorenzCurve {
    let mut ranked: Vec<(String, f64)> = values.to_vec();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = ranked.len();
    let sum: f64 = ranked.iter().map(|(_, v)| *v).sum();
    let total = if sum == 0.0 { 1.0 } else { sum };

    let mut points = Vec::with_capacity(n + 1);
    points.push((0.0, 0.0));
    let mut cum = 0.0;
    for (i, (_, v)) in ranked.iter().enumerate() {
        cum += v;
        points.push(((i + 1) as f64 / n as f64, cum / total));
    }
    let gini = if n == 0 { 0.0 } else { gini(&points) };
    LorenzCurve {
        points,
        gini,
        ranked,
    }
}

/// Gini coefficient from Lorenz points: `1 - 2 * area` with trapezoid integration.
pub fn gini(points: &[(f64, f64)]) -> f64 {
    let area: f64 = points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
        .sum();
    1.0 - 2.0 * area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_shares_have_zero_gini() {
        let vals: Vec<(String, f64)> = (0..4).map(|i| (format!("r{i}"), 5.0)).collect();
        let c = lorenz_curve(&vals);
        assert_eq!(c.points.len(), 5);
        assert!(c.gini.abs() < 1e-12);
    }

    #[test]
    fn single_emitter_among_many() {
        let mut vals: Vec<(String, f64)> = (0..3).map(|i| (format!("r{i}"), 0.0)).collect();
        vals.push(("big".into(), 10.0));
        let c = lorenz_curve(&vals);
        // Trapezoid area is 1/8, so Gini is 0.75.
        assert!((c.gini - 0.75).abs() < 1e-12);
        assert_eq!(c.ranked.last().map(|(k, _)| k.as_str()), Some("big"));
    }
}
