//! Per-chart slices of the dataset, built from the aggregation engine.
//!
//! Each function corresponds to one chart and returns exactly what its renderer needs.
//! Year-sliced views return `None` for a year outside the table; callers keep the last
//! frame they drew.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aggregate::{
    Dimension, Filter, KeyPart, Totals, YearSelector, build_series, build_stack_segments,
    filter_rows, stack_total_for, sum_by_keys, top_n,
};
use crate::config::Presets;
use crate::load::Dataset;
use crate::models::{HeatCell, IndustryRecord, RaceBar, RawRecord, Segment, Series};
use crate::stats::{LorenzCurve, lorenz_curve};

/// What the stacked bar chart stacks inside each continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackMode {
    /// Industries of one gas type.
    Industry,
    /// Gas types (the aggregate "focus" gas is left out so nothing is counted twice).
    Gas,
}

/// Stacked bars: groups in draw order, subgroups in stack order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBars {
    pub groups: Vec<String>,
    pub subgroups: Vec<String>,
    pub segments: Vec<Segment>,
    /// Stack height per group, in `groups` order (0 for empty groups).
    pub totals: Vec<(String, f64)>,
    /// Years that were summed.
    pub years: Vec<i32>,
}

impl StackedBars {
    pub fn max_total(&self) -> f64 {
        self.totals.iter().map(|(_, t)| *t).fold(0.0, f64::max)
    }
}

/// One frame of a stacked race (Asia bars, radial bars).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    pub year: i32,
    pub groups: Vec<String>,
    /// Stack order for this frame (may change from frame to frame).
    pub subgroups: Vec<String>,
    pub segments: Vec<Segment>,
    pub totals: Vec<(String, f64)>,
}

/// Industry x subregion grid for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub year: i32,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// Every (row, column) pair, zeros included, rows outer.
    pub cells: Vec<HeatCell>,
    /// Largest cell of this year.
    pub max: f64,
    /// Largest cell over every year (for a colour scale that stays put during playback).
    pub max_all_years: f64,
}

fn group_totals(groups: &[String], segments: &[Segment]) -> Vec<(String, f64)> {
    groups
        .iter()
        .map(|g| (g.clone(), stack_total_for(segments, g)))
        .collect()
}

fn distinct_industries(rows: &[&RawRecord]) -> Vec<String> {
    let mut out: Vec<String> = rows
        .iter()
        .map(|r| r.industry.clone())
        .filter(|s| !s.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

fn known_year(ds: &Dataset, year: i32) -> bool {
    if ds.year_index(year).is_some() {
        true
    } else {
        warn!("year {year} is not a column of the table; keeping the previous frame");
        false
    }
}

/// Continent line chart: one series per continent (declared order), all years.
pub fn continent_series(ds: &Dataset, presets: &Presets, gas: &str) -> Vec<Series> {
    let filter = Filter::new()
        .gas(gas)
        .regions(presets.continents.iter().cloned());
    let rows = filter_rows(&ds.records, &filter);
    let lookup = sum_by_keys(rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    build_series(&presets.continents, &ds.years, &lookup, 0.0)
}

/// Stacked bars per continent, summed over the selected year chips.
///
/// Bars are ordered by total, largest first (stable for ties); subgroups stack in
/// alphabetical order. Chips are deduplicated and sorted; years missing from the
/// table are ignored.
pub fn stacked_regions(
    ds: &Dataset,
    presets: &Presets,
    gas: &str,
    years: &[i32],
    mode: StackMode,
) -> StackedBars {
    let years: Vec<i32> = years
        .iter()
        .copied()
        .filter(|y| known_year(ds, *y))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let continents = presets.continents.iter().cloned();
    let (filter, dim, subgroups) = match mode {
        StackMode::Industry => (
            Filter::new().gas(gas).regions(continents),
            Dimension::Industry,
            ds.industries(),
        ),
        StackMode::Gas => (
            Filter::new().regions(continents),
            Dimension::GasType,
            ds.gas_types()
                .into_iter()
                .filter(|g| *g != presets.focus_gas)
                .collect(),
        ),
    };
    let rows: Vec<&RawRecord> = filter_rows(&ds.records, &filter)
        .into_iter()
        .filter(|r| subgroups.iter().any(|s| *s == key_of(r, dim)))
        .collect();

    let selector = YearSelector::Set(years.clone());
    let lookup = sum_by_keys(rows.iter().copied(), &[Dimension::Region, dim], &selector);
    let by_region = sum_by_keys(rows.iter().copied(), &[Dimension::Region], &selector);

    let mut groups = presets.continents.clone();
    groups.sort_by(|a, b| {
        let ta = by_region.value(&[KeyPart::from(a)]);
        let tb = by_region.value(&[KeyPart::from(b)]);
        tb.total_cmp(&ta)
    });

    let year = match years.as_slice() {
        [only] => Some(*only),
        _ => None,
    };
    let segments = build_stack_segments(&groups, &subgroups, &lookup, year);
    let totals = group_totals(&groups, &segments);
    StackedBars {
        groups,
        subgroups,
        segments,
        totals,
        years,
    }
}

fn key_of(row: &RawRecord, dim: Dimension) -> &str {
    match dim {
        Dimension::GasType => &row.gas_type,
        Dimension::Region => row.region.trim(),
        _ => &row.industry,
    }
}

/// Streamgraph layers for one region: one series per industry (alphabetical), all years.
pub fn streamgraph(ds: &Dataset, gas: &str, region: &str) -> Vec<Series> {
    let filter = Filter::new().gas(gas).regions([region]);
    let rows = filter_rows(&ds.records, &filter);
    let industries = distinct_industries(&rows);
    let lookup = sum_by_keys(rows, &[Dimension::Industry, Dimension::Year], &YearSelector::All);
    build_series(&industries, &ds.years, &lookup, 0.0)
}

/// Industry x Asian subregion heatmap of the focus gas.
///
/// With `fixed_industries` the rows are the preset industry list (and only those
/// industries are read); otherwise they are the industries present, sorted.
pub fn subregion_heatmap(
    ds: &Dataset,
    presets: &Presets,
    year: i32,
    fixed_industries: bool,
) -> Option<Heatmap> {
    if !known_year(ds, year) {
        return None;
    }
    let mut filter = Filter::new()
        .gas(presets.focus_gas.as_str())
        .regions(presets.subregions.iter().cloned());
    if fixed_industries {
        filter = filter.industries(presets.heatmap_industries.iter().cloned());
    }
    let rows = filter_rows(&ds.records, &filter);
    let industries = if fixed_industries {
        presets.heatmap_industries.clone()
    } else {
        distinct_industries(&rows)
    };

    let all_years = sum_by_keys(
        rows.iter().copied(),
        &[Dimension::Industry, Dimension::Region, Dimension::Year],
        &YearSelector::All,
    );
    let lookup = sum_by_keys(
        rows,
        &[Dimension::Industry, Dimension::Region],
        &YearSelector::Only(year),
    );

    let mut cells = Vec::with_capacity(industries.len() * presets.subregions.len());
    for industry in &industries {
        for region in &presets.subregions {
            cells.push(HeatCell {
                row: industry.clone(),
                column: region.clone(),
                value: lookup.value(&[KeyPart::from(industry), KeyPart::from(region)]),
            });
        }
    }
    let max = cells.iter().map(|c| c.value).fold(0.0, f64::max);
    Some(Heatmap {
        year,
        rows: industries,
        columns: presets.subregions.clone(),
        cells,
        max,
        max_all_years: all_years.max_value(),
    })
}

fn subregion_rows<'a>(ds: &'a Dataset, presets: &Presets) -> Vec<&'a RawRecord> {
    let filter = Filter::new()
        .gas(presets.focus_gas.as_str())
        .regions(presets.subregions.iter().cloned());
    filter_rows(&ds.records, &filter)
}

/// Largest subregion total (all industries) over every year; a fixed axis for the races.
pub fn subregion_max_total(ds: &Dataset, presets: &Presets) -> f64 {
    let rows = subregion_rows(ds, presets);
    sum_by_keys(rows, &[Dimension::Region, Dimension::Year], &YearSelector::All).max_value()
}

/// Asia bar race frame: per subregion, the year's top-N industries stacked in rank order.
///
/// The top-N set is ranked from this year's totals across all subregions and is
/// recomputed for every frame.
pub fn asia_bar_frame(ds: &Dataset, presets: &Presets, year: i32) -> Option<StackFrame> {
    if !known_year(ds, year) {
        return None;
    }
    let rows = subregion_rows(ds, presets);

    let mut industry_totals = Totals::new();
    for sub in &presets.subregions {
        for row in rows.iter().filter(|r| r.region.trim() == sub) {
            let v = row.value_at(year);
            if v != 0.0 {
                industry_totals.add(&row.industry, v);
            }
        }
    }
    let top = top_n(&industry_totals, presets.top_n);

    let lookup = sum_by_keys(
        rows,
        &[Dimension::Region, Dimension::Industry],
        &YearSelector::Only(year),
    );
    let segments = build_stack_segments(&presets.subregions, &top, &lookup, Some(year));
    Some(StackFrame {
        year,
        groups: presets.subregions.clone(),
        totals: group_totals(&presets.subregions, &segments),
        subgroups: top,
        segments,
    })
}

/// Radial race frame: every industry (alphabetical) stacked per subregion.
pub fn radial_frame(ds: &Dataset, presets: &Presets, year: i32) -> Option<StackFrame> {
    if !known_year(ds, year) {
        return None;
    }
    let rows = subregion_rows(ds, presets);
    let industries = distinct_industries(&rows);
    let lookup = sum_by_keys(
        rows,
        &[Dimension::Region, Dimension::Industry],
        &YearSelector::Only(year),
    );
    let segments = build_stack_segments(&presets.subregions, &industries, &lookup, Some(year));
    Some(StackFrame {
        year,
        groups: presets.subregions.clone(),
        totals: group_totals(&presets.subregions, &segments),
        subgroups: industries,
        segments,
    })
}

/// Industry bar race frame: that year's bars, largest first (stable for ties).
pub fn race_frame(records: &[IndustryRecord], year: i32) -> Option<Vec<RaceBar>> {
    let mut bars: Vec<RaceBar> = records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| RaceBar {
            industry: r.industry.clone(),
            value: r.emissions,
        })
        .collect();
    if bars.is_empty() {
        warn!("no industry rows for {year}");
        return None;
    }
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    Some(bars)
}

/// Fixed value axis for the industry race: the largest emission in the table.
pub fn race_max(records: &[IndustryRecord]) -> f64 {
    records.iter().map(|r| r.emissions).fold(0.0, f64::max)
}

/// Lorenz curve of region totals for one gas and year.
///
/// Every region in the table counts (countries, continents and subregions alike).
pub fn lorenz(ds: &Dataset, gas: &str, year: i32) -> Option<LorenzCurve> {
    if !known_year(ds, year) {
        return None;
    }
    let rows = filter_rows(&ds.records, &Filter::new().gas(gas));
    let mut by_region = Totals::new();
    // Loaded regions are already trimmed; datasets built in memory may not be.
    for row in rows {
        by_region.add(row.region.trim(), row.value_at(year));
    }
    Some(lorenz_curve(by_region.entries()))
}
