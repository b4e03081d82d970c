//! Reading the two emissions tables.
//!
//! The wide table has one row per (region, gas type, industry) and one column per year.
//! Year columns are discovered from the header (`^\d{4}$`); every other unknown column
//! is ignored. Cells that are empty or not numbers load as missing values.
//!
//! ```no_run
//! let ds = ghg_rs::load::load_wide_csv("data/emissions.csv")?;
//! println!("{} rows, years {:?}", ds.records.len(), ds.year_range());
//! # Ok::<(), ghg_rs::LoadError>(())
//! ```

use crate::error::LoadError;
use crate::models::{IndustryRecord, RawRecord, parse_cell};
use csv::ReaderBuilder;
use log::{debug, info};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

pub const COL_REGION: &str = "Country";
pub const COL_GAS: &str = "Gas Type";
pub const COL_INDUSTRY: &str = "Industry";

fn year_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}$").expect("static regex"))
}

/// A loaded wide table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Year columns, ascending.
    pub years: Vec<i32>,
    pub records: Vec<RawRecord>,
}

impl Dataset {
    pub fn new(years: Vec<i32>, records: Vec<RawRecord>) -> Self {
        let years: BTreeSet<i32> = years.into_iter().collect();
        Self {
            years: years.into_iter().collect(),
            records,
        }
    }

    /// Distinct gas types, sorted.
    pub fn gas_types(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.gas_type.as_str()))
    }

    /// Distinct non-empty industries, sorted.
    pub fn industries(&self) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .map(|r| r.industry.as_str())
                .filter(|s| !s.is_empty()),
        )
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Position of `year` in [`Dataset::years`], looked up by value.
    pub fn year_index(&self, year: i32) -> Option<usize> {
        self.years.binary_search(&year).ok()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

fn distinct<'a>(it: impl Iterator<Item = &'a str>) -> Vec<String> {
    it.collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the wide table from disk.
pub fn load_wide_csv<P: AsRef<Path>>(path: P) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let ds = read_wide_csv(open(path)?)?;
    info!(
        "loaded {} rows with {} year columns from {}",
        ds.records.len(),
        ds.years.len(),
        path.display()
    );
    Ok(ds)
}

/// Parse the wide table from any reader.
pub fn read_wide_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let region_ix = column(COL_REGION)?;
    let gas_ix = column(COL_GAS)?;
    let industry_ix = column(COL_INDUSTRY)?;

    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| year_header().is_match(h))
        .filter_map(|(i, h)| h.parse::<i32>().ok().map(|y| (i, y)))
        .collect();
    if year_cols.is_empty() {
        return Err(LoadError::NoYearColumns);
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or("").trim().to_string();
        let year_values: BTreeMap<i32, Option<f64>> = year_cols
            .iter()
            .map(|&(i, y)| (y, row.get(i).and_then(parse_cell)))
            .collect();
        records.push(RawRecord {
            region: field(region_ix),
            gas_type: field(gas_ix),
            industry: field(industry_ix),
            year_values,
        });
    }
    debug!("parsed {} wide rows", records.len());

    Ok(Dataset::new(
        year_cols.into_iter().map(|(_, y)| y).collect(),
        records,
    ))
}

/// Load the long-form `Industry, Year, Emissions` table from disk.
pub fn load_industry_csv<P: AsRef<Path>>(path: P) -> Result<Vec<IndustryRecord>, LoadError> {
    let path = path.as_ref();
    let rows = read_industry_csv(open(path)?)?;
    info!("loaded {} industry rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse the long-form industry table from any reader.
pub fn read_industry_csv<R: Read>(reader: R) -> Result<Vec<IndustryRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();
    for row in rdr.deserialize() {
        let rec: IndustryRecord = row?;
        out.push(rec);
    }
    Ok(out)
}

/// Distinct years of the long-form table, ascending.
pub fn industry_years(rows: &[IndustryRecord]) -> Vec<i32> {
    rows.iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
