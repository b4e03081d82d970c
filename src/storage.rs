use crate::load::Dataset;
use crate::models::LongRow;
use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Melt the wide table into one row per (region, gas, industry, year) observation.
///
/// Missing cells stay `None`; years a row never had are not emitted.
pub fn to_long_form(ds: &Dataset) -> Vec<LongRow> {
    let mut out = Vec::with_capacity(ds.records.len() * ds.years.len());
    for r in &ds.records {
        for (&year, value) in &r.year_values {
            out.push(LongRow {
                region: r.region.clone(),
                gas_type: r.gas_type.clone(),
                industry: r.industry.clone(),
                year,
                value: *value,
            });
        }
    }
    out
}

/// Text cells starting like a spreadsheet formula get a leading `'`.
fn csv_safe(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save tidy rows as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[LongRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("region", "gas_type", "industry", "year", "value"))?;
    for r in rows {
        wtr.serialize((
            csv_safe(&r.region),
            csv_safe(&r.gas_type),
            csv_safe(&r.industry),
            r.year,
            r.value,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable slice (tidy rows, series, frames) as a pretty JSON array.
pub fn save_json<T: Serialize, P: AsRef<Path>>(items: &[T], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(items)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRecord;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let mut rec = RawRecord::new("Asia", "Carbon dioxide", "Mining").with_value(2010, 1.5);
        rec.year_values.insert(2011, None);
        let ds = Dataset::new(vec![2010, 2011], vec![rec]);
        let rows = to_long_form(&ds);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].value, None);
        save_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }
}
