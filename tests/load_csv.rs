use ghg_rs::LoadError;
use ghg_rs::load::{industry_years, load_wide_csv, read_industry_csv, read_wide_csv};
use std::io::Write;

const WIDE: &str = "\
Country,Gas Type,Industry,ISO2,2012,2010,2011
Asia,Carbon dioxide,Mining,XX,6,5,
 Eastern Asia ,Carbon dioxide,Mining,XX,1.5,n/a,2
Europe,Methane,Agriculture,XX,3,3,3
";

#[test]
fn year_columns_are_found_and_sorted() {
    let ds = read_wide_csv(WIDE.as_bytes()).unwrap();
    assert_eq!(ds.years, [2010, 2011, 2012]);
    assert_eq!(ds.records.len(), 3);
    assert_eq!(ds.year_range(), Some((2010, 2012)));
    assert_eq!(ds.year_index(2011), Some(1));
    assert_eq!(ds.year_index(2013), None);
}

#[test]
fn cells_and_names_are_cleaned() {
    let ds = read_wide_csv(WIDE.as_bytes()).unwrap();
    let asia = &ds.records[0];
    assert_eq!(asia.year_values.get(&2011), Some(&None));
    assert_eq!(asia.value_at(2012), 6.0);

    let eastern = &ds.records[1];
    assert_eq!(eastern.region, "Eastern Asia");
    assert_eq!(eastern.year_values.get(&2010), Some(&None));
    assert_eq!(eastern.value_at(2012), 1.5);
    assert!(!asia.year_values.keys().any(|y| *y < 1000), "ISO2 is not a year");

    assert_eq!(ds.gas_types(), ["Carbon dioxide", "Methane"]);
    assert_eq!(ds.industries(), ["Agriculture", "Mining"]);
}

#[test]
fn missing_required_column_is_an_error() {
    let err = read_wide_csv("Country,Industry,2010\nAsia,Mining,1\n".as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn("Gas Type")));
}

#[test]
fn table_without_years_is_an_error() {
    let err = read_wide_csv("Country,Gas Type,Industry,Unit\nAsia,CO2,Mining,t\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, LoadError::NoYearColumns));
}

#[test]
fn unreadable_path_reports_the_path() {
    let err = load_wide_csv("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
    assert!(err.to_string().contains("/definitely/not/here.csv"));
}

#[test]
fn loads_from_disk() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(WIDE.as_bytes()).unwrap();
    let ds = load_wide_csv(f.path()).unwrap();
    assert_eq!(ds.last_year(), Some(2012));
}

#[test]
fn industry_table_is_lenient_about_blanks() {
    let src = "Industry,Year,Emissions\nMining, 2011 ,5.5\nEnergy,2010,\nMining,2010,2\n";
    let rows = read_industry_csv(src.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].year, 2011);
    assert_eq!(rows[1].emissions, 0.0);
    assert_eq!(industry_years(&rows), [2010, 2011]);
}
