use ghg_rs::load::read_wide_csv;
use ghg_rs::models::LongRow;
use ghg_rs::storage;
use std::fs;
use tempfile::tempdir;

const WIDE: &str = "\
Country,Gas Type,Industry,2010,2011
Asia,Carbon dioxide,Mining,1.5,
Europe,Methane,Agriculture,2,3
";

#[test]
fn long_form_has_one_row_per_cell() {
    let ds = read_wide_csv(WIDE.as_bytes()).unwrap();
    let rows = storage::to_long_form(&ds);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].year, 2010);
    assert_eq!(rows[1].value, None);
    assert_eq!(rows[3].value, Some(3.0));
}

#[test]
fn save_csv_and_json() {
    let ds = read_wide_csv(WIDE.as_bytes()).unwrap();
    let rows = storage::to_long_form(&ds);
    let dir = tempdir().unwrap();

    let csv_path = dir.path().join("tidy.csv");
    storage::save_csv(&rows, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    assert!(csv_txt.starts_with("region,gas_type,industry,year,value"));
    assert_eq!(csv_txt.lines().count(), 1 + rows.len());
    assert!(csv_txt.contains("Asia,Carbon dioxide,Mining,2011,\n"));

    let json_path = dir.path().join("tidy.json");
    storage::save_json(&rows, &json_path).unwrap();
    let back: Vec<LongRow> = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, rows);
}

// Spreadsheet apps evaluate cells starting with = + - @ as formulas.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![LongRow {
        region: "=HYPERLINK(\"http://evil\")".into(),
        gas_type: "+SUM(A1:A9)".into(),
        industry: "@foo".into(),
        year: 2020,
        value: Some(1.0),
    }];
    let dir = tempdir().unwrap();
    let path = dir.path().join("inject.csv");
    storage::save_csv(&rows, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let row = rdr.records().next().expect("one data row").unwrap();
    for i in 0..3 {
        let cell = row.get(i).unwrap();
        assert!(cell.starts_with('\''), "cell {i} not prefixed: {cell}");
    }
    assert!(row.get(0).unwrap().contains("=HYPERLINK"));
    assert_eq!(row.get(3), Some("2020"));
}
