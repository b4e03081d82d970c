use ghg_rs::aggregate::{
    Dimension, Filter, KeyPart, Totals, YearSelector, filter_rows, rank_desc, sum_by_keys, top_n,
};
use ghg_rs::models::RawRecord;

fn rows() -> Vec<RawRecord> {
    vec![
        RawRecord::new("Asia", "CO2", "Mining")
            .with_value(2020, 10.0)
            .with_value(2021, 20.0),
        RawRecord::new("Asia", "CO2", "Manufacturing").with_value(2020, 5.0),
        RawRecord::new("Europe", "CO2", "Mining").with_value(2020, 7.0),
        RawRecord::new("Asia", "Methane", "Mining").with_value(2020, 100.0),
    ]
}

#[test]
fn duplicate_keys_add_up() {
    let rows = vec![
        RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 5.0),
        RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 0.0),
        RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 7.0),
    ];
    let l = sum_by_keys(&rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    assert_eq!(l.get2("Asia", 2020), Some(12.0));
    assert_eq!(l.len(), 1);
}

#[test]
fn filtered_region_year_totals() {
    let all = rows();
    let co2 = filter_rows(&all, &Filter::new().gas("CO2"));
    let l = sum_by_keys(co2, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    assert_eq!(l.get2("Asia", 2020), Some(15.0));
    assert_eq!(l.get2("Asia", 2021), Some(20.0));
    assert_eq!(l.get2("Europe", 2020), Some(7.0));
}

#[test]
fn missing_and_nan_cells_count_as_zero() {
    let mut a = RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 4.0);
    a.year_values.insert(2021, None);
    let mut b = RawRecord::new("Asia", "CO2", "Mining");
    b.year_values.insert(2020, Some(f64::NAN));
    b.year_values.insert(2021, Some(3.0));
    let rows = vec![a, b];
    let l = sum_by_keys(&rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    assert_eq!(l.get2("Asia", 2020), Some(4.0));
    assert_eq!(l.get2("Asia", 2021), Some(3.0));
}

#[test]
fn rows_outside_the_region_set_are_dropped() {
    let all = rows();
    let only_asia = filter_rows(&all, &Filter::new().gas("CO2").regions(["Asia", "Atlantis"]));
    assert_eq!(only_asia.len(), 2);
    assert!(only_asia.iter().all(|r| r.region == "Asia"));
}

#[test]
fn region_names_are_trimmed_for_keys() {
    let rows = vec![RawRecord::new("  Eastern Asia ", "CO2", "Mining").with_value(2020, 2.0)];
    let l = sum_by_keys(&rows, &[Dimension::Region], &YearSelector::All);
    assert_eq!(l.get(&[KeyPart::from("Eastern Asia")]), Some(2.0));
}

#[test]
fn several_groupings_over_the_same_rows() {
    let all = rows();
    let by_gas = sum_by_keys(&all, &[Dimension::GasType], &YearSelector::Only(2020));
    assert_eq!(by_gas.get(&[KeyPart::from("CO2")]), Some(22.0));
    assert_eq!(by_gas.get(&[KeyPart::from("Methane")]), Some(100.0));

    let by_industry = sum_by_keys(
        &all,
        &[Dimension::Region, Dimension::Industry],
        &YearSelector::Set(vec![2020, 2021]),
    );
    assert_eq!(by_industry.get2("Asia", "Mining"), Some(130.0));
    assert_eq!(by_industry.get2("Asia", "Manufacturing"), Some(5.0));
    assert_eq!(by_industry.value(&[KeyPart::from("Europe"), KeyPart::from("Farming")]), 0.0);
    assert_eq!(by_industry.max_value(), 130.0);
}

#[test]
fn empty_input_gives_empty_lookup() {
    let rows: Vec<RawRecord> = Vec::new();
    let l = sum_by_keys(&rows, &[Dimension::Region], &YearSelector::All);
    assert!(l.is_empty());
    assert_eq!(l.max_value(), 0.0);
}

#[test]
fn top_n_keeps_first_seen_order_on_ties() {
    let totals: Totals = [("b", 5.0), ("a", 5.0), ("c", 9.0), ("d", 1.0)]
        .into_iter()
        .collect();
    assert_eq!(rank_desc(&totals), vec!["c", "b", "a", "d"]);
    assert_eq!(top_n(&totals, 2), vec!["c", "b"]);
    assert_eq!(top_n(&totals, 10).len(), 4);
}

#[test]
fn csv_to_region_year_totals() {
    let src = "\
Country,Gas Type,Industry,2020,2021
Asia,CO2,Mining,10,20
Asia,CO2,Energy,5,
Europe,CO2,Mining,1,1
";
    let ds = ghg_rs::load::read_wide_csv(src.as_bytes()).unwrap();
    let co2 = filter_rows(&ds.records, &Filter::new().gas("CO2").regions(["Asia"]));
    let l = sum_by_keys(co2, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    assert_eq!(l.get2("Asia", 2020), Some(15.0));
    assert_eq!(l.get2("Asia", 2021), Some(20.0));
    assert_eq!(l.get2("Europe", 2020), None);
}
