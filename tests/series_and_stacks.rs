use ghg_rs::aggregate::{
    Dimension, YearSelector, build_series, build_stack_segments, sort_by_total_desc,
    stack_total_for, stack_totals, sum_by_keys,
};
use ghg_rs::models::RawRecord;

#[test]
fn series_follow_entity_order_and_fill_gaps() {
    let rows = vec![
        RawRecord::new("Europe", "CO2", "Mining").with_value(2020, 3.0),
        RawRecord::new("Africa", "CO2", "Mining")
            .with_value(2020, 1.0)
            .with_value(2021, 2.0),
    ];
    let l = sum_by_keys(&rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    let series = build_series(&["Africa", "Europe", "Oceania"], &[2020, 2021], &l, 0.0);

    let names: Vec<&str> = series.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, ["Africa", "Europe", "Oceania"]);
    assert_eq!(series[1].value_for(2021), Some(0.0));
    assert!(series[2].points.iter().all(|p| p.value == 0.0));
    assert_eq!(series[0].points.len(), 2);
}

#[test]
fn sorting_by_total_is_stable() {
    let rows = vec![
        RawRecord::new("A", "CO2", "x").with_value(2020, 1.0),
        RawRecord::new("B", "CO2", "x").with_value(2020, 4.0),
        RawRecord::new("C", "CO2", "x").with_value(2020, 1.0),
    ];
    let l = sum_by_keys(&rows, &[Dimension::Region, Dimension::Year], &YearSelector::All);
    let mut series = build_series(&["A", "B", "C"], &[2020], &l, 0.0);
    sort_by_total_desc(&mut series);
    let names: Vec<&str> = series.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, ["B", "A", "C"]);
}

#[test]
fn segments_are_contiguous_in_subgroup_order() {
    let rows = vec![
        RawRecord::new("Asia", "CO2", "Mining").with_value(2020, 2.0),
        RawRecord::new("Asia", "CO2", "Energy").with_value(2020, 5.0),
        RawRecord::new("Asia", "CO2", "Farming").with_value(2020, 0.0),
        RawRecord::new("Europe", "CO2", "Mining").with_value(2020, 1.0),
    ];
    let l = sum_by_keys(
        &rows,
        &[Dimension::Region, Dimension::Industry],
        &YearSelector::Only(2020),
    );
    let subgroups = ["Energy", "Farming", "Mining"];
    let segs = build_stack_segments(&["Asia", "Europe", "Oceania"], &subgroups, &l, Some(2020));

    let asia: Vec<_> = segs.iter().filter(|s| s.group == "Asia").collect();
    assert_eq!(asia.len(), 2, "zero-valued subgroups emit no segment");
    assert_eq!((asia[0].subgroup.as_str(), asia[0].start, asia[0].end), ("Energy", 0.0, 5.0));
    assert_eq!((asia[1].subgroup.as_str(), asia[1].start, asia[1].end), ("Mining", 5.0, 7.0));
    for w in asia.windows(2) {
        assert_eq!(w[0].end, w[1].start);
    }
    assert!(segs.iter().all(|s| s.year == Some(2020)));

    assert_eq!(stack_total_for(&segs, "Asia"), 7.0);
    assert_eq!(stack_total_for(&segs, "Oceania"), 0.0);
    assert_eq!(
        stack_totals(&segs),
        vec![("Asia".to_string(), 7.0), ("Europe".to_string(), 1.0)]
    );
}
