use ghg_rs::Presets;
use ghg_rs::load::{Dataset, read_industry_csv, read_wide_csv};
use ghg_rs::views::{self, StackMode};

const WIDE: &str = "\
Country,Gas Type,Industry,2010,2011,2012
Asia,Carbon dioxide,Manufacturing,10,12,14
Asia,Carbon dioxide,Mining,5,,6
Europe,Carbon dioxide,Manufacturing,8,7,6
Africa,Carbon dioxide,Mining,1,2,3
Africa,Methane,Mining,4,4,4
Asia,Greenhouse gas,Manufacturing,30,31,32
Eastern Asia,Greenhouse gas,Manufacturing,20,21,22
Eastern Asia,Greenhouse gas,Mining,2,3,n/a
Southern Asia,Greenhouse gas,Construction,7,8,9
Western Asia,Greenhouse gas,Mining,0,1,1
Germany,Greenhouse gas,Manufacturing,3,3,3
";

fn dataset() -> Dataset {
    read_wide_csv(WIDE.as_bytes()).unwrap()
}

#[test]
fn continent_lines_keep_preset_order() {
    let ds = dataset();
    let presets = Presets::default();
    let lines = views::continent_series(&ds, &presets, "Carbon dioxide");
    let names: Vec<&str> = lines.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, ["Africa", "Asia", "Europe", "Oceania", "Americas"]);
    assert_eq!(lines[1].value_for(2011), Some(12.0));
    assert_eq!(lines[3].max_value(), 0.0);
}

#[test]
fn stacked_industries_for_one_year() {
    let ds = dataset();
    let presets = Presets::default();
    let bars = views::stacked_regions(&ds, &presets, "Carbon dioxide", &[2012], StackMode::Industry);

    assert_eq!(bars.groups, ["Asia", "Europe", "Africa", "Oceania", "Americas"]);
    assert_eq!(bars.subgroups, ["Construction", "Manufacturing", "Mining"]);
    let asia: Vec<_> = bars.segments.iter().filter(|s| s.group == "Asia").collect();
    assert_eq!(asia.len(), 2);
    assert_eq!((asia[0].start, asia[0].end), (0.0, 14.0));
    assert_eq!((asia[1].start, asia[1].end), (14.0, 20.0));
    assert!(bars.segments.iter().all(|s| s.year == Some(2012)));
    assert_eq!(bars.totals[0], ("Asia".to_string(), 20.0));
    assert_eq!(bars.max_total(), 20.0);
}

#[test]
fn repeated_year_chips_count_as_one_year() {
    let ds = dataset();
    let presets = Presets::default();
    let bars = views::stacked_regions(&ds, &presets, "Carbon dioxide", &[2012, 2012], StackMode::Industry);

    assert_eq!(bars.years, [2012]);
    assert!(bars.segments.iter().all(|s| s.year == Some(2012)));
    assert_eq!(bars.totals[0], ("Asia".to_string(), 20.0));

    let shuffled = views::stacked_regions(&ds, &presets, "", &[2011, 2010, 2011], StackMode::Gas);
    assert_eq!(shuffled.years, [2010, 2011]);
}

#[test]
fn stacked_gases_skip_the_aggregate_gas_and_unknown_years() {
    let ds = dataset();
    let presets = Presets::default();
    let bars = views::stacked_regions(&ds, &presets, "", &[2010, 2011, 1999], StackMode::Gas);

    assert_eq!(bars.years, [2010, 2011]);
    assert_eq!(bars.subgroups, ["Carbon dioxide", "Methane"]);
    assert_eq!(&bars.groups[..3], ["Asia", "Europe", "Africa"]);
    assert!(bars.segments.iter().all(|s| s.year.is_none()));
    let total = |g: &str| bars.totals.iter().find(|(k, _)| k == g).unwrap().1;
    assert_eq!(total("Asia"), 27.0);
    assert_eq!(total("Africa"), 11.0);
}

#[test]
fn streamgraph_layers_per_industry() {
    let ds = dataset();
    let layers = views::streamgraph(&ds, "Carbon dioxide", "Asia");
    let names: Vec<&str> = layers.iter().map(|s| s.entity.as_str()).collect();
    assert_eq!(names, ["Manufacturing", "Mining"]);
    assert_eq!(layers[1].value_for(2011), Some(0.0));
}

#[test]
fn heatmap_covers_every_cell() {
    let ds = dataset();
    let presets = Presets::default();
    let hm = views::subregion_heatmap(&ds, &presets, 2012, false).unwrap();
    assert_eq!(hm.rows, ["Construction", "Manufacturing", "Mining"]);
    assert_eq!(hm.columns, presets.subregions);
    assert_eq!(hm.cells.len(), 3 * presets.subregions.len());
    assert_eq!(hm.max, 22.0);
    assert_eq!(hm.max_all_years, 22.0);

    let cell = |row: &str, col: &str| {
        hm.cells
            .iter()
            .find(|c| c.row == row && c.column == col)
            .unwrap()
            .value
    };
    assert_eq!(cell("Mining", "Eastern Asia"), 0.0);
    assert_eq!(cell("Construction", "Southern Asia"), 9.0);
    assert_eq!(cell("Construction", "Central Asia"), 0.0);

    let fixed = views::subregion_heatmap(&ds, &presets, 2010, true).unwrap();
    assert_eq!(fixed.rows, presets.heatmap_industries);
    assert_eq!(fixed.max, 20.0);
    assert_eq!(fixed.max_all_years, 22.0);
}

#[test]
fn year_sliced_views_reject_unknown_years() {
    let ds = dataset();
    let presets = Presets::default();
    assert!(views::subregion_heatmap(&ds, &presets, 1999, false).is_none());
    assert!(views::asia_bar_frame(&ds, &presets, 1999).is_none());
    assert!(views::radial_frame(&ds, &presets, 1999).is_none());
    assert!(views::lorenz(&ds, "Greenhouse gas", 1999).is_none());
}

#[test]
fn asia_bars_rank_the_top_industries_each_year() {
    let ds = dataset();
    let presets = Presets {
        top_n: 2,
        ..Presets::default()
    };
    let frame = views::asia_bar_frame(&ds, &presets, 2010).unwrap();
    assert_eq!(frame.subgroups, ["Manufacturing", "Construction"]);
    assert_eq!(frame.groups, presets.subregions);
    let total = |g: &str| frame.totals.iter().find(|(k, _)| k == g).unwrap().1;
    assert_eq!(total("Eastern Asia"), 20.0, "Mining is outside the top 2");
    assert_eq!(total("Central Asia"), 0.0);
    assert!(frame.segments.iter().all(|s| s.year == Some(2010)));
    assert_eq!(views::subregion_max_total(&ds, &presets), 24.0);
}

#[test]
fn radial_frame_stacks_every_industry() {
    let ds = dataset();
    let presets = Presets::default();
    let frame = views::radial_frame(&ds, &presets, 2011).unwrap();
    assert_eq!(frame.subgroups, ["Construction", "Manufacturing", "Mining"]);
    let total = |g: &str| frame.totals.iter().find(|(k, _)| k == g).unwrap().1;
    assert_eq!(total("Eastern Asia"), 24.0);
    assert_eq!(total("Western Asia"), 1.0);
}

#[test]
fn race_frames_sort_descending_and_stay_stable() {
    let src = "Industry,Year,Emissions\nA,2010,5\nB,2010,9\nC,2010,5\nA,2011,1\n";
    let records = read_industry_csv(src.as_bytes()).unwrap();
    let bars = views::race_frame(&records, 2010).unwrap();
    let names: Vec<&str> = bars.iter().map(|b| b.industry.as_str()).collect();
    assert_eq!(names, ["B", "A", "C"]);
    assert!(views::race_frame(&records, 2012).is_none());
    assert_eq!(views::race_max(&records), 9.0);
}

#[test]
fn lorenz_over_all_regions() {
    let ds = dataset();
    let curve = views::lorenz(&ds, "Greenhouse gas", 2012).unwrap();
    assert_eq!(curve.ranked.len(), 5);
    assert_eq!(curve.ranked[0], ("Western Asia".to_string(), 1.0));
    assert_eq!(curve.points.last(), Some(&(1.0, 1.0)));
    assert!(curve.gini > 0.0 && curve.gini < 1.0);
}

#[test]
fn top_industries_are_reranked_every_year() {
    let src = "\
Country,Gas Type,Industry,2010,2011
Eastern Asia,Greenhouse gas,Mining,10,1
Eastern Asia,Greenhouse gas,Energy,1,10
Southern Asia,Greenhouse gas,Farming,5,5
";
    let ds = read_wide_csv(src.as_bytes()).unwrap();
    let presets = Presets {
        top_n: 2,
        ..Presets::default()
    };
    let first = views::asia_bar_frame(&ds, &presets, 2010).unwrap();
    let second = views::asia_bar_frame(&ds, &presets, 2011).unwrap();
    assert_eq!(first.subgroups, ["Mining", "Farming"]);
    assert_eq!(second.subgroups, ["Energy", "Farming"]);
    assert!(second.segments.iter().all(|s| s.subgroup != "Mining"));
}
