use ghg_rs::load::read_wide_csv;
use ghg_rs::stats::{gini, grouped_summary, lorenz_curve};

const WIDE: &str = "\
Country,Gas Type,Industry,2010,2011,2012
Asia,Carbon dioxide,Manufacturing,10,12,14
Asia,Carbon dioxide,Mining,5,,6
Oceania,Methane,Mining,,,
";

#[test]
fn summary_per_region_and_gas() {
    let ds = read_wide_csv(WIDE.as_bytes()).unwrap();
    let stats = grouped_summary(&ds);
    assert_eq!(stats.len(), 2);

    let asia = &stats[0];
    assert_eq!(asia.key.region, "Asia");
    assert_eq!(asia.count, 3);
    assert_eq!(asia.missing, 0);
    assert_eq!(asia.min, Some(12.0));
    assert_eq!(asia.max, Some(20.0));
    assert_eq!(asia.median, Some(15.0));
    assert!((asia.mean.unwrap() - 47.0 / 3.0).abs() < 1e-9);

    let oceania = &stats[1];
    assert_eq!(oceania.count, 0);
    assert_eq!(oceania.missing, 3);
    assert_eq!(oceania.mean, None);
    assert_eq!(oceania.median, None);
}

#[test]
fn lorenz_points_are_cumulative_shares() {
    let vals = vec![("b".to_string(), 3.0), ("a".to_string(), 1.0)];
    let c = lorenz_curve(&vals);
    assert_eq!(c.points, [(0.0, 0.0), (0.5, 0.25), (1.0, 1.0)]);
    assert_eq!(c.ranked[0].0, "a");
    assert!((c.gini - 0.25).abs() < 1e-12);
}

#[test]
fn degenerate_inputs() {
    let empty = lorenz_curve(&[]);
    assert_eq!(empty.points, [(0.0, 0.0)]);
    assert_eq!(empty.gini, 0.0);

    let zeros = lorenz_curve(&[("x".to_string(), 0.0), ("y".to_string(), 0.0)]);
    assert!(zeros.points.iter().all(|p| p.1 == 0.0));
    assert!((zeros.gini - 1.0).abs() < 1e-12);
}

#[test]
fn gini_of_the_diagonal_is_zero() {
    assert!(gini(&[(0.0, 0.0), (1.0, 1.0)]).abs() < 1e-12);
}
