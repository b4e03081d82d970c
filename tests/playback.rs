use ghg_rs::playback::{EndBehavior, Frame, PlaybackController, PlaybackState};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(1000);

fn years() -> Vec<i32> {
    vec![2010, 2011, 2012]
}

#[test]
fn play_draws_immediately_then_once_per_tick() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(years(), TICK);
    let t0 = Instant::now();
    assert!(c.play(t0, &mut |f: Frame| seen.push(f.year)));
    assert_eq!(seen, [2010]);
    assert_eq!(c.poll(t0 + Duration::from_millis(999), &mut |f: Frame| seen.push(f.year)), 0);
    assert_eq!(c.poll(t0 + TICK, &mut |f: Frame| seen.push(f.year)), 1);
    assert_eq!(seen, [2010, 2011]);
}

#[test]
fn second_play_does_not_start_a_second_timer() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(vec![2000, 2001, 2002, 2003, 2004], TICK);
    let t0 = Instant::now();
    assert!(c.play(t0, &mut |f: Frame| seen.push(f.year)));
    assert!(!c.play(t0, &mut |f: Frame| seen.push(f.year)));
    c.poll(t0 + TICK, &mut |f: Frame| seen.push(f.year));
    assert_eq!(seen, [2000, 2001], "exactly one tick per interval");
}

#[test]
fn race_clamps_at_the_last_year_and_stops() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(years(), TICK);
    let t0 = Instant::now();
    c.play(t0, &mut |f: Frame| seen.push(f.year));
    let fired = c.poll(t0 + TICK * 10, &mut |f: Frame| seen.push(f.year));
    assert_eq!(fired, 2);
    assert_eq!(seen, [2010, 2011, 2012]);
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_eq!(c.current_year(), Some(2012));
    assert_eq!(c.time_until_next_tick(t0), None);
}

#[test]
fn play_from_the_last_year_restarts_at_the_first() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(years(), TICK);
    c.set_year(2012, &mut |f: Frame| seen.push(f.year));
    c.play(Instant::now(), &mut |f: Frame| seen.push(f.year));
    assert_eq!(seen, [2012, 2010]);
}

#[test]
fn slider_wraps_and_keeps_running() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::slider(years(), Duration::from_millis(800));
    assert_eq!(c.end_behavior(), EndBehavior::Wrap);
    let t0 = Instant::now();
    c.play(t0, &mut |f: Frame| seen.push(f.year));
    c.poll(t0 + Duration::from_millis(800 * 3), &mut |f: Frame| seen.push(f.year));
    assert_eq!(seen, [2010, 2011, 2012, 2010]);
    assert!(c.is_running());
}

#[test]
fn pause_keeps_the_index_and_stops_ticks() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(years(), TICK);
    let t0 = Instant::now();
    c.play(t0, &mut |f: Frame| seen.push(f.year));
    assert!(c.pause());
    assert!(!c.pause());
    assert_eq!(c.poll(t0 + TICK * 5, &mut |f: Frame| seen.push(f.year)), 0);
    assert_eq!(c.index(), 1);
    assert_eq!(seen, [2010]);
}

#[test]
fn set_year_looks_up_by_value() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::slider(vec![1990, 2005, 2023], TICK);
    assert!(c.set_year(2023, &mut |f: Frame| seen.push((f.index, f.year))));
    assert!(!c.set_year(2024, &mut |f: Frame| seen.push((f.index, f.year))));
    assert_eq!(seen, [(2, 2023)]);
    assert_eq!(c.current_year(), Some(2023));
}

#[test]
fn empty_year_list_never_plays() {
    let mut drawn = 0;
    let mut c = PlaybackController::race(Vec::new(), TICK);
    assert!(!c.play(Instant::now(), &mut |_f: Frame| drawn += 1));
    assert!(!c.is_running());
    assert_eq!(drawn, 0);
}

#[test]
fn replacing_years_stops_playback() {
    let mut c = PlaybackController::slider(years(), TICK);
    c.play(Instant::now(), &mut |_f: Frame| {});
    c.set_years(vec![2020]);
    assert!(!c.is_running());
    assert_eq!(c.index(), 0);
}

#[test]
fn set_year_while_racing_keeps_the_timer() {
    let mut seen = Vec::new();
    let mut c = PlaybackController::race(years(), TICK);
    let t0 = Instant::now();
    c.play(t0, &mut |f: Frame| seen.push(f.year));
    assert!(c.set_year(2012, &mut |f: Frame| seen.push(f.year)));
    assert!(c.is_running());
    assert_eq!(c.time_until_next_tick(t0), Some(TICK));

    assert_eq!(c.poll(t0 + TICK, &mut |f: Frame| seen.push(f.year)), 1);
    assert_eq!(seen, [2010, 2012, 2012]);
    assert!(!c.is_running());
    assert_eq!(c.index(), 2);
}

#[test]
fn set_year_while_sliding_continues_from_the_new_year() {
    let mut seen = Vec::new();
    let interval = Duration::from_millis(800);
    let mut c = PlaybackController::slider(years(), interval);
    let t0 = Instant::now();
    c.play(t0, &mut |f: Frame| seen.push(f.year));
    c.set_year(2012, &mut |f: Frame| seen.push(f.year));
    assert!(c.is_running());

    c.poll(t0 + interval * 2, &mut |f: Frame| seen.push(f.year));
    assert_eq!(seen, [2010, 2012, 2012, 2010]);
    assert!(c.is_running());
    assert_eq!(c.index(), 1);
}

#[test]
fn race_picks_up_the_slider_year_without_redrawing() {
    let mut drawn = Vec::new();
    let mut race = PlaybackController::race(years(), TICK);
    let mut slider = PlaybackController::slider(years(), Duration::from_millis(800));
    let t0 = Instant::now();

    slider.set_year(2011, &mut |f: Frame| {
        race.seek(f.year);
    });
    assert_eq!(race.current_year(), Some(2011));
    assert!(!race.is_running());

    race.play(t0, &mut |f: Frame| drawn.push(f.year));
    assert_eq!(drawn, [2011], "playback continues from the slider year");
    race.poll(t0 + TICK, &mut |f: Frame| drawn.push(f.year));
    assert_eq!(drawn, [2011, 2012]);
}

#[test]
fn seek_ignores_unknown_years_and_leaves_playback_alone() {
    let mut c = PlaybackController::slider(years(), TICK);
    let t0 = Instant::now();
    c.play(t0, &mut |_f: Frame| {});
    assert_eq!(c.seek(2012), Some(Frame { index: 2, year: 2012 }));
    assert_eq!(c.seek(1999), None);
    assert_eq!(c.current_year(), Some(2012));
    assert!(c.is_running());
}
