//! Year playback shared by the race charts and the global year slider.
//!
//! A [`PlaybackController`] is either `Stopped` or `Running`; it is running exactly when
//! it holds a [`RepeatingTimer`]. Timers are cooperative: the host (an event loop, a
//! frame callback, a CLI loop) calls [`PlaybackController::poll`] with the current time
//! and each elapsed interval produces one tick. Dropping the controller or calling
//! [`PlaybackController::pause`] drops the timer, so no tick can outlive its view.
//!
//! ```
//! use ghg_rs::playback::{Frame, PlaybackController};
//! use std::time::{Duration, Instant};
//!
//! let mut rendered = Vec::new();
//! let mut sink = |f: Frame| rendered.push(f.year);
//! let mut race = PlaybackController::race(vec![2010, 2011, 2012], Duration::from_millis(1000));
//! let t0 = Instant::now();
//! race.play(t0, &mut sink);
//! race.poll(t0 + Duration::from_millis(2000), &mut sink);
//! assert!(!race.is_running());
//! assert_eq!(rendered, vec![2010, 2011, 2012]);
//! ```

use log::{debug, warn};
use std::time::{Duration, Instant};

/// What happens when a tick advances past the last year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndBehavior {
    /// Race charts: stop the timer and stay on the last year.
    Clamp,
    /// Global slider: jump back to the first year and keep going.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// The frame a controller asks its sink to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub year: i32,
}

/// Render target driven by a controller.
pub trait FrameSink {
    fn render(&mut self, frame: Frame);
}

impl<F: FnMut(Frame)> FrameSink for F {
    fn render(&mut self, frame: Frame) {
        self(frame)
    }
}

/// A deadline-based repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Instant,
}

impl RepeatingTimer {
    const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn arm(now: Instant, interval: Duration) -> Self {
        let interval = interval.max(Self::MIN_INTERVAL);
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Consume one elapsed period. Returns `false` when nothing is due yet.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

/// Current-year state machine for one chart.
#[derive(Debug, Clone)]
pub struct PlaybackController {
    years: Vec<i32>,
    index: usize,
    interval: Duration,
    end: EndBehavior,
    timer: Option<RepeatingTimer>,
}

impl PlaybackController {
    pub fn new(years: Vec<i32>, interval: Duration, end: EndBehavior) -> Self {
        Self {
            years,
            index: 0,
            interval,
            end,
            timer: None,
        }
    }

    /// Clamp-at-end controller for race charts.
    pub fn race(years: Vec<i32>, interval: Duration) -> Self {
        Self::new(years, interval, EndBehavior::Clamp)
    }

    /// Wrap-around controller for the year slider.
    pub fn slider(years: Vec<i32>, interval: Duration) -> Self {
        Self::new(years, interval, EndBehavior::Wrap)
    }

    pub fn state(&self) -> PlaybackState {
        if self.timer.is_some() {
            PlaybackState::Running
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn end_behavior(&self) -> EndBehavior {
        self.end
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn current_year(&self) -> Option<i32> {
        self.years.get(self.index).copied()
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.current_year().map(|year| Frame {
            index: self.index,
            year,
        })
    }

    pub fn timer(&self) -> Option<&RepeatingTimer> {
        self.timer.as_ref()
    }

    fn at_last(&self) -> bool {
        self.index + 1 >= self.years.len()
    }

    /// Start playing. No-op (returns `false`) when already running or there are no years.
    ///
    /// From the last year, playback restarts at the first. The current frame is drawn
    /// and the index advanced immediately; later frames follow on each timer tick.
    pub fn play(&mut self, now: Instant, sink: &mut impl FrameSink) -> bool {
        if self.timer.is_some() || self.years.is_empty() {
            return false;
        }
        if self.at_last() {
            self.index = 0;
        }
        self.timer = Some(RepeatingTimer::arm(now, self.interval));
        debug!("playback started at index {}", self.index);
        self.step(sink);
        true
    }

    /// Stop playing and keep the current index. No-op (returns `false`) when stopped.
    pub fn pause(&mut self) -> bool {
        let was_running = self.timer.take().is_some();
        if was_running {
            debug!("playback paused at index {}", self.index);
        }
        was_running
    }

    /// Draw the current frame, then advance.
    ///
    /// Past the last year a clamping controller stops and stays on the last index; a
    /// wrapping controller returns to index 0 and keeps its timer.
    pub fn step(&mut self, sink: &mut impl FrameSink) {
        let Some(frame) = self.current_frame() else {
            return;
        };
        sink.render(frame);
        self.index += 1;
        if self.index >= self.years.len() {
            match self.end {
                EndBehavior::Clamp => {
                    self.index = self.years.len() - 1;
                    if self.timer.take().is_some() {
                        debug!("playback reached the last year and stopped");
                    }
                }
                EndBehavior::Wrap => self.index = 0,
            }
        }
    }

    /// Run every tick that is due at `now`. Returns how many ticks fired.
    pub fn poll(&mut self, now: Instant, sink: &mut impl FrameSink) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timer.as_mut() {
            if !timer.fire(now) {
                break;
            }
            self.step(sink);
            fired += 1;
        }
        fired
    }

    /// Time until the next tick, `None` when stopped.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.as_ref().map(|t| t.time_until_due(now))
    }

    /// Jump to `year` (looked up by value) and draw it. The timer is left alone.
    ///
    /// Unknown years are ignored and the last drawn frame stays on screen.
    pub fn set_year(&mut self, year: i32, sink: &mut impl FrameSink) -> bool {
        match self.seek(year) {
            Some(frame) => {
                sink.render(frame);
                true
            }
            None => false,
        }
    }

    /// Move to `year` without drawing, for a chart another control has already redrawn.
    /// The timer is left alone; unknown years are ignored.
    pub fn seek(&mut self, year: i32) -> Option<Frame> {
        match self.years.iter().position(|&y| y == year) {
            Some(index) => {
                self.index = index;
                Some(Frame { index, year })
            }
            None => {
                warn!("ignoring year {year}: not in the playback range");
                None
            }
        }
    }

    /// Replace the year list (after a reload). Stops playback and keeps the index in range.
    pub fn set_years(&mut self, years: Vec<i32>) {
        self.timer = None;
        self.years = years;
        self.index = self.index.min(self.years.len().saturating_sub(1));
    }
}
