/*!
 * Desktop viewer for ghg-rs - interactive greenhouse-gas emissions charts
 *
 * - Continent line chart for a selectable gas type
 * - Global year slider (auto-play wraps around) driving the industry x subregion
 *   heatmap and the Asian subregion bar chart
 * - Race tabs, each with its own play/pause control: top industries per Asian
 *   subregion (picks up the slider year), radial subregion race, and the industry
 *   bar race from the long-form table
 * - Hover tooltips kept inside the window
 *
 * Usage: `ghg-gui [path/to/emissions.csv] [path/to/industry_emissions.csv]`
 * (defaults `data/emissions.csv` and `data/industry_emissions.csv`, or `$GHG_DATA`
 * and `$GHG_INDUSTRY_DATA` when set).
 */

use eframe::egui;
use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};
use ghg_rs::config::{FrameTiming, Presets};
use ghg_rs::load::{Dataset, industry_years, load_industry_csv, load_wide_csv};
use ghg_rs::models::{IndustryRecord, RaceBar, Series};
use ghg_rs::playback::{Frame, PlaybackController};
use ghg_rs::tooltip::{Point, Size, clamp_tooltip};
use ghg_rs::views::{self, Heatmap, StackFrame};
use ghg_rs::viz::text::{estimate_text_width_px, truncate_to_width};
use ghg_rs::viz::util::{axis_top, format_number, heat_rgb, name_slot, office_rgb};
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

const CHART_HEIGHT: f32 = 280.0;
const PAD_LEFT: f32 = 64.0;
const PAD: f32 = 24.0;
const HEAT_LABEL_W: f32 = 210.0;
const HEAT_ROW_H: f32 = 22.0;
const BAR_LABEL_W: f32 = 150.0;
const BAR_ROW_H: f32 = 30.0;
const RACE_ROW_H: f32 = 24.0;
const RADIAL_SIZE: f32 = 520.0;
const RADIAL_INNER: f32 = 50.0;
const RADIAL_PAD_ANGLE: f32 = 0.02;
const ARC_STEPS: usize = 24;
const FONT_PX: u32 = 12;
const TOOLTIP_FONT_PX: u32 = 13;
const TOOLTIP_LINE_H: f64 = 18.0;
const TOOLTIP_PAD: f64 = 8.0;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let arg_path = |n: usize, var: &str, default: &str| {
        std::env::args_os()
            .nth(n)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(var).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default))
    };
    let data_path = arg_path(1, "GHG_DATA", "data/emissions.csv");
    let industry_path = arg_path(2, "GHG_INDUSTRY_DATA", "data/industry_emissions.csv");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Greenhouse-gas emissions - ghg-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "GHG Emissions",
        options,
        Box::new(move |_cc| Ok(Box::new(GhgApp::new(data_path, industry_path)))),
    )
}

/// Result of a background CSV load.
enum LoadOutcome {
    /// The industry table is optional: when it cannot be read its race stays empty.
    Loaded(Dataset, Vec<IndustryRecord>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RaceTab {
    AsiaBars,
    Radial,
    Industry,
}

/// Dataset plus the chart slices currently on screen.
struct Loaded {
    ds: Dataset,
    gases: Vec<String>,
    lines_gas: String,
    lines: Vec<Series>,
    slider_year: i32,
    heatmap: Option<Heatmap>,
    asia: Option<StackFrame>,
    /// Fixed bar axis so the race does not rescale between years.
    asia_axis: f64,
    radial: Option<StackFrame>,
    industry: Vec<IndustryRecord>,
    industry_bars: Option<(i32, Vec<RaceBar>)>,
    industry_axis: f64,
}

impl Loaded {
    fn new(ds: Dataset, industry: Vec<IndustryRecord>, presets: &Presets, gas: &str) -> Self {
        let gases = ds.gas_types();
        let lines = views::continent_series(&ds, presets, gas);
        let asia_axis = views::subregion_max_total(&ds, presets);
        let slider_year = ds.last_year().unwrap_or_default();
        let industry_axis = views::race_max(&industry);
        Self {
            gases,
            lines_gas: gas.to_string(),
            lines,
            slider_year,
            heatmap: None,
            asia: None,
            asia_axis,
            radial: None,
            industry,
            industry_bars: None,
            industry_axis,
            ds,
        }
    }

    /// Year picked on the global slider: heatmap and Asia bars follow it.
    fn show_slider_year(&mut self, presets: &Presets, year: i32) {
        self.slider_year = year;
        if let Some(hm) = views::subregion_heatmap(&self.ds, presets, year, true) {
            self.heatmap = Some(hm);
        }
        self.show_asia_year(presets, year);
    }

    fn show_asia_year(&mut self, presets: &Presets, year: i32) {
        if let Some(frame) = views::asia_bar_frame(&self.ds, presets, year) {
            self.asia = Some(frame);
        }
    }

    fn show_radial_year(&mut self, presets: &Presets, year: i32) {
        if let Some(frame) = views::radial_frame(&self.ds, presets, year) {
            self.radial = Some(frame);
        }
    }

    fn show_industry_year(&mut self, year: i32) {
        if let Some(bars) = views::race_frame(&self.industry, year) {
            self.industry_bars = Some((year, bars));
        }
    }
}

/// Text shown next to the pointer.
struct Hover {
    anchor: Pos2,
    lines: Vec<String>,
}

struct GhgApp {
    data_path: PathBuf,
    industry_path: PathBuf,
    presets: Presets,
    gas: String,
    data: Option<Loaded>,

    slider: PlaybackController,
    race_tab: RaceTab,
    asia_race: PlaybackController,
    radial_race: PlaybackController,
    industry_race: PlaybackController,

    is_loading: bool,
    error_message: String,
    load_receiver: Option<mpsc::Receiver<LoadOutcome>>,
    hover: Option<Hover>,
}

impl GhgApp {
    fn new(data_path: PathBuf, industry_path: PathBuf) -> Self {
        let presets = Presets::default();
        let mut app = Self {
            data_path: data_path.clone(),
            industry_path,
            gas: presets.default_gas.clone(),
            presets,
            data: None,
            slider: PlaybackController::slider(Vec::new(), FrameTiming::SLIDER),
            race_tab: RaceTab::AsiaBars,
            asia_race: PlaybackController::race(Vec::new(), FrameTiming::ASIA_BAR),
            radial_race: PlaybackController::race(Vec::new(), FrameTiming::RADIAL),
            industry_race: PlaybackController::race(Vec::new(), FrameTiming::RACE),
            is_loading: false,
            error_message: String::new(),
            load_receiver: None,
            hover: None,
        };
        app.start_load(data_path);
        app
    }

    fn start_load(&mut self, path: PathBuf) {
        let (sender, receiver) = mpsc::channel();
        self.data_path = path.clone();
        self.load_receiver = Some(receiver);
        self.is_loading = true;
        self.error_message.clear();
        log::info!("loading {}", path.display());
        let industry_path = self.industry_path.clone();

        thread::spawn(move || {
            let outcome = match load_wide_csv(&path) {
                Ok(ds) => {
                    let industry = load_industry_csv(&industry_path).unwrap_or_else(|e| {
                        log::warn!("industry race disabled: {e}");
                        Vec::new()
                    });
                    LoadOutcome::Loaded(ds, industry)
                }
                Err(e) => LoadOutcome::Failed(e.to_string()),
            };
            let _ = sender.send(outcome);
        });
    }

    fn check_load_result(&mut self) {
        if let Some(receiver) = &self.load_receiver
            && let Ok(outcome) = receiver.try_recv()
        {
            self.is_loading = false;
            self.load_receiver = None;
            match outcome {
                LoadOutcome::Loaded(ds, industry) => self.install(ds, industry),
                LoadOutcome::Failed(msg) => {
                    log::error!("load failed: {msg}");
                    self.data = None;
                    self.error_message = format!("Could not load data: {msg}");
                }
            }
        }
    }

    fn install(&mut self, ds: Dataset, industry: Vec<IndustryRecord>) {
        let years = ds.years.clone();
        let race_years = industry_years(&industry);
        self.slider.set_years(years.clone());
        self.asia_race.set_years(years.clone());
        self.radial_race.set_years(years.clone());
        self.industry_race.set_years(race_years.clone());

        let mut loaded = Loaded::new(ds, industry, &self.presets, &self.gas);
        let start = loaded.slider_year;
        let mut shown = None;
        self.slider
            .set_year(start, &mut |f: Frame| shown = Some(f.year));
        if let Some(year) = shown {
            self.asia_race.seek(year);
            loaded.show_slider_year(&self.presets, year);
        }
        // The other races open on their first year.
        if let Some(frame) = years.first().and_then(|&y| self.radial_race.seek(y)) {
            loaded.show_radial_year(&self.presets, frame.year);
        }
        if let Some(frame) = race_years.first().and_then(|&y| self.industry_race.seek(y)) {
            loaded.show_industry_year(frame.year);
        }
        self.data = Some(loaded);
    }

    /// Run due ticks of every controller and apply the frames they produced.
    ///
    /// Slider frames also move the Asia race, so a later "Play race" continues
    /// from the year on screen.
    fn tick(&mut self, now: Instant) {
        let mut slider_year = None;
        self.slider
            .poll(now, &mut |f: Frame| slider_year = Some(f.year));
        if let Some(year) = slider_year {
            self.asia_race.seek(year);
        }
        let mut asia_year = None;
        self.asia_race
            .poll(now, &mut |f: Frame| asia_year = Some(f.year));
        let mut radial_year = None;
        self.radial_race
            .poll(now, &mut |f: Frame| radial_year = Some(f.year));
        let mut industry_year = None;
        self.industry_race
            .poll(now, &mut |f: Frame| industry_year = Some(f.year));

        let Some(data) = self.data.as_mut() else {
            return;
        };
        if let Some(year) = slider_year {
            data.show_slider_year(&self.presets, year);
        }
        if let Some(year) = asia_year {
            data.show_asia_year(&self.presets, year);
        }
        if let Some(year) = radial_year {
            data.show_radial_year(&self.presets, year);
        }
        if let Some(year) = industry_year {
            data.show_industry_year(year);
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.label("Data:");
            ui.monospace(self.data_path.display().to_string());
            if ui.button("Open CSV…").clicked() {
                let mut dialog = rfd::FileDialog::new().add_filter("CSV", &["csv"]);
                if let Some(home) = dirs::home_dir() {
                    dialog = dialog.set_directory(home);
                }
                if let Some(path) = dialog.pick_file() {
                    self.start_load(path);
                }
            }
            if self.is_loading {
                ui.spinner();
                ui.label("Loading…");
            }
        });

        if !self.error_message.is_empty() {
            ui.colored_label(Color32::RED, &self.error_message);
        }

        let Some(data) = self.data.as_mut() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label("Gas type:");
            egui::ComboBox::from_label("")
                .selected_text(self.gas.clone())
                .show_ui(ui, |ui| {
                    for gas in &data.gases {
                        ui.selectable_value(&mut self.gas, gas.clone(), gas.as_str());
                    }
                });
        });
        if data.lines_gas != self.gas {
            data.lines = views::continent_series(&data.ds, &self.presets, &self.gas);
            data.lines_gas = self.gas.clone();
        }

        let Some((first, last)) = data.ds.year_range() else {
            return;
        };
        let mut picked = None;
        ui.horizontal(|ui| {
            let label = if self.slider.is_running() { "⏸ Pause" } else { "▶ Play" };
            if ui.button(label).clicked() {
                if self.slider.is_running() {
                    self.slider.pause();
                } else {
                    self.slider
                        .play(now, &mut |f: Frame| picked = Some(f.year));
                }
            }
            let mut year = data.slider_year;
            let slider = egui::Slider::new(&mut year, first..=last).text("Year");
            if ui.add(slider).changed() {
                self.slider
                    .set_year(year, &mut |f: Frame| picked = Some(f.year));
            }
        });
        if let Some(year) = picked {
            self.asia_race.seek(year);
            data.show_slider_year(&self.presets, year);
        }
    }

    fn charts_ui(&mut self, ui: &mut egui::Ui, now: Instant) {
        self.hover = None;
        let Some(data) = self.data.as_mut() else {
            if !self.is_loading {
                ui.label("No data loaded.");
            }
            return;
        };

        ui.heading(format!("Emissions by continent ({})", data.lines_gas));
        draw_lines(ui, &data.lines, &mut self.hover);
        ui.add_space(12.0);

        ui.heading(format!(
            "{} by industry and subregion, {}",
            self.presets.focus_gas, data.slider_year
        ));
        match &data.heatmap {
            Some(hm) => draw_heatmap(ui, hm, &mut self.hover),
            None => {
                ui.label("No heatmap for this year.");
            }
        }
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.race_tab, RaceTab::AsiaBars, "Asia top industries");
            ui.selectable_value(&mut self.race_tab, RaceTab::Radial, "Radial subregions");
            ui.selectable_value(&mut self.race_tab, RaceTab::Industry, "Industry race");
        });

        match self.race_tab {
            RaceTab::AsiaBars => {
                let year = data.asia.as_ref().map(|f| f.year).unwrap_or(data.slider_year);
                let played = ui
                    .horizontal(|ui| {
                        ui.heading(format!("Top industries by Asian subregion, {year}"));
                        race_button(ui, &mut self.asia_race, now)
                    })
                    .inner;
                if let Some(year) = played {
                    data.show_asia_year(&self.presets, year);
                }
                if let Some(frame) = &data.asia {
                    draw_hbars(ui, frame, data.asia_axis, &mut self.hover);
                }
            }
            RaceTab::Radial => {
                let heading = match &data.radial {
                    Some(f) => format!("Asian subregions by industry, {}", f.year),
                    None => "Asian subregions by industry".to_string(),
                };
                let played = ui
                    .horizontal(|ui| {
                        ui.heading(heading);
                        race_button(ui, &mut self.radial_race, now)
                    })
                    .inner;
                if let Some(year) = played {
                    data.show_radial_year(&self.presets, year);
                }
                if let Some(frame) = &data.radial {
                    draw_radial(ui, frame, data.asia_axis, &mut self.hover);
                }
            }
            RaceTab::Industry => {
                if data.industry.is_empty() {
                    ui.label(format!(
                        "No industry table loaded from {}.",
                        self.industry_path.display()
                    ));
                    return;
                }
                let heading = match &data.industry_bars {
                    Some((year, _)) => format!("Emissions by industry, {year}"),
                    None => "Emissions by industry".to_string(),
                };
                let played = ui
                    .horizontal(|ui| {
                        ui.heading(heading);
                        race_button(ui, &mut self.industry_race, now)
                    })
                    .inner;
                if let Some(year) = played {
                    data.show_industry_year(year);
                }
                if let Some((_, bars)) = &data.industry_bars {
                    draw_race_bars(ui, bars, data.industry_axis, &mut self.hover);
                }
            }
        }
    }

    fn show_tooltip(&self, ctx: &egui::Context) {
        let Some(hover) = &self.hover else {
            return;
        };
        let text_w = hover
            .lines
            .iter()
            .map(|l| estimate_text_width_px(l, TOOLTIP_FONT_PX))
            .max()
            .unwrap_or(0);
        let tip = Size::new(
            text_w as f64 + 2.0 * TOOLTIP_PAD,
            hover.lines.len() as f64 * TOOLTIP_LINE_H + 2.0 * TOOLTIP_PAD,
        );
        let screen = ctx.screen_rect();
        let pos = clamp_tooltip(
            Point::new(hover.anchor.x as f64, hover.anchor.y as f64),
            tip,
            Size::new(screen.width() as f64, screen.height() as f64),
        );

        egui::Area::new(egui::Id::new("chart_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(egui::pos2(pos.x as f32, pos.y as f32))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for (i, line) in hover.lines.iter().enumerate() {
                        if i == 0 {
                            ui.strong(line.as_str());
                        } else {
                            ui.label(line.as_str());
                        }
                    }
                });
            });
    }
}

impl eframe::App for GhgApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();
        let now = Instant::now();
        self.tick(now);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls_ui(ui, now);
            ui.add_space(4.0);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.charts_ui(ui, now));
        });
        self.show_tooltip(ctx);

        if self.is_loading {
            ctx.request_repaint();
        } else if let Some(wait) = [
            self.slider.time_until_next_tick(now),
            self.asia_race.time_until_next_tick(now),
            self.radial_race.time_until_next_tick(now),
            self.industry_race.time_until_next_tick(now),
        ]
        .into_iter()
        .flatten()
        .min()
        {
            ctx.request_repaint_after(wait);
        }
    }
}

/// Play/pause toggle for one race; returns the year drawn when playback starts.
fn race_button(ui: &mut egui::Ui, race: &mut PlaybackController, now: Instant) -> Option<i32> {
    let mut shown = None;
    let label = if race.is_running() { "⏸ Pause race" } else { "▶ Play race" };
    if ui.button(label).clicked() {
        if race.is_running() {
            race.pause();
        } else {
            race.play(now, &mut |f: Frame| shown = Some(f.year));
        }
    }
    shown
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn font() -> FontId {
    FontId::proportional(FONT_PX as f32)
}

fn fmt(v: f64) -> String {
    format_number(v, 2, "en")
}

/// Linear data-to-screen mapping for a value chart.
struct Mapper {
    rect: Rect,
    x0: f64,
    x1: f64,
    y_max: f64,
}

impl Mapper {
    fn x(&self, v: f64) -> f32 {
        let span = self.x1 - self.x0;
        let t = if span > 0.0 { (v - self.x0) / span } else { 0.5 };
        self.rect.left() + self.rect.width() * t as f32
    }

    fn y(&self, v: f64) -> f32 {
        self.rect.bottom() - self.rect.height() * (v / self.y_max) as f32
    }
}

fn draw_lines(ui: &mut egui::Ui, series: &[Series], hover: &mut Option<Hover>) {
    let size = egui::vec2(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);
    let rect = Rect::from_min_max(
        response.rect.min + egui::vec2(PAD_LEFT, PAD + 8.0),
        response.rect.max - egui::vec2(PAD, PAD),
    );

    let years: Vec<i32> = series
        .first()
        .map(|s| s.points.iter().map(|p| p.year).collect())
        .unwrap_or_default();
    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        painter.text(rect.center(), Align2::CENTER_CENTER, "No data", font(), Color32::GRAY);
        return;
    };
    let map = Mapper {
        rect,
        x0: first as f64,
        x1: last as f64,
        y_max: axis_top(series.iter().map(Series::max_value).fold(0.0, f64::max)),
    };

    let grid = Stroke::new(1.0, Color32::from_gray(225));
    for k in 0..=4 {
        let v = map.y_max * k as f64 / 4.0;
        let y = map.y(v);
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], grid);
        painter.text(
            egui::pos2(rect.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format_number(v, 0, "en"),
            font(),
            Color32::DARK_GRAY,
        );
    }
    for year in [first, last] {
        painter.text(
            egui::pos2(map.x(year as f64), rect.bottom() + 4.0),
            Align2::CENTER_TOP,
            year.to_string(),
            font(),
            Color32::DARK_GRAY,
        );
    }

    let mut legend_x = rect.left();
    for (i, s) in series.iter().enumerate() {
        let color = rgb(office_rgb(i));
        let pts: Vec<Pos2> = s
            .points
            .iter()
            .map(|p| egui::pos2(map.x(p.year as f64), map.y(p.value)))
            .collect();
        painter.add(Shape::line(pts, Stroke::new(2.0, color)));

        let swatch = Rect::from_min_size(
            egui::pos2(legend_x, response.rect.top() + 8.0),
            egui::vec2(10.0, 10.0),
        );
        painter.rect_filled(swatch, 0.0, color);
        painter.text(
            swatch.right_center() + egui::vec2(4.0, 0.0),
            Align2::LEFT_CENTER,
            &s.entity,
            font(),
            Color32::BLACK,
        );
        legend_x += 22.0 + estimate_text_width_px(&s.entity, FONT_PX) as f32;
    }

    if let Some(pos) = response.hover_pos()
        && rect.expand(4.0).contains(pos)
    {
        let t = ((pos.x - rect.left()) / rect.width()).clamp(0.0, 1.0);
        let idx = (t * (years.len() - 1) as f32).round() as usize;
        let year = years[idx.min(years.len() - 1)];
        let x = map.x(year as f64);
        painter.line_segment(
            [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::GRAY),
        );
        let mut lines = vec![year.to_string()];
        lines.extend(
            series
                .iter()
                .map(|s| format!("{}: {}", s.entity, fmt(s.value_for(year).unwrap_or(0.0)))),
        );
        *hover = Some(Hover { anchor: pos, lines });
    }
}

fn draw_heatmap(ui: &mut egui::Ui, hm: &Heatmap, hover: &mut Option<Hover>) {
    let cols = hm.columns.len();
    let height = PAD + hm.rows.len() as f32 * HEAT_ROW_H + 8.0;
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::hover());
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);
    if cols == 0 || hm.rows.is_empty() {
        return;
    }

    let left = response.rect.left() + HEAT_LABEL_W;
    let top = response.rect.top() + PAD;
    let cell_w = (response.rect.right() - left - 8.0).max(cols as f32) / cols as f32;

    for (c, name) in hm.columns.iter().enumerate() {
        painter.text(
            egui::pos2(left + (c as f32 + 0.5) * cell_w, top - 4.0),
            Align2::CENTER_BOTTOM,
            truncate_to_width(name, FONT_PX, cell_w as u32),
            font(),
            Color32::BLACK,
        );
    }
    for (r, name) in hm.rows.iter().enumerate() {
        painter.text(
            egui::pos2(left - 6.0, top + (r as f32 + 0.5) * HEAT_ROW_H),
            Align2::RIGHT_CENTER,
            truncate_to_width(name, FONT_PX, HEAT_LABEL_W as u32 - 12),
            font(),
            Color32::BLACK,
        );
    }

    let pointer = response.hover_pos();
    for (k, cell) in hm.cells.iter().enumerate() {
        let (r, c) = (k / cols, k % cols);
        let rect = Rect::from_min_size(
            egui::pos2(left + c as f32 * cell_w, top + r as f32 * HEAT_ROW_H),
            egui::vec2(cell_w, HEAT_ROW_H),
        )
        .shrink(0.5);
        painter.rect_filled(rect, 0.0, rgb(heat_rgb(cell.value, hm.max_all_years)));
        if let Some(pos) = pointer
            && rect.contains(pos)
        {
            painter.rect_stroke(rect, 0.0, Stroke::new(1.5, Color32::BLACK));
            *hover = Some(Hover {
                anchor: pos,
                lines: vec![
                    cell.row.clone(),
                    format!("{}: {}", cell.column, fmt(cell.value)),
                ],
            });
        }
    }
}

fn draw_hbars(ui: &mut egui::Ui, frame: &StackFrame, axis_max: f64, hover: &mut Option<Hover>) {
    let height = PAD + frame.groups.len() as f32 * BAR_ROW_H + 8.0;
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::hover());
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);

    let left = response.rect.left() + BAR_LABEL_W;
    let top = response.rect.top() + PAD;
    let width = (response.rect.right() - left - 90.0).max(1.0);
    let max = axis_top(axis_max.max(frame.totals.iter().map(|(_, t)| *t).fold(0.0, f64::max)));
    let to_x = |v: f64| left + width * (v / max) as f32;

    let mut legend_x = left;
    for name in &frame.subgroups {
        let swatch = Rect::from_min_size(
            egui::pos2(legend_x, response.rect.top() + 6.0),
            egui::vec2(10.0, 10.0),
        );
        painter.rect_filled(swatch, 0.0, rgb(office_rgb(name_slot(name))));
        painter.text(
            swatch.right_center() + egui::vec2(4.0, 0.0),
            Align2::LEFT_CENTER,
            name,
            font(),
            Color32::BLACK,
        );
        legend_x += 22.0 + estimate_text_width_px(name, FONT_PX) as f32;
    }

    let pointer = response.hover_pos();
    for (r, group) in frame.groups.iter().enumerate() {
        let y0 = top + r as f32 * BAR_ROW_H + 4.0;
        let y1 = y0 + BAR_ROW_H - 8.0;
        painter.text(
            egui::pos2(left - 6.0, (y0 + y1) / 2.0),
            Align2::RIGHT_CENTER,
            truncate_to_width(group, FONT_PX, BAR_LABEL_W as u32 - 12),
            font(),
            Color32::BLACK,
        );
        for s in frame.segments.iter().filter(|s| s.group == *group) {
            let rect = Rect::from_min_max(egui::pos2(to_x(s.start), y0), egui::pos2(to_x(s.end), y1));
            painter.rect_filled(rect, 0.0, rgb(office_rgb(name_slot(&s.subgroup))));
            if let Some(pos) = pointer
                && rect.contains(pos)
            {
                *hover = Some(Hover {
                    anchor: pos,
                    lines: vec![s.subgroup.clone(), format!("{}: {}", s.group, fmt(s.value))],
                });
            }
        }
        let total = frame
            .totals
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, t)| *t)
            .unwrap_or(0.0);
        painter.text(
            egui::pos2(to_x(total) + 6.0, (y0 + y1) / 2.0),
            Align2::LEFT_CENTER,
            fmt(total),
            font(),
            Color32::DARK_GRAY,
        );
    }
}

fn draw_race_bars(ui: &mut egui::Ui, bars: &[RaceBar], axis_max: f64, hover: &mut Option<Hover>) {
    let height = bars.len() as f32 * RACE_ROW_H + 8.0;
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), Sense::hover());
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);

    let left = response.rect.left() + BAR_LABEL_W + 60.0;
    let top = response.rect.top() + 4.0;
    let width = (response.rect.right() - left - 90.0).max(1.0);
    let max = axis_top(axis_max.max(bars.iter().map(|b| b.value).fold(0.0, f64::max)));
    let to_x = |v: f64| left + width * (v.max(0.0) / max) as f32;

    let pointer = response.hover_pos();
    for (r, bar) in bars.iter().enumerate() {
        let y0 = top + r as f32 * RACE_ROW_H + 2.0;
        let y1 = y0 + RACE_ROW_H - 4.0;
        let mid = (y0 + y1) / 2.0;
        painter.text(
            egui::pos2(left - 6.0, mid),
            Align2::RIGHT_CENTER,
            truncate_to_width(&bar.industry, FONT_PX, BAR_LABEL_W as u32 + 48),
            font(),
            Color32::BLACK,
        );
        let rect = Rect::from_min_max(egui::pos2(left, y0), egui::pos2(to_x(bar.value), y1));
        painter.rect_filled(rect, 0.0, rgb(office_rgb(name_slot(&bar.industry))));
        painter.text(
            egui::pos2(rect.right() + 6.0, mid),
            Align2::LEFT_CENTER,
            fmt(bar.value),
            font(),
            Color32::DARK_GRAY,
        );
        if let Some(pos) = pointer
            && rect.contains(pos)
        {
            *hover = Some(Hover {
                anchor: pos,
                lines: vec![bar.industry.clone(), fmt(bar.value)],
            });
        }
    }
}

/// Annular sector, angle 0 pointing up and growing clockwise.
fn sector(center: Pos2, r0: f32, r1: f32, a0: f32, a1: f32) -> Vec<Pos2> {
    let at = |r: f32, a: f32| egui::pos2(center.x + r * a.sin(), center.y - r * a.cos());
    let mut pts = Vec::with_capacity(2 * (ARC_STEPS + 1));
    for k in 0..=ARC_STEPS {
        pts.push(at(r1, a0 + (a1 - a0) * k as f32 / ARC_STEPS as f32));
    }
    for k in (0..=ARC_STEPS).rev() {
        pts.push(at(r0, a0 + (a1 - a0) * k as f32 / ARC_STEPS as f32));
    }
    pts
}

fn draw_radial(ui: &mut egui::Ui, frame: &StackFrame, axis_max: f64, hover: &mut Option<Hover>) {
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), RADIAL_SIZE), Sense::hover());
    painter.rect_filled(response.rect, 0.0, Color32::WHITE);

    let center = response.rect.center();
    let outer = (response.rect.width().min(response.rect.height()) / 2.0 - 40.0)
        .max(RADIAL_INNER + 10.0);
    let max = axis_top(axis_max.max(frame.totals.iter().map(|(_, t)| *t).fold(0.0, f64::max)));
    let radius = |v: f64| RADIAL_INNER + (outer - RADIAL_INNER) * (v / max).clamp(0.0, 1.0) as f32;

    let grid = Stroke::new(1.0, Color32::from_gray(215));
    for k in 1..=4 {
        let v = max * k as f64 / 4.0;
        painter.circle_stroke(center, radius(v), grid);
        painter.text(
            egui::pos2(center.x + 3.0, center.y - radius(v)),
            Align2::LEFT_BOTTOM,
            format_number(v, 0, "en"),
            font(),
            Color32::GRAY,
        );
    }

    let band = TAU / frame.groups.len().max(1) as f32;
    let pointer = response.hover_pos().map(|p| {
        let d = p - center;
        (p, d.length(), d.x.atan2(-d.y).rem_euclid(TAU))
    });
    for s in &frame.segments {
        let Some(g) = frame.groups.iter().position(|x| *x == s.group) else {
            continue;
        };
        let a0 = g as f32 * band + RADIAL_PAD_ANGLE;
        let a1 = (g + 1) as f32 * band - RADIAL_PAD_ANGLE;
        let (r0, r1) = (radius(s.start), radius(s.end));
        let color = rgb(office_rgb(name_slot(&s.subgroup)));
        // Sectors are concave, so each one is filled as a strip of convex pieces.
        let pts = sector(center, r0, r1, a0, a1);
        let n = ARC_STEPS + 1;
        for k in 0..ARC_STEPS {
            let quad = vec![pts[k], pts[k + 1], pts[2 * n - k - 2], pts[2 * n - k - 1]];
            painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
        }
        if let Some((pos, dist, angle)) = pointer
            && (r0..=r1).contains(&dist)
            && (a0..=a1).contains(&angle)
        {
            painter.add(Shape::closed_line(pts, Stroke::new(1.5, Color32::BLACK)));
            *hover = Some(Hover {
                anchor: pos,
                lines: vec![s.subgroup.clone(), format!("{}: {}", s.group, fmt(s.value))],
            });
        }
    }

    for (g, name) in frame.groups.iter().enumerate() {
        let mid = (g as f32 + 0.5) * band;
        let r = outer + 22.0;
        painter.text(
            egui::pos2(center.x + r * mid.sin(), center.y - r * mid.cos()),
            Align2::CENTER_CENTER,
            name,
            font(),
            Color32::BLACK,
        );
    }
    painter.text(
        center,
        Align2::CENTER_CENTER,
        frame.year.to_string(),
        FontId::proportional(24.0),
        Color32::DARK_GRAY,
    );
}
