//! Charts on x/y axes: lines, stacked area, stacked bars, horizontal races, Lorenz curve.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::BTreeSet;
use std::path::Path;

use super::text::{estimate_text_width_px, truncate_to_width};
use super::types::ChartOptions;
use super::util::{
    axis_title, axis_top, choose_axis_scale, compute_left_label_area_px, format_number,
    format_tick, office_color,
};
use super::{Panels, caption, name_color, plot_err, render};
use crate::models::{RaceBar, Series};
use crate::stats::LorenzCurve;
use crate::views::{StackFrame, StackedBars};

const MARGIN: u32 = 16;
const TICK_FONT: u32 = 12;
const DESC_FONT: u32 = 16;
const CAPTION_FONT: u32 = 24;
const Y_TICKS: usize = 10;

/// Scaled value axis: data are divided by `scale` before plotting.
struct ValueAxis {
    scale: f64,
    top: f64,
    title: String,
}

impl ValueAxis {
    fn for_max(max: f64) -> Self {
        let (scale, word) = choose_axis_scale(max);
        Self {
            scale,
            top: axis_top(max / scale),
            title: axis_title(word),
        }
    }
}

/// Year range for the x axis; a single year is widened by one on each side.
fn year_span(years: impl IntoIterator<Item = i32>) -> (f64, f64) {
    let (mut lo, mut hi) = (i32::MAX, i32::MIN);
    for y in years {
        lo = lo.min(y);
        hi = hi.max(y);
    }
    if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo as f64 - 1.0, hi as f64 + 1.0)
    } else {
        (lo as f64, hi as f64)
    }
}

fn builder_for<'a, 'b, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    title: &str,
    left_px: u32,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(MARGIN)
        .set_label_area_size(LabelAreaPosition::Left, left_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48);
    if !title.is_empty() {
        builder.caption(title, (FontFamily::SansSerif, CAPTION_FONT));
    }
    builder
}

fn year_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    y_desc: &str,
    span: f64,
    locale: &str,
) -> Result<()> {
    let x_fmt = |x: &f64| (x.round() as i32).to_string();
    let y_fmt = |v: &f64| format_tick(*v, locale);
    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_labels((span as usize + 1).min(12))
        .y_labels(Y_TICKS)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, TICK_FONT))
        .axis_desc_style((FontFamily::SansSerif, DESC_FONT))
        .draw()
        .map_err(plot_err)?;
    Ok(())
}

/// Multi-series line chart, one line per series in input order.
pub fn plot_series_lines<P: AsRef<Path>>(
    series: &[Series],
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_series_lines(
        root, series, opts
    ))
}

fn draw_series_lines<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &[Series],
    opts: &ChartOptions,
) -> Result<()> {
    let labels: Vec<String> = series.iter().map(|s| s.entity.clone()).collect();
    let panels = Panels::split(root, &labels, opts)?;
    let (x0, x1) = year_span(series.iter().flat_map(|s| s.points.iter().map(|p| p.year)));
    let axis = ValueAxis::for_max(series.iter().map(Series::max_value).fold(0.0, f64::max));
    let left = compute_left_label_area_px(0.0, axis.top, Y_TICKS, TICK_FONT, &opts.locale);

    let mut items = Vec::with_capacity(series.len());
    {
        let mut chart = builder_for(&panels.plot, &opts.title, left)
            .build_cartesian_2d(x0..x1, 0f64..axis.top)
            .map_err(plot_err)?;
        year_mesh(&mut chart, &axis.title, x1 - x0, &opts.locale)?;

        for (idx, s) in series.iter().enumerate() {
            let color = office_color(idx);
            let pts: Vec<(f64, f64)> = s
                .points
                .iter()
                .map(|p| (p.year as f64, p.value / axis.scale))
                .collect();
            chart
                .draw_series(LineSeries::new(pts.clone(), color.stroke_width(2)))
                .map_err(plot_err)?;
            chart
                .draw_series(pts.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))
                .map_err(plot_err)?;
            items.push((s.entity.clone(), color));
        }
    }
    panels.finish(&items)
}

/// Stacked area chart (streamgraph layers), first series at the bottom.
///
/// Negative values are drawn as 0; years missing from a series add nothing.
pub fn plot_stacked_area<P: AsRef<Path>>(
    series: &[Series],
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_stacked_area(
        root, series, opts
    ))
}

fn draw_stacked_area<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    series: &[Series],
    opts: &ChartOptions,
) -> Result<()> {
    let years: Vec<i32> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cum = vec![0.0f64; years.len()];
    let mut layers: Vec<(Vec<f64>, Vec<f64>)> = Vec::with_capacity(series.len());
    for s in series {
        let lower = cum.clone();
        for (i, y) in years.iter().enumerate() {
            cum[i] += s.value_for(*y).unwrap_or(0.0).max(0.0);
        }
        layers.push((lower, cum.clone()));
    }

    let labels: Vec<String> = series.iter().map(|s| s.entity.clone()).collect();
    let panels = Panels::split(root, &labels, opts)?;
    let (x0, x1) = year_span(years.iter().copied());
    let axis = ValueAxis::for_max(cum.iter().copied().fold(0.0, f64::max));
    let left = compute_left_label_area_px(0.0, axis.top, Y_TICKS, TICK_FONT, &opts.locale);

    let mut items = Vec::with_capacity(series.len());
    {
        let mut chart = builder_for(&panels.plot, &opts.title, left)
            .build_cartesian_2d(x0..x1, 0f64..axis.top)
            .map_err(plot_err)?;
        year_mesh(&mut chart, &axis.title, x1 - x0, &opts.locale)?;

        for (idx, (s, (lower, upper))) in series.iter().zip(&layers).enumerate() {
            let color = office_color(idx);
            let top: Vec<(f64, f64)> = years
                .iter()
                .zip(upper)
                .map(|(y, v)| (*y as f64, v / axis.scale))
                .collect();
            let mut poly: Vec<(f64, f64)> = years
                .iter()
                .zip(lower)
                .map(|(y, v)| (*y as f64, v / axis.scale))
                .collect();
            poly.extend(top.iter().rev().copied());

            chart
                .draw_series(std::iter::once(Polygon::new(poly, color.mix(0.75).filled())))
                .map_err(plot_err)?;
            chart
                .draw_series(std::iter::once(PathElement::new(top, color.stroke_width(1))))
                .map_err(plot_err)?;
            items.push((s.entity.clone(), color));
        }
    }
    panels.finish(&items)
}

/// Vertical stacked bars with the stack total printed above each bar.
pub fn plot_stacked_bars<P: AsRef<Path>>(
    bars: &StackedBars,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_stacked_bars(
        root, bars, opts
    ))
}

fn draw_stacked_bars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    bars: &StackedBars,
    opts: &ChartOptions,
) -> Result<()> {
    let panels = Panels::split(root, &bars.subgroups, opts)?;
    let n = bars.groups.len().max(1);
    let axis = ValueAxis::for_max(bars.max_total());
    let left = compute_left_label_area_px(0.0, axis.top, Y_TICKS, TICK_FONT, &opts.locale);
    let years = match bars.years.as_slice() {
        [] => None,
        [y] => Some(format!("({y})")),
        ys => Some(format!("({} years)", ys.len())),
    };
    let title = caption(&opts.title, years);

    let items: Vec<(String, RGBAColor)> = bars
        .subgroups
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), office_color(i)))
        .collect();
    {
        let mut chart = builder_for(&panels.plot, &title, left)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..axis.top)
            .map_err(plot_err)?;

        let groups = &bars.groups;
        let x_fmt = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => groups.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_fmt = |v: &f64| format_tick(*v, &opts.locale);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .y_labels(Y_TICKS)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .y_desc(axis.title.as_str())
            .label_style((FontFamily::SansSerif, TICK_FONT))
            .axis_desc_style((FontFamily::SansSerif, DESC_FONT))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(bars.segments.iter().filter_map(|s| {
                let i = groups.iter().position(|g| *g == s.group)?;
                let k = bars.subgroups.iter().position(|g| *g == s.subgroup)?;
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), s.start / axis.scale),
                        (SegmentValue::Exact(i + 1), s.end / axis.scale),
                    ],
                    office_color(k).filled(),
                );
                rect.set_margin(0, 0, 10, 10);
                Some(rect)
            }))
            .map_err(plot_err)?;

        let total_style = TextStyle::from((FontFamily::SansSerif, TICK_FONT))
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(
                bars.totals
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, t))| *t > 0.0)
                    .map(|(i, (_, t))| {
                        let v = *t / axis.scale;
                        Text::new(
                            format_tick(v, &opts.locale),
                            (SegmentValue::CenterOf(i), v),
                            total_style.clone(),
                        )
                    }),
            )
            .map_err(plot_err)?;
    }
    panels.finish(&items)
}

/// One horizontal bar piece in row coordinates (row 0 is the top row).
struct HBar {
    row: usize,
    start: f64,
    end: f64,
    color: RGBAColor,
}

/// Shared layout of the horizontal race charts.
struct HBarChart<'a> {
    rows: &'a [String],
    bars: Vec<HBar>,
    /// End-of-bar labels per row (the row's total).
    totals: Vec<(usize, f64)>,
    max: f64,
    title: String,
    legend: Vec<(String, RGBAColor)>,
}

fn draw_hbars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    layout: HBarChart<'_>,
    opts: &ChartOptions,
) -> Result<()> {
    let labels: Vec<String> = layout.legend.iter().map(|(l, _)| l.clone()).collect();
    let panels = Panels::split(root, &labels, opts)?;
    let n = layout.rows.len().max(1);
    let axis = ValueAxis::for_max(layout.max);

    let (w, _) = panels.plot.dim_in_pixel();
    let max_label_px = (w / 3).max(60);
    let left = layout
        .rows
        .iter()
        .map(|r| estimate_text_width_px(r, TICK_FONT) + 16)
        .max()
        .unwrap_or(60)
        .clamp(60, max_label_px);

    {
        let mut chart = builder_for(&panels.plot, &layout.title, left)
            .build_cartesian_2d(0f64..axis.top, (0..n).into_segmented())
            .map_err(plot_err)?;

        // Row 0 is drawn at the top.
        let flip = |row: usize| n - 1 - row.min(n - 1);
        let rows = layout.rows;
        let y_fmt = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(j) if *j < n => rows
                .get(flip(*j))
                .map(|s| truncate_to_width(s, TICK_FONT, left.saturating_sub(16)))
                .unwrap_or_default(),
            _ => String::new(),
        };
        let x_fmt = |v: &f64| format_tick(*v, &opts.locale);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .x_labels(8)
            .y_label_formatter(&y_fmt)
            .x_label_formatter(&x_fmt)
            .x_desc(axis.title.as_str())
            .label_style((FontFamily::SansSerif, TICK_FONT))
            .axis_desc_style((FontFamily::SansSerif, DESC_FONT))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(layout.bars.iter().map(|b| {
                let j = flip(b.row);
                let mut rect = Rectangle::new(
                    [
                        (b.start / axis.scale, SegmentValue::Exact(j)),
                        (b.end / axis.scale, SegmentValue::Exact(j + 1)),
                    ],
                    b.color.filled(),
                );
                rect.set_margin(4, 4, 0, 0);
                rect
            }))
            .map_err(plot_err)?;

        let value_style = TextStyle::from((FontFamily::SansSerif, TICK_FONT))
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart
            .draw_series(layout.totals.iter().map(|&(row, total)| {
                let v = total / axis.scale;
                Text::new(
                    format!(" {}", format_tick(v, &opts.locale)),
                    (v, SegmentValue::CenterOf(flip(row))),
                    value_style.clone(),
                )
            }))
            .map_err(plot_err)?;
    }
    panels.finish(&layout.legend)
}

/// One Asia bar race frame: a row per subregion, this frame's top industries stacked.
///
/// `max_total` fixes the value axis across frames (see
/// [`crate::views::subregion_max_total`]).
pub fn plot_horizontal_stack<P: AsRef<Path>>(
    frame: &StackFrame,
    max_total: f64,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    let bars = frame
        .segments
        .iter()
        .filter_map(|s| {
            Some(HBar {
                row: frame.groups.iter().position(|g| *g == s.group)?,
                start: s.start,
                end: s.end,
                color: name_color(&s.subgroup),
            })
        })
        .collect();
    let totals = frame
        .totals
        .iter()
        .enumerate()
        .map(|(row, (_, t))| (row, *t))
        .collect();
    let frame_max = frame.totals.iter().map(|(_, t)| *t).fold(0.0, f64::max);
    let layout = HBarChart {
        rows: &frame.groups,
        bars,
        totals,
        max: max_total.max(frame_max),
        title: caption(&opts.title, Some(frame.year.to_string())),
        legend: frame
            .subgroups
            .iter()
            .map(|s| (s.clone(), name_color(s)))
            .collect(),
    };
    render!(out_path.as_ref(), opts, |root| draw_hbars(
        root, layout, opts
    ))
}

/// One industry bar race frame: bars in the given (ranked) order, largest on top.
pub fn plot_race_frame<P: AsRef<Path>>(
    bars: &[RaceBar],
    year: i32,
    max_value: f64,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    let rows: Vec<String> = bars.iter().map(|b| b.industry.clone()).collect();
    let frame_max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    let layout = HBarChart {
        rows: &rows,
        bars: bars
            .iter()
            .enumerate()
            .map(|(row, b)| HBar {
                row,
                start: 0.0,
                end: b.value.max(0.0),
                color: name_color(&b.industry),
            })
            .collect(),
        totals: bars.iter().enumerate().map(|(row, b)| (row, b.value)).collect(),
        max: max_value.max(frame_max),
        title: caption(&opts.title, Some(year.to_string())),
        legend: Vec::new(),
    };
    render!(out_path.as_ref(), opts, |root| draw_hbars(
        root, layout, opts
    ))
}

/// Lorenz curve with the line of equality and the Gini coefficient.
pub fn plot_lorenz<P: AsRef<Path>>(
    curve: &LorenzCurve,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_lorenz(root, curve, opts))
}

fn draw_lorenz<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    curve: &LorenzCurve,
    opts: &ChartOptions,
) -> Result<()> {
    let panels = Panels::split(root, &[], opts)?;
    {
        let mut chart = builder_for(&panels.plot, &opts.title, 64)
            .build_cartesian_2d(0f64..1f64, 0f64..1f64)
            .map_err(plot_err)?;
        let pct = |v: &f64| format!("{:.0}%", v * 100.0);
        chart
            .configure_mesh()
            .x_desc("Cumulative share of regions")
            .y_desc("Cumulative share of emissions")
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&pct)
            .y_label_formatter(&pct)
            .label_style((FontFamily::SansSerif, TICK_FONT))
            .axis_desc_style((FontFamily::SansSerif, DESC_FONT))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(LineSeries::new(
                vec![(0.0, 0.0), (1.0, 1.0)],
                RGBColor(150, 150, 150).stroke_width(1),
            ))
            .map_err(plot_err)?;
        let color = office_color(0);
        chart
            .draw_series(
                AreaSeries::new(curve.points.iter().copied(), 0.0, color.mix(0.2).filled())
                    .border_style(color.stroke_width(2)),
            )
            .map_err(plot_err)?;

        let label_style = TextStyle::from((FontFamily::SansSerif, DESC_FONT))
            .pos(Pos::new(HPos::Left, VPos::Top));
        chart
            .draw_series(std::iter::once(Text::new(
                format!("Gini = {}", format_number(curve.gini, 3, &opts.locale)),
                (0.04, 0.96),
                label_style,
            )))
            .map_err(plot_err)?;
    }
    panels.finish(&[])
}
