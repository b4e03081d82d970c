use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

use super::text::{estimate_text_width_px, truncate_to_width};
use super::types::{ChartOptions, LegendMode};
use super::util::{format_tick, heat_color};
use super::{caption, plot_err, render};
use crate::views::Heatmap;

const TICK_FONT: u32 = 12;
const COLORBAR_W: u32 = 110;
const COLORBAR_STEPS: i32 = 64;

/// Industry x region heatmap.
///
/// Colours run from 0 to `color_max` (pass [`Heatmap::max_all_years`] to keep the scale
/// fixed during playback, or [`Heatmap::max`] for a single year). Zero cells are drawn
/// in a neutral grey.
pub fn plot_heatmap<P: AsRef<Path>>(
    hm: &Heatmap,
    color_max: f64,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_heatmap(
        root, hm, color_max, opts
    ))
}

fn draw_heatmap<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    hm: &Heatmap,
    color_max: f64,
    opts: &ChartOptions,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let (w, _) = root.dim_in_pixel();
    let (plot_area, bar_area) = match opts.legend {
        LegendMode::Right if w > COLORBAR_W * 2 => {
            let (p, b) = root.split_horizontally((w - COLORBAR_W) as i32);
            (p, Some(b))
        }
        _ => (root, None),
    };

    let cols = hm.columns.len().max(1);
    let rows = hm.rows.len().max(1);
    let left = hm
        .rows
        .iter()
        .map(|r| estimate_text_width_px(r, TICK_FONT) + 16)
        .max()
        .unwrap_or(60)
        .clamp(60, (w / 3).max(60));
    let title = caption(&opts.title, Some(hm.year.to_string()));

    {
        let mut builder = ChartBuilder::on(&plot_area);
        builder
            .margin(16u32)
            .set_label_area_size(LabelAreaPosition::Left, left)
            .set_label_area_size(LabelAreaPosition::Bottom, 40u32);
        if !title.is_empty() {
            builder.caption(title.as_str(), (FontFamily::SansSerif, 24));
        }
        let mut chart = builder
            .build_cartesian_2d((0..cols).into_segmented(), (0..rows).into_segmented())
            .map_err(plot_err)?;

        let flip = |r: usize| rows - 1 - r.min(rows - 1);
        let x_fmt = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(c) => hm.columns.get(*c).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_fmt = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(r) if *r < rows => hm
                .rows
                .get(flip(*r))
                .map(|s| truncate_to_width(s, TICK_FONT, left.saturating_sub(16)))
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols)
            .y_labels(rows)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .label_style((FontFamily::SansSerif, TICK_FONT))
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(hm.cells.iter().filter_map(|cell| {
                let c = hm.columns.iter().position(|x| *x == cell.column)?;
                let r = flip(hm.rows.iter().position(|x| *x == cell.row)?);
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(c), SegmentValue::Exact(r)),
                        (SegmentValue::Exact(c + 1), SegmentValue::Exact(r + 1)),
                    ],
                    heat_color(cell.value, color_max).filled(),
                );
                rect.set_margin(1, 1, 1, 1);
                Some(rect)
            }))
            .map_err(plot_err)?;
    }

    if let Some(ref bar) = bar_area {
        draw_colorbar(bar, color_max, &opts.locale)?;
        bar.present().map_err(plot_err)?;
    }
    plot_area.present().map_err(plot_err)?;
    Ok(())
}

/// Vertical colour ramp with its 0 and max labels.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    max: f64,
    locale: &str,
) -> Result<()> {
    area.fill(&WHITE).map_err(plot_err)?;
    let (_, h) = area.dim_in_pixel();
    let top = 60;
    let bottom = (h as i32 - 60).max(top + COLORBAR_STEPS);
    let (x0, x1) = (12, 30);
    let step_h = (bottom - top) as f64 / COLORBAR_STEPS as f64;
    let domain = if max > 0.0 { max } else { 1.0 };

    for i in 0..COLORBAR_STEPS {
        // Top of the bar is the maximum.
        let t = 1.0 - (i as f64 + 0.5) / COLORBAR_STEPS as f64;
        let y0 = top + (i as f64 * step_h).floor() as i32;
        let y1 = top + ((i + 1) as f64 * step_h).ceil() as i32;
        area.draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            heat_color(t * domain, domain).filled(),
        ))
        .map_err(plot_err)?;
    }

    let style = TextStyle::from((FontFamily::SansSerif, TICK_FONT))
        .pos(Pos::new(HPos::Left, VPos::Center));
    area.draw(&Text::new(format_tick(domain, locale), (x1 + 6, top), style.clone()))
        .map_err(plot_err)?;
    area.draw(&Text::new(format_tick(0.0, locale), (x1 + 6, bottom), style))
        .map_err(plot_err)?;
    Ok(())
}
