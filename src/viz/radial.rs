use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::TAU;
use std::path::Path;

use super::types::ChartOptions;
use super::util::{format_tick, office_color};
use super::{Panels, caption, plot_err, render};
use crate::views::StackFrame;

const INNER_RADIUS: f64 = 50.0;
const PAD_ANGLE: f64 = 0.02;
const ARC_STEPS: usize = 32;
const GRID_RINGS: usize = 4;

/// Polar layout: angle 0 points up and grows clockwise.
struct Polar {
    cx: f64,
    cy: f64,
    inner: f64,
    outer: f64,
    max: f64,
}

impl Polar {
    fn radius(&self, v: f64) -> f64 {
        self.inner + (self.outer - self.inner) * (v / self.max).clamp(0.0, 1.0)
    }

    fn point(&self, r: f64, angle: f64) -> (i32, i32) {
        (
            (self.cx + r * angle.sin()).round() as i32,
            (self.cy - r * angle.cos()).round() as i32,
        )
    }

    /// Annular sector between radii `r0..r1` and angles `a0..a1`.
    fn sector(&self, r0: f64, r1: f64, a0: f64, a1: f64) -> Vec<(i32, i32)> {
        let mut pts = Vec::with_capacity(2 * (ARC_STEPS + 1));
        for k in 0..=ARC_STEPS {
            let a = a0 + (a1 - a0) * k as f64 / ARC_STEPS as f64;
            pts.push(self.point(r1, a));
        }
        for k in (0..=ARC_STEPS).rev() {
            let a = a0 + (a1 - a0) * k as f64 / ARC_STEPS as f64;
            pts.push(self.point(r0, a));
        }
        pts
    }
}

/// Radial stacked bars: one angular band per group, stacked outward from an inner hole.
///
/// `max_total` fixes the radius scale across frames.
pub fn plot_radial<P: AsRef<Path>>(
    frame: &StackFrame,
    max_total: f64,
    out_path: P,
    opts: &ChartOptions,
) -> Result<()> {
    render!(out_path.as_ref(), opts, |root| draw_radial(
        root, frame, max_total, opts
    ))
}

fn draw_radial<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    frame: &StackFrame,
    max_total: f64,
    opts: &ChartOptions,
) -> Result<()> {
    let panels = Panels::split(root, &frame.subgroups, opts)?;
    let area = &panels.plot;
    let (w, h) = area.dim_in_pixel();

    let title = caption(&opts.title, None);
    let top_pad = if title.is_empty() { 0.0 } else { 36.0 };
    if !title.is_empty() {
        let style = TextStyle::from((FontFamily::SansSerif, 24))
            .pos(Pos::new(HPos::Center, VPos::Top));
        area.draw(&Text::new(title, (w as i32 / 2, 8), style))
            .map_err(plot_err)?;
    }

    let frame_max = frame.totals.iter().map(|(_, t)| *t).fold(0.0, f64::max);
    let max = max_total.max(frame_max);
    let polar = Polar {
        cx: w as f64 / 2.0,
        cy: (h as f64 + top_pad) / 2.0,
        inner: INNER_RADIUS,
        outer: ((w.min(h) as f64 - top_pad) / 2.0 - 40.0).max(INNER_RADIUS + 10.0),
        max: if max > 0.0 { max } else { 1.0 },
    };

    let grid = RGBColor(200, 200, 200);
    let grid_style = TextStyle::from((FontFamily::SansSerif, 11))
        .pos(Pos::new(HPos::Left, VPos::Bottom))
        .color(&RGBColor(120, 120, 120));
    for k in 1..=GRID_RINGS {
        let v = polar.max * k as f64 / GRID_RINGS as f64;
        let r = polar.radius(v);
        area.draw(&Circle::new(
            (polar.cx.round() as i32, polar.cy.round() as i32),
            r.round() as i32,
            grid.stroke_width(1),
        ))
        .map_err(plot_err)?;
        let (x, y) = polar.point(r, 0.0);
        area.draw(&Text::new(
            format_tick(v, &opts.locale),
            (x + 3, y - 2),
            grid_style.clone(),
        ))
        .map_err(plot_err)?;
    }

    let n = frame.groups.len().max(1);
    let band = TAU / n as f64;
    for s in &frame.segments {
        let Some(g) = frame.groups.iter().position(|x| *x == s.group) else {
            continue;
        };
        let color = frame
            .subgroups
            .iter()
            .position(|x| *x == s.subgroup)
            .map(office_color)
            .unwrap_or_else(|| BLACK.to_rgba());
        let a0 = g as f64 * band + PAD_ANGLE;
        let a1 = (g + 1) as f64 * band - PAD_ANGLE;
        let pts = polar.sector(polar.radius(s.start), polar.radius(s.end), a0, a1);
        area.draw(&Polygon::new(pts, color.filled()))
            .map_err(plot_err)?;
    }

    let label_style = TextStyle::from((FontFamily::SansSerif, 16))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let label_radius = polar.outer + 26.0;
    for (g, name) in frame.groups.iter().enumerate() {
        let mid = (g as f64 + 0.5) * band;
        area.draw(&Text::new(
            name.as_str(),
            polar.point(label_radius, mid),
            label_style.clone(),
        ))
        .map_err(plot_err)?;
    }

    let year_style = TextStyle::from((FontFamily::SansSerif, 28))
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        frame.year.to_string(),
        (polar.cx.round() as i32, polar.cy.round() as i32),
        year_style,
    ))
    .map_err(plot_err)?;

    let items: Vec<(String, RGBAColor)> = frame
        .subgroups
        .iter()
        .enumerate()
        .map(|(i, s)| (s.clone(), office_color(i)))
        .collect();
    panels.finish(&items)
}
