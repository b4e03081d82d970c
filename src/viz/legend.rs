//! Right-hand legend panel.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::plot_err;
use super::text::{estimate_text_width_px, wrap_text_to_width};

const FONT_PX: u32 = 14;
const TITLE_FONT_PX: u32 = 16;
const LINE_H: i32 = FONT_PX as i32 + 2;
const ROW_GAP: i32 = 4;
const PAD_X: i32 = 6;
const PAD_TOP: i32 = 12;
const MARKER: i32 = 5;
const TEXT_X: i32 = PAD_X + 24;

/// Width the panel wants so the longest label fits on one line, capped at 30% of the canvas.
pub fn legend_width_px(labels: &[String], canvas_w: u32) -> u32 {
    let longest = labels
        .iter()
        .map(|l| estimate_text_width_px(l, FONT_PX))
        .max()
        .unwrap_or(0);
    let wanted = longest + TEXT_X as u32 + PAD_X as u32 * 2;
    let cap = ((canvas_w as f64 * 0.30) as u32).max(120);
    wanted.clamp(120, cap).min(canvas_w / 2)
}

/// Draw a single-column list of colour swatches and wrapped labels.
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBAColor)],
    title: &str,
) -> Result<()> {
    area.fill(&WHITE).map_err(plot_err)?;
    let (w, _) = area.dim_in_pixel();
    let max_text_w = (w as i32 - TEXT_X - PAD_X).max(40) as u32;

    let label_style = TextStyle::from((FontFamily::SansSerif, FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Center));

    let mut y = PAD_TOP;
    if !title.trim().is_empty() {
        let title_style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
            .pos(Pos::new(HPos::Left, VPos::Top));
        area.draw(&Text::new(title, (PAD_X, y), title_style))
            .map_err(plot_err)?;
        y += TITLE_FONT_PX as i32 + 8;
    }

    for (label, color) in items {
        let lines = wrap_text_to_width(label, FONT_PX, max_text_w);
        let block_h = (lines.len().max(1) as i32) * LINE_H;
        let cy = y + LINE_H / 2;
        area.draw(&Rectangle::new(
            [(PAD_X + 8 - MARKER, cy - MARKER), (PAD_X + 8 + MARKER, cy + MARKER)],
            color.filled(),
        ))
        .map_err(plot_err)?;
        for (i, line) in lines.iter().enumerate() {
            let line_y = y + i as i32 * LINE_H + LINE_H / 2;
            area.draw(&Text::new(line.as_str(), (TEXT_X, line_y), label_style.clone()))
                .map_err(plot_err)?;
        }
        y += block_h + ROW_GAP;
    }
    Ok(())
}
