//! Visualization: render the chart views to **SVG** or **PNG**.
//!
//! - Distinct series colors (Microsoft Office palette), YlOrRd-style ramp for heatmaps
//! - Locale-aware tick labels (`30,000` vs `30.000`) and magnitude-aware value axes
//! - Right-hand legend panel sized from the labels
//! - One entry point per chart: lines, stacked area, stacked bars, horizontal stack,
//!   industry race, heatmap, radial stack, Lorenz curve
//!
//! The output format follows the file extension (`.svg`, anything else is PNG). Empty
//! input draws an empty chart with axes.

mod cartesian;
mod heatmap;
pub mod legend;
mod radial;
pub mod raster;
pub mod text;
pub mod types;
pub mod util;

pub use cartesian::{
    plot_horizontal_stack, plot_lorenz, plot_race_frame, plot_series_lines, plot_stacked_area,
    plot_stacked_bars,
};
pub use heatmap::plot_heatmap;
pub use radial::plot_radial;
pub use types::{ChartOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH, LegendMode, OutputFormat};

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use legend::{draw_legend_panel, legend_width_px};

pub(crate) fn plot_err<E: std::fmt::Debug>(e: E) -> anyhow::Error {
    anyhow!("{:?}", e)
}

/// Open the backend matching the extension of `$path` and run `$body` with the root area
/// bound to `$root`.
macro_rules! render {
    ($path:expr, $opts:expr, |$root:ident| $body:expr) => {{
        use plotters::prelude::IntoDrawingArea as _;
        let path: &std::path::Path = $path;
        let size = ($opts.width, $opts.height);
        log::debug!("rendering {}x{} to {}", size.0, size.1, path.display());
        match $crate::viz::OutputFormat::from_path(path) {
            $crate::viz::OutputFormat::Svg => {
                let $root = plotters_svg::SVGBackend::new(path, size).into_drawing_area();
                $body
            }
            $crate::viz::OutputFormat::Png => {
                let $root =
                    $crate::viz::raster::TextlessBitmap::new(path, size).into_drawing_area();
                $body
            }
        }
    }};
}
pub(crate) use render;

/// Plot area plus an optional legend panel on its right.
pub(crate) struct Panels<DB: DrawingBackend> {
    pub plot: DrawingArea<DB, Shift>,
    pub legend: Option<DrawingArea<DB, Shift>>,
}

impl<DB: DrawingBackend> Panels<DB> {
    /// Split `root` for a legend listing `labels` (no split when hidden or empty).
    pub fn split(
        root: DrawingArea<DB, Shift>,
        labels: &[String],
        opts: &ChartOptions,
    ) -> Result<Self> {
        root.fill(&WHITE).map_err(plot_err)?;
        match opts.legend {
            LegendMode::Right if !labels.is_empty() => {
                let (w, _) = root.dim_in_pixel();
                let lw = legend_width_px(labels, w);
                let (plot, legend) = root.split_horizontally((w - lw) as i32);
                Ok(Self {
                    plot,
                    legend: Some(legend),
                })
            }
            _ => Ok(Self {
                plot: root,
                legend: None,
            }),
        }
    }

    /// Draw the legend (if any) and flush both panels.
    pub fn finish(self, items: &[(String, RGBAColor)]) -> Result<()> {
        if let Some(ref area) = self.legend {
            draw_legend_panel(area, items, "")?;
            area.present().map_err(plot_err)?;
        }
        self.plot.present().map_err(plot_err)?;
        Ok(())
    }
}

/// Caption text: `title`, with `suffix` appended when both are present.
pub(crate) fn caption(title: &str, suffix: Option<String>) -> String {
    match (title.trim(), suffix) {
        ("", Some(s)) => s,
        (t, Some(s)) => format!("{t} {s}"),
        (t, None) => t.to_string(),
    }
}

pub(crate) fn name_color(name: &str) -> RGBAColor {
    util::office_color(util::name_slot(name))
}
