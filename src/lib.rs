//! ghg_rs
//!
//! A Rust library for aggregating, animating, and charting greenhouse-gas emissions
//! tables. Pairs with the `ghg` CLI and the `ghg-gui` desktop app.
//!
//! ### Features
//! - Load the wide `Country, Gas Type, Industry, <year>…` table and the long-form
//!   `Industry, Year, Emissions` table
//! - Filter rows and sum them by composite keys (region, gas, industry, year)
//! - Build year series, stacked segments, and per-year top-N rankings
//! - Play years back with a single-timer controller (clamp or wrap at the end)
//! - Place hover tooltips inside the viewport
//! - Render SVG/PNG charts, export tidy CSV/JSON, summarize groups, draw Lorenz curves
//!
//! ### Example
//! ```no_run
//! use ghg_rs::{Dataset, Presets, views};
//!
//! let ds: Dataset = ghg_rs::load::load_wide_csv("data/emissions.csv")?;
//! let presets = Presets::default();
//! let lines = views::continent_series(&ds, &presets, &presets.default_gas);
//! ghg_rs::viz::plot_series_lines(&lines, "continents.svg", &Default::default())?;
//! let stats = ghg_rs::stats::grouped_summary(&ds);
//! println!("{:#?}", stats);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod load;
pub mod models;
pub mod playback;
pub mod stats;
pub mod storage;
pub mod tooltip;
pub mod views;
pub mod viz;

pub use config::{FrameTiming, Presets};
pub use error::LoadError;
pub use load::Dataset;
pub use models::{GroupKey, IndustryRecord, RawRecord, Segment, Series};
pub use playback::{EndBehavior, Frame, PlaybackController};
