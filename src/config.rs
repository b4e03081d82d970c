//! Chart presets: the fixed entity lists each view aggregates over, plus frame timings.
//!
//! Defaults match the published dashboard. Any field can be overridden from a JSON file;
//! omitted fields keep their default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presets {
    /// Continents in legend order (not sorted by value).
    pub continents: Vec<String>,
    /// Asian subregions in axis order.
    pub subregions: Vec<String>,
    /// Fixed industry order for the static heatmap.
    pub heatmap_industries: Vec<String>,
    /// Gas type preselected in the gas dropdown.
    pub default_gas: String,
    /// Gas type used by the subregion views and the Lorenz curve.
    pub focus_gas: String,
    pub lorenz_year: i32,
    /// How many industries the Asia bar race keeps per frame.
    pub top_n: usize,
}

impl Default for Presets {
    fn default() -> Self {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            continents: owned(&["Africa", "Asia", "Europe", "Oceania", "Americas"]),
            subregions: owned(&[
                "Central Asia",
                "Eastern Asia",
                "South-eastern Asia",
                "Southern Asia",
                "Western Asia",
            ]),
            heatmap_industries: owned(&[
                "Electricity, Gas, Steam and Air Conditioning Supply",
                "Manufacturing",
                "Transportation and Storage",
                "Agriculture, Forestry and Fishing",
                "Construction",
                "Mining",
                "Water supply; sewerage, waste management and remediation activities",
                "Other Services Industries",
            ]),
            default_gas: "Carbon dioxide".into(),
            focus_gas: "Greenhouse gas".into(),
            lorenz_year: 2023,
            top_n: 5,
        }
    }
}

impl Presets {
    /// Read presets from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read presets {}", path.display()))?;
        let presets: Presets = serde_json::from_str(&text)
            .with_context(|| format!("parse presets {}", path.display()))?;
        Ok(presets)
    }

    /// Default presets unless a path is given.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// Playback intervals per chart.
pub struct FrameTiming;

impl FrameTiming {
    /// Industry bar race.
    pub const RACE: Duration = Duration::from_millis(1200);
    /// Asia stacked-bar race.
    pub const ASIA_BAR: Duration = Duration::from_millis(1000);
    /// Radial subregion race.
    pub const RADIAL: Duration = Duration::from_millis(1000);
    /// Global year slider.
    pub const SLIDER: Duration = Duration::from_millis(800);
}
