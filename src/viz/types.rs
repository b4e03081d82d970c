//! Public types and constants for the visualization module.

use std::path::Path;

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMode {
    /// Separate, non-overlapping legend panel on the right side.
    Right,
    /// No legend (single-series charts, or labels drawn on the marks themselves).
    Hidden,
}

/// Output format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// `.svg` (any case) renders SVG; everything else renders PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

/// Canvas and labelling shared by every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Locale tag for number labels (`en`, `de`, `fr`, …).
    pub locale: String,
    /// Chart caption; empty omits it.
    pub title: String,
    pub legend: LegendMode,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            locale: "en".to_string(),
            title: String::new(),
            legend: LegendMode::Right,
        }
    }
}

impl ChartOptions {
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;
