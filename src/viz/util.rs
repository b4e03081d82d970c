//! Utility functions for visualization: colors, scaling, locale-aware number labels.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBAColor {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Palette index as plain RGB, for callers outside plotters (the GUI).
pub fn office_rgb(idx: usize) -> (u8, u8, u8) {
    let RGBColor(r, g, b) = OFFICE10[idx % OFFICE10.len()];
    (r, g, b)
}

/// Stable palette slot for a label outside any fixed ordering (race bars whose set
/// changes from frame to frame).
pub fn name_slot(name: &str) -> usize {
    name.bytes()
        .fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
}

/// Yellow-orange-red ramp stops, light to dark.
const YL_OR_RD: [(u8, u8, u8); 5] = [
    (255, 255, 204),
    (254, 217, 118),
    (253, 141, 60),
    (227, 26, 28),
    (128, 0, 38),
];

/// Cells with no emissions are drawn in this neutral tone instead of the ramp.
pub const ZERO_CELL: (u8, u8, u8) = (238, 238, 238);

/// Sequential heat colour for `value` on `0..=max`. Zero and non-positive values get
/// [`ZERO_CELL`].
pub fn heat_rgb(value: f64, max: f64) -> (u8, u8, u8) {
    if value <= 0.0 || max <= 0.0 {
        return ZERO_CELL;
    }
    let t = (value / max).clamp(0.0, 1.0) * (YL_OR_RD.len() - 1) as f64;
    let i = (t.floor() as usize).min(YL_OR_RD.len() - 2);
    let f = t - i as f64;
    let (a, b) = (YL_OR_RD[i], YL_OR_RD[i + 1]);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

pub fn heat_color(value: f64, max: f64) -> RGBColor {
    let (r, g, b) = heat_rgb(value, max);
    RGBColor(r, g, b)
}

/// Pick a single value-axis scale and its human label based on the overall magnitude.
/// Returns (scale, label), e.g. (1e6, "millions").
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Axis title for an emissions axis after scaling.
pub fn axis_title(scale_word: &str) -> String {
    if scale_word.is_empty() {
        "Emissions".to_string()
    } else {
        format!("Emissions ({scale_word})")
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Decimal places for a tick label: fewer as the magnitude grows.
fn tick_precision(v: f64) -> usize {
    let a = v.abs();
    if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    }
}

/// Format `v` with grouping and decimal separator of `locale_tag`.
pub fn format_number(v: f64, precision: usize, locale_tag: &str) -> String {
    let (locale, dec) = map_locale(locale_tag);
    let rounded = format!("{:.*}", precision, v.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };
    let grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(locale))
        .unwrap_or_else(|_| int_part.to_string());
    let sign = if v < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}{dec}{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Tick label as drawn on value axes.
pub fn format_tick(v: f64, locale_tag: &str) -> String {
    format_number(v, tick_precision(v), locale_tag)
}

/// Compute a tight left label area width for the value axis (in pixels),
/// based on the formatted tick labels that will appear.
pub fn compute_left_label_area_px(
    ymin_scaled: f64,
    ymax_scaled: f64,
    ticks: usize,
    font_px: u32,
    locale_tag: &str,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin_scaled + (ymax_scaled - ymin_scaled) * t;
        max_px = max_px.max(estimate_text_width_px(&format_tick(v, locale_tag), font_px));
    }
    // Tick marks plus the rotated axis title.
    max_px.saturating_add(34).clamp(56, 160)
}

/// Upper bound for a value axis: `max` with 5% headroom, never zero.
pub fn axis_top(max: f64) -> f64 {
    if max > 0.0 && max.is_finite() {
        max * 1.05
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn german_grouping_and_decimal_comma() {
        assert_eq!(format_number(1234567.891, 2, "de"), "1.234.567,89");
        assert_eq!(format_number(1234.0, 0, "en"), "1,234");
        assert_eq!(format_number(-0.001, 2, "en"), "0.00");
    }

    #[test]
    fn heat_scale_ends() {
        assert_eq!(heat_rgb(0.0, 10.0), ZERO_CELL);
        assert_eq!(heat_rgb(10.0, 10.0), (128, 0, 38));
        assert_eq!(heat_rgb(1e-9, 10.0), (255, 255, 204));
    }
}
