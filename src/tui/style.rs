//! Color constants and axis helpers for the TUI.

use ratatui::style::Color;

use crate::shape::color::Rgb;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Active tab color.
pub const TAB_ACTIVE: Color = Color::Cyan;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Informational notices.
pub const NOTICE_FG: Color = Color::Yellow;
/// Load errors.
pub const ERROR_FG: Color = Color::Red;
/// Entities without a carrier color.
pub const UNCOLORED: Color = Color::Gray;

/// Terminal color of a palette entry.
pub fn color(rgb: Option<Rgb>) -> Color {
    rgb.map_or(UNCOLORED, |c| Color::Rgb(c.r, c.g, c.b))
}

/// Axis bounds over all points with 10% padding.
pub fn auto_bounds<'a>(values: impl Iterator<Item = &'a f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
