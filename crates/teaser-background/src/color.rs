//! Color parsing and contrast helpers for the particle background.

use ratatui::style::Color;
use teaser_core::Rgb;

/// Particle color used over dark backgrounds.
pub const NEAR_WHITE: &str = "rgba(255,255,255,0.85)";

/// Particle color used over light backgrounds.
pub const NEAR_BLACK: &str = "rgba(0,0,0,0.85)";

/// Backgrounds at or above this luminance count as light.
const LIGHT_LUMINANCE: f64 = 0.5;

/// Parse `#rgb`, `#rrggbb`, `rgb(...)` or `rgba(...)` into channel values.
///
/// Named colors, gradients and anything else return `None`.
pub fn parse_rgb(css: &str) -> Option<Rgb> {
    let css = css.trim();
    if let Some(hex) = css.strip_prefix('#') {
        return parse_hex(hex);
    }

    let parts = functional_parts(css)?;
    if parts.len() < 3 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f32 = s.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    Some(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
}

/// Split the argument list of `rgb(...)` / `rgba(...)`.
fn functional_parts(css: &str) -> Option<Vec<&str>> {
    let lower = css.to_ascii_lowercase();
    let open = if lower.starts_with("rgba(") {
        5
    } else if lower.starts_with("rgb(") {
        4
    } else {
        return None;
    };
    let inner = css.get(open..)?.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

/// Whether a color is fully see-through and should be skipped during detection.
///
/// Only `rgba()` values with a zero or unreadable alpha component and the
/// `transparent` keyword qualify.
pub fn is_transparent(css: &str) -> bool {
    let css = css.trim();
    if css.eq_ignore_ascii_case("transparent") {
        return true;
    }
    if !css.to_ascii_lowercase().starts_with("rgba(") {
        return false;
    }
    match functional_parts(css).and_then(|parts| parts.get(3).map(|a| a.parse::<f32>())) {
        Some(Ok(alpha)) => alpha.is_nan() || alpha == 0.0,
        Some(Err(_)) => true,
        None => false,
    }
}

/// Relative luminance of an sRGB color (0.0 for black, 1.0 for white).
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |channel: u8| {
        let v = channel as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

/// Pick a particle color that stands out against a background of the given luminance.
pub fn contrast_color(luminance: f64) -> &'static str {
    if luminance < LIGHT_LUMINANCE {
        NEAR_WHITE
    } else {
        NEAR_BLACK
    }
}

/// Particle fill: a parsed color, or the raw string when it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fill {
    Rgb(Rgb),
    Raw(String),
}

impl Fill {
    /// Build a fill from a CSS-like color string. Alpha in the string is dropped.
    pub fn from_css(css: &str) -> Self {
        match parse_rgb(css) {
            Some(rgb) => Fill::Rgb(rgb),
            None => Fill::Raw(css.trim().to_string()),
        }
    }

    /// Terminal color for this fill drawn at `alpha` over `backdrop`.
    pub fn shade(&self, alpha: f32, backdrop: Rgb) -> Color {
        match self {
            Fill::Rgb(rgb) => rgb.over(backdrop, alpha).to_color(),
            // Terminal palette names can't be blended
            Fill::Raw(name) => name.parse().unwrap_or(Color::Reset),
        }
    }
}

/// Terminal color for a background fill, `None` when transparent or unknown.
pub fn background_fill(css: &str) -> Option<Color> {
    let css = css.trim();
    if css.is_empty() || is_transparent(css) {
        return None;
    }
    match parse_rgb(css) {
        Some(rgb) => Some(rgb.to_color()),
        None => css.parse().ok(),
    }
}
