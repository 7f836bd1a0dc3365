//! Core types shared by the teaser page crates.

use std::fmt;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Width of one terminal cell in viewport units.
pub const CELL_WIDTH: f32 = 8.0;

/// Height of one terminal cell in viewport units.
pub const CELL_HEIGHT: f32 = 16.0;

/// Lowest surface oversampling factor.
pub const MIN_PIXEL_RATIO: f32 = 1.0;

/// Highest surface oversampling factor.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// An opaque color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to a terminal color.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Mix `self` over `backdrop` with the given opacity (0.0-1.0).
    pub fn over(self, backdrop: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (bg as f32 + (fg as f32 - bg as f32) * alpha).round() as u8
        };
        Rgb::new(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }
}

/// The user's preferred color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemePreference {
    /// Follow whatever the terminal reports.
    #[default]
    Auto,
    Light,
    Dark,
}

impl SchemePreference {
    /// Cycle to the next preference.
    pub fn next(self) -> Self {
        match self {
            SchemePreference::Auto => SchemePreference::Light,
            SchemePreference::Light => SchemePreference::Dark,
            SchemePreference::Dark => SchemePreference::Auto,
        }
    }

    /// Display name for the help line.
    pub fn label(self) -> &'static str {
        match self {
            SchemePreference::Auto => "auto",
            SchemePreference::Light => "light",
            SchemePreference::Dark => "dark",
        }
    }

    /// Resolve against the scheme detected from the terminal, if any.
    pub fn resolve(self, detected: Option<ColorScheme>) -> Option<ColorScheme> {
        match self {
            SchemePreference::Auto => detected,
            SchemePreference::Light => Some(ColorScheme::Light),
            SchemePreference::Dark => Some(ColorScheme::Dark),
        }
    }
}

/// Visible drawing area in viewport units plus the surface oversampling factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Create a viewport, clamping the pixel ratio to the supported range.
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: clamp_pixel_ratio(pixel_ratio),
        }
    }

    /// Viewport covering a terminal area of `cols` x `rows` cells.
    pub fn from_cells(cols: u16, rows: u16, pixel_ratio: f32) -> Self {
        Self::new(
            cols as f32 * CELL_WIDTH,
            rows as f32 * CELL_HEIGHT,
            pixel_ratio,
        )
    }

    /// Surface dimensions in device pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).floor() as u32,
            (self.height * self.pixel_ratio).floor() as u32,
        )
    }

    /// Whether there is nothing to draw on.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Clamp a pixel ratio to [1, 2]; non-finite values fall back to 1.
pub fn clamp_pixel_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() {
        ratio.clamp(MIN_PIXEL_RATIO, MAX_PIXEL_RATIO)
    } else {
        MIN_PIXEL_RATIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_clamped() {
        assert_eq!(clamp_pixel_ratio(0.5), 1.0);
        assert_eq!(clamp_pixel_ratio(1.5), 1.5);
        assert_eq!(clamp_pixel_ratio(3.0), 2.0);
        assert_eq!(clamp_pixel_ratio(f32::NAN), 1.0);
    }

    #[test]
    fn test_surface_size() {
        let viewport = Viewport::new(100.5, 50.0, 2.0);
        assert_eq!(viewport.surface_size(), (201, 100));

        let viewport = Viewport::from_cells(10, 5, 4.0);
        assert_eq!(viewport.width, 80.0);
        assert_eq!(viewport.height, 80.0);
        assert_eq!(viewport.surface_size(), (160, 160));
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::from_cells(0, 10, 1.0).is_empty());
        assert!(!Viewport::from_cells(1, 1, 1.0).is_empty());
    }

    #[test]
    fn test_scheme_preference_cycle() {
        let pref = SchemePreference::default();
        assert_eq!(pref, SchemePreference::Auto);
        assert_eq!(pref.next().next().next(), SchemePreference::Auto);
        assert_eq!(SchemePreference::Auto.resolve(None), None);
        assert_eq!(
            SchemePreference::Dark.resolve(Some(ColorScheme::Light)),
            Some(ColorScheme::Dark)
        );
    }

    #[test]
    fn test_rgb_over() {
        let red = Rgb::new(255, 0, 0);
        assert_eq!(red.over(Rgb::BLACK, 1.0), red);
        assert_eq!(red.over(Rgb::BLACK, 0.0), Rgb::BLACK);
        assert_eq!(Rgb::WHITE.over(Rgb::BLACK, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(red.to_string(), "rgb(255, 0, 0)");
    }
}
