//! What the terminal tells us about the colors behind the page.

use teaser_background::{Surroundings, relative_luminance};
use teaser_core::{ColorScheme, Rgb, SchemePreference};

/// xterm's default 16-color palette.
const ANSI_PALETTE: [Rgb; 16] = [
    Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0xcd, 0x00, 0x00),
    Rgb::new(0x00, 0xcd, 0x00),
    Rgb::new(0xcd, 0xcd, 0x00),
    Rgb::new(0x00, 0x00, 0xee),
    Rgb::new(0xcd, 0x00, 0xcd),
    Rgb::new(0x00, 0xcd, 0xcd),
    Rgb::new(0xe5, 0xe5, 0xe5),
    Rgb::new(0x7f, 0x7f, 0x7f),
    Rgb::new(0xff, 0x00, 0x00),
    Rgb::new(0x00, 0xff, 0x00),
    Rgb::new(0xff, 0xff, 0x00),
    Rgb::new(0x5c, 0x5c, 0xff),
    Rgb::new(0xff, 0x00, 0xff),
    Rgb::new(0x00, 0xff, 0xff),
    Rgb::new(0xff, 0xff, 0xff),
];

/// Background of the terminal from a `COLORFGBG` value such as `15;0`.
pub fn terminal_background(colorfgbg: &str) -> Option<Rgb> {
    let index: usize = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    ANSI_PALETTE.get(index).copied()
}

fn hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Colors behind the page, most specific first.
#[derive(Debug, Clone, Default)]
pub struct TerminalSurroundings {
    /// Page background from the config, empty when unset.
    pub page_background: String,
    /// Terminal background, when the terminal reports one.
    pub terminal_background: Option<String>,
    /// Scheme the terminal appears to use.
    pub detected_scheme: Option<ColorScheme>,
    /// User preference, which can override detection.
    pub preference: SchemePreference,
}

impl TerminalSurroundings {
    /// Inspect the environment of the current process.
    pub fn detect(page_background: String, preference: SchemePreference) -> Self {
        let colorfgbg = std::env::var("COLORFGBG").ok();
        Self::from_colorfgbg(colorfgbg.as_deref(), page_background, preference)
    }

    pub fn from_colorfgbg(
        colorfgbg: Option<&str>,
        page_background: String,
        preference: SchemePreference,
    ) -> Self {
        let background = colorfgbg.and_then(terminal_background);
        let detected_scheme = background.map(|rgb| {
            if relative_luminance(rgb) < 0.5 {
                ColorScheme::Dark
            } else {
                ColorScheme::Light
            }
        });
        tracing::debug!(?background, ?detected_scheme, "terminal colors detected");
        Self {
            page_background,
            terminal_background: background.map(hex),
            detected_scheme,
            preference,
        }
    }

    /// Scheme after applying the user's preference.
    pub fn scheme(&self) -> Option<ColorScheme> {
        self.preference.resolve(self.detected_scheme)
    }
}

impl Surroundings for TerminalSurroundings {
    fn background_candidates(&self) -> Vec<String> {
        let mut candidates = vec![self.page_background.clone()];
        candidates.extend(self.terminal_background.clone());
        candidates
    }

    fn preferred_scheme(&self) -> Option<ColorScheme> {
        self.scheme()
    }
}
