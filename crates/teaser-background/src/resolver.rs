//! Particle color resolution against the host page's background.

use std::time::{Duration, Instant};

use teaser_core::{ColorScheme, Rgb};

use crate::color::{
    NEAR_BLACK, NEAR_WHITE, contrast_color, is_transparent, parse_rgb, relative_luminance,
};

/// How long a style mutation must settle before colors are re-resolved.
pub const MUTATION_DEBOUNCE: Duration = Duration::from_millis(10);

/// Color settings configured on the background component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorInputs {
    /// Explicit particle color. Disables contrast detection when set.
    pub particle_color: Option<String>,
    /// Explicit background color behind the particles.
    pub background_color: Option<String>,
}

/// What the host can report about the page behind the background.
pub trait Surroundings {
    /// Background colors, most specific first.
    fn background_candidates(&self) -> Vec<String>;

    /// Preferred color scheme, `None` when the host cannot tell.
    fn preferred_scheme(&self) -> Option<ColorScheme>;
}

/// Outcome of a color resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Color string for the particles.
    pub particle: String,
    /// Opaque color the particles are blended against.
    pub backdrop: Rgb,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn scheme_name(scheme: ColorScheme) -> &'static str {
    if scheme.is_dark() { "black" } else { "white" }
}

/// Find the effective background color.
///
/// Order: the explicit background, then the first usable host candidate,
/// then `black` or `white` from the preferred scheme.
pub fn detect_background(inputs: &ColorInputs, surroundings: &dyn Surroundings) -> String {
    if let Some(bg) = non_empty(inputs.background_color.as_ref())
        && !bg.eq_ignore_ascii_case("transparent")
    {
        return bg.to_string();
    }

    for candidate in surroundings.background_candidates() {
        let candidate = candidate.trim();
        if candidate.is_empty() || parse_rgb(candidate).is_none() || is_transparent(candidate) {
            continue;
        }
        return candidate.to_string();
    }

    let scheme = surroundings.preferred_scheme().unwrap_or_default();
    scheme_name(scheme).to_string()
}

/// Resolve the particle color and backdrop from the inputs and surroundings.
pub fn resolve(inputs: &ColorInputs, surroundings: &dyn Surroundings) -> Resolution {
    let scheme = surroundings.preferred_scheme().unwrap_or_default();
    let mut background = detect_background(inputs, surroundings);
    if background.is_empty() || background.eq_ignore_ascii_case("transparent") {
        background = scheme_name(scheme).to_string();
    }

    let parsed = parse_rgb(&background);
    let backdrop = parsed.unwrap_or(if scheme.is_dark() { Rgb::BLACK } else { Rgb::WHITE });

    let particle = match non_empty(inputs.particle_color.as_ref()) {
        Some(color) => color.to_string(),
        None => match parsed {
            Some(rgb) => contrast_color(relative_luminance(rgb)).to_string(),
            None if scheme.is_dark() => NEAR_WHITE.to_string(),
            None => NEAR_BLACK.to_string(),
        },
    };

    Resolution { particle, backdrop }
}

/// Tracks re-resolution triggers for one background instance.
///
/// Input and scheme changes apply on the next poll; style mutations wait
/// for [`MUTATION_DEBOUNCE`] after the most recent one.
#[derive(Debug)]
pub struct ContrastWatch {
    inputs: ColorInputs,
    current: Option<Resolution>,
    dirty: bool,
    settle_at: Option<Instant>,
}

impl ContrastWatch {
    pub fn new(inputs: ColorInputs) -> Self {
        Self {
            inputs,
            current: None,
            dirty: true,
            settle_at: None,
        }
    }

    /// The last resolution, if any poll has run.
    pub fn current(&self) -> Option<&Resolution> {
        self.current.as_ref()
    }

    /// Replace the configured colors.
    pub fn set_inputs(&mut self, inputs: ColorInputs) {
        if inputs != self.inputs {
            self.inputs = inputs;
            self.dirty = true;
        }
    }

    /// The preferred color scheme changed.
    pub fn scheme_changed(&mut self) {
        self.dirty = true;
    }

    /// The host's styling changed at `now`.
    pub fn style_mutated(&mut self, now: Instant) {
        self.settle_at = Some(now + MUTATION_DEBOUNCE);
    }

    /// Whether a debounced mutation is still waiting to settle.
    pub fn is_settling(&self) -> bool {
        self.settle_at.is_some()
    }

    /// Process pending triggers. Returns the new resolution when it changed.
    pub fn poll(&mut self, now: Instant, surroundings: &dyn Surroundings) -> Option<Resolution> {
        if let Some(deadline) = self.settle_at
            && now >= deadline
        {
            self.settle_at = None;
            self.dirty = true;
        }
        if !self.dirty {
            return None;
        }
        self.dirty = false;

        let next = resolve(&self.inputs, surroundings);
        if self.current.as_ref() == Some(&next) {
            return None;
        }
        tracing::debug!(particle = %next.particle, backdrop = %next.backdrop, "particle color resolved");
        self.current = Some(next.clone());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeSurroundings {
        candidates: RefCell<Vec<String>>,
        scheme: Option<ColorScheme>,
    }

    impl FakeSurroundings {
        fn with(candidates: &[&str], scheme: Option<ColorScheme>) -> Self {
            Self {
                candidates: RefCell::new(candidates.iter().map(|s| s.to_string()).collect()),
                scheme,
            }
        }
    }

    impl Surroundings for FakeSurroundings {
        fn background_candidates(&self) -> Vec<String> {
            self.candidates.borrow().clone()
        }

        fn preferred_scheme(&self) -> Option<ColorScheme> {
            self.scheme
        }
    }

    fn auto() -> ColorInputs {
        ColorInputs::default()
    }

    #[test]
    fn test_explicit_background_wins() {
        let inputs = ColorInputs {
            particle_color: None,
            background_color: Some("#123456".to_string()),
        };
        let env = FakeSurroundings::with(&["#ffffff"], Some(ColorScheme::Light));
        assert_eq!(detect_background(&inputs, &env), "#123456");
    }

    #[test]
    fn test_transparent_explicit_background_falls_through() {
        let inputs = ColorInputs {
            particle_color: None,
            background_color: Some("transparent".to_string()),
        };
        let env = FakeSurroundings::with(&["rgb(1, 2, 3)"], None);
        assert_eq!(detect_background(&inputs, &env), "rgb(1, 2, 3)");
    }

    #[test]
    fn test_transparent_candidates_skipped() {
        let env = FakeSurroundings::with(
            &["", "rgba(0, 0, 0, 0)", "rgba(9, 9, 9, nope)", "papayawhip", "#fafafa"],
            None,
        );
        assert_eq!(detect_background(&auto(), &env), "#fafafa");
    }

    #[test]
    fn test_scheme_fallback() {
        let dark = FakeSurroundings::with(&["rgba(0,0,0,0)"], Some(ColorScheme::Dark));
        assert_eq!(detect_background(&auto(), &dark), "black");

        let unknown = FakeSurroundings::with(&[], None);
        assert_eq!(detect_background(&auto(), &unknown), "white");
    }

    #[test]
    fn test_contrast_resolution() {
        let dark_page = FakeSurroundings::with(&["#111"], Some(ColorScheme::Light));
        let resolution = resolve(&auto(), &dark_page);
        assert_eq!(resolution.particle, NEAR_WHITE);
        assert_eq!(resolution.backdrop, Rgb::new(0x11, 0x11, 0x11));

        let light_page = FakeSurroundings::with(&["rgb(240, 240, 240)"], Some(ColorScheme::Dark));
        assert_eq!(resolve(&auto(), &light_page).particle, NEAR_BLACK);
    }

    #[test]
    fn test_scheme_decides_when_background_unparseable() {
        let dark = FakeSurroundings::with(&[], Some(ColorScheme::Dark));
        let resolution = resolve(&auto(), &dark);
        assert_eq!(resolution.particle, NEAR_WHITE);
        assert_eq!(resolution.backdrop, Rgb::BLACK);

        // Missing scheme support reads as light
        let unknown = FakeSurroundings::with(&[], None);
        let resolution = resolve(&auto(), &unknown);
        assert_eq!(resolution.particle, NEAR_BLACK);
        assert_eq!(resolution.backdrop, Rgb::WHITE);
    }

    #[test]
    fn test_explicit_particle_color() {
        let inputs = ColorInputs {
            particle_color: Some("red".to_string()),
            background_color: Some("#000".to_string()),
        };
        let env = FakeSurroundings::with(&[], None);
        let resolution = resolve(&inputs, &env);
        assert_eq!(resolution.particle, "red");
        assert_eq!(resolution.backdrop, Rgb::BLACK);

        let blank = ColorInputs {
            particle_color: Some("  ".to_string()),
            background_color: Some("#000".to_string()),
        };
        assert_eq!(resolve(&blank, &env).particle, NEAR_WHITE);
    }

    #[test]
    fn test_watch_resolves_once_until_triggered() {
        let env = FakeSurroundings::with(&["#000"], None);
        let mut watch = ContrastWatch::new(auto());
        let now = Instant::now();

        assert_eq!(watch.poll(now, &env).map(|r| r.particle), Some(NEAR_WHITE.to_string()));
        assert_eq!(watch.poll(now, &env), None);

        // Same result after a scheme change is not reported again
        watch.scheme_changed();
        assert_eq!(watch.poll(now, &env), None);
        assert_eq!(watch.current().map(|r| r.particle.as_str()), Some(NEAR_WHITE));
    }

    #[test]
    fn test_watch_debounces_mutations() {
        let env = FakeSurroundings::with(&["#000"], None);
        let mut watch = ContrastWatch::new(auto());
        let start = Instant::now();
        watch.poll(start, &env);

        *env.candidates.borrow_mut() = vec!["#fff".to_string()];
        watch.style_mutated(start);
        assert!(watch.is_settling());
        assert_eq!(watch.poll(start + Duration::from_millis(5), &env), None);

        // A second mutation pushes the deadline out
        watch.style_mutated(start + Duration::from_millis(8));
        assert_eq!(watch.poll(start + Duration::from_millis(12), &env), None);

        let changed = watch.poll(start + Duration::from_millis(18), &env);
        assert_eq!(changed.map(|r| r.particle), Some(NEAR_BLACK.to_string()));
        assert!(!watch.is_settling());
    }

    #[test]
    fn test_watch_input_change() {
        let env = FakeSurroundings::with(&[], Some(ColorScheme::Dark));
        let mut watch = ContrastWatch::new(auto());
        let now = Instant::now();
        watch.poll(now, &env);

        watch.set_inputs(ColorInputs {
            particle_color: Some("#f00".to_string()),
            background_color: None,
        });
        let changed = watch.poll(now, &env);
        assert_eq!(changed.map(|r| r.particle), Some("#f00".to_string()));
        assert_eq!(watch.poll(now, &env), None);
    }
}
