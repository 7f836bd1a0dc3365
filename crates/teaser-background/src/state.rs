//! Background component state management.

use std::time::Instant;

use ratatui::Frame;
use teaser_core::{Rgb, Viewport};

use crate::color::{Fill, background_fill};
use crate::field::{DEFAULT_PARTICLE_COUNT, ParticleField};
use crate::resolver::{ColorInputs, ContrastWatch, Surroundings};
use crate::surface::{CanvasSurface, Surface};

/// Settings for the particle background.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundOptions {
    /// Number of particles, fixed for the lifetime of a field.
    pub particle_count: usize,
    /// Particle and background colors.
    pub colors: ColorInputs,
    /// Surface oversampling factor, clamped to [1, 2].
    pub pixel_ratio: f32,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            colors: ColorInputs {
                particle_color: None,
                background_color: Some("transparent".to_string()),
            },
            pixel_ratio: 1.0,
        }
    }
}

/// The particle background, drawn behind everything else on the page.
///
/// Owns its color watch, its field and its drawing surface. Dropping it
/// ends the animation and every subscription with it.
#[derive(Debug)]
pub struct SpaceBackground {
    options: BackgroundOptions,
    watch: ContrastWatch,
    /// Built on the first frame that has both a color and a drawable area.
    field: Option<ParticleField>,
    surface: CanvasSurface,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl Default for SpaceBackground {
    fn default() -> Self {
        Self::new(BackgroundOptions::default())
    }
}

impl SpaceBackground {
    /// Create a new, not yet animated background.
    pub fn new(options: BackgroundOptions) -> Self {
        let mut surface = CanvasSurface::new();
        surface.set_background(background_color(&options.colors));
        Self {
            watch: ContrastWatch::new(options.colors.clone()),
            options,
            field: None,
            surface,
            last_width: 0,
            last_height: 0,
        }
    }

    pub fn options(&self) -> &BackgroundOptions {
        &self.options
    }

    /// The running field, once the first frame has been drawn.
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }

    /// The particle color currently in use.
    pub fn resolved_color(&self) -> Option<&str> {
        self.watch.current().map(|r| r.particle.as_str())
    }

    /// The color particles are blended against.
    pub fn backdrop(&self) -> Option<Rgb> {
        self.watch.current().map(|r| r.backdrop)
    }

    /// Whether a style change is still waiting to settle before colors are re-resolved.
    pub fn is_settling(&self) -> bool {
        self.watch.is_settling()
    }

    /// Apply new settings. A different particle count starts a fresh field.
    pub fn reconfigure(&mut self, options: BackgroundOptions) {
        if options == self.options {
            return;
        }
        if options.particle_count != self.options.particle_count {
            tracing::debug!(count = options.particle_count, "restarting particle field");
            self.field = None;
        }
        if options.pixel_ratio != self.options.pixel_ratio {
            // Forces a resize on the next frame
            self.last_width = 0;
            self.last_height = 0;
        }
        self.surface.set_background(background_color(&options.colors));
        self.watch.set_inputs(options.colors.clone());
        self.options = options;
    }

    /// The preferred color scheme changed.
    pub fn scheme_changed(&mut self) {
        self.watch.scheme_changed();
    }

    /// The host's styling changed; colors are re-resolved once it settles.
    pub fn style_mutated(&mut self, now: Instant) {
        self.watch.style_mutated(now);
    }

    /// Handle pending color triggers.
    pub fn tick(&mut self, now: Instant, surroundings: &dyn Surroundings) {
        let Some(resolution) = self.watch.poll(now, surroundings) else {
            return;
        };
        self.surface.set_backdrop(resolution.backdrop);
        if let Some(field) = &mut self.field {
            field.set_fill(Fill::from_css(&resolution.particle));
        }
    }

    /// Animate one frame and render it across the whole frame area.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.is_empty() {
            return;
        }
        let Some(resolution) = self.watch.current() else {
            return;
        };

        let dimensions_changed = area.width != self.last_width || area.height != self.last_height;
        let viewport = Viewport::from_cells(area.width, area.height, self.options.pixel_ratio);

        if self.field.is_none() {
            self.field = Some(ParticleField::new(
                self.options.particle_count,
                viewport,
                Fill::from_css(&resolution.particle),
            ));
            self.surface.configure(&viewport);
        } else if dimensions_changed {
            tracing::debug!(
                width = area.width,
                height = area.height,
                "resizing particle field"
            );
            if let Some(field) = &mut self.field {
                field.resize(viewport);
            }
            self.surface.configure(&viewport);
        }
        self.last_width = area.width;
        self.last_height = area.height;

        if let Some(field) = &mut self.field {
            field.frame(&mut self.surface);
        }
        frame.render_widget(&self.surface, area);
    }
}

fn background_color(colors: &ColorInputs) -> Option<ratatui::style::Color> {
    colors.background_color.as_deref().and_then(background_fill)
}
