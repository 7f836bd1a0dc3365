//! A single twinkling dot of the particle field.

use std::f32::consts::TAU;
use std::ops::Range;

use rand::Rng;
use teaser_core::Viewport;

use crate::color::Fill;

/// Distance beyond each edge a particle may drift before wrapping around.
pub const EDGE_MARGIN: f32 = 24.0;

/// Dimmest a particle gets while twinkling.
pub const MIN_ALPHA: f32 = 0.08;

/// Brightest a particle gets while twinkling.
pub const MAX_ALPHA: f32 = 0.85;

const RADIUS_RANGE: Range<f32> = 0.4..3.0;
const SPEED_RANGE: Range<f32> = 0.15..0.70;
const SPAWN_ALPHA_RANGE: Range<f32> = 0.15..0.70;
const ALPHA_SPEED_RANGE: Range<f32> = 0.0025..0.0085;

/// Viewports shorter than this get slower particles.
const SMALL_VIEWPORT_HEIGHT: f32 = 500.0;
const SMALL_VIEWPORT_SPEED_SCALE: f32 = 0.75;

/// State for one particle, in viewport units.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    /// Horizontal movement per frame.
    pub vx: f32,
    /// Vertical movement per frame.
    pub vy: f32,
    pub radius: f32,
    pub base_radius: f32,
    /// Current opacity.
    pub alpha: f32,
    /// Twinkle direction, +1.0 brightening or -1.0 dimming.
    pub alpha_dir: f32,
    /// Opacity change per frame.
    pub alpha_speed: f32,
    pub fill: Fill,
}

/// Uniform sample in `[0, extent)`, or 0 for an empty extent.
fn sample_extent<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.random_range(0.0..extent)
    } else {
        0.0
    }
}

impl Particle {
    /// Spawn a particle at a random spot of the viewport.
    pub fn spawn<R: Rng>(rng: &mut R, viewport: &Viewport, fill: Fill) -> Self {
        let radius = rng.random_range(RADIUS_RANGE);
        let scale = if viewport.height < SMALL_VIEWPORT_HEIGHT {
            SMALL_VIEWPORT_SPEED_SCALE
        } else {
            1.0
        };
        let speed = rng.random_range(SPEED_RANGE) * scale;
        let angle = rng.random_range(0.0..TAU);

        Self {
            x: sample_extent(rng, viewport.width),
            y: sample_extent(rng, viewport.height),
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            radius,
            base_radius: radius,
            alpha: rng.random_range(SPAWN_ALPHA_RANGE),
            alpha_dir: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            alpha_speed: rng.random_range(ALPHA_SPEED_RANGE),
            fill,
        }
    }

    /// Advance one frame: drift with wrap-around, then twinkle.
    pub fn step(&mut self, width: f32, height: f32) {
        self.x += self.vx;
        self.y += self.vy;

        let m = EDGE_MARGIN;
        if self.x < -m {
            self.x = width + m;
        } else if self.x > width + m {
            self.x = -m;
        }
        if self.y < -m {
            self.y = height + m;
        } else if self.y > height + m {
            self.y = -m;
        }

        self.alpha += self.alpha_speed * self.alpha_dir;
        if self.alpha > MAX_ALPHA {
            self.alpha = MAX_ALPHA;
            self.alpha_dir = -1.0;
        } else if self.alpha < MIN_ALPHA {
            self.alpha = MIN_ALPHA;
            self.alpha_dir = 1.0;
        }
    }

    /// Keep the relative position when the viewport changes size.
    pub fn rescale(&mut self, from: &Viewport, to: &Viewport) {
        self.x = self.x / from.width * to.width;
        self.y = self.y / from.height * to.height;
    }
}
