//! Particle field background for the teaser page.
//!
//! This crate provides the decorative "space" background: a fixed set of
//! twinkling particles that fade in one per frame, drift with wrap-around
//! and pick a fill color that contrasts with whatever sits behind them.

mod color;
mod field;
mod particle;
mod resolver;
mod state;
mod surface;

pub use color::{
    Fill, NEAR_BLACK, NEAR_WHITE, contrast_color, is_transparent, parse_rgb, relative_luminance,
};
pub use field::{DEFAULT_PARTICLE_COUNT, ParticleField};
pub use particle::{EDGE_MARGIN, MAX_ALPHA, MIN_ALPHA, Particle};
pub use resolver::{
    ColorInputs, ContrastWatch, MUTATION_DEBOUNCE, Resolution, Surroundings, detect_background,
    resolve,
};
pub use state::{BackgroundOptions, SpaceBackground};
pub use surface::{CanvasSurface, Surface};
