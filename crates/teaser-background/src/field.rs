//! The animated particle field (stateful).

use rand::Rng;
use teaser_core::Viewport;

use crate::color::Fill;
use crate::particle::Particle;
use crate::surface::Surface;

/// Particle count used when none is configured.
pub const DEFAULT_PARTICLE_COUNT: usize = 450;

/// A fixed set of particles that fade in one per frame, then drift forever.
#[derive(Debug, Clone)]
pub struct ParticleField {
    /// Particles in draw order.
    particles: Vec<Particle>,
    /// How many particles are currently updated and drawn.
    revealed: usize,
    viewport: Viewport,
}

impl ParticleField {
    /// Create a field of `count` particles spread over `viewport`.
    pub fn new(count: usize, viewport: Viewport, fill: Fill) -> Self {
        Self::with_rng(count, viewport, fill, &mut rand::rng())
    }

    /// Like [`ParticleField::new`] with a caller-supplied random source.
    pub fn with_rng<R: Rng>(count: usize, viewport: Viewport, fill: Fill, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(rng, &viewport, fill.clone()))
            .collect();
        Self {
            particles,
            revealed: 0,
            viewport,
        }
    }

    /// Advance the animation by one frame and draw it.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        surface.clear();
        if self.revealed < self.particles.len() {
            self.revealed += 1;
        }

        let Viewport { width, height, .. } = self.viewport;
        for p in &mut self.particles[..self.revealed] {
            p.step(width, height);
            surface.fill_circle(p.x, p.y, p.radius, p.alpha, &p.fill);
        }
    }

    /// Adopt a new viewport, keeping particles at the same relative spots.
    pub fn resize(&mut self, viewport: Viewport) {
        let previous = std::mem::replace(&mut self.viewport, viewport);
        if previous.width > 0.0 && previous.height > 0.0 {
            for p in &mut self.particles {
                p.rescale(&previous, &viewport);
            }
        }
    }

    /// Repaint every particle with a new fill.
    pub fn set_fill(&mut self, fill: Fill) {
        for p in &mut self.particles {
            p.fill = fill.clone();
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of particles currently visible.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
