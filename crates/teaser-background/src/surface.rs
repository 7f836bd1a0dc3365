//! Drawing surfaces for the particle field.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Painter, Shape},
    },
};
use teaser_core::{Rgb, Viewport};

use crate::color::Fill;

/// Something the particle field can draw on.
///
/// Coordinates passed to [`Surface::fill_circle`] are in viewport units;
/// the surface applies its own pixel ratio.
pub trait Surface {
    /// Size the surface for `viewport` and reset the drawing scale.
    fn configure(&mut self, viewport: &Viewport);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Fill a disk with the given opacity.
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, alpha: f32, fill: &Fill);
}

/// One filled disk in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dot {
    x: f64,
    y: f64,
    radius: f64,
    color: Color,
}

/// Braille canvas surface rendered as a ratatui widget.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    /// Surface width in device pixels.
    width: u32,
    /// Surface height in device pixels.
    height: u32,
    /// Device pixels per viewport unit.
    scale: f32,
    /// Color translucent particles are mixed over.
    backdrop: Rgb,
    /// Solid fill behind the particles, `None` for transparent.
    background: Option<Color>,
    dots: Vec<Dot>,
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            backdrop: Rgb::BLACK,
            background: None,
            dots: Vec::new(),
        }
    }

    pub fn set_backdrop(&mut self, backdrop: Rgb) {
        self.backdrop = backdrop;
    }

    pub fn set_background(&mut self, background: Option<Color>) {
        self.background = background;
    }

    /// Surface size in device pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of disks drawn since the last clear.
    pub fn dot_count(&self) -> usize {
        self.dots.len()
    }
}

impl Surface for CanvasSurface {
    fn configure(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.surface_size();
        self.width = width;
        self.height = height;
        self.scale = viewport.pixel_ratio;
    }

    fn clear(&mut self) {
        self.dots.clear();
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, alpha: f32, fill: &Fill) {
        let scale = self.scale as f64;
        self.dots.push(Dot {
            x: x as f64 * scale,
            y: y as f64 * scale,
            radius: radius as f64 * scale,
            color: fill.shade(alpha, self.backdrop),
        });
    }
}

/// Shape that paints every dot as a filled disk at braille resolution.
struct DotLayer<'a> {
    dots: &'a [Dot],
    /// Surface height, for flipping y (canvas y grows upwards).
    height: f64,
    /// Device pixels per braille dot, horizontally.
    step_x: f64,
    /// Device pixels per braille dot, vertically.
    step_y: f64,
}

impl Shape for DotLayer<'_> {
    fn draw(&self, painter: &mut Painter) {
        for dot in self.dots {
            let cy = self.height - dot.y;
            if let Some((px, py)) = painter.get_point(dot.x, cy) {
                painter.paint(px, py, dot.color);
            }

            let r2 = dot.radius * dot.radius;
            let mut dy = -dot.radius;
            while dy <= dot.radius {
                let mut dx = -dot.radius;
                while dx <= dot.radius {
                    if dx * dx + dy * dy <= r2
                        && let Some((px, py)) = painter.get_point(dot.x + dx, cy + dy)
                    {
                        painter.paint(px, py, dot.color);
                    }
                    dx += self.step_x;
                }
                dy += self.step_y;
            }
        }
    }
}

impl Widget for &CanvasSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.width == 0 || self.height == 0 {
            return;
        }

        let width = self.width as f64;
        let height = self.height as f64;
        // Braille cells are 2 dots wide and 4 dots tall
        let layer = DotLayer {
            dots: &self.dots,
            height,
            step_x: width / (area.width as f64 * 2.0),
            step_y: height / (area.height as f64 * 4.0),
        };

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| ctx.draw(&layer));
        if let Some(background) = self.background {
            canvas = canvas.background_color(background);
        }
        canvas.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_uses_pixel_ratio() {
        let mut surface = CanvasSurface::new();
        surface.configure(&Viewport::new(100.0, 40.0, 2.0));
        assert_eq!(surface.size(), (200, 80));

        surface.fill_circle(10.0, 5.0, 1.5, 1.0, &Fill::from_css("#fff"));
        assert_eq!(surface.dots[0].x, 20.0);
        assert_eq!(surface.dots[0].y, 10.0);
        assert_eq!(surface.dots[0].radius, 3.0);
    }

    #[test]
    fn test_clear_drops_dots() {
        let mut surface = CanvasSurface::new();
        surface.configure(&Viewport::new(10.0, 10.0, 1.0));
        surface.fill_circle(1.0, 1.0, 1.0, 0.5, &Fill::from_css("#fff"));
        assert_eq!(surface.dot_count(), 1);
        surface.clear();
        assert_eq!(surface.dot_count(), 0);
    }

    #[test]
    fn test_dots_blend_over_backdrop() {
        let mut surface = CanvasSurface::new();
        surface.configure(&Viewport::new(10.0, 10.0, 1.0));
        surface.set_backdrop(Rgb::BLACK);
        surface.fill_circle(1.0, 1.0, 1.0, 0.5, &Fill::from_css("#ffffff"));
        assert_eq!(surface.dots[0].color, Color::Rgb(128, 128, 128));
    }

    #[test]
    fn test_render_paints_braille() {
        let area = Rect::new(0, 0, 4, 2);
        let mut surface = CanvasSurface::new();
        surface.configure(&Viewport::from_cells(area.width, area.height, 1.0));
        surface.fill_circle(12.0, 8.0, 3.0, 0.85, &Fill::from_css("#ffffff"));

        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);

        let painted = buf
            .content()
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(painted >= 1);
    }

    #[test]
    fn test_render_skips_unconfigured_surface() {
        let area = Rect::new(0, 0, 4, 2);
        let surface = CanvasSurface::new();
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(buf.content().iter().all(|cell| cell.symbol() == " "));
    }
}
