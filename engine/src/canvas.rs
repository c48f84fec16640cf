//! CPU framebuffer the game draws into each frame

use crate::color::Color;
use crate::rect::Rect;

/// RGBA8 pixel buffer, row-major, top-left origin
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
        }
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Fill a rectangle, clipped to the canvas. Edges are rounded to whole pixels.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let bytes = color.to_bytes();
        for y in y0..y1 {
            let row = (y * self.width + x0) * 4..(y * self.width + x1) * 4;
            for pixel in self.pixels[row].chunks_exact_mut(4) {
                pixel.copy_from_slice(&bytes);
            }
        }
    }

    /// Outline of `thickness` pixels drawn inside the rectangle
    pub fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f64) {
        let t = thickness.min(rect.width * 0.5).min(rect.height * 0.5);
        if t <= 0.0 {
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t), color);
        self.fill_rect(
            Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t),
            color,
        );
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let clamp_x = |v: f64| v.round().clamp(0.0, self.width as f64) as usize;
        let clamp_y = |v: f64| v.round().clamp(0.0, self.height as f64) as usize;
        let (x0, x1) = (clamp_x(rect.left()), clamp_x(rect.right()));
        let (y0, y1) = (clamp_y(rect.top()), clamp_y(rect.bottom()));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_everything() {
        let mut canvas = Canvas::new(4, 3);
        canvas.fill(Color::GREY);
        assert!(canvas.as_bytes().chunks(4).all(|p| p == [125, 125, 125, 255]));
    }

    #[test]
    fn fill_rect_paints_only_inside() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill(Color::BLACK);
        canvas.fill_rect(Rect::new(2.0, 3.0, 4.0, 2.0), Color::RED);

        assert_eq!(canvas.pixel(2, 3), Some(Color::RED));
        assert_eq!(canvas.pixel(5, 4), Some(Color::RED));
        assert_eq!(canvas.pixel(6, 4), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 5), Some(Color::BLACK));
        assert_eq!(canvas.pixel(1, 3), Some(Color::BLACK));
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut canvas = Canvas::new(5, 5);
        canvas.fill_rect(Rect::new(-10.0, 3.0, 100.0, 100.0), Color::WHITE);
        assert_eq!(canvas.pixel(0, 3), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(Color::WHITE));
        assert_eq!(canvas.pixel(0, 2), Some(Color::new(0, 0, 0, 0)));

        // Fully outside is a no-op
        canvas.fill_rect(Rect::new(50.0, 50.0, 5.0, 5.0), Color::RED);
    }

    #[test]
    fn stroke_leaves_interior() {
        let mut canvas = Canvas::new(10, 10);
        canvas.stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::YELLOW, 1.0);
        assert_eq!(canvas.pixel(0, 0), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(9, 5), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(5, 9), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(5, 5), Some(Color::new(0, 0, 0, 0)));
    }

    #[test]
    fn pixel_out_of_bounds_is_none() {
        let canvas = Canvas::new(2, 2);
        assert_eq!(canvas.pixel(2, 0), None);
    }

    #[test]
    fn resize_reallocates() {
        let mut canvas = Canvas::new(2, 2);
        canvas.resize(3, 4);
        assert_eq!(canvas.as_bytes().len(), 3 * 4 * 4);
    }
}
