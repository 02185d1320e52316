//! RGBA pixel buffer for overlay rendering.
//!
//! The buffer is the display-ready output of one redraw: it is allocated
//! transparent, written once by the renderer, then handed to the display
//! surface. Writes overwrite; nothing in here blends.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::Point;

/// Row alignment in bytes (64 bytes = 16 RGBA pixels).
const ROW_ALIGNMENT: usize = 64;

/// Row-aligned RGBA framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order.
    /// Each pixel is 4 bytes: [R, G, B, A].
    pixels: Vec<u8>,
    /// Stride in bytes (may include padding for alignment).
    stride: usize,
}

impl Framebuffer {
    /// Create a new fully transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use pm25_map::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(1000, 500).unwrap();
    /// assert_eq!(fb.width(), 1000);
    /// assert_eq!(fb.covered_pixels(), 0);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);

        Ok(Self {
            width,
            height,
            pixels: vec![0; stride * (height as usize)],
            stride,
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Clear the framebuffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        let row_bytes = (self.width as usize) * 4;

        for row in self.pixels.chunks_exact_mut(self.stride) {
            for chunk in row[..row_bytes].chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// Coordinates are clamped to framebuffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let rgba = color.to_array();
        let rect_width = (x2 - x1) as usize;

        for row_y in y1..y2 {
            let row_start = self.pixel_index(x1, row_y);
            let row = &mut self.pixels[row_start..row_start + rect_width * 4];

            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    /// Fill a `size × size` square centered on `center`, clipped to the buffer.
    ///
    /// The square spans `[floor(c - size/2), floor(c - size/2) + size)` on
    /// each axis, so it may start at a negative coordinate and be partly
    /// clipped away.
    pub fn fill_cell(&mut self, center: Point, size: u32, color: Rgba) {
        if size == 0 || !center.is_finite() {
            return;
        }

        let half = size as f32 / 2.0;
        let x0 = (center.x - half).floor() as i64;
        let y0 = (center.y - half).floor() as i64;
        let x1 = (x0 + i64::from(size)).clamp(0, i64::from(self.width));
        let y1 = (y0 + i64::from(size)).clamp(0, i64::from(self.height));
        let x0 = x0.clamp(0, i64::from(self.width));
        let y0 = y0.clamp(0, i64::from(self.height));

        self.fill_rect(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
            color,
        );
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Number of pixels with non-zero alpha.
    #[must_use]
    pub fn covered_pixels(&self) -> usize {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .flat_map(|row| row.chunks_exact(4))
            .filter(|px| px[3] != 0)
            .count()
    }

    /// Calculate the byte index for a pixel coordinate.
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Get pixel data as a tightly packed `width × height × 4` buffer.
    ///
    /// This is the layout 2D drawing surfaces and PNG encoders expect.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels.clone();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer_is_transparent() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.to_compact_pixels().len(), 100 * 50 * 4);
        assert_eq!(fb.covered_pixels(), 0);
        assert_eq!(fb.get_pixel(99, 49), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(0, 0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::rgb(255, 0, 0));

        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(fb.get_pixel(x, y), Some(Rgba::rgb(255, 0, 0)));
            }
        }
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        fb.fill_rect(15, 15, 100, 100, Rgba::rgb(0, 0, 255));

        assert_eq!(fb.get_pixel(19, 19), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(fb.get_pixel(14, 14), Some(Rgba::TRANSPARENT));
        assert_eq!(fb.covered_pixels(), 25);
    }

    #[test]
    fn test_fill_cell_centered() {
        let mut fb = Framebuffer::new(20, 20).unwrap();
        fb.fill_cell(Point::new(10.0, 10.0), 2, Rgba::rgb(255, 0, 0));

        // floor(10 - 1) = 9, spans 9..11
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(fb.get_pixel(11, 10), Some(Rgba::TRANSPARENT));
        assert_eq!(fb.covered_pixels(), 4);
    }

    #[test]
    fn test_fill_cell_clips_at_edges() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.fill_cell(Point::new(0.0, 0.0), 4, Rgba::rgb(0, 255, 0));
        // Square spans -2..2 on both axes, only 0..2 survives
        assert_eq!(fb.covered_pixels(), 4);

        fb.fill_cell(Point::new(-50.0, 5.0), 4, Rgba::rgb(0, 255, 0));
        assert_eq!(fb.covered_pixels(), 4);
    }

    #[test]
    fn test_fill_cell_ignores_non_finite() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.fill_cell(Point::new(f32::NAN, 5.0), 4, Rgba::rgb(0, 255, 0));
        assert_eq!(fb.covered_pixels(), 0);
    }

    #[test]
    fn test_get_pixel_out_of_bounds() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.fill_rect(5, 5, 1, 1, Rgba::rgb(0, 0, 255));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::rgb(0, 0, 255)));
        assert_eq!(fb.get_pixel(10, 5), None);
        assert_eq!(fb.get_pixel(5, 100), None);
    }

    #[test]
    fn test_compact_pixels_drops_padding() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.fill_rect(2, 1, 1, 1, Rgba::new(1, 2, 3, 4));

        let compact = fb.to_compact_pixels();
        assert_eq!(compact.len(), 3 * 2 * 4);
        assert_eq!(&compact[20..24], &[1, 2, 3, 4]);
    }
}
