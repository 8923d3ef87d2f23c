use crate::color::Color;
use crate::error::{Error, Result};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Logical client area: `width * height` colors, row-major
/// Owns no platform resources; the surface copies it into its backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
    base: Color,
}

impl PixelBuffer {
    /// Create a buffer filled with `base`, which is also what out-of-range reads return
    pub fn new(width: u32, height: u32, base: Color) -> Self {
        Self {
            pixels: vec![base; area(width, height)],
            width,
            height,
            base,
        }
    }

    /// Zero-area buffer, used before a window is shown
    pub fn empty(base: Color) -> Self {
        Self::new(0, 0, base)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn base(&self) -> Color {
        self.base
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as i64) < self.width as i64 && y >= 0 && (y as i64) < self.height as i64
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read a pixel; out of range yields the base color
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        if self.contains(x, y) {
            self.pixels[self.pixel_index(x as u32, y as u32)]
        } else {
            self.base
        }
    }

    /// Write a pixel; out of range is ignored
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if self.contains(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Overwrite every pixel
    pub fn fill(&mut self, color: Color) -> Result<()> {
        let expected = area(self.width, self.height);
        if self.pixels.len() != expected {
            return Err(Error::BufferMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        self.pixels.fill(color);
        Ok(())
    }

    /// Replace contents with a fresh `width * height` buffer of `fill`.
    /// Old contents are discarded. On allocation failure the old buffer is kept.
    pub fn resize(&mut self, width: u32, height: u32, fill: Color) -> Result<()> {
        let count = area(width, height);
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| Error::Allocation { width, height })?;
        pixels.resize(count, fill);

        self.pixels = pixels;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Row-major view of every pixel
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// One row, or `None` past the last row
    pub fn row(&self, y: u32) -> Option<&[Color]> {
        if y >= self.height {
            return None;
        }
        let start = self.pixel_index(0, y);
        Some(&self.pixels[start..start + self.width as usize])
    }
}

#[inline]
fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
