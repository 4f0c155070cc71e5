//! Pixel surface over firmware-owned framebuffer memory
use core::ptr::{read_volatile, write_volatile, NonNull};

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb888,
    Pixel,
};

use crate::framebuffer::color::Color;

/// A 32 bits-per-pixel framebuffer.
///
/// Pixel `(x, y)` lives at word `y * (stride_bytes / 4) + x`. Every drawing
/// call clips against `width` x `height`; coordinates outside it are
/// silently ignored and never turn into a memory access.
pub struct PixelSurface {
    base: NonNull<u32>,
    width: u32,
    height: u32,
    stride_bytes: u32,
}

impl PixelSurface {
    /// # Safety
    ///
    /// `base` must be valid for volatile reads and writes of
    /// `height * stride_bytes` bytes for as long as the surface exists, and
    /// `stride_bytes` must be at least `width * 4`.
    pub unsafe fn from_raw_parts(
        base: NonNull<u32>,
        width: u32,
        height: u32,
        stride_bytes: u32,
    ) -> Self {
        debug_assert!(stride_bytes / 4 >= width);
        Self {
            base,
            width,
            height,
            stride_bytes,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes from the start of one row to the next.
    pub fn stride_bytes(&self) -> u32 {
        self.stride_bytes
    }

    pub fn base_address(&self) -> usize {
        self.base.as_ptr() as usize
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * (self.stride_bytes / 4) as usize + x as usize
    }

    #[inline]
    fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Fill every visible pixel. Row padding is left alone.
    pub fn clear(&mut self, color: Color) {
        let word = color.to_u32();
        for y in 0..self.height {
            let row = self.offset(0, y);
            for x in 0..self.width as usize {
                unsafe { write_volatile(self.base.as_ptr().add(row + x), word) };
            }
        }
    }

    #[inline]
    pub fn draw_pixel(&mut self, x: u32, y: u32, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        // SAFETY: (x, y) is inside the surface, so the offset is inside the
        // region promised to `from_raw_parts`.
        unsafe { write_volatile(self.base.as_ptr().add(self.offset(x, y)), color.to_u32()) };
    }

    /// One pixel wide outline. Empty when either side is zero.
    pub fn draw_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        if w == 0 || h == 0 {
            return;
        }
        let right = x.saturating_add(w - 1);
        let bottom = y.saturating_add(h - 1);

        for i in 0..w {
            let px = x.saturating_add(i);
            self.draw_pixel(px, y, color);
            self.draw_pixel(px, bottom, color);
        }
        for i in 0..h {
            let py = y.saturating_add(i);
            self.draw_pixel(x, py, color);
            self.draw_pixel(right, py, color);
        }
    }

    pub fn draw_filled_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        // everything past the clip edge would be discarded by draw_pixel
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);

        for py in y..y_end {
            for px in x..x_end {
                self.draw_pixel(px, py, color);
            }
        }
    }

    /// Current color at `(x, y)`, or `None` outside the surface.
    pub fn read_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if !self.contains(x, y) {
            return None;
        }
        let word = unsafe { read_volatile(self.base.as_ptr().add(self.offset(x, y))) };
        Some(Color::from_hex(word))
    }
}

impl DrawTarget for PixelSurface {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.draw_pixel(x as u32, y as u32, color.into());
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        PixelSurface::clear(self, color.into());
        Ok(())
    }
}

impl OriginDimensions for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
