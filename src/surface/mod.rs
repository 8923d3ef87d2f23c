//! Platform surface binding
//!
//! A surface is the native window, its drawing context and the backing store
//! the pixel buffer is copied into, managed as one resource group. The
//! `Window` only talks to it through [`Surface`].

pub mod headless;
pub mod sdl;

pub use headless::HeadlessSurface;
pub use sdl::{SdlPlatform, SdlSurface};

use crate::buffer::PixelBuffer;
use crate::config::WindowConfig;
use crate::error::Result;

/// Events a surface delivers to its window, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// Client area changed size
    Resized { width: u32, height: u32 },
    /// Window moved; screen position of the client area
    Moved { x: i32, y: i32 },
    /// Wheel motion in notches
    Scrolled { dx: f32, dy: f32 },
    Focus(bool),
    /// Close button, quit request or `request_close`
    CloseRequested,
    /// Contents were invalidated and must be presented again
    Exposed,
}

/// Resolution of a display, with the derived measures callers ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    pub width: u32,
    pub height: u32,
}

impl DisplayMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels on the display
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Width times height, in pixels squared
    #[inline]
    pub fn area(&self) -> u64 {
        self.pixel_count()
    }

    /// Diagonal length in pixels
    #[inline]
    pub fn diagonal(&self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }
}

pub trait Surface {
    /// Allocate the native window, hidden, with the configured client size.
    /// Does not retry.
    fn create(&mut self, config: &WindowConfig) -> Result<()>;

    fn is_created(&self) -> bool;

    /// Make the window visible
    fn show(&mut self);

    /// Current client-area size in pixels
    fn client_size(&self) -> (u32, u32);

    /// Screen position of the client area's top-left corner
    fn client_origin(&self) -> (i32, i32);

    /// Release the old backing store, then allocate a 32-bit top-down one
    /// of the given size. A zero-area size leaves no backing store.
    fn rebuild_backing(&mut self, width: u32, height: u32) -> Result<()>;

    /// Copy the buffer into the backing store in native pixel order
    fn push_buffer(&mut self, buffer: &PixelBuffer) -> Result<()>;

    /// Blit the backing store over the whole client area
    fn present(&mut self) -> Result<()>;

    /// Drain pending events for this surface
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;

    /// Ask for a `CloseRequested` event on the next poll
    fn request_close(&mut self);

    /// Release backing store, context and window. Idempotent.
    fn teardown(&mut self);
}

/// Write `buffer` into a native ARGB8888 store laid out as rows of `pitch` bytes.
/// Rows and columns beyond either side's extent are skipped.
pub(crate) fn copy_to_native(buffer: &PixelBuffer, dest: &mut [u8], pitch: usize) {
    let row_bytes = buffer.width() as usize * 4;
    for (y, dst_row) in dest.chunks_mut(pitch).take(buffer.height() as usize).enumerate() {
        let Some(src_row) = buffer.row(y as u32) else {
            break;
        };
        let usable = row_bytes.min(dst_row.len());
        for (dst, color) in dst_row[..usable].chunks_exact_mut(4).zip(src_row) {
            dst.copy_from_slice(&color.to_native_argb().to_ne_bytes());
        }
    }
}
