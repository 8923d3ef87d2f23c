//! Immediate-mode software-rendered window
//!
//! A [`Window`] owns a pixel buffer mirrored into a platform surface, a
//! compositing pixel API and a fixed-rate frame pump.

pub mod buffer;
pub mod color;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod surface;
pub mod timing;
pub mod window;

pub use buffer::PixelBuffer;
pub use color::{parse_blue, parse_green, parse_red, parse_rgb, rgb, Color, Rgba};
pub use config::{WindowConfig, WindowStyle, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use error::{Error, Result};
pub use input::{InputSource, MouseButton, ScriptedInput, SdlInput};
pub use surface::{DisplayMetrics, HeadlessSurface, SdlPlatform, SdlSurface, Surface, SurfaceEvent};
pub use timing::{pacing_delay, FrameClock};
pub use window::{Lifecycle, Window};
