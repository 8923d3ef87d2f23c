//! Color model
//!
//! `Color` packs three 8-bit channels into one integer using the COLORREF
//! layout (`0x00BBGGRR`). `Rgba` adds a float alpha and offers two distinct
//! alpha operations: [`Rgba::attenuate`] scales the channels with no backdrop,
//! [`Rgba::composite_over`] blends against an existing pixel.

use serde::{Deserialize, Serialize};

// ============================================================================
// Color
// ============================================================================

/// Packed RGB color, `0x00BBGGRR`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const WHITE: Color = Color(0x00FF_FFFF);

    /// Build from exact channel values
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    /// Raw packed value
    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_packed(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Native 32-bit ARGB word (`0xAARRGGBB`, alpha always opaque)
    #[inline]
    pub const fn to_native_argb(self) -> u32 {
        0xFF00_0000 | (self.red() as u32) << 16 | (self.green() as u32) << 8 | self.blue() as u32
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.red(), c.green(), c.blue()]
    }
}

/// Pack three channels. Values outside 0..=255 keep only their low byte,
/// matching the native packing macro.
#[inline]
pub const fn rgb(r: i32, g: i32, b: i32) -> Color {
    Color::new(r as u8, g as u8, b as u8)
}

#[inline]
pub const fn parse_red(color: Color) -> u8 {
    color.red()
}

#[inline]
pub const fn parse_green(color: Color) -> u8 {
    color.green()
}

#[inline]
pub const fn parse_blue(color: Color) -> u8 {
    color.blue()
}

#[inline]
pub const fn parse_rgb(color: Color) -> (u8, u8, u8) {
    (color.red(), color.green(), color.blue())
}

// ============================================================================
// Rgba
// ============================================================================

/// RGB plus an opacity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    a: f32,
}

fn clamp_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    }
}

impl Rgba {
    /// Alpha above 1 is clamped to 1, below 0 (or NaN) to 0
    pub fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: clamp_alpha(alpha),
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_color(color: Color, alpha: f32) -> Self {
        Self::new(color.red(), color.green(), color.blue(), alpha)
    }

    #[inline]
    pub fn red(&self) -> u8 {
        self.r
    }

    #[inline]
    pub fn green(&self) -> u8 {
        self.g
    }

    #[inline]
    pub fn blue(&self) -> u8 {
        self.b
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.a
    }

    /// The channels without alpha
    #[inline]
    pub fn color(&self) -> Color {
        Color::new(self.r, self.g, self.b)
    }

    /// `rgb(r*a, g*a, b*a)`: scales toward black, independent of any backdrop
    #[inline]
    pub fn attenuate(&self) -> Color {
        rgb(
            (self.r as f32 * self.a) as i32,
            (self.g as f32 * self.a) as i32,
            (self.b as f32 * self.a) as i32,
        )
    }

    /// Source-over blend: `src*a + dst*(1-a)` per channel, truncated
    #[inline]
    pub fn composite_over(&self, backdrop: Color) -> Color {
        rgb(
            composite_channel(self.r, backdrop.red(), self.a),
            composite_channel(self.g, backdrop.green(), self.a),
            composite_channel(self.b, backdrop.blue(), self.a),
        )
    }
}

impl Default for Rgba {
    /// Fully transparent black
    fn default() -> Self {
        Self::new(0, 0, 0, 0.0)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        Self::from_color(color, 1.0)
    }
}

#[inline]
fn composite_channel(src: u8, dst: u8, alpha: f32) -> i32 {
    (src as f32 * alpha + dst as f32 * (1.0 - alpha)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_round_trip() {
        let c = rgb(12, 34, 56);
        assert_eq!(parse_rgb(c), (12, 34, 56));
        assert_eq!(parse_red(c), 12);
        assert_eq!(parse_green(c), 34);
        assert_eq!(parse_blue(c), 56);
        assert_eq!(c.packed(), 0x0038_220C);
    }

    #[test]
    fn test_rgb_wraps_out_of_range_channels() {
        assert_eq!(parse_rgb(rgb(256, -1, 300)), (0, 255, 44));
    }

    #[test]
    fn test_native_argb_swaps_channel_order() {
        assert_eq!(rgb(0x11, 0x22, 0x33).to_native_argb(), 0xFF11_2233);
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Rgba::new(1, 2, 3, 4.0).alpha(), 1.0);
        assert_eq!(Rgba::new(1, 2, 3, -0.5).alpha(), 0.0);
        assert_eq!(Rgba::new(1, 2, 3, f32::NAN).alpha(), 0.0);
        assert_eq!(Rgba::from_color(Color::WHITE, 7.0).alpha(), 1.0);
    }

    #[test]
    fn test_attenuate_ignores_backdrop() {
        let half = Rgba::new(200, 100, 50, 0.5);
        assert_eq!(half.attenuate(), rgb(100, 50, 25));
        assert_eq!(Rgba::new(200, 100, 50, 0.0).attenuate(), Color::BLACK);
    }

    #[test]
    fn test_composite_over_blends_with_backdrop() {
        let backdrop = rgb(100, 100, 100);
        assert_eq!(Rgba::new(200, 0, 50, 0.5).composite_over(backdrop), rgb(150, 50, 75));
        assert_eq!(Rgba::new(9, 9, 9, 1.0).composite_over(backdrop), rgb(9, 9, 9));
        assert_eq!(Rgba::new(9, 9, 9, 0.0).composite_over(backdrop), backdrop);
    }

    #[test]
    fn test_color_serializes_as_channel_triplet() {
        let json = serde_json::to_string(&rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rgb(1, 2, 3));
    }
}
