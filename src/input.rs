//! Input polling
//!
//! Queries read live keyboard and pointer state at call time; nothing is
//! buffered between frames. Keys are limited to printable ASCII (32..=126).

use crate::surface::SdlPlatform;
use sdl2::keyboard::{Keycode, Scancode};
use std::collections::HashSet;
use std::os::raw::c_int;

/// Printable ASCII range the key queries accept
pub const KEY_RANGE: std::ops::RangeInclusive<u8> = 32..=126;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Fold letters to one case before a key lookup; other keys pass through.
/// `None` outside printable ASCII.
#[inline]
pub fn normalize_key(key: char) -> Option<char> {
    if !key.is_ascii() || !KEY_RANGE.contains(&(key as u8)) {
        return None;
    }
    Some(key.to_ascii_lowercase())
}

pub trait InputSource {
    /// Is the key for this printable ASCII character held down
    fn key_pressed(&self, key: char) -> bool;

    /// Pointer position in screen coordinates
    fn cursor_position(&self) -> (i32, i32);

    fn button_pressed(&self, button: MouseButton) -> bool;

    /// Move the pointer, screen coordinates
    fn set_cursor_position(&mut self, x: i32, y: i32);

    fn set_cursor_visible(&mut self, visible: bool);

    /// Every printable key currently held. Letters are reported in both cases.
    fn pressed_keys(&self) -> Vec<char> {
        let mut keys = Vec::new();
        for code in KEY_RANGE {
            let key = code as char;
            if key.is_ascii_lowercase() {
                continue;
            }
            if self.key_pressed(key) {
                keys.push(key);
                if key.is_ascii_uppercase() {
                    keys.push(key.to_ascii_lowercase());
                }
            }
        }
        keys
    }
}

// ============================================================================
// SDL
// ============================================================================

// SDL_BUTTON masks
const BUTTON_LEFT_MASK: u32 = 1;
const BUTTON_MIDDLE_MASK: u32 = 1 << 1;
const BUTTON_RIGHT_MASK: u32 = 1 << 2;

/// Live keyboard and mouse state from SDL.
/// Keyboard state is refreshed whenever a window drains its events.
pub struct SdlInput {
    platform: SdlPlatform,
}

impl SdlInput {
    pub fn new(platform: &SdlPlatform) -> Self {
        Self {
            platform: platform.clone(),
        }
    }

    fn global_mouse(&self) -> (i32, i32, u32) {
        let (mut x, mut y): (c_int, c_int) = (0, 0);
        // Safety: SDL only writes through the two valid out-pointers.
        let buttons = unsafe { sdl2::sys::SDL_GetGlobalMouseState(&mut x, &mut y) };
        (x, y, buttons)
    }
}

impl InputSource for SdlInput {
    fn key_pressed(&self, key: char) -> bool {
        let Some(key) = normalize_key(key) else {
            return false;
        };
        let Some(scancode) = Keycode::from_i32(key as i32).and_then(Scancode::from_keycode) else {
            return false;
        };
        self.platform
            .with_pump(|pump| pump.keyboard_state().is_scancode_pressed(scancode))
    }

    fn cursor_position(&self) -> (i32, i32) {
        let (x, y, _) = self.global_mouse();
        (x, y)
    }

    fn button_pressed(&self, button: MouseButton) -> bool {
        let (_, _, buttons) = self.global_mouse();
        let mask = match button {
            MouseButton::Left => BUTTON_LEFT_MASK,
            MouseButton::Right => BUTTON_RIGHT_MASK,
            MouseButton::Middle => BUTTON_MIDDLE_MASK,
        };
        buttons & mask != 0
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        // Safety: plain value arguments, no pointers involved.
        let status = unsafe { sdl2::sys::SDL_WarpMouseGlobal(x, y) };
        if status != 0 {
            log::warn!("cannot move cursor to ({}, {}): {}", x, y, sdl2::get_error());
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.platform.show_cursor(visible);
    }
}

// ============================================================================
// Scripted
// ============================================================================

/// Input state set by hand, for tests and off-screen runs
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    keys: HashSet<char>,
    buttons: HashSet<MouseButton>,
    cursor: (i32, i32),
    cursor_visible: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            cursor_visible: true,
            ..Self::default()
        }
    }

    pub fn press_key(&mut self, key: char) {
        if let Some(k) = normalize_key(key) {
            self.keys.insert(k);
        }
    }

    pub fn release_key(&mut self, key: char) {
        if let Some(k) = normalize_key(key) {
            self.keys.remove(&k);
        }
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

impl InputSource for ScriptedInput {
    fn key_pressed(&self, key: char) -> bool {
        normalize_key(key).is_some_and(|k| self.keys.contains(&k))
    }

    fn cursor_position(&self) -> (i32, i32) {
        self.cursor
    }

    fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key('A'), Some('a'));
        assert_eq!(normalize_key('z'), Some('z'));
        assert_eq!(normalize_key(' '), Some(' '));
        assert_eq!(normalize_key('~'), Some('~'));
        assert_eq!(normalize_key('\n'), None);
        assert_eq!(normalize_key('\u{7f}'), None);
        assert_eq!(normalize_key('é'), None);
    }

    #[test]
    fn test_key_lookup_ignores_letter_case() {
        let mut input = ScriptedInput::new();
        input.press_key('w');
        assert!(input.key_pressed('W'));
        assert!(input.key_pressed('w'));
        input.release_key('W');
        assert!(!input.key_pressed('w'));
    }

    #[test]
    fn test_pressed_keys_reports_both_letter_cases() {
        let mut input = ScriptedInput::new();
        input.press_key('q');
        input.press_key('1');
        assert_eq!(input.pressed_keys(), vec!['1', 'Q', 'q']);
    }

    #[test]
    fn test_cursor_and_buttons() {
        let mut input = ScriptedInput::new();
        input.set_cursor_position(40, 90);
        input.press_button(MouseButton::Left);
        input.set_cursor_visible(false);
        assert_eq!(input.cursor_position(), (40, 90));
        assert!(input.button_pressed(MouseButton::Left));
        assert!(!input.button_pressed(MouseButton::Right));
        assert!(!input.is_cursor_visible());
    }
}
