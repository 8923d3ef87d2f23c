//! In-memory surface
//!
//! Behaves like a window that is never put on screen: the backing store is a
//! plain byte vector and events are injected by the owner. Used by the tests
//! and for off-screen runs.

use super::{copy_to_native, Surface, SurfaceEvent};
use crate::buffer::PixelBuffer;
use crate::config::WindowConfig;
use crate::error::{Error, Result};
use std::collections::VecDeque;

#[derive(Debug, Default)]
struct Backing {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    created: bool,
    visible: bool,
    fail_create: bool,
    size: (u32, u32),
    origin: (i32, i32),
    backing: Option<Backing>,
    events: VecDeque<SurfaceEvent>,
    pushes: usize,
    presents: usize,
    rebuilds: usize,
    teardowns: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose `create` fails, as when the platform has no window to give
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    /// Queue an event for the next poll
    pub fn push_event(&mut self, event: SurfaceEvent) {
        self.events.push_back(event);
    }

    /// Change the client size and queue the matching resize event
    pub fn resize_client(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.push_event(SurfaceEvent::Resized { width, height });
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_backing(&self) -> bool {
        self.backing.is_some()
    }

    /// Size of the current backing store
    pub fn backing_size(&self) -> Option<(u32, u32)> {
        self.backing.as_ref().map(|b| (b.width, b.height))
    }

    /// Native ARGB word at (x, y) of the backing store
    pub fn backing_pixel(&self, x: u32, y: u32) -> Option<u32> {
        let b = self.backing.as_ref()?;
        if x >= b.width || y >= b.height {
            return None;
        }
        let off = ((y * b.width + x) * 4) as usize;
        let word = b.bytes.get(off..off + 4)?;
        Some(u32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
    }

    pub fn push_count(&self) -> usize {
        self.pushes
    }

    pub fn present_count(&self) -> usize {
        self.presents
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub fn teardown_count(&self) -> usize {
        self.teardowns
    }

    fn release_backing(&mut self) {
        self.backing = None;
    }
}

impl Surface for HeadlessSurface {
    fn create(&mut self, config: &WindowConfig) -> Result<()> {
        if self.fail_create {
            return Err(Error::WindowCreate("headless surface configured to fail".into()));
        }
        self.created = true;
        self.size = (config.width, config.height);
        self.origin = (config.x, config.y);
        Ok(())
    }

    fn is_created(&self) -> bool {
        self.created
    }

    fn show(&mut self) {
        if self.created {
            self.visible = true;
        }
    }

    fn client_size(&self) -> (u32, u32) {
        self.size
    }

    fn client_origin(&self) -> (i32, i32) {
        self.origin
    }

    fn rebuild_backing(&mut self, width: u32, height: u32) -> Result<()> {
        self.release_backing();
        self.rebuilds += 1;
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.backing = Some(Backing {
            bytes: vec![0; width as usize * height as usize * 4],
            width,
            height,
        });
        Ok(())
    }

    fn push_buffer(&mut self, buffer: &PixelBuffer) -> Result<()> {
        self.pushes += 1;
        if let Some(b) = self.backing.as_mut() {
            copy_to_native(buffer, &mut b.bytes, b.width as usize * 4);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if self.backing.is_some() {
            self.presents += 1;
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        if let Some(SurfaceEvent::Moved { x, y }) =
            self.events.iter().rev().find(|e| matches!(e, SurfaceEvent::Moved { .. }))
        {
            self.origin = (*x, *y);
        }
        self.events.drain(..).collect()
    }

    fn request_close(&mut self) {
        if self.created {
            self.push_event(SurfaceEvent::CloseRequested);
        }
    }

    fn teardown(&mut self) {
        if !self.created && self.backing.is_none() {
            return;
        }
        self.release_backing();
        self.created = false;
        self.visible = false;
        self.teardowns += 1;
    }
}
