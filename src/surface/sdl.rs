//! SDL2 surface binding
//!
//! One [`SdlPlatform`] owns the SDL context and its single event pump. Every
//! [`SdlSurface`] created from it registers its window id; draining the pump
//! routes each event into the queue of the window it belongs to, so any
//! number of windows can share the context without seeing each other's events.

use super::{copy_to_native, DisplayMetrics, Surface, SurfaceEvent};
use crate::buffer::PixelBuffer;
use crate::config::WindowConfig;
use crate::error::{Error, Result};
use log::{debug, info, trace, warn};
use sdl2::event::{Event, WindowEvent};
use sdl2::mouse::{MouseUtil, MouseWheelDirection};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::video::WindowContext;
use sdl2::{EventPump, Sdl, VideoSubsystem};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

// ============================================================================
// Platform (shared context + registry)
// ============================================================================

struct Shared {
    _sdl: Sdl,
    video: VideoSubsystem,
    pump: EventPump,
    mouse: MouseUtil,
    /// window id -> events not yet taken by that window
    registry: HashMap<u32, VecDeque<SurfaceEvent>>,
}

impl Shared {
    /// Drain the SDL queue into the per-window queues
    fn dispatch(&mut self) {
        let Shared { pump, registry, .. } = self;
        for event in pump.poll_iter() {
            match translate(&event) {
                Some(Routed::One(id, ev)) => match registry.get_mut(&id) {
                    Some(queue) => queue.push_back(ev),
                    None => trace!("dropping event for unregistered window {}: {:?}", id, ev),
                },
                Some(Routed::All(ev)) => {
                    for queue in registry.values_mut() {
                        queue.push_back(ev);
                    }
                },
                None => {},
            }
        }
    }
}

/// Shared SDL context. Cheap to clone; single-threaded.
#[derive(Clone)]
pub struct SdlPlatform {
    shared: Rc<RefCell<Shared>>,
}

impl SdlPlatform {
    pub fn init() -> Result<Self> {
        let sdl = sdl2::init().map_err(Error::Platform)?;
        let video = sdl.video().map_err(Error::Platform)?;
        let pump = sdl.event_pump().map_err(Error::Platform)?;
        let mouse = sdl.mouse();
        info!("SDL video driver: {}", video.current_video_driver());

        Ok(Self {
            shared: Rc::new(RefCell::new(Shared {
                _sdl: sdl,
                video,
                pump,
                mouse,
                registry: HashMap::new(),
            })),
        })
    }

    /// A fresh, not yet created surface bound to this context
    pub fn surface(&self) -> SdlSurface {
        SdlSurface {
            platform: self.clone(),
            canvas: None,
            creator: None,
            backing: None,
            window_id: None,
            pending_close: false,
        }
    }

    /// Desktop resolution of the primary display
    pub fn display_size(&self) -> Result<(u32, u32)> {
        let shared = self.shared.borrow();
        let mode = shared.video.desktop_display_mode(0).map_err(Error::Platform)?;
        Ok((mode.w.max(0) as u32, mode.h.max(0) as u32))
    }

    /// Desktop resolution of the primary display with its derived measures
    pub fn display_metrics(&self) -> Result<DisplayMetrics> {
        let (width, height) = self.display_size()?;
        Ok(DisplayMetrics::new(width, height))
    }

    /// Number of windows currently in the registry
    pub fn window_count(&self) -> usize {
        self.shared.borrow().registry.len()
    }

    pub(crate) fn with_pump<R>(&self, f: impl FnOnce(&EventPump) -> R) -> R {
        f(&self.shared.borrow().pump)
    }

    pub(crate) fn show_cursor(&self, visible: bool) {
        self.shared.borrow().mouse.show_cursor(visible);
    }

    fn register(&self, id: u32) {
        self.shared.borrow_mut().registry.insert(id, VecDeque::new());
        debug!("registered window {}", id);
    }

    fn unregister(&self, id: u32) {
        self.shared.borrow_mut().registry.remove(&id);
        debug!("unregistered window {}", id);
    }

    /// Pump SDL, then hand back everything queued for `id`
    fn take_events(&self, id: u32) -> Vec<SurfaceEvent> {
        let mut shared = self.shared.borrow_mut();
        shared.dispatch();
        shared
            .registry
            .get_mut(&id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

enum Routed {
    One(u32, SurfaceEvent),
    All(SurfaceEvent),
}

fn translate(event: &Event) -> Option<Routed> {
    match event {
        Event::Quit { .. } => Some(Routed::All(SurfaceEvent::CloseRequested)),
        Event::Window {
            window_id,
            win_event,
            ..
        } => {
            let ev = match win_event {
                WindowEvent::SizeChanged(w, h) => SurfaceEvent::Resized {
                    width: (*w).max(0) as u32,
                    height: (*h).max(0) as u32,
                },
                WindowEvent::Moved(x, y) => SurfaceEvent::Moved { x: *x, y: *y },
                WindowEvent::FocusGained => SurfaceEvent::Focus(true),
                WindowEvent::FocusLost => SurfaceEvent::Focus(false),
                WindowEvent::Close => SurfaceEvent::CloseRequested,
                WindowEvent::Exposed => SurfaceEvent::Exposed,
                _ => return None,
            };
            Some(Routed::One(*window_id, ev))
        },
        Event::MouseWheel {
            window_id,
            x,
            y,
            direction,
            ..
        } => {
            let sign = if matches!(direction, MouseWheelDirection::Flipped) {
                -1.0
            } else {
                1.0
            };
            Some(Routed::One(
                *window_id,
                SurfaceEvent::Scrolled {
                    dx: *x as f32 * sign,
                    dy: *y as f32 * sign,
                },
            ))
        },
        _ => None,
    }
}

// ============================================================================
// Surface
// ============================================================================

/// Streaming texture standing in for the native backing bitmap
struct Backing {
    texture: Texture,
    width: u32,
    height: u32,
}

/// SDL window + software canvas + backing texture, owned as one unit.
/// Torn down explicitly on close or implicitly on drop.
pub struct SdlSurface {
    platform: SdlPlatform,
    canvas: Option<WindowCanvas>,
    creator: Option<TextureCreator<WindowContext>>,
    backing: Option<Backing>,
    window_id: Option<u32>,
    pending_close: bool,
}

impl SdlSurface {
    pub fn window_id(&self) -> Option<u32> {
        self.window_id
    }

    fn release_backing(&mut self) {
        if let Some(backing) = self.backing.take() {
            trace!("releasing {}x{} backing texture", backing.width, backing.height);
            // Safety: the texture was created by `self.creator`, whose renderer is
            // still alive here; `take()` guarantees it is destroyed exactly once.
            unsafe { backing.texture.destroy() };
        }
    }
}

impl Surface for SdlSurface {
    fn create(&mut self, config: &WindowConfig) -> Result<()> {
        if self.canvas.is_some() {
            warn!("surface for '{}' already exists", config.title);
            return Ok(());
        }

        let window = {
            let shared = self.platform.shared.borrow();
            let mut builder =
                shared
                    .video
                    .window(&config.title, config.width.max(1), config.height.max(1));
            builder.position(config.x, config.y).hidden();
            if config.style.resizable {
                builder.resizable();
            }
            if !config.style.is_decorated() {
                builder.borderless();
            }
            builder.build().map_err(|e| Error::WindowCreate(e.to_string()))?
        };

        let id = window.id();
        let canvas = window
            .into_canvas()
            .software()
            .build()
            .map_err(|e| Error::WindowCreate(e.to_string()))?;

        self.creator = Some(canvas.texture_creator());
        self.canvas = Some(canvas);
        self.window_id = Some(id);
        self.platform.register(id);
        Ok(())
    }

    fn is_created(&self) -> bool {
        self.canvas.is_some()
    }

    fn show(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.window_mut().show();
            canvas.window_mut().raise();
        }
    }

    fn client_size(&self) -> (u32, u32) {
        self.canvas.as_ref().map_or((0, 0), |c| c.window().size())
    }

    fn client_origin(&self) -> (i32, i32) {
        self.canvas.as_ref().map_or((0, 0), |c| c.window().position())
    }

    fn rebuild_backing(&mut self, width: u32, height: u32) -> Result<()> {
        self.release_backing();
        if width == 0 || height == 0 {
            return Ok(());
        }

        let creator = self
            .creator
            .as_ref()
            .ok_or_else(|| Error::Backing("surface not created".into()))?;
        let texture = creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| Error::Backing(e.to_string()))?;

        self.backing = Some(Backing {
            texture,
            width,
            height,
        });
        trace!("built {}x{} backing texture", width, height);
        Ok(())
    }

    fn push_buffer(&mut self, buffer: &PixelBuffer) -> Result<()> {
        let Some(backing) = self.backing.as_mut() else {
            return Ok(());
        };
        backing
            .texture
            .with_lock(None, |bytes, pitch| copy_to_native(buffer, bytes, pitch))
            .map_err(Error::Backing)
    }

    fn present(&mut self) -> Result<()> {
        let (Some(canvas), Some(backing)) = (self.canvas.as_mut(), self.backing.as_ref()) else {
            return Ok(());
        };
        canvas.copy(&backing.texture, None, None).map_err(Error::Present)?;
        canvas.present();
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        let Some(id) = self.window_id else {
            return Vec::new();
        };
        let mut events = self.platform.take_events(id);
        if std::mem::take(&mut self.pending_close) {
            events.insert(0, SurfaceEvent::CloseRequested);
        }
        events
    }

    fn request_close(&mut self) {
        if self.window_id.is_some() {
            self.pending_close = true;
        }
    }

    fn teardown(&mut self) {
        self.release_backing();
        self.creator = None;
        if self.canvas.take().is_some() {
            trace!("destroyed SDL window");
        }
        if let Some(id) = self.window_id.take() {
            self.platform.unregister(id);
        }
        self.pending_close = false;
    }
}

impl Drop for SdlSurface {
    fn drop(&mut self) {
        self.teardown();
    }
}
