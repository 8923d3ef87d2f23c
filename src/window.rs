//! The public window: lifecycle, pixel API and frame pump
//!
//! A `Window` owns a [`PixelBuffer`] and a [`Surface`]. Callers draw into the
//! buffer through the compositing API below; the frame pump drains surface
//! events, runs the caller's frame, pushes the buffer to the surface and
//! paces to a target frame rate.
//!
//! Lifecycle: `Uninitialized --create--> Created --show--> Open --close event--> Closed`.
//! Calling an operation in the wrong state logs a warning and does nothing.

use crate::buffer::PixelBuffer;
use crate::color::{Color, Rgba};
use crate::config::{WindowConfig, WindowStyle};
use crate::console;
use crate::input::InputSource;
use crate::surface::{Surface, SurfaceEvent};
use crate::timing::FrameClock;
use log::{debug, error, info, trace, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Created,
    Open,
    Closed,
}

pub struct Window<S: Surface> {
    config: WindowConfig,
    surface: S,
    buffer: PixelBuffer,
    state: Lifecycle,
    first_show: bool,
    console_bound: bool,
    focused: bool,
    position: (i32, i32),

    // Transient, reset after every frame
    scroll_x: f32,
    scroll_y: f32,
    resized: bool,

    clock: FrameClock,
}

impl<S: Surface> Window<S> {
    pub fn new(config: WindowConfig, surface: S) -> Self {
        let buffer = PixelBuffer::empty(config.base_color);
        let clock = FrameClock::new(config.target_fps);
        let position = (config.x, config.y);
        Self {
            config,
            surface,
            buffer,
            state: Lifecycle::Uninitialized,
            first_show: true,
            console_bound: false,
            focused: false,
            position,
            scroll_x: 0.0,
            scroll_y: 0.0,
            resized: false,
            clock,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[inline]
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == Lifecycle::Open
    }

    /// Native window exists (shown or not)
    #[inline]
    pub fn is_created(&self) -> bool {
        matches!(self.state, Lifecycle::Created | Lifecycle::Open)
    }

    pub fn is_console_bound(&self) -> bool {
        self.console_bound
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Requested client size. Only before `create`.
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if self.state != Lifecycle::Uninitialized {
            warn!("cannot resize window '{}' after it is created", self.config.title);
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        true
    }

    /// Native decorations. Only before `create`.
    pub fn set_style(&mut self, style: WindowStyle) -> bool {
        if self.state != Lifecycle::Uninitialized {
            warn!("cannot restyle window '{}' after it is created", self.config.title);
            return false;
        }
        self.config.style = style;
        true
    }

    /// Allocate the native window, still hidden
    pub fn create(&mut self) {
        if self.config.bind_console && !self.console_bound {
            self.console_bound = console::attach();
        }

        match self.state {
            Lifecycle::Open => {
                warn!("cannot create window '{}' more than once", self.config.title);
                return;
            },
            Lifecycle::Created => {
                warn!("window '{}' is already created", self.config.title);
                return;
            },
            Lifecycle::Uninitialized | Lifecycle::Closed => {},
        }

        match self.surface.create(&self.config) {
            Ok(()) => {
                self.state = Lifecycle::Created;
                self.position = self.surface.client_origin();
                debug!(
                    "created window '{}' ({}x{} at {},{})",
                    self.config.title, self.config.width, self.config.height, self.config.x, self.config.y
                );
            },
            Err(e) => error!("error creating window '{}': {}", self.config.title, e),
        }
    }

    /// Make the window visible and size the buffer to its client area
    pub fn show(&mut self) {
        match self.state {
            Lifecycle::Created => {},
            Lifecycle::Open => {
                warn!("window '{}' is already being shown", self.config.title);
                return;
            },
            Lifecycle::Uninitialized | Lifecycle::Closed => {
                warn!("cannot show uncreated window '{}', create it first", self.config.title);
                return;
            },
        }

        self.surface.show();
        let (width, height) = self.surface.client_size();
        self.rebuild(width, height);

        self.state = Lifecycle::Open;
        // The platform may settle the size on the first pump; that is not a resize
        self.first_show = true;
        self.focused = true;
        info!("window '{}' open at {}x{}", self.config.title, width, height);
    }

    /// Ask the surface to close. Completes when the close event is pumped.
    pub fn close(&mut self) {
        if !self.is_open() {
            warn!("window '{}' is not open, cannot close it", self.config.title);
        }
        self.surface.request_close();
    }

    /// Rebuild backing store and buffer for a new client size
    fn rebuild(&mut self, width: u32, height: u32) {
        if let Err(e) = self.surface.rebuild_backing(width, height) {
            error!("cannot rebuild backing store at {}x{}: {}", width, height, e);
        }
        if let Err(e) = self.buffer.resize(width, height, self.config.base_color) {
            error!("cannot resize buffer of '{}': {}", self.config.title, e);
        }
    }

    fn handle_event(&mut self, event: SurfaceEvent) {
        trace!("'{}' event: {:?}", self.config.title, event);
        match event {
            SurfaceEvent::Resized { width, height } => {
                if !self.is_open() {
                    return;
                }
                if (width, height) == (self.buffer.width(), self.buffer.height()) {
                    return;
                }
                self.rebuild(width, height);
                if !self.first_show {
                    self.resized = true;
                }
                debug!("window '{}' resized to {}x{}", self.config.title, width, height);
            },
            SurfaceEvent::Moved { x, y } => self.position = (x, y),
            SurfaceEvent::Scrolled { dx, dy } => {
                self.scroll_x += dx;
                self.scroll_y += dy;
            },
            SurfaceEvent::Focus(focused) => self.focused = focused,
            SurfaceEvent::CloseRequested => {
                if !self.is_created() {
                    return;
                }
                self.surface.teardown();
                self.state = Lifecycle::Closed;
                self.focused = false;
                info!("window '{}' closed", self.config.title);
            },
            SurfaceEvent::Exposed => self.present_frame(),
        }
    }

    fn pump_events(&mut self) {
        for event in self.surface.poll_events() {
            self.handle_event(event);
        }
    }

    /// Push the buffer to the backing store and put it on screen
    fn present_frame(&mut self) {
        if !self.is_open() {
            return;
        }
        if let Err(e) = self.surface.push_buffer(&self.buffer) {
            error!("cannot push buffer of '{}': {}", self.config.title, e);
            return;
        }
        if let Err(e) = self.surface.present() {
            error!("cannot present '{}': {}", self.config.title, e);
        }
    }

    fn reset_transient(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
        self.resized = false;
    }

    /// Closing bookkeeping for one pumped frame
    fn end_frame(&mut self) {
        self.reset_transient();
        self.first_show = false;
    }

    // ========================================================================
    // Frame pump
    // ========================================================================

    /// Run `frame` once per frame at `target_fps` until the window closes.
    /// The closure gets the window itself; any other state it needs is captured.
    pub fn run_loop<F>(&mut self, target_fps: f64, mut frame: F)
    where
        F: FnMut(&mut Self),
    {
        if !self.is_open() {
            warn!("cannot run window '{}': it is not open", self.config.title);
            return;
        }

        self.clock.set_target_fps(target_fps);
        debug!(
            "frame pump for '{}': target period {:?}",
            self.config.title,
            self.clock.target()
        );

        // A close pumped mid-loop still finishes its iteration; the loop
        // condition observes it.
        while self.is_open() {
            let start = self.clock.begin();

            self.pump_events();
            frame(self);
            self.present_frame();

            self.clock.finish(start);
            self.end_frame();
        }
    }

    /// [`run_loop`](Self::run_loop) at the configured target rate
    pub fn run<F>(&mut self, frame: F)
    where
        F: FnMut(&mut Self),
    {
        let fps = self.config.target_fps;
        self.run_loop(fps, frame);
    }

    /// One unpaced frame for callers driving their own loop: reset transient
    /// state, drain events, present
    pub fn refresh(&mut self) {
        if !self.is_open() {
            warn!("cannot refresh window '{}': it is not open", self.config.title);
            return;
        }
        self.reset_transient();
        self.pump_events();
        self.present_frame();
        self.first_show = false;
    }

    /// Seconds taken by the last frame, 0 before the first
    pub fn frame_period(&self) -> f64 {
        self.clock.frame_period()
    }

    /// Frames per second from the last frame, 0 before the first
    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    pub fn target_period(&self) -> Duration {
        self.clock.target()
    }

    // ========================================================================
    // Per-frame state and queries
    // ========================================================================

    /// Client area changed size during this frame
    #[inline]
    pub fn is_resized(&self) -> bool {
        self.resized
    }

    #[inline]
    pub fn is_scrolled_x(&self) -> bool {
        self.scroll_x != 0.0
    }

    #[inline]
    pub fn is_scrolled_y(&self) -> bool {
        self.scroll_y != 0.0
    }

    /// Horizontal wheel notches this frame
    #[inline]
    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    /// Vertical wheel notches this frame
    #[inline]
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Last known screen position of the client area
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// Live screen position of the client area
    pub fn client_origin(&self) -> (i32, i32) {
        self.surface.client_origin()
    }

    /// Pointer position relative to the client area
    pub fn cursor_position(&self, input: &dyn InputSource) -> (i32, i32) {
        let (sx, sy) = input.cursor_position();
        let (ox, oy) = self.surface.client_origin();
        (sx - ox, sy - oy)
    }

    // ========================================================================
    // Pixel API
    // ========================================================================

    #[inline]
    pub fn base_color(&self) -> Color {
        self.config.base_color
    }

    #[inline]
    pub fn buffer_width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn buffer_height(&self) -> u32 {
        self.buffer.height()
    }

    /// The pixel buffer, only while open. Its size changes on resize.
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.is_open().then_some(&self.buffer)
    }

    pub fn buffer_mut(&mut self) -> Option<&mut PixelBuffer> {
        if self.is_open() {
            Some(&mut self.buffer)
        } else {
            None
        }
    }

    /// Read a pixel; base color outside the buffer
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if self.buffer.contains(x, y) {
            self.buffer.get(x, y)
        } else {
            self.config.base_color
        }
    }

    /// Composite `color` over the pixel at (x, y)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if !self.buffer.contains(x, y) {
            return;
        }
        let backdrop = self.buffer.get(x, y);
        self.buffer.set(x, y, color.composite_over(backdrop));
    }

    /// Composite an RGB color with a flat alpha
    #[inline]
    pub fn set_pixel_alpha(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        self.set_pixel(x, y, Rgba::from_color(color, alpha));
    }

    /// Opaque write
    #[inline]
    pub fn set_pixel_rgb(&mut self, x: i32, y: i32, color: Color) {
        self.set_pixel_alpha(x, y, color, 1.0);
    }

    /// Stamp a grid of colors with its top-left at (x, y); cells outside the buffer are skipped
    pub fn draw_color_grid<R: AsRef<[Color]>>(&mut self, x: i32, y: i32, grid: &[R], alpha: f32) {
        for_each_cell::<Color, _, _>(x, y, grid, |px, py, &color| {
            self.set_pixel(px, py, Rgba::from_color(color, alpha));
        });
    }

    /// Stamp a character map: `'1'` cells get `fg`, `'0'` cells get `bg` if
    /// given, anything else is left alone
    pub fn draw_char_map<R: AsRef<[u8]>>(
        &mut self,
        x: i32,
        y: i32,
        map: &[R],
        fg: Rgba,
        bg: Option<Rgba>,
    ) {
        for_each_cell::<u8, _, _>(x, y, map, |px, py, &cell| match (cell, bg) {
            (b'1', _) => self.set_pixel(px, py, fg),
            (b'0', Some(bg)) => self.set_pixel(px, py, bg),
            _ => {},
        });
    }

    /// Stamp a grid of RGBA cells, each composited with its own alpha
    pub fn draw_rgba_grid<R: AsRef<[Rgba]>>(&mut self, x: i32, y: i32, grid: &[R]) {
        for_each_cell::<Rgba, _, _>(x, y, grid, |px, py, &color| self.set_pixel(px, py, color));
    }

    /// Fill with `color` (base color unchanged). `false` if the buffer is broken.
    pub fn clear_with(&mut self, color: Color) -> bool {
        match self.buffer.fill(color) {
            Ok(()) => true,
            Err(e) => {
                warn!("cannot clear window '{}': {}", self.config.title, e);
                false
            },
        }
    }

    /// Fill with the base color
    pub fn clear(&mut self) -> bool {
        self.clear_with(self.config.base_color)
    }
}

/// Visit every cell of `grid` translated to (x, y), in row order.
/// Coordinates that would overflow `i32` are skipped.
fn for_each_cell<T, R, F>(x: i32, y: i32, grid: &[R], mut f: F)
where
    R: AsRef<[T]>,
    F: FnMut(i32, i32, &T),
{
    for (i, row) in grid.iter().enumerate() {
        let Some(py) = i32::try_from(i).ok().and_then(|i| y.checked_add(i)) else {
            break;
        };
        for (j, cell) in row.as_ref().iter().enumerate() {
            let Some(px) = i32::try_from(j).ok().and_then(|j| x.checked_add(j)) else {
                break;
            };
            f(px, py, cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;
    use crate::input::ScriptedInput;
    use crate::surface::HeadlessSurface;

    fn config(width: u32, height: u32, base: Color) -> WindowConfig {
        WindowConfig::new("test", width, height)
            .with_base_color(base)
            .with_console(false)
    }

    fn open_window(width: u32, height: u32, base: Color) -> Window<HeadlessSurface> {
        let mut win = Window::new(config(width, height, base), HeadlessSurface::new());
        win.create();
        win.show();
        assert!(win.is_open());
        win
    }

    fn snapshot(win: &Window<HeadlessSurface>) -> Vec<Color> {
        win.buffer().unwrap().pixels().to_vec()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    #[test_log::test]
    fn test_lifecycle_in_order() {
        let mut win = Window::new(config(8, 6, Color::BLACK), HeadlessSurface::new());
        assert_eq!(win.state(), Lifecycle::Uninitialized);
        assert!(win.buffer().is_none());

        win.create();
        assert_eq!(win.state(), Lifecycle::Created);
        assert!(!win.surface().is_visible());
        assert!(win.buffer().is_none());

        win.show();
        assert_eq!(win.state(), Lifecycle::Open);
        assert!(win.surface().is_visible());
        assert_eq!((win.buffer_width(), win.buffer_height()), (8, 6));
        assert_eq!(win.surface().backing_size(), Some((8, 6)));
        assert!(!win.is_resized(), "first show is not a resize");
    }

    #[test_log::test]
    fn test_show_before_create_is_a_no_op() {
        let mut win = Window::new(config(8, 6, Color::BLACK), HeadlessSurface::new());
        win.show();
        assert_eq!(win.state(), Lifecycle::Uninitialized);
        assert!(!win.surface().is_visible());
        assert_eq!(win.surface().rebuild_count(), 0);
    }

    #[test_log::test]
    fn test_double_create_and_show_are_no_ops() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.set_pixel_rgb(1, 1, Color::WHITE);
        win.create();
        win.show();
        assert_eq!(win.state(), Lifecycle::Open);
        assert_eq!(win.pixel(1, 1), Color::WHITE);
        assert_eq!(win.surface().rebuild_count(), 1);
    }

    #[test_log::test]
    fn test_failed_create_leaves_window_inert() {
        let mut win = Window::new(config(4, 4, Color::BLACK), HeadlessSurface::failing());
        win.create();
        assert_eq!(win.state(), Lifecycle::Uninitialized);
        win.show();
        assert!(!win.is_open());

        let mut frames = 0;
        win.run_loop(60.0, |_| frames += 1);
        assert_eq!(frames, 0);
    }

    #[test_log::test]
    fn test_size_and_style_only_before_create() {
        let mut win = Window::new(config(4, 4, Color::BLACK), HeadlessSurface::new());
        assert!(win.set_size(12, 9));
        assert!(win.set_style(WindowStyle {
            resizable: false,
            ..WindowStyle::default()
        }));
        win.create();
        win.show();
        assert_eq!((win.buffer_width(), win.buffer_height()), (12, 9));
        assert!(!win.set_size(1, 1));
        assert!(!win.set_style(WindowStyle::default()));
        assert_eq!(win.config().width, 12);
    }

    #[test_log::test]
    fn test_close_event_tears_down_surface() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.close();
        assert!(win.is_open(), "close completes on the next pump");

        win.refresh();
        assert_eq!(win.state(), Lifecycle::Closed);
        assert_eq!(win.surface().teardown_count(), 1);
        assert!(!win.surface().has_backing());
        assert!(win.buffer().is_none());

        // A closed window stays safe to draw on and to close again
        win.set_pixel_rgb(0, 0, Color::WHITE);
        win.close();
        win.refresh();
        assert_eq!(win.surface().teardown_count(), 1);
    }

    // ------------------------------------------------------------------------
    // Pixel API
    // ------------------------------------------------------------------------

    #[test]
    fn test_composite_scenario() {
        let mut win = open_window(10, 10, Color::BLACK);

        win.set_pixel(5, 5, Rgba::new(255, 0, 0, 1.0));
        assert_eq!(win.pixel(5, 5), rgb(255, 0, 0));

        win.set_pixel(5, 5, Rgba::new(0, 255, 0, 0.0));
        assert_eq!(win.pixel(5, 5), rgb(255, 0, 0));

        let before = snapshot(&win);
        win.set_pixel(-1, 5, Rgba::new(255, 255, 255, 1.0));
        assert_eq!(snapshot(&win), before);
    }

    #[test]
    fn test_set_pixel_matches_compositing_formula() {
        let mut win = open_window(3, 3, rgb(40, 80, 120));
        for (i, alpha) in [0.0, 0.25, 0.5, 0.75, 1.0].into_iter().enumerate() {
            let src = Rgba::new(200, 10, 255, alpha);
            let x = (i % 3) as i32;
            let y = (i / 3) as i32;
            let backdrop = win.pixel(x, y);
            win.set_pixel(x, y, src);
            assert_eq!(win.pixel(x, y), src.composite_over(backdrop), "alpha {alpha}");
        }
    }

    #[test]
    fn test_flat_alpha_equals_rgba() {
        let mut a = open_window(2, 1, rgb(10, 10, 10));
        let mut b = open_window(2, 1, rgb(10, 10, 10));
        a.set_pixel_alpha(1, 0, rgb(250, 130, 7), 0.3);
        b.set_pixel(1, 0, Rgba::new(250, 130, 7, 0.3));
        assert_eq!(a.pixel(1, 0), b.pixel(1, 0));
    }

    #[test]
    fn test_out_of_range_reads_base_and_writes_nothing() {
        let base = rgb(90, 89, 78);
        let mut win = open_window(5, 4, base);
        win.clear_with(Color::BLACK);
        let before = snapshot(&win);

        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 4), (i32::MIN, i32::MAX)] {
            assert_eq!(win.pixel(x, y), base);
            win.set_pixel(x, y, Rgba::opaque(1, 2, 3));
            win.set_pixel_rgb(x, y, Color::WHITE);
        }
        assert_eq!(snapshot(&win), before);
    }

    #[test]
    fn test_clear_any_size() {
        for (w, h) in [(0, 0), (1, 1), (7, 3)] {
            let mut win = open_window(w, h, Color::BLACK);
            assert!(win.clear_with(rgb(3, 6, 9)));
            for y in 0..h as i32 {
                for x in 0..w as i32 {
                    assert_eq!(win.pixel(x, y), rgb(3, 6, 9));
                }
            }
            assert!(win.clear());
            assert!(snapshot(&win).iter().all(|&p| p == Color::BLACK));
        }
    }

    #[test]
    fn test_char_map_of_ones_matches_flat_grids() {
        let fg = Rgba::new(200, 40, 90, 0.6);
        let map = ["111", "111"];
        let colors = vec![vec![fg.color(); 3]; 2];
        let rgba = vec![vec![fg; 3]; 2];

        let mut by_map = open_window(6, 5, rgb(20, 30, 40));
        let mut by_colors = open_window(6, 5, rgb(20, 30, 40));
        let mut by_rgba = open_window(6, 5, rgb(20, 30, 40));

        by_map.draw_char_map(2, 1, &map, fg, None);
        by_colors.draw_color_grid(2, 1, &colors, fg.alpha());
        by_rgba.draw_rgba_grid(2, 1, &rgba);

        assert_eq!(snapshot(&by_map), snapshot(&by_colors));
        assert_eq!(snapshot(&by_map), snapshot(&by_rgba));
        assert_ne!(by_map.pixel(2, 1), rgb(20, 30, 40));
    }

    #[test]
    fn test_char_map_background_and_unknown_cells() {
        let mut win = open_window(3, 2, Color::BLACK);
        let fg = Rgba::opaque(255, 0, 0);
        let bg = Rgba::opaque(0, 0, 255);

        win.draw_char_map(0, 0, &["10x"], fg, None);
        assert_eq!(win.pixel(0, 0), rgb(255, 0, 0));
        assert_eq!(win.pixel(1, 0), Color::BLACK, "no background given");
        assert_eq!(win.pixel(2, 0), Color::BLACK);

        win.draw_char_map(0, 1, &["10x"], fg, Some(bg));
        assert_eq!(win.pixel(1, 1), rgb(0, 0, 255));
        assert_eq!(win.pixel(2, 1), Color::BLACK, "unknown cell ignored");
    }

    #[test]
    fn test_grids_clip_at_edges() {
        let mut win = open_window(4, 4, Color::BLACK);
        let grid = vec![vec![Color::WHITE; 3]; 3];
        win.draw_color_grid(-1, 2, &grid, 1.0);

        let painted: Vec<(i32, i32)> = (0..4)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| win.pixel(x, y) == Color::WHITE)
            .collect();
        assert_eq!(painted, vec![(0, 2), (1, 2), (0, 3), (1, 3)]);

        // Ragged rows and far-away origins are fine
        win.draw_char_map(i32::MAX - 1, i32::MAX, &["1", "111"], Rgba::opaque(1, 1, 1), None);
        win.draw_rgba_grid(0, 0, &[vec![], vec![Rgba::opaque(9, 9, 9)]]);
        assert_eq!(win.pixel(0, 1), rgb(9, 9, 9));
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    #[test_log::test]
    fn test_resize_event_recreates_buffer() {
        let base = rgb(10, 20, 30);
        let mut win = open_window(10, 10, base);
        win.refresh();
        win.clear_with(Color::WHITE);

        win.surface_mut().resize_client(3, 3);
        win.refresh();

        let buf = win.buffer().unwrap();
        assert_eq!(buf.len(), 9);
        assert!(buf.pixels().iter().all(|&p| p == base));
        assert!(win.is_resized());
        assert_eq!(win.surface().backing_size(), Some((3, 3)));

        win.surface_mut().resize_client(12, 4);
        win.refresh();
        assert_eq!(win.buffer().unwrap().len(), 48);
    }

    #[test]
    fn test_same_size_resize_is_ignored() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.set_pixel_rgb(0, 0, Color::WHITE);
        win.surface_mut().resize_client(4, 4);
        win.refresh();
        assert!(!win.is_resized());
        assert_eq!(win.pixel(0, 0), Color::WHITE);
        assert_eq!(win.surface().rebuild_count(), 1);
    }

    #[test]
    fn test_minimized_window_has_empty_buffer() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.surface_mut().resize_client(0, 0);
        win.refresh();
        assert!(win.buffer().unwrap().is_empty());
        assert!(!win.surface().has_backing());
        assert!(win.clear());
        assert_eq!(win.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_scroll_focus_and_move() {
        let mut win = open_window(4, 4, Color::BLACK);
        assert!(!win.is_scrolled_x() && !win.is_scrolled_y());

        win.surface_mut().push_event(SurfaceEvent::Scrolled { dx: 0.0, dy: 1.0 });
        win.surface_mut().push_event(SurfaceEvent::Scrolled { dx: -1.0, dy: 2.0 });
        win.surface_mut().push_event(SurfaceEvent::Focus(false));
        win.surface_mut().push_event(SurfaceEvent::Moved { x: 300, y: 200 });
        win.refresh();

        assert!(win.is_scrolled_x());
        assert_eq!(win.scroll_x(), -1.0);
        assert_eq!(win.scroll_y(), 3.0);
        assert!(!win.is_focused());
        assert_eq!(win.position(), (300, 200));

        win.refresh();
        assert!(!win.is_scrolled_y(), "scroll is per frame");
    }

    #[test]
    fn test_cursor_position_is_client_relative() {
        let mut win = Window::new(
            config(50, 50, Color::BLACK).with_position(100, 120),
            HeadlessSurface::new(),
        );
        win.create();
        win.show();

        let mut input = ScriptedInput::new();
        input.set_cursor_position(150, 125);
        assert_eq!(win.cursor_position(&input), (50, 5));
    }

    // ------------------------------------------------------------------------
    // Frame pump
    // ------------------------------------------------------------------------

    #[test_log::test]
    fn test_run_loop_requires_open_window() {
        let mut win = Window::new(config(4, 4, Color::BLACK), HeadlessSurface::new());
        win.create();
        let mut frames = 0;
        win.run_loop(1000.0, |_| frames += 1);
        assert_eq!(frames, 0);
        assert_eq!(win.fps(), 0.0);
    }

    #[test_log::test]
    fn test_run_loop_until_close() {
        let mut win = open_window(4, 4, Color::BLACK);
        assert_eq!(win.fps(), 0.0);

        let mut frames = 0;
        win.run_loop(500.0, |w| {
            frames += 1;
            w.set_pixel_rgb(frames, 0, Color::WHITE);
            if frames == 3 {
                w.close();
            }
        });

        // The iteration that pumps the close still runs the frame
        assert_eq!(frames, 4);
        assert_eq!(win.state(), Lifecycle::Closed);
        assert_eq!(win.surface().push_count(), 3);
        assert_eq!(win.surface().present_count(), 3);
        assert_eq!(win.surface().teardown_count(), 1);

        let period = win.frame_period();
        assert!(period >= 0.002, "paced to the 2ms target, got {period}");
        assert!((win.fps() - 1.0 / period).abs() < 1e-6);
    }

    #[test]
    fn test_run_loop_resets_transient_state_each_frame() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.surface_mut().push_event(SurfaceEvent::Scrolled { dx: 0.0, dy: -1.0 });
        win.surface_mut().resize_client(6, 6);

        let mut seen = Vec::new();
        win.run_loop(0.0, |w| {
            seen.push((w.is_scrolled_y(), w.is_resized(), w.buffer_width()));
            if seen.len() == 2 {
                w.close();
            }
        });
        assert_eq!(seen, vec![(true, false, 6), (false, false, 6), (false, false, 6)]);
    }

    #[test_log::test]
    fn test_close_on_first_pump_still_completes_the_frame() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.surface_mut().push_event(SurfaceEvent::CloseRequested);

        let mut frames = 0;
        win.run_loop(100.0, |w| {
            frames += 1;
            assert!(!w.is_open());
        });

        assert_eq!(frames, 1);
        assert_eq!(win.state(), Lifecycle::Closed);
        assert_eq!(win.surface().push_count(), 0);
        assert!(win.frame_period() >= 0.01, "paced to the 10ms target");
        assert!(win.fps() > 0.0);
    }

    #[test]
    fn test_settle_resize_after_show_is_not_reported() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.surface_mut().resize_client(5, 5);

        let mut seen = Vec::new();
        win.run_loop(0.0, |w| {
            seen.push((w.is_resized(), w.buffer_width()));
            match seen.len() {
                1 => w.surface_mut().resize_client(8, 8),
                2 => w.close(),
                _ => {},
            }
        });
        assert_eq!(seen, vec![(false, 5), (true, 8), (false, 8)]);
    }

    #[test]
    fn test_settle_resize_before_first_refresh_is_not_reported() {
        let mut win = open_window(4, 4, Color::BLACK);
        win.surface_mut().resize_client(6, 3);
        win.refresh();
        assert!(!win.is_resized());
        assert_eq!((win.buffer_width(), win.buffer_height()), (6, 3));

        win.surface_mut().resize_client(2, 2);
        win.refresh();
        assert!(win.is_resized());
    }

    #[test]
    fn test_frames_reach_the_backing_store() {
        let mut win = open_window(2, 2, Color::BLACK);
        win.set_pixel_rgb(1, 1, rgb(0x12, 0x34, 0x56));
        win.refresh();
        assert_eq!(win.surface().push_count(), 1);
        assert_eq!(win.surface().backing_pixel(1, 1), Some(0xFF12_3456));
        assert_eq!(win.surface().backing_pixel(0, 0), Some(0xFF00_0000));
    }

    #[test]
    fn test_exposed_event_presents_again() {
        let mut win = open_window(2, 2, Color::BLACK);
        win.surface_mut().push_event(SurfaceEvent::Exposed);
        win.refresh();
        assert_eq!(win.surface().present_count(), 2);
    }
}
