use log::{error, info, warn};
use softpane::{
    console, rgb, InputSource, MouseButton, Rgba, SdlInput, SdlPlatform, Window, WindowConfig,
    DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use std::time::{Duration, Instant};

/// Size of the stamp that follows the cursor
const STAMP_WIDTH: usize = 60;
const STAMP_HEIGHT: usize = 40;

struct Args {
    config: WindowConfig,
    fps: Option<f64>,
}

/// Parse command line arguments on top of an optional JSON config
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut config = WindowConfig::new("softpane", DEFAULT_WIDTH, DEFAULT_HEIGHT).with_base_color(rgb(90, 89, 78));
    let mut width = None;
    let mut height = None;
    let mut fps = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    match WindowConfig::load(&args[i + 1]) {
                        Ok(loaded) => config = loaded,
                        Err(e) => eprintln!("Ignoring {}: {}", args[i + 1], e),
                    }
                    i += 1;
                }
            },
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    width = args[i + 1].parse::<u32>().ok();
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    height = args[i + 1].parse::<u32>().ok();
                    i += 1;
                }
            },
            "--fps" | "-f" => {
                if i + 1 < args.len() {
                    fps = args[i + 1].parse::<f64>().ok();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: softpane [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --config FILE, -c FILE  Load window settings from JSON");
                println!(
                    "  --width W, -w W         Client width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H        Client height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!(
                    "  --fps N, -f N           Target frame rate, 0 for uncapped (default: {})",
                    DEFAULT_FPS
                );
                println!("  --help                  Show this help message");
                std::process::exit(0);
            },
            other => eprintln!("Unknown argument: {}", other),
        }
        i += 1;
    }

    // Explicit flags win over the config file
    if let Some(w) = width {
        config.width = w;
    }
    if let Some(h) = height {
        config.height = h;
    }
    Args { config, fps }
}

fn main() -> Result<(), softpane::Error> {
    let Args { config, fps } = parse_args();
    if config.bind_console && !console::attach() {
        eprintln!("Logging unavailable");
    }
    let target_fps = fps.unwrap_or(config.target_fps);

    let platform = SdlPlatform::init()?;
    if let Ok(display) = platform.display_metrics() {
        info!(
            "Display: {}x{} ({} pixels, {:.0}px diagonal)",
            display.width,
            display.height,
            display.pixel_count(),
            display.diagonal()
        );
    }
    let mut input = SdlInput::new(&platform);

    let mut window = Window::new(config, platform.surface());
    window.create();
    if !window.is_created() {
        error!("No window, exiting");
        return Ok(());
    }
    window.show();

    info!("Controls:");
    info!("  Mouse       - Move the stamp");
    info!("  Wheel       - Change stamp opacity");
    info!("  Left button - Hide the cursor while held");
    info!("  Q           - Quit");

    let stamp = vec!["1".repeat(STAMP_WIDTH); STAMP_HEIGHT];
    let mut opacity = 0.8_f32;
    let mut cursor_hidden = false;
    let mut last_report = Instant::now();

    window.run_loop(target_fps, |w| {
        // Last iteration after the close was pumped
        if !w.is_open() {
            return;
        }
        if input.key_pressed('q') {
            w.close();
        }

        if w.is_scrolled_y() {
            opacity = (opacity + w.scroll_y() * 0.05).clamp(0.0, 1.0);
        }
        if w.is_resized() {
            info!("Resized to {}x{}", w.buffer_width(), w.buffer_height());
        }

        let held = input.button_pressed(MouseButton::Left);
        if held != cursor_hidden {
            input.set_cursor_visible(!held);
            cursor_hidden = held;
        }

        if !w.clear() {
            warn!("Clear failed");
        }
        let (cx, cy) = w.cursor_position(&input);
        w.draw_char_map(
            cx - STAMP_WIDTH as i32 / 2,
            cy - STAMP_HEIGHT as i32 / 2,
            &stamp,
            Rgba::new(255, 0, 0, opacity),
            None,
        );

        if last_report.elapsed() >= Duration::from_secs(1) {
            info!("FPS: {:.1} (last frame {:.2}ms)", w.fps(), w.frame_period() * 1000.0);
            last_report = Instant::now();
        }
    });

    if cursor_hidden {
        input.set_cursor_visible(true);
    }
    info!("Window closed");
    Ok(())
}
