use anyhow::{bail, Context, Result};
use ship_input::{Controller, GamepadPoller, MappingFactory, RawInputState};
use ship_input::mapping::MAX_PORTS;
use ship_window::geometry::WindowGeometry;
use ship_window::metrics::FrameStats;
use ship_window::native::desktop::WinitWindow;
use ship_window::native::headless::HeadlessWindow;
use ship_window::{JsonConfig, WindowBackend, WindowDescriptor, WindowManager};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn, Level};

const KEY_ESCAPE: u16 = 0x01;
const KEY_F11: u16 = 0x57;
/// Frames run without a window when `--frames` is not given.
const HEADLESS_FRAMES: u64 = 120;
const STATS_EVERY: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
struct Options {
    headless: bool,
    fullscreen: bool,
    fps: u32,
    config: PathBuf,
    frames: Option<u64>,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            headless: false,
            fullscreen: false,
            fps: 60,
            config: PathBuf::from("shipport.json"),
            frames: None,
            verbose: false,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => opts.headless = true,
            "--fullscreen" => opts.fullscreen = true,
            "--verbose" => opts.verbose = true,
            "--fps" => {
                let value = args.next().context("--fps needs a value")?;
                opts.fps = value.parse().with_context(|| format!("invalid --fps {:?}", value))?;
            }
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                opts.frames = Some(value.parse().with_context(|| format!("invalid --frames {:?}", value))?);
            }
            "--config" => opts.config = PathBuf::from(args.next().context("--config needs a path")?),
            other => bail!("unknown argument {:?}", other),
        }
    }
    Ok(opts)
}

fn main() -> Result<()> {
    let opts = parse_args(std::env::args().skip(1))?;
    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    info!("Shipport starting...");

    let config = JsonConfig::open(&opts.config)?.into_shared();
    let mut window: Box<dyn WindowBackend> = if opts.headless {
        Box::new(WindowManager::new(HeadlessWindow::new(), config.clone()))
    } else {
        Box::new(WindowManager::new(WinitWindow::new(), config.clone()))
    };

    let geometry = WindowGeometry::from_config(&*config.borrow());
    let desc = WindowDescriptor {
        game_name: "Shipport".to_string(),
        api_name: window.backend_name().to_string(),
        start_fullscreen: opts.fullscreen,
        width: geometry.width,
        height: geometry.height,
        pos_x: geometry.pos_x,
        pos_y: geometry.pos_y,
    };
    window.init(&desc)?;
    window.set_target_fps(opts.fps);

    // Listeners only record; the loop below acts on what they saw.
    let raw = Rc::new(RefCell::new(RawInputState::new()));
    let toggle_fullscreen = Rc::new(Cell::new(false));
    let quit = Rc::new(Cell::new(false));
    {
        let raw_down = raw.clone();
        let raw_up = raw.clone();
        let raw_all = raw.clone();
        let toggle = toggle_fullscreen.clone();
        let quit = quit.clone();
        window.set_keyboard_callbacks(
            Box::new(move |key| {
                match key {
                    KEY_F11 => toggle.set(true),
                    KEY_ESCAPE => quit.set(true),
                    _ => raw_down.borrow_mut().set_key(key, true),
                }
                true
            }),
            Box::new(move |key| {
                raw_up.borrow_mut().set_key(key, false);
                true
            }),
            Box::new(move || raw_all.borrow_mut().release_all_keys()),
        );

        let raw_down = raw.clone();
        let raw_up = raw.clone();
        window.set_mouse_callbacks(
            Box::new(move |button| {
                raw_down.borrow_mut().set_mouse_button(button, true);
                true
            }),
            Box::new(move |button| {
                raw_up.borrow_mut().set_mouse_button(button, false);
                true
            }),
        );
        window.set_fullscreen_changed_callback(Box::new(|on| info!("Fullscreen changed: {}", on)));
    }

    let factory = MappingFactory::new(config.clone());
    let controllers: Vec<Controller> = (0..MAX_PORTS).map(|port| factory.load_controller(port)).collect();
    let mut gamepads = match GamepadPoller::new() {
        Ok(poller) => Some(poller),
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    };

    let frame_limit = opts.frames.or(opts.headless.then_some(HEADLESS_FRAMES));
    let mut stats = FrameStats::new();
    let mut frame: u64 = 0;
    let mut last_buttons = 0u16;

    while window.is_running() {
        stats.begin_frame();
        window.handle_events();
        if quit.get() {
            window.close();
            break;
        }
        if toggle_fullscreen.replace(false) {
            let on = !window.is_fullscreen();
            window.set_fullscreen(on);
        }

        {
            let mut input = raw.borrow_mut();
            if let Some(gamepads) = gamepads.as_mut() {
                gamepads.poll(&mut input);
            }
            input.set_mouse_delta(window.mouse_delta().as_vec2());
        }

        let pad = controllers[0].read_pad(&raw.borrow());
        if pad.button != last_buttons {
            tracing::debug!(
                "Port 1: buttons {:#06x} stick ({}, {})",
                pad.button,
                pad.stick_x,
                pad.stick_y
            );
            last_buttons = pad.button;
        }

        window.swap_buffers_begin();
        window.swap_buffers_end();
        stats.end_frame();

        frame += 1;
        if frame % STATS_EVERY == 0 {
            let s = stats.get_performance_stats();
            info!(
                "Frame {}: {:.1} fps, frame p99 {:.2} ms, work mean {:.2} ms, {} late",
                frame,
                s.get("fps_mean").copied().unwrap_or_default(),
                s.get("frame_p99_ms").copied().unwrap_or_default(),
                s.get("work_mean_ms").copied().unwrap_or_default(),
                stats.late_frames(opts.fps)
            );
        }
        if frame_limit.is_some_and(|limit| frame >= limit) {
            break;
        }
    }

    info!("Shutting down after {} frames", frame);
    window.save_window_geometry();
    window.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(parse_args(Vec::new()).unwrap(), Options::default());
    }

    #[test]
    fn flags_and_values() {
        let opts = parse_args(args(&[
            "--headless", "--fps", "30", "--frames", "10", "--config", "/tmp/ship.json", "--verbose",
        ]))
        .unwrap();
        assert!(opts.headless);
        assert!(opts.verbose);
        assert!(!opts.fullscreen);
        assert_eq!(opts.fps, 30);
        assert_eq!(opts.frames, Some(10));
        assert_eq!(opts.config, PathBuf::from("/tmp/ship.json"));
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse_args(args(&["--fps"])).is_err());
        assert!(parse_args(args(&["--fps", "sixty"])).is_err());
        assert!(parse_args(args(&["--wat"])).is_err());
    }
}
