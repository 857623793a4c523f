use glam::{IVec2, Vec2};
use ship_window::backend::{WindowBackend, WindowDescriptor};
use ship_window::config::{self, ConfigStore, JsonConfig, SharedConfig};
use ship_window::geometry::DisplayMode;
use ship_window::hid;
use ship_window::manager::WindowManager;
use ship_window::native::headless::{HeadlessWindow, NativeCall};
use ship_window::native::{FullscreenKind, NativeEvent};
use ship_window::pacer::{Clock, PacingStrategy};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Clone, Default)]
struct SharedClock(Rc<Cell<u64>>);

impl Clock for SharedClock {
    fn now(&self) -> u64 {
        self.0.get()
    }

    fn sleep(&mut self, ticks: u64) {
        self.0.set(self.0.get() + ticks);
    }

    fn relax(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn descriptor() -> WindowDescriptor {
    WindowDescriptor {
        game_name: "Test Game".to_string(),
        api_name: "headless".to_string(),
        start_fullscreen: false,
        width: 640,
        height: 480,
        pos_x: 100,
        pos_y: 100,
    }
}

fn config() -> SharedConfig {
    JsonConfig::in_memory().into_shared()
}

fn manager(cfg: SharedConfig) -> WindowManager<HeadlessWindow, SharedClock> {
    let mut wm = WindowManager::with_clock(
        HeadlessWindow::new(),
        cfg,
        SharedClock::default(),
        PacingStrategy::PRECISE,
    );
    wm.init(&descriptor()).unwrap();
    wm.native_mut().clear_calls();
    wm
}

#[test]
fn init_creates_the_window_with_title() {
    let mut wm = WindowManager::new(HeadlessWindow::new(), config());
    wm.init(&descriptor()).unwrap();

    assert!(wm.is_running());
    assert!(wm.is_frame_ready());
    assert_eq!(wm.backend_name(), "headless");
    match &wm.native().calls()[0] {
        NativeCall::Create(req) => {
            assert_eq!(req.title, "Test Game (headless)");
            assert!(req.vsync);
        }
        other => panic!("unexpected first call {:?}", other),
    }
    assert!(wm.init(&descriptor()).is_err());
}

#[test]
fn init_failure_is_reported() {
    let mut wm = WindowManager::new(HeadlessWindow::failing(), config());
    let err = wm.init(&descriptor()).unwrap_err();
    assert!(format!("{:#}", err).contains("no video device"));
    assert!(!wm.is_running());
    assert!(!wm.is_frame_ready());
}

#[test]
fn start_fullscreen_does_not_notify() {
    let cfg = config();
    let mut wm = WindowManager::new(HeadlessWindow::new(), cfg);
    let notified = Rc::new(Cell::new(0));
    let n = notified.clone();
    wm.set_fullscreen_changed_callback(Box::new(move |_| n.set(n.get() + 1)));

    let mut desc = descriptor();
    desc.start_fullscreen = true;
    wm.init(&desc).unwrap();

    assert!(wm.is_fullscreen());
    assert_eq!(notified.get(), 0);
}

#[test]
fn fullscreen_is_idempotent() {
    let mut wm = manager(config());
    let notified = Rc::new(RefCell::new(Vec::new()));
    let n = notified.clone();
    wm.set_fullscreen_changed_callback(Box::new(move |on| n.borrow_mut().push(on)));

    wm.set_fullscreen(true);
    wm.set_fullscreen(true);

    let fullscreen_calls = wm
        .native()
        .calls()
        .iter()
        .filter(|c| matches!(c, NativeCall::SetFullscreen(_)))
        .count();
    assert_eq!(fullscreen_calls, 1);
    assert_eq!(*notified.borrow(), vec![true]);

    wm.set_fullscreen(false);
    wm.set_fullscreen(false);
    assert_eq!(*notified.borrow(), vec![true, false]);
}

#[test]
fn exclusive_unless_windowed_fullscreen_is_set() {
    let mode = DisplayMode { width: 2560, height: 1440, refresh_rate_hz: 144 };
    let mut wm = manager(config());
    wm.native_mut().set_display_mode(mode);
    wm.set_fullscreen(true);
    assert_eq!(wm.native().calls(), &[NativeCall::SetFullscreen(FullscreenKind::Exclusive(mode))]);

    let cfg = config();
    cfg.borrow_mut().set_int(config::WINDOWED_FULLSCREEN, 1);
    let mut wm = manager(cfg);
    wm.set_fullscreen(true);
    assert_eq!(wm.native().calls(), &[NativeCall::SetFullscreen(FullscreenKind::Borderless)]);
}

#[test]
fn leaving_fullscreen_restores_saved_geometry() {
    let cfg = config();
    {
        let mut c = cfg.borrow_mut();
        c.set_int(config::WINDOW_WIDTH, 800);
        c.set_int(config::WINDOW_HEIGHT, 600);
        c.set_int(config::WINDOW_POSITION_X, 40);
        c.set_int(config::WINDOW_POSITION_Y, 60);
    }
    let mut wm = manager(cfg);
    wm.set_fullscreen(true);
    wm.native_mut().clear_calls();

    wm.set_fullscreen(false);

    assert_eq!(
        wm.native().calls(),
        &[
            NativeCall::SetFullscreen(FullscreenKind::Windowed),
            NativeCall::SetPosition(40, 60),
            NativeCall::SetSize(800, 600),
        ]
    );
    assert!(!wm.is_fullscreen());
}

#[test]
fn leaving_fullscreen_defaults_when_nothing_saved() {
    let mut wm = manager(config());
    wm.set_fullscreen(true);
    wm.native_mut().clear_calls();

    wm.set_fullscreen(false);

    assert!(wm.native().calls().contains(&NativeCall::SetPosition(100, 100)));
    assert!(wm.native().calls().contains(&NativeCall::SetSize(640, 480)));
}

#[test]
fn lost_display_falls_back_to_default_position() {
    let cfg = config();
    cfg.borrow_mut().set_int(config::WINDOW_POSITION_X, 5000);
    cfg.borrow_mut().set_int(config::WINDOW_POSITION_Y, 5000);
    let mut wm = manager(cfg);
    wm.set_fullscreen(true);
    wm.native_mut().set_display(None);
    wm.native_mut().clear_calls();

    wm.set_fullscreen(false);

    assert!(wm.native().calls().contains(&NativeCall::SetPosition(100, 100)));
}

#[test]
fn window_manager_fullscreen_toggle_is_picked_up() {
    let mut wm = manager(config());
    let notified = Rc::new(RefCell::new(Vec::new()));
    let n = notified.clone();
    wm.set_fullscreen_changed_callback(Box::new(move |on| n.borrow_mut().push(on)));

    wm.native_mut().set_wm_fullscreen(true);
    wm.handle_events();
    wm.handle_events();

    assert!(wm.is_fullscreen());
    assert_eq!(*notified.borrow(), vec![true]);
}

#[test]
fn keys_are_translated_before_dispatch() {
    let mut wm = manager(config());
    let downs = Rc::new(RefCell::new(Vec::new()));
    let ups = Rc::new(RefCell::new(Vec::new()));
    let all_up = Rc::new(Cell::new(0));
    let (d, u, a) = (downs.clone(), ups.clone(), all_up.clone());
    wm.set_keyboard_callbacks(
        Box::new(move |k| {
            d.borrow_mut().push(k);
            true
        }),
        Box::new(move |k| {
            u.borrow_mut().push(k);
            true
        }),
        Box::new(move || a.set(a.get() + 1)),
    );

    wm.native_mut().push_event(NativeEvent::KeyDown(hid::KP_ENTER));
    wm.native_mut().push_event(NativeEvent::KeyDown(hid::A));
    wm.native_mut().push_event(NativeEvent::KeyUp(hid::A));
    wm.native_mut().push_event(NativeEvent::FocusLost);
    wm.handle_events();

    assert_eq!(*downs.borrow(), vec![0x11C, 0x1E]);
    assert_eq!(*ups.borrow(), vec![0x1E]);
    assert_eq!(all_up.get(), 1);
}

#[test]
fn raw_listener_sees_events_before_translation() {
    let mut wm = manager(config());
    let order = Rc::new(RefCell::new(Vec::new()));
    let (raw, key) = (order.clone(), order.clone());
    wm.set_raw_event_callback(Box::new(move |e| {
        if let NativeEvent::KeyDown(code) = e {
            raw.borrow_mut().push(format!("raw {}", code));
        }
    }));
    wm.set_keyboard_callbacks(
        Box::new(move |k| {
            key.borrow_mut().push(format!("key {}", k));
            false
        }),
        Box::new(|_| false),
        Box::new(|| {}),
    );

    wm.native_mut().push_event(NativeEvent::KeyDown(hid::ESCAPE));
    wm.handle_events();

    assert_eq!(*order.borrow(), vec!["raw 41".to_string(), "key 1".to_string()]);
}

#[test]
fn mouse_buttons_out_of_range_are_ignored() {
    let mut wm = manager(config());
    let pressed = Rc::new(RefCell::new(Vec::new()));
    let released = Rc::new(RefCell::new(Vec::new()));
    let (p, r) = (pressed.clone(), released.clone());
    wm.set_mouse_callbacks(
        Box::new(move |b| {
            p.borrow_mut().push(b);
            true
        }),
        Box::new(move |b| {
            r.borrow_mut().push(b);
            true
        }),
    );

    for button in [0, 4, 5, -1] {
        wm.native_mut().push_event(NativeEvent::MouseButtonDown(button));
    }
    wm.native_mut().push_event(NativeEvent::MouseButtonUp(7));
    wm.native_mut().push_event(NativeEvent::MouseButtonUp(2));
    wm.handle_events();

    assert_eq!(*pressed.borrow(), vec![0, 4]);
    assert_eq!(*released.borrow(), vec![2]);
    assert!(wm.mouse_button_state(0));
    assert!(!wm.mouse_button_state(2));
    assert!(!wm.mouse_button_state(40));
}

#[test]
fn wheel_is_consumed_on_read() {
    let mut wm = manager(config());
    wm.native_mut().push_event(NativeEvent::MouseWheel { x: 0.0, y: 1.0 });
    wm.native_mut().push_event(NativeEvent::MouseWheel { x: 0.5, y: 2.0 });
    wm.handle_events();

    assert_eq!(wm.mouse_wheel(), Vec2::new(0.5, 3.0));
    assert_eq!(wm.mouse_wheel(), Vec2::ZERO);
}

#[test]
fn mouse_position_and_delta() {
    let mut wm = manager(config());
    wm.set_mouse_pos(IVec2::new(10, 20));
    assert_eq!(wm.mouse_pos(), IVec2::new(10, 20));

    wm.native_mut().move_mouse(15, 18);
    assert_eq!(wm.mouse_delta(), IVec2::new(5, -2));
    assert_eq!(wm.mouse_delta(), IVec2::ZERO);

    wm.set_mouse_capture(true);
    assert!(wm.is_mouse_captured());
}

#[test]
fn unknown_refresh_rate_falls_back_to_60() {
    let mut wm = manager(config());
    wm.native_mut().set_display_mode(DisplayMode { width: 1920, height: 1080, refresh_rate_hz: 0 });
    assert_eq!(wm.active_window_refresh_rate(), 60);

    wm.native_mut().set_display_mode(DisplayMode { width: 1920, height: 1080, refresh_rate_hz: 120 });
    assert_eq!(wm.active_window_refresh_rate(), 120);

    wm.native_mut().set_display(None);
    assert_eq!(wm.active_window_refresh_rate(), 60);
}

#[test]
fn vsync_is_reconciled_only_on_change() {
    let cfg = config();
    let mut wm = manager(cfg.clone());

    wm.swap_buffers_begin();
    assert_eq!(wm.native().calls(), &[NativeCall::Swap]);

    cfg.borrow_mut().set_int(config::VSYNC_ENABLED, 0);
    wm.native_mut().clear_calls();
    wm.swap_buffers_begin();
    wm.swap_buffers_begin();
    assert_eq!(
        wm.native().calls(),
        &[NativeCall::SetSwapInterval(false), NativeCall::Swap, NativeCall::Swap]
    );
}

#[test]
fn swaps_follow_the_frame_interval() {
    let clock = SharedClock::default();
    let mut wm = WindowManager::with_clock(
        HeadlessWindow::new(),
        config(),
        clock.clone(),
        PacingStrategy::PRECISE,
    );
    wm.init(&descriptor()).unwrap();
    wm.set_target_fps(30);

    wm.swap_buffers_begin();
    wm.swap_buffers_begin();

    assert_eq!(clock.now(), 2 * 333_333);
    assert_eq!(wm.pacer().previous_swap(), 2 * 333_333);
}

#[test]
fn dropped_file_is_published_in_config() {
    let cfg = config();
    let mut wm = manager(cfg.clone());
    wm.native_mut()
        .push_event(NativeEvent::DroppedFile(PathBuf::from("/tmp/rom.z64")));
    wm.handle_events();

    let c = cfg.borrow();
    assert_eq!(c.get_string(config::DROPPED_FILE).as_deref(), Some("/tmp/rom.z64"));
    assert_eq!(c.get_int(config::NEW_FILE_DROPPED, 0), 1);
}

#[test]
fn close_request_stops_the_loop() {
    let mut wm = manager(config());
    wm.native_mut().push_event(NativeEvent::CloseRequested);
    wm.handle_events();
    assert!(!wm.is_running());
}

#[test]
fn geometry_is_saved_only_when_windowed() {
    let cfg = config();
    let mut wm = manager(cfg.clone());
    wm.native_mut().push_event(NativeEvent::Resized { width: 1024, height: 768 });
    wm.handle_events();
    wm.set_fullscreen(true);
    wm.save_window_geometry();
    assert!(!cfg.borrow().contains(config::WINDOW_WIDTH));

    wm.set_fullscreen(false);
    wm.native_mut().push_event(NativeEvent::Resized { width: 1024, height: 768 });
    wm.handle_events();
    wm.save_window_geometry();
    let c = cfg.borrow();
    assert_eq!(c.get_int(config::WINDOW_WIDTH, 0), 1024);
    assert_eq!(c.get_int(config::WINDOW_HEIGHT, 0), 768);
    assert_eq!(c.get_int(config::WINDOW_POSITION_X, 0), 100);
}

#[test]
fn key_names_through_the_backend() {
    let wm = manager(config());
    assert_eq!(wm.key_name(0x01), "Escape");
}

#[test]
fn destroy_is_idempotent() {
    let mut wm = manager(config());
    wm.destroy();
    wm.destroy();
    let destroys = wm
        .native()
        .calls()
        .iter()
        .filter(|c| **c == NativeCall::Destroy)
        .count();
    assert_eq!(destroys, 1);
    assert!(!wm.is_running());

    wm.swap_buffers_begin();
    wm.set_fullscreen(true);
    assert_eq!(wm.native().calls(), &[NativeCall::Destroy]);
}
