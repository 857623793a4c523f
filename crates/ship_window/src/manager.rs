use crate::backend::{
    AllKeysUpCallback, FullscreenChangedCallback, KeyCallback, MouseButtonCallback,
    RawEventCallback, WindowBackend, WindowDescriptor,
};
use crate::config::{self, save_logged, SharedConfig};
use crate::geometry::{WindowDimensions, WindowGeometry, DEFAULT_POSITION};
use crate::native::{FullscreenKind, NativeEvent, NativeWindow, NativeWindowRequest};
use crate::pacer::{Clock, FramePacer, MonotonicClock, PacingStrategy};
use crate::scancode::{LogicalScancode, ScancodeTable};
use anyhow::Result;
use glam::{IVec2, Vec2};

const FALLBACK_REFRESH_RATE: u32 = 60;
const MOUSE_BUTTON_COUNT: i32 = 5;

#[derive(Default)]
struct Listeners {
    on_key_down: Option<KeyCallback>,
    on_key_up: Option<KeyCallback>,
    on_all_keys_up: Option<AllKeysUpCallback>,
    on_mouse_down: Option<MouseButtonCallback>,
    on_mouse_up: Option<MouseButtonCallback>,
    on_fullscreen_changed: Option<FullscreenChangedCallback>,
    on_raw_event: Option<RawEventCallback>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Destroyed,
}

/// [`WindowBackend`] over any [`NativeWindow`]: owns the native layer, the
/// scancode table, the frame pacer and the registered listeners.
pub struct WindowManager<N: NativeWindow, C: Clock = MonotonicClock> {
    native: N,
    config: SharedConfig,
    scancodes: ScancodeTable,
    pacer: FramePacer<C>,
    geometry: WindowGeometry,
    lifecycle: Lifecycle,
    running: bool,
    vsync_enabled: bool,
    wheel: Vec2,
    listeners: Listeners,
    events: Vec<NativeEvent>,
}

impl<N: NativeWindow> WindowManager<N, MonotonicClock> {
    pub fn new(native: N, config: SharedConfig) -> Self {
        Self::with_pacer(native, config, FramePacer::new())
    }
}

impl<N: NativeWindow, C: Clock> WindowManager<N, C> {
    pub fn with_clock(native: N, config: SharedConfig, clock: C, strategy: PacingStrategy) -> Self {
        Self::with_pacer(native, config, FramePacer::with_clock(clock, strategy))
    }

    fn with_pacer(native: N, config: SharedConfig, pacer: FramePacer<C>) -> Self {
        Self {
            native,
            config,
            scancodes: ScancodeTable::new(),
            pacer,
            geometry: WindowGeometry::default(),
            lifecycle: Lifecycle::Created,
            running: false,
            vsync_enabled: true,
            wheel: Vec2::ZERO,
            listeners: Listeners::default(),
            events: Vec::with_capacity(64),
        }
    }

    pub fn native(&self) -> &N {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut N {
        &mut self.native
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn scancodes(&self) -> &ScancodeTable {
        &self.scancodes
    }

    pub fn pacer(&self) -> &FramePacer<C> {
        &self.pacer
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    fn apply_fullscreen(&mut self, on: bool, notify: bool) {
        if self.geometry.fullscreen == on {
            return;
        }

        let display = self.native.display_index();
        if display.is_none() {
            tracing::warn!("Can't detect which display the window is on, probably outside the display area");
        }

        let kind = if on {
            let windowed = self.config.borrow().get_int(config::WINDOWED_FULLSCREEN, 0) != 0;
            match self.native.desktop_display_mode(display) {
                Some(mode) if !windowed => FullscreenKind::Exclusive(mode),
                Some(_) => FullscreenKind::Borderless,
                None => {
                    tracing::error!("Failed to query the desktop display mode");
                    FullscreenKind::Borderless
                }
            }
        } else {
            FullscreenKind::Windowed
        };

        match self.native.set_fullscreen(kind) {
            Ok(()) => {
                self.geometry.fullscreen = on;
                self.geometry.exclusive = matches!(kind, FullscreenKind::Exclusive(_));
            }
            Err(e) => {
                tracing::error!("Failed to switch {} fullscreen mode: {:#}", if on { "to" } else { "from" }, e);
            }
        }

        if !on {
            let mut restored = WindowGeometry::from_config(&*self.config.borrow());
            if display.is_none() {
                restored.pos_x = DEFAULT_POSITION;
                restored.pos_y = DEFAULT_POSITION;
            }
            self.native.set_position(restored.pos_x, restored.pos_y);
            self.native.set_size(restored.width, restored.height);
            self.geometry.width = restored.width;
            self.geometry.height = restored.height;
            self.geometry.pos_x = restored.pos_x;
            self.geometry.pos_y = restored.pos_y;
        }

        tracing::info!("Fullscreen {}", if on { "on" } else { "off" });
        if notify {
            if let Some(cb) = self.listeners.on_fullscreen_changed.as_mut() {
                cb(on);
            }
        }
    }

    fn dispatch(&mut self, event: NativeEvent) {
        match event {
            NativeEvent::KeyDown(native) => {
                let key = self.scancodes.translate(native);
                if let Some(cb) = self.listeners.on_key_down.as_mut() {
                    cb(key);
                }
            }
            NativeEvent::KeyUp(native) => {
                let key = self.scancodes.translate(native);
                if let Some(cb) = self.listeners.on_key_up.as_mut() {
                    cb(key);
                }
            }
            NativeEvent::FocusLost => {
                if let Some(cb) = self.listeners.on_all_keys_up.as_mut() {
                    cb();
                }
            }
            NativeEvent::MouseButtonDown(button) => {
                if !(0..MOUSE_BUTTON_COUNT).contains(&button) {
                    return;
                }
                if let Some(cb) = self.listeners.on_mouse_down.as_mut() {
                    cb(button);
                }
            }
            NativeEvent::MouseButtonUp(button) => {
                if !(0..MOUSE_BUTTON_COUNT).contains(&button) {
                    return;
                }
                if let Some(cb) = self.listeners.on_mouse_up.as_mut() {
                    cb(button);
                }
            }
            NativeEvent::MouseWheel { x, y } => {
                self.wheel += Vec2::new(x, y);
            }
            NativeEvent::Resized { width, height } => {
                tracing::debug!("Window resized: {}x{}", width, height);
                self.geometry.width = width;
                self.geometry.height = height;
            }
            NativeEvent::Moved { x, y } => {
                if !self.geometry.fullscreen {
                    self.geometry.pos_x = x;
                    self.geometry.pos_y = y;
                }
            }
            NativeEvent::DroppedFile(path) => {
                tracing::info!("File dropped: {}", path.display());
                let mut cfg = self.config.borrow_mut();
                cfg.set_string(config::DROPPED_FILE, &path.to_string_lossy());
                cfg.set_int(config::NEW_FILE_DROPPED, 1);
                save_logged(&mut *cfg);
            }
            NativeEvent::CloseRequested | NativeEvent::Quit => {
                tracing::info!("Window close requested");
                self.close();
            }
        }
    }

    fn resync_fullscreen(&mut self) {
        let Some(actual) = self.native.native_fullscreen() else {
            return;
        };
        if actual != self.geometry.fullscreen {
            tracing::debug!("Fullscreen changed by the window manager: {}", actual);
            self.geometry.fullscreen = actual;
            if let Some(cb) = self.listeners.on_fullscreen_changed.as_mut() {
                cb(actual);
            }
        }
    }
}

impl<N: NativeWindow, C: Clock> WindowBackend for WindowManager<N, C> {
    fn backend_name(&self) -> &'static str {
        self.native.name()
    }

    fn init(&mut self, desc: &WindowDescriptor) -> Result<()> {
        if self.lifecycle != Lifecycle::Created {
            anyhow::bail!("window backend already initialized");
        }

        let vsync = self.config.borrow().get_int(config::VSYNC_ENABLED, 1) != 0;
        let request = NativeWindowRequest {
            title: desc.title(),
            api_name: desc.api_name.clone(),
            width: desc.width,
            height: desc.height,
            pos_x: desc.pos_x,
            pos_y: desc.pos_y,
            vsync,
        };
        if let Err(e) = self.native.create(&request) {
            tracing::error!("Failed to create window: {:#}", e);
            self.native.destroy();
            self.lifecycle = Lifecycle::Destroyed;
            return Err(e.context("creating the main window"));
        }
        self.lifecycle = Lifecycle::Running;
        self.running = true;
        self.vsync_enabled = vsync;

        self.geometry.pos_x = desc.pos_x;
        self.geometry.pos_y = desc.pos_y;
        if self.native.display_index().is_none() {
            tracing::warn!("Window is outside every display, moving it to the default position");
            self.geometry.pos_x = DEFAULT_POSITION;
            self.geometry.pos_y = DEFAULT_POSITION;
            self.native.set_position(DEFAULT_POSITION, DEFAULT_POSITION);
        }
        let (width, height) = self.native.drawable_size();
        self.geometry.width = width;
        self.geometry.height = height;

        if desc.start_fullscreen {
            self.apply_fullscreen(true, false);
        }
        self.native.set_swap_interval(vsync);

        if !self.native.is_frame_ready() {
            tracing::error!("Graphics surface unavailable, frames cannot be presented");
        }

        let now = self.pacer.clock().now();
        self.pacer.reset(now);
        tracing::info!(
            "Window '{}' created with {} backend ({}x{})",
            request.title,
            self.native.name(),
            width,
            height
        );
        Ok(())
    }

    fn close(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn is_frame_ready(&self) -> bool {
        self.is_live() && self.native.is_frame_ready()
    }

    fn set_keyboard_callbacks(
        &mut self,
        on_key_down: KeyCallback,
        on_key_up: KeyCallback,
        on_all_keys_up: AllKeysUpCallback,
    ) {
        self.listeners.on_key_down = Some(on_key_down);
        self.listeners.on_key_up = Some(on_key_up);
        self.listeners.on_all_keys_up = Some(on_all_keys_up);
    }

    fn set_mouse_callbacks(&mut self, on_down: MouseButtonCallback, on_up: MouseButtonCallback) {
        self.listeners.on_mouse_down = Some(on_down);
        self.listeners.on_mouse_up = Some(on_up);
    }

    fn set_fullscreen_changed_callback(&mut self, callback: FullscreenChangedCallback) {
        self.listeners.on_fullscreen_changed = Some(callback);
    }

    fn set_raw_event_callback(&mut self, callback: RawEventCallback) {
        self.listeners.on_raw_event = Some(callback);
    }

    fn set_fullscreen(&mut self, enable: bool) {
        if !self.is_live() {
            return;
        }
        self.apply_fullscreen(enable, true);
    }

    fn is_fullscreen(&self) -> bool {
        self.geometry.fullscreen
    }

    fn active_window_refresh_rate(&self) -> u32 {
        self.native
            .refresh_rate()
            .filter(|&rate| rate != 0)
            .unwrap_or(FALLBACK_REFRESH_RATE)
    }

    fn set_cursor_visibility(&mut self, visible: bool) {
        self.native.set_cursor_visible(visible);
    }

    fn set_mouse_pos(&mut self, pos: IVec2) {
        self.native.warp_mouse(pos.x, pos.y);
    }

    fn mouse_pos(&self) -> IVec2 {
        let (x, y) = self.native.mouse_position();
        IVec2::new(x, y)
    }

    fn mouse_delta(&mut self) -> IVec2 {
        let (x, y) = self.native.take_mouse_motion();
        IVec2::new(x, y)
    }

    fn mouse_wheel(&mut self) -> Vec2 {
        std::mem::take(&mut self.wheel)
    }

    fn mouse_button_state(&self, button: u32) -> bool {
        button < 32 && self.native.mouse_button_mask() & (1 << button) != 0
    }

    fn set_mouse_capture(&mut self, capture: bool) {
        self.native.set_relative_mouse_mode(capture);
    }

    fn is_mouse_captured(&self) -> bool {
        self.native.relative_mouse_mode()
    }

    fn dimensions(&self) -> WindowDimensions {
        let (width, height) = self.native.drawable_size();
        let (pos_x, pos_y) = self.native.position();
        WindowDimensions { width, height, pos_x, pos_y }
    }

    fn handle_events(&mut self) {
        if !self.is_live() {
            return;
        }
        let mut events = std::mem::take(&mut self.events);
        self.native.poll_events(&mut events);
        for event in events.drain(..) {
            if let Some(cb) = self.listeners.on_raw_event.as_mut() {
                cb(&event);
            }
            self.dispatch(event);
        }
        self.events = events;
        self.resync_fullscreen();
    }

    fn swap_buffers_begin(&mut self) {
        if !self.is_live() {
            return;
        }
        let next_vsync = self.config.borrow().get_int(config::VSYNC_ENABLED, 1) != 0;
        if next_vsync != self.vsync_enabled {
            tracing::info!("VSync {}", if next_vsync { "enabled" } else { "disabled" });
            self.vsync_enabled = next_vsync;
            self.native.set_swap_interval(next_vsync);
        }

        self.pacer.wait_for_next_frame();
        self.native.swap();
    }

    fn swap_buffers_end(&mut self) {}

    fn set_target_fps(&mut self, fps: u32) {
        self.pacer.set_target_fps(fps);
    }

    fn set_maximum_frame_latency(&mut self, latency: u32) {
        if !self.native.set_maximum_frame_latency(latency) {
            tracing::debug!("{} backend ignores maximum frame latency", self.native.name());
        }
    }

    fn key_name(&self, scancode: LogicalScancode) -> &'static str {
        self.scancodes.key_name(scancode)
    }

    fn can_disable_vsync(&self) -> bool {
        self.native.can_disable_vsync()
    }

    fn save_window_geometry(&mut self) {
        if !self.is_live() || self.geometry.fullscreen {
            return;
        }
        let (pos_x, pos_y) = self.native.position();
        self.geometry.pos_x = pos_x;
        self.geometry.pos_y = pos_y;
        let mut cfg = self.config.borrow_mut();
        self.geometry.write_to_config(&mut *cfg);
        save_logged(&mut *cfg);
    }

    fn destroy(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        self.native.destroy();
        self.lifecycle = Lifecycle::Destroyed;
        self.running = false;
        tracing::info!("Window backend destroyed");
    }
}

impl<N: NativeWindow, C: Clock> Drop for WindowManager<N, C> {
    fn drop(&mut self) {
        self.destroy();
    }
}
