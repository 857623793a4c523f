use crate::geometry::WindowDimensions;
use crate::native::NativeEvent;
use crate::scancode::LogicalScancode;
use anyhow::Result;
use glam::{IVec2, Vec2};

/// Key listener; the return value reports whether the key was consumed.
pub type KeyCallback = Box<dyn FnMut(LogicalScancode) -> bool>;
pub type AllKeysUpCallback = Box<dyn FnMut()>;
/// Mouse button listener, buttons are zero based (0 left, 1 middle, 2 right, 3, 4).
pub type MouseButtonCallback = Box<dyn FnMut(i32) -> bool>;
pub type FullscreenChangedCallback = Box<dyn FnMut(bool)>;
/// Sees every native event before translation, for overlay/GUI layers.
pub type RawEventCallback = Box<dyn FnMut(&NativeEvent)>;

/// Parameters of the main window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor {
    pub game_name: String,
    /// Graphics API shown in the title ("OpenGL", "Metal", "wgpu", ...).
    pub api_name: String,
    pub start_fullscreen: bool,
    pub width: u32,
    pub height: u32,
    pub pos_x: i32,
    pub pos_y: i32,
}

impl WindowDescriptor {
    pub fn title(&self) -> String {
        format!("{} ({})", self.game_name, self.api_name)
    }
}

/// Window, input and timing surface every platform backend provides.
///
/// Listeners run synchronously inside [`WindowBackend::handle_events`] and
/// never receive the backend, so they cannot re-enter event polling.
pub trait WindowBackend {
    fn backend_name(&self) -> &'static str;

    /// Create the native window. An error here is fatal for the caller.
    fn init(&mut self, desc: &WindowDescriptor) -> Result<()>;
    fn close(&mut self);
    fn is_running(&self) -> bool;
    /// False when the graphics surface could not be created.
    fn is_frame_ready(&self) -> bool;

    fn set_keyboard_callbacks(
        &mut self,
        on_key_down: KeyCallback,
        on_key_up: KeyCallback,
        on_all_keys_up: AllKeysUpCallback,
    );
    fn set_mouse_callbacks(&mut self, on_down: MouseButtonCallback, on_up: MouseButtonCallback);
    fn set_fullscreen_changed_callback(&mut self, callback: FullscreenChangedCallback);
    fn set_raw_event_callback(&mut self, callback: RawEventCallback);

    fn set_fullscreen(&mut self, enable: bool);
    fn is_fullscreen(&self) -> bool;
    /// Never zero; 60 when the platform does not know.
    fn active_window_refresh_rate(&self) -> u32;

    fn set_cursor_visibility(&mut self, visible: bool);
    fn set_mouse_pos(&mut self, pos: IVec2);
    fn mouse_pos(&self) -> IVec2;
    fn mouse_delta(&mut self) -> IVec2;
    /// Wheel movement since the previous read.
    fn mouse_wheel(&mut self) -> Vec2;
    fn mouse_button_state(&self, button: u32) -> bool;
    fn set_mouse_capture(&mut self, capture: bool);
    fn is_mouse_captured(&self) -> bool;

    fn dimensions(&self) -> WindowDimensions;
    fn handle_events(&mut self);

    fn swap_buffers_begin(&mut self);
    fn swap_buffers_end(&mut self);
    fn set_target_fps(&mut self, fps: u32);
    /// Best effort, silently ignored where unsupported.
    fn set_maximum_frame_latency(&mut self, latency: u32);
    fn key_name(&self, scancode: LogicalScancode) -> &'static str;
    fn can_disable_vsync(&self) -> bool;

    /// Persist the windowed geometry (skipped while fullscreen).
    fn save_window_geometry(&mut self);
    /// Release native resources. Later calls do nothing.
    fn destroy(&mut self);
}
