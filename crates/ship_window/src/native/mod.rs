//! Per-platform native layers driven by [`crate::manager::WindowManager`].

pub mod headless;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod desktop;
#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod surface;

use crate::geometry::DisplayMode;
use crate::hid::NativeScancode;
use anyhow::Result;
use std::path::PathBuf;

/// Native event after platform decoding, before scancode translation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeEvent {
    KeyDown(NativeScancode),
    KeyUp(NativeScancode),
    /// Window lost keyboard focus; held keys will never see their release.
    FocusLost,
    /// Zero based: 0 left, 1 middle, 2 right, 3 back, 4 forward.
    MouseButtonDown(i32),
    MouseButtonUp(i32),
    MouseWheel { x: f32, y: f32 },
    Resized { width: u32, height: u32 },
    Moved { x: i32, y: i32 },
    DroppedFile(PathBuf),
    CloseRequested,
    Quit,
}

/// Window creation request, already resolved by the manager.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeWindowRequest {
    pub title: String,
    pub api_name: String,
    pub width: u32,
    pub height: u32,
    pub pos_x: i32,
    pub pos_y: i32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenKind {
    Windowed,
    /// Borderless window covering the display.
    Borderless,
    /// Mode switch to the given display mode.
    Exclusive(DisplayMode),
}

/// The narrow set of native calls a platform provides.
///
/// Everything stateful (fullscreen bookkeeping, wheel accumulation, listener
/// dispatch, frame pacing) lives in the manager so every platform behaves the
/// same.
pub trait NativeWindow {
    fn name(&self) -> &'static str;

    fn create(&mut self, request: &NativeWindowRequest) -> Result<()>;
    /// Append every pending native event to `out`.
    fn poll_events(&mut self, out: &mut Vec<NativeEvent>);

    /// Index of the display the window is on, None if it cannot be detected.
    fn display_index(&self) -> Option<usize>;
    fn desktop_display_mode(&self, display: Option<usize>) -> Option<DisplayMode>;
    fn set_fullscreen(&mut self, kind: FullscreenKind) -> Result<()>;
    /// Fullscreen state as the platform sees it, for platforms where the
    /// window manager can change it behind our back.
    fn native_fullscreen(&self) -> Option<bool>;

    fn set_position(&mut self, x: i32, y: i32);
    fn set_size(&mut self, width: u32, height: u32);
    fn drawable_size(&self) -> (u32, u32);
    fn position(&self) -> (i32, i32);
    /// Zero or None when unknown.
    fn refresh_rate(&self) -> Option<u32>;

    fn set_cursor_visible(&mut self, visible: bool);
    fn warp_mouse(&mut self, x: i32, y: i32);
    fn mouse_position(&self) -> (i32, i32);
    /// Relative motion since the previous call.
    fn take_mouse_motion(&mut self) -> (i32, i32);
    /// Bit `n` set while button `n` is held.
    fn mouse_button_mask(&self) -> u32;
    fn set_relative_mouse_mode(&mut self, enabled: bool);
    fn relative_mouse_mode(&self) -> bool;

    fn set_swap_interval(&mut self, vsync: bool);
    /// Returns false when the platform cannot honour it.
    fn set_maximum_frame_latency(&mut self, latency: u32) -> bool;
    fn can_disable_vsync(&self) -> bool;
    /// Whether the graphics surface came up.
    fn is_frame_ready(&self) -> bool;
    fn swap(&mut self);
    fn destroy(&mut self);
}
