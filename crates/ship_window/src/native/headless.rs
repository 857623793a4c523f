use super::{FullscreenKind, NativeEvent, NativeWindow, NativeWindowRequest};
use crate::geometry::DisplayMode;
use anyhow::Result;
use std::collections::VecDeque;

/// Native call as observed by the headless layer.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCall {
    Create(NativeWindowRequest),
    SetFullscreen(FullscreenKind),
    SetPosition(i32, i32),
    SetSize(u32, u32),
    SetCursorVisible(bool),
    WarpMouse(i32, i32),
    SetRelativeMouseMode(bool),
    SetSwapInterval(bool),
    Swap,
    Destroy,
}

/// Window layer without a window: records native calls and replays queued
/// events. Backs `--headless` runs and the test suite.
#[derive(Debug)]
pub struct HeadlessWindow {
    calls: Vec<NativeCall>,
    pending: VecDeque<NativeEvent>,
    created: bool,
    fail_create: bool,
    display: Option<usize>,
    display_mode: DisplayMode,
    wm_fullscreen: Option<bool>,
    width: u32,
    height: u32,
    pos: (i32, i32),
    mouse: (i32, i32),
    motion: (i32, i32),
    buttons: u32,
    relative: bool,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pending: VecDeque::new(),
            created: false,
            fail_create: false,
            display: Some(0),
            display_mode: DisplayMode { width: 1920, height: 1080, refresh_rate_hz: 60 },
            wm_fullscreen: None,
            width: 0,
            height: 0,
            pos: (0, 0),
            mouse: (0, 0),
            motion: (0, 0),
            buttons: 0,
            relative: false,
        }
    }

    /// Make the next `create` fail, as a missing video driver would.
    pub fn failing() -> Self {
        Self { fail_create: true, ..Self::new() }
    }

    pub fn push_event(&mut self, event: NativeEvent) {
        match &event {
            NativeEvent::MouseButtonDown(b) if (0..32).contains(b) => self.buttons |= 1 << b,
            NativeEvent::MouseButtonUp(b) if (0..32).contains(b) => self.buttons &= !(1 << b),
            _ => {}
        }
        self.pending.push_back(event);
    }

    /// Simulate a display the window cannot be located on (monitor unplugged).
    pub fn set_display(&mut self, display: Option<usize>) {
        self.display = display;
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    /// Simulate the window manager toggling fullscreen on its own.
    pub fn set_wm_fullscreen(&mut self, fullscreen: bool) {
        self.wm_fullscreen = Some(fullscreen);
    }

    pub fn move_mouse(&mut self, x: i32, y: i32) {
        self.motion.0 += x - self.mouse.0;
        self.motion.1 += y - self.mouse.1;
        self.mouse = (x, y);
    }

    pub fn calls(&self) -> &[NativeCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeWindow for HeadlessWindow {
    fn name(&self) -> &'static str {
        "headless"
    }

    fn create(&mut self, request: &NativeWindowRequest) -> Result<()> {
        if self.fail_create {
            anyhow::bail!("no video device available");
        }
        self.calls.push(NativeCall::Create(request.clone()));
        self.created = true;
        self.width = request.width;
        self.height = request.height;
        self.pos = (request.pos_x, request.pos_y);
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<NativeEvent>) {
        out.extend(self.pending.drain(..));
    }

    fn display_index(&self) -> Option<usize> {
        self.display
    }

    fn desktop_display_mode(&self, display: Option<usize>) -> Option<DisplayMode> {
        display.map(|_| self.display_mode)
    }

    fn set_fullscreen(&mut self, kind: FullscreenKind) -> Result<()> {
        self.calls.push(NativeCall::SetFullscreen(kind));
        if let FullscreenKind::Exclusive(mode) = kind {
            self.width = mode.width;
            self.height = mode.height;
        }
        self.wm_fullscreen = None;
        Ok(())
    }

    fn native_fullscreen(&self) -> Option<bool> {
        self.wm_fullscreen
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.calls.push(NativeCall::SetPosition(x, y));
        self.pos = (x, y);
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.calls.push(NativeCall::SetSize(width, height));
        self.width = width;
        self.height = height;
    }

    fn drawable_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn position(&self) -> (i32, i32) {
        self.pos
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.display.map(|_| self.display_mode.refresh_rate_hz)
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.calls.push(NativeCall::SetCursorVisible(visible));
    }

    fn warp_mouse(&mut self, x: i32, y: i32) {
        self.calls.push(NativeCall::WarpMouse(x, y));
        self.mouse = (x, y);
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.mouse
    }

    fn take_mouse_motion(&mut self) -> (i32, i32) {
        std::mem::take(&mut self.motion)
    }

    fn mouse_button_mask(&self) -> u32 {
        self.buttons
    }

    fn set_relative_mouse_mode(&mut self, enabled: bool) {
        self.calls.push(NativeCall::SetRelativeMouseMode(enabled));
        self.relative = enabled;
    }

    fn relative_mouse_mode(&self) -> bool {
        self.relative
    }

    fn set_swap_interval(&mut self, vsync: bool) {
        self.calls.push(NativeCall::SetSwapInterval(vsync));
    }

    fn set_maximum_frame_latency(&mut self, _latency: u32) -> bool {
        false
    }

    fn can_disable_vsync(&self) -> bool {
        true
    }

    fn is_frame_ready(&self) -> bool {
        self.created
    }

    fn swap(&mut self) {
        self.calls.push(NativeCall::Swap);
    }

    fn destroy(&mut self) {
        self.calls.push(NativeCall::Destroy);
        self.created = false;
    }
}
