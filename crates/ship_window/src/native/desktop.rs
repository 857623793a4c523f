use super::surface::{FrameTarget, SurfacePresenter};
use super::{FullscreenKind, NativeEvent, NativeWindow, NativeWindowRequest};
use crate::geometry::DisplayMode;
use crate::hid;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::monitor::MonitorHandle;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

/// Pixel scroll distance treated as one wheel notch.
const PIXELS_PER_NOTCH: f64 = 20.0;
/// Startup pumps allowed before giving up on the window appearing.
const STARTUP_PUMPS: usize = 8;

/// Event loop state: collects decoded events between pumps.
#[derive(Default)]
struct Pump {
    pending: Option<winit::window::WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,
    events: Vec<NativeEvent>,
    cursor: (i32, i32),
    motion: (f64, f64),
    buttons: u32,
}

impl ApplicationHandler for Pump {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(attributes) = self.pending.take() else {
            return;
        };
        match event_loop.create_window(attributes) {
            Ok(window) => {
                tracing::info!("Native window created");
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                self.create_error = Some(e.into());
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(NativeEvent::CloseRequested),
            WindowEvent::Resized(size) => self.events.push(NativeEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Moved(pos) => self.events.push(NativeEvent::Moved { x: pos.x, y: pos.y }),
            WindowEvent::Focused(false) => {
                self.buttons = 0;
                self.events.push(NativeEvent::FocusLost);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let Some(native) = hid::from_winit(code) else {
                    tracing::trace!("Unmapped key {:?}", code);
                    return;
                };
                self.events.push(match event.state {
                    ElementState::Pressed => NativeEvent::KeyDown(native),
                    ElementState::Released => NativeEvent::KeyUp(native),
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let index = mouse_button_index(button);
                let pressed = state == ElementState::Pressed;
                if (0..32).contains(&index) {
                    if pressed {
                        self.buttons |= 1 << index;
                    } else {
                        self.buttons &= !(1 << index);
                    }
                }
                self.events.push(if pressed {
                    NativeEvent::MouseButtonDown(index)
                } else {
                    NativeEvent::MouseButtonUp(index)
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x, y),
                    MouseScrollDelta::PixelDelta(p) => {
                        ((p.x / PIXELS_PER_NOTCH) as f32, (p.y / PIXELS_PER_NOTCH) as f32)
                    }
                };
                self.events.push(NativeEvent::MouseWheel { x, y });
            }
            WindowEvent::DroppedFile(path) => self.events.push(NativeEvent::DroppedFile(path)),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.motion.0 += delta.0;
            self.motion.1 += delta.1;
        }
    }
}

fn mouse_button_index(button: MouseButton) -> i32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::Back => 3,
        MouseButton::Forward => 4,
        MouseButton::Other(n) => i32::from(n),
    }
}

/// Desktop window layer: winit for the window and input, wgpu for the surface.
///
/// The event loop is pumped from [`NativeWindow::poll_events`] so the game
/// keeps ownership of its main loop.
pub struct WinitWindow {
    event_loop: Option<EventLoop<()>>,
    pump: Pump,
    surface: Option<SurfacePresenter>,
    relative: bool,
    frame_latency: u32,
}

impl WinitWindow {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            pump: Pump::default(),
            surface: None,
            relative: false,
            frame_latency: 2,
        }
    }

    /// Target for the renderer's draw calls this frame.
    pub fn frame(&mut self) -> Option<FrameTarget<'_>> {
        self.surface.as_mut()?.frame()
    }

    fn window(&self) -> Option<&Window> {
        self.pump.window.as_deref()
    }

    fn monitor(&self, display: usize) -> Option<MonitorHandle> {
        self.window()?.available_monitors().nth(display)
    }

    fn pump_once(&mut self) -> PumpStatus {
        match self.event_loop.as_mut() {
            Some(event_loop) => event_loop.pump_app_events(Some(Duration::ZERO), &mut self.pump),
            None => PumpStatus::Continue,
        }
    }
}

impl Default for WinitWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeWindow for WinitWindow {
    fn name(&self) -> &'static str {
        "winit"
    }

    fn create(&mut self, request: &NativeWindowRequest) -> Result<()> {
        let event_loop = EventLoop::new().context("creating the event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop = Some(event_loop);

        self.pump.pending = Some(
            Window::default_attributes()
                .with_title(request.title.clone())
                .with_inner_size(PhysicalSize::new(request.width, request.height))
                .with_position(PhysicalPosition::new(request.pos_x, request.pos_y)),
        );

        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) = self.pump_once() {
                anyhow::bail!("event loop exited during startup with code {}", code);
            }
            if let Some(e) = self.pump.create_error.take() {
                return Err(e);
            }
            if self.pump.window.is_some() {
                break;
            }
        }
        let window = self
            .pump
            .window
            .clone()
            .context("window did not appear during startup")?;

        match pollster::block_on(SurfacePresenter::new(window, request.vsync, self.frame_latency)) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => tracing::error!("Error creating graphics surface: {:#}", e),
        }
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<NativeEvent>) {
        if let PumpStatus::Exit(code) = self.pump_once() {
            tracing::debug!("Event loop exited with code {}", code);
            self.pump.events.push(NativeEvent::Quit);
        }
        let resized = self.pump.events.iter().rev().find_map(|e| match e {
            NativeEvent::Resized { width, height } => Some((*width, *height)),
            _ => None,
        });
        if let (Some((width, height)), Some(surface)) = (resized, self.surface.as_mut()) {
            surface.resize(width, height);
        }
        out.append(&mut self.pump.events);
    }

    fn display_index(&self) -> Option<usize> {
        let window = self.window()?;
        let current = window.current_monitor()?;
        window.available_monitors().position(|m| m == current)
    }

    fn desktop_display_mode(&self, display: Option<usize>) -> Option<DisplayMode> {
        let monitor = self.monitor(display?)?;
        let size = monitor.size();
        Some(DisplayMode {
            width: size.width,
            height: size.height,
            refresh_rate_hz: monitor.refresh_rate_millihertz().unwrap_or(0) / 1000,
        })
    }

    fn set_fullscreen(&mut self, kind: FullscreenKind) -> Result<()> {
        let window = self.window().context("window not created")?;
        let fullscreen = match kind {
            FullscreenKind::Windowed => None,
            FullscreenKind::Borderless => Some(Fullscreen::Borderless(window.current_monitor())),
            FullscreenKind::Exclusive(mode) => {
                let monitor = window.current_monitor().context("no current monitor")?;
                let video_mode = monitor
                    .video_modes()
                    .filter(|vm| vm.size() == PhysicalSize::new(mode.width, mode.height))
                    .max_by_key(|vm| vm.refresh_rate_millihertz())
                    .with_context(|| {
                        format!("no {}x{} video mode on the current monitor", mode.width, mode.height)
                    })?;
                Some(Fullscreen::Exclusive(video_mode))
            }
        };
        window.set_fullscreen(fullscreen);
        Ok(())
    }

    fn native_fullscreen(&self) -> Option<bool> {
        self.window().map(|w| w.fullscreen().is_some())
    }

    fn set_position(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window() {
            window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Some(window) = self.window() {
            let _ = window.request_inner_size(PhysicalSize::new(width, height));
        }
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.window()
            .map(|w| {
                let size = w.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    fn position(&self) -> (i32, i32) {
        self.window()
            .and_then(|w| w.outer_position().ok())
            .map(|p| (p.x, p.y))
            .unwrap_or((0, 0))
    }

    fn refresh_rate(&self) -> Option<u32> {
        self.window()?
            .current_monitor()?
            .refresh_rate_millihertz()
            .map(|mhz| mhz / 1000)
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = self.window() {
            window.set_cursor_visible(visible);
        }
    }

    fn warp_mouse(&mut self, x: i32, y: i32) {
        if let Some(window) = self.window() {
            if let Err(e) = window.set_cursor_position(PhysicalPosition::new(x, y)) {
                tracing::debug!("Cursor warp unsupported: {}", e);
            }
        }
        self.pump.cursor = (x, y);
    }

    fn mouse_position(&self) -> (i32, i32) {
        self.pump.cursor
    }

    fn take_mouse_motion(&mut self) -> (i32, i32) {
        let (x, y) = std::mem::take(&mut self.pump.motion);
        (x.round() as i32, y.round() as i32)
    }

    fn mouse_button_mask(&self) -> u32 {
        self.pump.buttons
    }

    fn set_relative_mouse_mode(&mut self, enabled: bool) {
        let Some(window) = self.window() else {
            return;
        };
        let grab = if enabled {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            tracing::warn!("Failed to change cursor grab: {}", e);
        }
        window.set_cursor_visible(!enabled);
        self.relative = enabled;
    }

    fn relative_mouse_mode(&self) -> bool {
        self.relative
    }

    fn set_swap_interval(&mut self, vsync: bool) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_vsync(vsync);
        }
    }

    fn set_maximum_frame_latency(&mut self, latency: u32) -> bool {
        self.frame_latency = latency;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_frame_latency(latency);
        }
        true
    }

    fn can_disable_vsync(&self) -> bool {
        self.surface.as_ref().is_some_and(|s| s.supports_tearing())
    }

    fn is_frame_ready(&self) -> bool {
        self.surface.is_some()
    }

    fn swap(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.present();
        }
    }

    fn destroy(&mut self) {
        self.surface = None;
        self.pump.window = None;
        self.event_loop = None;
        tracing::info!("Native window destroyed");
    }
}
