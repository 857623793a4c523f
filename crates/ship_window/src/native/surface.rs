use anyhow::{Context, Result};
use std::sync::Arc;
use winit::window::Window;

/// Borrowed view of the frame being built, handed to the external renderer.
pub struct FrameTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
}

struct AcquiredFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    drawn: bool,
}

/// wgpu surface of the main window: swap interval, frame latency, present.
pub struct SurfacePresenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    present_modes: Vec<wgpu::PresentMode>,
    current: Option<AcquiredFrame>,
}

impl SurfacePresenter {
    pub async fn new(window: Arc<Window>, vsync: bool, frame_latency: u32) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("ship_window_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .context("requesting GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_modes = surface_caps.present_modes.clone();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: choose_present_mode(&present_modes, vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: frame_latency.max(1),
        };

        surface.configure(&device, &config);
        tracing::info!(
            "Surface configured: {:?} {:?} {}x{}",
            config.format,
            config.present_mode,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            present_modes,
            current: None,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 && (width != self.config.width || height != self.config.height) {
            self.current = None;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        let mode = choose_present_mode(&self.present_modes, vsync);
        if mode != self.config.present_mode {
            self.current = None;
            self.config.present_mode = mode;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_frame_latency(&mut self, latency: u32) {
        let latency = latency.max(1);
        if latency != self.config.desired_maximum_frame_latency {
            self.current = None;
            self.config.desired_maximum_frame_latency = latency;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Whether a non-vsync present mode exists.
    pub fn supports_tearing(&self) -> bool {
        self.present_modes
            .iter()
            .any(|m| matches!(m, wgpu::PresentMode::Immediate | wgpu::PresentMode::Mailbox))
    }

    /// Frame to draw into, acquired on first use in a frame.
    pub fn frame(&mut self) -> Option<FrameTarget<'_>> {
        if self.current.is_none() {
            self.acquire();
        }
        let frame = self.current.as_mut()?;
        frame.drawn = true;
        Some(FrameTarget {
            device: &self.device,
            queue: &self.queue,
            view: &frame.view,
            format: self.config.format,
        })
    }

    /// Present the current frame. A frame nobody drew into is cleared first.
    pub fn present(&mut self) {
        if self.current.is_none() {
            self.acquire();
        }
        let Some(frame) = self.current.take() else {
            return;
        };
        if !frame.drawn {
            self.clear(&frame.view);
        }
        frame.texture.present();
    }

    fn acquire(&mut self) {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.current = Some(AcquiredFrame { texture, view, drawn: false });
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
            }
            Err(e) => {
                tracing::warn!("Failed to acquire surface texture: {}", e);
            }
        }
    }

    fn clear(&self, view: &wgpu::TextureView) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn choose_present_mode(available: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Immediate, wgpu::PresentMode::Mailbox]
        .into_iter()
        .find(|m| available.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}
