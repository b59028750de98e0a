//! wgpu-backed drawing surface for the native viewer.
//!
//! [`GpuCanvas`] implements [`Surface`] by batching every primitive of a frame
//! on the CPU and submitting the whole frame from [`Surface::finish_frame`]:
//! one render pass into the persistent canvas texture, then one present pass
//! onto the window.

pub mod batch;
pub mod pipelines;
pub mod shaders;
mod target;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::color::{Rgba, PAGE_BACKGROUND};
use crate::error::GpuError;
use crate::surface::{Paint, Rect, Surface};

use batch::{Batch, RunKind};
use target::CanvasTarget;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Viewport {
    size: [f32; 2],
    _pad: [f32; 2],
    backdrop: [f32; 4],
}

impl Viewport {
    fn new(width: u32, height: u32) -> Self {
        let [r, g, b] = PAGE_BACKGROUND.to_unit();
        Self {
            size: [width as f32, height as f32],
            _pad: [0.0; 2],
            backdrop: [r, g, b, 1.0],
        }
    }
}

/// Whole-pixel extent for a requested surface size, or `None` when either
/// side rounds down to zero (minimized windows).
fn canvas_extent(size: Vec2) -> Option<(u32, u32)> {
    let width = size.x.max(0.0).floor() as u32;
    let height = size.y.max(0.0).floor() as u32;
    (width > 0 && height > 0).then_some((width, height))
}

pub struct GpuCanvas {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    fill_pipeline: wgpu::RenderPipeline,
    stroke_pipeline: wgpu::RenderPipeline,
    target: CanvasTarget,
    batch: Batch,
    lost: bool,
}

impl GpuCanvas {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Canvas colors are blended in gamma space, so present without an
        // extra sRGB encode when the surface allows it.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Buffer"),
            contents: bytemuck::bytes_of(&Viewport::new(config.width, config.height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_layout = pipelines::viewport_layout(&device);
        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let fill_pipeline = pipelines::create_fill_pipeline(&device, &viewport_layout);
        let stroke_pipeline = pipelines::create_stroke_pipeline(&device, &viewport_layout);
        let target = CanvasTarget::new(
            &device,
            &viewport_layout,
            config.width,
            config.height,
            surface_format,
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            viewport_buffer,
            viewport_bind_group,
            fill_pipeline,
            stroke_pipeline,
            target,
            batch: Batch::default(),
            lost: false,
        })
    }

    /// True once the device ran out of memory; the canvas no longer draws.
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let fill_buffer = (!self.batch.fills.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Fill Instances"),
                contents: bytemuck::cast_slice(&self.batch.fills),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        let stroke_buffer = (!self.batch.strokes.is_empty()).then(|| {
            self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Stroke Vertices"),
                contents: bytemuck::cast_slice(&self.batch.strokes),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Canvas Encoder"),
        });

        // Draw pass: keeps previous canvas contents
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.viewport_bind_group, &[]);

            for run in &self.batch.runs {
                match (run.kind, &fill_buffer, &stroke_buffer) {
                    (RunKind::Fill, Some(fills), _) => {
                        pass.set_pipeline(&self.fill_pipeline);
                        pass.set_vertex_buffer(0, fills.slice(..));
                        pass.draw(0..6, run.range.clone());
                    }
                    (RunKind::Stroke, _, Some(strokes)) => {
                        pass.set_pipeline(&self.stroke_pipeline);
                        pass.set_vertex_buffer(0, strokes.slice(..));
                        pass.draw(run.range.clone(), 0..1);
                    }
                    _ => {}
                }
            }
        }

        // Present pass
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Present Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.target.pipeline);
            pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            pass.set_bind_group(1, &self.target.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Surface for GpuCanvas {
    fn container_size(&self) -> Vec2 {
        let size = self.window.inner_size();
        Vec2::new(size.width as f32, size.height as f32)
    }

    fn set_size(&mut self, size: Vec2) {
        let Some((width, height)) = canvas_extent(size) else {
            return;
        };
        if width == self.config.width && height == self.config.height {
            return;
        }
        log::debug!("resizing canvas to {}x{}", width, height);

        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
        self.target.resize(&self.device, width, height);
        let viewport = Viewport::new(width, height);
        self.queue
            .write_buffer(&self.viewport_buffer, 0, bytemuck::bytes_of(&viewport));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.batch.fill_rect(rect, paint);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.batch.fill_circle(center, radius, paint);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.batch.stroke_line(from, to, width, color);
    }

    fn finish_frame(&mut self) {
        if self.lost {
            self.batch.clear();
            return;
        }

        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, canvas disabled");
                self.lost = true;
            }
            Err(e) => log::warn!("dropped frame: {:?}", e),
        }
        self.batch.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_layout() {
        assert_eq!(std::mem::size_of::<Viewport>(), 32);
        let v = Viewport::new(640, 480);
        assert_eq!(v.size, [640.0, 480.0]);
        assert_eq!(v.backdrop[3], 1.0);
    }

    #[test]
    fn test_canvas_extent_floors() {
        assert_eq!(canvas_extent(Vec2::new(600.7, 300.2)), Some((600, 300)));
        assert_eq!(canvas_extent(Vec2::new(0.5, 300.0)), None);
        assert_eq!(canvas_extent(Vec2::new(-4.0, 10.0)), None);
    }
}
