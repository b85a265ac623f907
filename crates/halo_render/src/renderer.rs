//! wgpu canvas renderer
//!
//! Draws tessellated meshes with straight alpha blending over a solid
//! background. Meshes are drawn in the order given, so later layers sit on
//! top of earlier ones.

use crate::error::RenderError;
use crate::tessellate::{Batch, Mesh, Vertex};
use halo_core::{ClipRect, Rgba};
use std::sync::Arc;
use winit::window::Window;

/// Vertices the first buffer holds before it has to grow.
const INITIAL_VERTEX_CAPACITY: u64 = 16 * 1024;

pub struct CanvasRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    background: wgpu::Color,
}

impl CanvasRenderer {
    pub async fn new(window: Arc<Window>, background: Rgba) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
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
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Halo Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are specified in sRGB already; a linear target passes
        // them through the blend unchanged, as a 2D canvas does.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        tracing::info!(
            adapter = %adapter.get_info().name,
            format = ?surface_format,
            "Renderer initialized"
        );

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/canvas.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Canvas Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Canvas Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);
        let [r, g, b, a] = background.to_f32();

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            background: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
        })
    }

    /// Current surface size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        tracing::debug!(width, height, "Surface reconfigured");
    }

    /// Clear to the background and draw `layers` bottom to top.
    pub fn render(&mut self, layers: &[&Mesh]) -> Result<(), wgpu::SurfaceError> {
        let total: usize = layers.iter().map(|m| m.vertices.len()).sum();
        self.reserve(total as u64);

        let mut draws: Vec<(Batch, u32)> = Vec::new();
        let mut offset = 0u32;
        for mesh in layers {
            if mesh.vertices.is_empty() {
                continue;
            }
            self.queue.write_buffer(
                &self.vertex_buffer,
                offset as u64 * std::mem::size_of::<Vertex>() as u64,
                bytemuck::cast_slice(&mesh.vertices),
            );
            draws.extend(mesh.batches.iter().map(|b| (b.clone(), offset)));
            offset += mesh.vertices.len() as u32;
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Canvas Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            for (batch, base) in &draws {
                let Some((x, y, w, h)) =
                    scissor_pixels(batch.scissor, self.config.width, self.config.height)
                else {
                    continue;
                };
                render_pass.set_scissor_rect(x, y, w, h);
                render_pass.draw(base + batch.vertices.start..base + batch.vertices.end, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Grow the vertex buffer so it holds at least `vertices`.
    fn reserve(&mut self, vertices: u64) {
        if vertices <= self.vertex_capacity {
            return;
        }
        let capacity = vertices.next_power_of_two();
        tracing::debug!(
            from = self.vertex_capacity,
            to = capacity,
            "Growing vertex buffer"
        );
        self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
        self.vertex_capacity = capacity;
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Canvas Vertex Buffer"),
        size: vertices * std::mem::size_of::<Vertex>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Pixel scissor for a batch, clamped to the target. `None` when nothing of
/// the batch can land on the target.
fn scissor_pixels(clip: Option<ClipRect>, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let Some(clip) = clip else {
        return Some((0, 0, width, height));
    };
    let min = clip.origin.max(glam::Vec2::ZERO);
    let max = clip.max().min(glam::Vec2::new(width as f32, height as f32));
    let x = min.x.floor() as u32;
    let y = min.y.floor() as u32;
    let right = (max.x.ceil() as u32).min(width);
    let bottom = (max.y.ceil() as u32).min(height);
    if right <= x || bottom <= y {
        return None;
    }
    Some((x, y, right - x, bottom - y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn unclipped_batches_cover_the_target() {
        assert_eq!(scissor_pixels(None, 800, 600), Some((0, 0, 800, 600)));
    }

    #[test]
    fn scissor_is_clamped_to_the_target() {
        let clip = ClipRect::new(Vec2::new(-400.0, -300.0), Vec2::new(1600.0, 600.0));
        assert_eq!(scissor_pixels(Some(clip), 800, 600), Some((0, 0, 800, 300)));
    }

    #[test]
    fn offscreen_scissor_is_skipped() {
        let clip = ClipRect::new(Vec2::new(900.0, 0.0), Vec2::new(50.0, 50.0));
        assert_eq!(scissor_pixels(Some(clip), 800, 600), None);
    }
}
