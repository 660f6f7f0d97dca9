//! WebGPU backend: one pipeline, one growable vertex buffer, one draw per frame
//!
//! Scene colours are authored as display values, so the surface prefers a
//! non-sRGB format and the shader writes them through unchanged.

use std::cell::RefCell;

use thiserror::Error;
use wasm_bindgen::prelude::*;

use super::shapes::Vertex;

/// Starting vertex buffer capacity
const INITIAL_VERTICES: usize = 2048;
/// Hard cap; frames beyond it are truncated to whole triangles
const MAX_VERTICES: usize = 16384;

/// Bottom of the sky gradient, visible only before the first frame
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.102,
    g: 0.102,
    b: 0.180,
    a: 1.0,
};

#[derive(Debug, Error)]
pub enum GpuStateError {
    #[error("No window found")]
    NoWindow,
    #[error("No document found")]
    NoDocument,
    #[error("No canvas with id '{0}' found")]
    NoCanvas(String),
    #[error("Surface creation failed: {0}")]
    SurfaceCreationFailed(String),
    #[error("Failed to find a suitable GPU adapter")]
    NoAdapter,
    #[error("Device creation failed: {0}")]
    DeviceCreationFailed(String),
}

impl From<GpuStateError> for JsValue {
    fn from(err: GpuStateError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl Vertex {
    const LAYOUT: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::LAYOUT,
        }
    }
}

struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    /// Capacity of `vertex_buffer` in vertices
    capacity: usize,
}

thread_local! {
    static GPU_STATE: RefCell<Option<GpuState>> = const { RefCell::new(None) };
}

fn find_canvas(canvas_id: &str) -> Result<web_sys::HtmlCanvasElement, GpuStateError> {
    let document = web_sys::window()
        .ok_or(GpuStateError::NoWindow)?
        .document()
        .ok_or(GpuStateError::NoDocument)?;
    document
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or_else(|| GpuStateError::NoCanvas(canvas_id.to_string()))
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Flat Colour Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../../shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::buffer_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl GpuState {
    async fn new(canvas: web_sys::HtmlCanvasElement, width: u32, height: u32) -> Result<Self, GpuStateError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| GpuStateError::SurfaceCreationFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuStateError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Dino Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| GpuStateError::DeviceCreationFailed(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GpuStateError::SurfaceCreationFailed("adapter reports no surface formats".into()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let pipeline = create_pipeline(&device, format);
        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTICES);

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            pipeline,
            vertex_buffer,
            capacity: INITIAL_VERTICES,
        })
    }

    /// Grow the vertex buffer to fit `needed`, up to the cap
    fn reserve(&mut self, needed: usize) {
        if needed <= self.capacity || self.capacity >= MAX_VERTICES {
            return;
        }
        let capacity = needed.next_power_of_two().min(MAX_VERTICES);
        log::debug!("Growing vertex buffer {} -> {}", self.capacity, capacity);
        self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
        self.capacity = capacity;
    }

    fn acquire(&self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.surface.get_current_texture().ok()
            }
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                None
            }
        }
    }

    fn draw(&mut self, vertices: &[Vertex]) {
        self.reserve(vertices.len());
        let count = vertices.len().min(self.capacity / 3 * 3);
        if count < vertices.len() {
            log::warn!("Frame truncated to {} of {} vertices", count, vertices.len());
        }
        let vertices = &vertices[..count];

        let frame = match self.acquire() {
            Some(frame) => frame,
            None => return,
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        if !vertices.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Frame Encoder") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !vertices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..count as u32, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

/// Size the canvas and bring up the device, surface and pipeline
pub async fn initialize_gpu(canvas_id: &str, width: u32, height: u32) -> Result<(), GpuStateError> {
    let canvas = find_canvas(canvas_id)?;
    canvas.set_width(width);
    canvas.set_height(height);

    let state = GpuState::new(canvas, width, height).await?;
    log::info!("WebGPU ready ({}x{}, {:?})", width, height, state.surface_config.format);
    GPU_STATE.with(|cell| *cell.borrow_mut() = Some(state));
    Ok(())
}

/// Upload clip-space vertices and draw one frame. No-op before init.
pub fn submit_frame(vertices: &[Vertex]) {
    GPU_STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.draw(vertices);
        }
    });
}
