//! SDF-based WebGPU render pipeline
//!
//! Renders the scene in a fragment shader using signed distance fields.
//! One fullscreen triangle; all shapes come from uniform arrays.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::{DrawCmd, Scene};

/// Maximum number of rectangles (ground + obstacles)
const MAX_RECTS: usize = 64;
/// Maximum number of circles
const MAX_CIRCLES: usize = 4;
/// Maximum number of snowflakes
const MAX_PARTICLES: usize = 128;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],  // offset 0
    playfield: [f32; 2],   // offset 8
    clear_color: [f32; 4], // offset 16
    time: f32,             // offset 32
    rect_count: u32,       // offset 36
    circle_count: u32,     // offset 40
    particle_count: u32,   // offset 44
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct RectData {
    pos: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CircleData {
    center: [f32; 2],
    radius: f32,
    shadow: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleData {
    pos: [f32; 2],
    radius: f32,
    alpha: f32,
}

/// Scene flattened into the fixed-size arrays the shader reads
struct SceneBuffers {
    clear_color: [f32; 4],
    rects: Vec<RectData>,
    circles: Vec<CircleData>,
    particles: Vec<ParticleData>,
}

impl SceneBuffers {
    fn from_scene(scene: &Scene) -> Self {
        let mut buffers = Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            rects: Vec::new(),
            circles: Vec::new(),
            particles: Vec::new(),
        };
        for cmd in &scene.commands {
            match cmd {
                DrawCmd::Clear(color) => buffers.clear_color = *color,
                DrawCmd::FillRect { pos, size, color } => {
                    if buffers.rects.len() < MAX_RECTS {
                        buffers.rects.push(RectData {
                            pos: pos.to_array(),
                            size: size.to_array(),
                            color: *color,
                        });
                    }
                }
                DrawCmd::FillCircle {
                    center,
                    radius,
                    color,
                    shadow,
                } => {
                    if buffers.circles.len() < MAX_CIRCLES {
                        buffers.circles.push(CircleData {
                            center: center.to_array(),
                            radius: *radius,
                            shadow: *shadow,
                            color: *color,
                        });
                    }
                }
                DrawCmd::Particles(flakes) => {
                    let room = MAX_PARTICLES - buffers.particles.len();
                    buffers
                        .particles
                        .extend(flakes.iter().take(room).map(|f| ParticleData {
                            pos: f.pos.to_array(),
                            radius: f.radius,
                            alpha: f.alpha,
                        }));
                }
            }
        }
        buffers
    }
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    rects_buffer: wgpu::Buffer,
    circles_buffer: wgpu::Buffer,
    particles_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_array(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                playfield: [width as f32, height as f32],
                clear_color: [1.0; 4],
                time: 0.0,
                rect_count: 0,
                circle_count: 0,
                particle_count: 0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let rects_buffer = uniform_array(
            &device,
            "rects",
            std::mem::size_of::<RectData>() * MAX_RECTS,
        );
        let circles_buffer = uniform_array(
            &device,
            "circles",
            std::mem::size_of::<CircleData>() * MAX_CIRCLES,
        );
        let particles_buffer = uniform_array(
            &device,
            "particles",
            std::mem::size_of::<ParticleData>() * MAX_PARTICLES,
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                uniform_entry(0),
                uniform_entry(1),
                uniform_entry(2),
                uniform_entry(3),
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: rects_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: circles_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: particles_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!("SDF pipeline ready ({}x{})", width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            rects_buffer,
            circles_buffer,
            particles_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    pub fn render(&mut self, scene: &Scene, time: f64) -> Result<(), wgpu::SurfaceError> {
        let buffers = SceneBuffers::from_scene(scene);

        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            playfield: scene.size.to_array(),
            clear_color: buffers.clear_color,
            time: ((time - self.start_time) / 1000.0) as f32,
            rect_count: buffers.rects.len() as u32,
            circle_count: buffers.circles.len() as u32,
            particle_count: buffers.particles.len() as u32,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        if !buffers.rects.is_empty() {
            self.queue
                .write_buffer(&self.rects_buffer, 0, bytemuck::cast_slice(&buffers.rects));
        }
        if !buffers.circles.is_empty() {
            self.queue.write_buffer(
                &self.circles_buffer,
                0,
                bytemuck::cast_slice(&buffers.circles),
            );
        }
        if !buffers.particles.is_empty() {
            self.queue.write_buffer(
                &self.particles_buffer,
                0,
                bytemuck::cast_slice(&buffers.particles),
            );
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
