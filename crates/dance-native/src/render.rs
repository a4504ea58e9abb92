mod helpers;
mod post;
mod targets;

use dance_core::{light_direction, MeshVertex, Sketch, SketchConfig, TRAIL_OVERLAY_ALPHA};
use glam::Vec3;

use self::helpers::GrowableBuffer;
use self::post::FillResources;
use self::targets::{RenderTargets, DEPTH_FORMAT, SCENE_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    light_dir: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineUniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

const SURFACE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const SKELETON_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CLEAR: wgpu::Color = wgpu::Color::BLACK;

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    targets: RenderTargets,

    mesh_pipeline: wgpu::RenderPipeline,
    mesh_uniform_buffer: wgpu::Buffer,
    mesh_bind_group: wgpu::BindGroup,
    mesh_vb: GrowableBuffer,

    lines_pipeline: wgpu::RenderPipeline,
    lines_uniform_buffer: wgpu::Buffer,
    lines_bind_group: wgpu::BindGroup,
    lines_vb: GrowableBuffer,
    line_scratch: Vec<LineVertex>,

    fill: FillResources,
    bg_scene: wgpu::BindGroup,
    bg_fill: wgpu::BindGroup,
    _fill_tex: wgpu::Texture,

    draw_trails: bool,
    draw_skeletons: bool,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        sketch_config: &SketchConfig,
        fill_image: &dance_core::FillImage,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let (tw, th) = sketch_config.target_size;
        let targets = RenderTargets::new(&device, tw, th);

        // Lit surface
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(dance_core::MESH_WGSL.into()),
        });
        let mesh_uniform_buffer = helpers::uniform_buffer(
            &device,
            "mesh_uniforms",
            &MeshUniforms {
                view_proj: [[0.0; 4]; 4],
                model: [[0.0; 4]; 4],
                light_dir: [0.0; 4],
                color: SURFACE_COLOR,
            },
        );
        let (mesh_bgl, mesh_bind_group) = helpers::uniform_bind_group(
            &device,
            "mesh_bg",
            &mesh_uniform_buffer,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let mesh_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_mesh"),
            bind_group_layouts: &[&mesh_bgl],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_pl),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: SCENE_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Trail and skeleton overlays
        let lines_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lines_shader"),
            source: wgpu::ShaderSource::Wgsl(dance_core::LINES_WGSL.into()),
        });
        let lines_uniform_buffer = helpers::uniform_buffer(
            &device,
            "line_uniforms",
            &LineUniforms {
                view_proj: [[0.0; 4]; 4],
            },
        );
        let (lines_bgl, lines_bind_group) = helpers::uniform_bind_group(
            &device,
            "lines_bg",
            &lines_uniform_buffer,
            wgpu::ShaderStages::VERTEX,
        );
        let lines_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_lines"),
            bind_group_layouts: &[&lines_bgl],
            push_constant_ranges: &[],
        });
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };
        let lines_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lines_pipeline"),
            layout: Some(&lines_pl),
            vertex: wgpu::VertexState {
                module: &lines_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x4,
                            offset: 12,
                            shader_location: 1,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            // Shares the scene pass with the surface but ignores its depth.
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &lines_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: SCENE_FORMAT,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // Palette fill composite
        let fill_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fill_shader"),
            source: wgpu::ShaderSource::Wgsl(dance_core::FILL_WGSL.into()),
        });
        let fill = post::create_fill_resources(&device, &fill_shader, format);
        queue.write_buffer(
            &fill.uniform_buffer,
            0,
            bytemuck::bytes_of(&sketch_config.fill.to_uniforms()),
        );
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let nearest_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nearest_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let (fill_tex, fill_view) = helpers::upload_rgba_texture(
            &device,
            &queue,
            "fill_tex",
            fill_image.width,
            fill_image.height,
            &fill_image.rgba,
        );
        let bg_scene = post::scene_bind_group(&device, &fill, &targets.scene_view, &linear_sampler);
        let bg_fill = post::fill_bind_group(&device, &fill, &fill_view, &nearest_sampler);

        let mesh_vb = GrowableBuffer::new(&device, "mesh_vb", 1 << 20);
        let lines_vb = GrowableBuffer::new(&device, "lines_vb", 1 << 16);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            targets,
            mesh_pipeline,
            mesh_uniform_buffer,
            mesh_bind_group,
            mesh_vb,
            lines_pipeline,
            lines_uniform_buffer,
            lines_bind_group,
            lines_vb,
            line_scratch: Vec::new(),
            fill,
            bg_scene,
            bg_fill,
            _fill_tex: fill_tex,
            draw_trails: sketch_config.draw_trails,
            draw_skeletons: sketch_config.draw_skeletons,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn collect_lines(&mut self, sketch: &Sketch) {
        self.line_scratch.clear();
        if self.draw_trails {
            for seg in sketch.trail_segments() {
                let tint = |a: f32| [1.0, 1.0, 1.0, TRAIL_OVERLAY_ALPHA * a];
                self.line_scratch.push(line_vertex(seg.from, tint(seg.from_alpha)));
                self.line_scratch.push(line_vertex(seg.to, tint(seg.to_alpha)));
            }
        }
        if self.draw_skeletons {
            for (from, to) in sketch.bones() {
                self.line_scratch.push(line_vertex(from, SKELETON_COLOR));
                self.line_scratch.push(line_vertex(to, SKELETON_COLOR));
            }
        }
    }

    pub fn render(&mut self, sketch: &Sketch) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (tw, th) = self.targets.size();
        let camera = sketch.camera(tw, th);
        let surface_model = camera.surface_matrix(sketch.cloud_transform());
        self.queue.write_buffer(
            &self.mesh_uniform_buffer,
            0,
            bytemuck::bytes_of(&MeshUniforms {
                view_proj: camera.view_proj(surface_model).to_cols_array_2d(),
                model: surface_model.to_cols_array_2d(),
                light_dir: light_direction().extend(0.0).to_array(),
                color: SURFACE_COLOR,
            }),
        );
        self.queue.write_buffer(
            &self.lines_uniform_buffer,
            0,
            bytemuck::bytes_of(&LineUniforms {
                view_proj: camera.view_proj(camera.scene_matrix()).to_cols_array_2d(),
            }),
        );

        let mesh = sketch.mesh();
        let mesh_bytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        self.mesh_vb.write(&self.device, &self.queue, mesh_bytes);

        self.collect_lines(sketch);
        let line_bytes: &[u8] = bytemuck::cast_slice(&self.line_scratch);
        self.lines_vb.write(&self.device, &self.queue, line_bytes);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !mesh.is_empty() {
                rpass.set_pipeline(&self.mesh_pipeline);
                rpass.set_bind_group(0, &self.mesh_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.mesh_vb.slice(mesh_bytes.len() as u64));
                rpass.draw(0..mesh.vertices.len() as u32, 0..1);
            }
            if !self.line_scratch.is_empty() {
                rpass.set_pipeline(&self.lines_pipeline);
                rpass.set_bind_group(0, &self.lines_bind_group, &[]);
                rpass.set_vertex_buffer(0, self.lines_vb.slice(line_bytes.len() as u64));
                rpass.draw(0..self.line_scratch.len() as u32, 0..1);
            }
        }

        post::composite(
            &mut encoder,
            &view,
            &self.fill,
            &self.bg_scene,
            &self.bg_fill,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn line_vertex(position: Vec3, color: [f32; 4]) -> LineVertex {
    LineVertex {
        position: position.to_array(),
        color,
    }
}
