use std::borrow::Cow;
use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};

use crate::view::ViewUniforms;

use super::shader::BUILTIN_SHAPE_WGSL;
use super::shapes::Drawable;
use super::{RenderCtx, RenderTarget};

/// Draws a `Drawable` with the current view transform.
///
/// GPU objects are created lazily on first use:
/// - one shader module
/// - one pipeline per (surface format, topology, vertex components)
/// - the view uniform buffer and its bind group
///
/// Each frame `render` rewrites the uniform from `ctx.view` and records a
/// pass that loads the already-cleared target.
pub struct ShapeRenderer {
    source: Cow<'static, str>,
    shader: Option<wgpu::ShaderModule>,

    bind_group: Option<wgpu::BindGroup>,
    view_ubo: Option<wgpu::Buffer>,

    pipeline_layout: Option<wgpu::PipelineLayout>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    components: u32,
}

impl Default for ShapeRenderer {
    fn default() -> Self {
        Self::new(BUILTIN_SHAPE_WGSL)
    }
}

impl ShapeRenderer {
    /// Creates a renderer for the given WGSL source.
    ///
    /// The source must define `vs_main` / `fs_main` and read a `size`,
    /// `location`, `scale` uniform block at group 0 binding 0.
    pub fn new(source: impl Into<Cow<'static, str>>) -> Self {
        Self {
            source: source.into(),
            shader: None,
            bind_group: None,
            view_ubo: None,
            pipeline_layout: None,
            pipelines: HashMap::new(),
        }
    }

    /// Number of pipelines built so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, shape: &dyn Drawable) {
        self.ensure_shader(ctx);
        self.ensure_bindings(ctx);

        let key = PipelineKey {
            format: ctx.surface_format,
            topology: shape.topology(),
            components: shape.vertex_layout().components(),
        };
        self.ensure_pipeline(ctx, key, shape);
        self.write_view_uniform(ctx);

        let Some(pipeline) = self.pipelines.get(&key) else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("vista shape pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        shape.draw(&mut rpass);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_shader(&mut self, ctx: &RenderCtx<'_>) {
        if self.shader.is_some() {
            return;
        }

        self.shader = Some(ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vista shape shader"),
            source: wgpu::ShaderSource::Wgsl(self.source.clone()),
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.view_ubo.is_some() {
            return;
        }

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vista view bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(ViewUniform::SIZE),
                },
                count: None,
            }],
        });

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vista view ubo"),
            size: ViewUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vista view bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vista shape pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        self.pipeline_layout = Some(pipeline_layout);
        self.view_ubo = Some(view_ubo);
        self.bind_group = Some(bind_group);
        // Pipelines reference the old layout.
        self.pipelines.clear();
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, key: PipelineKey, shape: &dyn Drawable) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(shader) = self.shader.as_ref() else { return };
        let Some(layout) = self.pipeline_layout.as_ref() else { return };

        let vertex_layout = shape.vertex_layout();

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vista shape pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout.buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: key.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: key.topology,
                strip_index_format: key.topology.is_strip().then_some(wgpu::IndexFormat::Uint32),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("built shape pipeline for {key:?}");
        self.pipelines.insert(key, pipeline);
    }

    fn write_view_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.view_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewUniform::from(ctx.view)));
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform block layout (32 bytes):
///
///  offset  0  size      vec2<f32>
///  offset  8  location  vec2<f32>
///  offset 16  scale     f32
///  offset 20  padding
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ViewUniform {
    size: [f32; 2],
    location: [f32; 2],
    scale: f32,
    _pad: [f32; 3],
}

impl ViewUniform {
    const SIZE: u64 = std::mem::size_of::<ViewUniform>() as u64;
}

impl From<ViewUniforms> for ViewUniform {
    fn from(v: ViewUniforms) -> Self {
        Self {
            size: [v.size.x.max(1.0), v.size.y.max(1.0)],
            location: v.location.to_array(),
            scale: v.scale,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn uniform_block_is_32_bytes() {
        assert_eq!(ViewUniform::SIZE, 32);
    }

    #[test]
    fn uniform_carries_snapshot_values() {
        let u = ViewUniform::from(ViewUniforms {
            size: Vec2::new(640.0, 480.0),
            scale: 110.0,
            location: Vec2::new(0.25, -0.5),
        });

        let floats: [f32; 8] = bytemuck::cast(u);
        assert_eq!(floats, [640.0, 480.0, 0.25, -0.5, 110.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn fresh_renderer_has_no_pipelines() {
        assert_eq!(ShapeRenderer::default().pipeline_count(), 0);
    }

    fn headless_device() -> (wgpu::Device, wgpu::Queue) {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
            .expect("no GPU adapter");
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).expect("no GPU device")
    }

    #[test]
    #[ignore = "requires a GPU adapter"]
    fn shared_mesh_draws_every_shape_kind_offscreen() {
        use std::rc::Rc;

        use crate::render::{build_shape, MeshBuffer, RenderCtx, RenderTarget, ShapeKind};
        use crate::view::ViewState;

        let (device, queue) = headless_device();
        let format = wgpu::TextureFormat::Rgba8Unorm;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d { width: 64, height: 64, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let points = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];
        let mesh = Rc::new(MeshBuffer::from_points(&device, &points).unwrap());
        assert_eq!(mesh.vertex_count(), 4);

        let shapes: Vec<_> = [ShapeKind::Outline, ShapeKind::Filled, ShapeKind::Strip]
            .into_iter()
            .map(|kind| build_shape(kind, &device, Rc::clone(&mesh)))
            .collect();
        assert_eq!(Rc::strong_count(&mesh), 4);

        let view = ViewState::new(64.0, 64.0);
        let ctx = RenderCtx::new(&device, &queue, format, view.snapshot());
        let mut renderer = ShapeRenderer::default();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let mut target = RenderTarget::new(&mut encoder, &color_view);
            for shape in &shapes {
                assert_eq!(shape.vertex_count(), 4);
                renderer.render(&ctx, &mut target, shape.as_ref());
            }
        }
        queue.submit(std::iter::once(encoder.finish()));

        // Outline and strip share the line-strip pipeline.
        assert_eq!(renderer.pipeline_count(), 2);

        drop(shapes);
        assert_eq!(Rc::strong_count(&mesh), 1);
    }
}
