use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::PerspectiveCamera;
use crate::coords::Vec2;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{MeshId, QuadDraw, QuadList, TextureData};

use super::common::{min_binding_size, premul_alpha_blend, PlaneVertex, PLANE_INDICES, PLANE_VERTICES};

const SHADER_SRC: &str = include_str!("shaders/reveal.wgsl");

/// Renders reveal quads (one unit plane per mesh, textured with the
/// primary/hover/mask images and driven by the reveal uniforms).
///
/// GPU resources per mesh are created the first time the mesh is drawn and
/// released once it stops appearing in the draw list. Textures are uploaded
/// once; only the uniform buffer is rewritten each frame.
#[derive(Default)]
pub struct RevealRenderer {
    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    plane_vbo: Option<wgpu::Buffer>,
    plane_ibo: Option<wgpu::Buffer>,

    meshes: HashMap<MeshId, MeshResources>,
}

/// The pipeline depends on the surface format and on the `PR` define.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    pixel_ratio_bits: u32,
}

struct MeshResources {
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Kept alive for the bind group.
    _textures: [wgpu::Texture; 3],
}

impl RevealRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws every quad in `quads` into `target`, seen through `camera`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &PerspectiveCamera,
        quads: &QuadList,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        self.evict_unused(quads);

        if quads.is_empty() {
            return;
        }

        for quad in quads.items() {
            self.ensure_mesh(ctx, quad);
        }

        let view_proj = camera.view_projection();
        for quad in quads.items() {
            if let Some(res) = self.meshes.get(&quad.mesh) {
                let u = RevealUniform::new(view_proj, quad);
                ctx.queue.write_buffer(&res.ubo, 0, bytemuck::bytes_of(&u));
            }
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(vbo) = self.plane_vbo.as_ref() else { return };
        let Some(ibo) = self.plane_ibo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("veil reveal pass"),
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
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);

        for quad in quads.items() {
            let Some(res) = self.meshes.get(&quad.mesh) else { continue };
            rpass.set_bind_group(0, &res.bind_group, &[]);
            rpass.draw_indexed(0..PLANE_INDICES.len() as u32, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let key = PipelineKey {
            format: ctx.surface_format,
            pixel_ratio_bits: ctx.scale_factor.to_bits(),
        };
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        log::debug!(
            "building reveal pipeline (format {:?}, PR {})",
            ctx.surface_format,
            ctx.scale_factor
        );

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("veil reveal shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source(ctx.scale_factor).into()),
        });

        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("veil reveal bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: min_binding_size::<RevealUniform>(),
                    },
                    count: None,
                },
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                wgpu::BindGroupLayoutEntry {
                    binding: 4,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("veil reveal pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("veil reveal pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PlaneVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("veil reveal sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.sampler = Some(sampler);

        // Bind groups were created against the old layout.
        self.meshes.clear();
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.plane_vbo.is_some() && self.plane_ibo.is_some() {
            return;
        }

        self.plane_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("veil plane vbo"),
            contents: bytemuck::cast_slice(&PLANE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.plane_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("veil plane ibo"),
            contents: bytemuck::cast_slice(&PLANE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, quad: &QuadDraw) {
        if self.meshes.contains_key(&quad.mesh) {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let [map, hover, shape] = &quad.textures;
        let textures = [
            upload_texture(ctx, map, wgpu::TextureFormat::Rgba8UnormSrgb, "veil u_map"),
            upload_texture(ctx, hover, wgpu::TextureFormat::Rgba8UnormSrgb, "veil u_hovermap"),
            // The mask is data, not colour.
            upload_texture(ctx, shape, wgpu::TextureFormat::Rgba8Unorm, "veil u_shape"),
        ];
        let views: Vec<wgpu::TextureView> = textures
            .iter()
            .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()))
            .collect();

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("veil reveal ubo"),
            size: std::mem::size_of::<RevealUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("veil reveal bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&views[0]) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::TextureView(&views[1]) },
                wgpu::BindGroupEntry { binding: 3, resource: wgpu::BindingResource::TextureView(&views[2]) },
                wgpu::BindGroupEntry { binding: 4, resource: wgpu::BindingResource::Sampler(sampler) },
            ],
        });

        log::debug!("uploaded textures for mesh {}", quad.mesh.raw());

        self.meshes.insert(
            quad.mesh,
            MeshResources { ubo, bind_group, _textures: textures },
        );
    }

    fn evict_unused(&mut self, quads: &QuadList) {
        if self.meshes.len() <= quads.len() && quads.items().iter().all(|q| self.meshes.contains_key(&q.mesh)) {
            return;
        }
        let live: HashSet<MeshId> = quads.items().iter().map(|q| q.mesh).collect();
        self.meshes.retain(|id, _| live.contains(id));
    }
}

fn upload_texture(
    ctx: &RenderCtx<'_>,
    data: &TextureData,
    format: wgpu::TextureFormat,
    label: &str,
) -> wgpu::Texture {
    let fallback;
    let max_side = ctx.device.limits().max_texture_dimension_2d;
    let data = if data.fits(max_side) {
        data
    } else {
        if data.width > 0 && data.height > 0 {
            log::warn!(
                "{label}: {}x{} exceeds the device limit of {max_side}px, using a blank texture",
                data.width,
                data.height
            );
        }
        fallback = placeholder_texture();
        &fallback
    };

    ctx.device.create_texture_with_data(
        ctx.queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: data.width,
                height: data.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &data.rgba,
    )
}

/// Stand-in for textures the device cannot hold (empty or oversized).
fn placeholder_texture() -> TextureData {
    TextureData::solid(1, 1, [255, 255, 255, 255])
}

/// WGSL source with the `PI` and `PR` constants prepended.
pub fn shader_source(pixel_ratio: f32) -> String {
    format!(
        "const PI: f32 = {:?};\nconst PR: f32 = {:?};\n{}",
        std::f32::consts::PI,
        pixel_ratio.max(0.1),
        SHADER_SRC
    )
}

/// Model transform of a unit plane: translate to `position`, scale to `scale`.
pub fn model_matrix(position: Vec2, scale: Vec2) -> Mat4 {
    Mat4::from_translation(Vec3::new(position.x, position.y, 0.0))
        * Mat4::from_scale(Vec3::new(scale.x, scale.y, 1.0))
}

/// GPU layout of the reveal uniform block (matches `Reveal` in the shader).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RevealUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    ratio: [f32; 2],
    hover_ratio: [f32; 2],
    mouse: [f32; 2],
    res: [f32; 2],
    progress_hover: f32,
    progress_click: f32,
    time: f32,
    alpha: f32,
}

impl RevealUniform {
    fn new(view_proj: Mat4, quad: &QuadDraw) -> Self {
        let p = &quad.params;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model_matrix(quad.position, quad.scale).to_cols_array_2d(),
            ratio: p.ratio.to_array(),
            hover_ratio: p.hover_ratio.to_array(),
            mouse: p.mouse.to_array(),
            res: p.res.to_array(),
            progress_hover: p.progress_hover,
            progress_click: p.progress_click,
            time: p.time,
            alpha: p.alpha,
        }
    }
}
