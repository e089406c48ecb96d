use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawCmd, DrawList};
use crate::tessellate::{LineMesh, LineTessellator};

use super::records::{view_bind_group_layout_entry, LineVertex, ViewUniform};

const MIN_VERTEX_CAPACITY: usize = 1024;
const MIN_INDEX_CAPACITY: usize = 2048;

/// Pipeline options.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineRendererConfig {
    /// Color blending. Vertex colors are straight alpha, hence the default.
    pub blend: Option<wgpu::BlendState>,
}

impl Default for LineRendererConfig {
    fn default() -> Self {
        Self {
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        }
    }
}

/// Draws the polylines and meshes of a `DrawList` with the line shader.
///
/// Polylines are stroked on the CPU every frame; all geometry of a frame goes
/// out in a single indexed draw.
pub struct LineRenderer {
    config: LineRendererConfig,

    /// Surface format the pipeline was built for. Targets are single-sampled.
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    view_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    index_capacity: usize,

    tessellator: LineTessellator,
    mesh: LineMesh,

    warned_tessellation: bool,
}

impl LineRenderer {
    pub fn new() -> Self {
        Self::with_config(LineRendererConfig::default())
    }

    pub fn with_config(config: LineRendererConfig) -> Self {
        Self {
            config,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            view_ubo: None,
            vbo: None,
            vertex_capacity: 0,
            ibo: None,
            index_capacity: 0,
            tessellator: LineTessellator::new(),
            mesh: LineMesh::new(),
            warned_tessellation: false,
        }
    }

    pub fn config(&self) -> LineRendererConfig {
        self.config
    }

    /// Renders line commands in `draw_list` into `target`, projected with
    /// `ctx.view`.
    ///
    /// Commands that fail to tessellate are skipped (one-time warning).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let mut mesh = std::mem::take(&mut self.mesh);
        mesh.clear();

        let failures = collect_geometry(draw_list, &mut self.tessellator, &mut mesh);
        if failures > 0 && !self.warned_tessellation {
            log::warn!("LineRenderer: {failures} polyline(s) could not be tessellated; skipped");
            self.warned_tessellation = true;
        }

        if !mesh.is_empty() {
            self.draw_mesh(ctx, target, &mesh);
        }
        self.mesh = mesh;
    }

    fn draw_mesh(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mesh: &LineMesh) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_capacity(ctx, mesh.vertices.len(), mesh.indices.len());

        self.write_view_uniform(ctx);

        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&mesh.vertices));
        ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&mesh.indices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("meridian line pass"),
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
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..mesh.indices.len() as u32, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meridian line shader"),
            source: wgpu::ShaderSource::Wgsl(super::SHADER_SOURCE.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("meridian line bgl"),
                    entries: &[view_bind_group_layout_entry()],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("meridian line pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("meridian line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: self.config.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Stroke triangles come in both windings.
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

        log::debug!("LineRenderer: pipeline built for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.view_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.view_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let view_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("meridian line view ubo"),
            size: ViewUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meridian line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_ubo.as_entire_binding(),
            }],
        });

        self.view_ubo = Some(view_ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_view_uniform(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.view_ubo.as_ref() else { return };
        let u = ViewUniform::from_view(&ctx.view);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if let Some(cap) = grown_capacity(self.vertex_capacity, vertices, MIN_VERTEX_CAPACITY) {
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("meridian line vbo"),
                size: (cap * std::mem::size_of::<LineVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }

        if let Some(cap) = grown_capacity(self.index_capacity, indices, MIN_INDEX_CAPACITY) {
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("meridian line ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Gathers the frame's geometry in paint order. Returns how many polylines
/// failed to tessellate.
pub(crate) fn collect_geometry(
    draw_list: &mut DrawList,
    tessellator: &mut LineTessellator,
    out: &mut LineMesh,
) -> usize {
    let mut failures = 0;
    for item in draw_list.iter_in_paint_order() {
        match &item.cmd {
            DrawCmd::Polyline(cmd) => {
                if let Err(e) = tessellator.tessellate_into(&cmd.points, cmd.closed, &cmd.stroke, out)
                {
                    log::debug!("LineRenderer: skipping polyline: {e}");
                    failures += 1;
                }
            }
            DrawCmd::Mesh(cmd) => out.append(&cmd.mesh),
        }
    }
    failures
}

/// New buffer capacity when `required` exceeds `current`, else `None`.
pub(crate) fn grown_capacity(current: usize, required: usize, min: usize) -> Option<usize> {
    if required <= current && current > 0 {
        return None;
    }
    Some(required.next_power_of_two().max(min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{Color, Stroke};
    use crate::scene::ZIndex;

    fn seg(y: f32) -> Vec<Vec2> {
        vec![Vec2::new(0.0, y), Vec2::new(10.0, y)]
    }

    #[test]
    fn capacity_grows_to_power_of_two() {
        assert_eq!(grown_capacity(0, 0, 1024), Some(1024));
        assert_eq!(grown_capacity(0, 10, 1024), Some(1024));
        assert_eq!(grown_capacity(1024, 1000, 1024), None);
        assert_eq!(grown_capacity(1024, 1024, 1024), None);
        assert_eq!(grown_capacity(1024, 1025, 1024), Some(2048));
        assert_eq!(grown_capacity(2048, 5000, 2048), Some(8192));
    }

    #[test]
    fn geometry_follows_paint_order() {
        let mut list = DrawList::new();
        list.push_polyline(ZIndex::OVERLAY, seg(1.0), Stroke::new(2.0, Color::RED));
        list.push_polyline(ZIndex::BACKGROUND, seg(2.0), Stroke::new(2.0, Color::WHITE));

        let mut t = LineTessellator::new();
        let mut mesh = LineMesh::new();
        assert_eq!(collect_geometry(&mut list, &mut t, &mut mesh), 0);

        let first = mesh.vertices.first().unwrap();
        let last = mesh.vertices.last().unwrap();
        assert_eq!(first.color, Color::WHITE.to_array());
        assert_eq!(last.color, Color::RED.to_array());
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn meshes_are_appended_and_failures_counted() {
        let mut t = LineTessellator::new();
        let prebuilt = t.tessellate(&seg(0.0), false, &Stroke::default()).unwrap();

        let mut list = DrawList::new();
        list.push_polyline(ZIndex::DEFAULT, seg(5.0), Stroke::default());
        list.push_polyline(
            ZIndex::DEFAULT,
            vec![Vec2::new(0.0, 0.0), Vec2::new(f32::NAN, 0.0)],
            Stroke::default(),
        );
        list.push_mesh(ZIndex::DEFAULT, prebuilt.clone());

        let mut mesh = LineMesh::new();
        assert_eq!(collect_geometry(&mut list, &mut t, &mut mesh), 1);

        let stroked = t.tessellate(&seg(5.0), false, &Stroke::default()).unwrap();
        assert_eq!(mesh.vertices.len(), stroked.vertices.len() + prebuilt.vertices.len());
        assert_eq!(mesh.indices.len(), stroked.indices.len() + prebuilt.indices.len());
    }

    #[test]
    fn default_config_uses_straight_alpha() {
        let c = LineRendererConfig::default();
        assert_eq!(c.blend, Some(wgpu::BlendState::ALPHA_BLENDING));
        // The pipeline draws into the single-sampled surface view.
        assert_eq!(wgpu::MultisampleState::default().count, 1);
    }
}
