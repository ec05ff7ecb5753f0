use std::ops::Range;

use super::common::{
    create_pipeline, create_viewport_ubo, ensure_buffer, viewport_ubo_layout_entry, ViewportUniform,
};
use super::tessellate::{Mesh, MeshVertex};
use super::RenderCtx;

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// GPU side of the tessellated vector primitives.
///
/// The whole frame's mesh is uploaded once; each batch draws an index range.
#[derive(Default)]
pub(super) struct MeshBatch {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
}

impl MeshBatch {
    /// Uploads the frame mesh and the viewport uniform.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, mesh: &Mesh) {
        if mesh.is_empty() {
            return;
        }
        self.ensure_pipeline(ctx);

        let vbytes: &[u8] = bytemuck::cast_slice(&mesh.vertices);
        let ibytes: &[u8] = bytemuck::cast_slice(&mesh.indices);
        ensure_buffer(ctx, &mut self.vbo, vbytes.len() as u64, wgpu::BufferUsages::VERTEX, "easel mesh vbo");
        ensure_buffer(ctx, &mut self.ibo, ibytes.len() as u64, wgpu::BufferUsages::INDEX, "easel mesh ibo");

        if let (Some(vbo), Some(ibo), Some(ubo)) = (&self.vbo, &self.ibo, &self.viewport_ubo) {
            ctx.queue.write_buffer(vbo, 0, vbytes);
            ctx.queue.write_buffer(ibo, 0, ibytes);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        }
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, indices: Range<u32>) {
        let (Some(pipeline), Some(bind_group), Some(vbo), Some(ibo)) =
            (&self.pipeline, &self.bind_group, &self.vbo, &self.ibo)
        else {
            return;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(indices, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("easel mesh bgl"),
            entries: &[viewport_ubo_layout_entry()],
        });

        let pipeline = create_pipeline(
            ctx,
            "easel mesh pipeline",
            include_str!("shaders/mesh.wgsl"),
            &bgl,
            &[MeshVertex::layout()],
        );

        let ubo = create_viewport_ubo(ctx, "easel mesh viewport ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel mesh bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group = Some(bind_group);
        self.viewport_ubo = Some(ubo);
    }
}
