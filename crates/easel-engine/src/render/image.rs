use std::collections::HashMap;

use crate::render::RenderCtx;
use crate::scene::{ImageCmd, ImageData};

use super::common::{
    create_pipeline, create_viewport_ubo, ensure_buffer, textured_bind_group_layout, QuadBuffers,
    QuadVertex, TexturedInstance, ViewportUniform,
};

struct CachedTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    last_used: u64,
}

/// Unscaled image blits for `Primitive::Image`.
///
/// Each distinct `ImageData` gets its own texture, uploaded on first use and
/// dropped after a frame in which it was not drawn.
#[derive(Default)]
pub(super) struct ImageBatch {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    textures: HashMap<u64, CachedTexture>,
    frame: u64,

    quad: Option<QuadBuffers>,
    instance_vbo: Option<wgpu::Buffer>,
}

impl ImageBatch {
    pub(super) fn begin_frame(&mut self, ctx: &RenderCtx<'_>) {
        self.frame += 1;
        self.ensure_pipeline(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "easel image"));
        }
    }

    /// Ensures the image is resident and appends its quad to `out`.
    ///
    /// Returns the image id to bind when drawing the instance, or `None` when
    /// nothing should be drawn.
    pub(super) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        cmd: &ImageCmd,
        out: &mut Vec<TexturedInstance>,
    ) -> Option<u64> {
        if !cmd.origin.is_finite() {
            return None;
        }
        let image = &cmd.image;
        let id = image.id();

        if !self.textures.contains_key(&id) {
            let cached = self.upload_texture(ctx, image)?;
            self.textures.insert(id, cached);
        }
        if let Some(cached) = self.textures.get_mut(&id) {
            cached.last_used = self.frame;
        }

        let (w, h) = (image.width() as f32, image.height() as f32);
        out.push(TexturedInstance {
            dst_min: cmd.origin.to_array(),
            dst_max: [cmd.origin.x + w, cmd.origin.y + h],
            uv_min: [0.0, 0.0],
            uv_max: [1.0, 1.0],
            color: [1.0; 4],
        });
        Some(id)
    }

    /// Uploads this frame's instances and evicts textures left unused.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, instances: &[TexturedInstance]) {
        let frame = self.frame;
        let before = self.textures.len();
        self.textures.retain(|_, t| t.last_used == frame);
        if self.textures.len() != before {
            log::trace!("evicted {} image textures", before - self.textures.len());
        }

        if instances.is_empty() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(instances);
        ensure_buffer(
            ctx,
            &mut self.instance_vbo,
            bytes.len() as u64,
            wgpu::BufferUsages::VERTEX,
            "easel image instance vbo",
        );

        if let (Some(vbo), Some(ubo)) = (&self.instance_vbo, &self.viewport_ubo) {
            ctx.queue.write_buffer(vbo, 0, bytes);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        }
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, image_id: u64, instance: u32) {
        let (Some(pipeline), Some(quad), Some(instance_vbo)) =
            (&self.pipeline, &self.quad, &self.instance_vbo)
        else {
            return;
        };
        let Some(cached) = self.textures.get(&image_id) else { return; };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &cached.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, instance..instance + 1);
    }

    fn upload_texture(&self, ctx: &RenderCtx<'_>, image: &ImageData) -> Option<CachedTexture> {
        let bgl = self.bind_group_layout.as_ref()?;
        let ubo = self.viewport_ubo.as_ref()?;
        let sampler = self.sampler.as_ref()?;

        let size = wgpu::Extent3d {
            width: image.width(),
            height: image.height(),
            depth_or_array_layers: 1,
        };
        let max = ctx.device.limits().max_texture_dimension_2d;
        if size.width > max || size.height > max {
            log::warn!(
                "image {}×{} exceeds the GPU texture limit of {max}; not drawn",
                size.width,
                size.height
            );
            return None;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("easel image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Bytes pass through unconverted, matching how `Color` treats channels.
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.rgba(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width()),
                rows_per_image: Some(image.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!("uploaded image #{} ({}×{})", image.id(), image.width(), image.height());
        Some(CachedTexture {
            _texture: texture,
            bind_group,
            last_used: self.frame,
        })
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = textured_bind_group_layout(ctx, "easel image bgl");
        let pipeline = create_pipeline(
            ctx,
            "easel image pipeline",
            include_str!("shaders/image.wgsl"),
            &bgl,
            &[QuadVertex::layout(), TexturedInstance::layout()],
        );

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("easel image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.viewport_ubo = Some(create_viewport_ubo(ctx, "easel image viewport ubo"));
        self.sampler = Some(sampler);
        // Bind groups reference the old layout.
        self.textures.clear();
    }
}
