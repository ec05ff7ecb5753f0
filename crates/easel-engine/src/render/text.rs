use std::collections::HashMap;
use std::ops::Range;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::render::RenderCtx;
use crate::scene::TextCmd;
use crate::text::{FontId, FontSystem};

use super::common::{
    create_pipeline, create_viewport_ubo, ensure_buffer, textured_bind_group_layout, QuadBuffers,
    QuadVertex, TexturedInstance, ViewportUniform,
};

// ── atlas constants ────────────────────────────────────────────────────────

const ATLAS_SIZE: u32 = 2048;
const GLYPH_PADDING: u32 = 1; // pixels between glyphs in the atlas

// ── cached glyph ──────────────────────────────────────────────────────────

struct CachedGlyph {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
}

// ── batch ─────────────────────────────────────────────────────────────────

/// Glyph quads for `Primitive::Text`.
///
/// Maintains a 2048 × 2048 R8Unorm glyph atlas. Glyphs are rasterized on
/// first use via fontdue, at physical pixel size, and cached until the atlas
/// fills up. A full atlas is wiped at the start of the next frame.
pub(super) struct GlyphBatch {
    // pipeline
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    // bindings (rebuilt when atlas changes)
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    // atlas
    atlas_texture: Option<wgpu::Texture>,
    atlas_view: Option<wgpu::TextureView>,
    atlas_cursor_x: u32,
    atlas_cursor_y: u32,
    atlas_row_height: u32,
    atlas_generation: u64,
    bind_group_generation: u64,
    atlas_full: bool,

    glyph_cache: HashMap<GlyphRasterConfig, CachedGlyph>,

    quad: Option<QuadBuffers>,
    instance_vbo: Option<wgpu::Buffer>,

    // reusable fontdue layout
    layout: Layout<()>,
}

impl Default for GlyphBatch {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            viewport_ubo: None,
            sampler: None,
            atlas_texture: None,
            atlas_view: None,
            atlas_cursor_x: GLYPH_PADDING,
            atlas_cursor_y: GLYPH_PADDING,
            atlas_row_height: 0,
            atlas_generation: 0,
            bind_group_generation: u64::MAX,
            atlas_full: false,
            glyph_cache: HashMap::new(),
            quad: None,
            instance_vbo: None,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl GlyphBatch {
    /// Prepares GPU resources for a new frame.
    pub(super) fn begin_frame(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_pipeline(ctx);
        self.ensure_atlas(ctx);
        self.ensure_sampler(ctx);
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx, "easel glyph"));
        }
        if self.atlas_full {
            log::debug!("glyph atlas full; evicting {} cached glyphs", self.glyph_cache.len());
            self.glyph_cache.clear();
            self.atlas_cursor_x = GLYPH_PADDING;
            self.atlas_cursor_y = GLYPH_PADDING;
            self.atlas_row_height = 0;
            self.atlas_full = false;
        }
    }

    /// Lays out one text command and appends its glyph quads to `out`.
    pub(super) fn layout_text(
        &mut self,
        ctx: &RenderCtx<'_>,
        fonts: &FontSystem,
        font: FontId,
        cmd: &TextCmd,
        out: &mut Vec<TexturedInstance>,
    ) {
        let Some(face) = fonts.get(font) else {
            log::warn!("unknown {font:?}, skipping text");
            return;
        };
        if !cmd.color.is_visible() || cmd.text.is_empty() || !(cmd.size > 0.0) || !cmd.origin.is_finite() {
            return;
        }

        let scale = if ctx.scale_factor > 0.0 { ctx.scale_factor } else { 1.0 };
        let color = cmd.color.to_array();

        self.layout.reset(&LayoutSettings {
            x: cmd.origin.x * scale,
            y: cmd.origin.y * scale,
            ..LayoutSettings::default()
        });
        self.layout.append(&[face], &TextStyle::new(&cmd.text, cmd.size * scale, 0));

        // Snapshot glyph positions so the borrow on `self.layout` ends before
        // `self.try_place_glyph` needs `&mut self`.
        let glyph_snap: Vec<(GlyphRasterConfig, f32, f32, usize, usize)> = self
            .layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x, g.y, g.width, g.height))
            .collect();

        for (key, x, y, w, h) in glyph_snap {
            if !self.glyph_cache.contains_key(&key) {
                let (metrics, bitmap) = face.rasterize_config(key);
                if metrics.width == 0 || metrics.height == 0 {
                    continue;
                }
                if let Some(entry) =
                    self.try_place_glyph(ctx, &bitmap, metrics.width as u32, metrics.height as u32)
                {
                    self.glyph_cache.insert(key, entry);
                }
            }

            let Some(cached) = self.glyph_cache.get(&key) else { continue; };

            out.push(TexturedInstance {
                dst_min: [x / scale, y / scale],
                dst_max: [(x + w as f32) / scale, (y + h as f32) / scale],
                uv_min: cached.uv_min,
                uv_max: cached.uv_max,
                color,
            });
        }
    }

    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, instances: &[TexturedInstance]) {
        if instances.is_empty() {
            return;
        }
        self.ensure_bindings(ctx);

        let bytes: &[u8] = bytemuck::cast_slice(instances);
        ensure_buffer(
            ctx,
            &mut self.instance_vbo,
            bytes.len() as u64,
            wgpu::BufferUsages::VERTEX,
            "easel glyph instance vbo",
        );

        if let (Some(vbo), Some(ubo)) = (&self.instance_vbo, &self.viewport_ubo) {
            ctx.queue.write_buffer(vbo, 0, bytes);
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ViewportUniform::from_ctx(ctx)));
        }
    }

    pub(super) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        let (Some(pipeline), Some(bind_group), Some(quad), Some(instance_vbo)) =
            (&self.pipeline, &self.bind_group, &self.quad, &self.instance_vbo)
        else {
            return;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, instances);
    }

    // ── atlas helpers ──────────────────────────────────────────────────────

    fn try_place_glyph(
        &mut self,
        ctx: &RenderCtx<'_>,
        bitmap: &[u8],
        w: u32,
        h: u32,
    ) -> Option<CachedGlyph> {
        if self.atlas_full {
            return None;
        }

        // New shelf row when the glyph doesn't fit horizontally.
        if self.atlas_cursor_x + w + GLYPH_PADDING > ATLAS_SIZE {
            self.atlas_cursor_y += self.atlas_row_height + GLYPH_PADDING;
            self.atlas_cursor_x = GLYPH_PADDING;
            self.atlas_row_height = 0;
        }

        if self.atlas_cursor_y + h + GLYPH_PADDING > ATLAS_SIZE {
            log::warn!(
                "glyph atlas is full ({ATLAS_SIZE}×{ATLAS_SIZE}); \
                 some glyphs will be missing this frame"
            );
            self.atlas_full = true;
            return None;
        }

        let gx = self.atlas_cursor_x;
        let gy = self.atlas_cursor_y;

        let atlas = self.atlas_texture.as_ref()?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: atlas,
                mip_level: 0,
                origin: wgpu::Origin3d { x: gx, y: gy, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        self.atlas_cursor_x += w + GLYPH_PADDING;
        self.atlas_row_height = self.atlas_row_height.max(h);

        let atlas_f = ATLAS_SIZE as f32;
        Some(CachedGlyph {
            uv_min: [gx as f32 / atlas_f, gy as f32 / atlas_f],
            uv_max: [(gx + w) as f32 / atlas_f, (gy + h) as f32 / atlas_f],
        })
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let bgl = textured_bind_group_layout(ctx, "easel glyph bgl");
        let pipeline = create_pipeline(
            ctx,
            "easel glyph pipeline",
            include_str!("shaders/glyph.wgsl"),
            &bgl,
            &[QuadVertex::layout(), TexturedInstance::layout()],
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.viewport_ubo = None;
        self.bind_group_generation = u64::MAX;
    }

    fn ensure_atlas(&mut self, ctx: &RenderCtx<'_>) {
        if self.atlas_texture.is_some() {
            return;
        }

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("easel glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.atlas_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.atlas_texture = Some(texture);
        self.atlas_generation += 1;
        self.atlas_cursor_x = GLYPH_PADDING;
        self.atlas_cursor_y = GLYPH_PADDING;
        self.atlas_row_height = 0;
        self.atlas_full = false;
        self.glyph_cache.clear();
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("easel glyph sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group_generation == self.atlas_generation
            && self.bind_group.is_some()
            && self.viewport_ubo.is_some()
        {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return; };
        let Some(atlas_view) = self.atlas_view.as_ref() else { return; };
        let Some(sampler) = self.sampler.as_ref() else { return; };

        let viewport_ubo = create_viewport_ubo(ctx, "easel glyph viewport ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("easel glyph bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: viewport_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
        self.bind_group_generation = self.atlas_generation;
    }
}
