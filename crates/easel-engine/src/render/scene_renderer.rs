use std::ops::Range;

use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{Primitive, SceneBuffer};
use crate::text::FontSystem;

use super::common::TexturedInstance;
use super::image::ImageBatch;
use super::mesh::MeshBatch;
use super::tessellate::{tessellate, Mesh};
use super::text::GlyphBatch;

/// One draw call inside the scene pass.
#[derive(Debug, Clone, PartialEq)]
enum Batch {
    Mesh(Range<u32>),
    Glyphs(Range<u32>),
    Image { id: u64, instance: u32 },
}

/// Appends a batch, merging it into the previous one when both are the same
/// kind and their ranges touch.
fn push_batch(batches: &mut Vec<Batch>, next: Batch) {
    match (&next, batches.last_mut()) {
        (Batch::Mesh(r) | Batch::Glyphs(r), _) if r.is_empty() => return,
        (Batch::Mesh(r), Some(Batch::Mesh(prev))) | (Batch::Glyphs(r), Some(Batch::Glyphs(prev)))
            if prev.end == r.start =>
        {
            prev.end = r.end;
            return;
        }
        _ => {}
    }
    batches.push(next);
}

/// Paints a whole `SceneBuffer` in issue order.
///
/// All geometry for the frame is built on the CPU first, uploaded once per
/// pipeline, then drawn as ordered sub-ranges inside a single render pass.
pub struct SceneRenderer {
    fonts: FontSystem,
    warned_no_font: bool,

    mesh: Mesh,
    glyph_instances: Vec<TexturedInstance>,
    image_instances: Vec<TexturedInstance>,
    batches: Vec<Batch>,

    mesh_batch: MeshBatch,
    glyphs: GlyphBatch,
    images: ImageBatch,
}

impl SceneRenderer {
    pub fn new(fonts: FontSystem) -> Self {
        Self {
            fonts,
            warned_no_font: false,
            mesh: Mesh::new(),
            glyph_instances: Vec::new(),
            image_instances: Vec::new(),
            batches: Vec::new(),
            mesh_batch: MeshBatch::default(),
            glyphs: GlyphBatch::default(),
            images: ImageBatch::default(),
        }
    }

    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    /// Records the scene into `target`. The target must already be cleared.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &SceneBuffer) {
        if !ctx.viewport.is_valid() {
            return;
        }

        self.glyphs.begin_frame(ctx);
        self.images.begin_frame(ctx);
        self.build(ctx, scene);

        self.mesh_batch.upload(ctx, &self.mesh);
        self.glyphs.upload(ctx, &self.glyph_instances);
        self.images.upload(ctx, &self.image_instances);

        if self.batches.is_empty() {
            return;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("easel scene pass"),
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

        for batch in &self.batches {
            match batch {
                Batch::Mesh(r) => self.mesh_batch.draw(&mut rpass, r.clone()),
                Batch::Glyphs(r) => self.glyphs.draw(&mut rpass, r.clone()),
                Batch::Image { id, instance } => self.images.draw(&mut rpass, *id, *instance),
            }
        }
    }

    /// Tessellates and lays out every primitive, recording the batch order.
    fn build(&mut self, ctx: &RenderCtx<'_>, scene: &SceneBuffer) {
        self.mesh.clear();
        self.glyph_instances.clear();
        self.image_instances.clear();
        self.batches.clear();

        for primitive in scene.iter() {
            match primitive {
                Primitive::Text(cmd) => {
                    let Some(font) = self.fonts.default_font() else {
                        if !self.warned_no_font {
                            log::warn!("no font loaded; text will not be drawn");
                            self.warned_no_font = true;
                        }
                        continue;
                    };
                    let start = self.glyph_instances.len() as u32;
                    self.glyphs
                        .layout_text(ctx, &self.fonts, font, cmd, &mut self.glyph_instances);
                    let end = self.glyph_instances.len() as u32;
                    push_batch(&mut self.batches, Batch::Glyphs(start..end));
                }

                Primitive::Image(cmd) => {
                    let instance = self.image_instances.len() as u32;
                    if let Some(id) = self.images.prepare(ctx, cmd, &mut self.image_instances) {
                        push_batch(&mut self.batches, Batch::Image { id, instance });
                    }
                }

                other => {
                    let start = self.mesh.index_count();
                    tessellate(other, &mut self.mesh);
                    let end = self.mesh.index_count();
                    push_batch(&mut self.batches, Batch::Mesh(start..end));
                }
            }
        }

        log::trace!(
            "scene: {} primitives, {} batches, {} mesh indices",
            scene.len(),
            self.batches.len(),
            self.mesh.index_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_same_kind_batches_merge() {
        let mut batches = Vec::new();
        push_batch(&mut batches, Batch::Mesh(0..6));
        push_batch(&mut batches, Batch::Mesh(6..12));
        push_batch(&mut batches, Batch::Glyphs(0..3));
        push_batch(&mut batches, Batch::Glyphs(3..4));
        assert_eq!(batches, vec![Batch::Mesh(0..12), Batch::Glyphs(0..4)]);
    }

    #[test]
    fn interleaved_kinds_keep_issue_order() {
        let mut batches = Vec::new();
        push_batch(&mut batches, Batch::Mesh(0..6));
        push_batch(&mut batches, Batch::Image { id: 7, instance: 0 });
        push_batch(&mut batches, Batch::Mesh(6..12));
        push_batch(&mut batches, Batch::Image { id: 7, instance: 1 });
        assert_eq!(
            batches,
            vec![
                Batch::Mesh(0..6),
                Batch::Image { id: 7, instance: 0 },
                Batch::Mesh(6..12),
                Batch::Image { id: 7, instance: 1 },
            ]
        );
    }

    #[test]
    fn empty_ranges_are_dropped() {
        let mut batches = Vec::new();
        push_batch(&mut batches, Batch::Mesh(0..0));
        push_batch(&mut batches, Batch::Glyphs(5..5));
        assert!(batches.is_empty());
    }
}
