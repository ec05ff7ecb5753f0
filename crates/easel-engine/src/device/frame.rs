/// Swapchain texture acquired for one redraw, plus the encoder recording it.
///
/// Passed back to [`super::Gpu::submit`] to present; the next texture cannot
/// be acquired while this one is held.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
