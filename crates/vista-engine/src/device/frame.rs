/// A single acquired surface frame.
///
/// Holding the surface texture blocks acquisition of the next one; pass it to
/// `Gpu::submit` promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
