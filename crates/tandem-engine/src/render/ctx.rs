use crate::sim::WgpuAllocator;

/// Device handles a scene object borrows while creating, updating or
/// resizing its resources.
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the swapchain the render pass draws into.
    pub surface_format: wgpu::TextureFormat,
    /// Physical pixels.
    pub surface_size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    pub fn allocator(&self) -> WgpuAllocator<'a> {
        WgpuAllocator::new(self.device, self.queue)
    }

    /// Overwrites the whole of `buffer` with `value`.
    pub fn write_uniform<T: bytemuck::Pod>(&self, buffer: &wgpu::Buffer, value: &T) {
        self.queue.write_buffer(buffer, 0, bytemuck::bytes_of(value));
    }

    /// Largest 2D texture side the device accepts.
    pub fn max_texture_side(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}
