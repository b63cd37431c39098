use std::sync::atomic::{AtomicU64, Ordering};

use super::SimError;

/// Identity of one device allocation.
///
/// Every created handle gets a fresh id, so two handles never compare equal
/// unless they are the same allocation. Bind sets remember these ids to detect
/// use after reallocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Opaque reference to device-resident memory.
pub trait ResourceHandle {
    fn id(&self) -> ResourceId;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// Declared capability set.
    fn usage(&self) -> wgpu::BufferUsages;

    fn label(&self) -> &str;
}

/// Request for a single buffer allocation.
#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub size: u64,
    pub usage: wgpu::BufferUsages,
}

/// Creates and fills buffers.
///
/// `WgpuAllocator` backs this with a real device; `HostAllocator` keeps the
/// bytes in host memory so the core can be driven without a display.
pub trait Allocator {
    type Buffer: ResourceHandle;

    /// Largest buffer this backing store accepts for `usage`.
    fn max_buffer_size(&self, usage: wgpu::BufferUsages) -> u64;

    /// Allocates a buffer. Implementations must call [`check_request`] first.
    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<Self::Buffer, SimError>;

    /// Copies `data` into `buffer` at `offset`.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]);
}

/// Validates a request against the allocator limit.
pub fn check_request<A: Allocator + ?Sized>(
    allocator: &A,
    desc: &BufferDesc<'_>,
) -> Result<(), SimError> {
    let limit = allocator.max_buffer_size(desc.usage);
    if desc.size == 0 || desc.size > limit {
        return Err(SimError::Allocation {
            label: desc.label.to_string(),
            requested: desc.size,
            limit,
        });
    }
    Ok(())
}

// ── wgpu backing ──────────────────────────────────────────────────────────

/// A wgpu buffer plus the metadata the core tracks for it.
#[derive(Debug)]
pub struct GpuBuffer {
    id: ResourceId,
    label: String,
    size: u64,
    usage: wgpu::BufferUsages,
    raw: wgpu::Buffer,
}

impl GpuBuffer {
    /// Underlying wgpu buffer, for binding and vertex input.
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }
}

impl ResourceHandle for GpuBuffer {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Allocator over a wgpu device/queue pair.
#[derive(Clone, Copy)]
pub struct WgpuAllocator<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

impl<'a> WgpuAllocator<'a> {
    #[inline]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl Allocator for WgpuAllocator<'_> {
    type Buffer = GpuBuffer;

    fn max_buffer_size(&self, usage: wgpu::BufferUsages) -> u64 {
        let limits = self.device.limits();
        let mut max = limits.max_buffer_size;
        if usage.contains(wgpu::BufferUsages::STORAGE) {
            max = max.min(u64::from(limits.max_storage_buffer_binding_size));
        }
        if usage.contains(wgpu::BufferUsages::UNIFORM) {
            max = max.min(u64::from(limits.max_uniform_buffer_binding_size));
        }
        max
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<GpuBuffer, SimError> {
        check_request(self, desc)?;

        let raw = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.size,
            usage: desc.usage,
            mapped_at_creation: false,
        });

        Ok(GpuBuffer {
            id: ResourceId::fresh(),
            label: desc.label.to_string(),
            size: desc.size,
            usage: desc.usage,
            raw,
        })
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        self.queue.write_buffer(&buffer.raw, offset, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = ResourceId::fresh();
        let b = ResourceId::fresh();
        assert_ne!(a, b);
        assert!(b.raw() > a.raw());
    }
}
