//! Host-memory backing store.
//!
//! Mirrors the allocator contract without a device. Used to step the core
//! headlessly and to inspect exactly what would have been uploaded.

use std::cell::RefCell;
use std::collections::HashMap;

use super::handle::{check_request, Allocator, BufferDesc, ResourceHandle, ResourceId};
use super::SimError;

#[derive(Debug, Clone)]
pub struct HostBuffer {
    id: ResourceId,
    label: String,
    size: u64,
    usage: wgpu::BufferUsages,
}

impl ResourceHandle for HostBuffer {
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

#[derive(Debug)]
pub struct HostAllocator {
    limit: u64,
    memory: RefCell<HashMap<ResourceId, Vec<u8>>>,
    writes: RefCell<Vec<ResourceId>>,
}

impl HostAllocator {
    /// Creates a store refusing any buffer larger than `limit` bytes.
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            memory: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// Returns a copy of the bytes currently stored for `buffer`.
    pub fn read(&self, buffer: &HostBuffer) -> Vec<u8> {
        self.memory
            .borrow()
            .get(&buffer.id)
            .cloned()
            .unwrap_or_default()
    }

    /// Buffers written so far, in write order.
    pub fn write_log(&self) -> Vec<ResourceId> {
        self.writes.borrow().clone()
    }

    /// Number of live allocations.
    pub fn allocation_count(&self) -> usize {
        self.memory.borrow().len()
    }
}

impl Default for HostAllocator {
    /// Same default ceiling wgpu reports for `max_buffer_size`.
    fn default() -> Self {
        Self::with_limit(256 << 20)
    }
}

impl Allocator for HostAllocator {
    type Buffer = HostBuffer;

    fn max_buffer_size(&self, _usage: wgpu::BufferUsages) -> u64 {
        self.limit
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<HostBuffer, SimError> {
        check_request(self, desc)?;

        let id = ResourceId::fresh();
        self.memory
            .borrow_mut()
            .insert(id, vec![0u8; desc.size as usize]);

        Ok(HostBuffer {
            id,
            label: desc.label.to_string(),
            size: desc.size,
            usage: desc.usage,
        })
    }

    fn write_buffer(&self, buffer: &HostBuffer, offset: u64, data: &[u8]) {
        let mut memory = self.memory.borrow_mut();
        let Some(bytes) = memory.get_mut(&buffer.id) else {
            log::error!("write to unknown host buffer `{}`", buffer.label);
            return;
        };

        let start = offset as usize;
        let end = start + data.len();
        debug_assert!(end <= bytes.len(), "host write past the end of `{}`", buffer.label);
        if end > bytes.len() {
            return;
        }

        bytes[start..end].copy_from_slice(data);
        self.writes.borrow_mut().push(buffer.id);
    }
}
