use super::handle::{Allocator, BufferDesc, ResourceHandle, ResourceId};
use super::SimError;

/// Two equally sized handles holding the same logical dataset, plus the step
/// counter that decides which one is authoritative.
///
/// Invariants:
/// - `handles[step % 2]` is current (fully written, read by compute and render)
/// - `handles[1 - step % 2]` is next (written by the in-flight dispatch)
/// - the two handles are distinct allocations
/// - `step` only moves forward, by one per issued dispatch
#[derive(Debug)]
pub struct DoubleBuffered<H> {
    handles: [H; 2],
    step: u64,
    element_count: u32,
    record_size: u64,
}

impl<H: ResourceHandle> DoubleBuffered<H> {
    /// Allocates two buffers of `element_count * record_size` bytes each.
    pub fn allocate<A>(
        allocator: &A,
        label: &str,
        element_count: u32,
        record_size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Self, SimError>
    where
        A: Allocator<Buffer = H>,
    {
        let Some(size) = u64::from(element_count).checked_mul(record_size) else {
            return Err(SimError::Allocation {
                label: label.to_string(),
                requested: u64::MAX,
                limit: allocator.max_buffer_size(usage),
            });
        };

        let first = allocator.create_buffer(&BufferDesc {
            label: &format!("{label} [0]"),
            size,
            usage,
        })?;
        let second = allocator.create_buffer(&BufferDesc {
            label: &format!("{label} [1]"),
            size,
            usage,
        })?;

        debug_assert_ne!(first.id(), second.id());

        log::debug!("allocated ping-pong pair `{label}`: 2 x {size} bytes");

        Ok(Self {
            handles: [first, second],
            step: 0,
            element_count,
            record_size,
        })
    }

    /// Index of the authoritative handle: `step % 2`.
    #[inline]
    pub fn current_index(&self) -> usize {
        (self.step % 2) as usize
    }

    /// Index of the write target of the next dispatch.
    #[inline]
    pub fn next_index(&self) -> usize {
        1 - self.current_index()
    }

    #[inline]
    pub fn current(&self) -> &H {
        &self.handles[self.current_index()]
    }

    #[inline]
    pub fn next(&self) -> &H {
        &self.handles[self.next_index()]
    }

    #[inline]
    pub fn handles(&self) -> &[H; 2] {
        &self.handles
    }

    #[inline]
    pub fn ids(&self) -> [ResourceId; 2] {
        [self.handles[0].id(), self.handles[1].id()]
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    #[inline]
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    #[inline]
    pub fn record_size(&self) -> u64 {
        self.record_size
    }

    /// Bytes per handle.
    #[inline]
    pub fn byte_size(&self) -> u64 {
        u64::from(self.element_count) * self.record_size
    }

    /// Uploads host element data into the current handle.
    ///
    /// Only for initialization, reset and sparse emission; regular updates go
    /// through the compute stage.
    pub fn write<A>(&self, allocator: &A, bytes: &[u8]) -> Result<(), SimError>
    where
        A: Allocator<Buffer = H>,
    {
        let target = self.current();
        if bytes.len() as u64 != target.size() {
            return Err(SimError::SizeMismatch {
                label: target.label().to_string(),
                expected: target.size(),
                actual: bytes.len() as u64,
            });
        }
        allocator.write_buffer(target, 0, bytes);
        Ok(())
    }

    /// Swaps the roles of the two handles. Called once per issued dispatch.
    #[inline]
    pub(crate) fn advance(&mut self) {
        self.step += 1;
    }
}
