use super::handle::{GpuBuffer, ResourceHandle, ResourceId};
use super::ping_pong::DoubleBuffered;
use super::SimError;

/// One buffer orientation of a ping-pong pair.
///
/// Orientation `0` reads handle 0 and writes handle 1; orientation `1` is the
/// reverse. A bind set built for orientation `i` is used when `step % 2 == i`.
#[derive(Debug)]
pub struct Orientation<'a, H> {
    pub index: usize,
    pub read: &'a H,
    pub write: &'a H,
}

/// Two immutable bind sets, one per orientation, for a single pipeline.
///
/// Selecting the active set is a lookup by step parity. The sets remember
/// which allocations they were built from; any later use against a different
/// pair is a [`SimError::StaleBinding`].
#[derive(Debug)]
pub struct BindSets<B> {
    label: String,
    sets: [B; 2],
    built_from: [ResourceId; 2],
}

impl<B> BindSets<B> {
    /// Builds both orientations with `make`.
    pub fn build<H, F>(label: &str, pair: &DoubleBuffered<H>, mut make: F) -> Self
    where
        H: ResourceHandle,
        F: FnMut(Orientation<'_, H>) -> B,
    {
        let [h0, h1] = pair.handles();
        let sets = [
            make(Orientation { index: 0, read: h0, write: h1 }),
            make(Orientation { index: 1, read: h1, write: h0 }),
        ];

        Self {
            label: label.to_string(),
            sets,
            built_from: pair.ids(),
        }
    }

    /// Returns the set for the pair's current parity.
    pub fn select<H: ResourceHandle>(&self, pair: &DoubleBuffered<H>) -> Result<&B, SimError> {
        if pair.ids() != self.built_from {
            return Err(SimError::StaleBinding { label: self.label.clone() });
        }
        Ok(&self.sets[pair.current_index()])
    }

    /// Whether these sets were built from exactly this pair.
    #[inline]
    pub fn matches<H: ResourceHandle>(&self, pair: &DoubleBuffered<H>) -> bool {
        pair.ids() == self.built_from
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Binding slots of the ping-pong pair inside a bind group layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindSlots {
    /// Slot receiving the read side (`read-only-storage`).
    pub read: u32,
    /// Slot receiving the write side, or `None` for render-only layouts.
    pub write: Option<u32>,
}

impl BindSets<wgpu::BindGroup> {
    /// Builds both wgpu bind groups. `aux` buffers are attached identically to
    /// both orientations.
    pub fn build_wgpu(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        pair: &DoubleBuffered<GpuBuffer>,
        slots: BindSlots,
        aux: &[(u32, &GpuBuffer)],
    ) -> Self {
        Self::build(label, pair, |o| {
            let mut entries = Vec::with_capacity(2 + aux.len());
            entries.push(wgpu::BindGroupEntry {
                binding: slots.read,
                resource: o.read.raw().as_entire_binding(),
            });
            if let Some(write) = slots.write {
                entries.push(wgpu::BindGroupEntry {
                    binding: write,
                    resource: o.write.raw().as_entire_binding(),
                });
            }
            for &(binding, buffer) in aux {
                entries.push(wgpu::BindGroupEntry {
                    binding,
                    resource: buffer.raw().as_entire_binding(),
                });
            }

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label} [{}]", o.index)),
                layout,
                entries: &entries,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::host::HostAllocator;

    fn pair(host: &HostAllocator) -> DoubleBuffered<crate::sim::host::HostBuffer> {
        DoubleBuffered::allocate(
            host,
            "cells",
            16,
            4,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )
        .unwrap()
    }

    #[test]
    fn builds_both_orientations() {
        let host = HostAllocator::default();
        let p = pair(&host);
        let [a, b] = p.ids();

        let sets = BindSets::build("cells", &p, |o| (o.index, o.read.id(), o.write.id()));

        assert_eq!(sets.sets[0], (0, a, b));
        assert_eq!(sets.sets[1], (1, b, a));
    }

    #[test]
    fn select_follows_parity() {
        let host = HostAllocator::default();
        let mut p = pair(&host);
        let sets = BindSets::build("cells", &p, |o| o.read.id());

        assert_eq!(*sets.select(&p).unwrap(), p.current().id());
        p.advance();
        assert_eq!(*sets.select(&p).unwrap(), p.current().id());
        p.advance();
        assert_eq!(*sets.select(&p).unwrap(), p.current().id());
    }

    #[test]
    fn select_against_replaced_pair_is_stale() {
        let host = HostAllocator::default();
        let old = pair(&host);
        let sets = BindSets::build("cells", &old, |o| o.index);

        let replacement = pair(&host);
        assert!(!sets.matches(&replacement));
        assert_eq!(
            sets.select(&replacement).unwrap_err(),
            SimError::StaleBinding { label: "cells".into() }
        );
    }
}
