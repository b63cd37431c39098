use bytemuck::{Pod, Zeroable};

use super::handle::{Allocator, ResourceHandle};
use super::ping_pong::DoubleBuffered;
use super::SimError;

/// A fixed-size simulation record with a notion of "free slot".
pub trait Element: Pod + Zeroable {
    /// Whether the slot may be reused by [`HostMirror::activate`].
    fn is_inactive(&self) -> bool;
}

/// Host-authoritative copy of a simulation array.
///
/// Host edits (emission, seeding, clicks) are made here and pushed to the
/// device with [`sync`](Self::sync), which always re-uploads the whole array.
/// The device copy is a replica; nothing is read back.
#[derive(Debug, Clone)]
pub struct HostMirror<E> {
    elements: Vec<E>,
}

impl<E: Element> HostMirror<E> {
    /// `count` zeroed (all-inactive) elements.
    pub fn new(count: u32) -> Self {
        Self {
            elements: vec![E::zeroed(); count as usize],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    #[inline]
    pub fn elements_mut(&mut self) -> &mut [E] {
        &mut self.elements
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elements)
    }

    pub fn active_count(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_inactive()).count()
    }

    /// Initialises up to `count` inactive elements in index order.
    ///
    /// Returns the number actually activated, which is less than `count` when
    /// the array runs out of free slots. Active elements are never touched.
    pub fn activate<F>(&mut self, count: usize, mut init: F) -> usize
    where
        F: FnMut(usize, &mut E),
    {
        let mut activated = 0;
        for (index, element) in self.elements.iter_mut().enumerate() {
            if activated == count {
                break;
            }
            if element.is_inactive() {
                init(index, element);
                activated += 1;
            }
        }
        activated
    }

    /// Initialises the element at `index` if it is inactive.
    pub fn activate_at<F>(&mut self, index: usize, init: F) -> bool
    where
        F: FnOnce(&mut E),
    {
        match self.elements.get_mut(index) {
            Some(element) if element.is_inactive() => {
                init(element);
                true
            }
            _ => false,
        }
    }

    /// Resets every element to the inactive state.
    pub fn clear(&mut self) {
        self.elements.fill(E::zeroed());
    }

    /// Uploads the full array into the current handle of `state`.
    pub fn sync<A, H>(&self, allocator: &A, state: &DoubleBuffered<H>) -> Result<(), SimError>
    where
        A: Allocator<Buffer = H>,
        H: ResourceHandle,
    {
        state.write(allocator, self.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::host::HostAllocator;

    #[repr(C)]
    #[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
    struct Slot {
        alive: u32,
        tag: u32,
    }

    impl Element for Slot {
        fn is_inactive(&self) -> bool {
            self.alive == 0
        }
    }

    fn live(tag: u32) -> impl FnMut(usize, &mut Slot) {
        move |_, s| {
            s.alive = 1;
            s.tag = tag;
        }
    }

    #[test]
    fn activates_in_index_order() {
        let mut m = HostMirror::<Slot>::new(8);
        let mut seen = Vec::new();
        let n = m.activate(3, |i, s| {
            seen.push(i);
            s.alive = 1;
        });
        assert_eq!(n, 3);
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn saturates_on_free_slots_and_leaves_active_untouched() {
        let mut m = HostMirror::<Slot>::new(10);
        assert_eq!(m.activate(7, live(1)), 7);

        let before: Vec<Slot> = m.elements()[..7].to_vec();
        assert_eq!(m.activate(5, live(2)), 3);

        assert_eq!(&m.elements()[..7], before.as_slice());
        assert!(m.elements()[7..].iter().all(|s| s.tag == 2));
        assert_eq!(m.activate(1, live(3)), 0);
        assert_eq!(m.active_count(), 10);
    }

    #[test]
    fn activate_at_skips_live_and_out_of_range() {
        let mut m = HostMirror::<Slot>::new(4);
        assert!(m.activate_at(2, |s| s.alive = 1));
        assert!(!m.activate_at(2, |s| s.tag = 99));
        assert_eq!(m.elements()[2].tag, 0);
        assert!(!m.activate_at(4, |s| s.alive = 1));
    }

    #[test]
    fn sync_uploads_whole_array_to_current() {
        let host = HostAllocator::default();
        let mut state = DoubleBuffered::allocate(
            &host,
            "slots",
            4,
            std::mem::size_of::<Slot>() as u64,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        )
        .unwrap();
        state.advance();

        let mut m = HostMirror::<Slot>::new(4);
        m.activate(1, live(5));
        m.sync(&host, &state).unwrap();

        assert_eq!(host.read(state.current()), m.as_bytes());
        assert_eq!(host.write_log(), vec![state.current().id()]);
    }
}
