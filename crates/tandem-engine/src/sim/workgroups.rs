use std::num::NonZeroU32;

/// Workgroup counts passed to `dispatch_workgroups`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Workgroups {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Workgroups {
    #[inline]
    pub fn total(self) -> u64 {
        u64::from(self.x) * u64::from(self.y) * u64::from(self.z)
    }
}

/// Elements processed by one workgroup. Must match `@workgroup_size` in the kernel.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlockSize {
    pub x: NonZeroU32,
    pub y: NonZeroU32,
}

impl BlockSize {
    pub const LINEAR_256: Self = Self::new(256, 1);
    pub const TILE_4X4: Self = Self::new(4, 4);
    pub const TILE_16X16: Self = Self::new(16, 16);

    /// # Panics
    /// Panics (at compile time for constants) if either side is zero.
    pub const fn new(x: u32, y: u32) -> Self {
        match (NonZeroU32::new(x), NonZeroU32::new(y)) {
            (Some(x), Some(y)) => Self { x, y },
            _ => panic!("block size must be non-zero"),
        }
    }
}

/// Shape of the simulation domain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    /// `len` elements in a row (particles).
    Linear(u32),
    /// `width * height` cells, row-major (grids, images).
    Grid { width: u32, height: u32 },
}

impl Domain {
    /// Number of elements covered by the domain.
    pub fn len(self) -> u64 {
        match self {
            Domain::Linear(n) => u64::from(n),
            Domain::Grid { width, height } => u64::from(width) * u64::from(height),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Ceiling-divides the domain into blocks so a final partial block is
    /// still dispatched.
    pub fn workgroups(self, block: BlockSize) -> Workgroups {
        match self {
            Domain::Linear(n) => Workgroups {
                x: n.div_ceil(block.x.get()),
                y: 1,
                z: 1,
            },
            Domain::Grid { width, height } => Workgroups {
                x: width.div_ceil(block.x.get()),
                y: height.div_ceil(block.y.get()),
                z: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;

    use super::*;

    /// Element indices the kernel touches in one 1-D block, clipped to `len`.
    fn linear_block_range(block_index: u32, len: u32, block: BlockSize) -> Range<u32> {
        let size = block.x.get();
        let start = block_index.saturating_mul(size).min(len);
        let end = start.saturating_add(size).min(len);
        start..end
    }

    #[test]
    fn particles_2048_in_256_blocks() {
        let groups = Domain::Linear(2048).workgroups(BlockSize::LINEAR_256);
        assert_eq!(groups, Workgroups { x: 8, y: 1, z: 1 });
    }

    #[test]
    fn partial_block_is_dispatched() {
        assert_eq!(Domain::Linear(2049).workgroups(BlockSize::LINEAR_256).x, 9);
        assert_eq!(Domain::Linear(1).workgroups(BlockSize::LINEAR_256).x, 1);
        assert_eq!(Domain::Linear(0).workgroups(BlockSize::LINEAR_256).x, 0);
    }

    #[test]
    fn grid_tiles() {
        let groups = Domain::Grid { width: 256, height: 256 }.workgroups(BlockSize::TILE_4X4);
        assert_eq!(groups, Workgroups { x: 64, y: 64, z: 1 });

        let odd = Domain::Grid { width: 1921, height: 1079 }.workgroups(BlockSize::TILE_16X16);
        assert_eq!(odd, Workgroups { x: 121, y: 68, z: 1 });
    }

    #[test]
    fn every_index_covered_exactly_once() {
        for len in [1u32, 7, 255, 256, 257, 1000, 2048] {
            for bs in [1u32, 3, 64, 256] {
                let block = BlockSize::new(bs, 1);
                let groups = Domain::Linear(len).workgroups(block);
                assert_eq!(groups.x, len.div_ceil(bs));

                let mut hits = vec![0u8; len as usize];
                for g in 0..groups.x {
                    for i in linear_block_range(g, len, block) {
                        hits[i as usize] += 1;
                    }
                }
                assert!(hits.iter().all(|&h| h == 1), "len={len} block={bs}");
            }
        }
    }

    #[test]
    fn grid_len() {
        assert_eq!(Domain::Grid { width: 3, height: 5 }.len(), 15);
        assert!(Domain::Linear(0).is_empty());
    }
}
