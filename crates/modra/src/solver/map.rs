//! Solvable bitmaps

use super::pool::SolvableId;

const BLOCK_BITS: usize = 64;

/// A growable bitmap over solvable identifiers.
///
/// Used both for the exclusion set and for the pool's considered map.
/// Bits beyond the tracked length are never set.
#[derive(Debug, Clone, Default)]
pub struct SolvMap {
    blocks: Vec<u64>,
    len: usize,
}

impl SolvMap {
    /// Create a map covering `len` solvables, all bits clear
    pub fn new(len: usize) -> Self {
        Self {
            blocks: vec![0; len.div_ceil(BLOCK_BITS)],
            len,
        }
    }

    /// Number of solvables covered
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grow the map to cover `len` solvables. Never shrinks.
    pub fn grow(&mut self, len: usize) {
        if len > self.len {
            self.len = len;
            self.blocks.resize(len.div_ceil(BLOCK_BITS), 0);
        }
    }

    pub fn add(&mut self, id: SolvableId) {
        let index = id.0 as usize;
        if index >= self.len {
            self.grow(index + 1);
        }
        self.blocks[index / BLOCK_BITS] |= 1 << (index % BLOCK_BITS);
    }

    pub fn contains(&self, id: SolvableId) -> bool {
        let index = id.0 as usize;
        if index >= self.len {
            return false;
        }
        self.blocks[index / BLOCK_BITS] & (1 << (index % BLOCK_BITS)) != 0
    }

    /// Set every bit within the tracked length
    pub fn set_all(&mut self) {
        for block in &mut self.blocks {
            *block = u64::MAX;
        }
        let tail = self.len % BLOCK_BITS;
        if tail != 0 {
            if let Some(last) = self.blocks.last_mut() {
                *last &= (1 << tail) - 1;
            }
        }
    }

    /// Clear every bit set in `other`
    pub fn subtract(&mut self, other: &SolvMap) {
        for (block, other_block) in self.blocks.iter_mut().zip(&other.blocks) {
            *block &= !other_block;
        }
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_contains() {
        let mut map = SolvMap::new(10);
        assert!(!map.contains(SolvableId(3)));
        map.add(SolvableId(3));
        assert!(map.contains(SolvableId(3)));
        assert!(!map.contains(SolvableId(4)));
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_add_grows() {
        let mut map = SolvMap::new(2);
        map.add(SolvableId(100));
        assert!(map.contains(SolvableId(100)));
        assert!(map.len() >= 101);
    }

    #[test]
    fn test_set_all_respects_len() {
        let mut map = SolvMap::new(70);
        map.set_all();
        assert_eq!(map.count(), 70);
        assert!(map.contains(SolvableId(69)));
        assert!(!map.contains(SolvableId(70)));
    }

    #[test]
    fn test_subtract() {
        let mut considered = SolvMap::new(8);
        considered.set_all();

        let mut excludes = SolvMap::new(8);
        excludes.add(SolvableId(2));
        excludes.add(SolvableId(5));

        considered.subtract(&excludes);
        assert!(!considered.contains(SolvableId(2)));
        assert!(!considered.contains(SolvableId(5)));
        assert!(considered.contains(SolvableId(0)));
        assert_eq!(considered.count(), 6);
    }

    #[test]
    fn test_subtract_shorter_map() {
        let mut considered = SolvMap::new(200);
        considered.set_all();

        let mut excludes = SolvMap::new(10);
        excludes.add(SolvableId(1));

        considered.subtract(&excludes);
        assert!(!considered.contains(SolvableId(1)));
        assert!(considered.contains(SolvableId(150)));
    }
}
