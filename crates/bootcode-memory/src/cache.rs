//! Data cache clean and invalidate by set/way.

use sysreg::extract;

/// Hardware hooks for the set/way walk.
pub trait CacheMaintenance {
    /// Cache hierarchy description (CLIDR).
    fn clidr(&self) -> usize;

    /// Select the data or unified cache at zero-based `level` and return its
    /// CCSIDR. Implementations must synchronize between the select and the read.
    fn ccsidr(&self, level: u32) -> usize;

    /// Issue one clean-and-invalidate-by-set/way operation.
    fn clean_invalidate(&self, setway: usize);
}

/// Decoded CCSIDR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// log2 of the line length in bytes.
    pub line_shift: u32,
    pub ways: u32,
    pub sets: u32,
}

impl Geometry {
    pub const fn from_ccsidr(ccsidr: usize) -> Self {
        Self {
            line_shift: extract(ccsidr, 0, 2) as u32 + 4,
            ways: extract(ccsidr, 3, 12) as u32 + 1,
            sets: extract(ccsidr, 13, 27) as u32 + 1,
        }
    }

    /// Position of the way index: the way field occupies the top
    /// `ceil(log2(ways))` bits of the 32-bit operand.
    pub const fn way_shift(&self) -> u32 {
        (self.ways - 1).leading_zeros()
    }

    /// Operand for DC CISW / DCCISW.
    pub const fn setway(&self, level: u32, set: u32, way: u32) -> usize {
        let way_bits = match way.checked_shl(self.way_shift()) {
            Some(bits) => bits,
            None => 0,
        };
        ((level << 1) | (set << self.line_shift) | way_bits) as usize
    }
}

/// Zero-based levels, up to the Level of Coherence, that hold a data or
/// unified cache.
pub fn data_cache_levels(clidr: usize) -> impl Iterator<Item = u32> {
    // LoC
    let coherence = extract(clidr, 24, 26) as u32;
    (0..coherence).filter(move |&level| extract(clidr, level * 3, level * 3 + 2) >= 2)
}

/// Clean and invalidate every set and way of every data cache level, in level
/// order. Levels without a data cache see no operations.
pub fn clean_invalidate_all<C: CacheMaintenance>(hw: &C) {
    for level in data_cache_levels(hw.clidr()) {
        let geometry = Geometry::from_ccsidr(hw.ccsidr(level));
        for set in 0..geometry.sets {
            for way in 0..geometry.ways {
                hw.clean_invalidate(geometry.setway(level, set, way));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    struct FakeCaches {
        clidr: usize,
        ccsidr: Vec<usize>,
        selected: RefCell<Vec<u32>>,
        ops: RefCell<Vec<usize>>,
    }

    impl FakeCaches {
        fn new(clidr: usize, ccsidr: Vec<usize>) -> Self {
            Self {
                clidr,
                ccsidr,
                selected: RefCell::new(Vec::new()),
                ops: RefCell::new(Vec::new()),
            }
        }
    }

    impl CacheMaintenance for FakeCaches {
        fn clidr(&self) -> usize {
            self.clidr
        }

        fn ccsidr(&self, level: u32) -> usize {
            self.selected.borrow_mut().push(level);
            self.ccsidr[level as usize]
        }

        fn clean_invalidate(&self, setway: usize) {
            self.ops.borrow_mut().push(setway);
        }
    }

    fn ccsidr(line_size: usize, ways: usize, sets: usize) -> usize {
        line_size | ((ways - 1) << 3) | ((sets - 1) << 13)
    }

    fn clidr(ctypes: &[usize], loc: usize) -> usize {
        let mut value = loc << 24;
        for (level, ctype) in ctypes.iter().enumerate() {
            value |= ctype << (level * 3);
        }
        value
    }

    #[test]
    fn test_geometry_decodes_ccsidr() {
        // 64-byte lines, 4 ways, 256 sets.
        let g = Geometry::from_ccsidr(ccsidr(2, 4, 256));
        assert_eq!(g, Geometry { line_shift: 6, ways: 4, sets: 256 });
        assert_eq!(g.way_shift(), 30);
        assert_eq!(g.setway(1, 3, 2), (1 << 1) | (3 << 6) | (2 << 30));
    }

    #[test]
    fn test_way_shift_rounds_up_for_non_power_of_two() {
        let g = Geometry::from_ccsidr(ccsidr(1, 3, 1));
        assert_eq!(g.way_shift(), 30);
        assert_eq!(g.setway(0, 0, 2), 2 << 30);
    }

    #[test]
    fn test_direct_mapped_cache_has_no_way_bits() {
        let g = Geometry::from_ccsidr(ccsidr(0, 1, 8));
        assert_eq!(g.way_shift(), 32);
        assert_eq!(g.setway(2, 5, 0), (2 << 1) | (5 << 4));
    }

    #[test]
    fn test_skips_instruction_only_levels_and_stops_at_coherence() {
        // L1 separate, L2 instruction only, L3 unified, L4 unified beyond LoC.
        let hw = FakeCaches::new(
            clidr(&[3, 1, 4, 4], 3),
            vec![ccsidr(0, 2, 2), ccsidr(0, 2, 2), ccsidr(1, 4, 4), ccsidr(0, 1, 1)],
        );
        clean_invalidate_all(&hw);
        assert_eq!(*hw.selected.borrow(), vec![0, 2]);
        assert_eq!(hw.ops.borrow().len(), 2 * 2 + 4 * 4);
    }

    #[test]
    fn test_no_caches_no_operations() {
        let hw = FakeCaches::new(clidr(&[0, 0], 0), vec![]);
        clean_invalidate_all(&hw);
        assert!(hw.ops.borrow().is_empty());
        assert!(hw.selected.borrow().is_empty());
    }

    fn level_strategy() -> impl Strategy<Value = (usize, usize, usize, usize)> {
        // ctype, line size code, ways, sets
        (0usize..=4, 0usize..=3, 1usize..=8, 1usize..=64)
    }

    proptest! {
        #[test]
        fn test_every_set_and_way_visited_once_in_level_order(
            levels in prop::collection::vec(level_strategy(), 1..=7),
            extra in 0usize..=1,
        ) {
            let loc = (levels.len() - extra).max(1).min(7);
            let ctypes: Vec<usize> = levels.iter().map(|l| l.0).collect();
            let ccsidrs: Vec<usize> = levels.iter().map(|l| ccsidr(l.1, l.2, l.3)).collect();
            let hw = FakeCaches::new(clidr(&ctypes, loc), ccsidrs);

            clean_invalidate_all(&hw);

            let expected_levels: Vec<u32> = (0..loc as u32)
                .filter(|&l| ctypes[l as usize] >= 2)
                .collect();
            prop_assert_eq!(&*hw.selected.borrow(), &expected_levels);

            let ops = hw.ops.borrow();
            let expected_ops: usize = expected_levels
                .iter()
                .map(|&l| levels[l as usize].2 * levels[l as usize].3)
                .sum();
            prop_assert_eq!(ops.len(), expected_ops);

            let unique: HashSet<_> = ops.iter().collect();
            prop_assert_eq!(unique.len(), ops.len());

            let op_levels: Vec<usize> = ops.iter().map(|op| (op >> 1) & 0x7).collect();
            prop_assert!(op_levels.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
