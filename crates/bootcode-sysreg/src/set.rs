use core::ptr;

/// Memory-mapped registers repeating every `STRIDE` bytes from `BASE`, with
/// valid indices `0..=MAX`.
#[derive(Clone, Copy)]
pub struct RegisterSet<const BASE: usize, const STRIDE: usize, const MAX: usize>(());

impl<const BASE: usize, const STRIDE: usize, const MAX: usize> RegisterSet<BASE, STRIDE, MAX> {
    pub const MAX_INDEX: usize = MAX;

    /// # Safety
    /// `BASE + i * STRIDE` must be a word-sized device register for every `i` in `0..=MAX`.
    pub const unsafe fn new() -> Self {
        Self(())
    }

    /// Panics on an index above `MAX`; the access is never performed.
    #[inline(always)]
    #[track_caller]
    pub fn address(&self, index: usize) -> usize {
        assert!(
            index <= MAX,
            "register set index {index} out of range (max {MAX})"
        );
        BASE + index * STRIDE
    }

    #[inline(always)]
    #[track_caller]
    pub fn read(&self, index: usize) -> usize {
        let addr = self.address(index);
        unsafe { ptr::read_volatile(addr as *const usize) }
    }

    #[inline(always)]
    #[track_caller]
    pub fn write(&self, index: usize, value: usize) {
        let addr = self.address(index);
        unsafe { ptr::write_volatile(addr as *mut usize, value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    type Icer = RegisterSet<0xE000_E180, 4, 15>;
    const ICER: Icer = unsafe { RegisterSet::new() };

    #[test]
    fn test_addresses_are_distinct_and_strided() {
        let addrs: Vec<usize> = (0..=Icer::MAX_INDEX).map(|i| ICER.address(i)).collect();
        assert_eq!(addrs[0], 0xE000_E180);
        assert_eq!(addrs[15], 0xE000_E1BC);
        assert!(addrs.windows(2).all(|w| w[1] - w[0] == 4));
        assert_eq!(addrs.iter().collect::<HashSet<_>>().len(), 16);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_past_max_panics() {
        ICER.address(16);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_write_past_max_panics_before_access() {
        // The bounds check runs before the address would be dereferenced.
        ICER.write(usize::MAX, 0);
    }

    proptest! {
        #[test]
        fn test_index_maps_to_base_plus_stride(i in 0usize..=15) {
            prop_assert_eq!(ICER.address(i), 0xE000_E180 + 4 * i);
        }

        #[test]
        fn test_out_of_range_never_yields_an_address(i in 16usize..) {
            prop_assert!(std::panic::catch_unwind(|| ICER.address(i)).is_err());
        }
    }
}
