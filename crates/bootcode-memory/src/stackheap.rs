//! Stack/heap region bounds.
//!
//! The linker provides `__heap_start` and `__stack`; a value of zero means the
//! symbol was not supplied. In that case the region is assumed to occupy the
//! translation granule after the one holding the boot code. The granule is
//! fixed at 1 GiB, matching the level-1 block size of the 4 KiB-granule table
//! built in [`crate::table`]. Targets with a different layout must supply both
//! symbols.

/// log2 of the fallback granule.
pub const GRANULE_SHIFT: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackHeap {
    pub start: usize,
    pub end: usize,
}

/// Bounds from the linker values, falling back around `code_addr`. On 32-bit
/// targets the fallback end wraps to 0 when the code sits in the top granules.
pub const fn resolve(heap_start: usize, stack: usize, code_addr: usize) -> StackHeap {
    let page = code_addr >> GRANULE_SHIFT;
    StackHeap {
        start: if heap_start != 0 {
            heap_start
        } else {
            (page + 1).wrapping_shl(GRANULE_SHIFT)
        },
        end: if stack != 0 {
            stack
        } else {
            (page + 2).wrapping_shl(GRANULE_SHIFT)
        },
    }
}

/// Read the linker symbols and resolve around `code_addr`.
#[cfg(any(arm_profile = "a", arm_profile = "r", arm_profile = "m"))]
pub fn from_linker(code_addr: usize) -> StackHeap {
    extern "C" {
        static __heap_start: u8;
        static __stack: u8;
    }
    // Only the symbol addresses are used; zero means absent.
    let heap_start = core::ptr::addr_of!(__heap_start) as usize;
    let stack = core::ptr::addr_of!(__stack) as usize;
    resolve(heap_start, stack, code_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: usize = 1 << 30;

    #[test]
    fn test_linker_values_win() {
        let b = resolve(0x8010_0000, 0x8020_0000, 0x8000_0000);
        assert_eq!(b, StackHeap { start: 0x8010_0000, end: 0x8020_0000 });
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_absent_symbols_use_following_granules() {
        let code = 0x4008_0000;
        let b = resolve(0, 0, code);
        assert_eq!(b, StackHeap { start: 2 * GIB, end: 3 * GIB });
    }

    #[test]
    fn test_symbols_fall_back_independently() {
        let b = resolve(0x1000, 0, 0x100);
        assert_eq!(b, StackHeap { start: 0x1000, end: 2 * GIB });
        let b = resolve(0, 0x9000, 0x100);
        assert_eq!(b, StackHeap { start: GIB, end: 0x9000 });
    }
}
