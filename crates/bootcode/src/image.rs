//! Initialized-data copy and zero-fill.

use core::ptr;

/// Where the image's data lives at load time and at run time. Sizes are exact
/// byte counts; zero means there is nothing to do for that region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageLayout {
    pub data_source: *const u8,
    pub data_start: *mut u8,
    pub data_size: usize,
    pub bss_start: *mut u8,
    pub bss_size: usize,
}

impl ImageLayout {
    pub const EMPTY: Self = Self {
        data_source: ptr::null(),
        data_start: ptr::null_mut(),
        data_size: 0,
        bss_start: ptr::null_mut(),
        bss_size: 0,
    };

    /// Read the layout from linker symbols. The size symbols are absolute,
    /// so their addresses are the sizes.
    #[cfg(any(arm_profile = "a", arm_profile = "r", arm_profile = "m"))]
    pub fn from_linker() -> Self {
        use core::ptr::{addr_of, addr_of_mut};

        extern "C" {
            static __data_source: u8;
            static mut __data_start: u8;
            static __data_size: u8;
            static mut __bss_start: u8;
            static __bss_size: u8;
        }

        Self {
            data_source: addr_of!(__data_source),
            data_start: addr_of_mut!(__data_start),
            data_size: addr_of!(__data_size) as usize,
            bss_start: addr_of_mut!(__bss_start),
            bss_size: addr_of!(__bss_size) as usize,
        }
    }

    /// Copy `.data` into place, then zero `.bss`.
    ///
    /// # Safety
    /// Each non-empty region must be valid for its size, and nothing may
    /// hold references into the destinations.
    pub unsafe fn relocate(&self) {
        if self.data_size != 0 && self.data_source != self.data_start.cast_const() {
            ptr::copy(self.data_source, self.data_start, self.data_size);
        }
        if self.bss_size != 0 {
            ptr::write_bytes(self.bss_start, 0, self.bss_size);
        }
    }
}
