//! Full-system barriers.
//!
//! On a host build these degrade to compiler fences so portable code that
//! calls them still links in tests.

cfg_if::cfg_if! {
    if #[cfg(any(arm_isa = "a64", arm_isa = "a32", arm_isa = "t32"))] {
        use bootcode_macros::asm_seq;

        #[inline(always)]
        pub fn isb() {
            unsafe { asm_seq!("isb sy") }
        }

        #[inline(always)]
        pub fn dsb() {
            unsafe { asm_seq!("dsb sy") }
        }

        #[inline(always)]
        pub fn dmb() {
            unsafe { asm_seq!("dmb sy") }
        }
    } else {
        use core::sync::atomic::{compiler_fence, Ordering};

        #[inline(always)]
        pub fn isb() {
            compiler_fence(Ordering::SeqCst);
        }

        #[inline(always)]
        pub fn dsb() {
            compiler_fence(Ordering::SeqCst);
        }

        #[inline(always)]
        pub fn dmb() {
            compiler_fence(Ordering::SeqCst);
        }
    }
}
