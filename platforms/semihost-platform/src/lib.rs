//! Platform hooks for images run under a debugger or simulator with
//! semihosting.
//!
//! Linking this crate supplies `_platform_init`, and by default `exit` and
//! `__libc_init_array`, so a Rust `#![no_main]` application only has to
//! define `main`.

#![cfg_attr(not(test), no_std)]

pub use bootcode;

mod stdio;

pub use stdio::{stderr, stdin, stdout, Console};

/// Opens the console handles.
#[cfg(target_os = "none")]
#[no_mangle]
pub extern "C" fn _platform_init() {
    let opened = stdio::init();
    debug::writeln!("[BOOT] platform: {} console handles", opened);
}

/// # Safety
/// Called once by the boot sequence, after relocation.
#[cfg(all(target_os = "none", feature = "init-array"))]
#[no_mangle]
pub unsafe extern "C" fn __libc_init_array() {
    extern "C" {
        static __init_array_start: Constructor;
        static __init_array_end: Constructor;
    }

    let start = core::ptr::addr_of!(__init_array_start);
    let end = core::ptr::addr_of!(__init_array_end);
    let count = constructor_count(start as usize, end as usize);
    run_constructors(core::slice::from_raw_parts(start, count));
}

#[cfg(all(target_os = "none", feature = "semihost-exit"))]
#[no_mangle]
pub extern "C" fn exit(status: i32) -> ! {
    semihost::exit(status)
}

pub type Constructor = unsafe extern "C" fn();

/// Entries between two `.init_array` bounds. Reversed bounds mean none.
pub const fn constructor_count(start: usize, end: usize) -> usize {
    end.saturating_sub(start) / core::mem::size_of::<Constructor>()
}

/// # Safety
/// Each entry must be a constructor safe to call at this point of boot.
pub unsafe fn run_constructors(ctors: &[Constructor]) {
    for ctor in ctors {
        ctor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn first() {
        assert_eq!(CALLS.fetch_add(1, Ordering::SeqCst), 0);
    }

    unsafe extern "C" fn second() {
        assert_eq!(CALLS.fetch_add(10, Ordering::SeqCst), 1);
    }

    #[test]
    fn test_constructors_run_in_order() {
        unsafe { run_constructors(&[first, second]) };
        assert_eq!(CALLS.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_constructor_count_from_bounds() {
        let size = core::mem::size_of::<Constructor>();
        assert_eq!(constructor_count(0x1000, 0x1000 + 3 * size), 3);
        assert_eq!(constructor_count(0x1000, 0x1000), 0);
    }

    #[test]
    fn test_reversed_bounds_run_nothing() {
        assert_eq!(constructor_count(0x2000, 0x1000), 0);
    }

    #[test]
    fn test_empty_constructor_list() {
        unsafe { run_constructors(&[]) };
    }
}
