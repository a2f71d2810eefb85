//! Arm semihosting.
//!
//! A semihosting call is a trap instruction the attached debugger or model
//! intercepts: operation number in r0/w0, parameter (usually a pointer to a
//! parameter block) in r1/x1, result back in r0/x0. The trap differs per
//! instruction set and is picked at build time.
//!
//! Nothing here buffers. Every character is a separate, synchronous trap,
//! which is what makes it usable from a fault handler.

#![cfg_attr(not(test), no_std)]

use core::ffi::CStr;
use core::fmt;

pub mod op {
    pub const SYS_OPEN: usize = 0x01;
    pub const SYS_WRITEC: usize = 0x03;
    pub const SYS_WRITE0: usize = 0x04;
    pub const SYS_WRITE: usize = 0x05;
    pub const SYS_EXIT: usize = 0x18;
}

/// Stop reasons passed to `SYS_EXIT`.
pub mod reason {
    pub const APPLICATION_EXIT: usize = 0x20026;
    pub const RUN_TIME_ERROR_UNKNOWN: usize = 0x20023;
}

cfg_if::cfg_if! {
    if #[cfg(arm_isa = "a64")] {
        /// # Safety
        /// `arg` must be what operation `op` expects, including any pointed-to block.
        #[inline(always)]
        pub unsafe fn call(op: usize, arg: usize) -> usize {
            let ret;
            core::arch::asm!(
                "hlt #0xf000",
                inout("x0") op => ret,
                in("x1") arg,
                options(nostack, preserves_flags),
            );
            ret
        }
    } else if #[cfg(arm_isa = "t32")] {
        /// # Safety
        /// `arg` must be what operation `op` expects, including any pointed-to block.
        #[inline(always)]
        pub unsafe fn call(op: usize, arg: usize) -> usize {
            let ret;
            core::arch::asm!(
                "bkpt #0xab",
                inout("r0") op => ret,
                in("r1") arg,
                options(nostack, preserves_flags),
            );
            ret
        }
    } else if #[cfg(all(arm_isa = "a32", target_feature = "thumb-mode"))] {
        /// # Safety
        /// `arg` must be what operation `op` expects, including any pointed-to block.
        #[inline(always)]
        pub unsafe fn call(op: usize, arg: usize) -> usize {
            let ret;
            core::arch::asm!(
                "svc #0xab",
                inout("r0") op => ret,
                in("r1") arg,
                options(nostack, preserves_flags),
            );
            ret
        }
    } else if #[cfg(arm_isa = "a32")] {
        /// # Safety
        /// `arg` must be what operation `op` expects, including any pointed-to block.
        #[inline(always)]
        pub unsafe fn call(op: usize, arg: usize) -> usize {
            let ret;
            core::arch::asm!(
                "svc #0x123456",
                inout("r0") op => ret,
                in("r1") arg,
                options(nostack, preserves_flags),
            );
            ret
        }
    } else {
        /// No debugger to trap into on a host build; every call fails.
        ///
        /// # Safety
        /// Always safe; kept `unsafe` to match the target signature.
        #[inline(always)]
        pub unsafe fn call(_op: usize, _arg: usize) -> usize {
            usize::MAX
        }
    }
}

/// Emit one character on the debugger console.
#[inline]
pub fn write_char(c: u8) {
    unsafe {
        call(op::SYS_WRITEC, &c as *const u8 as usize);
    }
}

pub fn write_str(s: &str) {
    for b in s.bytes() {
        write_char(b);
    }
}

pub fn write0(s: &CStr) {
    unsafe {
        call(op::SYS_WRITE0, s.as_ptr() as usize);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    Append,
}

impl OpenMode {
    /// ISO C `fopen` mode index understood by `SYS_OPEN` ("r", "w", "a").
    pub const fn code(self) -> usize {
        match self {
            OpenMode::Read => 0,
            OpenMode::Write => 4,
            OpenMode::Append => 8,
        }
    }
}

/// A host file handle returned by [`open`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle(pub usize);

/// Open a file on the host. The special name `:tt` is the debugger console.
pub fn open(path: &CStr, mode: OpenMode) -> Option<Handle> {
    let block = open_block(path, mode);
    let ret = unsafe { call(op::SYS_OPEN, block.as_ptr() as usize) };
    (ret as isize >= 0).then_some(Handle(ret))
}

/// Returns the number of bytes that were not written.
pub fn write(handle: Handle, buf: &[u8]) -> usize {
    let block = [handle.0, buf.as_ptr() as usize, buf.len()];
    unsafe { call(op::SYS_WRITE, block.as_ptr() as usize) }
}

fn open_block(path: &CStr, mode: OpenMode) -> [usize; 3] {
    [
        path.as_ptr() as usize,
        mode.code(),
        path.to_bytes().len(),
    ]
}

/// `SYS_EXIT` argument. AArch64 passes a block carrying the status; the
/// 32-bit form takes the reason code alone and drops the status.
#[inline(always)]
fn exit_with(stop_reason: usize, status: i32) {
    #[cfg(arm_isa = "a64")]
    {
        let block = exit_block(stop_reason, status);
        unsafe { call(op::SYS_EXIT, block.as_ptr() as usize) };
    }
    #[cfg(not(arm_isa = "a64"))]
    {
        let _ = status;
        unsafe { call(op::SYS_EXIT, stop_reason) };
    }
}

#[allow(dead_code)]
const fn exit_block(stop_reason: usize, status: i32) -> [usize; 2] {
    [stop_reason, status as isize as usize]
}

/// Report normal completion with `status` and stop.
pub fn exit(status: i32) -> ! {
    exit_with(reason::APPLICATION_EXIT, status);
    halt()
}

/// Report an unrecoverable error and stop.
pub fn abort() -> ! {
    exit_with(reason::RUN_TIME_ERROR_UNKNOWN, 1);
    halt()
}

/// Park the core if the debugger let execution continue past an exit.
pub fn halt() -> ! {
    loop {
        #[cfg(any(arm_isa = "a64", arm_isa = "a32", arm_isa = "t32"))]
        unsafe {
            core::arch::asm!("wfi", options(nomem, nostack, preserves_flags));
        }
        #[cfg(not(any(arm_isa = "a64", arm_isa = "a32", arm_isa = "t32")))]
        core::hint::spin_loop();
    }
}

/// `core::fmt` sink over [`write_char`].
pub struct Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_open_modes_follow_fopen_table() {
        assert_eq!(OpenMode::Read.code(), 0);
        assert_eq!(OpenMode::Write.code(), 4);
        assert_eq!(OpenMode::Append.code(), 8);
    }

    #[test]
    fn test_open_block_layout() {
        let block = open_block(c":tt", OpenMode::Write);
        assert_eq!(block[1], 4);
        assert_eq!(block[2], 3);
    }

    #[test]
    fn test_exit_block_sign_extends_status() {
        assert_eq!(exit_block(reason::APPLICATION_EXIT, 0), [0x20026, 0]);
        assert_eq!(exit_block(reason::APPLICATION_EXIT, -1), [0x20026, usize::MAX]);
    }

    #[test]
    fn test_host_calls_fail_cleanly() {
        assert_eq!(open(c":tt", OpenMode::Read), None);
        assert!(write!(Console, "value {}", 42).is_ok());
    }
}
