//! Typed access to Arm special-purpose registers.
//!
//! Every register is a zero-sized type implementing [`SysReg`]. Which
//! instruction (or memory access) backs `read`/`write` is decided by the
//! `arm_profile`/`arm_isa` cfgs emitted by the build script, so the same call
//! compiles to `mrs`/`msr` on AArch64, `mrc`/`mcr` on AArch32, or a volatile
//! load/store on M-profile. A register without an encoding on the active
//! target has no `SysReg` impl and any use of it fails to compile.
//!
//! Sub-ranges are reached through [`Field`]; every `get` reads the hardware
//! register and every `set` is a full read-modify-write. Nothing is cached.

#![cfg_attr(not(test), no_std)]

pub mod barrier;
mod field;
mod set;

pub use field::{extract, get_field, insert, mask, set_field, Bit, Field};
pub use set::RegisterSet;

cfg_if::cfg_if! {
    if #[cfg(any(arm_profile = "a", arm_profile = "r"))] {
        mod aprofile;
        pub use aprofile::*;
    } else if #[cfg(arm_profile = "m")] {
        mod mprofile;
        pub use mprofile::*;
    }
}

/// One architectural register.
pub trait SysReg {
    /// Architectural name, without any exception-level suffix.
    const NAME: &'static str;

    /// Full current value at the native register width.
    fn read() -> usize;

    fn write(value: usize);
}
