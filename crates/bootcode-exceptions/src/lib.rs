//! Exception delivery and fault reporting.
//!
//! `setup()` installs the vector table for the active profile. Every fault
//! handler captures its syndrome state first, prints a report through
//! semihosting, and halts. Two entries return normally: the M-profile SysTick
//! handler, which bumps [`tick::__systick_count`], and reset, which re-enters
//! `_start`.

#![cfg_attr(not(test), no_std)]

pub mod output;
pub mod syndrome;
pub mod thumb;
pub mod tick;
pub mod vtor;

pub use output::{CharOut, Semihost};
pub use vtor::VectorInstallError;

cfg_if::cfg_if! {
    if #[cfg(arm_isa = "a64")] {
        mod a64;
        pub use a64::setup;
    } else if #[cfg(all(arm_isa = "a32", any(arm_profile = "a", arm_profile = "r")))] {
        mod a32;
        pub use a32::setup;
    } else if #[cfg(arm_profile = "m")] {
        mod mprofile;
        pub use mprofile::setup;
    }
}
