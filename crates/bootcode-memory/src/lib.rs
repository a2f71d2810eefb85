//! Memory and cache bring-up.
//!
//! [`setup`] runs early in boot: caches and translation are switched off, the
//! data caches are cleaned and invalidated level by level, and on A-profile a
//! flat translation table goes live. [`enable_cache`] runs later, once the
//! image has been relocated.
//!
//! The set/way walk, table contents and stack/heap bounds are plain functions
//! so they can be exercised on the host.

#![cfg_attr(not(test), no_std)]

pub mod cache;
pub mod stackheap;
pub mod table;

cfg_if::cfg_if! {
    if #[cfg(any(arm_profile = "a", arm_profile = "r"))] {
        mod aprofile;
        pub use aprofile::{enable_cache, setup};
    } else if #[cfg(arm_profile = "m")] {
        mod mprofile;
        pub use mprofile::{enable_cache, setup};
    }
}
