//! Reset-to-main for bare-metal Arm cores.
//!
//! `_start` sets the stack pointer and calls [`boot::run`] with the profile
//! chosen at build time. From there every step is ordinary Rust:
//! exceptions, memory, misc setup, image relocation, cache enable, runtime
//! and platform init, `main(0, NULL)`, `exit`.
//!
//! The application links against these C symbols:
//!
//! - `int main(int argc, char **argv)`
//! - `void __libc_init_array(void)` and `void _platform_init(void)`
//! - `void exit(int)`, which must not return

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod image;
pub mod misc;

pub use boot::{run, Profile, Runtime};
pub use image::ImageLayout;

cfg_if::cfg_if! {
    if #[cfg(any(arm_profile = "a", arm_profile = "r", arm_profile = "m"))] {
        mod runtime;
        mod start;

        pub use runtime::CRuntime;
        pub use start::_start;

        /// The setup steps of the core this image was built for.
        pub struct Arch;

        impl Profile for Arch {
            fn setup_exceptions() {
                exceptions::setup();
            }

            fn setup_memory() {
                memory::setup();
            }

            fn setup_misc() {
                misc::setup();
            }

            fn enable_cache() {
                memory::enable_cache();
            }
        }

        /// # Safety
        /// Only `_start` calls this, once the stack pointer is valid.
        #[no_mangle]
        pub unsafe extern "C" fn __startup() -> ! {
            run::<Arch, CRuntime>(&ImageLayout::from_linker())
        }
    }
}

#[cfg(all(not(test), target_os = "none"))]
mod panic;
