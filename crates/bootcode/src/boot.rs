//! The boot sequence.

use core::ptr;

use crate::image::ImageLayout;

/// Profile-specific setup steps, in the order [`run`] calls them.
pub trait Profile {
    /// Install the vector table.
    fn setup_exceptions();

    /// Invalidate caches and, where there is one, bring up translation.
    fn setup_memory();

    /// FP/SIMD access, pointer authentication keys, PMU filter, banked SPs.
    fn setup_misc();

    fn enable_cache();
}

/// What runs after the core is set up. Each hook is called exactly once.
pub trait Runtime {
    fn init_array();

    fn platform_init();

    fn main(argc: i32, argv: *const *const u8) -> i32;

    fn exit(status: i32) -> !;
}

/// Bring the core up and run the application. Never returns.
///
/// Cache enable is deferred until after relocation so that translation is
/// already live; the application gets no arguments since nothing supplies
/// them.
pub fn run<P: Profile, R: Runtime>(image: &ImageLayout) -> ! {
    debug::writeln!("[BOOT] exceptions");
    P::setup_exceptions();

    debug::writeln!("[BOOT] memory");
    P::setup_memory();

    debug::writeln!("[BOOT] misc");
    P::setup_misc();

    debug::writeln!(
        "[BOOT] relocate data={} bss={}",
        image.data_size,
        image.bss_size
    );
    unsafe { image.relocate() };

    P::enable_cache();

    debug::writeln!("[BOOT] runtime init");
    R::init_array();
    R::platform_init();

    debug::writeln!("[BOOT] main");
    let status = R::main(0, ptr::null());

    debug::writeln!("[BOOT] exit({})", status);
    R::exit(status)
}
