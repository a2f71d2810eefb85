use crate::boot::Runtime;

extern "C" {
    fn __libc_init_array();
    fn _platform_init();
    fn main(argc: i32, argv: *const *const u8) -> i32;
    fn exit(status: i32) -> !;
}

/// The C-ABI collaborators, resolved at link time.
pub struct CRuntime;

impl Runtime for CRuntime {
    fn init_array() {
        unsafe { __libc_init_array() }
    }

    fn platform_init() {
        unsafe { _platform_init() }
    }

    fn main(argc: i32, argv: *const *const u8) -> i32 {
        unsafe { main(argc, argv) }
    }

    fn exit(status: i32) -> ! {
        unsafe { exit(status) }
    }
}
