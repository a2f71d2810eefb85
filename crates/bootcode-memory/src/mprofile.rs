use sysreg::barrier::{dsb, isb};
use sysreg::{CCR, MPU_CTRL};

pub fn setup() {
    MPU_CTRL::ENABLE.set(0);

    #[cfg(arm_strict_align)]
    CCR::UNALIGN_TRP.set(1);

    debug::writeln!("[BOOT] memory: MPU off");
}

/// CCR.DC/IC are RES0 on cores without caches, so this is harmless there.
pub fn enable_cache() {
    CCR::DC.set(1);
    CCR::IC.set(1);
    dsb();
    isb();
}
