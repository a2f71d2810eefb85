use sysreg::CCR;

pub fn setup() {
    #[cfg(target_abi = "eabihf")]
    {
        use sysreg::{CPACR, FPCCR, NSACR};

        CPACR::CP10.set(0x3);
        CPACR::CP11.set(0x3);
        // Non-secure access to the FPU.
        NSACR::CP10.set(1);
        NSACR::CP11.set(1);
        FPCCR::LSPACT.set(0);
        sysreg::barrier::dsb();
        sysreg::barrier::isb();
    }

    // Both are no-ops on cores without the feature.
    CCR::BP.set(1);
    CCR::LOB.set(1);

    debug::writeln!("[BOOT] misc: done");
}
