use sysreg::{ID_DFR0, PMCCFILTR};

pub fn setup() {
    #[cfg(all(arm_isa = "a64", target_feature = "paca"))]
    pointer_authentication();

    #[cfg(any(all(arm_isa = "a64", target_feature = "neon"), all(arm_isa = "a32", target_abi = "eabihf")))]
    floating_point();

    // Count cycles at EL2 too.
    if super::has_pmuv3(ID_DFR0::PERF_MON.get()) {
        PMCCFILTR::NSH.set(1);
    }

    #[cfg(all(arm_isa = "a32", not(all(arm_profile = "r", arm_arch = "8"))))]
    banked_stack_pointers();

    debug::writeln!("[BOOT] misc: done");
}

#[cfg(all(arm_isa = "a64", target_feature = "paca"))]
fn pointer_authentication() {
    use super::PAUTH_KEYS;
    use sysreg::*;

    let [ia, ib, da, db, ga] = PAUTH_KEYS.map(|key| key as usize);
    APIAKeyLo::write(ia);
    APIAKeyHi::write(ia);
    APIBKeyLo::write(ib);
    APIBKeyHi::write(ib);
    APDAKeyLo::write(da);
    APDAKeyHi::write(da);
    APDBKeyLo::write(db);
    APDBKeyHi::write(db);
    APGAKeyLo::write(ga);
    APGAKeyHi::write(ga);

    // The GA key has no enable bit.
    SCTLR::EN_IA.set(1);
    SCTLR::EN_IB.set(1);
    SCTLR::EN_DA.set(1);
    SCTLR::EN_DB.set(1);
    sysreg::barrier::isb();
}

#[cfg(all(arm_isa = "a64", target_feature = "neon"))]
fn floating_point() {
    use sysreg::{CPACR, CPTR};

    CPACR::CP10.set(0x3);
    CPACR::CP11.set(0x3);
    CPTR::TFP.set(0);
    // EZ/ESM are enables at EL3 but traps (TZ/TSM) at EL2.
    if sysreg::at_el3() {
        CPTR::EZ.set(1);
        CPTR::ESM.set(1);
    }
    sysreg::barrier::isb();
}

#[cfg(all(arm_isa = "a32", target_abi = "eabihf"))]
fn floating_point() {
    use sysreg::{CPACR, FPEXC};

    CPACR::CP10.set(0x3);
    CPACR::CP11.set(0x3);
    sysreg::barrier::isb();
    FPEXC::EN.set(1);
}

/// Give FIQ, IRQ, ABT, UND and SYS modes the current stack pointer, then
/// return to SVC. `cps` leaves the interrupt masks alone. The copy goes
/// through r0 since r8-r12 are banked in FIQ mode.
#[cfg(all(arm_isa = "a32", not(all(arm_profile = "r", arm_arch = "8"))))]
fn banked_stack_pointers() {
    unsafe {
        core::arch::asm!(
            "mov     r0, sp",
            "cps     #0x11",
            "mov     sp, r0",
            "cps     #0x12",
            "mov     sp, r0",
            "cps     #0x17",
            "mov     sp, r0",
            "cps     #0x1b",
            "mov     sp, r0",
            "cps     #0x1f",
            "mov     sp, r0",
            "cps     #0x13",
            out("r0") _,
            options(nomem, preserves_flags),
        );
    }
}
