use sysreg::barrier::{dmb, dsb, isb};
use sysreg::{SysReg, CCSIDR, CLIDR, CSSELR, SCTLR};

use crate::cache::{self, CacheMaintenance};

/// Live set/way maintenance through CLIDR/CSSELR/CCSIDR.
struct SetWay;

impl CacheMaintenance for SetWay {
    fn clidr(&self) -> usize {
        CLIDR::read()
    }

    fn ccsidr(&self, level: u32) -> usize {
        CSSELR::write((level as usize) << 1);
        isb();
        CCSIDR::read()
    }

    #[cfg(arm_isa = "a64")]
    fn clean_invalidate(&self, setway: usize) {
        unsafe {
            core::arch::asm!("dc cisw, {0}", in(reg) setway, options(nostack, preserves_flags));
        }
    }

    #[cfg(arm_isa = "a32")]
    fn clean_invalidate(&self, setway: usize) {
        sysreg::dccisw(setway);
    }
}

/// Caches and translation off, then clean and invalidate every data cache.
/// Safe to run on a cold core where everything is already off.
fn invalidate_cache() {
    SCTLR::I.set(0);
    SCTLR::C.set(0);
    SCTLR::M.set(0);
    isb();
    dmb();

    cache::clean_invalidate_all(&SetWay);
    dsb();
}

pub fn setup() {
    debug::writeln!("[BOOT] memory: invalidate caches");
    invalidate_cache();

    #[cfg(arm_profile = "a")]
    mmu::setup();

    #[cfg(arm_profile = "r")]
    SCTLR::Z.set(1);

    #[cfg(all(arm_isa = "a64", target_feature = "mte"))]
    {
        SCTLR::ATA.set(1);
        // Synchronous tag check faults.
        SCTLR::TCF.set(1);
        sysreg::GCR::RRND.set(1);
    }

    #[cfg(arm_strict_align)]
    SCTLR::A.set(1);
}

/// Invalidate instruction cache and branch predictors, then turn the caches on.
pub fn enable_cache() {
    #[cfg(arm_isa = "a64")]
    unsafe {
        core::arch::asm!("ic iallu", options(nostack, preserves_flags));
    }
    #[cfg(arm_isa = "a32")]
    {
        sysreg::iciallu();
        sysreg::bpiall();
    }
    dsb();
    isb();

    SCTLR::I.set(1);
    SCTLR::C.set(1);
    isb();
    debug::writeln!("[BOOT] memory: caches on");
}

// Tables live outside .bss so relocation does not wipe them once live.
#[cfg(all(arm_profile = "a", arm_isa = "a32"))]
mod mmu {
    use super::*;
    use core::ptr::addr_of_mut;
    use crate::table::SectionTable;
    use sysreg::{DACR, TCR, TTBR0};

    #[link_section = ".bootcode.pagetable"]
    static mut PAGETABLE: SectionTable = SectionTable::new();

    pub(super) fn setup() {
        // Manager access to domain 0.
        DACR::D0.set(3);
        // TTBCR.N = 0: always walk from TTBR0.
        TCR::write(0);

        let table = unsafe { &mut *addr_of_mut!(PAGETABLE) };
        // Bit 0: inner cacheable walks.
        TTBR0::write(table.0.as_ptr() as usize | 1);
        isb();

        table.fill_flat();
        debug::writeln!("[BOOT] memory: flat map at {:#x}", table.0.as_ptr() as usize);

        dsb();
        SCTLR::M.set(1);
        isb();
    }
}

#[cfg(all(arm_profile = "a", arm_isa = "a64"))]
mod mmu {
    use super::*;
    use core::ptr::addr_of_mut;
    use crate::stackheap;
    use crate::table::{self, BlockOptions, BlockTable};
    use sysreg::{MAIR, TCR, TTBR0};

    #[link_section = ".bootcode.pagetable"]
    static mut PAGETABLE: BlockTable = BlockTable::new();

    const OPTIONS: BlockOptions = BlockOptions {
        tagging: cfg!(target_feature = "mte"),
        guarded: cfg!(target_feature = "bti"),
    };

    pub(super) fn setup() {
        let code_addr = setup as usize;
        let bounds = stackheap::from_linker(code_addr);

        unsafe {
            core::arch::asm!("tlbi vmalle1", options(nostack, preserves_flags));
        }

        let table = unsafe { &mut *addr_of_mut!(PAGETABLE) };
        TTBR0::write(table.0.as_ptr() as usize);
        MAIR::write(table::MAIR_VALUE as usize);

        let mte4 = OPTIONS.tagging && sysreg::ID_AA64PFR1::MTEX.get() != 0;
        TCR::write(table::tcr_value(OPTIONS.tagging, mte4) as usize);
        isb();

        table.fill(code_addr, bounds.start, OPTIONS);
        debug::writeln!(
            "[BOOT] memory: image {:#x} stackheap {:#x}..{:#x}",
            code_addr,
            bounds.start,
            bounds.end
        );

        dsb();
        // WXN would make the whole image block execute-never.
        SCTLR::WXN.set(0);
        SCTLR::M.set(1);
        isb();
    }
}
