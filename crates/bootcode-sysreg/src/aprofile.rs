//! A- and R-profile registers.
//!
//! Each register names its AArch64 accessor (`el0`, `el1`, or `el23`, the
//! latter resolved at run time to EL3 when executing there and EL2 otherwise)
//! and/or its AArch32 `cp15` coordinates. AArch32 always uses the PL1/Hyp view
//! selected by the encoding.

use crate::{Bit, Field, SysReg};

#[allow(unused_imports)]
use bootcode_macros::{mcr, mrc, mrs, msr};

macro_rules! sysreg {
    (@read el0 $mn:literal) => { mrs!($mn, "_EL0") };
    (@read el1 $mn:literal) => { mrs!($mn, "_EL1") };
    (@read el23 $mn:literal) => {
        if at_el3() { mrs!($mn, "_EL3") } else { mrs!($mn, "_EL2") }
    };
    (@write el0 $mn:literal, $v:expr) => { unsafe { msr!($v; $mn, "_EL0") } };
    (@write el1 $mn:literal, $v:expr) => { unsafe { msr!($v; $mn, "_EL1") } };
    (@write el23 $mn:literal, $v:expr) => {
        if at_el3() {
            unsafe { msr!($v; $mn, "_EL3") }
        } else {
            unsafe { msr!($v; $mn, "_EL2") }
        }
    };
    ($(
        $(#[$attr:meta])*
        $name:ident:
            $(a64($view:ident $mn:literal))? $(,)?
            $(a32($op1:literal, $crn:ident, $crm:ident, $op2:literal))?;
    )*) => {$(
        $(#[$attr])*
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        pub struct $name;

        $(
            #[cfg(arm_isa = "a64")]
            impl SysReg for $name {
                const NAME: &'static str = stringify!($name);

                #[inline(always)]
                fn read() -> usize {
                    sysreg!(@read $view $mn)
                }

                #[inline(always)]
                fn write(value: usize) {
                    sysreg!(@write $view $mn, value)
                }
            }
        )?

        $(
            #[cfg(arm_isa = "a32")]
            impl SysReg for $name {
                const NAME: &'static str = stringify!($name);

                #[inline(always)]
                fn read() -> usize {
                    mrc!(p15, $op1, $crn, $crm, $op2)
                }

                #[inline(always)]
                fn write(value: usize) {
                    unsafe { mcr!(value; p15, $op1, $crn, $crm, $op2) }
                }
            }
        )?
    )*};
}

/// Whether the core is executing at EL3.
#[cfg(arm_isa = "a64")]
#[inline(always)]
pub fn at_el3() -> bool {
    current_el() == 3
}

#[cfg(arm_isa = "a64")]
#[inline(always)]
pub fn current_el() -> usize {
    (mrs!("CurrentEL") >> 2) & 0x3
}

/// Processor mode field of the CPSR.
#[cfg(arm_isa = "a32")]
#[inline(always)]
pub fn cpsr_mode() -> usize {
    let cpsr: usize;
    unsafe {
        core::arch::asm!("mrs {0}, cpsr", out(reg) cpsr, options(nomem, nostack, preserves_flags));
    }
    cpsr & 0x1f
}

pub mod mode {
    pub const FIQ: usize = 0x11;
    pub const IRQ: usize = 0x12;
    pub const SVC: usize = 0x13;
    pub const ABT: usize = 0x17;
    pub const HYP: usize = 0x1a;
    pub const UND: usize = 0x1b;
    pub const SYS: usize = 0x1f;
}

sysreg! {
    PMCCFILTR: a64(el0 "PMCCFILTR"), a32(0, c14, c15, 7);

    CLIDR: a64(el1 "CLIDR"), a32(1, c0, c0, 1);
    CSSELR: a64(el1 "CSSELR"), a32(2, c0, c0, 0);
    CCSIDR: a64(el1 "CCSIDR"), a32(1, c0, c0, 0);
    ID_DFR0: a64(el1 "ID_DFR0"), a32(0, c0, c1, 2);
    CPACR: a64(el1 "CPACR"), a32(0, c1, c0, 2);
    ID_AA64PFR1: a64(el1 "ID_AA64PFR1");

    /// Syndrome of the exception taken to the current level.
    ESR: a64(el23 "ESR");
    ELR: a64(el23 "ELR");
    FAR: a64(el23 "FAR");
    SCTLR: a64(el23 "SCTLR"), a32(0, c1, c0, 0);
    VBAR: a64(el23 "VBAR"), a32(0, c12, c0, 0);
    /// HCPTR on AArch32.
    CPTR: a64(el23 "CPTR"), a32(4, c1, c1, 2);
    TTBR0: a64(el23 "TTBR0"), a32(0, c2, c0, 0);
    /// MAIR0 on AArch32.
    MAIR: a64(el23 "MAIR"), a32(0, c10, c2, 0);
    /// TTBCR on AArch32.
    TCR: a64(el23 "TCR"), a32(0, c2, c0, 2);

    DACR: a32(0, c3, c0, 0);
    IFSR: a32(0, c5, c0, 1);
    IFAR: a32(0, c6, c0, 2);
    DFSR: a32(0, c5, c0, 0);
    DFAR: a32(0, c6, c0, 0);
    /// Only readable in Hyp mode.
    HSR: a32(4, c5, c2, 0);
}

#[cfg(all(arm_isa = "a64", target_feature = "mte"))]
mod mte {
    use super::*;

    sysreg! {
        /// Tag control.
        GCR: a64(el1 "GCR");
    }

    impl GCR {
        pub const EXCLUDE: Field<Self, 0, 15> = Field::new();
        pub const RRND: Bit<Self, 16> = Bit::new();
    }
}

#[cfg(all(arm_isa = "a64", target_feature = "mte"))]
pub use mte::*;

#[cfg(all(arm_isa = "a64", target_feature = "paca"))]
mod pauth {
    use super::*;

    sysreg! {
        APIAKeyLo: a64(el1 "APIAKeyLo");
        APIAKeyHi: a64(el1 "APIAKeyHi");
        APIBKeyLo: a64(el1 "APIBKeyLo");
        APIBKeyHi: a64(el1 "APIBKeyHi");
        APDAKeyLo: a64(el1 "APDAKeyLo");
        APDAKeyHi: a64(el1 "APDAKeyHi");
        APDBKeyLo: a64(el1 "APDBKeyLo");
        APDBKeyHi: a64(el1 "APDBKeyHi");
        APGAKeyLo: a64(el1 "APGAKeyLo");
        APGAKeyHi: a64(el1 "APGAKeyHi");
    }
}

#[cfg(all(arm_isa = "a64", target_feature = "paca"))]
pub use pauth::*;

impl PMCCFILTR {
    pub const RLH: Bit<Self, 20> = Bit::new();
    pub const RLU: Bit<Self, 21> = Bit::new();
    pub const RLK: Bit<Self, 22> = Bit::new();
    pub const T: Bit<Self, 23> = Bit::new();
    pub const SH: Bit<Self, 24> = Bit::new();
    pub const M: Bit<Self, 26> = Bit::new();
    pub const NSH: Bit<Self, 27> = Bit::new();
    pub const NSU: Bit<Self, 28> = Bit::new();
    pub const NSK: Bit<Self, 29> = Bit::new();
    pub const U: Bit<Self, 30> = Bit::new();
    pub const P: Bit<Self, 31> = Bit::new();
}

impl CLIDR {
    pub const CTYPE1: Field<Self, 0, 2> = Field::new();
    pub const LOUIS: Field<Self, 21, 23> = Field::new();
    pub const LOC: Field<Self, 24, 26> = Field::new();
    pub const LOUU: Field<Self, 27, 29> = Field::new();
    #[cfg(arm_isa = "a64")]
    pub const ICB: Field<Self, 30, 32> = Field::new();

    /// Cache type at a zero-based level, from a raw CLIDR value.
    /// 0 means no cache, 1 instruction only, 2 data only, 3 separate, 4 unified.
    pub const fn ctype(clidr: usize, level: u32) -> usize {
        crate::extract(clidr, level * 3, level * 3 + 2)
    }
}

impl CSSELR {
    pub const IND: Bit<Self, 0> = Bit::new();
    pub const LEVEL: Field<Self, 1, 3> = Field::new();
}

impl CCSIDR {
    pub const LINE_SIZE: Field<Self, 0, 2> = Field::new();
    pub const ASSOCIATIVITY: Field<Self, 3, 12> = Field::new();
    pub const NUM_SETS: Field<Self, 13, 27> = Field::new();
}

impl ID_DFR0 {
    pub const COP_DBG: Field<Self, 0, 3> = Field::new();
    pub const COP_SDBG: Field<Self, 4, 7> = Field::new();
    pub const MMAP_DBG: Field<Self, 8, 11> = Field::new();
    pub const COP_TRC: Field<Self, 12, 15> = Field::new();
    pub const MMAP_TRC: Field<Self, 16, 19> = Field::new();
    pub const MPROF_DBG: Field<Self, 20, 23> = Field::new();
    pub const PERF_MON: Field<Self, 24, 27> = Field::new();
    pub const TRACE_FILT: Field<Self, 28, 31> = Field::new();
}

impl CPACR {
    pub const CP10: Field<Self, 20, 21> = Field::new();
    pub const CP11: Field<Self, 22, 23> = Field::new();
    pub const TRCDIS: Bit<Self, 28> = Bit::new();
    pub const ASEDIS: Bit<Self, 31> = Bit::new();
}

#[cfg(arm_isa = "a64")]
impl ID_AA64PFR1 {
    pub const MTE: Field<Self, 8, 11> = Field::new();
    pub const MTEX: Field<Self, 52, 55> = Field::new();
}

impl SCTLR {
    pub const M: Bit<Self, 0> = Bit::new();
    pub const A: Bit<Self, 1> = Bit::new();
    pub const C: Bit<Self, 2> = Bit::new();
    pub const SA: Bit<Self, 3> = Bit::new();
    pub const NAA: Bit<Self, 6> = Bit::new();
    /// Branch prediction enable (R-profile).
    pub const Z: Bit<Self, 11> = Bit::new();
    pub const EOS: Bit<Self, 11> = Bit::new();
    pub const I: Bit<Self, 12> = Bit::new();
    pub const EN_DB: Bit<Self, 13> = Bit::new();
    pub const WXN: Bit<Self, 19> = Bit::new();
    pub const IESB: Bit<Self, 21> = Bit::new();
    pub const EIS: Bit<Self, 22> = Bit::new();
    pub const EE: Bit<Self, 25> = Bit::new();
    pub const EN_DA: Bit<Self, 27> = Bit::new();
    pub const EN_IB: Bit<Self, 30> = Bit::new();
    pub const EN_IA: Bit<Self, 31> = Bit::new();
}

#[cfg(arm_isa = "a64")]
impl SCTLR {
    pub const BT: Bit<Self, 36> = Bit::new();
    pub const ITFSB: Bit<Self, 37> = Bit::new();
    pub const TCF: Field<Self, 40, 41> = Field::new();
    pub const ATA: Bit<Self, 43> = Bit::new();
    pub const DSSBS: Bit<Self, 44> = Bit::new();
    pub const TMT: Bit<Self, 51> = Bit::new();
    pub const TME: Bit<Self, 53> = Bit::new();
    pub const NMI: Bit<Self, 61> = Bit::new();
    pub const SPINTMASK: Bit<Self, 62> = Bit::new();
}

impl CPTR {
    pub const EZ: Bit<Self, 8> = Bit::new();
    pub const TFP: Bit<Self, 10> = Bit::new();
    pub const ESM: Bit<Self, 12> = Bit::new();
    pub const TTA: Bit<Self, 20> = Bit::new();
    pub const TAM: Bit<Self, 30> = Bit::new();
    pub const TCPAC: Bit<Self, 31> = Bit::new();
}

impl DACR {
    pub const D0: Field<Self, 0, 1> = Field::new();
}

/// Floating-point exception control, AArch32 hard-float targets.
#[cfg(all(arm_isa = "a32", target_abi = "eabihf"))]
#[allow(clippy::upper_case_acronyms)]
pub struct FPEXC;

#[cfg(all(arm_isa = "a32", target_abi = "eabihf"))]
impl SysReg for FPEXC {
    const NAME: &'static str = "FPEXC";

    #[inline(always)]
    fn read() -> usize {
        let value: usize;
        unsafe {
            core::arch::asm!("vmrs {0}, fpexc", out(reg) value, options(nomem, nostack, preserves_flags));
        }
        value
    }

    #[inline(always)]
    fn write(value: usize) {
        unsafe {
            core::arch::asm!("vmsr fpexc, {0}", in(reg) value, options(nostack, preserves_flags));
        }
    }
}

#[cfg(all(arm_isa = "a32", target_abi = "eabihf"))]
impl FPEXC {
    pub const EN: Bit<Self, 30> = Bit::new();
}

/// TLB invalidate all (TLBIALL), AArch32.
#[cfg(arm_isa = "a32")]
#[inline(always)]
pub fn tlbiall() {
    unsafe { mcr!(0; p15, 0, c8, c7, 0) }
}

/// Instruction cache invalidate all to PoU (ICIALLU), AArch32.
#[cfg(arm_isa = "a32")]
#[inline(always)]
pub fn iciallu() {
    unsafe { mcr!(0; p15, 0, c7, c5, 0) }
}

/// Clean and invalidate data cache line by set/way (DCCISW), AArch32.
#[cfg(arm_isa = "a32")]
#[inline(always)]
pub fn dccisw(setway: usize) {
    unsafe { mcr!(setway; p15, 0, c7, c14, 2) }
}

/// Branch predictor invalidate all (BPIALL), AArch32.
#[cfg(arm_isa = "a32")]
#[inline(always)]
pub fn bpiall() {
    unsafe { mcr!(0; p15, 0, c7, c5, 6) }
}
