//! M-profile System Control Space registers.
//!
//! These are plain 32-bit device registers, so access is a volatile load or
//! store at a fixed address.

use core::ptr;

use crate::{Bit, Field, RegisterSet, SysReg};

macro_rules! mmio {
    ($(
        $(#[$attr:meta])*
        $name:ident @ $addr:literal;
    )*) => {$(
        $(#[$attr])*
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        pub struct $name;

        impl $name {
            pub const ADDRESS: usize = $addr;
        }

        impl SysReg for $name {
            const NAME: &'static str = stringify!($name);

            #[inline(always)]
            fn read() -> usize {
                unsafe { ptr::read_volatile(Self::ADDRESS as *const u32) as usize }
            }

            #[inline(always)]
            fn write(value: usize) {
                unsafe { ptr::write_volatile(Self::ADDRESS as *mut u32, value as u32) }
            }
        }
    )*};
}

mmio! {
    /// Interrupt Controller Type.
    ICTR @ 0xE000_E004;
    SYST_CSR @ 0xE000_E010;
    SYST_RVR @ 0xE000_E014;
    SYST_CVR @ 0xE000_E018;
    SYST_CALIB @ 0xE000_E01C;
    CPUID @ 0xE000_ED00;
    ICSR @ 0xE000_ED04;
    VTOR @ 0xE000_ED08;
    CCR @ 0xE000_ED14;
    SHCSR @ 0xE000_ED24;
    CFSR @ 0xE000_ED28;
    HFSR @ 0xE000_ED2C;
    MMFAR @ 0xE000_ED34;
    BFAR @ 0xE000_ED38;
    CPACR @ 0xE000_ED88;
    NSACR @ 0xE000_ED8C;
    MPU_CTRL @ 0xE000_ED94;
    /// Secure Fault Status (Armv8-M Security Extension).
    SFSR @ 0xE000_EDE4;
    SFAR @ 0xE000_EDE8;
    FPCCR @ 0xE000_EF34;
}

/// NVIC Interrupt Clear-Enable registers, one bit per interrupt line.
pub const NVIC_ICER: RegisterSet<0xE000_E180, 4, 15> = unsafe { RegisterSet::new() };

impl ICTR {
    /// Number of implemented ICER words minus one.
    pub const INTLINESNUM: Field<Self, 0, 3> = Field::new();
}

impl SYST_CSR {
    pub const ENABLE: Bit<Self, 0> = Bit::new();
    pub const TICKINT: Bit<Self, 1> = Bit::new();
    pub const CLKSOURCE: Bit<Self, 2> = Bit::new();
    pub const COUNTFLAG: Bit<Self, 16> = Bit::new();
}

impl CPUID {
    pub const REVISION: Field<Self, 0, 3> = Field::new();
    pub const PARTNO: Field<Self, 4, 15> = Field::new();
    pub const ARCHITECTURE: Field<Self, 16, 19> = Field::new();
    pub const VARIANT: Field<Self, 20, 23> = Field::new();
    pub const IMPLEMENTER: Field<Self, 24, 31> = Field::new();
}

impl ICSR {
    pub const VECTACTIVE: Field<Self, 0, 8> = Field::new();
    pub const RETTOBASE: Bit<Self, 11> = Bit::new();
    pub const VECTPENDING: Field<Self, 12, 20> = Field::new();
    pub const ISRPENDING: Bit<Self, 22> = Bit::new();
    pub const PENDSTCLR: Bit<Self, 25> = Bit::new();
    pub const PENDSTSET: Bit<Self, 26> = Bit::new();
    pub const PENDSVCLR: Bit<Self, 27> = Bit::new();
    pub const PENDSVSET: Bit<Self, 28> = Bit::new();
    pub const NMIPENDSET: Bit<Self, 31> = Bit::new();
}

impl CCR {
    pub const UNALIGN_TRP: Bit<Self, 3> = Bit::new();
    pub const DIV_0_TRP: Bit<Self, 4> = Bit::new();
    pub const STKALIGN: Bit<Self, 9> = Bit::new();
    pub const DC: Bit<Self, 16> = Bit::new();
    pub const IC: Bit<Self, 17> = Bit::new();
    pub const BP: Bit<Self, 18> = Bit::new();
    pub const LOB: Bit<Self, 19> = Bit::new();
}

impl SHCSR {
    pub const MEMFAULTENA: Bit<Self, 16> = Bit::new();
    pub const BUSFAULTENA: Bit<Self, 17> = Bit::new();
    pub const USGFAULTENA: Bit<Self, 18> = Bit::new();
    pub const SECUREFAULTENA: Bit<Self, 19> = Bit::new();
}

impl CFSR {
    pub const MMFSR: Field<Self, 0, 7> = Field::new();
    pub const BFSR: Field<Self, 8, 15> = Field::new();
    pub const UFSR: Field<Self, 16, 31> = Field::new();
}

impl CPACR {
    pub const CP10: Field<Self, 20, 21> = Field::new();
    pub const CP11: Field<Self, 22, 23> = Field::new();
}

impl NSACR {
    pub const CP10: Bit<Self, 10> = Bit::new();
    pub const CP11: Bit<Self, 11> = Bit::new();
}

impl MPU_CTRL {
    pub const ENABLE: Bit<Self, 0> = Bit::new();
    pub const HFNMIENA: Bit<Self, 1> = Bit::new();
    pub const PRIVDEFENA: Bit<Self, 2> = Bit::new();
}

impl FPCCR {
    pub const LSPACT: Bit<Self, 0> = Bit::new();
    pub const LSPEN: Bit<Self, 30> = Bit::new();
    pub const ASPEN: Bit<Self, 31> = Bit::new();
}
