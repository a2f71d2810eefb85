//! Instruction-level register access.
//!
//! The register-name operand of `mrs`/`msr` and the coprocessor coordinates of
//! `mrc`/`mcr` must be spelled out in the instruction text, so each access is
//! generated from literals at the call site. Callers are expected to gate every
//! use behind the matching `arm_isa` cfg.

#![no_std]

/// Read an AArch64 system register. The name is given in pieces which are
/// concatenated, e.g. `mrs!("SCTLR", "_EL2")`.
#[macro_export]
macro_rules! mrs {
    ($($part:literal),+ $(,)?) => {{
        let value: usize;
        // SAFETY: reading a system register has no memory side effects.
        unsafe {
            ::core::arch::asm!(
                concat!("mrs {0}, ", $($part),+),
                out(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        value
    }};
}

/// Write an AArch64 system register.
#[macro_export]
macro_rules! msr {
    ($value:expr; $($part:literal),+ $(,)?) => {{
        let value: usize = $value;
        ::core::arch::asm!(
            concat!("msr ", $($part),+, ", {0}"),
            in(reg) value,
            options(nostack, preserves_flags),
        );
    }};
}

/// Read an AArch32 coprocessor register: `mrc!(p15, 0, c1, c0, 0)`.
#[macro_export]
macro_rules! mrc {
    ($cp:ident, $op1:literal, $crn:ident, $crm:ident, $op2:literal) => {{
        let value: usize;
        // SAFETY: reading a coprocessor register has no memory side effects.
        unsafe {
            ::core::arch::asm!(
                concat!(
                    "mrc ", stringify!($cp), ", ", stringify!($op1), ", {0}, ",
                    stringify!($crn), ", ", stringify!($crm), ", ", stringify!($op2)
                ),
                out(reg) value,
                options(nomem, nostack, preserves_flags),
            );
        }
        value
    }};
}

/// Write an AArch32 coprocessor register: `mcr!(value; p15, 0, c1, c0, 0)`.
#[macro_export]
macro_rules! mcr {
    ($value:expr; $cp:ident, $op1:literal, $crn:ident, $crm:ident, $op2:literal) => {{
        let value: usize = $value;
        ::core::arch::asm!(
            concat!(
                "mcr ", stringify!($cp), ", ", stringify!($op1), ", {0}, ",
                stringify!($crn), ", ", stringify!($crm), ", ", stringify!($op2)
            ),
            in(reg) value,
            options(nostack, preserves_flags),
        );
    }};
}

/// Emit a sequence of instructions with no operands, e.g. `asm_seq!("dsb sy", "isb")`.
#[macro_export]
macro_rules! asm_seq {
    ($($insn:literal),+ $(,)?) => {
        ::core::arch::asm!(
            $($insn),+,
            options(nostack, preserves_flags),
        )
    };
}
