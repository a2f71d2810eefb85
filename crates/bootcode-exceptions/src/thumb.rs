//! Thumb instruction printing for M-profile fault reports.

use crate::output::CharOut;

/// A first half-word with `[15:13] == 0b111` and `[12:11] != 0b00` starts a
/// 32-bit encoding.
pub const fn is_wide(first: u16) -> bool {
    (first & 0xe000) == 0xe000 && (first & 0x1800) != 0
}

// CFSR
const IACCVIOL: u32 = 1 << 0;
const MUNSTKERR: u32 = 1 << 3;
const MSTKERR: u32 = 1 << 4;
const IBUSERR: u32 = 1 << 8;
const UNSTKERR: u32 = 1 << 11;
const STKERR: u32 = 1 << 12;
// HFSR
const VECTTBL: u32 = 1 << 1;

/// Whether the stacked PC can be dereferenced from a fault handler.
///
/// Instruction fetch faults and vector table reads fault at the PC itself.
/// Stacking faults leave the frame, and so the PC, unreliable. A forced
/// HardFault keeps the escalated fault's CFSR bits, so it is covered too.
pub const fn pc_readable(cfsr: u32, hfsr: u32) -> bool {
    const FETCH: u32 = IACCVIOL | IBUSERR;
    const STACKING: u32 = MUNSTKERR | MSTKERR | UNSTKERR | STKERR;
    cfsr & (FETCH | STACKING) == 0 && hfsr & VECTTBL == 0
}

/// Print the instruction at the faulting PC as one or two half-words, in
/// architectural order. `second` is only read for 32-bit encodings.
pub fn print_instruction(out: &mut dyn CharOut, first: u16, second: impl FnOnce() -> u16) {
    out.put_str("  Faulting instruction: ");
    out.put_hex(first as u64, 4, true);
    if is_wide(first) {
        out.put_char(b' ');
        out.put_hex(second() as u64, 4, true);
    }
    out.put_char(b'\n');
}
