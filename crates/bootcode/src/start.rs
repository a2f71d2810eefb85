//! Reset entry. The only code that runs without a valid stack.

use core::arch::naked_asm;

/// # Safety
/// Entered by hardware (or the reset vector) only.
#[cfg(arm_isa = "a64")]
#[unsafe(naked)]
#[no_mangle]
#[link_section = ".text.boot"]
pub unsafe extern "C" fn _start() -> ! {
    naked_asm!(
        "   ldr     x0, =__stack",
        "   mov     sp, x0",
        "   bl      {startup}",
        "   b       .",
        ".ltorg",
        startup = sym crate::__startup,
    )
}

/// # Safety
/// Entered by hardware (or the reset vector) only.
///
/// Armv8 AArch32 cores may come out of reset in Hyp mode; drop to SVC, which
/// is where older cores start, before anything else.
#[cfg(all(arm_isa = "a32", arm_arch = "8"))]
#[unsafe(naked)]
#[no_mangle]
#[link_section = ".text.boot"]
#[instruction_set(arm::a32)]
pub unsafe extern "C" fn _start() -> ! {
    naked_asm!(
        "   mrs     r0, cpsr",
        "   and     r0, r0, #0x1f",
        "   cmp     r0, #0x1a",
        "   bne     1f",
        "   adr     r0, 1f",
        "   msr     ELR_hyp, r0",
        "   mov     r0, #0x13",
        "   msr     SPSR_hyp, r0",
        "   eret",
        "1:",
        "   ldr     r0, =__stack",
        "   mov     sp, r0",
        "   bl      {startup}",
        "   b       .",
        ".ltorg",
        startup = sym crate::__startup,
    )
}

/// # Safety
/// Entered by hardware (or the reset vector) only.
#[cfg(all(arm_isa = "a32", not(arm_arch = "8")))]
#[unsafe(naked)]
#[no_mangle]
#[link_section = ".text.boot"]
#[instruction_set(arm::a32)]
pub unsafe extern "C" fn _start() -> ! {
    naked_asm!(
        "   ldr     r0, =__stack",
        "   mov     sp, r0",
        "   bl      {startup}",
        "   b       .",
        ".ltorg",
        startup = sym crate::__startup,
    )
}

/// # Safety
/// Entered by hardware (or the reset vector) only. The core has already
/// loaded SP from the vector table; it is set again so a debugger jump to
/// `_start` behaves the same.
#[cfg(arm_isa = "t32")]
#[unsafe(naked)]
#[no_mangle]
#[link_section = ".text.boot"]
pub unsafe extern "C" fn _start() -> ! {
    naked_asm!(
        "   ldr     r0, =__stack",
        "   mov     sp, r0",
        "   bl      {startup}",
        "   b       .",
        ".ltorg",
        startup = sym crate::__startup,
    )
}
