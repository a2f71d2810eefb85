//! AArch32 A/R-profile vector table.
//!
//! Eight `ldr pc, [pc, #24]` slots pick their target from the address words
//! that follow, so the 64-byte block is position independent and can be
//! copied to address 0 on R-profile. Each entry stub hands the preferred
//! return address to its handler in r0.

use core::ptr::addr_of;

use sysreg::mode;

use crate::output::{CharOut, Semihost};

core::arch::global_asm!(
    ".pushsection .vectors, \"ax\"",
    ".arm",
    ".balign 32",
    ".global __vector_table",
    "__vector_table:",
    ".rept 8",
    "    ldr     pc, [pc, #24]",
    ".endr",
    "    .word   _start",
    "    .word   __undef_entry",
    "    .word   __svc_entry",
    "    .word   __pabt_entry",
    "    .word   __dabt_entry",
    "    .word   __hyp_entry",
    "    .word   __irq_entry",
    "    .word   __fiq_entry",
    "",
    "__undef_entry:",
    "    sub     r0, lr, #4",
    "    ldr     pc, ={undef}",
    "__svc_entry:",
    "    sub     r0, lr, #4",
    "    ldr     pc, ={svc}",
    "__pabt_entry:",
    "    sub     r0, lr, #4",
    "    ldr     pc, ={pabt}",
    "__dabt_entry:",
    "    sub     r0, lr, #8",
    "    ldr     pc, ={dabt}",
    "__hyp_entry:",
    "    mov     r0, lr",
    "    ldr     pc, ={hyp}",
    "__irq_entry:",
    "    sub     r0, lr, #4",
    "    ldr     pc, ={irq}",
    "__fiq_entry:",
    "    sub     r0, lr, #4",
    "    ldr     pc, ={fiq}",
    ".ltorg",
    ".popsection",
    undef = sym on_undefined,
    svc = sym on_supervisor_call,
    pabt = sym on_prefetch_abort,
    dabt = sym on_data_abort,
    hyp = sym on_hyp_trap,
    irq = sym on_irq,
    fiq = sym on_fiq,
);

extern "C" {
    static __vector_table: u8;
}

#[cfg(arm_profile = "a")]
pub fn setup() {
    use sysreg::{barrier::isb, SysReg, VBAR};

    let table = addr_of!(__vector_table) as usize;
    VBAR::write(table);
    isb();
    debug::writeln!("[BOOT] exceptions: VBAR = {:#x}", table);
}

/// R-profile fetches vectors from address 0 (SCTLR.V = 0).
#[cfg(arm_profile = "r")]
pub fn setup() {
    const TABLE_BYTES: usize = 64;

    let table = addr_of!(__vector_table) as usize;
    // Word copy in asm: a Rust store to address 0 would be undefined.
    unsafe {
        core::arch::asm!(
            "1:",
            "ldr     {tmp}, [{src}], #4",
            "str     {tmp}, [{dst}], #4",
            "subs    {n}, {n}, #1",
            "bne     1b",
            src = inout(reg) table => _,
            dst = inout(reg) 0usize => _,
            n = inout(reg) TABLE_BYTES / 4 => _,
            tmp = out(reg) _,
            options(nostack),
        );
    }
    sysreg::barrier::dsb();
    sysreg::barrier::isb();
    debug::writeln!("[BOOT] exceptions: table copied to 0");
}

fn header(out: &mut Semihost, what: &str, pc: usize) {
    out.put_str("CPU Exception: ");
    out.put_str(what);
    out.put_str("\n  PC = 0x");
    out.put_hex32(pc as u32);
    out.put_char(b'\n');
}

fn field(out: &mut Semihost, name: &str, value: usize) {
    out.put_str("  ");
    out.put_str(name);
    out.put_str(" = 0x");
    out.put_hex32(value as u32);
    out.put_char(b'\n');
}

extern "C" fn on_undefined(pc: usize) -> ! {
    let out = &mut Semihost;
    header(out, "Undefined Instruction", pc);
    field(out, "Instruction", unsafe { core::ptr::read_volatile(pc as *const u32) } as usize);
    semihost::abort()
}

extern "C" fn on_supervisor_call(pc: usize) -> ! {
    header(&mut Semihost, "SVC, HVC or SMC", pc);
    semihost::abort()
}

extern "C" fn on_prefetch_abort(pc: usize) -> ! {
    use sysreg::{SysReg, IFAR, IFSR};

    let (ifsr, ifar) = (IFSR::read(), IFAR::read());
    let out = &mut Semihost;
    header(out, "Prefetch Abort", pc);
    field(out, "IFSR", ifsr);
    field(out, "IFAR", ifar);
    semihost::abort()
}

extern "C" fn on_data_abort(pc: usize) -> ! {
    use sysreg::{SysReg, DFAR, DFSR};

    let (dfsr, dfar) = (DFSR::read(), DFAR::read());
    let out = &mut Semihost;
    header(out, "Data Abort", pc);
    field(out, "DFSR", dfsr);
    field(out, "DFAR", dfar);
    semihost::abort()
}

/// HSR is only accessible from Hyp mode; elsewhere the slot is unused.
extern "C" fn on_hyp_trap(pc: usize) -> ! {
    let in_hyp = sysreg::cpsr_mode() == mode::HYP;
    let out = &mut Semihost;
    header(out, "Hypervisor Trap", pc);
    if in_hyp {
        use sysreg::{SysReg, HSR};
        field(out, "HSR", HSR::read());
    }
    semihost::abort()
}

extern "C" fn on_irq(pc: usize) -> ! {
    header(&mut Semihost, "IRQ", pc);
    semihost::abort()
}

extern "C" fn on_fiq(pc: usize) -> ! {
    header(&mut Semihost, "FIQ", pc);
    semihost::abort()
}
