//! AArch64 vector table: sixteen 128-byte slots, each branching to one
//! reporting handler.

use core::ptr::addr_of;

use sysreg::barrier::isb;
use sysreg::{SysReg, ELR, ESR, FAR, VBAR};

use crate::output::Semihost;
use crate::syndrome::{self, FaultRecord};

core::arch::global_asm!(
    ".pushsection .vectors, \"ax\"",
    ".balign 2048",
    ".global __vector_table",
    "__vector_table:",
    ".rept 16",
    ".balign 128",
    "    b       {handler}",
    ".endr",
    ".popsection",
    handler = sym exception_handler,
);

extern "C" {
    static __vector_table: u8;
}

pub fn setup() {
    let table = addr_of!(__vector_table) as usize;
    VBAR::write(table);
    isb();
    debug::writeln!("[BOOT] exceptions: VBAR = {:#x}", table);
}

extern "C" fn exception_handler() -> ! {
    let record = FaultRecord {
        esr: ESR::read() as u64,
        elr: ELR::read() as u64,
        far: FAR::read() as u64,
    };

    syndrome::report(&mut Semihost, &record, |pc| unsafe {
        core::ptr::read_volatile(pc as *const u32)
    });
    semihost::abort()
}
