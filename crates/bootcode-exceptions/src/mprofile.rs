//! M-profile vector table and fault handlers.
//!
//! Hardware stacks r0-r3, r12, lr, pc and xPSR before entering a handler, so
//! handlers are plain functions. The fault entries go through a short stub
//! that passes the stacked frame (MSP or PSP, per EXC_RETURN bit 2).

use core::mem::size_of;
use core::ptr::{self, addr_of};

use sysreg::{SysReg, BFAR, CFSR, HFSR, ICSR, ICTR, MMFAR, NVIC_ICER, SFAR, SFSR, SYST_CSR, VTOR};

use crate::output::{CharOut, Fmt, Semihost};
use crate::thumb;
use crate::tick;
use crate::vtor::{self, Installed};

/// Frame pushed by hardware on exception entry.
#[repr(C)]
pub struct ExceptionFrame {
    pub r0: u32,
    pub r1: u32,
    pub r2: u32,
    pub r3: u32,
    pub r12: u32,
    pub lr: u32,
    pub pc: u32,
    pub xpsr: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub union Vector {
    handler: unsafe extern "C" fn(),
    stack: *const u8,
}

#[repr(C, align(1024))]
pub struct VectorTable(pub [Vector; 16]);

// Only read by hardware.
unsafe impl Sync for VectorTable {}

extern "C" {
    static __stack: u8;
    fn _start();
    fn __hardfault_entry();
    fn __memmanage_entry();
    fn __busfault_entry();
    fn __usagefault_entry();
    fn __securefault_entry();
}

const fn handler(f: unsafe extern "C" fn()) -> Vector {
    Vector { handler: f }
}

#[used]
#[no_mangle]
#[link_section = ".vectors"]
pub static __vector_table: VectorTable = VectorTable([
    Vector { stack: addr_of!(__stack) },
    handler(_start),
    handler(unexpected),              // NMI
    handler(__hardfault_entry),
    handler(__memmanage_entry),
    handler(__busfault_entry),
    handler(__usagefault_entry),
    handler(__securefault_entry),
    handler(unexpected),              // reserved
    handler(unexpected),              // reserved
    handler(unexpected),              // reserved
    handler(unexpected),              // SVCall
    handler(unexpected),              // DebugMonitor
    handler(unexpected),              // reserved
    handler(unexpected),              // PendSV
    handler(systick),
]);

core::arch::global_asm!(
    ".syntax unified",
    ".macro fault_entry name, handler",
    ".pushsection .text.\\name, \"ax\"",
    ".global \\name",
    ".thumb_func",
    "\\name:",
    "    movs    r0, #4",
    "    mov     r1, lr",
    "    tst     r0, r1",
    "    beq     1f",
    "    mrs     r0, psp",
    "    b       2f",
    "1:  mrs     r0, msp",
    "2:  ldr     r1, =\\handler",
    "    bx      r1",
    ".ltorg",
    ".popsection",
    ".endm",
    "fault_entry __hardfault_entry, {hardfault}",
    "fault_entry __memmanage_entry, {memmanage}",
    "fault_entry __busfault_entry, {busfault}",
    "fault_entry __usagefault_entry, {usagefault}",
    "fault_entry __securefault_entry, {securefault}",
    ".purgem fault_entry",
    hardfault = sym on_hardfault,
    memmanage = sym on_memmanage,
    busfault = sym on_busfault,
    usagefault = sym on_usagefault,
    securefault = sym on_securefault,
);

pub fn setup() {
    let table = addr_of!(__vector_table) as usize;
    let installed = vtor::install::<VTOR>(table, |dest| unsafe {
        ptr::copy_nonoverlapping(table as *const u8, dest as *mut u8, size_of::<VectorTable>());
    });
    match installed {
        Ok(Installed::Pointed(at)) => debug::writeln!("[BOOT] exceptions: VTOR = {:#x}", at),
        Ok(Installed::AtZero) => debug::writeln!("[BOOT] exceptions: VTOR fixed at 0"),
        Ok(Installed::Copied(to)) => debug::writeln!("[BOOT] exceptions: table copied to {:#x}", to),
        Err(e) => {
            let _ = core::fmt::Write::write_fmt(&mut Fmt(&mut Semihost), format_args!("{e}\n"));
            semihost::abort()
        }
    }

    // Without these the configurable faults escalate to HardFault and
    // lose their status detail.
    #[cfg(not(arm_arch = "6"))]
    {
        use sysreg::SHCSR;

        SHCSR::MEMFAULTENA.set(1);
        SHCSR::BUSFAULTENA.set(1);
        SHCSR::USGFAULTENA.set(1);
        SHCSR::SECUREFAULTENA.set(1);
    }

    // Stack alignment on entry is only optional on v7-M.
    #[cfg(arm_arch = "7")]
    sysreg::CCR::STKALIGN.set(1);

    disable_interrupt_lines();

    SYST_CSR::ENABLE.set(0);
    SYST_CSR::TICKINT.set(0);
    ICSR::PENDSTCLR.set(1);
    ICSR::PENDSVCLR.set(1);
}

/// Write all-ones to every implemented clear-enable word.
fn disable_interrupt_lines() {
    // Armv6-M has no ICTR and at most 32 lines.
    let last = if cfg!(arm_arch = "6") {
        0
    } else {
        ICTR::INTLINESNUM.get()
    };
    for line in (0..=last).rev() {
        NVIC_ICER.write(line, 0xffff_ffff);
    }
}

unsafe extern "C" fn systick() {
    tick::on_tick();
}

unsafe extern "C" fn unexpected() {
    let out = &mut Semihost;
    out.put_str("CPU Exception: unexpected vector ");
    out.put_hex(ICSR::VECTACTIVE.get() as u64, 3, false);
    out.put_char(b'\n');
    semihost::abort()
}

/// Armv6-M has no fault status registers, so there is nothing to rule the
/// PC out with.
fn pc_readable() -> bool {
    if cfg!(arm_arch = "6") {
        true
    } else {
        thumb::pc_readable(CFSR::read() as u32, HFSR::read() as u32)
    }
}

fn report(out: &mut Semihost, what: &str, frame: &ExceptionFrame, fields: &[(&str, u32)]) -> ! {
    out.put_str("CPU Exception: ");
    out.put_str(what);
    out.put_str("\n  PC = 0x");
    out.put_hex32(frame.pc);
    out.put_char(b'\n');
    for (name, value) in fields {
        out.put_str("  ");
        out.put_str(name);
        out.put_str(" = 0x");
        out.put_hex32(*value);
        out.put_char(b'\n');
    }

    if pc_readable() {
        let pc = (frame.pc & !1) as *const u16;
        let first = unsafe { ptr::read_volatile(pc) };
        thumb::print_instruction(out, first, || unsafe { ptr::read_volatile(pc.add(1)) });
    }
    semihost::abort()
}

unsafe extern "C" fn on_hardfault(frame: *const ExceptionFrame) -> ! {
    let hfsr = HFSR::read() as u32;
    report(&mut Semihost, "HardFault", &*frame, &[("HFSR", hfsr)])
}

unsafe extern "C" fn on_memmanage(frame: *const ExceptionFrame) -> ! {
    let (mmfsr, mmfar) = (CFSR::MMFSR.get() as u32, MMFAR::read() as u32);
    report(
        &mut Semihost,
        "MemManage",
        &*frame,
        &[("CFSR.MemManage", mmfsr), ("MMFAR", mmfar)],
    )
}

unsafe extern "C" fn on_busfault(frame: *const ExceptionFrame) -> ! {
    let (bfsr, bfar) = (CFSR::BFSR.get() as u32, BFAR::read() as u32);
    report(
        &mut Semihost,
        "BusFault",
        &*frame,
        &[("CFSR.BusFault", bfsr), ("BFAR", bfar)],
    )
}

unsafe extern "C" fn on_usagefault(frame: *const ExceptionFrame) -> ! {
    let ufsr = CFSR::UFSR.get() as u32;
    report(&mut Semihost, "UsageFault", &*frame, &[("CFSR.UsageFault", ufsr)])
}

unsafe extern "C" fn on_securefault(frame: *const ExceptionFrame) -> ! {
    let (sfsr, sfar) = (SFSR::read() as u32, SFAR::read() as u32);
    report(&mut Semihost, "SecureFault", &*frame, &[("SFSR", sfsr), ("SFAR", sfar)])
}
