//! AArch64 exception syndrome decoding.
//!
//! The report is table driven: `ESR.EC` indexes [`EXCEPTION_CLASSES`], which
//! gives a description and optionally a class-specific decoder. Nothing here
//! touches memory except through the caller's instruction reader, which is
//! only invoked when the faulting PC is known to be fetchable.

use crate::output::CharOut;

/// Syndrome state captured on entry, before anything else runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaultRecord {
    pub esr: u64,
    pub elr: u64,
    pub far: u64,
}

impl FaultRecord {
    /// Exception class, `ESR[31:26]`.
    pub const fn class(&self) -> u8 {
        ((self.esr >> 26) & 0x3f) as u8
    }

    /// Instruction aborts and PC alignment faults mean ELR itself is the
    /// bad address.
    pub const fn instruction_readable(&self) -> bool {
        !matches!(self.class(), 0x20..=0x22)
    }
}

pub type Decoder = fn(&mut dyn CharOut, &FaultRecord);

#[derive(Clone, Copy)]
pub struct ClassInfo {
    pub description: Option<&'static str>,
    pub decode: Option<Decoder>,
}

const fn none() -> ClassInfo {
    ClassInfo {
        description: None,
        decode: None,
    }
}

const fn named(description: &'static str) -> ClassInfo {
    ClassInfo {
        description: Some(description),
        decode: None,
    }
}

const fn decoded(description: &'static str, decode: Decoder) -> ClassInfo {
    ClassInfo {
        description: Some(description),
        decode: Some(decode),
    }
}

pub static EXCEPTION_CLASSES: [ClassInfo; 64] = {
    let mut table = [none(); 64];
    table[0x00] = named("Unknown (probably undefined instruction)");
    table[0x01] = named("Trapped WF*");
    table[0x07] = named("Trapped floating-point operation");
    table[0x09] = named("Trapped PAuth");
    table[0x0a] = named("Exception from LD64B or ST64B");
    table[0x0d] = named("Branch target exception (BTI)");
    table[0x0e] = named("Illegal Execution state");
    table[0x15] = named("SVC");
    table[0x16] = named("HVC");
    table[0x17] = named("SMC");
    table[0x18] = named("Trapped MSR, MRS, or System");
    table[0x19] = named("Trapped SVE");
    table[0x1b] = named("Exception from TSTART");
    table[0x1c] = named("Pointer Authentication failure");
    table[0x1d] = named("Trapped SME");
    table[0x1e] = named("Granule Protection Check failure");
    table[0x20] = named("Instruction Abort (lower exception level)");
    table[0x21] = named("Instruction Abort (same exception level)");
    table[0x22] = named("PC alignment fault");
    table[0x24] = decoded("Data Abort (lower exception level)", data_abort);
    table[0x25] = decoded("Data Abort (same exception level)", data_abort);
    table[0x26] = named("SP alignment fault");
    table[0x27] = named("Memory Operation Exception");
    table[0x2c] = named("Trapped floating-point exception");
    table[0x2f] = named("SError");
    table[0x3c] = named("Breakpoint instruction executed");
    table
};

const FAULT_TYPES: [&str; 16] = [
    "Address size fault",
    "Translation fault",
    "Access flag fault",
    "Permission fault",
    "?",
    "Synchronous external abort",
    "?",
    "Synchronous parity or ECC error",
    "?",
    "Granule protection fault",
    "?",
    "?",
    "?",
    "?",
    "IMPLEMENTATION DEFINED",
    "RESERVED",
];

/// Name for data fault status codes that do not follow the type/level layout.
pub fn special_dfsc(dfsc: u8) -> Option<&'static str> {
    Some(match dfsc {
        0x10 => "Synchronous external abort, not on translation table walk",
        0x11 => "MTE tag check fault",
        0x13 => "Synchronous external abort, level -1",
        0x18 => "Synchronous parity or ECC error, not on translation table walk",
        0x1b => "Synchronous parity or ECC error, level -1",
        0x21 => "Alignment fault",
        0x23 => "Granule protection fault, level -1",
        0x29 => "Address size fault, level -1",
        0x2b => "Translation fault, level -1",
        0x30 => "TLB conflict abort",
        0x31 => "Unsupported atomic hardware update fault",
        _ => return None,
    })
}

/// `ESR.ISS.DFSC` breakdown for data aborts.
pub fn data_abort(out: &mut dyn CharOut, record: &FaultRecord) {
    let dfsc = (record.esr & 0x3f) as u8;
    out.put_str("  ");
    match special_dfsc(dfsc) {
        Some(text) => out.put_str(text),
        None => {
            out.put_str(FAULT_TYPES[(dfsc >> 2) as usize]);
            out.put_str(", level ");
            out.put_char(b'0' + (dfsc & 0x3));
        }
    }
    out.put_char(b'\n');

    #[cfg(all(arm_isa = "a64", target_feature = "mte"))]
    if dfsc == 0x11 {
        out.put_str("  MTE allocation tag at faulting address: 0x");
        out.put_hex(allocation_tag(record.far), 1, false);
        out.put_char(b'\n');
    }
}

/// Allocation tag of the granule holding `addr`.
#[cfg(all(arm_isa = "a64", target_feature = "mte"))]
fn allocation_tag(addr: u64) -> u64 {
    let mut tagged = addr & !0xf;
    unsafe {
        core::arch::asm!("ldg {0}, [{0}]", inout(reg) tagged, options(nostack, readonly, preserves_flags));
    }
    (tagged >> 56) & 0xf
}

/// Print the full report. `read_instruction` is given ELR and is called only
/// when the class says the PC can be fetched; the header lines are out before
/// that load, so a bad ELR still leaves a useful report behind.
pub fn report(
    out: &mut dyn CharOut,
    record: &FaultRecord,
    read_instruction: impl FnOnce(u64) -> u32,
) {
    out.put_str("CPU Exception:\n");
    out.put_str("  ESR = 0x");
    out.put_hex64(record.esr);
    out.put_str("\n  ELR = 0x");
    out.put_hex64(record.elr);
    out.put_str("\n  FAR = 0x");
    out.put_hex64(record.far);
    out.put_char(b'\n');

    let class = record.class();
    let info = &EXCEPTION_CLASSES[class as usize];

    out.put_str("Fault description: ");
    match info.description {
        Some(text) => {
            out.put_str(text);
            out.put_char(b'\n');
        }
        None => {
            out.put_str("Unknown (EC=0x");
            out.put_hex(class as u64, 2, false);
            out.put_str(")\n");
        }
    }

    if let Some(decode) = info.decode {
        decode(out, record);
    }

    if record.instruction_readable() {
        out.put_str("  Faulting instruction = 0x");
        out.put_hex32(read_instruction(record.elr));
        out.put_char(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::Capture;
    use proptest::prelude::*;

    fn esr(class: u64, iss: u64) -> u64 {
        (class << 26) | (1 << 25) | iss
    }

    fn run(record: FaultRecord) -> (String, u32) {
        let mut out = Capture::default();
        let mut reads = 0;
        report(&mut out, &record, |_| {
            reads += 1;
            0xd4200000
        });
        (out.0, reads)
    }

    #[test]
    fn test_data_abort_translation_fault_level() {
        let (text, reads) = run(FaultRecord { esr: esr(0x25, 0x06), elr: 0x8_0000, far: 0 });
        assert_eq!(
            text,
            "CPU Exception:\n\
             \x20 ESR = 0x0000000096000006\n\
             \x20 ELR = 0x0000000000080000\n\
             \x20 FAR = 0x0000000000000000\n\
             Fault description: Data Abort (same exception level)\n\
             \x20 Translation fault, level 2\n\
             \x20 Faulting instruction = 0xd4200000\n"
        );
        assert_eq!(reads, 1);
    }

    #[test]
    fn test_special_dfsc_codes() {
        let (text, _) = run(FaultRecord { esr: esr(0x24, 0x21), elr: 0, far: 0 });
        assert!(text.contains("  Alignment fault\n"));
        let (text, _) = run(FaultRecord { esr: esr(0x24, 0x2b), elr: 0, far: 0 });
        assert!(text.contains("  Translation fault, level -1\n"));
        let (text, _) = run(FaultRecord { esr: esr(0x24, 0x38), elr: 0, far: 0 });
        assert!(text.contains("  IMPLEMENTATION DEFINED, level 0\n"));
    }

    #[test]
    fn test_unknown_class_prints_code_without_decoder() {
        let (text, _) = run(FaultRecord { esr: esr(0x2a, 0x06), elr: 0, far: 0 });
        assert!(text.contains("Fault description: Unknown (EC=0x2a)\n"));
        assert!(!text.contains("level"));
    }

    #[test]
    fn test_instruction_abort_never_reads_pc() {
        for class in [0x20, 0x21, 0x22] {
            let (text, reads) = run(FaultRecord { esr: esr(class, 0), elr: 0, far: 0 });
            assert_eq!(reads, 0);
            assert!(!text.contains("Faulting instruction"));
        }
    }

    #[test]
    fn test_table_shape() {
        let described = EXCEPTION_CLASSES.iter().filter(|c| c.description.is_some()).count();
        let decoded = EXCEPTION_CLASSES.iter().filter(|c| c.decode.is_some()).count();
        assert_eq!(described, 26);
        assert_eq!(decoded, 2);
    }

    proptest! {
        #[test]
        fn test_any_record_reports_without_touching_memory(esr in any::<u64>(), elr in any::<u64>(), far in any::<u64>()) {
            let record = FaultRecord { esr, elr, far };
            let (text, reads) = run(record);
            prop_assert!(text.starts_with("CPU Exception:\n"));
            prop_assert!(text.contains("Fault description: "));
            prop_assert_eq!(reads == 1, record.instruction_readable());
            let class = record.class() as usize;
            if EXCEPTION_CLASSES[class].description.is_none() {
                let expected = format!("Unknown (EC=0x{:x})", class);
                prop_assert!(text.contains(&expected));
            }
        }
    }
}
