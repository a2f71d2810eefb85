//! Vector table base register probing.
//!
//! Whether VTOR is writable, and how many low bits are implemented, is up to
//! the implementation. Probing writes the top bit and reads it back.

use sysreg::SysReg;

pub const PROBE: usize = 0x8000_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Installed {
    /// VTOR now points at the table.
    Pointed(usize),
    /// VTOR is hardwired to zero; the table is expected to be linked there.
    AtZero,
    /// VTOR is hardwired elsewhere; the table was copied to that address.
    Copied(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VectorInstallError {
    #[error("Bootcode failed to set VTOR: wrote {requested:#x}, read back {actual:#x}")]
    Rejected { requested: usize, actual: usize },
}

/// Point `R` at `table`, or copy the table to wherever `R` is hardwired.
/// `copy_to` receives the destination address.
pub fn install<R: SysReg>(
    table: usize,
    copy_to: impl FnOnce(usize),
) -> Result<Installed, VectorInstallError> {
    R::write(PROBE);
    let probed = R::read();

    if probed != PROBE {
        if probed == 0 {
            return Ok(Installed::AtZero);
        }
        copy_to(probed);
        return Ok(Installed::Copied(probed));
    }

    R::write(table);
    let actual = R::read();
    if actual != table {
        return Err(VectorInstallError::Rejected {
            requested: table,
            actual,
        });
    }
    Ok(Installed::Pointed(table))
}
