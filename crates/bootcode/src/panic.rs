use core::fmt::Write;
use core::panic::PanicInfo;

use exceptions::output::{Fmt, Semihost};

/// Contract violations (an out-of-range register set index, for one) end
/// up here. Nothing is resumable, so report and stop.
#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let _ = writeln!(Fmt(&mut Semihost), "{info}");
    semihost::abort()
}
