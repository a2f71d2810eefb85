use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use semihost::{Handle, OpenMode};

const CLOSED: usize = usize::MAX;

static STDIN: AtomicUsize = AtomicUsize::new(CLOSED);
static STDOUT: AtomicUsize = AtomicUsize::new(CLOSED);
static STDERR: AtomicUsize = AtomicUsize::new(CLOSED);

/// Open `:tt` for reading, writing and appending (stdin, stdout, stderr).
/// Returns how many handles the host granted.
pub(crate) fn init() -> usize {
    let mut opened = 0;
    for (slot, mode) in [
        (&STDIN, OpenMode::Read),
        (&STDOUT, OpenMode::Write),
        (&STDERR, OpenMode::Append),
    ] {
        if let Some(handle) = semihost::open(c":tt", mode) {
            slot.store(handle.0, Ordering::Relaxed);
            opened += 1;
        }
    }
    opened
}

fn load(slot: &AtomicUsize) -> Option<Handle> {
    match slot.load(Ordering::Relaxed) {
        CLOSED => None,
        raw => Some(Handle(raw)),
    }
}

pub fn stdin() -> Option<Handle> {
    load(&STDIN)
}

pub fn stdout() -> Option<Handle> {
    load(&STDOUT)
}

pub fn stderr() -> Option<Handle> {
    load(&STDERR)
}

/// `core::fmt` sink for a console handle. Falls back to per-character
/// output when the handle was never opened.
pub struct Console(pub Option<Handle>);

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.0 {
            Some(handle) => match semihost::write(handle, s.as_bytes()) {
                0 => Ok(()),
                _ => Err(fmt::Error),
            },
            None => {
                semihost::write_str(s);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_host_has_no_console() {
        assert_eq!(init(), 0);
        assert_eq!(stdin(), None);
        assert_eq!(stdout(), None);
        assert_eq!(stderr(), None);
        assert!(write!(Console(stdout()), "ok").is_ok());
    }
}
