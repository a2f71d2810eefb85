//! Dependency-free diagnostic output.

use core::fmt;

/// Character sink used by fault reports. Object safe so decoders can take
/// `&mut dyn CharOut`.
pub trait CharOut {
    fn put_char(&mut self, c: u8);

    fn put_str(&mut self, s: &str) {
        for b in s.bytes() {
            self.put_char(b);
        }
    }

    /// Lowercase hex of the low `digits` nibbles of `value`. Without
    /// `leading_zeros` at least one digit is still printed.
    fn put_hex(&mut self, value: u64, digits: u32, leading_zeros: bool) {
        let mut started = leading_zeros;
        for digit in (0..digits).rev() {
            let nibble = ((value >> (digit * 4)) & 0xf) as u8;
            if nibble == 0 && !started && digit != 0 {
                continue;
            }
            started = true;
            self.put_char(if nibble < 10 {
                b'0' + nibble
            } else {
                b'a' + nibble - 10
            });
        }
    }

    fn put_hex32(&mut self, value: u32) {
        self.put_hex(value as u64, 8, true);
    }

    fn put_hex64(&mut self, value: u64) {
        self.put_hex(value, 16, true);
    }
}

/// Semihosting `SYS_WRITEC`, one trap per character.
pub struct Semihost;

impl CharOut for Semihost {
    #[inline]
    fn put_char(&mut self, c: u8) {
        semihost::write_char(c);
    }
}

/// `core::fmt` bridge for printing `Display` values through a [`CharOut`].
pub struct Fmt<'a>(pub &'a mut dyn CharOut);

impl fmt::Write for Fmt<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.put_str(s);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::fmt::Write;

    #[derive(Default)]
    pub(crate) struct Capture(pub String);

    impl CharOut for Capture {
        fn put_char(&mut self, c: u8) {
            self.0.push(c as char);
        }
    }

    #[test]
    fn test_hex_with_and_without_leading_zeros() {
        let mut out = Capture::default();
        out.put_hex32(0xbeef);
        out.put_char(b' ');
        out.put_hex(0xbeef, 16, false);
        out.put_char(b' ');
        out.put_hex(0, 8, false);
        out.put_char(b' ');
        out.put_hex64(u64::MAX);
        assert_eq!(out.0, "0000beef beef 0 ffffffffffffffff");
    }

    #[test]
    fn test_fmt_bridge() {
        let mut out = Capture::default();
        write!(Fmt(&mut out), "{}-{:#x}", "vtor", 0x400).unwrap();
        assert_eq!(out.0, "vtor-0x400");
    }
}
