//! Boot tracing.
//!
//! `debug::writeln!("[BOOT] ...")` prints through semihosting when the `debug`
//! feature is on and compiles to nothing otherwise. Arguments are still
//! type-checked in the disabled build.

#![cfg_attr(not(test), no_std)]

cfg_if::cfg_if! {
    if #[cfg(feature = "debug")] {
        pub const ENABLED: bool = true;

        #[doc(hidden)]
        pub fn _print(args: core::fmt::Arguments) {
            let _ = core::fmt::Write::write_fmt(&mut semihost::Console, args);
        }
    } else {
        pub const ENABLED: bool = false;
    }
}

// Exported macros stay at the top level so `crate::writeln!` resolves.

#[cfg(feature = "debug")]
#[macro_export]
macro_rules! write {
    ($($arg:tt)*) => {
        $crate::_print(::core::format_args!($($arg)*))
    };
}

#[cfg(feature = "debug")]
#[macro_export]
macro_rules! writeln {
    () => {
        $crate::_print(::core::format_args!("\n"))
    };
    ($($arg:tt)*) => {{
        $crate::_print(::core::format_args!($($arg)*));
        $crate::_print(::core::format_args!("\n"));
    }};
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! write {
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! writeln {
    () => {{}};
    ($($arg:tt)*) => {{
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    #[test]
    fn test_macros_accept_format_arguments() {
        let stage = "memory";
        crate::writeln!("[BOOT] {}", stage);
        crate::write!("[BOOT] {stage} at {:#x}", 0x8000_0000usize);
        crate::writeln!();
        crate::writeln!("[BOOT] done");
    }

    #[test]
    fn test_arguments_evaluated_only_when_enabled() {
        let calls = Cell::new(0);
        let stage = || {
            calls.set(calls.get() + 1);
            "exceptions"
        };
        crate::writeln!("[BOOT] {}", stage());
        assert_eq!(calls.get(), usize::from(crate::ENABLED));
    }
}
