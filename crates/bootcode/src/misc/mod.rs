//! Capability setup that follows memory bring-up: FP/SIMD access, pointer
//! authentication, the PMU cycle-counter filter and banked stack pointers.

cfg_if::cfg_if! {
    if #[cfg(any(arm_profile = "a", arm_profile = "r"))] {
        mod aprofile;
        pub use aprofile::setup;
    } else if #[cfg(arm_profile = "m")] {
        mod mprofile;
        pub use mprofile::setup;
    }
}

/// Fixed, distinct pointer authentication keys (IA, IB, DA, DB, GA). Both
/// halves of a key get the same value. These make signed pointers
/// predictable and are only fit for bring-up and testing.
pub const PAUTH_KEYS: [u64; 5] = [
    0x1111_1111_1111_1111,
    0x2222_2222_2222_2222,
    0x3333_3333_3333_3333,
    0x4444_4444_4444_4444,
    0x5555_5555_5555_5555,
];

/// `ID_DFR0.PerfMon` values 3..=0xE mean PMUv3; 0xF is IMPLEMENTATION DEFINED.
pub const fn has_pmuv3(perf_mon: usize) -> bool {
    perf_mon >= 3 && perf_mon != 0xf
}
