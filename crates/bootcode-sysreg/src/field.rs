use core::marker::PhantomData;

use crate::SysReg;

/// Mask covering bits `start..=end`.
#[inline(always)]
pub const fn mask(start: u32, end: u32) -> usize {
    let width = end - start + 1;
    let low = if width >= usize::BITS {
        usize::MAX
    } else {
        (1usize << width) - 1
    };
    low << start
}

/// `(reg >> start) & ((1 << (end - start + 1)) - 1)`
#[inline(always)]
pub const fn extract(reg: usize, start: u32, end: u32) -> usize {
    (reg & mask(start, end)) >> start
}

/// Replace bits `start..=end` of `reg` with `value`. Bits of `value` above the
/// field width are dropped.
#[inline(always)]
pub const fn insert(reg: usize, start: u32, end: u32, value: usize) -> usize {
    let m = mask(start, end);
    (reg & !m) | ((value << start) & m)
}

#[inline(always)]
pub fn get_field<R: SysReg>(start: u32, end: u32) -> usize {
    debug_assert!(start <= end && end < usize::BITS);
    extract(R::read(), start, end)
}

/// Read-modify-write of bits `start..=end`.
#[inline(always)]
pub fn set_field<R: SysReg>(start: u32, end: u32, value: usize) {
    debug_assert!(start <= end && end < usize::BITS);
    R::write(insert(R::read(), start, end, value));
}

/// Bits `START..=END` of register `R`.
pub struct Field<R, const START: u32, const END: u32>(PhantomData<R>);

/// A single-bit [`Field`].
pub type Bit<R, const IDX: u32> = Field<R, IDX, IDX>;

impl<R, const START: u32, const END: u32> Field<R, START, END> {
    const VALID: () = assert!(
        START <= END && END < usize::BITS,
        "field does not fit the native register width"
    );

    pub const WIDTH: u32 = END - START + 1;

    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R: SysReg, const START: u32, const END: u32> Field<R, START, END> {
    #[inline(always)]
    pub fn get(&self) -> usize {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        get_field::<R>(START, END)
    }

    #[inline(always)]
    pub fn set(&self, value: usize) {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        set_field::<R>(START, END, value)
    }

    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.get() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use proptest::prelude::*;

    static BACKING: AtomicUsize = AtomicUsize::new(0);
    static WRITES: AtomicUsize = AtomicUsize::new(0);

    struct Fake;

    impl SysReg for Fake {
        const NAME: &'static str = "FAKE";

        fn read() -> usize {
            BACKING.load(Ordering::SeqCst)
        }

        fn write(value: usize) {
            WRITES.fetch_add(1, Ordering::SeqCst);
            BACKING.store(value, Ordering::SeqCst)
        }
    }

    impl Fake {
        const LOW: Field<Self, 0, 3> = Field::new();
        const FLAG: Bit<Self, 7> = Bit::new();
        const TOP: Field<Self, 28, 31> = Field::new();
    }

    #[test]
    fn test_masks() {
        assert_eq!(mask(0, 0), 1);
        assert_eq!(mask(4, 7), 0xf0);
        assert_eq!(mask(0, usize::BITS - 1), usize::MAX);
        assert_eq!(mask(usize::BITS - 1, usize::BITS - 1), 1 << (usize::BITS - 1));
    }

    #[test]
    fn test_oversized_value_is_truncated() {
        assert_eq!(insert(0, 4, 7, 0x1ff), 0xf0);
        assert_eq!(insert(0xffff_0000, 0, 3, 0x13), 0xffff_0003);
    }

    #[test]
    fn test_named_fields_read_modify_write() {
        BACKING.store(0x1234_5678, Ordering::SeqCst);
        WRITES.store(0, Ordering::SeqCst);

        assert_eq!(Fake::LOW.get(), 0x8);
        assert_eq!(Fake::TOP.get(), 0x1);
        assert!(!Fake::FLAG.is_set());

        Fake::FLAG.set(1);
        assert_eq!(Fake::read(), 0x1234_56f8);
        Fake::LOW.set(0x3);
        assert_eq!(Fake::read(), 0x1234_56f3);
        Fake::TOP.set(0xa);
        assert_eq!(Fake::read(), 0xa234_56f3);
        assert_eq!(WRITES.load(Ordering::SeqCst), 3);

        // Each access reflects the register at the time of the call.
        BACKING.store(0x80, Ordering::SeqCst);
        assert!(Fake::FLAG.is_set());
        assert_eq!(Fake::LOW.get(), 0);
    }

    fn field_and_value() -> impl Strategy<Value = (u32, u32, usize)> {
        (1..=usize::BITS).prop_flat_map(|width| {
            let max = if width == usize::BITS {
                usize::MAX
            } else {
                (1usize << width) - 1
            };
            (0..=usize::BITS - width, Just(width), 0..=max)
                .prop_map(|(start, width, value)| (start, start + width - 1, value))
        })
    }

    proptest! {
        #[test]
        fn test_insert_then_extract_round_trips(reg in any::<usize>(), (start, end, value) in field_and_value()) {
            let updated = insert(reg, start, end, value);
            prop_assert_eq!(extract(updated, start, end), value);
            prop_assert_eq!(updated & !mask(start, end), reg & !mask(start, end));
        }

        #[test]
        fn test_extract_matches_shift_and_mask(reg in any::<usize>(), (start, end, _v) in field_and_value()) {
            let width = end - start + 1;
            let expected = if width == usize::BITS {
                reg
            } else {
                (reg >> start) & ((1usize << width) - 1)
            };
            prop_assert_eq!(extract(reg, start, end), expected);
        }
    }
}
