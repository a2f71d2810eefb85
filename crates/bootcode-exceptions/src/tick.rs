use core::sync::atomic::{AtomicU32, Ordering};

/// SysTick interrupts taken since boot. Exported for application code.
#[no_mangle]
#[allow(non_upper_case_globals)]
pub static __systick_count: AtomicU32 = AtomicU32::new(0);

/// Tick handler body. Plain load and store: Armv6-M has no atomic
/// read-modify-write, and this handler is the only writer.
#[inline]
pub fn on_tick() {
    let count = __systick_count.load(Ordering::Relaxed);
    __systick_count.store(count.wrapping_add(1), Ordering::Relaxed);
}

pub fn ticks() -> u32 {
    __systick_count.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_and_wraps() {
        let before = ticks();
        on_tick();
        on_tick();
        assert_eq!(ticks(), before.wrapping_add(2));

        __systick_count.store(u32::MAX, Ordering::Relaxed);
        on_tick();
        assert_eq!(ticks(), 0);
    }
}
