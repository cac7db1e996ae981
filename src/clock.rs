//! Monotonic uptime built from a 32-bit hardware counter plus a software
//! high word, per the torn-read-avoidance recipe in S3: sample the low
//! word, check for a pending overflow, and if one is pending bump the high
//! word and re-sample the low word before combining them.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::platform;

static HIGH_WORD: AtomicU32 = AtomicU32::new(0);

/// Monotonic time since boot, in microseconds.
pub fn uptime_us() -> u64 {
    critical_section::with(|_| {
        let p = platform::get();
        let mut low = p.counter_low_us();

        if p.take_counter_overflow() {
            HIGH_WORD.fetch_add(1, Ordering::Relaxed);
            low = p.counter_low_us();
        }

        let high = HIGH_WORD.load(Ordering::Relaxed);
        ((high as u64) << 32) | (low as u64)
    })
}

/// Monotonic time since boot, in milliseconds. Always agrees with
/// [`uptime_us`]: `uptime_ms() == uptime_us() / 1000`.
pub fn uptime_ms() -> u64 {
    uptime_us() / 1000
}

/// Busy-waits for approximately `us` microseconds.
pub fn busy_sleep_us(us: u64) {
    platform::get().busy_sleep_us(us);
}

/// Busy-waits for approximately `ms` milliseconds.
pub fn busy_sleep_ms(ms: u64) {
    platform::get().busy_sleep_ms(ms);
}
