//! Deterministic host-side test double for [`crate::platform::Platform`].
//!
//! `FakePlatform` never actually sleeps: time only moves when a test calls
//! [`FakePlatform::advance_us`]/[`advance_ms`], and the soft-IRQ is modelled
//! by an immediate call into `softirq_handler` from `softirq_trigger` — one
//! of the two host-simulator strategies the specification explicitly
//! sanctions (`SPEC_FULL.md` §9's soft-IRQ design note).

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::platform::Platform;
use crate::scheduler;

const DEBUG_SINK_CAPACITY: usize = 8192;

pub struct FakePlatform {
    now_us: AtomicU64,
    overflow_pending: AtomicBool,
    timer_deadline_ms: AtomicU64,
    debug_sink: UnsafeCell<heapless::Vec<u8, DEBUG_SINK_CAPACITY>>,
}

// SAFETY: the fake platform is only ever driven from a single test thread;
// `debug_sink` is mutated exclusively from `debug_out`, called only while
// the crate's critical section backend (the `std` feature of
// `critical-section`) already serializes access.
unsafe impl Sync for FakePlatform {}

impl FakePlatform {
    pub const fn new() -> Self {
        Self {
            now_us: AtomicU64::new(0),
            overflow_pending: AtomicBool::new(false),
            timer_deadline_ms: AtomicU64::new(u64::MAX),
            debug_sink: UnsafeCell::new(heapless::Vec::new()),
        }
    }

    /// Moves the virtual clock forward, tracking whether the 32-bit
    /// hardware counter this models would have wrapped.
    pub fn advance_us(&self, delta_us: u64) {
        let prev = self.now_us.fetch_add(delta_us, Ordering::SeqCst);
        let next = prev + delta_us;
        if (prev >> 32) != (next >> 32) {
            self.overflow_pending.store(true, Ordering::SeqCst);
        }
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.advance_us(delta_ms.saturating_mul(1000));
    }

    pub fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::SeqCst)
    }

    /// Bytes written to the debug sink so far (the rendered log stream).
    pub fn debug_output(&self) -> heapless::Vec<u8, DEBUG_SINK_CAPACITY> {
        // SAFETY: single test thread.
        unsafe { (*self.debug_sink.get()).clone() }
    }

    pub fn clear_debug_output(&self) {
        // SAFETY: single test thread.
        unsafe { (*self.debug_sink.get()).clear() };
    }

    pub fn timer_deadline_ms(&self) -> Option<u64> {
        match self.timer_deadline_ms.load(Ordering::SeqCst) {
            u64::MAX => None,
            ms => Some(ms),
        }
    }
}

impl Platform for FakePlatform {
    fn counter_low_us(&self) -> u32 {
        self.now_us.load(Ordering::SeqCst) as u32
    }

    fn take_counter_overflow(&self) -> bool {
        self.overflow_pending.swap(false, Ordering::SeqCst)
    }

    fn busy_sleep_us(&self, us: u64) {
        self.advance_us(us);
    }

    fn enter_sleep_mode(&self) {
        // No real interrupts here; `run_for` drives time forward directly
        // instead of relying on this to unblock.
    }

    fn timer_schedule_at(&self, abs_ms: u64) {
        self.timer_deadline_ms.store(abs_ms, Ordering::SeqCst);
    }

    fn softirq_trigger(&self) {
        scheduler::softirq_handler();
    }

    fn debug_out(&self, byte: u8) {
        // SAFETY: single test thread.
        let _ = unsafe { (*self.debug_sink.get()).push(byte) };
    }

    fn fatal_error(&self) -> ! {
        panic!("fatal_error invoked");
    }
}

/// Drives the scheduler for `duration_ms` of virtual time without ever
/// calling the real `Platform::enter_sleep_mode`/blocking: promotes due
/// scheduled items, drains the low-priority queue to exhaustion, then jumps
/// the virtual clock to the next interesting instant (the earliest of the
/// next scheduled deadline or the end of the window).
pub fn run_for(platform: &FakePlatform, duration_ms: u64) {
    let start_ms = platform.now_us() / 1000;
    let end_ms = start_ms + duration_ms;

    loop {
        scheduler::testkit_support::promote_scheduled_due_items();
        while scheduler::testkit_support::drain_one(scheduler::testkit_support::low_queue()) {}

        let now_ms = platform.now_us() / 1000;
        if now_ms >= end_ms {
            break;
        }

        let next_ms = scheduler::testkit_support::next_scheduled_deadline_ms()
            .unwrap_or(end_ms)
            .clamp(now_ms + 1, end_ms);
        platform.advance_ms(next_ms - now_ms);
    }
}
