//! S3 — the system primitives contract.
//!
//! The raw hardware/host primitives are expressed as a trait rather than a
//! set of C-style extern functions so a board support crate, a host test
//! harness, or a simulator can each provide one `&'static dyn Platform`
//! without the core needing `#[cfg]` branches per target. The nestable
//! critical section itself is *not* part of this trait — it is delegated to
//! the `critical-section` crate, whose `Impl` the same collaborator
//! registers separately via `critical_section::set_impl!`.

use core::cell::UnsafeCell;

/// Collaborator interface the core consumes for everything except the
/// critical section and derived uptime arithmetic (see [`crate::clock`]).
pub trait Platform: Sync {
    /// Current value of the free-running hardware counter, ticking at
    /// 1 MHz, wrapping at 2^32.
    fn counter_low_us(&self) -> u32;

    /// Whether the hardware counter has an unacknowledged overflow pending.
    /// Must only be inspected/cleared from inside a critical section.
    fn take_counter_overflow(&self) -> bool;

    /// Busy-waits for approximately `us` microseconds.
    fn busy_sleep_us(&self, us: u64);

    /// Busy-waits for approximately `ms` milliseconds.
    fn busy_sleep_ms(&self, ms: u64) {
        self.busy_sleep_us(ms.saturating_mul(1000));
    }

    /// Halts the core until any interrupt becomes pending, even if masked.
    /// May be called while a critical section is held.
    fn enter_sleep_mode(&self);

    /// Programs a one-shot hardware timer to fire `timer_handler` at
    /// absolute uptime `abs_ms`. A deadline already in the past fires as
    /// soon as possible; one too far in the future fires as late as
    /// possible and relies on `timer_handler` to re-arm.
    fn timer_schedule_at(&self, abs_ms: u64);

    /// Raises a pending software interrupt that will run `softirq_handler`
    /// before this context next observes the low-priority queue.
    fn softirq_trigger(&self);

    /// Emits one byte synchronously, blocking if necessary.
    fn debug_out(&self, byte: u8);

    /// Disables interrupts and halts (production) or aborts (simulator).
    /// Never returns.
    fn fatal_error(&self) -> !;
}

struct PlatformSlot {
    inner: UnsafeCell<Option<&'static dyn Platform>>,
}

// SAFETY:
// - The slot is written exactly once, by `init`, before any other API in
//   this crate is reachable in practice; subsequent access is read-only.
// - Single core is assumed throughout this crate, so there is no concurrent
//   writer to race against a reader.
unsafe impl Sync for PlatformSlot {}

static PLATFORM: PlatformSlot = PlatformSlot {
    inner: UnsafeCell::new(None),
};

/// Registers the platform implementation. Must be called exactly once,
/// before any other operation in this crate, during early program startup.
pub fn init(platform: &'static dyn Platform) {
    // SAFETY: single core, called once during startup before any reader.
    unsafe {
        *PLATFORM.inner.get() = Some(platform);
    }
}

/// Returns the registered platform. Calling this before `init` is a
/// programmer error and invokes [`crate::error::fatal`] with
/// [`crate::error::Fatal::PlatformNotInitialized`]. `fatal`'s own
/// re-entrancy guard bounds the recursion this causes (it calls back into
/// `get()` via `Platform::fatal_error`, which lands on the guard's
/// already-in-progress branch instead of looping forever here).
pub fn get() -> &'static dyn Platform {
    // SAFETY: write-once-then-read-only, see `PlatformSlot`.
    match unsafe { *PLATFORM.inner.get() } {
        Some(p) => p,
        None => crate::error::fatal(crate::error::Fatal::PlatformNotInitialized),
    }
}

/// Whether [`init`] has been called.
pub fn is_initialized() -> bool {
    // SAFETY: write-once-then-read-only, see `PlatformSlot`.
    unsafe { (*PLATFORM.inner.get()).is_some() }
}
