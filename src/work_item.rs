//! The scheduling unit: a caller-allocated, statically-lived descriptor
//! linked in place into whichever queue currently owns it.
//!
//! Mirrors the intrusive-list design note: the `next` link and `flags` live
//! inline in the item rather than in a wrapper the scheduler allocates, so
//! submission and scheduling are allocation-free. All mutation of `flags`,
//! `next`, and `scheduled_uptime_ms` must happen under a critical section;
//! reading `flags` alone is safe without one.

use core::cell::UnsafeCell;
use core::ptr;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const RUNNING   = 0b001;
        const SUBMITTED = 0b010;
        const SCHEDULED = 0b100;
    }
}

/// A work item's handler. Run to completion on whichever context drains it;
/// must not block.
pub type Handler = fn(&WorkItem);

struct State {
    flags: Flags,
    scheduled_uptime_ms: u64,
    next: *const WorkItem,
}

/// A statically-allocated unit of scheduling.
///
/// Construct with [`WorkItem::new`] in a `static`; pass `&'static` references
/// to [`crate::scheduler::Scheduler`] operations.
pub struct WorkItem {
    handler: Handler,
    priority: i32,
    state: UnsafeCell<State>,
}

// SAFETY:
// - WorkItems are meant to live in `static` storage and be shared across
//   interrupt and cooperative contexts.
// - Every field inside `state` is mutated only while the caller holds the
//   crate's critical section, which on a single core serializes all
//   access; there is no concurrent writer to race.
unsafe impl Sync for WorkItem {}

impl WorkItem {
    /// Creates a new, idle work item. `priority` is a signed value; negative
    /// priorities route to the high-priority (soft-IRQ) context, and
    /// non-negative priorities route to the low-priority (main loop)
    /// context once submitted.
    pub const fn new(handler: Handler, priority: i32) -> Self {
        Self {
            handler,
            priority,
            state: UnsafeCell::new(State {
                flags: Flags::empty(),
                scheduled_uptime_ms: 0,
                next: ptr::null(),
            }),
        }
    }

    /// Static priority this item was created with.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Current flags. Safe to read without a critical section (benign
    /// race on a value that is only ever a consistent snapshot).
    pub fn flags(&self) -> Flags {
        // SAFETY: `flags` is a single byte read; any interleaving with a
        // concurrent critical-section write yields one of the two valid
        // states, never a torn value.
        unsafe { (*self.state.get()).flags }
    }

    /// Deadline set by the most recent `schedule_*` call. Meaningful only
    /// while `flags()` contains `SCHEDULED`.
    pub fn scheduled_uptime_ms(&self) -> u64 {
        // SAFETY: see `flags`; read under critical section by all callers
        // that need a consistent value alongside other state.
        unsafe { (*self.state.get()).scheduled_uptime_ms }
    }

    pub(crate) fn runs(&self) -> Handler {
        self.handler
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn set_flags(&self, flags: Flags) {
        (*self.state.get()).flags = flags;
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn insert_flags(&self, flags: Flags) {
        (*self.state.get()).flags |= flags;
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn remove_flags(&self, flags: Flags) {
        (*self.state.get()).flags &= !flags;
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn set_scheduled_uptime_ms(&self, deadline: u64) {
        (*self.state.get()).scheduled_uptime_ms = deadline;
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn next(&self) -> *const WorkItem {
        (*self.state.get()).next
    }

    /// Caller must hold the critical section.
    pub(crate) unsafe fn set_next(&self, next: *const WorkItem) {
        (*self.state.get()).next = next;
    }
}
